// --- File: crates/roster_common/src/lib.rs ---

// Declare modules within this crate
pub mod error; // Error taxonomy and HTTP status mapping
pub mod http; // Axum responses for errors
pub mod logging; // Logging utilities
pub mod models; // Member and Video
pub mod record; // Generic record model and validation
#[cfg(test)]
mod record_test;

// Re-export error types and utilities for easier access
pub use error::{
    conflict, empty, internal_error, not_found, validation_error, HttpStatusCode, RosterError,
};

pub use http::IntoHttpResponse;

pub use models::{Member, MemberPatch, Video, VideoPatch};
pub use record::{
    parse_fields, parse_new_record, parse_patch, FieldKind, FieldMap, FieldSpec, FieldValue,
    FieldValues, NewRecord, Record, RecordFields, ID_FIELD,
};
