//! Record upsert service for Roster
//!
//! This crate provides the business rules of a record collection (create,
//! keyed lookup, replace-or-create, partial update, delete) and the axum
//! routes that expose them. It is generic over the record kind and over the
//! [`roster_db::RecordStore`] holding it.
//!
//! # Example
//!
//! ```rust,no_run
//! use roster_common::Member;
//! use roster_config::RecordsConfig;
//! use roster_db::MemoryRecordStore;
//! use roster_records::{routes, RecordService};
//! use std::sync::Arc;
//!
//! let service = RecordService::<Member, _>::new(MemoryRecordStore::new(), &RecordsConfig::default());
//! let app: axum::Router = routes(Arc::new(service));
//! ```
//!
//! # API Endpoints
//!
//! For a kind stored in table `members`:
//!
//! - `GET /members/all` - List every member
//! - `GET /members/{name}` - Get a member by name
//! - `GET /members/by-id/{id}` - Get a member by id
//! - `POST /members/new` - Create a member
//! - `PUT /members/{id}/replace` - Replace or create the member with an id
//! - `PATCH /members/{id}/update` - Update some fields of a member
//! - `DELETE /members/{id}/delete` - Delete a member
//! - `DELETE /members/all/delete` - Delete every member

pub mod extract;
pub mod handlers;
pub mod routes;
pub mod service;
#[cfg(test)]
mod service_test;

pub use extract::{RecordBody, RecordId};
pub use routes::routes;
pub use service::RecordService;
