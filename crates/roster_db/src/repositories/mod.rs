//! Record store implementations
//!
//! `sql` talks to the configured database, `memory` keeps everything in the
//! process.

pub mod memory;
pub mod sql;

pub use memory::MemoryRecordStore;
pub use sql::SqlRecordStore;
