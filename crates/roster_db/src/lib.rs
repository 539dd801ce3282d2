//! Record storage for Roster
//!
//! This crate provides a database client over SQLx's `Any` driver and the
//! [`RecordStore`] trait the record service is written against. SQLite,
//! PostgreSQL and MySQL are selected through feature flags; an in-memory store
//! needs no database at all.
//!
//! # Usage
//!
//! ```toml
//! [dependencies]
//! roster-db = { version = "0.1.0", features = ["postgres"] }
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use roster_common::Member;
//! use roster_db::{DbClient, RecordStore, SqlRecordStore};
//!
//! async fn setup() -> Result<SqlRecordStore<Member>, roster_db::DbError> {
//!     let client = DbClient::from_url("sqlite://data/roster.db").await?;
//!     let members = SqlRecordStore::<Member>::new(client);
//!     members.init_schema().await?;
//!     Ok(members)
//! }
//! ```

pub mod client;
pub mod error;
pub mod repositories;
pub mod repository;

pub use client::{Backend, DbClient};
pub use error::DbError;
pub use repositories::{MemoryRecordStore, SqlRecordStore};
pub use repository::{RecordStore, Written};
