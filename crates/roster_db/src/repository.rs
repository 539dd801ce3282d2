//! Record store trait
//!
//! The record upsert service only talks to storage through this trait, so
//! it runs unchanged over the SQL store and the in-memory store.

use crate::error::DbError;
use roster_common::{FieldValue, Record, RecordFields};
use std::future::Future;

/// Result of writing a full field set under a given identifier.
#[derive(Debug, Clone, PartialEq)]
pub enum Written<F> {
    /// No record had the identifier; one was inserted.
    Created(Record<F>),
    /// The record existed and all of its fields were overwritten.
    Replaced(Record<F>),
}

impl<F> Written<F> {
    pub fn into_record(self) -> Record<F> {
        match self {
            Written::Created(record) | Written::Replaced(record) => record,
        }
    }
}

/// Persistence for one record kind.
pub trait RecordStore<F: RecordFields>: Send + Sync + 'static {
    /// Create the backing table if it does not exist yet
    fn init_schema(&self) -> impl Future<Output = Result<(), DbError>> + Send;

    /// Every record, ordered by identifier
    fn find_all(&self) -> impl Future<Output = Result<Vec<Record<F>>, DbError>> + Send;

    /// The record with `id`, if any
    fn find_by_id(&self, id: i64)
        -> impl Future<Output = Result<Option<Record<F>>, DbError>> + Send;

    /// The record with the lowest identifier whose `field` equals `value` exactly
    fn find_by_field(
        &self,
        field: &'static str,
        value: &FieldValue,
    ) -> impl Future<Output = Result<Option<Record<F>>, DbError>> + Send;

    /// Insert a record. Without an `id` the store assigns one.
    ///
    /// Fails with [`DbError::DuplicateKey`] when `id` is taken.
    fn insert(
        &self,
        id: Option<i64>,
        fields: &F,
    ) -> impl Future<Output = Result<Record<F>, DbError>> + Send;

    /// Overwrite the fields of an existing record. Returns `false` if it is absent.
    fn update(&self, record: &Record<F>) -> impl Future<Output = Result<bool, DbError>> + Send;

    /// Replace the record with `id`, or insert it under `id`, as one atomic step
    fn put(
        &self,
        id: i64,
        fields: &F,
    ) -> impl Future<Output = Result<Written<F>, DbError>> + Send;

    /// Delete the record with `id`. Returns `false` if it is absent.
    fn delete(&self, id: i64) -> impl Future<Output = Result<bool, DbError>> + Send;

    /// Delete every record, returning how many were removed
    fn delete_all(&self) -> impl Future<Output = Result<u64, DbError>> + Send;
}
