//! In-memory record store
//!
//! Keeps records in a `BTreeMap` keyed by identifier, which also gives
//! identifier order for listings. Used by tests and by `database.url = "memory"`.

use crate::error::DbError;
use crate::repository::{RecordStore, Written};
use roster_common::{FieldValue, Record, RecordFields};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

#[derive(Debug)]
struct Rows<F> {
    rows: BTreeMap<i64, F>,
    next_id: i64,
}

impl<F: Clone> Rows<F> {
    fn insert_at(&mut self, id: i64, fields: F) -> Record<F> {
        self.next_id = self.next_id.max(id.saturating_add(1));
        self.rows.insert(id, fields.clone());
        Record::new(id, fields)
    }
}

/// In-memory implementation of [`RecordStore`].
#[derive(Debug)]
pub struct MemoryRecordStore<F> {
    inner: Mutex<Rows<F>>,
}

impl<F: RecordFields> MemoryRecordStore<F> {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Rows {
                rows: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Rows<F>>, DbError> {
        self.inner
            .lock()
            .map_err(|_| DbError::Other(format!("{} store lock poisoned", F::KIND)))
    }
}

impl<F: RecordFields> Default for MemoryRecordStore<F> {
    fn default() -> Self {
        Self::new()
    }
}

fn field_value<F: RecordFields>(fields: &F, field: &str) -> Option<FieldValue> {
    F::FIELDS
        .iter()
        .zip(fields.to_values())
        .find(|(spec, _)| spec.name == field)
        .map(|(_, value)| value)
}

impl<F: RecordFields> RecordStore<F> for MemoryRecordStore<F> {
    async fn init_schema(&self) -> Result<(), DbError> {
        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<Record<F>>, DbError> {
        let guard = self.lock()?;
        Ok(guard
            .rows
            .iter()
            .map(|(id, fields)| Record::new(*id, fields.clone()))
            .collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Record<F>>, DbError> {
        let guard = self.lock()?;
        Ok(guard
            .rows
            .get(&id)
            .map(|fields| Record::new(id, fields.clone())))
    }

    async fn find_by_field(
        &self,
        field: &'static str,
        value: &FieldValue,
    ) -> Result<Option<Record<F>>, DbError> {
        let guard = self.lock()?;
        Ok(guard
            .rows
            .iter()
            .find(|(_, fields)| field_value(*fields, field).as_ref() == Some(value))
            .map(|(id, fields)| Record::new(*id, fields.clone())))
    }

    async fn insert(&self, id: Option<i64>, fields: &F) -> Result<Record<F>, DbError> {
        let mut guard = self.lock()?;
        let id = id.unwrap_or(guard.next_id);
        if guard.rows.contains_key(&id) {
            return Err(DbError::DuplicateKey(format!(
                "{} with id {} already exists",
                F::KIND,
                id
            )));
        }
        debug!("Inserting {} {} into memory store", F::KIND, id);
        Ok(guard.insert_at(id, fields.clone()))
    }

    async fn update(&self, record: &Record<F>) -> Result<bool, DbError> {
        let mut guard = self.lock()?;
        match guard.rows.get_mut(&record.id) {
            Some(fields) => {
                *fields = record.fields.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn put(&self, id: i64, fields: &F) -> Result<Written<F>, DbError> {
        let mut guard = self.lock()?;
        if let Some(existing) = guard.rows.get_mut(&id) {
            *existing = fields.clone();
            return Ok(Written::Replaced(Record::new(id, fields.clone())));
        }
        Ok(Written::Created(guard.insert_at(id, fields.clone())))
    }

    async fn delete(&self, id: i64) -> Result<bool, DbError> {
        let mut guard = self.lock()?;
        Ok(guard.rows.remove(&id).is_some())
    }

    async fn delete_all(&self) -> Result<u64, DbError> {
        let mut guard = self.lock()?;
        let removed = guard.rows.len() as u64;
        guard.rows.clear();
        Ok(removed)
    }
}
