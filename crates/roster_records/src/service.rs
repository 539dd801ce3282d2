//! Record upsert service
//!
//! Business rules for one record kind, written against [`RecordStore`] so the
//! same service runs over SQL and in-memory storage.

use roster_common::{
    conflict, empty, not_found, FieldValue, NewRecord, Record, RecordFields, RosterError,
};
use roster_config::RecordsConfig;
use roster_db::{RecordStore, Written};
use std::marker::PhantomData;
use tracing::{debug, info};

/// Service for the record kind `F` backed by the store `S`
#[derive(Debug)]
pub struct RecordService<F, S> {
    store: S,
    idempotent_delete_all: bool,
    _kind: PhantomData<fn() -> F>,
}

fn title(kind: &str) -> String {
    let mut chars = kind.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl<F: RecordFields, S: RecordStore<F>> RecordService<F, S> {
    pub fn new(store: S, config: &RecordsConfig) -> Self {
        Self {
            store,
            idempotent_delete_all: config.idempotent_delete_all,
            _kind: PhantomData,
        }
    }

    /// The underlying record store
    pub fn store(&self) -> &S {
        &self.store
    }

    fn id_not_found(id: i64) -> RosterError {
        not_found(format!("{} with the given ID ({}) was not found", title(F::KIND), id))
    }

    /// Every record ordered by identifier.
    ///
    /// # Errors
    ///
    /// [`RosterError::EmptyError`] when no record exists.
    pub async fn list_all(&self) -> Result<Vec<Record<F>>, RosterError> {
        debug!("Listing all {}", F::TABLE);
        let records = self.store.find_all().await?;
        if records.is_empty() {
            return Err(empty(format!("No {} found", F::TABLE)));
        }
        Ok(records)
    }

    /// Creates a record from validated fields.
    ///
    /// # Errors
    ///
    /// [`RosterError::ConflictError`] when a unique field collides with an
    /// existing record, or the requested identifier is already taken.
    pub async fn create(&self, new: NewRecord<F>) -> Result<Record<F>, RosterError> {
        debug!("Creating {}", F::KIND);

        for (field, value) in new.fields.unique_values() {
            if self.store.find_by_field(field, &value).await?.is_some() {
                return Err(conflict(format!(
                    "{} with {} '{}' already exists",
                    title(F::KIND),
                    field,
                    value
                )));
            }
        }

        if let Some(id) = new.id {
            if self.store.find_by_id(id).await?.is_some() {
                return Err(conflict(format!("{} ID {} already in use", title(F::KIND), id)));
            }
        }

        let record = self.store.insert(new.id, &new.fields).await?;
        info!("Created {} {}", F::KIND, record.id);
        Ok(record)
    }

    /// The lowest-id record whose key field equals `key` exactly.
    pub async fn get_by_key(&self, key: &str) -> Result<Record<F>, RosterError> {
        debug!("Looking up {} by {} '{}'", F::KIND, F::KEY_FIELD, key);
        self.store
            .find_by_field(F::KEY_FIELD, &FieldValue::Text(key.to_string()))
            .await?
            .ok_or_else(|| {
                not_found(format!(
                    "{} with {} '{}' was not found",
                    title(F::KIND),
                    F::KEY_FIELD,
                    key
                ))
            })
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Record<F>, RosterError> {
        debug!("Looking up {} {}", F::KIND, id);
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| Self::id_not_found(id))
    }

    /// Replaces every field of record `id`, or creates it under `id`.
    ///
    /// The returned [`Written`] tells whether the record existed.
    pub async fn upsert(&self, id: i64, fields: F) -> Result<Written<F>, RosterError> {
        debug!("Upserting {} {}", F::KIND, id);
        let written = self.store.put(id, &fields).await?;
        match &written {
            Written::Created(_) => info!("Created {} {} by upsert", F::KIND, id),
            Written::Replaced(_) => info!("Replaced {} {}", F::KIND, id),
        }
        Ok(written)
    }

    /// Overwrites the fields present in `patch`. Never creates.
    pub async fn patch(&self, id: i64, patch: F::Patch) -> Result<Record<F>, RosterError> {
        debug!("Patching {} {}: {:?}", F::KIND, id, patch);

        let not_found_for_update = || {
            not_found(format!(
                "Cannot update because {} with the given ID ({}) was not found",
                F::KIND,
                id
            ))
        };

        let mut record = self
            .store
            .find_by_id(id)
            .await?
            .ok_or_else(not_found_for_update)?;
        record.fields.apply_patch(patch);

        if !self.store.update(&record).await? {
            return Err(not_found_for_update());
        }

        info!("Updated {} {}", F::KIND, id);
        Ok(record)
    }

    pub async fn delete(&self, id: i64) -> Result<(), RosterError> {
        debug!("Deleting {} {}", F::KIND, id);
        if !self.store.delete(id).await? {
            return Err(Self::id_not_found(id));
        }
        info!("Deleted {} {}", F::KIND, id);
        Ok(())
    }

    /// Removes every record and returns how many there were.
    ///
    /// # Errors
    ///
    /// [`RosterError::NotFoundError`] when nothing was stored, unless
    /// `records.idempotent_delete_all` is set.
    pub async fn delete_all(&self) -> Result<u64, RosterError> {
        debug!("Deleting all {}", F::TABLE);
        let removed = self.store.delete_all().await?;
        if removed == 0 && !self.idempotent_delete_all {
            return Err(not_found(format!("No {} to delete", F::TABLE)));
        }
        info!("Deleted {} {}", removed, F::TABLE);
        Ok(removed)
    }
}
