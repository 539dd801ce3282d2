//! SQL implementation of the record store
//!
//! One implementation serves every record kind. Column names, column types and
//! the table name all come from the kind's [`RecordFields`] description, and the
//! statements are rendered for the backend behind the [`DbClient`].

use crate::client::{Backend, DbClient};
use crate::error::DbError;
use crate::repository::{RecordStore, Written};
use roster_common::{FieldKind, FieldValue, FieldValues, Record, RecordFields, ID_FIELD};
use sqlx::any::{AnyArguments, AnyRow};
use sqlx::query::Query;
use sqlx::Row;
use std::marker::PhantomData;
use tracing::{debug, error, info};

type AnyQuery<'q> = Query<'q, sqlx::Any, AnyArguments<'q>>;

/// SQL implementation of [`RecordStore`] for the record kind `F`
#[derive(Debug)]
pub struct SqlRecordStore<F> {
    /// The database client
    db_client: DbClient,
    _kind: PhantomData<fn() -> F>,
}

impl<F> Clone for SqlRecordStore<F> {
    fn clone(&self) -> Self {
        Self {
            db_client: self.db_client.clone(),
            _kind: PhantomData,
        }
    }
}

impl<F: RecordFields> SqlRecordStore<F> {
    /// Create a new SQL record store over `db_client`
    pub fn new(db_client: DbClient) -> Self {
        Self {
            db_client,
            _kind: PhantomData,
        }
    }

    fn backend(&self) -> Backend {
        self.db_client.backend()
    }

    fn column_list() -> String {
        std::iter::once(ID_FIELD)
            .chain(F::FIELDS.iter().map(|spec| spec.name))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn placeholders(&self, from: usize, count: usize) -> String {
        (from..from + count)
            .map(|n| self.backend().placeholder(n))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn create_table_sql(backend: Backend) -> String {
        let id_column = match backend {
            Backend::Sqlite => "id INTEGER PRIMARY KEY AUTOINCREMENT",
            Backend::Postgres => "id BIGINT GENERATED BY DEFAULT AS IDENTITY PRIMARY KEY",
            Backend::MySql => "id BIGINT AUTO_INCREMENT PRIMARY KEY",
        };
        let columns = F::FIELDS
            .iter()
            .map(|spec| {
                let sql_type = match (spec.kind, backend) {
                    (FieldKind::Text, Backend::MySql) => "VARCHAR(255) CHARACTER SET utf8mb4 COLLATE utf8mb4_bin",
                    (FieldKind::Text, _) => "TEXT",
                    (FieldKind::Integer, Backend::Sqlite) => "INTEGER",
                    (FieldKind::Integer, _) => "BIGINT",
                };
                format!("{} {} NOT NULL", spec.name, sql_type)
            })
            .collect::<Vec<_>>()
            .join(",\n                ");

        format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                {},
                {}
            )
        "#,
            F::TABLE,
            id_column,
            columns
        )
    }

    fn select_sql(&self, filter: Option<&str>) -> String {
        let mut query = format!("SELECT {} FROM {}", Self::column_list(), F::TABLE);
        if let Some(column) = filter {
            query.push_str(&format!(" WHERE {} = {}", column, self.backend().placeholder(1)));
        }
        query.push_str(" ORDER BY id");
        if filter.is_some() && filter != Some(ID_FIELD) {
            query.push_str(" LIMIT 1");
        }
        query
    }

    fn update_sql(&self) -> String {
        let assignments = F::FIELDS
            .iter()
            .enumerate()
            .map(|(i, spec)| format!("{} = {}", spec.name, self.backend().placeholder(i + 1)))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "UPDATE {} SET {} WHERE id = {}",
            F::TABLE,
            assignments,
            self.backend().placeholder(F::FIELDS.len() + 1)
        )
    }

    fn insert_with_id_sql(&self) -> String {
        format!(
            "INSERT INTO {} ({}) VALUES ({})",
            F::TABLE,
            Self::column_list(),
            self.placeholders(1, F::FIELDS.len() + 1)
        )
    }

    fn insert_sql(&self) -> String {
        let columns = F::FIELDS
            .iter()
            .map(|spec| spec.name)
            .collect::<Vec<_>>()
            .join(", ");
        let mut query = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            F::TABLE,
            columns,
            self.placeholders(1, F::FIELDS.len())
        );
        // MySQL has no RETURNING; its id is read back on the same connection
        if self.backend() != Backend::MySql {
            query.push_str(" RETURNING id");
        }
        query
    }

    /// Insert with a store-assigned identifier and return that identifier.
    ///
    /// The insert and the id read share one transaction, so a failed read
    /// leaves no row behind.
    async fn insert_generated(&self, fields: &F) -> Result<i64, DbError> {
        debug!("Inserting {} with generated id", F::KIND);

        let mut tx = self.db_client.begin().await?;
        let insert_sql = self.insert_sql();
        let query = Self::bind_fields(sqlx::query(&insert_sql), fields);

        let row = if self.backend() == Backend::MySql {
            query.execute(&mut *tx).await.map_err(|e| {
                error!("Failed to insert {}: {}", F::KIND, e);
                DbError::from_query(e)
            })?;
            sqlx::query("SELECT CAST(LAST_INSERT_ID() AS SIGNED) AS id")
                .fetch_one(&mut *tx)
                .await
                .map_err(DbError::from_query)?
        } else {
            query.fetch_one(&mut *tx).await.map_err(|e| {
                error!("Failed to insert {}: {}", F::KIND, e);
                DbError::from_query(e)
            })?
        };

        let id = row
            .try_get::<i64, _>(ID_FIELD)
            .map_err(|e| DbError::DecodeError(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionError(e.to_string()))?;
        Ok(id)
    }

    fn bind_fields<'q>(mut query: AnyQuery<'q>, fields: &F) -> AnyQuery<'q> {
        for value in fields.to_values() {
            query = match value {
                FieldValue::Text(s) => query.bind(s),
                FieldValue::Integer(i) => query.bind(i),
            };
        }
        query
    }

    fn row_to_record(row: &AnyRow) -> Result<Record<F>, DbError> {
        let id: i64 = row
            .try_get(ID_FIELD)
            .map_err(|e| DbError::DecodeError(e.to_string()))?;

        let mut values = Vec::with_capacity(F::FIELDS.len());
        for spec in F::FIELDS {
            let value = match spec.kind {
                FieldKind::Text => row.try_get::<String, _>(spec.name).map(FieldValue::Text),
                FieldKind::Integer => row.try_get::<i64, _>(spec.name).map(FieldValue::Integer),
            }
            .map_err(|e| DbError::DecodeError(format!("column '{}': {}", spec.name, e)))?;
            values.push(value);
        }

        let fields = F::from_values(&FieldValues::complete(F::FIELDS, values))
            .map_err(|e| DbError::DecodeError(e.to_string()))?;
        Ok(Record::new(id, fields))
    }
}

impl<F: RecordFields> RecordStore<F> for SqlRecordStore<F> {
    async fn init_schema(&self) -> Result<(), DbError> {
        debug!("Initializing {} schema", F::TABLE);

        self.db_client
            .execute(&Self::create_table_sql(self.backend()))
            .await?;

        info!("{} schema initialized successfully", F::TABLE);
        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<Record<F>>, DbError> {
        debug!("Finding all {}", F::TABLE);

        let rows = sqlx::query(&self.select_sql(None))
            .fetch_all(self.db_client.pool())
            .await
            .map_err(|e| {
                error!("Failed to list {}: {}", F::TABLE, e);
                DbError::from_query(e)
            })?;

        rows.iter().map(Self::row_to_record).collect()
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Record<F>>, DbError> {
        debug!("Finding {} with id {}", F::KIND, id);

        let row = sqlx::query(&self.select_sql(Some(ID_FIELD)))
            .bind(id)
            .fetch_optional(self.db_client.pool())
            .await
            .map_err(|e| {
                error!("Failed to find {} {}: {}", F::KIND, id, e);
                DbError::from_query(e)
            })?;

        row.as_ref().map(Self::row_to_record).transpose()
    }

    async fn find_by_field(
        &self,
        field: &'static str,
        value: &FieldValue,
    ) -> Result<Option<Record<F>>, DbError> {
        if !F::FIELDS.iter().any(|spec| spec.name == field) {
            return Err(DbError::QueryError(format!(
                "{} has no column '{}'",
                F::TABLE,
                field
            )));
        }
        debug!("Finding {} where {} = {}", F::KIND, field, value);

        let select_sql = self.select_sql(Some(field));
        let query = sqlx::query(&select_sql);
        let query = match value {
            FieldValue::Text(s) => query.bind(s.clone()),
            FieldValue::Integer(i) => query.bind(*i),
        };
        let row = query
            .fetch_optional(self.db_client.pool())
            .await
            .map_err(|e| {
                error!("Failed to find {} by {}: {}", F::KIND, field, e);
                DbError::from_query(e)
            })?;

        row.as_ref().map(Self::row_to_record).transpose()
    }

    async fn insert(&self, id: Option<i64>, fields: &F) -> Result<Record<F>, DbError> {
        let Some(id) = id else {
            let id = self.insert_generated(fields).await?;
            info!("Created {} {}", F::KIND, id);
            return Ok(Record::new(id, fields.clone()));
        };

        debug!("Inserting {} with id {}", F::KIND, id);
        let insert_sql = self.insert_with_id_sql();
        Self::bind_fields(sqlx::query(&insert_sql).bind(id), fields)
            .execute(self.db_client.pool())
            .await
            .map_err(|e| {
                error!("Failed to insert {} {}: {}", F::KIND, id, e);
                DbError::from_query(e)
            })?;

        info!("Created {} {}", F::KIND, id);
        Ok(Record::new(id, fields.clone()))
    }

    async fn update(&self, record: &Record<F>) -> Result<bool, DbError> {
        debug!("Updating {} {}", F::KIND, record.id);

        let update_sql = self.update_sql();
        let result = Self::bind_fields(sqlx::query(&update_sql), &record.fields)
            .bind(record.id)
            .execute(self.db_client.pool())
            .await
            .map_err(|e| {
                error!("Failed to update {} {}: {}", F::KIND, record.id, e);
                DbError::from_query(e)
            })?;

        Ok(result.rows_affected() > 0)
    }

    async fn put(&self, id: i64, fields: &F) -> Result<Written<F>, DbError> {
        debug!("Replacing or creating {} {}", F::KIND, id);

        let mut tx = self.db_client.begin().await?;

        let existing = sqlx::query(&self.select_sql(Some(ID_FIELD)))
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(DbError::from_query)?;

        let written = if existing.is_some() {
            let update_sql = self.update_sql();
            Self::bind_fields(sqlx::query(&update_sql), fields)
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    error!("Failed to replace {} {}: {}", F::KIND, id, e);
                    DbError::from_query(e)
                })?;
            Written::Replaced(Record::new(id, fields.clone()))
        } else {
            let insert_sql = self.insert_with_id_sql();
            Self::bind_fields(sqlx::query(&insert_sql).bind(id), fields)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    error!("Failed to create {} {}: {}", F::KIND, id, e);
                    DbError::from_query(e)
                })?;
            Written::Created(Record::new(id, fields.clone()))
        };

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionError(e.to_string()))?;

        info!("Stored {} {}", F::KIND, id);
        Ok(written)
    }

    async fn delete(&self, id: i64) -> Result<bool, DbError> {
        debug!("Deleting {} {}", F::KIND, id);

        let query = format!(
            "DELETE FROM {} WHERE id = {}",
            F::TABLE,
            self.backend().placeholder(1)
        );
        let result = sqlx::query(&query)
            .bind(id)
            .execute(self.db_client.pool())
            .await
            .map_err(|e| {
                error!("Failed to delete {} {}: {}", F::KIND, id, e);
                DbError::from_query(e)
            })?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_all(&self) -> Result<u64, DbError> {
        debug!("Deleting all {}", F::TABLE);

        let removed = self
            .db_client
            .execute(&format!("DELETE FROM {}", F::TABLE))
            .await?;

        info!("Deleted {} {}", removed, F::TABLE);
        Ok(removed)
    }
}
