//! HTTP handlers for record routes
//!
//! Every handler is generic over the record kind and its store; the routes
//! module instantiates them once per mounted table. Bodies are validated here,
//! before the service or the store is touched.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use roster_common::{parse_fields, parse_new_record, parse_patch, Record, RecordFields, RosterError};
use roster_db::{RecordStore, Written};
use std::sync::Arc;

use crate::extract::{RecordBody, RecordId};
use crate::service::RecordService;

/// Shared state of one record kind's routes
pub type RecordState<F, S> = Arc<RecordService<F, S>>;

/// `GET /{records}/all`
///
/// - 200 OK: every record, ordered by id
/// - 404 Not Found: no records exist
pub async fn list_all_handler<F, S>(
    State(service): State<RecordState<F, S>>,
) -> Result<Json<Vec<Record<F>>>, RosterError>
where
    F: RecordFields,
    S: RecordStore<F>,
{
    service.list_all().await.map(Json)
}

/// `POST /{records}/new`
///
/// - 201 Created: the stored record
/// - 400 Bad Request: missing, unknown or mistyped fields
/// - 409 Conflict: a unique field or the requested id is taken
pub async fn create_handler<F, S>(
    State(service): State<RecordState<F, S>>,
    RecordBody(body): RecordBody,
) -> Result<(StatusCode, Json<Record<F>>), RosterError>
where
    F: RecordFields,
    S: RecordStore<F>,
{
    let new = parse_new_record::<F>(&body)?;
    let record = service.create(new).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// `GET /{records}/{key}`
pub async fn get_by_key_handler<F, S>(
    State(service): State<RecordState<F, S>>,
    Path(key): Path<String>,
) -> Result<Json<Record<F>>, RosterError>
where
    F: RecordFields,
    S: RecordStore<F>,
{
    service.get_by_key(&key).await.map(Json)
}

/// `GET /{records}/by-id/{id}`
pub async fn get_by_id_handler<F, S>(
    State(service): State<RecordState<F, S>>,
    RecordId(id): RecordId,
) -> Result<Json<Record<F>>, RosterError>
where
    F: RecordFields,
    S: RecordStore<F>,
{
    service.get_by_id(id).await.map(Json)
}

/// `PUT /{records}/{id}/replace`
///
/// - 200 OK: an existing record was overwritten
/// - 201 Created: no record had the id, one was created under it
/// - 400 Bad Request: invalid body or id
pub async fn upsert_handler<F, S>(
    State(service): State<RecordState<F, S>>,
    RecordId(id): RecordId,
    RecordBody(body): RecordBody,
) -> Result<Response, RosterError>
where
    F: RecordFields,
    S: RecordStore<F>,
{
    let fields = parse_fields::<F>(&body)?;
    let response = match service.upsert(id, fields).await? {
        Written::Created(record) => (StatusCode::CREATED, Json(record)).into_response(),
        Written::Replaced(record) => (StatusCode::OK, Json(record)).into_response(),
    };
    Ok(response)
}

/// `PATCH /{records}/{id}/update`
///
/// - 200 OK: the updated record
/// - 400 Bad Request: unknown or mistyped fields
/// - 404 Not Found: no record with the id
pub async fn patch_handler<F, S>(
    State(service): State<RecordState<F, S>>,
    RecordId(id): RecordId,
    RecordBody(body): RecordBody,
) -> Result<Json<Record<F>>, RosterError>
where
    F: RecordFields,
    S: RecordStore<F>,
{
    let patch = parse_patch::<F>(&body)?;
    service.patch(id, patch).await.map(Json)
}

/// `DELETE /{records}/{id}/delete`
pub async fn delete_handler<F, S>(
    State(service): State<RecordState<F, S>>,
    RecordId(id): RecordId,
) -> Result<StatusCode, RosterError>
where
    F: RecordFields,
    S: RecordStore<F>,
{
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /{records}/all/delete`
pub async fn delete_all_handler<F, S>(
    State(service): State<RecordState<F, S>>,
) -> Result<StatusCode, RosterError>
where
    F: RecordFields,
    S: RecordStore<F>,
{
    service.delete_all().await?;
    Ok(StatusCode::NO_CONTENT)
}
