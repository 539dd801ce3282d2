use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};
use roster_common::RecordFields;
use roster_db::RecordStore;
use std::sync::Arc;
use tracing::info;

use crate::handlers::{
    create_handler, delete_all_handler, delete_handler, get_by_id_handler, get_by_key_handler,
    list_all_handler, patch_handler, upsert_handler,
};
use crate::service::RecordService;

/// Create the routes of one record kind, mounted under `/{F::TABLE}`.
///
/// Static segments take precedence over parameters, so a record keyed `all`
/// or `new` cannot be fetched through `GET /{records}/{key}`.
pub fn routes<F, S>(service: Arc<RecordService<F, S>>) -> Router
where
    F: RecordFields,
    S: RecordStore<F>,
{
    let prefix = format!("/{}", F::TABLE);

    info!("Record routes initialized under {}", prefix);

    Router::new()
        .route(&format!("{prefix}/all"), get(list_all_handler::<F, S>))
        .route(
            &format!("{prefix}/all/delete"),
            delete(delete_all_handler::<F, S>),
        )
        .route(&format!("{prefix}/new"), post(create_handler::<F, S>))
        .route(
            &format!("{prefix}/by-id/{{id}}"),
            get(get_by_id_handler::<F, S>),
        )
        // The router allows one parameter name per position, so the key
        // lookup shares `{id}` with the id-addressed routes below.
        .route(&format!("{prefix}/{{id}}"), get(get_by_key_handler::<F, S>))
        .route(
            &format!("{prefix}/{{id}}/replace"),
            put(upsert_handler::<F, S>),
        )
        .route(
            &format!("{prefix}/{{id}}/update"),
            patch(patch_handler::<F, S>),
        )
        .route(
            &format!("{prefix}/{{id}}/delete"),
            delete(delete_handler::<F, S>),
        )
        .with_state(service)
}
