//! Request extractors for record routes.
//!
//! Both extractors reject with [`RosterError`], so malformed input gets the
//! same JSON error body as every other failure.

use axum::{
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::{header::CONTENT_TYPE, request::Parts},
    Form, Json,
};
use roster_common::{validation_error, FieldMap, RosterError};
use serde_json::Value;
use std::collections::HashMap;

/// A request body decoded into field names and raw values.
///
/// `application/x-www-form-urlencoded` bodies become string values; anything
/// else must be a JSON object.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordBody(pub FieldMap);

fn is_form(req: &Request) -> bool {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.starts_with("application/x-www-form-urlencoded"))
        .unwrap_or(false)
}

impl<S: Send + Sync> FromRequest<S> for RecordBody {
    type Rejection = RosterError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if is_form(&req) {
            let Form(form) = Form::<HashMap<String, String>>::from_request(req, state)
                .await
                .map_err(|rejection| validation_error(rejection.body_text()))?;
            let map = form
                .into_iter()
                .map(|(key, value)| (key, Value::String(value)))
                .collect();
            return Ok(RecordBody(map));
        }

        let Json(map) = Json::<FieldMap>::from_request(req, state)
            .await
            .map_err(|rejection| validation_error(rejection.body_text()))?;
        Ok(RecordBody(map))
    }
}

/// A record identifier taken from the single path parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordId(pub i64);

impl<S: Send + Sync> FromRequestParts<S> for RecordId {
    type Rejection = RosterError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| validation_error(rejection.body_text()))?;
        raw.parse::<i64>()
            .map(RecordId)
            .map_err(|_| validation_error(format!("Invalid record id '{}'", raw)))
    }
}
