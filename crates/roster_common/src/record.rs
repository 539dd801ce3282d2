//! Generic record model and request-body validation.
//!
//! A record kind (member, video, ...) describes its columns once through
//! [`RecordFields::FIELDS`]. Validation, the SQL store and the in-memory store
//! all work from that description, so adding a kind means adding one struct,
//! its patch struct and a `RecordFields` impl.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::error::{internal_error, validation_error, RosterError};

/// Raw request body: a JSON object, or a form decoded into string values.
pub type FieldMap = serde_json::Map<String, Value>;

/// Name of the identifier column and of the optional identifier in create bodies.
pub const ID_FIELD: &str = "id";

/// Scalar type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Integer,
}

/// Static description of one named field of a record kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    /// Message reported when a full field set omits this field.
    pub required_message: &'static str,
    /// Checked for collisions before a record is created.
    pub unique: bool,
}

/// A single scalar value of a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
}

impl FieldValue {
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::Text(_) => FieldKind::Text,
            FieldValue::Integer(_) => FieldKind::Integer,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => write!(f, "{}", s),
            FieldValue::Integer(i) => write!(f, "{}", i),
        }
    }
}

/// Field values of one record kind, positioned as in its `FIELDS`.
///
/// Full field sets have every slot filled; patches leave absent fields `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldValues {
    specs: &'static [FieldSpec],
    values: Vec<Option<FieldValue>>,
}

impl FieldValues {
    pub fn new(specs: &'static [FieldSpec], values: Vec<Option<FieldValue>>) -> Self {
        Self { specs, values }
    }

    /// Builds a complete set from values already in column order.
    pub fn complete(specs: &'static [FieldSpec], values: Vec<FieldValue>) -> Self {
        Self::new(specs, values.into_iter().map(Some).collect())
    }

    fn slot(&self, name: &str) -> Result<Option<&FieldValue>, RosterError> {
        let index = self
            .specs
            .iter()
            .position(|spec| spec.name == name)
            .ok_or_else(|| internal_error(format!("no field named '{}'", name)))?;
        Ok(self.values.get(index).and_then(Option::as_ref))
    }

    pub fn optional_text(&self, name: &str) -> Result<Option<String>, RosterError> {
        match self.slot(name)? {
            None => Ok(None),
            Some(FieldValue::Text(s)) => Ok(Some(s.clone())),
            Some(other) => Err(internal_error(format!(
                "field '{}' holds {:?}, expected text",
                name,
                other.kind()
            ))),
        }
    }

    pub fn optional_integer(&self, name: &str) -> Result<Option<i64>, RosterError> {
        match self.slot(name)? {
            None => Ok(None),
            Some(FieldValue::Integer(i)) => Ok(Some(*i)),
            Some(other) => Err(internal_error(format!(
                "field '{}' holds {:?}, expected integer",
                name,
                other.kind()
            ))),
        }
    }

    pub fn text(&self, name: &str) -> Result<String, RosterError> {
        self.optional_text(name)?
            .ok_or_else(|| internal_error(format!("field '{}' is unset", name)))
    }

    pub fn integer(&self, name: &str) -> Result<i64, RosterError> {
        self.optional_integer(name)?
            .ok_or_else(|| internal_error(format!("field '{}' is unset", name)))
    }
}

/// The named fields of a record kind, everything except the identifier.
pub trait RecordFields:
    Clone + fmt::Debug + PartialEq + Serialize + Send + Sync + Sized + 'static
{
    /// Per-field optional update applied by PATCH.
    type Patch: Clone + fmt::Debug + Default + Send + Sync + 'static;

    /// Singular name used in messages, e.g. `"member"`.
    const KIND: &'static str;
    /// Table name, also the route prefix, e.g. `"members"`.
    const TABLE: &'static str;
    /// Column description in storage order.
    const FIELDS: &'static [FieldSpec];
    /// Field matched by keyed lookup.
    const KEY_FIELD: &'static str;

    fn from_values(values: &FieldValues) -> Result<Self, RosterError>;

    fn to_values(&self) -> Vec<FieldValue>;

    fn patch_from_values(values: &FieldValues) -> Result<Self::Patch, RosterError>;

    fn apply_patch(&mut self, patch: Self::Patch);

    /// Value of the keyed lookup field.
    fn key(&self) -> &str;

    /// Values of the fields that must not collide on creation.
    fn unique_values(&self) -> Vec<(&'static str, FieldValue)> {
        Self::FIELDS
            .iter()
            .zip(self.to_values())
            .filter(|(spec, _)| spec.unique)
            .map(|(spec, value)| (spec.name, value))
            .collect()
    }
}

/// A stored record: identifier plus fields, serialized flat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record<F> {
    pub id: i64,
    #[serde(flatten)]
    pub fields: F,
}

impl<F> Record<F> {
    pub fn new(id: i64, fields: F) -> Self {
        Self { id, fields }
    }
}

/// A validated create request: the fields and an optional caller-chosen id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRecord<F> {
    pub id: Option<i64>,
    pub fields: F,
}

/// Validates a full field set for PUT. The identifier comes from the path, so
/// an `id` key is rejected like any other unknown key.
pub fn parse_fields<F: RecordFields>(map: &FieldMap) -> Result<F, RosterError> {
    reject_unknown::<F>(map, false)?;
    let values = collect_values::<F>(map, true)?;
    F::from_values(&values)
}

/// Validates a create body: a full field set and an optional `id`.
pub fn parse_new_record<F: RecordFields>(map: &FieldMap) -> Result<NewRecord<F>, RosterError> {
    reject_unknown::<F>(map, true)?;
    let id = map
        .get(ID_FIELD)
        .map(|value| coerce_integer(ID_FIELD, value))
        .transpose()?;
    let values = collect_values::<F>(map, true)?;
    Ok(NewRecord {
        id,
        fields: F::from_values(&values)?,
    })
}

/// Validates a PATCH body. Absent keys stay `None` in the patch.
pub fn parse_patch<F: RecordFields>(map: &FieldMap) -> Result<F::Patch, RosterError> {
    reject_unknown::<F>(map, false)?;
    let values = collect_values::<F>(map, false)?;
    F::patch_from_values(&values)
}

fn reject_unknown<F: RecordFields>(map: &FieldMap, allow_id: bool) -> Result<(), RosterError> {
    let unknown = map.keys().find(|key| {
        let is_id = allow_id && key.as_str() == ID_FIELD;
        !is_id && !F::FIELDS.iter().any(|spec| spec.name == key.as_str())
    });
    match unknown {
        Some(key) => Err(validation_error(format!(
            "Unknown field '{}' for {}",
            key,
            F::KIND
        ))),
        None => Ok(()),
    }
}

fn collect_values<F: RecordFields>(
    map: &FieldMap,
    require_all: bool,
) -> Result<FieldValues, RosterError> {
    let mut values = Vec::with_capacity(F::FIELDS.len());
    for spec in F::FIELDS {
        match map.get(spec.name) {
            Some(raw) => values.push(Some(coerce(spec, raw)?)),
            None if require_all => return Err(validation_error(spec.required_message)),
            None => values.push(None),
        }
    }
    Ok(FieldValues::new(F::FIELDS, values))
}

fn coerce(spec: &FieldSpec, raw: &Value) -> Result<FieldValue, RosterError> {
    match spec.kind {
        FieldKind::Text => match raw {
            Value::String(s) => Ok(FieldValue::Text(s.clone())),
            _ => Err(validation_error(format!(
                "Field '{}' must be a string",
                spec.name
            ))),
        },
        FieldKind::Integer => coerce_integer(spec.name, raw).map(FieldValue::Integer),
    }
}

// Form bodies only carry strings, so integers are accepted in decimal text too.
fn coerce_integer(name: &str, raw: &Value) -> Result<i64, RosterError> {
    let parsed = match raw {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| validation_error(format!("Field '{}' must be an integer", name)))
}
