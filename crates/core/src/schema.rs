//! Declarative schema for simulation submissions.
//!
//! The required-field contract lives in [`SIMULATION_SCHEMA`] rather than in
//! scattered presence checks. Validation runs two passes over the table:
//! every field is checked for presence first, then every field is checked
//! for type, so a body missing `summary` with a string `result` reports the
//! missing field.

use serde_json::{Map, Value};

use crate::error::ValidationError;

/// JSON type a schema field must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    String,
    Number,
    /// Presence only; any JSON value (including `null`) is accepted.
    Any,
}

impl FieldType {
    fn accepts(self, value: &Value) -> bool {
        match self {
            FieldType::String => value.is_string(),
            FieldType::Number => value.is_number(),
            FieldType::Any => true,
        }
    }

    fn describe(self) -> &'static str {
        match self {
            FieldType::String => "a string",
            FieldType::Number => "a number",
            FieldType::Any => "present",
        }
    }
}

/// One required field of a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub ty: FieldType,
}

const fn field(name: &'static str, ty: FieldType) -> FieldSpec {
    FieldSpec { name, ty }
}

/// Fields every `POST /api/simulations` body must carry, in check order.
pub const SIMULATION_SCHEMA: &[FieldSpec] = &[
    field("id", FieldType::String),
    field("user_id", FieldType::String),
    field("env_id", FieldType::String),
    field("data", FieldType::Any),
    field("result", FieldType::Number),
    field("summary", FieldType::Any),
];

/// A submission that passed [`validate_submission`].
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationSubmission {
    pub id: String,
    pub user_id: String,
    pub env_id: String,
    /// Payload exactly as received, key order included.
    pub data: Value,
    pub result: f64,
    /// Unchecked beyond presence; usually a string.
    pub summary: Value,
}

/// Check `body` against a schema table without extracting anything.
///
/// Arrays pass the structure check and fail the presence pass, as they
/// carry none of the named fields.
pub fn check_schema<'a>(
    body: &'a Value,
    schema: &[FieldSpec],
) -> Result<&'a Map<String, Value>, ValidationError> {
    let obj = match body {
        Value::Object(obj) => Some(obj),
        Value::Array(_) => None,
        _ => return Err(ValidationError::InvalidStructure),
    };

    for spec in schema {
        if !obj.is_some_and(|o| o.contains_key(spec.name)) {
            return Err(ValidationError::MissingField { field: spec.name });
        }
    }

    let obj = obj.ok_or(ValidationError::InvalidStructure)?;
    for spec in schema {
        if !spec.ty.accepts(&obj[spec.name]) {
            return Err(ValidationError::WrongType {
                field: spec.name,
                expected: spec.ty.describe(),
            });
        }
    }

    Ok(obj)
}

/// Validate a parsed request body and extract the typed submission.
///
/// Keys outside [`SIMULATION_SCHEMA`] are ignored.
pub fn validate_submission(body: &Value) -> Result<SimulationSubmission, ValidationError> {
    let obj = check_schema(body, SIMULATION_SCHEMA)?;

    let string = |name: &str| obj[name].as_str().unwrap_or_default().to_string();

    Ok(SimulationSubmission {
        id: string("id"),
        user_id: string("user_id"),
        env_id: string("env_id"),
        data: obj["data"].clone(),
        result: obj["result"].as_f64().unwrap_or_default(),
        summary: obj["summary"].clone(),
    })
}
