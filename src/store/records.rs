//! Stored record shapes and their JSON codec.
//!
//! Records are the flat, reference-by-name form of the entity model:
//! handles become entity names, numeric values become scaled hundredths.
//! The DAO layer re-links names back into shared handles on decode.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};
use crate::model::{CeOperator, TimeTag};

/// Encode a record as JSON bytes.
pub fn encode<T: Serialize>(record: &T) -> StoreResult<Vec<u8>> {
    serde_json::to_vec(record).map_err(|e| StoreError::Serialization {
        message: e.to_string(),
    })
}

/// Decode JSON bytes into a record.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> StoreResult<T> {
    serde_json::from_slice(bytes).map_err(|e| StoreError::Serialization {
        message: e.to_string(),
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeRecord {
    pub name: String,
    pub father: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectRecord {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FluentRecord {
    pub name: String,
    pub types: Vec<String>,
    pub is_numeric: bool,
}

/// Exactly one of `bool_value` / `numeric_value` is set, matching the
/// fluent's kind. Numeric values are stored as hundredths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactRecord {
    pub fluent: String,
    pub objects: Vec<String>,
    pub bool_value: Option<bool>,
    pub numeric_value: Option<i64>,
    pub is_goal: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterRecord {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
}

/// A condition or effect, with parameters referenced by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionEffectRecord {
    pub fluent: String,
    pub parameters: Vec<String>,
    pub time: Option<TimeTag>,
    pub op: CeOperator,
    pub bool_value: Option<bool>,
    pub numeric_value: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub name: String,
    pub durative: bool,
    pub duration: i64,
    pub parameters: Vec<ParameterRecord>,
    pub conditions: Vec<ConditionEffectRecord>,
    pub effects: Vec<ConditionEffectRecord>,
}
