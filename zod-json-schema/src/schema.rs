//! Output model: JSON Schema draft-07 fragments.
//!
//! [`JsonSchema`] is a struct of optional keywords. Every keyword the
//! compiler can emit has a typed field; anything else (for example keys added
//! by a post-process hook or the definitions section of a document) lives in
//! the flattened [`extensions`](JsonSchema::extensions) map.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value};

use crate::error::Result;

/// Dialect identifier stamped on every compiled document.
pub const DRAFT_07: &str = "http://json-schema.org/draft-07/schema#";

/// JSON Schema primitive instance type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstanceType {
    Null,
    Boolean,
    Object,
    Array,
    Number,
    String,
    Integer,
}

impl InstanceType {
    /// Parse a type name such as `"string"`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "null" => Some(Self::Null),
            "boolean" => Some(Self::Boolean),
            "object" => Some(Self::Object),
            "array" => Some(Self::Array),
            "number" => Some(Self::Number),
            "string" => Some(Self::String),
            "integer" => Some(Self::Integer),
            _ => None,
        }
    }
}

/// Value of the `type` keyword.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaType {
    Single(InstanceType),
    Multiple(Vec<InstanceType>),
}

impl SchemaType {
    /// Collapse a list into a single type when it has exactly one entry.
    pub fn from_list(mut types: Vec<InstanceType>) -> Self {
        if types.len() == 1 {
            Self::Single(types.remove(0))
        } else {
            Self::Multiple(types)
        }
    }

    /// Whether this is exactly the single type `ty`.
    pub fn is(&self, ty: InstanceType) -> bool {
        matches!(self, Self::Single(single) if *single == ty)
    }
}

impl From<InstanceType> for SchemaType {
    fn from(ty: InstanceType) -> Self {
        Self::Single(ty)
    }
}

/// Value of the `items` keyword.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaItems {
    /// Positional item schemas (tuples)
    Tuple(Vec<JsonSchema>),
    /// One schema for every element
    Single(Box<JsonSchema>),
}

/// Value of the `additionalProperties` keyword.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    Bool(bool),
    Schema(Box<JsonSchema>),
}

/// A JSON Schema fragment.
///
/// `JsonSchema::default()` is the unconstrained fragment and serializes
/// to `{}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonSchema {
    #[serde(rename = "$schema", default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    #[serde(rename = "$ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub instance_type: Option<SchemaType>,

    // ==========================================================================
    // Strings
    // ==========================================================================
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_encoding: Option<String>,

    // ==========================================================================
    // Numbers
    // ==========================================================================
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<Number>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclusive_minimum: Option<Number>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<Number>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclusive_maximum: Option<Number>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiple_of: Option<Number>,

    // ==========================================================================
    // Arrays
    // ==========================================================================
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<SchemaItems>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_items: Option<Box<JsonSchema>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_items: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_items: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique_items: Option<bool>,

    // ==========================================================================
    // Objects
    // ==========================================================================
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<IndexMap<String, JsonSchema>>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<AdditionalProperties>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_names: Option<Box<JsonSchema>>,

    // ==========================================================================
    // Values and composition
    // ==========================================================================
    #[serde(
        rename = "const",
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub const_value: Option<Value>,

    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub any_of: Option<Vec<JsonSchema>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub all_of: Option<Vec<JsonSchema>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not: Option<Box<JsonSchema>>,

    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Keywords without a typed field
    #[serde(flatten)]
    pub extensions: IndexMap<String, Value>,
}

/// Keep an explicit `null` as `Some(Value::Null)`.
fn present<'de, D>(deserializer: D) -> std::result::Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl JsonSchema {
    /// The unconstrained fragment, `{}`.
    pub fn any() -> Self {
        Self::default()
    }

    /// The fragment no value matches, `{"not": {}}`.
    pub fn never() -> Self {
        Self {
            not: Some(Box::default()),
            ..Self::default()
        }
    }

    /// A fragment with only a `type`.
    pub fn typed(ty: impl Into<SchemaType>) -> Self {
        Self {
            instance_type: Some(ty.into()),
            ..Self::default()
        }
    }

    /// A `$ref` pointer fragment.
    pub fn reference(pointer: impl Into<String>) -> Self {
        Self {
            reference: Some(pointer.into()),
            ..Self::default()
        }
    }

    /// Check if no keyword is set.
    pub fn is_any(&self) -> bool {
        *self == Self::default()
    }

    /// Check if the fragment's `type` is exactly `ty`.
    pub fn has_type(&self, ty: InstanceType) -> bool {
        self.instance_type.as_ref().is_some_and(|t| t.is(ty))
    }

    /// Serialize into a plain JSON value.
    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Deserialize from a plain JSON value.
    pub fn from_value(value: Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }
}

/// Convert a bound to a JSON number, printing integral values without a
/// fractional part. Non-finite values have no JSON form.
pub(crate) fn json_number(value: f64) -> Option<Number> {
    const MAX_SAFE: f64 = 9_007_199_254_740_991.0;
    if value.is_finite() && value.fract() == 0.0 && value.abs() <= MAX_SAFE {
        Some(Number::from(value as i64))
    } else {
        Number::from_f64(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_any_serializes_empty() {
        assert_eq!(serde_json::to_value(JsonSchema::any()).unwrap(), json!({}));
        assert!(JsonSchema::any().is_any());
        assert!(!JsonSchema::never().is_any());
    }

    #[test]
    fn test_never_serializes_not_any() {
        assert_eq!(
            serde_json::to_value(JsonSchema::never()).unwrap(),
            json!({ "not": {} })
        );
    }

    #[test]
    fn test_const_null_is_kept() {
        let schema = JsonSchema {
            const_value: Some(Value::Null),
            ..JsonSchema::typed(InstanceType::Null)
        };
        let value = schema.to_value().unwrap();
        assert_eq!(value, json!({ "type": "null", "const": null }));

        let back = JsonSchema::from_value(value).unwrap();
        assert_eq!(back.const_value, Some(Value::Null));
    }

    #[test]
    fn test_type_list() {
        let schema = JsonSchema::typed(SchemaType::from_list(vec![
            InstanceType::String,
            InstanceType::Null,
        ]));
        assert_eq!(
            schema.to_value().unwrap(),
            json!({ "type": ["string", "null"] })
        );
        assert_eq!(
            SchemaType::from_list(vec![InstanceType::Number]),
            SchemaType::Single(InstanceType::Number)
        );
    }

    #[test]
    fn test_unknown_keywords_land_in_extensions() {
        let schema = JsonSchema::from_value(json!({
            "type": "string",
            "x-order": 3,
            "items": [{ "type": "string" }, {}],
            "additionalProperties": false
        }))
        .unwrap();

        assert!(schema.has_type(InstanceType::String));
        assert_eq!(schema.extensions.get("x-order"), Some(&json!(3)));
        assert!(matches!(schema.items, Some(SchemaItems::Tuple(ref items)) if items.len() == 2));
        assert_eq!(
            schema.additional_properties,
            Some(AdditionalProperties::Bool(false))
        );
    }

    #[test]
    fn test_json_number() {
        assert_eq!(json_number(5.0), Some(Number::from(5)));
        assert_eq!(json_number(-2.0), Some(Number::from(-2)));
        assert_eq!(json_number(0.5), Number::from_f64(0.5));
        assert_eq!(json_number(f64::INFINITY), None);
    }
}
