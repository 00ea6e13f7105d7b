use indexmap::IndexMap;
use serde_json::Value;

use crate::def::{LiteralValue, NativeEnumValue};
use crate::schema::{InstanceType, JsonSchema, SchemaType};

pub(crate) fn parse_literal_def(value: &LiteralValue) -> JsonSchema {
    let ty = match value {
        LiteralValue::String(_) => InstanceType::String,
        LiteralValue::Number(_) => InstanceType::Number,
        LiteralValue::BigInt(_) => InstanceType::Integer,
        LiteralValue::Boolean(_) => InstanceType::Boolean,
        LiteralValue::Null => InstanceType::Null,
        LiteralValue::Array(_) => InstanceType::Array,
        LiteralValue::Object(_) => InstanceType::Object,
    };
    JsonSchema {
        const_value: value.to_const(),
        ..JsonSchema::typed(ty)
    }
}

pub(crate) fn parse_enum_def(values: &[String]) -> JsonSchema {
    JsonSchema {
        enum_values: Some(values.iter().cloned().map(Value::String).collect()),
        ..JsonSchema::typed(InstanceType::String)
    }
}

/// Compile a native enum.
///
/// Numeric enums carry reverse entries (`"0" => "Red"` next to
/// `"Red" => 0`); those are skipped so only the real members are listed.
pub(crate) fn parse_native_enum_def(members: &IndexMap<String, NativeEnumValue>) -> JsonSchema {
    let values: Vec<&NativeEnumValue> = members
        .values()
        .filter(|value| match value {
            NativeEnumValue::String(target) => {
                !matches!(members.get(target), Some(NativeEnumValue::Number(_)))
            }
            NativeEnumValue::Number(_) => true,
        })
        .collect();

    let has_string = values
        .iter()
        .any(|value| matches!(value, NativeEnumValue::String(_)));
    let has_number = values
        .iter()
        .any(|value| matches!(value, NativeEnumValue::Number(_)));

    let ty = match (has_string, has_number) {
        (true, false) => SchemaType::Single(InstanceType::String),
        (false, true) => SchemaType::Single(InstanceType::Number),
        _ => SchemaType::Multiple(vec![InstanceType::String, InstanceType::Number]),
    };

    JsonSchema {
        enum_values: Some(values.into_iter().map(Value::from).collect()),
        ..JsonSchema::typed(ty)
    }
}
