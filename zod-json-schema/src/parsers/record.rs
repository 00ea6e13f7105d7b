use crate::def::{KeyValueDef, StringDef, ZodDef};
use crate::error::Result;
use crate::options::MapStrategy;
use crate::refs::Refs;
use crate::schema::{AdditionalProperties, InstanceType, JsonSchema, SchemaItems};

use super::parse_child;
use super::string::parse_string_def;

/// Upper bound on map entries emitted for the entries encoding.
const MAP_MAX_ITEMS: u64 = 125;

pub(crate) fn parse_record_def(def: &KeyValueDef, refs: &mut Refs<'_>) -> Result<JsonSchema> {
    let additional_properties = match parse_child(def.value, &["additionalProperties"], refs)? {
        Some(schema) => Some(AdditionalProperties::Schema(Box::new(schema))),
        None => refs
            .options()
            .allowed_additional_properties
            .map(AdditionalProperties::Bool),
    };

    Ok(JsonSchema {
        additional_properties,
        property_names: property_names(def, refs)?.map(Box::new),
        ..JsonSchema::typed(InstanceType::Object)
    })
}

/// Constraint on record keys, when the key type carries one.
fn property_names(def: &KeyValueDef, refs: &Refs<'_>) -> Result<Option<JsonSchema>> {
    let key = refs.node(def.key)?;
    let names = match &key.def {
        ZodDef::String(string) if !string.checks.is_empty() => Some(key_pattern(string, refs)),
        ZodDef::Enum(values) => Some(JsonSchema {
            enum_values: Some(values.iter().cloned().map(Into::into).collect()),
            ..JsonSchema::default()
        }),
        ZodDef::Branded(inner) => match &refs.node(*inner)?.def {
            ZodDef::String(string) if !string.checks.is_empty() => {
                Some(key_pattern(string, refs))
            }
            _ => None,
        },
        _ => None,
    };
    Ok(names)
}

fn key_pattern(def: &StringDef, refs: &Refs<'_>) -> JsonSchema {
    JsonSchema {
        instance_type: None,
        ..parse_string_def(def, refs)
    }
}

pub(crate) fn parse_map_def(def: &KeyValueDef, refs: &mut Refs<'_>) -> Result<JsonSchema> {
    if refs.options().map_strategy == MapStrategy::Record {
        return parse_record_def(def, refs);
    }

    let key = parse_child(def.key, &["items", "items", "0"], refs)?.unwrap_or_default();
    let value = parse_child(def.value, &["items", "items", "1"], refs)?.unwrap_or_default();

    let entry = JsonSchema {
        items: Some(SchemaItems::Tuple(vec![key, value])),
        min_items: Some(2),
        max_items: Some(2),
        ..JsonSchema::typed(InstanceType::Array)
    };
    Ok(JsonSchema {
        max_items: Some(MAP_MAX_ITEMS),
        items: Some(SchemaItems::Single(Box::new(entry))),
        ..JsonSchema::typed(InstanceType::Array)
    })
}
