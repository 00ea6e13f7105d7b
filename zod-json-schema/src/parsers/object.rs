use indexmap::IndexMap;

use crate::def::{ObjectDef, UnknownKeys, ZodDef};
use crate::error::Result;
use crate::options::RemoveAdditionalStrategy;
use crate::parse_def;
use crate::refs::Refs;
use crate::schema::{AdditionalProperties, InstanceType, JsonSchema};

use super::parse_child;

pub(crate) fn parse_object_def(def: &ObjectDef, refs: &mut Refs<'_>) -> Result<JsonSchema> {
    let arena = refs.arena();
    let mut properties = IndexMap::with_capacity(def.shape.len());
    let mut required = Vec::new();

    for (name, &id) in &def.shape {
        let optional = arena.is_optional(id);
        let parsed = refs.descend_property(&["properties", name.as_str()], |refs| {
            parse_def(id, refs, false)
        })?;
        let Some(schema) = parsed else {
            continue;
        };
        properties.insert(name.clone(), schema);
        if !optional {
            required.push(name.clone());
        }
    }

    Ok(JsonSchema {
        properties: Some(properties),
        required,
        additional_properties: additional_properties(def, refs)?,
        ..JsonSchema::typed(InstanceType::Object)
    })
}

fn additional_properties(
    def: &ObjectDef,
    refs: &mut Refs<'_>,
) -> Result<Option<AdditionalProperties>> {
    if let Some(catchall) = def.catchall {
        if !matches!(refs.node(catchall)?.def, ZodDef::Never) {
            let parsed = parse_child(catchall, &["additionalProperties"], refs)?;
            return Ok(parsed.map(|schema| AdditionalProperties::Schema(Box::new(schema))));
        }
    }

    let options = refs.options();
    let allowed = options.allowed_additional_properties;
    let rejected = options.rejected_additional_properties;
    let policy = match def.unknown_keys {
        UnknownKeys::Passthrough => allowed,
        UnknownKeys::Strict => rejected,
        UnknownKeys::Strip => match options.remove_additional_strategy {
            RemoveAdditionalStrategy::Strict => allowed,
            RemoveAdditionalStrategy::Passthrough => rejected,
        },
    };
    Ok(policy.map(AdditionalProperties::Bool))
}
