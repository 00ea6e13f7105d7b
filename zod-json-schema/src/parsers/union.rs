use serde_json::Value;

use crate::def::{NodeId, SchemaNode, ZodDef};
use crate::error::Result;
use crate::refs::Refs;
use crate::schema::{InstanceType, JsonSchema, SchemaType};

use super::parse_child;

/// Compile a union or discriminated union.
///
/// Unions of plain primitives, of primitive literals, or of string enums
/// collapse into `type`/`enum`; anything else becomes `anyOf`.
pub(crate) fn parse_union_def(options: &[NodeId], refs: &mut Refs<'_>) -> Result<Option<JsonSchema>> {
    let nodes = options
        .iter()
        .map(|&id| refs.node(id))
        .collect::<Result<Vec<_>>>()?;

    if let Some(schema) = flatten_primitives(&nodes)
        .or_else(|| flatten_literals(&nodes))
        .or_else(|| flatten_enums(&nodes))
    {
        return Ok(Some(schema));
    }

    as_any_of(options, refs)
}

fn flatten_primitives(nodes: &[&SchemaNode]) -> Option<JsonSchema> {
    let mut types = Vec::new();
    for node in nodes {
        let ty = node.def.bare_primitive().and_then(InstanceType::from_name)?;
        if !types.contains(&ty) {
            types.push(ty);
        }
    }
    Some(JsonSchema {
        instance_type: (!types.is_empty()).then(|| SchemaType::from_list(types)),
        ..JsonSchema::default()
    })
}

fn flatten_literals(nodes: &[&SchemaNode]) -> Option<JsonSchema> {
    let mut types = Vec::new();
    let mut values: Vec<Value> = Vec::new();
    for node in nodes {
        let ZodDef::Literal(literal) = &node.def else {
            return None;
        };
        if node.description.is_some() {
            return None;
        }
        let value = literal.to_const()?;
        let ty = InstanceType::from_name(literal.json_type())?;
        if !types.contains(&ty) {
            types.push(ty);
        }
        if !values.contains(&value) {
            values.push(value);
        }
    }
    if types.is_empty() {
        return None;
    }
    Some(JsonSchema {
        instance_type: Some(SchemaType::from_list(types)),
        enum_values: Some(values),
        ..JsonSchema::default()
    })
}

fn flatten_enums(nodes: &[&SchemaNode]) -> Option<JsonSchema> {
    let mut values: Vec<Value> = Vec::new();
    for node in nodes {
        let ZodDef::Enum(members) = &node.def else {
            return None;
        };
        for member in members {
            let value = Value::String(member.clone());
            if !values.contains(&value) {
                values.push(value);
            }
        }
    }
    Some(JsonSchema {
        enum_values: Some(values),
        ..JsonSchema::typed(InstanceType::String)
    })
}

fn as_any_of(options: &[NodeId], refs: &mut Refs<'_>) -> Result<Option<JsonSchema>> {
    let strict = refs.options().strict_unions;
    let mut any_of = Vec::with_capacity(options.len());
    for (index, &id) in options.iter().enumerate() {
        let index = index.to_string();
        let Some(schema) = parse_child(id, &["anyOf", index.as_str()], refs)? else {
            continue;
        };
        if strict && schema.is_any() {
            continue;
        }
        any_of.push(schema);
    }

    Ok((!any_of.is_empty()).then(|| JsonSchema {
        any_of: Some(any_of),
        ..JsonSchema::default()
    }))
}
