use crate::def::{ArrayDef, SetDef, TupleDef, ZodDef};
use crate::error::Result;
use crate::refs::Refs;
use crate::schema::{InstanceType, JsonSchema, SchemaItems};

use super::parse_child;

pub(crate) fn parse_array_def(def: &ArrayDef, refs: &mut Refs<'_>) -> Result<JsonSchema> {
    let mut schema = JsonSchema::typed(InstanceType::Array);

    if !matches!(refs.node(def.element)?.def, ZodDef::Any) {
        schema.items = parse_child(def.element, &["items"], refs)?
            .map(|items| SchemaItems::Single(Box::new(items)));
    }

    if let Some(min) = def.min_length {
        schema.min_items = Some(min);
    }
    if let Some(max) = def.max_length {
        schema.max_items = Some(max);
    }
    if let Some(exact) = def.exact_length {
        schema.min_items = Some(exact);
        schema.max_items = Some(exact);
    }

    Ok(schema)
}

pub(crate) fn parse_tuple_def(def: &TupleDef, refs: &mut Refs<'_>) -> Result<JsonSchema> {
    let mut items = Vec::with_capacity(def.items.len());
    for (index, &id) in def.items.iter().enumerate() {
        let index = index.to_string();
        if let Some(schema) = parse_child(id, &["items", index.as_str()], refs)? {
            items.push(schema);
        }
    }

    let length = def.items.len() as u64;
    let mut schema = JsonSchema {
        min_items: Some(length),
        items: Some(SchemaItems::Tuple(items)),
        ..JsonSchema::typed(InstanceType::Array)
    };

    match def.rest {
        Some(rest) => {
            schema.additional_items =
                parse_child(rest, &["additionalItems"], refs)?.map(Box::new);
        }
        None => schema.max_items = Some(length),
    }

    Ok(schema)
}

pub(crate) fn parse_set_def(def: &SetDef, refs: &mut Refs<'_>) -> Result<JsonSchema> {
    let items = parse_child(def.value, &["items"], refs)?;
    Ok(JsonSchema {
        unique_items: Some(true),
        items: items.map(|items| SchemaItems::Single(Box::new(items))),
        min_items: def.min_size,
        max_items: def.max_size,
        ..JsonSchema::typed(InstanceType::Array)
    })
}
