use crate::def::IntersectionDef;
use crate::error::Result;
use crate::refs::Refs;
use crate::schema::{AdditionalProperties, InstanceType, JsonSchema};

use super::parse_child;

pub(crate) fn parse_intersection_def(
    def: &IntersectionDef,
    refs: &mut Refs<'_>,
) -> Result<Option<JsonSchema>> {
    let left = parse_child(def.left, &["allOf", "0"], refs)?;
    let right = parse_child(def.right, &["allOf", "1"], refs)?;

    let mut merged = Vec::new();
    for mut schema in left.into_iter().chain(right) {
        // String fragments use allOf for bundled patterns; keep them whole.
        if !schema.has_type(InstanceType::String) {
            if let Some(all_of) = schema.all_of.take() {
                merged.extend(all_of);
                continue;
            }
        }
        if schema.additional_properties == Some(AdditionalProperties::Bool(false)) {
            schema.additional_properties = None;
        }
        merged.push(schema);
    }

    Ok((!merged.is_empty()).then(|| JsonSchema {
        all_of: Some(merged),
        ..JsonSchema::default()
    }))
}
