use crate::def::{NumberCheck, NumberDef};
use crate::schema::{json_number, InstanceType, JsonSchema};

pub(crate) fn parse_number_def(def: &NumberDef) -> JsonSchema {
    let mut schema = JsonSchema::typed(InstanceType::Number);
    apply_bounds(&mut schema, &def.checks);
    schema
}

pub(crate) fn parse_bigint_def(def: &NumberDef) -> JsonSchema {
    let mut schema = JsonSchema {
        format: Some("int64".to_string()),
        ..JsonSchema::typed(InstanceType::Integer)
    };
    apply_bounds(&mut schema, &def.checks);
    schema
}

fn apply_bounds(schema: &mut JsonSchema, checks: &[NumberCheck]) {
    for check in checks {
        match check {
            NumberCheck::Int => schema.instance_type = Some(InstanceType::Integer.into()),
            NumberCheck::Min { value, inclusive } => {
                if *inclusive {
                    schema.minimum = json_number(*value);
                } else {
                    schema.exclusive_minimum = json_number(*value);
                }
            }
            NumberCheck::Max { value, inclusive } => {
                if *inclusive {
                    schema.maximum = json_number(*value);
                } else {
                    schema.exclusive_maximum = json_number(*value);
                }
            }
            NumberCheck::MultipleOf { value } => schema.multiple_of = json_number(*value),
            NumberCheck::Finite => {}
        }
    }
}
