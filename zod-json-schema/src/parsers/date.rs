use crate::def::{DateCheck, DateDef};
use crate::options::{DateStrategy, DateStrategySetting};
use crate::refs::Refs;
use crate::schema::{InstanceType, JsonSchema};

pub(crate) fn parse_date_def(def: &DateDef, refs: &Refs<'_>) -> JsonSchema {
    match &refs.options().date_strategy {
        DateStrategySetting::Single(strategy) => date_schema(def, *strategy),
        DateStrategySetting::List(strategies) => JsonSchema {
            any_of: Some(
                strategies
                    .iter()
                    .map(|strategy| date_schema(def, *strategy))
                    .collect(),
            ),
            ..JsonSchema::default()
        },
    }
}

fn date_schema(def: &DateDef, strategy: DateStrategy) -> JsonSchema {
    match strategy {
        DateStrategy::FormatDateTime | DateStrategy::String => JsonSchema {
            format: Some("date-time".to_string()),
            ..JsonSchema::typed(InstanceType::String)
        },
        DateStrategy::FormatDate => JsonSchema {
            format: Some("date".to_string()),
            ..JsonSchema::typed(InstanceType::String)
        },
        DateStrategy::Integer => unix_time_schema(def),
    }
}

fn unix_time_schema(def: &DateDef) -> JsonSchema {
    let mut schema = JsonSchema {
        format: Some("unix-time".to_string()),
        ..JsonSchema::typed(InstanceType::Integer)
    };
    for check in &def.checks {
        match check {
            DateCheck::Min(at) => schema.minimum = Some(at.timestamp_millis().into()),
            DateCheck::Max(at) => schema.maximum = Some(at.timestamp_millis().into()),
        }
    }
    schema
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::def::SchemaArena;
    use crate::options::Options;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_default_strategy() {
        let arena = SchemaArena::new();
        let options = Options::default();
        let refs = Refs::new(&arena, &options);
        assert_eq!(
            parse_date_def(&DateDef::default(), &refs).to_value().unwrap(),
            json!({ "type": "string", "format": "date-time" })
        );
    }

    #[test]
    fn test_integer_strategy_with_bounds() {
        let arena = SchemaArena::new();
        let options = Options::default().with_date_strategy(DateStrategy::Integer);
        let refs = Refs::new(&arena, &options);
        let def = DateDef {
            checks: vec![
                DateCheck::Min(Utc.timestamp_millis_opt(1_000).unwrap()),
                DateCheck::Max(Utc.timestamp_millis_opt(2_000).unwrap()),
            ],
        };
        assert_eq!(
            parse_date_def(&def, &refs).to_value().unwrap(),
            json!({
                "type": "integer",
                "format": "unix-time",
                "minimum": 1000,
                "maximum": 2000
            })
        );
    }

    #[test]
    fn test_strategy_list() {
        let arena = SchemaArena::new();
        let options = Options::default()
            .with_date_strategy(vec![DateStrategy::FormatDate, DateStrategy::Integer]);
        let refs = Refs::new(&arena, &options);
        assert_eq!(
            parse_date_def(&DateDef::default(), &refs).to_value().unwrap(),
            json!({
                "anyOf": [
                    { "type": "string", "format": "date" },
                    { "type": "integer", "format": "unix-time" }
                ]
            })
        );
    }
}
