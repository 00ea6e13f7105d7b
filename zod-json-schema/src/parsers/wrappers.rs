//! Wrappers around a single inner definition.

use crate::def::{DefaultDef, EffectsDef, NodeId, PipelineDef};
use crate::error::Result;
use crate::options::{EffectStrategy, PipeStrategy};
use crate::parse_def;
use crate::refs::Refs;
use crate::schema::{InstanceType, JsonSchema, SchemaType};

use super::parse_child;

pub(crate) fn parse_optional_def(
    inner: NodeId,
    refs: &mut Refs<'_>,
) -> Result<Option<JsonSchema>> {
    // At a property slot optionality is expressed by `required` instead.
    if refs.at_property() {
        return parse_def(inner, refs, false);
    }

    Ok(Some(match parse_child(inner, &["anyOf", "1"], refs)? {
        Some(schema) => JsonSchema {
            any_of: Some(vec![JsonSchema::never(), schema]),
            ..JsonSchema::default()
        },
        None => JsonSchema::any(),
    }))
}

pub(crate) fn parse_nullable_def(inner: NodeId, refs: &mut Refs<'_>) -> Result<Option<JsonSchema>> {
    let primitive = refs
        .node(inner)?
        .def
        .bare_primitive()
        .and_then(InstanceType::from_name);
    if let Some(ty) = primitive {
        return Ok(Some(JsonSchema::typed(SchemaType::Multiple(vec![
            ty,
            InstanceType::Null,
        ]))));
    }

    Ok(parse_child(inner, &["anyOf", "0"], refs)?.map(|schema| JsonSchema {
        any_of: Some(vec![schema, JsonSchema::typed(InstanceType::Null)]),
        ..JsonSchema::default()
    }))
}

pub(crate) fn parse_default_def(def: &DefaultDef, refs: &mut Refs<'_>) -> Result<JsonSchema> {
    let schema = parse_def(def.inner, refs, false)?.unwrap_or_default();
    Ok(JsonSchema {
        default: Some(def.value.clone()),
        ..schema
    })
}

pub(crate) fn parse_effects_def(def: &EffectsDef, refs: &mut Refs<'_>) -> Result<Option<JsonSchema>> {
    match refs.options().effect_strategy {
        EffectStrategy::Input => parse_def(def.schema, refs, false),
        EffectStrategy::Any => Ok(Some(JsonSchema::any())),
    }
}

pub(crate) fn parse_pipeline_def(
    def: &PipelineDef,
    refs: &mut Refs<'_>,
) -> Result<Option<JsonSchema>> {
    match refs.options().pipe_strategy {
        PipeStrategy::Input => parse_def(def.input, refs, false),
        PipeStrategy::Output => parse_def(def.output, refs, false),
        PipeStrategy::All => {
            let input = parse_child(def.input, &["allOf", "0"], refs)?;
            let slot = if input.is_some() { "1" } else { "0" };
            let output = parse_child(def.output, &["allOf", slot], refs)?;
            Ok(Some(JsonSchema {
                all_of: Some(input.into_iter().chain(output).collect()),
                ..JsonSchema::default()
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::def::{EffectKind, SchemaArena};
    use crate::options::Options;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_optional_outside_property() {
        let mut arena = SchemaArena::new();
        let inner = arena.string();

        let options = Options::default();
        let mut refs = Refs::new(&arena, &options);
        assert_eq!(
            parse_optional_def(inner, &mut refs)
                .unwrap()
                .unwrap()
                .to_value()
                .unwrap(),
            json!({ "anyOf": [{ "not": {} }, { "type": "string" }] })
        );
    }

    #[test]
    fn test_optional_of_omitted_inner_is_any() {
        let mut arena = SchemaArena::new();
        let inner = arena.function();

        let options = Options::default();
        let mut refs = Refs::new(&arena, &options);
        assert_eq!(
            parse_optional_def(inner, &mut refs).unwrap(),
            Some(JsonSchema::any())
        );
    }

    #[test]
    fn test_nullable_primitive() {
        let mut arena = SchemaArena::new();
        let inner = arena.string();

        let options = Options::default();
        let mut refs = Refs::new(&arena, &options);
        assert_eq!(
            parse_nullable_def(inner, &mut refs)
                .unwrap()
                .unwrap()
                .to_value()
                .unwrap(),
            json!({ "type": ["string", "null"] })
        );
    }

    #[test]
    fn test_nullable_object() {
        let mut arena = SchemaArena::new();
        let field = arena.string();
        let inner = arena.object([("a", field)]);

        let options = Options::default();
        let mut refs = Refs::new(&arena, &options);
        assert_eq!(
            parse_nullable_def(inner, &mut refs)
                .unwrap()
                .unwrap()
                .to_value()
                .unwrap(),
            json!({
                "anyOf": [
                    {
                        "type": "object",
                        "properties": { "a": { "type": "string" } },
                        "required": ["a"],
                        "additionalProperties": false
                    },
                    { "type": "null" }
                ]
            })
        );
    }

    #[test]
    fn test_default_attaches_value() {
        let mut arena = SchemaArena::new();
        let inner = arena.number();
        let def = DefaultDef {
            inner,
            value: json!(42),
        };

        let options = Options::default();
        let mut refs = Refs::new(&arena, &options);
        assert_eq!(
            parse_default_def(&def, &mut refs).unwrap().to_value().unwrap(),
            json!({ "type": "number", "default": 42 })
        );
    }

    #[test]
    fn test_effects_strategies() {
        let mut arena = SchemaArena::new();
        let inner = arena.string();
        let def = EffectsDef {
            schema: inner,
            effect: EffectKind::Transform,
        };

        let options = Options::default();
        let mut refs = Refs::new(&arena, &options);
        assert_eq!(
            parse_effects_def(&def, &mut refs).unwrap(),
            Some(JsonSchema::typed(InstanceType::String))
        );

        let options = Options::default().with_effect_strategy(EffectStrategy::Any);
        let mut refs = Refs::new(&arena, &options);
        assert_eq!(
            parse_effects_def(&def, &mut refs).unwrap(),
            Some(JsonSchema::any())
        );
    }

    #[test]
    fn test_pipeline_strategies() {
        let mut arena = SchemaArena::new();
        let input = arena.string();
        let output = arena.number();
        let def = PipelineDef { input, output };

        let options = Options::default();
        let mut refs = Refs::new(&arena, &options);
        assert_eq!(
            parse_pipeline_def(&def, &mut refs)
                .unwrap()
                .unwrap()
                .to_value()
                .unwrap(),
            json!({ "allOf": [{ "type": "string" }, { "type": "number" }] })
        );

        let options = Options::default().with_pipe_strategy(PipeStrategy::Output);
        let mut refs = Refs::new(&arena, &options);
        assert_eq!(
            parse_pipeline_def(&def, &mut refs).unwrap(),
            Some(JsonSchema::typed(InstanceType::Number))
        );
    }

    #[test]
    fn test_pipeline_skips_omitted_input() {
        let mut arena = SchemaArena::new();
        let input = arena.function();
        let output = arena.number();
        let def = PipelineDef { input, output };

        let options = Options::default();
        let mut refs = Refs::new(&arena, &options);
        assert_eq!(
            parse_pipeline_def(&def, &mut refs)
                .unwrap()
                .unwrap()
                .to_value()
                .unwrap(),
            json!({ "allOf": [{ "type": "number" }] })
        );
    }
}
