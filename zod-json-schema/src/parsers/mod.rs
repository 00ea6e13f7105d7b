//! One parser per definition constructor.
//!
//! Parsers recurse into children through [`parse_def`](crate::parse_def),
//! always after pushing the child's pointer segments onto the context.

mod array;
mod date;
mod intersection;
mod literal;
mod number;
mod object;
mod record;
mod string;
mod union;
mod wrappers;

pub use string::patterns;

use crate::def::{NodeId, SchemaNode, ZodDef};
use crate::error::{Error, Result};
use crate::refs::Refs;
use crate::schema::{InstanceType, JsonSchema};

/// Result of a type parser.
pub(crate) enum Parsed {
    /// A finished fragment, or `None` to omit it
    Schema(Option<JsonSchema>),
    /// Compile this node in place instead
    Deferred(NodeId),
}

impl From<JsonSchema> for Parsed {
    fn from(schema: JsonSchema) -> Self {
        Self::Schema(Some(schema))
    }
}

impl From<Option<JsonSchema>> for Parsed {
    fn from(schema: Option<JsonSchema>) -> Self {
        Self::Schema(schema)
    }
}

pub(crate) fn select_parser(id: NodeId, node: &SchemaNode, refs: &mut Refs<'_>) -> Result<Parsed> {
    let parsed = match &node.def {
        ZodDef::String(def) => string::parse_string_def(def, refs).into(),
        ZodDef::Number(def) => number::parse_number_def(def).into(),
        ZodDef::BigInt(def) => number::parse_bigint_def(def).into(),
        ZodDef::Boolean => JsonSchema::typed(InstanceType::Boolean).into(),
        ZodDef::Date(def) => date::parse_date_def(def, refs).into(),
        ZodDef::Null => JsonSchema::typed(InstanceType::Null).into(),
        ZodDef::Undefined | ZodDef::Never | ZodDef::NaN => JsonSchema::never().into(),
        ZodDef::Any | ZodDef::Unknown => JsonSchema::any().into(),
        ZodDef::Void | ZodDef::Function | ZodDef::Symbol => Parsed::Schema(None),

        ZodDef::Array(def) => array::parse_array_def(def, refs)?.into(),
        ZodDef::Object(def) => object::parse_object_def(def, refs)?.into(),
        ZodDef::Union(options) => union::parse_union_def(options, refs)?.into(),
        ZodDef::DiscriminatedUnion(def) => union::parse_union_def(&def.options, refs)?.into(),
        ZodDef::Intersection(def) => intersection::parse_intersection_def(def, refs)?.into(),
        ZodDef::Tuple(def) => array::parse_tuple_def(def, refs)?.into(),
        ZodDef::Record(def) => record::parse_record_def(def, refs)?.into(),
        ZodDef::Map(def) => record::parse_map_def(def, refs)?.into(),
        ZodDef::Set(def) => array::parse_set_def(def, refs)?.into(),

        ZodDef::Literal(value) => literal::parse_literal_def(value).into(),
        ZodDef::Enum(values) => literal::parse_enum_def(values).into(),
        ZodDef::NativeEnum(members) => literal::parse_native_enum_def(members).into(),

        ZodDef::Optional(inner) => wrappers::parse_optional_def(*inner, refs)?.into(),
        ZodDef::Nullable(inner) => wrappers::parse_nullable_def(*inner, refs)?.into(),
        ZodDef::Default(def) => wrappers::parse_default_def(def, refs)?.into(),
        ZodDef::Catch(inner)
        | ZodDef::Branded(inner)
        | ZodDef::Readonly(inner)
        | ZodDef::Promise(inner) => crate::parse_def(*inner, refs, false)?.into(),
        ZodDef::Effects(def) => wrappers::parse_effects_def(def, refs)?.into(),
        ZodDef::Pipeline(def) => wrappers::parse_pipeline_def(def, refs)?.into(),
        ZodDef::Lazy(slot) => match refs.arena().resolve_lazy(*slot) {
            Some(target) => Parsed::Deferred(target),
            None => return Err(Error::UnboundLazy(id)),
        },
    };
    Ok(parsed)
}

/// Compile `id` below the current path at `segments`.
pub(crate) fn parse_child(
    id: NodeId,
    segments: &[&str],
    refs: &mut Refs<'_>,
) -> Result<Option<JsonSchema>> {
    refs.descend(segments, |refs| crate::parse_def(id, refs, false))
}
