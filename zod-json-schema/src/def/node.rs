//! Definition node types.
//!
//! A schema tree is stored as nodes in a [`SchemaArena`](super::SchemaArena).
//! Child references are [`NodeId`]s, so the same node may be reused at several
//! places in a tree, and lazy nodes may point back at an ancestor.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::checks::{DateCheck, NumberCheck, StringCheck};

/// Stable identity of a node inside one arena.
///
/// Two structurally equal definitions inserted separately get different ids;
/// only reuse of the same id is treated as "the same definition".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(usize);

impl NodeId {
    /// Build an id from a raw arena index.
    pub fn from_index(index: usize) -> Self {
        Self(index)
    }

    /// The raw arena index.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Index into the arena's lazy indirection table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LazySlot(pub(crate) usize);

/// One node of a schema tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaNode {
    /// The constructor and its parameters
    pub def: ZodDef,

    /// Human readable description, copied to the fragment's `description`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl SchemaNode {
    /// Create an undescribed node.
    pub fn new(def: ZodDef) -> Self {
        Self {
            def,
            description: None,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Schema constructor enumeration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum ZodDef {
    // ==========================================================================
    // Primitives
    // ==========================================================================
    String(StringDef),
    Number(NumberDef),
    BigInt(NumberDef),
    Boolean,
    Date(DateDef),
    Undefined,
    Null,
    Any,
    Unknown,
    Never,
    NaN,
    Void,
    Function,
    Symbol,

    // ==========================================================================
    // Compound types
    // ==========================================================================
    Array(ArrayDef),
    Object(ObjectDef),
    Union(Vec<NodeId>),
    DiscriminatedUnion(DiscriminatedUnionDef),
    Intersection(IntersectionDef),
    Tuple(TupleDef),
    Record(KeyValueDef),
    Map(KeyValueDef),
    Set(SetDef),

    // ==========================================================================
    // Literals and enums
    // ==========================================================================
    Literal(LiteralValue),
    Enum(Vec<String>),
    NativeEnum(IndexMap<String, NativeEnumValue>),

    // ==========================================================================
    // Wrappers
    // ==========================================================================
    Optional(NodeId),
    Nullable(NodeId),
    Default(DefaultDef),
    Catch(NodeId),
    Branded(NodeId),
    Readonly(NodeId),
    Promise(NodeId),
    Effects(EffectsDef),
    Pipeline(PipelineDef),

    /// Deferred reference resolved through the arena's lazy table
    Lazy(LazySlot),
}

impl ZodDef {
    /// Constructor name, used in log output.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::Number(_) => "number",
            Self::BigInt(_) => "bigint",
            Self::Boolean => "boolean",
            Self::Date(_) => "date",
            Self::Undefined => "undefined",
            Self::Null => "null",
            Self::Any => "any",
            Self::Unknown => "unknown",
            Self::Never => "never",
            Self::NaN => "nan",
            Self::Void => "void",
            Self::Function => "function",
            Self::Symbol => "symbol",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
            Self::Union(_) => "union",
            Self::DiscriminatedUnion(_) => "discriminatedUnion",
            Self::Intersection(_) => "intersection",
            Self::Tuple(_) => "tuple",
            Self::Record(_) => "record",
            Self::Map(_) => "map",
            Self::Set(_) => "set",
            Self::Literal(_) => "literal",
            Self::Enum(_) => "enum",
            Self::NativeEnum(_) => "nativeEnum",
            Self::Optional(_) => "optional",
            Self::Nullable(_) => "nullable",
            Self::Default(_) => "default",
            Self::Catch(_) => "catch",
            Self::Branded(_) => "branded",
            Self::Readonly(_) => "readonly",
            Self::Promise(_) => "promise",
            Self::Effects(_) => "effects",
            Self::Pipeline(_) => "pipeline",
            Self::Lazy(_) => "lazy",
        }
    }

    /// JSON primitive name for a check-free string/number/bigint/boolean/null.
    ///
    /// These are the definitions that may collapse into a `type` list in
    /// nullable and union compilation.
    pub(crate) fn bare_primitive(&self) -> Option<&'static str> {
        match self {
            Self::String(def) if def.checks.is_empty() => Some("string"),
            Self::Number(def) if def.checks.is_empty() => Some("number"),
            Self::BigInt(def) if def.checks.is_empty() => Some("integer"),
            Self::Boolean => Some("boolean"),
            Self::Null => Some("null"),
            _ => None,
        }
    }
}

/// String definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StringDef {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub checks: Vec<StringCheck>,
}

/// Number or bigint definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NumberDef {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub checks: Vec<NumberCheck>,
}

/// Date definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DateDef {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub checks: Vec<DateCheck>,
}

/// Array definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrayDef {
    pub element: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exact_length: Option<u64>,
}

impl ArrayDef {
    /// Unbounded array of `element`.
    pub fn new(element: NodeId) -> Self {
        Self {
            element,
            min_length: None,
            max_length: None,
            exact_length: None,
        }
    }

    /// Set the minimum length.
    pub fn with_min(mut self, min: u64) -> Self {
        self.min_length = Some(min);
        self
    }

    /// Set the maximum length.
    pub fn with_max(mut self, max: u64) -> Self {
        self.max_length = Some(max);
        self
    }

    /// Set an exact length.
    pub fn with_length(mut self, length: u64) -> Self {
        self.exact_length = Some(length);
        self
    }
}

/// How an object treats keys that are not part of its shape.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownKeys {
    /// Unknown keys are removed on parse (`.strip()`, the default)
    #[default]
    Strip,
    /// Unknown keys are rejected (`.strict()`)
    Strict,
    /// Unknown keys are kept (`.passthrough()`)
    Passthrough,
}

/// Object definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectDef {
    /// Fields in declaration order
    pub shape: IndexMap<String, NodeId>,

    #[serde(default)]
    pub unknown_keys: UnknownKeys,

    /// Schema for every key outside the shape (`.catchall(t)`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catchall: Option<NodeId>,
}

impl ObjectDef {
    /// Object with the given fields.
    pub fn new<K: Into<String>>(fields: impl IntoIterator<Item = (K, NodeId)>) -> Self {
        Self {
            shape: fields.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            unknown_keys: UnknownKeys::Strip,
            catchall: None,
        }
    }

    /// Set the unknown-keys policy.
    pub fn with_unknown_keys(mut self, unknown_keys: UnknownKeys) -> Self {
        self.unknown_keys = unknown_keys;
        self
    }

    /// Set the catch-all schema.
    pub fn with_catchall(mut self, catchall: NodeId) -> Self {
        self.catchall = Some(catchall);
        self
    }
}

/// Discriminated union definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscriminatedUnionDef {
    pub discriminator: String,
    pub options: Vec<NodeId>,
}

/// Intersection definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntersectionDef {
    pub left: NodeId,
    pub right: NodeId,
}

/// Tuple definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TupleDef {
    pub items: Vec<NodeId>,
    /// Type of any elements after the fixed positions (`.rest(t)`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rest: Option<NodeId>,
}

/// Record or map definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyValueDef {
    pub key: NodeId,
    pub value: NodeId,
}

/// Set definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetDef {
    pub value: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_size: Option<u64>,
}

/// Literal value.
///
/// Composite literals are kept so they round-trip, but they cannot be
/// expressed as a `const` and compile to a bare `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum LiteralValue {
    String(String),
    Number(serde_json::Number),
    BigInt(i64),
    Boolean(bool),
    Null,
    Array(Vec<Value>),
    Object(serde_json::Map<String, Value>),
}

impl LiteralValue {
    /// The JSON value, or `None` for composite literals.
    pub fn to_const(&self) -> Option<Value> {
        match self {
            Self::String(s) => Some(Value::String(s.clone())),
            Self::Number(n) => Some(Value::Number(n.clone())),
            Self::BigInt(n) => Some(Value::from(*n)),
            Self::Boolean(b) => Some(Value::Bool(*b)),
            Self::Null => Some(Value::Null),
            Self::Array(_) | Self::Object(_) => None,
        }
    }

    /// JSON Schema instance type name of the value.
    pub fn json_type(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::Number(_) => "number",
            Self::BigInt(_) => "integer",
            Self::Boolean(_) => "boolean",
            Self::Null => "null",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
        }
    }
}

impl From<&str> for LiteralValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for LiteralValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for LiteralValue {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<bool> for LiteralValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

/// Value of one native enum member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NativeEnumValue {
    Number(serde_json::Number),
    String(String),
}

impl From<&NativeEnumValue> for Value {
    fn from(value: &NativeEnumValue) -> Self {
        match value {
            NativeEnumValue::Number(n) => Value::Number(n.clone()),
            NativeEnumValue::String(s) => Value::String(s.clone()),
        }
    }
}

/// Default wrapper definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefaultDef {
    pub inner: NodeId,
    pub value: Value,
}

/// Kind of effect applied by an effects wrapper.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectKind {
    #[default]
    Refinement,
    Transform,
    Preprocess,
}

/// Effects wrapper definition (refine / transform / preprocess).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectsDef {
    /// The schema the effect is applied to
    pub schema: NodeId,
    #[serde(default)]
    pub effect: EffectKind,
}

/// Pipeline definition (`a.pipe(b)`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineDef {
    #[serde(rename = "in")]
    pub input: NodeId,
    #[serde(rename = "out")]
    pub output: NodeId,
}
