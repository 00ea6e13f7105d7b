//! Node storage and authoring helpers.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::checks::{DateCheck, NumberCheck, StringCheck};
use super::node::{
    ArrayDef, DateDef, DefaultDef, DiscriminatedUnionDef, EffectKind, EffectsDef,
    IntersectionDef, KeyValueDef, LazySlot, LiteralValue, NativeEnumValue, NodeId, NumberDef,
    ObjectDef, PipelineDef, SchemaNode, SetDef, StringDef, TupleDef, ZodDef,
};
use crate::error::{Error, Result};

/// Owns every node of one or more schema trees.
///
/// Nodes are append-only: an id handed out by [`insert`](Self::insert) stays
/// valid for the lifetime of the arena and always refers to the same
/// definition. Reusing an id in several places is how shared and recursive
/// subtrees are expressed.
///
/// # Example
///
/// ```rust
/// use zod_json_schema::SchemaArena;
///
/// let mut arena = SchemaArena::new();
/// let name = arena.string();
/// let tags = arena.array(name);
/// let user = arena.object([("name", name), ("tags", tags)]);
/// assert_eq!(arena.len(), 3);
/// # let _ = user;
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaArena {
    nodes: Vec<SchemaNode>,

    /// Indirection table for lazy nodes
    #[serde(default)]
    lazy: Vec<Option<NodeId>>,
}

impl SchemaArena {
    /// Create an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the arena holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Insert a node and return its id.
    pub fn insert_node(&mut self, node: SchemaNode) -> NodeId {
        let id = NodeId::from_index(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Insert an undescribed definition and return its id.
    pub fn insert(&mut self, def: ZodDef) -> NodeId {
        self.insert_node(SchemaNode::new(def))
    }

    /// Look up a node.
    pub fn get(&self, id: NodeId) -> Result<&SchemaNode> {
        self.nodes.get(id.index()).ok_or(Error::UnknownNode(id))
    }

    /// Iterate over all nodes with their ids.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &SchemaNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (NodeId::from_index(index), node))
    }

    /// Copy `id` into a new node carrying `description`.
    ///
    /// The copy is a distinct definition: it is memoized separately from
    /// the original, while its children stay shared.
    pub fn describe(&mut self, id: NodeId, description: impl Into<String>) -> Result<NodeId> {
        let node = self.get(id)?.clone().with_description(description);
        Ok(self.insert_node(node))
    }

    // ==========================================================================
    // Lazy nodes
    // ==========================================================================

    /// Allocate an unbound lazy node.
    ///
    /// Bind it with [`bind_lazy`](Self::bind_lazy) once the target exists;
    /// this is how a definition refers to itself or to a later sibling.
    pub fn lazy(&mut self) -> NodeId {
        let slot = LazySlot(self.lazy.len());
        self.lazy.push(None);
        self.insert(ZodDef::Lazy(slot))
    }

    /// Allocate a lazy node that is already bound to `target`.
    pub fn lazy_of(&mut self, target: NodeId) -> NodeId {
        let slot = LazySlot(self.lazy.len());
        self.lazy.push(Some(target));
        self.insert(ZodDef::Lazy(slot))
    }

    /// Point the lazy node `lazy` at `target`.
    pub fn bind_lazy(&mut self, lazy: NodeId, target: NodeId) -> Result<()> {
        self.get(target)?;
        let slot = match self.get(lazy)?.def {
            ZodDef::Lazy(slot) => slot,
            _ => return Err(Error::NotLazy(lazy)),
        };
        match self.lazy.get_mut(slot.0) {
            Some(entry) => {
                *entry = Some(target);
                Ok(())
            }
            None => Err(Error::UnboundLazy(lazy)),
        }
    }

    /// Target of a lazy slot, if bound.
    pub fn resolve_lazy(&self, slot: LazySlot) -> Option<NodeId> {
        self.lazy.get(slot.0).copied().flatten()
    }

    // ==========================================================================
    // Optionality
    // ==========================================================================

    /// Whether `id` accepts an absent value.
    ///
    /// Object compilation uses this to decide the `required` list. Unknown
    /// ids and unbound lazies count as optional.
    pub fn is_optional(&self, id: NodeId) -> bool {
        self.is_optional_inner(id, &mut HashSet::new())
    }

    fn is_optional_inner(&self, id: NodeId, visiting: &mut HashSet<NodeId>) -> bool {
        if !visiting.insert(id) {
            return false;
        }
        let Ok(node) = self.get(id) else {
            return true;
        };
        let result = match &node.def {
            ZodDef::Optional(_)
            | ZodDef::Any
            | ZodDef::Unknown
            | ZodDef::Undefined
            | ZodDef::Void
            | ZodDef::Default(_)
            | ZodDef::Catch(_) => true,
            ZodDef::Nullable(inner) | ZodDef::Branded(inner) | ZodDef::Readonly(inner) => {
                self.is_optional_inner(*inner, visiting)
            }
            ZodDef::Effects(def) => self.is_optional_inner(def.schema, visiting),
            ZodDef::Pipeline(def) => self.is_optional_inner(def.input, visiting),
            ZodDef::Lazy(slot) => match self.resolve_lazy(*slot) {
                Some(target) => self.is_optional_inner(target, visiting),
                None => true,
            },
            ZodDef::Union(options) => options
                .iter()
                .any(|option| self.is_optional_inner(*option, visiting)),
            ZodDef::DiscriminatedUnion(def) => def
                .options
                .iter()
                .any(|option| self.is_optional_inner(*option, visiting)),
            ZodDef::Intersection(def) => {
                self.is_optional_inner(def.left, visiting)
                    && self.is_optional_inner(def.right, visiting)
            }
            _ => false,
        };
        visiting.remove(&id);
        result
    }

    // ==========================================================================
    // Authoring helpers
    // ==========================================================================

    /// `z.string()`
    pub fn string(&mut self) -> NodeId {
        self.string_with(Vec::new())
    }

    /// `z.string()` with refinement checks.
    pub fn string_with(&mut self, checks: impl IntoIterator<Item = StringCheck>) -> NodeId {
        self.insert(ZodDef::String(StringDef {
            checks: checks.into_iter().collect(),
        }))
    }

    /// `z.number()`
    pub fn number(&mut self) -> NodeId {
        self.number_with(Vec::new())
    }

    /// `z.number()` with refinement checks.
    pub fn number_with(&mut self, checks: impl IntoIterator<Item = NumberCheck>) -> NodeId {
        self.insert(ZodDef::Number(NumberDef {
            checks: checks.into_iter().collect(),
        }))
    }

    /// `z.bigint()`
    pub fn bigint(&mut self) -> NodeId {
        self.insert(ZodDef::BigInt(NumberDef::default()))
    }

    /// `z.boolean()`
    pub fn boolean(&mut self) -> NodeId {
        self.insert(ZodDef::Boolean)
    }

    /// `z.date()`
    pub fn date(&mut self) -> NodeId {
        self.date_with(Vec::new())
    }

    /// `z.date()` with bounds.
    pub fn date_with(&mut self, checks: impl IntoIterator<Item = DateCheck>) -> NodeId {
        self.insert(ZodDef::Date(DateDef {
            checks: checks.into_iter().collect(),
        }))
    }

    /// `z.null()`
    pub fn null(&mut self) -> NodeId {
        self.insert(ZodDef::Null)
    }

    /// `z.undefined()`
    pub fn undefined(&mut self) -> NodeId {
        self.insert(ZodDef::Undefined)
    }

    /// `z.any()`
    pub fn any(&mut self) -> NodeId {
        self.insert(ZodDef::Any)
    }

    /// `z.unknown()`
    pub fn unknown(&mut self) -> NodeId {
        self.insert(ZodDef::Unknown)
    }

    /// `z.never()`
    pub fn never(&mut self) -> NodeId {
        self.insert(ZodDef::Never)
    }

    /// `z.nan()`
    pub fn nan(&mut self) -> NodeId {
        self.insert(ZodDef::NaN)
    }

    /// `z.void()`
    pub fn void(&mut self) -> NodeId {
        self.insert(ZodDef::Void)
    }

    /// `z.function()`
    pub fn function(&mut self) -> NodeId {
        self.insert(ZodDef::Function)
    }

    /// `z.symbol()`
    pub fn symbol(&mut self) -> NodeId {
        self.insert(ZodDef::Symbol)
    }

    /// `z.array(element)`
    pub fn array(&mut self, element: NodeId) -> NodeId {
        self.insert(ZodDef::Array(ArrayDef::new(element)))
    }

    /// `z.object({...})` with the default strip policy.
    pub fn object<K: Into<String>>(
        &mut self,
        fields: impl IntoIterator<Item = (K, NodeId)>,
    ) -> NodeId {
        self.insert(ZodDef::Object(ObjectDef::new(fields)))
    }

    /// `z.union([...])`
    pub fn union(&mut self, options: impl IntoIterator<Item = NodeId>) -> NodeId {
        self.insert(ZodDef::Union(options.into_iter().collect()))
    }

    /// `z.discriminatedUnion(discriminator, [...])`
    pub fn discriminated_union(
        &mut self,
        discriminator: impl Into<String>,
        options: impl IntoIterator<Item = NodeId>,
    ) -> NodeId {
        self.insert(ZodDef::DiscriminatedUnion(DiscriminatedUnionDef {
            discriminator: discriminator.into(),
            options: options.into_iter().collect(),
        }))
    }

    /// `z.intersection(left, right)`
    pub fn intersection(&mut self, left: NodeId, right: NodeId) -> NodeId {
        self.insert(ZodDef::Intersection(IntersectionDef { left, right }))
    }

    /// `z.tuple([...])`
    pub fn tuple(&mut self, items: impl IntoIterator<Item = NodeId>) -> NodeId {
        self.insert(ZodDef::Tuple(TupleDef {
            items: items.into_iter().collect(),
            rest: None,
        }))
    }

    /// `z.tuple([...]).rest(rest)`
    pub fn tuple_with_rest(
        &mut self,
        items: impl IntoIterator<Item = NodeId>,
        rest: NodeId,
    ) -> NodeId {
        self.insert(ZodDef::Tuple(TupleDef {
            items: items.into_iter().collect(),
            rest: Some(rest),
        }))
    }

    /// `z.record(key, value)`
    pub fn record(&mut self, key: NodeId, value: NodeId) -> NodeId {
        self.insert(ZodDef::Record(KeyValueDef { key, value }))
    }

    /// `z.record(value)`, keyed by plain strings.
    pub fn record_of(&mut self, value: NodeId) -> NodeId {
        let key = self.string();
        self.record(key, value)
    }

    /// `z.map(key, value)`
    pub fn map(&mut self, key: NodeId, value: NodeId) -> NodeId {
        self.insert(ZodDef::Map(KeyValueDef { key, value }))
    }

    /// `z.set(value)`
    pub fn set(&mut self, value: NodeId) -> NodeId {
        self.insert(ZodDef::Set(SetDef {
            value,
            min_size: None,
            max_size: None,
        }))
    }

    /// `z.literal(value)`
    pub fn literal(&mut self, value: impl Into<LiteralValue>) -> NodeId {
        self.insert(ZodDef::Literal(value.into()))
    }

    /// `z.enum([...])`
    pub fn enumeration<S: Into<String>>(&mut self, values: impl IntoIterator<Item = S>) -> NodeId {
        self.insert(ZodDef::Enum(values.into_iter().map(Into::into).collect()))
    }

    /// `z.nativeEnum(E)`
    pub fn native_enum<K: Into<String>>(
        &mut self,
        members: impl IntoIterator<Item = (K, NativeEnumValue)>,
    ) -> NodeId {
        let members: IndexMap<String, NativeEnumValue> =
            members.into_iter().map(|(k, v)| (k.into(), v)).collect();
        self.insert(ZodDef::NativeEnum(members))
    }

    /// `inner.optional()`
    pub fn optional(&mut self, inner: NodeId) -> NodeId {
        self.insert(ZodDef::Optional(inner))
    }

    /// `inner.nullable()`
    pub fn nullable(&mut self, inner: NodeId) -> NodeId {
        self.insert(ZodDef::Nullable(inner))
    }

    /// `inner.default(value)`
    pub fn default_value(&mut self, inner: NodeId, value: Value) -> NodeId {
        self.insert(ZodDef::Default(DefaultDef { inner, value }))
    }

    /// `inner.catch(...)`
    pub fn catch(&mut self, inner: NodeId) -> NodeId {
        self.insert(ZodDef::Catch(inner))
    }

    /// `inner.brand()`
    pub fn branded(&mut self, inner: NodeId) -> NodeId {
        self.insert(ZodDef::Branded(inner))
    }

    /// `inner.readonly()`
    pub fn readonly(&mut self, inner: NodeId) -> NodeId {
        self.insert(ZodDef::Readonly(inner))
    }

    /// `z.promise(inner)`
    pub fn promise(&mut self, inner: NodeId) -> NodeId {
        self.insert(ZodDef::Promise(inner))
    }

    /// `schema.refine(...)`, `schema.transform(...)` or `z.preprocess(..., schema)`
    pub fn effects(&mut self, schema: NodeId, effect: EffectKind) -> NodeId {
        self.insert(ZodDef::Effects(EffectsDef { schema, effect }))
    }

    /// `input.pipe(output)`
    pub fn pipe(&mut self, input: NodeId, output: NodeId) -> NodeId {
        self.insert(ZodDef::Pipeline(PipelineDef { input, output }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_sequential() {
        let mut arena = SchemaArena::new();
        let a = arena.string();
        let b = arena.string();
        assert_eq!(a.index(), 0);
        assert_eq!(b.index(), 1);
        assert_ne!(a, b);
    }

    #[test]
    fn test_get_unknown_node() {
        let arena = SchemaArena::new();
        let err = arena.get(NodeId::from_index(3)).unwrap_err();
        assert!(matches!(err, Error::UnknownNode(id) if id.index() == 3));
    }

    #[test]
    fn test_describe_creates_new_identity() {
        let mut arena = SchemaArena::new();
        let base = arena.string();
        let described = arena.describe(base, "a name").unwrap();

        assert_ne!(base, described);
        assert_eq!(arena.get(base).unwrap().description, None);
        assert_eq!(
            arena.get(described).unwrap().description.as_deref(),
            Some("a name")
        );
        assert_eq!(arena.get(base).unwrap().def, arena.get(described).unwrap().def);
    }

    #[test]
    fn test_bind_lazy() {
        let mut arena = SchemaArena::new();
        let lazy = arena.lazy();
        let target = arena.string();

        let ZodDef::Lazy(slot) = arena.get(lazy).unwrap().def else {
            panic!("expected lazy node");
        };
        assert_eq!(arena.resolve_lazy(slot), None);

        arena.bind_lazy(lazy, target).unwrap();
        assert_eq!(arena.resolve_lazy(slot), Some(target));
    }

    #[test]
    fn test_bind_lazy_rejects_non_lazy() {
        let mut arena = SchemaArena::new();
        let not_lazy = arena.string();
        let target = arena.number();
        let err = arena.bind_lazy(not_lazy, target).unwrap_err();
        assert!(matches!(err, Error::NotLazy(_)));
    }

    #[test]
    fn test_is_optional() {
        let mut arena = SchemaArena::new();
        let string = arena.string();
        let optional = arena.optional(string);
        let nullable_optional = arena.nullable(optional);
        let refined = arena.effects(optional, EffectKind::Refinement);
        let any = arena.any();
        let defaulted = arena.default_value(string, Value::from("x"));
        let union = arena.union([string, optional]);
        let nullable = arena.nullable(string);

        assert!(!arena.is_optional(string));
        assert!(arena.is_optional(optional));
        assert!(arena.is_optional(nullable_optional));
        assert!(arena.is_optional(refined));
        assert!(arena.is_optional(any));
        assert!(arena.is_optional(defaulted));
        assert!(arena.is_optional(union));
        assert!(!arena.is_optional(nullable));
    }

    #[test]
    fn test_is_optional_terminates_on_lazy_cycle() {
        let mut arena = SchemaArena::new();
        let lazy = arena.lazy();
        let union = arena.union([lazy]);
        arena.bind_lazy(lazy, union).unwrap();

        assert!(!arena.is_optional(union));
    }

    #[test]
    fn test_arena_serde_roundtrip() {
        let mut arena = SchemaArena::new();
        let name = arena.string_with([StringCheck::Min(1)]);
        let lazy = arena.lazy();
        let user = arena.object([("name", name), ("manager", lazy)]);
        arena.bind_lazy(lazy, user).unwrap();

        let json = serde_json::to_string(&arena).unwrap();
        let back: SchemaArena = serde_json::from_str(&json).unwrap();
        assert_eq!(arena, back);
    }
}
