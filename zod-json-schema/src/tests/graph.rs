//! Random schema graph generation shared by the property tests.

use proptest::prelude::*;
use serde_json::Value;

use crate::{NodeId, SchemaArena};

/// Constructor kinds the generator can emit.
#[derive(Debug, Clone, Copy)]
pub enum Kind {
    String,
    Number,
    Boolean,
    Array,
    Object,
    Union,
    Optional,
    Nullable,
    Record,
    Tuple,
    Set,
    Map,
}

/// Object keys, one of which needs pointer escaping.
const PROPERTY_NAMES: [&str; 2] = ["plain", "a/b~c"];

/// One generated node: a kind plus indices of its children.
pub type Spec = (Kind, Vec<usize>);

fn arb_kind() -> impl Strategy<Value = Kind> {
    prop_oneof![
        Just(Kind::String),
        Just(Kind::Number),
        Just(Kind::Boolean),
        Just(Kind::Array),
        Just(Kind::Object),
        Just(Kind::Union),
        Just(Kind::Optional),
        Just(Kind::Nullable),
        Just(Kind::Record),
        Just(Kind::Tuple),
        Just(Kind::Set),
        Just(Kind::Map),
    ]
}

/// Strategy for a graph of up to 10 nodes whose children may point
/// anywhere, including at ancestors.
///
/// Fan-out stays at two so the inline strategies, which copy every shared
/// subtree, stay small.
pub fn arb_graph() -> impl Strategy<Value = Vec<Spec>> {
    prop::collection::vec(
        (arb_kind(), prop::collection::vec(0usize..64, 1..3)),
        1..10,
    )
}

/// Build a graph into an arena and return the id of node 0.
///
/// Every child edge goes through a lazy node, so any index (earlier, later
/// or the node itself) can be referenced.
pub fn build(specs: &[Spec]) -> (SchemaArena, NodeId) {
    let mut arena = SchemaArena::new();
    let n = specs.len();
    let lazies: Vec<NodeId> = (0..n).map(|_| arena.lazy()).collect();
    let child = |index: usize| lazies[index % n];

    let mut real = Vec::with_capacity(n);
    for (kind, children) in specs {
        let first = child(children[0]);
        let id = match kind {
            Kind::String => arena.string(),
            Kind::Number => arena.number(),
            Kind::Boolean => arena.boolean(),
            Kind::Array => arena.array(first),
            Kind::Object => arena.object(
                children
                    .iter()
                    .enumerate()
                    .map(|(i, &c)| (PROPERTY_NAMES[i % PROPERTY_NAMES.len()], child(c))),
            ),
            Kind::Union => arena.union(children.iter().map(|&c| child(c))),
            Kind::Optional => arena.optional(first),
            Kind::Nullable => arena.nullable(first),
            Kind::Record => arena.record_of(first),
            Kind::Tuple => arena.tuple(children.iter().map(|&c| child(c))),
            Kind::Set => arena.set(first),
            Kind::Map => {
                let key = arena.string();
                arena.map(key, first)
            }
        };
        real.push(id);
    }

    for (lazy, target) in lazies.iter().zip(&real) {
        arena
            .bind_lazy(*lazy, *target)
            .expect("generated lazy nodes are always bindable");
    }

    (arena, real[0])
}

/// Collect every `$ref` string in a document.
pub fn collect_refs(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                match (key.as_str(), child) {
                    ("$ref", Value::String(pointer)) => out.push(pointer.clone()),
                    _ => collect_refs(child, out),
                }
            }
        }
        Value::Array(items) => items.iter().for_each(|item| collect_refs(item, out)),
        _ => {}
    }
}
