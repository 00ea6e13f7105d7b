//! Input model: schema definition trees.

mod arena;
mod checks;
mod node;

pub use arena::SchemaArena;
pub use checks::{DateCheck, IpVersion, NumberCheck, StringCheck};
pub use node::{
    ArrayDef, DateDef, DefaultDef, DiscriminatedUnionDef, EffectKind, EffectsDef,
    IntersectionDef, KeyValueDef, LazySlot, LiteralValue, NativeEnumValue, NodeId, NumberDef,
    ObjectDef, PipelineDef, SchemaNode, SetDef, StringDef, TupleDef, UnknownKeys, ZodDef,
};
