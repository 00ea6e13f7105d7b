//! # zod-json-schema
//!
//! Compile [Zod](https://zod.dev/)-style schema trees into JSON Schema
//! (draft-07) documents.
//!
//! ## Overview
//!
//! A schema tree is authored into a [`SchemaArena`]: every constructor
//! (`string`, `object`, `union`, `optional`, ...) becomes a node with a stable
//! [`NodeId`]. Reusing an id is how a tree shares a subtree, and lazy nodes
//! let a definition refer back to itself. [`compile`] walks the tree from a
//! root and produces a [`JsonSchema`] document.
//!
//! Repeated definitions are detected by node id. Depending on
//! [`RefStrategy`], a repeat becomes a `$ref` to its first location, a
//! relative pointer, or an inline copy; a true cycle under the inline
//! strategies degrades to `{}` with a warning.
//!
//! ## Quick Start
//!
//! ```rust
//! use serde_json::json;
//! use zod_json_schema::{compile, Options, SchemaArena};
//!
//! let mut arena = SchemaArena::new();
//! let name = arena.string();
//! let tags = arena.array(name);
//! let post = arena.object([("title", name), ("tags", tags)]);
//!
//! let schema = compile(&arena, post, Options::default()).unwrap();
//! assert_eq!(
//!     schema.to_value().unwrap(),
//!     json!({
//!         "$schema": "http://json-schema.org/draft-07/schema#",
//!         "type": "object",
//!         "properties": {
//!             "title": { "type": "string" },
//!             "tags": { "type": "array", "items": { "$ref": "#/properties/title" } }
//!         },
//!         "required": ["title", "tags"],
//!         "additionalProperties": false
//!     })
//! );
//! ```
//!
//! ## Recursive Schemas
//!
//! ```rust
//! use zod_json_schema::{compile, SchemaArena};
//!
//! let mut arena = SchemaArena::new();
//! let children = arena.lazy();
//! let list = arena.array(children);
//! let label = arena.string();
//! let node = arena.object([("label", label), ("children", list)]);
//! arena.bind_lazy(children, node).unwrap();
//!
//! let schema = compile(&arena, node, "Node").unwrap();
//! let value = schema.to_value().unwrap();
//! assert_eq!(
//!     value["definitions"]["Node"]["properties"]["children"]["items"]["$ref"],
//!     "#/definitions/Node"
//! );
//! ```
//!
//! ## Options
//!
//! | Option | Description | Default |
//! |--------|-------------|---------|
//! | `name` | Store the root under the definitions section | none |
//! | `$refStrategy` | `root`, `relative`, `none` or `seen` | `root` |
//! | `effectStrategy` | `input` or `any` | `input` |
//! | `pipeStrategy` | `input`, `output` or `all` | `all` |
//! | `dateStrategy` | `format:date-time`, `format:date`, `string`, `integer` | `format:date-time` |
//! | `definitions` | Named definitions compiled up front | empty |
//! | `strictUnions` | Drop `{}` members from `anyOf` | `false` |
//!
//! See [`Options`] for the full list.
//!
//! ## Hooks
//!
//! [`Options::with_override`] and [`Options::with_post_process`] splice
//! caller code into the traversal. [`json_description`] is a ready-made
//! post-processor that merges JSON-object descriptions into fragments.

pub mod compiler;
pub mod def;
pub mod error;
pub mod hooks;
pub mod options;
mod parse_def;
mod parsers;
pub mod refs;
pub mod schema;

#[cfg(test)]
mod tests;

pub use compiler::compile;
pub use def::{
    ArrayDef, DateCheck, EffectKind, IpVersion, LiteralValue, NativeEnumValue, NodeId,
    NumberCheck, ObjectDef, SchemaArena, SchemaNode, StringCheck, UnknownKeys, ZodDef,
};
pub use error::{Error, HookError, Result};
pub use hooks::{json_description, Override, OverrideHook, OverrideRequest, PostProcessHook};
pub use options::{
    Base64Strategy, DateStrategy, DateStrategySetting, EffectStrategy, EmailStrategy,
    MapStrategy, NameStrategy, Options, PatternStrategy, PipeStrategy, RefStrategy,
    RemoveAdditionalStrategy,
};
pub use parse_def::parse_def;
pub use parsers::patterns;
pub use refs::{Refs, SeenItem};
pub use schema::{AdditionalProperties, InstanceType, JsonSchema, SchemaItems, SchemaType, DRAFT_07};
