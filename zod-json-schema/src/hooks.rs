//! Caller-supplied extension points.
//!
//! An override hook runs before the compiler looks at a node and may replace
//! or remove its fragment. A post-process hook runs after a fragment is built
//! and may rewrite it. Both are plain functions stored in
//! [`Options`](crate::Options); errors they return abort compilation.

use std::sync::Arc;

use serde_json::Value;

use crate::def::{NodeId, SchemaNode};
use crate::error::HookError;
use crate::refs::{Refs, SeenItem};
use crate::schema::JsonSchema;

/// Override hook signature.
pub type OverrideHook =
    Arc<dyn Fn(&OverrideRequest<'_>) -> Result<Override, HookError> + Send + Sync>;

/// Post-process hook signature.
pub type PostProcessHook = Arc<
    dyn Fn(Option<JsonSchema>, &SchemaNode, &Refs<'_>) -> Result<Option<JsonSchema>, HookError>
        + Send
        + Sync,
>;

/// What an override hook sees.
pub struct OverrideRequest<'a> {
    pub id: NodeId,
    pub node: &'a SchemaNode,
    /// Read-only view of the traversal state
    pub refs: &'a Refs<'a>,
    /// Entry for `id` if it was visited before
    pub seen: Option<&'a SeenItem>,
    pub force_resolution: bool,
}

/// Decision returned by an override hook.
#[derive(Debug, Clone, PartialEq)]
pub enum Override {
    /// Use this fragment verbatim.
    Replace(JsonSchema),
    /// Omit the fragment.
    Remove,
    /// Compile the node normally.
    Ignore,
}

/// Post-processor that merges a JSON-object description into the fragment.
///
/// A description such as `{"title": "Name", "examples": ["a"]}` becomes
/// keywords on the fragment. Descriptions that are not JSON objects, or whose
/// keys do not fit the keyword they name, leave the fragment as it is.
///
/// # Example
/// ```rust
/// use zod_json_schema::{compile, json_description, Options, SchemaArena};
///
/// let mut arena = SchemaArena::new();
/// let base = arena.string();
/// let id = arena.describe(base, r#"{"title":"Name"}"#).unwrap();
///
/// let options = Options::new().with_post_process(json_description);
/// let schema = compile(&arena, id, options).unwrap();
/// assert_eq!(schema.title.as_deref(), Some("Name"));
/// ```
pub fn json_description(
    schema: Option<JsonSchema>,
    node: &SchemaNode,
    _refs: &Refs<'_>,
) -> Result<Option<JsonSchema>, HookError> {
    let Some(schema) = schema else {
        return Ok(None);
    };
    let extra = match node.description.as_deref().map(serde_json::from_str::<Value>) {
        Some(Ok(Value::Object(extra))) => extra,
        _ => return Ok(Some(schema)),
    };

    let mut merged = match serde_json::to_value(&schema)? {
        Value::Object(map) => map,
        _ => return Ok(Some(schema)),
    };
    merged.extend(extra);
    match serde_json::from_value(Value::Object(merged)) {
        Ok(merged) => Ok(Some(merged)),
        Err(err) => {
            tracing::debug!(error = %err, "ignoring description that does not fit the schema");
            Ok(Some(schema))
        }
    }
}
