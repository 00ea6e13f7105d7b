//! The recursive dispatcher.

use crate::def::NodeId;
use crate::error::{Error, Result};
use crate::hooks::{Override, OverrideRequest};
use crate::parsers::{select_parser, Parsed};
use crate::refs::Refs;
use crate::schema::JsonSchema;

/// Compile one node at the context's current path.
///
/// Returns `None` when the node has no JSON Schema form, in which case the
/// parent omits it. With `force_resolution` set, a node that was seen before
/// is compiled again instead of being turned into a reference.
pub fn parse_def(
    id: NodeId,
    refs: &mut Refs<'_>,
    force_resolution: bool,
) -> Result<Option<JsonSchema>> {
    let node = refs.node(id)?;
    let options = refs.options();

    if let Some(hook) = &options.override_hook {
        let request = OverrideRequest {
            id,
            node,
            refs: &*refs,
            seen: refs.seen(id),
            force_resolution,
        };
        match hook(&request).map_err(Error::Hook)? {
            Override::Replace(schema) => return Ok(Some(schema)),
            Override::Remove => return Ok(None),
            Override::Ignore => {}
        }
    }

    if !force_resolution {
        if let Some(reference) = refs.seen(id).and_then(|item| refs.reference_to(item)) {
            tracing::trace!(node = %id, path = %refs.current_path().join("/"), "reusing seen definition");
            return Ok(Some(reference));
        }
    }

    refs.mark_seen(id);
    tracing::trace!(
        node = %id,
        kind = node.def.type_name(),
        path = %refs.current_path().join("/"),
        "compiling definition"
    );

    let schema = match select_parser(id, node, refs)? {
        Parsed::Schema(schema) => schema,
        Parsed::Deferred(target) => parse_def(target, refs, false)?,
    };
    let schema = schema.map(|mut schema| {
        if let Some(description) = node.description.as_deref().filter(|d| !d.is_empty()) {
            schema.description = Some(description.to_string());
        }
        schema
    });

    if let Some(post_process) = &options.post_process {
        let processed = post_process(schema.clone(), node, &*refs).map_err(Error::Hook)?;
        refs.store(id, schema);
        return Ok(processed);
    }

    refs.store(id, schema.clone());
    Ok(schema)
}
