//! Top-level compilation entry point.

use indexmap::IndexMap;

use crate::def::{NodeId, SchemaArena};
use crate::error::Result;
use crate::options::{NameStrategy, Options, RefStrategy};
use crate::parse_def::parse_def;
use crate::refs::{json_pointer, Refs};
use crate::schema::{JsonSchema, DRAFT_07};

/// Compile the tree rooted at `root` into a draft-07 JSON Schema document.
///
/// `options` may be an [`Options`] value or a bare name (`"User"`), which
/// stores the root under the definitions section and makes the document a
/// `$ref` to it.
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use zod_json_schema::{compile, SchemaArena};
///
/// let mut arena = SchemaArena::new();
/// let name = arena.string();
/// let age = arena.number();
/// let age = arena.optional(age);
/// let user = arena.object([("name", name), ("age", age)]);
///
/// let schema = compile(&arena, user, "User").unwrap();
/// assert_eq!(
///     schema.to_value().unwrap(),
///     json!({
///         "$schema": "http://json-schema.org/draft-07/schema#",
///         "$ref": "#/definitions/User",
///         "definitions": {
///             "User": {
///                 "type": "object",
///                 "properties": {
///                     "name": { "type": "string" },
///                     "age": { "type": "number" }
///                 },
///                 "required": ["name"],
///                 "additionalProperties": false
///             }
///         }
///     })
/// );
/// ```
pub fn compile(
    arena: &SchemaArena,
    root: NodeId,
    options: impl Into<Options>,
) -> Result<JsonSchema> {
    let options = options.into();
    let mut refs = Refs::new(arena, &options);

    tracing::debug!(
        root = %root,
        nodes = arena.len(),
        definitions = options.definitions.len(),
        "compiling schema"
    );

    // Seed every named definition so the main tree refers to it.
    for (name, &id) in &options.definitions {
        refs.mark_seen_at(id, definition_path(&options, name));
    }

    let mut definitions = IndexMap::with_capacity(options.definitions.len() + 1);
    for (name, &id) in &options.definitions {
        let schema = refs.at_path(definition_path(&options, name), |refs| {
            parse_def(id, refs, true)
        })?;
        definitions.insert(name.clone(), schema.unwrap_or_default());
    }

    let name = match options.name_strategy {
        NameStrategy::Ref => options.name.as_deref(),
        NameStrategy::Title => None,
    };

    let mut main = match name {
        Some(name) => refs.at_path(definition_path(&options, name), |refs| {
            parse_def(root, refs, false)
        })?,
        None => parse_def(root, &mut refs, false)?,
    }
    .unwrap_or_default();

    if options.name_strategy == NameStrategy::Title {
        if let Some(title) = &options.name {
            main.title = Some(title.clone());
        }
    }

    let mut document = match name {
        None => {
            if !definitions.is_empty() {
                main.extensions.insert(
                    options.definition_path.clone(),
                    serde_json::to_value(&definitions)?,
                );
            }
            main
        }
        Some(name) => {
            definitions.insert(name.to_string(), main);
            let mut pointer = match options.ref_strategy {
                RefStrategy::Relative => Vec::new(),
                _ => options.base_path.clone(),
            };
            pointer.push(options.definition_path.clone());
            pointer.push(name.to_string());

            let mut document = JsonSchema::reference(json_pointer(&pointer));
            document.extensions.insert(
                options.definition_path.clone(),
                serde_json::to_value(&definitions)?,
            );
            document
        }
    };

    document.schema = Some(DRAFT_07.to_string());
    Ok(document)
}

fn definition_path(options: &Options, name: &str) -> Vec<String> {
    let mut path = options.base_path.clone();
    path.push(options.definition_path.clone());
    path.push(name.to_string());
    path
}
