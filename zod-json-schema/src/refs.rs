//! Traversal state shared by the dispatcher and the type parsers.

use crate::def::{NodeId, SchemaArena, SchemaNode};
use crate::error::Result;
use crate::options::{Options, RefStrategy};
use crate::schema::JsonSchema;

/// First visit of a definition.
#[derive(Debug, Clone, PartialEq)]
pub struct SeenItem {
    /// Pointer segments where the definition was first compiled
    pub path: Vec<String>,
    /// Fragment produced there, `None` while still being compiled or when
    /// the definition compiled to nothing
    pub json_schema: Option<JsonSchema>,
}

/// Compilation context for one top-level compile call.
///
/// The current path follows a strict stack discipline: every descent pushes
/// segments and pops exactly those on return. The seen table is indexed by
/// node id and is filled before a node's children are visited, which is what
/// breaks cycles.
pub struct Refs<'a> {
    arena: &'a SchemaArena,
    options: &'a Options,
    current_path: Vec<String>,
    property_path: Option<Vec<String>>,
    seen: Vec<Option<SeenItem>>,
}

impl<'a> Refs<'a> {
    /// Fresh context rooted at the options' base path.
    pub fn new(arena: &'a SchemaArena, options: &'a Options) -> Self {
        Self {
            arena,
            options,
            current_path: options.base_path.clone(),
            property_path: None,
            seen: vec![None; arena.len()],
        }
    }

    pub fn arena(&self) -> &'a SchemaArena {
        self.arena
    }

    pub fn options(&self) -> &'a Options {
        self.options
    }

    /// Look up a node in the arena.
    pub fn node(&self, id: NodeId) -> Result<&'a SchemaNode> {
        self.arena.get(id)
    }

    /// Pointer segments of the location being compiled.
    pub fn current_path(&self) -> &[String] {
        &self.current_path
    }

    /// Path of the object property currently being compiled, if any.
    pub fn property_path(&self) -> Option<&[String]> {
        self.property_path.as_deref()
    }

    /// First-visit entry of `id`.
    pub fn seen(&self, id: NodeId) -> Option<&SeenItem> {
        self.seen.get(id.index()).and_then(Option::as_ref)
    }

    /// Record `id` as seen at `path` with no fragment yet.
    pub(crate) fn mark_seen_at(&mut self, id: NodeId, path: Vec<String>) {
        if let Some(slot) = self.seen.get_mut(id.index()) {
            *slot = Some(SeenItem {
                path,
                json_schema: None,
            });
        }
    }

    /// Record `id` as seen at the current path.
    pub(crate) fn mark_seen(&mut self, id: NodeId) {
        self.mark_seen_at(id, self.current_path.clone());
    }

    /// Cache the fragment compiled for `id`.
    pub(crate) fn store(&mut self, id: NodeId, schema: Option<JsonSchema>) {
        if let Some(Some(item)) = self.seen.get_mut(id.index()) {
            item.json_schema = schema;
        }
    }

    /// Run `f` with `segments` appended to the current path.
    pub(crate) fn descend<T>(&mut self, segments: &[&str], f: impl FnOnce(&mut Self) -> T) -> T {
        let depth = self.current_path.len();
        self.current_path
            .extend(segments.iter().map(|segment| segment.to_string()));
        let result = f(self);
        self.current_path.truncate(depth);
        result
    }

    /// Run `f` at `segments` below the current path, marking that location
    /// as an object property slot.
    pub(crate) fn descend_property<T>(
        &mut self,
        segments: &[&str],
        f: impl FnOnce(&mut Self) -> T,
    ) -> T {
        self.descend(segments, |refs| {
            let previous = refs.property_path.replace(refs.current_path.clone());
            let result = f(refs);
            refs.property_path = previous;
            result
        })
    }

    /// Run `f` with the current path replaced by `path`.
    pub(crate) fn at_path<T>(&mut self, path: Vec<String>, f: impl FnOnce(&mut Self) -> T) -> T {
        let previous = std::mem::replace(&mut self.current_path, path);
        let result = f(self);
        self.current_path = previous;
        result
    }

    /// Whether the current location is exactly the active property slot.
    pub(crate) fn at_property(&self) -> bool {
        self.property_path.as_deref() == Some(self.current_path.as_slice())
    }

    /// Render a repeat visit of `item` under the active `$ref` strategy.
    ///
    /// `None` means the definition should be compiled again in place.
    pub(crate) fn reference_to(&self, item: &SeenItem) -> Option<JsonSchema> {
        match self.options.ref_strategy {
            RefStrategy::Root => Some(JsonSchema::reference(json_pointer(&item.path))),
            RefStrategy::Relative => Some(JsonSchema::reference(relative_path(
                &self.current_path,
                &item.path,
            ))),
            RefStrategy::None | RefStrategy::Seen => {
                // A revisit at the same path can only come from a chain of
                // pass-through wrappers leading back to the node itself.
                if self.current_path.starts_with(&item.path) {
                    tracing::warn!(
                        "Recursive reference detected at {}! Defaulting to any",
                        self.current_path.join("/")
                    );
                    return Some(JsonSchema::any());
                }
                match self.options.ref_strategy {
                    RefStrategy::Seen => Some(JsonSchema::any()),
                    _ => None,
                }
            }
        }
    }
}

/// Render path segments as a JSON pointer, escaping `~` and `/` in each
/// segment (RFC 6901).
pub(crate) fn json_pointer(segments: &[String]) -> String {
    segments
        .iter()
        .map(|segment| escape_segment(segment))
        .collect::<Vec<_>>()
        .join("/")
}

fn escape_segment(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}

/// Relative JSON pointer from `from` to `to`: the number of levels to walk
/// up to the common ancestor, followed by the remaining segments of `to`.
pub(crate) fn relative_path(from: &[String], to: &[String]) -> String {
    let common = from
        .iter()
        .zip(to)
        .take_while(|(a, b)| a == b)
        .count();
    std::iter::once((from.len() - common).to_string())
        .chain(to[common..].iter().map(|segment| escape_segment(segment)))
        .collect::<Vec<_>>()
        .join("/")
}
