//! Compiler configuration.
//!
//! [`Options`] collects every knob the compiler understands. All fields have
//! defaults, so `Options::default()` (or a bare name via
//! `Options::from("User")`) is enough for most callers.
//!
//! # Example
//! ```rust
//! use zod_json_schema::{Options, RefStrategy};
//!
//! let options = Options::new()
//!     .with_name("User")
//!     .with_ref_strategy(RefStrategy::Relative)
//!     .with_strict_unions(true);
//! assert_eq!(options.name.as_deref(), Some("User"));
//! ```

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::def::{NodeId, SchemaNode};
use crate::error::HookError;
use crate::hooks::{Override, OverrideHook, OverrideRequest, PostProcessHook};
use crate::refs::Refs;
use crate::schema::JsonSchema;

/// How repeated definitions are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RefStrategy {
    /// `$ref` to the absolute pointer of the first occurrence.
    #[default]
    Root,
    /// `$ref` relative to the referencing location.
    Relative,
    /// Inline every repeat; true cycles degrade to `{}`.
    None,
    /// Like `None`, but every repeat becomes `{}`.
    Seen,
}

/// How refinements and transforms are compiled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EffectStrategy {
    /// Compile the schema the effect wraps.
    #[default]
    Input,
    /// Emit `{}`.
    Any,
}

/// Which stages of a pipeline are compiled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PipeStrategy {
    Input,
    Output,
    /// `allOf` of both stages.
    #[default]
    All,
}

/// Encoding of date values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DateStrategy {
    #[default]
    #[serde(rename = "format:date-time")]
    FormatDateTime,
    #[serde(rename = "format:date")]
    FormatDate,
    /// Same output as `format:date-time`.
    #[serde(rename = "string")]
    String,
    /// Unix time in milliseconds.
    #[serde(rename = "integer")]
    Integer,
}

/// A single date strategy, or a list compiled to `anyOf`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DateStrategySetting {
    Single(DateStrategy),
    List(Vec<DateStrategy>),
}

impl Default for DateStrategySetting {
    fn default() -> Self {
        Self::Single(DateStrategy::default())
    }
}

impl From<DateStrategy> for DateStrategySetting {
    fn from(strategy: DateStrategy) -> Self {
        Self::Single(strategy)
    }
}

impl From<Vec<DateStrategy>> for DateStrategySetting {
    fn from(strategies: Vec<DateStrategy>) -> Self {
        Self::List(strategies)
    }
}

/// Encoding of map definitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MapStrategy {
    /// Array of `[key, value]` pairs.
    #[default]
    Entries,
    /// Same as a record.
    Record,
}

/// What a stripping object says about unknown keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RemoveAdditionalStrategy {
    /// Unknown keys are rejected, matching the parsed output.
    #[default]
    Passthrough,
    /// Unknown keys are allowed, matching the accepted input.
    Strict,
}

/// Whether literal string checks are regex-escaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PatternStrategy {
    #[default]
    Escape,
    Preserve,
}

/// Encoding of email checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum EmailStrategy {
    #[default]
    #[serde(rename = "format:email")]
    FormatEmail,
    #[serde(rename = "format:idn-email")]
    FormatIdnEmail,
    #[serde(rename = "pattern:zod")]
    PatternZod,
}

/// Encoding of base64 checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Base64Strategy {
    #[default]
    #[serde(rename = "contentEncoding:base64")]
    ContentEncodingBase64,
    #[serde(rename = "format:binary")]
    FormatBinary,
    #[serde(rename = "pattern:zod")]
    PatternZod,
}

/// How `name` is applied to the root schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NameStrategy {
    /// Store the root under the definitions section and `$ref` it.
    #[default]
    Ref,
    /// Set the root's `title`.
    Title,
}

/// Compiler options.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Options {
    /// Name of the root schema
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub name_strategy: NameStrategy,
    /// Pointer segments every path starts from (default: `["#"]`)
    pub base_path: Vec<String>,
    #[serde(rename = "$refStrategy")]
    pub ref_strategy: RefStrategy,
    pub effect_strategy: EffectStrategy,
    pub pipe_strategy: PipeStrategy,
    pub date_strategy: DateStrategySetting,
    pub map_strategy: MapStrategy,
    pub remove_additional_strategy: RemoveAdditionalStrategy,
    /// Value emitted where unknown keys are allowed (default: `true`)
    pub allowed_additional_properties: Option<bool>,
    /// Value emitted where unknown keys are rejected (default: `false`)
    pub rejected_additional_properties: Option<bool>,
    /// Key of the definitions section (default: `definitions`)
    pub definition_path: String,
    /// Definitions compiled into the definitions section, in order
    pub definitions: IndexMap<String, NodeId>,
    /// Drop `{}` members from `anyOf` unions
    pub strict_unions: bool,
    /// Accepted for compatibility; check messages are not emitted
    pub error_messages: bool,
    pub pattern_strategy: PatternStrategy,
    /// Rewrite `i`, `m` and `s` regex flags into the pattern
    pub apply_regex_flags: bool,
    pub email_strategy: EmailStrategy,
    pub base64_strategy: Base64Strategy,
    #[serde(skip)]
    pub override_hook: Option<OverrideHook>,
    #[serde(skip)]
    pub post_process: Option<PostProcessHook>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            name: None,
            name_strategy: NameStrategy::default(),
            base_path: vec!["#".to_string()],
            ref_strategy: RefStrategy::default(),
            effect_strategy: EffectStrategy::default(),
            pipe_strategy: PipeStrategy::default(),
            date_strategy: DateStrategySetting::default(),
            map_strategy: MapStrategy::default(),
            remove_additional_strategy: RemoveAdditionalStrategy::default(),
            allowed_additional_properties: Some(true),
            rejected_additional_properties: Some(false),
            definition_path: "definitions".to_string(),
            definitions: IndexMap::new(),
            strict_unions: false,
            error_messages: false,
            pattern_strategy: PatternStrategy::default(),
            apply_regex_flags: false,
            email_strategy: EmailStrategy::default(),
            base64_strategy: Base64Strategy::default(),
            override_hook: None,
            post_process: None,
        }
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("name", &self.name)
            .field("name_strategy", &self.name_strategy)
            .field("base_path", &self.base_path)
            .field("ref_strategy", &self.ref_strategy)
            .field("effect_strategy", &self.effect_strategy)
            .field("pipe_strategy", &self.pipe_strategy)
            .field("date_strategy", &self.date_strategy)
            .field("map_strategy", &self.map_strategy)
            .field("remove_additional_strategy", &self.remove_additional_strategy)
            .field("definition_path", &self.definition_path)
            .field("definitions", &self.definitions)
            .field("strict_unions", &self.strict_unions)
            .field("pattern_strategy", &self.pattern_strategy)
            .field("apply_regex_flags", &self.apply_regex_flags)
            .field("email_strategy", &self.email_strategy)
            .field("base64_strategy", &self.base64_strategy)
            .field("override_hook", &self.override_hook.is_some())
            .field("post_process", &self.post_process.is_some())
            .finish_non_exhaustive()
    }
}

impl From<&str> for Options {
    fn from(name: &str) -> Self {
        Self::new().with_name(name)
    }
}

impl From<String> for Options {
    fn from(name: String) -> Self {
        Self::new().with_name(name)
    }
}

impl Options {
    /// Create options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the root schema name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set how the name is applied.
    pub fn with_name_strategy(mut self, strategy: NameStrategy) -> Self {
        self.name_strategy = strategy;
        self
    }

    /// Set the base path segments.
    pub fn with_base_path<S: Into<String>>(mut self, path: impl IntoIterator<Item = S>) -> Self {
        self.base_path = path.into_iter().map(Into::into).collect();
        self
    }

    /// Set the `$ref` strategy.
    ///
    /// # Example
    /// ```rust
    /// use zod_json_schema::{Options, RefStrategy};
    ///
    /// let options = Options::new().with_ref_strategy(RefStrategy::None);
    /// assert_eq!(options.ref_strategy, RefStrategy::None);
    /// ```
    pub fn with_ref_strategy(mut self, strategy: RefStrategy) -> Self {
        self.ref_strategy = strategy;
        self
    }

    /// Set the effect strategy.
    pub fn with_effect_strategy(mut self, strategy: EffectStrategy) -> Self {
        self.effect_strategy = strategy;
        self
    }

    /// Set the pipe strategy.
    pub fn with_pipe_strategy(mut self, strategy: PipeStrategy) -> Self {
        self.pipe_strategy = strategy;
        self
    }

    /// Set the date strategy, or a list of them.
    pub fn with_date_strategy(mut self, strategy: impl Into<DateStrategySetting>) -> Self {
        self.date_strategy = strategy.into();
        self
    }

    /// Set the map strategy.
    pub fn with_map_strategy(mut self, strategy: MapStrategy) -> Self {
        self.map_strategy = strategy;
        self
    }

    /// Set the strategy for stripping objects.
    pub fn with_remove_additional_strategy(mut self, strategy: RemoveAdditionalStrategy) -> Self {
        self.remove_additional_strategy = strategy;
        self
    }

    /// Set the values emitted for allowed and rejected unknown keys.
    ///
    /// `None` omits `additionalProperties` in that case.
    pub fn with_additional_properties(
        mut self,
        allowed: Option<bool>,
        rejected: Option<bool>,
    ) -> Self {
        self.allowed_additional_properties = allowed;
        self.rejected_additional_properties = rejected;
        self
    }

    /// Set the key of the definitions section.
    pub fn with_definition_path(mut self, path: impl Into<String>) -> Self {
        self.definition_path = path.into();
        self
    }

    /// Add a named definition.
    pub fn with_definition(mut self, name: impl Into<String>, id: NodeId) -> Self {
        self.definitions.insert(name.into(), id);
        self
    }

    /// Drop unconstrained members from unions.
    pub fn with_strict_unions(mut self, enabled: bool) -> Self {
        self.strict_unions = enabled;
        self
    }

    /// Accept custom error messages.
    pub fn with_error_messages(mut self, enabled: bool) -> Self {
        self.error_messages = enabled;
        self
    }

    /// Set the pattern strategy.
    pub fn with_pattern_strategy(mut self, strategy: PatternStrategy) -> Self {
        self.pattern_strategy = strategy;
        self
    }

    /// Rewrite regex flags into patterns.
    pub fn with_apply_regex_flags(mut self, enabled: bool) -> Self {
        self.apply_regex_flags = enabled;
        self
    }

    /// Set the email strategy.
    pub fn with_email_strategy(mut self, strategy: EmailStrategy) -> Self {
        self.email_strategy = strategy;
        self
    }

    /// Set the base64 strategy.
    pub fn with_base64_strategy(mut self, strategy: Base64Strategy) -> Self {
        self.base64_strategy = strategy;
        self
    }

    /// Install an override hook.
    ///
    /// # Example
    /// ```rust
    /// use zod_json_schema::{JsonSchema, Options, Override, ZodDef};
    ///
    /// let options = Options::new().with_override(|request| {
    ///     Ok(match request.node.def {
    ///         ZodDef::Date(_) => Override::Replace(JsonSchema::any()),
    ///         _ => Override::Ignore,
    ///     })
    /// });
    /// assert!(options.override_hook.is_some());
    /// ```
    pub fn with_override<F>(mut self, hook: F) -> Self
    where
        F: Fn(&OverrideRequest<'_>) -> std::result::Result<Override, HookError>
            + Send
            + Sync
            + 'static,
    {
        self.override_hook = Some(Arc::new(hook));
        self
    }

    /// Install a post-process hook.
    pub fn with_post_process<F>(mut self, hook: F) -> Self
    where
        F: Fn(
                Option<JsonSchema>,
                &SchemaNode,
                &Refs<'_>,
            ) -> std::result::Result<Option<JsonSchema>, HookError>
            + Send
            + Sync
            + 'static,
    {
        self.post_process = Some(Arc::new(hook));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let options = Options::default();
        assert_eq!(options.base_path, vec!["#"]);
        assert_eq!(options.definition_path, "definitions");
        assert_eq!(options.ref_strategy, RefStrategy::Root);
        assert_eq!(options.pipe_strategy, PipeStrategy::All);
        assert_eq!(
            options.date_strategy,
            DateStrategySetting::Single(DateStrategy::FormatDateTime)
        );
        assert_eq!(options.allowed_additional_properties, Some(true));
        assert_eq!(options.rejected_additional_properties, Some(false));
    }

    #[test]
    fn test_name_shorthand() {
        let options = Options::from("Schema");
        assert_eq!(options.name.as_deref(), Some("Schema"));
        assert_eq!(options.ref_strategy, RefStrategy::Root);
    }

    #[test]
    fn test_deserialize_partial() {
        let options: Options = serde_json::from_value(json!({
            "name": "User",
            "$refStrategy": "relative",
            "dateStrategy": ["format:date", "integer"],
            "emailStrategy": "pattern:zod",
            "definitions": { "Id": 3 }
        }))
        .unwrap();

        assert_eq!(options.ref_strategy, RefStrategy::Relative);
        assert_eq!(
            options.date_strategy,
            DateStrategySetting::List(vec![DateStrategy::FormatDate, DateStrategy::Integer])
        );
        assert_eq!(options.email_strategy, EmailStrategy::PatternZod);
        assert_eq!(options.definitions.get("Id"), Some(&NodeId::from_index(3)));
        assert_eq!(options.definition_path, "definitions");
    }

    #[test]
    fn test_debug_hides_hooks() {
        let options = Options::new().with_post_process(|schema, _, _| Ok(schema));
        let debug = format!("{options:?}");
        assert!(debug.contains("post_process: true"));
    }
}
