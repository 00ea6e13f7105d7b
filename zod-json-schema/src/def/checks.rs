//! Refinement checks carried by primitive definitions.
//!
//! Each check mirrors one chained refinement on the authoring side
//! (`.min(5)`, `.email()`, `.int()`, ...). The compiler maps them onto
//! JSON Schema keywords; checks that only transform values are ignored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// IP / CIDR version restriction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IpVersion {
    V4,
    V6,
}

/// String refinement check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum StringCheck {
    // ==========================================================================
    // Length
    // ==========================================================================
    /// Minimum length: `.min(n)`
    Min(u64),

    /// Maximum length: `.max(n)`
    Max(u64),

    /// Exact length: `.length(n)`
    Length(u64),

    // ==========================================================================
    // Formats
    // ==========================================================================
    /// Email address: `.email()`
    Email,

    /// URL: `.url()`
    Url,

    /// UUID: `.uuid()`
    Uuid,

    /// ISO date-time: `.datetime()`
    Datetime,

    /// ISO date: `.date()`
    Date,

    /// ISO time: `.time()`
    Time,

    /// ISO duration: `.duration()`
    Duration,

    /// IP address, optionally restricted to one version: `.ip()`
    Ip(Option<IpVersion>),

    /// CIDR block, optionally restricted to one version: `.cidr()`
    Cidr(Option<IpVersion>),

    /// Base64 payload: `.base64()`
    Base64,

    /// URL-safe base64 payload: `.base64url()`
    Base64Url,

    /// JSON web token: `.jwt()`
    Jwt,

    // ==========================================================================
    // Patterns
    // ==========================================================================
    /// CUID: `.cuid()`
    Cuid,

    /// CUID2: `.cuid2()`
    Cuid2,

    /// ULID: `.ulid()`
    Ulid,

    /// Nano ID: `.nanoid()`
    Nanoid,

    /// Emoji-only string: `.emoji()`
    Emoji,

    /// Regular expression with optional flags (`i`, `m`, `s`): `.regex(/p/f)`
    Regex {
        pattern: String,
        #[serde(default, skip_serializing_if = "String::is_empty")]
        flags: String,
    },

    /// Literal prefix: `.startsWith(s)`
    StartsWith(String),

    /// Literal suffix: `.endsWith(s)`
    EndsWith(String),

    /// Literal substring: `.includes(s)`
    Includes(String),

    // ==========================================================================
    // Transforms (no schema effect)
    // ==========================================================================
    /// `.trim()`
    Trim,

    /// `.toLowerCase()`
    ToLowerCase,

    /// `.toUpperCase()`
    ToUpperCase,
}

impl StringCheck {
    /// Regex check without flags.
    pub fn regex(pattern: impl Into<String>) -> Self {
        Self::Regex {
            pattern: pattern.into(),
            flags: String::new(),
        }
    }

    /// Regex check with flags such as `"i"` or `"ms"`.
    pub fn regex_with_flags(pattern: impl Into<String>, flags: impl Into<String>) -> Self {
        Self::Regex {
            pattern: pattern.into(),
            flags: flags.into(),
        }
    }
}

/// Numeric refinement check, shared by numbers and bigints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum NumberCheck {
    /// Integer only: `.int()`
    Int,

    /// Lower bound: `.gte(n)` when inclusive, `.gt(n)` otherwise
    Min { value: f64, inclusive: bool },

    /// Upper bound: `.lte(n)` when inclusive, `.lt(n)` otherwise
    Max { value: f64, inclusive: bool },

    /// Multiple of: `.multipleOf(n)`
    MultipleOf { value: f64 },

    /// Finite only: `.finite()`
    Finite,
}

impl NumberCheck {
    /// `.gte(value)`
    pub fn gte(value: f64) -> Self {
        Self::Min {
            value,
            inclusive: true,
        }
    }

    /// `.gt(value)`
    pub fn gt(value: f64) -> Self {
        Self::Min {
            value,
            inclusive: false,
        }
    }

    /// `.lte(value)`
    pub fn lte(value: f64) -> Self {
        Self::Max {
            value,
            inclusive: true,
        }
    }

    /// `.lt(value)`
    pub fn lt(value: f64) -> Self {
        Self::Max {
            value,
            inclusive: false,
        }
    }
}

/// Date refinement check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum DateCheck {
    /// Earliest accepted instant: `.min(date)`
    Min(DateTime<Utc>),

    /// Latest accepted instant: `.max(date)`
    Max(DateTime<Utc>),
}
