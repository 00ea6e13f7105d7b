use crate::def::{IpVersion, StringCheck, StringDef};
use crate::options::{Base64Strategy, EmailStrategy, PatternStrategy};
use crate::refs::Refs;
use crate::schema::{InstanceType, JsonSchema};

/// Regex sources emitted for pattern-based string checks.
pub mod patterns {
    pub const CUID: &str = r"^[cC][^\s-]{8,}$";
    pub const CUID2: &str = r"^[0-9a-z]+$";
    pub const ULID: &str = r"^[0-9A-HJKMNP-TV-Z]{26}$";
    pub const NANOID: &str = r"^[a-zA-Z0-9_-]{21}$";
    pub const EMOJI: &str = r"^(\p{Extended_Pictographic}|\p{Emoji_Component})+$";
    pub const EMAIL: &str = r"^(?!\.)(?!.*\.\.)([a-zA-Z0-9_'+\-\.]*)[a-zA-Z0-9_+-]@([a-zA-Z0-9][a-zA-Z0-9\-]*\.)+[a-zA-Z]{2,}$";
    pub const BASE64: &str = r"^([0-9a-zA-Z+/]{4})*(([0-9a-zA-Z+/]{2}==)|([0-9a-zA-Z+/]{3}=))?$";
    pub const BASE64URL: &str = r"^([0-9a-zA-Z-_]{4})*(([0-9a-zA-Z-_]{2}(==)?)|([0-9a-zA-Z-_]{3}(=)?))?$";
    pub const JWT: &str = r"^[A-Za-z0-9-_]+\.[A-Za-z0-9-_]+\.[A-Za-z0-9-_]*$";
    pub const IPV4_CIDR: &str = r"^(?:(?:25[0-5]|2[0-4][0-9]|1[0-9][0-9]|[1-9][0-9]|[0-9])\.){3}(?:25[0-5]|2[0-4][0-9]|1[0-9][0-9]|[1-9][0-9]|[0-9])\/(3[0-2]|[12]?[0-9])$";
    pub const IPV6_CIDR: &str = r"^(([a-f0-9]{1,4}:){7}|::([a-f0-9]{1,4}:){0,6}|([a-f0-9]{1,4}:){1}:([a-f0-9]{1,4}:){0,5}|([a-f0-9]{1,4}:){2}:([a-f0-9]{1,4}:){0,4}|([a-f0-9]{1,4}:){3}:([a-f0-9]{1,4}:){0,3}|([a-f0-9]{1,4}:){4}:([a-f0-9]{1,4}:){0,2}|([a-f0-9]{1,4}:){5}:([a-f0-9]{1,4}:){0,1})([a-f0-9]{1,4}|(((25[0-5])|(2[0-4][0-9])|(1[0-9]{2})|([0-9]{1,2}))\.){3}((25[0-5])|(2[0-4][0-9])|(1[0-9]{2})|([0-9]{1,2})))\/(12[0-8]|1[01][0-9]|[1-9]?[0-9])$";
}

pub(crate) fn parse_string_def(def: &StringDef, refs: &Refs<'_>) -> JsonSchema {
    let options = refs.options();
    let mut schema = JsonSchema::typed(InstanceType::String);

    for check in &def.checks {
        match check {
            StringCheck::Min(n) => {
                schema.min_length = Some(schema.min_length.map_or(*n, |min| min.max(*n)));
            }
            StringCheck::Max(n) => {
                schema.max_length = Some(schema.max_length.map_or(*n, |max| max.min(*n)));
            }
            StringCheck::Length(n) => {
                schema.min_length = Some(schema.min_length.map_or(*n, |min| min.max(*n)));
                schema.max_length = Some(schema.max_length.map_or(*n, |max| max.min(*n)));
            }
            StringCheck::Email => match options.email_strategy {
                EmailStrategy::FormatEmail => add_format(&mut schema, "email"),
                EmailStrategy::FormatIdnEmail => add_format(&mut schema, "idn-email"),
                EmailStrategy::PatternZod => add_pattern(&mut schema, patterns::EMAIL.to_string()),
            },
            StringCheck::Url => add_format(&mut schema, "uri"),
            StringCheck::Uuid => add_format(&mut schema, "uuid"),
            StringCheck::Datetime => add_format(&mut schema, "date-time"),
            StringCheck::Date => add_format(&mut schema, "date"),
            StringCheck::Time => add_format(&mut schema, "time"),
            StringCheck::Duration => add_format(&mut schema, "duration"),
            StringCheck::Ip(version) => {
                if *version != Some(IpVersion::V6) {
                    add_format(&mut schema, "ipv4");
                }
                if *version != Some(IpVersion::V4) {
                    add_format(&mut schema, "ipv6");
                }
            }
            StringCheck::Cidr(version) => {
                if *version != Some(IpVersion::V6) {
                    add_pattern(&mut schema, patterns::IPV4_CIDR.to_string());
                }
                if *version != Some(IpVersion::V4) {
                    add_pattern(&mut schema, patterns::IPV6_CIDR.to_string());
                }
            }
            StringCheck::Base64 => match options.base64_strategy {
                Base64Strategy::ContentEncodingBase64 => {
                    schema.content_encoding = Some("base64".to_string());
                }
                Base64Strategy::FormatBinary => add_format(&mut schema, "binary"),
                Base64Strategy::PatternZod => add_pattern(&mut schema, patterns::BASE64.to_string()),
            },
            StringCheck::Base64Url => add_pattern(&mut schema, patterns::BASE64URL.to_string()),
            StringCheck::Jwt => add_pattern(&mut schema, patterns::JWT.to_string()),
            StringCheck::Cuid => add_pattern(&mut schema, patterns::CUID.to_string()),
            StringCheck::Cuid2 => add_pattern(&mut schema, patterns::CUID2.to_string()),
            StringCheck::Ulid => add_pattern(&mut schema, patterns::ULID.to_string()),
            StringCheck::Nanoid => add_pattern(&mut schema, patterns::NANOID.to_string()),
            StringCheck::Emoji => add_pattern(&mut schema, patterns::EMOJI.to_string()),
            StringCheck::Regex { pattern, flags } => {
                let pattern = if options.apply_regex_flags {
                    apply_regex_flags(pattern, flags)
                } else {
                    pattern.clone()
                };
                add_pattern(&mut schema, pattern);
            }
            StringCheck::StartsWith(value) => {
                add_pattern(&mut schema, format!("^{}", escape_literal(value, refs)));
            }
            StringCheck::EndsWith(value) => {
                add_pattern(&mut schema, format!("{}$", escape_literal(value, refs)));
            }
            StringCheck::Includes(value) => add_pattern(&mut schema, escape_literal(value, refs)),
            StringCheck::Trim | StringCheck::ToLowerCase | StringCheck::ToUpperCase => {}
        }
    }

    schema
}

fn escape_literal(value: &str, refs: &Refs<'_>) -> String {
    match refs.options().pattern_strategy {
        PatternStrategy::Escape => escape_non_alphanumeric(value),
        PatternStrategy::Preserve => value.to_string(),
    }
}

fn escape_non_alphanumeric(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if !c.is_ascii_alphanumeric() {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Set `format`, or bundle several formats into `anyOf`.
fn add_format(schema: &mut JsonSchema, format: &str) {
    let bundled = schema
        .any_of
        .as_ref()
        .is_some_and(|any_of| any_of.iter().any(|s| s.format.is_some()));

    if schema.format.is_none() && !bundled {
        schema.format = Some(format.to_string());
        return;
    }

    let any_of = schema.any_of.get_or_insert_with(Vec::new);
    if let Some(existing) = schema.format.take() {
        any_of.push(JsonSchema {
            format: Some(existing),
            ..JsonSchema::default()
        });
    }
    any_of.push(JsonSchema {
        format: Some(format.to_string()),
        ..JsonSchema::default()
    });
}

/// Set `pattern`, or bundle several patterns into `allOf`.
fn add_pattern(schema: &mut JsonSchema, pattern: String) {
    let bundled = schema
        .all_of
        .as_ref()
        .is_some_and(|all_of| all_of.iter().any(|s| s.pattern.is_some()));

    if schema.pattern.is_none() && !bundled {
        schema.pattern = Some(pattern);
        return;
    }

    let all_of = schema.all_of.get_or_insert_with(Vec::new);
    if let Some(existing) = schema.pattern.take() {
        all_of.push(JsonSchema {
            pattern: Some(existing),
            ..JsonSchema::default()
        });
    }
    all_of.push(JsonSchema {
        pattern: Some(pattern),
        ..JsonSchema::default()
    });
}

/// Rewrite the `i`, `m` and `s` flags into an equivalent flag-free pattern.
///
/// Other flags are dropped. The rewrite tracks escapes and character classes
/// but does not parse the pattern, so exotic constructs may come out wrong;
/// every rewrite is logged at `debug` with its source and result.
pub(crate) fn apply_regex_flags(source: &str, flags: &str) -> String {
    let case_insensitive = flags.contains('i');
    let multiline = flags.contains('m');
    let dot_all = flags.contains('s');
    if !case_insensitive && !multiline && !dot_all {
        return source.to_string();
    }

    let chars: Vec<char> = if case_insensitive {
        source.to_lowercase().chars().collect()
    } else {
        source.chars().collect()
    };

    let mut pattern = String::with_capacity(source.len() * 2);
    let mut escaped = false;
    let mut in_class = false;
    let mut in_range = false;

    for (i, &c) in chars.iter().enumerate() {
        if escaped {
            pattern.push(c);
            escaped = false;
            continue;
        }

        if case_insensitive && c.is_ascii_lowercase() {
            if !in_class {
                pattern.push('[');
                pattern.push(c);
                pattern.push(c.to_ascii_uppercase());
                pattern.push(']');
            } else if in_range {
                pattern.push(c);
                if let Some(&start) = i.checked_sub(2).and_then(|j| chars.get(j)) {
                    pattern.push(start.to_ascii_uppercase());
                    pattern.push('-');
                }
                pattern.push(c.to_ascii_uppercase());
                in_range = false;
            } else if chars.get(i + 1) == Some(&'-')
                && chars.get(i + 2).is_some_and(|next| next.is_ascii_lowercase())
            {
                pattern.push(c);
                in_range = true;
            } else {
                pattern.push(c);
                pattern.push(c.to_ascii_uppercase());
            }
            continue;
        }

        if multiline && c == '^' {
            pattern.push_str("(^|(?<=[\r\n]))");
            continue;
        }
        if multiline && c == '$' {
            pattern.push_str("($|(?=[\r\n]))");
            continue;
        }

        if dot_all && c == '.' {
            if in_class {
                pattern.push_str(".\r\n");
            } else {
                pattern.push_str("[.\r\n]");
            }
            continue;
        }

        pattern.push(c);
        if c == '\\' {
            escaped = true;
        } else if in_class && c == ']' {
            in_class = false;
        } else if !in_class && c == '[' {
            in_class = true;
        }
    }

    tracing::debug!(
        source,
        flags,
        pattern = %pattern,
        "rewrote regex flags into pattern"
    );
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::def::SchemaArena;
    use crate::options::Options;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    fn compile(checks: Vec<StringCheck>, options: Options) -> Value {
        let arena = SchemaArena::new();
        let refs = Refs::new(&arena, &options);
        parse_string_def(&StringDef { checks }, &refs)
            .to_value()
            .unwrap()
    }

    #[test]
    fn test_min_max_keep_tightest() {
        let schema = compile(
            vec![
                StringCheck::Min(1),
                StringCheck::Min(2),
                StringCheck::Max(3),
                StringCheck::Max(4),
            ],
            Options::default(),
        );
        assert_eq!(
            schema,
            json!({ "type": "string", "minLength": 2, "maxLength": 3 })
        );
    }

    #[test]
    fn test_length_with_min_and_max() {
        let schema = compile(
            vec![
                StringCheck::Min(20),
                StringCheck::Max(25),
                StringCheck::Length(15),
            ],
            Options::default(),
        );
        assert_eq!(
            schema,
            json!({ "type": "string", "minLength": 20, "maxLength": 15 })
        );
    }

    #[test]
    fn test_transforms_are_ignored() {
        let schema = compile(
            vec![
                StringCheck::Trim,
                StringCheck::ToLowerCase,
                StringCheck::ToUpperCase,
            ],
            Options::default(),
        );
        assert_eq!(schema, json!({ "type": "string" }));
    }

    #[test]
    fn test_formats() {
        let cases = [
            (StringCheck::Email, "email"),
            (StringCheck::Url, "uri"),
            (StringCheck::Uuid, "uuid"),
            (StringCheck::Datetime, "date-time"),
            (StringCheck::Date, "date"),
            (StringCheck::Time, "time"),
            (StringCheck::Duration, "duration"),
        ];
        for (check, format) in cases {
            assert_eq!(
                compile(vec![check], Options::default()),
                json!({ "type": "string", "format": format })
            );
        }
    }

    #[test]
    fn test_id_patterns() {
        let cases = [
            (StringCheck::Cuid, r"^[cC][^\s-]{8,}$"),
            (StringCheck::Cuid2, "^[0-9a-z]+$"),
            (StringCheck::Ulid, "^[0-9A-HJKMNP-TV-Z]{26}$"),
            (StringCheck::Nanoid, "^[a-zA-Z0-9_-]{21}$"),
        ];
        for (check, pattern) in cases {
            assert_eq!(
                compile(vec![check], Options::default()),
                json!({ "type": "string", "pattern": pattern })
            );
        }
    }

    #[test]
    fn test_literal_checks_are_escaped() {
        assert_eq!(
            compile(
                vec![StringCheck::StartsWith("aBcD123{}[]".into())],
                Options::default()
            ),
            json!({ "type": "string", "pattern": r"^aBcD123\{\}\[\]" })
        );
        assert_eq!(
            compile(
                vec![StringCheck::EndsWith("aBcD123{}[]".into())],
                Options::default()
            ),
            json!({ "type": "string", "pattern": r"aBcD123\{\}\[\]$" })
        );
        assert_eq!(
            compile(
                vec![StringCheck::Includes("aBcD123{}[]".into())],
                Options::default()
            ),
            json!({ "type": "string", "pattern": r"aBcD123\{\}\[\]" })
        );
    }

    #[test]
    fn test_preserve_pattern_strategy() {
        let schema = compile(
            vec![StringCheck::Includes("aBcD123{}[]".into())],
            Options::default().with_pattern_strategy(PatternStrategy::Preserve),
        );
        assert_eq!(schema, json!({ "type": "string", "pattern": "aBcD123{}[]" }));
    }

    #[test]
    fn test_multiple_patterns_bundle_into_all_of() {
        let schema = compile(
            vec![
                StringCheck::StartsWith("alpha".into()),
                StringCheck::EndsWith("omega".into()),
            ],
            Options::default(),
        );
        assert_eq!(
            schema,
            json!({
                "type": "string",
                "allOf": [{ "pattern": "^alpha" }, { "pattern": "omega$" }]
            })
        );
    }

    #[test]
    fn test_multiple_formats_bundle_into_any_of() {
        let schema = compile(
            vec![StringCheck::Ip(None), StringCheck::Email],
            Options::default(),
        );
        assert_eq!(
            schema,
            json!({
                "type": "string",
                "anyOf": [
                    { "format": "ipv4" },
                    { "format": "ipv6" },
                    { "format": "email" }
                ]
            })
        );
    }

    #[test]
    fn test_ip_version() {
        assert_eq!(
            compile(vec![StringCheck::Ip(Some(IpVersion::V6))], Options::default()),
            json!({ "type": "string", "format": "ipv6" })
        );
        assert_eq!(
            compile(vec![StringCheck::Cidr(Some(IpVersion::V4))], Options::default()),
            json!({ "type": "string", "pattern": patterns::IPV4_CIDR })
        );
    }

    #[test]
    fn test_base64_strategies() {
        assert_eq!(
            compile(vec![StringCheck::Base64], Options::default()),
            json!({ "type": "string", "contentEncoding": "base64" })
        );
        assert_eq!(
            compile(
                vec![StringCheck::Base64],
                Options::default().with_base64_strategy(Base64Strategy::FormatBinary)
            ),
            json!({ "type": "string", "format": "binary" })
        );
        assert_eq!(
            compile(
                vec![StringCheck::Base64],
                Options::default().with_base64_strategy(Base64Strategy::PatternZod)
            ),
            json!({ "type": "string", "pattern": patterns::BASE64 })
        );
    }

    #[test]
    fn test_email_strategies() {
        assert_eq!(
            compile(
                vec![StringCheck::Email],
                Options::default().with_email_strategy(EmailStrategy::FormatIdnEmail)
            ),
            json!({ "type": "string", "format": "idn-email" })
        );
        assert_eq!(
            compile(
                vec![StringCheck::Email],
                Options::default().with_email_strategy(EmailStrategy::PatternZod)
            ),
            json!({ "type": "string", "pattern": patterns::EMAIL })
        );
    }

    #[test]
    fn test_regex_flags_ignored_by_default() {
        let schema = compile(
            vec![StringCheck::regex_with_flags("[A-C]", "i")],
            Options::default(),
        );
        assert_eq!(schema, json!({ "type": "string", "pattern": "[A-C]" }));
    }

    #[test]
    fn test_apply_regex_flags() {
        let source = r"(^|\^foo)Ba[r-z]+.";
        assert_eq!(apply_regex_flags(source, ""), source);
        assert_eq!(
            apply_regex_flags(source, "i"),
            r"(^|\^[fF][oO][oO])[bB][aA][r-zR-Z]+."
        );
        assert_eq!(
            apply_regex_flags(source, "ms"),
            "((^|(?<=[\r\n]))|\\^foo)Ba[r-z]+[.\r\n]"
        );
        assert_eq!(
            apply_regex_flags(source, "ims"),
            "((^|(?<=[\r\n]))|\\^[fF][oO][oO])[bB][aA][r-zR-Z]+[.\r\n]"
        );
        assert_eq!(apply_regex_flags("foo.+$", "m"), "foo.+($|(?=[\r\n]))");
        assert_eq!(apply_regex_flags("foo.+[amz]", "i"), "[fF][oO][oO].+[aAmMzZ]");
    }

    #[test]
    fn test_regex_flag_rewrite_is_logged() {
        let (pattern, logs) = crate::tests::logs::capture(|| apply_regex_flags("a.b", "s"));
        assert_eq!(pattern, "a[.\r\n]b");
        assert!(logs.contains("rewrote regex flags into pattern"), "missing event in: {logs}");
        assert!(logs.contains("source=\"a.b\""), "missing source in: {logs}");

        let (_, logs) = crate::tests::logs::capture(|| apply_regex_flags("a.b", "g"));
        assert!(logs.is_empty(), "unexpected event: {logs}");
    }

    #[test]
    fn test_regex_flags_applied_when_enabled() {
        let schema = compile(
            vec![StringCheck::regex_with_flags("foo.+[amz]", "i")],
            Options::default().with_apply_regex_flags(true),
        );
        assert_eq!(
            schema,
            json!({ "type": "string", "pattern": "[fF][oO][oO].+[aAmMzZ]" })
        );
    }
}
