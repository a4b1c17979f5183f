//! Helper library registered for lenient renders.
//!
//! String, math, date and encoding conveniences in the spirit of the usual
//! template function libraries. Scalar arguments are coerced leniently: a
//! missing value behaves like `""` or `0`. Parameters that must have a
//! specific shape (counts, arrays, separators, formats) fail the render when
//! given the wrong type.

use chrono::{DateTime, Utc};
use handlebars::{
    Context, Handlebars, Helper, HelperResult, JsonValue, Output, RenderContext, handlebars_helper,
};
use regex::Regex;
use std::fmt::Write as _;
use std::sync::LazyLock;

/// Maximum repetition or indentation width (prevents runaway output).
const MAX_REPEAT: usize = 10_000;

/// Names of all helpers installed by [`register_helpers`].
pub const HELPER_NAMES: &[&str] = &[
    "upper",
    "lower",
    "title",
    "trim",
    "trimPrefix",
    "trimSuffix",
    "replace",
    "repeat",
    "trunc",
    "contains",
    "hasPrefix",
    "hasSuffix",
    "quote",
    "squote",
    "indent",
    "nindent",
    "slugify",
    "join",
    "split",
    "default",
    "empty",
    "coalesce",
    "toJson",
    "toPrettyJson",
    "add",
    "sub",
    "mul",
    "div",
    "mod",
    "max",
    "min",
    "now",
    "date",
];

static NON_SLUG_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").unwrap_or_else(|_| unreachable!()));

// Strings
handlebars_helper!(upper: |s: Json| as_text(s).to_uppercase());
handlebars_helper!(lower: |s: Json| as_text(s).to_lowercase());
handlebars_helper!(title: |s: Json| title_case(&as_text(s)));
handlebars_helper!(trim: |s: Json| as_text(s).trim().to_string());
handlebars_helper!(trim_prefix: |prefix: Json, s: Json| {
    let text = as_text(s);
    let prefix = as_text(prefix);
    text.strip_prefix(prefix.as_str()).unwrap_or(&text).to_string()
});
handlebars_helper!(trim_suffix: |suffix: Json, s: Json| {
    let text = as_text(s);
    let suffix = as_text(suffix);
    text.strip_suffix(suffix.as_str()).unwrap_or(&text).to_string()
});
handlebars_helper!(replace: |old: Json, new: Json, s: Json| {
    as_text(s).replace(as_text(old).as_str(), &as_text(new))
});
handlebars_helper!(repeat: |count: u64, s: Json| as_text(s).repeat(clamp_count(count)));
handlebars_helper!(trunc: |len: u64, s: Json| {
    as_text(s).chars().take(clamp_count(len)).collect::<String>()
});
handlebars_helper!(contains: |needle: Json, s: Json| as_text(s).contains(as_text(needle).as_str()));
handlebars_helper!(has_prefix: |prefix: Json, s: Json| as_text(s).starts_with(as_text(prefix).as_str()));
handlebars_helper!(has_suffix: |suffix: Json, s: Json| as_text(s).ends_with(as_text(suffix).as_str()));
handlebars_helper!(quote: |s: Json| format!("\"{}\"", as_text(s)));
handlebars_helper!(squote: |s: Json| format!("'{}'", as_text(s)));
handlebars_helper!(indent: |width: u64, s: Json| indent_lines(&as_text(s), clamp_count(width)));
handlebars_helper!(nindent: |width: u64, s: Json| {
    format!("\n{}", indent_lines(&as_text(s), clamp_count(width)))
});
handlebars_helper!(slugify: |s: Json| slug(&as_text(s)));

// Lists
handlebars_helper!(join: |items: array, sep: str| {
    items.iter().map(as_text).collect::<Vec<_>>().join(sep)
});
handlebars_helper!(split: |sep: str, s: Json| {
    as_text(s).split(sep).map(str::to_string).collect::<Vec<_>>()
});

// Defaults
handlebars_helper!(default: |fallback: Json, value: Json| {
    if is_empty(value) { fallback.clone() } else { value.clone() }
});
handlebars_helper!(empty: |value: Json| is_empty(value));

// Encoding
handlebars_helper!(to_json: |value: Json| serde_json::to_string(value).unwrap_or_default());
handlebars_helper!(to_pretty_json: |value: Json| {
    serde_json::to_string_pretty(value).unwrap_or_default()
});

// Math
handlebars_helper!(add: |a: Json, b: Json| as_int(a).saturating_add(as_int(b)));
handlebars_helper!(sub: |a: Json, b: Json| as_int(a).saturating_sub(as_int(b)));
handlebars_helper!(mul: |a: Json, b: Json| as_int(a).saturating_mul(as_int(b)));
handlebars_helper!(div: |a: Json, b: Json| as_int(a).checked_div(as_int(b)));
handlebars_helper!(modulo: |a: Json, b: Json| as_int(a).checked_rem(as_int(b)));
handlebars_helper!(max: |a: Json, b: Json| as_int(a).max(as_int(b)));
handlebars_helper!(min: |a: Json, b: Json| as_int(a).min(as_int(b)));

// Dates
handlebars_helper!(date: |fmt: str, value: Json| {
    parse_timestamp(value).map(|dt| format_datetime(&dt, fmt)).unwrap_or_default()
});

/// Registers the helper library on `registry`.
pub fn register_helpers(registry: &mut Handlebars<'_>) {
    registry.register_helper("upper", Box::new(upper));
    registry.register_helper("lower", Box::new(lower));
    registry.register_helper("title", Box::new(title));
    registry.register_helper("trim", Box::new(trim));
    registry.register_helper("trimPrefix", Box::new(trim_prefix));
    registry.register_helper("trimSuffix", Box::new(trim_suffix));
    registry.register_helper("replace", Box::new(replace));
    registry.register_helper("repeat", Box::new(repeat));
    registry.register_helper("trunc", Box::new(trunc));
    registry.register_helper("contains", Box::new(contains));
    registry.register_helper("hasPrefix", Box::new(has_prefix));
    registry.register_helper("hasSuffix", Box::new(has_suffix));
    registry.register_helper("quote", Box::new(quote));
    registry.register_helper("squote", Box::new(squote));
    registry.register_helper("indent", Box::new(indent));
    registry.register_helper("nindent", Box::new(nindent));
    registry.register_helper("slugify", Box::new(slugify));
    registry.register_helper("join", Box::new(join));
    registry.register_helper("split", Box::new(split));
    registry.register_helper("default", Box::new(default));
    registry.register_helper("empty", Box::new(empty));
    registry.register_helper("coalesce", Box::new(coalesce_helper));
    registry.register_helper("toJson", Box::new(to_json));
    registry.register_helper("toPrettyJson", Box::new(to_pretty_json));
    registry.register_helper("add", Box::new(add));
    registry.register_helper("sub", Box::new(sub));
    registry.register_helper("mul", Box::new(mul));
    registry.register_helper("div", Box::new(div));
    registry.register_helper("mod", Box::new(modulo));
    registry.register_helper("max", Box::new(max));
    registry.register_helper("min", Box::new(min));
    registry.register_helper("now", Box::new(now_helper));
    registry.register_helper("date", Box::new(date));
}

/// Writes the first non-empty parameter.
fn coalesce_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    if let Some(value) = h.params().iter().map(|p| p.value()).find(|v| !is_empty(v)) {
        out.write(&as_text(value))?;
    }
    Ok(())
}

/// Writes the current UTC time, RFC 3339 unless a strftime format is given.
fn now_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let now = Utc::now();
    let rendered = match h.param(0).and_then(|p| p.value().as_str()) {
        Some(fmt) => format_datetime(&now, fmt),
        None => now.to_rfc3339(),
    };
    out.write(&rendered)?;
    Ok(())
}

/// Renders a JSON value as plain text. `null` is the empty string.
fn as_text(value: &JsonValue) -> String {
    match value {
        JsonValue::Null => String::new(),
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Coerces a JSON value to an integer, defaulting to 0.
#[allow(clippy::cast_possible_truncation)]
fn as_int(value: &JsonValue) -> i64 {
    match value {
        JsonValue::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        JsonValue::String(s) => s.trim().parse().unwrap_or(0),
        JsonValue::Bool(b) => i64::from(*b),
        _ => 0,
    }
}

/// Returns true for `null`, `false`, `0`, `""`, `[]` and `{}`.
fn is_empty(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => true,
        JsonValue::Bool(b) => !b,
        JsonValue::Number(n) => n.as_f64() == Some(0.0),
        JsonValue::String(s) => s.is_empty(),
        JsonValue::Array(a) => a.is_empty(),
        JsonValue::Object(o) => o.is_empty(),
    }
}

fn clamp_count(count: u64) -> usize {
    usize::try_from(count).map_or(MAX_REPEAT, |c| c.min(MAX_REPEAT))
}

fn title_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if at_word_start && c.is_alphanumeric() {
            result.extend(c.to_uppercase());
        } else {
            result.push(c);
        }
        at_word_start = c.is_whitespace();
    }
    result
}

fn indent_lines(s: &str, width: usize) -> String {
    let pad = " ".repeat(width);
    s.split('\n')
        .map(|line| format!("{pad}{line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn slug(s: &str) -> String {
    NON_SLUG_CHARS
        .replace_all(&s.to_lowercase(), "-")
        .trim_matches('-')
        .to_string()
}

/// Accepts Unix seconds or an RFC 3339 string.
fn parse_timestamp(value: &JsonValue) -> Option<DateTime<Utc>> {
    match value {
        JsonValue::Number(n) => n.as_i64().and_then(|secs| DateTime::from_timestamp(secs, 0)),
        JsonValue::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        _ => None,
    }
}

/// Formats with a strftime pattern; an invalid pattern yields "".
fn format_datetime(dt: &DateTime<Utc>, fmt: &str) -> String {
    let mut rendered = String::new();
    if write!(rendered, "{}", dt.format(fmt)).is_err() {
        rendered.clear();
    }
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(template: &str, data: &JsonValue) -> Result<String, handlebars::RenderError> {
        let mut registry = Handlebars::new();
        registry.register_escape_fn(handlebars::no_escape);
        register_helpers(&mut registry);
        registry.render_template(template, data)
    }

    #[test]
    fn test_string_helpers() {
        let data = json!({"name": "  hello world  ", "file": "report.tmpl"});
        assert_eq!(render("{{upper (trim name)}}", &data).unwrap(), "HELLO WORLD");
        assert_eq!(render("{{title (trim name)}}", &data).unwrap(), "Hello World");
        assert_eq!(render("{{lower \"ABC\"}}", &data).unwrap(), "abc");
        assert_eq!(render("{{trimSuffix \".tmpl\" file}}", &data).unwrap(), "report");
        assert_eq!(render("{{trimPrefix \"re\" file}}", &data).unwrap(), "port.tmpl");
        assert_eq!(render("{{replace \".\" \"_\" file}}", &data).unwrap(), "report_tmpl");
        assert_eq!(render("{{repeat 3 \"ab\"}}", &data).unwrap(), "ababab");
        assert_eq!(render("{{trunc 3 file}}", &data).unwrap(), "rep");
        assert_eq!(render("{{quote file}}|{{squote file}}", &data).unwrap(), "\"report.tmpl\"|'report.tmpl'");
    }

    #[test]
    fn test_predicates() {
        let data = json!({"file": "report.tmpl"});
        assert_eq!(render("{{contains \"port\" file}}", &data).unwrap(), "true");
        assert_eq!(render("{{hasPrefix \"rep\" file}}", &data).unwrap(), "true");
        assert_eq!(render("{{hasSuffix \".txt\" file}}", &data).unwrap(), "false");
        assert_eq!(
            render("{{#if (hasSuffix \".tmpl\" file)}}template{{/if}}", &data).unwrap(),
            "template"
        );
    }

    #[test]
    fn test_indent() {
        let data = json!({"body": "a\nb"});
        assert_eq!(render("{{indent 2 body}}", &data).unwrap(), "  a\n  b");
        assert_eq!(render("x:{{nindent 4 body}}", &data).unwrap(), "x:\n    a\n    b");
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slug("Hello, World! 2024"), "hello-world-2024");
        assert_eq!(slug("--already-slugged--"), "already-slugged");
    }

    #[test]
    fn test_list_helpers() {
        let data = json!({"items": ["a", "b", 3], "csv": "x,y,z"});
        assert_eq!(render("{{join items \", \"}}", &data).unwrap(), "a, b, 3");
        assert_eq!(
            render("{{#each (split \",\" csv)}}<{{this}}>{{/each}}", &data).unwrap(),
            "<x><y><z>"
        );
    }

    #[test]
    fn test_join_rejects_non_array() {
        let data = json!({"items": "not-a-list"});
        assert!(render("{{join items \",\"}}", &data).is_err());
    }

    #[test]
    fn test_defaults() {
        let data = json!({"set": "value", "blank": ""});
        assert_eq!(render("{{default \"fallback\" blank}}", &data).unwrap(), "fallback");
        assert_eq!(render("{{default \"fallback\" set}}", &data).unwrap(), "value");
        assert_eq!(render("{{default \"fallback\" missing}}", &data).unwrap(), "fallback");
        assert_eq!(render("{{empty blank}}/{{empty set}}", &data).unwrap(), "true/false");
        assert_eq!(render("{{coalesce missing blank set}}", &data).unwrap(), "value");
        assert_eq!(render("[{{coalesce missing blank}}]", &data).unwrap(), "[]");
    }

    #[test]
    fn test_json_helpers() {
        let data = json!({"obj": {"a": 1}});
        assert_eq!(render("{{toJson obj}}", &data).unwrap(), "{\"a\":1}");
        assert_eq!(
            render("{{toPrettyJson obj}}", &data).unwrap(),
            "{\n  \"a\": 1\n}"
        );
    }

    #[test]
    fn test_math_helpers() {
        let data = json!({"n": 7, "s": "5"});
        assert_eq!(render("{{add n 3}}", &data).unwrap(), "10");
        assert_eq!(render("{{sub n s}}", &data).unwrap(), "2");
        assert_eq!(render("{{mul n 2}}", &data).unwrap(), "14");
        assert_eq!(render("{{div n 2}}", &data).unwrap(), "3");
        assert_eq!(render("{{mod n 4}}", &data).unwrap(), "3");
        assert_eq!(render("{{max n 9}}/{{min n 9}}", &data).unwrap(), "9/7");
        assert_eq!(render("[{{div n 0}}]", &data).unwrap(), "[]");
        assert_eq!(render("{{add missing 1}}", &data).unwrap(), "1");
    }

    #[test]
    fn test_date_helpers() {
        let data = json!({"ts": 0, "iso": "2024-03-01T12:30:00Z"});
        assert_eq!(render("{{date \"%Y-%m-%d\" ts}}", &data).unwrap(), "1970-01-01");
        assert_eq!(render("{{date \"%H:%M\" iso}}", &data).unwrap(), "12:30");
        assert_eq!(render("[{{date \"%Y\" bogus}}]", &data).unwrap(), "[]");

        let year = render("{{now \"%Y\"}}", &data).unwrap();
        assert_eq!(year.len(), 4);
        assert!(render("{{now}}", &data).unwrap().contains('T'));
    }

    #[test]
    fn test_wrong_param_type_fails() {
        let data = json!({"count": "three"});
        assert!(render("{{repeat count \"x\"}}", &data).is_err());
    }

    #[test]
    fn test_missing_param_fails() {
        assert!(render("{{replace \"a\"}}", &json!({})).is_err());
    }

    #[test]
    fn test_every_listed_helper_is_registered() {
        // A bare `{{name}}` is a variable lookup (empty) unless a helper is
        // registered under that name; helpers with required params then fail.
        for name in HELPER_NAMES {
            let result = render(&format!("{{{{{name}}}}}"), &json!({}));
            match *name {
                "coalesce" => assert_eq!(result.unwrap(), ""),
                "now" => assert!(!result.unwrap().is_empty()),
                _ => assert!(result.is_err(), "helper {name} not registered"),
            }
        }
    }

    #[test]
    fn test_coercions() {
        assert_eq!(as_text(&JsonValue::Null), "");
        assert_eq!(as_text(&json!(1.5)), "1.5");
        assert_eq!(as_int(&json!("  42 ")), 42);
        assert_eq!(as_int(&json!(2.9)), 2);
        assert_eq!(as_int(&json!(true)), 1);
        assert_eq!(as_int(&json!([1])), 0);
        assert!(is_empty(&json!(0)));
        assert!(is_empty(&json!({})));
        assert!(!is_empty(&json!([0])));
        assert_eq!(clamp_count(u64::MAX), MAX_REPEAT);
    }
}
