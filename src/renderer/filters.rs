//! Built-in variable filters

use serde_json::Value;

/// A filter that can follow `|` in a variable expression
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    Upper,
    Lower,
    Length,
    Default,
    Escape,
    Safe,
}

/// A value moving through a filter chain
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Output {
    pub value: Value,
    /// Already safe to emit without autoescaping
    pub safe: bool,
}

impl Filter {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "upper" => Some(Filter::Upper),
            "lower" => Some(Filter::Lower),
            "length" => Some(Filter::Length),
            "default" => Some(Filter::Default),
            "escape" => Some(Filter::Escape),
            "safe" => Some(Filter::Safe),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Filter::Upper => "upper",
            Filter::Lower => "lower",
            Filter::Length => "length",
            Filter::Default => "default",
            Filter::Escape => "escape",
            Filter::Safe => "safe",
        }
    }

    /// Whether the filter expects a `:argument`
    pub fn takes_argument(&self) -> bool {
        matches!(self, Filter::Default)
    }

    pub(crate) fn apply(&self, input: Output, argument: Option<Value>) -> Output {
        match self {
            Filter::Upper => Output {
                value: Value::String(display(&input.value).to_uppercase()),
                safe: input.safe,
            },
            Filter::Lower => Output {
                value: Value::String(display(&input.value).to_lowercase()),
                safe: input.safe,
            },
            Filter::Length => Output {
                value: Value::from(length(&input.value)),
                safe: true,
            },
            Filter::Default => {
                if is_truthy(&input.value) {
                    input
                } else {
                    Output {
                        value: argument.unwrap_or(Value::Null),
                        safe: false,
                    }
                }
            }
            Filter::Escape => Output {
                value: Value::String(escape_html(&display(&input.value))),
                safe: true,
            },
            Filter::Safe => Output {
                value: input.value,
                safe: true,
            },
        }
    }
}

fn length(value: &Value) -> usize {
    match value {
        Value::String(s) => s.chars().count(),
        Value::Array(items) => items.len(),
        Value::Object(map) => map.len(),
        _ => 0,
    }
}

/// Template truthiness: empty, zero, false and null are false
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(false, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Text form of a value as it appears in output
pub(crate) fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Null => "None".to_string(),
        other => other.to_string(),
    }
}

/// Escape the five HTML-significant characters
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn unsafe_value(value: Value) -> Output {
        Output { value, safe: false }
    }

    #[test]
    fn test_from_name_round_trips() {
        for filter in [
            Filter::Upper,
            Filter::Lower,
            Filter::Length,
            Filter::Default,
            Filter::Escape,
            Filter::Safe,
        ] {
            assert_eq!(Filter::from_name(filter.name()), Some(filter));
        }
        assert_eq!(Filter::from_name("shout"), None);
    }

    #[test]
    fn test_case_filters() {
        let out = Filter::Upper.apply(unsafe_value(json!("Hello")), None);
        assert_eq!(out.value, json!("HELLO"));
        let out = Filter::Lower.apply(unsafe_value(json!("Hello")), None);
        assert_eq!(out.value, json!("hello"));
    }

    #[test]
    fn test_length() {
        assert_eq!(
            Filter::Length.apply(unsafe_value(json!("héllo")), None).value,
            json!(5)
        );
        assert_eq!(
            Filter::Length.apply(unsafe_value(json!([1, 2, 3])), None).value,
            json!(3)
        );
        assert_eq!(
            Filter::Length.apply(unsafe_value(json!(null)), None).value,
            json!(0)
        );
    }

    #[test]
    fn test_default_only_replaces_falsy() {
        let fallback = Some(json!("fallback"));
        assert_eq!(
            Filter::Default
                .apply(unsafe_value(json!("")), fallback.clone())
                .value,
            json!("fallback")
        );
        assert_eq!(
            Filter::Default
                .apply(unsafe_value(json!(0)), fallback.clone())
                .value,
            json!("fallback")
        );
        assert_eq!(
            Filter::Default.apply(unsafe_value(json!("set")), fallback).value,
            json!("set")
        );
    }

    #[test]
    fn test_escape_and_safe_mark_output() {
        let out = Filter::Escape.apply(unsafe_value(json!("<b>")), None);
        assert_eq!(out.value, json!("&lt;b&gt;"));
        assert!(out.safe);

        let out = Filter::Safe.apply(unsafe_value(json!("<b>")), None);
        assert_eq!(out.value, json!("<b>"));
        assert!(out.safe);
    }

    #[test]
    fn test_display() {
        assert_eq!(display(&json!(true)), "True");
        assert_eq!(display(&json!(null)), "None");
        assert_eq!(display(&json!(1.5)), "1.5");
        assert_eq!(display(&json!([1, "a"])), r#"[1,"a"]"#);
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#x27;Jerry&#x27;&lt;/a&gt;"
        );
    }
}
