//! Recover a JSON object from model reply text.
//!
//! Providers that honor `json_schema` return a bare object, but compatible
//! endpoints that ignore `response_format` often wrap it:
//!
//! - in markdown fences (`` ```json ... ``` ``)
//! - behind a sentence of prose ("Here is the result: {...}")
//! - with a trailing comma before a closing brace
//!
//! [`extract_json_object`] undoes those wrappings and then parses strictly.
//! It never invents fields; a reply missing a field still fails later when
//! it is deserialized into the step's output type.

use serde_json::Value;

/// Parse the JSON object contained in `text`.
///
/// Tries a direct parse first. On failure it strips fences, narrows to the
/// first complete `{ ... }` object, drops trailing commas, and parses again.
/// Anything that is still not a JSON object is an error.
pub fn extract_json_object(text: &str) -> Result<Value, serde_json::Error> {
    let value = match serde_json::from_str::<Value>(text) {
        Ok(v) => v,
        Err(first_err) => {
            let stripped = strip_markdown_fences(text);
            let Some(span) = object_span(stripped) else {
                return Err(first_err);
            };
            serde_json::from_str(&drop_trailing_commas(span))?
        }
    };

    if value.is_object() {
        Ok(value)
    } else {
        Err(serde::de::Error::custom(format!(
            "expected a JSON object, found {}",
            kind_of(&value)
        )))
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn strip_markdown_fences(input: &str) -> &str {
    let trimmed = input.trim();
    let Some(after_open) = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
    else {
        return trimmed;
    };
    let body = after_open.trim_end();
    body.strip_suffix("```").unwrap_or(body).trim()
}

/// The first brace-balanced `{ ... }` slice. Braces inside strings do not
/// count. `None` if the object never closes.
fn object_span(input: &str) -> Option<&str> {
    let start = input.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in input[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&input[start..=start + i]);
                }
            }
            _ => {}
        }
    }

    None
}

/// Remove commas that directly precede `}` or `]`, ignoring string contents.
fn drop_trailing_commas(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in input.char_indices() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            ',' => {
                let rest = input[i + 1..].trim_start();
                if !(rest.starts_with('}') || rest.starts_with(']')) {
                    out.push(c);
                }
            }
            _ => out.push(c),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bare_object_parses_directly() {
        let v = extract_json_object(r#"{"level":"safe","reason":"ok"}"#).unwrap();
        assert_eq!(v, json!({"level": "safe", "reason": "ok"}));
    }

    #[test]
    fn fenced_object() {
        let text = "```json\n{\"level\": \"danger\", \"reason\": \"address\"}\n```";
        let v = extract_json_object(text).unwrap();
        assert_eq!(v["level"], "danger");
    }

    #[test]
    fn fence_without_language_tag() {
        let text = "```\n{\"a\": 1}\n```";
        assert_eq!(extract_json_object(text).unwrap(), json!({"a": 1}));
    }

    #[test]
    fn leading_prose_is_skipped() {
        let text = "Here is my assessment: {\"level\": \"warning\", \"reason\": \"insult\"} Hope it helps.";
        let v = extract_json_object(text).unwrap();
        assert_eq!(v["level"], "warning");
    }

    #[test]
    fn trailing_comma_is_dropped() {
        let text = "{\"suggestion\": \"remove it\", \"corrected_text\": \"hi\",\n}";
        let v = extract_json_object(text).unwrap();
        assert_eq!(v["corrected_text"], "hi");
    }

    #[test]
    fn commas_inside_strings_survive() {
        let text = "```json\n{\"reason\": \"a, b,}\", \"level\": \"safe\",}\n```";
        let v = extract_json_object(text).unwrap();
        assert_eq!(v["reason"], "a, b,}");
    }

    #[test]
    fn escaped_quote_does_not_end_string() {
        let text = "note: {\"reason\": \"he said \\\"hi,\\\" then left\",}";
        let v = extract_json_object(text).unwrap();
        assert_eq!(v["reason"], "he said \"hi,\" then left");
    }

    #[test]
    fn trailing_braces_after_object_are_ignored() {
        let text = "{\"level\": \"warning\", \"reason\": \"rude\"} (see {note})";
        let v = extract_json_object(text).unwrap();
        assert_eq!(v, json!({"level": "warning", "reason": "rude"}));
    }

    #[test]
    fn nested_object_and_braces_in_strings_stay_in_span() {
        let text = "Result: {\"reason\": \"uses {curly} words\", \"meta\": {\"n\": 1}} done {x}";
        let v = extract_json_object(text).unwrap();
        assert_eq!(v["reason"], "uses {curly} words");
        assert_eq!(v["meta"]["n"], 1);
    }

    #[test]
    fn unclosed_object_is_rejected() {
        assert!(extract_json_object("Result: {\"level\": \"safe\"").is_err());
    }

    #[test]
    fn non_object_json_is_rejected() {
        let err = extract_json_object(r#"["safe"]"#).unwrap_err();
        assert!(err.to_string().contains("expected a JSON object"));
        assert!(extract_json_object("\"safe\"").is_err());
    }

    #[test]
    fn plain_prose_is_rejected() {
        assert!(extract_json_object("The post looks safe to me.").is_err());
        assert!(extract_json_object("").is_err());
    }
}
