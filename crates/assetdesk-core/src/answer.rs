//! Decoding of assistant answer frames received over the chat connection.
//!
//! The backend sends one complete answer per frame, normally a JSON object:
//!
//! ```json
//! { "answer": "...", "message": "...", "sources": ["..."] }
//! ```
//!
//! Frames that do not parse as JSON are shown verbatim.

use serde_json::Value;

/// Content used when a JSON frame carries neither `answer` nor `message`.
pub const NO_RESPONSE: &str = "No response";

/// A fully received answer, ready to be revealed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    /// Full text of the answer.
    pub content: String,
    /// Citations, in backend order.
    pub sources: Vec<String>,
}

impl Answer {
    /// Decode a text frame.
    ///
    /// Content resolution: the first of `answer` and `message` that is set
    /// (not missing, `null`, `false`, `0` or `""`), else [`NO_RESPONSE`].
    /// Literal `\n` sequences in decoded content become real newlines. Only
    /// the string entries of `sources` are kept.
    ///
    /// The frame is used as content unchanged, with no sources, when it is not
    /// JSON, when it is JSON `null`, or when the chosen field is not a string.
    pub fn from_frame(frame: &str) -> Self {
        let value = match serde_json::from_str::<Value>(frame) {
            Ok(Value::Null) | Err(_) => return Self::verbatim(frame),
            Ok(value) => value,
        };

        let chosen = ["answer", "message"]
            .into_iter()
            .filter_map(|key| value.get(key))
            .find(|field| is_set(field));
        let content = match chosen {
            None => NO_RESPONSE,
            Some(Value::String(text)) => text.as_str(),
            Some(_) => return Self::verbatim(frame),
        };

        Self {
            content: unescape_newlines(content),
            sources: string_sources(&value),
        }
    }

    fn verbatim(frame: &str) -> Self {
        Self {
            content: frame.to_string(),
            sources: Vec::new(),
        }
    }
}

fn is_set(field: &Value) -> bool {
    match field {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn string_sources(value: &Value) -> Vec<String> {
    value
        .get("sources")
        .and_then(Value::as_array)
        .map(|sources| {
            sources
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default()
}

/// Replace every two-character `\n` sequence with a newline.
pub fn unescape_newlines(s: &str) -> String {
    s.replace("\\n", "\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answer_field_with_escaped_newline() {
        let answer = Answer::from_frame(r#"{"answer":"hi\\nthere","sources":["doc1"]}"#);
        assert_eq!(answer.content, "hi\nthere");
        assert_eq!(answer.sources, vec!["doc1".to_string()]);
    }

    #[test]
    fn test_message_field_fallback() {
        let answer = Answer::from_frame(r#"{"message":"server busy"}"#);
        assert_eq!(answer.content, "server busy");
        assert!(answer.sources.is_empty());
    }

    #[test]
    fn test_missing_fields_is_no_response() {
        assert_eq!(Answer::from_frame(r#"{"sources":[]}"#).content, NO_RESPONSE);
        assert_eq!(Answer::from_frame(r#"{"answer":""}"#).content, NO_RESPONSE);
    }

    #[test]
    fn test_malformed_frame_is_used_verbatim() {
        let raw = "plain text \\n not json";
        let answer = Answer::from_frame(raw);
        assert_eq!(answer.content, raw);
        assert!(answer.sources.is_empty());
    }

    #[test]
    fn test_json_without_fields_is_no_response() {
        assert_eq!(Answer::from_frame("[1,2]").content, NO_RESPONSE);
        assert_eq!(Answer::from_frame("42").content, NO_RESPONSE);
        assert_eq!(Answer::from_frame(r#""just text""#).content, NO_RESPONSE);
        assert_eq!(
            Answer::from_frame(r#"{"answer":null,"message":0}"#).content,
            NO_RESPONSE
        );
    }

    #[test]
    fn test_ill_typed_siblings_do_not_hide_answer() {
        let answer = Answer::from_frame(r#"{"answer":"hello","message":null,"sources":[1]}"#);
        assert_eq!(answer.content, "hello");
        assert!(answer.sources.is_empty());

        let answer = Answer::from_frame(r#"{"message":5,"answer":"hi","sources":["a.csv",2,"b.pdf"]}"#);
        assert_eq!(answer.content, "hi");
        assert_eq!(answer.sources, vec!["a.csv".to_string(), "b.pdf".to_string()]);

        let answer = Answer::from_frame(r#"{"answer":"","message":"fallback","sources":"x"}"#);
        assert_eq!(answer.content, "fallback");
        assert!(answer.sources.is_empty());
    }

    #[test]
    fn test_non_string_chosen_field_is_verbatim() {
        for raw in [r#"{"answer":5}"#, r#"{"message":["a"]}"#, "null"] {
            let answer = Answer::from_frame(raw);
            assert_eq!(answer.content, raw);
            assert!(answer.sources.is_empty());
        }
    }

    #[test]
    fn test_real_newlines_survive() {
        let answer = Answer::from_frame("{\"answer\":\"a\\nb\"}");
        assert_eq!(answer.content, "a\nb");
    }
}
