//! Classification and reply envelope types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Classification assigned to a decoded JSON value.
///
/// Booleans and null have no category of their own and fall through to
/// [`Kind::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    /// A JSON string.
    Text,
    /// A JSON number, integral or floating.
    Number,
    /// A JSON array.
    Array,
    /// A JSON object.
    Object,
    /// Anything else (booleans, null).
    Unknown,
}

impl Kind {
    /// Classifies a decoded value. The whole value is classified, never a
    /// field inside it: `{"value": 42}` is an object, not a number.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::String(_) => Self::Text,
            Value::Number(_) => Self::Number,
            Value::Array(_) => Self::Array,
            Value::Object(_) => Self::Object,
            Value::Bool(_) | Value::Null => Self::Unknown,
        }
    }

    /// Returns the wire name of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Array => "array",
            Self::Object => "object",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reply envelope written back to the client.
///
/// Serializes internally tagged on `status`, producing exactly the two wire
/// shapes documented in the crate root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Reply {
    /// The payload parsed; the decoded value is echoed with its kind.
    Ok { kind: Kind, value: Value },

    /// The payload did not parse as JSON (or broke the framing rules).
    Error { message: String },
}

impl Reply {
    /// Builds the success envelope for a decoded value.
    pub fn classified(value: Value) -> Self {
        Self::Ok {
            kind: Kind::of(&value),
            value,
        }
    }

    /// Builds the error envelope.
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    /// Returns true unless this is an error envelope.
    pub fn is_ok(&self) -> bool {
        !matches!(self, Self::Error { .. })
    }

    /// Returns the detected kind for a success envelope.
    pub fn kind(&self) -> Option<Kind> {
        match self {
            Self::Ok { kind, .. } => Some(*kind),
            Self::Error { .. } => None,
        }
    }

    /// Returns the error message for an error envelope.
    pub fn as_error(&self) -> Option<&str> {
        match self {
            Self::Error { message } => Some(message),
            Self::Ok { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn kind_of_string() {
        assert_eq!(Kind::of(&json!("hello")), Kind::Text);
    }

    #[test]
    fn kind_of_numbers() {
        assert_eq!(Kind::of(&json!(42)), Kind::Number);
        assert_eq!(Kind::of(&json!(-7)), Kind::Number);
        assert_eq!(Kind::of(&json!(3.25)), Kind::Number);
    }

    #[test]
    fn kind_of_containers() {
        assert_eq!(Kind::of(&json!([1, 2, 3])), Kind::Array);
        assert_eq!(Kind::of(&json!({"value": 42})), Kind::Object);
    }

    #[test]
    fn kind_of_bool_and_null_fall_through() {
        assert_eq!(Kind::of(&json!(true)), Kind::Unknown);
        assert_eq!(Kind::of(&json!(false)), Kind::Unknown);
        assert_eq!(Kind::of(&Value::Null), Kind::Unknown);
    }

    #[test]
    fn whole_value_is_classified() {
        // An object wrapping a number is still an object.
        let reply = Reply::classified(json!({"value": 42}));
        assert_eq!(reply.kind(), Some(Kind::Object));
    }

    #[test]
    fn ok_wire_shape() {
        let reply = Reply::classified(json!("hello"));
        let json = serde_json::to_string(&reply).unwrap();
        assert_eq!(json, r#"{"status":"ok","kind":"text","value":"hello"}"#);
    }

    #[test]
    fn ok_wire_shape_number() {
        let reply = Reply::classified(json!(42));
        let json = serde_json::to_string(&reply).unwrap();
        assert_eq!(json, r#"{"status":"ok","kind":"number","value":42}"#);
    }

    #[test]
    fn ok_wire_shape_unknown() {
        let reply = Reply::classified(json!(null));
        let json = serde_json::to_string(&reply).unwrap();
        assert_eq!(json, r#"{"status":"ok","kind":"unknown","value":null}"#);
    }

    #[test]
    fn error_wire_shape() {
        let reply = Reply::error("invalid JSON: expected value at line 1 column 1");
        let json = serde_json::to_string(&reply).unwrap();
        assert_eq!(
            json,
            r#"{"status":"error","message":"invalid JSON: expected value at line 1 column 1"}"#
        );
    }

    #[test]
    fn reply_roundtrip() {
        let reply = Reply::classified(json!([1, "two", null]));
        let json = serde_json::to_string(&reply).unwrap();
        let parsed: Reply = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, reply);
    }

    #[test]
    fn reply_inspectors() {
        let ok = Reply::classified(json!([]));
        assert!(ok.is_ok());
        assert_eq!(ok.kind(), Some(Kind::Array));
        assert!(ok.as_error().is_none());

        let err = Reply::error("boom");
        assert!(!err.is_ok());
        assert_eq!(err.kind(), None);
        assert_eq!(err.as_error(), Some("boom"));
    }

    #[test]
    fn kind_display_matches_wire_name() {
        assert_eq!(Kind::Text.to_string(), "text");
        assert_eq!(Kind::Unknown.to_string(), "unknown");
        assert_eq!(
            serde_json::to_string(&Kind::Object).unwrap(),
            r#""object""#
        );
    }
}
