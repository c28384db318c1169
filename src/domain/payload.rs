use serde_json::Value;

/// Arbitrary log content.
///
/// A closed tagged union (null, bool, number, string, sequence, mapping), so
/// every consumer handles it by exhaustive match. Owned trees cannot contain
/// cycles.
pub type Payload = Value;

/// Text used when a log call carries no content.
pub const ABSENT_PLACEHOLDER: &str = "(none)";

/// Render a payload as the single-string message pushed to the search backend.
///
/// Containers become compact JSON, null becomes [`ABSENT_PLACEHOLDER`],
/// strings are kept verbatim and other primitives are coerced to text.
pub fn to_message(payload: &Payload) -> String {
    match payload {
        Value::Null => ABSENT_PLACEHOLDER.to_string(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => payload.to_string(),
    }
}
