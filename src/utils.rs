use std::collections::HashMap;

use serde_json::Value;

/// Looks up a required handler parameter in the JSON body first, then in the
/// query string. `/play` and `/stop` accept both forms; body values win.
pub fn required_param(
    query: &HashMap<String, String>,
    body: Option<&Value>,
    key: &str,
) -> Option<String> {
    if let Some(body) = body {
        if let Some(value) = body.get(key).and_then(|v| v.as_str()) {
            return Some(value.to_string());
        }
    }
    query.get(key).cloned()
}

/// Percent-encodes a space-separated scope list for use in the authorization
/// URL query string.
pub fn encode_scope(scope: &str) -> String {
    scope.split_whitespace().collect::<Vec<_>>().join("%20")
}
