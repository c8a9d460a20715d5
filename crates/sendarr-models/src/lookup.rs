use serde_json::Value;

/// Normalized shape of a downstream lookup response.
///
/// Radarr's by-id lookups return a single object while term lookups return an
/// array; the response is tagged here immediately after the HTTP call so the
/// picker only ever deals with a list.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupResult {
    List(Vec<Value>),
    Single(Value),
}

impl LookupResult {
    /// Classify a parsed lookup body. Anything that is neither an array nor
    /// an object (null, string, empty body) yields `None`.
    pub fn from_body(body: Option<Value>) -> Option<LookupResult> {
        match body {
            Some(Value::Array(items)) => Some(LookupResult::List(items)),
            Some(v @ Value::Object(_)) => Some(LookupResult::Single(v)),
            _ => None,
        }
    }
}
