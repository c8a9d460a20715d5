use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Summary of a user list as returned by the Trakt lists endpoint. The `ids`
/// object is kept opaque; the settings page stores either its slug or its
/// numeric trakt id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TraktList {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub privacy: String,
    #[serde(default)]
    pub ids: Value,
}
