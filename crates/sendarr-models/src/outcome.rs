use serde::{Deserialize, Serialize};

/// Uniform result returned across the core/collaborator boundary. Internal
/// failures are always mapped into this shape, never raised.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AddOutcome {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AddOutcome {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: Some(message.into()),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: None,
            error: Some(error.into()),
        }
    }
}
