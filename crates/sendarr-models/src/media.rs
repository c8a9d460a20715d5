use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Show,
}

impl MediaType {
    /// Capitalized noun for user-facing messages ("Movie sent to ...").
    pub fn noun(&self) -> &'static str {
        match self {
            MediaType::Movie => "Movie",
            MediaType::Show => "Show",
        }
    }

    /// Lowercase noun for inline message text.
    pub fn noun_lower(&self) -> &'static str {
        match self {
            MediaType::Movie => "movie",
            MediaType::Show => "show",
        }
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.noun_lower())
    }
}
