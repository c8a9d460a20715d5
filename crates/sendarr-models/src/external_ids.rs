use serde::{Deserialize, Serialize};

/// External identifiers for a movie or show, accumulated from several
/// sources (page links, Trakt metadata).
///
/// All fields are optional; `merge` only fills gaps, so an id set by a
/// higher-confidence source is never overwritten within a resolution pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExternalIds {
    pub imdb: Option<String>,
    pub tmdb: Option<u64>,
    pub tvdb: Option<u64>,
}

impl ExternalIds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge ids from another source, only filling in `None` values.
    pub fn merge(&mut self, other: &ExternalIds) {
        if self.imdb.is_none() {
            self.imdb = other.imdb.clone();
        }
        if self.tmdb.is_none() {
            self.tmdb = other.tmdb;
        }
        if self.tvdb.is_none() {
            self.tvdb = other.tvdb;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.imdb.is_none() && self.tmdb.is_none() && self.tvdb.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_fills_gaps_only() {
        let mut ids = ExternalIds {
            imdb: Some("tt0133093".to_string()),
            tmdb: None,
            tvdb: None,
        };
        let resolved = ExternalIds {
            imdb: Some("tt9999999".to_string()),
            tmdb: Some(603),
            tvdb: Some(70522),
        };

        ids.merge(&resolved);

        assert_eq!(ids.imdb.as_deref(), Some("tt0133093"));
        assert_eq!(ids.tmdb, Some(603));
        assert_eq!(ids.tvdb, Some(70522));
    }

    #[test]
    fn test_is_empty() {
        assert!(ExternalIds::new().is_empty());
        let ids = ExternalIds {
            tmdb: Some(1),
            ..Default::default()
        };
        assert!(!ids.is_empty());
    }
}
