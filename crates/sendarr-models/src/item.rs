use serde::{Deserialize, Serialize};

use crate::external_ids::ExternalIds;
use crate::media::MediaType;

/// A media item as assembled by the page-context collaborator: the Trakt
/// canonical slug plus whatever title/year/ids were directly visible.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MediaItemRef {
    #[serde(rename = "type")]
    pub media_type: MediaType,
    pub slug: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub year: Option<i64>,
    #[serde(default)]
    pub ids: ExternalIds,
}

impl MediaItemRef {
    pub fn new(media_type: MediaType, slug: impl Into<String>) -> Self {
        Self {
            media_type,
            slug: slug.into(),
            title: None,
            year: None,
            ids: ExternalIds::new(),
        }
    }

    /// `"title year"` search term, falling back to the raw slug when neither
    /// title nor year is known.
    pub fn search_term(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        if let Some(title) = self.title.as_deref() {
            if !title.trim().is_empty() {
                parts.push(title.trim().to_string());
            }
        }
        if let Some(year) = self.year {
            parts.push(year.to_string());
        }
        let term = parts.join(" ");
        if term.is_empty() {
            self.slug.clone()
        } else {
            term
        }
    }
}

/// Result of a Trakt metadata resolution: the identifier triplet plus the
/// canonical title/year. Absent ids stay `None` so callers always see the
/// same shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResolvedIds {
    pub ids: ExternalIds,
    pub title: Option<String>,
    pub year: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_term_title_and_year() {
        let mut item = MediaItemRef::new(MediaType::Movie, "the-matrix-1999");
        item.title = Some("The Matrix".to_string());
        item.year = Some(1999);
        assert_eq!(item.search_term(), "The Matrix 1999");
    }

    #[test]
    fn test_search_term_falls_back_to_slug() {
        let item = MediaItemRef::new(MediaType::Show, "severance");
        assert_eq!(item.search_term(), "severance");
    }

    #[test]
    fn test_payload_deserialization() {
        let payload = serde_json::json!({
            "type": "movie",
            "slug": "heat-1995",
            "title": "Heat",
            "year": 1995,
            "ids": { "imdb": "tt0113277", "tmdb": 949 }
        });
        let item: MediaItemRef = serde_json::from_value(payload).unwrap();
        assert_eq!(item.media_type, MediaType::Movie);
        assert_eq!(item.ids.tmdb, Some(949));
        assert_eq!(item.ids.tvdb, None);
    }
}
