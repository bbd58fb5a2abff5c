use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Closed set of link kinds a profile may carry. Matching is case-sensitive:
/// the wire value must already be lowercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkType {
    Website,
    Imdb,
    Showreel,
    Other,
}

impl LinkType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkType::Website => "website",
            LinkType::Imdb => "imdb",
            LinkType::Showreel => "showreel",
            LinkType::Other => "other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "website" => Some(LinkType::Website),
            "imdb" => Some(LinkType::Imdb),
            "showreel" => Some(LinkType::Showreel),
            "other" => Some(LinkType::Other),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProfileLink {
    pub id: Uuid,
    pub user_id: Uuid,
    pub profile_id: Uuid,
    pub label: String,
    pub url: String,
    pub link_type: LinkType,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
