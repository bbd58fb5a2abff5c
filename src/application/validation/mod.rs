use serde::Serialize;
use url::Url;

use crate::domain::links::link::LinkType;

pub const LABEL_MAX_CHARS: usize = 40;
pub const URL_MAX_CHARS: usize = 2048;

/// Raw caller input for one link, before any field has been checked.
#[derive(Debug, Clone)]
pub struct LinkCandidate {
    pub label: String,
    pub url: String,
    pub link_type: String,
}

/// A candidate that passed every field check. Label is trimmed.
#[derive(Debug, Clone)]
pub struct ValidLink {
    pub label: String,
    pub url: String,
    pub link_type: LinkType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldError {
    InvalidLabel,
    InvalidUrl,
    InvalidType,
}

impl FieldError {
    pub fn code(&self) -> &'static str {
        match self {
            FieldError::InvalidLabel => "INVALID_LABEL",
            FieldError::InvalidUrl => "INVALID_URL",
            FieldError::InvalidType => "INVALID_TYPE",
        }
    }

    pub fn field(&self) -> &'static str {
        match self {
            FieldError::InvalidLabel => "label",
            FieldError::InvalidUrl => "url",
            FieldError::InvalidType => "type",
        }
    }
}

/// Checks every field and accumulates all failures so callers get complete
/// diagnostics for UI highlighting. Pure: no I/O, no clock.
pub fn validate_candidate(candidate: &LinkCandidate) -> Result<ValidLink, Vec<FieldError>> {
    let mut errors = Vec::new();

    let label = candidate.label.trim();
    if label.is_empty() || label.chars().count() > LABEL_MAX_CHARS {
        errors.push(FieldError::InvalidLabel);
    }

    if !url_is_acceptable(&candidate.url) {
        errors.push(FieldError::InvalidUrl);
    }

    let link_type = LinkType::parse(&candidate.link_type);
    if link_type.is_none() {
        errors.push(FieldError::InvalidType);
    }

    match link_type {
        Some(link_type) if errors.is_empty() => Ok(ValidLink {
            label: label.to_string(),
            url: candidate.url.clone(),
            link_type,
        }),
        _ => Err(errors),
    }
}

fn url_is_acceptable(raw: &str) -> bool {
    if raw.chars().count() > URL_MAX_CHARS {
        return false;
    }
    // Url::parse only accepts absolute URLs; relative input fails here.
    match Url::parse(raw) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https"),
        Err(_) => false,
    }
}
