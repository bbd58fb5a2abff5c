use serde_json::json;
use uuid::Uuid;

use crate::application::validation::FieldError;

/// Why a whole desired list was rejected before any write was staged.
#[derive(Debug)]
pub enum BatchRejection {
    TooLong { submitted: usize, limit: usize },
    Items(Vec<ItemProblem>),
}

/// One offending entry of the desired list, addressed by its array position.
#[derive(Debug)]
pub struct ItemProblem {
    pub index: usize,
    pub kind: ItemProblemKind,
}

#[derive(Debug)]
pub enum ItemProblemKind {
    /// The entry carried an id that does not resolve to a link of this
    /// profile and user.
    NotFound(Uuid),
    Fields(Vec<FieldError>),
}

#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    #[error("profile not found")]
    ProfileNotFound,
    #[error("link not found")]
    LinkNotFound,
    #[error("link failed validation")]
    InvalidLink(Vec<FieldError>),
    #[error("desired links rejected")]
    InvalidLinks(BatchRejection),
    #[error("profile link limit reached")]
    TooManyLinks { limit: usize },
    #[error("no updatable fields provided")]
    NoUpdates,
    #[error("storage failure")]
    Database(#[source] anyhow::Error),
}

impl LinkError {
    /// Stable wire code consumed by clients; never reworded.
    pub fn code(&self) -> &'static str {
        match self {
            LinkError::ProfileNotFound => "PROFILE_NOT_FOUND",
            LinkError::LinkNotFound => "LINK_NOT_FOUND",
            LinkError::InvalidLink(_) => "INVALID_LINK",
            LinkError::InvalidLinks(_) => "INVALID_LINKS",
            LinkError::TooManyLinks { .. } => "TOO_MANY_LINKS",
            LinkError::NoUpdates => "NO_UPDATES",
            LinkError::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Structured diagnostics for the boundary payload.
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            LinkError::InvalidLink(fields) => Some(field_details(fields)),
            LinkError::InvalidLinks(BatchRejection::TooLong { submitted, limit }) => {
                Some(json!({ "submitted": submitted, "limit": limit }))
            }
            LinkError::InvalidLinks(BatchRejection::Items(items)) => {
                let items: Vec<serde_json::Value> = items
                    .iter()
                    .map(|p| match &p.kind {
                        ItemProblemKind::NotFound(id) => {
                            json!({ "index": p.index, "code": "LINK_NOT_FOUND", "id": id })
                        }
                        ItemProblemKind::Fields(fields) => {
                            let mut detail = json!({ "index": p.index, "code": "INVALID_LINK" });
                            let mut per_field = field_details(fields);
                            detail["fields"] = per_field["fields"].take();
                            detail
                        }
                    })
                    .collect();
                Some(json!({ "items": items }))
            }
            LinkError::TooManyLinks { limit } => Some(json!({ "limit": limit })),
            _ => None,
        }
    }
}

fn field_details(fields: &[FieldError]) -> serde_json::Value {
    let fields: Vec<serde_json::Value> = fields
        .iter()
        .map(|f| json!({ "field": f.field(), "code": f.code() }))
        .collect();
    json!({ "fields": fields })
}
