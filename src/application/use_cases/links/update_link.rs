use uuid::Uuid;

use crate::application::links::LinkError;
use crate::application::ports::link_repository::{LinkFields, LinkRepository};
use crate::application::validation::{LinkCandidate, validate_candidate};
use crate::domain::links::link::ProfileLink;

/// Patch of one stored link. Absent fields keep their stored values; the
/// merged result is validated as a whole before anything is written.
#[derive(Debug, Clone, Default)]
pub struct LinkPatch {
    pub label: Option<String>,
    pub url: Option<String>,
    pub link_type: Option<String>,
}

impl LinkPatch {
    pub fn is_empty(&self) -> bool {
        self.label.is_none() && self.url.is_none() && self.link_type.is_none()
    }
}

pub struct UpdateLink<'a, L: LinkRepository + ?Sized> {
    pub links: &'a L,
}

impl<'a, L: LinkRepository + ?Sized> UpdateLink<'a, L> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        link_id: Uuid,
        patch: LinkPatch,
    ) -> Result<ProfileLink, LinkError> {
        if patch.is_empty() {
            return Err(LinkError::NoUpdates);
        }

        let existing = self
            .links
            .get_by_id(link_id)
            .await
            .map_err(LinkError::Database)?
            .filter(|link| link.user_id == user_id)
            .ok_or(LinkError::LinkNotFound)?;

        let merged = LinkCandidate {
            label: patch.label.unwrap_or(existing.label),
            url: patch.url.unwrap_or(existing.url),
            link_type: patch
                .link_type
                .unwrap_or_else(|| existing.link_type.as_str().to_string()),
        };
        let valid = validate_candidate(&merged).map_err(LinkError::InvalidLink)?;

        self.links
            .update(
                link_id,
                LinkFields {
                    label: valid.label,
                    url: valid.url,
                    link_type: valid.link_type,
                    position: None,
                },
            )
            .await
            .map_err(LinkError::Database)?
            // raced with a delete between the read and the write
            .ok_or(LinkError::LinkNotFound)
    }
}
