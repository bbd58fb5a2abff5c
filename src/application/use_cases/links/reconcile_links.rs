use std::collections::HashSet;

use uuid::Uuid;

use crate::application::links::{BatchRejection, ItemProblem, ItemProblemKind, LinkError};
use crate::application::ports::link_repository::{
    LinkFields, LinkRepository, NewLink, StagedOps,
};
use crate::application::ports::profile_repository::ProfileRepository;
use crate::application::validation::{LinkCandidate, validate_candidate};
use crate::domain::links::link::ProfileLink;

/// One entry of the caller's desired list. With an id it is a full
/// replacement of an existing link; without one it becomes a new record.
#[derive(Debug, Clone)]
pub struct DesiredLink {
    pub id: Option<Uuid>,
    pub label: String,
    pub url: String,
    pub link_type: String,
}

/// Batch replace of a profile's link collection: diffs the desired list
/// against the stored one, stages inserts/updates/deletes and applies them as
/// one transaction. The desired list is a single transactional target state,
/// never a sequence of independent requests; any rejected entry rejects the
/// whole batch before a single write is staged.
pub struct ReconcileLinks<'a, L, P>
where
    L: LinkRepository + ?Sized,
    P: ProfileRepository + ?Sized,
{
    pub links: &'a L,
    pub profiles: &'a P,
    pub max_links: usize,
}

impl<'a, L, P> ReconcileLinks<'a, L, P>
where
    L: LinkRepository + ?Sized,
    P: ProfileRepository + ?Sized,
{
    pub async fn execute(
        &self,
        user_id: Uuid,
        profile_id: Uuid,
        desired: Vec<DesiredLink>,
    ) -> Result<Vec<ProfileLink>, LinkError> {
        self.profiles
            .get_for_owner(profile_id, user_id)
            .await
            .map_err(LinkError::Database)?
            .ok_or(LinkError::ProfileNotFound)?;

        if desired.len() > self.max_links {
            return Err(LinkError::InvalidLinks(BatchRejection::TooLong {
                submitted: desired.len(),
                limit: self.max_links,
            }));
        }

        let current = self
            .links
            .list_by_profile(profile_id)
            .await
            .map_err(LinkError::Database)?;

        // Ids still available for matching; a repeated id no longer resolves.
        let mut unmatched: HashSet<Uuid> = current
            .iter()
            .filter(|link| link.user_id == user_id && link.profile_id == profile_id)
            .map(|link| link.id)
            .collect();

        let mut problems: Vec<ItemProblem> = Vec::new();
        let mut staged = StagedOps::default();

        for (index, entry) in desired.iter().enumerate() {
            if let Some(id) = entry.id {
                if !unmatched.remove(&id) {
                    problems.push(ItemProblem {
                        index,
                        kind: ItemProblemKind::NotFound(id),
                    });
                    continue;
                }
            }

            let candidate = LinkCandidate {
                label: entry.label.clone(),
                url: entry.url.clone(),
                link_type: entry.link_type.clone(),
            };
            match validate_candidate(&candidate) {
                Ok(valid) => match entry.id {
                    Some(id) => staged.updates.push((
                        id,
                        LinkFields {
                            label: valid.label,
                            url: valid.url,
                            link_type: valid.link_type,
                            position: Some(index as i32),
                        },
                    )),
                    None => staged.inserts.push(NewLink {
                        user_id,
                        profile_id,
                        label: valid.label,
                        url: valid.url,
                        link_type: valid.link_type,
                        position: index as i32,
                    }),
                },
                Err(fields) => problems.push(ItemProblem {
                    index,
                    kind: ItemProblemKind::Fields(fields),
                }),
            }
        }

        if !problems.is_empty() {
            return Err(LinkError::InvalidLinks(BatchRejection::Items(problems)));
        }

        // Everything the desired list did not claim gets deleted.
        staged.deletes = current
            .iter()
            .filter(|link| unmatched.contains(&link.id))
            .map(|link| link.id)
            .collect();

        self.links
            .run_atomic(profile_id, staged)
            .await
            .map_err(LinkError::Database)
    }
}
