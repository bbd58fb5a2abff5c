use uuid::Uuid;

use crate::application::links::LinkError;
use crate::application::ports::link_repository::{LinkRepository, NewLink};
use crate::application::ports::profile_repository::ProfileRepository;
use crate::application::validation::{LinkCandidate, validate_candidate};
use crate::domain::links::link::ProfileLink;

pub struct CreateLink<'a, L, P>
where
    L: LinkRepository + ?Sized,
    P: ProfileRepository + ?Sized,
{
    pub links: &'a L,
    pub profiles: &'a P,
    pub max_links: usize,
}

impl<'a, L, P> CreateLink<'a, L, P>
where
    L: LinkRepository + ?Sized,
    P: ProfileRepository + ?Sized,
{
    pub async fn execute(
        &self,
        user_id: Uuid,
        profile_id: Uuid,
        candidate: LinkCandidate,
    ) -> Result<ProfileLink, LinkError> {
        self.profiles
            .get_for_owner(profile_id, user_id)
            .await
            .map_err(LinkError::Database)?
            .ok_or(LinkError::ProfileNotFound)?;

        let count = self
            .links
            .count_for_profile(profile_id)
            .await
            .map_err(LinkError::Database)?;
        if count as usize >= self.max_links {
            return Err(LinkError::TooManyLinks {
                limit: self.max_links,
            });
        }

        let valid = validate_candidate(&candidate).map_err(LinkError::InvalidLink)?;

        self.links
            .insert(NewLink {
                user_id,
                profile_id,
                label: valid.label,
                url: valid.url,
                link_type: valid.link_type,
                // appended after the existing collection
                position: count as i32,
            })
            .await
            .map_err(LinkError::Database)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::links::support::{InMemoryLinks, InMemoryProfiles, profile};
    use crate::domain::links::link::LinkType;

    fn candidate(label: &str, url: &str, link_type: &str) -> LinkCandidate {
        LinkCandidate {
            label: label.to_string(),
            url: url.to_string(),
            link_type: link_type.to_string(),
        }
    }

    #[tokio::test]
    async fn appends_a_valid_link() {
        let user = Uuid::new_v4();
        let profile = profile(user);
        let profiles = InMemoryProfiles::with(vec![profile.clone()]);
        let links = InMemoryLinks::new();
        links.seed(&profile, "First", "https://a.com", LinkType::Website);
        let uc = CreateLink {
            links: &links,
            profiles: &profiles,
            max_links: 20,
        };

        let created = uc
            .execute(user, profile.id, candidate("  Reel ", "https://v.com", "showreel"))
            .await
            .unwrap();
        assert_eq!(created.label, "Reel");
        assert_eq!(created.link_type, LinkType::Showreel);

        let listed = links.list_by_profile(profile.id).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[1].id, created.id);
    }

    #[tokio::test]
    async fn enforces_the_ceiling_on_create() {
        let user = Uuid::new_v4();
        let profile = profile(user);
        let profiles = InMemoryProfiles::with(vec![profile.clone()]);
        let links = InMemoryLinks::new();
        for i in 0..20 {
            links.seed(&profile, &format!("l{i}"), "https://a.com", LinkType::Other);
        }
        let uc = CreateLink {
            links: &links,
            profiles: &profiles,
            max_links: 20,
        };

        let err = uc
            .execute(user, profile.id, candidate("One more", "https://a.com", "other"))
            .await
            .unwrap_err();
        assert!(matches!(err, LinkError::TooManyLinks { limit: 20 }));
        assert_eq!(links.count_for_profile(profile.id).await.unwrap(), 20);
    }

    #[tokio::test]
    async fn aggregates_field_errors() {
        let user = Uuid::new_v4();
        let profile = profile(user);
        let profiles = InMemoryProfiles::with(vec![profile.clone()]);
        let links = InMemoryLinks::new();
        let uc = CreateLink {
            links: &links,
            profiles: &profiles,
            max_links: 20,
        };

        let err = uc
            .execute(user, profile.id, candidate("", "ftp://x", "blog"))
            .await
            .unwrap_err();
        match err {
            LinkError::InvalidLink(fields) => assert_eq!(fields.len(), 3),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn rejects_a_profile_the_user_does_not_own() {
        let user = Uuid::new_v4();
        let theirs = profile(Uuid::new_v4());
        let profiles = InMemoryProfiles::with(vec![theirs.clone()]);
        let links = InMemoryLinks::new();
        let uc = CreateLink {
            links: &links,
            profiles: &profiles,
            max_links: 20,
        };

        let err = uc
            .execute(user, theirs.id, candidate("Mine", "https://a.com", "website"))
            .await
            .unwrap_err();
        assert!(matches!(err, LinkError::ProfileNotFound));
    }
}
