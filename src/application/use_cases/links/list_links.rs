use uuid::Uuid;

use crate::application::links::LinkError;
use crate::application::ports::link_repository::LinkRepository;
use crate::application::ports::profile_repository::ProfileRepository;
use crate::domain::links::link::ProfileLink;

pub struct ListLinks<'a, L, P>
where
    L: LinkRepository + ?Sized,
    P: ProfileRepository + ?Sized,
{
    pub links: &'a L,
    pub profiles: &'a P,
}

impl<'a, L, P> ListLinks<'a, L, P>
where
    L: LinkRepository + ?Sized,
    P: ProfileRepository + ?Sized,
{
    pub async fn execute(
        &self,
        user_id: Uuid,
        profile_id: Uuid,
    ) -> Result<Vec<ProfileLink>, LinkError> {
        self.profiles
            .get_for_owner(profile_id, user_id)
            .await
            .map_err(LinkError::Database)?
            .ok_or(LinkError::ProfileNotFound)?;

        self.links
            .list_by_profile(profile_id)
            .await
            .map_err(LinkError::Database)
    }
}
