use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::profiles::profile::Profile;

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    // None => missing or owned by someone else
    async fn get_for_owner(
        &self,
        profile_id: Uuid,
        user_id: Uuid,
    ) -> anyhow::Result<Option<Profile>>;
}
