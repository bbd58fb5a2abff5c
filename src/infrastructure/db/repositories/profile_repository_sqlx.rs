use async_trait::async_trait;
use sqlx::Row;
use uuid::Uuid;

use crate::application::ports::profile_repository::ProfileRepository;
use crate::domain::profiles::profile::Profile;
use crate::infrastructure::db::PgPool;

pub struct SqlxProfileRepository {
    pub pool: PgPool,
}

impl SqlxProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileRepository for SqlxProfileRepository {
    async fn get_for_owner(
        &self,
        profile_id: Uuid,
        user_id: Uuid,
    ) -> anyhow::Result<Option<Profile>> {
        let row = sqlx::query(
            "SELECT id, user_id, display_name, created_at, updated_at
             FROM profiles WHERE id = $1 AND user_id = $2",
        )
        .bind(profile_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|r| Profile {
            id: r.get("id"),
            user_id: r.get("user_id"),
            display_name: r.get("display_name"),
            created_at: r.get("created_at"),
            updated_at: r.get("updated_at"),
        }))
    }
}
