use std::collections::HashSet;

use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::PgRow;
use uuid::Uuid;

use crate::application::ports::link_repository::{
    LinkFields, LinkRepository, NewLink, StagedOps,
};
use crate::domain::links::link::{LinkType, ProfileLink};
use crate::infrastructure::db::PgPool;

pub struct SqlxLinkRepository {
    pub pool: PgPool,
    pub max_links: usize,
}

impl SqlxLinkRepository {
    pub fn new(pool: PgPool, max_links: usize) -> Self {
        Self { pool, max_links }
    }

    // Writers on the same profile queue behind this row lock until commit.
    async fn lock_profile(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        profile_id: Uuid,
    ) -> anyhow::Result<()> {
        let locked: Option<Uuid> =
            sqlx::query_scalar("SELECT id FROM profiles WHERE id = $1 FOR UPDATE")
                .bind(profile_id)
                .fetch_optional(&mut **tx)
                .await?;
        if locked.is_none() {
            anyhow::bail!("profile {profile_id} vanished before the write");
        }
        Ok(())
    }
}

fn row_to_link(r: &PgRow) -> anyhow::Result<ProfileLink> {
    let raw_type: String = r.get("type");
    let link_type = LinkType::parse(&raw_type)
        .ok_or_else(|| anyhow::anyhow!("stored link has unknown type {raw_type:?}"))?;
    Ok(ProfileLink {
        id: r.get("id"),
        user_id: r.get("user_id"),
        profile_id: r.get("profile_id"),
        label: r.get("label"),
        url: r.get("url"),
        link_type,
        created_at: r.get("created_at"),
        updated_at: r.get("updated_at"),
    })
}

const LINK_COLUMNS: &str = "id, user_id, profile_id, label, url, type, created_at, updated_at";

#[async_trait]
impl LinkRepository for SqlxLinkRepository {
    async fn list_by_profile(&self, profile_id: Uuid) -> anyhow::Result<Vec<ProfileLink>> {
        let rows = sqlx::query(&format!(
            "SELECT {LINK_COLUMNS} FROM profile_links
             WHERE profile_id = $1
             ORDER BY position, created_at"
        ))
        .bind(profile_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(row_to_link).collect()
    }

    async fn count_for_profile(&self, profile_id: Uuid) -> anyhow::Result<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM profile_links WHERE profile_id = $1")
                .bind(profile_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    async fn get_by_id(&self, id: Uuid) -> anyhow::Result<Option<ProfileLink>> {
        let row = sqlx::query(&format!(
            "SELECT {LINK_COLUMNS} FROM profile_links WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(row_to_link).transpose()
    }

    async fn insert(&self, link: NewLink) -> anyhow::Result<ProfileLink> {
        let mut tx = self.pool.begin().await?;
        Self::lock_profile(&mut tx, link.profile_id).await?;

        // Re-check the ceiling under the lock. The use case already checked
        // it, but a writer that committed since that read could have filled
        // the profile.
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM profile_links WHERE profile_id = $1")
                .bind(link.profile_id)
                .fetch_one(&mut *tx)
                .await?;
        if count >= self.max_links as i64 {
            anyhow::bail!(
                "profile {} filled to {} links by a concurrent write",
                link.profile_id,
                count
            );
        }

        let row = sqlx::query(&format!(
            "INSERT INTO profile_links (user_id, profile_id, label, url, type, position)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {LINK_COLUMNS}"
        ))
        .bind(link.user_id)
        .bind(link.profile_id)
        .bind(&link.label)
        .bind(&link.url)
        .bind(link.link_type.as_str())
        .bind(link.position)
        .fetch_one(&mut *tx)
        .await?;
        let inserted = row_to_link(&row)?;
        tx.commit().await?;
        Ok(inserted)
    }

    async fn update(&self, id: Uuid, fields: LinkFields) -> anyhow::Result<Option<ProfileLink>> {
        let row = sqlx::query(&format!(
            "UPDATE profile_links SET
                label = $1,
                url = $2,
                type = $3,
                position = COALESCE($4, position),
                updated_at = now()
             WHERE id = $5
             RETURNING {LINK_COLUMNS}"
        ))
        .bind(&fields.label)
        .bind(&fields.url)
        .bind(fields.link_type.as_str())
        .bind(fields.position)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(row_to_link).transpose()
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM profile_links WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn run_atomic(
        &self,
        profile_id: Uuid,
        ops: StagedOps,
    ) -> anyhow::Result<Vec<ProfileLink>> {
        let mut tx = self.pool.begin().await?;
        Self::lock_profile(&mut tx, profile_id).await?;

        // The staged ops claim every id the caller saw: updates keep them,
        // deletes drop them. If the stored set differs, the caller's read
        // went stale under a concurrent write; roll back and let it retry
        // from a fresh read.
        let stored: HashSet<Uuid> =
            sqlx::query_scalar("SELECT id FROM profile_links WHERE profile_id = $1")
                .bind(profile_id)
                .fetch_all(&mut *tx)
                .await?
                .into_iter()
                .collect();
        let mut claimed: HashSet<Uuid> = ops.updates.iter().map(|(id, _)| *id).collect();
        claimed.extend(ops.deletes.iter().copied());
        if claimed != stored {
            anyhow::bail!("links for profile {profile_id} changed during batch reconciliation");
        }

        if !ops.deletes.is_empty() {
            sqlx::query("DELETE FROM profile_links WHERE profile_id = $1 AND id = ANY($2)")
                .bind(profile_id)
                .bind(&ops.deletes)
                .execute(&mut *tx)
                .await?;
        }

        for (id, fields) in &ops.updates {
            let res = sqlx::query(
                "UPDATE profile_links SET
                    label = $1,
                    url = $2,
                    type = $3,
                    position = COALESCE($4, position),
                    updated_at = now()
                 WHERE id = $5 AND profile_id = $6",
            )
            .bind(&fields.label)
            .bind(&fields.url)
            .bind(fields.link_type.as_str())
            .bind(fields.position)
            .bind(id)
            .bind(profile_id)
            .execute(&mut *tx)
            .await?;
            // a concurrent reconciliation removed the row between our read
            // and this write; roll everything back and let the caller retry
            if res.rows_affected() == 0 {
                anyhow::bail!("link {id} vanished during batch reconciliation");
            }
        }

        for link in &ops.inserts {
            sqlx::query(
                "INSERT INTO profile_links (user_id, profile_id, label, url, type, position)
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(link.user_id)
            .bind(link.profile_id)
            .bind(&link.label)
            .bind(&link.url)
            .bind(link.link_type.as_str())
            .bind(link.position)
            .execute(&mut *tx)
            .await?;
        }

        let rows = sqlx::query(&format!(
            "SELECT {LINK_COLUMNS} FROM profile_links
             WHERE profile_id = $1
             ORDER BY position, created_at"
        ))
        .bind(profile_id)
        .fetch_all(&mut *tx)
        .await?;
        let links = rows.iter().map(row_to_link).collect::<anyhow::Result<_>>()?;

        tx.commit().await?;
        Ok(links)
    }
}
