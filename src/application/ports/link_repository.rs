use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::links::link::{LinkType, ProfileLink};

/// A link to be inserted; the store assigns id and timestamps.
#[derive(Debug, Clone)]
pub struct NewLink {
    pub user_id: Uuid,
    pub profile_id: Uuid,
    pub label: String,
    pub url: String,
    pub link_type: LinkType,
    pub position: i32,
}

/// Full replacement values for an existing link. Owner pair and id never
/// change through this struct.
#[derive(Debug, Clone)]
pub struct LinkFields {
    pub label: String,
    pub url: String,
    pub link_type: LinkType,
    // None => keep the stored position
    pub position: Option<i32>,
}

/// The staged outcome of a reconciliation, applied as one transaction.
#[derive(Debug, Default)]
pub struct StagedOps {
    pub inserts: Vec<NewLink>,
    pub updates: Vec<(Uuid, LinkFields)>,
    pub deletes: Vec<Uuid>,
}

impl StagedOps {
    pub fn is_empty(&self) -> bool {
        self.inserts.is_empty() && self.updates.is_empty() && self.deletes.is_empty()
    }
}

#[async_trait]
pub trait LinkRepository: Send + Sync {
    // Position order, which is the order the last reconciliation submitted
    async fn list_by_profile(&self, profile_id: Uuid) -> anyhow::Result<Vec<ProfileLink>>;

    async fn count_for_profile(&self, profile_id: Uuid) -> anyhow::Result<i64>;

    async fn get_by_id(&self, id: Uuid) -> anyhow::Result<Option<ProfileLink>>;

    async fn insert(&self, link: NewLink) -> anyhow::Result<ProfileLink>;

    // None => no row with that id (caller maps to not-found)
    async fn update(&self, id: Uuid, fields: LinkFields) -> anyhow::Result<Option<ProfileLink>>;

    // Returns whether a row was removed
    async fn delete(&self, id: Uuid) -> anyhow::Result<bool>;

    /// Applies every staged op inside one transaction and returns the final
    /// collection for the profile in position order, read inside the same
    /// transaction. All-committed or all-rolled-back. Implementations must
    /// serialize batches on the same profile and fail the whole batch when
    /// the staged ops no longer account for exactly the stored ids, so a
    /// caller whose read went stale gets an error instead of a partial or
    /// over-full collection.
    async fn run_atomic(
        &self,
        profile_id: Uuid,
        ops: StagedOps,
    ) -> anyhow::Result<Vec<ProfileLink>>;
}
