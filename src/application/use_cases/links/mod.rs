pub mod create_link;
pub mod delete_link;
pub mod list_links;
pub mod reconcile_links;
pub mod update_link;

/// In-memory port implementations shared by the use-case tests.
#[cfg(test)]
pub(crate) mod support {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use uuid::Uuid;

    use crate::application::ports::link_repository::{
        LinkFields, LinkRepository, NewLink, StagedOps,
    };
    use crate::application::ports::profile_repository::ProfileRepository;
    use crate::domain::links::link::{LinkType, ProfileLink};
    use crate::domain::profiles::profile::Profile;

    pub struct InMemoryProfiles {
        profiles: Vec<Profile>,
    }

    impl InMemoryProfiles {
        pub fn with(profiles: Vec<Profile>) -> Self {
            Self { profiles }
        }
    }

    #[async_trait]
    impl ProfileRepository for InMemoryProfiles {
        async fn get_for_owner(
            &self,
            profile_id: Uuid,
            user_id: Uuid,
        ) -> anyhow::Result<Option<Profile>> {
            Ok(self
                .profiles
                .iter()
                .find(|p| p.id == profile_id && p.user_id == user_id)
                .cloned())
        }
    }

    pub fn profile(user_id: Uuid) -> Profile {
        let now = chrono::Utc::now();
        Profile {
            id: Uuid::new_v4(),
            user_id,
            display_name: "Test profile".into(),
            created_at: now,
            updated_at: now,
        }
    }

    struct Row {
        link: ProfileLink,
        position: i32,
    }

    #[derive(Default)]
    pub struct InMemoryLinks {
        rows: Mutex<Vec<Row>>,
        writes: AtomicUsize,
    }

    impl InMemoryLinks {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn seed(&self, profile: &Profile, label: &str, url: &str, link_type: LinkType) -> Uuid {
            let now = chrono::Utc::now();
            let mut rows = self.rows.lock().unwrap();
            let position = rows.iter().filter(|r| r.link.profile_id == profile.id).count() as i32;
            let link = ProfileLink {
                id: Uuid::new_v4(),
                user_id: profile.user_id,
                profile_id: profile.id,
                label: label.into(),
                url: url.into(),
                link_type,
                created_at: now,
                updated_at: now,
            };
            let id = link.id;
            rows.push(Row { link, position });
            id
        }

        /// Writes observed so far; stays at zero when a batch is rejected.
        pub fn write_count(&self) -> usize {
            self.writes.load(Ordering::SeqCst)
        }
    }

    fn sorted_profile_links(rows: &[Row], profile_id: Uuid) -> Vec<ProfileLink> {
        let mut out: Vec<(i32, ProfileLink)> = rows
            .iter()
            .filter(|r| r.link.profile_id == profile_id)
            .map(|r| (r.position, r.link.clone()))
            .collect();
        out.sort_by_key(|(position, _)| *position);
        out.into_iter().map(|(_, link)| link).collect()
    }

    #[async_trait]
    impl LinkRepository for InMemoryLinks {
        async fn list_by_profile(&self, profile_id: Uuid) -> anyhow::Result<Vec<ProfileLink>> {
            let rows = self.rows.lock().unwrap();
            Ok(sorted_profile_links(&rows, profile_id))
        }

        async fn count_for_profile(&self, profile_id: Uuid) -> anyhow::Result<i64> {
            let rows = self.rows.lock().unwrap();
            Ok(rows.iter().filter(|r| r.link.profile_id == profile_id).count() as i64)
        }

        async fn get_by_id(&self, id: Uuid) -> anyhow::Result<Option<ProfileLink>> {
            let rows = self.rows.lock().unwrap();
            Ok(rows.iter().find(|r| r.link.id == id).map(|r| r.link.clone()))
        }

        async fn insert(&self, link: NewLink) -> anyhow::Result<ProfileLink> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            let now = chrono::Utc::now();
            let stored = ProfileLink {
                id: Uuid::new_v4(),
                user_id: link.user_id,
                profile_id: link.profile_id,
                label: link.label,
                url: link.url,
                link_type: link.link_type,
                created_at: now,
                updated_at: now,
            };
            self.rows.lock().unwrap().push(Row {
                link: stored.clone(),
                position: link.position,
            });
            Ok(stored)
        }

        async fn update(
            &self,
            id: Uuid,
            fields: LinkFields,
        ) -> anyhow::Result<Option<ProfileLink>> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            let mut rows = self.rows.lock().unwrap();
            let Some(row) = rows.iter_mut().find(|r| r.link.id == id) else {
                return Ok(None);
            };
            row.link.label = fields.label;
            row.link.url = fields.url;
            row.link.link_type = fields.link_type;
            row.link.updated_at = chrono::Utc::now();
            if let Some(position) = fields.position {
                row.position = position;
            }
            Ok(Some(row.link.clone()))
        }

        async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            let mut rows = self.rows.lock().unwrap();
            let before = rows.len();
            rows.retain(|r| r.link.id != id);
            Ok(rows.len() < before)
        }

        async fn run_atomic(
            &self,
            profile_id: Uuid,
            ops: StagedOps,
        ) -> anyhow::Result<Vec<ProfileLink>> {
            let write_count = ops.deletes.len() + ops.updates.len() + ops.inserts.len();
            let mut rows = self.rows.lock().unwrap();

            // all-or-nothing: the staged updates and deletes must account for
            // exactly the stored ids, same check the sqlx adapter makes under
            // its profile row lock
            let stored: std::collections::HashSet<Uuid> = rows
                .iter()
                .filter(|r| r.link.profile_id == profile_id)
                .map(|r| r.link.id)
                .collect();
            let mut claimed: std::collections::HashSet<Uuid> =
                ops.updates.iter().map(|(id, _)| *id).collect();
            claimed.extend(ops.deletes.iter().copied());
            if claimed != stored {
                anyhow::bail!("links for profile {profile_id} changed during batch reconciliation");
            }
            self.writes.fetch_add(write_count, Ordering::SeqCst);

            rows.retain(|r| !ops.deletes.contains(&r.link.id));
            for (id, fields) in ops.updates {
                let row = rows.iter_mut().find(|r| r.link.id == id).unwrap();
                row.link.label = fields.label;
                row.link.url = fields.url;
                row.link.link_type = fields.link_type;
                row.link.updated_at = chrono::Utc::now();
                if let Some(position) = fields.position {
                    row.position = position;
                }
            }
            let now = chrono::Utc::now();
            for link in ops.inserts {
                rows.push(Row {
                    link: ProfileLink {
                        id: Uuid::new_v4(),
                        user_id: link.user_id,
                        profile_id: link.profile_id,
                        label: link.label,
                        url: link.url,
                        link_type: link.link_type,
                        created_at: now,
                        updated_at: now,
                    },
                    position: link.position,
                });
            }
            Ok(sorted_profile_links(&rows, profile_id))
        }
    }
}
