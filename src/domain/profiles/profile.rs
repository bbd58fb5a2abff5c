use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct Profile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub display_name: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
