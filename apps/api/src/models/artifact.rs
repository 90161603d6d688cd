use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One generated (or user-overwritten) pipeline output.
/// The text itself lives in the object store; this row is the index.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ArtifactRow {
    pub id: Uuid,
    pub company_id: Uuid,
    pub kind: String,
    pub s3_key: String,
    /// True once the user has re-uploaded an edited version over the
    /// generated one.
    pub edited: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
