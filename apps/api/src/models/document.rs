use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One uploaded company brief (PDF), stored in the object store.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DocumentRow {
    pub id: Uuid,
    pub company_id: Uuid,
    /// Brief kind: product_list, usp, key_stats, about_us, colour_scheme,
    /// or the optional pillar_brief.
    pub kind: String,
    pub s3_key: String,
    pub uploaded_at: DateTime<Utc>,
}
