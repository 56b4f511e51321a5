use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// The fields of a `jobs` row the scoring engine reads.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobRow {
    pub id: Uuid,
    pub title: String,
    pub level: Option<String>,
    pub location: Option<String>,
    pub jd_text: String,
}
