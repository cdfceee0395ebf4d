use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct InsuranceProvider {
    pub id: String,
    pub name: String,
    pub logo: String,
    pub description: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}
