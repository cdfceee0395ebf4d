use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use sqlx::{postgres::PgRow, FromRow, Row};
use uuid::Uuid;

use crate::types::ResponseStatus;

/// A user's answers to one section
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub section_id: Uuid,
    pub insurance_provider_id: String,
    pub responses: Value,
    pub status: ResponseStatus,
    pub is_submitted: bool,
    pub submitted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<'r> FromRow<'r, PgRow> for FormResponse {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            section_id: row.try_get("section_id")?,
            insurance_provider_id: row.try_get("insurance_provider_id")?,
            responses: row.try_get("responses")?,
            status: super::parse_column(row, "status")?,
            is_submitted: row.try_get("is_submitted")?,
            submitted_at: row.try_get("submitted_at")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ResponseUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResponseSection {
    pub id: Uuid,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResponseProvider {
    pub id: String,
    pub name: String,
    pub logo: String,
}

/// Response joined with the user, section and provider it belongs to
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseDetail {
    #[serde(flatten)]
    pub response: FormResponse,
    pub user: ResponseUser,
    pub section: ResponseSection,
    pub insurance_provider: ResponseProvider,
}

impl<'r> FromRow<'r, PgRow> for ResponseDetail {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let response = FormResponse::from_row(row)?;
        Ok(Self {
            user: ResponseUser {
                id: response.user_id,
                name: row.try_get("user_name")?,
                email: row.try_get("user_email")?,
                phone: row.try_get("user_phone")?,
            },
            section: ResponseSection {
                id: response.section_id,
                title: row.try_get("section_title")?,
                description: row.try_get("section_description")?,
            },
            insurance_provider: ResponseProvider {
                id: response.insurance_provider_id.clone(),
                name: row.try_get("provider_name")?,
                logo: row.try_get("provider_logo")?,
            },
            response,
        })
    }
}
