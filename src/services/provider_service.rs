use serde::Deserialize;
use sqlx::PgPool;

use crate::database::models::InsuranceProvider;

use super::{non_blank, ServiceError};

const PROVIDER_COLUMNS: &str = "id, name, logo, description, is_active, created_at";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProvider {
    pub id: Option<String>,
    pub name: Option<String>,
    pub logo: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProvider {
    pub name: Option<String>,
    pub logo: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

pub struct ProviderService {
    pool: PgPool,
}

impl ProviderService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<InsuranceProvider>, ServiceError> {
        let sql = format!("SELECT {} FROM insurance_providers ORDER BY name", PROVIDER_COLUMNS);
        Ok(sqlx::query_as::<_, InsuranceProvider>(&sql).fetch_all(&self.pool).await?)
    }

    pub async fn select_one(&self, id: &str) -> Result<Option<InsuranceProvider>, ServiceError> {
        let sql = format!("SELECT {} FROM insurance_providers WHERE id = $1", PROVIDER_COLUMNS);
        Ok(sqlx::query_as::<_, InsuranceProvider>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    pub async fn select_404(&self, id: &str) -> Result<InsuranceProvider, ServiceError> {
        self.select_one(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Insurance provider not found"))
    }

    pub async fn exists(&self, id: &str) -> Result<bool, ServiceError> {
        let found: Option<String> = sqlx::query_scalar("SELECT id FROM insurance_providers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(found.is_some())
    }

    pub async fn create(&self, input: CreateProvider) -> Result<InsuranceProvider, ServiceError> {
        let (id, name) = match (non_blank(&input.id), non_blank(&input.name)) {
            (Some(id), Some(name)) => (id.to_string(), name.to_string()),
            _ => return Err(ServiceError::invalid("Provider ID and name are required")),
        };

        if self.exists(&id).await? {
            return Err(ServiceError::invalid("Provider ID already exists"));
        }

        let sql = format!(
            "INSERT INTO insurance_providers (id, name, logo, description, is_active) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            PROVIDER_COLUMNS
        );
        let provider = sqlx::query_as::<_, InsuranceProvider>(&sql)
            .bind(&id)
            .bind(&name)
            .bind(input.logo.unwrap_or_default())
            .bind(input.description.unwrap_or_default())
            .bind(input.is_active.unwrap_or(true))
            .fetch_one(&self.pool)
            .await?;

        tracing::info!("Created insurance provider {}", provider.id);
        Ok(provider)
    }

    pub async fn update_404(&self, id: &str, input: UpdateProvider) -> Result<InsuranceProvider, ServiceError> {
        let sql = format!(
            "UPDATE insurance_providers \
             SET name = COALESCE($1, name), \
                 logo = COALESCE($2, logo), \
                 description = COALESCE($3, description), \
                 is_active = COALESCE($4, is_active) \
             WHERE id = $5 RETURNING {}",
            PROVIDER_COLUMNS
        );
        sqlx::query_as::<_, InsuranceProvider>(&sql)
            .bind(input.name)
            .bind(input.logo)
            .bind(input.description)
            .bind(input.is_active)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ServiceError::not_found("Insurance provider not found"))
    }

    pub async fn delete_404(&self, id: &str) -> Result<(), ServiceError> {
        let deleted = sqlx::query("DELETE FROM insurance_providers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if deleted.rows_affected() == 0 {
            return Err(ServiceError::not_found("Insurance provider not found"));
        }
        tracing::info!("Deleted insurance provider {}", id);
        Ok(())
    }
}
