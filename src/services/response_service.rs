use serde::Deserialize;
use serde_json::Value;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::database::models::{FormResponse, ResponseDetail};
use crate::types::{ResponseStatus, Role};

use super::{non_blank, ServiceError};

const DETAIL_SELECT: &str = "SELECT fr.id, fr.user_id, fr.section_id, fr.insurance_provider_id, \
       fr.responses, fr.status, fr.is_submitted, fr.submitted_at, fr.created_at, fr.updated_at, \
       u.name AS user_name, u.email AS user_email, u.phone AS user_phone, \
       s.title AS section_title, s.description AS section_description, \
       ip.name AS provider_name, ip.logo AS provider_logo \
  FROM form_responses fr \
  JOIN users u ON fr.user_id = u.id \
  JOIN sections s ON fr.section_id = s.id \
  JOIN insurance_providers ip ON fr.insurance_provider_id = ip.id \
 WHERE 1=1";

/// Which responses a caller may see
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseScope {
    Own(Uuid),
    Provider(String),
    All,
}

impl ResponseScope {
    /// Users see their own, agents their provider's, admins everything
    pub fn for_caller(role: Role, user_id: Uuid, provider_id: Option<&str>) -> Result<Self, ServiceError> {
        match role {
            Role::User => Ok(ResponseScope::Own(user_id)),
            Role::Agent => provider_id
                .map(|p| ResponseScope::Provider(p.to_string()))
                .ok_or_else(|| ServiceError::Forbidden("Agent not assigned to any insurance provider".to_string())),
            Role::Admin => Ok(ResponseScope::All),
        }
    }

    fn push(&self, builder: &mut QueryBuilder<'_, Postgres>) {
        match self {
            ResponseScope::Own(user_id) => {
                builder.push(" AND fr.user_id = ").push_bind(*user_id);
            }
            ResponseScope::Provider(provider_id) => {
                builder.push(" AND fr.insurance_provider_id = ").push_bind(provider_id.clone());
            }
            ResponseScope::All => {}
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseFilters {
    pub insurance_provider_id: Option<String>,
    pub section_id: Option<Uuid>,
    /// Honoured for admins only
    pub user_id: Option<Uuid>,
    pub is_submitted: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveResponse {
    pub section_id: Option<Uuid>,
    pub insurance_provider_id: Option<String>,
    pub responses: Option<Value>,
}

pub struct ResponseService {
    pool: PgPool,
}

impl ResponseService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Newest first, always restricted to `scope`
    pub async fn list(&self, scope: &ResponseScope, filters: ResponseFilters) -> Result<Vec<ResponseDetail>, ServiceError> {
        let status = non_blank(&filters.status)
            .map(|s| s.parse::<ResponseStatus>().map_err(|_| ServiceError::invalid("Invalid status")))
            .transpose()?;

        let mut builder = QueryBuilder::<Postgres>::new(DETAIL_SELECT);
        scope.push(&mut builder);

        if let Some(provider_id) = non_blank(&filters.insurance_provider_id) {
            builder.push(" AND fr.insurance_provider_id = ").push_bind(provider_id.to_string());
        }
        if let Some(section_id) = filters.section_id {
            builder.push(" AND fr.section_id = ").push_bind(section_id);
        }
        if let (Some(user_id), ResponseScope::All) = (filters.user_id, scope) {
            builder.push(" AND fr.user_id = ").push_bind(user_id);
        }
        if let Some(is_submitted) = filters.is_submitted.as_deref() {
            builder.push(" AND fr.is_submitted = ").push_bind(is_submitted == "true");
        }
        if let Some(status) = status {
            builder.push(" AND fr.status = ").push_bind(status.as_str());
        }
        builder.push(" ORDER BY fr.updated_at DESC");

        Ok(builder.build_query_as::<ResponseDetail>().fetch_all(&self.pool).await?)
    }

    pub async fn select_404(&self, scope: &ResponseScope, id: Uuid) -> Result<ResponseDetail, ServiceError> {
        let mut builder = QueryBuilder::<Postgres>::new(DETAIL_SELECT);
        builder.push(" AND fr.id = ").push_bind(id);
        scope.push(&mut builder);

        builder
            .build_query_as::<ResponseDetail>()
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ServiceError::not_found("Response not found"))
    }

    pub async fn for_user_section(&self, user_id: Uuid, section_id: Uuid) -> Result<Option<FormResponse>, ServiceError> {
        Ok(sqlx::query_as::<_, FormResponse>(
            "SELECT * FROM form_responses WHERE user_id = $1 AND section_id = $2",
        )
        .bind(user_id)
        .bind(section_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    /// Create a draft or overwrite the caller's unsubmitted draft
    pub async fn save(&self, user_id: Uuid, input: SaveResponse) -> Result<FormResponse, ServiceError> {
        let (Some(section_id), Some(provider_id), Some(responses)) = (
            input.section_id,
            non_blank(&input.insurance_provider_id),
            input.responses.as_ref().filter(|v| !v.is_null()),
        ) else {
            return Err(ServiceError::invalid("Missing required fields"));
        };

        let belongs: Option<Uuid> = sqlx::query_scalar(
            "SELECT id FROM sections WHERE id = $1 AND insurance_provider_id = $2",
        )
        .bind(section_id)
        .bind(provider_id)
        .fetch_optional(&self.pool)
        .await?;
        if belongs.is_none() {
            return Err(ServiceError::invalid("Invalid section for this insurance provider"));
        }

        let mut tx = self.pool.begin().await?;
        let existing: Option<bool> = sqlx::query_scalar(
            "SELECT is_submitted FROM form_responses WHERE user_id = $1 AND section_id = $2 FOR UPDATE",
        )
        .bind(user_id)
        .bind(section_id)
        .fetch_optional(&mut *tx)
        .await?;

        let saved = match existing {
            Some(true) => return Err(ServiceError::invalid("Cannot edit submitted response")),
            Some(false) => {
                sqlx::query_as::<_, FormResponse>(
                    "UPDATE form_responses SET responses = $1, updated_at = NOW() \
                     WHERE user_id = $2 AND section_id = $3 RETURNING *",
                )
                .bind(responses)
                .bind(user_id)
                .bind(section_id)
                .fetch_one(&mut *tx)
                .await?
            }
            None => {
                sqlx::query_as::<_, FormResponse>(
                    "INSERT INTO form_responses (user_id, section_id, insurance_provider_id, responses, status) \
                     VALUES ($1, $2, $3, $4, $5) RETURNING *",
                )
                .bind(user_id)
                .bind(section_id)
                .bind(provider_id)
                .bind(responses)
                .bind(ResponseStatus::Draft.as_str())
                .fetch_one(&mut *tx)
                .await?
            }
        };
        tx.commit().await?;

        Ok(saved)
    }

    pub async fn submit(&self, user_id: Uuid, id: Uuid) -> Result<FormResponse, ServiceError> {
        let submitted = sqlx::query_as::<_, FormResponse>(
            "UPDATE form_responses \
             SET is_submitted = true, status = $1, submitted_at = NOW(), updated_at = NOW() \
             WHERE id = $2 AND user_id = $3 AND is_submitted = false \
             RETURNING *",
        )
        .bind(ResponseStatus::Submitted.as_str())
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ServiceError::not_found("Response not found or already submitted"))?;

        tracing::info!("Response {} submitted for section {}", submitted.id, submitted.section_id);
        Ok(submitted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scope_follows_role() {
        let user = Uuid::new_v4();
        assert_eq!(ResponseScope::for_caller(Role::User, user, Some("x")).unwrap(), ResponseScope::Own(user));
        assert_eq!(ResponseScope::for_caller(Role::Admin, user, None).unwrap(), ResponseScope::All);
        assert_eq!(
            ResponseScope::for_caller(Role::Agent, user, Some("hdfc-life")).unwrap(),
            ResponseScope::Provider("hdfc-life".to_string())
        );
    }

    #[test]
    fn agent_without_provider_is_forbidden() {
        let err = ResponseScope::for_caller(Role::Agent, Uuid::new_v4(), None).unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(m) if m == "Agent not assigned to any insurance provider"));
    }

    #[test]
    fn scope_is_always_in_the_where_clause() {
        let mut builder = QueryBuilder::<Postgres>::new(DETAIL_SELECT);
        ResponseScope::Provider("hdfc-life".to_string()).push(&mut builder);
        assert!(builder.sql().ends_with("AND fr.insurance_provider_id = $1"));

        let mut builder = QueryBuilder::<Postgres>::new(DETAIL_SELECT);
        ResponseScope::All.push(&mut builder);
        assert!(builder.sql().ends_with("WHERE 1=1"));
    }
}
