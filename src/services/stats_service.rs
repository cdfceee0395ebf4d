use serde::Serialize;
use sqlx::PgPool;

use crate::types::{ResponseStatus, Role};

use super::ServiceError;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub total_users: i64,
    pub total_agents: i64,
    pub total_providers: i64,
    pub total_responses: i64,
    pub submitted_responses: i64,
    pub pending_responses: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AgentStats {
    pub total_responses: i64,
    pub submitted_responses: i64,
    pub pending_responses: i64,
    pub total_users: i64,
}

/// Dashboard counters
pub struct StatsService {
    pool: PgPool,
}

impl StatsService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn count_role(&self, role: Role) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM user_roles WHERE role = $1")
            .bind(role.as_str())
            .fetch_one(&self.pool)
            .await
    }

    async fn count_responses(&self, provider_id: Option<&str>, status: Option<ResponseStatus>) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM form_responses \
             WHERE ($1::text IS NULL OR insurance_provider_id = $1) \
               AND ($2::text IS NULL OR status = $2)",
        )
        .bind(provider_id)
        .bind(status.map(|s| s.as_str()))
        .fetch_one(&self.pool)
        .await
    }

    pub async fn admin(&self) -> Result<AdminStats, ServiceError> {
        let active_providers = async {
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM insurance_providers WHERE is_active = true")
                .fetch_one(&self.pool)
                .await
        };

        let (total_users, total_agents, total_providers, total_responses, submitted_responses, pending_responses) =
            futures::try_join!(
                self.count_role(Role::User),
                self.count_role(Role::Agent),
                active_providers,
                self.count_responses(None, None),
                self.count_responses(None, Some(ResponseStatus::Submitted)),
                self.count_responses(None, Some(ResponseStatus::Draft)),
            )?;

        Ok(AdminStats {
            total_users,
            total_agents,
            total_providers,
            total_responses,
            submitted_responses,
            pending_responses,
        })
    }

    pub async fn agent(&self, provider_id: Option<&str>) -> Result<AgentStats, ServiceError> {
        let provider_id =
            provider_id.ok_or_else(|| ServiceError::invalid("Agent not assigned to any insurance provider"))?;

        let distinct_users = async {
            sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(DISTINCT user_id) FROM form_responses WHERE insurance_provider_id = $1",
            )
            .bind(provider_id)
            .fetch_one(&self.pool)
            .await
        };

        let (total_responses, submitted_responses, pending_responses, total_users) = futures::try_join!(
            self.count_responses(Some(provider_id), None),
            self.count_responses(Some(provider_id), Some(ResponseStatus::Submitted)),
            self.count_responses(Some(provider_id), Some(ResponseStatus::Draft)),
            distinct_users,
        )?;

        Ok(AgentStats {
            total_responses,
            submitted_responses,
            pending_responses,
            total_users,
        })
    }
}
