use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::{generate_jwt, hash_password, verify_password, Claims};
use crate::database::models::{UserCredentials, UserProfile};
use crate::types::Role;

use super::{non_blank, ProviderService, ServiceError};

const PROFILE_SELECT: &str = "SELECT u.id, u.name, u.email, u.phone, u.created_at, ur.role, ur.insurance_provider_id \
                              FROM users u JOIN user_roles ur ON u.id = ur.user_id";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
    pub insurance_provider_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUser {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: Option<String>,
    pub insurance_provider_id: Option<String>,
}

/// Profile plus a freshly issued token
#[derive(Debug, Serialize)]
pub struct AuthSession {
    pub user: UserProfile,
    pub token: String,
}

impl AuthSession {
    fn issue(user: UserProfile) -> Result<Self, ServiceError> {
        let claims = Claims::new(user.id, user.role, user.insurance_provider_id.clone());
        let token = generate_jwt(&claims)?;
        Ok(Self { user, token })
    }
}

/// Validated registration fields
#[derive(Debug, PartialEq)]
struct Registration<'a> {
    name: &'a str,
    email: &'a str,
    phone: &'a str,
    password: &'a str,
    role: Role,
    insurance_provider_id: Option<&'a str>,
}

impl RegisterRequest {
    fn validate(&self) -> Result<Registration<'_>, ServiceError> {
        let (Some(name), Some(email), Some(phone), Some(password), Some(role)) = (
            non_blank(&self.name),
            non_blank(&self.email),
            non_blank(&self.phone),
            self.password.as_deref().filter(|p| !p.is_empty()),
            non_blank(&self.role),
        ) else {
            return Err(ServiceError::invalid("All fields are required"));
        };

        let role: Role = role.parse().map_err(|_| ServiceError::invalid("Invalid role"))?;
        let insurance_provider_id = non_blank(&self.insurance_provider_id);

        if role == Role::Agent && insurance_provider_id.is_none() {
            return Err(ServiceError::invalid("Insurance provider is required for agents"));
        }

        Ok(Registration { name, email, phone, password, role, insurance_provider_id })
    }
}

pub struct UserService {
    pool: PgPool,
}

impl UserService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn register(&self, request: RegisterRequest) -> Result<AuthSession, ServiceError> {
        let reg = request.validate()?;

        let taken: Option<Uuid> = sqlx::query_scalar("SELECT id FROM users WHERE email = $1")
            .bind(reg.email)
            .fetch_optional(&self.pool)
            .await?;
        if taken.is_some() {
            return Err(ServiceError::invalid("Email already registered"));
        }

        if let Some(provider_id) = reg.insurance_provider_id {
            if !ProviderService::new(self.pool.clone()).exists(provider_id).await? {
                return Err(ServiceError::invalid("Invalid insurance provider"));
            }
        }

        let password_hash = hash_password(reg.password).await?;

        let mut tx = self.pool.begin().await?;
        let user_id: Uuid = sqlx::query_scalar(
            "INSERT INTO users (name, email, phone, password_hash) VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(reg.name)
        .bind(reg.email)
        .bind(reg.phone)
        .bind(&password_hash)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("INSERT INTO user_roles (user_id, role, insurance_provider_id) VALUES ($1, $2, $3)")
            .bind(user_id)
            .bind(reg.role.as_str())
            .bind(reg.insurance_provider_id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        tracing::info!("Registered {} user {}", reg.role, user_id);
        AuthSession::issue(self.select_404(user_id).await?)
    }

    pub async fn login(&self, request: LoginRequest) -> Result<AuthSession, ServiceError> {
        let (Some(email), Some(password), Some(role)) = (
            non_blank(&request.email),
            request.password.as_deref().filter(|p| !p.is_empty()),
            non_blank(&request.role),
        ) else {
            return Err(ServiceError::invalid("Email, password, and role are required"));
        };

        let credentials = sqlx::query_as::<_, UserCredentials>(
            "SELECT u.id, u.name, u.email, u.phone, u.password_hash, u.created_at, ur.role, ur.insurance_provider_id \
             FROM users u JOIN user_roles ur ON u.id = ur.user_id \
             WHERE u.email = $1 AND ur.role = $2",
        )
        .bind(email)
        .bind(role)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ServiceError::Unauthorized("Invalid credentials or role".to_string()))?;

        if !verify_password(password, &credentials.password_hash).await? {
            tracing::warn!("Failed login for {}", email);
            return Err(ServiceError::Unauthorized("Invalid credentials".to_string()));
        }

        AuthSession::issue(credentials.profile)
    }

    pub async fn list(&self, role: Option<&str>) -> Result<Vec<UserProfile>, ServiceError> {
        let users = match role {
            Some(role) => {
                let sql = format!("{} WHERE ur.role = $1 ORDER BY u.created_at DESC", PROFILE_SELECT);
                sqlx::query_as::<_, UserProfile>(&sql).bind(role).fetch_all(&self.pool).await?
            }
            None => {
                let sql = format!("{} ORDER BY u.created_at DESC", PROFILE_SELECT);
                sqlx::query_as::<_, UserProfile>(&sql).fetch_all(&self.pool).await?
            }
        };
        Ok(users)
    }

    pub async fn select_404(&self, id: Uuid) -> Result<UserProfile, ServiceError> {
        let sql = format!("{} WHERE u.id = $1", PROFILE_SELECT);
        sqlx::query_as::<_, UserProfile>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ServiceError::not_found("User not found"))
    }

    pub async fn update_404(&self, id: Uuid, input: UpdateUser) -> Result<UserProfile, ServiceError> {
        let role = non_blank(&input.role)
            .map(|r| r.parse::<Role>().map_err(|_| ServiceError::invalid("Invalid role")))
            .transpose()?;

        let mut tx = self.pool.begin().await?;
        sqlx::query(
            "UPDATE users SET name = COALESCE($1, name), email = COALESCE($2, email), phone = COALESCE($3, phone) \
             WHERE id = $4",
        )
        .bind(input.name)
        .bind(input.email)
        .bind(input.phone)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        if let Some(role) = role {
            sqlx::query("UPDATE user_roles SET role = $1, insurance_provider_id = $2 WHERE user_id = $3")
                .bind(role.as_str())
                .bind(non_blank(&input.insurance_provider_id))
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;

        self.select_404(id).await
    }

    /// Replace the stored hash for an existing account; false when no such email
    pub async fn reset_password(&self, email: &str, password: &str) -> Result<bool, ServiceError> {
        let password_hash = hash_password(password).await?;
        let updated = sqlx::query("UPDATE users SET password_hash = $1 WHERE email = $2")
            .bind(&password_hash)
            .bind(email)
            .execute(&self.pool)
            .await?;
        Ok(updated.rows_affected() > 0)
    }

    pub async fn delete_404(&self, id: Uuid) -> Result<(), ServiceError> {
        let deleted = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if deleted.rows_affected() == 0 {
            return Err(ServiceError::not_found("User not found"));
        }
        tracing::info!("Deleted user {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(role: &str, provider: Option<&str>) -> RegisterRequest {
        RegisterRequest {
            name: Some("Asha".to_string()),
            email: Some("asha@example.com".to_string()),
            phone: Some("+911234567890".to_string()),
            password: Some("Secret@1".to_string()),
            role: Some(role.to_string()),
            insurance_provider_id: provider.map(str::to_string),
        }
    }

    #[test]
    fn registration_requires_every_field() {
        let mut req = request("user", None);
        req.phone = Some("  ".to_string());
        assert!(matches!(req.validate(), Err(ServiceError::Invalid(m)) if m == "All fields are required"));
    }

    #[test]
    fn registration_rejects_unknown_roles() {
        assert!(matches!(request("owner", None).validate(), Err(ServiceError::Invalid(m)) if m == "Invalid role"));
    }

    #[test]
    fn agents_need_a_provider() {
        assert!(matches!(
            request("agent", None).validate(),
            Err(ServiceError::Invalid(m)) if m == "Insurance provider is required for agents"
        ));
        let reg = request("agent", Some("hdfc-life"));
        let reg = reg.validate().unwrap();
        assert_eq!(reg.role, Role::Agent);
        assert_eq!(reg.insurance_provider_id, Some("hdfc-life"));
    }
}
