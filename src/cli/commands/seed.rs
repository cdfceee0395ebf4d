use serde_json::json;

use crate::cli::{utils::output_success, OutputFormat};
use crate::database::DatabaseManager;
use crate::services::provider_service::CreateProvider;
use crate::services::user_service::RegisterRequest;
use crate::services::{ProviderService, ServiceError, UserService};

const DEFAULT_PROVIDER_ID: &str = "hdfc-life";

struct SeedAccount {
    name: &'static str,
    email: &'static str,
    phone: &'static str,
    password: &'static str,
    role: &'static str,
    provider: Option<&'static str>,
}

const ACCOUNTS: [SeedAccount; 2] = [
    SeedAccount {
        name: "System Admin",
        email: "admin@xcyber.com",
        phone: "+1234567890",
        password: "Admin@123",
        role: "admin",
        provider: None,
    },
    SeedAccount {
        name: "John Agent",
        email: "agent@xcyber.com",
        phone: "+1234567891",
        password: "Agent@123",
        role: "agent",
        provider: Some(DEFAULT_PROVIDER_ID),
    },
];

/// Idempotent: existing accounts only get their password reset
pub async fn handle(output_format: OutputFormat) -> anyhow::Result<()> {
    let pool = DatabaseManager::pool().await?;

    let providers = ProviderService::new(pool.clone());
    if !providers.exists(DEFAULT_PROVIDER_ID).await? {
        providers
            .create(CreateProvider {
                id: Some(DEFAULT_PROVIDER_ID.to_string()),
                name: Some("HDFC Life".to_string()),
                logo: None,
                description: Some("HDFC Life Insurance".to_string()),
                is_active: Some(true),
            })
            .await?;
    }

    let users = UserService::new(pool);
    let mut seeded = Vec::new();
    for account in &ACCOUNTS {
        let request = RegisterRequest {
            name: Some(account.name.to_string()),
            email: Some(account.email.to_string()),
            phone: Some(account.phone.to_string()),
            password: Some(account.password.to_string()),
            role: Some(account.role.to_string()),
            insurance_provider_id: account.provider.map(str::to_string),
        };

        let action = match users.register(request).await {
            Ok(_) => "created",
            Err(ServiceError::Invalid(msg)) if msg == "Email already registered" => {
                users.reset_password(account.email, account.password).await?;
                "password reset"
            }
            Err(e) => return Err(e.into()),
        };

        tracing::info!("Seeded {} account {} ({})", account.role, account.email, action);
        seeded.push(json!({ "email": account.email, "role": account.role, "action": action }));
    }

    output_success(output_format, "Seeding complete", Some(json!({ "accounts": seeded })))
}
