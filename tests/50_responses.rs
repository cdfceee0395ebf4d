// Response and section rules that only show up against a real database.
// Skipped unless DATABASE_URL points at a disposable Postgres.

use anyhow::Result;
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use xcyber_api::services::section_service::ReorderQuestions;
use xcyber_api::services::{ResponseService, SaveResponse, SectionService, ServiceError};
use xcyber_api::types::ResponseStatus;

async fn test_pool() -> Result<Option<PgPool>> {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set; skipping");
        return Ok(None);
    };
    let pool = PgPool::connect(&url).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;
    Ok(Some(pool))
}

/// A provider with one section, and a plain user to answer it
struct Fixture {
    provider_id: String,
    section_id: Uuid,
    user_id: Uuid,
}

async fn fixture(pool: &PgPool) -> Result<Fixture> {
    let provider_id = format!("test-{}", Uuid::new_v4().simple());
    sqlx::query("INSERT INTO insurance_providers (id, name) VALUES ($1, $2)")
        .bind(&provider_id)
        .bind("Test Provider")
        .execute(pool)
        .await?;

    let section_id: Uuid = sqlx::query_scalar(
        "INSERT INTO sections (insurance_provider_id, title) VALUES ($1, 'Personal') RETURNING id",
    )
    .bind(&provider_id)
    .fetch_one(pool)
    .await?;

    let user_id: Uuid = sqlx::query_scalar(
        "INSERT INTO users (name, email, phone, password_hash) VALUES ('Test', $1, '9999999999', 'x') RETURNING id",
    )
    .bind(format!("{}@example.test", Uuid::new_v4().simple()))
    .fetch_one(pool)
    .await?;

    Ok(Fixture { provider_id, section_id, user_id })
}

fn save_input(section_id: Uuid, provider_id: &str) -> SaveResponse {
    SaveResponse {
        section_id: Some(section_id),
        insurance_provider_id: Some(provider_id.to_string()),
        responses: Some(json!({ "name": "Asha" })),
    }
}

#[tokio::test]
async fn save_refuses_a_section_from_another_provider() -> Result<()> {
    let Some(pool) = test_pool().await? else { return Ok(()) };
    let ours = fixture(&pool).await?;
    let theirs = fixture(&pool).await?;

    let err = ResponseService::new(pool.clone())
        .save(ours.user_id, save_input(ours.section_id, &theirs.provider_id))
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::Invalid(m) if m == "Invalid section for this insurance provider"));
    Ok(())
}

#[tokio::test]
async fn submitted_responses_cannot_be_edited_or_resubmitted() -> Result<()> {
    let Some(pool) = test_pool().await? else { return Ok(()) };
    let f = fixture(&pool).await?;
    let service = ResponseService::new(pool.clone());

    let draft = service.save(f.user_id, save_input(f.section_id, &f.provider_id)).await?;
    assert_eq!(draft.status, ResponseStatus::Draft);

    // A second save overwrites the same draft
    let mut input = save_input(f.section_id, &f.provider_id);
    input.responses = Some(json!({ "name": "Asha K" }));
    let updated = service.save(f.user_id, input).await?;
    assert_eq!(updated.id, draft.id);
    assert_eq!(updated.responses["name"], "Asha K");

    let submitted = service.submit(f.user_id, draft.id).await?;
    assert!(submitted.is_submitted);
    assert_eq!(submitted.status, ResponseStatus::Submitted);
    assert!(submitted.submitted_at.is_some());

    let err = service.save(f.user_id, save_input(f.section_id, &f.provider_id)).await.unwrap_err();
    assert!(matches!(err, ServiceError::Invalid(m) if m == "Cannot edit submitted response"));

    let err = service.submit(f.user_id, draft.id).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(m) if m == "Response not found or already submitted"));
    Ok(())
}

#[tokio::test]
async fn reorder_assigns_positions_within_the_section_only() -> Result<()> {
    let Some(pool) = test_pool().await? else { return Ok(()) };
    let ours = fixture(&pool).await?;
    let other = fixture(&pool).await?;

    let mut ids = Vec::new();
    for (label, order) in [("A", 0), ("B", 1), ("C", 2)] {
        let id: Uuid = sqlx::query_scalar(
            r#"INSERT INTO questions (section_id, type, label, "order") VALUES ($1, 'text', $2, $3) RETURNING id"#,
        )
        .bind(ours.section_id)
        .bind(label)
        .bind(order)
        .fetch_one(&pool)
        .await?;
        ids.push(id);
    }
    let foreign: Uuid = sqlx::query_scalar(
        r#"INSERT INTO questions (section_id, type, label, "order") VALUES ($1, 'text', 'X', 7) RETURNING id"#,
    )
    .bind(other.section_id)
    .fetch_one(&pool)
    .await?;

    let new_order = json!([ids[2], foreign, ids[0], ids[1]]);
    SectionService::new(pool.clone())
        .reorder_questions(ours.section_id, ReorderQuestions { question_ids: Some(new_order) })
        .await?;

    let orders: Vec<(Uuid, i32)> = sqlx::query_as(
        r#"SELECT id, "order" FROM questions WHERE section_id = $1 ORDER BY "order""#,
    )
    .bind(ours.section_id)
    .fetch_all(&pool)
    .await?;
    assert_eq!(orders, vec![(ids[2], 0), (ids[0], 2), (ids[1], 3)]);

    let untouched: i32 = sqlx::query_scalar(r#"SELECT "order" FROM questions WHERE id = $1"#)
        .bind(foreign)
        .fetch_one(&pool)
        .await?;
    assert_eq!(untouched, 7);
    Ok(())
}
