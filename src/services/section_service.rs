use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;
use sqlx::{types::Json, PgPool};
use uuid::Uuid;

use crate::database::models::{Question, QuestionOption, Section, SectionWithQuestions};
use crate::types::QuestionType;

use super::{non_blank, ProviderService, ServiceError};

const SECTION_COLUMNS: &str = r#"id, insurance_provider_id, title, description, "order", is_active, created_at"#;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSection {
    pub insurance_provider_id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub order: Option<i32>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSection {
    pub title: Option<String>,
    pub description: Option<String>,
    pub order: Option<i32>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuestion {
    #[serde(rename = "type")]
    pub question_type: Option<String>,
    pub label: Option<String>,
    pub placeholder: Option<String>,
    pub required: Option<bool>,
    pub options: Option<Vec<QuestionOption>>,
    pub order: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderQuestions {
    pub question_ids: Option<Value>,
}

impl ReorderQuestions {
    fn ids(&self) -> Result<Vec<Uuid>, ServiceError> {
        let Some(Value::Array(items)) = &self.question_ids else {
            return Err(ServiceError::invalid("questionIds must be an array"));
        };
        items
            .iter()
            .map(|item| {
                item.as_str()
                    .and_then(|s| Uuid::parse_str(s).ok())
                    .ok_or_else(|| ServiceError::invalid("questionIds must contain question ids"))
            })
            .collect()
    }
}

pub struct SectionService {
    pool: PgPool,
}

impl SectionService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Sections in display order, each with its questions in display order
    pub async fn list(&self, provider_id: Option<&str>) -> Result<Vec<SectionWithQuestions>, ServiceError> {
        let sections = match provider_id {
            Some(provider_id) => {
                let sql = format!(
                    r#"SELECT {} FROM sections WHERE insurance_provider_id = $1 ORDER BY "order""#,
                    SECTION_COLUMNS
                );
                sqlx::query_as::<_, Section>(&sql)
                    .bind(provider_id)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let sql = format!(r#"SELECT {} FROM sections ORDER BY "order""#, SECTION_COLUMNS);
                sqlx::query_as::<_, Section>(&sql).fetch_all(&self.pool).await?
            }
        };

        let ids: Vec<Uuid> = sections.iter().map(|s| s.id).collect();
        let questions = sqlx::query_as::<_, Question>(
            r#"SELECT * FROM questions WHERE section_id = ANY($1) ORDER BY "order""#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(attach_questions(sections, questions))
    }

    pub async fn select_one(&self, id: Uuid) -> Result<Option<Section>, ServiceError> {
        let sql = format!("SELECT {} FROM sections WHERE id = $1", SECTION_COLUMNS);
        Ok(sqlx::query_as::<_, Section>(&sql).bind(id).fetch_optional(&self.pool).await?)
    }

    pub async fn select_404(&self, id: Uuid) -> Result<SectionWithQuestions, ServiceError> {
        let section = self
            .select_one(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Section not found"))?;
        let questions = self.questions(id).await?;
        Ok(SectionWithQuestions { section, questions })
    }

    pub async fn questions(&self, section_id: Uuid) -> Result<Vec<Question>, ServiceError> {
        Ok(sqlx::query_as::<_, Question>(
            r#"SELECT * FROM questions WHERE section_id = $1 ORDER BY "order""#,
        )
        .bind(section_id)
        .fetch_all(&self.pool)
        .await?)
    }

    pub async fn create(&self, input: CreateSection) -> Result<SectionWithQuestions, ServiceError> {
        let (provider_id, title) = match (non_blank(&input.insurance_provider_id), non_blank(&input.title)) {
            (Some(p), Some(t)) => (p.to_string(), t.to_string()),
            _ => return Err(ServiceError::invalid("Insurance provider ID and title are required")),
        };

        if !ProviderService::new(self.pool.clone()).exists(&provider_id).await? {
            return Err(ServiceError::invalid("Invalid insurance provider"));
        }

        let sql = format!(
            r#"INSERT INTO sections (insurance_provider_id, title, description, "order", is_active)
               VALUES ($1, $2, $3, $4, $5) RETURNING {}"#,
            SECTION_COLUMNS
        );
        let section = sqlx::query_as::<_, Section>(&sql)
            .bind(&provider_id)
            .bind(&title)
            .bind(input.description.unwrap_or_default())
            .bind(input.order.unwrap_or(0))
            .bind(input.is_active.unwrap_or(true))
            .fetch_one(&self.pool)
            .await?;

        tracing::info!("Created section {} for provider {}", section.id, provider_id);
        Ok(SectionWithQuestions { section, questions: Vec::new() })
    }

    pub async fn update_404(&self, id: Uuid, input: UpdateSection) -> Result<Section, ServiceError> {
        let sql = format!(
            r#"UPDATE sections
               SET title = COALESCE($1, title),
                   description = COALESCE($2, description),
                   "order" = COALESCE($3, "order"),
                   is_active = COALESCE($4, is_active)
               WHERE id = $5 RETURNING {}"#,
            SECTION_COLUMNS
        );
        sqlx::query_as::<_, Section>(&sql)
            .bind(input.title)
            .bind(input.description)
            .bind(input.order)
            .bind(input.is_active)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ServiceError::not_found("Section not found"))
    }

    pub async fn delete_404(&self, id: Uuid) -> Result<(), ServiceError> {
        let deleted = sqlx::query("DELETE FROM sections WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if deleted.rows_affected() == 0 {
            return Err(ServiceError::not_found("Section not found"));
        }
        Ok(())
    }

    pub async fn create_question(&self, section_id: Uuid, input: CreateQuestion) -> Result<Question, ServiceError> {
        let (raw_type, label) = match (non_blank(&input.question_type), non_blank(&input.label)) {
            (Some(t), Some(l)) => (t.to_string(), l.to_string()),
            _ => return Err(ServiceError::invalid("Type and label are required")),
        };
        let question_type: QuestionType = raw_type
            .parse()
            .map_err(|_| ServiceError::invalid("Invalid question type"))?;

        if self.select_one(section_id).await?.is_none() {
            return Err(ServiceError::not_found("Section not found"));
        }

        let question = sqlx::query_as::<_, Question>(
            r#"INSERT INTO questions (section_id, type, label, placeholder, required, options, "order")
               VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *"#,
        )
        .bind(section_id)
        .bind(question_type.as_str())
        .bind(&label)
        .bind(input.placeholder.unwrap_or_default())
        .bind(input.required.unwrap_or(true))
        .bind(input.options.map(Json))
        .bind(input.order.unwrap_or(0))
        .fetch_one(&self.pool)
        .await?;

        Ok(question)
    }

    /// Positions are assigned 0..n in the given order, all in one transaction
    pub async fn reorder_questions(&self, section_id: Uuid, input: ReorderQuestions) -> Result<(), ServiceError> {
        let ids = input.ids()?;

        let mut tx = self.pool.begin().await?;
        for (position, question_id) in ids.iter().enumerate() {
            sqlx::query(r#"UPDATE questions SET "order" = $1 WHERE id = $2 AND section_id = $3"#)
                .bind(position as i32)
                .bind(question_id)
                .bind(section_id)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;

        tracing::debug!("Reordered {} questions in section {}", ids.len(), section_id);
        Ok(())
    }
}

fn attach_questions(sections: Vec<Section>, questions: Vec<Question>) -> Vec<SectionWithQuestions> {
    let mut by_section: HashMap<Uuid, Vec<Question>> = HashMap::new();
    for question in questions {
        by_section.entry(question.section_id).or_default().push(question);
    }

    sections
        .into_iter()
        .map(|section| {
            let questions = by_section.remove(&section.id).unwrap_or_default();
            SectionWithQuestions { section, questions }
        })
        .collect()
}
