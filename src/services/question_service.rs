use serde::Deserialize;
use sqlx::{types::Json, PgPool};
use uuid::Uuid;

use crate::database::models::{Question, QuestionOption};
use crate::types::QuestionType;

use super::ServiceError;

/// Partial update; absent fields keep their stored value
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuestion {
    #[serde(rename = "type")]
    pub question_type: Option<String>,
    pub label: Option<String>,
    pub placeholder: Option<String>,
    pub required: Option<bool>,
    pub options: Option<Vec<QuestionOption>>,
    pub order: Option<i32>,
    pub section_id: Option<Uuid>,
}

impl UpdateQuestion {
    fn checked_type(&self) -> Result<Option<QuestionType>, ServiceError> {
        if let Some(label) = &self.label {
            if label.trim().is_empty() {
                return Err(ServiceError::invalid("Question label cannot be empty"));
            }
        }
        self.question_type
            .as_deref()
            .map(|t| t.parse().map_err(|_| ServiceError::invalid("Invalid question type")))
            .transpose()
    }
}

pub struct QuestionService {
    pool: PgPool,
}

impl QuestionService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, section_id: Option<Uuid>) -> Result<Vec<Question>, ServiceError> {
        let questions = match section_id {
            Some(section_id) => {
                sqlx::query_as::<_, Question>(
                    r#"SELECT * FROM questions WHERE section_id = $1 ORDER BY "order""#,
                )
                .bind(section_id)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Question>(r#"SELECT * FROM questions ORDER BY "order""#)
                    .fetch_all(&self.pool)
                    .await?
            }
        };
        Ok(questions)
    }

    pub async fn update_404(&self, id: Uuid, input: UpdateQuestion) -> Result<Question, ServiceError> {
        let question_type = input.checked_type()?;

        sqlx::query_as::<_, Question>(
            r#"UPDATE questions
               SET type = COALESCE($1, type),
                   label = COALESCE($2, label),
                   placeholder = COALESCE($3, placeholder),
                   required = COALESCE($4, required),
                   options = COALESCE($5, options),
                   "order" = COALESCE($6, "order"),
                   section_id = COALESCE($7, section_id)
               WHERE id = $8
               RETURNING *"#,
        )
        .bind(question_type.map(|t| t.as_str()))
        .bind(input.label.map(|l| l.trim().to_string()))
        .bind(input.placeholder)
        .bind(input.required)
        .bind(input.options.map(Json))
        .bind(input.order)
        .bind(input.section_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ServiceError::not_found("Question not found"))
    }

    pub async fn delete_404(&self, id: Uuid) -> Result<(), ServiceError> {
        let deleted = sqlx::query("DELETE FROM questions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if deleted.rows_affected() == 0 {
            return Err(ServiceError::not_found("Question not found"));
        }
        Ok(())
    }
}
