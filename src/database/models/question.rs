use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgRow, types::Json, FromRow, Row};
use uuid::Uuid;

use crate::types::QuestionType;

/// One selectable answer of a choice-bearing question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionOption {
    pub id: String,
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: Uuid,
    pub section_id: Uuid,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub label: String,
    pub placeholder: String,
    pub required: bool,
    pub options: Option<Vec<QuestionOption>>,
    pub order: i32,
    pub created_at: DateTime<Utc>,
}

impl<'r> FromRow<'r, PgRow> for Question {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let options: Option<Json<Vec<QuestionOption>>> = row.try_get("options")?;
        let placeholder: Option<String> = row.try_get("placeholder")?;

        Ok(Self {
            id: row.try_get("id")?,
            section_id: row.try_get("section_id")?,
            question_type: super::parse_column(row, "type")?,
            label: row.try_get("label")?,
            placeholder: placeholder.unwrap_or_default(),
            required: row.try_get("required")?,
            options: options.map(|Json(opts)| opts),
            order: row.try_get("order")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

/// A question ready to be written; `created_at` is assigned by the store
#[derive(Debug, Clone, PartialEq)]
pub struct NewQuestion {
    pub id: Uuid,
    pub section_id: Uuid,
    pub question_type: QuestionType,
    pub label: String,
    pub placeholder: String,
    pub required: bool,
    pub options: Option<Vec<QuestionOption>>,
    pub order: i32,
}

impl NewQuestion {
    pub fn into_question(self, created_at: DateTime<Utc>) -> Question {
        Question {
            id: self.id,
            section_id: self.section_id,
            question_type: self.question_type,
            label: self.label,
            placeholder: self.placeholder,
            required: self.required,
            options: self.options,
            order: self.order,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn question_serializes_with_camel_case_fields() {
        let created_at = DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z").unwrap().with_timezone(&Utc);
        let question = NewQuestion {
            id: Uuid::nil(),
            section_id: Uuid::nil(),
            question_type: QuestionType::Mcq,
            label: "Select your gender".to_string(),
            placeholder: String::new(),
            required: true,
            options: Some(vec![QuestionOption {
                id: "opt_1".to_string(),
                label: "Male".to_string(),
                value: "male".to_string(),
            }]),
            order: 3,
        }
        .into_question(created_at);

        let value = serde_json::to_value(&question).unwrap();
        assert_eq!(value["sectionId"], json!(Uuid::nil()));
        assert_eq!(value["type"], "mcq");
        assert_eq!(value["options"][0]["value"], "male");
        assert_eq!(value["order"], 3);
        assert!(value.get("createdAt").is_some());
        assert!(value.get("section_id").is_none());
    }
}
