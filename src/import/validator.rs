use serde::Serialize;
use uuid::Uuid;

use crate::types::QuestionType;

use super::options::synthesize_options;
use super::row::{CandidateRow, Cell};
use crate::database::models::QuestionOption;

/// A row that failed validation or insertion, reported back to the uploader
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowError {
    pub row: usize,
    pub error: String,
}

impl RowError {
    pub fn new(row: usize, error: impl Into<String>) -> Self {
        Self { row, error: error.into() }
    }
}

/// A row that passed validation, still without a display order
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRow {
    pub row_number: usize,
    pub id: Uuid,
    pub question_type: QuestionType,
    pub label: String,
    pub placeholder: String,
    pub required: bool,
    pub options: Option<Vec<QuestionOption>>,
}

/// Classify one candidate row. The first failing rule decides the error.
pub fn validate_row(row: CandidateRow) -> Result<ValidatedRow, RowError> {
    let label = row.text.trim();
    if label.is_empty() {
        return Err(RowError::new(row.row_number, "Question text is required"));
    }

    let raw_type = if row.question_type.is_empty() {
        QuestionType::Text.as_str().to_string()
    } else {
        row.question_type.to_lowercase()
    };
    let question_type: QuestionType = raw_type.parse().map_err(|_| {
        RowError::new(
            row.row_number,
            format!("Invalid question type: {}. Valid types: {}", raw_type, QuestionType::vocabulary()),
        )
    })?;

    let id = Uuid::new_v4();
    let options = if question_type.is_choice() && !row.options.is_empty() {
        Some(synthesize_options(&id, &row.options))
    } else {
        None
    };

    Ok(ValidatedRow {
        row_number: row.row_number,
        id,
        question_type,
        label: label.to_string(),
        placeholder: row.placeholder,
        required: coerce_required(row.required.as_ref()),
        options,
    })
}

/// Absent column means required; otherwise only "true", "1" or a boolean true count
pub fn coerce_required(cell: Option<&Cell>) -> bool {
    match cell {
        None => true,
        Some(Cell::Bool(b)) => *b,
        Some(Cell::Text(s)) => s == "true" || s == "1",
    }
}

/// Validate every row, keeping accepted rows in input order and accumulating errors
pub fn validate_rows(rows: Vec<CandidateRow>) -> (Vec<ValidatedRow>, Vec<RowError>) {
    let mut valid = Vec::with_capacity(rows.len());
    let mut errors = Vec::new();

    for row in rows {
        match validate_row(row) {
            Ok(v) => valid.push(v),
            Err(e) => errors.push(e),
        }
    }

    (valid, errors)
}
