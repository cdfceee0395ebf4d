use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::Question;
use crate::types::Role;

use super::inserter::{insert_batch, BatchError};
use super::ordering::OrderAllocator;
use super::parser::{parse_upload, ParseError};
use super::row::CandidateRow;
use super::store::QuestionStore;
use super::validator::{validate_rows, RowError};

/// An uploaded file held in memory
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub caller_role: Role,
    pub file: Option<UploadedFile>,
    pub section_id: Option<String>,
    /// Informational only; the section's own provider binding wins
    pub insurance_provider_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UploadResult {
    pub total_rows: usize,
    pub inserted_rows: usize,
    pub failed_rows: usize,
    pub error_details: Vec<RowError>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub questions: Option<Vec<Question>>,
}

impl UploadResult {
    pub fn summary(&self) -> String {
        format!("Successfully uploaded {} questions", self.inserted_rows)
    }
}

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Insufficient permissions")]
    Forbidden,

    #[error("No file uploaded")]
    NoFile,

    #[error("Section ID is required")]
    MissingSection,

    #[error("Section not found")]
    SectionNotFound,

    #[error("File is empty or has no data rows")]
    EmptyFile,

    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Carries the per-row errors; nothing was written
    #[error("All rows failed to insert")]
    AllRowsFailed(UploadResult),

    #[error(transparent)]
    Storage(#[from] DatabaseError),
}

/// Run one bulk upload end to end: preconditions, parse, validate, allocate
/// orders, insert, and summarize.
pub async fn import_questions(
    store: &dyn QuestionStore,
    request: UploadRequest,
) -> Result<UploadResult, ImportError> {
    if request.caller_role != Role::Admin {
        return Err(ImportError::Forbidden);
    }

    let file = request.file.ok_or(ImportError::NoFile)?;

    let raw_section_id = request
        .section_id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(ImportError::MissingSection)?;

    let section_id = Uuid::parse_str(raw_section_id).map_err(|_| ImportError::SectionNotFound)?;
    let section = store
        .find_section(section_id)
        .await?
        .ok_or(ImportError::SectionNotFound)?;

    if let Some(provider_id) = request.insurance_provider_id.as_deref().filter(|p| !p.is_empty()) {
        if provider_id != section.insurance_provider_id {
            warn!(
                section_id = %section.id,
                supplied = provider_id,
                bound = %section.insurance_provider_id,
                "Upload provider does not match section provider"
            );
        }
    }

    let records = parse_upload(&file.bytes, &file.filename)?;
    if records.is_empty() {
        return Err(ImportError::EmptyFile);
    }

    let total_rows = records.len();
    let candidates = records.into_iter().map(CandidateRow::from).collect();
    let (valid, mut errors) = validate_rows(candidates);

    if valid.is_empty() {
        info!(
            "Bulk upload of {} into section {}: no eligible rows out of {}",
            file.filename, section_id, total_rows
        );
        return Ok(UploadResult {
            total_rows,
            inserted_rows: 0,
            failed_rows: errors.len(),
            error_details: errors,
            questions: Some(Vec::new()),
        });
    }

    let mut tx = store.begin_import(section_id).await?;
    let current_max = match tx.max_order().await {
        Ok(max) => max,
        Err(e) => {
            if let Err(rollback_err) = tx.rollback().await {
                warn!("Rollback after failed max-order read also failed: {}", rollback_err);
            }
            return Err(e.into());
        }
    };
    let rows = OrderAllocator::after(current_max).assign(section_id, valid);

    match insert_batch(tx, rows).await {
        Ok(outcome) => {
            errors.extend(outcome.failed);
            errors.sort_by_key(|e| e.row);

            let result = UploadResult {
                total_rows,
                inserted_rows: outcome.inserted.len(),
                failed_rows: errors.len(),
                error_details: errors,
                questions: Some(outcome.inserted),
            };
            info!(
                "Bulk upload of {} into section {}: {} inserted, {} failed",
                file.filename, section_id, result.inserted_rows, result.failed_rows
            );
            Ok(result)
        }
        Err(BatchError::AllRowsFailed(insert_errors)) => {
            errors.extend(insert_errors);
            errors.sort_by_key(|e| e.row);
            warn!(
                "Bulk upload of {} into section {}: all {} rows failed, rolled back",
                file.filename, section_id, total_rows
            );
            Err(ImportError::AllRowsFailed(UploadResult {
                total_rows,
                inserted_rows: 0,
                failed_rows: errors.len(),
                error_details: errors,
                questions: None,
            }))
        }
        Err(BatchError::Database(e)) => Err(ImportError::Storage(e)),
    }
}
