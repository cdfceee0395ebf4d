use anyhow::Context;
use std::path::PathBuf;

use crate::cli::{utils::output_row_errors, utils::output_success, OutputFormat};
use crate::database::DatabaseManager;
use crate::import::{import_questions, ImportError, PgQuestionStore, UploadRequest, UploadedFile};
use crate::types::Role;

/// Run the bulk importer against a local file with admin rights
pub async fn handle(section: String, file: PathBuf, output_format: OutputFormat) -> anyhow::Result<()> {
    let bytes = tokio::fs::read(&file)
        .await
        .with_context(|| format!("failed to read {}", file.display()))?;
    let filename = file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let pool = DatabaseManager::pool().await?;
    let request = UploadRequest {
        caller_role: Role::Admin,
        file: Some(UploadedFile { filename, content_type: None, bytes }),
        section_id: Some(section),
        insurance_provider_id: None,
    };

    match import_questions(&PgQuestionStore::new(pool), request).await {
        Ok(result) => {
            output_row_errors(output_format, &result.error_details);
            let message = result.summary();
            output_success(output_format, &message, Some(serde_json::to_value(&result)?))
        }
        Err(ImportError::AllRowsFailed(result)) => {
            output_row_errors(output_format, &result.error_details);
            anyhow::bail!("All {} rows failed to insert", result.total_rows)
        }
        Err(e) => Err(e.into()),
    }
}
