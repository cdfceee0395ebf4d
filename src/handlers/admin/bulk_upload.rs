// handlers/admin/bulk_upload.rs - POST /api/questions/bulk-upload handler
//
// Multipart fields: `file` (CSV or spreadsheet), `sectionId`, `insuranceProviderId`.
// The admin role is checked by the extractor before the body is read. Transport
// checks (size, file type) run here; everything else belongs to the importer.

use axum::extract::{multipart::MultipartError, Extension, Multipart};
use axum::http::StatusCode;

use crate::config::config;
use crate::error::ApiError;
use crate::import::{import_questions, PgQuestionStore, UploadRequest, UploadResult, UploadedFile};
use crate::middleware::{AdminUser, ApiResponse, ApiResult, AuthUser, DbPool};

fn multipart_error(err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::payload_too_large("File too large")
    } else {
        ApiError::bad_request(err.body_text())
    }
}

/// Pull the upload fields out of the multipart body. Unknown fields are ignored.
async fn read_upload(multipart: &mut Multipart, user: &AuthUser) -> Result<UploadRequest, ApiError> {
    let mut request = UploadRequest {
        caller_role: user.role,
        file: None,
        section_id: None,
        insurance_provider_id: None,
    };

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                // A file part without a filename is a plain form field, not an upload
                let Some(filename) = field.file_name().map(str::to_string) else {
                    continue;
                };
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await.map_err(multipart_error)?;
                request.file = Some(UploadedFile { filename, content_type, bytes: bytes.to_vec() });
            }
            "sectionId" => request.section_id = Some(field.text().await.map_err(multipart_error)?),
            "insuranceProviderId" => {
                request.insurance_provider_id = Some(field.text().await.map_err(multipart_error)?)
            }
            _ => {}
        }
    }

    Ok(request)
}

fn check_transport(file: &UploadedFile) -> Result<(), ApiError> {
    let upload = &config().upload;

    if file.bytes.len() > upload.max_file_bytes {
        return Err(ApiError::payload_too_large("File too large"));
    }
    if !upload.accepts(&file.filename, file.content_type.as_deref()) {
        tracing::debug!(filename = %file.filename, content_type = ?file.content_type, "upload type refused");
        return Err(ApiError::bad_request("Only CSV and Excel files are allowed"));
    }
    Ok(())
}

pub async fn post(
    Extension(DbPool(pool)): Extension<DbPool>,
    AdminUser(user): AdminUser,
    mut multipart: Multipart,
) -> ApiResult<UploadResult> {
    let request = read_upload(&mut multipart, &user).await?;
    if let Some(file) = &request.file {
        check_transport(file)?;
    }

    let result = import_questions(&PgQuestionStore::new(pool), request).await?;
    let message = result.summary();
    Ok(ApiResponse::success(result).with_message(message))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, content_type: Option<&str>, len: usize) -> UploadedFile {
        UploadedFile {
            filename: name.to_string(),
            content_type: content_type.map(str::to_string),
            bytes: vec![b'a'; len],
        }
    }

    #[test]
    fn oversize_files_are_refused_before_import() {
        let err = check_transport(&file("big.csv", Some("text/csv"), 5 * 1024 * 1024 + 1)).unwrap_err();
        assert_eq!(err.status_code(), 413);
    }

    #[test]
    fn only_tabular_files_pass() {
        assert!(check_transport(&file("questions.csv", Some("text/csv"), 10)).is_ok());
        assert!(check_transport(&file("questions.xlsx", None, 10)).is_ok());

        let err = check_transport(&file("notes.txt", Some("text/plain"), 10)).unwrap_err();
        assert_eq!(err.message(), "Only CSV and Excel files are allowed");
    }
}
