// handlers/admin/templates.rs - GET /api/questions/template/{csv,excel} handlers

use axum::{
    http::header,
    response::{IntoResponse, Response},
};

use crate::error::ApiError;
use crate::import::template::{csv_template, excel_template, CSV_TEMPLATE_FILENAME, EXCEL_TEMPLATE_FILENAME};
use crate::middleware::AdminUser;

const XLSX_CONTENT_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

fn attachment(content_type: &str, filename: &str, body: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (header::CONTENT_DISPOSITION, format!("attachment; filename={}", filename)),
        ],
        body,
    )
        .into_response()
}

pub async fn csv(_admin: AdminUser) -> Result<Response, ApiError> {
    Ok(attachment("text/csv", CSV_TEMPLATE_FILENAME, csv_template()?))
}

pub async fn excel(_admin: AdminUser) -> Result<Response, ApiError> {
    Ok(attachment(XLSX_CONTENT_TYPE, EXCEL_TEMPLATE_FILENAME, excel_template()?))
}
