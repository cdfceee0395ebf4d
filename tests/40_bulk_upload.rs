mod common;

use anyhow::Result;
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use serde_json::Value;

const CSV_BODY: &str = "question_text,question_type\nWhat is your name?,text\n";

async fn upload(token: String, form: Form) -> Result<(StatusCode, Value)> {
    let server = common::ensure_server().await?;
    let res = reqwest::Client::new()
        .post(server.url("/api/questions/bulk-upload"))
        .bearer_auth(token)
        .multipart(form)
        .send()
        .await?;
    let status = res.status();
    Ok((status, res.json().await?))
}

fn csv_part() -> Result<Part> {
    Ok(Part::bytes(CSV_BODY.as_bytes().to_vec()).file_name("questions.csv").mime_str("text/csv")?)
}

#[tokio::test]
async fn upload_without_file_is_rejected() -> Result<()> {
    let form = Form::new().text("sectionId", uuid::Uuid::new_v4().to_string());
    let (status, body) = upload(common::admin_token(), form).await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "No file uploaded");
    Ok(())
}

#[tokio::test]
async fn upload_without_section_is_rejected() -> Result<()> {
    let form = Form::new().part("file", csv_part()?);
    let (status, body) = upload(common::admin_token(), form).await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Section ID is required");
    Ok(())
}

#[tokio::test]
async fn non_tabular_files_are_refused() -> Result<()> {
    let part = Part::bytes(b"hello".to_vec()).file_name("notes.txt").mime_str("text/plain")?;
    let form = Form::new()
        .text("sectionId", uuid::Uuid::new_v4().to_string())
        .part("file", part);
    let (status, body) = upload(common::admin_token(), form).await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Only CSV and Excel files are allowed");
    Ok(())
}

#[tokio::test]
async fn agents_cannot_upload() -> Result<()> {
    let form = Form::new()
        .text("sectionId", uuid::Uuid::new_v4().to_string())
        .part("file", csv_part()?);
    let (status, body) = upload(common::agent_token(), form).await?;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Insufficient permissions");
    Ok(())
}

#[tokio::test]
async fn agents_are_refused_before_file_checks() -> Result<()> {
    let part = Part::bytes(b"hello".to_vec()).file_name("notes.txt").mime_str("text/plain")?;
    let form = Form::new()
        .text("sectionId", uuid::Uuid::new_v4().to_string())
        .part("file", part);
    let (status, body) = upload(common::agent_token(), form).await?;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Insufficient permissions");
    Ok(())
}
