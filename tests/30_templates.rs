mod common;

use anyhow::Result;
use reqwest::{header, StatusCode};

#[tokio::test]
async fn admin_downloads_csv_template() -> Result<()> {
    let server = common::ensure_server().await?;

    let res = reqwest::Client::new()
        .get(server.url("/api/questions/template/csv"))
        .bearer_auth(common::admin_token())
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()[header::CONTENT_TYPE], "text/csv");
    assert_eq!(
        res.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=questions_template.csv"
    );

    let body = res.text().await?;
    let mut lines = body.lines();
    assert_eq!(lines.next(), Some("question_text,question_type,options,required,placeholder"));
    assert_eq!(lines.count(), 8);
    Ok(())
}

#[tokio::test]
async fn admin_downloads_excel_template() -> Result<()> {
    let server = common::ensure_server().await?;

    let res = reqwest::Client::new()
        .get(server.url("/api/questions/template/excel"))
        .bearer_auth(common::admin_token())
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    // xlsx is a zip container
    let bytes = res.bytes().await?;
    assert!(bytes.starts_with(b"PK"));
    Ok(())
}

#[tokio::test]
async fn agents_cannot_download_templates() -> Result<()> {
    let server = common::ensure_server().await?;

    let res = reqwest::Client::new()
        .get(server.url("/api/questions/template/csv"))
        .bearer_auth(common::agent_token())
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    Ok(())
}
