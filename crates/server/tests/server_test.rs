//! # Basic Server Tests
//!
//! Smoke tests for the root and health endpoints.

mod common;

use anyhow::Result;
use common::TestApp;

#[tokio::test]
async fn test_root_endpoint() -> Result<()> {
    let app = TestApp::spawn("test_root_endpoint").await?;

    let response = app.client.get(&app.address).send().await?;

    assert!(response.status().is_success());
    assert_eq!(response.text().await?, "facade server is running.");
    Ok(())
}

#[tokio::test]
async fn test_health_check() -> Result<()> {
    let app = TestApp::spawn("test_health_check").await?;

    let response = app
        .client
        .get(format!("{}/health", app.address))
        .send()
        .await?;

    assert!(response.status().is_success());
    assert_eq!(response.text().await?, "OK");
    Ok(())
}
