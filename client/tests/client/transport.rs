use client::ClientError;
use serde_json::json;
use std::time::Duration;
use test_helpers::spawn_app;

#[tokio::test]
async fn a_slow_backend_surfaces_as_a_timeout() {
    let app = spawn_app().await;
    app.seed("Company", test_helpers::company_fixtures());
    let backend = app.backend().with_timeout(Duration::from_millis(100));
    let companies = backend.resource("/api/Company");

    app.delay_next(Duration::from_millis(2000));
    let err = companies.list(&[]).await.unwrap_err();

    assert!(matches!(err, ClientError::Timeout));
    // Timeouts count as transient for the retry controller.
    assert!(err.is_retryable());
}

#[tokio::test]
async fn api_errors_carry_the_backend_message() {
    let app = spawn_app().await;
    let companies = app.backend().resource("/api/Company");

    let err = companies.remove("17").await.unwrap_err();

    match err {
        ClientError::Api { status, message } => {
            assert_eq!(status.as_u16(), 404);
            assert_eq!(message, "Company not found");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn create_returns_the_created_record_with_its_new_identity()
-> anyhow::Result<()> {
    let app = spawn_app().await;
    let companies = app.backend().resource("/api/Company");

    let created = companies
        .create(&json!({"name": "Fresh Co", "is_active": true}))
        .await?;

    assert!(created.get("CompanyID").is_some());
    assert_eq!(created["name"], json!("Fresh Co"));

    let fetched = companies.get(&created["CompanyID"].to_string()).await?;
    assert_eq!(fetched["name"], json!("Fresh Co"));

    Ok(())
}
