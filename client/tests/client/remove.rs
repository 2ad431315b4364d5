use crate::crud;
use client::record::placeholder_key;
use client::resources;
use serde_json::{Value, json};
use test_helpers::spawn_app;

#[tokio::test]
async fn missing_or_placeholder_ids_never_reach_the_network() {
    let app = spawn_app().await;
    let companies = crud(&app, resources::company());
    let requests_before = app.request_count();

    companies.remove(&Value::Null).await;
    assert!(companies.error_message().is_some());

    companies.remove(&json!("")).await;
    companies.remove(&json!(placeholder_key())).await;

    assert_eq!(app.request_count(), requests_before);
}

#[tokio::test]
async fn deleting_refetches_and_reports_success() {
    let app = spawn_app().await;
    app.seed("Company", test_helpers::company_fixtures());
    let companies = crud(&app, resources::company());
    companies.fetch(&[]).await;
    assert_eq!(companies.collection().len(), 2);

    let id = companies.collection()[0].id("company_id").unwrap().clone();
    companies.remove(&id).await;

    assert_eq!(companies.collection().len(), 1);
    assert_eq!(
        companies.success_message().as_deref(),
        Some("Company deleted")
    );
    assert!(!companies.is_deleting());
}

#[tokio::test]
async fn delete_failures_are_absorbed_into_the_error_message() {
    let app = spawn_app().await;
    app.seed("Company", test_helpers::company_fixtures());
    let companies = crud(&app, resources::company());
    companies.fetch(&[]).await;

    app.fail_next(1);
    let id = companies.collection()[0].id("company_id").unwrap().clone();
    companies.remove(&id).await;

    // No rethrow path exists; the message is the whole surface.
    assert_eq!(
        companies.error_message().as_deref(),
        Some("Simulated outage")
    );
    assert_eq!(companies.collection().len(), 2);
}

#[tokio::test]
async fn deleting_an_already_gone_record_reports_the_backend_message() {
    let app = spawn_app().await;
    app.seed("Company", test_helpers::company_fixtures());
    let companies = crud(&app, resources::company());
    companies.fetch(&[]).await;

    companies.remove(&json!(999)).await;

    assert_eq!(
        companies.error_message().as_deref(),
        Some("Company not found")
    );
}
