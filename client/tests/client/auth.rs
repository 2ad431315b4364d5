use client::crud::{CrudOptions, CrudResource};
use client::resources;
use client::retry::RetryPolicy;
use client::ClientError;
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use test_helpers::spawn_app;

fn unauthorized_crud(
    app: &test_helpers::TestApp,
) -> (CrudResource, Arc<AtomicBool>) {
    let companies = CrudResource::with_options(
        &app.backend_with_token("stale-token"),
        resources::company(),
        CrudOptions {
            retry: RetryPolicy::fixed(3, Duration::from_millis(20)),
            ..CrudOptions::default()
        },
    );
    let logged_out = Arc::new(AtomicBool::new(false));
    let flag = logged_out.clone();
    companies.on_unauthorized(move || {
        flag.store(true, Ordering::SeqCst);
    });
    (companies, logged_out)
}

#[tokio::test]
async fn a_401_on_fetch_is_not_retried_and_forces_the_logout_hook() {
    let app = spawn_app().await;
    app.seed("Company", test_helpers::company_fixtures());
    let (companies, logged_out) = unauthorized_crud(&app);
    let requests_before = app.request_count();

    companies.fetch(&[]).await;

    // One attempt only: retrying an expired token cannot succeed.
    assert_eq!(app.request_count() - requests_before, 1);
    assert!(logged_out.load(Ordering::SeqCst));
    assert!(
        companies
            .error_message()
            .unwrap()
            .contains("session has expired")
    );
    assert!(companies.collection().is_empty());
}

#[tokio::test]
async fn a_401_on_submit_propagates_as_auth_required() {
    let app = spawn_app().await;
    let (companies, logged_out) = unauthorized_crud(&app);

    let err = companies
        .submit(json!({"name": "Acme"}), false)
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::AuthRequired));
    assert!(logged_out.load(Ordering::SeqCst));
}

#[tokio::test]
async fn the_valid_token_is_injected_per_call() {
    let app = spawn_app().await;
    app.seed("Company", test_helpers::company_fixtures());

    // Same backend settings, correct token: the same endpoint accepts
    // the call.
    let companies = app.backend().resource("/api/Company");
    let body = companies.list(&[]).await.unwrap();
    assert_eq!(body.as_array().unwrap().len(), 2);
}
