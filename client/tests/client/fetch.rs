use crate::crud;
use client::resources;
use serde_json::json;
use std::time::Duration;
use test_helpers::spawn_app;

#[tokio::test]
async fn fetch_normalizes_the_backends_mixed_casings() {
    let app = spawn_app().await;
    app.seed("Company", test_helpers::company_fixtures());
    let companies = crud(&app, resources::company());

    companies.fetch(&[]).await;

    let collection = companies.collection();
    assert_eq!(collection.len(), 2);
    assert_eq!(collection[0].int("company_id"), Some(1));
    assert_eq!(collection[0].text("name"), Some("Acme Holdings"));
    assert_eq!(collection[1].bool("is_active"), Some(false));
    assert!(companies.error_message().is_none());
    assert!(companies.success_message().is_some());
    assert!(!companies.is_fetching());
}

#[tokio::test]
async fn fetch_unwraps_the_employee_pagination_envelope() {
    let app = spawn_app().await;
    app.seed("Employee", test_helpers::employee_fixtures());
    let employees = crud(&app, resources::employee());

    employees.fetch(&[]).await;

    let collection = employees.collection();
    assert_eq!(collection.len(), 2);
    assert_eq!(collection[0].text("first_name"), Some("Amara"));
    // The RFC 3339 hire date collapses to a civil date.
    assert_eq!(collection[0].text("hire_date"), Some("2021-03-15"));
    assert_eq!(
        collection[0].decimal("basic_salary"),
        Some("5200.00".parse().unwrap())
    );
}

#[tokio::test]
async fn exhausted_retries_keep_the_stale_collection_and_set_an_error() {
    let app = spawn_app().await;
    app.seed("Company", test_helpers::company_fixtures());
    let companies = crud(&app, resources::company());
    companies.fetch(&[]).await;
    assert_eq!(companies.collection().len(), 2);
    let requests_before = app.request_count();

    app.fail_next(5);
    companies.fetch(&[]).await;

    // Three bounded attempts, then give up without blanking the list.
    assert_eq!(app.request_count() - requests_before, 3);
    assert_eq!(companies.collection().len(), 2);
    assert!(companies.error_message().is_some());
    assert!(!companies.is_fetching());
}

#[tokio::test]
async fn fetch_retries_through_transient_failures() {
    let app = spawn_app().await;
    app.seed("Period", test_helpers::period_fixtures());
    let periods = crud(&app, resources::period());

    app.fail_next(2);
    periods.fetch(&[]).await;

    // Two 503s, then the third attempt lands.
    assert_eq!(periods.collection().len(), 1);
    assert_eq!(periods.collection()[0].text("status"), Some("Closed"));
    assert!(periods.error_message().is_none());
}

#[tokio::test]
async fn overlapping_fetches_resolve_to_the_latest_call() {
    let app = spawn_app().await;
    app.seed("Company", vec![json!({"CompanyID": 1, "CompanyName": "Old"})]);
    let companies = crud(&app, resources::company());

    // The first fetch's response is held back; the second one lands
    // first with fresher data.
    app.delay_next(Duration::from_millis(400));
    let slow = companies.clone();
    let first = tokio::spawn(async move { slow.fetch(&[]).await });
    tokio::time::sleep(Duration::from_millis(50)).await;

    app.seed("Company", vec![json!({"CompanyID": 2, "CompanyName": "New"})]);
    let fast = companies.clone();
    let second = tokio::spawn(async move { fast.fetch(&[]).await });

    first.await.unwrap();
    second.await.unwrap();

    let collection = companies.collection();
    assert_eq!(collection.len(), 1);
    assert_eq!(collection[0].text("name"), Some("New"));
}

#[tokio::test]
async fn detaching_cancels_an_in_flight_fetch_without_touching_state() {
    let app = spawn_app().await;
    app.seed("Company", test_helpers::company_fixtures());
    let companies = crud(&app, resources::company());

    app.delay_next(Duration::from_millis(500));
    let background = companies.clone();
    let pending = tokio::spawn(async move { background.fetch(&[]).await });
    tokio::time::sleep(Duration::from_millis(50)).await;

    companies.detach();
    pending.await.unwrap();

    assert!(companies.collection().is_empty());
    assert!(companies.error_message().is_none());
    assert!(!companies.is_fetching());
}
