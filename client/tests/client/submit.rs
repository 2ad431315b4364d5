use crate::crud;
use client::ClientError;
use client::resources;
use jiff::civil::date;
use payloads::requests::{EarningValidation, SaveEarning, SavePeriod};
use payloads::PeriodStatus;
use rust_decimal::dec;
use serde_json::json;
use test_helpers::spawn_app;

fn january_period() -> SavePeriod {
    SavePeriod {
        period_id: None,
        name: "Jan 2025".into(),
        start_date: date(2025, 1, 1),
        end_date: date(2025, 1, 31),
        cutoff_day: 25,
        status: PeriodStatus::Open,
    }
}

#[tokio::test]
async fn creating_a_period_refetches_before_resolving() {
    let app = spawn_app().await;
    let periods = crud(&app, resources::period());

    let payload = serde_json::to_value(january_period()).unwrap();
    periods.submit(payload, false).await.unwrap();

    // No further fetch: resolution of submit already implies the
    // collection reflects the backend.
    let collection = periods.collection();
    assert_eq!(collection.len(), 1);
    assert_eq!(collection[0].text("name"), Some("Jan 2025"));
    assert_eq!(collection[0].text("status"), Some("Open"));
    assert!(collection[0].id_text("period_id").is_some());
    assert_eq!(periods.success_message().as_deref(), Some("Period saved"));
}

#[tokio::test]
async fn editing_requires_a_saved_identity() {
    let app = spawn_app().await;
    let periods = crud(&app, resources::period());
    let requests_before = app.request_count();

    let payload = serde_json::to_value(january_period()).unwrap();
    let err = periods.submit(payload, true).await.unwrap_err();

    assert!(matches!(err, ClientError::Validation(_)));
    // Short-circuited before any network call.
    assert_eq!(app.request_count(), requests_before);
}

#[tokio::test]
async fn editing_updates_the_authoritative_record() {
    let app = spawn_app().await;
    app.seed("Company", test_helpers::company_fixtures());
    let companies = crud(&app, resources::company());
    companies.fetch(&[]).await;

    let payload = json!({
        "company_id": 1,
        "name": "Acme Holdings (Pty) Ltd",
        "registration_number": "RC-2291",
        "is_active": true,
    });
    companies.submit(payload, true).await.unwrap();

    let renamed = companies
        .collection()
        .into_iter()
        .find(|record| record.int("company_id") == Some(1))
        .unwrap();
    assert_eq!(renamed.text("name"), Some("Acme Holdings (Pty) Ltd"));
}

#[tokio::test]
async fn submit_failures_rethrow_and_leave_a_sticky_error() {
    let app = spawn_app().await;
    let periods = crud(&app, resources::period());

    app.fail_next(1);
    let payload = serde_json::to_value(january_period()).unwrap();
    let err = periods.submit(payload, false).await.unwrap_err();

    // Mutations are not retried; the form gets the failure to display.
    assert!(matches!(err, ClientError::Api { .. }));
    assert_eq!(
        periods.error_message().as_deref(),
        Some("Simulated outage")
    );
    assert!(periods.collection().is_empty());
    assert!(!periods.is_submitting());
}

#[tokio::test]
async fn form_validation_rejects_a_bad_rate_before_any_network_call() {
    let app = spawn_app().await;
    let requests_before = app.request_count();

    // What the earning modal does on save: validate first, submit only
    // if the payload is sound.
    let request = SaveEarning {
        earning_id: None,
        name: "Overtime".into(),
        amount: dec!(180.00),
        taxable_rate: dec!(1.5),
        recurring: false,
    };
    assert_eq!(request.validate(), EarningValidation::RateOutOfRange);

    assert_eq!(app.request_count(), requests_before);
}
