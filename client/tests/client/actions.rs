use crate::crud;
use client::resources;
use test_helpers::spawn_app;

#[tokio::test]
async fn approving_a_leave_request_updates_its_status() {
    let app = spawn_app().await;
    app.seed("Leave", test_helpers::leave_fixtures());
    let leave = crud(&app, resources::leave());
    leave.fetch(&[]).await;

    let pending = &leave.collection()[0];
    assert_eq!(pending.text("status"), Some("Pending"));
    let id = pending.id("leave_id").unwrap().clone();

    leave.action(&id, "approve", None).await.unwrap();

    assert_eq!(leave.collection()[0].text("status"), Some("Approved"));
    assert_eq!(leave.success_message().as_deref(), Some("Leave updated"));
}

#[tokio::test]
async fn unknown_verbs_rethrow_the_backend_rejection() {
    let app = spawn_app().await;
    app.seed("Leave", test_helpers::leave_fixtures());
    let leave = crud(&app, resources::leave());
    leave.fetch(&[]).await;

    let id = leave.collection()[0].id("leave_id").unwrap().clone();
    let err = leave.action(&id, "escalate", None).await.unwrap_err();

    assert!(err.to_string().contains("Unknown action"));
}

#[tokio::test]
async fn generating_payroll_populates_the_runs_collection()
-> anyhow::Result<()> {
    let app = spawn_app().await;
    app.seed("Employee", test_helpers::employee_fixtures());
    app.seed("Period", test_helpers::period_fixtures());

    // Generation is an opaque remote computation behind a GET.
    let runs_endpoint = app.backend().resource("/api/PayrollRun");
    runs_endpoint.action_get("generate/100").await?;

    let runs = crud(&app, resources::payroll_run());
    runs.fetch(&[]).await;

    let collection = runs.collection();
    assert_eq!(collection.len(), 2);
    let amara = collection
        .iter()
        .find(|r| r.text("employee_name") == Some("Amara Obi"))
        .unwrap();
    assert_eq!(amara.decimal("gross_pay"), Some("5200.00".parse()?));
    assert_eq!(amara.decimal("net_pay"), Some("3900.00".parse()?));

    Ok(())
}

#[tokio::test]
async fn payslip_download_returns_the_csv_export() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.seed("Employee", test_helpers::employee_fixtures());

    let runs_endpoint = app.backend().resource("/api/PayrollRun");
    runs_endpoint.action_get("generate/100").await?;
    let bytes = runs_endpoint.download("download/100").await?;

    let csv = String::from_utf8(bytes)?;
    let mut lines = csv.lines();
    assert_eq!(
        lines.next(),
        Some("employee,gross_pay,total_deductions,net_pay")
    );
    assert_eq!(lines.count(), 2);

    Ok(())
}
