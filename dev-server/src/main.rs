//! Runs the mock payroll backend on a fixed port with demo data, for
//! working on client consumers without the real backend around.

use test_helpers::mock::MockApi;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let subscriber = test_helpers::get_subscriber("info".into());
    test_helpers::init_subscriber(subscriber);

    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8000);
    let token = std::env::var("API_TOKEN")
        .unwrap_or_else(|_| "local-dev-token".to_string());

    let api = MockApi::new(token.clone());
    api.seed("Company", test_helpers::company_fixtures());
    api.seed("Employee", test_helpers::employee_fixtures());
    api.seed("Period", test_helpers::period_fixtures());
    api.seed("Leave", test_helpers::leave_fixtures());

    let (server, port) = test_helpers::mock::build(api, port)?;
    tracing::info!(
        "mock payroll api on http://127.0.0.1:{port} (bearer token: {token})"
    );
    server.await?;
    Ok(())
}
