use client::auth::StaticTokenProvider;
use client::resource::Backend;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;

pub mod mock;
pub mod telemetry;

pub use mock::MockApi;
pub use telemetry::{get_subscriber, init_subscriber, log_error};

/// Token the mock backend accepts.
pub const TEST_TOKEN: &str = "tinypay-test-token";

pub struct TestApp {
    pub port: u16,
    pub address: String,
    pub api: MockApi,
}

impl TestApp {
    /// Backend settings pointed at the mock with a valid token.
    pub fn backend(&self) -> Backend {
        self.backend_with_token(TEST_TOKEN)
    }

    pub fn backend_with_token(&self, token: &str) -> Backend {
        Backend::new(
            self.address.clone(),
            Arc::new(StaticTokenProvider::new(token)),
        )
    }

    pub fn seed(&self, resource: &str, rows: Vec<Value>) {
        self.api.seed(resource, rows);
    }

    pub fn rows(&self, resource: &str) -> Vec<Value> {
        self.api.rows(resource)
    }

    pub fn fail_next(&self, n: usize) {
        self.api.fail_next(n);
    }

    pub fn delay_next(&self, delay: Duration) {
        self.api.delay_next(delay);
    }

    pub fn request_count(&self) -> usize {
        self.api.request_count()
    }
}

/// Start the mock payroll backend on an OS-assigned port and hand back a
/// handle for seeding data and injecting failures.
pub async fn spawn_app() -> TestApp {
    telemetry::init_test_telemetry();
    let api = MockApi::new(TEST_TOKEN);
    let (server, port) =
        mock::build(api.clone(), 0).expect("failed to bind mock api");
    tokio::spawn(server);
    TestApp {
        port,
        address: format!("http://127.0.0.1:{port}"),
        api,
    }
}

/// Wire-shaped company fixtures, PascalCase as the real endpoint sends
/// them.
pub fn company_fixtures() -> Vec<Value> {
    vec![
        json!({
            "CompanyID": 1,
            "CompanyName": "Acme Holdings",
            "RegistrationNo": "RC-2291",
            "TaxNo": "T-8842",
            "Email": "payroll@acme.example",
            "IsActive": true,
        }),
        json!({
            "CompanyID": 2,
            "CompanyName": "Borealis Mining",
            "RegistrationNo": "RC-5310",
            "TaxNo": "T-1174",
            "Email": "hr@borealis.example",
            "IsActive": false,
        }),
    ]
}

/// camelCase employee fixtures; the Employee list endpoint wraps these
/// in a pagination envelope.
pub fn employee_fixtures() -> Vec<Value> {
    vec![
        json!({
            "employeeId": 11,
            "companyId": 1,
            "firstName": "Amara",
            "lastName": "Obi",
            "email": "amara.obi@acme.example",
            "hireDate": "2021-03-15T00:00:00Z",
            "jobGradeId": 2,
            "basicSalary": "5200.00",
            "isActive": true,
        }),
        json!({
            "employeeId": 12,
            "companyId": 1,
            "firstName": "Jonas",
            "lastName": "Beck",
            "email": "jonas.beck@acme.example",
            "hireDate": "2023-08-01T00:00:00Z",
            "jobGradeId": 1,
            "basicSalary": "3400.50",
            "isActive": true,
        }),
    ]
}

/// Period fixtures in the mixed casing that endpoint is known for.
pub fn period_fixtures() -> Vec<Value> {
    vec![json!({
        "PeriodId": 100,
        "PeriodName": "Dec 2024",
        "StartDate": "2024-12-01",
        "EndDate": "2024-12-31",
        "CutoffDay": 25,
        "Status": "2",
    })]
}

pub fn leave_fixtures() -> Vec<Value> {
    vec![json!({
        "LeaveID": 40,
        "EmployeeID": 11,
        "LeaveType": "Annual",
        "StartDate": "2025-02-03",
        "EndDate": "2025-02-07",
        "Status": "0",
    })]
}
