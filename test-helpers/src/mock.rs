//! In-memory mock of the payroll backend. Deliberately reproduces the
//! quirks the client has to survive: PascalCase on some resources,
//! camelCase on others, a pagination envelope on `Employee` only, and
//! injectable failures and latency.

use actix_cors::Cors;
use actix_web::dev::Server;
use actix_web::{App, HttpRequest, HttpResponse, HttpServer, delete, get, post, put, web};
use payloads::PageEnvelope;
use rust_decimal::{Decimal, dec};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::net::TcpListener;
use std::str::FromStr;
use std::sync::atomic::{AtomicI64, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Handle on the mock backend's state, shared between the server and the
/// test driving it.
#[derive(Clone)]
pub struct MockApi {
    inner: Arc<Inner>,
}

struct Inner {
    token: String,
    store: Mutex<HashMap<String, Vec<Value>>>,
    next_id: AtomicI64,
    fail_next: AtomicUsize,
    delay_next_ms: AtomicU64,
    requests: AtomicUsize,
}

impl MockApi {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(Inner {
                token: token.into(),
                store: Mutex::new(HashMap::new()),
                next_id: AtomicI64::new(1),
                fail_next: AtomicUsize::new(0),
                delay_next_ms: AtomicU64::new(0),
                requests: AtomicUsize::new(0),
            }),
        }
    }

    /// Replace a resource's rows with wire-shaped fixtures.
    pub fn seed(&self, resource: &str, rows: Vec<Value>) {
        self.inner
            .store
            .lock()
            .unwrap()
            .insert(resource.to_string(), rows);
    }

    pub fn rows(&self, resource: &str) -> Vec<Value> {
        self.inner
            .store
            .lock()
            .unwrap()
            .get(resource)
            .cloned()
            .unwrap_or_default()
    }

    /// The next `n` API requests answer 503.
    pub fn fail_next(&self, n: usize) {
        self.inner.fail_next.store(n, Ordering::SeqCst);
    }

    /// The next API request sleeps this long before answering.
    pub fn delay_next(&self, delay: Duration) {
        self.inner
            .delay_next_ms
            .store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    /// Total API requests that reached the mock, including failed ones.
    pub fn request_count(&self) -> usize {
        self.inner.requests.load(Ordering::SeqCst)
    }

    fn next_id(&self) -> i64 {
        self.inner.next_id.fetch_add(1, Ordering::SeqCst)
    }

    /// Auth plus chaos gate run at the top of every handler. Returns the
    /// response to short-circuit with, if any.
    async fn gate(&self, req: &HttpRequest) -> Option<HttpResponse> {
        self.inner.requests.fetch_add(1, Ordering::SeqCst);

        let expected = format!("Bearer {}", self.inner.token);
        let authorized = req
            .headers()
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v == expected);
        if !authorized {
            return Some(HttpResponse::Unauthorized()
                .json(json!({"message": "Missing or invalid bearer token"})));
        }

        let delay_ms = self.inner.delay_next_ms.swap(0, Ordering::SeqCst);
        if delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        }

        let should_fail = self
            .inner
            .fail_next
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| {
                n.checked_sub(1)
            })
            .is_ok();
        if should_fail {
            return Some(HttpResponse::ServiceUnavailable()
                .json(json!({"message": "Simulated outage"})));
        }
        None
    }
}

/// The wire name each resource uses for its identity column.
fn id_key(resource: &str) -> &'static str {
    match resource {
        "Company" => "CompanyID",
        "Employee" => "employeeId",
        "Contract" => "ContractID",
        "JobGrade" => "JobGradeID",
        "ShiftSchedule" => "ShiftScheduleID",
        "Attendance" => "AttendanceID",
        "Leave" => "LeaveID",
        "Earnings" => "EarningID",
        "Deductions" => "DeductionID",
        "Period" => "PeriodId",
        "PayrollRun" => "PayrollRunID",
        _ => "id",
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn row_id(resource: &str, row: &Value) -> Option<String> {
    [id_key(resource), "id", "Id"]
        .iter()
        .find_map(|key| row.get(*key))
        .map(value_text)
}

fn not_found(resource: &str) -> HttpResponse {
    HttpResponse::NotFound().json(json!({
        "message": format!("{resource} not found")
    }))
}

#[get("/api/{resource}")]
async fn list_rows(
    req: HttpRequest,
    path: web::Path<String>,
    api: web::Data<MockApi>,
) -> HttpResponse {
    if let Some(reply) = api.gate(&req).await {
        return reply;
    }
    let resource = path.into_inner();
    let rows = api.rows(&resource);
    // Employee is the one list endpoint that wraps its rows.
    if resource == "Employee" {
        HttpResponse::Ok().json(PageEnvelope::single_page(rows))
    } else {
        HttpResponse::Ok().json(rows)
    }
}

#[get("/api/{resource}/{id}")]
async fn get_row(
    req: HttpRequest,
    path: web::Path<(String, String)>,
    api: web::Data<MockApi>,
) -> HttpResponse {
    if let Some(reply) = api.gate(&req).await {
        return reply;
    }
    let (resource, id) = path.into_inner();
    match api
        .rows(&resource)
        .into_iter()
        .find(|row| row_id(&resource, row).as_deref() == Some(id.as_str()))
    {
        Some(row) => HttpResponse::Ok().json(row),
        None => not_found(&resource),
    }
}

#[post("/api/{resource}")]
async fn create_row(
    req: HttpRequest,
    path: web::Path<String>,
    payload: web::Json<Value>,
    api: web::Data<MockApi>,
) -> HttpResponse {
    if let Some(reply) = api.gate(&req).await {
        return reply;
    }
    let resource = path.into_inner();
    let mut row = payload.into_inner();
    let Some(map) = row.as_object_mut() else {
        return HttpResponse::BadRequest()
            .json(json!({"message": "Expected a JSON object"}));
    };
    map.insert(id_key(&resource).to_string(), json!(api.next_id()));

    let mut store = api.inner.store.lock().unwrap();
    store.entry(resource).or_default().push(row.clone());
    HttpResponse::Created().json(row)
}

#[put("/api/{resource}/{id}")]
async fn update_row(
    req: HttpRequest,
    path: web::Path<(String, String)>,
    payload: web::Json<Value>,
    api: web::Data<MockApi>,
) -> HttpResponse {
    if let Some(reply) = api.gate(&req).await {
        return reply;
    }
    let (resource, id) = path.into_inner();
    let Some(update) = payload.into_inner().as_object().cloned() else {
        return HttpResponse::BadRequest()
            .json(json!({"message": "Expected a JSON object"}));
    };

    let mut store = api.inner.store.lock().unwrap();
    let Some(rows) = store.get_mut(&resource) else {
        return not_found(&resource);
    };
    let Some(row) = rows
        .iter_mut()
        .find(|row| row_id(&resource, row).as_deref() == Some(id.as_str()))
    else {
        return not_found(&resource);
    };
    if let Some(map) = row.as_object_mut() {
        for (key, value) in update {
            map.insert(key, value);
        }
    }
    HttpResponse::Ok().json(row.clone())
}

#[delete("/api/{resource}/{id}")]
async fn delete_row(
    req: HttpRequest,
    path: web::Path<(String, String)>,
    api: web::Data<MockApi>,
) -> HttpResponse {
    if let Some(reply) = api.gate(&req).await {
        return reply;
    }
    let (resource, id) = path.into_inner();
    let mut store = api.inner.store.lock().unwrap();
    let Some(rows) = store.get_mut(&resource) else {
        return not_found(&resource);
    };
    let before = rows.len();
    rows.retain(|row| row_id(&resource, row).as_deref() != Some(id.as_str()));
    if rows.len() == before {
        return not_found(&resource);
    }
    HttpResponse::NoContent().finish()
}

#[put("/api/{resource}/{id}/{verb}")]
async fn row_action(
    req: HttpRequest,
    path: web::Path<(String, String, String)>,
    api: web::Data<MockApi>,
) -> HttpResponse {
    if let Some(reply) = api.gate(&req).await {
        return reply;
    }
    let (resource, id, verb) = path.into_inner();
    let new_status = match verb.as_str() {
        "approve" => "Approved",
        "reject" => "Rejected",
        _ => {
            return HttpResponse::BadRequest()
                .json(json!({"message": format!("Unknown action {verb}")}));
        }
    };

    let mut store = api.inner.store.lock().unwrap();
    let Some(row) = store.get_mut(&resource).and_then(|rows| {
        rows.iter_mut()
            .find(|row| row_id(&resource, row).as_deref() == Some(id.as_str()))
    }) else {
        return not_found(&resource);
    };
    if let Some(map) = row.as_object_mut() {
        map.insert("Status".to_string(), json!(new_status));
    }
    HttpResponse::Ok().json(row.clone())
}

fn decimal_field(row: &Value, keys: &[&str]) -> Decimal {
    keys.iter()
        .find_map(|key| row.get(*key))
        .and_then(|value| match value {
            Value::String(s) => Decimal::from_str(s).ok(),
            Value::Number(n) => Decimal::from_str(&n.to_string()).ok(),
            _ => None,
        })
        .unwrap_or(Decimal::ZERO)
}

fn text_field(row: &Value, keys: &[&str]) -> String {
    keys.iter()
        .find_map(|key| row.get(*key))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// "Run payroll" for a period: one payslip row per employee, replacing
/// any previous run for the same period. The arithmetic is a flat 25%
/// deduction; the client treats the whole computation as opaque anyway.
#[get("/api/PayrollRun/generate/{period_id}")]
async fn generate_payroll(
    req: HttpRequest,
    path: web::Path<String>,
    api: web::Data<MockApi>,
) -> HttpResponse {
    if let Some(reply) = api.gate(&req).await {
        return reply;
    }
    let period_id = path.into_inner();
    let employees = api.rows("Employee");
    if employees.is_empty() {
        return HttpResponse::BadRequest()
            .json(json!({"message": "No employees to run payroll for"}));
    }

    let generated: Vec<Value> = employees
        .iter()
        .map(|employee| {
            let gross = decimal_field(
                employee,
                &["basicSalary", "BasicSalary", "basic_salary"],
            );
            let deductions = (gross * dec!(0.25)).round_dp(2);
            let name = format!(
                "{} {}",
                text_field(employee, &["firstName", "FirstName", "first_name"]),
                text_field(employee, &["lastName", "LastName", "last_name"]),
            );
            json!({
                "PayrollRunID": api.next_id(),
                "PeriodId": period_id
                    .parse::<i64>()
                    .map_or(json!(period_id.clone()), |id| json!(id)),
                "EmployeeID": row_id("Employee", employee),
                "EmployeeName": name.trim(),
                "GrossPay": gross.to_string(),
                "TotalDeductions": deductions.to_string(),
                "NetPay": (gross - deductions).to_string(),
                "GeneratedAt": "2025-01-31",
            })
        })
        .collect();

    let mut store = api.inner.store.lock().unwrap();
    let runs = store.entry("PayrollRun".to_string()).or_default();
    runs.retain(|row| {
        row.get("PeriodId").map(value_text).as_deref()
            != Some(period_id.as_str())
    });
    runs.extend(generated.clone());
    HttpResponse::Ok().json(generated)
}

/// CSV payslip export for one period.
#[get("/api/PayrollRun/download/{period_id}")]
async fn download_payslips(
    req: HttpRequest,
    path: web::Path<String>,
    api: web::Data<MockApi>,
) -> HttpResponse {
    if let Some(reply) = api.gate(&req).await {
        return reply;
    }
    let period_id = path.into_inner();
    let mut csv = String::from("employee,gross_pay,total_deductions,net_pay\n");
    for row in api.rows("PayrollRun") {
        let matches = row.get("PeriodId").map(value_text).as_deref()
            == Some(period_id.as_str());
        if !matches {
            continue;
        }
        csv.push_str(&format!(
            "{},{},{},{}\n",
            text_field(&row, &["EmployeeName"]),
            text_field(&row, &["GrossPay"]),
            text_field(&row, &["TotalDeductions"]),
            text_field(&row, &["NetPay"]),
        ));
    }
    HttpResponse::Ok().content_type("text/csv").body(csv)
}

/// Build the mock server without awaiting it. Binding to port 0 gets an
/// OS-assigned port, returned alongside the server.
pub fn build(api: MockApi, port: u16) -> std::io::Result<(Server, u16)> {
    let listener = TcpListener::bind(("127.0.0.1", port))?;
    let port = listener.local_addr()?.port();
    let data = web::Data::new(api);
    let server = HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .app_data(data.clone())
            .service(generate_payroll)
            .service(download_payslips)
            .service(list_rows)
            .service(create_row)
            .service(get_row)
            .service(update_row)
            .service(delete_row)
            .service(row_action)
    })
    .workers(1)
    .listen(listener)?
    .run();
    Ok((server, port))
}
