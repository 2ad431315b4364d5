//! Per-resource configuration: base path, identity field, alias lists,
//! and search fields. Each constructor here replaces what would
//! otherwise be a near-duplicate data-access slice per screen.
//!
//! Alias lists are ordered by how often each casing is seen on the
//! wire; the canonical snake_case name is always probed first.

use crate::error::ClientError;
use crate::normalize::{FieldMap, Transform, normalize_with_identity};
use crate::record::CanonicalRecord;
use serde_json::Value;

const PERIOD_STATUS: &[(&str, &str)] =
    &[("0", "Open"), ("1", "Processing"), ("2", "Closed")];
const LEAVE_STATUS: &[(&str, &str)] =
    &[("0", "Pending"), ("1", "Approved"), ("2", "Rejected")];
const PAY_FREQUENCY: &[(&str, &str)] =
    &[("M", "Monthly"), ("B", "Biweekly"), ("W", "Weekly")];

#[derive(Debug, Clone)]
pub struct ResourceSpec {
    pub name: &'static str,
    pub base_path: &'static str,
    pub id_field: &'static str,
    pub fields: FieldMap,
    /// Display fields the list page's search box matches against.
    pub search_fields: &'static [&'static str],
}

impl ResourceSpec {
    pub fn normalize(
        &self,
        raw: &Value,
    ) -> Result<CanonicalRecord, ClientError> {
        normalize_with_identity(raw, &self.fields, self.name, self.id_field)
    }
}

pub fn company() -> ResourceSpec {
    ResourceSpec {
        name: "Company",
        base_path: "/api/Company",
        id_field: "company_id",
        search_fields: &["name", "registration_number", "email"],
        fields: FieldMap::new()
            .field(
                "company_id",
                &["CompanyID", "CompanyId", "companyId", "Id", "id"],
                Transform::Int,
            )
            .field(
                "name",
                &["CompanyName", "companyName", "Name"],
                Transform::Text,
            )
            .field(
                "registration_number",
                &["RegistrationNo", "registrationNo", "RegistrationNumber"],
                Transform::Text,
            )
            .field(
                "tax_number",
                &["TaxNo", "taxNo", "TaxNumber"],
                Transform::Text,
            )
            .field(
                "email",
                &["Email", "EmailAddress", "email"],
                Transform::Text,
            )
            .field_with_default(
                "is_active",
                &["IsActive", "isActive", "Active"],
                Transform::Bool,
                Value::Bool(true),
            ),
    }
}

pub fn employee() -> ResourceSpec {
    ResourceSpec {
        name: "Employee",
        base_path: "/api/Employee",
        id_field: "employee_id",
        search_fields: &["first_name", "last_name", "email"],
        fields: FieldMap::new()
            .field(
                "employee_id",
                &["EmployeeID", "EmployeeId", "employeeId", "Id", "id"],
                Transform::Int,
            )
            .field(
                "company_id",
                &["CompanyID", "CompanyId", "companyId"],
                Transform::Int,
            )
            .field(
                "first_name",
                &["FirstName", "firstName"],
                Transform::Text,
            )
            .field("last_name", &["LastName", "lastName"], Transform::Text)
            .field("email", &["Email", "EmailAddress"], Transform::Text)
            .field(
                "hire_date",
                &["HireDate", "hireDate", "DateHired"],
                Transform::Date,
            )
            .field(
                "job_grade_id",
                &["JobGradeID", "JobGradeId", "jobGradeId"],
                Transform::Int,
            )
            .field(
                "basic_salary",
                &["BasicSalary", "basicSalary", "Salary"],
                Transform::Decimal,
            )
            .field_with_default(
                "is_active",
                &["IsActive", "isActive"],
                Transform::Bool,
                Value::Bool(true),
            ),
    }
}

pub fn contract() -> ResourceSpec {
    ResourceSpec {
        name: "Contract",
        base_path: "/api/Contract",
        id_field: "contract_id",
        search_fields: &["pay_frequency"],
        fields: FieldMap::new()
            .field(
                "contract_id",
                &["ContractID", "ContractId", "contractId", "id"],
                Transform::Int,
            )
            .field(
                "employee_id",
                &["EmployeeID", "EmployeeId", "employeeId"],
                Transform::Int,
            )
            .field(
                "start_date",
                &["StartDate", "startDate", "ContractStart"],
                Transform::Date,
            )
            .field(
                "end_date",
                &["EndDate", "endDate", "ContractEnd"],
                Transform::Date,
            )
            .field(
                "pay_frequency",
                &["PayFrequency", "payFrequency", "Frequency"],
                Transform::Labels(PAY_FREQUENCY),
            ),
    }
}

pub fn job_grade() -> ResourceSpec {
    ResourceSpec {
        name: "JobGrade",
        base_path: "/api/JobGrade",
        id_field: "job_grade_id",
        search_fields: &["name"],
        fields: FieldMap::new()
            .field(
                "job_grade_id",
                &["JobGradeID", "JobGradeId", "jobGradeId", "id"],
                Transform::Int,
            )
            .field(
                "name",
                &["GradeName", "gradeName", "Name"],
                Transform::Text,
            )
            .field(
                "min_salary",
                &["MinSalary", "minSalary", "SalaryFrom"],
                Transform::Decimal,
            )
            .field(
                "max_salary",
                &["MaxSalary", "maxSalary", "SalaryTo"],
                Transform::Decimal,
            ),
    }
}

pub fn shift_schedule() -> ResourceSpec {
    ResourceSpec {
        name: "ShiftSchedule",
        base_path: "/api/ShiftSchedule",
        id_field: "shift_schedule_id",
        search_fields: &["name"],
        fields: FieldMap::new()
            .field(
                "shift_schedule_id",
                &["ShiftScheduleID", "ShiftScheduleId", "shiftScheduleId", "id"],
                Transform::Int,
            )
            .field(
                "name",
                &["ScheduleName", "scheduleName", "Name"],
                Transform::Text,
            )
            .field(
                "start_time",
                &["StartTime", "startTime", "TimeIn"],
                Transform::Text,
            )
            .field(
                "end_time",
                &["EndTime", "endTime", "TimeOut"],
                Transform::Text,
            )
            .field(
                "work_days",
                &["WorkDays", "workDays", "Days"],
                Transform::Raw,
            ),
    }
}

pub fn attendance() -> ResourceSpec {
    ResourceSpec {
        name: "Attendance",
        base_path: "/api/Attendance",
        id_field: "attendance_id",
        search_fields: &["date"],
        fields: FieldMap::new()
            .field(
                "attendance_id",
                &["AttendanceID", "AttendanceId", "attendanceId", "id"],
                Transform::Int,
            )
            .field(
                "employee_id",
                &["EmployeeID", "EmployeeId", "employeeId"],
                Transform::Int,
            )
            .field(
                "date",
                &["Date", "AttendanceDate", "attendanceDate"],
                Transform::Date,
            )
            .field(
                "clock_in",
                &["ClockIn", "clockIn", "TimeIn"],
                Transform::Text,
            )
            .field(
                "clock_out",
                &["ClockOut", "clockOut", "TimeOut"],
                Transform::Text,
            )
            .field(
                "hours_worked",
                &["HoursWorked", "hoursWorked"],
                Transform::Decimal,
            ),
    }
}

pub fn leave() -> ResourceSpec {
    ResourceSpec {
        name: "Leave",
        base_path: "/api/Leave",
        id_field: "leave_id",
        search_fields: &["leave_type", "status"],
        fields: FieldMap::new()
            .field(
                "leave_id",
                &["LeaveID", "LeaveId", "leaveId", "id"],
                Transform::Int,
            )
            .field(
                "employee_id",
                &["EmployeeID", "EmployeeId", "employeeId"],
                Transform::Int,
            )
            .field(
                "leave_type",
                &["LeaveType", "leaveType", "Type"],
                Transform::Text,
            )
            .field(
                "start_date",
                &["StartDate", "startDate", "LeaveFrom"],
                Transform::Date,
            )
            .field(
                "end_date",
                &["EndDate", "endDate", "LeaveTo"],
                Transform::Date,
            )
            .field(
                "status",
                &["Status", "LeaveStatus", "status"],
                Transform::Labels(LEAVE_STATUS),
            ),
    }
}

pub fn earning() -> ResourceSpec {
    ResourceSpec {
        name: "Earning",
        base_path: "/api/Earnings",
        id_field: "earning_id",
        search_fields: &["name"],
        fields: FieldMap::new()
            .field(
                "earning_id",
                &["EarningID", "EarningId", "earningId", "id"],
                Transform::Int,
            )
            .field(
                "name",
                &["EarningName", "earningName", "Name", "Description"],
                Transform::Text,
            )
            .field(
                "amount",
                &["Amount", "amount", "EarningAmount"],
                Transform::Decimal,
            )
            .field(
                "taxable_rate",
                &["TaxableRate", "taxableRate"],
                Transform::Decimal,
            )
            .field_with_default(
                "recurring",
                &["Recurring", "IsRecurring", "recurring"],
                Transform::Bool,
                Value::Bool(false),
            ),
    }
}

pub fn deduction() -> ResourceSpec {
    ResourceSpec {
        name: "Deduction",
        base_path: "/api/Deductions",
        id_field: "deduction_id",
        search_fields: &["name"],
        fields: FieldMap::new()
            .field(
                "deduction_id",
                &["DeductionID", "DeductionId", "deductionId", "id"],
                Transform::Int,
            )
            .field(
                "name",
                &["DeductionName", "deductionName", "Name", "Description"],
                Transform::Text,
            )
            .field(
                "amount",
                &["Amount", "amount", "DeductionAmount"],
                Transform::Decimal,
            )
            .field_with_default(
                "pre_tax",
                &["PreTax", "preTax", "IsPreTax"],
                Transform::Bool,
                Value::Bool(false),
            ),
    }
}

pub fn period() -> ResourceSpec {
    ResourceSpec {
        name: "Period",
        base_path: "/api/Period",
        id_field: "period_id",
        search_fields: &["name", "status"],
        fields: FieldMap::new()
            .field(
                "period_id",
                &["PeriodId", "periodId", "PeriodID", "id"],
                Transform::Int,
            )
            .field(
                "name",
                &["PeriodName", "periodName", "Name"],
                Transform::Text,
            )
            .field(
                "start_date",
                &["StartDate", "startDate"],
                Transform::Date,
            )
            .field("end_date", &["EndDate", "endDate"], Transform::Date)
            .field(
                "cutoff_day",
                &["CutoffDay", "cutoffDay", "CutOffDay"],
                Transform::Int,
            )
            .field(
                "status",
                &["Status", "PeriodStatus", "status"],
                Transform::Labels(PERIOD_STATUS),
            ),
    }
}

pub fn payroll_run() -> ResourceSpec {
    ResourceSpec {
        name: "PayrollRun",
        base_path: "/api/PayrollRun",
        id_field: "payroll_run_id",
        search_fields: &["employee_name"],
        fields: FieldMap::new()
            .field(
                "payroll_run_id",
                &["PayrollRunID", "PayrollRunId", "payrollRunId", "id"],
                Transform::Int,
            )
            .field(
                "period_id",
                &["PeriodId", "periodId", "PeriodID"],
                Transform::Int,
            )
            .field(
                "employee_id",
                &["EmployeeID", "EmployeeId", "employeeId"],
                Transform::Int,
            )
            .field(
                "employee_name",
                &["EmployeeName", "employeeName"],
                Transform::Text,
            )
            .field(
                "gross_pay",
                &["GrossPay", "grossPay"],
                Transform::Decimal,
            )
            .field(
                "total_deductions",
                &["TotalDeductions", "totalDeductions"],
                Transform::Decimal,
            )
            .field("net_pay", &["NetPay", "netPay"], Transform::Decimal)
            .field(
                "generated_at",
                &["GeneratedAt", "generatedAt", "RunDate"],
                Transform::Date,
            ),
    }
}
