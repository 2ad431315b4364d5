use derive_more::Display;
use serde::{Deserialize, Serialize};

pub mod requests;
pub mod responses;

pub use responses::PageEnvelope;

macro_rules! id_type {
    ($(#[$docs:meta])* $name:ident) => {
        $(#[$docs])*
        #[derive(
            Debug,
            Display,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            Serialize,
            Deserialize,
        )]
        pub struct $name(pub i64);
    };
}

id_type!(CompanyId);
id_type!(EmployeeId);
id_type!(ContractId);
id_type!(JobGradeId);
id_type!(ShiftScheduleId);
id_type!(AttendanceId);
id_type!(LeaveId);
id_type!(EarningId);
id_type!(DeductionId);
id_type!(PeriodId);
id_type!(
    /// Identifies one employee's generated payslip within a period.
    PayrollRunId
);

/// Lifecycle of a payroll period.
///
/// Periods open for data capture, lock while payroll is generated, and
/// close once payslips are finalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PeriodStatus {
    Open,
    Processing,
    Closed,
}

impl std::fmt::Display for PeriodStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PeriodStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::Processing => "Processing",
            Self::Closed => "Closed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
}

impl std::fmt::Display for LeaveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl LeaveStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
        }
    }
}

/// How often an employment contract pays out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PayFrequency {
    Monthly,
    Biweekly,
    Weekly,
}

impl std::fmt::Display for PayFrequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PayFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Monthly => "Monthly",
            Self::Biweekly => "Biweekly",
            Self::Weekly => "Weekly",
        }
    }
}
