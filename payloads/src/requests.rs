use crate::{
    CompanyId, ContractId, DeductionId, EarningId, EmployeeId, JobGradeId,
    LeaveId, LeaveStatus, PayFrequency, PeriodId, PeriodStatus,
    ShiftScheduleId,
};
use jiff::civil;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub const NAME_MAX_LEN: usize = 120;
pub const CUTOFF_DAY_MIN: u8 = 1;
pub const CUTOFF_DAY_MAX: u8 = 31;

/// Create or edit a company. `company_id` is absent for creates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveCompany {
    pub company_id: Option<CompanyId>,
    pub name: String,
    pub registration_number: Option<String>,
    pub tax_number: Option<String>,
    pub email: Option<String>,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveEmployee {
    pub employee_id: Option<EmployeeId>,
    pub company_id: CompanyId,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub hire_date: civil::Date,
    pub job_grade_id: Option<JobGradeId>,
    pub basic_salary: Decimal,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveContract {
    pub contract_id: Option<ContractId>,
    pub employee_id: EmployeeId,
    pub start_date: civil::Date,
    pub end_date: Option<civil::Date>,
    pub pay_frequency: PayFrequency,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveJobGrade {
    pub job_grade_id: Option<JobGradeId>,
    pub name: String,
    pub min_salary: Decimal,
    pub max_salary: Decimal,
}

/// A recurring weekly working pattern. `work_days` holds ISO weekday
/// numbers (1 = Monday .. 7 = Sunday).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveShiftSchedule {
    pub shift_schedule_id: Option<ShiftScheduleId>,
    pub name: String,
    pub start_time: civil::Time,
    pub end_time: civil::Time,
    pub work_days: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveAttendance {
    pub attendance_id: Option<crate::AttendanceId>,
    pub employee_id: EmployeeId,
    pub date: civil::Date,
    pub clock_in: civil::Time,
    pub clock_out: Option<civil::Time>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveLeave {
    pub leave_id: Option<LeaveId>,
    pub employee_id: EmployeeId,
    pub leave_type: String,
    pub start_date: civil::Date,
    pub end_date: civil::Date,
    pub status: LeaveStatus,
}

/// Create or edit an earning line. `taxable_rate` is the fraction of the
/// amount subject to tax and must lie in `0..=1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveEarning {
    pub earning_id: Option<EarningId>,
    pub name: String,
    pub amount: Decimal,
    pub taxable_rate: Decimal,
    pub recurring: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveDeduction {
    pub deduction_id: Option<DeductionId>,
    pub name: String,
    pub amount: Decimal,
    pub pre_tax: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavePeriod {
    pub period_id: Option<PeriodId>,
    pub name: String,
    pub start_date: civil::Date,
    pub end_date: civil::Date,
    pub cutoff_day: u8,
    pub status: PeriodStatus,
}

/// Validation result for resource names shown in list columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameValidation {
    Valid,
    Empty,
    TooLong,
}

impl NameValidation {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    pub fn error_message(&self) -> Option<&'static str> {
        match self {
            Self::Valid => None,
            Self::Empty => Some("Name is required"),
            Self::TooLong => Some("Name must be at most 120 characters"),
        }
    }
}

pub fn validate_name(name: &str) -> NameValidation {
    if name.trim().is_empty() {
        return NameValidation::Empty;
    }
    if name.len() > NAME_MAX_LEN {
        return NameValidation::TooLong;
    }
    NameValidation::Valid
}

/// Validation result for an earning line, checked by the form before the
/// save operation is ever invoked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EarningValidation {
    Valid,
    NameInvalid(NameValidation),
    AmountNegative,
    RateOutOfRange,
}

impl EarningValidation {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    pub fn error_message(&self) -> Option<&'static str> {
        match self {
            Self::Valid => None,
            Self::NameInvalid(v) => v.error_message(),
            Self::AmountNegative => Some("Amount cannot be negative"),
            Self::RateOutOfRange => {
                Some("Taxable rate must be between 0 and 1")
            }
        }
    }
}

impl SaveEarning {
    pub fn validate(&self) -> EarningValidation {
        let name = validate_name(&self.name);
        if !name.is_valid() {
            return EarningValidation::NameInvalid(name);
        }
        if self.amount.is_sign_negative() {
            return EarningValidation::AmountNegative;
        }
        if self.taxable_rate < Decimal::ZERO || self.taxable_rate > Decimal::ONE
        {
            return EarningValidation::RateOutOfRange;
        }
        EarningValidation::Valid
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeriodValidation {
    Valid,
    NameInvalid(NameValidation),
    EndBeforeStart,
    CutoffDayOutOfRange,
}

impl PeriodValidation {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    pub fn error_message(&self) -> Option<&'static str> {
        match self {
            Self::Valid => None,
            Self::NameInvalid(v) => v.error_message(),
            Self::EndBeforeStart => {
                Some("Period end date must not be before its start date")
            }
            Self::CutoffDayOutOfRange => {
                Some("Cutoff day must be between 1 and 31")
            }
        }
    }
}

impl SavePeriod {
    pub fn validate(&self) -> PeriodValidation {
        let name = validate_name(&self.name);
        if !name.is_valid() {
            return PeriodValidation::NameInvalid(name);
        }
        if self.end_date < self.start_date {
            return PeriodValidation::EndBeforeStart;
        }
        if !(CUTOFF_DAY_MIN..=CUTOFF_DAY_MAX).contains(&self.cutoff_day) {
            return PeriodValidation::CutoffDayOutOfRange;
        }
        PeriodValidation::Valid
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobGradeValidation {
    Valid,
    NameInvalid(NameValidation),
    SalaryBandInverted,
}

impl JobGradeValidation {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    pub fn error_message(&self) -> Option<&'static str> {
        match self {
            Self::Valid => None,
            Self::NameInvalid(v) => v.error_message(),
            Self::SalaryBandInverted => {
                Some("Minimum salary cannot exceed maximum salary")
            }
        }
    }
}

impl SaveJobGrade {
    pub fn validate(&self) -> JobGradeValidation {
        let name = validate_name(&self.name);
        if !name.is_valid() {
            return JobGradeValidation::NameInvalid(name);
        }
        if self.min_salary > self.max_salary {
            return JobGradeValidation::SalaryBandInverted;
        }
        JobGradeValidation::Valid
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeaveValidation {
    Valid,
    TypeMissing,
    EndBeforeStart,
}

impl LeaveValidation {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    pub fn error_message(&self) -> Option<&'static str> {
        match self {
            Self::Valid => None,
            Self::TypeMissing => Some("Leave type is required"),
            Self::EndBeforeStart => {
                Some("Leave end date must not be before its start date")
            }
        }
    }
}

impl SaveLeave {
    pub fn validate(&self) -> LeaveValidation {
        if self.leave_type.trim().is_empty() {
            return LeaveValidation::TypeMissing;
        }
        if self.end_date < self.start_date {
            return LeaveValidation::EndBeforeStart;
        }
        LeaveValidation::Valid
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShiftScheduleValidation {
    Valid,
    NameInvalid(NameValidation),
    NoWorkDays,
    InvalidWeekday,
}

impl ShiftScheduleValidation {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    pub fn error_message(&self) -> Option<&'static str> {
        match self {
            Self::Valid => None,
            Self::NameInvalid(v) => v.error_message(),
            Self::NoWorkDays => Some("Select at least one working day"),
            Self::InvalidWeekday => {
                Some("Working days must be ISO weekdays (1-7)")
            }
        }
    }
}

impl SaveShiftSchedule {
    pub fn validate(&self) -> ShiftScheduleValidation {
        let name = validate_name(&self.name);
        if !name.is_valid() {
            return ShiftScheduleValidation::NameInvalid(name);
        }
        if self.work_days.is_empty() {
            return ShiftScheduleValidation::NoWorkDays;
        }
        if self.work_days.iter().any(|d| !(1..=7).contains(d)) {
            return ShiftScheduleValidation::InvalidWeekday;
        }
        ShiftScheduleValidation::Valid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::dec;

    fn earning() -> SaveEarning {
        SaveEarning {
            earning_id: None,
            name: "Housing allowance".into(),
            amount: dec!(2500),
            taxable_rate: dec!(0.5),
            recurring: true,
        }
    }

    #[test]
    fn earning_partial_taxable_rate_above_one_is_rejected() {
        let mut request = earning();
        request.taxable_rate = dec!(1.5);
        assert_eq!(request.validate(), EarningValidation::RateOutOfRange);
    }

    #[test]
    fn earning_rate_bounds_are_inclusive() {
        let mut request = earning();
        request.taxable_rate = Decimal::ZERO;
        assert!(request.validate().is_valid());
        request.taxable_rate = Decimal::ONE;
        assert!(request.validate().is_valid());
    }

    #[test]
    fn period_cutoff_day_must_be_a_calendar_day() {
        let mut request = SavePeriod {
            period_id: None,
            name: "Jan 2025".into(),
            start_date: civil::date(2025, 1, 1),
            end_date: civil::date(2025, 1, 31),
            cutoff_day: 25,
            status: PeriodStatus::Open,
        };
        assert!(request.validate().is_valid());
        request.cutoff_day = 0;
        assert_eq!(
            request.validate(),
            PeriodValidation::CutoffDayOutOfRange
        );
        request.cutoff_day = 32;
        assert_eq!(
            request.validate(),
            PeriodValidation::CutoffDayOutOfRange
        );
    }

    #[test]
    fn job_grade_salary_band_must_not_invert() {
        let request = SaveJobGrade {
            job_grade_id: None,
            name: "G5".into(),
            min_salary: dec!(9000),
            max_salary: dec!(4000),
        };
        assert_eq!(
            request.validate(),
            JobGradeValidation::SalaryBandInverted
        );
    }
}
