//! Feeding program and beneficiary enrollment models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::status::{BmiStatus, HfaStatus};

/// Feeding program lifecycle.
///
/// Transitions are manual (`Active` → `Ended`); programs never auto-expire.
/// Growth verdicts for beneficiaries are only meaningful once a program has
/// ended; while active, callers expose enrollment management instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProgramStatus {
    /// Program is running and accepting beneficiaries
    Active,
    /// Program was manually closed
    Ended,
}

/// A school feeding program
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    /// Program name
    pub name: String,
    /// Lifecycle status
    pub status: ProgramStatus,
    /// First day of the program
    pub start_date: NaiveDate,
    /// Last day of the program
    pub end_date: NaiveDate,
}

impl Program {
    /// Create a new active program
    #[must_use]
    pub const fn new(name: String, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            name,
            status: ProgramStatus::Active,
            start_date,
            end_date,
        }
    }

    /// Manually transition the program to `Ended`
    pub fn end(&mut self) {
        self.status = ProgramStatus::Ended;
    }
}

/// Enrollment of a student into a feeding program.
///
/// Carries a baseline classification snapshot frozen at enrollment time; the
/// student's current classification is joined at read time for growth
/// comparison. Removable by staff action (hard delete), never auto-expires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Beneficiary {
    /// Id of the enrolled student
    pub student_id: u32,
    /// Enrollment date
    pub enrollment_date: NaiveDate,
    /// BMI value at enrollment time
    pub bmi_at_enrollment: f64,
    /// BMI status at enrollment time (frozen baseline)
    pub bmi_status_at_enrollment: Option<BmiStatus>,
    /// Height-for-age status at enrollment time (frozen baseline)
    pub hfa_status_at_enrollment: Option<HfaStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn programs_start_active_and_end_manually() {
        let start = NaiveDate::from_ymd_opt(2025, 6, 16).unwrap();
        let end = NaiveDate::from_ymd_opt(2026, 3, 31).unwrap();
        let mut program = Program::new("SBFP 2025".to_string(), start, end);

        assert_eq!(program.status, ProgramStatus::Active);
        program.end();
        assert_eq!(program.status, ProgramStatus::Ended);
    }

    #[test]
    fn beneficiary_baseline_round_trips_through_json() {
        let beneficiary = Beneficiary {
            student_id: 7,
            enrollment_date: NaiveDate::from_ymd_opt(2025, 6, 20).unwrap(),
            bmi_at_enrollment: 12.8,
            bmi_status_at_enrollment: Some(BmiStatus::Wasted),
            hfa_status_at_enrollment: None,
        };

        let json = serde_json::to_string(&beneficiary).expect("serialize");
        let restored: Beneficiary = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(restored, beneficiary);
    }
}
