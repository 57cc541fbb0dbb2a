//! Data models for `Nutristat`

pub mod measurement;
pub mod program;
pub mod status;
pub mod student;

pub use measurement::Measurement;
pub use program::{Beneficiary, Program, ProgramStatus};
pub use status::{BmiStatus, HfaStatus};
pub use student::{grade_label, Sex, Student, SPED_GRADE};
