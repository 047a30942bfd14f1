//! Prior record leveling for North Carolina structured sentencing.
//!
//! Each engine is a small state machine driven by a single loop over an explicit
//! accumulator. Engines take a borrowed conviction list, work on their own copy,
//! and return an immutable outcome.

pub mod age;
pub mod domain;
pub mod felony;
pub mod habitual;
pub mod import;
pub mod misdemeanor;
pub mod report;

#[cfg(test)]
mod tests;

pub use age::{eighteenth_birthday, AgeContext};
pub use domain::{
    Classification, ConvictionRecord, Defendant, InvalidInput, ScoringError, Statute,
    MAX_FIELD_LEN,
};
pub use felony::{
    compute_felony_level, felony_level_for, felony_points, FelonyOutcome, PointComponent,
};
pub use habitual::{compute_habitual_eligibility, HabitualMachine, HabitualOutcome};
pub use import::{ConvictionImporter, ImportError};
pub use misdemeanor::{compute_misdemeanor_level, misdemeanor_level_for, MisdemeanorOutcome};
pub use report::{PendingChargeAssessment, RecordReport};
