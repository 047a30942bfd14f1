use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;

use super::domain::{Classification, ConvictionRecord, Defendant, InvalidInput, ScoringError};
use super::felony::{compute_felony_level, FelonyOutcome};
use super::habitual::{HabitualMachine, HabitualOutcome};
use super::misdemeanor::{compute_misdemeanor_level, MisdemeanorOutcome};

/// Whether a pending charge could be brought with habitual felon status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingChargeAssessment {
    pub crime: String,
    pub classification: Classification,
    pub offense_date: NaiveDate,
    pub statute: String,
    pub habitual_eligible: bool,
}

/// Every record level for one defendant, computed from the same conviction list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordReport {
    pub defendant: Defendant,
    pub felony: FelonyOutcome,
    pub misdemeanor: MisdemeanorOutcome,
    pub habitual: HabitualOutcome,
    pub pending: Vec<PendingChargeAssessment>,
}

impl RecordReport {
    pub fn compute(
        defendant: &Defendant,
        convictions: &[ConvictionRecord],
        pending: &[ConvictionRecord],
    ) -> Result<Self, ScoringError> {
        let felony = compute_felony_level(convictions)?;
        let misdemeanor = compute_misdemeanor_level(convictions)?;

        let mut machine = HabitualMachine::new(defendant.birthdate);
        machine.run(convictions)?;

        let pending = pending
            .iter()
            .map(|charge| assess_pending(&machine, charge))
            .collect::<Result<Vec<_>, _>>()?;
        let habitual = machine.outcome()?.clone();

        info!(
            convictions = convictions.len(),
            felony_points = felony.points,
            felony_level = felony.level,
            misdemeanor_points = misdemeanor.points,
            misdemeanor_level = misdemeanor.level,
            habitual_eligible = habitual.eligible,
            "record levels computed"
        );

        Ok(Self {
            defendant: defendant.clone(),
            felony,
            misdemeanor,
            habitual,
            pending,
        })
    }
}

fn assess_pending(
    machine: &HabitualMachine,
    charge: &ConvictionRecord,
) -> Result<PendingChargeAssessment, ScoringError> {
    if let Some(conviction_date) = charge.conviction_date() {
        return Err(InvalidInput::ConvictedPendingCharge {
            crime: charge.crime().to_string(),
            conviction_date,
        }
        .into());
    }

    let habitual_eligible =
        charge.is_felony() && machine.offense_date_is_eligible(charge.offense_date())?;

    Ok(PendingChargeAssessment {
        crime: charge.crime().to_string(),
        classification: charge.classification(),
        offense_date: charge.offense_date(),
        statute: charge.statute().to_string(),
        habitual_eligible,
    })
}
