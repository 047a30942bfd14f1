//! Habitual felon status (G.S. 14-7.1).
//!
//! A defendant qualifies after three felony convictions where each offense was
//! committed after the previous counted conviction, and no more than one of the
//! counted offenses was committed before the defendant turned eighteen.

use std::collections::VecDeque;
use std::mem;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use super::age::AgeContext;
use super::domain::{ConvictionRecord, ScoringError};

/// Habitual breaking and entering and habitual misdemeanor assault do not
/// count when the conviction predates 1 December 2004.
const EXCLUDED_BEFORE_CUTOFF: [&str; 2] = ["14-7.31", "14-33.2"];

fn cutoff() -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(2004, 12, 1)
}

fn precedes_cutoff(date: NaiveDate) -> bool {
    cutoff().is_some_and(|cutoff| date < cutoff)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HabitualOutcome {
    pub eligible: bool,
    /// Conviction date of the third counted felony; present only when eligible.
    pub qualifying_date: Option<NaiveDate>,
    pub counted_convictions: Vec<ConvictionRecord>,
    pub eighteenth_birthday: NaiveDate,
}

impl HabitualOutcome {
    /// Whether a later offense committed on `offense_date` can be charged
    /// with habitual status.
    pub fn offense_date_is_eligible(&self, offense_date: NaiveDate) -> bool {
        match (self.eligible, self.qualifying_date) {
            (true, Some(qualifying)) => offense_date > qualifying,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HabitualState {
    Start,
    Screening,
    StrikeOne,
    StrikeTwo,
    StrikeThree,
    Finished,
}

#[derive(Debug)]
pub(crate) struct HabitualAccumulator {
    pub(crate) age: AgeContext,
    pub(crate) remaining: VecDeque<ConvictionRecord>,
    pub(crate) counted: Vec<ConvictionRecord>,
    pub(crate) qualifying_date: Option<NaiveDate>,
}

impl HabitualAccumulator {
    pub(crate) fn new(convictions: &[ConvictionRecord], birthdate: NaiveDate) -> Self {
        Self {
            age: AgeContext::new(birthdate),
            remaining: convictions.iter().cloned().collect(),
            counted: Vec::new(),
            qualifying_date: None,
        }
    }

    fn last_conviction_date(&self) -> Result<Option<NaiveDate>, ScoringError> {
        self.counted
            .last()
            .map(ConvictionRecord::require_conviction_date)
            .transpose()
    }
}

pub fn compute_habitual_eligibility(
    convictions: &[ConvictionRecord],
    birthdate: NaiveDate,
) -> Result<HabitualOutcome, ScoringError> {
    let mut acc = HabitualAccumulator::new(convictions, birthdate);
    let mut state = HabitualState::Start;

    while state != HabitualState::Finished {
        let next = step(state, &mut acc)?;
        debug!(
            from = ?state,
            to = ?next,
            remaining = acc.remaining.len(),
            strikes = acc.counted.len(),
            "habitual status transition"
        );
        state = next;
    }

    Ok(HabitualOutcome {
        eligible: acc.qualifying_date.is_some(),
        qualifying_date: acc.qualifying_date,
        counted_convictions: acc.counted,
        eighteenth_birthday: acc.age.eighteenth_birthday(),
    })
}

pub(crate) fn step(
    state: HabitualState,
    acc: &mut HabitualAccumulator,
) -> Result<HabitualState, ScoringError> {
    let next = match state {
        HabitualState::Start if acc.remaining.is_empty() => HabitualState::Finished,
        HabitualState::Start => HabitualState::Screening,
        HabitualState::Screening => {
            let mut screened = Vec::with_capacity(acc.remaining.len());
            for conviction in mem::take(&mut acc.remaining) {
                if !conviction.is_felony() {
                    continue;
                }
                let convicted_on = conviction.require_conviction_date()?;
                if is_excluded_before_cutoff(&conviction, convicted_on) {
                    debug!(crime = conviction.crime(), "dropping pre-2004 habitual status conviction");
                    continue;
                }
                screened.push(conviction);
            }
            screened.sort_by_key(ConvictionRecord::offense_date);
            acc.remaining = screened.into();

            if acc.remaining.is_empty() {
                HabitualState::Finished
            } else {
                HabitualState::StrikeOne
            }
        }
        HabitualState::StrikeOne => match acc.remaining.pop_front() {
            Some(first) => {
                acc.counted.push(first);
                let age = acc.age;
                acc.remaining
                    .retain(|conviction| age.is_adult_on(conviction.offense_date()));
                HabitualState::StrikeTwo
            }
            None => HabitualState::Finished,
        },
        HabitualState::StrikeTwo => match take_candidate(acc)? {
            Candidate::Counted(_) => HabitualState::StrikeThree,
            Candidate::Overlapping => HabitualState::StrikeTwo,
            Candidate::Exhausted => HabitualState::Finished,
        },
        HabitualState::StrikeThree => match take_candidate(acc)? {
            Candidate::Counted(convicted_on) => {
                acc.qualifying_date = Some(convicted_on);
                HabitualState::Finished
            }
            Candidate::Overlapping => HabitualState::StrikeThree,
            Candidate::Exhausted => HabitualState::Finished,
        },
        HabitualState::Finished => HabitualState::Finished,
    };

    Ok(next)
}

enum Candidate {
    Counted(NaiveDate),
    Overlapping,
    Exhausted,
}

/// Examines the next remaining felony: it counts when its offense date falls
/// strictly after the last counted conviction date, otherwise it is discarded.
fn take_candidate(acc: &mut HabitualAccumulator) -> Result<Candidate, ScoringError> {
    let Some(prior) = acc.last_conviction_date()? else {
        return Ok(Candidate::Exhausted);
    };
    let Some(candidate) = acc.remaining.pop_front() else {
        return Ok(Candidate::Exhausted);
    };

    if candidate.offense_date() > prior {
        let convicted_on = candidate.require_conviction_date()?;
        acc.counted.push(candidate);
        Ok(Candidate::Counted(convicted_on))
    } else {
        debug!(
            crime = candidate.crime(),
            offense = %candidate.offense_date(),
            prior = %prior,
            "discarding overlapping felony"
        );
        Ok(Candidate::Overlapping)
    }
}

fn is_excluded_before_cutoff(conviction: &ConvictionRecord, convicted_on: NaiveDate) -> bool {
    precedes_cutoff(convicted_on)
        && EXCLUDED_BEFORE_CUTOFF
            .iter()
            .any(|section| conviction.statute().cites(section))
}

/// Holds the outcome of the last run so eligibility can be queried later.
#[derive(Debug, Clone)]
pub struct HabitualMachine {
    age: AgeContext,
    outcome: Option<HabitualOutcome>,
}

impl HabitualMachine {
    pub fn new(birthdate: NaiveDate) -> Self {
        Self {
            age: AgeContext::new(birthdate),
            outcome: None,
        }
    }

    pub fn run(
        &mut self,
        convictions: &[ConvictionRecord],
    ) -> Result<&HabitualOutcome, ScoringError> {
        self.outcome = None;
        let outcome = compute_habitual_eligibility(convictions, self.age.birthdate())?;
        Ok(&*self.outcome.insert(outcome))
    }

    pub fn outcome(&self) -> Result<&HabitualOutcome, ScoringError> {
        self.outcome.as_ref().ok_or(ScoringError::NotReady)
    }

    pub fn offense_date_is_eligible(&self, offense_date: NaiveDate) -> Result<bool, ScoringError> {
        Ok(self.outcome()?.offense_date_is_eligible(offense_date))
    }
}
