//! Misdemeanor prior conviction level (G.S. 15A-1340.21).

use std::collections::{BTreeMap, VecDeque};
use std::mem;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use super::domain::{ConvictionRecord, ScoringError};

/// Distinct conviction dates needed to reach level 3.
const LEVEL_THREE_DATES: usize = 5;

pub const fn misdemeanor_level_for(points: u32) -> u8 {
    match points {
        0 => 1,
        1..=4 => 2,
        _ => 3,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MisdemeanorOutcome {
    pub points: u32,
    pub level: u8,
    /// Counted convictions, ordered by conviction date.
    pub counted_convictions: Vec<ConvictionRecord>,
    pub level_two_on: Option<NaiveDate>,
    pub level_three_on: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MisdemeanorState {
    Start,
    Screening,
    Grouping,
    Finished,
}

#[derive(Debug, Default)]
pub(crate) struct MisdemeanorAccumulator {
    pub(crate) remaining: VecDeque<ConvictionRecord>,
    pub(crate) by_date: BTreeMap<NaiveDate, Vec<ConvictionRecord>>,
}

pub fn compute_misdemeanor_level(
    convictions: &[ConvictionRecord],
) -> Result<MisdemeanorOutcome, ScoringError> {
    let mut acc = MisdemeanorAccumulator {
        remaining: convictions.iter().cloned().collect(),
        ..MisdemeanorAccumulator::default()
    };
    let mut state = MisdemeanorState::Start;

    while state != MisdemeanorState::Finished {
        let next = step(state, &mut acc)?;
        debug!(
            from = ?state,
            to = ?next,
            dates = acc.by_date.len(),
            "misdemeanor record transition"
        );
        state = next;
    }

    let dates: Vec<NaiveDate> = acc.by_date.keys().copied().collect();
    let points = u32::try_from(dates.len()).unwrap_or(u32::MAX);

    Ok(MisdemeanorOutcome {
        points,
        level: misdemeanor_level_for(points),
        counted_convictions: acc.by_date.into_values().flatten().collect(),
        level_two_on: dates.first().copied(),
        level_three_on: dates.get(LEVEL_THREE_DATES - 1).copied(),
    })
}

pub(crate) fn step(
    state: MisdemeanorState,
    acc: &mut MisdemeanorAccumulator,
) -> Result<MisdemeanorState, ScoringError> {
    let next = match state {
        MisdemeanorState::Start if acc.remaining.is_empty() => MisdemeanorState::Finished,
        MisdemeanorState::Start => MisdemeanorState::Screening,
        MisdemeanorState::Screening => {
            acc.remaining
                .retain(|conviction| conviction.is_felony() || conviction.is_misdemeanor());
            if acc.remaining.is_empty() {
                MisdemeanorState::Finished
            } else {
                MisdemeanorState::Grouping
            }
        }
        MisdemeanorState::Grouping => {
            for conviction in mem::take(&mut acc.remaining) {
                let date = conviction.require_conviction_date()?;
                acc.by_date.entry(date).or_default().push(conviction);
            }
            MisdemeanorState::Finished
        }
        MisdemeanorState::Finished => MisdemeanorState::Finished,
    };

    Ok(next)
}
