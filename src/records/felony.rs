//! Felony prior record level (G.S. 15A-1340.14).
//!
//! Only the most serious conviction on each conviction date counts. Misdemeanors
//! count only as Class 1 or Class A1, and chapter 20 misdemeanors only for
//! impaired driving, commercial impaired driving and misdemeanor death by vehicle.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, VecDeque};
use std::mem;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use super::domain::{Classification, ConvictionRecord, ScoringError};

const MOTOR_VEHICLE_CHAPTER: &str = "20";
const COUNTED_MOTOR_VEHICLE_SECTIONS: [&str; 3] = ["20-138.1", "20-138.2", "20-141.4"];

/// Points a conviction class contributes, or `None` when the class never counts.
pub const fn felony_points(classification: Classification) -> Option<u32> {
    match classification {
        Classification::Class1Misdemeanor | Classification::ClassA1Misdemeanor => Some(1),
        Classification::ClassIFelony | Classification::ClassHFelony => Some(2),
        Classification::ClassGFelony
        | Classification::ClassFFelony
        | Classification::ClassEFelony => Some(4),
        Classification::ClassDFelony
        | Classification::ClassCFelony
        | Classification::ClassB2Felony => Some(6),
        Classification::ClassB1Felony => Some(9),
        Classification::ClassAFelony => Some(10),
        Classification::Infraction
        | Classification::Class3Misdemeanor
        | Classification::Class2Misdemeanor => None,
    }
}

pub const fn felony_level_for(points: u32) -> u8 {
    match points {
        0..=1 => 1,
        2..=5 => 2,
        6..=9 => 3,
        10..=13 => 4,
        14..=17 => 5,
        _ => 6,
    }
}

/// The conviction counted for one conviction date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PointComponent {
    pub conviction_date: NaiveDate,
    pub classification: Classification,
    pub crime: String,
    pub statute: String,
    pub points: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FelonyOutcome {
    pub points: u32,
    pub level: u8,
    pub components: Vec<PointComponent>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FelonyState {
    Start,
    Screening,
    Rescreening,
    Grouping,
    Scoring,
    Finished,
}

#[derive(Debug, Default)]
pub(crate) struct FelonyAccumulator {
    pub(crate) remaining: VecDeque<ConvictionRecord>,
    pub(crate) points: u32,
    pub(crate) components: Vec<PointComponent>,
}

impl FelonyAccumulator {
    pub(crate) fn new(convictions: &[ConvictionRecord]) -> Self {
        Self {
            remaining: convictions.iter().cloned().collect(),
            ..Self::default()
        }
    }
}

pub fn compute_felony_level(
    convictions: &[ConvictionRecord],
) -> Result<FelonyOutcome, ScoringError> {
    let mut acc = FelonyAccumulator::new(convictions);
    let mut state = FelonyState::Start;

    while state != FelonyState::Finished {
        let next = step(state, &mut acc)?;
        debug!(
            from = ?state,
            to = ?next,
            remaining = acc.remaining.len(),
            points = acc.points,
            "felony record transition"
        );
        state = next;
    }

    Ok(FelonyOutcome {
        points: acc.points,
        level: felony_level_for(acc.points),
        components: acc.components,
    })
}

pub(crate) fn step(
    state: FelonyState,
    acc: &mut FelonyAccumulator,
) -> Result<FelonyState, ScoringError> {
    let next = match state {
        FelonyState::Start => or_finished(&acc.remaining, FelonyState::Screening),
        FelonyState::Screening => {
            acc.remaining
                .retain(|conviction| felony_points(conviction.classification()).is_some());
            or_finished(&acc.remaining, FelonyState::Rescreening)
        }
        FelonyState::Rescreening => {
            acc.remaining
                .retain(|conviction| !is_uncounted_motor_vehicle_misdemeanor(conviction));
            or_finished(&acc.remaining, FelonyState::Grouping)
        }
        FelonyState::Grouping => {
            acc.remaining = highest_per_date(mem::take(&mut acc.remaining))?;
            FelonyState::Scoring
        }
        FelonyState::Scoring => match acc.remaining.pop_front() {
            Some(conviction) => {
                let component = score(&conviction)?;
                acc.points += component.points;
                acc.components.push(component);
                FelonyState::Scoring
            }
            None => FelonyState::Finished,
        },
        FelonyState::Finished => FelonyState::Finished,
    };

    Ok(next)
}

fn or_finished(remaining: &VecDeque<ConvictionRecord>, next: FelonyState) -> FelonyState {
    if remaining.is_empty() {
        FelonyState::Finished
    } else {
        next
    }
}

fn is_uncounted_motor_vehicle_misdemeanor(conviction: &ConvictionRecord) -> bool {
    let statute = conviction.statute();
    conviction.is_misdemeanor()
        && statute.chapter() == Some(MOTOR_VEHICLE_CHAPTER)
        && !COUNTED_MOTOR_VEHICLE_SECTIONS
            .iter()
            .any(|section| statute.cites(section))
}

/// Keeps the most serious conviction per conviction date, first seen on ties,
/// ordered by ascending date.
fn highest_per_date(
    convictions: VecDeque<ConvictionRecord>,
) -> Result<VecDeque<ConvictionRecord>, ScoringError> {
    let mut by_date: BTreeMap<NaiveDate, ConvictionRecord> = BTreeMap::new();

    for conviction in convictions {
        let date = conviction.require_conviction_date()?;
        match by_date.entry(date) {
            Entry::Vacant(slot) => {
                slot.insert(conviction);
            }
            Entry::Occupied(mut slot) => {
                if conviction.classification() > slot.get().classification() {
                    slot.insert(conviction);
                }
            }
        }
    }

    Ok(by_date.into_values().collect())
}

fn score(conviction: &ConvictionRecord) -> Result<PointComponent, ScoringError> {
    let classification = conviction.classification();
    let points = felony_points(classification).ok_or_else(|| ScoringError::Configuration {
        label: classification.label().to_string(),
    })?;

    Ok(PointComponent {
        conviction_date: conviction.require_conviction_date()?,
        classification,
        crime: conviction.crime().to_string(),
        statute: conviction.statute().to_string(),
        points,
    })
}
