use super::common::*;
use crate::records::domain::{Classification, InvalidInput, ScoringError};
use crate::records::misdemeanor::{
    compute_misdemeanor_level, misdemeanor_level_for, step, MisdemeanorAccumulator,
    MisdemeanorState,
};

#[test]
fn empty_record_is_level_one() {
    let outcome = compute_misdemeanor_level(&[]).expect("empty record scores");

    assert_eq!(outcome.points, 0);
    assert_eq!(outcome.level, 1);
    assert!(outcome.counted_convictions.is_empty());
    assert!(outcome.level_two_on.is_none());
}

#[test]
fn same_day_convictions_count_once() {
    let record = vec![
        convicted_on(Classification::Class2Misdemeanor, date(2019, 8, 1)),
        convicted_on(Classification::Class1Misdemeanor, date(2019, 8, 1)),
    ];

    let outcome = compute_misdemeanor_level(&record).expect("record scores");

    assert_eq!(outcome.points, 1);
    assert_eq!(outcome.level, 2);
    assert_eq!(outcome.counted_convictions.len(), 2);
}

#[test]
fn infractions_do_not_count_but_felonies_do() {
    let record = vec![
        convicted_on(Classification::Infraction, date(2018, 1, 1)),
        convicted_on(Classification::ClassHFelony, date(2018, 2, 1)),
        convicted_on(Classification::Class3Misdemeanor, date(2018, 3, 1)),
    ];

    let outcome = compute_misdemeanor_level(&record).expect("record scores");

    assert_eq!(outcome.points, 2);
    assert!(outcome
        .counted_convictions
        .iter()
        .all(|conviction| !conviction.is_infraction()));
}

#[test]
fn only_infractions_stay_at_level_one() {
    let record = vec![
        convicted_on(Classification::Infraction, date(2018, 1, 1)),
        pending("Speeding", Classification::Infraction, date(2021, 1, 1)),
    ];

    let outcome = compute_misdemeanor_level(&record).expect("record scores");

    assert_eq!(outcome.points, 0);
    assert_eq!(outcome.level, 1);
}

#[test]
fn level_bands_switch_at_one_and_five() {
    let cases = [(0, 1), (1, 2), (4, 2), (5, 3), (12, 3)];
    for (points, level) in cases {
        assert_eq!(misdemeanor_level_for(points), level, "{points} points");
    }
}

#[test]
fn records_dates_when_levels_were_reached() {
    let outcome = compute_misdemeanor_level(&three_strikes()).expect("record scores");

    assert_eq!(outcome.points, 6);
    assert_eq!(outcome.level, 3);
    assert_eq!(outcome.level_two_on, Some(date(2015, 1, 1)));
    assert_eq!(outcome.level_three_on, Some(date(2018, 1, 1)));

    let dates: Vec<_> = outcome
        .counted_convictions
        .iter()
        .filter_map(|conviction| conviction.conviction_date())
        .collect();
    let mut sorted = dates.clone();
    sorted.sort();
    assert_eq!(dates, sorted);
}

#[test]
fn four_dates_do_not_reach_level_three() {
    let record = vec![
        convicted_on(Classification::Class1Misdemeanor, date(2015, 1, 1)),
        convicted_on(Classification::Class1Misdemeanor, date(2016, 1, 1)),
        convicted_on(Classification::Class1Misdemeanor, date(2017, 1, 1)),
        convicted_on(Classification::Class1Misdemeanor, date(2018, 1, 1)),
    ];

    let outcome = compute_misdemeanor_level(&record).expect("record scores");

    assert_eq!(outcome.points, 4);
    assert_eq!(outcome.level, 2);
    assert!(outcome.level_three_on.is_none());
}

#[test]
fn every_distinct_date_adds_a_point() {
    let record: Vec<_> = (1..=40)
        .map(|day| {
            convicted_on(
                Classification::Class3Misdemeanor,
                date(2010, 1, 1) + chrono::Duration::days(day),
            )
        })
        .collect();

    let outcome = compute_misdemeanor_level(&record).expect("record scores");

    assert_eq!(outcome.points, 40);
    assert_eq!(outcome.level, 3);
    assert_eq!(outcome.counted_convictions.len(), 40);
    assert_eq!(outcome.level_three_on, Some(date(2010, 1, 6)));
}

#[test]
fn pending_misdemeanor_is_invalid_input() {
    let record = vec![pending(
        "Simple Assault",
        Classification::Class2Misdemeanor,
        date(2022, 1, 1),
    )];

    assert!(matches!(
        compute_misdemeanor_level(&record),
        Err(ScoringError::InvalidInput(
            InvalidInput::MissingConvictionDate { .. }
        ))
    ));
}

#[test]
fn rerun_gives_identical_outcome() {
    let record = two_strikes();

    let first = compute_misdemeanor_level(&record).expect("first run");
    let second = compute_misdemeanor_level(&record).expect("second run");

    assert_eq!(first, second);
}

#[test]
fn transitions_walk_the_expected_path() {
    let record = vec![convicted_on(Classification::Class1Misdemeanor, date(2015, 1, 1))];
    let mut acc = MisdemeanorAccumulator {
        remaining: record.into(),
        ..MisdemeanorAccumulator::default()
    };

    let mut state = MisdemeanorState::Start;
    let mut path = vec![state];
    while state != MisdemeanorState::Finished {
        state = step(state, &mut acc).expect("step succeeds");
        path.push(state);
    }

    assert_eq!(
        path,
        vec![
            MisdemeanorState::Start,
            MisdemeanorState::Screening,
            MisdemeanorState::Grouping,
            MisdemeanorState::Finished,
        ]
    );
    assert_eq!(acc.by_date.len(), 1);
}
