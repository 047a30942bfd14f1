use chrono::NaiveDate;

use crate::records::domain::{Classification, ConvictionRecord};

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

/// Born 1 January 1999, adult from 1 January 2017.
pub(super) fn birthdate() -> NaiveDate {
    date(1999, 1, 1)
}

pub(super) fn conviction(
    crime: &str,
    classification: Classification,
    offense_date: NaiveDate,
    conviction_date: NaiveDate,
    statute: &str,
) -> ConvictionRecord {
    ConvictionRecord::new(
        crime,
        classification,
        offense_date,
        Some(conviction_date),
        "Randolph County",
        statute,
    )
    .expect("valid conviction")
}

/// Conviction whose only interesting attributes are its class and date.
pub(super) fn convicted_on(
    classification: Classification,
    conviction_date: NaiveDate,
) -> ConvictionRecord {
    conviction(
        "Possession of Stolen Goods",
        classification,
        date(2010, 1, 1),
        conviction_date,
        "14-72",
    )
}

pub(super) fn pending(
    crime: &str,
    classification: Classification,
    offense_date: NaiveDate,
) -> ConvictionRecord {
    ConvictionRecord::new(
        crime,
        classification,
        offense_date,
        None,
        "Randolph County",
        "14-72",
    )
    .expect("valid pending charge")
}

fn psg_misdemeanor(conviction_date: NaiveDate) -> ConvictionRecord {
    conviction(
        "PSG",
        Classification::Class1Misdemeanor,
        date(2014, 1, 1),
        conviction_date,
        "14-72",
    )
}

fn psg_felony(conviction_date: NaiveDate) -> ConvictionRecord {
    conviction(
        "PSG",
        Classification::ClassHFelony,
        date(2014, 1, 1),
        conviction_date,
        "14-72",
    )
}

fn kidnapping(offense_date: NaiveDate, conviction_date: NaiveDate) -> ConvictionRecord {
    conviction(
        "Second Degree Kidnapping",
        Classification::ClassEFelony,
        offense_date,
        conviction_date,
        "14-39",
    )
}

/// One felony among misdemeanors.
pub(super) fn one_strike() -> Vec<ConvictionRecord> {
    vec![psg_misdemeanor(date(2015, 1, 1)), psg_felony(date(2015, 2, 2))]
}

/// Felony at 15, then an adult felony committed after that conviction.
pub(super) fn two_strikes() -> Vec<ConvictionRecord> {
    vec![
        psg_misdemeanor(date(2015, 1, 1)),
        psg_felony(date(2015, 2, 2)),
        psg_misdemeanor(date(2015, 3, 3)),
        psg_misdemeanor(date(2015, 4, 4)),
        kidnapping(date(2018, 1, 1), date(2019, 5, 5)),
        psg_misdemeanor(date(2015, 6, 6)),
    ]
}

/// The would-be second strike was committed before the eighteenth birthday.
pub(super) fn one_strike_because_juvenile() -> Vec<ConvictionRecord> {
    vec![
        psg_misdemeanor(date(2015, 1, 1)),
        psg_felony(date(2015, 2, 2)),
        psg_misdemeanor(date(2014, 3, 3)),
        psg_misdemeanor(date(2015, 4, 4)),
        kidnapping(date(2016, 1, 1), date(2016, 5, 5)),
        conviction(
            "PSG",
            Classification::Class1Misdemeanor,
            date(2016, 1, 1),
            date(2016, 6, 6),
            "14-72",
        ),
    ]
}

/// Juvenile first strike followed by two adult, non-overlapping strikes.
pub(super) fn three_strikes() -> Vec<ConvictionRecord> {
    vec![
        psg_misdemeanor(date(2015, 1, 1)),
        psg_felony(date(2015, 2, 2)),
        psg_misdemeanor(date(2015, 3, 3)),
        psg_misdemeanor(date(2015, 4, 4)),
        kidnapping(date(2017, 12, 31), date(2018, 1, 1)),
        kidnapping(date(2018, 1, 2), date(2018, 1, 3)),
    ]
}

/// Every later felony was committed before the first one was convicted.
pub(super) fn one_strike_overlapping() -> Vec<ConvictionRecord> {
    vec![
        psg_misdemeanor(date(2015, 1, 1)),
        psg_felony(date(2018, 1, 1)),
        psg_misdemeanor(date(2015, 3, 3)),
        psg_misdemeanor(date(2015, 4, 4)),
        kidnapping(date(2014, 12, 31), date(2017, 12, 31)),
        kidnapping(date(2018, 1, 1), date(2018, 1, 3)),
    ]
}

/// Second strike is valid, the remaining felonies overlap it.
pub(super) fn two_strikes_then_overlap() -> Vec<ConvictionRecord> {
    vec![
        psg_misdemeanor(date(2015, 1, 1)),
        psg_felony(date(2015, 1, 1)),
        psg_misdemeanor(date(2015, 3, 3)),
        psg_misdemeanor(date(2015, 4, 4)),
        kidnapping(date(2017, 6, 1), date(2017, 12, 31)),
        kidnapping(date(2017, 12, 31), date(2018, 1, 3)),
        kidnapping(date(2017, 12, 31), date(2018, 1, 3)),
    ]
}
