use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer};
use std::io::Read;

#[derive(Debug, Deserialize)]
pub(crate) struct ConvictionRow {
    #[serde(rename = "Crime")]
    pub(crate) crime: String,
    #[serde(rename = "Class")]
    pub(crate) class: String,
    #[serde(rename = "Offense Date")]
    pub(crate) offense_date: String,
    #[serde(
        rename = "Conviction Date",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    pub(crate) conviction_date: Option<String>,
    #[serde(rename = "Location")]
    pub(crate) location: String,
    #[serde(rename = "Statute")]
    pub(crate) statute: String,
}

pub(crate) fn parse_rows<R: Read>(reader: R) -> Result<Vec<ConvictionRow>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    csv_reader.deserialize::<ConvictionRow>().collect()
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

/// Accepts `YYYY-MM-DD`, `MM/DD/YYYY`, or an RFC 3339 timestamp truncated to its date.
pub(crate) fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%m/%d/%Y") {
        return Some(date);
    }

    DateTime::parse_from_rfc3339(trimmed)
        .ok()
        .map(|dt| dt.date_naive())
}
