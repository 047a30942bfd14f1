//! CSV import of conviction and pending-charge lists.
//!
//! Expected header: `Crime,Class,Offense Date,Conviction Date,Location,Statute`.
//! A blank conviction date marks a pending charge.

mod parser;

use std::io::Read;
use std::path::Path;

use super::domain::{Classification, ConvictionRecord, ScoringError};
use parser::ConvictionRow;

#[derive(Debug)]
pub enum ImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    Date { row: usize, value: String },
    Record { row: usize, source: ScoringError },
}

impl std::fmt::Display for ImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportError::Io(err) => write!(f, "failed to read conviction list: {}", err),
            ImportError::Csv(err) => write!(f, "invalid conviction CSV data: {}", err),
            ImportError::Date { row, value } => {
                write!(f, "row {}: '{}' is not a recognizable date", row, value)
            }
            ImportError::Record { row, source } => write!(f, "row {}: {}", row, source),
        }
    }
}

impl std::error::Error for ImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ImportError::Io(err) => Some(err),
            ImportError::Csv(err) => Some(err),
            ImportError::Date { .. } => None,
            ImportError::Record { source, .. } => Some(source),
        }
    }
}

impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

pub struct ConvictionImporter;

impl ConvictionImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<ConvictionRecord>, ImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<ConvictionRecord>, ImportError> {
        parser::parse_rows(reader)?
            .into_iter()
            .enumerate()
            .map(|(index, row)| build_record(index + 1, row))
            .collect()
    }
}

fn build_record(row: usize, data: ConvictionRow) -> Result<ConvictionRecord, ImportError> {
    let record_error = |source: ScoringError| ImportError::Record { row, source };

    let classification: Classification = data.class.parse().map_err(record_error)?;
    let offense_date = date_cell(row, &data.offense_date)?;
    let conviction_date = data
        .conviction_date
        .as_deref()
        .map(|value| date_cell(row, value))
        .transpose()?;

    ConvictionRecord::new(
        data.crime,
        classification,
        offense_date,
        conviction_date,
        data.location,
        data.statute,
    )
    .map_err(record_error)
}

fn date_cell(row: usize, value: &str) -> Result<chrono::NaiveDate, ImportError> {
    parser::parse_date(value).ok_or_else(|| ImportError::Date {
        row,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Cursor;

    const HEADER: &str = "Crime,Class,Offense Date,Conviction Date,Location,Statute\n";

    #[test]
    fn parse_date_supports_iso_us_and_rfc3339() {
        let expected = NaiveDate::from_ymd_opt(2015, 2, 2).unwrap();
        assert_eq!(parser::parse_date("2015-02-02"), Some(expected));
        assert_eq!(parser::parse_date("02/02/2015"), Some(expected));
        assert_eq!(parser::parse_date("2015-02-02T09:30:00Z"), Some(expected));
        assert!(parser::parse_date("  ").is_none());
        assert!(parser::parse_date("yesterday").is_none());
    }

    #[test]
    fn importer_reads_convictions_and_pending_charges() {
        let csv = format!(
            "{HEADER}\
Possession of Stolen Goods,Class H Felony,2014-01-01,2015-02-02,Randolph County,14-72\n\
Larceny, class 1 misdemeanor ,2021-03-04,,Wake County,14-72(a)\n"
        );
        let records = ConvictionImporter::from_reader(Cursor::new(csv)).expect("import succeeds");

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].classification(), Classification::ClassHFelony);
        assert_eq!(
            records[0].conviction_date(),
            NaiveDate::from_ymd_opt(2015, 2, 2)
        );
        assert!(records[1].is_pending());
        assert_eq!(
            records[1].classification(),
            Classification::Class1Misdemeanor
        );
    }

    #[test]
    fn importer_reports_unknown_classification_with_row() {
        let csv = format!(
            "{HEADER}\
PSG,Class H Felony,2014-01-01,2015-02-02,Randolph County,14-72\n\
PSG,Class Z Felony,2014-01-01,2015-02-02,Randolph County,14-72\n"
        );
        match ConvictionImporter::from_reader(Cursor::new(csv)) {
            Err(ImportError::Record {
                row,
                source: ScoringError::Configuration { label },
            }) => {
                assert_eq!(row, 2);
                assert_eq!(label, "Class Z Felony");
            }
            other => panic!("expected configuration error, got {other:?}"),
        }
    }

    #[test]
    fn importer_rejects_bad_dates() {
        let csv = format!("{HEADER}PSG,Class H Felony,someday,2015-02-02,Randolph County,14-72\n");
        match ConvictionImporter::from_reader(Cursor::new(csv)) {
            Err(ImportError::Date { row, value }) => {
                assert_eq!(row, 1);
                assert_eq!(value, "someday");
            }
            other => panic!("expected date error, got {other:?}"),
        }
    }

    #[test]
    fn importer_from_path_propagates_io_errors() {
        let error = ConvictionImporter::from_path("./does-not-exist.csv")
            .expect_err("expected io error");

        match error {
            ImportError::Io(_) => {}
            other => panic!("expected io error, got {other:?}"),
        }
    }
}
