use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Upper bound, in characters, for every free-text field on a record.
pub const MAX_FIELD_LEN: usize = 50;

/// Failures raised while building records or running the record engines.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScoringError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInput),
    #[error("habitual eligibility has not been computed yet")]
    NotReady,
    #[error("unrecognized classification label '{label}'")]
    Configuration { label: String },
}

/// Describes which part of a record broke the input contract.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidInput {
    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },
    #[error("'{crime}' (offense {offense_date}) has no conviction date")]
    MissingConvictionDate {
        crime: String,
        offense_date: NaiveDate,
    },
    #[error("pending charge '{crime}' already has conviction date {conviction_date}")]
    ConvictedPendingCharge {
        crime: String,
        conviction_date: NaiveDate,
    },
}

/// Statutory severity labels, declared from least to most severe.
///
/// Declaration order is the severity rank, so the derived `Ord` is the
/// comparison used when picking the most serious conviction on a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Classification {
    #[serde(rename = "Infraction")]
    Infraction,
    #[serde(rename = "Class 3 Misdemeanor")]
    Class3Misdemeanor,
    #[serde(rename = "Class 2 Misdemeanor")]
    Class2Misdemeanor,
    #[serde(rename = "Class 1 Misdemeanor")]
    Class1Misdemeanor,
    #[serde(rename = "Class A1 Misdemeanor")]
    ClassA1Misdemeanor,
    #[serde(rename = "Class I Felony")]
    ClassIFelony,
    #[serde(rename = "Class H Felony")]
    ClassHFelony,
    #[serde(rename = "Class G Felony")]
    ClassGFelony,
    #[serde(rename = "Class F Felony")]
    ClassFFelony,
    #[serde(rename = "Class E Felony")]
    ClassEFelony,
    #[serde(rename = "Class D Felony")]
    ClassDFelony,
    #[serde(rename = "Class C Felony")]
    ClassCFelony,
    #[serde(rename = "Class B2 Felony")]
    ClassB2Felony,
    #[serde(rename = "Class B1 Felony")]
    ClassB1Felony,
    #[serde(rename = "Class A Felony")]
    ClassAFelony,
}

impl Classification {
    pub const fn ordered() -> [Self; 15] {
        [
            Self::Infraction,
            Self::Class3Misdemeanor,
            Self::Class2Misdemeanor,
            Self::Class1Misdemeanor,
            Self::ClassA1Misdemeanor,
            Self::ClassIFelony,
            Self::ClassHFelony,
            Self::ClassGFelony,
            Self::ClassFFelony,
            Self::ClassEFelony,
            Self::ClassDFelony,
            Self::ClassCFelony,
            Self::ClassB2Felony,
            Self::ClassB1Felony,
            Self::ClassAFelony,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Infraction => "Infraction",
            Self::Class3Misdemeanor => "Class 3 Misdemeanor",
            Self::Class2Misdemeanor => "Class 2 Misdemeanor",
            Self::Class1Misdemeanor => "Class 1 Misdemeanor",
            Self::ClassA1Misdemeanor => "Class A1 Misdemeanor",
            Self::ClassIFelony => "Class I Felony",
            Self::ClassHFelony => "Class H Felony",
            Self::ClassGFelony => "Class G Felony",
            Self::ClassFFelony => "Class F Felony",
            Self::ClassEFelony => "Class E Felony",
            Self::ClassDFelony => "Class D Felony",
            Self::ClassCFelony => "Class C Felony",
            Self::ClassB2Felony => "Class B2 Felony",
            Self::ClassB1Felony => "Class B1 Felony",
            Self::ClassAFelony => "Class A Felony",
        }
    }

    /// Zero-based position in the severity table.
    pub const fn severity_rank(self) -> u8 {
        self as u8
    }

    pub const fn is_felony(self) -> bool {
        self.severity_rank() >= Self::ClassIFelony.severity_rank()
    }

    pub const fn is_misdemeanor(self) -> bool {
        matches!(
            self,
            Self::Class3Misdemeanor
                | Self::Class2Misdemeanor
                | Self::Class1Misdemeanor
                | Self::ClassA1Misdemeanor
        )
    }

    pub const fn is_infraction(self) -> bool {
        matches!(self, Self::Infraction)
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Classification {
    type Err = ScoringError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted = normalize_label(value);
        Self::ordered()
            .into_iter()
            .find(|class| normalize_label(class.label()) == wanted)
            .ok_or_else(|| ScoringError::Configuration {
                label: value.trim().to_string(),
            })
    }
}

fn normalize_label(value: &str) -> String {
    value
        .split_whitespace()
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// General Statutes citation as written on the judgment, e.g. `G.S. 20-138.1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Statute(String);

impl Statute {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The `chapter-section` part of the citation, starting at the first run of
    /// digits (with an optional letter) followed by a hyphen. Whatever precedes
    /// it, such as `G.S.`, `NCGS` or `§`, is dropped.
    pub fn citation(&self) -> &str {
        let text = self.0.trim();
        text.char_indices()
            .filter(|(_, c)| c.is_ascii_digit())
            .map(|(index, _)| &text[index..])
            .find(|rest| starts_with_chapter(rest))
            .unwrap_or(text)
    }

    /// Chapter number, the part of the citation before the first hyphen.
    pub fn chapter(&self) -> Option<&str> {
        self.citation()
            .split_once('-')
            .map(|(chapter, _)| chapter.trim())
    }

    /// True when the citation names `section` itself or one of its subsections,
    /// so `20-138.1` matches `20-138.1(a)` but not `20-138.10`.
    pub fn cites(&self, section: &str) -> bool {
        match self.citation().strip_prefix(section) {
            Some(rest) => !rest.starts_with(|c: char| c.is_ascii_digit() || c == '.'),
            None => false,
        }
    }
}

fn starts_with_chapter(text: &str) -> bool {
    let rest = text.trim_start_matches(|c: char| c.is_ascii_digit());
    let rest = rest
        .strip_prefix(|c: char| c.is_ascii_alphabetic())
        .unwrap_or(rest);
    rest.starts_with('-')
}

impl fmt::Display for Statute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One conviction, or a pending charge when `conviction_date` is absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConvictionRecord {
    crime: String,
    classification: Classification,
    offense_date: NaiveDate,
    conviction_date: Option<NaiveDate>,
    location: String,
    statute: Statute,
}

impl ConvictionRecord {
    pub fn new(
        crime: impl Into<String>,
        classification: Classification,
        offense_date: NaiveDate,
        conviction_date: Option<NaiveDate>,
        location: impl Into<String>,
        statute: impl Into<String>,
    ) -> Result<Self, ScoringError> {
        Ok(Self {
            crime: bounded("crime", crime.into())?,
            classification,
            offense_date,
            conviction_date,
            location: bounded("location", location.into())?,
            statute: Statute(bounded("statute", statute.into())?),
        })
    }

    pub fn crime(&self) -> &str {
        &self.crime
    }

    pub fn classification(&self) -> Classification {
        self.classification
    }

    pub fn offense_date(&self) -> NaiveDate {
        self.offense_date
    }

    pub fn conviction_date(&self) -> Option<NaiveDate> {
        self.conviction_date
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn statute(&self) -> &Statute {
        &self.statute
    }

    pub fn is_felony(&self) -> bool {
        self.classification.is_felony()
    }

    pub fn is_misdemeanor(&self) -> bool {
        self.classification.is_misdemeanor()
    }

    pub fn is_infraction(&self) -> bool {
        self.classification.is_infraction()
    }

    pub fn is_pending(&self) -> bool {
        self.conviction_date.is_none()
    }

    pub(crate) fn require_conviction_date(&self) -> Result<NaiveDate, ScoringError> {
        self.conviction_date.ok_or_else(|| {
            InvalidInput::MissingConvictionDate {
                crime: self.crime.clone(),
                offense_date: self.offense_date,
            }
            .into()
        })
    }
}

impl fmt::Display for ConvictionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}), offense {}",
            self.crime, self.classification, self.offense_date
        )?;
        match self.conviction_date {
            Some(date) => write!(f, ", convicted {date}"),
            None => write!(f, ", pending"),
        }
    }
}

fn bounded(field: &'static str, value: String) -> Result<String, ScoringError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(InvalidInput::EmptyField { field }.into());
    }
    Ok(trimmed.chars().take(MAX_FIELD_LEN).collect())
}

/// The person whose record is being leveled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Defendant {
    pub name: Option<String>,
    pub birthdate: NaiveDate,
}

impl Defendant {
    pub fn new(birthdate: NaiveDate) -> Self {
        Self {
            name: None,
            birthdate,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        let trimmed = name.trim();
        self.name = (!trimmed.is_empty()).then(|| trimmed.to_string());
        self
    }
}
