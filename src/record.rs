// Typed survey records and the immutable row store.

use std::fmt;
use std::str::FromStr;

use tracing::{debug, info};

use crate::csv_reader::{self, CsvData};
use crate::error::{VizError, VizResult};

pub const DEPRESSION_COLUMN: &str = "Do you have Depression?";
pub const ANXIETY_COLUMN: &str = "Do you have Anxiety?";
pub const PANIC_COLUMN: &str = "Do you have Panic attack?";
pub const YEAR_COLUMN: &str = "Your current Year of Study";
pub const GPA_COLUMN: &str = "What is your CGPA?";
pub const GENDER_COLUMN: &str = "Choose your gender";
pub const AGE_COLUMN: &str = "Age";

/// Category label used when a record has no value for an attribute.
pub const UNKNOWN_CATEGORY: &str = "Unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum YesNo {
    Yes,
    No,
}

impl YesNo {
    pub fn as_str(self) -> &'static str {
        match self {
            YesNo::Yes => "Yes",
            YesNo::No => "No",
        }
    }

    fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.eq_ignore_ascii_case("yes") {
            Some(YesNo::Yes)
        } else if text.eq_ignore_ascii_case("no") {
            Some(YesNo::No)
        } else {
            None
        }
    }
}

impl fmt::Display for YesNo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One survey respondent.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub depression: YesNo,
    pub anxiety: YesNo,
    pub panic: YesNo,
    pub year: Option<String>,
    pub gpa: Option<String>,
    pub gender: Option<String>,
    pub age: Option<String>,
}

impl Record {
    /// Value of a groupable attribute, `None` when missing.
    pub fn attribute(&self, attribute: Attribute) -> Option<&str> {
        match attribute {
            Attribute::Gpa => self.gpa.as_deref(),
            Attribute::Year => self.year.as_deref(),
            Attribute::Gender => self.gender.as_deref(),
            Attribute::Age => self.age.as_deref(),
        }
    }

    /// Value on a parallel-coordinates axis.
    pub fn variable(&self, variable: Variable) -> Option<&str> {
        match variable {
            Variable::Depression => Some(self.depression.as_str()),
            Variable::Gender => self.attribute(Attribute::Gender),
            Variable::Gpa => self.attribute(Attribute::Gpa),
            Variable::Year => self.attribute(Attribute::Year),
            Variable::Age => self.attribute(Attribute::Age),
        }
    }
}

/// The four categorical fields selectable for histogram and pie grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Attribute {
    Gpa,
    Year,
    Gender,
    Age,
}

impl Attribute {
    pub const ALL: [Attribute; 4] = [Attribute::Gpa, Attribute::Year, Attribute::Gender, Attribute::Age];

    pub fn key(self) -> &'static str {
        match self {
            Attribute::Gpa => "gpa",
            Attribute::Year => "year",
            Attribute::Gender => "gender",
            Attribute::Age => "age",
        }
    }

    /// Human label used in titles and the selector.
    pub fn label(self) -> &'static str {
        match self {
            Attribute::Gpa => "GPA",
            Attribute::Year => "Year",
            Attribute::Gender => "Gender",
            Attribute::Age => "Age",
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Attribute {
    type Err = VizError;

    fn from_str(s: &str) -> VizResult<Self> {
        Attribute::ALL
            .into_iter()
            .find(|a| a.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| VizError::UnknownAttribute(s.to_string()))
    }
}

/// Axes of the parallel-coordinates plot, in their fixed left-to-right order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Variable {
    Gender,
    Gpa,
    Year,
    Age,
    Depression,
}

const GENDER_DOMAIN: &[&str] = &["Male", "Female"];
const GPA_DOMAIN: &[&str] = &["0 - 1.99", "2.00 - 2.49", "2.50 - 2.99", "3.00 - 3.49", "3.50 - 4.00"];
const YEAR_DOMAIN: &[&str] = &["Year 1", "Year 2", "Year 3", "Year 4"];
const AGE_DOMAIN: &[&str] = &["18", "19", "20", "21", "22", "23", "24"];
const DEPRESSION_DOMAIN: &[&str] = &["Yes", "No"];

impl Variable {
    pub const ALL: [Variable; 5] = [
        Variable::Gender,
        Variable::Gpa,
        Variable::Year,
        Variable::Age,
        Variable::Depression,
    ];

    /// Variables the user may check or uncheck.
    pub const CHECKABLE: [Variable; 4] = [Variable::Gender, Variable::Gpa, Variable::Year, Variable::Age];

    pub fn key(self) -> &'static str {
        match self {
            Variable::Gender => "gender",
            Variable::Gpa => "gpa",
            Variable::Year => "year",
            Variable::Age => "age",
            Variable::Depression => "depression",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Variable::Gender => "Gender",
            Variable::Gpa => "GPA",
            Variable::Year => "Year",
            Variable::Age => "Age",
            Variable::Depression => "Depression",
        }
    }

    /// Ordered axis domain, bottom to top.
    pub fn domain(self) -> &'static [&'static str] {
        match self {
            Variable::Gender => GENDER_DOMAIN,
            Variable::Gpa => GPA_DOMAIN,
            Variable::Year => YEAR_DOMAIN,
            Variable::Age => AGE_DOMAIN,
            Variable::Depression => DEPRESSION_DOMAIN,
        }
    }
}

impl From<Attribute> for Variable {
    fn from(attribute: Attribute) -> Self {
        match attribute {
            Attribute::Gpa => Variable::Gpa,
            Attribute::Year => Variable::Year,
            Attribute::Gender => Variable::Gender,
            Attribute::Age => Variable::Age,
        }
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Variable {
    type Err = VizError;

    fn from_str(s: &str) -> VizResult<Self> {
        Variable::ALL
            .into_iter()
            .find(|v| v.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| VizError::UnknownVariable(s.to_string()))
    }
}

/// Immutable, fully loaded dataset shared by every chart.
///
/// Only constructible from a complete load, so no chart can observe a
/// partially populated store.
#[derive(Debug, Clone)]
pub struct RowStore {
    records: Vec<Record>,
}

impl RowStore {
    pub fn new(records: Vec<Record>) -> VizResult<Self> {
        if records.is_empty() {
            return Err(VizError::EmptyDataset);
        }
        Ok(RowStore { records })
    }

    pub fn from_csv(data: &CsvData) -> VizResult<Self> {
        let depression = csv_reader::find_column(data, DEPRESSION_COLUMN)?;
        let anxiety = csv_reader::find_column(data, ANXIETY_COLUMN)?;
        let panic = csv_reader::find_column(data, PANIC_COLUMN)?;
        let year = csv_reader::find_column(data, YEAR_COLUMN)?;
        let gpa = csv_reader::find_column(data, GPA_COLUMN)?;
        let gender = csv_reader::find_column(data, GENDER_COLUMN)?;
        let age = csv_reader::find_column(data, AGE_COLUMN)?;

        let mut records = Vec::with_capacity(data.rows.len());
        for (row_idx, row) in data.rows.iter().enumerate() {
            let status = |index: usize, column: &str| -> VizResult<YesNo> {
                let raw = csv_reader::cell(row, index);
                YesNo::parse(raw).ok_or_else(|| VizError::InvalidStatus {
                    value: raw.to_string(),
                    column: column.to_string(),
                    row: row_idx + 1,
                })
            };

            records.push(Record {
                depression: status(depression, DEPRESSION_COLUMN)?,
                anxiety: status(anxiety, ANXIETY_COLUMN)?,
                panic: status(panic, PANIC_COLUMN)?,
                year: normalize_year(csv_reader::cell(row, year)),
                gpa: normalize(csv_reader::cell(row, gpa)),
                gender: normalize(csv_reader::cell(row, gender)),
                age: normalize(csv_reader::cell(row, age)),
            });
        }

        let store = RowStore::new(records)?;
        info!(records = store.len(), depressed = store.depressed_count(), "dataset loaded");
        Ok(store)
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn depressed_count(&self) -> usize {
        self.records.iter().filter(|r| r.depression == YesNo::Yes).count()
    }
}

fn normalize(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

// The survey export spells the same year as both "year 1" and "Year 1".
fn normalize_year(raw: &str) -> Option<String> {
    let value = normalize(raw)?;
    let mut chars = value.chars();
    let normalized = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => value.clone(),
    };
    if normalized != value {
        debug!(raw = %value, normalized = %normalized, "normalized year value");
    }
    Some(normalized)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub fn record(depression: YesNo, gpa: Option<&str>) -> Record {
        Record {
            depression,
            anxiety: YesNo::No,
            panic: YesNo::No,
            year: Some("Year 1".to_string()),
            gpa: gpa.map(str::to_string),
            gender: Some("Female".to_string()),
            age: Some("19".to_string()),
        }
    }

    fn survey_csv(rows: &[[&str; 7]]) -> CsvData {
        CsvData {
            headers: vec![
                "Choose your gender".to_string(),
                "Age".to_string(),
                "Your current Year of Study".to_string(),
                "What is your CGPA?".to_string(),
                "Do you have Depression?".to_string(),
                "Do you have Anxiety?".to_string(),
                "Do you have Panic attack?".to_string(),
            ],
            rows: rows
                .iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        }
    }

    #[test]
    fn test_from_csv_maps_columns() {
        let csv = survey_csv(&[["Female", "18", "year 1", "3.00 - 3.49", "Yes", "No", "Yes"]]);
        let store = RowStore::from_csv(&csv).unwrap();
        let r = &store.records()[0];
        assert_eq!(r.gender.as_deref(), Some("Female"));
        assert_eq!(r.age.as_deref(), Some("18"));
        assert_eq!(r.year.as_deref(), Some("Year 1"));
        assert_eq!(r.gpa.as_deref(), Some("3.00 - 3.49"));
        assert_eq!(r.depression, YesNo::Yes);
        assert_eq!(r.anxiety, YesNo::No);
        assert_eq!(r.panic, YesNo::Yes);
    }

    #[test]
    fn test_from_csv_trims_and_blanks_missing() {
        let csv = survey_csv(&[["Male", "", "Year 2", "3.50 - 4.00 ", "no", "NO", "yes"]]);
        let store = RowStore::from_csv(&csv).unwrap();
        let r = &store.records()[0];
        assert_eq!(r.age, None);
        assert_eq!(r.gpa.as_deref(), Some("3.50 - 4.00"));
        assert_eq!(r.depression, YesNo::No);
    }

    #[test]
    fn test_from_csv_invalid_status() {
        let csv = survey_csv(&[
            ["Male", "20", "Year 2", "3.00 - 3.49", "No", "No", "No"],
            ["Male", "20", "Year 2", "3.00 - 3.49", "maybe", "No", "No"],
        ]);
        let err = RowStore::from_csv(&csv).unwrap_err();
        assert_eq!(
            err,
            VizError::InvalidStatus {
                value: "maybe".to_string(),
                column: DEPRESSION_COLUMN.to_string(),
                row: 2,
            }
        );
    }

    #[test]
    fn test_from_csv_missing_column() {
        let csv = CsvData {
            headers: vec!["Age".to_string()],
            rows: vec![vec!["19".to_string()]],
        };
        let err = RowStore::from_csv(&csv).unwrap_err();
        assert!(matches!(err, VizError::MissingColumn { .. }));
    }

    #[test]
    fn test_row_store_rejects_empty() {
        assert_eq!(RowStore::new(vec![]).unwrap_err(), VizError::EmptyDataset);
    }

    #[test]
    fn test_attribute_from_str() {
        assert_eq!("gpa".parse::<Attribute>().unwrap(), Attribute::Gpa);
        assert_eq!("Gender".parse::<Attribute>().unwrap(), Attribute::Gender);
        assert_eq!(
            "depression".parse::<Attribute>().unwrap_err(),
            VizError::UnknownAttribute("depression".to_string())
        );
    }

    #[test]
    fn test_variable_domains_are_fixed() {
        assert_eq!(Variable::Gpa.domain().len(), 5);
        assert_eq!(Variable::Age.domain().first(), Some(&"18"));
        assert_eq!(Variable::Age.domain().last(), Some(&"24"));
        assert_eq!(Variable::Depression.domain(), &["Yes", "No"]);
    }

    #[test]
    fn test_record_variable_depression() {
        let r = record(YesNo::Yes, Some("2.50 - 2.99"));
        assert_eq!(r.variable(Variable::Depression), Some("Yes"));
        assert_eq!(r.variable(Variable::Gpa), Some("2.50 - 2.99"));
    }
}
