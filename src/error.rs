use thiserror::Error;

/// Errors raised by the dashboard library.
///
/// Load failures and malformed input are recoverable at the CLI boundary;
/// everything else signals a control being used outside its contract.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VizError {
    #[error("Unknown attribute '{0}' (expected one of: gpa, year, gender, age)")]
    UnknownAttribute(String),

    #[error("Unknown variable '{0}' (expected one of: gender, gpa, year, age, depression)")]
    UnknownVariable(String),

    #[error("Unknown chart '{0}' (expected one of: histogram, pie, parallel)")]
    UnknownChart(String),

    #[error("Column '{column}' not found. Available columns: {available}")]
    MissingColumn { column: String, available: String },

    #[error("Invalid value '{value}' in column '{column}' at row {row} (expected Yes or No)")]
    InvalidStatus {
        value: String,
        column: String,
        row: usize,
    },

    #[error("Dataset contains no records")]
    EmptyDataset,

    #[error("Chart '{0}' cannot be mounted before its fragment is attached")]
    NotAttached(String),

    #[error("Chart '{0}' has not been mounted")]
    NotMounted(String),

    #[error("No pie slice for category '{0}'")]
    UnknownCategory(String),

    #[error("Axis '{0}' is not displayed")]
    AxisNotDisplayed(String),

    #[error("The depression axis is always displayed and cannot be unchecked")]
    DepressionLocked,

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },
}

pub type VizResult<T> = std::result::Result<T, VizError>;
