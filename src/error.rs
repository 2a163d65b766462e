use thiserror::Error;

/// Error type definitions
#[derive(Error, Debug)]
pub enum Error {
    /// Empty or too-small sample, out-of-range confidence level or alpha,
    /// non-positive margin of error, oversized draw without replacement
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Zero variance or division by zero inside a statistic
    #[error("Numeric degeneracy: {0}")]
    NumericDegeneracy(String),

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Column type error: {0}")]
    ColumnType(String),

    #[error("Duplicate column name: {0}")]
    DuplicateColumnName(String),

    #[error("Length mismatch: expected {expected}, found {found}")]
    LengthMismatch { expected: usize, found: usize },

    #[error("Distribution error: {0}")]
    Distribution(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("IO error")]
    Io(#[source] std::io::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

/// Check that a confidence level lies strictly inside (0, 1)
pub(crate) fn check_confidence_level(confidence_level: f64) -> Result<()> {
    if !(confidence_level > 0.0 && confidence_level < 1.0) {
        return Err(Error::InvalidInput(format!(
            "Confidence level must be between 0 and 1 (exclusive), got {}",
            confidence_level
        )));
    }
    Ok(())
}

/// Check that a significance level lies strictly inside (0, 1)
pub(crate) fn check_alpha(alpha: f64) -> Result<()> {
    if !(alpha > 0.0 && alpha < 1.0) {
        return Err(Error::InvalidInput(format!(
            "Significance level must be between 0 and 1 (exclusive), got {}",
            alpha
        )));
    }
    Ok(())
}
