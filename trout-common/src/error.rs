use thiserror::Error;

/// Failure to turn a scraped text field into a typed value
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("missing {0}")]
    Missing(&'static str),

    #[error("invalid stocking date '{0}', expected e.g. 'Jan 05, 2024'")]
    Date(String),

    #[error("invalid stocked fish count '{0}'")]
    FishCount(String),

    #[error("invalid {axis} '{value}'")]
    Coordinate { axis: &'static str, value: String },
}
