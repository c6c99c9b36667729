use antenatal_types::{DateError, TextError};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid date: {0}")]
    Date(#[from] DateError),

    #[error("invalid text: {0}")]
    Text(#[from] TextError),

    #[error("invalid UTC offset '{0}' (expected +HH:MM or -HH:MM)")]
    InvalidUtcOffset(String),

    #[error("no active pregnancy record")]
    NoActivePregnancy,

    #[error("pregnancy record {0} is already completed")]
    PregnancyCompleted(String),

    #[error("'ongoing' is not a completion outcome")]
    OngoingIsNotAnOutcome,
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;
