use rand::distributions::WeightedError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid reference data: {message}")]
    InvalidReferenceData { message: String },

    #[error("Invalid category weights: {0}")]
    Weights(#[from] WeightedError),
}

impl GeneratorError {
    pub(crate) fn reference_data(message: impl Into<String>) -> Self {
        GeneratorError::InvalidReferenceData { message: message.into() }
    }
}
