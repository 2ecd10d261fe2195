use thiserror::Error;

#[derive(Error, Debug)]
pub enum ForecastError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("No models available: all requested models failed")]
    NoModelsAvailable,

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl ForecastError {
    /// Machine-readable error code for the wire format.
    pub fn code(&self) -> &'static str {
        match self {
            ForecastError::NotFound(_) => "not_found",
            ForecastError::InsufficientData(_) => "insufficient_data",
            ForecastError::InvalidParameter(_) => "invalid_parameter",
            ForecastError::NoModelsAvailable => "no_models_available",
            ForecastError::DatabaseError(_) => "internal",
        }
    }
}
