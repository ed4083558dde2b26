//! Error types for the Monte Carlo pricer

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PricingError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Data unavailable: {0}")]
    DataUnavailable(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("CSV error: {0}")]
    Csv(String),

    #[error("IO error: {0}")]
    IO(#[from] std::io::Error),
}

pub type PricingResult<T> = Result<T, PricingError>;

impl PricingError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn data_unavailable(msg: impl Into<String>) -> Self {
        Self::DataUnavailable(msg.into())
    }

    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    /// True for malformed caller input, as opposed to upstream failures
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }
}

impl From<csv::Error> for PricingError {
    fn from(e: csv::Error) -> Self {
        Self::Csv(e.to_string())
    }
}

impl From<serde_json::Error> for PricingError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}
