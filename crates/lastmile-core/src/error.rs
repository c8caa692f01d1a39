use thiserror::Error;

/// Validation and configuration errors exposed by `lastmile-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("latitude {value} must be finite and within [-90, 90]")]
    InvalidLatitude { value: String },
    #[error("longitude {value} must be finite and within [-180, 180]")]
    InvalidLongitude { value: String },
    #[error("coordinate must be formatted as 'lat,lon[,uri]': '{value}'")]
    InvalidCoordinate { value: String },

    #[error("invalid street network mode '{value}', expected one of walking, bike, car, bss")]
    InvalidMode { value: String },
    #[error("invalid provider kind '{value}', expected geovelo")]
    InvalidProviderKind { value: String },
    #[error("provider name cannot be empty")]
    EmptyProviderName,
    #[error("street network provider '{name}' is not registered")]
    UnknownProvider { name: String },
    #[error("provider '{name}' is registered more than once")]
    DuplicateProvider { name: String },

    #[error("service_url {value} is not a valid url")]
    InvalidUrl { value: String },
    #[error("environment variable '{name}' is not set")]
    MissingEnv { name: &'static str },
    #[error("environment variable '{name}' must be a positive integer: '{value}'")]
    InvalidEnvNumber { name: &'static str, value: String },
    #[error("field '{field}' must be greater than zero")]
    NonPositiveValue { field: &'static str },

    #[error("timestamp must be RFC3339 UTC (suffix Z): '{value}'")]
    TimestampNotUtc { value: String },
}

/// Top-level error type for core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
