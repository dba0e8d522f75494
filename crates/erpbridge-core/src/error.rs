use thiserror::Error;

/// Validation and configuration errors exposed by `erpbridge-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid adapter '{value}', expected one of navision, sap_b1, exact, visma")]
    InvalidAdapter { value: String },
    #[error("invalid operation '{value}'")]
    InvalidOperation { value: String },

    #[error("currency must be a 3-letter uppercase ISO code: '{value}'")]
    InvalidCurrency { value: String },
    #[error("unrecognized date '{value}'")]
    InvalidDate { value: String },
    #[error("timestamp must be RFC3339 UTC (suffix Z): '{value}'")]
    TimestampNotUtc { value: String },

    #[error("base_url '{value}' is not a valid http(s) url")]
    InvalidBaseUrl { value: String },
    #[error("environment variable name '{value}' must be alphanumeric or underscore")]
    InvalidEnvName { value: String },
    #[error("environment variable '{name}' is not set")]
    MissingEnv { name: String },
    #[error("error policy must be 'rethrow' or 'suppress': '{value}'")]
    InvalidErrorPolicy { value: String },
    #[error("setting '{name}' has invalid value '{value}'")]
    InvalidSetting { name: String, value: String },
    #[error("field mapping '{entity}.{field}' has invalid target '{target}'")]
    InvalidFieldMapping {
        entity: String,
        field: String,
        target: String,
    },
    #[error("unknown mapping entity '{value}'")]
    UnknownEntity { value: String },

    #[error("request_id must be at least 8 characters")]
    InvalidRequestId,
    #[error("schema_version must match vMAJOR.MINOR.PATCH: '{value}'")]
    InvalidSchemaVersion { value: String },
    #[error("error code cannot be empty")]
    EmptyErrorCode,
    #[error("error message cannot be empty")]
    EmptyErrorMessage,
}

/// Top-level error type for core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("config read error: {0}")]
    Io(#[from] std::io::Error),
}
