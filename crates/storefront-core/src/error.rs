use thiserror::Error;

/// Errors raised while constructing or validating storefront domain values.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid money amount \"{amount}\": {reason}")]
    InvalidAmount { amount: String, reason: String },

    #[error("invalid currency code \"{0}\"")]
    InvalidCurrency(String),

    #[error("unknown cart action \"{0}\"")]
    UnknownCartAction(String),

    #[error("invalid cart inputs for {action}: {source}")]
    CartInputs {
        action: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("cart line quantity must be at least 1, got {quantity} for {target}")]
    InvalidQuantity { target: String, quantity: i64 },
}

/// Errors raised while loading configuration from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
