//! FX converter error types.

use ratebridge_common::Currency;
use thiserror::Error;

/// Errors that can occur in the FX converter.
#[derive(Debug, Error)]
pub enum FxError {
    /// Rate configuration was empty, absent or malformed.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Conversion attempted before any configuration was applied.
    #[error("Converter has no active configuration")]
    NotConfigured,

    /// Neither a forward nor a reverse path connects the currencies.
    #[error("No conversion path from {from} to {to}")]
    NoPathFound { from: Currency, to: Currency },

    /// Converter settings failed validation.
    #[error("Invalid converter config: {0}")]
    InvalidConfig(String),
}

impl FxError {
    /// Get error code for reporting.
    pub fn error_code(&self) -> &'static str {
        match self {
            FxError::InvalidConfiguration(_) => "INVALID_CONFIGURATION",
            FxError::NotConfigured => "NOT_CONFIGURED",
            FxError::NoPathFound { .. } => "NO_PATH_FOUND",
            FxError::InvalidConfig(_) => "INVALID_CONFIG",
        }
    }
}

/// Result type for FX operations.
pub type FxResult<T> = Result<T, FxError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FxError::NoPathFound {
            from: Currency::new("AUD"),
            to: Currency::usd(),
        };

        assert_eq!(err.to_string(), "No conversion path from AUD to USD");
        assert_eq!(err.error_code(), "NO_PATH_FOUND");
        assert_eq!(FxError::NotConfigured.error_code(), "NOT_CONFIGURED");
    }
}
