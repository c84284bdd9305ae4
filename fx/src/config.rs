//! Converter configuration.

use crate::error::{FxError, FxResult};

/// Configuration for the rate converter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConverterConfig {
    /// Search cost of one conversion hop.
    pub hop_cost: u32,
    /// Try the inverse path when no forward path exists.
    pub reverse_fallback: bool,
    /// Serve repeated pair lookups from the path cache.
    pub cache_enabled: bool,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            hop_cost: 1,
            reverse_fallback: true,
            cache_enabled: true,
        }
    }
}

impl ConverterConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(cost) = std::env::var("RATEBRIDGE_HOP_COST") {
            if let Ok(cost) = cost.parse() {
                config.hop_cost = cost;
            }
        }

        if let Ok(flag) = std::env::var("RATEBRIDGE_REVERSE_FALLBACK") {
            if let Ok(flag) = flag.parse() {
                config.reverse_fallback = flag;
            }
        }

        if let Ok(flag) = std::env::var("RATEBRIDGE_PATH_CACHE") {
            if let Ok(flag) = flag.parse() {
                config.cache_enabled = flag;
            }
        }

        config
    }

    /// Validate configuration.
    pub fn validate(&self) -> FxResult<()> {
        if self.hop_cost == 0 {
            return Err(FxError::InvalidConfig(
                "Hop cost must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}
