//! RateBridge FX Converter
//!
//! Converts amounts between currencies that have no direct rate by chaining
//! the known pairwise rates found in a currency graph.
//!
//! # Features
//!
//! - Every configured rate is usable in both directions
//! - Shortest-hop routing with a shared, concurrent path cache
//! - Forward search with reverse-path fallback
//! - Configuration swaps never disturb in-flight conversions
//!
//! # Example
//!
//! ```rust
//! use ratebridge_fx::{ConverterConfig, RateConverter};
//!
//! let converter = RateConverter::new(ConverterConfig::default());
//! converter
//!     .update_configuration([("USD", "CAD", 1.34), ("CAD", "GBP", 0.58)])
//!     .unwrap();
//!
//! let gbp = converter.convert("USD", "GBP", 100.0).unwrap();
//! assert!((gbp - 77.72).abs() < 1e-9);
//! ```

pub mod config;
pub mod conversion;
pub mod converter;
pub mod error;

pub use config::ConverterConfig;
pub use conversion::{Conversion, Direction};
pub use converter::{ConverterStats, RateConverter, NO_CONVERSION_PATH};
pub use error::{FxError, FxResult};
