//! RateBridge Common Types
//!
//! Shared value types used across the RateBridge workspace: currency codes,
//! ordered currency pairs and the configured pairwise conversion rates.

pub mod currency;

pub use currency::*;
