//! Fee quoting.
//!
//! # Data Flow
//! ```text
//! owner address
//!     → account resource (energy weight / limit) → stake in TRX
//!     → liquidation threshold, rental rate, min fee, fee ratio (constant calls)
//!     → FeeQuote
//! ```

pub mod engine;
pub mod types;

pub use engine::FeeCalculator;
pub use types::{FeeQuote, StakeUnit};
