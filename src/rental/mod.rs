//! Resource rental operations.
//!
//! # Data Flow
//! ```text
//! FeeRatioRequest     → validate → FeeCalculator::quote_fee → FeeQuote
//! RentResourceRequest → validate → quote → rentResource(receiver, stake, type)
//!                     + prepay as call value → sign → broadcast → RentReceipt
//! ReturnResourceRequest → validate → returnResource(receiver, stake, type)
//!                     → sign → broadcast → ReturnReceipt
//! ```

pub mod service;
pub mod types;

pub use service::RentalService;
pub use types::{FeeRatioRequest, RentReceipt, RentResourceRequest, ReturnReceipt, ReturnResourceRequest};
