//! Fee quote types.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::blockchain::types::{BlockchainError, BlockchainResult, SUN_PER_TRX};

/// Denomination of a computed stake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StakeUnit {
    /// Whole TRX.
    Trx,
    /// Sun (10^-6 TRX).
    Sun,
}

/// Everything needed to decide whether to rent, and what to prepay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeQuote {
    /// Resource amount the caller asked for.
    pub requested_amount: i64,
    /// Stake in whole TRX, rounded up.
    pub stake_required: i64,
    pub liquidate_threshold: Decimal,
    /// Per-second rate per staked TRX.
    pub rental_rate: Decimal,
    /// Contract fee ratio per staked TRX.
    pub fee_ratio: Decimal,
    pub min_fee: Decimal,
    /// `fee_ratio × stake_required`.
    pub current_fee_ratio: Decimal,
    /// `max(min_fee, current_fee_ratio)`.
    pub applied_fee: Decimal,
    pub rent_fee: Decimal,
    /// Display-only approximation of `rent_fee + applied_fee`.
    pub total_prepay_fee: f64,
}

impl FeeQuote {
    /// Exact `rent_fee + applied_fee`.
    pub fn total_prepay(&self) -> BlockchainResult<Decimal> {
        self.rent_fee
            .checked_add(self.applied_fee)
            .ok_or_else(|| BlockchainError::Internal("prepay fee overflow".to_string()))
    }

    /// Prepay amount in sun, truncated.
    pub fn total_prepay_sun(&self) -> BlockchainResult<i64> {
        self.total_prepay()?
            .checked_mul(Decimal::from(SUN_PER_TRX))
            .and_then(|sun| sun.trunc().to_i64())
            .ok_or_else(|| BlockchainError::Internal("prepay fee overflow".to_string()))
    }
}
