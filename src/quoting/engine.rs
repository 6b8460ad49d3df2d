//! Stake sizing and fee quoting against the rental pool contract.

use alloy::primitives::U256;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::blockchain::abi::{
    encode_call, AbiParam, FEE_RATIO_SELECTOR, LIQUIDATE_THRESHOLD_SELECTOR, MIN_FEE_SELECTOR,
    RENTAL_RATE_SELECTOR,
};
use crate::blockchain::address::Address;
use crate::blockchain::contract::ContractCaller;
use crate::blockchain::types::{AccountResource, BlockchainError, BlockchainResult, ResourceCode, SUN_PER_TRX};
use crate::blockchain::wallet::Wallet;
use crate::observability::metrics;
use crate::quoting::types::{FeeQuote, StakeUnit};

/// Rental period the prepaid fee covers, in seconds (two days).
pub const RENTAL_PERIOD_SECS: i64 = 172_800;

/// Decimals of 18-decimal token values (rental rate, fee ratio).
pub const TOKEN_PRECISION_SCALE: u32 = 18;

/// Decimals of sun-denominated values (liquidation threshold, minimum fee).
pub const SUN_PRECISION_SCALE: u32 = 6;

/// Stake needed for `requested` units of energy.
///
/// `ceil(requested × weight / limit)` in exact integer arithmetic, which is
/// `ceil(requested / (limit / weight))` without rounding error.
pub fn stake_from_resource(
    resource: &AccountResource,
    requested: i64,
    unit: StakeUnit,
) -> BlockchainResult<i64> {
    if resource.total_energy_weight <= 0 {
        return Err(BlockchainError::Internal(format!(
            "invalid energy weight ({})",
            resource.total_energy_weight
        )));
    }
    if resource.total_energy_limit <= 0 {
        return Err(BlockchainError::Internal(format!(
            "invalid energy limit ({})",
            resource.total_energy_limit
        )));
    }
    if requested < 0 {
        return Err(BlockchainError::InvalidParam(format!(
            "requested amount must not be negative ({})",
            requested
        )));
    }

    let weight = resource.total_energy_weight as u128;
    let limit = resource.total_energy_limit as u128;
    let stake = (requested as u128 * weight).div_ceil(limit);

    let overflow = || BlockchainError::Internal("stake overflow".to_string());
    let stake = i64::try_from(stake).map_err(|_| overflow())?;
    match unit {
        StakeUnit::Trx => Ok(stake),
        StakeUnit::Sun => stake.checked_mul(SUN_PER_TRX).ok_or_else(overflow),
    }
}

/// Raw contract word scaled down by `10^scale`.
pub fn scale_word(word: U256, scale: u32) -> BlockchainResult<Decimal> {
    let too_wide = || BlockchainError::Internal(format!("contract value {} out of range", word));
    let raw = u128::try_from(word).map_err(|_| too_wide())?;
    let raw = i128::try_from(raw).map_err(|_| too_wide())?;
    Decimal::try_from_i128_with_scale(raw, scale).map_err(|_| too_wide())
}

/// Combine contract figures into a quote.
pub fn compose_quote(
    requested_amount: i64,
    stake_required: i64,
    liquidate_threshold: Decimal,
    rental_rate: Decimal,
    min_fee: Decimal,
    fee_ratio: Decimal,
) -> BlockchainResult<FeeQuote> {
    let overflow = || BlockchainError::Internal("fee overflow".to_string());
    let stake = Decimal::from(stake_required);

    let current_fee_ratio = fee_ratio.checked_mul(stake).ok_or_else(overflow)?;
    let applied_fee = min_fee.max(current_fee_ratio);
    let rent_fee = stake
        .checked_mul(rental_rate)
        .and_then(|v| v.checked_mul(Decimal::from(RENTAL_PERIOD_SECS)))
        .and_then(|v| v.checked_add(liquidate_threshold))
        .ok_or_else(overflow)?;
    let total = rent_fee.checked_add(applied_fee).ok_or_else(overflow)?;

    Ok(FeeQuote {
        requested_amount,
        stake_required,
        liquidate_threshold,
        rental_rate,
        fee_ratio,
        min_fee,
        current_fee_ratio,
        applied_fee,
        rent_fee,
        total_prepay_fee: total.to_f64().unwrap_or_default(),
    })
}

/// Quotes rental fees by querying the pool contract.
#[derive(Debug, Clone)]
pub struct FeeCalculator {
    caller: ContractCaller,
    contract: Address,
    strict: bool,
}

impl FeeCalculator {
    /// Create a new calculator.
    ///
    /// With `strict` unset, a failed contract query counts as zero.
    pub fn new(caller: ContractCaller, contract: Address, strict: bool) -> Self {
        Self {
            caller,
            contract,
            strict,
        }
    }

    /// Stake an account needs for `requested` energy, from the live pool.
    pub async fn calculate_stake_required(
        &self,
        owner: &Address,
        requested: i64,
        unit: StakeUnit,
    ) -> BlockchainResult<i64> {
        let resource = self
            .caller
            .transport()
            .get_account_resource(owner)
            .await
            .map_err(|e| {
                tracing::warn!(owner = %owner, error = %e, "Account resource lookup failed");
                BlockchainError::Forbidden(format!("account resource lookup failed: {}", e))
            })?;

        stake_from_resource(&resource, requested, unit)
    }

    /// Full fee quote for renting `requested` units of `resource`.
    pub async fn quote_fee(
        &self,
        owner: &Address,
        private_key_hex: &str,
        requested: i64,
        resource: ResourceCode,
    ) -> BlockchainResult<FeeQuote> {
        // A bad key fails the quote outright, whatever the query policy.
        Wallet::from_private_key(private_key_hex)?;
        let stake = self.calculate_stake_required(owner, requested, StakeUnit::Trx).await?;

        let liquidate_threshold = self
            .query("liquidate_threshold", LIQUIDATE_THRESHOLD_SELECTOR, &[], SUN_PRECISION_SCALE, private_key_hex)
            .await?;
        let rental_rate = self
            .query(
                "rental_rate",
                RENTAL_RATE_SELECTOR,
                &[AbiParam::try_from(stake)?, resource.code().into()],
                TOKEN_PRECISION_SCALE,
                private_key_hex,
            )
            .await?;
        let min_fee = self
            .query("min_fee", MIN_FEE_SELECTOR, &[], SUN_PRECISION_SCALE, private_key_hex)
            .await?;
        let fee_ratio = self
            .query("fee_ratio", FEE_RATIO_SELECTOR, &[], TOKEN_PRECISION_SCALE, private_key_hex)
            .await?;

        let quote = compose_quote(requested, stake, liquidate_threshold, rental_rate, min_fee, fee_ratio)?;

        tracing::info!(
            owner = %owner,
            resource = %resource,
            requested = requested,
            stake = stake,
            total_prepay = quote.total_prepay_fee,
            "Fee quoted"
        );

        Ok(quote)
    }

    async fn query(
        &self,
        field: &'static str,
        selector: &str,
        params: &[AbiParam],
        scale: u32,
        private_key_hex: &str,
    ) -> BlockchainResult<Decimal> {
        let result = async {
            let data = encode_call(selector, params)?;
            let call = self
                .caller
                .trigger_constant_contract(&self.contract, data, private_key_hex, 0)
                .await?;
            scale_word(call.constant_word()?, scale)
        }
        .await;

        match result {
            Err(e) if !self.strict && degradable(&e) => {
                tracing::warn!(field = field, error = %e, "Fee query failed, using zero");
                metrics::record_fee_query_degraded(field);
                Ok(Decimal::ZERO)
            }
            other => other,
        }
    }
}

/// Node and result failures may fall back to zero; caller errors never do.
fn degradable(err: &BlockchainError) -> bool {
    matches!(
        err,
        BlockchainError::Rpc(_) | BlockchainError::Timeout(_) | BlockchainError::Internal(_)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::mock::MockTransport;
    use crate::blockchain::types::DEFAULT_FEE_LIMIT_SUN;
    use std::str::FromStr;
    use std::sync::Arc;

    const TEST_PRIVATE_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const CONTRACT: &str = "TU2MJ5Veik1LRAgjeSzEdvmDYx7mefJZvd";

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn resource(weight: i64, limit: i64) -> AccountResource {
        AccountResource {
            total_energy_weight: weight,
            total_energy_limit: limit,
        }
    }

    fn pool_transport() -> MockTransport {
        MockTransport::new()
            .with_resource(1000, 1000)
            .with_word(LIQUIDATE_THRESHOLD_SELECTOR, 5_000_000)
            .with_word(RENTAL_RATE_SELECTOR, 100_000_000_000_000)
            .with_word(MIN_FEE_SELECTOR, 10_000_000)
            .with_word(FEE_RATIO_SELECTOR, 20_000_000_000_000)
    }

    fn calculator(transport: MockTransport, strict: bool) -> (FeeCalculator, Arc<MockTransport>) {
        let transport = Arc::new(transport);
        let caller = ContractCaller::new(transport.clone(), DEFAULT_FEE_LIMIT_SUN);
        (
            FeeCalculator::new(caller, CONTRACT.parse().unwrap(), strict),
            transport,
        )
    }

    fn owner() -> Address {
        "TYBNgWfhGuNzdLtjKtxXTfskAhTbMcqbaG".parse().unwrap()
    }

    #[test]
    fn test_stake_rounds_up() {
        assert_eq!(stake_from_resource(&resource(100, 50), 30, StakeUnit::Trx).unwrap(), 60);
        assert_eq!(stake_from_resource(&resource(100, 50), 30, StakeUnit::Sun).unwrap(), 60_000_000);
        // 1 × 3 / 2 = 1.5 → 2
        assert_eq!(stake_from_resource(&resource(3, 2), 1, StakeUnit::Trx).unwrap(), 2);
        assert_eq!(stake_from_resource(&resource(3, 2), 0, StakeUnit::Trx).unwrap(), 0);
    }

    #[test]
    fn test_stake_exact_where_float_drifts() {
        // limit / weight = 1/3 is not representable; 10 / (1/3) must stay 30
        assert_eq!(stake_from_resource(&resource(3, 1), 10, StakeUnit::Trx).unwrap(), 30);
        let mainnet_like = resource(19_370_548_917, 180_000_000_000);
        assert_eq!(stake_from_resource(&mainnet_like, 65_000, StakeUnit::Trx).unwrap(), 6995);
    }

    #[test]
    fn test_stake_rejects_empty_pool() {
        for r in [resource(0, 50), resource(100, 0), resource(-1, 50)] {
            assert!(matches!(
                stake_from_resource(&r, 30, StakeUnit::Trx),
                Err(BlockchainError::Internal(_))
            ));
        }
        assert!(matches!(
            stake_from_resource(&resource(1, 1), -5, StakeUnit::Trx),
            Err(BlockchainError::InvalidParam(_))
        ));
    }

    #[test]
    fn test_stake_overflow() {
        let r = resource(i64::MAX, 1);
        assert!(matches!(
            stake_from_resource(&r, 2, StakeUnit::Trx),
            Err(BlockchainError::Internal(_))
        ));
        let r = resource(i64::MAX / 2, 1);
        assert!(matches!(
            stake_from_resource(&r, 1, StakeUnit::Sun),
            Err(BlockchainError::Internal(_))
        ));
    }

    #[test]
    fn test_scale_word() {
        assert_eq!(scale_word(U256::from(5_000_000u64), 6).unwrap(), Decimal::from(5));
        assert_eq!(scale_word(U256::from(20_000_000_000_000u64), 18).unwrap(), dec("0.00002"));
        assert!(scale_word(U256::MAX, 18).is_err());
    }

    #[test]
    fn test_compose_quote_scenario() {
        let quote = compose_quote(
            65_000,
            1000,
            Decimal::from(5),
            dec("0.0001"),
            Decimal::from(10),
            dec("0.00002"),
        )
        .unwrap();

        assert_eq!(quote.current_fee_ratio, dec("0.02"));
        assert_eq!(quote.applied_fee, Decimal::from(10));
        assert_eq!(quote.rent_fee, Decimal::from(17285));
        assert_eq!(quote.total_prepay().unwrap(), Decimal::from(17295));
        assert_eq!(quote.total_prepay_fee, 17295.0);
        assert_eq!(quote.fee_ratio, dec("0.00002"));
    }

    #[test]
    fn test_compose_quote_ratio_above_min_fee() {
        let quote = compose_quote(1, 1_000_000, Decimal::ZERO, Decimal::ZERO, Decimal::from(10), dec("0.00002"))
            .unwrap();
        assert_eq!(quote.applied_fee, Decimal::from(20));
        assert_eq!(quote.total_prepay_fee, 20.0);
    }

    #[tokio::test]
    async fn test_quote_fee_end_to_end() {
        let (calculator, transport) = calculator(pool_transport(), false);

        let quote = calculator
            .quote_fee(&owner(), TEST_PRIVATE_KEY, 1000, ResourceCode::Energy)
            .await
            .unwrap();

        assert_eq!(quote.requested_amount, 1000);
        assert_eq!(quote.stake_required, 1000);
        assert_eq!(quote.liquidate_threshold, Decimal::from(5));
        assert_eq!(quote.rental_rate, dec("0.0001"));
        assert_eq!(quote.min_fee, Decimal::from(10));
        assert_eq!(quote.rent_fee, Decimal::from(17285));
        assert_eq!(quote.total_prepay_fee, 17295.0);

        let calls = transport.calls();
        assert_eq!(calls.len(), 4);
        let rate_call = calls
            .iter()
            .find(|c| c.data[..4] == [0x31, 0x93, 0xfa, 0xda])
            .unwrap();
        assert_eq!(
            hex::encode(&rate_call.data),
            format!("3193fada{:064x}{:064x}", 1000, 1)
        );
        assert!(calls.iter().all(|c| c.call_value == 0));
    }

    #[tokio::test]
    async fn test_failed_query_degrades_to_zero() {
        let (calculator, _) = calculator(pool_transport().with_failure(MIN_FEE_SELECTOR, "REVERT"), false);

        let quote = calculator
            .quote_fee(&owner(), TEST_PRIVATE_KEY, 1000, ResourceCode::Energy)
            .await
            .unwrap();

        assert_eq!(quote.min_fee, Decimal::ZERO);
        assert_eq!(quote.applied_fee, dec("0.02"));
    }

    #[tokio::test]
    async fn test_strict_mode_surfaces_failure() {
        let (calculator, _) = calculator(pool_transport().with_failure(FEE_RATIO_SELECTOR, "REVERT"), true);

        let err = calculator
            .quote_fee(&owner(), TEST_PRIVATE_KEY, 1000, ResourceCode::Energy)
            .await
            .unwrap_err();
        assert!(matches!(err, BlockchainError::Rpc(_)));
    }

    #[tokio::test]
    async fn test_empty_result_reads_as_zero() {
        let (calculator, _) = calculator(
            pool_transport().with_raw(LIQUIDATE_THRESHOLD_SELECTOR, Vec::new()),
            false,
        );
        let quote = calculator
            .quote_fee(&owner(), TEST_PRIVATE_KEY, 1000, ResourceCode::Energy)
            .await
            .unwrap();
        assert_eq!(quote.liquidate_threshold, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_bad_key_is_never_degraded() {
        let (calculator, transport) = calculator(pool_transport(), false);
        for key in ["not-a-key".to_string(), "z".repeat(64), "0".repeat(64)] {
            let err = calculator
                .quote_fee(&owner(), &key, 1000, ResourceCode::Energy)
                .await
                .unwrap_err();
            assert!(matches!(err, BlockchainError::InvalidParam(_)));
        }
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn test_missing_template_is_not_degraded() {
        let (calculator, _) = calculator(pool_transport().without_template(), false);
        let err = calculator
            .quote_fee(&owner(), TEST_PRIVATE_KEY, 1000, ResourceCode::Energy)
            .await
            .unwrap_err();
        assert!(matches!(err, BlockchainError::InvalidParam(_)));
    }

    #[tokio::test]
    async fn test_resource_lookup_failure_is_forbidden() {
        let (calculator, _) = calculator(MockTransport::new(), false);
        let err = calculator
            .calculate_stake_required(&owner(), 30, StakeUnit::Trx)
            .await
            .unwrap_err();
        assert!(matches!(err, BlockchainError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_empty_pool_aborts_quote() {
        let (calculator, transport) = calculator(
            pool_transport().with_resource(0, 1000),
            false,
        );
        let err = calculator
            .quote_fee(&owner(), TEST_PRIVATE_KEY, 1000, ResourceCode::Energy)
            .await
            .unwrap_err();
        assert!(matches!(err, BlockchainError::Internal(_)));
        assert!(transport.calls().is_empty());
    }
}
