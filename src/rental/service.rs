//! Rental business operations: quote, rent, return.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::blockchain::abi::{encode_call, AbiParam, RENT_RESOURCE_SELECTOR, RETURN_RESOURCE_SELECTOR};
use crate::blockchain::address::Address;
use crate::blockchain::client::TronTransport;
use crate::blockchain::contract::{ContractCaller, TriggeredCall};
use crate::blockchain::types::{BlockchainError, BlockchainResult, SUN_PER_TRX};
use crate::blockchain::wallet::Wallet;
use crate::config::schema::RentalConfig;
use crate::quoting::{FeeCalculator, FeeQuote};
use crate::rental::types::{
    FeeRatioRequest, RentReceipt, RentResourceRequest, ReturnReceipt, ReturnResourceRequest,
};

/// Entry point for the three rental operations.
#[derive(Debug, Clone)]
pub struct RentalService {
    caller: ContractCaller,
    calculator: FeeCalculator,
    contract: Address,
    deadline: Option<Duration>,
}

impl RentalService {
    /// Create a new service over a shared transport.
    pub fn new(transport: Arc<dyn TronTransport>, config: &RentalConfig) -> BlockchainResult<Self> {
        let contract = Address::from_base58(&config.contract_address)?;
        let caller = ContractCaller::new(transport, config.fee_limit_sun);
        let calculator = FeeCalculator::new(caller.clone(), contract, config.strict_fee_queries);

        Ok(Self {
            caller,
            calculator,
            contract,
            deadline: None,
        })
    }

    /// Bound quoting and call preparation by `deadline`.
    ///
    /// Broadcasting is not bounded: once a transaction is sent its id is
    /// always reported.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    async fn within<T, F>(&self, work: F) -> BlockchainResult<T>
    where
        F: Future<Output = BlockchainResult<T>>,
    {
        let Some(limit) = self.deadline else {
            return work.await;
        };
        match tokio::time::timeout(limit, work).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(deadline_secs = limit.as_secs(), "Request deadline exceeded");
                Err(BlockchainError::Timeout(limit.as_secs()))
            }
        }
    }

    pub fn contract(&self) -> Address {
        self.contract
    }

    /// Quote the fee for renting `energy` units.
    pub async fn fee_ratio(&self, request: &FeeRatioRequest) -> BlockchainResult<FeeQuote> {
        request.validate()?;
        let owner = Wallet::from_private_key(&request.private_key)?.address();

        self.within(self.calculator.quote_fee(
            &owner,
            &request.private_key,
            request.energy,
            request.resource,
        ))
        .await
    }

    /// Rent a resource for the receiver and prepay the quoted fee.
    pub async fn rent_resource(&self, request: &RentResourceRequest) -> BlockchainResult<RentReceipt> {
        request.validate()?;
        let receiver = Address::from_base58(&request.receive)?;
        let owner = Wallet::from_private_key(&request.private_key)?.address();

        let (triggered, stake_sun, call_value) = self
            .within(self.prepare_rent(request, &owner, &receiver))
            .await?;
        self.caller.broadcast_transaction(&triggered.transaction).await?;

        tracing::info!(
            tx_id = %triggered.tx_id,
            owner = %owner,
            receiver = %receiver,
            resource = %request.resource,
            stake_sun = stake_sun,
            prepay_sun = call_value,
            "Resource rented"
        );

        Ok(RentReceipt {
            tx_id: triggered.tx_id,
            stake_per_trx: stake_sun,
        })
    }

    /// Return a stake previously rented for the receiver.
    pub async fn return_resource(&self, request: &ReturnResourceRequest) -> BlockchainResult<ReturnReceipt> {
        request.validate()?;
        let receiver = Address::from_base58(&request.receive)?;

        let data = encode_call(
            RETURN_RESOURCE_SELECTOR,
            &[
                receiver.into(),
                AbiParam::try_from(request.stake_per_trx)?,
                request.resource.code().into(),
            ],
        )?;

        let triggered = self
            .within(
                self.caller
                    .trigger_constant_contract(&self.contract, data, &request.private_key, 0),
            )
            .await?;
        self.caller.broadcast_transaction(&triggered.transaction).await?;

        tracing::info!(
            tx_id = %triggered.tx_id,
            receiver = %receiver,
            resource = %request.resource,
            stake_sun = request.stake_per_trx,
            "Resource returned"
        );

        Ok(ReturnReceipt {
            tx_id: triggered.tx_id,
        })
    }

    /// Quote, then trigger and sign the rent call. Returns the signed call,
    /// the stake in sun and the prepaid value in sun.
    async fn prepare_rent(
        &self,
        request: &RentResourceRequest,
        owner: &Address,
        receiver: &Address,
    ) -> BlockchainResult<(TriggeredCall, i64, i64)> {
        let quote = self
            .calculator
            .quote_fee(owner, &request.private_key, request.amount, request.resource)
            .await?;

        let stake_sun = quote
            .stake_required
            .checked_mul(SUN_PER_TRX)
            .ok_or_else(|| BlockchainError::Internal("stake overflow".to_string()))?;
        let call_value = quote.total_prepay_sun()?;

        let data = encode_call(
            RENT_RESOURCE_SELECTOR,
            &[(*receiver).into(), AbiParam::try_from(stake_sun)?, request.resource.code().into()],
        )?;

        let triggered = self
            .caller
            .trigger_constant_contract(&self.contract, data, &request.private_key, call_value)
            .await?;

        Ok((triggered, stake_sun, call_value))
    }
}
