//! Deployment configuration.
//!
//! Mirrors the nested layout the drop is deployed with: sale parameters,
//! randomness parameters and metadata URIs, plus the ledger the drop mints
//! through. All timestamps and durations are UNIX seconds.

use ink::prelude::string::String;
use ink::primitives::AccountId;

use crate::errors::Error;
use crate::{Balance, Digest, Timestamp};

/// Randomness confirmations requested from the coordinator.
pub const DEFAULT_REQUEST_CONFIRMATIONS: u16 = 3;
/// Gas budget the coordinator spends on the fulfilment callback.
pub const DEFAULT_CALLBACK_GAS_LIMIT: u32 = 100_000;

#[derive(Debug, Clone, PartialEq, Eq, scale::Encode, scale::Decode)]
#[cfg_attr(
    feature = "std",
    derive(scale_info::TypeInfo, ink::storage::traits::StorageLayout)
)]
pub struct SaleConfig {
    pub token_name: String,
    pub token_symbol: String,
    /// PSP22 token accepted as an alternative to the native currency.
    pub alternative_payment_token: AccountId,
    /// Feed quoting the alternative token in native currency.
    pub oracle: AccountId,
    /// Oldest oracle answer still accepted, in seconds.
    pub max_delay: Timestamp,
    /// Native price of one token.
    pub token_price: Balance,
    /// Cap on paid mints per address, across both payment rails.
    pub max_tokens_per_address: u32,
    /// Whitelist phase start.
    pub sale_start_timestamp: Timestamp,
    /// Open phase start; never earlier than `sale_start_timestamp`.
    pub open_sale_start_timestamp: Timestamp,
    pub merkle_root: Digest,
}

impl SaleConfig {
    pub fn validate(&self) -> Result<(), Error> {
        if self.open_sale_start_timestamp < self.sale_start_timestamp {
            return Err(Error::OpenSaleBeforeWhitelistSale);
        }
        Ok(())
    }

    /// Replaces both start times, keeping the old ones if the new pair is
    /// out of order.
    pub fn set_start_timestamps(
        &mut self,
        sale_start_timestamp: Timestamp,
        open_sale_start_timestamp: Timestamp,
    ) -> Result<(), Error> {
        if open_sale_start_timestamp < sale_start_timestamp {
            return Err(Error::OpenSaleBeforeWhitelistSale);
        }
        self.sale_start_timestamp = sale_start_timestamp;
        self.open_sale_start_timestamp = open_sale_start_timestamp;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, scale::Encode, scale::Decode)]
#[cfg_attr(
    feature = "std",
    derive(scale_info::TypeInfo, ink::storage::traits::StorageLayout)
)]
pub struct RevelationConfig {
    /// Only account allowed to deliver random words.
    pub coordinator: AccountId,
    pub key_hash: Digest,
    pub sub_id: u64,
    pub request_confirmations: u16,
    pub callback_gas_limit: u32,
}

impl RevelationConfig {
    pub fn new(coordinator: AccountId, key_hash: Digest, sub_id: u64) -> Self {
        Self {
            coordinator,
            key_hash,
            sub_id,
            request_confirmations: DEFAULT_REQUEST_CONFIRMATIONS,
            callback_gas_limit: DEFAULT_CALLBACK_GAS_LIMIT,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, scale::Encode, scale::Decode)]
#[cfg_attr(
    feature = "std",
    derive(scale_info::TypeInfo, ink::storage::traits::StorageLayout)
)]
pub struct UriConfig {
    pub base_uri: String,
    pub unrevealed_uri: String,
}

#[derive(Debug, Clone, PartialEq, Eq, scale::Encode, scale::Decode)]
#[cfg_attr(feature = "std", derive(scale_info::TypeInfo))]
pub struct DropConfig {
    pub sale: SaleConfig,
    pub revelation: RevelationConfig,
    pub uri: UriConfig,
    /// Ownership ledger the drop mints and burns through.
    pub ledger: AccountId,
}

impl DropConfig {
    pub fn validate(&self) -> Result<(), Error> {
        self.sale.validate()
    }
}
