//! Capabilities the drop consumes from contracts it does not own.
//!
//! The sale, inspection and reveal logic is written against these traits.
//! The deployed contract binds them to cross-contract calls
//! ([`crate::remote`]); tests bind them to in-memory fakes.

use ink::prelude::vec::Vec;
use ink::primitives::AccountId;

use crate::errors::Error;
use crate::oracle::RoundData;
use crate::{Balance, Digest, RequestId, TokenId};

/// Ownership ledger holding the collection's tokens.
pub trait OwnershipLedger {
    /// Creates `quantity` tokens owned by `to` and returns their ids.
    fn mint(&mut self, to: AccountId, quantity: u32) -> Result<Vec<TokenId>, Error>;
    /// Burns `token_id` on behalf of `operator`, who must own it or be
    /// approved for it.
    fn burn(&mut self, operator: AccountId, token_id: TokenId) -> Result<(), Error>;
    fn exists(&self, token_id: TokenId) -> Result<bool, Error>;
}

/// Alternative payment token, pulled through an allowance.
pub trait PaymentToken {
    fn decimals(&self) -> Result<u8, Error>;
    fn balance_of(&self, owner: AccountId) -> Result<Balance, Error>;
    fn transfer_from(
        &mut self,
        from: AccountId,
        to: AccountId,
        amount: Balance,
    ) -> Result<(), Error>;
    fn transfer(&mut self, to: AccountId, amount: Balance) -> Result<(), Error>;
}

/// Price feed quoting the payment token in the reference currency.
pub trait PriceFeed {
    fn latest_round_data(&self) -> Result<RoundData, Error>;
}

/// Parameters of a single randomness request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RandomnessRequest {
    pub key_hash: Digest,
    pub sub_id: u64,
    pub request_confirmations: u16,
    pub callback_gas_limit: u32,
    pub num_words: u32,
}

/// External randomness service. Answers arrive later through a separate
/// callback into the drop.
pub trait RandomnessService {
    fn request_random_words(&mut self, request: &RandomnessRequest) -> Result<RequestId, Error>;
}
