//! Cross-contract bindings for the collaborator traits.
//!
//! Each adapter wraps the callee's account and issues `build_call` with
//! `try_invoke`, so a trapped, reverted or undecodable call becomes a typed
//! [`Error`] instead of a panic.

use ink::env::call::{build_call, ExecutionInput, Selector};
use ink::env::DefaultEnvironment;
use ink::prelude::vec::Vec;
use ink::primitives::AccountId;

use crate::collaborators::{
    OwnershipLedger, PaymentToken, PriceFeed, RandomnessRequest, RandomnessService,
};
use crate::errors::Error;
use crate::oracle::RoundData;
use crate::{Balance, RequestId, TokenId};

/// Error code returned by a collaborator. Only its presence matters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, scale::Encode, scale::Decode)]
#[cfg_attr(feature = "std", derive(scale_info::TypeInfo))]
pub struct RemoteError(pub u8);

type CallResult<T> = Result<ink::MessageResult<T>, ink::env::Error>;

fn returned<T>(result: CallResult<T>) -> Option<T> {
    result.ok()?.ok()
}

/// Ownership ledger deployed alongside the drop.
#[derive(Debug, Clone, Copy)]
pub struct LedgerContract {
    account: AccountId,
}

impl LedgerContract {
    pub fn new(account: AccountId) -> Self {
        Self { account }
    }
}

impl OwnershipLedger for LedgerContract {
    fn mint(&mut self, to: AccountId, quantity: u32) -> Result<Vec<TokenId>, Error> {
        let result: CallResult<Result<Vec<TokenId>, RemoteError>> =
            build_call::<DefaultEnvironment>()
                .call(self.account)
                .exec_input(
                    ExecutionInput::new(Selector::new(ink::selector_bytes!("mint")))
                        .push_arg(to)
                        .push_arg(quantity),
                )
                .returns::<Result<Vec<TokenId>, RemoteError>>()
                .try_invoke();

        match returned(result) {
            Some(Ok(ids)) => Ok(ids),
            _ => Err(Error::LedgerCallFailed),
        }
    }

    fn burn(&mut self, operator: AccountId, token_id: TokenId) -> Result<(), Error> {
        let result: CallResult<Result<(), RemoteError>> = build_call::<DefaultEnvironment>()
            .call(self.account)
            .exec_input(
                ExecutionInput::new(Selector::new(ink::selector_bytes!("burn")))
                    .push_arg(operator)
                    .push_arg(token_id),
            )
            .returns::<Result<(), RemoteError>>()
            .try_invoke();

        match returned(result) {
            Some(Ok(())) => Ok(()),
            _ => Err(Error::LedgerCallFailed),
        }
    }

    fn exists(&self, token_id: TokenId) -> Result<bool, Error> {
        let result: CallResult<bool> = build_call::<DefaultEnvironment>()
            .call(self.account)
            .exec_input(
                ExecutionInput::new(Selector::new(ink::selector_bytes!("exists")))
                    .push_arg(token_id),
            )
            .returns::<bool>()
            .try_invoke();

        returned(result).ok_or(Error::LedgerCallFailed)
    }
}

/// PSP22 payment token.
#[derive(Debug, Clone, Copy)]
pub struct Psp22Contract {
    account: AccountId,
}

impl Psp22Contract {
    pub fn new(account: AccountId) -> Self {
        Self { account }
    }
}

impl PaymentToken for Psp22Contract {
    fn decimals(&self) -> Result<u8, Error> {
        let result: CallResult<u8> = build_call::<DefaultEnvironment>()
            .call(self.account)
            .exec_input(ExecutionInput::new(Selector::new(ink::selector_bytes!(
                "PSP22Metadata::token_decimals"
            ))))
            .returns::<u8>()
            .try_invoke();

        returned(result).ok_or(Error::PaymentFailed)
    }

    fn balance_of(&self, owner: AccountId) -> Result<Balance, Error> {
        let result: CallResult<Balance> = build_call::<DefaultEnvironment>()
            .call(self.account)
            .exec_input(
                ExecutionInput::new(Selector::new(ink::selector_bytes!("PSP22::balance_of")))
                    .push_arg(owner),
            )
            .returns::<Balance>()
            .try_invoke();

        returned(result).ok_or(Error::PaymentFailed)
    }

    fn transfer_from(
        &mut self,
        from: AccountId,
        to: AccountId,
        amount: Balance,
    ) -> Result<(), Error> {
        let result: CallResult<Result<(), RemoteError>> = build_call::<DefaultEnvironment>()
            .call(self.account)
            .exec_input(
                ExecutionInput::new(Selector::new(ink::selector_bytes!("PSP22::transfer_from")))
                    .push_arg(from)
                    .push_arg(to)
                    .push_arg(amount)
                    .push_arg(Vec::<u8>::new()),
            )
            .returns::<Result<(), RemoteError>>()
            .try_invoke();

        match returned(result) {
            Some(Ok(())) => Ok(()),
            _ => Err(Error::PaymentFailed),
        }
    }

    fn transfer(&mut self, to: AccountId, amount: Balance) -> Result<(), Error> {
        let result: CallResult<Result<(), RemoteError>> = build_call::<DefaultEnvironment>()
            .call(self.account)
            .exec_input(
                ExecutionInput::new(Selector::new(ink::selector_bytes!("PSP22::transfer")))
                    .push_arg(to)
                    .push_arg(amount)
                    .push_arg(Vec::<u8>::new()),
            )
            .returns::<Result<(), RemoteError>>()
            .try_invoke();

        match returned(result) {
            Some(Ok(())) => Ok(()),
            _ => Err(Error::PaymentFailed),
        }
    }
}

/// Aggregator-style feed.
#[derive(Debug, Clone, Copy)]
pub struct PriceFeedContract {
    account: AccountId,
}

impl PriceFeedContract {
    pub fn new(account: AccountId) -> Self {
        Self { account }
    }
}

impl PriceFeed for PriceFeedContract {
    fn latest_round_data(&self) -> Result<RoundData, Error> {
        let result: CallResult<RoundData> = build_call::<DefaultEnvironment>()
            .call(self.account)
            .exec_input(ExecutionInput::new(Selector::new(ink::selector_bytes!(
                "latest_round_data"
            ))))
            .returns::<RoundData>()
            .try_invoke();

        returned(result).ok_or(Error::OracleCallFailed)
    }
}

/// Randomness coordinator. Fulfilment comes back through
/// `raw_fulfill_random_words` on the drop.
#[derive(Debug, Clone, Copy)]
pub struct RandomnessCoordinator {
    account: AccountId,
}

impl RandomnessCoordinator {
    pub fn new(account: AccountId) -> Self {
        Self { account }
    }
}

impl RandomnessService for RandomnessCoordinator {
    fn request_random_words(&mut self, request: &RandomnessRequest) -> Result<RequestId, Error> {
        let result: CallResult<RequestId> = build_call::<DefaultEnvironment>()
            .call(self.account)
            .exec_input(
                ExecutionInput::new(Selector::new(ink::selector_bytes!("request_random_words")))
                    .push_arg(request.key_hash)
                    .push_arg(request.sub_id)
                    .push_arg(request.request_confirmations)
                    .push_arg(request.callback_gas_limit)
                    .push_arg(request.num_words),
            )
            .returns::<RequestId>()
            .try_invoke();

        returned(result).ok_or(Error::RandomnessRequestFailed)
    }
}
