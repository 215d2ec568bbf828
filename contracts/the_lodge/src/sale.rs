//! Sale admission: who may mint, when, and for how much.
//!
//! [`admit`] runs every check without side effects and yields an
//! [`Admission`]; only then does [`settle`] pull payment and mint.

use ink::prelude::vec::Vec;
use ink::primitives::AccountId;

use crate::collaborators::{OwnershipLedger, PaymentToken, PriceFeed};
use crate::config::SaleConfig;
use crate::errors::Error;
use crate::phase::SalePhase;
use crate::{oracle, whitelist};
use crate::{Balance, Digest, Timestamp, TokenId};

/// How the buyer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rail {
    /// Native currency attached to the call.
    Native { transferred: Balance },
    /// Alternative token, pulled through an allowance.
    Token,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Purchase {
    pub buyer: AccountId,
    pub quantity: u32,
    pub rail: Rail,
    /// `Some` for the whitelist entry points, even if empty.
    pub proof: Option<Vec<Digest>>,
    pub caller_is_contract: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Payment {
    Native(Balance),
    Token(Balance),
}

impl Payment {
    pub fn amount(self) -> Balance {
        match self {
            Payment::Native(amount) | Payment::Token(amount) => amount,
        }
    }

    pub fn in_token(self) -> bool {
        matches!(self, Payment::Token(_))
    }
}

/// A purchase that passed every check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Admission {
    pub buyer: AccountId,
    pub quantity: u32,
    pub payment: Payment,
    /// Buyer's paid-mint count once settled.
    pub minted_by_buyer: u32,
    /// Drop-wide mint count once settled.
    pub total_minted: u32,
}

/// Counters the admission checks read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MintCounts {
    /// Paid mints of the buyer so far, both rails.
    pub by_buyer: u32,
    /// Every token the drop ever minted. Burns do not lower it.
    pub total: u32,
    pub max_supply: u32,
}

/// Validates `purchase` at `now`.
pub fn admit<F, T>(
    config: &SaleConfig,
    ended: bool,
    now: Timestamp,
    counts: MintCounts,
    purchase: &Purchase,
    feed: &F,
    token: &T,
) -> Result<Admission, Error>
where
    F: PriceFeed,
    T: PaymentToken,
{
    let phase = SalePhase::classify(config, ended, now);
    phase.ensure_not_ended()?;
    if purchase.caller_is_contract {
        return Err(Error::ContractsCantBuy);
    }
    match &purchase.proof {
        Some(proof) => {
            if phase.ensure_whitelist_window(config)?
                && !whitelist::verify(&config.merkle_root, &purchase.buyer, proof)
            {
                return Err(Error::InvalidProof);
            }
        }
        None => phase.ensure_open(config)?,
    }
    if purchase.quantity == 0 {
        return Err(Error::ZeroQuantity);
    }

    let required = config
        .token_price
        .checked_mul(Balance::from(purchase.quantity))
        .ok_or(Error::Overflow)?;
    let payment = match purchase.rail {
        Rail::Native { transferred } if transferred == required => Payment::Native(required),
        Rail::Native { transferred } => {
            return Err(Error::InvalidFunds { sent: transferred, required })
        }
        Rail::Token => Payment::Token(oracle::quote(feed, token, config.max_delay, now, required)?),
    };

    let minted_by_buyer = counts
        .by_buyer
        .checked_add(purchase.quantity)
        .filter(|after| *after <= config.max_tokens_per_address)
        .ok_or(Error::TokenLimitExceeded)?;
    let total_minted = counts
        .total
        .checked_add(purchase.quantity)
        .filter(|after| *after <= counts.max_supply)
        .ok_or(Error::TokenSupplyExceeded)?;

    Ok(Admission {
        buyer: purchase.buyer,
        quantity: purchase.quantity,
        payment,
        minted_by_buyer,
        total_minted,
    })
}

/// Pulls token payment into `treasury`, then mints to the buyer.
pub fn settle<L, T>(
    admission: &Admission,
    treasury: AccountId,
    ledger: &mut L,
    token: &mut T,
) -> Result<Vec<TokenId>, Error>
where
    L: OwnershipLedger,
    T: PaymentToken,
{
    if let Payment::Token(amount) = admission.payment {
        token.transfer_from(admission.buyer, treasury, amount)?;
    }
    ledger.mint(admission.buyer, admission.quantity)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, scale::Encode, scale::Decode)]
#[cfg_attr(feature = "std", derive(scale_info::TypeInfo))]
pub struct AirdropEntry {
    pub to: AccountId,
    pub quantity: u32,
}

/// Mints every entry, bypassing payment and whitelist. Returns the new
/// drop-wide mint count.
pub fn airdrop<L: OwnershipLedger>(
    phase: SalePhase,
    entries: &[AirdropEntry],
    counts: MintCounts,
    ledger: &mut L,
) -> Result<u32, Error> {
    phase.ensure_not_ended()?;
    if entries.iter().any(|entry| entry.quantity == 0) {
        return Err(Error::ZeroQuantity);
    }
    let requested = entries
        .iter()
        .try_fold(0u32, |sum, entry| sum.checked_add(entry.quantity))
        .ok_or(Error::TokenSupplyExceeded)?;
    let total = counts
        .total
        .checked_add(requested)
        .filter(|after| *after <= counts.max_supply)
        .ok_or(Error::TokenSupplyExceeded)?;
    for entry in entries {
        ledger.mint(entry.to, entry.quantity)?;
    }
    Ok(total)
}

/// Burns `token_ids` as `operator`; the ledger enforces ownership.
pub fn burn<L: OwnershipLedger>(
    ledger: &mut L,
    operator: AccountId,
    token_ids: &[TokenId],
) -> Result<(), Error> {
    for token_id in token_ids {
        ledger.burn(operator, *token_id)?;
    }
    Ok(())
}

/// Moves the treasury's whole token balance to `recipient`.
pub fn sweep_token<T: PaymentToken>(
    token: &mut T,
    treasury: AccountId,
    recipient: AccountId,
) -> Result<Balance, Error> {
    let balance = token.balance_of(treasury)?;
    if balance > 0 {
        token.transfer(recipient, balance)?;
    }
    Ok(balance)
}
