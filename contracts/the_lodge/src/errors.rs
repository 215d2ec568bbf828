//! Failure taxonomy shared by every module of the drop.
//!
//! Every rejected path returns exactly one [`Error`] variant, and every
//! variant belongs to one [`ErrorKind`] so callers can react by category
//! without matching the full enum.

use ink::primitives::AccountId;

use crate::{Balance, Timestamp};

#[derive(Debug, Clone, PartialEq, Eq, scale::Encode, scale::Decode)]
#[cfg_attr(feature = "std", derive(scale_info::TypeInfo))]
pub enum Error {
    // ── Phase ─────────────────────────────────────────────────────────────
    /// Whitelist sale has not started; carries the whitelist start time.
    SaleNotStarted(Timestamp),
    /// Open sale has not started; carries the open-sale start time.
    OpenSaleNotStarted(Timestamp),
    /// Sale is closed, either by the owner or by the reveal.
    SaleEnded,

    // ── Admission ─────────────────────────────────────────────────────────
    /// Merkle proof does not prove the caller against the current root.
    InvalidProof,
    /// Caller would hold more paid mints than `max_tokens_per_address`.
    TokenLimitExceeded,
    /// Minting would push the ledger past the fixed supply.
    TokenSupplyExceeded,
    /// Paid paths are closed to contract callers.
    ContractsCantBuy,
    /// Purchases and airdrops must create at least one token.
    ZeroQuantity,

    // ── Payment ───────────────────────────────────────────────────────────
    /// Native value sent differs from `token_price × quantity`.
    InvalidFunds { sent: Balance, required: Balance },
    /// Oracle answer is zero or negative.
    InvalidAnswer,
    /// Oracle answer is older than `max_delay`.
    OutdatedAnswer,
    /// The payment token refused or failed the transfer.
    PaymentFailed,
    /// The price feed could not be read.
    OracleCallFailed,
    /// Native withdrawal failed.
    WithdrawFailed,

    // ── Randomness ────────────────────────────────────────────────────────
    /// Fulfilment came from somebody other than the registered coordinator.
    OnlyCoordinatorCanFulfill { have: AccountId, want: AccountId },
    /// A seed has already been accepted.
    AlreadyRevealed,
    /// Fulfilment carried no random words.
    NoRandomWords,
    /// The randomness service rejected or failed the request.
    RandomnessRequestFailed,
    /// Rarity is not exposed before the reveal.
    NotRevealed,

    // ── Access ────────────────────────────────────────────────────────────
    /// Caller is not the drop owner.
    NotOwner,
    /// Caller lacks promote permission.
    NotPromoter,

    // ── Ledger (delegated) ────────────────────────────────────────────────
    /// Token was never minted, or has been burned.
    TokenDoesNotExist,
    /// The ownership ledger rejected or failed the call.
    LedgerCallFailed,

    // ── Fatal arithmetic ──────────────────────────────────────────────────
    /// No promotions left for the target tier.
    PromotionPoolExhausted,
    /// Token is already at the topmost tier.
    RarityOverflow,
    /// Arithmetic overflow.
    Overflow,

    // ── Configuration ─────────────────────────────────────────────────────
    /// Open sale would start before the whitelist sale.
    OpenSaleBeforeWhitelistSale,
    /// Bands rejected by `RarityTable::new`.
    InvalidRarityTable,
}

/// Coarse category of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, scale::Encode, scale::Decode)]
#[cfg_attr(feature = "std", derive(scale_info::TypeInfo))]
pub enum ErrorKind {
    Phase,
    Admission,
    Payment,
    Randomness,
    Access,
    Ledger,
    Fatal,
    Configuration,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::SaleNotStarted(_) | Error::OpenSaleNotStarted(_) | Error::SaleEnded => {
                ErrorKind::Phase
            }
            Error::InvalidProof
            | Error::TokenLimitExceeded
            | Error::TokenSupplyExceeded
            | Error::ContractsCantBuy
            | Error::ZeroQuantity => ErrorKind::Admission,
            Error::InvalidFunds { .. }
            | Error::InvalidAnswer
            | Error::OutdatedAnswer
            | Error::PaymentFailed
            | Error::OracleCallFailed
            | Error::WithdrawFailed => ErrorKind::Payment,
            Error::OnlyCoordinatorCanFulfill { .. }
            | Error::AlreadyRevealed
            | Error::NoRandomWords
            | Error::RandomnessRequestFailed
            | Error::NotRevealed => ErrorKind::Randomness,
            Error::NotOwner | Error::NotPromoter => ErrorKind::Access,
            Error::TokenDoesNotExist | Error::LedgerCallFailed => ErrorKind::Ledger,
            Error::PromotionPoolExhausted | Error::RarityOverflow | Error::Overflow => {
                ErrorKind::Fatal
            }
            Error::OpenSaleBeforeWhitelistSale | Error::InvalidRarityTable => {
                ErrorKind::Configuration
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_failures_share_a_kind() {
        assert_eq!(Error::SaleNotStarted(1).kind(), ErrorKind::Phase);
        assert_eq!(Error::OpenSaleNotStarted(2).kind(), ErrorKind::Phase);
        assert_eq!(Error::SaleEnded.kind(), ErrorKind::Phase);
    }

    #[test]
    fn proof_failure_is_distinct_from_phase_failure() {
        assert_ne!(Error::InvalidProof.kind(), Error::SaleNotStarted(0).kind());
        assert_eq!(Error::InvalidProof.kind(), ErrorKind::Admission);
    }

    #[test]
    fn pool_exhaustion_and_top_tier_are_fatal() {
        assert_eq!(Error::PromotionPoolExhausted.kind(), ErrorKind::Fatal);
        assert_eq!(Error::RarityOverflow.kind(), ErrorKind::Fatal);
    }

    #[test]
    fn coordinator_mismatch_reports_both_sides() {
        let have = AccountId::from([1; 32]);
        let want = AccountId::from([2; 32]);
        let err = Error::OnlyCoordinatorCanFulfill { have, want };
        assert_eq!(err.kind(), ErrorKind::Randomness);
        match err {
            Error::OnlyCoordinatorCanFulfill { have: h, want: w } => {
                assert_eq!(h, have);
                assert_eq!(w, want);
            }
            _ => unreachable!(),
        }
    }
}
