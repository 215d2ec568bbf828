//! Price-feed adapter for the alternative payment token.

use crate::collaborators::{PaymentToken, PriceFeed};
use crate::errors::Error;
use crate::{Balance, Timestamp};

/// One answer of an aggregator-style price feed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, scale::Encode, scale::Decode)]
#[cfg_attr(feature = "std", derive(scale_info::TypeInfo))]
pub struct RoundData {
    pub round_id: u128,
    /// Reference-currency price of one whole payment token, scaled by the
    /// feed's own decimals.
    pub answer: i128,
    pub started_at: Timestamp,
    pub updated_at: Timestamp,
    pub answered_in_round: u128,
}

impl RoundData {
    /// Returns the positive answer, or why it cannot be used at `now`.
    ///
    /// An answer exactly `max_delay` seconds old is still fresh. Answers
    /// stamped in the future are treated as fresh.
    pub fn validated_answer(&self, now: Timestamp, max_delay: Timestamp) -> Result<u128, Error> {
        if self.answer <= 0 {
            return Err(Error::InvalidAnswer);
        }
        if now.saturating_sub(self.updated_at) > max_delay {
            return Err(Error::OutdatedAnswer);
        }
        Ok(self.answer as u128)
    }
}

/// `reference_amount × 10^decimals / answer`, rounded down.
pub fn convert_amount(reference_amount: Balance, decimals: u8, answer: u128) -> Result<Balance, Error> {
    let scale = 10u128
        .checked_pow(u32::from(decimals))
        .ok_or(Error::Overflow)?;
    reference_amount
        .checked_mul(scale)
        .ok_or(Error::Overflow)?
        .checked_div(answer)
        .ok_or(Error::InvalidAnswer)
}

/// Quotes `reference_amount` in payment-token units using the live feed.
pub fn quote<F, T>(
    feed: &F,
    token: &T,
    max_delay: Timestamp,
    now: Timestamp,
    reference_amount: Balance,
) -> Result<Balance, Error>
where
    F: PriceFeed,
    T: PaymentToken,
{
    let answer = feed.latest_round_data()?.validated_answer(now, max_delay)?;
    let decimals = token.decimals()?;
    convert_amount(reference_amount, decimals, answer)
}
