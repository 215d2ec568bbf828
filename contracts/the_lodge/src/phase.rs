//! Sale phase classification.
//!
//! The phase is never stored: it is derived from the clock, the two start
//! times and the `ended` flag every time a paid path runs.

use crate::config::SaleConfig;
use crate::errors::Error;
use crate::Timestamp;

#[derive(Debug, Clone, Copy, PartialEq, Eq, scale::Encode, scale::Decode)]
#[cfg_attr(feature = "std", derive(scale_info::TypeInfo))]
pub enum SalePhase {
    NotStarted,
    WhitelistOnly,
    OpenToAll,
    Ended,
}

impl SalePhase {
    /// `Ended` overrides the clock; otherwise start times are inclusive.
    pub fn classify(config: &SaleConfig, ended: bool, now: Timestamp) -> Self {
        if ended {
            SalePhase::Ended
        } else if now < config.sale_start_timestamp {
            SalePhase::NotStarted
        } else if now < config.open_sale_start_timestamp {
            SalePhase::WhitelistOnly
        } else {
            SalePhase::OpenToAll
        }
    }

    pub fn ensure_not_ended(self) -> Result<(), Error> {
        if self == SalePhase::Ended {
            return Err(Error::SaleEnded);
        }
        Ok(())
    }

    /// Gate for paths without a whitelist proof.
    pub fn ensure_open(self, config: &SaleConfig) -> Result<(), Error> {
        match self {
            SalePhase::Ended => Err(Error::SaleEnded),
            SalePhase::NotStarted | SalePhase::WhitelistOnly => {
                Err(Error::OpenSaleNotStarted(config.open_sale_start_timestamp))
            }
            SalePhase::OpenToAll => Ok(()),
        }
    }

    /// Gate for proof paths. Returns whether the proof still has to be
    /// checked: only during the whitelist window.
    pub fn ensure_whitelist_window(self, config: &SaleConfig) -> Result<bool, Error> {
        match self {
            SalePhase::Ended => Err(Error::SaleEnded),
            SalePhase::NotStarted => Err(Error::SaleNotStarted(config.sale_start_timestamp)),
            SalePhase::WhitelistOnly => Ok(true),
            SalePhase::OpenToAll => Ok(false),
        }
    }
}
