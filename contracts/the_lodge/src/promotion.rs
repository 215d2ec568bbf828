//! Promotion bookkeeping: one pool of reserved identifiers per tier.

use ink::prelude::vec::Vec;

use crate::collaborators::OwnershipLedger;
use crate::errors::Error;
use crate::rarity::{self, Assignment, Rarity, RarityTable};
use crate::{RandomWord, TokenId};

/// Reserved identifiers still available for promotions into one tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, scale::Encode, scale::Decode)]
#[cfg_attr(
    feature = "std",
    derive(scale_info::TypeInfo, ink::storage::traits::StorageLayout)
)]
pub struct PromotionPool {
    pub next_reserved_id: u32,
    pub promotions_remaining: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, scale::Encode, scale::Decode)]
#[cfg_attr(
    feature = "std",
    derive(scale_info::TypeInfo, ink::storage::traits::StorageLayout)
)]
pub struct PromotionLedger {
    pools: Vec<PromotionPool>,
}

impl PromotionLedger {
    /// Each pool starts at its band's reserved range, above the natural ids.
    pub fn new(table: &RarityTable) -> Self {
        let pools = table
            .bands()
            .iter()
            .map(|band| PromotionPool {
                next_reserved_id: band.pool_start(),
                promotions_remaining: band.promotion_ceiling,
            })
            .collect();
        Self { pools }
    }

    pub fn pool(&self, rarity: Rarity) -> PromotionPool {
        self.pools[rarity.index()]
    }

    /// Takes the next reserved id of the tier above `current`.
    pub fn promote(&mut self, current: Rarity) -> Result<Assignment, Error> {
        let target = current.next().ok_or(Error::RarityOverflow)?;
        let pool = &mut self.pools[target.index()];
        let remaining = pool
            .promotions_remaining
            .checked_sub(1)
            .ok_or(Error::PromotionPoolExhausted)?;
        let display_id = pool.next_reserved_id;
        pool.next_reserved_id = display_id.checked_add(1).ok_or(Error::Overflow)?;
        pool.promotions_remaining = remaining;
        Ok(Assignment { rarity: target, display_id })
    }

    /// Promotes `token_id` one tier from wherever it currently stands,
    /// honouring a previous override. Returns the new override to store.
    pub fn promote_token<L: OwnershipLedger>(
        &mut self,
        ledger: &L,
        table: &RarityTable,
        seed: Option<RandomWord>,
        current_override: Option<Assignment>,
        token_id: TokenId,
    ) -> Result<Assignment, Error> {
        let current = rarity::inspect(ledger, table, seed, current_override, token_id)?.rarity()?;
        self.promote(current)
    }
}
