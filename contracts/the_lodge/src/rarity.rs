//! Rarity assignment engine.
//!
//! Maps a token id to a rarity tier and a display identifier as a pure
//! function of `(token_id, seed, table)`. Nothing is stored per token until
//! a promotion overrides the result.
//!
//! ```text
//! ordinal   = token_id - 1
//! shifted   = (ordinal + seed) mod max_supply         cyclic shift, bijective
//! tier      = band whose cumulative natural range holds `shifted`
//! p         = shifted - band_start
//! q         = (p × stride) mod n                      gcd(stride, n) = 1
//! displayId = first_id + (q mod group) × (n / group) + q / group
//! ```

use ink::prelude::vec::Vec;

use crate::collaborators::OwnershipLedger;
use crate::errors::Error;
use crate::{RandomWord, TokenId};

/// Rarity tiers, lowest first. Promotion moves a token one step up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, scale::Encode, scale::Decode)]
#[cfg_attr(
    feature = "std",
    derive(scale_info::TypeInfo, ink::storage::traits::StorageLayout)
)]
pub enum Rarity {
    Apprentice,
    Fellow,
    Master,
    Transcended,
}

impl Rarity {
    pub const COUNT: usize = 4;
    pub const ALL: [Rarity; Rarity::COUNT] = [
        Rarity::Apprentice,
        Rarity::Fellow,
        Rarity::Master,
        Rarity::Transcended,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// The tier a promotion leads to; `None` at the top.
    pub fn next(self) -> Option<Rarity> {
        Rarity::ALL.get(self.index() + 1).copied()
    }
}

/// Rarity and display identifier of one token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, scale::Encode, scale::Decode)]
#[cfg_attr(
    feature = "std",
    derive(scale_info::TypeInfo, ink::storage::traits::StorageLayout)
)]
pub struct Assignment {
    pub rarity: Rarity,
    pub display_id: u32,
}

/// Identifier blocks of one tier: `natural_count` ids handed out by the
/// engine from `first_id`, and `promotion_ceiling` ids from
/// `reserved_first_id` kept for promotions into the tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, scale::Encode, scale::Decode)]
#[cfg_attr(
    feature = "std",
    derive(scale_info::TypeInfo, ink::storage::traits::StorageLayout)
)]
pub struct RarityBand {
    pub rarity: Rarity,
    pub first_id: u32,
    pub natural_count: u32,
    /// Columns of the transpose grid; must divide `natural_count`.
    pub group_size: u32,
    /// Scramble multiplier; must be coprime with `natural_count`.
    pub stride: u32,
    /// Start of the promotion pool. Pools sit above the natural range.
    pub reserved_first_id: u32,
    pub promotion_ceiling: u32,
}

impl RarityBand {
    /// First identifier of the promotion pool.
    pub fn pool_start(&self) -> u32 {
        self.reserved_first_id
    }

    fn natural_end(&self) -> Option<u32> {
        self.first_id.checked_add(self.natural_count)
    }

    fn pool_end(&self) -> Option<u32> {
        self.reserved_first_id.checked_add(self.promotion_ceiling)
    }

    fn is_well_formed(&self) -> bool {
        if self.first_id == 0 || self.natural_end().is_none() || self.pool_end().is_none() {
            return false;
        }
        if self.promotion_ceiling > 0 && self.reserved_first_id == 0 {
            return false;
        }
        if self.natural_count == 0 {
            return true;
        }
        self.group_size > 0
            && self.natural_count % self.group_size == 0
            && self.stride > 0
            && gcd(self.stride, self.natural_count) == 1
    }

    /// Display id of the `position`-th natural slot of this band.
    fn display_id(&self, position: u32) -> u32 {
        let n = u64::from(self.natural_count);
        let q = (u64::from(position) * u64::from(self.stride) % n) as u32;
        let groups = self.natural_count / self.group_size;
        self.first_id + (q % self.group_size) * groups + q / self.group_size
    }
}

fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        let r = a % b;
        a = b;
        b = r;
    }
    a
}

/// Validated set of bands, one per [`Rarity`] in ascending order.
#[derive(Debug, Clone, PartialEq, Eq, scale::Encode, scale::Decode)]
#[cfg_attr(
    feature = "std",
    derive(scale_info::TypeInfo, ink::storage::traits::StorageLayout)
)]
pub struct RarityTable {
    bands: Vec<RarityBand>,
    max_supply: u32,
}

impl RarityTable {
    pub fn new(bands: Vec<RarityBand>) -> Result<Self, Error> {
        if bands.len() != Rarity::COUNT {
            return Err(Error::InvalidRarityTable);
        }
        let in_order = bands
            .iter()
            .zip(Rarity::ALL.iter())
            .all(|(band, rarity)| band.rarity == *rarity);
        if !in_order || !bands.iter().all(RarityBand::is_well_formed) {
            return Err(Error::InvalidRarityTable);
        }
        // Nothing promotes into the lowest tier.
        if bands[0].promotion_ceiling != 0 {
            return Err(Error::InvalidRarityTable);
        }

        // Natural blocks tile `[1, max_supply]` in tier order.
        let mut max_supply: u32 = 0;
        for band in &bands {
            if max_supply.checked_add(1) != Some(band.first_id) {
                return Err(Error::InvalidRarityTable);
            }
            max_supply = max_supply
                .checked_add(band.natural_count)
                .ok_or(Error::InvalidRarityTable)?;
        }
        if max_supply == 0 {
            return Err(Error::InvalidRarityTable);
        }

        let mut ranges: Vec<(u32, u32)> = bands
            .iter()
            .filter(|band| band.promotion_ceiling > 0)
            .filter_map(|band| band.pool_end().map(|end| (band.reserved_first_id, end)))
            .collect();
        let supply_end = max_supply.checked_add(1).ok_or(Error::InvalidRarityTable)?;
        ranges.push((1, supply_end));
        ranges.sort_unstable();
        if ranges.windows(2).any(|pair| pair[0].1 > pair[1].0) {
            return Err(Error::InvalidRarityTable);
        }

        Ok(Self { bands, max_supply })
    }

    /// The Lodge: 7 777 tokens, 4 646 Apprentice, 2 727 Fellow, 404 Master,
    /// plus promotion pools for Fellow, Master and Transcended above 7 777.
    pub fn the_lodge() -> Self {
        Self {
            bands: Vec::from(THE_LODGE_BANDS),
            max_supply: 7_777,
        }
    }

    pub fn bands(&self) -> &[RarityBand] {
        &self.bands
    }

    pub fn band(&self, rarity: Rarity) -> &RarityBand {
        &self.bands[rarity.index()]
    }

    /// Fixed supply: the sum of every band's natural count.
    pub fn max_supply(&self) -> u32 {
        self.max_supply
    }

    /// Natural assignment of `token_id` under `seed`, ignoring promotions.
    pub fn assign(&self, seed: RandomWord, token_id: TokenId) -> Result<Assignment, Error> {
        let supply = self.max_supply;
        let ordinal = token_id
            .checked_sub(1)
            .filter(|ordinal| *ordinal < supply)
            .ok_or(Error::TokenDoesNotExist)?;
        let offset = (seed % u128::from(supply)) as u32;
        let shifted = ((u64::from(ordinal) + u64::from(offset)) % u64::from(supply)) as u32;

        let mut band_start = 0u32;
        for band in &self.bands {
            let band_end = band_start + band.natural_count;
            if shifted < band_end {
                return Ok(Assignment {
                    rarity: band.rarity,
                    display_id: band.display_id(shifted - band_start),
                });
            }
            band_start = band_end;
        }
        Err(Error::InvalidRarityTable)
    }
}

const THE_LODGE_BANDS: [RarityBand; Rarity::COUNT] = [
    RarityBand {
        rarity: Rarity::Apprentice,
        first_id: 1,
        natural_count: 4_646,
        group_size: 46,
        stride: 7,
        reserved_first_id: 0,
        promotion_ceiling: 0,
    },
    RarityBand {
        rarity: Rarity::Fellow,
        first_id: 4_647,
        natural_count: 2_727,
        group_size: 27,
        stride: 10,
        reserved_first_id: 7_778,
        promotion_ceiling: 300,
    },
    RarityBand {
        rarity: Rarity::Master,
        first_id: 7_374,
        natural_count: 404,
        group_size: 4,
        stride: 3,
        reserved_first_id: 8_078,
        promotion_ceiling: 100,
    },
    RarityBand {
        rarity: Rarity::Transcended,
        first_id: 7_778,
        natural_count: 0,
        group_size: 1,
        stride: 1,
        reserved_first_id: 8_178,
        promotion_ceiling: 33,
    },
];

/// What the collection exposes about a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenView {
    /// Seed not yet revealed; only the placeholder is shown.
    Unrevealed,
    Revealed(Assignment),
}

impl TokenView {
    pub fn rarity(self) -> Result<Rarity, Error> {
        match self {
            TokenView::Unrevealed => Err(Error::NotRevealed),
            TokenView::Revealed(assignment) => Ok(assignment.rarity),
        }
    }

    pub fn display_id(self) -> Option<u32> {
        match self {
            TokenView::Unrevealed => None,
            TokenView::Revealed(assignment) => Some(assignment.display_id),
        }
    }
}

/// Resolves `token_id` for display. The token must exist on the ledger; a
/// promotion override replaces the natural assignment entirely.
pub fn inspect<L: OwnershipLedger>(
    ledger: &L,
    table: &RarityTable,
    seed: Option<RandomWord>,
    promoted: Option<Assignment>,
    token_id: TokenId,
) -> Result<TokenView, Error> {
    if !ledger.exists(token_id)? {
        return Err(Error::TokenDoesNotExist);
    }
    let Some(seed) = seed else {
        return Ok(TokenView::Unrevealed);
    };
    match promoted {
        Some(assignment) => Ok(TokenView::Revealed(assignment)),
        None => table.assign(seed, token_id).map(TokenView::Revealed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeLedger;
    use ink::prelude::collections::BTreeSet;
    use ink::primitives::AccountId;

    const SEEDS: [RandomWord; 5] = [0, 30, 23_113, 7_777 * 3 + 1, RandomWord::MAX];

    #[test]
    fn the_lodge_table_passes_validation() {
        let validated = RarityTable::new(Vec::from(THE_LODGE_BANDS)).unwrap();
        assert_eq!(validated, RarityTable::the_lodge());
        assert_eq!(validated.max_supply(), 7_777);
    }

    #[test]
    fn next_tier_walks_up_and_stops() {
        assert_eq!(Rarity::Apprentice.next(), Some(Rarity::Fellow));
        assert_eq!(Rarity::Fellow.next(), Some(Rarity::Master));
        assert_eq!(Rarity::Master.next(), Some(Rarity::Transcended));
        assert_eq!(Rarity::Transcended.next(), None);
    }

    #[test]
    fn distribution_matches_natural_counts() {
        let table = RarityTable::the_lodge();
        for seed in SEEDS {
            let mut counts = [0u32; Rarity::COUNT];
            for token_id in 1..=table.max_supply() {
                counts[table.assign(seed, token_id).unwrap().rarity.index()] += 1;
            }
            assert_eq!(counts, [4_646, 2_727, 404, 0], "seed {seed}");
        }
    }

    #[test]
    fn display_ids_cover_exactly_one_to_supply() {
        let table = RarityTable::the_lodge();
        let expected: BTreeSet<u32> = (1..=7_777).collect();
        for seed in SEEDS {
            let mut seen = BTreeSet::new();
            for token_id in 1..=table.max_supply() {
                let assignment = table.assign(seed, token_id).unwrap();
                let band = table.band(assignment.rarity);
                assert!(assignment.display_id >= band.first_id);
                assert!(assignment.display_id < band.first_id + band.natural_count);
                assert!(seen.insert(assignment.display_id), "duplicate id, seed {seed}");
            }
            assert_eq!(seen, expected, "seed {seed}");
        }
    }

    #[test]
    fn promotion_pools_sit_above_natural_ids() {
        let table = RarityTable::the_lodge();
        let mut reserved = Vec::new();
        for band in table.bands() {
            reserved.extend(band.pool_start()..band.pool_start() + band.promotion_ceiling);
        }
        assert_eq!(reserved.len(), 433);
        assert_eq!(reserved.first(), Some(&7_778));
        assert_eq!(reserved.last(), Some(&8_210));
        assert!(reserved.windows(2).all(|pair| pair[1] == pair[0] + 1));
    }

    #[test]
    fn seed_acts_as_a_cyclic_shift() {
        let table = RarityTable::the_lodge();
        let seed = 23_113;
        for token_id in 1..table.max_supply() {
            assert_eq!(
                table.assign(seed + 1, token_id).unwrap(),
                table.assign(seed, token_id + 1).unwrap()
            );
        }
        assert_eq!(
            table.assign(seed + 1, table.max_supply()).unwrap(),
            table.assign(seed, 1).unwrap()
        );
    }

    #[test]
    fn assignment_is_stable() {
        let table = RarityTable::the_lodge();
        let first = table.assign(23_113, 42).unwrap();
        for _ in 0..10 {
            assert_eq!(table.assign(23_113, 42).unwrap(), first);
        }
    }

    #[test]
    fn ids_outside_supply_do_not_exist() {
        let table = RarityTable::the_lodge();
        assert_eq!(table.assign(1, 0), Err(Error::TokenDoesNotExist));
        assert_eq!(table.assign(1, 7_778), Err(Error::TokenDoesNotExist));
    }

    #[test]
    fn invalid_tables_are_rejected() {
        let base = Vec::from(THE_LODGE_BANDS);

        let mut stride_shares_factor = base.clone();
        stride_shares_factor[0].stride = 2;
        assert_eq!(RarityTable::new(stride_shares_factor), Err(Error::InvalidRarityTable));

        let mut group_does_not_divide = base.clone();
        group_does_not_divide[1].group_size = 10;
        assert_eq!(RarityTable::new(group_does_not_divide), Err(Error::InvalidRarityTable));

        let mut gap_between_tiers = base.clone();
        gap_between_tiers[2].first_id = 7_500;
        assert_eq!(RarityTable::new(gap_between_tiers), Err(Error::InvalidRarityTable));

        let mut pools_overlap = base.clone();
        pools_overlap[2].reserved_first_id = 8_000;
        assert_eq!(RarityTable::new(pools_overlap), Err(Error::InvalidRarityTable));

        let mut pool_inside_natural_range = base.clone();
        pool_inside_natural_range[1].reserved_first_id = 7_000;
        assert_eq!(
            RarityTable::new(pool_inside_natural_range),
            Err(Error::InvalidRarityTable)
        );

        let mut lowest_has_pool = base.clone();
        lowest_has_pool[0].reserved_first_id = 9_000;
        lowest_has_pool[0].promotion_ceiling = 1;
        assert_eq!(RarityTable::new(lowest_has_pool), Err(Error::InvalidRarityTable));

        let mut out_of_order = base.clone();
        out_of_order.swap(1, 2);
        assert_eq!(RarityTable::new(out_of_order), Err(Error::InvalidRarityTable));

        assert_eq!(RarityTable::new(base[..3].to_vec()), Err(Error::InvalidRarityTable));
    }

    #[test]
    fn inspect_requires_existence_then_reveal() {
        let table = RarityTable::the_lodge();
        let mut ledger = FakeLedger::new(7_777);
        assert_eq!(
            inspect(&ledger, &table, Some(5), None, 1),
            Err(Error::TokenDoesNotExist)
        );

        ledger.mint(AccountId::from([1; 32]), 2).unwrap();
        assert_eq!(inspect(&ledger, &table, None, None, 1), Ok(TokenView::Unrevealed));
        assert_eq!(TokenView::Unrevealed.rarity(), Err(Error::NotRevealed));
        assert_eq!(TokenView::Unrevealed.display_id(), None);

        let natural = table.assign(5, 1).unwrap();
        assert_eq!(
            inspect(&ledger, &table, Some(5), None, 1),
            Ok(TokenView::Revealed(natural))
        );
    }

    #[test]
    fn override_supersedes_natural_assignment() {
        let table = RarityTable::the_lodge();
        let mut ledger = FakeLedger::new(7_777);
        ledger.mint(AccountId::from([1; 32]), 1).unwrap();
        let promoted = Assignment { rarity: Rarity::Transcended, display_id: 8_178 };
        let view = inspect(&ledger, &table, Some(5), Some(promoted), 1).unwrap();
        assert_eq!(view.rarity(), Ok(Rarity::Transcended));
        assert_eq!(view.display_id(), Some(8_178));
    }
}
