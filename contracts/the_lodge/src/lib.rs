#![cfg_attr(not(feature = "std"), no_std, no_main)]

pub mod collaborators;
pub mod config;
pub mod errors;
pub mod oracle;
pub mod phase;
pub mod promotion;
pub mod rarity;
pub mod remote;
pub mod reveal;
pub mod sale;
#[cfg(test)]
mod testing;
pub mod whitelist;

/// Ledger-assigned token identifier, starting at 1.
pub type TokenId = u32;
pub type Balance = u128;
/// UNIX seconds.
pub type Timestamp = u64;
pub type Digest = [u8; 32];
pub type RequestId = u64;
pub type RandomWord = u128;

/// # The Lodge: fixed-supply collectible drop
///
/// ```text
///            mint / whitelist_mint (native)
///  buyer ──► buy_with_token / whitelist_buy_with_token (PSP22 via oracle quote)
///              │
///              ▼
///       [sale admission] ── mint ──► [ownership ledger]
///
///  owner ──► reveal ──► [randomness coordinator]
///                              │ raw_fulfill_random_words
///                              ▼
///                         seed stored ──► rarity_of / display_id_of / token_uri
///                                                  ▲
///  promoter ──► promote ──► reserved id override ──┘
/// ```
///
/// Phases run `NotStarted → WhitelistOnly → OpenToAll → Ended`. The reveal
/// closes the sale. Rarities and display ids are computed on demand from the
/// seed; only promotions are stored per token.
#[ink::contract]
mod the_lodge {
    use ink::prelude::format;
    use ink::prelude::string::String;
    use ink::prelude::vec::Vec;
    use ink::storage::Mapping;

    use crate::config::{DropConfig, SaleConfig, UriConfig};
    use crate::errors::Error;
    use crate::phase::SalePhase;
    use crate::promotion::{PromotionLedger, PromotionPool};
    use crate::rarity::{self, Assignment, Rarity, RarityBand, RarityTable, TokenView};
    use crate::remote::{LedgerContract, PriceFeedContract, Psp22Contract, RandomnessCoordinator};
    use crate::reveal::RevealCoordinator;
    use crate::sale::{self, AirdropEntry, MintCounts, Purchase, Rail};
    use crate::{Digest, RandomWord, RequestId, TokenId};

    // =========================================================================
    // STORAGE
    // =========================================================================

    #[ink(storage)]
    pub struct TheLodge {
        // ── Access control ──────────────────────────────────────────────────
        owner: AccountId,
        promoters: Mapping<AccountId, bool>,

        // ── Sale ────────────────────────────────────────────────────────────
        /// Ownership ledger minting the collection.
        ledger: AccountId,
        sale: SaleConfig,
        ended: bool,
        /// Every token minted through the drop; burns never lower it.
        total_minted: u32,
        /// Paid mints per address, both rails.
        minted_per_address: Mapping<AccountId, u32>,

        // ── Reveal & rarity ─────────────────────────────────────────────────
        revelation: RevealCoordinator,
        rarity_table: RarityTable,
        promotions: PromotionLedger,
        promoted: Mapping<TokenId, Assignment>,

        // ── Metadata ────────────────────────────────────────────────────────
        uri: UriConfig,
    }

    // =========================================================================
    // EVENTS
    // =========================================================================

    #[ink(event)]
    pub struct Purchased {
        #[ink(topic)]
        buyer: AccountId,
        quantity: u32,
        paid_in_token: bool,
        amount: Balance,
    }

    #[ink(event)]
    pub struct Airdropped {
        #[ink(topic)]
        to: AccountId,
        quantity: u32,
    }

    #[ink(event)]
    pub struct RevealRequested {
        #[ink(topic)]
        request_id: RequestId,
    }

    /// Emitted once, when the coordinator's words are accepted.
    #[ink(event)]
    pub struct Revealed {
        seed: RandomWord,
    }

    #[ink(event)]
    pub struct Promoted {
        #[ink(topic)]
        token_id: TokenId,
        rarity: Rarity,
        display_id: u32,
    }

    // ── Admin events ────────────────────────────────────────────────────────

    #[ink(event)]
    pub struct PromoterPermissionSet {
        #[ink(topic)]
        promoter: AccountId,
        allowed: bool,
    }

    #[ink(event)]
    pub struct SaleEndedSet {
        ended: bool,
    }

    #[ink(event)]
    pub struct OwnershipTransferred {
        #[ink(topic)]
        previous: AccountId,
        #[ink(topic)]
        new: AccountId,
    }

    #[ink(event)]
    pub struct Withdrawn {
        #[ink(topic)]
        recipient: AccountId,
        amount: Balance,
        /// `None` for native currency.
        token: Option<AccountId>,
    }

    // =========================================================================
    // IMPLEMENTATION
    // =========================================================================

    impl TheLodge {
        // ---------------------------------------------------------------------
        // Constructors
        // ---------------------------------------------------------------------

        /// Deploys the drop with the default 7 777-token layout. The deployer
        /// becomes the owner.
        #[ink(constructor)]
        pub fn new(config: DropConfig) -> Result<Self, Error> {
            Self::build(config, RarityTable::the_lodge())
        }

        /// Deploys the drop with a custom rarity layout, one band per tier.
        #[ink(constructor)]
        pub fn new_with_rarity_table(
            config: DropConfig,
            bands: Vec<RarityBand>,
        ) -> Result<Self, Error> {
            Self::build(config, RarityTable::new(bands)?)
        }

        fn build(config: DropConfig, rarity_table: RarityTable) -> Result<Self, Error> {
            config.validate()?;
            let promotions = PromotionLedger::new(&rarity_table);

            Ok(Self {
                owner: Self::env().caller(),
                promoters: Mapping::default(),
                ledger: config.ledger,
                sale: config.sale,
                ended: false,
                total_minted: 0,
                minted_per_address: Mapping::default(),
                revelation: RevealCoordinator::new(config.revelation),
                rarity_table,
                promotions,
                promoted: Mapping::default(),
                uri: config.uri,
            })
        }

        // =====================================================================
        // SALE
        // =====================================================================

        /// Open-sale mint paid in native currency; the attached value must
        /// equal `token_price × quantity` exactly.
        #[ink(message, payable)]
        pub fn mint(&mut self, quantity: u32) -> Result<Vec<TokenId>, Error> {
            let transferred = self.env().transferred_value();
            self.purchase(quantity, Rail::Native { transferred }, None)
        }

        /// Native mint with a whitelist proof. The proof only matters
        /// during the whitelist phase.
        #[ink(message, payable)]
        pub fn whitelist_mint(
            &mut self,
            proof: Vec<Digest>,
            quantity: u32,
        ) -> Result<Vec<TokenId>, Error> {
            let transferred = self.env().transferred_value();
            self.purchase(quantity, Rail::Native { transferred }, Some(proof))
        }

        /// Open-sale mint paid in the alternative token. The caller must
        /// have approved the quoted amount to this contract.
        #[ink(message)]
        pub fn buy_with_token(&mut self, quantity: u32) -> Result<Vec<TokenId>, Error> {
            self.purchase(quantity, Rail::Token, None)
        }

        #[ink(message)]
        pub fn whitelist_buy_with_token(
            &mut self,
            proof: Vec<Digest>,
            quantity: u32,
        ) -> Result<Vec<TokenId>, Error> {
            self.purchase(quantity, Rail::Token, Some(proof))
        }

        fn purchase(
            &mut self,
            quantity: u32,
            rail: Rail,
            proof: Option<Vec<Digest>>,
        ) -> Result<Vec<TokenId>, Error> {
            let buyer = self.env().caller();
            let purchase = Purchase {
                buyer,
                quantity,
                rail,
                proof,
                caller_is_contract: self.env().is_contract(&buyer),
            };
            let counts = MintCounts {
                by_buyer: self.minted_by(buyer),
                total: self.total_minted,
                max_supply: self.rarity_table.max_supply(),
            };
            let feed = PriceFeedContract::new(self.sale.oracle);
            let mut token = Psp22Contract::new(self.sale.alternative_payment_token);

            let admission =
                sale::admit(&self.sale, self.ended, self.now(), counts, &purchase, &feed, &token)?;
            let mut ledger = LedgerContract::new(self.ledger);
            let token_ids = sale::settle(&admission, self.env().account_id(), &mut ledger, &mut token)?;

            self.minted_per_address.insert(buyer, &admission.minted_by_buyer);
            self.total_minted = admission.total_minted;

            self.env().emit_event(Purchased {
                buyer,
                quantity,
                paid_in_token: admission.payment.in_token(),
                amount: admission.payment.amount(),
            });

            Ok(token_ids)
        }

        /// Owner mint outside the paid rails. Every phase but `Ended` allows
        /// it; the whole list must fit in the remaining supply.
        #[ink(message)]
        pub fn airdrop(&mut self, entries: Vec<AirdropEntry>) -> Result<(), Error> {
            self.only_owner()?;
            let counts = MintCounts {
                by_buyer: 0,
                total: self.total_minted,
                max_supply: self.rarity_table.max_supply(),
            };
            let mut ledger = LedgerContract::new(self.ledger);
            self.total_minted = sale::airdrop(self.phase(), &entries, counts, &mut ledger)?;

            for entry in entries {
                self.env().emit_event(Airdropped {
                    to: entry.to,
                    quantity: entry.quantity,
                });
            }
            Ok(())
        }

        /// Burns tokens the caller owns or is approved for.
        #[ink(message)]
        pub fn burn(&mut self, token_ids: Vec<TokenId>) -> Result<(), Error> {
            let mut ledger = LedgerContract::new(self.ledger);
            sale::burn(&mut ledger, self.env().caller(), &token_ids)
        }

        // =====================================================================
        // REVEAL
        // =====================================================================

        /// Asks the coordinator for a seed. May be repeated; the newest
        /// request id replaces the pending one.
        #[ink(message)]
        pub fn reveal(&mut self) -> Result<RequestId, Error> {
            self.only_owner()?;
            let mut coordinator = RandomnessCoordinator::new(self.revelation.config().coordinator);
            let request_id = self.revelation.request(&mut coordinator)?;
            self.env().emit_event(RevealRequested { request_id });
            Ok(request_id)
        }

        /// Coordinator callback. Fixes the seed and closes the sale.
        #[ink(message)]
        pub fn raw_fulfill_random_words(
            &mut self,
            request_id: RequestId,
            words: Vec<RandomWord>,
        ) -> Result<(), Error> {
            let seed = self
                .revelation
                .fulfill(self.env().caller(), request_id, &words)?;
            self.ended = true;
            self.env().emit_event(Revealed { seed });
            Ok(())
        }

        // =====================================================================
        // RARITY & PROMOTION
        // =====================================================================

        #[ink(message)]
        pub fn rarity_of(&self, token_id: TokenId) -> Result<Rarity, Error> {
            self.view(token_id)?.rarity()
        }

        #[ink(message)]
        pub fn display_id_of(&self, token_id: TokenId) -> Result<u32, Error> {
            self.view(token_id)?.display_id().ok_or(Error::NotRevealed)
        }

        #[ink(message)]
        pub fn rarities(&self, token_ids: Vec<TokenId>) -> Result<Vec<Rarity>, Error> {
            token_ids.into_iter().map(|id| self.rarity_of(id)).collect()
        }

        #[ink(message)]
        pub fn display_ids(&self, token_ids: Vec<TokenId>) -> Result<Vec<u32>, Error> {
            token_ids.into_iter().map(|id| self.display_id_of(id)).collect()
        }

        /// Placeholder URI before the reveal, `base_uri` + display id after.
        #[ink(message)]
        pub fn token_uri(&self, token_id: TokenId) -> Result<String, Error> {
            match self.view(token_id)? {
                TokenView::Unrevealed => Ok(self.uri.unrevealed_uri.clone()),
                TokenView::Revealed(assignment) => {
                    Ok(format!("{}{}", self.uri.base_uri, assignment.display_id))
                }
            }
        }

        /// Moves `token_id` one tier up, onto the next reserved id of that
        /// tier.
        #[ink(message)]
        pub fn promote(&mut self, token_id: TokenId) -> Result<Assignment, Error> {
            if !self.can_promote(self.env().caller()) {
                return Err(Error::NotPromoter);
            }
            let ledger = LedgerContract::new(self.ledger);
            let assignment = self.promotions.promote_token(
                &ledger,
                &self.rarity_table,
                self.revelation.seed(),
                self.promoted.get(token_id),
                token_id,
            )?;
            self.promoted.insert(token_id, &assignment);

            self.env().emit_event(Promoted {
                token_id,
                rarity: assignment.rarity,
                display_id: assignment.display_id,
            });
            Ok(assignment)
        }

        #[ink(message)]
        pub fn set_promote_permission(
            &mut self,
            promoter: AccountId,
            allowed: bool,
        ) -> Result<(), Error> {
            self.only_owner()?;
            if allowed {
                self.promoters.insert(promoter, &true);
            } else {
                self.promoters.remove(promoter);
            }
            self.env().emit_event(PromoterPermissionSet { promoter, allowed });
            Ok(())
        }

        fn view(&self, token_id: TokenId) -> Result<TokenView, Error> {
            rarity::inspect(
                &LedgerContract::new(self.ledger),
                &self.rarity_table,
                self.revelation.seed(),
                self.promoted.get(token_id),
                token_id,
            )
        }

        // =====================================================================
        // OWNER SETTERS
        // =====================================================================

        #[ink(message)]
        pub fn set_start_timestamps(
            &mut self,
            sale_start_timestamp: Timestamp,
            open_sale_start_timestamp: Timestamp,
        ) -> Result<(), Error> {
            self.only_owner()?;
            self.sale
                .set_start_timestamps(sale_start_timestamp, open_sale_start_timestamp)
        }

        #[ink(message)]
        pub fn set_merkle_root(&mut self, merkle_root: Digest) -> Result<(), Error> {
            self.only_owner()?;
            self.sale.merkle_root = merkle_root;
            Ok(())
        }

        #[ink(message)]
        pub fn set_max_delay(&mut self, max_delay: Timestamp) -> Result<(), Error> {
            self.only_owner()?;
            self.sale.max_delay = max_delay;
            Ok(())
        }

        #[ink(message)]
        pub fn set_token_price(&mut self, token_price: Balance) -> Result<(), Error> {
            self.only_owner()?;
            self.sale.token_price = token_price;
            Ok(())
        }

        #[ink(message)]
        pub fn set_max_tokens_per_address(&mut self, max_tokens: u32) -> Result<(), Error> {
            self.only_owner()?;
            self.sale.max_tokens_per_address = max_tokens;
            Ok(())
        }

        #[ink(message)]
        pub fn set_oracle(&mut self, oracle: AccountId) -> Result<(), Error> {
            self.only_owner()?;
            self.sale.oracle = oracle;
            Ok(())
        }

        #[ink(message)]
        pub fn set_alternative_payment_token(&mut self, token: AccountId) -> Result<(), Error> {
            self.only_owner()?;
            self.sale.alternative_payment_token = token;
            Ok(())
        }

        #[ink(message)]
        pub fn set_ended(&mut self, ended: bool) -> Result<(), Error> {
            self.only_owner()?;
            self.ended = ended;
            self.env().emit_event(SaleEndedSet { ended });
            Ok(())
        }

        #[ink(message)]
        pub fn set_base_uri(&mut self, base_uri: String) -> Result<(), Error> {
            self.only_owner()?;
            self.uri.base_uri = base_uri;
            Ok(())
        }

        #[ink(message)]
        pub fn set_unrevealed_uri(&mut self, unrevealed_uri: String) -> Result<(), Error> {
            self.only_owner()?;
            self.uri.unrevealed_uri = unrevealed_uri;
            Ok(())
        }

        #[ink(message)]
        pub fn set_sub_id(&mut self, sub_id: u64) -> Result<(), Error> {
            self.only_owner()?;
            self.revelation.set_sub_id(sub_id);
            Ok(())
        }

        #[ink(message)]
        pub fn set_key_hash(&mut self, key_hash: Digest) -> Result<(), Error> {
            self.only_owner()?;
            self.revelation.set_key_hash(key_hash);
            Ok(())
        }

        #[ink(message)]
        pub fn transfer_ownership(&mut self, new_owner: AccountId) -> Result<(), Error> {
            self.only_owner()?;
            let previous = self.owner;
            self.owner = new_owner;
            self.env().emit_event(OwnershipTransferred {
                previous,
                new: new_owner,
            });
            Ok(())
        }

        // ── Treasury ────────────────────────────────────────────────────────

        /// Sends the whole native balance to `recipient`.
        #[ink(message)]
        pub fn withdraw_native(&mut self, recipient: AccountId) -> Result<Balance, Error> {
            self.only_owner()?;
            let amount = self.env().balance();
            self.env()
                .transfer(recipient, amount)
                .map_err(|_| Error::WithdrawFailed)?;
            self.env().emit_event(Withdrawn {
                recipient,
                amount,
                token: None,
            });
            Ok(amount)
        }

        /// Sends the whole alternative-token balance to `recipient`.
        #[ink(message)]
        pub fn withdraw_alternative_token(&mut self, recipient: AccountId) -> Result<Balance, Error> {
            self.only_owner()?;
            let token_account = self.sale.alternative_payment_token;
            let mut token = Psp22Contract::new(token_account);
            let amount = sale::sweep_token(&mut token, self.env().account_id(), recipient)?;
            self.env().emit_event(Withdrawn {
                recipient,
                amount,
                token: Some(token_account),
            });
            Ok(amount)
        }

        // =====================================================================
        // VIEW FUNCTIONS
        // =====================================================================

        #[ink(message)]
        pub fn owner(&self) -> AccountId {
            self.owner
        }

        #[ink(message)]
        pub fn ledger(&self) -> AccountId {
            self.ledger
        }

        #[ink(message)]
        pub fn phase(&self) -> SalePhase {
            SalePhase::classify(&self.sale, self.ended, self.now())
        }

        #[ink(message)]
        pub fn ended(&self) -> bool {
            self.ended
        }

        #[ink(message)]
        pub fn minted_by(&self, account: AccountId) -> u32 {
            self.minted_per_address.get(account).unwrap_or(0)
        }

        #[ink(message)]
        pub fn total_minted(&self) -> u32 {
            self.total_minted
        }

        #[ink(message)]
        pub fn max_supply(&self) -> u32 {
            self.rarity_table.max_supply()
        }

        #[ink(message)]
        pub fn token_name(&self) -> String {
            self.sale.token_name.clone()
        }

        #[ink(message)]
        pub fn token_symbol(&self) -> String {
            self.sale.token_symbol.clone()
        }

        #[ink(message)]
        pub fn alternative_payment_token(&self) -> AccountId {
            self.sale.alternative_payment_token
        }

        #[ink(message)]
        pub fn oracle(&self) -> AccountId {
            self.sale.oracle
        }

        #[ink(message)]
        pub fn max_delay(&self) -> Timestamp {
            self.sale.max_delay
        }

        #[ink(message)]
        pub fn token_price(&self) -> Balance {
            self.sale.token_price
        }

        #[ink(message)]
        pub fn max_tokens_per_address(&self) -> u32 {
            self.sale.max_tokens_per_address
        }

        #[ink(message)]
        pub fn sale_start_timestamp(&self) -> Timestamp {
            self.sale.sale_start_timestamp
        }

        #[ink(message)]
        pub fn open_sale_start_timestamp(&self) -> Timestamp {
            self.sale.open_sale_start_timestamp
        }

        #[ink(message)]
        pub fn merkle_root(&self) -> Digest {
            self.sale.merkle_root
        }

        #[ink(message)]
        pub fn base_uri(&self) -> String {
            self.uri.base_uri.clone()
        }

        #[ink(message)]
        pub fn unrevealed_uri(&self) -> String {
            self.uri.unrevealed_uri.clone()
        }

        #[ink(message)]
        pub fn coordinator(&self) -> AccountId {
            self.revelation.config().coordinator
        }

        #[ink(message)]
        pub fn sub_id(&self) -> u64 {
            self.revelation.config().sub_id
        }

        #[ink(message)]
        pub fn key_hash(&self) -> Digest {
            self.revelation.config().key_hash
        }

        /// Pending request, or the last one issued.
        #[ink(message)]
        pub fn request_id(&self) -> Option<RequestId> {
            self.revelation.request_id()
        }

        #[ink(message)]
        pub fn revealed(&self) -> bool {
            self.revelation.revealed()
        }

        /// The seed; zero until revealed.
        #[ink(message)]
        pub fn random_number(&self) -> RandomWord {
            self.revelation.seed().unwrap_or(0)
        }

        #[ink(message)]
        pub fn rarity_table(&self) -> Vec<RarityBand> {
            self.rarity_table.bands().to_vec()
        }

        #[ink(message)]
        pub fn promotion_pool(&self, rarity: Rarity) -> PromotionPool {
            self.promotions.pool(rarity)
        }

        #[ink(message)]
        pub fn can_promote(&self, account: AccountId) -> bool {
            self.promoters.get(account).unwrap_or(false)
        }

        // =====================================================================
        // INTERNAL
        // =====================================================================

        fn now(&self) -> Timestamp {
            self.env().block_timestamp() / 1_000
        }

        fn only_owner(&self) -> Result<(), Error> {
            if self.env().caller() != self.owner {
                return Err(Error::NotOwner);
            }
            Ok(())
        }
    }

    // =========================================================================
    // UNIT TESTS
    // =========================================================================

}
