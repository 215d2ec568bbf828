//! In-memory collaborators for unit tests.

use ink::prelude::collections::BTreeMap;
use ink::prelude::vec::Vec;
use ink::primitives::AccountId;

use crate::collaborators::{
    OwnershipLedger, PaymentToken, PriceFeed, RandomnessRequest, RandomnessService,
};
use crate::errors::Error;
use crate::oracle::RoundData;
use crate::{Balance, RequestId, Timestamp, TokenId};

/// Sequential ledger: ids start at 1 and are never reused.
#[derive(Debug, Default)]
pub struct FakeLedger {
    pub owners: BTreeMap<TokenId, AccountId>,
    pub next_id: TokenId,
    pub cap: u32,
    pub minted: u32,
    pub mint_calls: Vec<(AccountId, u32)>,
    pub fail: bool,
}

impl FakeLedger {
    pub fn new(cap: u32) -> Self {
        Self { next_id: 1, cap, ..Default::default() }
    }

    pub fn owner_of(&self, token_id: TokenId) -> Option<AccountId> {
        self.owners.get(&token_id).copied()
    }

    pub fn balance_of(&self, owner: AccountId) -> usize {
        self.owners.values().filter(|o| **o == owner).count()
    }
}

impl OwnershipLedger for FakeLedger {
    fn mint(&mut self, to: AccountId, quantity: u32) -> Result<Vec<TokenId>, Error> {
        if self.fail || self.minted + quantity > self.cap {
            return Err(Error::LedgerCallFailed);
        }
        self.mint_calls.push((to, quantity));
        let ids: Vec<TokenId> = (self.next_id..self.next_id + quantity).collect();
        for id in &ids {
            self.owners.insert(*id, to);
        }
        self.next_id += quantity;
        self.minted += quantity;
        Ok(ids)
    }

    fn burn(&mut self, operator: AccountId, token_id: TokenId) -> Result<(), Error> {
        match self.owners.get(&token_id) {
            Some(owner) if *owner == operator => {
                self.owners.remove(&token_id);
                Ok(())
            }
            _ => Err(Error::LedgerCallFailed),
        }
    }

    fn exists(&self, token_id: TokenId) -> Result<bool, Error> {
        Ok(self.owners.contains_key(&token_id))
    }
}

/// PSP22-like token with unlimited allowances.
#[derive(Debug, Default)]
pub struct FakeToken {
    pub decimals: u8,
    pub balances: BTreeMap<AccountId, Balance>,
    pub pulls: Vec<(AccountId, AccountId, Balance)>,
    pub fail: bool,
}

impl FakeToken {
    pub fn with_decimals(decimals: u8) -> Self {
        Self { decimals, ..Default::default() }
    }

    pub fn fund(mut self, owner: AccountId, amount: Balance) -> Self {
        self.balances.insert(owner, amount);
        self
    }

    fn balance(&self, owner: &AccountId) -> Balance {
        self.balances.get(owner).copied().unwrap_or_default()
    }

    fn move_funds(&mut self, from: AccountId, to: AccountId, amount: Balance) -> Result<(), Error> {
        let from_balance = self.balance(&from);
        if self.fail || from_balance < amount {
            return Err(Error::PaymentFailed);
        }
        self.balances.insert(from, from_balance - amount);
        let to_balance = self.balance(&to);
        self.balances.insert(to, to_balance + amount);
        Ok(())
    }
}

impl PaymentToken for FakeToken {
    fn decimals(&self) -> Result<u8, Error> {
        Ok(self.decimals)
    }

    fn balance_of(&self, owner: AccountId) -> Result<Balance, Error> {
        Ok(self.balance(&owner))
    }

    fn transfer_from(&mut self, from: AccountId, to: AccountId, amount: Balance) -> Result<(), Error> {
        self.move_funds(from, to, amount)?;
        self.pulls.push((from, to, amount));
        Ok(())
    }

    fn transfer(&mut self, to: AccountId, amount: Balance) -> Result<(), Error> {
        // The holder is implicit for a plain transfer; tests fund `holder()`.
        self.move_funds(holder(), to, amount)
    }
}

/// Account whose balance [`FakeToken::transfer`] spends.
pub fn holder() -> AccountId {
    AccountId::from([0xEE; 32])
}

#[derive(Debug)]
pub struct FakeFeed {
    round: Option<RoundData>,
}

impl FakeFeed {
    pub fn answering(answer: i128, updated_at: Timestamp) -> Self {
        Self {
            round: Some(RoundData { answer, updated_at, ..Default::default() }),
        }
    }

    pub fn broken() -> Self {
        Self { round: None }
    }
}

impl PriceFeed for FakeFeed {
    fn latest_round_data(&self) -> Result<RoundData, Error> {
        self.round.ok_or(Error::OracleCallFailed)
    }
}

#[derive(Debug, Default)]
pub struct FakeVrf {
    pub next_id: RequestId,
    pub requests: Vec<RandomnessRequest>,
    pub fail: bool,
}

impl RandomnessService for FakeVrf {
    fn request_random_words(&mut self, request: &RandomnessRequest) -> Result<RequestId, Error> {
        if self.fail {
            return Err(Error::RandomnessRequestFailed);
        }
        self.next_id += 1;
        self.requests.push(*request);
        Ok(self.next_id)
    }
}
