//! Reveal handshake with the external randomness service.
//!
//! `request` and `fulfill` arrive in two separate calls. Only the registered
//! coordinator may fulfil, and the first accepted fulfilment fixes the seed
//! for good.

use ink::primitives::AccountId;

use crate::collaborators::{RandomnessRequest, RandomnessService};
use crate::config::RevelationConfig;
use crate::errors::Error;
use crate::{Digest, RandomWord, RequestId};

/// Words requested per reveal; only the first is used as the seed.
pub const NUM_WORDS: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, scale::Encode, scale::Decode)]
#[cfg_attr(
    feature = "std",
    derive(scale_info::TypeInfo, ink::storage::traits::StorageLayout)
)]
pub struct RevealCoordinator {
    config: RevelationConfig,
    request_id: Option<RequestId>,
    seed: RandomWord,
    revealed: bool,
}

impl RevealCoordinator {
    pub fn new(config: RevelationConfig) -> Self {
        Self {
            config,
            request_id: None,
            seed: 0,
            revealed: false,
        }
    }

    pub fn config(&self) -> &RevelationConfig {
        &self.config
    }

    pub fn request_id(&self) -> Option<RequestId> {
        self.request_id
    }

    pub fn revealed(&self) -> bool {
        self.revealed
    }

    /// The seed once revealed.
    pub fn seed(&self) -> Option<RandomWord> {
        self.revealed.then_some(self.seed)
    }

    pub fn set_sub_id(&mut self, sub_id: u64) {
        self.config.sub_id = sub_id;
    }

    pub fn set_key_hash(&mut self, key_hash: Digest) {
        self.config.key_hash = key_hash;
    }

    /// Issues a new request, replacing any outstanding one.
    pub fn request<R: RandomnessService>(&mut self, service: &mut R) -> Result<RequestId, Error> {
        let request = RandomnessRequest {
            key_hash: self.config.key_hash,
            sub_id: self.config.sub_id,
            request_confirmations: self.config.request_confirmations,
            callback_gas_limit: self.config.callback_gas_limit,
            num_words: NUM_WORDS,
        };
        let request_id = service.request_random_words(&request)?;
        self.request_id = Some(request_id);
        Ok(request_id)
    }

    /// Accepts random words from `caller`. Returns the stored seed.
    ///
    /// Any request id from the coordinator is accepted while unrevealed,
    /// including ids of requests replaced by a later `request`.
    pub fn fulfill(
        &mut self,
        caller: AccountId,
        request_id: RequestId,
        words: &[RandomWord],
    ) -> Result<RandomWord, Error> {
        if caller != self.config.coordinator {
            return Err(Error::OnlyCoordinatorCanFulfill {
                have: caller,
                want: self.config.coordinator,
            });
        }
        if self.revealed {
            return Err(Error::AlreadyRevealed);
        }
        let seed = *words.first().ok_or(Error::NoRandomWords)?;
        self.seed = seed;
        self.revealed = true;
        if self.request_id.is_none() {
            self.request_id = Some(request_id);
        }
        Ok(seed)
    }
}
