//! Whitelist membership proofs.
//!
//! Leaves are `keccak256(account bytes)`, sorted before the tree is built.
//! Inner nodes hash the smaller child first, so proofs carry no left/right
//! flags and the order of the published list does not change the root.

use ink::env::hash::Keccak256;
use ink::prelude::vec::Vec;
use ink::primitives::AccountId;

use crate::Digest;

pub fn keccak256(input: &[u8]) -> Digest {
    let mut output = Digest::default();
    ink::env::hash_bytes::<Keccak256>(input, &mut output);
    output
}

pub fn leaf(account: &AccountId) -> Digest {
    keccak256(account.as_ref())
}

fn hash_pair(a: &Digest, b: &Digest) -> Digest {
    let mut buf = [0u8; 64];
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    buf[..32].copy_from_slice(lo);
    buf[32..].copy_from_slice(hi);
    keccak256(&buf)
}

/// Checks `proof` for `account` against `root`.
pub fn verify(root: &Digest, account: &AccountId, proof: &[Digest]) -> bool {
    let computed = proof
        .iter()
        .fold(leaf(account), |node, sibling| hash_pair(&node, sibling));
    &computed == root
}

fn sorted_leaves(accounts: &[AccountId]) -> Vec<Digest> {
    let mut leaves: Vec<Digest> = accounts.iter().map(leaf).collect();
    leaves.sort_unstable();
    leaves
}

/// Root over `accounts`. An odd node at the end of a level is carried up
/// unchanged. An empty list has the all-zero root.
pub fn merkle_root(accounts: &[AccountId]) -> Digest {
    let mut level = sorted_leaves(accounts);
    if level.is_empty() {
        return Digest::default();
    }
    while level.len() > 1 {
        level = next_level(&level);
    }
    level[0]
}

/// Proof for the account at `index` of `accounts`, or `None` if out of
/// range.
pub fn merkle_proof(accounts: &[AccountId], index: usize) -> Option<Vec<Digest>> {
    let target = leaf(accounts.get(index)?);
    let mut level = sorted_leaves(accounts);
    let mut position = level.binary_search(&target).ok()?;
    let mut proof = Vec::new();
    while level.len() > 1 {
        let sibling = position ^ 1;
        if sibling < level.len() {
            proof.push(level[sibling]);
        }
        level = next_level(&level);
        position /= 2;
    }
    Some(proof)
}

fn next_level(level: &[Digest]) -> Vec<Digest> {
    level
        .chunks(2)
        .map(|pair| match pair.get(1) {
            Some(right) => hash_pair(&pair[0], right),
            None => pair[0],
        })
        .collect()
}
