use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::fees::FeeSchedule;
use crate::types::{Address, Amount};

use super::LedgerEvent;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BalanceEntry {
    pub account: Address,
    #[serde(with = "crate::types::amount_dec")]
    pub balance: Amount,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AllowanceEntry {
    pub owner: Address,
    pub spender: Address,
    #[serde(with = "crate::types::amount_dec")]
    pub amount: Amount,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LedgerSnapshot {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub owner: Address,
    #[serde(with = "crate::types::amount_dec")]
    pub total_supply: Amount,
    pub fee_schedule: FeeSchedule,
    pub fees_enabled: bool,
    pub paused: bool,
    pub balances: Vec<BalanceEntry>,
    pub allowances: Vec<AllowanceEntry>,
    pub events: Vec<LedgerEvent>,
    /// Hex SHA-256 root over parameters, balances and allowances.
    pub state_root: String,
}

pub(crate) struct StateView<'a> {
    pub owner: &'a Address,
    pub schedule: &'a FeeSchedule,
    pub fees_enabled: bool,
    pub paused: bool,
    pub balances: &'a BTreeMap<Address, Amount>,
    pub allowances: &'a BTreeMap<(Address, Address), Amount>,
}

fn amount_bytes(amount: &Amount) -> [u8; 32] {
    let mut out = [0u8; 32];
    for (idx, limb) in amount.0.iter().enumerate() {
        out[idx * 8..(idx + 1) * 8].copy_from_slice(&limb.to_le_bytes());
    }
    out
}

pub(crate) fn compute_state_root(view: &StateView<'_>) -> [u8; 32] {
    let mut leaves: Vec<[u8; 32]> = Vec::new();

    let mut hasher = Sha256::new();
    hasher.update(b"params");
    hasher.update(view.owner.as_bytes());
    hasher.update(view.schedule.fee.to_le_bytes());
    hasher.update(view.schedule.fee_beneficiary.as_bytes());
    hasher.update(amount_bytes(&view.schedule.fee_threshold));
    hasher.update([view.fees_enabled as u8, view.paused as u8]);
    leaves.push(hasher.finalize().into());

    for (account, balance) in view.balances {
        let mut hasher = Sha256::new();
        hasher.update(b"acct");
        hasher.update(account.as_bytes());
        hasher.update(amount_bytes(balance));
        leaves.push(hasher.finalize().into());
    }
    for ((owner, spender), amount) in view.allowances {
        let mut hasher = Sha256::new();
        hasher.update(b"allow");
        hasher.update(owner.as_bytes());
        hasher.update(spender.as_bytes());
        hasher.update(amount_bytes(amount));
        leaves.push(hasher.finalize().into());
    }
    build_merkle(leaves)
}

fn build_merkle(mut leaves: Vec<[u8; 32]>) -> [u8; 32] {
    if leaves.is_empty() {
        return Sha256::digest(b"reme-ledger-empty").into();
    }
    while leaves.len() > 1 {
        let mut next = Vec::with_capacity((leaves.len() + 1) / 2);
        for chunk in leaves.chunks(2) {
            let mut hasher = Sha256::new();
            hasher.update(b"node");
            hasher.update(chunk[0]);
            // odd leaf is paired with itself
            hasher.update(chunk.get(1).unwrap_or(&chunk[0]));
            next.push(hasher.finalize().into());
        }
        leaves = next;
    }
    leaves[0]
}
