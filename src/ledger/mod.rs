//! The REME ledger state machine.
//!
//! A [`Ledger`] owns balances, allowances, the fee schedule, the paused and
//! fees-enabled flags and the owner identity. Every mutating operation takes
//! the calling address explicitly, checks all of its preconditions before
//! touching state, and returns the records it appended to the event log.
//! A rejected call returns a [`LedgerError`] and changes nothing.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::fees::{self, FeeSchedule, FeeSplit, ParameterError};
use crate::types::{self, Address, Amount};

mod error;
mod snapshot;

pub use error::{LedgerError, StateFlag};
pub use snapshot::{AllowanceEntry, BalanceEntry, LedgerSnapshot};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LedgerEvent {
    Transfer {
        from: Address,
        to: Address,
        #[serde(with = "crate::types::amount_dec")]
        value: Amount,
    },
    Approval {
        owner: Address,
        spender: Address,
        #[serde(with = "crate::types::amount_dec")]
        value: Amount,
    },
    EnabledFees,
    DisabledFees,
    FeeChanged {
        fee: u64,
    },
    FeeBeneficiaryChanged {
        fee_beneficiary: Address,
    },
    FeeThresholdChanged {
        #[serde(with = "crate::types::amount_dec")]
        fee_threshold: Amount,
    },
    Pause,
    Unpause,
    OwnershipTransferred {
        previous_owner: Address,
        new_owner: Address,
    },
}

#[derive(Clone, Debug)]
pub struct Ledger {
    owner: Address,
    total_supply: Amount,
    balances: BTreeMap<Address, Amount>,
    allowances: BTreeMap<(Address, Address), Amount>,
    schedule: FeeSchedule,
    fees_enabled: bool,
    paused: bool,
    events: Vec<LedgerEvent>,
}

impl Ledger {
    /// Deploys a ledger owned by `deployer`, crediting it the whole supply.
    ///
    /// Parameters are checked in order: deployer, fee, beneficiary, threshold.
    pub fn new(
        deployer: Address,
        fee: u64,
        fee_beneficiary: Address,
        fee_threshold: Amount,
    ) -> Result<Self, LedgerError> {
        if deployer.is_null() {
            return Err(LedgerError::InvalidConstructorParameter(
                ParameterError::NullOwner,
            ));
        }
        let schedule = FeeSchedule::new(fee, fee_beneficiary, fee_threshold)
            .map_err(LedgerError::InvalidConstructorParameter)?;
        let supply = types::total_supply();
        let mut ledger = Self {
            owner: deployer,
            total_supply: supply,
            balances: BTreeMap::new(),
            allowances: BTreeMap::new(),
            schedule,
            fees_enabled: false,
            paused: false,
            events: Vec::new(),
        };
        ledger.credit(&deployer, supply);
        ledger.emit(vec![LedgerEvent::Transfer {
            from: Address::ZERO,
            to: deployer,
            value: supply,
        }]);
        tracing::info!(
            owner = %deployer,
            fee,
            fee_beneficiary = %fee_beneficiary,
            fee_threshold = %fee_threshold,
            "ledger deployed"
        );
        Ok(ledger)
    }

    // ---- read-only surface ----

    pub fn name(&self) -> &'static str {
        types::NAME
    }

    pub fn symbol(&self) -> &'static str {
        types::SYMBOL
    }

    pub fn decimals(&self) -> u8 {
        types::DECIMALS
    }

    pub fn total_supply(&self) -> Amount {
        self.total_supply
    }

    pub fn balance_of(&self, account: &Address) -> Amount {
        self.balances.get(account).copied().unwrap_or_default()
    }

    pub fn allowance(&self, owner: &Address, spender: &Address) -> Amount {
        self.allowances
            .get(&(*owner, *spender))
            .copied()
            .unwrap_or_default()
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    pub fn fee(&self) -> u64 {
        self.schedule.fee
    }

    pub fn fee_beneficiary(&self) -> Address {
        self.schedule.fee_beneficiary
    }

    pub fn fee_threshold(&self) -> Amount {
        self.schedule.fee_threshold
    }

    pub fn fee_schedule(&self) -> &FeeSchedule {
        &self.schedule
    }

    pub fn fees_enabled(&self) -> bool {
        self.fees_enabled
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    /// Append-only log of every record emitted since construction.
    pub fn events(&self) -> &[LedgerEvent] {
        &self.events
    }

    /// Accounts with a non-zero balance, in address order.
    pub fn holders(&self) -> impl Iterator<Item = (&Address, &Amount)> {
        self.balances.iter()
    }

    /// Fee split for `amount` paid out of `payer`'s balance.
    ///
    /// Exempt when fees are disabled, when the amount is below the
    /// threshold, or when `payer` is the ledger owner.
    pub fn compute_fee(&self, payer: &Address, amount: Amount) -> FeeSplit {
        if !self.fees_enabled || !self.schedule.applies_to(&amount) || *payer == self.owner {
            return FeeSplit::exempt(amount);
        }
        self.schedule.split(&amount)
    }

    // ---- balance-moving operations ----

    pub fn transfer(
        &mut self,
        sender: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<Vec<LedgerEvent>, LedgerError> {
        self.require_not_paused()?;
        if to.is_null() {
            return Err(LedgerError::InvalidRecipient);
        }
        self.require_balance(sender, amount)?;

        let records = self.move_funds(sender, to, amount);
        Ok(self.emit(records))
    }

    /// Moves `amount` out of `from` on behalf of `spender`.
    ///
    /// The fee exemption is decided by `from`, not by the spender, and the
    /// allowance is consumed by the full `amount` whatever fee is taken.
    pub fn transfer_from(
        &mut self,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<Vec<LedgerEvent>, LedgerError> {
        self.require_not_paused()?;
        if to.is_null() {
            return Err(LedgerError::InvalidRecipient);
        }
        self.require_balance(from, amount)?;
        let allowed = self.allowance(from, spender);
        if allowed < amount {
            return Err(LedgerError::InsufficientAllowance {
                owner: *from,
                spender: *spender,
                available: allowed,
                needed: amount,
            });
        }

        let records = self.move_funds(from, to, amount);
        self.set_allowance(from, spender, allowed - amount);
        Ok(self.emit(records))
    }

    pub fn approve(
        &mut self,
        owner: &Address,
        spender: &Address,
        amount: Amount,
    ) -> Result<Vec<LedgerEvent>, LedgerError> {
        self.require_not_paused()?;
        Ok(self.store_approval(owner, spender, amount))
    }

    pub fn increase_approval(
        &mut self,
        owner: &Address,
        spender: &Address,
        delta: Amount,
    ) -> Result<Vec<LedgerEvent>, LedgerError> {
        self.require_not_paused()?;
        let updated = self
            .allowance(owner, spender)
            .checked_add(delta)
            .ok_or(LedgerError::AllowanceOverflow {
                owner: *owner,
                spender: *spender,
            })?;
        Ok(self.store_approval(owner, spender, updated))
    }

    /// Subtracting more than the current allowance leaves exactly zero.
    pub fn decrease_approval(
        &mut self,
        owner: &Address,
        spender: &Address,
        delta: Amount,
    ) -> Result<Vec<LedgerEvent>, LedgerError> {
        self.require_not_paused()?;
        let updated = self.allowance(owner, spender).saturating_sub(delta);
        Ok(self.store_approval(owner, spender, updated))
    }

    // ---- owner-gated configuration ----

    pub fn enable_fees(&mut self, caller: &Address) -> Result<Vec<LedgerEvent>, LedgerError> {
        self.require_owner(caller, "enable_fees")?;
        if self.fees_enabled {
            return Err(LedgerError::RedundantStateToggle(StateFlag::FeesEnabled));
        }
        self.fees_enabled = true;
        tracing::info!("fees enabled");
        Ok(self.emit(vec![LedgerEvent::EnabledFees]))
    }

    pub fn disable_fees(&mut self, caller: &Address) -> Result<Vec<LedgerEvent>, LedgerError> {
        self.require_owner(caller, "disable_fees")?;
        if !self.fees_enabled {
            return Err(LedgerError::RedundantStateToggle(StateFlag::FeesDisabled));
        }
        self.fees_enabled = false;
        tracing::info!("fees disabled");
        Ok(self.emit(vec![LedgerEvent::DisabledFees]))
    }

    pub fn set_fee(&mut self, caller: &Address, fee: u64) -> Result<Vec<LedgerEvent>, LedgerError> {
        self.require_owner(caller, "set_fee")?;
        fees::validate_fee(fee).map_err(LedgerError::InvalidParameterValue)?;
        self.schedule.fee = fee;
        tracing::info!(fee, "fee changed");
        Ok(self.emit(vec![LedgerEvent::FeeChanged { fee }]))
    }

    pub fn set_fee_beneficiary(
        &mut self,
        caller: &Address,
        fee_beneficiary: &Address,
    ) -> Result<Vec<LedgerEvent>, LedgerError> {
        self.require_owner(caller, "set_fee_beneficiary")?;
        fees::validate_beneficiary(fee_beneficiary).map_err(LedgerError::InvalidParameterValue)?;
        self.schedule.fee_beneficiary = *fee_beneficiary;
        tracing::info!(fee_beneficiary = %fee_beneficiary, "fee beneficiary changed");
        Ok(self.emit(vec![LedgerEvent::FeeBeneficiaryChanged {
            fee_beneficiary: *fee_beneficiary,
        }]))
    }

    pub fn set_fee_threshold(
        &mut self,
        caller: &Address,
        fee_threshold: Amount,
    ) -> Result<Vec<LedgerEvent>, LedgerError> {
        self.require_owner(caller, "set_fee_threshold")?;
        fees::validate_threshold(&fee_threshold).map_err(LedgerError::InvalidParameterValue)?;
        self.schedule.fee_threshold = fee_threshold;
        tracing::info!(fee_threshold = %fee_threshold, "fee threshold changed");
        Ok(self.emit(vec![LedgerEvent::FeeThresholdChanged { fee_threshold }]))
    }

    pub fn pause(&mut self, caller: &Address) -> Result<Vec<LedgerEvent>, LedgerError> {
        self.require_owner(caller, "pause")?;
        if self.paused {
            return Err(LedgerError::RedundantStateToggle(StateFlag::Paused));
        }
        self.paused = true;
        tracing::info!("ledger paused");
        Ok(self.emit(vec![LedgerEvent::Pause]))
    }

    pub fn unpause(&mut self, caller: &Address) -> Result<Vec<LedgerEvent>, LedgerError> {
        self.require_owner(caller, "unpause")?;
        if !self.paused {
            return Err(LedgerError::RedundantStateToggle(StateFlag::Unpaused));
        }
        self.paused = false;
        tracing::info!("ledger unpaused");
        Ok(self.emit(vec![LedgerEvent::Unpause]))
    }

    /// Hands the owner role (and with it the fee exemption) to `new_owner`.
    pub fn transfer_ownership(
        &mut self,
        caller: &Address,
        new_owner: &Address,
    ) -> Result<Vec<LedgerEvent>, LedgerError> {
        self.require_owner(caller, "transfer_ownership")?;
        if new_owner.is_null() {
            return Err(LedgerError::InvalidParameterValue(ParameterError::NullOwner));
        }
        let previous_owner = self.owner;
        self.owner = *new_owner;
        tracing::info!(previous = %previous_owner, new = %new_owner, "ownership transferred");
        Ok(self.emit(vec![LedgerEvent::OwnershipTransferred {
            previous_owner,
            new_owner: *new_owner,
        }]))
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        let root = snapshot::compute_state_root(&snapshot::StateView {
            owner: &self.owner,
            schedule: &self.schedule,
            fees_enabled: self.fees_enabled,
            paused: self.paused,
            balances: &self.balances,
            allowances: &self.allowances,
        });
        LedgerSnapshot {
            name: types::NAME.to_string(),
            symbol: types::SYMBOL.to_string(),
            decimals: types::DECIMALS,
            owner: self.owner,
            total_supply: self.total_supply,
            fee_schedule: self.schedule.clone(),
            fees_enabled: self.fees_enabled,
            paused: self.paused,
            balances: self
                .balances
                .iter()
                .map(|(account, balance)| BalanceEntry {
                    account: *account,
                    balance: *balance,
                })
                .collect(),
            allowances: self
                .allowances
                .iter()
                .map(|((owner, spender), amount)| AllowanceEntry {
                    owner: *owner,
                    spender: *spender,
                    amount: *amount,
                })
                .collect(),
            events: self.events.clone(),
            state_root: hex::encode(root),
        }
    }

    // ---- internals ----

    fn require_not_paused(&self) -> Result<(), LedgerError> {
        if self.paused {
            return Err(LedgerError::Paused);
        }
        Ok(())
    }

    fn require_owner(&self, caller: &Address, action: &'static str) -> Result<(), LedgerError> {
        if *caller != self.owner {
            tracing::warn!(caller = %caller, action, "rejected non-owner configuration call");
            return Err(LedgerError::Unauthorized { caller: *caller });
        }
        Ok(())
    }

    fn require_balance(&self, account: &Address, amount: Amount) -> Result<(), LedgerError> {
        let available = self.balance_of(account);
        if available < amount {
            return Err(LedgerError::InsufficientBalance {
                account: *account,
                available,
                needed: amount,
            });
        }
        Ok(())
    }

    /// Debit/credit half of a transfer. Callers have already checked that
    /// `from` holds at least `amount`.
    fn move_funds(&mut self, from: &Address, to: &Address, amount: Amount) -> Vec<LedgerEvent> {
        let split = self.compute_fee(from, amount);
        self.debit(from, amount);

        let mut records = Vec::with_capacity(2);
        if split.is_charged() {
            let beneficiary = self.schedule.fee_beneficiary;
            self.credit(&beneficiary, split.fee);
            records.push(LedgerEvent::Transfer {
                from: *from,
                to: beneficiary,
                value: split.fee,
            });
        }
        self.credit(to, split.net);
        records.push(LedgerEvent::Transfer {
            from: *from,
            to: *to,
            value: split.net,
        });
        tracing::debug!(
            from = %from,
            to = %to,
            amount = %amount,
            fee = %split.fee,
            "funds moved"
        );
        records
    }

    // The sum of balances equals the fixed supply, so a credit cannot overflow.
    fn credit(&mut self, account: &Address, amount: Amount) {
        if amount.is_zero() {
            return;
        }
        let balance = self.balances.entry(*account).or_default();
        *balance += amount;
    }

    fn debit(&mut self, account: &Address, amount: Amount) {
        let remaining = self.balance_of(account) - amount;
        if remaining.is_zero() {
            self.balances.remove(account);
        } else {
            self.balances.insert(*account, remaining);
        }
    }

    fn set_allowance(&mut self, owner: &Address, spender: &Address, amount: Amount) {
        if amount.is_zero() {
            self.allowances.remove(&(*owner, *spender));
        } else {
            self.allowances.insert((*owner, *spender), amount);
        }
    }

    fn store_approval(
        &mut self,
        owner: &Address,
        spender: &Address,
        amount: Amount,
    ) -> Vec<LedgerEvent> {
        self.set_allowance(owner, spender, amount);
        tracing::debug!(owner = %owner, spender = %spender, amount = %amount, "allowance set");
        self.emit(vec![LedgerEvent::Approval {
            owner: *owner,
            spender: *spender,
            value: amount,
        }])
    }

    fn emit(&mut self, records: Vec<LedgerEvent>) -> Vec<LedgerEvent> {
        self.events.extend(records.iter().cloned());
        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::tokens;

    const OWNER: Address = Address::repeat(0x01);
    const BENEFICIARY: Address = Address::repeat(0xfe);
    const ALICE: Address = Address::repeat(0xa1);
    const BOB: Address = Address::repeat(0xb0);

    fn deploy() -> Ledger {
        Ledger::new(OWNER, 5_000, BENEFICIARY, tokens(500)).unwrap()
    }

    #[test]
    fn construction_credits_owner_and_records_mint() {
        let ledger = deploy();
        assert_eq!(ledger.owner(), OWNER);
        assert_eq!(ledger.balance_of(&OWNER), types::total_supply());
        assert_eq!(ledger.total_supply(), types::total_supply());
        assert_eq!(ledger.fee(), 5_000);
        assert_eq!(ledger.fee_beneficiary(), BENEFICIARY);
        assert_eq!(ledger.fee_threshold(), tokens(500));
        assert!(!ledger.fees_enabled());
        assert!(!ledger.paused());
        assert_eq!(
            ledger.events(),
            &[LedgerEvent::Transfer {
                from: Address::ZERO,
                to: OWNER,
                value: types::total_supply(),
            }]
        );
    }

    #[test]
    fn construction_rejects_each_bad_parameter() {
        for (fee, beneficiary, threshold, expected) in [
            (0, BENEFICIARY, tokens(500), ParameterError::FeeOutOfRange(0)),
            (
                1_000_001,
                BENEFICIARY,
                tokens(500),
                ParameterError::FeeOutOfRange(1_000_001),
            ),
            (5_000, Address::ZERO, tokens(500), ParameterError::NullBeneficiary),
            (5_000, BENEFICIARY, Amount::zero(), ParameterError::ZeroThreshold),
        ] {
            let err = Ledger::new(OWNER, fee, beneficiary, threshold).unwrap_err();
            assert_eq!(err, LedgerError::InvalidConstructorParameter(expected));
        }

        // A null deployer is refused before the fee parameters are looked at.
        assert_eq!(
            Ledger::new(Address::ZERO, 0, Address::ZERO, Amount::zero()).unwrap_err(),
            LedgerError::InvalidConstructorParameter(ParameterError::NullOwner)
        );
        assert_eq!(
            Ledger::new(Address::ZERO, 5_000, BENEFICIARY, tokens(500)).unwrap_err(),
            LedgerError::InvalidConstructorParameter(ParameterError::NullOwner)
        );
    }

    #[test]
    fn metadata_is_fixed() {
        let ledger = deploy();
        assert_eq!(ledger.name(), "REME Coin");
        assert_eq!(ledger.symbol(), "REME");
        assert_eq!(ledger.decimals(), 18);
    }

    #[test]
    fn toggles_reject_redundant_calls() {
        let mut ledger = deploy();
        assert_eq!(ledger.enable_fees(&OWNER).unwrap(), vec![LedgerEvent::EnabledFees]);
        assert_eq!(
            ledger.enable_fees(&OWNER),
            Err(LedgerError::RedundantStateToggle(StateFlag::FeesEnabled))
        );
        assert_eq!(ledger.disable_fees(&OWNER).unwrap(), vec![LedgerEvent::DisabledFees]);
        assert_eq!(
            ledger.disable_fees(&OWNER),
            Err(LedgerError::RedundantStateToggle(StateFlag::FeesDisabled))
        );
        assert_eq!(ledger.pause(&OWNER).unwrap(), vec![LedgerEvent::Pause]);
        assert_eq!(
            ledger.pause(&OWNER),
            Err(LedgerError::RedundantStateToggle(StateFlag::Paused))
        );
        assert_eq!(ledger.unpause(&OWNER).unwrap(), vec![LedgerEvent::Unpause]);
        assert_eq!(
            ledger.unpause(&OWNER),
            Err(LedgerError::RedundantStateToggle(StateFlag::Unpaused))
        );
    }

    #[test]
    fn configuration_is_owner_only() {
        let mut ledger = deploy();
        let unauthorized = LedgerError::Unauthorized { caller: ALICE };
        assert_eq!(ledger.enable_fees(&ALICE), Err(unauthorized.clone()));
        assert_eq!(ledger.disable_fees(&ALICE), Err(unauthorized.clone()));
        assert_eq!(ledger.set_fee(&ALICE, 10_000), Err(unauthorized.clone()));
        assert_eq!(ledger.set_fee_beneficiary(&ALICE, &BOB), Err(unauthorized.clone()));
        assert_eq!(ledger.set_fee_threshold(&ALICE, tokens(1)), Err(unauthorized.clone()));
        assert_eq!(ledger.pause(&ALICE), Err(unauthorized.clone()));
        assert_eq!(ledger.unpause(&ALICE), Err(unauthorized.clone()));
        assert_eq!(ledger.transfer_ownership(&ALICE, &ALICE), Err(unauthorized));
        assert_eq!(ledger.events().len(), 1);
    }

    #[test]
    fn set_fee_bounds() {
        let mut ledger = deploy();
        assert_eq!(
            ledger.set_fee(&OWNER, 1_000_001),
            Err(LedgerError::InvalidParameterValue(ParameterError::FeeOutOfRange(1_000_001)))
        );
        assert_eq!(
            ledger.set_fee(&OWNER, 0),
            Err(LedgerError::InvalidParameterValue(ParameterError::FeeOutOfRange(0)))
        );
        assert_eq!(
            ledger.set_fee(&OWNER, 1_000_000).unwrap(),
            vec![LedgerEvent::FeeChanged { fee: 1_000_000 }]
        );
        assert_eq!(ledger.fee(), 1_000_000);
    }

    #[test]
    fn setters_validate_and_record() {
        let mut ledger = deploy();
        assert_eq!(
            ledger.set_fee_beneficiary(&OWNER, &Address::ZERO),
            Err(LedgerError::InvalidParameterValue(ParameterError::NullBeneficiary))
        );
        assert_eq!(
            ledger.set_fee_threshold(&OWNER, Amount::zero()),
            Err(LedgerError::InvalidParameterValue(ParameterError::ZeroThreshold))
        );
        assert_eq!(
            ledger.set_fee_beneficiary(&OWNER, &BOB).unwrap(),
            vec![LedgerEvent::FeeBeneficiaryChanged { fee_beneficiary: BOB }]
        );
        assert_eq!(
            ledger.set_fee_threshold(&OWNER, tokens(10_000)).unwrap(),
            vec![LedgerEvent::FeeThresholdChanged {
                fee_threshold: tokens(10_000)
            }]
        );
        assert_eq!(ledger.fee_beneficiary(), BOB);
        assert_eq!(ledger.fee_threshold(), tokens(10_000));
    }

    #[test]
    fn configuration_ignores_pause() {
        let mut ledger = deploy();
        ledger.pause(&OWNER).unwrap();
        ledger.enable_fees(&OWNER).unwrap();
        ledger.set_fee(&OWNER, 7).unwrap();
        ledger.set_fee_beneficiary(&OWNER, &BOB).unwrap();
        ledger.set_fee_threshold(&OWNER, tokens(1)).unwrap();
        ledger.disable_fees(&OWNER).unwrap();
    }

    #[test]
    fn pause_blocks_balance_and_allowance_changes() {
        let mut ledger = deploy();
        ledger.approve(&OWNER, &ALICE, tokens(10)).unwrap();
        ledger.pause(&OWNER).unwrap();
        assert_eq!(ledger.transfer(&OWNER, &BOB, tokens(1)), Err(LedgerError::Paused));
        assert_eq!(
            ledger.transfer_from(&ALICE, &OWNER, &BOB, tokens(1)),
            Err(LedgerError::Paused)
        );
        assert_eq!(ledger.approve(&OWNER, &ALICE, tokens(1)), Err(LedgerError::Paused));
        assert_eq!(
            ledger.increase_approval(&OWNER, &ALICE, tokens(1)),
            Err(LedgerError::Paused)
        );
        assert_eq!(
            ledger.decrease_approval(&OWNER, &ALICE, tokens(1)),
            Err(LedgerError::Paused)
        );
        ledger.unpause(&OWNER).unwrap();
        ledger.transfer(&OWNER, &BOB, Amount::from(100u64)).unwrap();
        assert_eq!(ledger.balance_of(&BOB), Amount::from(100u64));
    }

    #[test]
    fn transfer_to_null_is_rejected() {
        let mut ledger = deploy();
        assert_eq!(
            ledger.transfer(&OWNER, &Address::ZERO, tokens(1)),
            Err(LedgerError::InvalidRecipient)
        );
    }

    #[test]
    fn transfer_without_funds_is_rejected() {
        let mut ledger = deploy();
        assert_eq!(
            ledger.transfer(&ALICE, &BOB, Amount::one()),
            Err(LedgerError::InsufficientBalance {
                account: ALICE,
                available: Amount::zero(),
                needed: Amount::one(),
            })
        );
    }

    #[test]
    fn approve_overwrites() {
        let mut ledger = deploy();
        ledger.approve(&OWNER, &ALICE, tokens(40)).unwrap();
        let records = ledger.approve(&OWNER, &ALICE, tokens(7)).unwrap();
        assert_eq!(ledger.allowance(&OWNER, &ALICE), tokens(7));
        assert_eq!(
            records,
            vec![LedgerEvent::Approval {
                owner: OWNER,
                spender: ALICE,
                value: tokens(7),
            }]
        );
    }

    #[test]
    fn increase_and_decrease_approval() {
        let mut ledger = deploy();
        ledger.approve(&OWNER, &ALICE, Amount::from(100u64)).unwrap();
        ledger.increase_approval(&OWNER, &ALICE, Amount::from(40u64)).unwrap();
        assert_eq!(ledger.allowance(&OWNER, &ALICE), Amount::from(140u64));
        ledger.decrease_approval(&OWNER, &ALICE, Amount::from(40u64)).unwrap();
        assert_eq!(ledger.allowance(&OWNER, &ALICE), Amount::from(100u64));
        ledger.decrease_approval(&OWNER, &ALICE, Amount::from(1_000u64)).unwrap();
        assert_eq!(ledger.allowance(&OWNER, &ALICE), Amount::zero());
    }

    #[test]
    fn increase_approval_overflow_fails() {
        let mut ledger = deploy();
        ledger.approve(&OWNER, &ALICE, Amount::max_value()).unwrap();
        let before = ledger.events().len();
        assert_eq!(
            ledger.increase_approval(&OWNER, &ALICE, Amount::one()),
            Err(LedgerError::AllowanceOverflow {
                owner: OWNER,
                spender: ALICE,
            })
        );
        assert_eq!(ledger.allowance(&OWNER, &ALICE), Amount::max_value());
        assert_eq!(ledger.events().len(), before);
    }

    #[test]
    fn ownership_moves_exemption() {
        let mut ledger = deploy();
        ledger.enable_fees(&OWNER).unwrap();
        ledger.transfer(&OWNER, &ALICE, tokens(1_000)).unwrap();
        assert_eq!(
            ledger.transfer_ownership(&OWNER, &Address::ZERO),
            Err(LedgerError::InvalidParameterValue(ParameterError::NullOwner))
        );
        ledger.transfer_ownership(&OWNER, &ALICE).unwrap();
        assert_eq!(ledger.owner(), ALICE);

        let records = ledger.transfer(&ALICE, &BOB, tokens(1_000)).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(ledger.balance_of(&BOB), tokens(1_000));

        // the former owner is charged like anyone else
        let records = ledger.transfer(&OWNER, &BOB, tokens(1_000)).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(ledger.balance_of(&BENEFICIARY), tokens(5));
    }

    #[test]
    fn snapshot_root_tracks_state() {
        let mut ledger = deploy();
        let first = ledger.snapshot();
        assert_eq!(first.state_root, ledger.snapshot().state_root);
        assert_eq!(first.balances.len(), 1);

        ledger.transfer(&OWNER, &ALICE, tokens(1)).unwrap();
        let second = ledger.snapshot();
        assert_ne!(first.state_root, second.state_root);
        assert_eq!(second.balances.len(), 2);
        assert_eq!(second.events.len(), 2);
    }

    #[test]
    fn zero_balances_are_dropped() {
        let mut ledger = deploy();
        ledger.transfer(&OWNER, &ALICE, tokens(3)).unwrap();
        ledger.transfer(&ALICE, &BOB, tokens(3)).unwrap();
        assert!(ledger.holders().all(|(account, _)| *account != ALICE));
        assert_eq!(ledger.balance_of(&ALICE), Amount::zero());
    }
}
