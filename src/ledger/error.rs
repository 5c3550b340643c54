use std::fmt;

use crate::fees::ParameterError;
use crate::types::{Address, Amount};

/// A one-directional flag that was already in the requested state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StateFlag {
    FeesEnabled,
    FeesDisabled,
    Paused,
    Unpaused,
}

impl fmt::Display for StateFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            StateFlag::FeesEnabled => "fees are already enabled",
            StateFlag::FeesDisabled => "fees are already disabled",
            StateFlag::Paused => "ledger is already paused",
            StateFlag::Unpaused => "ledger is not paused",
        };
        f.write_str(text)
    }
}

/// Every rejection leaves the ledger exactly as it was before the call.
#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("invalid constructor parameter: {0}")]
    InvalidConstructorParameter(ParameterError),
    #[error("caller {caller} is not the ledger owner")]
    Unauthorized { caller: Address },
    #[error("recipient is the null address")]
    InvalidRecipient,
    #[error("insufficient balance in {account}: have {available}, need {needed}")]
    InsufficientBalance {
        account: Address,
        available: Amount,
        needed: Amount,
    },
    #[error("insufficient allowance for {spender} over {owner}: have {available}, need {needed}")]
    InsufficientAllowance {
        owner: Address,
        spender: Address,
        available: Amount,
        needed: Amount,
    },
    #[error("invalid parameter value: {0}")]
    InvalidParameterValue(ParameterError),
    #[error("redundant toggle: {0}")]
    RedundantStateToggle(StateFlag),
    #[error("ledger is paused")]
    Paused,
    #[error("allowance of {spender} over {owner} would overflow")]
    AllowanceOverflow { owner: Address, spender: Address },
}

impl LedgerError {
    /// Stable identifier of the error kind, used in receipts.
    pub fn kind(&self) -> &'static str {
        match self {
            LedgerError::InvalidConstructorParameter(_) => "invalid_constructor_parameter",
            LedgerError::Unauthorized { .. } => "unauthorized",
            LedgerError::InvalidRecipient => "invalid_recipient",
            LedgerError::InsufficientBalance { .. } => "insufficient_balance",
            LedgerError::InsufficientAllowance { .. } => "insufficient_allowance",
            LedgerError::InvalidParameterValue(_) => "invalid_parameter_value",
            LedgerError::RedundantStateToggle(_) => "redundant_state_toggle",
            LedgerError::Paused => "paused",
            LedgerError::AllowanceOverflow { .. } => "allowance_overflow",
        }
    }
}
