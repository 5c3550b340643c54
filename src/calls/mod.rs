use serde::{Deserialize, Serialize};

use crate::ledger::{Ledger, LedgerError, LedgerEvent};
use crate::types::{Address, Amount};

/// Serializable form of every public mutator.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LedgerCall {
    Transfer {
        to: Address,
        #[serde(with = "crate::types::amount_dec")]
        amount: Amount,
    },
    TransferFrom {
        from: Address,
        to: Address,
        #[serde(with = "crate::types::amount_dec")]
        amount: Amount,
    },
    Approve {
        spender: Address,
        #[serde(with = "crate::types::amount_dec")]
        amount: Amount,
    },
    IncreaseApproval {
        spender: Address,
        #[serde(with = "crate::types::amount_dec")]
        delta: Amount,
    },
    DecreaseApproval {
        spender: Address,
        #[serde(with = "crate::types::amount_dec")]
        delta: Amount,
    },
    EnableFees,
    DisableFees,
    SetFee {
        fee: u64,
    },
    SetFeeBeneficiary {
        fee_beneficiary: Address,
    },
    SetFeeThreshold {
        #[serde(with = "crate::types::amount_dec")]
        fee_threshold: Amount,
    },
    Pause,
    Unpause,
    TransferOwnership {
        new_owner: Address,
    },
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Invocation {
    pub caller: Address,
    pub call: LedgerCall,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CallOutcome {
    Accepted { events: Vec<LedgerEvent> },
    Rejected { kind: String, reason: String },
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CallReceipt {
    pub index: usize,
    pub caller: Address,
    pub call: LedgerCall,
    pub outcome: CallOutcome,
}

impl CallReceipt {
    pub fn accepted(&self) -> bool {
        matches!(self.outcome, CallOutcome::Accepted { .. })
    }
}

impl Ledger {
    pub fn dispatch(
        &mut self,
        caller: &Address,
        call: &LedgerCall,
    ) -> Result<Vec<LedgerEvent>, LedgerError> {
        match call {
            LedgerCall::Transfer { to, amount } => self.transfer(caller, to, *amount),
            LedgerCall::TransferFrom { from, to, amount } => {
                self.transfer_from(caller, from, to, *amount)
            }
            LedgerCall::Approve { spender, amount } => self.approve(caller, spender, *amount),
            LedgerCall::IncreaseApproval { spender, delta } => {
                self.increase_approval(caller, spender, *delta)
            }
            LedgerCall::DecreaseApproval { spender, delta } => {
                self.decrease_approval(caller, spender, *delta)
            }
            LedgerCall::EnableFees => self.enable_fees(caller),
            LedgerCall::DisableFees => self.disable_fees(caller),
            LedgerCall::SetFee { fee } => self.set_fee(caller, *fee),
            LedgerCall::SetFeeBeneficiary { fee_beneficiary } => {
                self.set_fee_beneficiary(caller, fee_beneficiary)
            }
            LedgerCall::SetFeeThreshold { fee_threshold } => {
                self.set_fee_threshold(caller, *fee_threshold)
            }
            LedgerCall::Pause => self.pause(caller),
            LedgerCall::Unpause => self.unpause(caller),
            LedgerCall::TransferOwnership { new_owner } => {
                self.transfer_ownership(caller, new_owner)
            }
        }
    }
}

/// Applies each invocation in order. A rejected invocation is recorded in
/// its receipt and the remaining ones still run.
pub fn replay(ledger: &mut Ledger, invocations: &[Invocation]) -> Vec<CallReceipt> {
    invocations
        .iter()
        .enumerate()
        .map(|(index, invocation)| {
            let outcome = match ledger.dispatch(&invocation.caller, &invocation.call) {
                Ok(events) => CallOutcome::Accepted { events },
                Err(err) => {
                    tracing::debug!(index, kind = err.kind(), "invocation rejected: {err}");
                    CallOutcome::Rejected {
                        kind: err.kind().to_string(),
                        reason: err.to_string(),
                    }
                }
            };
            CallReceipt {
                index,
                caller: invocation.caller,
                call: invocation.call.clone(),
                outcome,
            }
        })
        .collect()
}
