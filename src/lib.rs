//! REME Coin ledger.
//!
//! An account-balance store with ERC-20 style transfers and allowances, plus
//! an owner-configured proportional fee taken from transfers at or above a
//! threshold and credited to a fee beneficiary.
//!
//! * [`ledger`]: the state machine, its events and errors.
//! * [`fees`]: fee schedule validation and the truncating ppm split.
//! * [`calls`]: serializable calls, dispatch and batch replay.
//! * [`shared`]: a single-lock handle for multi-threaded hosts.
//! * [`config`]: TOML deployment parameters.

pub mod calls;
pub mod config;
pub mod fees;
pub mod ledger;
pub mod shared;
pub mod types;

pub use calls::{CallOutcome, CallReceipt, Invocation, LedgerCall};
pub use fees::{FeeSchedule, FeeSplit, ParameterError};
pub use ledger::{Ledger, LedgerError, LedgerEvent, LedgerSnapshot, StateFlag};
pub use shared::SharedLedger;
pub use types::{Address, Amount};
