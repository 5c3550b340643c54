use std::sync::Arc;

use parking_lot::Mutex;

use crate::calls::LedgerCall;
use crate::ledger::{Ledger, LedgerError, LedgerEvent, LedgerSnapshot};
use crate::types::{Address, Amount};

/// Cloneable handle for using one ledger from several threads.
///
/// All state sits behind a single lock held for the whole of each call, so
/// no operation can observe another one half-applied.
#[derive(Clone)]
pub struct SharedLedger {
    inner: Arc<Mutex<Ledger>>,
}

impl SharedLedger {
    pub fn new(ledger: Ledger) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ledger)),
        }
    }

    pub fn dispatch(
        &self,
        caller: &Address,
        call: &LedgerCall,
    ) -> Result<Vec<LedgerEvent>, LedgerError> {
        self.inner.lock().dispatch(caller, call)
    }

    /// Runs `f` with exclusive access, for reads that must see one state.
    pub fn with<R>(&self, f: impl FnOnce(&Ledger) -> R) -> R {
        f(&self.inner.lock())
    }

    pub fn balance_of(&self, account: &Address) -> Amount {
        self.inner.lock().balance_of(account)
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        self.inner.lock().snapshot()
    }

    pub fn into_inner(self) -> Result<Ledger, Self> {
        Arc::try_unwrap(self.inner)
            .map(Mutex::into_inner)
            .map_err(|inner| Self { inner })
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;
    use crate::types::tokens;

    const OWNER: Address = Address::repeat(0x01);
    const BENEFICIARY: Address = Address::repeat(0xfe);

    #[test]
    fn concurrent_transfers_preserve_supply() {
        let mut ledger = Ledger::new(OWNER, 5_000, BENEFICIARY, tokens(500)).unwrap();
        ledger.enable_fees(&OWNER).unwrap();
        let workers: Vec<Address> = (0x10..0x18).map(Address::repeat).collect();
        for worker in &workers {
            ledger.transfer(&OWNER, worker, tokens(10_000)).unwrap();
        }
        let shared = SharedLedger::new(ledger);

        let handles: Vec<_> = workers
            .iter()
            .enumerate()
            .map(|(idx, worker)| {
                let shared = shared.clone();
                let worker = *worker;
                let peer = workers[(idx + 1) % workers.len()];
                thread::spawn(move || {
                    for _ in 0..20 {
                        let _ = shared.dispatch(
                            &worker,
                            &LedgerCall::Transfer {
                                to: peer,
                                amount: tokens(600),
                            },
                        );
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let ledger = shared.into_inner().ok().unwrap();
        let sum = ledger
            .holders()
            .fold(Amount::zero(), |acc, (_, balance)| acc + *balance);
        assert_eq!(sum, ledger.total_supply());
        assert!(!ledger.balance_of(&BENEFICIARY).is_zero());
    }
}
