#![cfg(test)]

// Property tests for BorrowGate kept inside the crate so they can drive
// leases directly.

use crate::error::BorrowError;
use crate::gate::sealed::GateOps;
use crate::gate::{BorrowGate, BorrowState};
use crate::tokens::{BorrowKind, Exclusive, Lease, Shared};
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum Op {
    AcquireShared,
    AcquireExclusive,
    ReleaseShared(usize),
    ReleaseExclusive,
}

// Leases held by the model. Whatever is still held when a case ends,
// including an early `prop_assert!` exit, goes back to the gate so the
// failure is reported instead of a lease drop panic.
struct Held<'g> {
    gate: &'g BorrowGate,
    shared: Vec<Lease<Shared>>,
    exclusive: Option<Lease<Exclusive>>,
}

impl<'g> Held<'g> {
    fn new(gate: &'g BorrowGate) -> Self {
        Self {
            gate,
            shared: Vec::new(),
            exclusive: None,
        }
    }

    fn release_all(&mut self) {
        for l in self.shared.drain(..) {
            self.gate.release_shared(l);
        }
        if let Some(l) = self.exclusive.take() {
            self.gate.release_exclusive(l);
        }
    }
}

impl Drop for Held<'_> {
    fn drop(&mut self) {
        self.release_all();
    }
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => Just(Op::AcquireShared),
        2 => Just(Op::AcquireExclusive),
        3 => any::<usize>().prop_map(Op::ReleaseShared),
        2 => Just(Op::ReleaseExclusive),
    ]
}

proptest! {
    // Model: `held.shared` are the shared leases we hold, `held.exclusive`
    // the exclusive one if any. After every step the gate's
    // counters and ledger must match, and rejected requests must report
    // the blocking kind without changing state.
    #[test]
    fn prop_gate_matches_model(ops in proptest::collection::vec(arb_op(), 1..200)) {
        let g = BorrowGate::new();
        let mut held = Held::new(&g);

        for op in ops {
            let before = g.state();
            match op {
                Op::AcquireShared => match g.acquire_shared() {
                    Ok(l) => {
                        held.shared.push(l);
                        prop_assert!(held.exclusive.is_none());
                    }
                    Err(e) => {
                        prop_assert_eq!(e, BorrowError::ExclusiveBorrowActive);
                        prop_assert!(held.exclusive.is_some());
                        prop_assert_eq!(g.state(), before);
                    }
                },
                Op::AcquireExclusive => match g.acquire_exclusive() {
                    Ok(l) => {
                        let was_free = held.shared.is_empty() && held.exclusive.is_none();
                        if let Some(prev) = held.exclusive.replace(l) {
                            g.release_exclusive(prev);
                        }
                        prop_assert!(was_free);
                    }
                    Err(e) => {
                        let expected = if !held.shared.is_empty() {
                            BorrowError::SharedBorrowsActive
                        } else {
                            BorrowError::ExclusiveBorrowActive
                        };
                        prop_assert_eq!(e, expected);
                        prop_assert_eq!(g.state(), before);
                    }
                },
                Op::ReleaseShared(i) => {
                    if !held.shared.is_empty() {
                        let l = held.shared.swap_remove(i % held.shared.len());
                        g.release_shared(l);
                    }
                }
                Op::ReleaseExclusive => {
                    if let Some(l) = held.exclusive.take() {
                        g.release_exclusive(l);
                    }
                }
            }

            prop_assert_eq!(
                g.state(),
                BorrowState {
                    shared: held.shared.len(),
                    exclusive: held.exclusive.is_some(),
                }
            );
            let ledger = g.live_leases();
            prop_assert_eq!(
                ledger.len(),
                held.shared.len() + usize::from(held.exclusive.is_some())
            );
            for l in &held.shared {
                prop_assert!(ledger.contains(&(l.key(), BorrowKind::Shared)));
            }
        }

        held.release_all();
        prop_assert!(g.state().is_free());
        prop_assert!(g.live_leases().is_empty());
    }
}
