//! Borrow gates: the policy deciding whether a borrow may be granted.
//!
//! A gate mints linear `Lease` tokens on acquisition and takes them back
//! on release. `BorrowGate` enforces "many readers XOR one writer" with
//! plain counters plus a ledger of live leases; `Unchecked` grants
//! everything and keeps no books.

use crate::error::BorrowError;
use crate::tokens::{BorrowKind, Exclusive, Lease, LeaseKey, Shared};
use core::cell::{Cell, RefCell};
use core::fmt;
use slotmap::{Key, SlotMap};
use tracing::{debug, trace};

pub(crate) mod sealed {
    use crate::error::BorrowError;
    use crate::tokens::{Exclusive, Lease, Shared};

    /// Lease traffic of a gate. Only the crate can name this trait, so a
    /// lease can only travel between a view and the gate of its own slot.
    pub trait GateOps {
        /// Grant one shared borrow.
        fn acquire_shared(&self) -> Result<Lease<Shared>, BorrowError>;

        /// Grant the exclusive borrow.
        fn acquire_exclusive(&self) -> Result<Lease<Exclusive>, BorrowError>;

        /// Return a shared lease minted by this gate.
        fn release_shared(&self, lease: Lease<Shared>);

        /// Return an exclusive lease minted by this gate.
        fn release_exclusive(&self, lease: Lease<Exclusive>);

        /// Succeeds when no borrow of any kind is live.
        fn ensure_free(&self) -> Result<(), BorrowError>;
    }
}

use sealed::GateOps;

/// A borrow-granting policy embedded in every slot. Sealed: the only
/// policies are `BorrowGate` and `Unchecked`.
pub trait Gate: GateOps {}

impl Gate for Unchecked {}

impl Gate for BorrowGate {}

/// Snapshot of a gate's counters.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct BorrowState {
    pub shared: usize,
    pub exclusive: bool,
}

impl BorrowState {
    pub fn is_free(&self) -> bool {
        self.shared == 0 && !self.exclusive
    }
}

impl fmt::Display for BorrowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "shared borrows: {}, exclusive borrow: {}",
            self.shared,
            if self.exclusive { "held" } else { "none" }
        )
    }
}

/// The ungated baseline: every request succeeds and nothing is counted.
#[derive(Copy, Clone, Debug, Default)]
pub struct Unchecked;

impl GateOps for Unchecked {
    #[inline]
    fn acquire_shared(&self) -> Result<Lease<Shared>, BorrowError> {
        Ok(Lease::new(LeaseKey::null()))
    }

    #[inline]
    fn acquire_exclusive(&self) -> Result<Lease<Exclusive>, BorrowError> {
        Ok(Lease::new(LeaseKey::null()))
    }

    #[inline]
    fn release_shared(&self, lease: Lease<Shared>) {
        lease.consume();
    }

    #[inline]
    fn release_exclusive(&self, lease: Lease<Exclusive>) {
        lease.consume();
    }

    #[inline]
    fn ensure_free(&self) -> Result<(), BorrowError> {
        Ok(())
    }
}

/// Counting gate enforcing the shared/exclusive discipline.
///
/// Invariants, checked after every transition in debug builds:
/// - `exclusive` implies `shared == 0`;
/// - the ledger holds exactly `shared` shared leases and one exclusive
///   lease iff `exclusive`.
///
/// The counters are plain `Cell`s, not atomics; the gate is `!Sync` and
/// relies on single-threaded access.
#[derive(Debug, Default)]
pub struct BorrowGate {
    shared: Cell<usize>,
    exclusive: Cell<bool>,
    leases: RefCell<SlotMap<LeaseKey, BorrowKind>>,
}

impl BorrowGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> BorrowState {
        BorrowState {
            shared: self.shared.get(),
            exclusive: self.exclusive.get(),
        }
    }

    /// Keys and kinds of all leases currently outstanding.
    pub fn live_leases(&self) -> Vec<(LeaseKey, BorrowKind)> {
        self.leases.borrow().iter().map(|(k, &v)| (k, v)).collect()
    }

    fn reject(&self, kind: BorrowKind, err: BorrowError) -> BorrowError {
        debug!(?kind, error = %err, state = %self.state(), "borrow rejected");
        err
    }

    #[inline]
    fn debug_check(&self) {
        #[cfg(debug_assertions)]
        {
            let leases = self.leases.borrow();
            let shared = leases
                .values()
                .filter(|&&k| k == BorrowKind::Shared)
                .count();
            let exclusive = leases.len() - shared;
            debug_assert_eq!(shared, self.shared.get(), "shared ledger out of step");
            debug_assert_eq!(
                exclusive,
                usize::from(self.exclusive.get()),
                "exclusive ledger out of step"
            );
            debug_assert!(!(self.exclusive.get() && self.shared.get() > 0));
        }
    }

    fn take_lease(&self, key: LeaseKey, kind: BorrowKind) {
        let removed = self.leases.borrow_mut().remove(key);
        assert_eq!(removed, Some(kind), "lease returned to the wrong gate");
    }
}

impl GateOps for BorrowGate {
    fn acquire_shared(&self) -> Result<Lease<Shared>, BorrowError> {
        if self.exclusive.get() {
            return Err(self.reject(BorrowKind::Shared, BorrowError::ExclusiveBorrowActive));
        }
        let n = match self.shared.get().checked_add(1) {
            Some(n) => n,
            // Same policy as Rc: a counter overflow is unrecoverable.
            None => std::process::abort(),
        };
        self.shared.set(n);
        let key = self.leases.borrow_mut().insert(BorrowKind::Shared);
        trace!(lease = ?key, shared = n, "shared borrow granted");
        self.debug_check();
        Ok(Lease::new(key))
    }

    fn acquire_exclusive(&self) -> Result<Lease<Exclusive>, BorrowError> {
        if self.shared.get() > 0 {
            return Err(self.reject(BorrowKind::Exclusive, BorrowError::SharedBorrowsActive));
        }
        if self.exclusive.get() {
            return Err(self.reject(BorrowKind::Exclusive, BorrowError::ExclusiveBorrowActive));
        }
        self.exclusive.set(true);
        let key = self.leases.borrow_mut().insert(BorrowKind::Exclusive);
        trace!(lease = ?key, "exclusive borrow granted");
        self.debug_check();
        Ok(Lease::new(key))
    }

    fn release_shared(&self, lease: Lease<Shared>) {
        let key = lease.consume();
        self.take_lease(key, BorrowKind::Shared);
        let c = self.shared.get();
        assert!(c > 0, "shared borrow count underflow");
        self.shared.set(c - 1);
        trace!(lease = ?key, shared = c - 1, "shared borrow released");
        self.debug_check();
    }

    fn release_exclusive(&self, lease: Lease<Exclusive>) {
        let key = lease.consume();
        self.take_lease(key, BorrowKind::Exclusive);
        assert!(self.exclusive.get(), "exclusive borrow released twice");
        self.exclusive.set(false);
        trace!(lease = ?key, "exclusive borrow released");
        self.debug_check();
    }

    fn ensure_free(&self) -> Result<(), BorrowError> {
        if self.exclusive.get() {
            Err(BorrowError::ExclusiveBorrowActive)
        } else if self.shared.get() > 0 {
            Err(BorrowError::SharedBorrowsActive)
        } else {
            Ok(())
        }
    }
}
