//! Linear lease tokens.
//!
//! A lease is a proof that one borrow was granted by a particular gate.
//! Dropping a lease panics; the only valid way to dispose of it is to hand
//! it back to the gate that minted it via `Gate::release_shared` or
//! `Gate::release_exclusive`.

use core::fmt;
use core::marker::PhantomData;

slotmap::new_key_type! {
    /// Generational identifier of one granted borrow inside a gate's ledger.
    pub struct LeaseKey;
}

/// Which kind of borrow a lease stands for.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum BorrowKind {
    Shared,
    Exclusive,
}

/// Marker for read-only leases.
pub enum Shared {}

/// Marker for read-write leases.
pub enum Exclusive {}

/// Ties a marker type to its runtime `BorrowKind`.
pub trait LeaseKind {
    const KIND: BorrowKind;
}

impl LeaseKind for Shared {
    const KIND: BorrowKind = BorrowKind::Shared;
}

impl LeaseKind for Exclusive {
    const KIND: BorrowKind = BorrowKind::Exclusive;
}

/// Linear token for one outstanding borrow of kind `M`.
pub struct Lease<M: LeaseKind> {
    key: LeaseKey,
    _kind: PhantomData<M>,
    // Leases never leave the thread of the gate that minted them.
    _nosend: PhantomData<*mut ()>,
}

impl<M: LeaseKind> Lease<M> {
    #[inline]
    pub(crate) fn new(key: LeaseKey) -> Self {
        Self {
            key,
            _kind: PhantomData,
            _nosend: PhantomData,
        }
    }

    /// Ledger key of this lease. Ungated leases carry the null key.
    #[inline]
    pub fn key(&self) -> LeaseKey {
        self.key
    }

    #[inline]
    pub fn kind(&self) -> BorrowKind {
        M::KIND
    }

    /// Consume the lease without triggering the drop check.
    #[inline]
    pub(crate) fn consume(self) -> LeaseKey {
        let key = self.key;
        core::mem::forget(self);
        key
    }
}

impl<M: LeaseKind> fmt::Debug for Lease<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lease")
            .field("key", &self.key)
            .field("kind", &M::KIND)
            .finish()
    }
}

impl<M: LeaseKind> Drop for Lease<M> {
    fn drop(&mut self) {
        // Fail fast on misuse, but never turn an unwind into an abort.
        if !std::thread::panicking() {
            panic!("Lease dropped without being returned to its gate");
        }
    }
}
