//! Borrow views handed out by cells.
//!
//! A view owns a snapshot of the value taken when the borrow was granted,
//! a handle back to the cell's slot and, until released, the lease proving
//! the borrow. Snapshots are frozen: writes made through another view
//! after this one was created are not reflected.
//!
//! `release()` returns the lease to the gate exactly once; a second call
//! reports `AlreadyReleased`. Dropping an unreleased view releases it.

use crate::error::BorrowError;
use crate::gate::{BorrowGate, Gate};
use crate::slot::Slot;
use crate::tokens::{Exclusive, Lease, Shared};
use core::fmt;
use std::rc::Rc;

/// Read-only view of a cell's value.
pub struct SharedView<T, G: Gate = BorrowGate> {
    snapshot: T,
    slot: Rc<Slot<T, G>>,
    lease: Option<Lease<Shared>>,
}

impl<T, G: Gate> SharedView<T, G> {
    pub(crate) fn new(snapshot: T, slot: Rc<Slot<T, G>>, lease: Lease<Shared>) -> Self {
        Self {
            snapshot,
            slot,
            lease: Some(lease),
        }
    }

    /// The value as it was when the borrow was granted.
    pub fn get(&self) -> &T {
        &self.snapshot
    }

    pub fn is_released(&self) -> bool {
        self.lease.is_none()
    }

    /// Give the borrow back to the owning cell.
    pub fn release(&mut self) -> Result<(), BorrowError> {
        let lease = self.lease.take().ok_or(BorrowError::AlreadyReleased)?;
        self.slot.gate.release_shared(lease);
        Ok(())
    }
}

impl<T, G: Gate> Drop for SharedView<T, G> {
    fn drop(&mut self) {
        if let Some(lease) = self.lease.take() {
            self.slot.gate.release_shared(lease);
        }
    }
}

impl<T: fmt::Debug, G: Gate> fmt::Debug for SharedView<T, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedView")
            .field("snapshot", &self.snapshot)
            .field("released", &self.is_released())
            .finish()
    }
}

/// Read-write view of a cell's value. Writes go straight through to the
/// owning cell.
pub struct ExclusiveView<T, G: Gate = BorrowGate> {
    value: T,
    slot: Rc<Slot<T, G>>,
    lease: Option<Lease<Exclusive>>,
}

impl<T, G: Gate> ExclusiveView<T, G> {
    pub(crate) fn new(value: T, slot: Rc<Slot<T, G>>, lease: Lease<Exclusive>) -> Self {
        Self {
            value,
            slot,
            lease: Some(lease),
        }
    }

    /// The snapshot, including any value written through this view.
    pub fn get(&self) -> &T {
        &self.value
    }

    pub fn is_released(&self) -> bool {
        self.lease.is_none()
    }

    /// Store `value` in the owning cell and in this view.
    ///
    /// Fails with `AlreadyReleased` once the view has been released, and
    /// with `UseAfterMove` if the cell's value has since been moved out.
    /// On failure neither the cell nor the view changes.
    pub fn set(&mut self, value: T) -> Result<(), BorrowError>
    where
        T: Clone,
    {
        if self.lease.is_none() {
            return Err(BorrowError::AlreadyReleased);
        }
        self.slot.write(value.clone())?;
        self.value = value;
        Ok(())
    }

    /// Give the borrow back to the owning cell.
    pub fn release(&mut self) -> Result<(), BorrowError> {
        let lease = self.lease.take().ok_or(BorrowError::AlreadyReleased)?;
        self.slot.gate.release_exclusive(lease);
        Ok(())
    }
}

impl<T, G: Gate> Drop for ExclusiveView<T, G> {
    fn drop(&mut self) {
        if let Some(lease) = self.lease.take() {
            self.slot.gate.release_exclusive(lease);
        }
    }
}

impl<T: fmt::Debug, G: Gate> fmt::Debug for ExclusiveView<T, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExclusiveView")
            .field("value", &self.value)
            .field("released", &self.is_released())
            .finish()
    }
}
