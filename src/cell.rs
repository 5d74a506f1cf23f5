//! Owning cells: the ungated `OwnedCell` and the gate-checked `CheckedCell`.
//!
//! Both wrap an `Rc<Slot<T, G>>`; they differ only in the gate policy and
//! in what a move has to check first.

use crate::error::BorrowError;
use crate::gate::sealed::GateOps;
use crate::gate::{BorrowGate, BorrowState, Gate, Unchecked};
use crate::slot::Slot;
use crate::view::{ExclusiveView, SharedView};
use core::fmt;
use std::rc::Rc;
use tracing::debug;

fn shared_view<T: Clone, G: Gate>(
    slot: &Rc<Slot<T, G>>,
) -> Result<SharedView<T, G>, BorrowError> {
    // Snapshot first: it doubles as the validity check, and a rejected
    // borrow then leaves the gate untouched.
    let snapshot = slot.read()?;
    let lease = slot.gate.acquire_shared()?;
    Ok(SharedView::new(snapshot, Rc::clone(slot), lease))
}

fn exclusive_view<T: Clone, G: Gate>(
    slot: &Rc<Slot<T, G>>,
) -> Result<ExclusiveView<T, G>, BorrowError> {
    let snapshot = slot.read()?;
    let lease = slot.gate.acquire_exclusive()?;
    Ok(ExclusiveView::new(snapshot, Rc::clone(slot), lease))
}

fn debug_slot<T: fmt::Debug, G: Gate>(
    name: &str,
    slot: &Slot<T, G>,
    f: &mut fmt::Formatter<'_>,
) -> fmt::Result {
    let mut d = f.debug_struct(name);
    match slot.with(|v| format!("{:?}", v)) {
        Some(v) => d.field("value", &format_args!("{}", v)),
        None => d.field("value", &format_args!("<moved>")),
    };
    d.finish()
}

/// Single-owner holder of a value with move semantics but no borrow
/// counting: any number of shared and exclusive views may coexist.
pub struct OwnedCell<T> {
    slot: Rc<Slot<T, Unchecked>>,
}

impl<T> OwnedCell<T> {
    pub fn new(value: T) -> Self {
        Self {
            slot: Slot::new(value),
        }
    }

    /// False once the value has been moved out.
    pub fn is_valid(&self) -> bool {
        self.slot.is_valid()
    }

    /// Transfer ownership to a brand-new cell, permanently invalidating
    /// this one.
    pub fn move_to(&self) -> Result<OwnedCell<T>, BorrowError> {
        let value = self.slot.take()?;
        debug!("ownership moved to a new cell");
        Ok(OwnedCell::new(value))
    }

    /// Take the value out, consuming the cell.
    pub fn into_inner(self) -> Result<T, BorrowError> {
        self.slot.take()
    }
}

impl<T: Clone> OwnedCell<T> {
    pub fn get(&self) -> Result<T, BorrowError> {
        self.slot.read()
    }

    pub fn borrow(&self) -> Result<SharedView<T, Unchecked>, BorrowError> {
        shared_view(&self.slot)
    }

    /// Obtain a read-write view. Nothing stops several of these from
    /// being live at once; use `CheckedCell` for that.
    pub fn borrow_mut(&self) -> Result<ExclusiveView<T, Unchecked>, BorrowError> {
        exclusive_view(&self.slot)
    }
}

impl<T: fmt::Debug> fmt::Debug for OwnedCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        debug_slot("OwnedCell", &self.slot, f)
    }
}

/// Single-owner holder whose borrows go through a `BorrowGate`: many
/// shared views, or exactly one exclusive view, never both.
pub struct CheckedCell<T> {
    slot: Rc<Slot<T, BorrowGate>>,
}

impl<T> CheckedCell<T> {
    pub fn new(value: T) -> Self {
        Self {
            slot: Slot::new(value),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.slot.is_valid()
    }

    /// Current counters of the cell's gate.
    pub fn borrow_state(&self) -> BorrowState {
        self.slot.gate.state()
    }

    /// Read-only diagnostics of the cell's gate: counters and live leases.
    /// Leases themselves only ever move between the gate and this cell's
    /// views.
    ///
    /// ```compile_fail
    /// use owned_cell::gate::Gate;
    ///
    /// let cell = owned_cell::CheckedCell::new(1);
    /// let lease = cell.gate().acquire_shared();
    /// ```
    pub fn gate(&self) -> &BorrowGate {
        &self.slot.gate
    }

    /// Transfer ownership to a new cell with a fresh gate.
    ///
    /// Like a move out of a borrowed place, this is refused while any view
    /// is live; the source is only invalidated on success.
    pub fn move_to(&self) -> Result<CheckedCell<T>, BorrowError> {
        self.slot.ensure_valid()?;
        if let Err(e) = self.slot.gate.ensure_free() {
            debug!(error = %e, state = %self.borrow_state(), "move rejected");
            return Err(e);
        }
        let value = self.slot.take()?;
        debug!("ownership moved to a new checked cell");
        Ok(CheckedCell::new(value))
    }

    /// Take the value out, consuming the cell. Fails under the same
    /// conditions as `move_to`; the value then stays behind with the
    /// outstanding views.
    pub fn into_inner(self) -> Result<T, BorrowError> {
        self.slot.ensure_valid()?;
        self.slot.gate.ensure_free()?;
        self.slot.take()
    }
}

impl<T: Clone> CheckedCell<T> {
    pub fn get(&self) -> Result<T, BorrowError> {
        self.slot.read()
    }

    pub fn borrow(&self) -> Result<SharedView<T>, BorrowError> {
        shared_view(&self.slot)
    }

    pub fn borrow_mut(&self) -> Result<ExclusiveView<T>, BorrowError> {
        exclusive_view(&self.slot)
    }
}

impl<T: fmt::Debug> fmt::Debug for CheckedCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        debug_slot("CheckedCell", &self.slot, f)?;
        write!(f, " [{}]", self.borrow_state())
    }
}
