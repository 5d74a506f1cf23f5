//! Slot: the storage a cell owns and its views point back into.
//!
//! A slot is `Valid` while it holds `Some(value)` and `Invalid` once the
//! value has been moved out. There is no way back: nothing ever stores
//! into an empty slot, so reads after a move are structurally impossible.

use crate::error::BorrowError;
use crate::gate::Gate;
use core::cell::RefCell;
use std::rc::Rc;

pub(crate) struct Slot<T, G> {
    value: RefCell<Option<T>>,
    pub(crate) gate: G,
}

impl<T, G: Gate + Default> Slot<T, G> {
    pub(crate) fn new(value: T) -> Rc<Self> {
        Rc::new(Self {
            value: RefCell::new(Some(value)),
            gate: G::default(),
        })
    }
}

impl<T, G: Gate> Slot<T, G> {
    pub(crate) fn is_valid(&self) -> bool {
        self.value.borrow().is_some()
    }

    pub(crate) fn ensure_valid(&self) -> Result<(), BorrowError> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(BorrowError::UseAfterMove)
        }
    }

    /// Clone the current value out.
    pub(crate) fn read(&self) -> Result<T, BorrowError>
    where
        T: Clone,
    {
        self.value
            .borrow()
            .as_ref()
            .cloned()
            .ok_or(BorrowError::UseAfterMove)
    }

    /// Replace the current value. The old value is dropped after the
    /// slot is consistent again, so its `Drop` may reenter the cell.
    pub(crate) fn write(&self, value: T) -> Result<(), BorrowError> {
        let old = {
            let mut slot = self.value.borrow_mut();
            match slot.as_mut() {
                Some(cur) => core::mem::replace(cur, value),
                None => return Err(BorrowError::UseAfterMove),
            }
        };
        drop(old);
        Ok(())
    }

    /// Move the value out, leaving the slot permanently invalid.
    pub(crate) fn take(&self) -> Result<T, BorrowError> {
        self.value
            .borrow_mut()
            .take()
            .ok_or(BorrowError::UseAfterMove)
    }

    pub(crate) fn with<R>(&self, f: impl FnOnce(&T) -> R) -> Option<R> {
        self.value.borrow().as_ref().map(f)
    }
}

#[cfg(test)]
mod tests {
    use super::Slot;
    use crate::error::BorrowError;
    use crate::gate::Unchecked;

    #[test]
    fn take_invalidates_for_good() {
        let s = Slot::<String, Unchecked>::new("a".to_string());
        assert_eq!(s.read().unwrap(), "a");
        assert_eq!(s.take().unwrap(), "a");
        assert!(!s.is_valid());
        assert_eq!(s.read(), Err(BorrowError::UseAfterMove));
        assert_eq!(s.write("b".to_string()), Err(BorrowError::UseAfterMove));
        assert_eq!(s.take(), Err(BorrowError::UseAfterMove));
        assert!(!s.is_valid());
    }

    #[test]
    fn write_replaces_value() {
        let s = Slot::<i32, Unchecked>::new(1);
        s.write(2).unwrap();
        assert_eq!(s.with(|v| *v), Some(2));
    }
}
