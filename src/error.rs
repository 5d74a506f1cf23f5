//! Error kinds surfaced by cells, gates and views.

/// Why an ownership or borrow operation was rejected.
///
/// These are programmer-error conditions: they are reported immediately and
/// never retried internally. A rejected operation leaves all state untouched.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, thiserror::Error)]
pub enum BorrowError {
    /// The cell's value was moved out (or taken) and the cell is now invalid.
    #[error("value used after its ownership was moved")]
    UseAfterMove,

    /// An exclusive borrow is live, so no further borrow may be granted.
    #[error("an exclusive borrow is already active")]
    ExclusiveBorrowActive,

    /// Shared borrows are live, so an exclusive borrow (or a move) is refused.
    #[error("shared borrows are active")]
    SharedBorrowsActive,

    /// The view has already returned its borrow to the cell.
    #[error("borrow has already been released")]
    AlreadyReleased,
}
