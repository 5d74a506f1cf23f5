//! owned-cell: single ownership and shared/exclusive borrowing, checked
//! at runtime instead of at compile time.
//!
//! A value is wrapped in an owning cell. Ownership can be moved to a new
//! cell, which permanently invalidates the source. Borrows are requested
//! as views: any number of shared (read-only) views, or a single
//! exclusive (read-write) view. Illegal requests are rejected with a
//! `BorrowError` at the moment they are made.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: express the ownership rules as a small state machine per cell
//!   so that each rule is checked in exactly one place.
//! - Layers:
//!   - `tokens::Lease<M>`: linear proof of one granted borrow. It must be
//!     handed back to the gate that minted it; dropping it panics.
//!   - `gate::Gate`: sealed borrow policy; leases only travel between a
//!     gate and the views of its own slot. `BorrowGate` counts shared borrows,
//!     tracks the exclusive flag and keeps a ledger of live leases;
//!     `Unchecked` grants everything.
//!   - `Slot<T, G>`: the owned storage, `Some(value)` while valid and
//!     `None` once moved out, plus its gate.
//!   - `OwnedCell` / `CheckedCell`: thin owners over `Rc<Slot<T, G>>`
//!     with `Unchecked` and `BorrowGate` respectively.
//!   - `SharedView` / `ExclusiveView`: a snapshot, a handle back to the
//!     slot for write-through and release, and the lease.
//!
//! Cell states
//! - Valid-Free, Valid-Shared(n), Valid-Exclusive, Invalid.
//! - `borrow` moves Free/Shared(n) to Shared(n + 1); releasing a shared
//!   view moves Shared(n) to Shared(n - 1) or Free.
//! - `borrow_mut` moves Free to Exclusive; releasing it moves back to Free.
//! - `move_to` moves Free to Invalid, which is terminal. `CheckedCell`
//!   refuses to move while borrowed; `OwnedCell` has no borrow state.
//! - Conflicting requests fail without changing any state.
//!
//! Views
//! - Views are frozen snapshots taken when the borrow is granted; an
//!   `ExclusiveView` also reflects its own writes.
//! - `release()` is idempotent in effect: the first call returns the
//!   lease, later calls report `BorrowError::AlreadyReleased`.
//! - Dropping an unreleased view releases it.
//! - A released `ExclusiveView` can no longer write.
//!
//! Threading
//! - Single-threaded and synchronous: every operation returns or fails
//!   immediately, and nothing blocks or queues.
//! - The counters are plain `Cell`s, not atomics, and the slot is shared
//!   through `Rc`. Every type here is therefore `!Send`/`!Sync`. A
//!   multi-threaded variant would need `Arc` and a mutex guarding the
//!   whole slot, counters included; per-counter atomics would not keep
//!   the shared/exclusive checks consistent.
//!
//! ```compile_fail
//! fn assert_send<T: Send>() {}
//! assert_send::<owned_cell::CheckedCell<String>>();
//! ```
//!
//! Notes and non-goals
//! - No static analysis; only requests made through this API are checked.
//! - Views keep the slot alive, but after the owning cell is gone they
//!   only support release bookkeeping and reads of their snapshot.
//! - Counter overflow aborts, matching `Rc`.
//!
//! Logging
//! - Grants and releases are emitted as `tracing` trace events with the
//!   lease key; moves and rejected requests as debug events. The crate
//!   never installs a subscriber.

mod cell;
mod error;
pub mod gate;
mod gate_proptest;
mod slot;
pub mod tokens;
mod view;

// Public surface
pub use cell::{CheckedCell, OwnedCell};
pub use error::BorrowError;
pub use gate::{BorrowGate, BorrowState};
pub use view::{ExclusiveView, SharedView};
