//! Walks through moves, ungated borrows and the checked borrow discipline,
//! reporting each outcome as a log line.
//!
//! Run with `cargo run --example tour`; set `RUST_LOG=owned_cell=trace`
//! to also see every lease being granted and returned.

use owned_cell::{BorrowError, CheckedCell, OwnedCell};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn expect_failure<T>(what: &str, res: Result<T, BorrowError>) {
    match res {
        Ok(_) => warn!("{what}: unexpectedly succeeded"),
        Err(e) => info!("{what}: rejected as expected ({e})"),
    }
}

fn basic_ownership() -> Result<(), BorrowError> {
    info!("== move and use-after-move ==");
    let s1 = OwnedCell::new(String::from("hello"));
    info!("s1 = {}", s1.get()?);

    let s2 = s1.move_to()?;
    info!("s2 = {}", s2.get()?);
    expect_failure("reading s1 after move", s1.get());

    info!("== ungated borrows ==");
    let r1 = s2.borrow()?;
    let r2 = s2.borrow()?;
    info!("r1 = {}, r2 = {}", r1.get(), r2.get());

    let mut r3 = s2.borrow_mut()?;
    let next = format!("{}, world", r3.get());
    r3.set(next)?;
    info!("s2 after write = {}", s2.get()?);
    Ok(())
}

fn borrow_checker() -> Result<(), BorrowError> {
    info!("== checked borrows ==");
    let s = CheckedCell::new(String::from("hello"));
    info!("initial: {}", s.borrow_state());

    let mut r1 = s.borrow()?;
    let mut r2 = s.borrow()?;
    info!("after two shared borrows: {}", s.borrow_state());
    expect_failure("exclusive borrow while shared", s.borrow_mut());

    r1.release()?;
    info!("after one release: {}", s.borrow_state());
    r2.release()?;
    info!("after all releases: {}", s.borrow_state());
    expect_failure("releasing r2 again", r2.release());

    let mut r3 = s.borrow_mut()?;
    info!("after exclusive borrow: {}", s.borrow_state());
    expect_failure("shared borrow while exclusive", s.borrow());

    r3.set(String::from("hello, world"))?;
    info!("value after write: {}", s.get()?);

    r3.release()?;
    info!("after exclusive release: {}", s.borrow_state());
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = basic_ownership().and_then(|()| borrow_checker()) {
        warn!("tour stopped early: {e}");
        std::process::exit(1);
    }
}
