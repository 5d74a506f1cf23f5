use owned_cell::{BorrowError, BorrowState, CheckedCell};

#[test]
fn scenario_shared_then_exclusive() {
    let s = CheckedCell::new("hello".to_string());
    assert!(s.borrow_state().is_free());

    let mut r1 = s.borrow().unwrap();
    let mut r2 = s.borrow().unwrap();
    assert_eq!(
        s.borrow_state(),
        BorrowState {
            shared: 2,
            exclusive: false
        }
    );
    assert_eq!(
        s.borrow_state().to_string(),
        "shared borrows: 2, exclusive borrow: none"
    );

    assert_eq!(s.borrow_mut().unwrap_err(), BorrowError::SharedBorrowsActive);

    r1.release().unwrap();
    assert_eq!(s.borrow_state().shared, 1);
    r2.release().unwrap();
    assert!(s.borrow_state().is_free());

    let mut w = s.borrow_mut().expect("exclusive borrow after releases");
    assert!(s.borrow_state().exclusive);
    assert_eq!(s.borrow().unwrap_err(), BorrowError::ExclusiveBorrowActive);

    w.set("hello, world".to_string()).unwrap();
    w.release().unwrap();
    assert!(s.borrow_state().is_free());
    assert_eq!(s.get().unwrap(), "hello, world");
}

#[test]
fn shared_count_tracks_borrows() {
    let s = CheckedCell::new(3u64);
    let mut views: Vec<_> = (0..5).map(|_| s.borrow().unwrap()).collect();
    assert_eq!(s.borrow_state().shared, 5);

    for expected in (0..5).rev() {
        let mut v = views.pop().unwrap();
        v.release().unwrap();
        assert_eq!(s.borrow_state().shared, expected);
    }
    assert!(views.is_empty());
}

#[test]
fn double_release_does_not_underflow() {
    let s = CheckedCell::new(1);
    let mut a = s.borrow().unwrap();
    let b = s.borrow().unwrap();

    a.release().unwrap();
    assert_eq!(a.release(), Err(BorrowError::AlreadyReleased));
    assert_eq!(s.borrow_state().shared, 1);

    drop(b);
    let mut w = s.borrow_mut().unwrap();
    w.release().unwrap();
    assert_eq!(w.release(), Err(BorrowError::AlreadyReleased));
    assert!(!s.borrow_state().exclusive);

    // Releasing twice must not hand out a second exclusive slot.
    let _x = s.borrow_mut().unwrap();
    assert_eq!(s.borrow_mut().unwrap_err(), BorrowError::ExclusiveBorrowActive);
}

#[test]
fn exclusive_blocks_second_exclusive() {
    let s = CheckedCell::new(0);
    let _w = s.borrow_mut().unwrap();
    assert_eq!(s.borrow_mut().unwrap_err(), BorrowError::ExclusiveBorrowActive);
    assert_eq!(s.borrow_state().shared, 0);
}

#[test]
fn released_exclusive_view_cannot_write() {
    let s = CheckedCell::new(10);
    let mut w = s.borrow_mut().unwrap();
    w.set(11).unwrap();
    w.release().unwrap();
    assert_eq!(w.set(12), Err(BorrowError::AlreadyReleased));
    assert_eq!(*w.get(), 11);
    assert_eq!(s.get().unwrap(), 11);
}

#[test]
fn dropping_views_releases_them() {
    let s = CheckedCell::new('a');
    {
        let _r1 = s.borrow().unwrap();
        let _r2 = s.borrow().unwrap();
        assert_eq!(s.borrow_state().shared, 2);
    }
    assert!(s.borrow_state().is_free());
    {
        let _w = s.borrow_mut().unwrap();
        assert!(s.borrow_state().exclusive);
    }
    assert!(s.borrow_state().is_free());
    assert!(s.gate().live_leases().is_empty());
}

#[test]
fn move_refused_while_borrowed() {
    let s = CheckedCell::new("v".to_string());

    let mut r = s.borrow().unwrap();
    assert_eq!(s.move_to().unwrap_err(), BorrowError::SharedBorrowsActive);
    assert!(s.is_valid());
    r.release().unwrap();

    let mut w = s.borrow_mut().unwrap();
    assert_eq!(s.move_to().unwrap_err(), BorrowError::ExclusiveBorrowActive);
    w.release().unwrap();

    let t = s.move_to().unwrap();
    assert!(!s.is_valid());
    assert!(t.borrow_state().is_free());
    assert_eq!(t.get().unwrap(), "v");
}

#[test]
fn invalid_checked_cell_rejects_everything() {
    let s = CheckedCell::new(5);
    let _t = s.move_to().unwrap();

    assert_eq!(s.get(), Err(BorrowError::UseAfterMove));
    assert_eq!(s.borrow().unwrap_err(), BorrowError::UseAfterMove);
    assert_eq!(s.borrow_mut().unwrap_err(), BorrowError::UseAfterMove);
    assert_eq!(s.move_to().unwrap_err(), BorrowError::UseAfterMove);
    assert!(s.borrow_state().is_free());
}

#[test]
fn into_inner_requires_free_cell() {
    let s = CheckedCell::new(vec![1u8]);
    let r = s.borrow().unwrap();
    assert_eq!(s.into_inner(), Err(BorrowError::SharedBorrowsActive));
    drop(r);

    let s = CheckedCell::new(vec![2u8]);
    assert_eq!(s.into_inner().unwrap(), vec![2u8]);
}

#[test]
fn views_outlive_their_cell() {
    let s = CheckedCell::new(4);
    let mut r = s.borrow().unwrap();
    drop(s);
    assert_eq!(*r.get(), 4);
    r.release().unwrap();
}

#[test]
fn views_release_into_their_own_cell() {
    let a = CheckedCell::new(1);
    let b = CheckedCell::new(2);
    let mut ra = a.borrow().unwrap();
    let rb = b.borrow().unwrap();

    // Fresh ledgers hand out identical keys; releases must still stay local.
    assert_eq!(a.gate().live_leases(), b.gate().live_leases());

    ra.release().unwrap();
    assert!(a.borrow_state().is_free());
    assert_eq!(b.borrow_state().shared, 1);
    assert_eq!(b.borrow_mut().unwrap_err(), BorrowError::SharedBorrowsActive);

    drop(rb);
    assert!(b.borrow_mut().is_ok());
}
