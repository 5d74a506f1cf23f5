use criterion::{black_box, criterion_group, criterion_main, Criterion};
use owned_cell::{CheckedCell, OwnedCell};
use std::time::Duration;

fn bench_shared_cycle(c: &mut Criterion) {
    c.bench_function("checked_borrow_release", |b| {
        let cell = CheckedCell::new(42u64);
        b.iter(|| {
            let mut r = cell.borrow().unwrap();
            black_box(*r.get());
            r.release().unwrap();
        })
    });

    c.bench_function("unchecked_borrow_release", |b| {
        let cell = OwnedCell::new(42u64);
        b.iter(|| {
            let mut r = cell.borrow().unwrap();
            black_box(*r.get());
            r.release().unwrap();
        })
    });
}

fn bench_many_readers(c: &mut Criterion) {
    c.bench_function("checked_1k_readers", |b| {
        let cell = CheckedCell::new(String::from("hello"));
        b.iter(|| {
            let views: Vec<_> = (0..1_000).map(|_| cell.borrow().unwrap()).collect();
            black_box(cell.borrow_state());
            drop(views);
        })
    });
}

fn bench_write_through(c: &mut Criterion) {
    c.bench_function("checked_exclusive_set", |b| {
        let cell = CheckedCell::new(0u64);
        let mut n = 0u64;
        b.iter(|| {
            n = n.wrapping_add(1);
            let mut w = cell.borrow_mut().unwrap();
            w.set(n).unwrap();
            w.release().unwrap();
        })
    });

    c.bench_function("owned_move_chain_100", |b| {
        b.iter(|| {
            let mut cell = OwnedCell::new(vec![0u8; 64]);
            for _ in 0..100 {
                cell = cell.move_to().unwrap();
            }
            black_box(cell.is_valid())
        })
    });
}

fn config() -> Criterion {
    Criterion::default()
        .measurement_time(Duration::from_secs(3))
        .warm_up_time(Duration::from_millis(500))
}

criterion_group! {
    name = benches;
    config = config();
    targets = bench_shared_cycle, bench_many_readers, bench_write_through
}
criterion_main!(benches);
