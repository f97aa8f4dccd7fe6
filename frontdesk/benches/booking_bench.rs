use chrono::{NaiveDate, NaiveTime};
use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use tempfile::TempDir;

use frontdesk::database::{Database, DatabaseConfig};
use frontdesk::programs::inventory::Product;
use frontdesk::programs::transport::{PaymentStatus, Reservation, Trip};
use frontdesk::Money;

const SEAT_COUNTS: &[i64] = &[10, 100, 500];

fn setup_database() -> (TempDir, Database) {
    let temp_dir = TempDir::new().expect("failed to create temporary directory");
    let db_path = temp_dir.path().join("frontdesk.db");
    let db = Database::open(DatabaseConfig::new(&db_path)).expect("failed to open database");
    (temp_dir, db)
}

fn add_trip(db: &mut Database, seats: i64) {
    let trip = Trip::new(
        "T1",
        "Karachi - Hyderabad",
        NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date"),
        NaiveTime::from_hms_opt(8, 0, 0).expect("valid time"),
        seats,
        Money::from_units(900),
    )
    .expect("valid trip");
    db.transport().add_trip(&trip).expect("failed to add trip");
}

fn reservation(seat: i64) -> Reservation {
    Reservation::new(
        &format!("R{seat}"),
        "Passenger",
        "03001234567",
        "T1",
        seat,
        PaymentStatus::Unpaid,
    )
    .expect("valid reservation")
}

fn bench_fill_trip(c: &mut Criterion) {
    let mut group = c.benchmark_group("fill_trip");
    group.sample_size(10);

    for &seats in SEAT_COUNTS {
        group.bench_with_input(BenchmarkId::from_parameter(seats), &seats, |b, &seats| {
            b.iter_batched(
                || {
                    let (dir, mut db) = setup_database();
                    add_trip(&mut db, seats);
                    (dir, db)
                },
                |(_dir, mut db)| {
                    for seat in 1..=seats {
                        black_box(db.transport().book(&reservation(seat)).expect("booking"));
                    }
                },
                BatchSize::PerIteration,
            );
        });
    }

    group.finish();
}

fn bench_book_and_cancel(c: &mut Criterion) {
    let (_dir, mut db) = setup_database();
    add_trip(&mut db, 1);

    c.bench_function("book_and_cancel", |b| {
        b.iter(|| {
            db.transport().book(&reservation(1)).expect("booking");
            black_box(db.transport().cancel("R1").expect("cancel"));
        });
    });
}

fn bench_stock_withdraw(c: &mut Criterion) {
    let (_dir, mut db) = setup_database();
    db.inventory()
        .add(&Product::new("P1", "Rice", "Grocery", 0, Money::from_units(3)).expect("valid product"))
        .expect("failed to add product");

    c.bench_function("restock_then_withdraw", |b| {
        b.iter(|| {
            db.inventory().restock("P1", 5).expect("restock");
            black_box(db.inventory().withdraw_stock("P1", 5).expect("withdraw"));
        });
    });
}

criterion_group!(benches, bench_fill_trip, bench_book_and_cancel, bench_stock_withdraw);
criterion_main!(benches);
