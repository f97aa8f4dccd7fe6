//! Property-based tests for counters and flags.

use super::{acquire_flag, claim, release, release_flag, Counter, Flag};
use proptest::prelude::*;
use rusqlite::Connection;

const STOCK: Counter = Counter::new("stock", "id", "left_over", "item");
const LOAN: Flag = Flag {
    table: "shelf",
    key_column: "id",
    flag_column: "status",
    free: "In",
    taken: "Out",
    entity: "book",
};

#[derive(Debug, Clone)]
enum Step {
    Claim(i64),
    Release(i64),
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        (1i64..=5).prop_map(Step::Claim),
        (1i64..=5).prop_map(Step::Release),
    ]
}

fn setup(total: i64) -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE stock (id TEXT PRIMARY KEY, left_over INTEGER, total INTEGER);
         CREATE TABLE shelf (id TEXT PRIMARY KEY, status TEXT);
         INSERT INTO shelf VALUES ('B', 'In');",
    )
    .unwrap();
    conn.execute("INSERT INTO stock VALUES ('S', ?1, ?1)", [total])
        .unwrap();
    conn
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    // Counter stays within [0, total] and matches a simple model
    #[test]
    fn counter_never_leaves_bounds(total in 1i64..=20, steps in prop::collection::vec(step(), 0..60)) {
        let conn = setup(total);
        let mut model = total;

        for s in steps {
            match s {
                Step::Claim(n) => {
                    let result = claim(&conn, &STOCK, "S", n);
                    if n <= model {
                        model -= n;
                        prop_assert_eq!(result.unwrap(), model);
                    } else {
                        prop_assert!(result.is_err());
                    }
                }
                Step::Release(n) => {
                    model = (model + n).min(total);
                    prop_assert_eq!(release(&conn, &STOCK, "S", n, Some("total")).unwrap(), model);
                }
            }
            let stored: i64 = conn
                .query_row("SELECT left_over FROM stock WHERE id = 'S'", [], |r| r.get(0))
                .unwrap();
            prop_assert!((0..=total).contains(&stored));
            prop_assert_eq!(stored, model);
        }
    }

    // A flag can only be taken when free and only released when taken
    #[test]
    fn flag_alternates(ops in prop::collection::vec(any::<bool>(), 0..40)) {
        let conn = setup(1);
        let mut taken = false;
        for acquire in ops {
            let result = if acquire {
                acquire_flag(&conn, &LOAN, "B")
            } else {
                release_flag(&conn, &LOAN, "B")
            };
            if acquire != taken {
                prop_assert!(result.is_ok());
                taken = acquire;
            } else {
                prop_assert!(result.is_err());
            }
        }
    }
}
