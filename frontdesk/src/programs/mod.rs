//! The twelve record keepers.
//!
//! SQL-backed programs expose a store borrowed from [`crate::Database`]
//! (`db.students()`, `db.transport()`, ...). The smart-home controller and
//! the quiz keep their data in pipe-delimited text files instead.

/// Declares a fieldless enum stored and displayed as fixed text.
///
/// Parsing is case-insensitive and yields the canonical spelling; the enum
/// converts to and from `SQLite` text and serializes as its label.
macro_rules! text_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident as $field:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// Every variant in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// The stored and displayed label.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $( Self::$variant => $text ),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = crate::error::Error;

            fn from_str(s: &str) -> crate::error::Result<Self> {
                let canonical = crate::validate::one_of($field, s, &[$($text),+])?;
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str() == canonical)
                    .ok_or_else(|| crate::error::Error::validation($field, "unknown value"))
            }
        }

        impl rusqlite::types::ToSql for $name {
            fn to_sql(&self) -> rusqlite::Result<rusqlite::types::ToSqlOutput<'_>> {
                Ok(rusqlite::types::ToSqlOutput::from(self.as_str()))
            }
        }

        impl rusqlite::types::FromSql for $name {
            fn column_result(
                value: rusqlite::types::ValueRef<'_>,
            ) -> rusqlite::types::FromSqlResult<Self> {
                value
                    .as_str()?
                    .parse()
                    .map_err(|e: crate::error::Error| rusqlite::types::FromSqlError::Other(Box::new(e)))
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }
    };
}

pub mod bank;
pub mod cart;
pub mod clinic;
pub mod hospital;
pub mod inventory;
pub mod library;
pub mod personnel;
pub mod quiz;
pub mod rental;
pub mod smarthome;
pub mod students;
pub mod transport;

/// Maps a failed allocation insert: a UNIQUE index violation means the slot
/// is taken, a primary key violation means the allocation id is.
pub(crate) fn allocation_insert_error(
    err: rusqlite::Error,
    resource: &str,
    slot: &str,
    entity: &str,
    key: &str,
) -> crate::Error {
    match crate::capacity::map_allocation_conflict(err, resource, slot) {
        crate::Error::Database(err) => crate::Error::on_unique_violation(err, entity, key),
        other => other,
    }
}

/// Collects mapped rows into a `Vec`.
pub(crate) fn collect_rows<T, P, F>(
    conn: &rusqlite::Connection,
    sql: &str,
    params: P,
    map: F,
) -> crate::Result<Vec<T>>
where
    P: rusqlite::Params,
    F: FnMut(&rusqlite::Row<'_>) -> rusqlite::Result<T>,
{
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params, map)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

/// Reads an `HH:MM` text column as a time.
pub(crate) fn time_column(
    row: &rusqlite::Row<'_>,
    idx: usize,
) -> rusqlite::Result<chrono::NaiveTime> {
    let text: String = row.get(idx)?;
    chrono::NaiveTime::parse_from_str(&text, crate::validate::TIME_FORMAT).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// Serializes a time as `HH:MM`.
pub(crate) fn serialize_time<S: serde::Serializer>(
    time: &chrono::NaiveTime,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_str(&time.format(crate::validate::TIME_FORMAT))
}
