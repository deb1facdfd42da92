//! Schema steps for the studio database.
//!
//! # Invariants
//! - Step versions are strictly increasing, starting at 1.
//! - All pending steps commit together or not at all.
//! - The last applied step is recorded in `PRAGMA user_version`.

use crate::db::{DbError, DbResult};
use log::{debug, info};
use rusqlite::Connection;
use std::cmp::Ordering;

struct Step {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const STEPS: &[Step] = &[
    Step {
        version: 1,
        name: "kv_store",
        sql: include_str!("0001_kv_store.sql"),
    },
    Step {
        version: 2,
        name: "published_profiles",
        sql: include_str!("0002_published_profiles.sql"),
    },
];

/// Highest schema version this build can produce.
pub fn latest_version() -> u32 {
    STEPS.iter().map(|step| step.version).max().unwrap_or(0)
}

/// Schema version recorded in the database.
pub fn schema_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}

/// Brings `conn` up to `latest_version()`.
///
/// # Errors
/// - `UnsupportedSchemaVersion` when the file was written by a newer build.
/// - `Migration` naming the step that failed; the whole batch is rolled back.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let from = schema_version(conn)?;
    let to = latest_version();

    match from.cmp(&to) {
        Ordering::Greater => Err(DbError::UnsupportedSchemaVersion {
            db_version: from,
            latest_supported: to,
        }),
        Ordering::Equal => Ok(()),
        Ordering::Less => {
            let tx = conn.transaction()?;
            for step in STEPS.iter().skip_while(|step| step.version <= from) {
                tx.execute_batch(step.sql)
                    .and_then(|()| tx.pragma_update(None, "user_version", step.version))
                    .map_err(|source| DbError::Migration {
                        step: step.name,
                        source,
                    })?;
                debug!(
                    "event=db_migrate module=db status=applied step={} version={}",
                    step.name, step.version
                );
            }
            tx.commit()?;
            info!(
                "event=db_migrate module=db status=ok from={} to={}",
                from, to
            );
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{apply_migrations, latest_version, schema_version, STEPS};
    use rusqlite::Connection;

    #[test]
    fn steps_are_strictly_increasing_from_one() {
        for (index, step) in STEPS.iter().enumerate() {
            assert_eq!(step.version as usize, index + 1, "step {}", step.name);
        }
    }

    #[test]
    fn partially_migrated_file_only_runs_remaining_steps() {
        let mut conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(STEPS[0].sql).unwrap();
        conn.pragma_update(None, "user_version", 1).unwrap();
        conn.execute("INSERT INTO kv_store (key, value) VALUES ('k', 'v');", [])
            .unwrap();

        apply_migrations(&mut conn).unwrap();
        apply_migrations(&mut conn).unwrap();

        assert_eq!(schema_version(&conn).unwrap(), latest_version());
        let kept: String = conn
            .query_row("SELECT value FROM kv_store WHERE key = 'k';", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(kept, "v");
    }
}
