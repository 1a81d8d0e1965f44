//! SQLite migration registry and executor.
//!
//! # Responsibility
//! - Register schema migrations in strictly increasing order.
//! - Apply pending migrations atomically.
//!
//! # Invariants
//! - `version` values must remain monotonic.
//! - Applied migration version is mirrored to `PRAGMA user_version`.
//! - A migration's data rewrite runs inside the same transaction as its SQL.

use crate::db::{DbError, DbResult};
use crate::model::location::Location;
use log::{info, warn};
use rusqlite::types::Type;
use rusqlite::Connection;

#[derive(Clone, Copy)]
struct Migration {
    version: u32,
    sql: &'static str,
    rewrite: Option<fn(&Connection) -> DbResult<()>>,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        sql: include_str!("0001_init.sql"),
        rewrite: None,
    },
    Migration {
        version: 2,
        sql: include_str!("0002_events.sql"),
        rewrite: None,
    },
    Migration {
        version: 3,
        sql: include_str!("0003_event_location_components.sql"),
        rewrite: Some(rekey_locations),
    },
];

/// Returns the latest migration version known by this binary.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Applies all pending migrations on the provided connection.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let current_version = current_user_version(conn)?;
    let latest = latest_version();

    if current_version > latest {
        warn!(
            "event=db_migrate module=db status=error db_version={} latest_supported={}",
            current_version, latest
        );
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current_version,
            latest_supported: latest,
        });
    }

    if current_version == latest {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for migration in MIGRATIONS {
        if migration.version <= current_version {
            continue;
        }

        tx.execute_batch(migration.sql)?;
        if let Some(rewrite) = migration.rewrite {
            rewrite(&tx)?;
        }
        tx.execute_batch(&format!("PRAGMA user_version = {};", migration.version))?;
    }
    tx.commit()?;
    info!(
        "event=db_migrate module=db status=ok from_version={} to_version={}",
        current_version, latest
    );

    Ok(())
}

/// Reads the schema version applied to `conn`.
pub fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}

/// Recomputes every `locations.canonical_key` from its stored components.
///
/// Keys written before version 3 joined components with a separator that
/// could also appear inside a component.
fn rekey_locations(conn: &Connection) -> DbResult<()> {
    let mut select = conn.prepare("SELECT uuid, components_json FROM locations;")?;
    let rows = select
        .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?
        .collect::<Result<Vec<_>, _>>()?;

    let mut update = conn.prepare("UPDATE locations SET canonical_key = ?1 WHERE uuid = ?2;")?;
    for (uuid, components_json) in &rows {
        let components: Vec<String> = serde_json::from_str(components_json).map_err(|err| {
            rusqlite::Error::FromSqlConversionFailure(1, Type::Text, Box::new(err))
        })?;
        let Some(location) = Location::new(components) else {
            warn!("event=db_migrate module=db status=skip reason=empty_location uuid={uuid}");
            continue;
        };
        update.execute([location.canonical_key().as_str(), uuid.as_str()])?;
    }
    Ok(())
}
