use geneu_core::db::migrations::{current_user_version, latest_version};
use geneu_core::db::{open_db, open_db_from_config, open_db_in_memory, DbError};
use geneu_core::{
    CoreConfig, DateInterval, EventDetails, GenealogyService, Location, NewPerson, NewTree,
    PartialDate, RepoError, SqliteGenealogyRepository,
};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(current_user_version(&conn).unwrap(), latest_version());
    for table in [
        "trees",
        "persons",
        "tree_members",
        "locations",
        "events",
        "event_participants",
    ] {
        assert_table_exists(&conn, table);
    }
    assert_index_exists(&conn, "idx_event_participants_singleton");
}

#[test]
fn foreign_keys_are_enforced() {
    let conn = open_db_in_memory().unwrap();
    let enabled: i64 = conn
        .query_row("PRAGMA foreign_keys;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(enabled, 1);

    let err = conn
        .execute(
            "INSERT INTO tree_members (tree_uuid, person_uuid) VALUES ('missing', 'missing');",
            [],
        )
        .unwrap_err();
    assert!(DbError::Sqlite(err).is_constraint_violation());
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("geneu.db");

    let conn_first = open_db(&path).unwrap();
    assert_eq!(current_user_version(&conn_first).unwrap(), latest_version());
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(current_user_version(&conn_second).unwrap(), latest_version());
    assert_table_exists(&conn_second, "events");
}

#[test]
fn config_selects_file_or_memory_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("configured.db");
    let config = CoreConfig {
        db_path: Some(path.clone()),
        ..CoreConfig::default()
    };

    let conn = open_db_from_config(&config).unwrap();
    assert_eq!(current_user_version(&conn).unwrap(), latest_version());
    assert!(path.exists());

    let memory = open_db_from_config(&CoreConfig::default()).unwrap();
    assert_eq!(current_user_version(&memory).unwrap(), latest_version());
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn repository_rejects_unmigrated_connection() {
    let conn = Connection::open_in_memory().unwrap();
    let err = SqliteGenealogyRepository::try_new(&conn)
        .err()
        .expect("unmigrated connection must be rejected");
    assert!(matches!(
        err,
        RepoError::UninitializedConnection {
            actual_version: 0,
            ..
        }
    ));
}

#[test]
fn upgrade_from_version_two_rekeys_locations_and_backfills_events() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("v2.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(include_str!("../src/db/migrations/0001_init.sql"))
        .unwrap();
    conn.execute_batch(include_str!("../src/db/migrations/0002_events.sql"))
        .unwrap();
    conn.execute_batch(
        "PRAGMA user_version = 2;
         INSERT INTO locations (uuid, canonical_key, components_json)
         VALUES ('loc-1', 'calle a | madrid', '[\"Calle A\",\"Madrid\"]');
         INSERT INTO events (uuid, kind, location_uuid, begin_year)
         VALUES ('00000000-0000-0000-0000-000000000001', 'lived', 'loc-1', 1950);",
    )
    .unwrap();
    drop(conn);

    let conn = open_db(&path).unwrap();
    assert_eq!(current_user_version(&conn).unwrap(), latest_version());
    let key: String = conn
        .query_row("SELECT canonical_key FROM locations;", [], |row| row.get(0))
        .unwrap();
    let place = Location::new(["Calle A", "Madrid"]).unwrap();
    assert_eq!(key, place.canonical_key());
    let backfilled: Option<String> = conn
        .query_row("SELECT location_components_json FROM events;", [], |row| {
            row.get(0)
        })
        .unwrap();
    assert_eq!(backfilled.as_deref(), Some("[\"Calle A\",\"Madrid\"]"));

    let service = GenealogyService::new(SqliteGenealogyRepository::try_new(&conn).unwrap());
    let tree = service.create_tree(NewTree::new("Family")).unwrap();
    let ana = service
        .create_person(NewPerson::new("Ana", tree.uuid))
        .unwrap();
    let year = PartialDate::year(1960);
    service
        .record_residence(
            ana.uuid,
            EventDetails::new(DateInterval::new(Some(year), Some(year)).unwrap())
                .at(Location::new(["calle a", "MADRID"]).unwrap()),
        )
        .unwrap();
    let locations: i64 = conn
        .query_row("SELECT COUNT(*) FROM locations;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(locations, 1);
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    assert_schema_object(conn, "table", table_name);
}

fn assert_index_exists(conn: &Connection, index_name: &str) {
    assert_schema_object(conn, "index", index_name);
}

fn assert_schema_object(conn: &Connection, kind: &str, name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = ?1 AND name = ?2
            );",
            [kind, name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "{kind} {name} does not exist");
}
