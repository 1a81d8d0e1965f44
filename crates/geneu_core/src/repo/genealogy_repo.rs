//! Genealogy repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist trees, persons, events, participants and locations.
//! - Generate co-located candidate event pairs for similarity search.
//!
//! # Invariants
//! - An event and all of its participants are written in one transaction.
//! - Singleton events (birth, death, adoption as child) are checked and
//!   written under an `IMMEDIATE` transaction, so two writers cannot both
//!   pass the duplicate check; a partial unique index backs the check.
//! - Locations with the same canonical key share one row, so co-location
//!   is an equality join on `location_uuid`. Each event also stores its own
//!   components, so a location reads back as it was recorded.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::calendar::{DateInterval, PartialDate};
use crate::model::event::{
    Event, EventId, EventKind, Participant, ParticipantRole, RelationKind,
};
use crate::model::location::Location;
use crate::model::person::{Person, PersonId, Sex, Tree, TreeId};
use log::warn;
use rusqlite::types::Value;
use rusqlite::{
    params, params_from_iter, Connection, OptionalExtension, Row, Transaction, TransactionBehavior,
};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const EVENT_SELECT_SQL: &str = "SELECT
    e.uuid AS uuid,
    e.kind AS kind,
    e.description AS description,
    e.location_label AS location_label,
    COALESCE(e.location_components_json, l.components_json) AS location_json,
    e.begin_year AS begin_year,
    e.begin_month AS begin_month,
    e.begin_day AS begin_day,
    e.end_year AS end_year,
    e.end_month AS end_month,
    e.end_day AS end_day
FROM events e
LEFT JOIN locations l ON l.uuid = e.location_uuid";

const PERSON_SELECT_SQL: &str = "SELECT
    uuid,
    name,
    surname,
    second_surname,
    sex
FROM persons";

const TREE_SELECT_SQL: &str = "SELECT
    t.uuid AS uuid,
    t.name AS name,
    t.description AS description,
    t.is_private AS is_private,
    t.owner_id AS owner_id
FROM trees t";

const SIMILAR_CANDIDATES_SQL: &str = "SELECT
    e1.uuid AS anchor_uuid,
    e1.begin_year AS anchor_begin_year,
    e1.begin_month AS anchor_begin_month,
    e1.begin_day AS anchor_begin_day,
    e1.end_year AS anchor_end_year,
    e1.end_month AS anchor_end_month,
    e1.end_day AS anchor_end_day,
    e2.uuid AS candidate_uuid,
    e2.begin_year AS candidate_begin_year,
    e2.begin_month AS candidate_begin_month,
    e2.begin_day AS candidate_begin_day,
    e2.end_year AS candidate_end_year,
    e2.end_month AS candidate_end_month,
    e2.end_day AS candidate_end_day,
    p2.person_uuid AS candidate_person_uuid
FROM event_participants p1
INNER JOIN events e1 ON e1.uuid = p1.event_uuid
INNER JOIN events e2
    ON e2.location_uuid = e1.location_uuid
   AND e2.kind = e1.kind
   AND e2.uuid <> e1.uuid
INNER JOIN event_participants p2
    ON p2.event_uuid = e2.uuid
   AND p2.role = p1.role
WHERE p1.person_uuid = ?1
  AND p1.event_kind = ?2
  AND p1.role = ?3
  AND e1.location_uuid IS NOT NULL
  AND p2.person_uuid <> ?1
ORDER BY e1.rowid ASC, e2.rowid ASC, p2.person_uuid ASC;";

pub type RepoResult<T> = Result<T, RepoError>;

/// Which record a `NotFound` refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Person,
    Tree,
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Person => write!(f, "person"),
            Self::Tree => write!(f, "tree"),
        }
    }
}

/// Repository error for genealogy persistence and queries.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound(EntityKind, Uuid),
    /// Person already holds the anchor role of a singleton event kind.
    DuplicateEvent {
        person_uuid: PersonId,
        kind: EventKind,
    },
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(kind, id) => write!(f, "{kind} not found: {id}"),
            Self::DuplicateEvent { person_uuid, kind } => {
                write!(f, "person {person_uuid} already has a {kind} event")
            }
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "genealogy repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::InvalidData(message) => write!(f, "invalid genealogy data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// One co-located pair: an event of the queried person and another event of
/// the same kind at the same location, with the person holding the same
/// role on the other event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimilarCandidate {
    pub anchor_event: EventId,
    pub anchor_dates: DateInterval,
    pub candidate_event: EventId,
    pub candidate_dates: DateInterval,
    pub candidate_person: PersonId,
}

/// Parameterized candidate query for one relation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidateQuery {
    pub sql: &'static str,
    pub event_kind: &'static str,
    pub role: &'static str,
}

/// Builds the co-location candidate query for `relation`.
///
/// The SQL text is fixed; only the bound event kind and role vary.
pub fn similar_candidates_query(relation: RelationKind) -> CandidateQuery {
    CandidateQuery {
        sql: SIMILAR_CANDIDATES_SQL,
        event_kind: relation.event_kind().as_str(),
        role: relation.role().as_str(),
    }
}

/// Repository interface for the genealogy graph.
pub trait GenealogyRepository {
    fn create_tree(&self, tree: &Tree) -> RepoResult<()>;
    fn get_tree(&self, tree_uuid: TreeId) -> RepoResult<Option<Tree>>;
    /// Adds a person to a tree. Adding an existing member is a no-op.
    fn add_tree_member(&self, tree_uuid: TreeId, person_uuid: PersonId) -> RepoResult<()>;
    fn list_tree_persons(&self, tree_uuid: TreeId) -> RepoResult<Vec<Person>>;
    fn list_person_trees(&self, person_uuid: PersonId) -> RepoResult<Vec<Tree>>;
    /// Inserts a person and its tree memberships atomically.
    fn create_person(&self, person: &Person, trees: &[TreeId]) -> RepoResult<()>;
    fn get_person(&self, person_uuid: PersonId) -> RepoResult<Option<Person>>;
    /// Loads persons by id, ordered by name then id. Unknown ids are skipped.
    fn get_persons(&self, person_uuids: &[PersonId]) -> RepoResult<Vec<Person>>;
    /// Inserts an event with its location and participants atomically.
    ///
    /// Fails with `NotFound` when a participant does not exist and with
    /// `DuplicateEvent` when `event.kind` is a singleton and an anchor
    /// participant already holds it.
    fn insert_event(&self, event: &Event, participants: &[Participant]) -> RepoResult<()>;
    fn get_event(&self, event_uuid: EventId) -> RepoResult<Option<Event>>;
    fn list_participants(&self, event_uuid: EventId) -> RepoResult<Vec<Participant>>;
    /// Events where `person_uuid` holds `role`, in recording order.
    fn list_events_for(
        &self,
        person_uuid: PersonId,
        kind: EventKind,
        role: ParticipantRole,
    ) -> RepoResult<Vec<Event>>;
    /// Co-located candidate pairs for `person_uuid` under `relation`.
    fn similar_candidates(
        &self,
        person_uuid: PersonId,
        relation: RelationKind,
    ) -> RepoResult<Vec<SimilarCandidate>>;
}

/// SQLite-backed genealogy repository.
pub struct SqliteGenealogyRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteGenealogyRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let expected_version = latest_version();
        let actual_version = current_user_version(conn)?;
        if actual_version != expected_version {
            return Err(RepoError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }
        Ok(Self { conn })
    }
}

impl GenealogyRepository for SqliteGenealogyRepository<'_> {
    fn create_tree(&self, tree: &Tree) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO trees (uuid, name, description, is_private, owner_id)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                tree.uuid.to_string(),
                tree.name.as_str(),
                tree.description.as_deref(),
                bool_to_int(tree.is_private),
                tree.owner_id.as_deref(),
            ],
        )?;
        Ok(())
    }

    fn get_tree(&self, tree_uuid: TreeId) -> RepoResult<Option<Tree>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TREE_SELECT_SQL} WHERE t.uuid = ?1;"))?;
        let mut rows = stmt.query([tree_uuid.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_tree_row(row)?));
        }
        Ok(None)
    }

    fn add_tree_member(&self, tree_uuid: TreeId, person_uuid: PersonId) -> RepoResult<()> {
        ensure_exists(self.conn, EntityKind::Tree, tree_uuid)?;
        ensure_exists(self.conn, EntityKind::Person, person_uuid)?;
        self.conn.execute(
            "INSERT OR IGNORE INTO tree_members (tree_uuid, person_uuid) VALUES (?1, ?2);",
            params![tree_uuid.to_string(), person_uuid.to_string()],
        )?;
        Ok(())
    }

    fn list_tree_persons(&self, tree_uuid: TreeId) -> RepoResult<Vec<Person>> {
        let mut stmt = self.conn.prepare(&format!(
            "{PERSON_SELECT_SQL}
             WHERE uuid IN (SELECT person_uuid FROM tree_members WHERE tree_uuid = ?1)
             ORDER BY name ASC, uuid ASC;"
        ))?;
        let mut rows = stmt.query([tree_uuid.to_string()])?;
        let mut persons = Vec::new();
        while let Some(row) = rows.next()? {
            persons.push(parse_person_row(row)?);
        }
        Ok(persons)
    }

    fn list_person_trees(&self, person_uuid: PersonId) -> RepoResult<Vec<Tree>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TREE_SELECT_SQL}
             INNER JOIN tree_members m ON m.tree_uuid = t.uuid
             WHERE m.person_uuid = ?1
             ORDER BY t.name ASC, t.uuid ASC;"
        ))?;
        let mut rows = stmt.query([person_uuid.to_string()])?;
        let mut trees = Vec::new();
        while let Some(row) = rows.next()? {
            trees.push(parse_tree_row(row)?);
        }
        Ok(trees)
    }

    fn create_person(&self, person: &Person, trees: &[TreeId]) -> RepoResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        for tree_uuid in trees {
            ensure_exists(&tx, EntityKind::Tree, *tree_uuid)?;
        }
        tx.execute(
            "INSERT INTO persons (uuid, name, surname, second_surname, sex)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                person.uuid.to_string(),
                person.name.as_str(),
                person.surname.as_deref(),
                person.second_surname.as_deref(),
                person.sex.map(Sex::as_code),
            ],
        )?;
        for tree_uuid in trees {
            tx.execute(
                "INSERT OR IGNORE INTO tree_members (tree_uuid, person_uuid) VALUES (?1, ?2);",
                params![tree_uuid.to_string(), person.uuid.to_string()],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    fn get_person(&self, person_uuid: PersonId) -> RepoResult<Option<Person>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PERSON_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([person_uuid.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_person_row(row)?));
        }
        Ok(None)
    }

    fn get_persons(&self, person_uuids: &[PersonId]) -> RepoResult<Vec<Person>> {
        if person_uuids.is_empty() {
            return Ok(Vec::new());
        }
        let placeholders = vec!["?"; person_uuids.len()].join(", ");
        let bind_values: Vec<Value> = person_uuids
            .iter()
            .map(|id| Value::Text(id.to_string()))
            .collect();
        let mut stmt = self.conn.prepare(&format!(
            "{PERSON_SELECT_SQL} WHERE uuid IN ({placeholders}) ORDER BY name ASC, uuid ASC;"
        ))?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut persons = Vec::new();
        while let Some(row) = rows.next()? {
            persons.push(parse_person_row(row)?);
        }
        Ok(persons)
    }

    fn insert_event(&self, event: &Event, participants: &[Participant]) -> RepoResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;

        for participant in participants {
            ensure_exists(&tx, EntityKind::Person, participant.person_uuid)?;
        }
        if event.kind.is_singleton() {
            for participant in anchor_participants(event.kind, participants) {
                if holds_singleton(&tx, participant.person_uuid, event.kind)? {
                    return Err(RepoError::DuplicateEvent {
                        person_uuid: participant.person_uuid,
                        kind: event.kind,
                    });
                }
            }
        }

        let (location_uuid, location_json) = match &event.location {
            Some(location) => {
                let components_json = encode_components(location)?;
                let location_uuid = upsert_location(&tx, location, &components_json)?;
                (Some(location_uuid.to_string()), Some(components_json))
            }
            None => (None, None),
        };
        let (begin_year, begin_month, begin_day) = date_columns(event.dates.begin.as_ref());
        let (end_year, end_month, end_day) = date_columns(event.dates.end.as_ref());
        tx.execute(
            "INSERT INTO events (
                uuid,
                kind,
                description,
                location_label,
                location_uuid,
                location_components_json,
                begin_year,
                begin_month,
                begin_day,
                end_year,
                end_month,
                end_day
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12);",
            params![
                event.uuid.to_string(),
                event.kind.as_str(),
                event.description.as_deref(),
                event.location_label.as_deref(),
                location_uuid,
                location_json,
                begin_year,
                begin_month,
                begin_day,
                end_year,
                end_month,
                end_day,
            ],
        )?;

        for participant in participants {
            let inserted = tx.execute(
                "INSERT INTO event_participants (event_uuid, person_uuid, role, event_kind)
                 VALUES (?1, ?2, ?3, ?4);",
                params![
                    event.uuid.to_string(),
                    participant.person_uuid.to_string(),
                    participant.role.as_str(),
                    event.kind.as_str(),
                ],
            );
            if let Err(err) = inserted {
                let err = DbError::Sqlite(err);
                if err.is_constraint_violation()
                    && event.kind.is_singleton()
                    && participant.role == event.kind.anchor_role()
                {
                    warn!(
                        "event=event_insert module=repo status=conflict kind={} error_code=singleton_index",
                        event.kind
                    );
                    return Err(RepoError::DuplicateEvent {
                        person_uuid: participant.person_uuid,
                        kind: event.kind,
                    });
                }
                return Err(err.into());
            }
        }

        tx.commit()?;
        Ok(())
    }

    fn get_event(&self, event_uuid: EventId) -> RepoResult<Option<Event>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{EVENT_SELECT_SQL} WHERE e.uuid = ?1;"))?;
        let mut rows = stmt.query([event_uuid.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_event_row(row)?));
        }
        Ok(None)
    }

    fn list_participants(&self, event_uuid: EventId) -> RepoResult<Vec<Participant>> {
        let mut stmt = self.conn.prepare(
            "SELECT person_uuid, role
             FROM event_participants
             WHERE event_uuid = ?1
             ORDER BY role ASC, rowid ASC;",
        )?;
        let mut rows = stmt.query([event_uuid.to_string()])?;
        let mut participants = Vec::new();
        while let Some(row) = rows.next()? {
            let person_text: String = row.get("person_uuid")?;
            let role_text: String = row.get("role")?;
            let role = ParticipantRole::parse(&role_text).ok_or_else(|| {
                RepoError::InvalidData(format!(
                    "invalid role `{role_text}` in event_participants.role"
                ))
            })?;
            participants.push(Participant::new(
                parse_uuid(&person_text, "event_participants.person_uuid")?,
                role,
            ));
        }
        Ok(participants)
    }

    fn list_events_for(
        &self,
        person_uuid: PersonId,
        kind: EventKind,
        role: ParticipantRole,
    ) -> RepoResult<Vec<Event>> {
        let mut stmt = self.conn.prepare(&format!(
            "{EVENT_SELECT_SQL}
             INNER JOIN event_participants p ON p.event_uuid = e.uuid
             WHERE p.person_uuid = ?1
               AND p.event_kind = ?2
               AND p.role = ?3
             ORDER BY e.rowid ASC;"
        ))?;
        let mut rows = stmt.query(params![person_uuid.to_string(), kind.as_str(), role.as_str()])?;
        let mut events = Vec::new();
        while let Some(row) = rows.next()? {
            events.push(parse_event_row(row)?);
        }
        Ok(events)
    }

    fn similar_candidates(
        &self,
        person_uuid: PersonId,
        relation: RelationKind,
    ) -> RepoResult<Vec<SimilarCandidate>> {
        let query = similar_candidates_query(relation);
        let mut stmt = self.conn.prepare(query.sql)?;
        let mut rows = stmt.query(params![
            person_uuid.to_string(),
            query.event_kind,
            query.role
        ])?;
        let mut candidates = Vec::new();
        while let Some(row) = rows.next()? {
            let anchor_text: String = row.get("anchor_uuid")?;
            let candidate_text: String = row.get("candidate_uuid")?;
            let person_text: String = row.get("candidate_person_uuid")?;
            candidates.push(SimilarCandidate {
                anchor_event: parse_uuid(&anchor_text, "events.uuid")?,
                anchor_dates: read_interval(row, "anchor_")?,
                candidate_event: parse_uuid(&candidate_text, "events.uuid")?,
                candidate_dates: read_interval(row, "candidate_")?,
                candidate_person: parse_uuid(&person_text, "event_participants.person_uuid")?,
            });
        }
        Ok(candidates)
    }
}

fn anchor_participants(
    kind: EventKind,
    participants: &[Participant],
) -> impl Iterator<Item = &Participant> {
    let anchor_role = kind.anchor_role();
    participants
        .iter()
        .filter(move |participant| participant.role == anchor_role)
}

fn holds_singleton(conn: &Connection, person_uuid: PersonId, kind: EventKind) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM event_participants
            WHERE person_uuid = ?1
              AND event_kind = ?2
              AND role = ?3
        );",
        params![
            person_uuid.to_string(),
            kind.as_str(),
            kind.anchor_role().as_str()
        ],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn encode_components(location: &Location) -> RepoResult<String> {
    serde_json::to_string(&location.components)
        .map_err(|err| RepoError::InvalidData(format!("cannot encode location: {err}")))
}

fn upsert_location(
    conn: &Connection,
    location: &Location,
    components_json: &str,
) -> RepoResult<Uuid> {
    let key = location.canonical_key();
    conn.execute(
        "INSERT OR IGNORE INTO locations (uuid, canonical_key, components_json)
         VALUES (?1, ?2, ?3);",
        params![Uuid::new_v4().to_string(), key.as_str(), components_json],
    )?;
    let uuid_text: String = conn.query_row(
        "SELECT uuid FROM locations WHERE canonical_key = ?1;",
        [key.as_str()],
        |row| row.get(0),
    )?;
    parse_uuid(&uuid_text, "locations.uuid")
}

fn ensure_exists(conn: &Connection, kind: EntityKind, id: Uuid) -> RepoResult<()> {
    let sql = match kind {
        EntityKind::Person => "SELECT 1 FROM persons WHERE uuid = ?1;",
        EntityKind::Tree => "SELECT 1 FROM trees WHERE uuid = ?1;",
    };
    let found: Option<i64> = conn
        .query_row(sql, [id.to_string()], |row| row.get(0))
        .optional()?;
    match found {
        Some(_) => Ok(()),
        None => Err(RepoError::NotFound(kind, id)),
    }
}

fn date_columns(date: Option<&PartialDate>) -> (Option<i32>, Option<u8>, Option<u8>) {
    match date {
        Some(date) => (date.year, date.month, date.day),
        None => (None, None, None),
    }
}

fn read_interval(row: &Row<'_>, prefix: &str) -> RepoResult<DateInterval> {
    let begin = read_partial_date(row, prefix, "begin")?;
    let end = read_partial_date(row, prefix, "end")?;
    Ok(DateInterval { begin, end })
}

fn read_partial_date(row: &Row<'_>, prefix: &str, side: &str) -> RepoResult<Option<PartialDate>> {
    let year_column = format!("{prefix}{side}_year");
    let month_column = format!("{prefix}{side}_month");
    let day_column = format!("{prefix}{side}_day");
    let year: Option<i32> = row.get(year_column.as_str())?;
    let month: Option<u8> = row.get(month_column.as_str())?;
    let day: Option<u8> = row.get(day_column.as_str())?;
    if year.is_none() && month.is_none() && day.is_none() {
        return Ok(None);
    }
    PartialDate::new(year, month, day)
        .map(Some)
        .map_err(|err| RepoError::InvalidData(format!("invalid {year_column} group: {err}")))
}

fn parse_event_row(row: &Row<'_>) -> RepoResult<Event> {
    let uuid_text: String = row.get("uuid")?;
    let kind_text: String = row.get("kind")?;
    let kind = EventKind::parse(&kind_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid event kind `{kind_text}` in events.kind"))
    })?;
    let location = match row.get::<_, Option<String>>("location_json")? {
        Some(json) => {
            let components: Vec<String> = serde_json::from_str(&json).map_err(|err| {
                RepoError::InvalidData(format!("invalid event location components: {err}"))
            })?;
            Some(Location::new(components).ok_or_else(|| {
                RepoError::InvalidData("empty event location components".to_string())
            })?)
        }
        None => None,
    };

    Ok(Event {
        uuid: parse_uuid(&uuid_text, "events.uuid")?,
        kind,
        description: row.get("description")?,
        location_label: row.get("location_label")?,
        location,
        dates: read_interval(row, "")?,
    })
}

fn parse_person_row(row: &Row<'_>) -> RepoResult<Person> {
    let uuid_text: String = row.get("uuid")?;
    let sex = match row.get::<_, Option<String>>("sex")? {
        Some(code) => Some(Sex::from_code(&code).ok_or_else(|| {
            RepoError::InvalidData(format!("invalid sex `{code}` in persons.sex"))
        })?),
        None => None,
    };
    Ok(Person {
        uuid: parse_uuid(&uuid_text, "persons.uuid")?,
        name: row.get("name")?,
        surname: row.get("surname")?,
        second_surname: row.get("second_surname")?,
        sex,
    })
}

fn parse_tree_row(row: &Row<'_>) -> RepoResult<Tree> {
    let uuid_text: String = row.get("uuid")?;
    let is_private = match row.get::<_, i64>("is_private")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid is_private value `{other}` in trees.is_private"
            )));
        }
    };
    Ok(Tree {
        uuid: parse_uuid(&uuid_text, "trees.uuid")?,
        name: row.get("name")?,
        description: row.get("description")?,
        is_private,
        owner_id: row.get("owner_id")?,
    })
}

fn parse_uuid(value: &str, column: &'static str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid `{value}` in {column}")))
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::{similar_candidates_query, SIMILAR_CANDIDATES_SQL};
    use crate::model::event::RelationKind;

    #[test]
    fn candidate_query_binds_kind_and_role() {
        let query = similar_candidates_query(RelationKind::LivedIn);
        assert_eq!(query.sql, SIMILAR_CANDIDATES_SQL);
        assert_eq!(query.event_kind, "lived");
        assert_eq!(query.role, "resident");

        let query = similar_candidates_query(RelationKind::AdoptiveParentOf);
        assert_eq!(query.event_kind, "adoption");
        assert_eq!(query.role, "parent");
    }

    #[test]
    fn candidate_query_is_stable_across_calls() {
        for relation in RelationKind::ALL {
            assert_eq!(
                similar_candidates_query(relation),
                similar_candidates_query(relation)
            );
        }
    }
}
