//! Core domain logic for Geneu genealogy trees.
//! This crate is the single source of truth for genealogy invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod overlap;
pub mod repo;
pub mod service;

pub use config::{ConfigError, CoreConfig};
pub use db::{open_db, open_db_from_config, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use model::calendar::{CalendarError, DateInterval, DatePoint, PartialDate};
pub use model::event::{
    Event, EventDetails, EventId, EventKind, Participant, ParticipantError, ParticipantRole,
    RelationKind,
};
pub use model::location::{locations_equal, Location};
pub use model::person::{NewPerson, NewTree, Person, PersonId, Sex, Tree, TreeId};
pub use overlap::intervals_overlap;
pub use repo::genealogy_repo::{
    GenealogyRepository, RepoError, RepoResult, SqliteGenealogyRepository,
};
pub use service::genealogy_service::{GenealogyError, GenealogyResult, GenealogyService};
pub use service::similarity_service::SimilarityService;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
