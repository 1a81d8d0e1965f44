//! Genealogy domain model.
//!
//! # Responsibility
//! - Define persons, trees, events and the partial dates they carry.
//! - Keep one event shape for every event kind, tagged by `EventKind`.
//!
//! # Invariants
//! - Every domain object is identified by a stable UUID.
//! - Events are only created together with their participants.

pub mod calendar;
pub mod event;
pub mod location;
pub mod person;
