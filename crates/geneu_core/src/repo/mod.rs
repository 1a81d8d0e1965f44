//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Multi-row writes (person + memberships, event + participants) are
//!   atomic.
//! - Repository APIs return semantic errors (`NotFound`, `DuplicateEvent`)
//!   in addition to DB transport errors.

pub mod genealogy_repo;
