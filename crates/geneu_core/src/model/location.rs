//! Opaque location value used for co-location checks.
//!
//! # Responsibility
//! - Carry ordered address components (most specific first).
//! - Derive one canonical key so "same place" is an exact structural match.
//!
//! # Invariants
//! - Two locations are co-located iff their canonical keys are equal.
//! - The key keeps component boundaries, so no text inside a component can
//!   make two different component lists collide.
//! - A location has at least one non-blank component.
//! - Co-location ignores case and spacing, but each event keeps its
//!   components as recorded.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier of a persisted location row.
pub type LocationId = Uuid;

/// Structured place made of address components, e.g. `["Calle Mayor 1", "Madrid", "Spain"]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub components: Vec<String>,
}

impl Location {
    /// Builds a location from address components.
    ///
    /// Returns `None` when every component is blank.
    pub fn new<I, S>(components: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let components: Vec<String> = components
            .into_iter()
            .map(Into::into)
            .map(|component| component.trim().to_string())
            .filter(|component| !component.is_empty())
            .collect();
        if components.is_empty() {
            return None;
        }
        Some(Self { components })
    }

    /// Canonical key: JSON array of the components, each lowercased with
    /// inner whitespace collapsed.
    pub fn canonical_key(&self) -> String {
        let normalized: Vec<String> = self
            .components
            .iter()
            .map(|component| {
                component
                    .split_whitespace()
                    .collect::<Vec<_>>()
                    .join(" ")
                    .to_lowercase()
            })
            .filter(|component| !component.is_empty())
            .collect();
        serde_json::Value::from(normalized).to_string()
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.components.join(", "))
    }
}

/// Co-location test between two locations.
pub fn locations_equal(a: &Location, b: &Location) -> bool {
    a.canonical_key() == b.canonical_key()
}
