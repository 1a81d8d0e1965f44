//! Person and tree records.
//!
//! # Invariants
//! - `uuid` is stable and never reused.
//! - A persisted person belongs to at least one tree.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable person identifier.
pub type PersonId = Uuid;

/// Stable tree identifier.
pub type TreeId = Uuid;

/// Recorded sex of a person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sex {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
}

impl Sex {
    pub fn as_code(self) -> &'static str {
        match self {
            Self::Male => "M",
            Self::Female => "F",
        }
    }

    pub fn from_code(value: &str) -> Option<Self> {
        match value {
            "M" => Some(Self::Male),
            "F" => Some(Self::Female),
            _ => None,
        }
    }
}

/// Person read model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub uuid: PersonId,
    pub name: String,
    pub surname: Option<String>,
    pub second_surname: Option<String>,
    pub sex: Option<Sex>,
}

/// Input for creating one person.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewPerson {
    /// Required, trimmed before persistence.
    pub name: String,
    pub surname: Option<String>,
    pub second_surname: Option<String>,
    pub sex: Option<Sex>,
    /// Trees the person joins on creation. Must not be empty.
    pub trees: Vec<TreeId>,
}

impl NewPerson {
    pub fn new(name: impl Into<String>, tree: TreeId) -> Self {
        Self {
            name: name.into(),
            trees: vec![tree],
            ..Self::default()
        }
    }

    pub fn surname(mut self, surname: impl Into<String>) -> Self {
        self.surname = Some(surname.into());
        self
    }

    pub fn sex(mut self, sex: Sex) -> Self {
        self.sex = Some(sex);
        self
    }
}

/// Named collection of persons.
///
/// `is_private` and `owner_id` are stored for the outer layers; this crate
/// does not enforce them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tree {
    pub uuid: TreeId,
    pub name: String,
    pub description: Option<String>,
    pub is_private: bool,
    pub owner_id: Option<String>,
}

/// Input for creating one tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTree {
    /// Required, trimmed before persistence.
    pub name: String,
    pub description: Option<String>,
    pub is_private: bool,
    pub owner_id: Option<String>,
}

impl NewTree {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn described(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Marks the tree private to `owner_id`.
    pub fn private_to(mut self, owner_id: impl Into<String>) -> Self {
        self.is_private = true;
        self.owner_id = Some(owner_id.into());
        self
    }
}
