//! Event model shared by every event kind.
//!
//! # Responsibility
//! - Represent births, deaths, marriages, divorces, adoptions and residences
//!   with one record tagged by `EventKind`.
//! - Describe, per kind, which participant roles exist and how many persons
//!   each role takes.
//!
//! # Invariants
//! - Every event has exactly one "anchor" participant (the person it was
//!   recorded for) and the role arity of its kind is respected.
//! - Birth, death and adoption are singletons for their anchor person.
//! - Dates and location are immutable once the event is recorded.

use crate::model::calendar::DateInterval;
use crate::model::location::Location;
use crate::model::person::PersonId;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// Stable event identifier.
pub type EventId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Birth,
    Death,
    Marriage,
    Divorce,
    Adoption,
    Lived,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticipantRole {
    /// Born or adopted person.
    Child,
    /// Birth parent or adoptive parent.
    Parent,
    Spouse,
    /// Person who died.
    Subject,
    Resident,
}

/// How many persons one role of an event kind takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleArity {
    pub role: ParticipantRole,
    pub min: usize,
    pub max: usize,
}

const fn arity(role: ParticipantRole, min: usize, max: usize) -> RoleArity {
    RoleArity { role, min, max }
}

const BIRTH_ROLES: &[RoleArity] = &[
    arity(ParticipantRole::Child, 1, 1),
    arity(ParticipantRole::Parent, 0, 2),
];
const DEATH_ROLES: &[RoleArity] = &[arity(ParticipantRole::Subject, 1, 1)];
const UNION_ROLES: &[RoleArity] = &[arity(ParticipantRole::Spouse, 2, 2)];
const LIVED_ROLES: &[RoleArity] = &[arity(ParticipantRole::Resident, 1, 1)];

impl EventKind {
    pub const ALL: [EventKind; 6] = [
        EventKind::Birth,
        EventKind::Death,
        EventKind::Marriage,
        EventKind::Divorce,
        EventKind::Adoption,
        EventKind::Lived,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Birth => "birth",
            Self::Death => "death",
            Self::Marriage => "marriage",
            Self::Divorce => "divorce",
            Self::Adoption => "adoption",
            Self::Lived => "lived",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == value)
    }

    /// Role arity table for this kind.
    pub fn roles(self) -> &'static [RoleArity] {
        match self {
            Self::Birth | Self::Adoption => BIRTH_ROLES,
            Self::Death => DEATH_ROLES,
            Self::Marriage | Self::Divorce => UNION_ROLES,
            Self::Lived => LIVED_ROLES,
        }
    }

    /// Role played by the person the event is recorded for.
    pub fn anchor_role(self) -> ParticipantRole {
        match self {
            Self::Birth | Self::Adoption => ParticipantRole::Child,
            Self::Death => ParticipantRole::Subject,
            Self::Marriage | Self::Divorce => ParticipantRole::Spouse,
            Self::Lived => ParticipantRole::Resident,
        }
    }

    /// Whether a person may hold the anchor role of this kind at most once.
    pub fn is_singleton(self) -> bool {
        matches!(self, Self::Birth | Self::Death | Self::Adoption)
    }

    pub fn arity_of(self, role: ParticipantRole) -> Option<RoleArity> {
        self.roles().iter().copied().find(|arity| arity.role == role)
    }

    /// Checks role membership, per-role counts and repeated persons.
    pub fn check_participants(self, participants: &[Participant]) -> Result<(), ParticipantError> {
        for participant in participants {
            if self.arity_of(participant.role).is_none() {
                return Err(ParticipantError::RoleNotAllowed {
                    kind: self,
                    role: participant.role,
                });
            }
        }

        for arity in self.roles() {
            let count = participants
                .iter()
                .filter(|participant| participant.role == arity.role)
                .count();
            if count < arity.min || count > arity.max {
                return Err(ParticipantError::Arity {
                    kind: self,
                    role: arity.role,
                    count,
                    min: arity.min,
                    max: arity.max,
                });
            }
        }

        for (index, participant) in participants.iter().enumerate() {
            if participants[..index]
                .iter()
                .any(|earlier| earlier.person_uuid == participant.person_uuid)
            {
                return Err(ParticipantError::RepeatedPerson(participant.person_uuid));
            }
        }

        Ok(())
    }
}

impl Display for EventKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ParticipantRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Child => "child",
            Self::Parent => "parent",
            Self::Spouse => "spouse",
            Self::Subject => "subject",
            Self::Resident => "resident",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "child" => Some(Self::Child),
            "parent" => Some(Self::Parent),
            "spouse" => Some(Self::Spouse),
            "subject" => Some(Self::Subject),
            "resident" => Some(Self::Resident),
            _ => None,
        }
    }
}

impl Display for ParticipantRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Participant-level validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParticipantError {
    RoleNotAllowed {
        kind: EventKind,
        role: ParticipantRole,
    },
    Arity {
        kind: EventKind,
        role: ParticipantRole,
        count: usize,
        min: usize,
        max: usize,
    },
    RepeatedPerson(PersonId),
}

impl Display for ParticipantError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RoleNotAllowed { kind, role } => {
                write!(f, "role `{role}` is not allowed on `{kind}` events")
            }
            Self::Arity {
                kind,
                role,
                count,
                min,
                max,
            } => write!(
                f,
                "`{kind}` events take {min}..={max} `{role}` participants, got {count}"
            ),
            Self::RepeatedPerson(id) => write!(f, "person {id} appears more than once"),
        }
    }
}

impl Error for ParticipantError {}

/// One person attached to an event in a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Participant {
    pub person_uuid: PersonId,
    pub role: ParticipantRole,
}

impl Participant {
    pub fn new(person_uuid: PersonId, role: ParticipantRole) -> Self {
        Self { person_uuid, role }
    }
}

/// Event read model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub uuid: EventId,
    pub kind: EventKind,
    pub description: Option<String>,
    /// Free-text place label, independent of `location`.
    pub location_label: Option<String>,
    pub location: Option<Location>,
    pub dates: DateInterval,
}

/// Event payload shared by every `record_*` operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventDetails {
    pub dates: DateInterval,
    pub location: Option<Location>,
    pub location_label: Option<String>,
    pub description: Option<String>,
}

impl EventDetails {
    pub fn new(dates: DateInterval) -> Self {
        Self {
            dates,
            ..Self::default()
        }
    }

    pub fn at(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    pub fn labelled(mut self, label: impl Into<String>) -> Self {
        self.location_label = Some(label.into());
        self
    }

    pub fn described(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Relation from a person to an event: the pair of event kind and role.
///
/// This is the unit `find_similar` matches on: two persons are compared
/// through events of the same kind where both hold the same role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    Born,
    ParentOf,
    Died,
    Married,
    Divorced,
    Adopted,
    AdoptiveParentOf,
    LivedIn,
}

impl RelationKind {
    pub const ALL: [RelationKind; 8] = [
        RelationKind::Born,
        RelationKind::ParentOf,
        RelationKind::Died,
        RelationKind::Married,
        RelationKind::Divorced,
        RelationKind::Adopted,
        RelationKind::AdoptiveParentOf,
        RelationKind::LivedIn,
    ];

    pub fn event_kind(self) -> EventKind {
        match self {
            Self::Born | Self::ParentOf => EventKind::Birth,
            Self::Died => EventKind::Death,
            Self::Married => EventKind::Marriage,
            Self::Divorced => EventKind::Divorce,
            Self::Adopted | Self::AdoptiveParentOf => EventKind::Adoption,
            Self::LivedIn => EventKind::Lived,
        }
    }

    pub fn role(self) -> ParticipantRole {
        match self {
            Self::Born | Self::Adopted => ParticipantRole::Child,
            Self::ParentOf | Self::AdoptiveParentOf => ParticipantRole::Parent,
            Self::Died => ParticipantRole::Subject,
            Self::Married | Self::Divorced => ParticipantRole::Spouse,
            Self::LivedIn => ParticipantRole::Resident,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Born => "born",
            Self::ParentOf => "parent_of",
            Self::Died => "died",
            Self::Married => "married",
            Self::Divorced => "divorced",
            Self::Adopted => "adopted",
            Self::AdoptiveParentOf => "adoptive_parent_of",
            Self::LivedIn => "lived_in",
        }
    }
}

impl Display for RelationKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelationKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|relation| relation.as_str() == normalized)
            .ok_or_else(|| format!("unknown relation kind `{}`", value.trim()))
    }
}
