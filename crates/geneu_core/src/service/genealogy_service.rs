//! Genealogy use-case service.
//!
//! # Responsibility
//! - Create trees and persons and keep tree membership valid.
//! - Record events through one generic recorder parameterized by kind.
//! - Expose per-person and per-event read accessors.
//!
//! # Invariants
//! - A person always belongs to at least one existing tree.
//! - Each `record_*` call either persists the event with its location and
//!   all participants, or nothing.
//! - Birth, death and adoption-as-child are singletons per person.
//! - Log lines carry ids and kinds only, never names or descriptions.

use crate::model::calendar::{CalendarError, DateInterval};
use crate::model::event::{
    Event, EventDetails, EventId, EventKind, Participant, ParticipantError, ParticipantRole,
};
use crate::model::person::{NewPerson, NewTree, Person, PersonId, Tree, TreeId};
use crate::repo::genealogy_repo::{EntityKind, GenealogyRepository, RepoError};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;
use uuid::Uuid;

/// Errors from genealogy service operations.
#[derive(Debug)]
pub enum GenealogyError {
    /// Person already has the singleton event of this kind.
    DuplicateEvent { person_uuid: PersonId, kind: EventKind },
    /// Event dates are malformed or inverted.
    MalformedInterval(CalendarError),
    PersonNotFound(PersonId),
    TreeNotFound(TreeId),
    EventNotFound(EventId),
    /// Participant roles, counts or repeated persons are invalid.
    InvalidParticipants(ParticipantError),
    /// Person creation without any tree.
    PersonWithoutTree,
    /// Person or tree name is blank after trim.
    InvalidName,
    /// Storage-level failure, propagated unchanged.
    Storage(RepoError),
}

impl Display for GenealogyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateEvent { person_uuid, kind } => {
                write!(f, "person {person_uuid} already has a {kind} event")
            }
            Self::MalformedInterval(err) => write!(f, "malformed interval: {err}"),
            Self::PersonNotFound(id) => write!(f, "person not found: {id}"),
            Self::TreeNotFound(id) => write!(f, "tree not found: {id}"),
            Self::EventNotFound(id) => write!(f, "event not found: {id}"),
            Self::InvalidParticipants(err) => write!(f, "invalid participants: {err}"),
            Self::PersonWithoutTree => write!(f, "person must belong to at least one tree"),
            Self::InvalidName => write!(f, "name must not be blank"),
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for GenealogyError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::MalformedInterval(err) => Some(err),
            Self::InvalidParticipants(err) => Some(err),
            Self::Storage(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for GenealogyError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::DuplicateEvent { person_uuid, kind } => {
                Self::DuplicateEvent { person_uuid, kind }
            }
            RepoError::NotFound(EntityKind::Person, id) => Self::PersonNotFound(id),
            RepoError::NotFound(EntityKind::Tree, id) => Self::TreeNotFound(id),
            other => Self::Storage(other),
        }
    }
}

impl From<CalendarError> for GenealogyError {
    fn from(value: CalendarError) -> Self {
        Self::MalformedInterval(value)
    }
}

impl From<ParticipantError> for GenealogyError {
    fn from(value: ParticipantError) -> Self {
        Self::InvalidParticipants(value)
    }
}

pub type GenealogyResult<T> = Result<T, GenealogyError>;

/// Genealogy service facade.
pub struct GenealogyService<R: GenealogyRepository> {
    repo: R,
}

impl<R: GenealogyRepository> GenealogyService<R> {
    /// Creates service from repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates one tree.
    pub fn create_tree(&self, request: NewTree) -> GenealogyResult<Tree> {
        let tree = Tree {
            uuid: Uuid::new_v4(),
            name: normalize_name(request.name)?,
            description: normalize_optional(request.description),
            is_private: request.is_private,
            owner_id: normalize_optional(request.owner_id),
        };
        self.repo.create_tree(&tree)?;
        info!(
            "event=tree_create module=service status=ok tree_uuid={}",
            tree.uuid
        );
        Ok(tree)
    }

    pub fn get_tree(&self, tree_uuid: TreeId) -> GenealogyResult<Tree> {
        self.repo
            .get_tree(tree_uuid)?
            .ok_or(GenealogyError::TreeNotFound(tree_uuid))
    }

    /// Adds an existing person to an existing tree. Idempotent.
    pub fn add_person_to_tree(
        &self,
        tree_uuid: TreeId,
        person_uuid: PersonId,
    ) -> GenealogyResult<()> {
        self.repo.add_tree_member(tree_uuid, person_uuid)?;
        Ok(())
    }

    /// Lists tree members ordered by name.
    pub fn list_tree_persons(&self, tree_uuid: TreeId) -> GenealogyResult<Vec<Person>> {
        self.get_tree(tree_uuid)?;
        self.repo.list_tree_persons(tree_uuid).map_err(Into::into)
    }

    pub fn list_person_trees(&self, person_uuid: PersonId) -> GenealogyResult<Vec<Tree>> {
        self.get_person(person_uuid)?;
        self.repo.list_person_trees(person_uuid).map_err(Into::into)
    }

    /// Creates one person inside the requested trees.
    ///
    /// # Errors
    /// - `InvalidName` when the name is blank.
    /// - `PersonWithoutTree` when no tree is given.
    /// - `TreeNotFound` when any tree is unknown.
    pub fn create_person(&self, request: NewPerson) -> GenealogyResult<Person> {
        let name = normalize_name(request.name)?;
        if request.trees.is_empty() {
            return Err(GenealogyError::PersonWithoutTree);
        }
        let person = Person {
            uuid: Uuid::new_v4(),
            name,
            surname: normalize_optional(request.surname),
            second_surname: normalize_optional(request.second_surname),
            sex: request.sex,
        };
        self.repo.create_person(&person, &request.trees)?;
        info!(
            "event=person_create module=service status=ok person_uuid={} tree_count={}",
            person.uuid,
            request.trees.len()
        );
        Ok(person)
    }

    pub fn get_person(&self, person_uuid: PersonId) -> GenealogyResult<Person> {
        self.repo
            .get_person(person_uuid)?
            .ok_or(GenealogyError::PersonNotFound(person_uuid))
    }

    /// Records the birth of `person_uuid` with up to two parents.
    pub fn record_birth(
        &self,
        person_uuid: PersonId,
        details: EventDetails,
        parents: &[PersonId],
    ) -> GenealogyResult<Event> {
        let mut participants = vec![Participant::new(person_uuid, ParticipantRole::Child)];
        participants.extend(
            parents
                .iter()
                .map(|parent| Participant::new(*parent, ParticipantRole::Parent)),
        );
        self.record(EventKind::Birth, details, &participants)
    }

    pub fn record_death(
        &self,
        person_uuid: PersonId,
        details: EventDetails,
    ) -> GenealogyResult<Event> {
        let participants = [Participant::new(person_uuid, ParticipantRole::Subject)];
        self.record(EventKind::Death, details, &participants)
    }

    /// Records the adoption of `person_uuid` by up to two adoptive parents.
    pub fn record_adoption(
        &self,
        person_uuid: PersonId,
        details: EventDetails,
        parents: &[PersonId],
    ) -> GenealogyResult<Event> {
        let mut participants = vec![Participant::new(person_uuid, ParticipantRole::Child)];
        participants.extend(
            parents
                .iter()
                .map(|parent| Participant::new(*parent, ParticipantRole::Parent)),
        );
        self.record(EventKind::Adoption, details, &participants)
    }

    pub fn record_marriage(
        &self,
        person_uuid: PersonId,
        spouse_uuid: PersonId,
        details: EventDetails,
    ) -> GenealogyResult<Event> {
        let participants = [
            Participant::new(person_uuid, ParticipantRole::Spouse),
            Participant::new(spouse_uuid, ParticipantRole::Spouse),
        ];
        self.record(EventKind::Marriage, details, &participants)
    }

    pub fn record_divorce(
        &self,
        person_uuid: PersonId,
        spouse_uuid: PersonId,
        details: EventDetails,
    ) -> GenealogyResult<Event> {
        let participants = [
            Participant::new(person_uuid, ParticipantRole::Spouse),
            Participant::new(spouse_uuid, ParticipantRole::Spouse),
        ];
        self.record(EventKind::Divorce, details, &participants)
    }

    /// Records one residence interval of `person_uuid`.
    pub fn record_residence(
        &self,
        person_uuid: PersonId,
        details: EventDetails,
    ) -> GenealogyResult<Event> {
        let participants = [Participant::new(person_uuid, ParticipantRole::Resident)];
        self.record(EventKind::Lived, details, &participants)
    }

    fn record(
        &self,
        kind: EventKind,
        details: EventDetails,
        participants: &[Participant],
    ) -> GenealogyResult<Event> {
        let started_at = Instant::now();
        let dates = DateInterval::new(details.dates.begin, details.dates.end)?;
        kind.check_participants(participants)?;
        for participant in participants {
            self.get_person(participant.person_uuid)?;
        }

        let event = Event {
            uuid: Uuid::new_v4(),
            kind,
            description: normalize_optional(details.description),
            location_label: normalize_optional(details.location_label),
            location: details.location,
            dates,
        };

        match self.repo.insert_event(&event, participants) {
            Ok(()) => {
                info!(
                    "event=event_record module=service status=ok kind={kind} event_uuid={} participants={} duration_ms={}",
                    event.uuid,
                    participants.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(event)
            }
            Err(err) => {
                let err = GenealogyError::from(err);
                let error_code = match &err {
                    GenealogyError::DuplicateEvent { .. } => "duplicate_event",
                    GenealogyError::PersonNotFound(_) => "person_not_found",
                    _ => "storage_failed",
                };
                warn!(
                    "event=event_record module=service status=error kind={kind} duration_ms={} error_code={error_code}",
                    started_at.elapsed().as_millis()
                );
                Err(err)
            }
        }
    }

    pub fn get_event(&self, event_uuid: EventId) -> GenealogyResult<Event> {
        self.repo
            .get_event(event_uuid)?
            .ok_or(GenealogyError::EventNotFound(event_uuid))
    }

    /// All participants of one event, grouped by role.
    pub fn participants(&self, event_uuid: EventId) -> GenealogyResult<Vec<Participant>> {
        self.get_event(event_uuid)?;
        self.repo.list_participants(event_uuid).map_err(Into::into)
    }

    /// Spouses of a marriage or divorce.
    pub fn spouses(&self, event_uuid: EventId) -> GenealogyResult<Vec<Person>> {
        self.persons_in_role(event_uuid, ParticipantRole::Spouse)
    }

    /// Parents of a birth or adoptive parents of an adoption.
    pub fn parents(&self, event_uuid: EventId) -> GenealogyResult<Vec<Person>> {
        self.persons_in_role(event_uuid, ParticipantRole::Parent)
    }

    /// Born or adopted child.
    pub fn child(&self, event_uuid: EventId) -> GenealogyResult<Option<Person>> {
        self.single_in_role(event_uuid, ParticipantRole::Child)
    }

    /// Person whose death the event records.
    pub fn subject(&self, event_uuid: EventId) -> GenealogyResult<Option<Person>> {
        self.single_in_role(event_uuid, ParticipantRole::Subject)
    }

    pub fn resident(&self, event_uuid: EventId) -> GenealogyResult<Option<Person>> {
        self.single_in_role(event_uuid, ParticipantRole::Resident)
    }

    fn persons_in_role(
        &self,
        event_uuid: EventId,
        role: ParticipantRole,
    ) -> GenealogyResult<Vec<Person>> {
        let person_uuids: Vec<PersonId> = self
            .participants(event_uuid)?
            .into_iter()
            .filter(|participant| participant.role == role)
            .map(|participant| participant.person_uuid)
            .collect();
        self.repo.get_persons(&person_uuids).map_err(Into::into)
    }

    fn single_in_role(
        &self,
        event_uuid: EventId,
        role: ParticipantRole,
    ) -> GenealogyResult<Option<Person>> {
        Ok(self.persons_in_role(event_uuid, role)?.into_iter().next())
    }

    /// Birth of `person_uuid`, if recorded.
    pub fn birth_of(&self, person_uuid: PersonId) -> GenealogyResult<Option<Event>> {
        self.singleton_of(person_uuid, EventKind::Birth)
    }

    pub fn death_of(&self, person_uuid: PersonId) -> GenealogyResult<Option<Event>> {
        self.singleton_of(person_uuid, EventKind::Death)
    }

    /// Adoption of `person_uuid` as child, if recorded.
    pub fn adoption_of(&self, person_uuid: PersonId) -> GenealogyResult<Option<Event>> {
        self.singleton_of(person_uuid, EventKind::Adoption)
    }

    pub fn marriages_of(&self, person_uuid: PersonId) -> GenealogyResult<Vec<Event>> {
        self.events_of(person_uuid, EventKind::Marriage, ParticipantRole::Spouse)
    }

    pub fn divorces_of(&self, person_uuid: PersonId) -> GenealogyResult<Vec<Event>> {
        self.events_of(person_uuid, EventKind::Divorce, ParticipantRole::Spouse)
    }

    pub fn residences_of(&self, person_uuid: PersonId) -> GenealogyResult<Vec<Event>> {
        self.events_of(person_uuid, EventKind::Lived, ParticipantRole::Resident)
    }

    /// Births where `person_uuid` is a parent.
    pub fn births_as_parent(&self, person_uuid: PersonId) -> GenealogyResult<Vec<Event>> {
        self.events_of(person_uuid, EventKind::Birth, ParticipantRole::Parent)
    }

    /// Adoptions where `person_uuid` is an adoptive parent.
    pub fn adoptions_as_parent(&self, person_uuid: PersonId) -> GenealogyResult<Vec<Event>> {
        self.events_of(person_uuid, EventKind::Adoption, ParticipantRole::Parent)
    }

    fn singleton_of(&self, person_uuid: PersonId, kind: EventKind) -> GenealogyResult<Option<Event>> {
        let mut events = self.events_of(person_uuid, kind, kind.anchor_role())?;
        if events.len() > 1 {
            return Err(GenealogyError::Storage(RepoError::InvalidData(format!(
                "person {person_uuid} holds {} {kind} events",
                events.len()
            ))));
        }
        Ok(events.pop())
    }

    fn events_of(
        &self,
        person_uuid: PersonId,
        kind: EventKind,
        role: ParticipantRole,
    ) -> GenealogyResult<Vec<Event>> {
        self.get_person(person_uuid)?;
        self.repo
            .list_events_for(person_uuid, kind, role)
            .map_err(Into::into)
    }
}

fn normalize_name(value: String) -> GenealogyResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(GenealogyError::InvalidName);
    }
    Ok(trimmed.to_string())
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

#[cfg(test)]
mod tests {
    use super::{normalize_name, normalize_optional, GenealogyError};
    use crate::model::event::EventKind;
    use crate::repo::genealogy_repo::{EntityKind, RepoError};
    use uuid::Uuid;

    #[test]
    fn names_are_trimmed_and_required() {
        assert_eq!(normalize_name("  Ada ".to_string()).unwrap(), "Ada");
        assert!(matches!(
            normalize_name(" \t".to_string()),
            Err(GenealogyError::InvalidName)
        ));
    }

    #[test]
    fn blank_optional_text_becomes_none() {
        assert_eq!(normalize_optional(Some("  ".to_string())), None);
        assert_eq!(
            normalize_optional(Some(" Madrid ".to_string())).as_deref(),
            Some("Madrid")
        );
    }

    #[test]
    fn repo_errors_map_to_domain_errors() {
        let id = Uuid::new_v4();
        assert!(matches!(
            GenealogyError::from(RepoError::NotFound(EntityKind::Tree, id)),
            GenealogyError::TreeNotFound(found) if found == id
        ));
        assert!(matches!(
            GenealogyError::from(RepoError::DuplicateEvent {
                person_uuid: id,
                kind: EventKind::Death,
            }),
            GenealogyError::DuplicateEvent {
                kind: EventKind::Death,
                ..
            }
        ));
        assert!(matches!(
            GenealogyError::from(RepoError::InvalidData("bad".to_string())),
            GenealogyError::Storage(_)
        ));
    }
}
