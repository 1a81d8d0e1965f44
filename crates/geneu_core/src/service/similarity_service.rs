//! Similarity query over co-located, time-overlapping events.
//!
//! # Responsibility
//! - Pull co-located candidate event pairs from the repository.
//! - Keep the pairs whose intervals overlap and return the other persons.
//!
//! # Invariants
//! - Read-only: never writes to the store.
//! - The queried person is never part of the result.
//! - Each person appears at most once, ordered by name then id.

use crate::model::event::RelationKind;
use crate::model::person::{Person, PersonId};
use crate::overlap::intervals_overlap;
use crate::repo::genealogy_repo::GenealogyRepository;
use crate::service::genealogy_service::{GenealogyError, GenealogyResult};
use log::info;
use std::collections::BTreeSet;
use std::time::Instant;

/// Similarity query facade.
pub struct SimilarityService<R: GenealogyRepository> {
    repo: R,
}

impl<R: GenealogyRepository> SimilarityService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Finds persons linked by `relation` to an event at the same location
    /// as one of `person_uuid`'s events of that relation, with overlapping
    /// dates.
    ///
    /// Overlap is evaluated with this person's event as the reference
    /// interval; see `overlap::intervals_overlap`.
    pub fn find_similar(
        &self,
        person_uuid: PersonId,
        relation: RelationKind,
    ) -> GenealogyResult<Vec<Person>> {
        let started_at = Instant::now();
        self.repo
            .get_person(person_uuid)?
            .ok_or(GenealogyError::PersonNotFound(person_uuid))?;

        let candidates = self.repo.similar_candidates(person_uuid, relation)?;
        let candidate_count = candidates.len();
        let matched: BTreeSet<PersonId> = candidates
            .into_iter()
            .filter(|candidate| candidate.candidate_person != person_uuid)
            .filter(|candidate| intervals_overlap(&candidate.anchor_dates, &candidate.candidate_dates))
            .map(|candidate| candidate.candidate_person)
            .collect();

        let person_uuids: Vec<PersonId> = matched.into_iter().collect();
        let persons = self.repo.get_persons(&person_uuids)?;
        info!(
            "event=find_similar module=service status=ok relation={relation} candidates={candidate_count} matches={} duration_ms={}",
            persons.len(),
            started_at.elapsed().as_millis()
        );
        Ok(persons)
    }

    /// `find_similar` for residence records.
    pub fn find_similar_residents(&self, person_uuid: PersonId) -> GenealogyResult<Vec<Person>> {
        self.find_similar(person_uuid, RelationKind::LivedIn)
    }
}
