use geneu_core::db::open_db_in_memory;
use geneu_core::{
    DateInterval, EventDetails, GenealogyError, GenealogyService, Location, NewPerson, NewTree,
    PartialDate, PersonId, RelationKind, SimilarityService, SqliteGenealogyRepository, TreeId,
};
use rusqlite::Connection;
use uuid::Uuid;

struct Fixture<'conn> {
    genealogy: GenealogyService<SqliteGenealogyRepository<'conn>>,
    similarity: SimilarityService<SqliteGenealogyRepository<'conn>>,
    tree_uuid: TreeId,
}

impl<'conn> Fixture<'conn> {
    fn new(conn: &'conn Connection) -> Self {
        let genealogy = GenealogyService::new(SqliteGenealogyRepository::try_new(conn).unwrap());
        let similarity = SimilarityService::new(SqliteGenealogyRepository::try_new(conn).unwrap());
        let tree_uuid = genealogy.create_tree(NewTree::new("Town")).unwrap().uuid;
        Self {
            genealogy,
            similarity,
            tree_uuid,
        }
    }

    fn person(&self, name: &str) -> PersonId {
        self.genealogy
            .create_person(NewPerson::new(name, self.tree_uuid))
            .unwrap()
            .uuid
    }

    fn lived(&self, person: PersonId, place: &[&str], begin: PartialDate, end: PartialDate) {
        self.genealogy
            .record_residence(person, details(place, begin, end))
            .unwrap();
    }

    fn similar(&self, person: PersonId, relation: RelationKind) -> Vec<PersonId> {
        self.similarity
            .find_similar(person, relation)
            .unwrap()
            .into_iter()
            .map(|found| found.uuid)
            .collect()
    }
}

fn details(place: &[&str], begin: PartialDate, end: PartialDate) -> EventDetails {
    EventDetails::new(DateInterval::new(Some(begin), Some(end)).unwrap())
        .at(Location::new(place.iter().copied()).unwrap())
}

fn ymd(year: i32, month: u8, day: u8) -> PartialDate {
    PartialDate::ymd(year, month, day).unwrap()
}

fn year(value: i32) -> PartialDate {
    PartialDate::year(value)
}

const MADRID: &[&str] = &["Calle Mayor 1", "Madrid", "Spain"];
const LISBOA: &[&str] = &["Rua Augusta 5", "Lisboa", "Portugal"];

#[test]
fn co_located_overlapping_residents_are_found() {
    let conn = open_db_in_memory().unwrap();
    let fx = Fixture::new(&conn);
    let ana = fx.person("Ana");
    let bea = fx.person("Bea");
    let cruz = fx.person("Cruz");
    let dario = fx.person("Dario");

    fx.lived(ana, MADRID, year(1950), year(1960));
    fx.lived(ana, MADRID, year(1962), year(1965));
    fx.lived(bea, MADRID, year(1955), year(1964));
    fx.lived(cruz, MADRID, year(1940), year(1970));
    fx.lived(dario, LISBOA, year(1950), year(1960));

    let found = fx.similar(ana, RelationKind::LivedIn);
    assert_eq!(found, vec![bea, cruz]);
    assert!(!found.contains(&ana));
    assert!(!found.contains(&dario));

    let residents: Vec<PersonId> = fx
        .similarity
        .find_similar_residents(ana)
        .unwrap()
        .into_iter()
        .map(|found| found.uuid)
        .collect();
    assert_eq!(residents, found);
}

#[test]
fn repeated_queries_return_identical_results() {
    let conn = open_db_in_memory().unwrap();
    let fx = Fixture::new(&conn);
    let ana = fx.person("Ana");
    let bea = fx.person("Bea");
    fx.lived(ana, MADRID, year(1950), year(1960));
    fx.lived(bea, MADRID, year(1955), year(1958));

    let first = fx.similarity.find_similar(ana, RelationKind::LivedIn).unwrap();
    let second = fx.similarity.find_similar(ana, RelationKind::LivedIn).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.len(), 1);
}

#[test]
fn disjoint_intervals_do_not_match() {
    let conn = open_db_in_memory().unwrap();
    let fx = Fixture::new(&conn);
    let ana = fx.person("Ana");
    let bea = fx.person("Bea");
    fx.lived(ana, MADRID, ymd(2020, 1, 1), ymd(2020, 2, 1));
    fx.lived(bea, MADRID, ymd(2020, 2, 1), ymd(2020, 3, 1));

    assert!(fx.similar(ana, RelationKind::LivedIn).is_empty());
}

#[test]
fn overlap_is_tested_against_the_queried_person_interval() {
    let conn = open_db_in_memory().unwrap();
    let fx = Fixture::new(&conn);
    let later = fx.person("Later");
    let earlier = fx.person("Earlier");
    fx.lived(later, MADRID, ymd(2020, 2, 1), ymd(2020, 3, 1));
    fx.lived(earlier, MADRID, ymd(2020, 1, 1), ymd(2020, 2, 1));

    assert_eq!(fx.similar(later, RelationKind::LivedIn), vec![earlier]);
    assert!(fx.similar(earlier, RelationKind::LivedIn).is_empty());
}

#[test]
fn wholly_containing_interval_matches() {
    let conn = open_db_in_memory().unwrap();
    let fx = Fixture::new(&conn);
    let short = fx.person("Short");
    let long = fx.person("Long");
    fx.lived(short, MADRID, ymd(2020, 1, 1), ymd(2020, 1, 10));
    fx.lived(long, MADRID, ymd(2019, 1, 1), ymd(2021, 1, 1));

    assert_eq!(fx.similar(short, RelationKind::LivedIn), vec![long]);
    assert_eq!(fx.similar(long, RelationKind::LivedIn), vec![short]);
}

#[test]
fn location_and_kind_must_both_match() {
    let conn = open_db_in_memory().unwrap();
    let fx = Fixture::new(&conn);
    let ana = fx.person("Ana");
    let bea = fx.person("Bea");
    let cruz = fx.person("Cruz");

    fx.lived(ana, MADRID, year(1950), year(1960));
    fx.genealogy
        .record_birth(bea, details(MADRID, year(1955), year(1955)), &[])
        .unwrap();
    fx.genealogy
        .record_residence(
            cruz,
            EventDetails::new(
                DateInterval::new(Some(year(1950)), Some(year(1960))).unwrap(),
            )
            .labelled("Calle Mayor 1, Madrid"),
        )
        .unwrap();

    assert!(fx.similar(ana, RelationKind::LivedIn).is_empty());
    assert!(fx.similar(cruz, RelationKind::LivedIn).is_empty());
}

#[test]
fn parents_match_across_births_but_not_within_one() {
    let conn = open_db_in_memory().unwrap();
    let fx = Fixture::new(&conn);
    let mother = fx.person("Maria");
    let father = fx.person("Jose");
    let other_mother = fx.person("Elena");
    let first_child = fx.person("Pablo");
    let second_child = fx.person("Lucia");
    let hospital = ["Hospital General", "Madrid"];

    fx.genealogy
        .record_birth(
            first_child,
            details(&hospital, ymd(1980, 5, 1), ymd(1980, 5, 1)),
            &[mother, father],
        )
        .unwrap();
    fx.genealogy
        .record_birth(
            second_child,
            details(&hospital, year(1980), year(1980)),
            &[other_mother],
        )
        .unwrap();

    assert_eq!(fx.similar(mother, RelationKind::ParentOf), vec![other_mother]);
    assert_eq!(
        fx.similar(other_mother, RelationKind::ParentOf),
        vec![father, mother]
    );
    assert_eq!(fx.similar(first_child, RelationKind::Born), vec![second_child]);
}

#[test]
fn couples_married_together_are_matched() {
    let conn = open_db_in_memory().unwrap();
    let fx = Fixture::new(&conn);
    let ana = fx.person("Ana");
    let luis = fx.person("Luis");
    let marta = fx.person("Marta");
    let pedro = fx.person("Pedro");
    let church = ["San Gines", "Madrid"];

    fx.genealogy
        .record_marriage(ana, luis, details(&church, ymd(1970, 6, 1), ymd(1970, 6, 1)))
        .unwrap();
    fx.genealogy
        .record_marriage(marta, pedro, details(&church, year(1970), year(1970)))
        .unwrap();

    assert_eq!(fx.similar(ana, RelationKind::Married), vec![marta, pedro]);
    assert!(fx.similar(ana, RelationKind::Divorced).is_empty());
}

#[test]
fn unknown_person_is_an_error() {
    let conn = open_db_in_memory().unwrap();
    let fx = Fixture::new(&conn);
    assert!(matches!(
        fx.similarity.find_similar(Uuid::new_v4(), RelationKind::LivedIn),
        Err(GenealogyError::PersonNotFound(_))
    ));
}

#[test]
fn places_differing_only_in_component_split_do_not_match() {
    let conn = open_db_in_memory().unwrap();
    let fx = Fixture::new(&conn);
    let ana = fx.person("Ana");
    let bea = fx.person("Bea");
    let cruz = fx.person("Cruz");
    fx.lived(ana, &["Calle A | Madrid"], year(1950), year(1960));
    fx.lived(bea, &["Calle A", "Madrid"], year(1950), year(1960));
    fx.lived(cruz, &["calle a", "MADRID"], year(1955), year(1958));

    assert!(fx.similar(ana, RelationKind::LivedIn).is_empty());
    assert_eq!(fx.similar(bea, RelationKind::LivedIn), vec![cruz]);
}
