//! Temporal overlap predicate between two event intervals.
//!
//! # Responsibility
//! - Decide whether a point falls inside an interval, case by case on the
//!   interval's shape (single month, single year, several years).
//! - Combine point tests into the overlap relation used by similarity search.
//!
//! # Invariants
//! - Begin bounds are inclusive, end bounds are exclusive.
//! - Open bounds extend to the beginning/end of time.
//! - `intervals_overlap(a, b)` is deliberately asymmetric: it holds when
//!   either bound of `b` lies inside `a`, or when both bounds of `a` lie
//!   inside `b`. Callers pass their own interval as `a`.
//!
//! All functions are pure.

use crate::model::calendar::{DateInterval, DatePoint};

/// Returns whether `point` lies in `[begin, end)`.
pub fn point_inside(begin: DatePoint, end: DatePoint, point: DatePoint) -> bool {
    if begin.year == end.year {
        if begin.month == end.month {
            single_month_contains(begin, end, point)
        } else if begin.month < end.month {
            single_year_contains(begin, end, point)
        } else {
            false
        }
    } else if begin.year < end.year {
        multi_year_contains(begin, end, point)
    } else {
        false
    }
}

fn single_month_contains(begin: DatePoint, end: DatePoint, point: DatePoint) -> bool {
    point.year == begin.year
        && point.month == begin.month
        && point.day >= begin.day
        && point.day < end.day
}

fn single_year_contains(begin: DatePoint, end: DatePoint, point: DatePoint) -> bool {
    if point.year != begin.year {
        return false;
    }
    (point.month == begin.month && point.day >= begin.day)
        || (point.month > begin.month && point.month < end.month)
        || (point.month == end.month && point.day < end.day)
}

fn multi_year_contains(begin: DatePoint, end: DatePoint, point: DatePoint) -> bool {
    let in_first_year = point.year == begin.year
        && (point.month > begin.month
            || (point.month == begin.month && point.day >= begin.day));
    let in_middle_years = point.year > begin.year && point.year < end.year;
    let in_last_year = point.year == end.year
        && (point.month < end.month || (point.month == end.month && point.day < end.day));
    in_first_year || in_middle_years || in_last_year
}

/// Overlap of interval `b` against interval `a` on resolved points.
pub fn points_overlap(
    begin_a: DatePoint,
    end_a: DatePoint,
    begin_b: DatePoint,
    end_b: DatePoint,
) -> bool {
    point_inside(begin_a, end_a, begin_b)
        || point_inside(begin_a, end_a, end_b)
        || (point_inside(begin_b, end_b, begin_a) && point_inside(begin_b, end_b, end_a))
}

/// Overlap of interval `b` against interval `a`.
pub fn intervals_overlap(a: &DateInterval, b: &DateInterval) -> bool {
    points_overlap(a.begin_point(), a.end_point(), b.begin_point(), b.end_point())
}

#[cfg(test)]
mod tests {
    use super::{intervals_overlap, point_inside, points_overlap};
    use crate::model::calendar::{BoundSide, DateInterval, DatePoint, PartialDate};
    use proptest::prelude::*;

    fn ymd(year: i32, month: u8, day: u8) -> PartialDate {
        PartialDate::ymd(year, month, day).unwrap()
    }

    fn span(begin: PartialDate, end: PartialDate) -> DateInterval {
        DateInterval::new(Some(begin), Some(end)).unwrap()
    }

    fn at(date: PartialDate) -> DateInterval {
        span(date, date)
    }

    fn begin_of(date: PartialDate) -> DatePoint {
        DatePoint::resolve(Some(&date), BoundSide::Begin)
    }

    fn contains(interval: &DateInterval, point: DatePoint) -> bool {
        point_inside(interval.begin_point(), interval.end_point(), point)
    }

    #[test]
    fn single_month_contains_point() {
        let a = span(ymd(2020, 3, 5), ymd(2020, 3, 20));
        assert!(intervals_overlap(&a, &at(ymd(2020, 3, 10))));
    }

    #[test]
    fn single_month_excludes_later_point() {
        let a = span(ymd(2020, 3, 5), ymd(2020, 3, 20));
        assert!(!intervals_overlap(&a, &at(ymd(2020, 4, 1))));
    }

    #[test]
    fn single_month_end_day_is_exclusive() {
        let a = span(ymd(2020, 3, 5), ymd(2020, 3, 20));
        assert!(contains(&a, begin_of(ymd(2020, 3, 5))));
        assert!(contains(&a, begin_of(ymd(2020, 3, 19))));
        assert!(!contains(&a, begin_of(ymd(2020, 3, 20))));
    }

    #[test]
    fn single_year_middle_month() {
        let a = span(ymd(2020, 2, 10), ymd(2020, 5, 1));
        let b = span(ymd(2020, 3, 15), ymd(2020, 8, 1));
        assert!(intervals_overlap(&a, &b));
    }

    #[test]
    fn single_year_edge_months() {
        let a = span(ymd(2020, 2, 10), ymd(2020, 5, 10));
        assert!(!contains(&a, begin_of(ymd(2020, 2, 9))));
        assert!(contains(&a, begin_of(ymd(2020, 2, 10))));
        assert!(contains(&a, begin_of(ymd(2020, 5, 9))));
        assert!(!contains(&a, begin_of(ymd(2020, 5, 10))));
    }

    #[test]
    fn multi_year_middle_year() {
        let a = span(ymd(2019, 11, 1), ymd(2021, 2, 1));
        let b = span(ymd(2020, 6, 1), ymd(2022, 1, 1));
        assert!(intervals_overlap(&a, &b));
    }

    #[test]
    fn multi_year_first_and_last_year() {
        let a = span(ymd(2019, 11, 1), ymd(2021, 2, 1));
        assert!(contains(&a, begin_of(ymd(2019, 12, 1))));
        assert!(!contains(&a, begin_of(ymd(2019, 10, 31))));
        assert!(contains(&a, begin_of(ymd(2021, 1, 31))));
        assert!(!contains(&a, begin_of(ymd(2021, 2, 1))));
    }

    #[test]
    fn wholly_containing_interval_overlaps() {
        let a = span(ymd(2020, 1, 1), ymd(2020, 1, 10));
        let b = span(ymd(2019, 1, 1), ymd(2021, 1, 1));
        assert!(intervals_overlap(&a, &b));
    }

    #[test]
    fn adjacent_later_interval_does_not_overlap() {
        let a = span(ymd(2020, 1, 1), ymd(2020, 2, 1));
        let b = span(ymd(2020, 2, 1), ymd(2020, 3, 1));
        assert!(!intervals_overlap(&a, &b));
    }

    #[test]
    fn adjacent_earlier_interval_overlaps_through_its_end_bound() {
        // b's exclusive end equals a's inclusive begin, and the end-bound test
        // treats that point as inside a.
        let a = span(ymd(2020, 2, 1), ymd(2020, 3, 1));
        let b = span(ymd(2020, 1, 1), ymd(2020, 2, 1));
        assert!(intervals_overlap(&a, &b));
        assert!(!intervals_overlap(&b, &a));
    }

    #[test]
    fn year_only_bounds_cover_whole_year() {
        let a = span(PartialDate::year(1950), PartialDate::year(1950));
        assert!(intervals_overlap(&a, &at(ymd(1950, 12, 31))));
        assert!(!intervals_overlap(&a, &at(ymd(1951, 1, 1))));
    }

    #[test]
    fn open_end_extends_forever() {
        let a = DateInterval::new(Some(ymd(1900, 1, 1)), None).unwrap();
        assert!(intervals_overlap(&a, &at(ymd(2400, 6, 1))));
        assert!(!intervals_overlap(&a, &at(ymd(1899, 12, 30))));
    }

    #[test]
    fn unbounded_interval_overlaps_everything() {
        let a = DateInterval::unbounded();
        assert!(intervals_overlap(&a, &at(ymd(1700, 1, 1))));
        assert!(intervals_overlap(&at(ymd(1700, 1, 1)), &a));
        assert!(intervals_overlap(&a, &DateInterval::unbounded()));
    }

    #[test]
    fn inverted_interval_contains_nothing() {
        let begin = begin_of(ymd(2020, 5, 1));
        let end = DatePoint::resolve(Some(&ymd(2020, 3, 1)), BoundSide::End);
        assert!(!point_inside(begin, end, begin_of(ymd(2020, 4, 1))));
    }

    fn date_point() -> impl Strategy<Value = DatePoint> {
        (1990i64..2010, 1u8..=13, 1u8..=32).prop_map(|(year, month, day)| DatePoint {
            year,
            month,
            day,
        })
    }

    proptest! {
        /// The case analysis agrees with lexicographic half-open containment.
        #[test]
        fn prop_point_inside_matches_ordering(
            begin in date_point(),
            end in date_point(),
            point in date_point()
        ) {
            let expected = begin <= point && point < end;
            prop_assert_eq!(point_inside(begin, end, point), expected);
        }

        /// Whenever two half-open ranges intersect, the predicate holds in at
        /// least one direction.
        #[test]
        fn prop_intersection_is_detected(
            a in (date_point(), date_point()),
            b in (date_point(), date_point())
        ) {
            let (begin_a, end_a) = if a.0 <= a.1 { a } else { (a.1, a.0) };
            let (begin_b, end_b) = if b.0 <= b.1 { b } else { (b.1, b.0) };
            if begin_a.max(begin_b) < end_a.min(end_b) {
                prop_assert!(
                    points_overlap(begin_a, end_a, begin_b, end_b)
                        || points_overlap(begin_b, end_b, begin_a, end_a)
                );
            }
        }
    }
}
