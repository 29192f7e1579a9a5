use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::QueryError;
use crate::roster::{Roster, Student};

/// Field a roster can be ranked by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Metric {
    Total,
    Average,
    Gpa,
    /// A single subject's score, by subject name.
    Subject(String),
}

impl FromStr for Metric {
    type Err = QueryError;

    /// `total`, `average` and `gpa` (any case) pick the derived fields; any
    /// other non-blank name is taken as a subject. `subject:<name>` always
    /// names a subject, even one called `total`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(name) = s.strip_prefix("subject:") {
            let name = name.trim();
            if name.is_empty() {
                return Err(QueryError::UnknownMetric(s.to_string()));
            }
            return Ok(Metric::Subject(name.to_string()));
        }
        match s.to_ascii_lowercase().as_str() {
            "total" => Ok(Metric::Total),
            "average" | "avg" => Ok(Metric::Average),
            "gpa" => Ok(Metric::Gpa),
            "" => Err(QueryError::UnknownMetric(s.to_string())),
            _ => Ok(Metric::Subject(s.to_string())),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Total => f.write_str("Total"),
            Metric::Average => f.write_str("Average"),
            Metric::Gpa => f.write_str("GPA"),
            Metric::Subject(name) => f.write_str(name),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Order {
    /// Lowest first: students needing attention.
    Ascending,
    /// Highest first: top performers.
    Descending,
}

/// Number of students to return from a ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankLimit(usize);

impl RankLimit {
    pub fn new(limit: usize) -> Self {
        RankLimit(limit)
    }

    pub fn get(self) -> usize {
        self.0
    }
}

impl TryFrom<i64> for RankLimit {
    type Error = QueryError;

    fn try_from(limit: i64) -> Result<Self, Self::Error> {
        usize::try_from(limit)
            .map(RankLimit)
            .map_err(|_| QueryError::InvalidLimit(limit))
    }
}

/// Resolves a metric against a roster into a per-student value getter.
fn metric_getter(
    roster: &Roster,
    metric: &Metric,
) -> Result<impl Fn(&Student) -> Option<f64>, QueryError> {
    let subject = match metric {
        Metric::Subject(name) => Some(
            roster
                .subjects()
                .index_of(name)
                .ok_or_else(|| QueryError::UnknownMetric(name.clone()))?,
        ),
        _ => None,
    };
    let metric = metric.clone();

    Ok(move |s: &Student| match (&metric, subject) {
        (Metric::Total, _) => Some(s.total()),
        (Metric::Average, _) => s.average(),
        (Metric::Gpa, _) => s.gpa(),
        (Metric::Subject(_), Some(idx)) => s.score(idx),
        (Metric::Subject(_), None) => None,
    })
}

/// Undefined values sort after every defined one, whatever the order.
fn compare(a: Option<f64>, b: Option<f64>, order: Order) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => match order {
            Order::Ascending => a.total_cmp(&b),
            Order::Descending => b.total_cmp(&a),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Ranks a view of the roster by `metric` and keeps the first `limit`
/// students. The sort is stable, so ties keep roster order. The roster itself
/// is not reordered.
pub fn rank_by<'a>(
    roster: &'a Roster,
    metric: &Metric,
    order: Order,
    limit: RankLimit,
) -> Result<Vec<&'a Student>, QueryError> {
    let value = metric_getter(roster, metric)?;

    let mut view: Vec<&Student> = roster.students().iter().collect();
    view.sort_by(|a, b| compare(value(a), value(b), order));
    view.truncate(limit.get());

    Ok(view)
}

/// Lowest and highest performers side by side.
#[derive(Debug)]
pub struct TopBottom<'a> {
    /// Ascending, worst first.
    pub bottom: Vec<&'a Student>,
    /// Descending, best first.
    pub top: Vec<&'a Student>,
}

pub fn top_and_bottom<'a>(
    roster: &'a Roster,
    metric: &Metric,
    limit: RankLimit,
) -> Result<TopBottom<'a>, QueryError> {
    Ok(TopBottom {
        bottom: rank_by(roster, metric, Order::Ascending, limit)?,
        top: rank_by(roster, metric, Order::Descending, limit)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::{Grading, SubjectSet};

    fn roster(rows: &[(&str, Vec<Option<f64>>)]) -> Roster {
        let grading = Grading::default();
        let subjects = SubjectSet::new(vec!["MATH".into(), "CS101".into()]).unwrap();
        let students = rows
            .iter()
            .map(|(name, scores)| Student::new(*name, scores.clone(), vec![], &grading))
            .collect();
        Roster::new(subjects, grading, students)
    }

    fn names(students: &[&Student]) -> Vec<String> {
        students.iter().map(|s| s.name().to_string()).collect()
    }

    fn twelve() -> Roster {
        let rows: Vec<(String, Vec<Option<f64>>)> = (0..12)
            .map(|i| (format!("S{i:02}"), vec![Some(((i * 7) % 12) as f64 * 5.0), Some(10.0)]))
            .collect();
        let borrowed: Vec<(&str, Vec<Option<f64>>)> =
            rows.iter().map(|(n, s)| (n.as_str(), s.clone())).collect();
        roster(&borrowed)
    }

    #[test]
    fn test_metric_from_str() {
        assert_eq!("Total".parse::<Metric>().unwrap(), Metric::Total);
        assert_eq!("avg".parse::<Metric>().unwrap(), Metric::Average);
        assert_eq!("GPA".parse::<Metric>().unwrap(), Metric::Gpa);
        assert_eq!(
            "MATH".parse::<Metric>().unwrap(),
            Metric::Subject("MATH".into())
        );
        assert!(" ".parse::<Metric>().is_err());
    }

    #[test]
    fn test_subject_prefix_reaches_keyword_named_subject() {
        assert_eq!(
            "subject:Total".parse::<Metric>().unwrap(),
            Metric::Subject("Total".into())
        );
        assert!("subject: ".parse::<Metric>().is_err());

        let grading = Grading::default();
        let subjects = SubjectSet::new(vec!["gpa".into()]).unwrap();
        let students = vec![
            Student::new("Low", vec![Some(20.0)], vec![], &grading),
            Student::new("High", vec![Some(80.0)], vec![], &grading),
        ];
        let r = Roster::new(subjects, grading, students);

        let metric: Metric = "subject:gpa".parse().unwrap();
        let top = rank_by(&r, &metric, Order::Descending, RankLimit::new(1)).unwrap();
        assert_eq!(top[0].name(), "High");
    }

    #[test]
    fn test_negative_limit_rejected() {
        assert_eq!(RankLimit::try_from(-1i64), Err(QueryError::InvalidLimit(-1)));
        assert_eq!(RankLimit::try_from(3i64).unwrap().get(), 3);
    }

    #[test]
    fn test_rank_descending_and_ascending() {
        let r = roster(&[
            ("A", vec![Some(90.0), Some(80.0)]),
            ("B", vec![None, Some(40.0)]),
            ("C", vec![Some(70.0), Some(70.0)]),
        ]);
        let top = rank_by(&r, &Metric::Total, Order::Descending, RankLimit::new(2)).unwrap();
        assert_eq!(names(&top), vec!["A", "C"]);

        let bottom = rank_by(&r, &Metric::Total, Order::Ascending, RankLimit::new(2)).unwrap();
        assert_eq!(names(&bottom), vec!["B", "C"]);
    }

    #[test]
    fn test_rank_is_stable_on_ties() {
        let r = roster(&[
            ("first", vec![Some(50.0), None]),
            ("second", vec![Some(50.0), None]),
            ("third", vec![Some(50.0), None]),
        ]);
        let asc = rank_by(&r, &Metric::Total, Order::Ascending, RankLimit::new(10)).unwrap();
        let desc = rank_by(&r, &Metric::Total, Order::Descending, RankLimit::new(10)).unwrap();
        assert_eq!(names(&asc), vec!["first", "second", "third"]);
        assert_eq!(names(&desc), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_undefined_average_sorts_last() {
        let r = roster(&[
            ("ghost", vec![None, None]),
            ("low", vec![Some(10.0), None]),
            ("high", vec![Some(90.0), None]),
        ]);
        let asc = rank_by(&r, &Metric::Average, Order::Ascending, RankLimit::new(3)).unwrap();
        let desc = rank_by(&r, &Metric::Average, Order::Descending, RankLimit::new(3)).unwrap();
        assert_eq!(names(&asc), vec!["low", "high", "ghost"]);
        assert_eq!(names(&desc), vec!["high", "low", "ghost"]);
    }

    #[test]
    fn test_limit_larger_than_roster() {
        let r = roster(&[("A", vec![Some(1.0), None])]);
        let all = rank_by(&r, &Metric::Total, Order::Descending, RankLimit::new(50)).unwrap();
        assert_eq!(all.len(), 1);
    }

    #[test]
    fn test_empty_roster() {
        let r = roster(&[]);
        let none = rank_by(&r, &Metric::Average, Order::Ascending, RankLimit::new(5)).unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn test_unknown_subject() {
        let r = roster(&[]);
        let err = rank_by(&r, &Metric::Subject("ART".into()), Order::Ascending, RankLimit::new(5))
            .unwrap_err();
        assert_eq!(err, QueryError::UnknownMetric("ART".into()));
    }

    #[test]
    fn test_rank_by_subject() {
        let r = roster(&[
            ("A", vec![Some(60.0), Some(99.0)]),
            ("B", vec![Some(80.0), Some(10.0)]),
            ("C", vec![None, Some(50.0)]),
        ]);
        let top = rank_by(
            &r,
            &Metric::Subject("MATH".into()),
            Order::Descending,
            RankLimit::new(3),
        )
        .unwrap();
        assert_eq!(names(&top), vec!["B", "A", "C"]);
    }

    #[test]
    fn test_top_and_bottom_partition_sorted_order() {
        let r = twelve();
        let full = rank_by(&r, &Metric::Total, Order::Ascending, RankLimit::new(12)).unwrap();
        let tb = top_and_bottom(&r, &Metric::Total, RankLimit::new(5)).unwrap();

        let bottom = names(&tb.bottom);
        let top = names(&tb.top);
        assert!(bottom.iter().all(|n| !top.contains(n)));

        let mut rebuilt = bottom.clone();
        rebuilt.extend(names(&full[5..7]));
        rebuilt.extend(top.into_iter().rev());
        assert_eq!(rebuilt, names(&full));
    }

    #[test]
    fn test_source_roster_unchanged() {
        let r = twelve();
        let before = names(&r.students().iter().collect::<Vec<_>>());
        rank_by(&r, &Metric::Total, Order::Descending, RankLimit::new(3)).unwrap();
        assert_eq!(names(&r.students().iter().collect::<Vec<_>>()), before);
    }
}
