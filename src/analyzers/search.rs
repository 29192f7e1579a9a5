use crate::error::QueryError;
use crate::roster::{Roster, Student};

/// Result of a name search. An empty result is a normal outcome, not an error.
#[derive(Debug)]
pub enum SearchOutcome<'a> {
    Found(Vec<&'a Student>),
    NoResults,
}

impl<'a> SearchOutcome<'a> {
    pub fn students(&self) -> &[&'a Student] {
        match self {
            SearchOutcome::Found(students) => students,
            SearchOutcome::NoResults => &[],
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, SearchOutcome::NoResults)
    }
}

/// Case-insensitive substring search over student names, in roster order.
/// An empty query matches every student.
///
/// # Errors
///
/// Returns [`QueryError::MalformedQuery`] if the query contains control
/// characters.
pub fn find_by_name<'a>(roster: &'a Roster, query: &str) -> Result<SearchOutcome<'a>, QueryError> {
    if query.chars().any(char::is_control) {
        return Err(QueryError::MalformedQuery(query.to_string()));
    }

    let needle = query.to_lowercase();
    let matches: Vec<&Student> = roster
        .students()
        .iter()
        .filter(|s| s.name().to_lowercase().contains(&needle))
        .collect();

    if matches.is_empty() {
        Ok(SearchOutcome::NoResults)
    } else {
        Ok(SearchOutcome::Found(matches))
    }
}
