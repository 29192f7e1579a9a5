//! Versioned snapshot holder for the current roster.
//!
//! Readers take an `Arc<Roster>` and keep using it for as long as they like;
//! a reload or edit publishes a new snapshot and never touches one that has
//! already been handed out.

use std::sync::{Arc, PoisonError, RwLock};
use tracing::info;

use crate::error::QueryError;
use crate::roster::Roster;

pub struct RosterStore {
    current: RwLock<Arc<Roster>>,
}

impl RosterStore {
    /// Publishes `roster` as version 1.
    pub fn new(roster: Roster) -> Self {
        Self {
            current: RwLock::new(Arc::new(roster.with_version(1))),
        }
    }

    /// The roster currently published.
    pub fn snapshot(&self) -> Arc<Roster> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Swaps in a whole new roster, as after a reload. Returns its version.
    pub fn replace(&self, roster: Roster) -> u64 {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        let version = current.version() + 1;
        *current = Arc::new(roster.with_version(version));

        info!(version, students = current.len(), "Roster snapshot replaced");
        version
    }

    /// Publishes a copy of the current roster with one score changed.
    pub fn update_score(
        &self,
        student: usize,
        subject: &str,
        score: Option<f64>,
    ) -> Result<u64, QueryError> {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        let version = current.version() + 1;
        let next = current.with_score(student, subject, score)?;
        *current = Arc::new(next.with_version(version));

        info!(version, student, subject, "Score updated");
        Ok(version)
    }
}
