//! In-memory roster model.
//!
//! A [`Roster`] is an immutable snapshot: once built, nothing mutates it.
//! Edits go through [`Roster::with_score`], which returns a fresh roster with
//! the affected student's derived fields recomputed. Snapshots are published
//! through [`crate::store::RosterStore`].

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::analyzers::aggregate::{compute_average, compute_total};
use crate::analyzers::grade::{GpaScale, Status, compute_gpa, compute_status};
use crate::config::{EngineConfig, check_subjects};
use crate::error::{ConfigError, QueryError};

/// Columns computed from the scores. A source column with one of these names
/// is recomputed, never carried through.
pub const DERIVED_COLUMNS: [&str; 4] = ["Total", "Average", "GPA", "Status"];

/// Fixed, ordered list of scored columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectSet {
    names: Vec<String>,
}

impl SubjectSet {
    pub fn new(names: Vec<String>) -> Result<Self, ConfigError> {
        check_subjects(&names)?;
        Ok(SubjectSet { names })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn index_of(&self, subject: &str) -> Option<usize> {
        self.names.iter().position(|s| s == subject)
    }
}

/// Parameters that turn an average into GPA and status.
#[derive(Debug, Clone, PartialEq)]
pub struct Grading {
    pub pass_threshold: f64,
    pub gpa_scale: GpaScale,
}

impl Default for Grading {
    fn default() -> Self {
        Grading {
            pass_threshold: 50.0,
            gpa_scale: GpaScale::default(),
        }
    }
}

impl From<&EngineConfig> for Grading {
    fn from(config: &EngineConfig) -> Self {
        Grading {
            pass_threshold: config.pass_threshold,
            gpa_scale: config.gpa_scale.clone(),
        }
    }
}

/// One student. Scores line up with the roster's [`SubjectSet`].
///
/// Total, average, GPA and status are derived from the scores and refreshed
/// whenever a score changes; they cannot be set directly.
#[derive(Debug, Clone, PartialEq)]
pub struct Student {
    name: String,
    scores: Vec<Option<f64>>,
    extra: Vec<(String, String)>,
    total: f64,
    average: Option<f64>,
    gpa: Option<f64>,
    status: Option<Status>,
}

impl Student {
    pub fn new(
        name: impl Into<String>,
        scores: Vec<Option<f64>>,
        extra: Vec<(String, String)>,
        grading: &Grading,
    ) -> Self {
        let mut student = Student {
            name: name.into(),
            scores,
            extra,
            total: 0.0,
            average: None,
            gpa: None,
            status: None,
        };
        student.refresh(grading);
        student
    }

    fn refresh(&mut self, grading: &Grading) {
        self.total = compute_total(&self.scores);
        self.average = compute_average(&self.scores);
        self.gpa = compute_gpa(self.average, &grading.gpa_scale);
        self.status = compute_status(self.average, grading.pass_threshold);
    }

    pub(crate) fn set_score(&mut self, subject: usize, score: Option<f64>, grading: &Grading) {
        self.scores[subject] = score;
        self.refresh(grading);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn scores(&self) -> &[Option<f64>] {
        &self.scores
    }

    pub fn score(&self, subject: usize) -> Option<f64> {
        self.scores.get(subject).copied().flatten()
    }

    /// Non-subject columns carried through from the source table.
    pub fn extra(&self) -> &[(String, String)] {
        &self.extra
    }

    /// Sum of present scores; 0.0 when every score is missing.
    pub fn total(&self) -> f64 {
        self.total
    }

    /// Mean of present scores; `None` when every score is missing.
    pub fn average(&self) -> Option<f64> {
        self.average
    }

    pub fn gpa(&self) -> Option<f64> {
        self.gpa
    }

    pub fn status(&self) -> Option<Status> {
        self.status
    }

    pub fn present_count(&self) -> usize {
        self.scores.iter().flatten().count()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubjectScore {
    pub subject: String,
    pub score: Option<f64>,
}

/// Serializable view of a student with subject names attached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentRecord {
    pub name: String,
    pub scores: Vec<SubjectScore>,
    pub total: f64,
    pub average: Option<f64>,
    pub gpa: Option<f64>,
    pub status: Option<Status>,
}

#[derive(Debug, Clone)]
pub struct Roster {
    version: u64,
    loaded_at: DateTime<Utc>,
    subjects: SubjectSet,
    grading: Grading,
    students: Vec<Student>,
}

impl Roster {
    pub fn new(subjects: SubjectSet, grading: Grading, students: Vec<Student>) -> Self {
        Roster {
            version: 0,
            loaded_at: Utc::now(),
            subjects,
            grading,
            students,
        }
    }

    /// Fallback roster for when the source could not be loaded.
    pub fn empty(subjects: SubjectSet, grading: Grading) -> Self {
        Self::new(subjects, grading, Vec::new())
    }

    pub(crate) fn with_version(mut self, version: u64) -> Self {
        self.version = version;
        self
    }

    /// Returns a copy with one score replaced and that student's derived
    /// fields recomputed. `self` is left untouched.
    pub fn with_score(
        &self,
        student: usize,
        subject: &str,
        score: Option<f64>,
    ) -> Result<Roster, QueryError> {
        let subject_index = self
            .subjects
            .index_of(subject)
            .ok_or_else(|| QueryError::UnknownMetric(subject.to_string()))?;
        if student >= self.students.len() {
            return Err(QueryError::StudentOutOfRange {
                index: student,
                len: self.students.len(),
            });
        }

        let mut next = self.clone();
        next.students[student].set_score(subject_index, score, &self.grading);
        Ok(next)
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    pub fn subjects(&self) -> &SubjectSet {
        &self.subjects
    }

    pub fn grading(&self) -> &Grading {
        &self.grading
    }

    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    /// Scores of one subject for every student, in roster order.
    pub fn subject_column(&self, subject: usize) -> impl Iterator<Item = Option<f64>> + '_ {
        self.students.iter().map(move |s| s.score(subject))
    }

    /// Every present score across all students and subjects.
    pub fn all_scores(&self) -> impl Iterator<Item = f64> + '_ {
        self.students
            .iter()
            .flat_map(|s| s.scores().iter().copied().flatten())
    }

    /// Present per-student averages.
    pub fn averages(&self) -> impl Iterator<Item = f64> + '_ {
        self.students.iter().filter_map(Student::average)
    }

    pub fn record(&self, student: &Student) -> StudentRecord {
        StudentRecord {
            name: student.name.clone(),
            scores: self
                .subjects
                .names()
                .iter()
                .zip(&student.scores)
                .map(|(subject, score)| SubjectScore {
                    subject: subject.clone(),
                    score: *score,
                })
                .collect(),
            total: student.total,
            average: student.average,
            gpa: student.gpa,
            status: student.status,
        }
    }
}
