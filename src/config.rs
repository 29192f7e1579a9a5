//! Engine configuration.
//!
//! Stored as a JSON document on disk; every field is optional and falls back
//! to the defaults below:
//! ```json
//! {
//!   "name_column": "student name",
//!   "subjects": ["CS101", "CS102", "ENG102", "MATH", "SSC1"],
//!   "pass_threshold": 50.0,
//!   "rank_limit": 10,
//!   "letter_scale": { "a": 90.0, "b": 80.0, "c": 70.0, "d": 60.0 }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

use crate::analyzers::distribution::HistogramLayout;
use crate::analyzers::grade::{GpaScale, LetterScale};
use crate::error::ConfigError;
use crate::roster::SubjectSet;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Column holding the student's display name.
    pub name_column: String,
    /// Scored columns, in report order.
    pub subjects: Vec<String>,
    pub pass_threshold: f64,
    pub gpa_scale: GpaScale,
    pub letter_scale: LetterScale,
    pub rank_limit: usize,
    pub cumulative_thresholds: Vec<f64>,
    pub histogram: HistogramLayout,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            name_column: "student name".to_string(),
            subjects: ["CS101", "CS102", "ENG102", "MATH", "SSC1"]
                .into_iter()
                .map(String::from)
                .collect(),
            pass_threshold: 50.0,
            gpa_scale: GpaScale::default(),
            letter_scale: LetterScale::default(),
            rank_limit: 10,
            cumulative_thresholds: vec![100.0, 90.0, 70.0, 50.0, 40.0, 25.0, 0.0],
            histogram: HistogramLayout::default(),
        }
    }
}

impl EngineConfig {
    /// Loads the config from a JSON file at `path` and validates it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: EngineConfig =
            serde_json::from_str(&content).map_err(|source| ConfigError::Json {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;

        debug!(path = %path.display(), subjects = config.subjects.len(), "Config loaded");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.subject_set()?;

        if self.subjects.iter().any(|s| s == &self.name_column) {
            return Err(ConfigError::NameIsSubject(self.name_column.clone()));
        }
        if !self.pass_threshold.is_finite() {
            return Err(ConfigError::BadThreshold(self.pass_threshold));
        }
        if !self.gpa_scale.is_ordered() {
            return Err(ConfigError::UnorderedBands { table: "GPA" });
        }
        if !self.letter_scale.is_ordered() {
            return Err(ConfigError::UnorderedBands { table: "letter" });
        }
        if !self.histogram.is_valid() {
            return Err(ConfigError::BadHistogram);
        }
        Ok(())
    }

    pub fn subject_set(&self) -> Result<SubjectSet, ConfigError> {
        SubjectSet::new(self.subjects.clone())
    }
}

pub(crate) fn check_subjects(subjects: &[String]) -> Result<(), ConfigError> {
    if subjects.is_empty() {
        return Err(ConfigError::NoSubjects);
    }
    let mut seen = HashSet::new();
    for subject in subjects {
        if !seen.insert(subject.as_str()) {
            return Err(ConfigError::DuplicateSubject(subject.clone()));
        }
    }
    Ok(())
}
