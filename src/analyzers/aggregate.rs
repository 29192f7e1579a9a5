use chrono::Utc;

use crate::analyzers::grade::Status;
use crate::analyzers::types::{ClassSummary, PassSummary, SubjectMean, SubjectReport};
use crate::analyzers::utility::{describe, mean, pct};
use crate::error::QueryError;
use crate::roster::Roster;

/// Sum of present scores.
///
/// A student with no present scores totals 0.0. This differs from
/// [`compute_average`], which reports no data for the same student.
pub fn compute_total(scores: &[Option<f64>]) -> f64 {
    scores.iter().flatten().sum()
}

/// Mean of present scores. Missing scores are left out of both the sum and
/// the count; `None` when nothing is present.
pub fn compute_average(scores: &[Option<f64>]) -> Option<f64> {
    let present: Vec<f64> = scores.iter().flatten().copied().collect();
    mean(&present)
}

/// Pass/fail split of the per-student averages at the roster's threshold.
pub fn pass_summary(roster: &Roster) -> PassSummary {
    let mut passed = 0;
    let mut failed = 0;
    let mut no_data = 0;

    for student in roster.students() {
        match student.status() {
            Some(Status::Pass) => passed += 1,
            Some(Status::Fail) => failed += 1,
            None => no_data += 1,
        }
    }

    let total_students = roster.len();

    PassSummary {
        threshold: roster.grading().pass_threshold,
        total_students,
        passed,
        failed,
        no_data,
        pass_rate: pct(passed, total_students),
        fail_rate: pct(failed, total_students),
    }
}

/// Students passing and failing one subject at `threshold`. Students without
/// a score in that subject are in neither count.
pub fn subject_pass_fail(roster: &Roster, subject: usize, threshold: f64) -> (usize, usize) {
    roster
        .subject_column(subject)
        .flatten()
        .fold((0, 0), |(pass, fail), score| {
            if score >= threshold {
                (pass + 1, fail)
            } else {
                (pass, fail + 1)
            }
        })
}

/// Statistics for one subject of the roster.
///
/// # Errors
///
/// Returns [`QueryError::UnknownMetric`] if `subject` is not in the roster's
/// subject set.
pub fn subject_report(roster: &Roster, subject: &str) -> Result<SubjectReport, QueryError> {
    let idx = roster
        .subjects()
        .index_of(subject)
        .ok_or_else(|| QueryError::UnknownMetric(subject.to_string()))?;
    Ok(report_at(roster, idx, subject))
}

fn report_at(roster: &Roster, idx: usize, subject: &str) -> SubjectReport {
    let present: Vec<f64> = roster.subject_column(idx).flatten().collect();
    let (passed, failed) = subject_pass_fail(roster, idx, roster.grading().pass_threshold);

    SubjectReport {
        subject: subject.to_string(),
        present: present.len(),
        missing: roster.len() - present.len(),
        passed,
        failed,
        pass_rate: pct(passed, present.len()),
        stats: describe(present),
    }
}

/// Mean of every subject in subject-set order. A subject is flagged as
/// struggling when its mean falls below the pass threshold.
pub fn subject_means(roster: &Roster) -> Vec<SubjectMean> {
    let threshold = roster.grading().pass_threshold;

    roster
        .subjects()
        .names()
        .iter()
        .enumerate()
        .map(|(i, subject)| {
            let present: Vec<f64> = roster.subject_column(i).flatten().collect();
            let avg = mean(&present);
            SubjectMean {
                subject: subject.clone(),
                mean: avg,
                struggling: avg.is_some_and(|m| m < threshold),
            }
        })
        .collect()
}

/// Builds the class-wide report for a roster snapshot.
pub fn class_summary(roster: &Roster) -> ClassSummary {
    ClassSummary {
        generated_at: Utc::now(),
        roster_version: roster.version(),
        all_scores: describe(roster.all_scores()),
        averages: describe(roster.averages()),
        pass: pass_summary(roster),
        subjects: roster
            .subjects()
            .names()
            .iter()
            .enumerate()
            .map(|(i, subject)| report_at(roster, i, subject))
            .collect(),
    }
}
