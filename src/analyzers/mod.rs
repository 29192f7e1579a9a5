//! Roster analytics.
//!
//! Aggregation of per-student and class-wide statistics, GPA and letter
//! grading, ranking, score distributions and name search. Everything here is
//! a pure read of a roster snapshot.

pub mod aggregate;
pub mod distribution;
pub mod grade;
pub mod rank;
pub mod search;
pub mod types;
pub mod utility;
