use serde::{Deserialize, Serialize};
use std::fmt;

/// One step of the GPA table: averages at or above `min` earn `points`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GpaBand {
    pub min: f64,
    pub points: f64,
}

/// Step function from a 0–100 average to grade points.
///
/// Bands are checked from the highest lower bound down. Lower bounds are
/// inclusive, so an average sitting exactly on a boundary takes the higher
/// band. Averages below every band earn `floor`.
///
/// | Average | GPA |
/// |---------|-----|
/// | >= 93   | 4.0 |
/// | >= 90   | 3.7 |
/// | >= 85   | 3.5 |
/// | >= 83   | 3.3 |
/// | >= 80   | 3.0 |
/// | >= 75   | 2.7 |
/// | >= 70   | 2.5 |
/// | >= 60   | 2.2 |
/// | >= 50   | 2.0 |
/// | < 50    | 0.0 |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GpaScale {
    pub bands: Vec<GpaBand>,
    pub floor: f64,
}

impl Default for GpaScale {
    fn default() -> Self {
        let bands = [
            (93.0, 4.0),
            (90.0, 3.7),
            (85.0, 3.5),
            (83.0, 3.3),
            (80.0, 3.0),
            (75.0, 2.7),
            (70.0, 2.5),
            (60.0, 2.2),
            (50.0, 2.0),
        ]
        .into_iter()
        .map(|(min, points)| GpaBand { min, points })
        .collect();

        GpaScale { bands, floor: 0.0 }
    }
}

impl GpaScale {
    pub fn points(&self, average: f64) -> f64 {
        self.bands
            .iter()
            .find(|band| average >= band.min)
            .map_or(self.floor, |band| band.points)
    }

    pub(crate) fn is_ordered(&self) -> bool {
        bounds_descending(self.bands.iter().map(|b| b.min)) && self.floor.is_finite()
    }
}

/// Maps an average onto the GPA scale. An undefined average has no GPA.
pub fn compute_gpa(average: Option<f64>, scale: &GpaScale) -> Option<f64> {
    average.map(|avg| scale.points(avg))
}

/// Pass/fail verdict for a student's average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    Pass,
    Fail,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Pass => f.pad("Pass"),
            Status::Fail => f.pad("Fail"),
        }
    }
}

/// Pass when the average meets the threshold. A student with no scores at
/// all has no status rather than an automatic fail.
pub fn compute_status(average: Option<f64>, pass_threshold: f64) -> Option<Status> {
    average.map(|avg| {
        if avg >= pass_threshold {
            Status::Pass
        } else {
            Status::Fail
        }
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Letter {
    A,
    B,
    C,
    D,
    F,
}

impl Letter {
    pub const ALL: [Letter; 5] = [Letter::A, Letter::B, Letter::C, Letter::D, Letter::F];
}

impl fmt::Display for Letter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Letter::A => "A",
            Letter::B => "B",
            Letter::C => "C",
            Letter::D => "D",
            Letter::F => "F",
        };
        f.pad(s)
    }
}

/// Lower edges of the letter bands. Anything below `d` is an F.
///
/// | Range     | Letter |
/// |-----------|--------|
/// | >= 90     | A      |
/// | [80, 90)  | B      |
/// | [70, 80)  | C      |
/// | [60, 70)  | D      |
/// | < 60      | F      |
///
/// A has no upper edge: a score above 100 (extra credit, bad data entry)
/// still classifies as A instead of being rejected.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LetterScale {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
}

impl Default for LetterScale {
    fn default() -> Self {
        LetterScale {
            a: 90.0,
            b: 80.0,
            c: 70.0,
            d: 60.0,
        }
    }
}

impl LetterScale {
    pub fn letter_band(&self, score: f64) -> Letter {
        match score {
            s if s >= self.a => Letter::A,
            s if s >= self.b => Letter::B,
            s if s >= self.c => Letter::C,
            s if s >= self.d => Letter::D,
            _ => Letter::F,
        }
    }

    pub(crate) fn is_ordered(&self) -> bool {
        bounds_descending([self.a, self.b, self.c, self.d])
    }
}

fn bounds_descending(bounds: impl IntoIterator<Item = f64>) -> bool {
    let mut prev: Option<f64> = None;
    for bound in bounds {
        if !bound.is_finite() || prev.is_some_and(|p| bound >= p) {
            return false;
        }
        prev = Some(bound);
    }
    true
}
