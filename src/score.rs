use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MAX_SCORE: u8 = 100;

const EXCELLENT_FLOOR: u8 = 80;
const GOOD_FLOOR: u8 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ScoreError {
    #[error("score {0} is outside 0..=100")]
    OutOfRange(i64),
}

/// A metric score that is known to lie in `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Score(u8);

impl Score {
    pub fn new(raw: i64) -> Result<Self, ScoreError> {
        if (0..=MAX_SCORE as i64).contains(&raw) {
            Ok(Self(raw as u8))
        } else {
            Err(ScoreError::OutOfRange(raw))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn status(self) -> Status {
        Status::from_score(self)
    }
}

impl TryFrom<i64> for Score {
    type Error = ScoreError;

    fn try_from(raw: i64) -> Result<Self, Self::Error> {
        Score::new(raw)
    }
}

impl From<Score> for i64 {
    fn from(s: Score) -> Self {
        s.0 as i64
    }
}

impl std::fmt::Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Three-level quality bucket derived from a score.
///
/// Variants are declared worst to best so the derived ordering matches quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, strum_macros::Display)]
pub enum Status {
    #[strum(serialize = "Needs Improvement")]
    NeedsWork,
    Good,
    Excellent,
}

/// Colour family a status badge is drawn in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Positive,
    Caution,
    Critical,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::NeedsWork, Status::Good, Status::Excellent];

    pub fn from_score(score: Score) -> Self {
        match score.value() {
            s if s >= EXCELLENT_FLOOR => Status::Excellent,
            s if s >= GOOD_FLOOR => Status::Good,
            _ => Status::NeedsWork,
        }
    }

    /// Badge text shown next to a metric.
    pub fn label(self) -> &'static str {
        match self {
            Status::Excellent => "Good Job",
            Status::Good => "On Track",
            Status::NeedsWork => "Needs Work",
        }
    }

    pub fn tone(self) -> Tone {
        match self {
            Status::Excellent => Tone::Positive,
            Status::Good => Tone::Caution,
            Status::NeedsWork => Tone::Critical,
        }
    }
}

/// Classify a raw score, rejecting anything outside `0..=100`.
pub fn classify(raw: i64) -> Result<Status, ScoreError> {
    Score::new(raw).map(Status::from_score)
}

pub fn label(status: Status) -> &'static str {
    status.label()
}
