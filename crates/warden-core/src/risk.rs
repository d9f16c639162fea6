//! The risk matrix: bounded severity and likelihood scales and the
//! deterministic score computed from them.
//!
//! Scores are server-assigned. A stored incident's `risk_score` always
//! equals `severity.overall() * likelihood`; client-supplied scores are
//! ignored.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── Likelihood ──────────────────────────────────────────────────────────────

/// How likely the assessed event is, on a 0..=10 scale.
///
/// Anchors: 0 impossible, 2 rare, 4 unlikely, 6 possible, 8 likely,
/// 10 almost certain. Intermediate values are valid.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct Likelihood(u8);

impl Likelihood {
  pub const MAX: u8 = 10;

  pub fn new(value: u8) -> Result<Self> {
    if value > Self::MAX {
      return Err(Error::ScoreOutOfRange {
        field: "likelihood",
        value,
        max: Self::MAX,
      });
    }
    Ok(Self(value))
  }

  pub fn value(self) -> u8 { self.0 }

  /// Human-readable label for the nearest scale anchor.
  pub fn label(self) -> &'static str {
    match self.0 {
      0 => "Impossible",
      1..=2 => "Rare",
      3..=4 => "Unlikely",
      5..=6 => "Possible",
      7..=8 => "Likely",
      _ => "Almost certain",
    }
  }
}

impl TryFrom<u8> for Likelihood {
  type Error = Error;

  fn try_from(value: u8) -> Result<Self> { Self::new(value) }
}

impl From<Likelihood> for u8 {
  fn from(l: Likelihood) -> u8 { l.0 }
}

// ─── Severity ────────────────────────────────────────────────────────────────

/// Consequence severity across the five assessed dimensions, each 0..=10.
///
/// The people scale runs from 0 (no injury) through first aid, medical
/// treatment, hospitalisation, and permanent disability to 10 (fatality);
/// the other dimensions follow the same shape.
#[derive(
  Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize,
)]
pub struct SeverityScores {
  #[serde(default)]
  pub people:      u8,
  #[serde(default)]
  pub environment: u8,
  #[serde(default)]
  pub cost:        u8,
  #[serde(default)]
  pub reputation:  u8,
  #[serde(default)]
  pub legal:       u8,
}

impl SeverityScores {
  pub const MAX: u8 = 10;

  /// Check every dimension against the scale bound.
  pub fn validate(&self) -> Result<()> {
    let dims = [
      ("severity.people", self.people),
      ("severity.environment", self.environment),
      ("severity.cost", self.cost),
      ("severity.reputation", self.reputation),
      ("severity.legal", self.legal),
    ];
    for (field, value) in dims {
      if value > Self::MAX {
        return Err(Error::ScoreOutOfRange { field, value, max: Self::MAX });
      }
    }
    Ok(())
  }

  /// Overall severity is the worst dimension, not the sum — one fatality is
  /// not offset by zero property damage.
  pub fn overall(&self) -> u8 {
    self
      .people
      .max(self.environment)
      .max(self.cost)
      .max(self.reputation)
      .max(self.legal)
  }
}

// ─── Score and banding ───────────────────────────────────────────────────────

/// `risk = overall severity × likelihood`, range 0..=100.
pub fn risk_score(severity: &SeverityScores, likelihood: Likelihood) -> u8 {
  severity.overall() * likelihood.value()
}

/// Qualitative band over the numeric score, used for dashboards and
/// prioritisation.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
  Low,
  Moderate,
  High,
  Critical,
}

impl RiskLevel {
  /// Threshold at which an incident counts as "high risk" on the dashboard.
  pub const HIGH_THRESHOLD: u8 = 40;

  pub fn from_score(score: u8) -> Self {
    match score {
      0..=19 => Self::Low,
      20..=39 => Self::Moderate,
      40..=69 => Self::High,
      _ => Self::Critical,
    }
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
