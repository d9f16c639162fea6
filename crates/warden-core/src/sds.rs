//! Safety Data Sheet (SDS) documents.
//!
//! An SDS is a chemical-hazard reference record: product identity plus the
//! structured GHS and NFPA classifications, with the extracted document text
//! kept alongside for substring search.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// GHS (Globally Harmonized System) classification summary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GhsInfo {
  /// `"Danger"` or `"Warning"`, when the sheet carries one.
  pub signal_word:       Option<String>,
  /// H-statements, e.g. `"H225: Highly flammable liquid and vapour"`.
  #[serde(default)]
  pub hazard_statements: Vec<String>,
  /// Pictogram codes, e.g. `"GHS02"`.
  #[serde(default)]
  pub pictograms:        Vec<String>,
}

/// NFPA 704 "fire diamond" ratings, each 0..=4.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NfpaRating {
  pub health:       u8,
  pub flammability: u8,
  pub instability:  u8,
  /// Special-hazard symbol, e.g. `"W"` (reacts with water) or `"OX"`.
  pub special:      Option<String>,
}

impl NfpaRating {
  pub const MAX: u8 = 4;

  pub fn validate(&self) -> Result<()> {
    let dims = [
      ("nfpa.health", self.health),
      ("nfpa.flammability", self.flammability),
      ("nfpa.instability", self.instability),
    ];
    for (field, value) in dims {
      if value > Self::MAX {
        return Err(Error::ScoreOutOfRange { field, value, max: Self::MAX });
      }
    }
    Ok(())
  }
}

/// A persisted SDS document record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SdsDocument {
  pub sds_id:       Uuid,
  pub product_name: String,
  pub manufacturer: Option<String>,
  /// Path to the source document on disk, when one was supplied.
  pub file_path:    Option<String>,
  /// Extracted full text; searched with case-insensitive substring match.
  pub full_text:    Option<String>,
  pub ghs:          Option<GhsInfo>,
  pub nfpa:         Option<NfpaRating>,
  pub created_at:   DateTime<Utc>,
}

/// Input to [`crate::store::EhsStore::add_sds`].
#[derive(Debug, Clone)]
pub struct NewSdsDocument {
  pub product_name: String,
  pub manufacturer: Option<String>,
  pub file_path:    Option<String>,
  pub full_text:    Option<String>,
  pub ghs:          Option<GhsInfo>,
  pub nfpa:         Option<NfpaRating>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn nfpa_rejects_rating_above_four() {
    let bad = NfpaRating { flammability: 5, ..Default::default() };
    assert!(matches!(
      bad.validate(),
      Err(Error::ScoreOutOfRange { field: "nfpa.flammability", value: 5, .. })
    ));
    assert!(NfpaRating::default().validate().is_ok());
  }
}
