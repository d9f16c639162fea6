//! Keyword-scored intent classification for the chat assistant.
//!
//! Each intent owns a keyword list; a message scores one point per keyword
//! it contains (case-insensitive substring match, so "report" also matches
//! "reported"). The highest-scoring intent wins, ties resolved by the fixed
//! order below, and a message matching nothing falls back to
//! [`Intent::General`].

use serde::{Deserialize, Serialize};

// ─── Intent ──────────────────────────────────────────────────────────────────

/// The workflow a chat message is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
  ReportIncident,
  SdsQuery,
  SafetyConcern,
  Help,
  General,
}

impl Intent {
  /// The discriminant string stored in the `intent` column.
  /// Must match the `rename_all = "snake_case"` serde tags above.
  pub fn discriminant(self) -> &'static str {
    match self {
      Self::ReportIncident => "report_incident",
      Self::SdsQuery => "sds_query",
      Self::SafetyConcern => "safety_concern",
      Self::Help => "help",
      Self::General => "general",
    }
  }
}

// ─── Keyword lists ───────────────────────────────────────────────────────────

const INCIDENT_KEYWORDS: &[&str] = &[
  "incident", "accident", "injury", "hurt", "injured", "report", "happened",
  "occurred",
];

const SDS_KEYWORDS: &[&str] = &[
  "sds", "chemical", "safety data", "hazard", "msds", "substance", "material",
];

const SAFETY_KEYWORDS: &[&str] = &[
  "safety", "concern", "unsafe", "dangerous", "risk", "hazard", "observe",
  "noticed",
];

const HELP_KEYWORDS: &[&str] = &[
  "help", "what", "how", "can you", "assist", "guide", "explain",
];

/// Tie-break order: an incident report beats an SDS query beats a safety
/// concern beats a help request.
const SCORED_INTENTS: &[(Intent, &[&str])] = &[
  (Intent::ReportIncident, INCIDENT_KEYWORDS),
  (Intent::SdsQuery, SDS_KEYWORDS),
  (Intent::SafetyConcern, SAFETY_KEYWORDS),
  (Intent::Help, HELP_KEYWORDS),
];

// ─── Classification ──────────────────────────────────────────────────────────

/// The routing decision for one message.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
  pub intent:     Intent,
  /// Top score over the total keyword hits across all intents; 1.0 for an
  /// unambiguous match, 0.0 when nothing matched.
  pub confidence: f32,
}

/// Score `message` against every keyword list and pick the winner.
pub fn classify(message: &str) -> Classification {
  let lowered = message.to_lowercase();

  let mut best = Intent::General;
  let mut best_score = 0usize;
  let mut total = 0usize;

  for &(intent, keywords) in SCORED_INTENTS {
    let score = keywords.iter().filter(|kw| lowered.contains(*kw)).count();
    total += score;
    if score > best_score {
      best = intent;
      best_score = score;
    }
  }

  if best_score == 0 {
    return Classification { intent: Intent::General, confidence: 0.0 };
  }

  Classification {
    intent:     best,
    confidence: best_score as f32 / total as f32,
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn incident_phrasing_routes_to_report_incident() {
    let c = classify("I need to report an incident");
    assert_eq!(c.intent, Intent::ReportIncident);
    assert_eq!(c.confidence, 1.0);
  }

  #[test]
  fn classification_is_case_insensitive() {
    let c = classify("There was an ACCIDENT in the warehouse");
    assert_eq!(c.intent, Intent::ReportIncident);
  }

  #[test]
  fn sds_wins_tie_against_safety_concern() {
    // "chemical" scores for SDS, "safety" for safety concern; the tie goes
    // to the earlier intent in the scoring order.
    let c = classify("Tell me about chemical safety");
    assert_eq!(c.intent, Intent::SdsQuery);
    assert_eq!(c.confidence, 0.5);
  }

  #[test]
  fn help_phrasing_routes_to_help() {
    let c = classify("can you guide me please");
    assert_eq!(c.intent, Intent::Help);
  }

  #[test]
  fn unmatched_message_falls_back_to_general() {
    let c = classify("good morning everyone");
    assert_eq!(c.intent, Intent::General);
    assert_eq!(c.confidence, 0.0);
  }

  #[test]
  fn substring_hits_count_once_per_keyword() {
    // "injured" contains both "injured" and... only itself; "injury" does
    // not substring-match it. Two distinct keywords, two points.
    let c = classify("someone got hurt and injured");
    assert_eq!(c.intent, Intent::ReportIncident);
    assert_eq!(c.confidence, 1.0);
  }
}
