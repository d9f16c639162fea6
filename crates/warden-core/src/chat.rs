//! Chat history records and the canned reply for each intent.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::intent::Intent;

/// One chat exchange: the user's message and the assistant's reply, together
/// with the routing decision that produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatEntry {
  pub chat_id:    Uuid,
  pub message:    String,
  pub response:   String,
  pub intent:     Intent,
  pub confidence: f32,
  pub created_at: DateTime<Utc>,
}

/// Input to [`crate::store::EhsStore::record_chat`].
#[derive(Debug, Clone)]
pub struct NewChatEntry {
  pub message:    String,
  pub response:   String,
  pub intent:     Intent,
  pub confidence: f32,
}

/// The fixed response template for an intent.
pub fn reply_for(intent: Intent) -> &'static str {
  match intent {
    Intent::ReportIncident => REPORT_INCIDENT_REPLY,
    Intent::SdsQuery => SDS_QUERY_REPLY,
    Intent::SafetyConcern => SAFETY_CONCERN_REPLY,
    Intent::Help => HELP_REPLY,
    Intent::General => GENERAL_REPLY,
  }
}

const REPORT_INCIDENT_REPLY: &str = "\
Incident reporting

I can help you report an incident. Please provide:

1. Type of incident: injury/illness, near miss, property damage, \
environmental (spill/leak), or security issue.
2. Location: where did it happen?
3. Description: what happened?
4. When: date and time.

Example: \"There was a chemical spill in Laboratory A at 2:30 PM today.\"

For immediate emergencies, contact emergency services first.";

const SDS_QUERY_REPLY: &str = "\
Safety Data Sheet information

I can help you with chemical safety information. You can ask about specific \
chemicals, for example:

- \"What are the hazards of acetone?\"
- \"How should I store methanol?\"
- \"What PPE is needed for sulfuric acid?\"

What chemical or safety information do you need?";

const SAFETY_CONCERN_REPLY: &str = "\
Safety concerns

Report any unsafe conditions or behaviours you observe, such as unsafe \
equipment, missing or damaged PPE, blocked emergency exits, chemical \
storage issues, or environmental hazards.

Please include the location of the concern, a description of the hazard, \
the potential consequences, and any suggested solutions.";

const HELP_REPLY: &str = "\
Warden EHS assistant help

I can assist with:

- Incident reporting: workplace accidents, injuries, near misses.
- SDS management: chemical safety information and documentation.
- Safety concerns: unsafe conditions or behaviours.
- Risk assessment: evaluate and manage workplace risks.

Try \"Report an incident\", \"Chemical safety info\", \"Safety concern\", or \
\"Help me assess risk\".";

const GENERAL_REPLY: &str = "\
Hello, I'm the Warden EHS assistant.

I can help you report incidents and accidents, find chemical safety \
information, report safety concerns, and assess workplace risks.

Try saying: \"I need to report an incident\", \"Tell me about chemical \
safety\", \"I have a safety concern\", or \"Help me with risk assessment\".";
