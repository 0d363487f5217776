//! Lead - the record committed when the terminal action fires.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{LeadId, Timestamp};
use crate::domain::intake::{ExtractionField, ExtractionState};

/// Intent tag written on every lead produced by the intake agent.
pub const SCHEDULING_INTENT: &str = "schedule_appointment";

/// Default origin marker for leads captured by the agent.
pub const DEFAULT_LEAD_SOURCE: &str = "ai_agent";

/// A captured lead. Append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lead {
    pub id: LeadId,
    pub name: String,
    pub address: String,
    pub service: String,
    pub intent: String,
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub created_at: Timestamp,
}

impl Lead {
    /// Builds a lead from whatever the conversation extracted.
    ///
    /// Absent fields are written as the "unknown" sentinel; building a lead
    /// never fails on incomplete state.
    pub fn from_extraction(
        state: &ExtractionState,
        source: impl Into<String>,
        summary: Option<&str>,
    ) -> Self {
        Self {
            id: LeadId::new(),
            name: state.get_or_unknown(ExtractionField::Name).to_string(),
            address: state.get_or_unknown(ExtractionField::Address).to_string(),
            service: state.get_or_unknown(ExtractionField::Service).to_string(),
            intent: SCHEDULING_INTENT.to_string(),
            source: source.into(),
            summary: summary
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from),
            created_at: Timestamp::now(),
        }
    }
}
