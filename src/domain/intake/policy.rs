//! Scheduling policy - whether `schedule_appointment` may fire on an
//! incomplete extraction.

use serde::{Deserialize, Serialize};

use super::{ExtractionField, ExtractionState};

/// Gate applied when the model asks to schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchedulingPolicy {
    /// Always honor the call; missing fields are committed as "unknown".
    #[default]
    Permissive,
    /// Decline the call until name, service and address are all known.
    RequireComplete,
}

/// Outcome of evaluating a scheduling request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchedulingDecision {
    Accept,
    Decline { missing: Vec<ExtractionField> },
}

impl SchedulingPolicy {
    /// Decides whether scheduling may proceed with the given state.
    pub fn evaluate(&self, state: &ExtractionState) -> SchedulingDecision {
        match self {
            SchedulingPolicy::Permissive => SchedulingDecision::Accept,
            SchedulingPolicy::RequireComplete => {
                let missing = state.missing_fields();
                if missing.is_empty() {
                    SchedulingDecision::Accept
                } else {
                    SchedulingDecision::Decline { missing }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::intake::ExtractionUpdate;

    #[test]
    fn permissive_accepts_empty_state() {
        assert_eq!(
            SchedulingPolicy::Permissive.evaluate(&ExtractionState::empty()),
            SchedulingDecision::Accept
        );
    }

    #[test]
    fn require_complete_lists_missing_fields() {
        let state = ExtractionState::empty().merged(&ExtractionUpdate {
            name: Some("Jane".into()),
            ..Default::default()
        });

        assert_eq!(
            SchedulingPolicy::RequireComplete.evaluate(&state),
            SchedulingDecision::Decline {
                missing: vec![ExtractionField::Service, ExtractionField::Address]
            }
        );
    }

    #[test]
    fn require_complete_accepts_full_state() {
        let state = ExtractionState {
            name: Some("Jane".into()),
            address: Some("12 Oak St".into()),
            service: Some("roof repair".into()),
        };
        assert_eq!(
            SchedulingPolicy::RequireComplete.evaluate(&state),
            SchedulingDecision::Accept
        );
    }

    #[test]
    fn deserializes_snake_case() {
        let policy: SchedulingPolicy = serde_json::from_str("\"require_complete\"").unwrap();
        assert_eq!(policy, SchedulingPolicy::RequireComplete);
    }
}
