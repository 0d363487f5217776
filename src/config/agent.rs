//! Intake agent behavior configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::intake::prompts::DEFAULT_GREETING;
use crate::domain::intake::SchedulingPolicy;
use crate::application::handlers::intake::DEFAULT_MAX_MESSAGE_LENGTH;
use crate::domain::lead::{
    DEFAULT_APPOINTMENT_MINUTES, DEFAULT_LEAD_SOURCE, MAX_APPOINTMENT_MINUTES,
};

/// Intake agent configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AgentConfig {
    /// Whether scheduling may fire on an incomplete extraction
    #[serde(default)]
    pub scheduling_policy: SchedulingPolicy,

    /// Scripted opening line of a streaming session
    #[serde(default = "default_greeting")]
    pub greeting: String,

    /// Origin marker written on every lead
    #[serde(default = "default_lead_source")]
    pub lead_source: String,

    /// Length of the placeholder appointment window
    #[serde(default = "default_appointment_duration")]
    pub appointment_duration_minutes: i64,

    /// Upper bound on an inbound utterance, in characters
    #[serde(default = "default_max_message_length")]
    pub max_message_length: usize,
}

impl AgentConfig {
    /// Validate agent configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.greeting.trim().is_empty() {
            return Err(ValidationError::MissingRequired("AGENT__GREETING"));
        }
        if self.lead_source.trim().is_empty() {
            return Err(ValidationError::MissingRequired("AGENT__LEAD_SOURCE"));
        }
        if !(1..=MAX_APPOINTMENT_MINUTES).contains(&self.appointment_duration_minutes) {
            return Err(ValidationError::InvalidAppointmentDuration);
        }
        if self.max_message_length == 0 {
            return Err(ValidationError::InvalidMessageLimit);
        }
        Ok(())
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            scheduling_policy: SchedulingPolicy::default(),
            greeting: default_greeting(),
            lead_source: default_lead_source(),
            appointment_duration_minutes: default_appointment_duration(),
            max_message_length: default_max_message_length(),
        }
    }
}

fn default_greeting() -> String {
    DEFAULT_GREETING.to_string()
}

fn default_lead_source() -> String {
    DEFAULT_LEAD_SOURCE.to_string()
}

fn default_appointment_duration() -> i64 {
    DEFAULT_APPOINTMENT_MINUTES
}

fn default_max_message_length() -> usize {
    DEFAULT_MAX_MESSAGE_LENGTH
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_config_defaults() {
        let config = AgentConfig::default();
        assert_eq!(config.scheduling_policy, SchedulingPolicy::Permissive);
        assert_eq!(config.lead_source, "ai_agent");
        assert_eq!(config.appointment_duration_minutes, 60);
        assert_eq!(config.max_message_length, DEFAULT_MAX_MESSAGE_LENGTH);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_non_positive_duration() {
        let config = AgentConfig {
            appointment_duration_minutes: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidAppointmentDuration)
        ));
    }

    #[test]
    fn test_validation_rejects_duration_beyond_a_week() {
        let week = AgentConfig {
            appointment_duration_minutes: MAX_APPOINTMENT_MINUTES,
            ..Default::default()
        };
        assert!(week.validate().is_ok());

        let config = AgentConfig {
            appointment_duration_minutes: i64::MAX,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidAppointmentDuration)
        ));
    }

    #[test]
    fn test_validation_rejects_blank_greeting() {
        let config = AgentConfig {
            greeting: " ".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
