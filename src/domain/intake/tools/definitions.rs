//! Intake tools - the two actions the model may invoke.
//!
//! `update_extraction` reports any subset of the three fields and may be
//! called any number of times. `schedule_appointment` is the terminal action;
//! its summary is informational, the accumulated extraction state is what
//! gets committed.

use serde::{Deserialize, Serialize};

use super::ToolDefinition;

/// Name of the extraction update tool.
pub const UPDATE_EXTRACTION: &str = "update_extraction";

/// Name of the terminal scheduling tool.
pub const SCHEDULE_APPOINTMENT: &str = "schedule_appointment";

// ═══════════════════════════════════════════════════════════════════════════
// Tool Parameters
// ═══════════════════════════════════════════════════════════════════════════

/// Parameters for scheduling the appointment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleAppointmentParams {
    /// One-line human readable summary of the request
    #[serde(default)]
    pub summary: String,
}

// `update_extraction` takes `ExtractionUpdate` directly.

// ═══════════════════════════════════════════════════════════════════════════
// Tool Definitions
// ═══════════════════════════════════════════════════════════════════════════

/// Creates the update_extraction tool definition.
pub fn update_extraction_tool() -> ToolDefinition {
    ToolDefinition::new(
        UPDATE_EXTRACTION,
        "Record customer details as soon as the caller mentions them. \
         Pass only the fields you learned; any combination is allowed.",
        serde_json::json!({
            "type": "object",
            "properties": {
                "name": {
                    "type": "string",
                    "description": "The customer's name"
                },
                "address": {
                    "type": "string",
                    "description": "Address where the service is needed"
                },
                "service": {
                    "type": "string",
                    "description": "The type of service requested (e.g. roof repair)"
                }
            }
        }),
    )
}

/// Creates the schedule_appointment tool definition.
pub fn schedule_appointment_tool() -> ToolDefinition {
    ToolDefinition::new(
        SCHEDULE_APPOINTMENT,
        "Schedule the appointment once the name, service and address are all known.",
        serde_json::json!({
            "type": "object",
            "required": ["summary"],
            "properties": {
                "summary": {
                    "type": "string",
                    "description": "Short summary of the customer's request"
                }
            }
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_extraction_has_no_required_fields() {
        let tool = update_extraction_tool();
        assert_eq!(tool.name(), UPDATE_EXTRACTION);
        assert!(tool.required_parameters().is_empty());

        let props = tool.parameters_schema()["properties"].as_object().unwrap();
        assert_eq!(props.len(), 3);
        for field in ["name", "address", "service"] {
            assert_eq!(props[field]["type"], "string");
        }
    }

    #[test]
    fn schedule_appointment_requires_summary() {
        let tool = schedule_appointment_tool();
        assert_eq!(tool.name(), SCHEDULE_APPOINTMENT);
        assert_eq!(tool.required_parameters(), vec!["summary"]);
    }

    #[test]
    fn schedule_params_tolerate_missing_summary() {
        let params: ScheduleAppointmentParams =
            serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(params.summary.is_empty());
    }

    #[test]
    fn schedule_params_reject_non_string_summary() {
        let result: Result<ScheduleAppointmentParams, _> =
            serde_json::from_value(serde_json::json!({ "summary": 42 }));
        assert!(result.is_err());
    }
}
