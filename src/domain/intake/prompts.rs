//! Fixed texts used by the intake dialogue.

/// System instruction prepended to every completion request.
pub const SYSTEM_INSTRUCTION: &str = "\
You are a friendly intake assistant for a home services company, speaking with a caller.
Your job is to collect three details: the customer's name, the service they need, and the address where the work will be done.

Rules:
- Ask for one missing detail at a time. Keep every reply short and conversational; it will be read aloud.
- Never ask for a phone number. We already have it.
- Whenever the caller mentions any of the three details, call update_extraction with what you learned. Several fields may be passed at once.
- Once name, service and address are all known, call schedule_appointment with a one-sentence summary, then tell the caller someone will confirm the appointment shortly.
- Do not invent details the caller did not give.";

/// Scripted opening line of a streaming session.
pub const DEFAULT_GREETING: &str =
    "Hi, thanks for calling! I can get you booked in. Could I start with your name?";

/// Synthetic tool result returned to the model for every honored call.
pub const TOOL_ACKNOWLEDGEMENT: &str = "Success";

/// Reply used when the follow-up completion produced no text.
pub const FOLLOW_UP_FALLBACK: &str = "Got it, thank you.";

/// User-facing text accompanying an error status.
pub const ERROR_REPLY: &str = "Sorry, something went wrong on our end. Please try again in a moment.";

/// Tool result for a scheduling call declined by policy.
pub fn scheduling_declined(missing: &[&str]) -> String {
    format!(
        "Not scheduled: still missing {}. Ask the caller for it before scheduling.",
        missing.join(", ")
    )
}

/// Tool result for a call that could not be used.
pub fn tool_rejected(reason: &str) -> String {
    format!("Error: {}", reason)
}
