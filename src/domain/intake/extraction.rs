//! Extraction state - the three fields the intake conversation collects.
//!
//! State only ever moves forward by merging partial updates reported by the
//! model through `update_extraction`. Merging is last-write-wins per field:
//! a field present in the update overwrites, an absent field leaves the prior
//! value untouched. Empty or whitespace-only values count as absent.

use serde::{Deserialize, Serialize};

/// Sentinel written for fields still missing when a lead is committed.
pub const UNKNOWN_FIELD: &str = "unknown";

/// One of the required intake fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionField {
    Name,
    Address,
    Service,
}

impl ExtractionField {
    /// All required fields, in the order the agent asks for them.
    pub const ALL: [ExtractionField; 3] = [
        ExtractionField::Name,
        ExtractionField::Service,
        ExtractionField::Address,
    ];

    /// Returns the wire name of the field.
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionField::Name => "name",
            ExtractionField::Address => "address",
            ExtractionField::Service => "service",
        }
    }
}

/// Partial update carried by one `update_extraction` invocation.
///
/// Also used as the outward-visible delta of a turn: adapters expose what
/// the model reported in that turn, not the accumulated state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
}

impl ExtractionUpdate {
    /// Returns true if the update defines no field at all.
    pub fn is_empty(&self) -> bool {
        defined(&self.name).is_none()
            && defined(&self.address).is_none()
            && defined(&self.service).is_none()
    }

    /// Folds a later update into this one (later values win).
    pub fn absorb(&mut self, later: &ExtractionUpdate) {
        overwrite(&mut self.name, &later.name);
        overwrite(&mut self.address, &later.address);
        overwrite(&mut self.service, &later.service);
    }
}

/// Accumulated extraction state of one conversation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
}

impl ExtractionState {
    /// Creates an empty state (conversation start).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merges an update into this state in place.
    pub fn apply(&mut self, update: &ExtractionUpdate) {
        overwrite(&mut self.name, &update.name);
        overwrite(&mut self.address, &update.address);
        overwrite(&mut self.service, &update.service);
    }

    /// Returns a new state with the update merged in.
    pub fn merged(mut self, update: &ExtractionUpdate) -> Self {
        self.apply(update);
        self
    }

    /// Returns the value of a field, if known.
    pub fn get(&self, field: ExtractionField) -> Option<&str> {
        match field {
            ExtractionField::Name => self.name.as_deref(),
            ExtractionField::Address => self.address.as_deref(),
            ExtractionField::Service => self.service.as_deref(),
        }
    }

    /// Returns the value of a field, or the "unknown" sentinel.
    pub fn get_or_unknown(&self, field: ExtractionField) -> &str {
        self.get(field).unwrap_or(UNKNOWN_FIELD)
    }

    /// Fields that are still absent.
    pub fn missing_fields(&self) -> Vec<ExtractionField> {
        ExtractionField::ALL
            .into_iter()
            .filter(|field| self.get(*field).is_none())
            .collect()
    }

    /// True once every required field is known.
    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }
}

fn defined(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

fn overwrite(target: &mut Option<String>, incoming: &Option<String>) {
    if let Some(value) = defined(incoming) {
        *target = Some(value.to_string());
    }
}
