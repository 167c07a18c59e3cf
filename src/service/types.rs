// SPDX-License-Identifier: MPL-2.0
//! Payloads exchanged with the consultation backend.
//!
//! The backend is driven by a language model, so every field is optional on
//! the way in. Fields this crate does not read are kept in `extra` and sent
//! back untouched where a payload is round-tripped (the SOAP note).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Patient details entered in the form, as sent to the backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PatientInfo {
    pub name: String,
    pub age: String,
    /// Form value: `not_provided`, `male`, `female`, `other` or free text.
    pub gender: String,
    /// Localized label for `gender`.
    pub gender_display: String,
    pub medical_history: String,
    pub allergies: String,
    pub current_medications: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SoapNote {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chief_complaint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subjective: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub objective: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assessment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<String>,
    pub preliminary_diagnosis: Vec<String>,
    /// Set by the backend when generation failed but the request did not.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SoapNote {
    /// Plan text if present and not blank.
    pub fn plan_text(&self) -> Option<&str> {
        self.plan.as_deref().filter(|plan| !plan.trim().is_empty())
    }
}

/// Examination priority as emitted by the backend (`高`, `中`, `低`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "高" => Some(Priority::High),
            "中" => Some(Priority::Medium),
            "低" => Some(Priority::Low),
            _ => None,
        }
    }

    pub fn i18n_key(self) -> &'static str {
        match self {
            Priority::High => "priorityHigh",
            Priority::Medium => "priorityMedium",
            Priority::Low => "priorityLow",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Examination {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub priority: String,
    pub reason: String,
}

impl Examination {
    pub fn priority(&self) -> Option<Priority> {
        Priority::from_code(&self.priority)
    }
}

/// Overall drug-check severity (`高`, `中`, `低`, `无`, anything else unknown).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    High,
    Medium,
    Low,
    None,
    Unknown,
}

impl Severity {
    pub fn from_code(code: Option<&str>) -> Self {
        match code.map(str::trim) {
            Some("高") => Severity::High,
            Some("中") => Severity::Medium,
            Some("低") => Severity::Low,
            Some("无") => Severity::None,
            _ => Severity::Unknown,
        }
    }

    pub fn i18n_key(self) -> &'static str {
        match self {
            Severity::High => "severityHigh",
            Severity::Medium => "severityMedium",
            Severity::Low => "severityLow",
            Severity::None => "severityNone",
            Severity::Unknown => "severityUnknown",
        }
    }

    /// Glyph shown in front of the localized label.
    pub fn glyph(self) -> &'static str {
        match self {
            Severity::High => "⚠️",
            Severity::Medium => "⚡",
            Severity::Low => "ℹ️",
            Severity::None => "✅",
            Severity::Unknown => "❓",
        }
    }
}

/// Drug names in an interaction: the model emits either a string or a list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum DrugNames {
    One(String),
    Many(Vec<String>),
}

impl fmt::Display for DrugNames {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrugNames::One(name) => f.write_str(name),
            DrugNames::Many(names) => f.write_str(&names.join(", ")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Interaction {
    Detailed {
        drugs: DrugNames,
        #[serde(default)]
        description: String,
    },
    Plain(String),
}

impl fmt::Display for Interaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Interaction::Detailed { drugs, description } => write!(f, "{}: {}", drugs, description),
            Interaction::Plain(text) => f.write_str(text),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DrugCheck {
    pub has_conflicts: bool,
    pub severity: Option<String>,
    pub allergy_warnings: Vec<String>,
    pub drug_interactions: Vec<Interaction>,
    pub contraindications: Vec<String>,
    pub dosage_warnings: Vec<String>,
    pub recommendations: Vec<String>,
    /// Replaces the whole assessment, e.g. when no drug was found in the plan.
    pub message: Option<String>,
}

impl DrugCheck {
    pub fn severity(&self) -> Severity {
        Severity::from_code(self.severity.as_deref())
    }
}

/// Result of a drug check together with the drugs the backend extracted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrugCheckOutcome {
    pub check: DrugCheck,
    pub prescribed_drugs: Vec<String>,
}
