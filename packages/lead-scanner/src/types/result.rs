//! Scan output types.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::signals::SignalSet;

/// Open-ended findings map. Ordered so repeated scans serialize identically.
pub type Findings = BTreeMap<String, serde_json::Value>;

/// How much live evidence backs the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::Low => "low",
            Confidence::Medium => "medium",
            Confidence::High => "high",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of probing for a secondary contact page.
///
/// Diagnostic only: anything other than `FormFound` leaves the scan exactly
/// as the home page alone would have produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ContactProbe {
    /// No anchor looked like a contact link
    NoLink,
    /// The contact link resolved back to the scanned page
    SameAsPrimary,
    /// The contact link failed the safety gate or could not be resolved
    Rejected { href: String },
    /// The contact page could not be fetched
    FetchFailed { url: String, reason: String },
    /// The contact page loaded but has no form
    NoForm { url: String },
    /// The contact page has a form
    FormFound { url: String },
}

impl ContactProbe {
    pub fn found_form(&self) -> bool {
        matches!(self, ContactProbe::FormFound { .. })
    }
}

/// Qualification verdict for one lead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanResult {
    /// Deficiency score in 0..=10
    pub score: u8,

    /// Up to three unique reasons, most important first
    pub reasons: Vec<String>,

    /// Missing-signal labels in rule order
    pub missing: Vec<String>,

    pub recommended_angle: String,

    pub confidence: Confidence,

    pub findings: Findings,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Contact-page probe outcome, when a probe was attempted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_page: Option<ContactProbe>,
}

/// Record every signal of a set into findings.
pub(crate) fn signal_findings(signals: &SignalSet) -> Findings {
    let mut findings: Findings = signals
        .iter()
        .map(|(signal, value)| (signal.as_str().to_string(), serde_json::Value::Bool(value)))
        .collect();
    findings.insert(
        "contact_form_source".to_string(),
        serde_json::Value::String(signals.contact_form_source().as_str().to_string()),
    );
    findings
}
