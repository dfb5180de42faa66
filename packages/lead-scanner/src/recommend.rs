//! Outreach angle and top-reason synthesis.

use crate::fusion::CLOSED_REASON;
use crate::scoring::{NO_BOOKING_LINK, NO_CONTACT_FORM, NO_HOURS, NO_TEL_LINK};
use crate::types::lead::EnrichmentData;

pub const DEFAULT_ANGLE: &str = "Simple conversion boost — stronger CTA + lead capture";
pub const AI_INSIGHT_PREFIX: &str = "AI Insight: ";
pub const WEAKNESS_PREFIX: &str = "Weakness: ";

pub const ANGLE_CLOSED: &str = "Skip — business closed";
pub const ANGLE_NO_WEBSITE: &str = "Google listing has no website — quick 1-page call/quote page";
pub const ANGLE_NO_CAPTURE: &str = "No booking/contact capture — missed leads";
pub const ANGLE_NO_TAP_TO_CALL: &str = "Mobile tap-to-call missing — friction";
pub const ANGLE_AFTER_HOURS: &str = "Missed after-hours calls — instant SMS follow-up";

pub const MAX_REASONS: usize = 3;

/// Evidence the synthesizer draws on.
#[derive(Debug, Clone, Copy)]
pub struct Evidence<'a> {
    pub closed: bool,
    pub has_website: bool,
    /// Penalty labels in rule order
    pub missing: &'a [String],
    /// Lead-level reasons that outrank missing signals: no website,
    /// unreachable site, and scoring notes
    pub lead_reasons: &'a [String],
    pub enrichment: Option<&'a EnrichmentData>,
}

impl Evidence<'_> {
    fn is_missing(&self, label: &str) -> bool {
        self.missing.iter().any(|m| m == label)
    }
}

struct AngleRule {
    angle: &'static str,
    applies: fn(&Evidence<'_>) -> bool,
}

/// Fallback cascade; first match wins.
const ANGLE_RULES: [AngleRule; 5] = [
    AngleRule {
        angle: ANGLE_CLOSED,
        applies: |e| e.closed,
    },
    AngleRule {
        angle: ANGLE_NO_WEBSITE,
        applies: |e| !e.has_website,
    },
    AngleRule {
        angle: ANGLE_NO_CAPTURE,
        applies: |e| e.is_missing(NO_BOOKING_LINK) && e.is_missing(NO_CONTACT_FORM),
    },
    AngleRule {
        angle: ANGLE_NO_TAP_TO_CALL,
        applies: |e| e.is_missing(NO_TEL_LINK),
    },
    AngleRule {
        angle: ANGLE_AFTER_HOURS,
        applies: |e| e.is_missing(NO_HOURS),
    },
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recommendation {
    pub angle: String,
    pub reasons: Vec<String>,
}

pub fn recommend(evidence: &Evidence<'_>) -> Recommendation {
    Recommendation {
        angle: recommended_angle(evidence),
        reasons: top_reasons(evidence),
    }
}

/// An enrichment hook beats every cascade rule, closure included.
pub fn recommended_angle(evidence: &Evidence<'_>) -> String {
    if let Some(hook) = evidence.enrichment.and_then(EnrichmentData::hook) {
        return format!("{AI_INSIGHT_PREFIX}{hook}");
    }

    ANGLE_RULES
        .iter()
        .find(|rule| (rule.applies)(evidence))
        .map_or(DEFAULT_ANGLE, |rule| rule.angle)
        .to_string()
}

/// Closure first, then lead reasons, then missing signals. An enrichment
/// weakness fills a remaining slot.
pub fn top_reasons(evidence: &Evidence<'_>) -> Vec<String> {
    let closure = evidence.closed.then(|| CLOSED_REASON.to_string());

    let mut reasons = Vec::with_capacity(MAX_REASONS);
    for reason in closure
        .into_iter()
        .chain(evidence.lead_reasons.iter().cloned())
        .chain(evidence.missing.iter().cloned())
    {
        if reasons.len() == MAX_REASONS {
            break;
        }
        push_unique(&mut reasons, reason);
    }

    if reasons.len() < MAX_REASONS {
        if let Some(weakness) = evidence.enrichment.and_then(EnrichmentData::first_weakness) {
            push_unique(&mut reasons, format!("{WEAKNESS_PREFIX}{weakness}"));
        }
    }
    reasons
}

fn push_unique(reasons: &mut Vec<String>, reason: String) {
    if !reasons.contains(&reason) {
        reasons.push(reason);
    }
}
