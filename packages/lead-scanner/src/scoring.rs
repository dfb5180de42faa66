//! Deterministic penalty scoring over a signal set.
//!
//! Policy lives in two tables: [`PENALTY_RULES`] adds points and a `missing`
//! label, [`NOTE_RULES`] records a reason without changing the score. Both
//! are evaluated in order, so the output is stable for a given input.

use crate::types::lead::DirectoryData;
use crate::types::signals::{ContactFormSource, Signal, SignalSet};

pub const NO_BOOKING_LINK: &str = "No booking link found";
pub const NO_CONTACT_FORM: &str = "No contact form on homepage";
pub const NO_TEL_LINK: &str = "No clickable phone link";
pub const NOT_MOBILE_OPTIMIZED: &str = "Not mobile optimized";
pub const NO_HOURS: &str = "No business hours found";
pub const SERVICE_AREA_NOT_MATCHED: &str = "Service area not matched";
pub const NO_REVIEWS: &str = "No reviews/testimonials found";

pub const CONTACT_FORM_HIDDEN: &str = "Contact form hidden on secondary page";
pub const HOURS_ONLY_ON_DIRECTORY: &str = "Hours missing on website (found on Google)";

pub const NO_WEBSITE: &str = "No website listed";
pub const NO_WEBSITE_PENALTY: i32 = 2;

/// Condition that adds points and a missing-signal label.
pub struct PenaltyRule {
    pub label: &'static str,
    pub penalty: i32,
    pub applies: fn(&SignalSet, &DirectoryData) -> bool,
}

/// Condition that records a reason without scoring it.
pub struct NoteRule {
    pub note: &'static str,
    pub applies: fn(&SignalSet, &DirectoryData) -> bool,
}

pub const PENALTY_RULES: [PenaltyRule; 7] = [
    PenaltyRule {
        label: NO_BOOKING_LINK,
        penalty: 2,
        applies: |s, _| !s.is(Signal::HasBookingLink),
    },
    PenaltyRule {
        label: NO_CONTACT_FORM,
        penalty: 1,
        applies: |s, _| !s.is(Signal::HasContactForm),
    },
    PenaltyRule {
        label: NO_TEL_LINK,
        penalty: 1,
        applies: |s, _| !s.is(Signal::HasTelLink),
    },
    PenaltyRule {
        label: NOT_MOBILE_OPTIMIZED,
        penalty: 1,
        applies: |s, _| !s.is(Signal::HasMetaViewport),
    },
    PenaltyRule {
        label: NO_HOURS,
        penalty: 1,
        applies: |s, d| !s.is(Signal::HasHours) && !d.google_hours_present,
    },
    PenaltyRule {
        label: SERVICE_AREA_NOT_MATCHED,
        penalty: 1,
        applies: |s, _| !s.is(Signal::HasServiceArea),
    },
    PenaltyRule {
        label: NO_REVIEWS,
        penalty: 1,
        applies: |s, _| !s.is(Signal::HasReviews),
    },
];

pub const NOTE_RULES: [NoteRule; 2] = [
    NoteRule {
        note: CONTACT_FORM_HIDDEN,
        applies: |s, _| s.contact_form_source() == ContactFormSource::ContactPage,
    },
    NoteRule {
        note: HOURS_ONLY_ON_DIRECTORY,
        applies: |s, d| !s.is(Signal::HasHours) && d.google_hours_present,
    },
];

/// Outcome of scoring one evaluated site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageScore {
    pub score: i32,
    /// Labels of the penalty rules that fired, in rule order
    pub missing: Vec<String>,
    /// Non-penalizing reasons, in rule order
    pub notes: Vec<String>,
}

/// Fold the rule tables over a signal set.
pub fn score_page(signals: &SignalSet, directory: &DirectoryData) -> PageScore {
    let fired: Vec<&PenaltyRule> = PENALTY_RULES
        .iter()
        .filter(|rule| (rule.applies)(signals, directory))
        .collect();

    PageScore {
        score: fired.iter().map(|rule| rule.penalty).sum(),
        missing: fired.iter().map(|rule| rule.label.to_string()).collect(),
        notes: NOTE_RULES
            .iter()
            .filter(|rule| (rule.applies)(signals, directory))
            .map(|rule| rule.note.to_string())
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fusion::fuse;

    fn all_present() -> SignalSet {
        SignalSet::from_flags(Signal::ALL.into_iter().map(|s| (s, true)))
    }

    #[test]
    fn test_bare_site_scores_eight() {
        let score = score_page(&SignalSet::from_flags([]), &DirectoryData::default());

        assert_eq!(score.score, 8);
        assert_eq!(
            score.missing,
            vec![
                NO_BOOKING_LINK,
                NO_CONTACT_FORM,
                NO_TEL_LINK,
                NOT_MOBILE_OPTIMIZED,
                NO_HOURS,
                SERVICE_AREA_NOT_MATCHED,
                NO_REVIEWS,
            ]
        );
        assert!(score.notes.is_empty());
    }

    #[test]
    fn test_complete_site_scores_zero() {
        let score = score_page(&all_present(), &DirectoryData::default());
        assert_eq!(score.score, 0);
        assert!(score.missing.is_empty());
    }

    #[test]
    fn test_directory_hours_waive_penalty_with_note() {
        let directory = DirectoryData {
            google_hours_present: true,
            ..Default::default()
        };
        let score = score_page(&SignalSet::from_flags([]), &directory);

        assert_eq!(score.score, 7);
        assert!(!score.missing.iter().any(|m| m == NO_HOURS));
        assert_eq!(score.notes, vec![HOURS_ONLY_ON_DIRECTORY]);
    }

    #[test]
    fn test_contact_page_form_is_noted_not_penalized() {
        let signals = SignalSet::from_flags([]).with_contact_page_form();
        let score = score_page(&signals, &DirectoryData::default());

        assert_eq!(score.score, 7);
        assert!(!score.missing.iter().any(|m| m == NO_CONTACT_FORM));
        assert_eq!(score.notes, vec![CONTACT_FORM_HIDDEN]);
    }

    #[test]
    fn test_every_signal_combination_stays_in_range() {
        let scored = [
            Signal::HasBookingLink,
            Signal::HasContactForm,
            Signal::HasTelLink,
            Signal::HasMetaViewport,
            Signal::HasHours,
            Signal::HasServiceArea,
            Signal::HasReviews,
        ];
        let directories = [
            DirectoryData::default(),
            DirectoryData {
                google_verified: true,
                google_is_claimed: true,
                google_hours_present: true,
                rating: Some(4.0),
                review_count: Some(100),
                ..Default::default()
            },
        ];

        for mask in 0u32..(1 << scored.len()) {
            let signals = SignalSet::from_flags(
                scored
                    .iter()
                    .enumerate()
                    .map(|(bit, &signal)| (signal, mask & (1 << bit) != 0)),
            );
            let absent = scored.len() - mask.count_ones() as usize;

            for directory in &directories {
                let page = score_page(&signals, directory);
                let hours_waived =
                    directory.google_hours_present && !signals.is(Signal::HasHours);
                let expected_missing = absent - usize::from(hours_waived);
                assert_eq!(page.missing.len(), expected_missing, "mask={mask:07b}");

                let fused = fuse(page.score, directory);
                assert!(fused.score <= 10, "mask={mask:07b}");
            }
        }
    }

    #[test]
    fn test_each_rule_is_independent() {
        for signal in [
            Signal::HasBookingLink,
            Signal::HasContactForm,
            Signal::HasTelLink,
            Signal::HasMetaViewport,
            Signal::HasHours,
            Signal::HasServiceArea,
            Signal::HasReviews,
        ] {
            let only_missing = SignalSet::from_flags(
                Signal::ALL.into_iter().map(|s| (s, s != signal)),
            );
            let score = score_page(&only_missing, &DirectoryData::default());
            let expected = if signal == Signal::HasBookingLink { 2 } else { 1 };
            assert_eq!(score.score, expected, "{signal}");
            assert_eq!(score.missing.len(), 1, "{signal}");
        }
    }
}
