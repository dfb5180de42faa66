//! Signal extraction.
//!
//! Each [`Signal`] is bound to exactly one pure detector in [`DETECTORS`];
//! extraction is a fold of that table over a parsed [`PageView`].

pub mod detectors;
mod page;

pub use detectors::DetectContext;
pub use page::{count_forms, Anchor, PageView};

use crate::types::signals::{Signal, SignalSet};

/// Detector bound to the signal it produces.
pub struct SignalDetector {
    pub signal: Signal,
    pub detect: fn(&PageView, &DetectContext<'_>) -> bool,
}

/// The signal schema: one detector per signal, in declaration order.
pub const DETECTORS: [SignalDetector; 11] = [
    SignalDetector {
        signal: Signal::HasHttps,
        detect: detectors::has_https,
    },
    SignalDetector {
        signal: Signal::HasMetaViewport,
        detect: detectors::has_meta_viewport,
    },
    SignalDetector {
        signal: Signal::HasTelLink,
        detect: detectors::has_tel_link,
    },
    SignalDetector {
        signal: Signal::PhoneVisible,
        detect: detectors::phone_visible,
    },
    SignalDetector {
        signal: Signal::EmailVisible,
        detect: detectors::email_visible,
    },
    SignalDetector {
        signal: Signal::HasContactForm,
        detect: detectors::has_contact_form,
    },
    SignalDetector {
        signal: Signal::HasBookingLink,
        detect: detectors::has_booking_link,
    },
    SignalDetector {
        signal: Signal::HasHours,
        detect: detectors::has_hours,
    },
    SignalDetector {
        signal: Signal::HasServiceArea,
        detect: detectors::has_service_area,
    },
    SignalDetector {
        signal: Signal::HasReviews,
        detect: detectors::has_reviews,
    },
    SignalDetector {
        signal: Signal::HasCta,
        detect: detectors::has_cta,
    },
];

/// Run every detector against a page.
pub fn extract(page: &PageView, ctx: &DetectContext<'_>) -> SignalSet {
    SignalSet::from_flags(
        DETECTORS
            .iter()
            .map(|detector| (detector.signal, (detector.detect)(page, ctx))),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::signals::ContactFormSource;
    use url::Url;

    #[test]
    fn test_every_signal_has_one_detector() {
        let mut covered: Vec<Signal> = DETECTORS.iter().map(|d| d.signal).collect();
        covered.sort();
        covered.dedup();
        assert_eq!(covered, Signal::ALL.to_vec());
    }

    #[test]
    fn test_extract_full_page() {
        let html = r#"
            <html>
            <head><meta name="viewport" content="width=device-width"></head>
            <body>
              <a href="tel:5125550100">(512) 555-0100</a>
              <a href="https://calendly.com/joes">Book online</a>
              <p>Email office@joesplumbing.com</p>
              <p>Hours: Monday-Friday 8-6. Serving Austin.</p>
              <p>Read our reviews. Call now!</p>
              <form action="/lead"><input name="phone"></form>
            </body></html>
        "#;
        let page = PageView::parse(html, &Url::parse("https://joesplumbing.com/").unwrap());
        let signals = extract(&page, &DetectContext { city: Some("Austin") });

        for signal in Signal::ALL {
            assert!(signals.is(signal), "expected {signal} to be detected");
        }
        assert_eq!(signals.contact_form_source(), ContactFormSource::Homepage);
    }

    #[test]
    fn test_extract_bare_page() {
        let page = PageView::parse(
            "<html><body><p>Welcome</p></body></html>",
            &Url::parse("http://bare.example/").unwrap(),
        );
        let signals = extract(&page, &DetectContext { city: Some("Austin") });

        assert!(signals.iter().all(|(_, value)| !value));
        assert_eq!(signals.contact_form_source(), ContactFormSource::None);
    }
}
