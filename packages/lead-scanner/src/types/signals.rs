//! Enumerated web-presence signals and the per-page signal set.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Every boolean signal the extractor knows how to detect.
///
/// The declaration order is the order signals appear in findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    HasHttps,
    HasMetaViewport,
    HasTelLink,
    PhoneVisible,
    EmailVisible,
    HasContactForm,
    HasBookingLink,
    HasHours,
    HasServiceArea,
    HasReviews,
    HasCta,
}

impl Signal {
    pub const ALL: [Signal; 11] = [
        Signal::HasHttps,
        Signal::HasMetaViewport,
        Signal::HasTelLink,
        Signal::PhoneVisible,
        Signal::EmailVisible,
        Signal::HasContactForm,
        Signal::HasBookingLink,
        Signal::HasHours,
        Signal::HasServiceArea,
        Signal::HasReviews,
        Signal::HasCta,
    ];

    /// Key used in findings.
    pub fn as_str(&self) -> &'static str {
        match self {
            Signal::HasHttps => "has_https",
            Signal::HasMetaViewport => "has_meta_viewport",
            Signal::HasTelLink => "has_tel_link",
            Signal::PhoneVisible => "phone_visible",
            Signal::EmailVisible => "email_visible",
            Signal::HasContactForm => "has_contact_form",
            Signal::HasBookingLink => "has_booking_link",
            Signal::HasHours => "has_hours",
            Signal::HasServiceArea => "has_service_area",
            Signal::HasReviews => "has_reviews",
            Signal::HasCta => "has_cta",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the contact form was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactFormSource {
    Homepage,
    ContactPage,
    None,
}

impl ContactFormSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContactFormSource::Homepage => "homepage",
            ContactFormSource::ContactPage => "contact_page",
            ContactFormSource::None => "none",
        }
    }
}

/// Signals detected on one fetched document.
///
/// Built fresh per fetch. Combining the contact-page pass produces a new set
/// via [`SignalSet::with_contact_page_form`] rather than mutating this one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalSet {
    flags: BTreeMap<Signal, bool>,
    contact_form_source: ContactFormSource,
}

impl SignalSet {
    /// Build from detector output. Signals not supplied read as `false`.
    pub fn from_flags(flags: impl IntoIterator<Item = (Signal, bool)>) -> Self {
        let flags: BTreeMap<Signal, bool> = flags.into_iter().collect();
        let contact_form_source = if flags.get(&Signal::HasContactForm).copied().unwrap_or(false)
        {
            ContactFormSource::Homepage
        } else {
            ContactFormSource::None
        };
        Self {
            flags,
            contact_form_source,
        }
    }

    /// Value of one signal.
    pub fn is(&self, signal: Signal) -> bool {
        self.flags.get(&signal).copied().unwrap_or(false)
    }

    pub fn contact_form_source(&self) -> ContactFormSource {
        self.contact_form_source
    }

    /// Copy of this set where the form was found on a secondary contact page.
    ///
    /// Only the contact-form fields change.
    pub fn with_contact_page_form(&self) -> Self {
        let mut flags = self.flags.clone();
        flags.insert(Signal::HasContactForm, true);
        Self {
            flags,
            contact_form_source: ContactFormSource::ContactPage,
        }
    }

    /// Iterate all signals in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (Signal, bool)> + '_ {
        Signal::ALL.into_iter().map(move |s| (s, self.is(s)))
    }
}
