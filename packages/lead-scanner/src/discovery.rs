//! Secondary contact-page probe.
//!
//! Runs only when the home page has no form. Every failure here is absorbed
//! into a [`ContactProbe`] value; nothing propagates to the scan.

use tracing::debug;
use url::Url;

use crate::fetcher::{fetch_bounded, PageFetcher};
use crate::security::UrlGate;
use crate::signals::{count_forms, Anchor, PageView};
use crate::types::config::ScanConfig;
use crate::types::result::ContactProbe;

const CONTACT_KEYWORDS: &[&str] = &["contact", "get-in-touch"];

/// First anchor that looks like a link to a contact page.
pub fn find_contact_link(page: &PageView) -> Option<&Anchor> {
    page.anchors.iter().find(|anchor| {
        !anchor.is_mail_or_phone()
            && CONTACT_KEYWORDS
                .iter()
                .any(|k| anchor.href_lower.contains(k) || anchor.text_lower.contains(k))
    })
}

/// Resolve the contact link to a fetchable URL distinct from the scanned page.
///
/// `Err` carries the terminal probe outcome when there is nothing to fetch.
pub fn resolve_contact_url(
    page: &PageView,
    requested: &Url,
    gate: &UrlGate,
) -> Result<Url, ContactProbe> {
    let anchor = find_contact_link(page).ok_or(ContactProbe::NoLink)?;

    let rejected = || ContactProbe::Rejected {
        href: anchor.href.clone(),
    };
    let resolved = page.base_url.join(&anchor.href).map_err(|_| rejected())?;

    let target = without_fragment(&resolved);
    if target == without_fragment(requested) || target == without_fragment(&page.base_url) {
        return Err(ContactProbe::SameAsPrimary);
    }

    gate.check(&resolved).map_err(|_| rejected())?;
    Ok(resolved)
}

/// Look for a form on the page's contact link.
pub async fn probe_contact_page<F>(
    fetcher: &F,
    gate: &UrlGate,
    config: &ScanConfig,
    page: &PageView,
    requested: &Url,
) -> ContactProbe
where
    F: PageFetcher + ?Sized,
{
    let url = match resolve_contact_url(page, requested, gate) {
        Ok(url) => url,
        Err(outcome) => return outcome,
    };

    match fetch_bounded(fetcher, &url, config).await {
        Ok(contact) if count_forms(&contact.html) > 0 => ContactProbe::FormFound {
            url: url.to_string(),
        },
        Ok(_) => ContactProbe::NoForm {
            url: url.to_string(),
        },
        Err(e) => {
            debug!(url = %url, error = %e, "contact page fetch failed; ignoring");
            ContactProbe::FetchFailed {
                url: url.to_string(),
                reason: e.to_string(),
            }
        }
    }
}

fn without_fragment(url: &Url) -> Url {
    let mut url = url.clone();
    url.set_fragment(None);
    url
}
