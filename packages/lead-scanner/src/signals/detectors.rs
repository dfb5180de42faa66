//! One pure detector per signal.

use std::sync::LazyLock;

use regex::Regex;

use super::page::PageView;

static RE_PHONE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\+\d{1,2}\s)?\(?\d{3}\)?[\s.-]\d{3}[\s.-]\d{4}").unwrap()
});
static RE_EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").unwrap()
});

/// Scheduling tools and booking verbs.
pub const BOOKING_KEYWORDS: &[&str] = &[
    "calendly",
    "acuity",
    "square",
    "setmore",
    "simplybook",
    "housecallpro",
    "jobber",
    "servicetitan",
    "book",
    "schedule",
];

pub const WEEKDAYS: &[&str] = &[
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

pub const REVIEW_KEYWORDS: &[&str] = &["reviews", "testimonials"];

pub const CTA_KEYWORDS: &[&str] = &["call now", "get quote", "request quote", "book", "schedule"];

/// Lead facts a detector may consult.
#[derive(Debug, Clone, Copy, Default)]
pub struct DetectContext<'a> {
    pub city: Option<&'a str>,
}

pub fn has_https(page: &PageView, _: &DetectContext<'_>) -> bool {
    page.base_url.scheme() == "https"
}

pub fn has_meta_viewport(page: &PageView, _: &DetectContext<'_>) -> bool {
    page.has_viewport_meta
}

pub fn has_tel_link(page: &PageView, _: &DetectContext<'_>) -> bool {
    page.anchors.iter().any(|a| a.href_lower.starts_with("tel:"))
}

pub fn phone_visible(page: &PageView, _: &DetectContext<'_>) -> bool {
    RE_PHONE.is_match(&page.text)
}

pub fn email_visible(page: &PageView, _: &DetectContext<'_>) -> bool {
    RE_EMAIL.is_match(&page.text)
}

pub fn has_contact_form(page: &PageView, _: &DetectContext<'_>) -> bool {
    page.form_count > 0
}

pub fn has_booking_link(page: &PageView, _: &DetectContext<'_>) -> bool {
    page.anchors.iter().any(|a| {
        BOOKING_KEYWORDS
            .iter()
            .any(|k| a.href_lower.contains(k) || a.text_lower.contains(k))
    })
}

pub fn has_hours(page: &PageView, _: &DetectContext<'_>) -> bool {
    page.text_lower.contains("hours") || contains_any(&page.text_lower, WEEKDAYS)
}

pub fn has_service_area(page: &PageView, ctx: &DetectContext<'_>) -> bool {
    ctx.city
        .is_some_and(|city| page.text_lower.contains(&city.to_lowercase()))
}

pub fn has_reviews(page: &PageView, _: &DetectContext<'_>) -> bool {
    contains_any(&page.text_lower, REVIEW_KEYWORDS) || page.has_star_rating
}

pub fn has_cta(page: &PageView, _: &DetectContext<'_>) -> bool {
    contains_any(&page.text_lower, CTA_KEYWORDS)
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    fn view(html: &str) -> PageView {
        PageView::parse(html, &Url::parse("https://example.com/").unwrap())
    }

    const NO_CITY: DetectContext<'static> = DetectContext { city: None };

    #[test]
    fn test_https_follows_document_url() {
        let page = PageView::parse("<body></body>", &Url::parse("http://example.com/").unwrap());
        assert!(!has_https(&page, &NO_CITY));
        assert!(has_https(&view("<body></body>"), &NO_CITY));
    }

    #[test]
    fn test_phone_shapes() {
        assert!(phone_visible(&view("<p>Call (512) 555-0100 today</p>"), &NO_CITY));
        assert!(phone_visible(&view("<p>+1 512.555.0100</p>"), &NO_CITY));
        assert!(phone_visible(&view("<p>512-555-0100</p>"), &NO_CITY));
        assert!(!phone_visible(&view("<p>Established 1987, 42 trucks</p>"), &NO_CITY));
    }

    #[test]
    fn test_email_shape() {
        assert!(email_visible(&view("<p>Write office@joes-plumbing.com</p>"), &NO_CITY));
        assert!(!email_visible(&view("<p>Write us at office at joes</p>"), &NO_CITY));
    }

    #[test]
    fn test_tel_link() {
        assert!(has_tel_link(&view(r#"<a href="tel:5125550100">Call</a>"#), &NO_CITY));
        assert!(!has_tel_link(&view(r#"<a href="/tel">Telephone</a>"#), &NO_CITY));
    }

    #[test]
    fn test_booking_link_matches_href_or_text() {
        assert!(has_booking_link(
            &view(r#"<a href="https://calendly.com/joe">Pick a time</a>"#),
            &NO_CITY
        ));
        assert!(has_booking_link(&view(r#"<a href="/x">Book Online</a>"#), &NO_CITY));
        assert!(!has_booking_link(&view(r#"<a href="/about">About</a>"#), &NO_CITY));
        // Plain text mentions do not count as a link
        assert!(!has_booking_link(&view("<p>Book with us</p>"), &NO_CITY));
    }

    #[test]
    fn test_hours() {
        assert!(has_hours(&view("<p>Open Saturday 9-5</p>"), &NO_CITY));
        assert!(has_hours(&view("<p>Our HOURS</p>"), &NO_CITY));
        assert!(!has_hours(&view("<p>Open daily</p>"), &NO_CITY));
    }

    #[test]
    fn test_service_area_needs_city() {
        let page = view("<p>Proudly serving Round Rock and Austin</p>");
        assert!(has_service_area(&page, &DetectContext { city: Some("austin") }));
        assert!(!has_service_area(&page, &DetectContext { city: Some("Dallas") }));
        assert!(!has_service_area(&page, &NO_CITY));
    }

    #[test]
    fn test_reviews_from_text_or_markup() {
        assert!(has_reviews(&view("<p>Read our Testimonials</p>"), &NO_CITY));
        assert!(has_reviews(&view(r#"<div class="stars">*****</div>"#), &NO_CITY));
        assert!(!has_reviews(&view("<p>Quality work</p>"), &NO_CITY));
    }

    #[test]
    fn test_cta() {
        assert!(has_cta(&view("<button>Get Quote</button>"), &NO_CITY));
        assert!(has_cta(&view("<p>CALL NOW</p>"), &NO_CITY));
        assert!(!has_cta(&view("<p>Welcome</p>"), &NO_CITY));
    }
}
