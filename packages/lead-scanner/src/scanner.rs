//! Single-lead scanning pipeline.
//!
//! ```text
//! UrlGate -> fetch_bounded -> extract -> probe_contact_page -> score_page -> fuse -> recommend
//! ```
//!
//! Every stage is a pure function of its inputs plus the lead. A scan never
//! fails: transport and gate errors become a low-confidence [`ScanResult`].

use serde_json::Value;
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::discovery::probe_contact_page;
use crate::error::{FetchError, FetchResult};
use crate::fetcher::{fetch_bounded, HttpFetcher, PageFetcher};
use crate::fusion::fuse;
use crate::recommend::{recommend, Evidence};
use crate::scoring::{score_page, NO_WEBSITE, NO_WEBSITE_PENALTY};
use crate::security::UrlGate;
use crate::signals::{extract, DetectContext, PageView};
use crate::types::config::ScanConfig;
use crate::types::lead::Lead;
use crate::types::result::{signal_findings, Confidence, ContactProbe, Findings, ScanResult};
use crate::types::signals::{ContactFormSource, Signal, SignalSet};

pub const UNREACHABLE_PREFIX: &str = "Site unreachable: ";

/// What the fetch stages learned about the lead's website.
#[derive(Debug)]
enum SiteEvidence {
    /// No website on the lead; directory data is the only evidence
    NoWebsite,
    Unreachable(FetchError),
    Site {
        signals: SignalSet,
        final_url: Url,
        probe: Option<ContactProbe>,
    },
}

/// Per-stage output before fusion.
struct Assessment {
    base_score: i32,
    missing: Vec<String>,
    lead_reasons: Vec<String>,
    confidence: Confidence,
    findings: Findings,
    error: Option<String>,
    probe: Option<ContactProbe>,
}

/// Scans leads. Holds no per-scan state, so one instance can serve
/// concurrent scans.
///
/// # Example
///
/// ```rust,ignore
/// let scanner = Scanner::new(ScanConfig::default())?;
/// let result = scanner.scan(&lead).await;
/// ```
pub struct Scanner<F: PageFetcher = HttpFetcher> {
    fetcher: F,
    gate: UrlGate,
    config: ScanConfig,
}

impl Scanner<HttpFetcher> {
    /// HTTP scanner with the default safety gate.
    pub fn new(config: ScanConfig) -> FetchResult<Self> {
        Self::http(config, UrlGate::new())
    }

    /// HTTP scanner whose requests and redirects are checked by `gate`.
    pub fn http(config: ScanConfig, gate: UrlGate) -> FetchResult<Self> {
        let fetcher = HttpFetcher::with_gate(&config, gate.clone())?;
        Ok(Self {
            fetcher,
            gate,
            config,
        })
    }
}

impl<F: PageFetcher> Scanner<F> {
    /// Scanner over any fetcher, with the default safety gate.
    pub fn with_fetcher(fetcher: F, config: ScanConfig) -> Self {
        Self {
            fetcher,
            gate: UrlGate::new(),
            config,
        }
    }

    /// Replace the safety gate.
    pub fn with_gate(mut self, gate: UrlGate) -> Self {
        self.gate = gate;
        self
    }

    /// Produce a qualification verdict for one lead.
    #[instrument(skip_all, fields(lead = %lead.business_name))]
    pub async fn scan(&self, lead: &Lead) -> ScanResult {
        let evidence = self.gather(lead).await;
        let assessment = assess(evidence, lead);

        let fused = fuse(assessment.base_score, &lead.directory);
        let recommendation = recommend(&Evidence {
            closed: fused.closed,
            has_website: lead.website().is_some(),
            missing: &assessment.missing,
            lead_reasons: &assessment.lead_reasons,
            enrichment: lead.enrichment(),
        });

        info!(
            score = fused.score,
            confidence = %assessment.confidence,
            closed = fused.closed,
            missing = assessment.missing.len(),
            "scan complete"
        );

        ScanResult {
            score: fused.score,
            reasons: recommendation.reasons,
            missing: assessment.missing,
            recommended_angle: recommendation.angle,
            confidence: assessment.confidence,
            findings: assessment.findings,
            error: assessment.error,
            contact_page: assessment.probe,
        }
    }

    async fn gather(&self, lead: &Lead) -> SiteEvidence {
        let Some(website) = lead.website() else {
            debug!("lead has no website");
            return SiteEvidence::NoWebsite;
        };

        let url = match self.gate.normalize(website) {
            Ok(url) => url,
            Err(e) => {
                warn!(website, error = %e, "website rejected by safety gate");
                return SiteEvidence::Unreachable(e.into());
            }
        };

        let page = match fetch_bounded(&self.fetcher, &url, &self.config).await {
            Ok(page) => page,
            Err(e) => {
                warn!(url = %url, error = %e, "site unreachable");
                return SiteEvidence::Unreachable(e);
            }
        };

        let view = PageView::parse(&page.html, &page.url);
        let signals = extract(&view, &DetectContext { city: lead.city() });

        if signals.is(Signal::HasContactForm) {
            return SiteEvidence::Site {
                signals,
                final_url: page.url,
                probe: None,
            };
        }

        let probe = probe_contact_page(&self.fetcher, &self.gate, &self.config, &view, &url).await;
        let signals = if probe.found_form() {
            signals.with_contact_page_form()
        } else {
            signals
        };

        SiteEvidence::Site {
            signals,
            final_url: page.url,
            probe: Some(probe),
        }
    }
}

fn assess(evidence: SiteEvidence, lead: &Lead) -> Assessment {
    match evidence {
        SiteEvidence::NoWebsite => Assessment {
            base_score: NO_WEBSITE_PENALTY,
            missing: Vec::new(),
            lead_reasons: vec![NO_WEBSITE.to_string()],
            confidence: Confidence::Low,
            findings: Findings::new(),
            error: None,
            probe: None,
        },
        SiteEvidence::Unreachable(error) => {
            let message = error.to_string();
            let mut findings = Findings::new();
            findings.insert("error".to_string(), Value::String(message.clone()));
            Assessment {
                base_score: 0,
                missing: Vec::new(),
                lead_reasons: vec![format!("{UNREACHABLE_PREFIX}{message}")],
                confidence: Confidence::Low,
                findings,
                error: Some(message),
                probe: None,
            }
        }
        SiteEvidence::Site {
            signals,
            final_url,
            probe,
        } => {
            let page_score = score_page(&signals, &lead.directory);

            let confidence = match signals.contact_form_source() {
                ContactFormSource::ContactPage => Confidence::Medium,
                _ => Confidence::High,
            };

            let mut findings = signal_findings(&signals);
            findings.insert("final_url".to_string(), Value::String(final_url.to_string()));
            if let Some(ContactProbe::FormFound { url }) = &probe {
                findings.insert("contact_page_url".to_string(), Value::String(url.clone()));
            }

            Assessment {
                base_score: page_score.score,
                missing: page_score.missing,
                lead_reasons: page_score.notes,
                confidence,
                findings,
                error: None,
                probe,
            }
        }
    }
}
