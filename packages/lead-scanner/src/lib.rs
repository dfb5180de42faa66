//! Lead Web-Presence Scanner
//!
//! Fetches a business lead's website, detects conversion signals on it, and
//! produces a qualification verdict: a 0-10 deficiency score, the top
//! reasons, the missing signals, an outreach angle and a confidence label.
//!
//! # Design
//!
//! - One fetch of the home page, at most one more for a contact page
//! - Policy lives in ordered rule tables, not ad hoc branches
//! - Scans never fail; network trouble becomes a low-confidence verdict
//! - No state is kept between scans, so one `Scanner` serves many tasks
//!
//! # Usage
//!
//! ```rust,ignore
//! use lead_scanner::{Lead, ScanConfig, Scanner};
//!
//! let scanner = Scanner::new(ScanConfig::default())?;
//! let lead = Lead::new("Joe's Plumbing", "Austin").with_website("joesplumbing.com");
//!
//! let result = scanner.scan(&lead).await;
//! println!("{} ({}): {}", result.score, result.confidence, result.recommended_angle);
//! ```
//!
//! # Modules
//!
//! - [`security`] - URL safety gate (scheme and private-network checks)
//! - [`fetcher`] - Page fetching with deadline and size cap
//! - [`signals`] - HTML signal detectors
//! - [`discovery`] - Contact-page probe
//! - [`scoring`] - Penalty rule table
//! - [`fusion`] - Directory-data adjustments
//! - [`recommend`] - Outreach angle and reasons
//! - [`scanner`] - The pipeline tying the stages together

pub mod discovery;
pub mod error;
pub mod fetcher;
pub mod fusion;
pub mod recommend;
pub mod scanner;
pub mod scoring;
pub mod security;
pub mod signals;
pub mod types;

// Re-export core types at crate root
pub use error::{FetchError, FetchResult, SecurityError, SecurityResult};
pub use fetcher::{fetch_bounded, FetchedPage, HttpFetcher, MockFetcher, PageFetcher};
pub use scanner::Scanner;
pub use security::UrlGate;
pub use types::{
    config::{ScanConfig, DEFAULT_USER_AGENT},
    lead::{DirectoryData, EnrichmentAnalysis, EnrichmentData, EnrichmentStatus, Lead},
    result::{Confidence, ContactProbe, Findings, ScanResult},
    signals::{ContactFormSource, Signal, SignalSet},
};
