//! Lead input record.
//!
//! Field names follow the `leads` table so rows can be deserialized as-is.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A business lead as supplied by the caller.
///
/// The scanner only reads from this record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Lead {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,

    #[serde(default)]
    pub business_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,

    /// Preferred website column
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website_url: Option<String>,

    /// Legacy website column from simple CSV imports
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,

    /// Directory-scrape metadata (Google Maps export)
    #[serde(flatten)]
    pub directory: DirectoryData,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enrichment_status: Option<EnrichmentStatus>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enrichment_data: Option<EnrichmentData>,
}

impl Lead {
    /// Create a lead with a name and city.
    pub fn new(business_name: impl Into<String>, city: impl Into<String>) -> Self {
        Self {
            business_name: business_name.into(),
            city: Some(city.into()),
            ..Default::default()
        }
    }

    /// Set the website.
    pub fn with_website(mut self, url: impl Into<String>) -> Self {
        self.website_url = Some(url.into());
        self
    }

    /// Set directory data.
    pub fn with_directory(mut self, directory: DirectoryData) -> Self {
        self.directory = directory;
        self
    }

    /// Attach an enriched AI analysis.
    pub fn with_enrichment(mut self, data: EnrichmentData) -> Self {
        self.enrichment_status = Some(EnrichmentStatus::Enriched);
        self.enrichment_data = Some(data);
        self
    }

    /// The website to scan, if any. Blank strings count as missing.
    pub fn website(&self) -> Option<&str> {
        [self.website_url.as_deref(), self.website.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|s| !s.is_empty())
    }

    /// City name, if known and non-blank.
    pub fn city(&self) -> Option<&str> {
        self.city.as_deref().map(str::trim).filter(|c| !c.is_empty())
    }

    /// AI enrichment, only when the enrichment job finished.
    pub fn enrichment(&self) -> Option<&EnrichmentData> {
        match self.enrichment_status {
            Some(EnrichmentStatus::Enriched) => self.enrichment_data.as_ref(),
            _ => None,
        }
    }
}

/// Business-directory metadata supplied alongside the lead.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DirectoryData {
    #[serde(default)]
    pub google_verified: bool,

    #[serde(default)]
    pub google_is_claimed: bool,

    #[serde(default)]
    pub google_is_permanently_closed: bool,

    #[serde(default)]
    pub google_is_temporarily_closed: bool,

    #[serde(default)]
    pub google_hours_present: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_count: Option<u32>,
}

impl DirectoryData {
    /// Either closure flag is set.
    pub fn is_closed(&self) -> bool {
        self.google_is_permanently_closed || self.google_is_temporarily_closed
    }
}

/// State of the AI enrichment job for a lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrichmentStatus {
    Pending,
    Enriched,
    Failed,
    #[serde(other)]
    Unknown,
}

/// Pre-computed AI analysis attached to a lead.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnrichmentData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outreach_hook: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<EnrichmentAnalysis>,
}

impl EnrichmentData {
    /// Outreach hook, ignoring blank strings.
    pub fn hook(&self) -> Option<&str> {
        self.outreach_hook
            .as_deref()
            .map(str::trim)
            .filter(|h| !h.is_empty())
    }

    /// First listed weakness, ignoring blank strings.
    pub fn first_weakness(&self) -> Option<&str> {
        self.analysis
            .as_ref()?
            .weaknesses_or_gaps
            .first()
            .map(|w| w.trim())
            .filter(|w| !w.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnrichmentAnalysis {
    #[serde(default)]
    pub weaknesses_or_gaps: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_tech_savviness: Option<String>,
}
