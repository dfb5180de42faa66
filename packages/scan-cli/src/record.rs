//! Persisted shape of a scan, one per lead.

use chrono::{DateTime, Utc};
use lead_scanner::{Confidence, Findings, ScanResult};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanStatus {
    Done,
    Failed,
}

/// Scan columns of a lead row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadScanRecord {
    pub lead_id: Option<Uuid>,
    pub scan_status: ScanStatus,
    pub scan_score: Option<u8>,
    pub scan_reasons: Vec<String>,
    pub scan_missing: Vec<String>,
    pub scan_recommended_angle: Option<String>,
    pub scan_confidence: Option<Confidence>,
    pub scan_findings_json: Findings,
    pub scan_last_at: DateTime<Utc>,
    pub scan_error: Option<String>,
}

impl LeadScanRecord {
    pub fn done(lead_id: Option<Uuid>, result: ScanResult, at: DateTime<Utc>) -> Self {
        Self {
            lead_id,
            scan_status: ScanStatus::Done,
            scan_score: Some(result.score),
            scan_reasons: result.reasons,
            scan_missing: result.missing,
            scan_recommended_angle: Some(result.recommended_angle),
            scan_confidence: Some(result.confidence),
            scan_findings_json: result.findings,
            scan_last_at: at,
            scan_error: result.error,
        }
    }

    /// Record for an input row that could not be read as a lead.
    pub fn failed(lead_id: Option<Uuid>, error: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            lead_id,
            scan_status: ScanStatus::Failed,
            scan_score: None,
            scan_reasons: Vec::new(),
            scan_missing: Vec::new(),
            scan_recommended_angle: None,
            scan_confidence: None,
            scan_findings_json: Findings::new(),
            scan_last_at: at,
            scan_error: Some(error.into()),
        }
    }
}

/// Batch totals printed after a run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Summary {
    pub processed: usize,
    pub failed: usize,
    pub low: usize,
    pub medium: usize,
    pub high: usize,
    pub unreachable: usize,
}

impl Summary {
    pub fn record(&mut self, record: &LeadScanRecord) {
        self.processed += 1;
        match record.scan_status {
            ScanStatus::Failed => self.failed += 1,
            ScanStatus::Done => {
                match record.scan_confidence {
                    Some(Confidence::Low) => self.low += 1,
                    Some(Confidence::Medium) => self.medium += 1,
                    Some(Confidence::High) => self.high += 1,
                    None => {}
                }
                if record.scan_error.is_some() {
                    self.unreachable += 1;
                }
            }
        }
    }
}
