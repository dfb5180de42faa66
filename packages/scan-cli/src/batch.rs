//! Batch scanning with bounded concurrency.

use anyhow::Result;
use chrono::Utc;
use futures::stream::{self, StreamExt};
use lead_scanner::{Lead, PageFetcher, Scanner};
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

use crate::record::{LeadScanRecord, Summary};

/// Scan every row, at most `concurrency` at a time, handing records to
/// `sink` in input order.
pub async fn run_batch<F, S>(
    scanner: &Scanner<F>,
    rows: Vec<Value>,
    concurrency: usize,
    mut sink: S,
) -> Result<Summary>
where
    F: PageFetcher,
    S: FnMut(&LeadScanRecord) -> Result<()>,
{
    let total = rows.len();
    info!(total, concurrency, "batch starting");

    let mut records = std::pin::pin!(stream::iter(rows)
        .map(|row| scan_row(scanner, row))
        .buffered(concurrency.max(1)));

    let mut summary = Summary::default();
    while let Some(record) = records.next().await {
        summary.record(&record);
        sink(&record)?;
    }

    info!(
        processed = summary.processed,
        failed = summary.failed,
        unreachable = summary.unreachable,
        "batch finished"
    );
    Ok(summary)
}

async fn scan_row<F: PageFetcher>(scanner: &Scanner<F>, row: Value) -> LeadScanRecord {
    let lead_id = row
        .get("id")
        .and_then(Value::as_str)
        .and_then(|id| Uuid::parse_str(id).ok());

    match serde_json::from_value::<Lead>(row) {
        Ok(lead) => {
            let result = scanner.scan(&lead).await;
            LeadScanRecord::done(lead.id, result, Utc::now())
        }
        Err(e) => {
            warn!(?lead_id, error = %e, "skipping unreadable lead");
            LeadScanRecord::failed(lead_id, format!("Invalid lead: {e}"), Utc::now())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::ScanStatus;
    use lead_scanner::{MockFetcher, ScanConfig};
    use serde_json::json;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_records_keep_input_order() {
        let fetcher = MockFetcher::new()
            .with_page("https://slow.example/", "<p>slow</p>")
            .with_delay("https://slow.example/", Duration::from_secs(5))
            .with_page("https://fast.example/", "<form></form>");
        let scanner = Scanner::with_fetcher(fetcher, ScanConfig::default());
        let rows = vec![
            json!({ "business_name": "Slow", "website_url": "https://slow.example/" }),
            json!({ "business_name": "Fast", "website_url": "https://fast.example/" }),
            json!({ "business_name": "Offline" }),
        ];

        let mut seen = Vec::new();
        let summary = run_batch(&scanner, rows, 3, |record| {
            seen.push(record.clone());
            Ok(())
        })
        .await
        .unwrap();

        assert_eq!(summary.processed, 3);
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[0].scan_score, Some(8));
        assert_eq!(seen[1].scan_score, Some(7));
        assert_eq!(seen[2].scan_reasons, vec!["No website listed"]);
    }

    #[tokio::test]
    async fn test_unreadable_row_does_not_abort_batch() {
        let scanner = Scanner::with_fetcher(MockFetcher::new(), ScanConfig::default());
        let rows = vec![
            json!({ "id": "0b9b1c2e-6a43-4c5e-9a51-2f4a1d5e7c10", "business_name": 42 }),
            json!({ "business_name": "Joe's Plumbing" }),
        ];

        let mut seen = Vec::new();
        let summary = run_batch(&scanner, rows, 5, |record| {
            seen.push(record.clone());
            Ok(())
        })
        .await
        .unwrap();

        assert_eq!(summary.failed, 1);
        assert_eq!(seen[0].scan_status, ScanStatus::Failed);
        assert!(seen[0].lead_id.is_some());
        assert!(seen[0]
            .scan_error
            .as_deref()
            .is_some_and(|e| e.starts_with("Invalid lead:")));
        assert_eq!(seen[1].scan_status, ScanStatus::Done);
    }
}
