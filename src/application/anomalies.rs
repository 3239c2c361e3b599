//! Anomaly rows and severity-bucketed alerts.
//!
//! Both views project the same KPI export: anomaly records pass the raw row
//! through alongside normalized fields, and alerts bucket each record's
//! score into a discrete severity label.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use utoipa::ToSchema;

use crate::infrastructure::datasets::{parse_cell, text_cell, Table};

use super::kpi::{is_anomalous, ANOMALY_COLUMNS};
use super::REFINERY_DATA_FILE;

const SCORE_COLUMNS: &[&str] = &["score", "anomaly_score", "z_score"];
const TIME_COLUMNS: &[&str] = &["timestamp", "time", "date"];

/// One anomalous row from the export.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AnomalyRecord {
    pub timestamp: Option<String>,
    pub score: Option<f64>,
    /// Raw passthrough of the original row.
    #[schema(value_type = Object)]
    pub raw: Map<String, Value>,
}

/// Severity-bucketed alert derived from an anomaly record.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Alert {
    pub id: Option<String>,
    pub message: String,
    pub severity: String,
    pub timestamp: DateTime<Utc>,
    pub source: String,
}

/// Bucket a continuous anomaly score into a discrete label. Lower bounds
/// are inclusive.
pub fn severity_for(score: f64) -> &'static str {
    if score >= 0.9 {
        "critical"
    } else if score >= 0.7 {
        "high"
    } else if score >= 0.5 {
        "medium"
    } else {
        "low"
    }
}

/// Load up to `limit` anomalous rows. When the export carries no anomaly
/// column every row qualifies; a missing file yields an empty list.
pub fn load_anomalies(data_dir: &Path, limit: usize) -> Vec<AnomalyRecord> {
    let table = Table::load(&data_dir.join(REFINERY_DATA_FILE));
    let anomaly_col = table.resolve_column(ANOMALY_COLUMNS);
    let score_col = table.resolve_column(SCORE_COLUMNS);
    let time_col = table.resolve_column(TIME_COLUMNS);

    table
        .rows()
        .iter()
        .enumerate()
        .filter(|(_, row)| match anomaly_col {
            Some(column) => is_anomalous(row.get(column).and_then(|cell| parse_cell(cell))),
            None => true,
        })
        .take(limit)
        .map(|(idx, row)| AnomalyRecord {
            timestamp: text_cell(row, time_col),
            score: score_col
                .and_then(|column| row.get(column))
                .and_then(|cell| parse_cell(cell)),
            raw: table.row_to_json(idx),
        })
        .collect()
}

/// Severity-bucketed alerts for the current anomalies. A record without a
/// score falls into the lowest bucket.
pub fn build_alerts(data_dir: &Path, limit: usize) -> Vec<Alert> {
    load_anomalies(data_dir, limit)
        .into_iter()
        .map(|record| Alert {
            id: None,
            message: "Anomaly detected in refinery operations.".to_string(),
            severity: severity_for(record.score.unwrap_or(0.0)).to_string(),
            timestamp: Utc::now(),
            source: "anomaly_detection".to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buckets_scores_with_inclusive_lower_bounds() {
        assert_eq!(severity_for(0.95), "critical");
        assert_eq!(severity_for(0.75), "high");
        assert_eq!(severity_for(0.55), "medium");
        assert_eq!(severity_for(0.1), "low");

        assert_eq!(severity_for(0.9), "critical");
        assert_eq!(severity_for(0.7), "high");
        assert_eq!(severity_for(0.5), "medium");
        assert_eq!(severity_for(0.0), "low");
    }

    fn write_export(rows: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("refineryiq-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(REFINERY_DATA_FILE), rows).unwrap();
        dir
    }

    #[test]
    fn keeps_only_flagged_rows() {
        let dir = write_export(
            "timestamp,energy,anomaly,score\n\
             t0,10,0,0.1\n\
             t1,20,1,0.95\n\
             t2,30,0,0.2\n\
             t3,40,1,0.6\n",
        );

        let records = load_anomalies(&dir, 100);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].timestamp.as_deref(), Some("t1"));
        assert_eq!(records[0].score, Some(0.95));
        assert_eq!(records[0].raw["energy"], serde_json::json!(20.0));
        assert_eq!(records[1].timestamp.as_deref(), Some("t3"));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn missing_anomaly_column_keeps_every_row() {
        let dir = write_export("timestamp,energy\nt0,10\nt1,20\nt2,30\n");

        let records = load_anomalies(&dir, 2);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].score, None);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn missing_file_yields_no_records() {
        assert!(load_anomalies(Path::new("/definitely/not/here"), 10).is_empty());
    }

    #[test]
    fn alerts_bucket_scores_and_default_to_low() {
        let dir = write_export(
            "timestamp,anomaly,score\n\
             t0,1,0.92\n\
             t1,1,\n",
        );

        let alerts = build_alerts(&dir, 10);
        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].severity, "critical");
        assert_eq!(alerts[1].severity, "low");
        assert_eq!(alerts[0].source, "anomaly_detection");

        std::fs::remove_dir_all(&dir).ok();
    }
}
