//! Forecast projections, one source file per metric.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

use crate::infrastructure::datasets::{parse_cell, text_cell, Table};

const TIME_COLUMNS: &[&str] = &["timestamp", "date", "time"];

/// Which forecast to serve. Unsupported values are rejected at the request
/// boundary before any file access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ForecastKind {
    Energy,
    Sec,
}

impl ForecastKind {
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Energy => "energy_forecast.csv",
            Self::Sec => "sec_forecast.csv",
        }
    }

    pub fn metric(self) -> &'static str {
        match self {
            Self::Energy => "energy",
            Self::Sec => "sec",
        }
    }
}

/// One forecast row tagged with its metric.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ForecastRecord {
    pub timestamp: Option<String>,
    pub value: Option<f64>,
    pub metric: String,
    /// Raw passthrough of the original row.
    #[schema(value_type = Object)]
    pub raw: Map<String, Value>,
}

/// Load up to `limit` rows from the metric's forecast file.
pub fn load_forecast(data_dir: &Path, kind: ForecastKind, limit: usize) -> Vec<ForecastRecord> {
    let table = Table::load(&data_dir.join(kind.file_name()));
    let time_col = table.resolve_column(TIME_COLUMNS);
    let value_col = table.resolve_column(&["value", kind.metric(), "forecast"]);

    table
        .rows()
        .iter()
        .enumerate()
        .take(limit)
        .map(|(idx, row)| ForecastRecord {
            timestamp: text_cell(row, time_col),
            value: value_col
                .and_then(|column| row.get(column))
                .and_then(|cell| parse_cell(cell)),
            metric: kind.metric().to_string(),
            raw: table.row_to_json(idx),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_kind_reads_its_own_file_and_tags_records() {
        let dir = std::env::temp_dir().join(format!("refineryiq-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("energy_forecast.csv"), "date,value\nd0,120.5\n").unwrap();
        std::fs::write(dir.join("sec_forecast.csv"), "date,sec\nd0,3.7\nd1,3.9\n").unwrap();

        let energy = load_forecast(&dir, ForecastKind::Energy, 100);
        assert_eq!(energy.len(), 1);
        assert_eq!(energy[0].metric, "energy");
        assert_eq!(energy[0].value, Some(120.5));

        let sec = load_forecast(&dir, ForecastKind::Sec, 100);
        assert_eq!(sec.len(), 2);
        assert_eq!(sec[0].metric, "sec");
        assert_eq!(sec[0].value, Some(3.7));
        assert_eq!(sec[0].timestamp.as_deref(), Some("d0"));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn prefers_the_generic_value_column() {
        let dir = std::env::temp_dir().join(format!("refineryiq-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join("energy_forecast.csv"),
            "timestamp,value,energy\nt0,11.0,99.0\n",
        )
        .unwrap();

        let records = load_forecast(&dir, ForecastKind::Energy, 10);
        assert_eq!(records[0].value, Some(11.0));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn missing_file_yields_no_records() {
        assert!(load_forecast(Path::new("/definitely/not/here"), ForecastKind::Sec, 10).is_empty());
    }
}
