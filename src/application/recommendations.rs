//! Optimization recommendation projections.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::infrastructure::datasets::{text_cell, Table};

const RECOMMENDATIONS_FILE: &str = "optimization_recommendations.csv";

const TITLE_COLUMNS: &[&str] = &["title", "recommendation"];
const DESCRIPTION_COLUMNS: &[&str] = &["description", "details"];
const IMPACT_COLUMNS: &[&str] = &["impact", "benefit"];

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Recommendation {
    pub id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub impact: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Load up to `limit` recommendations; rows without a recognizable title
/// keep a generic one.
pub fn load_recommendations(data_dir: &Path, limit: usize) -> Vec<Recommendation> {
    let table = Table::load(&data_dir.join(RECOMMENDATIONS_FILE));
    let title_col = table.resolve_column(TITLE_COLUMNS);
    let description_col = table.resolve_column(DESCRIPTION_COLUMNS);
    let impact_col = table.resolve_column(IMPACT_COLUMNS);

    table
        .rows()
        .iter()
        .take(limit)
        .map(|row| Recommendation {
            id: None,
            title: text_cell(row, title_col).unwrap_or_else(|| "Optimization".to_string()),
            description: text_cell(row, description_col),
            impact: text_cell(row, impact_col),
            timestamp: Utc::now(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_columns_and_falls_back_on_title() {
        let dir = std::env::temp_dir().join(format!("refineryiq-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join(RECOMMENDATIONS_FILE),
            "Recommendation,Details,Benefit\n\
             Lower furnace setpoint,Reduce excess firing,5% energy\n\
             ,,\n",
        )
        .unwrap();

        let recs = load_recommendations(&dir, 10);
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].title, "Lower furnace setpoint");
        assert_eq!(recs[0].description.as_deref(), Some("Reduce excess firing"));
        assert_eq!(recs[0].impact.as_deref(), Some("5% energy"));
        assert_eq!(recs[1].title, "Optimization");
        assert_eq!(recs[1].description, None);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn respects_the_limit() {
        let dir = std::env::temp_dir().join(format!("refineryiq-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join(RECOMMENDATIONS_FILE),
            "title\none\ntwo\nthree\n",
        )
        .unwrap();

        assert_eq!(load_recommendations(&dir, 2).len(), 2);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn missing_file_yields_no_records() {
        assert!(load_recommendations(Path::new("/definitely/not/here"), 10).is_empty());
    }
}
