//! KPI aggregation and snapshot resolution.
//!
//! `GET /kpis/summary` serves the newest persisted snapshot when one exists
//! and otherwise computes one live from the KPI export: persisted if
//! present, else computed, never both. Listing snapshots is store-only with
//! no fallback.

use std::path::Path;

use chrono::{DateTime, Utc};
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder, QuerySelect};
use serde::Serialize;
use tracing::warn;
use utoipa::ToSchema;

use crate::domain::ApiError;
use crate::infrastructure::database::entities::kpi_snapshot;
use crate::infrastructure::datasets::{parse_cell, Table};

use super::REFINERY_DATA_FILE;

/// Candidate header names per logical field, in preference order.
const ENERGY_COLUMNS: &[&str] = &[
    "energy",
    "energy_consumption",
    "total_energy",
    "energy_kwh",
    "consumption",
];
const SEC_COLUMNS: &[&str] = &["sec", "specific_energy_consumption", "sec_value"];
pub(crate) const ANOMALY_COLUMNS: &[&str] = &["anomaly", "is_anomaly", "anomaly_flag"];

/// Point-in-time KPI summary, either computed fresh or read from storage.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct KpiSummary {
    pub total_energy: Option<f64>,
    pub avg_energy: Option<f64>,
    pub avg_sec: Option<f64>,
    pub anomaly_rate: Option<f64>,
    pub last_updated: DateTime<Utc>,
}

/// Persisted snapshot as served by `GET /kpis/snapshots`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct KpiSnapshot {
    pub id: Option<String>,
    pub total_energy: Option<f64>,
    pub avg_energy: Option<f64>,
    pub avg_sec: Option<f64>,
    pub anomaly_rate: Option<f64>,
    pub last_updated: DateTime<Utc>,
}

impl From<kpi_snapshot::Model> for KpiSummary {
    fn from(model: kpi_snapshot::Model) -> Self {
        Self {
            total_energy: model.total_energy,
            avg_energy: model.avg_energy,
            avg_sec: model.avg_sec,
            anomaly_rate: model.anomaly_rate,
            last_updated: model.timestamp,
        }
    }
}

impl From<kpi_snapshot::Model> for KpiSnapshot {
    fn from(model: kpi_snapshot::Model) -> Self {
        Self {
            id: Some(model.id),
            total_energy: model.total_energy,
            avg_energy: model.avg_energy,
            avg_sec: model.avg_sec,
            anomaly_rate: model.anomaly_rate,
            last_updated: model.timestamp,
        }
    }
}

/// Whether an anomaly-flag cell marks the row anomalous. Any nonzero value
/// counts, not only `1`.
pub(crate) fn is_anomalous(value: Option<f64>) -> bool {
    value.is_some_and(|v| v != 0.0)
}

fn column_stats(table: &Table, column: Option<usize>) -> (Option<f64>, Option<f64>) {
    let Some(column) = column else {
        return (None, None);
    };
    let values: Vec<f64> = table
        .rows()
        .iter()
        .filter_map(|row| row.get(column).and_then(|cell| parse_cell(cell)))
        .collect();
    if values.is_empty() {
        return (None, None);
    }
    let total: f64 = values.iter().sum();
    (Some(total), Some(total / values.len() as f64))
}

/// Compute a summary over the loaded table. Each column resolves
/// independently: a missing anomaly column never blocks an energy total,
/// and unparseable cells degrade to absent values instead of aborting.
pub fn compute_summary(table: &Table) -> KpiSummary {
    let energy_col = table.resolve_column(ENERGY_COLUMNS);
    let sec_col = table.resolve_column(SEC_COLUMNS);
    let anomaly_col = table.resolve_column(ANOMALY_COLUMNS);

    let (total_energy, avg_energy) = column_stats(table, energy_col);
    let (_, avg_sec) = column_stats(table, sec_col);

    let anomaly_rate = match anomaly_col {
        Some(column) if table.row_count() > 0 => {
            let flagged = table
                .rows()
                .iter()
                .filter(|row| is_anomalous(row.get(column).and_then(|cell| parse_cell(cell))))
                .count();
            Some(flagged as f64 / table.row_count() as f64)
        }
        _ => None,
    };

    KpiSummary {
        total_energy,
        avg_energy,
        avg_sec,
        anomaly_rate,
        last_updated: Utc::now(),
    }
}

fn compute_live(data_dir: &Path) -> KpiSummary {
    let table = Table::load(&data_dir.join(REFINERY_DATA_FILE));
    compute_summary(&table)
}

/// Newest persisted snapshot, else a live-computed one. The computed path
/// also covers an unreachable store; it is always available as a backstop.
pub async fn latest_snapshot(db: &DatabaseConnection, data_dir: &Path) -> KpiSummary {
    match kpi_snapshot::Entity::find()
        .order_by_desc(kpi_snapshot::Column::Timestamp)
        .one(db)
        .await
    {
        Ok(Some(model)) => model.into(),
        Ok(None) => compute_live(data_dir),
        Err(e) => {
            warn!("snapshot query failed, computing live summary: {e}");
            compute_live(data_dir)
        }
    }
}

/// Up to `limit` persisted snapshots, newest first. Store-only: an empty
/// store yields an empty list, never a computed fallback.
pub async fn list_snapshots(
    db: &DatabaseConnection,
    limit: u64,
) -> Result<Vec<KpiSnapshot>, ApiError> {
    let models = kpi_snapshot::Entity::find()
        .order_by_desc(kpi_snapshot::Column::Timestamp)
        .limit(limit)
        .all(db)
        .await?;

    Ok(models.into_iter().map(KpiSnapshot::from).collect())
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use sea_orm::{ActiveModelTrait, ConnectOptions, Database, Set};
    use sea_orm_migration::MigratorTrait;

    use super::*;
    use crate::infrastructure::database::migrator::Migrator;

    async fn test_db() -> DatabaseConnection {
        let mut options = ConnectOptions::new("sqlite::memory:");
        options.max_connections(1);
        let db = Database::connect(options).await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        db
    }

    async fn insert_snapshot(
        db: &DatabaseConnection,
        id: &str,
        total_energy: f64,
        timestamp: DateTime<Utc>,
    ) {
        kpi_snapshot::ActiveModel {
            id: Set(id.to_string()),
            total_energy: Set(Some(total_energy)),
            avg_energy: Set(Some(10.0)),
            avg_sec: Set(None),
            anomaly_rate: Set(Some(0.1)),
            timestamp: Set(timestamp),
        }
        .insert(db)
        .await
        .unwrap();
    }

    fn table(headers: &[&str], rows: &[&[&str]]) -> Table {
        Table::new(
            headers.iter().map(|h| h.to_string()).collect(),
            rows.iter()
                .map(|row| row.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn empty_table_yields_all_null_summary() {
        let summary = compute_summary(&Table::default());
        assert_eq!(summary.total_energy, None);
        assert_eq!(summary.avg_energy, None);
        assert_eq!(summary.avg_sec, None);
        assert_eq!(summary.anomaly_rate, None);
        assert!(summary.last_updated <= Utc::now());
    }

    #[test]
    fn sums_and_means_resolved_columns() {
        let t = table(
            &["Timestamp", "Energy_Consumption", "SEC", "Is_Anomaly"],
            &[
                &["t0", "10", "2.0", "0"],
                &["t1", "20", "4.0", "1"],
                &["t2", "30", "6.0", "0"],
                &["t3", "40", "8.0", "0"],
            ],
        );
        let summary = compute_summary(&t);
        assert_eq!(summary.total_energy, Some(100.0));
        assert_eq!(summary.avg_energy, Some(25.0));
        assert_eq!(summary.avg_sec, Some(5.0));
        assert_eq!(summary.anomaly_rate, Some(0.25));
    }

    #[test]
    fn zero_flagged_rows_give_zero_rate() {
        let rows: Vec<Vec<String>> = (0..10)
            .map(|i| vec![format!("{i}"), "0".to_string()])
            .collect();
        let t = Table::new(vec!["energy".to_string(), "anomaly".to_string()], rows);
        assert_eq!(compute_summary(&t).anomaly_rate, Some(0.0));
    }

    #[test]
    fn nonzero_flags_count_as_anomalous() {
        let t = table(
            &["energy", "anomaly"],
            &[&["1", "0"], &["2", "2"], &["3", "0"], &["4", "0"]],
        );
        assert_eq!(compute_summary(&t).anomaly_rate, Some(0.25));
    }

    #[test]
    fn unparseable_cells_degrade_to_absent() {
        let t = table(
            &["energy", "sec"],
            &[&["10", "n/a"], &["garbage", "n/a"], &["20", "n/a"]],
        );
        let summary = compute_summary(&t);
        assert_eq!(summary.total_energy, Some(30.0));
        assert_eq!(summary.avg_energy, Some(15.0));
        assert_eq!(summary.avg_sec, None);
        // No anomaly column resolved; rate stays absent.
        assert_eq!(summary.anomaly_rate, None);
    }

    #[test]
    fn missing_columns_do_not_block_each_other() {
        let t = table(&["sec"], &[&["2.0"], &["4.0"]]);
        let summary = compute_summary(&t);
        assert_eq!(summary.total_energy, None);
        assert_eq!(summary.avg_sec, Some(3.0));
    }

    #[tokio::test]
    async fn latest_snapshot_prefers_newest_persisted_row() {
        let db = test_db().await;
        let now = Utc::now();
        insert_snapshot(&db, "older", 100.0, now - Duration::hours(2)).await;
        insert_snapshot(&db, "newer", 200.0, now - Duration::hours(1)).await;

        let summary = latest_snapshot(&db, Path::new("/nonexistent")).await;
        assert_eq!(summary.total_energy, Some(200.0));
    }

    #[tokio::test]
    async fn latest_snapshot_computes_when_store_is_empty() {
        let db = test_db().await;
        let dir = std::env::temp_dir().join(format!("refineryiq-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join(REFINERY_DATA_FILE),
            "timestamp,energy,anomaly\nt0,10,0\nt1,20,1\n",
        )
        .unwrap();

        let summary = latest_snapshot(&db, &dir).await;
        assert_eq!(summary.total_energy, Some(30.0));
        assert_eq!(summary.anomaly_rate, Some(0.5));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn list_snapshots_is_store_only_and_newest_first() {
        let db = test_db().await;
        assert!(list_snapshots(&db, 10).await.unwrap().is_empty());

        let now = Utc::now();
        insert_snapshot(&db, "a", 1.0, now - Duration::hours(3)).await;
        insert_snapshot(&db, "b", 2.0, now - Duration::hours(1)).await;
        insert_snapshot(&db, "c", 3.0, now - Duration::hours(2)).await;

        let snapshots = list_snapshots(&db, 2).await.unwrap();
        assert_eq!(snapshots.len(), 2);
        assert_eq!(snapshots[0].id.as_deref(), Some("b"));
        assert_eq!(snapshots[1].id.as_deref(), Some("c"));
    }
}
