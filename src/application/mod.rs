//! Application services: thin read-and-reshape operations over the CSV
//! exports and the persisted store.

pub mod anomalies;
pub mod chat;
pub mod forecasts;
pub mod kpi;
pub mod recommendations;

/// KPI summaries and anomaly rows share one operational export.
pub(crate) const REFINERY_DATA_FILE: &str = "final_refinery_data_with_anomalies.csv";
