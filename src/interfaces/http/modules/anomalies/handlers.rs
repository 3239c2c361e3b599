//! Anomaly API handlers

use std::path::PathBuf;

use axum::{extract::State, Json};

use super::dto::AnomalyListParams;
use crate::application::anomalies::{build_alerts, load_anomalies, Alert, AnomalyRecord};
use crate::interfaces::http::common::ValidatedQuery;

/// Anomaly handler state
#[derive(Clone)]
pub struct AnomalyHandlerState {
    pub data_dir: PathBuf,
}

#[utoipa::path(
    get,
    path = "/anomalies",
    tag = "Anomalies",
    params(AnomalyListParams),
    responses(
        (status = 200, description = "Anomalous rows from the export", body = [AnomalyRecord]),
        (status = 422, description = "Invalid limit")
    )
)]
pub async fn get_anomalies(
    State(state): State<AnomalyHandlerState>,
    ValidatedQuery(params): ValidatedQuery<AnomalyListParams>,
) -> Json<Vec<AnomalyRecord>> {
    Json(load_anomalies(&state.data_dir, params.limit))
}

#[utoipa::path(
    get,
    path = "/anomalies/alerts",
    tag = "Anomalies",
    params(AnomalyListParams),
    responses(
        (status = 200, description = "Severity-bucketed alerts", body = [Alert]),
        (status = 422, description = "Invalid limit")
    )
)]
pub async fn get_alerts(
    State(state): State<AnomalyHandlerState>,
    ValidatedQuery(params): ValidatedQuery<AnomalyListParams>,
) -> Json<Vec<Alert>> {
    Json(build_alerts(&state.data_dir, params.limit))
}
