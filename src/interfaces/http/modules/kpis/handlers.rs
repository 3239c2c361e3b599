//! KPI API handlers

use std::path::PathBuf;

use axum::{extract::State, Json};
use sea_orm::DatabaseConnection;

use super::dto::SnapshotListParams;
use crate::application::kpi::{self, KpiSnapshot, KpiSummary};
use crate::domain::ApiError;
use crate::interfaces::http::common::ValidatedQuery;

/// KPI handler state
#[derive(Clone)]
pub struct KpiHandlerState {
    pub db: DatabaseConnection,
    pub data_dir: PathBuf,
}

#[utoipa::path(
    get,
    path = "/kpis/summary",
    tag = "KPIs",
    responses(
        (status = 200, description = "Current snapshot, persisted or computed", body = KpiSummary)
    )
)]
pub async fn kpi_summary(State(state): State<KpiHandlerState>) -> Json<KpiSummary> {
    Json(kpi::latest_snapshot(&state.db, &state.data_dir).await)
}

#[utoipa::path(
    get,
    path = "/kpis/snapshots",
    tag = "KPIs",
    params(SnapshotListParams),
    responses(
        (status = 200, description = "Persisted snapshots, newest first", body = [KpiSnapshot]),
        (status = 422, description = "Invalid limit")
    )
)]
pub async fn kpi_snapshots(
    State(state): State<KpiHandlerState>,
    ValidatedQuery(params): ValidatedQuery<SnapshotListParams>,
) -> Result<Json<Vec<KpiSnapshot>>, ApiError> {
    Ok(Json(kpi::list_snapshots(&state.db, params.limit).await?))
}
