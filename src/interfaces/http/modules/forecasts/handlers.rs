//! Forecast API handlers

use std::path::PathBuf;

use axum::{extract::State, Json};

use super::dto::ForecastListParams;
use crate::application::forecasts::{load_forecast, ForecastRecord};
use crate::interfaces::http::common::ValidatedQuery;

/// Forecast handler state
#[derive(Clone)]
pub struct ForecastHandlerState {
    pub data_dir: PathBuf,
}

#[utoipa::path(
    get,
    path = "/forecasts",
    tag = "Forecasts",
    params(ForecastListParams),
    responses(
        (status = 200, description = "Forecast rows for the metric", body = [ForecastRecord]),
        (status = 422, description = "Unsupported forecast_type or invalid limit")
    )
)]
pub async fn get_forecasts(
    State(state): State<ForecastHandlerState>,
    ValidatedQuery(params): ValidatedQuery<ForecastListParams>,
) -> Json<Vec<ForecastRecord>> {
    Json(load_forecast(
        &state.data_dir,
        params.forecast_type,
        params.limit,
    ))
}

// ── Tests ──────────────────────────────────────────────────────
