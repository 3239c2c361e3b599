//! Forecast query DTOs

use serde::Deserialize;
use utoipa::IntoParams;
use validator::Validate;

use crate::application::forecasts::ForecastKind;

#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ForecastListParams {
    /// Which forecast to serve. Unsupported values are rejected before any
    /// file access.
    #[serde(default = "default_kind")]
    pub forecast_type: ForecastKind,
    /// Maximum number of rows to return.
    #[validate(range(min = 1, max = 2000, message = "limit must be between 1 and 2000"))]
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_kind() -> ForecastKind {
    ForecastKind::Energy
}

fn default_limit() -> usize {
    100
}
