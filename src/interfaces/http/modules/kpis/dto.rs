//! KPI query DTOs

use serde::Deserialize;
use utoipa::IntoParams;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SnapshotListParams {
    /// Maximum number of snapshots to return (newest first).
    #[validate(range(min = 1, max = 500, message = "limit must be between 1 and 500"))]
    #[serde(default = "default_limit")]
    pub limit: u64,
}

fn default_limit() -> u64 {
    50
}
