//! Recommendation query DTOs

use serde::Deserialize;
use utoipa::IntoParams;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RecommendationListParams {
    /// Maximum number of rows to return.
    #[validate(range(min = 1, max = 500, message = "limit must be between 1 and 500"))]
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    50
}
