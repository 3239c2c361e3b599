//! Recommendation API handlers

use std::path::PathBuf;

use axum::{extract::State, Json};

use super::dto::RecommendationListParams;
use crate::application::recommendations::{load_recommendations, Recommendation};
use crate::interfaces::http::common::ValidatedQuery;

/// Recommendation handler state
#[derive(Clone)]
pub struct RecommendationHandlerState {
    pub data_dir: PathBuf,
}

#[utoipa::path(
    get,
    path = "/recommendations",
    tag = "Recommendations",
    params(RecommendationListParams),
    responses(
        (status = 200, description = "Optimization recommendations", body = [Recommendation]),
        (status = 422, description = "Invalid limit")
    )
)]
pub async fn get_recommendations(
    State(state): State<RecommendationHandlerState>,
    ValidatedQuery(params): ValidatedQuery<RecommendationListParams>,
) -> Json<Vec<Recommendation>> {
    Json(load_recommendations(&state.data_dir, params.limit))
}
