//! Validated query-string extractor.
//!
//! `ValidatedQuery<T>` mirrors `ValidatedJson`: it deserializes the query
//! string and runs `validator::Validate::validate()` on the result, so
//! malformed or out-of-range parameters are rejected before any component
//! runs.

use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;
use serde_json::json;
use validator::Validate;

use super::validated_json::format_field_errors;

pub struct ValidatedQuery<T>(pub T);

pub enum ValidatedQueryRejection {
    /// Query-string deserialization failed (unknown variant, bad number, ...).
    QueryError(String),
    /// Validation failed (out-of-range limit, ...).
    ValidationError(validator::ValidationErrors),
}

impl IntoResponse for ValidatedQueryRejection {
    fn into_response(self) -> Response {
        let detail = match self {
            Self::QueryError(message) => format!("Invalid query parameters: {message}"),
            Self::ValidationError(errors) => format_field_errors(&errors),
        };
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "detail": detail })),
        )
            .into_response()
    }
}

impl<S, T> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ValidatedQueryRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| ValidatedQueryRejection::QueryError(e.to_string()))?;

        value
            .validate()
            .map_err(ValidatedQueryRejection::ValidationError)?;

        Ok(ValidatedQuery(value))
    }
}

// ── Tests ──────────────────────────────────────────────────────
