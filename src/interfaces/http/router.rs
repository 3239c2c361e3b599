//! API Router with Swagger UI

use std::sync::Arc;

use axum::http::HeaderValue;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use sea_orm::DatabaseConnection;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::application::anomalies::{Alert, AnomalyRecord};
use crate::application::forecasts::{ForecastKind, ForecastRecord};
use crate::application::kpi::{KpiSnapshot, KpiSummary};
use crate::application::recommendations::Recommendation;
use crate::config::AppConfig;
use crate::infrastructure::ai::ChatModel;
use crate::infrastructure::crypto::jwt::JwtConfig;
use crate::interfaces::http::middleware::{auth_middleware, AuthState};
use crate::interfaces::http::modules::{
    anomalies, auth, chatbot, forecasts, health, kpis, recommendations,
};

/// Security scheme modifier for OpenAPI
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT Bearer token"))
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        // Auth
        auth::register,
        auth::login,
        auth::me,
        // KPIs
        kpis::kpi_summary,
        kpis::kpi_snapshots,
        // Anomalies
        anomalies::get_anomalies,
        anomalies::get_alerts,
        // Forecasts
        forecasts::get_forecasts,
        // Recommendations
        recommendations::get_recommendations,
        // Chatbot
        chatbot::chatbot,
    ),
    components(
        schemas(
            // Auth
            auth::RegisterRequest,
            auth::LoginRequest,
            auth::UserOut,
            auth::TokenResponse,
            // KPIs
            KpiSummary,
            KpiSnapshot,
            // Anomalies
            AnomalyRecord,
            Alert,
            // Forecasts
            ForecastKind,
            ForecastRecord,
            // Recommendations
            Recommendation,
            // Chatbot
            chatbot::ChatbotRequest,
            chatbot::ChatbotResponse,
            // Health
            health::HealthResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness probe"),
        (name = "Authentication", description = "User registration and JWT login"),
        (name = "KPIs", description = "KPI summaries and persisted snapshots"),
        (name = "Anomalies", description = "Anomaly rows and severity-bucketed alerts"),
        (name = "Forecasts", description = "Energy and SEC forecasts"),
        (name = "Recommendations", description = "Optimization recommendations"),
        (name = "Chatbot", description = "Context-aware operations assistant"),
    ),
    info(
        title = "RefineryIQ API",
        version = "1.0.0",
        description = "Refinery operational metrics: KPIs, anomalies, forecasts, recommendations and a chatbot"
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
pub fn create_api_router(
    db: DatabaseConnection,
    jwt_config: JwtConfig,
    chat_model: Option<Arc<dyn ChatModel>>,
    app_cfg: &AppConfig,
) -> Router {
    let data_dir = app_cfg.data.dir.clone();

    let auth_state = auth::AuthHandlerState {
        db: db.clone(),
        jwt_config: jwt_config.clone(),
    };
    let middleware_state = AuthState { jwt_config };

    // CORS configuration: the configured browser origin, or any origin when
    // it does not parse as a header value.
    let allow_origin = match app_cfg.cors.allowed_origin.parse::<HeaderValue>() {
        Ok(origin) => AllowOrigin::exact(origin),
        Err(_) => AllowOrigin::any(),
    };
    let cors = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any);

    // Auth routes (public)
    let auth_routes = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .with_state(auth_state.clone());

    // Auth routes (protected)
    let auth_protected_routes = Router::new()
        .route("/auth/me", get(auth::me))
        .layer(middleware::from_fn_with_state(
            middleware_state,
            auth_middleware,
        ))
        .with_state(auth_state);

    // KPI routes
    let kpi_routes = Router::new()
        .route("/kpis/summary", get(kpis::kpi_summary))
        .route("/kpis/snapshots", get(kpis::kpi_snapshots))
        .with_state(kpis::KpiHandlerState {
            db: db.clone(),
            data_dir: data_dir.clone(),
        });

    // Anomaly routes
    let anomaly_routes = Router::new()
        .route("/anomalies", get(anomalies::get_anomalies))
        .route("/anomalies/alerts", get(anomalies::get_alerts))
        .with_state(anomalies::AnomalyHandlerState {
            data_dir: data_dir.clone(),
        });

    // Forecast routes
    let forecast_routes = Router::new()
        .route("/forecasts", get(forecasts::get_forecasts))
        .with_state(forecasts::ForecastHandlerState {
            data_dir: data_dir.clone(),
        });

    // Recommendation routes
    let recommendation_routes = Router::new()
        .route("/recommendations", get(recommendations::get_recommendations))
        .with_state(recommendations::RecommendationHandlerState { data_dir });

    // Chatbot routes
    let chatbot_routes = Router::new()
        .route("/chatbot", post(chatbot::chatbot))
        .with_state(chatbot::ChatbotHandlerState {
            db,
            model: chat_model,
        });

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    // Build router
    Router::new()
        // Swagger UI
        .merge(swagger_routes)
        // Health
        .route("/health", get(health::health_check))
        // API areas
        .merge(auth_routes)
        .merge(auth_protected_routes)
        .merge(kpi_routes)
        .merge(anomaly_routes)
        .merge(forecast_routes)
        .merge(recommendation_routes)
        .merge(chatbot_routes)
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
