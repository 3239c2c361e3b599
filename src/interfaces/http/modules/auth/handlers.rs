//! Authentication API handlers

use axum::{extract::State, http::StatusCode, Extension, Json};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use super::dto::{LoginRequest, RegisterRequest, TokenResponse, UserOut};
use crate::domain::ApiError;
use crate::infrastructure::crypto::jwt::{create_token, JwtConfig};
use crate::infrastructure::crypto::password::{hash_password, verify_password};
use crate::infrastructure::database::entities::user;
use crate::interfaces::http::common::ValidatedJson;
use crate::interfaces::http::middleware::AuthenticatedUser;

/// Auth state
#[derive(Clone)]
pub struct AuthHandlerState {
    pub db: DatabaseConnection,
    pub jwt_config: JwtConfig,
}

#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created", body = UserOut),
        (status = 409, description = "Email already registered"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn register(
    State(state): State<AuthHandlerState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<UserOut>), ApiError> {
    let existing = user::Entity::find()
        .filter(user::Column::Email.eq(&request.email))
        .one(&state.db)
        .await?;

    if existing.is_some() {
        return Err(ApiError::Conflict("Email already registered".to_string()));
    }

    let hashed_password =
        hash_password(&request.password).map_err(|e| ApiError::Internal(e.to_string()))?;

    let new_user = user::ActiveModel {
        id: Set(uuid::Uuid::new_v4().to_string()),
        email: Set(request.email),
        full_name: Set(request.full_name),
        role: Set(request.role.unwrap_or_else(|| "operator".to_string())),
        hashed_password: Set(hashed_password),
        created_at: Set(Utc::now()),
    };

    let model = new_user.insert(&state.db).await?;

    Ok((StatusCode::CREATED, Json(UserOut::from(model))))
}

#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Successful login", body = TokenResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AuthHandlerState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let user = user::Entity::find()
        .filter(user::Column::Email.eq(&request.email))
        .one(&state.db)
        .await?;

    // Unknown email and wrong password return the same error so the
    // endpoint leaks nothing about which accounts exist.
    let Some(user) = user else {
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    };

    let password_valid =
        verify_password(&request.password, &user.hashed_password).unwrap_or(false);
    if !password_valid {
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    }

    let token =
        create_token(&user.id, &state.jwt_config).map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok(Json(TokenResponse {
        access_token: token,
        token_type: "bearer".to_string(),
        expires_in: state.jwt_config.expire_minutes * 60,
    }))
}

#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = UserOut),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn me(
    State(state): State<AuthHandlerState>,
    user: Option<Extension<AuthenticatedUser>>,
) -> Result<Json<UserOut>, ApiError> {
    let Some(Extension(user)) = user else {
        return Err(ApiError::Unauthorized("Not authenticated".to_string()));
    };

    let model = user::Entity::find_by_id(&user.user_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("User no longer exists".to_string()))?;

    Ok(Json(UserOut::from(model)))
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::middleware::from_fn_with_state;
    use axum::routing::{get, post};
    use axum::Router;
    use http_body_util::BodyExt;
    use jsonwebtoken::Algorithm;
    use sea_orm::{ConnectOptions, Database, PaginatorTrait};
    use sea_orm_migration::MigratorTrait;
    use serde_json::{json, Value};
    use tower::Service;

    use super::*;
    use crate::infrastructure::crypto::jwt::verify_token;
    use crate::infrastructure::database::migrator::Migrator;
    use crate::interfaces::http::middleware::{auth_middleware, AuthState};

    fn test_jwt_config() -> JwtConfig {
        JwtConfig {
            secret: "unit-test-secret".to_string(),
            algorithm: Algorithm::HS256,
            expire_minutes: 60,
        }
    }

    async fn test_app() -> (Router, DatabaseConnection) {
        let mut options = ConnectOptions::new("sqlite::memory:");
        options.max_connections(1);
        let db = Database::connect(options).await.unwrap();
        Migrator::up(&db, None).await.unwrap();

        let state = AuthHandlerState {
            db: db.clone(),
            jwt_config: test_jwt_config(),
        };
        let protected = Router::new()
            .route("/auth/me", get(me))
            .layer(from_fn_with_state(
                AuthState {
                    jwt_config: test_jwt_config(),
                },
                auth_middleware,
            ))
            .with_state(state.clone());
        let app = Router::new()
            .route("/auth/register", post(register))
            .route("/auth/login", post(login))
            .with_state(state)
            .merge(protected);

        (app, db)
    }

    async fn send_json(
        app: &mut Router,
        method: &str,
        uri: &str,
        body: Value,
        bearer: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json");
        if let Some(token) = bearer {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let req = builder
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap();

        let resp = app.call(req).await.unwrap();
        let status = resp.status();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    fn register_body() -> Value {
        json!({
            "email": "ops@example.com",
            "password": "horse-battery-staple",
            "full_name": "Ops Lead",
        })
    }

    #[tokio::test]
    async fn register_returns_public_view_without_hash() {
        let (mut app, _db) = test_app().await;

        let (status, body) =
            send_json(&mut app, "POST", "/auth/register", register_body(), None).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["email"], "ops@example.com");
        assert_eq!(body["role"], "operator");
        assert!(body.get("hashed_password").is_none());
        assert!(body.get("password").is_none());
    }

    #[tokio::test]
    async fn duplicate_registration_conflicts_without_a_second_record() {
        let (mut app, db) = test_app().await;

        let (status, _) =
            send_json(&mut app, "POST", "/auth/register", register_body(), None).await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, _) =
            send_json(&mut app, "POST", "/auth/register", register_body(), None).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let count = user::Entity::find().count(&db).await.unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn short_password_is_rejected_before_any_component() {
        let (mut app, db) = test_app().await;

        let (status, _) = send_json(
            &mut app,
            "POST",
            "/auth/register",
            json!({ "email": "ops@example.com", "password": "short" }),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(user::Entity::find().count(&db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn login_issues_a_token_whose_subject_is_the_user() {
        let (mut app, _db) = test_app().await;

        let (_, registered) =
            send_json(&mut app, "POST", "/auth/register", register_body(), None).await;

        let (status, body) = send_json(
            &mut app,
            "POST",
            "/auth/login",
            json!({ "email": "ops@example.com", "password": "horse-battery-staple" }),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["token_type"], "bearer");
        assert_eq!(body["expires_in"], 3600);

        let claims =
            verify_token(body["access_token"].as_str().unwrap(), &test_jwt_config()).unwrap();
        assert_eq!(claims.sub, registered["id"].as_str().unwrap());
    }

    #[tokio::test]
    async fn bad_credentials_share_one_unauthorized_outcome() {
        let (mut app, _db) = test_app().await;

        send_json(&mut app, "POST", "/auth/register", register_body(), None).await;

        let (wrong_password_status, wrong_password_body) = send_json(
            &mut app,
            "POST",
            "/auth/login",
            json!({ "email": "ops@example.com", "password": "not-the-password" }),
            None,
        )
        .await;
        let (unknown_email_status, unknown_email_body) = send_json(
            &mut app,
            "POST",
            "/auth/login",
            json!({ "email": "ghost@example.com", "password": "whatever-at-all" }),
            None,
        )
        .await;

        assert_eq!(wrong_password_status, StatusCode::UNAUTHORIZED);
        assert_eq!(unknown_email_status, StatusCode::UNAUTHORIZED);
        // Same body either way: no oracle for account existence.
        assert_eq!(wrong_password_body, unknown_email_body);
    }

    #[tokio::test]
    async fn me_requires_and_honors_the_token() {
        let (mut app, _db) = test_app().await;

        send_json(&mut app, "POST", "/auth/register", register_body(), None).await;
        let (_, login) = send_json(
            &mut app,
            "POST",
            "/auth/login",
            json!({ "email": "ops@example.com", "password": "horse-battery-staple" }),
            None,
        )
        .await;
        let token = login["access_token"].as_str().unwrap().to_string();

        let req = Request::builder()
            .uri("/auth/me")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();
        let resp = app.call(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let req = Request::builder()
            .uri("/auth/me")
            .body(Body::empty())
            .unwrap();
        let resp = app.call(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let req = Request::builder()
            .uri("/auth/me")
            .header(header::AUTHORIZATION, "Bearer not-a-real-token")
            .body(Body::empty())
            .unwrap();
        let resp = app.call(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}
