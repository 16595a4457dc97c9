use std::sync::Arc;

use axum::{
    extract::State,
    http::{header::CONTENT_TYPE, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    api,
    auth::{self, LoginError, RegisterError},
    config,
};

pub fn router(auth: auth::Service) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/register", post(register))
        .route("/login", post(login))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(AppState { auth }))
}

pub fn cors(
    config: &config::Cors,
) -> Result<CorsLayer, axum::http::header::InvalidHeaderValue> {
    let mut cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE]);
    for origin in &config.allowed_origins {
        cors = cors.allow_origin(origin.parse::<HeaderValue>()?);
    }
    Ok(cors)
}

async fn index() -> &'static str {
    "Backend running"
}

// `role` may be sent too, but every registration creates a student.
#[derive(Deserialize)]
struct RegisterInput {
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
    grade: Option<String>,
    school: Option<String>,
}

async fn register(
    State(state): State<SharedAppState>,
    Json(RegisterInput {
        name,
        email,
        password,
        grade,
        school,
    }): Json<RegisterInput>,
) -> Result<Json<api::Message>, RegisterError> {
    state
        .auth
        .register(auth::Registration {
            name: name.unwrap_or_default(),
            email: email.unwrap_or_default(),
            password: password.unwrap_or_default(),
            grade,
            school,
        })
        .await?;

    Ok(Json(api::Message::new("User registered successfully")))
}

impl IntoResponse for RegisterError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::DuplicateUser => {
                tracing::warn!("registration rejected: email already taken");
                (StatusCode::BAD_REQUEST, "User already exists".into())
            }
            Self::MissingField(field) => {
                (StatusCode::BAD_REQUEST, format!("{field} required"))
            }
            Self::DbError(e) => {
                tracing::error!("user store failed: {e}");
                internal_error()
            }
            Self::HashingFailed(e) => {
                tracing::error!("password hashing failed: {e}");
                internal_error()
            }
            Self::JoinError(e) => {
                tracing::error!("password hashing task failed: {e}");
                internal_error()
            }
        };
        (status, Json(api::Message::new(message))).into_response()
    }
}

#[derive(Deserialize)]
struct LoginInput {
    email: Option<String>,
    password: Option<String>,
}

async fn login(
    State(state): State<SharedAppState>,
    Json(LoginInput { email, password }): Json<LoginInput>,
) -> Result<Json<api::user::Login>, LoginError> {
    let user = state
        .auth
        .login(
            email.as_deref().unwrap_or_default(),
            password.as_deref().unwrap_or_default(),
        )
        .await?;

    Ok(Json(api::user::Login {
        message: "Login successful".into(),
        user,
    }))
}

impl IntoResponse for LoginError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::InvalidCredentials => {
                tracing::warn!("login rejected: invalid credentials");
                (StatusCode::UNAUTHORIZED, "Invalid credentials".into())
            }
            Self::DbError(e) => {
                tracing::error!("user store failed: {e}");
                internal_error()
            }
            Self::JoinError(e) => {
                tracing::error!("password verification task failed: {e}");
                internal_error()
            }
        };
        (status, Json(api::Message::new(message))).into_response()
    }
}

fn internal_error() -> (StatusCode, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal server error".into(),
    )
}

type SharedAppState = Arc<AppState>;

struct AppState {
    auth: auth::Service,
}
