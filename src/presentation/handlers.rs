use crate::application::service::UserService;
use crate::domain::error::DomainError;
use crate::domain::repository::UserRepository;
use crate::domain::user::UserForm;
use crate::presentation::assets::AssetManifest;
use crate::presentation::page::render_document;
use crate::presentation::theme::Theme;
use actix_web::http::StatusCode;
use actix_web::http::header::ContentType;
use actix_web::{HttpRequest, HttpResponse, ResponseError, web};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, instrument, warn};

// AppState shared by all workers
pub struct AppState {
    pub service: UserService<dyn UserRepository>,
    pub assets: AssetManifest,
    pub theme: Theme,
}

impl AppState {
    pub fn new(repository: Arc<dyn UserRepository>, assets: AssetManifest, theme: Theme) -> Self {
        Self {
            service: UserService::new(repository),
            assets,
            theme,
        }
    }
}

/// Body of every failed request. Callers only ever see the fixed message.
#[derive(Serialize)]
struct ErrorResponse {
    message: &'static str,
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Render error: {0}")]
    Render(String),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        error!(error = %self, status = %status, "Request failed");
        HttpResponse::build(status).json(ErrorResponse {
            message: "Internal Server Error",
        })
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast_ref::<DomainError>() {
            Some(DomainError::StorageUnavailable(msg)) => ApiError::Storage(msg.clone()),
            Some(DomainError::InvalidRecord(msg)) => {
                ApiError::Storage(format!("invalid record: {}", msg))
            }
            None => ApiError::Storage(format!("{:#}", err)),
        }
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    storage: &'static str,
    timestamp: String,
}

#[instrument(skip(state))]
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let (status, storage, code) = match state.service.check_storage().await {
        Ok(()) => ("ok", "up", StatusCode::OK),
        Err(e) => {
            warn!(error = %e, "Storage ping failed");
            ("degraded", "down", StatusCode::SERVICE_UNAVAILABLE)
        }
    };
    HttpResponse::build(code).json(HealthResponse {
        status,
        storage,
        timestamp: Utc::now().to_rfc3339(),
    })
}

#[instrument(skip(state))]
pub async fn list_users(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let users = state.service.list_users().await.map_err(|e| {
        error!(error = %e, "Failed to list users");
        e
    })?;
    info!(count = users.len(), "Users listed");
    Ok(HttpResponse::Ok().json(users))
}

/// Always stores the placeholder record. A submitted form is parsed and
/// validated for the log only.
#[instrument(skip(state, form))]
pub async fn create_user(
    state: web::Data<AppState>,
    form: Option<web::Json<UserForm>>,
) -> Result<HttpResponse, ApiError> {
    match form {
        Some(form) => {
            let errors = form.validate();
            warn!(
                submitted_email = form.email.as_deref().unwrap_or(""),
                invalid_fields = ?errors.keys().collect::<Vec<_>>(),
                "Submitted form is ignored, inserting placeholder user"
            );
        }
        None => debug!("No form submitted, inserting placeholder user"),
    }

    let user = state.service.create_placeholder_user().await.map_err(|e| {
        error!(error = %e, "Failed to create user");
        e
    })?;
    info!(user_id = %user.id, "User created");
    Ok(HttpResponse::Ok().json(user))
}

#[instrument(skip(state, req), fields(path = %req.path()))]
pub async fn render_page(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let path = req.path();
    let url = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or(path);
    let initial = state.service.initial_state(url).await.map_err(|e| {
        error!(error = %e, "Failed to load page state");
        e
    })?;
    let html = render_document(path, &initial, &state.assets, &state.theme)
        .map_err(|e| ApiError::Render(e.to_string()))?;
    debug!(bytes = html.len(), "Page rendered");
    Ok(HttpResponse::Ok()
        .insert_header(ContentType::html())
        .body(html))
}
