// rest_api/src/lib.rs

use std::future::Future;
use std::sync::Arc;

use anyhow::{Context, Error as AnyhowError};
use axum::{
    http::{header, Method, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use lib::{
    AppointmentService, ConnectionManager, DoctorService, HealthTipService, ServiceError,
    SledDocumentStore, SymptomService,
};
use log::{debug, error, info};
use serde_json::{json, Value};
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

pub mod config;
pub mod extract;
pub mod handlers;
pub mod serverless;

use crate::config::ServerConfig;

pub const SERVICE_NAME: &str = "doctor-consultation-backend";

#[derive(Debug, Error)]
pub enum RestApiError {
    #[error(transparent)]
    Service(#[from] ServiceError),
    /// The request body was not valid JSON for the endpoint.
    #[error("{0}")]
    InvalidBody(String),
    /// A create or patch could not be saved. Only a missing target is 404.
    #[error(transparent)]
    WriteRejected(ServiceError),
}

pub type ApiResult<T> = Result<T, RestApiError>;

impl RestApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            RestApiError::WriteRejected(ServiceError::NotFound(_)) => StatusCode::NOT_FOUND,
            RestApiError::WriteRejected(_) => StatusCode::BAD_REQUEST,
            RestApiError::Service(ServiceError::NotFound(_)) => StatusCode::NOT_FOUND,
            RestApiError::Service(ServiceError::Validation(_))
            | RestApiError::Service(ServiceError::Duplicate { .. })
            | RestApiError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            RestApiError::Service(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RestApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        } else {
            debug!("Request rejected with {}: {}", status, self);
        }
        (status, Json(json!({ "message": self.to_string() }))).into_response()
    }
}

/// Shared state for the Axum application. Services are built per request on
/// top of the single store handle.
#[derive(Clone)]
pub struct AppState {
    connection: Arc<ConnectionManager>,
}

impl AppState {
    pub fn new(connection: Arc<ConnectionManager>) -> Self {
        Self { connection }
    }

    pub fn connection(&self) -> &Arc<ConnectionManager> {
        &self.connection
    }

    pub async fn store(&self) -> ApiResult<Arc<SledDocumentStore>> {
        Ok(self.connection.acquire().await?)
    }

    pub async fn doctors(&self) -> ApiResult<DoctorService> {
        Ok(DoctorService::new(&*self.store().await?)?)
    }

    pub async fn appointments(&self) -> ApiResult<AppointmentService> {
        Ok(AppointmentService::new(&*self.store().await?)?)
    }

    pub async fn symptoms(&self) -> ApiResult<SymptomService> {
        Ok(SymptomService::new(&*self.store().await?)?)
    }

    pub async fn health_tips(&self) -> ApiResult<HealthTipService> {
        Ok(HealthTipService::new(&*self.store().await?)?)
    }
}

// Handler for the / endpoint
async fn status_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": SERVICE_NAME,
        "time": Utc::now(),
    }))
}

async fn not_found_handler() -> (StatusCode, Json<Value>) {
    (StatusCode::NOT_FOUND, Json(json!({ "message": "Not Found" })))
}

/// Gives bodiless error responses produced by the router itself (405 and
/// friends) a `{message}` body.
async fn json_error_body(response: Response) -> Response {
    let status = response.status();
    let is_error = status.is_client_error() || status.is_server_error();
    if !is_error || response.headers().contains_key(header::CONTENT_TYPE) {
        return response;
    }

    let message = status.canonical_reason().unwrap_or("Error");
    let mut replacement = (status, Json(json!({ "message": message }))).into_response();
    if let Some(allow) = response.headers().get(header::ALLOW) {
        replacement.headers_mut().insert(header::ALLOW, allow.clone());
    }
    replacement
}

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers(Any)
        .allow_origin(Any);

    Router::new()
        .route("/", get(status_handler))
        .route(
            "/api/doctors",
            get(handlers::list_doctors).post(handlers::create_doctor),
        )
        .route(
            "/api/doctors/:id",
            get(handlers::get_doctor)
                .patch(handlers::patch_doctor)
                .delete(handlers::delete_doctor),
        )
        .route(
            "/api/appointments",
            get(handlers::list_appointments).post(handlers::create_appointment),
        )
        .route(
            "/api/appointments/:id",
            get(handlers::get_appointment)
                .patch(handlers::patch_appointment)
                .delete(handlers::delete_appointment),
        )
        .route(
            "/api/symptoms",
            get(handlers::list_symptoms).post(handlers::create_symptom),
        )
        .route("/api/symptoms/:id", get(handlers::get_symptom))
        .route(
            "/api/health-tips",
            get(handlers::list_health_tips).post(handlers::create_health_tip),
        )
        .route("/api/health-tips/:id", get(handlers::get_health_tip))
        .fallback(not_found_handler)
        .with_state(state)
        .layer(middleware::map_response(json_error_body))
        .layer(cors)
}

/// Serves the API until `shutdown` resolves, then flushes the store.
pub async fn start_server<F>(
    config: &ServerConfig,
    connection: Arc<ConnectionManager>,
    shutdown: F,
) -> Result<(), AnyhowError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = build_router(AppState::new(Arc::clone(&connection)));

    let listener = TcpListener::bind((config.host.as_str(), config.port))
        .await
        .with_context(|| format!("Failed to bind to address: {}:{}", config.host, config.port))?;
    info!("REST API server listening on {}:{}", config.host, config.port);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown)
        .await
        .context("REST API server failed to start or run")?;

    connection
        .close()
        .await
        .context("Failed to flush the document store")?;
    info!("REST API server stopped.");
    Ok(())
}
