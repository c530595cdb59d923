// rest_api/src/serverless.rs

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    Json, Router,
};
use lib::{ConnectionManager, ConnectionState, StorageConfig};
use log::error;
use serde_json::json;
use tower::ServiceExt;

use crate::{build_router, AppState};

/// Request/response adapter for function-style hosting.
///
/// The store is opened on the first invocation and reused while the instance
/// stays warm. If opening fails the invocation answers 500 and the next one
/// tries again.
pub struct ServerlessHandler {
    router: Router,
    connection: Arc<ConnectionManager>,
}

impl ServerlessHandler {
    pub fn new(config: StorageConfig) -> Self {
        let connection = Arc::new(ConnectionManager::new(config));
        let router = build_router(AppState::new(Arc::clone(&connection)));
        Self { router, connection }
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.connection.state()
    }

    pub async fn invoke(&self, request: Request<Body>) -> Response {
        if let Err(e) = self.connection.acquire().await {
            error!("Serverless invocation could not reach the document store: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "message": "Internal Server Error" })),
            )
                .into_response();
        }

        let result: Result<Response, Infallible> = self.router.clone().oneshot(request).await;
        match result {
            Ok(response) => response,
            Err(never) => match never {},
        }
    }
}
