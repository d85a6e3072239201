//! Axum routes for the contact endpoint.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use contact_relay::{routes, ContactPipeline};
//!
//! let app = routes::router(Arc::new(ContactPipeline::from_env()));
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
//! axum::serve(listener, app).await?;
//! ```

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::pipeline::{ContactPipeline, ContactResponse, Stage};
use crate::submission::RawSubmission;

/// Path the contact form posts to.
pub const CONTACT_PATH: &str = "/api/contact";

/// Router serving `POST /api/contact` with CORS preflight support.
pub fn router(pipeline: Arc<ContactPipeline>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route(CONTACT_PATH, post(submit))
        .layer(cors)
        .with_state(pipeline)
}

/// POST /api/contact - Run a submission through the pipeline.
async fn submit(State(pipeline): State<Arc<ContactPipeline>>, body: Bytes) -> Response {
    let raw: RawSubmission = match serde_json::from_slice(&body) {
        Ok(raw) => raw,
        Err(err) => {
            tracing::info!(error = %err, "Unreadable contact request body");
            let response = ContactResponse {
                ok: false,
                error: Some("Invalid request body".to_string()),
                message_id: None,
                stage: Stage::Rejected,
                category: None,
            };
            return (StatusCode::BAD_REQUEST, Json(response)).into_response();
        }
    };

    let response = pipeline.submit(&raw).await;
    (status_for(&response), Json(response)).into_response()
}

fn status_for(response: &ContactResponse) -> StatusCode {
    match response.stage {
        Stage::Delivered => StatusCode::OK,
        Stage::Rejected => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
