//! Inbound HTTP surface: the subscription endpoint and a health probe.

use axum::{
    extract::{rejection::FormRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::debug;
use uuid::Uuid;
use websub_hub::{ErrorKind, HubError, InMemoryTopicRegistry, SubscriptionApi, SubscriptionForm};

pub const ACK_MESSAGE: &str = "Subscription request received and will be processed.";

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub api: Arc<dyn SubscriptionApi>,
    pub topics: Arc<InMemoryTopicRegistry>,
}

#[derive(Debug, Serialize)]
struct AckBody {
    message: &'static str,
    request_id: Uuid,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    kind: &'static str,
}

#[derive(Debug, Serialize)]
struct HealthBody {
    status: &'static str,
    topics: usize,
}

pub fn build_router(state: AppState) -> Router {
    let middleware = ServiceBuilder::new().layer(TraceLayer::new_for_http());

    Router::new()
        .route("/", post(handle_subscription))
        .route("/health", get(health_check))
        .layer(middleware)
        .with_state(state)
}

async fn handle_subscription(
    State(state): State<AppState>,
    form: Result<Form<SubscriptionForm>, FormRejection>,
) -> Response {
    let Form(form) = match form {
        Ok(form) => form,
        Err(rejection) => {
            debug!(error = %rejection, "Unreadable subscription form");
            return error_response(rejection.body_text(), ErrorKind::Validation);
        }
    };

    match state.api.handle_subscription_request(form) {
        Ok(ack) => (
            StatusCode::ACCEPTED,
            Json(AckBody {
                message: ACK_MESSAGE,
                request_id: ack.request_id,
            }),
        )
            .into_response(),
        Err(e) => {
            let err = HubError::from(e);
            error_response(err.to_string(), err.kind())
        }
    }
}

/// Only validation failures reach the caller; everything else happens after
/// the acknowledgement.
fn error_response(error: String, kind: ErrorKind) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorBody {
            error,
            kind: kind.as_str(),
        }),
    )
        .into_response()
}

async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthBody {
        status: "ok",
        topics: state.topics.len(),
    })
}
