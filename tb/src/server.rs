//! HTTP server: webhook endpoint and place search API

use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use eyre::{Context, Result};
use serde::Deserialize;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};
use tripplan::{FailurePolicy, PlaceResult, PlacesSearch, Prefecture, UnknownArea};

use crate::config::Config;
use crate::messaging::{LineMessagingClient, MessagingGateway};
use crate::webhook::{BotMessages, ChannelSecret, EventHandler, SIGNATURE_HEADER, WebhookBody, signature};

/// Shared, read-only request state
pub struct AppState {
    pub channel_secret: ChannelSecret,
    pub handler: EventHandler,
    pub places: Arc<dyn PlacesSearch>,
}

impl AppState {
    pub fn new(
        channel_secret: ChannelSecret,
        gateway: Arc<dyn MessagingGateway>,
        places: Arc<dyn PlacesSearch>,
        messages: BotMessages,
    ) -> Self {
        Self {
            channel_secret,
            handler: EventHandler::new(gateway, messages),
            places,
        }
    }

    /// Build state with real clients from configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let secret = config.line.get_channel_secret()?;
        let gateway = LineMessagingClient::from_config(&config.line).context("Failed to create messaging client")?;
        let places = tripplan::create_client(&config.places).context("Failed to create places client")?;
        let messages = BotMessages {
            welcome: config.line.welcome_message.clone(),
            help: config.line.help_message.clone(),
        };
        Ok(Self::new(secret, Arc::new(gateway), places, messages))
    }
}

/// Errors surfaced by the JSON API
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    UnknownArea(#[from] UnknownArea),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::UnknownArea(_) => StatusCode::BAD_REQUEST,
        };

        (status, self.to_string()).into_response()
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/webhook", post(webhook_handler))
        .route("/api/places/search", get(search_handler))
        .route("/api/places/popular", get(popular_handler))
        .with_state(state)
}

/// Bind and serve until Ctrl+C or SIGTERM
pub async fn serve(state: AppState, bind: &str) -> Result<()> {
    let listener = TcpListener::bind(bind)
        .await
        .context(format!("Failed to bind {}", bind))?;
    info!(%bind, "serve: listening");

    axum::serve(listener, router(Arc::new(state)))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("serve: stopped");
    Ok(())
}

async fn health_handler() -> &'static str {
    "ok"
}

async fn webhook_handler(State(state): State<Arc<AppState>>, headers: HeaderMap, body: Bytes) -> StatusCode {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    if !signature::validate(&body, signature, state.channel_secret.expose()) {
        warn!(bytes = body.len(), "webhook_handler: rejected request with bad signature");
        return StatusCode::UNAUTHORIZED;
    }

    let parsed = match WebhookBody::parse(&body) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!(error = %e, "webhook_handler: unparseable body");
            return StatusCode::OK;
        }
    };

    let events = parsed.decoded_events();
    debug!(count = events.len(), "webhook_handler: dispatching events");

    // Acknowledge now; delivery runs on its own task
    let task_state = state.clone();
    tokio::spawn(async move {
        let outcomes = task_state.handler.handle_all(&events).await;
        debug!(count = outcomes.len(), "webhook_handler: events handled");
    });
    StatusCode::OK
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    #[serde(default)]
    keyword: String,
    prefecture: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PopularQuery {
    prefecture: String,
}

fn parse_prefecture(name: &str) -> Result<Prefecture, ApiError> {
    Ok(name.trim().parse::<Prefecture>()?)
}

async fn search_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<PlaceResult>>, ApiError> {
    let prefecture = match query.prefecture.as_deref().filter(|p| !p.trim().is_empty()) {
        Some(name) => Some(parse_prefecture(name)?),
        None => None,
    };

    if query.keyword.trim().is_empty() {
        return Ok(Json(Vec::new()));
    }

    let result = state.places.search_by_keyword(&query.keyword, prefecture.as_ref()).await;
    Ok(Json(FailurePolicy::or_default("keyword search", result)))
}

async fn popular_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PopularQuery>,
) -> Result<Json<Vec<PlaceResult>>, ApiError> {
    let prefecture = parse_prefecture(&query.prefecture)?;
    let result = state.places.search_popular_by_area(&prefecture).await;
    Ok(Json(FailurePolicy::or_default("area search", result)))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "shutdown_signal: failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!(error = %e, "shutdown_signal: failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
