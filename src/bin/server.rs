use axum::{
    extract::{rejection::JsonRejection, Json, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use clue_meister::{ClueMeister, ClueMeisterConfig, ClueResponse, ClueSession};
use clue_meister::knowledge::KnowledgeStats;

type SharedSession = Arc<Mutex<ClueSession>>;

#[derive(Clone)]
struct AppState {
    agent: Arc<ClueMeister>,
    sessions: Arc<Mutex<HashMap<String, SharedSession>>>,
}

impl AppState {
    /// Session handle for `id`, created on first use. The map lock is
    /// released before the caller locks the session itself.
    async fn session(&self, id: String) -> SharedSession {
        let mut sessions = self.sessions.lock().await;
        sessions.entry(id).or_default().clone()
    }
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    version: String,
    ranker: String,
}

#[derive(Debug, Serialize)]
struct StatsResponse {
    knowledge: KnowledgeStats,
    sessions: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "clue_meister_server=debug,clue_meister=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config_path = std::env::var("CLUE_MEISTER_CONFIG").ok().map(std::path::PathBuf::from);
    let config = ClueMeisterConfig::load(config_path.as_deref())?;

    tracing::info!("🚀 Starting Clue Meister Server");
    tracing::info!("📦 Database: {}", config.database.path);
    tracing::info!("🔌 Port: {}", config.server.port);

    let agent = ClueMeister::from_config(&config).await?;

    let state = AppState {
        agent: Arc::new(agent),
        sessions: Arc::new(Mutex::new(HashMap::new())),
    };

    // Build router
    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/v1/sessions/:id/message", post(message_handler))
        .route("/v1/stats", get(stats_handler))
        .layer(CorsLayer::permissive())
        .with_state(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.server.port);
    tracing::info!("🛰️ Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: clue_meister::VERSION.to_string(),
        ranker: state.agent.ranker_name().to_string(),
    })
}

async fn message_handler(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ClueResponse>, AppError> {
    let Json(message) = body.map_err(|e| AppError::BadRequest(e.body_text()))?;
    tracing::debug!("Session {} message: {}", session_id, message);

    let session = state.session(session_id).await;
    let mut session = session.lock().await;

    let response = state.agent.process_request(&mut session, &message).await;

    Ok(Json(response))
}

async fn stats_handler(State(state): State<AppState>) -> Result<Json<StatsResponse>, AppError> {
    let knowledge = state.agent.knowledge_base().stats().await?;
    let sessions = state.sessions.lock().await.len();

    Ok(Json(StatsResponse { knowledge, sessions }))
}

// Error handling
enum AppError {
    BadRequest(String),
    Agent(clue_meister::ClueMeisterError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            AppError::Agent(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        };

        tracing::error!("❌ Error: {} - {}", status, message);

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

impl From<clue_meister::ClueMeisterError> for AppError {
    fn from(err: clue_meister::ClueMeisterError) -> Self {
        AppError::Agent(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clue_meister::SqliteKnowledgeBase;
    use std::time::Duration;

    async fn state() -> AppState {
        let kb = SqliteKnowledgeBase::new(":memory:").await.unwrap();
        AppState {
            agent: Arc::new(ClueMeister::new(Arc::new(kb))),
            sessions: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    #[tokio::test]
    async fn test_busy_session_does_not_block_others() {
        let state = state().await;

        let a = state.session("a".to_string()).await;
        let _busy = a.lock().await;

        let b = tokio::time::timeout(Duration::from_secs(1), async {
            let b = state.session("b".to_string()).await;
            let mut b = b.lock().await;
            state.agent.process_request(&mut b, &serde_json::json!({"update_path": [[0, 0]]})).await
        })
        .await
        .expect("session b blocked behind session a");
        assert!(!b.is_error());

        let len = tokio::time::timeout(Duration::from_secs(1), state.sessions.lock())
            .await
            .expect("session map blocked")
            .len();
        assert_eq!(len, 2);
    }

    #[tokio::test]
    async fn test_same_id_shares_session() {
        let state = state().await;

        let first = state.session("a".to_string()).await;
        first.lock().await.status = "searching".to_string();

        let again = state.session("a".to_string()).await;
        assert!(Arc::ptr_eq(&first, &again));
        assert_eq!(again.lock().await.status, "searching");
    }
}
