// Kola Engine - Web Server
// REST API over the scoring and goal-economics calculators

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use kola_engine::{
    demo_snapshot, load_config_with_fallback, load_snapshot, summarize_activity, ActivitySummary,
    ActivityWindow, CreditProgress, CreditScoreCalculator, CreditScoreResult, FinancialProfile,
    GoalBenefits, GoalDraft, GoalEconomicsCalculator, GoalEconomicsResult, TimelineRecommendation,
    WalletSnapshot,
};

/// Shared application state
#[derive(Clone)]
struct AppState {
    snapshot: Arc<RwLock<WalletSnapshot>>,
    profile: Arc<FinancialProfile>,
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    fn ok(data: T) -> Response {
        (
            StatusCode::OK,
            Json(ApiResponse {
                success: true,
                data: Some(data),
                error: None,
            }),
        )
            .into_response()
    }
}

fn api_error(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ApiResponse::<()> {
            success: false,
            data: None,
            error: Some(message.into()),
        }),
    )
        .into_response()
}

/// Credit score response
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreditScoreResponse {
    #[serde(flatten)]
    score: CreditScoreResult,
    progress: CreditProgress,
}

/// Goal draft pricing response
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GoalEconomicsResponse {
    draft: GoalDraft,
    economics: GoalEconomicsResult,
    timeline: TimelineRecommendation,
    benefits: GoalBenefits,
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    ApiResponse::ok("OK")
}

/// GET /api/credit-score - Score the loaded wallet snapshot
async fn get_credit_score(State(state): State<AppState>) -> Response {
    let snapshot = match state.snapshot.read() {
        Ok(guard) => guard,
        Err(e) => {
            error!("snapshot lock poisoned: {}", e);
            return api_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to read wallet snapshot");
        }
    };

    let score = CreditScoreCalculator::new().score(snapshot.balance, &snapshot.transactions, &snapshot.goals);
    let progress = CreditProgress::for_score(score.score, snapshot.balance);

    ApiResponse::ok(CreditScoreResponse { score, progress })
}

/// POST /api/goal-economics - Price a goal draft
async fn post_goal_economics(State(state): State<AppState>, Json(draft): Json<GoalDraft>) -> Response {
    if !(draft.target.is_finite() && draft.target > 0.0) {
        return api_error(StatusCode::BAD_REQUEST, "Target must be a positive amount");
    }

    let draft = draft.clamped();
    let calc = GoalEconomicsCalculator::new();

    ApiResponse::ok(GoalEconomicsResponse {
        economics: calc.compute_rates(&draft, &state.profile).for_display(),
        timeline: calc.recommend_timeline(&draft, &state.profile),
        benefits: calc.benefits_tier(draft.duration_days),
        draft,
    })
}

/// GET /api/benefits/:days - Benefits tier for a duration
async fn get_benefits(Path(days): Path<u32>) -> Response {
    ApiResponse::ok(GoalEconomicsCalculator::new().benefits_tier(days))
}

/// GET /api/activity/:window - Activity statistics (today | month)
async fn get_activity(State(state): State<AppState>, Path(window): Path<String>) -> Response {
    let window: ActivityWindow = match window.parse() {
        Ok(window) => window,
        Err(message) => return api_error(StatusCode::BAD_REQUEST, message),
    };

    let summary: ActivitySummary = match state.snapshot.read() {
        Ok(snapshot) => summarize_activity(&snapshot.transactions, window, Utc::now()),
        Err(e) => {
            error!("snapshot lock poisoned: {}", e);
            return api_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to read wallet snapshot");
        }
    };

    ApiResponse::ok(summary)
}

fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/credit-score", get(get_credit_score))
        .route("/goal-economics", post(post_goal_economics))
        .route("/benefits/:days", get(get_benefits))
        .route("/activity/:window", get(get_activity))
        .with_state(state);

    Router::new().nest("/api", api_routes).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    )
}

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")))
        .init();

    let config_path = std::env::var_os("KOLA_CONFIG").map(PathBuf::from);
    let config = load_config_with_fallback(config_path.as_ref())?;

    let snapshot = match &config.snapshot_path {
        Some(path) => load_snapshot(path)?,
        None => {
            warn!("no snapshotPath configured, serving the demo wallet");
            demo_snapshot(Utc::now())
        }
    };
    let profile = snapshot.profile.clone().unwrap_or_else(|| config.profile.clone());

    let state = AppState {
        snapshot: Arc::new(RwLock::new(snapshot)),
        profile: Arc::new(profile),
    };

    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    info!(address = %config.bind_address, "🚀 Kola Engine API listening");

    axum::serve(listener, build_router(state)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    fn test_state() -> AppState {
        create_test_state(FinancialProfile::default())
    }

    fn create_test_state(profile: FinancialProfile) -> AppState {
        AppState {
            snapshot: Arc::new(RwLock::new(demo_snapshot(Utc::now()))),
            profile: Arc::new(profile),
        }
    }

    async fn send(request: Request<Body>) -> (StatusCode, serde_json::Value) {
        send_with(test_state(), request).await
    }

    async fn send_with(state: AppState, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = build_router(state).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_credit_score_endpoint() {
        let (status, body) = send(Request::get("/api/credit-score").body(Body::empty()).unwrap()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["maxScore"], 850);
        assert_eq!(body["data"]["breakdown"]["paymentHistory"], 31);
    }

    #[tokio::test]
    async fn test_goal_economics_endpoint() {
        let request = Request::post("/api/goal-economics")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"target": 500, "durationDays": 90}"#))
            .unwrap();
        let (status, body) = send(request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["economics"]["penaltyRate"], 0.0262);
        assert_eq!(body["data"]["timeline"]["days"], 20);
        assert_eq!(body["data"]["benefits"]["tier"], "Medium-term");
    }

    #[tokio::test]
    async fn test_goal_economics_uses_loaded_profile() {
        let overspending = FinancialProfile {
            credit_score: 620,
            monthly_income: 2000.0,
            monthly_savings_current: 0.0,
            monthly_expenses: 2400.0,
        };
        let request = Request::post("/api/goal-economics")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"target": 500, "durationDays": 120}"#))
            .unwrap();
        let (status, body) = send_with(create_test_state(overspending), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["economics"]["riskLevel"], "high");
        assert_eq!(body["data"]["economics"]["factors"]["disposableIncome"], -400.0);
        assert_eq!(body["data"]["timeline"]["days"], 1095);
    }

    #[tokio::test]
    async fn test_goal_economics_rejects_non_positive_target() {
        let request = Request::post("/api/goal-economics")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"target": 0, "durationDays": 90}"#))
            .unwrap();
        let (status, body) = send(request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_activity_endpoint_rejects_unknown_window() {
        let (status, _) = send(Request::get("/api/activity/yearly").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
