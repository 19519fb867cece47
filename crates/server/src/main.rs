use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{StatusCode, Uri},
    routing::{get, post},
    Json, Router,
};
use shared::{
    domain::Account,
    error::{ApiError, ApiException, ErrorCode},
    protocol::{account_refresh_route, account_route, RefreshAccountRequest},
};
use tower_http::limit::RequestBodyLimitLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod api;
mod app_state;
mod config;

use api::{load_account, refresh_account, ApiContext};
use app_state::AppState;
use config::load_settings;

const MAX_REQUEST_BYTES: usize = 2 * 1024 * 1024;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = load_settings();
    let account_file = settings.account_file.display().to_string();
    let state = AppState {
        api: ApiContext {
            account_file: settings.account_file,
        },
    };
    let app = build_router(Arc::new(state));

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, %account_file, "account server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route(account_route(), get(http_get_account))
        .route(account_refresh_route(), post(http_refresh_account))
        .fallback(not_found)
        .layer(RequestBodyLimitLayer::new(MAX_REQUEST_BYTES))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ApiError>)>;

fn api_failure(err: ApiException) -> (StatusCode, Json<ApiError>) {
    let status = match err.code {
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Validation => StatusCode::BAD_REQUEST,
        ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(err.into()))
}

async fn not_found(uri: Uri) -> (StatusCode, Json<ApiError>) {
    api_failure(ApiException::new(
        ErrorCode::NotFound,
        format!("no route for {uri}"),
    ))
}

async fn http_get_account(State(state): State<Arc<AppState>>) -> ApiResult<Account> {
    load_account(&state.api).await.map(Json).map_err(api_failure)
}

async fn http_refresh_account(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RefreshAccountRequest>, JsonRejection>,
) -> ApiResult<Account> {
    // Keep the rejection's status so an oversized body still answers 413.
    let Json(req) = payload.map_err(|rejection| {
        let err = ApiException::new(ErrorCode::Validation, rejection.body_text());
        (rejection.status(), Json(ApiError::from(err)))
    })?;
    refresh_account(&state.api, &req.account)
        .await
        .map(Json)
        .map_err(api_failure)
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
