mod error;
mod handlers;

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use axum::routing::{get, post};
use axum::Router;
use classifier_core::classifier::Classifier;
use classifier_core::reputation::SafeBrowsingClient;
use classifier_core::rules::RuleSet;
use classifier_core::{config, logging};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
  pub classifier: Arc<Classifier>,
}

fn build_router(state: AppState) -> Router {
  Router::new()
    .route("/", get(handlers::home))
    .route("/health", get(handlers::health))
    .route("/analyze-link/", post(handlers::analyze_link))
    .layer(CorsLayer::permissive())
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Best-effort .env load; ignore if missing.
  let _ = dotenvy::dotenv();

  let cfg = config::load_or_create_default(&config::config_path())?;
  logging::init_file_and_stderr(
    Path::new(&cfg.logging.dir),
    &cfg.logging.level,
    cfg.logging.retention_days,
  )?;
  cfg.validate()?;

  let api_key = std::env::var(&cfg.reputation.api_key_env)
    .map_err(|_| anyhow::anyhow!("{} is required but not set", cfg.reputation.api_key_env))?;

  let lookup = SafeBrowsingClient::new(cfg.reputation.clone(), api_key)?;
  let classifier = Classifier::new(RuleSet::new(cfg.rules.clone()), Arc::new(lookup));
  let state = AppState {
    classifier: Arc::new(classifier),
  };

  let app = build_router(state);

  // PORT overrides the config file, matching how the service is deployed.
  let port = std::env::var("PORT")
    .ok()
    .and_then(|v| v.parse().ok())
    .unwrap_or(cfg.server.port);
  let addr: SocketAddr = format!("{}:{}", cfg.server.host, port)
    .parse()
    .context("invalid bind address")?;

  tracing::info!(%addr, "link analyzer listening");
  let listener = tokio::net::TcpListener::bind(addr)
    .await
    .context("bind listener")?;
  axum::serve(listener, app).await.context("server error")?;
  Ok(())
}
