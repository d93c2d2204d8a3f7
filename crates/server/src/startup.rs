use std::{future::Future, net::SocketAddr, sync::Arc};

use axum::{http::{header, Method}, Router};
use configs::AppConfig;
use service::{
    runtime,
    signup::{SignupApi, SignupService},
    storage::JsonFileStore,
};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use uuid::Uuid;

use crate::{observability, routes::{self, ServerState}};

pub fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

/// File-backed signup service for the configured store path.
pub fn build_service(cfg: &AppConfig) -> Arc<dyn SignupApi> {
    let store = Arc::new(JsonFileStore::new(cfg.storage.signups_path.clone()));
    Arc::new(SignupService::new(store))
}

/// Router wired to `signups`, with CORS and request tracing.
pub fn build_app(signups: Arc<dyn SignupApi>) -> Router {
    routes::build_router(ServerState { signups }, build_cors())
}

/// Serve `app` on an already-bound listener until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;
    Ok(())
}

/// Resolves with `signal`, logging the `shutdown_signal` lifecycle event
/// before the server starts draining.
pub async fn shutdown_signal<F>(signal: F, service_id: Uuid, pid: u32)
where
    F: Future<Output = ()>,
{
    signal.await;
    info!(
        service = "server",
        event = "shutdown_signal",
        %service_id,
        pid,
        "shutdown requested, draining in-flight requests"
    );
}

/// Public entry: build the app from `cfg` and serve until `shutdown` resolves.
pub async fn run<F>(cfg: AppConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    runtime::ensure_env(&cfg.storage.signups_path).await?;
    observability::init();

    let app = build_app(build_service(&cfg));

    let listener = TcpListener::bind(cfg.server.bind_addr()).await?;
    let addr: SocketAddr = listener.local_addr()?;
    info!(%addr, signups_path = %cfg.storage.signups_path.display(), "beta signup server listening");

    serve(listener, app, shutdown).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::sync::oneshot;

    #[tokio::test]
    async fn run_returns_once_the_shutdown_signal_fires() -> anyhow::Result<()> {
        let dir = std::env::temp_dir().join(format!("beta_signup_run_{}", Uuid::new_v4()));
        let mut cfg = AppConfig::default();
        cfg.server.port = 0;
        cfg.storage.signups_path = dir.join("beta-signups.json");

        let (tx, rx) = oneshot::channel::<()>();
        let signal = shutdown_signal(async { let _ = rx.await; }, Uuid::new_v4(), std::process::id());
        let handle = tokio::spawn(run(cfg, signal));

        // let the listener come up before signalling
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!handle.is_finished());
        let _ = tx.send(());

        tokio::time::timeout(Duration::from_secs(5), handle).await???;
        assert!(dir.exists(), "run prepares the store directory");
        let _ = std::fs::remove_dir_all(&dir);
        Ok(())
    }
}
