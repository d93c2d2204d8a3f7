use std::process::ExitCode;

use configs::AppConfig;
use dotenvy::dotenv;
use tokio::runtime::Runtime;
use tracing::{error, info, warn};
use uuid::Uuid;

const SERVICE: &str = "server";

fn init_logging() {
    // .env first so RUST_LOG and LOG_FORMAT apply
    dotenv().ok();
    match std::env::var("LOG_FORMAT").as_deref() {
        Ok("json") => common::utils::logging::init_logging_json(),
        _ => common::utils::logging::init_logging_default(),
    }
}

/// Per-process identity carried by every lifecycle event.
#[derive(Clone, Copy)]
struct Lifecycle {
    service_id: Uuid,
    pid: u32,
}

impl Lifecycle {
    fn new() -> Self {
        Self { service_id: Uuid::new_v4(), pid: std::process::id() }
    }

    fn install_panic_hook(self) {
        std::panic::set_hook(Box::new(move |info| {
            error!(
                service = SERVICE,
                event = "panic",
                service_id = %self.service_id,
                pid = self.pid,
                message = %info,
                "unhandled panic"
            );
        }));
    }

}

/// Resolves on Ctrl+C. Without a signal handler the server keeps running.
async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(service = SERVICE, event = "signal_unavailable", error = %e, "cannot listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
}

fn build_runtime(worker_threads: Option<usize>) -> std::io::Result<Runtime> {
    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(n) = worker_threads {
        builder.worker_threads(n);
    }
    builder.build()
}

fn main() -> ExitCode {
    init_logging();
    let life = Lifecycle::new();
    life.install_panic_hook();

    let cfg = match AppConfig::load_or_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(service = SERVICE, event = "config_invalid", error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let rt = match build_runtime(cfg.server.worker_threads) {
        Ok(rt) => rt,
        Err(e) => {
            error!(service = SERVICE, event = "runtime_build_failed", error = %e, "cannot build tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    info!(
        service = SERVICE,
        event = "start",
        service_id = %life.service_id,
        pid = life.pid,
        version = env!("CARGO_PKG_VERSION"),
        addr = %cfg.server.bind_addr(),
        signups_path = %cfg.storage.signups_path.display(),
        "beta signup server starting"
    );

    let shutdown = server::startup::shutdown_signal(ctrl_c(), life.service_id, life.pid);
    match rt.block_on(server::run(cfg, shutdown)) {
        Ok(()) => {
            info!(service = SERVICE, event = "stop", service_id = %life.service_id, pid = life.pid, "server stopped");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(service = SERVICE, event = "run_failed", service_id = %life.service_id, error = %e, "server exited with error");
            ExitCode::FAILURE
        }
    }
}
