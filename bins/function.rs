//! Runs the signup function once: reads a serverless HTTP event as JSON on
//! stdin and writes the response document to stdout. Logs go to stderr.

use dotenvy::dotenv;
use server::function::SignupFunction;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing::{error, info};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    common::utils::logging::init_logging_stderr();

    let cfg = configs::AppConfig::load_or_env()?;
    service::runtime::ensure_env(&cfg.storage.signups_path).await?;
    let function = SignupFunction::new(server::startup::build_service(&cfg));

    let mut raw = Vec::new();
    tokio::io::stdin().read_to_end(&mut raw).await?;

    let response = function.handle_raw(&raw).await;
    info!(status = response.status_code, "signup function handled event");

    let out = serde_json::to_vec(&response).map_err(|e| {
        error!(error = %e, "cannot encode function response");
        e
    })?;
    let mut stdout = tokio::io::stdout();
    stdout.write_all(&out).await?;
    stdout.write_all(b"\n").await?;
    stdout.flush().await?;
    Ok(())
}
