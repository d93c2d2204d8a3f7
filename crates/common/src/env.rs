//! Environment/runtime helpers
//!
//! Sanity checks so the store has somewhere to live before the first request.

use std::path::Path;

use tracing::{info, warn};

/// Ensure the directory holding the signups file exists.
pub async fn ensure_env(signups_path: &Path) -> anyhow::Result<()> {
    let Some(parent) = signups_path.parent().filter(|p| !p.as_os_str().is_empty()) else {
        return Ok(());
    };
    tokio::fs::create_dir_all(parent)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", parent.display()))?;
    match tokio::fs::metadata(signups_path).await {
        Ok(_) => info!(path = %signups_path.display(), "using existing signups file"),
        Err(_) => warn!(path = %signups_path.display(), "signups file not found; it will be created on first signup"),
    }
    Ok(())
}
