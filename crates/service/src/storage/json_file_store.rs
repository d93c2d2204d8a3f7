use std::{io::ErrorKind, path::PathBuf};

use async_trait::async_trait;
use models::SignupRecord;
use tokio::fs;

use super::SignupStore;
use crate::errors::ServiceError;

/// JSON file-backed signup list.
///
/// Persists a `Vec<SignupRecord>` as a pretty-printed JSON array. The file is
/// created by the first `save`; a missing file loads as an empty list.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    file_path: PathBuf,
}

impl JsonFileStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { file_path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.file_path
    }

    /// Sibling of the target so the final rename stays on one filesystem.
    fn temp_path(&self) -> PathBuf {
        let name = self
            .file_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "signups.json".into());
        self.file_path
            .with_file_name(format!(".{name}.{}.tmp", uuid::Uuid::new_v4().simple()))
    }
}

#[async_trait]
impl SignupStore for JsonFileStore {
    async fn load(&self) -> Result<Vec<SignupRecord>, ServiceError> {
        let bytes = match fs::read(&self.file_path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(ServiceError::Storage(format!("read {}: {e}", self.file_path.display()))),
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }
        serde_json::from_slice(&bytes)
            .map_err(|e| ServiceError::Storage(format!("parse {}: {e}", self.file_path.display())))
    }

    async fn save(&self, signups: &[SignupRecord]) -> Result<(), ServiceError> {
        if let Some(parent) = self.file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| ServiceError::Storage(format!("create {}: {e}", parent.display())))?;
        }
        let data = serde_json::to_vec_pretty(signups).map_err(|e| ServiceError::Storage(e.to_string()))?;

        let tmp = self.temp_path();
        fs::write(&tmp, data)
            .await
            .map_err(|e| ServiceError::Storage(format!("write {}: {e}", tmp.display())))?;
        if let Err(e) = fs::rename(&tmp, &self.file_path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(ServiceError::Storage(format!("replace {}: {e}", self.file_path.display())));
        }
        Ok(())
    }
}
