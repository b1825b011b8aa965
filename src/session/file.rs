//! File-backed session repository: one JSON document per session.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tokio::fs;
use tracing::debug;

use super::repository::SessionRepository;
use crate::error::ColloquyError;
use crate::types::Content;

const FORMAT_VERSION: u32 = 1;

/// Stores each session under `base_dir` as `<label>-<hash>.json`.
///
/// The label is a filesystem-safe prefix of the id and the hash suffix keeps
/// distinct ids apart, so caller-chosen ids never escape `base_dir`.
#[derive(Debug, Clone)]
pub struct FileSessionRepository {
    base_dir: PathBuf,
}

#[derive(Debug, Serialize, Deserialize)]
struct SessionFile {
    version: u32,
    session_id: String,
    history: Vec<Content>,
    saved_at: DateTime<Utc>,
}

impl FileSessionRepository {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// `~/.colloquy/sessions`, or `.colloquy/sessions` without a home directory.
    pub fn default_dir() -> PathBuf {
        directories::UserDirs::new()
            .map(|dirs| dirs.home_dir().join(".colloquy"))
            .unwrap_or_else(|| PathBuf::from(".colloquy"))
            .join("sessions")
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn session_path(&self, session_id: &str) -> PathBuf {
        let label: String = session_id
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .take(48)
            .collect();
        let digest = Sha256::digest(session_id.as_bytes());
        let suffix: String = digest[..8].iter().map(|b| format!("{b:02x}")).collect();
        self.base_dir.join(format!("{label}-{suffix}.json"))
    }

    /// Remove temp files left behind by saves of this session that never
    /// reached the rename (for example a save dropped on cancellation).
    async fn sweep_stale_temps(&self, path: &Path) {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return;
        };
        let prefix = format!("{name}.");
        let Ok(mut entries) = fs::read_dir(&self.base_dir).await else {
            return;
        };
        while let Ok(Some(entry)) = entries.next_entry().await {
            let file_name = entry.file_name();
            let Some(file_name) = file_name.to_str() else {
                continue;
            };
            if file_name.starts_with(&prefix) && file_name.ends_with(".tmp") {
                debug!(file = file_name, "removing stale session temp file");
                let _ = fs::remove_file(entry.path()).await;
            }
        }
    }
}

/// A temp file that is deleted on drop unless it was renamed into place.
struct PendingWrite {
    path: PathBuf,
    committed: bool,
}

impl PendingWrite {
    fn new(path: PathBuf) -> Self {
        Self {
            path,
            committed: false,
        }
    }

    fn commit(mut self) {
        self.committed = true;
    }
}

impl Drop for PendingWrite {
    fn drop(&mut self) {
        if !self.committed {
            let _ = std::fs::remove_file(&self.path);
        }
    }
}

#[async_trait]
impl SessionRepository for FileSessionRepository {
    async fn save(&self, session_id: &str, history: &[Content]) -> Result<(), ColloquyError> {
        let path = self.session_path(session_id);
        fs::create_dir_all(&self.base_dir)
            .await
            .map_err(|err| ColloquyError::repository(session_id, err))?;

        let file = SessionFile {
            version: FORMAT_VERSION,
            session_id: session_id.to_string(),
            history: history.to_vec(),
            saved_at: Utc::now(),
        };
        let serialized = serde_json::to_vec_pretty(&file)?;

        self.sweep_stale_temps(&path).await;
        let tmp = PendingWrite::new(
            path.with_extension(format!("json.{}.tmp", uuid::Uuid::new_v4().simple())),
        );
        fs::write(&tmp.path, serialized)
            .await
            .map_err(|err| ColloquyError::repository(session_id, err))?;
        fs::rename(&tmp.path, &path)
            .await
            .map_err(|err| ColloquyError::repository(session_id, err))?;
        tmp.commit();
        Ok(())
    }

    async fn load(&self, session_id: &str) -> Result<Option<Vec<Content>>, ColloquyError> {
        let path = self.session_path(session_id);
        let raw = match fs::read(&path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(ColloquyError::repository(session_id, err)),
        };
        let file: SessionFile = serde_json::from_slice(&raw)
            .map_err(|err| ColloquyError::repository(session_id, format!("corrupt session file: {err}")))?;
        Ok(Some(file.history))
    }

    async fn delete(&self, session_id: &str) -> Result<(), ColloquyError> {
        match fs::remove_file(self.session_path(session_id)).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(ColloquyError::repository(session_id, err)),
        }
    }
}
