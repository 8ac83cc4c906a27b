use std::{
    path::{Path, PathBuf},
    time::{Duration, SystemTime},
};

use anyhow::Context;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Prefix of every file this store creates; sweeping never touches anything else.
pub const FILE_PREFIX: &str = "tts_";

/// Directory holding synthesized audio until it expires.
#[derive(Debug, Clone)]
pub struct AudioStore {
    dir: PathBuf,
    ttl: Duration,
}

impl AudioStore {
    pub fn new(dir: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self {
            dir: dir.into(),
            ttl,
        }
    }

    /// `<system temp>/ai-audio-tool`
    pub fn default_dir() -> PathBuf {
        std::env::temp_dir().join("ai-audio-tool")
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Fresh, collision-free path inside the store (`tts_<uuid>.<ext>`)
    pub fn allocate_path(&self, ext: &str) -> PathBuf {
        let id = uuid::Uuid::new_v4().simple();
        self.dir.join(format!("{FILE_PREFIX}{id}.{ext}"))
    }

    /// Persist `bytes` under a new name and return the full path
    pub async fn write(&self, bytes: &[u8], ext: &str) -> std::io::Result<PathBuf> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.allocate_path(ext);
        tokio::fs::write(&path, bytes).await?;
        debug!("Stored {} bytes at {}", bytes.len(), path.display());
        Ok(path)
    }

    /// Delete stored files older than the TTL. Returns how many were removed.
    pub async fn sweep(&self) -> anyhow::Result<usize> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", self.dir.display()))
            }
        };

        let now = SystemTime::now();
        let mut removed = 0;
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name();
            if !name.to_string_lossy().starts_with(FILE_PREFIX) {
                continue;
            }
            let meta = match entry.metadata().await {
                Ok(m) if m.is_file() => m,
                _ => continue,
            };
            let age = meta
                .modified()
                .ok()
                .and_then(|m| now.duration_since(m).ok());
            if matches!(age, Some(age) if age >= self.ttl) {
                match tokio::fs::remove_file(entry.path()).await {
                    Ok(()) => removed += 1,
                    Err(e) => warn!("Could not remove expired audio {}: {e}", entry.path().display()),
                }
            }
        }
        Ok(removed)
    }

    /// Run [`sweep`](Self::sweep) every `interval` until the task is aborted
    pub fn spawn_sweeper(&self, interval: Duration) -> JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                match store.sweep().await {
                    Ok(0) => {}
                    Ok(n) => info!("Removed {n} expired audio file(s) from {}", store.dir.display()),
                    Err(e) => warn!("Audio sweep failed: {e:#}"),
                }
            }
        })
    }
}
