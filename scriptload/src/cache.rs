//! Persistent storage of compiled bytecode for scripts loaded by the host process strategy.
//!
//! Each script gets one `.code` file, named after a hash of its normalized path so that writers for different scripts
//! never touch the same file. Reads that fail are treated as a cold cache. Writes and deletions happen in the
//! background after a randomized delay, and their failures are only reported to the error hook.

use crate::config::CachedDataConfig;
use crate::error::{CacheError, CacheErrorCode};
use crate::hooks::ErrorHook;
use crate::spawn::Spawner;
use rand::Rng as _;
use sha2::{Digest as _, Sha256};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;

pub const EXTENSION: &str = "code";

#[derive(Clone, Debug)]
pub struct BytecodeCache {
    config: CachedDataConfig,
    spawner: Spawner,
}

impl BytecodeCache {
    pub fn new(config: CachedDataConfig, spawner: Spawner) -> Self {
        Self { config, spawner }
    }

    /// Hex digest identifying the cache entry of the script at `script_path`.
    ///
    /// Only the path contributes, never the contents; stale entries are detected by the engine rejecting them.
    pub fn key(&self, script_path: &Path) -> String {
        let mut hasher = Sha256::new();
        hasher.update(script_path.as_os_str().as_encoded_bytes());
        if let Some(seed) = &self.config.seed {
            hasher.update(seed.as_bytes());
        }
        hasher.update(std::env::consts::ARCH.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Location of the cache file for the script at `script_path`, `<key>-<basename>.code`.
    pub fn file_path(&self, script_path: &Path) -> PathBuf {
        let basename = script_path
            .file_name()
            .map(|name| name.to_string_lossy())
            .unwrap_or_default();
        let basename = basename.strip_suffix(".js").unwrap_or(&*basename);
        self.config
            .path
            .join(format!("{}-{}.{}", self.key(script_path), basename, EXTENSION))
    }

    /// Reads previously cached data, returning `None` if there is none or it cannot be read.
    pub async fn read(&self, cache_path: &Path) -> Option<Vec<u8>> {
        match tokio::fs::read(cache_path).await {
            Ok(data) => Some(data),
            Err(error) => {
                if error.kind() != std::io::ErrorKind::NotFound {
                    log::warn!("ignoring unreadable cache file {}: {}", cache_path.display(), error);
                }
                None
            }
        }
    }

    pub fn next_delay(&self) -> Duration {
        jittered_delay(self.config.write_delay())
    }

    /// Deletes a rejected cache file after a randomized delay.
    pub fn schedule_eviction(&self, cache_path: PathBuf, on_error: ErrorHook) -> JoinHandle<()> {
        let deadline = Instant::now() + self.next_delay();
        self.spawner.spawn(async move {
            tokio::time::sleep_until(deadline).await;
            match tokio::fs::remove_file(&cache_path).await {
                Ok(()) => log::debug!("evicted cache file {}", cache_path.display()),
                Err(error) => on_error(CacheError::new(CacheErrorCode::Unlink, cache_path, Some(error))),
            }
        })
    }

    /// Persists freshly produced cached data after a randomized delay.
    pub fn schedule_write(&self, cache_path: PathBuf, data: Vec<u8>, on_error: ErrorHook) -> JoinHandle<()> {
        let deadline = Instant::now() + self.next_delay();
        self.spawner.spawn(async move {
            tokio::time::sleep_until(deadline).await;
            let result = async {
                if let Some(directory) = cache_path.parent() {
                    tokio::fs::create_dir_all(directory).await?;
                }
                tokio::fs::write(&cache_path, &data).await
            };

            match result.await {
                Ok(()) => log::debug!("wrote {} bytes to {}", data.len(), cache_path.display()),
                Err(error) => on_error(CacheError::new(CacheErrorCode::WriteFile, cache_path, Some(error))),
            }
        })
    }
}

/// Picks a delay in `[minimum, 2 * minimum)`, spreading the disk activity of many scripts loaded at once.
pub fn jittered_delay(minimum: Duration) -> Duration {
    let millis = u64::try_from(minimum.as_millis()).unwrap_or(u64::MAX);
    if millis == 0 {
        return Duration::ZERO;
    }

    Duration::from_millis(millis.saturating_add(rand::rng().random_range(0..millis)))
}
