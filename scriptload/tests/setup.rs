#![allow(dead_code)]

use scriptload::config::{CachedDataConfig, Config};
use scriptload::Spawner;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Runs `body` while driving the tasks of the spawner passed to it.
pub async fn local<B, F>(body: B) -> F::Output
where
    B: FnOnce(Spawner) -> F,
    F: Future,
{
    let _ = env_logger::builder().is_test(true).try_init();
    let spawner = Spawner::new();
    spawner.run_until(body(spawner.clone())).await
}

/// Yields until `condition` holds, without sleeping, so a paused clock stays where it is.
pub async fn settle<C: FnMut() -> bool>(mut condition: C) {
    let give_up = std::time::Instant::now() + Duration::from_secs(10);
    while !condition() {
        assert!(std::time::Instant::now() < give_up, "condition did not hold in time");
        tokio::task::yield_now().await;
    }
}

/// Configuration enabling the bytecode cache in `directory`.
pub fn cached_config(directory: &Path, write_delay: Duration) -> Config {
    Config {
        node_cached_data: Some(CachedDataConfig::new(directory).with_write_delay(write_delay)),
        ..Config::default()
    }
}

pub fn write_script(directory: &Path, name: &str, contents: &str) -> PathBuf {
    let path = directory.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

/// Lists the files in a cache directory, returning nothing if it does not exist.
pub fn cache_files(directory: &Path) -> Vec<PathBuf> {
    match std::fs::read_dir(directory) {
        Ok(entries) => {
            let mut files: Vec<_> = entries.map(|entry| entry.unwrap().path()).collect();
            files.sort();
            files
        }
        Err(_) => Vec::new(),
    }
}
