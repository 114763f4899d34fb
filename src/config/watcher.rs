//! Hot reload of the configuration file.
//!
//! The parent directory is watched rather than the file itself: editors
//! that save through a temporary file and a rename would otherwise leave
//! the watch pointing at a deleted inode. Only events naming the config
//! file trigger a reload, and a file that fails to load or validate is
//! logged and ignored.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::load_config;
use crate::config::schema::ConsoleConfig;

/// Sends a freshly loaded `ConsoleConfig` every time the file changes.
pub struct ConfigWatcher {
    path: PathBuf,
    update_tx: mpsc::UnboundedSender<ConsoleConfig>,
}

impl ConfigWatcher {
    /// Returns the watcher and the receiving end for reloaded configs.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<ConsoleConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();
        let watcher = Self {
            path: path.to_path_buf(),
            update_tx,
        };
        (watcher, update_rx)
    }

    /// Start watching. Dropping the returned handle stops the watch.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let file_name: OsString = self.path.file_name().map(OsString::from).unwrap_or_default();
        let path = self.path.clone();
        let tx = self.update_tx;

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) if touches(&event, &file_name) => reload(&path, &tx),
                Ok(_) => {}
                Err(e) => tracing::error!(error = %e, "Config watch error"),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;
        watcher.watch(&dir, RecursiveMode::NonRecursive)?;

        tracing::info!(path = %self.path.display(), "Config watcher started");
        Ok(watcher)
    }
}

/// A content change (write, create, rename) to the watched file.
fn touches(event: &Event, file_name: &OsString) -> bool {
    matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_))
        && event
            .paths
            .iter()
            .any(|p| p.file_name() == Some(file_name.as_os_str()))
}

fn reload(path: &Path, tx: &mpsc::UnboundedSender<ConsoleConfig>) {
    match load_config(path) {
        Ok(config) => {
            tracing::info!(path = %path.display(), rules = config.qc.rules.len(), "Config reloaded");
            if tx.send(config).is_err() {
                tracing::debug!("Config receiver gone, dropping reload");
            }
        }
        Err(e) => tracing::error!(
            path = %path.display(),
            error = %e,
            "Config reload failed, keeping current configuration"
        ),
    }
}
