//! Live reload manager.
//!
//! Coordinates file watching and WebSocket broadcasting for live reload.
//! Every change anywhere under the root directory results in a full page
//! reload; there is no dependency tracking between files and pages.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use serde::Serialize;
use tokio::sync::broadcast;
use tokio::sync::mpsc;

use super::debouncer::{EventDebouncer, FsEvent, FsEventKind};

/// Event sent to connected WebSocket clients when files change.
#[derive(Clone, Debug, Serialize)]
pub(crate) struct ReloadEvent {
    /// Event type (always "reload").
    #[serde(rename = "type")]
    event_type: String,
    /// Path that changed, relative to the root directory.
    path: String,
}

impl ReloadEvent {
    pub(crate) fn new(path: String) -> Self {
        Self {
            event_type: "reload".to_string(),
            path,
        }
    }
}

/// Interval at which debounced events are drained and broadcast.
const DRAIN_INTERVAL: Duration = Duration::from_millis(50);

/// Manages file watching and broadcasting reload events.
pub(crate) struct LiveReloadManager {
    root_dir: PathBuf,
    watch_patterns: Vec<String>,
    broadcaster: broadcast::Sender<ReloadEvent>,
    watcher: Option<RecommendedWatcher>,
    debounce_ms: u64,
}

impl LiveReloadManager {
    /// Create a new live reload manager.
    ///
    /// # Arguments
    ///
    /// * `root_dir` - Directory to watch for changes
    /// * `watch_patterns` - Glob patterns to match, relative to `root_dir`
    /// * `debounce_ms` - Debounce window in milliseconds
    /// * `broadcaster` - Broadcast channel sender for reload events
    #[must_use]
    pub(crate) fn new(
        root_dir: PathBuf,
        watch_patterns: Vec<String>,
        debounce_ms: u64,
        broadcaster: broadcast::Sender<ReloadEvent>,
    ) -> Self {
        Self {
            root_dir,
            watch_patterns,
            broadcaster,
            watcher: None,
            debounce_ms,
        }
    }

    /// Start the file watcher.
    ///
    /// Spawns background tasks that watch for file changes and broadcast
    /// reload events to connected WebSocket clients.
    ///
    /// # Errors
    ///
    /// Returns an error if the file watcher cannot be created or the root
    /// directory cannot be watched.
    pub(crate) fn start(&mut self) -> Result<(), notify::Error> {
        // notify reports canonical paths on some platforms; match them
        // against a canonical root so strip_prefix works
        let root_dir = self
            .root_dir
            .canonicalize()
            .unwrap_or_else(|_| self.root_dir.clone());

        let (tx, mut rx) = mpsc::channel::<Event>(100);

        // Create watcher with callback that sends events to channel
        let mut watcher = notify::recommended_watcher(move |res: Result<Event, notify::Error>| {
            if let Ok(event) = res {
                // Use blocking_send since callback is sync
                let _ = tx.blocking_send(event);
            }
        })?;

        watcher.watch(&root_dir, RecursiveMode::Recursive)?;
        self.watcher = Some(watcher);

        let debouncer = Arc::new(EventDebouncer::new(Duration::from_millis(self.debounce_ms)));
        let debouncer_for_record = Arc::clone(&debouncer);

        // Spawn task to record events into the debouncer
        let watch_patterns = self.watch_patterns.clone();
        let root_for_record = root_dir.clone();

        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                Self::record_event(
                    &event,
                    &root_for_record,
                    &watch_patterns,
                    &debouncer_for_record,
                );
            }
        });

        // Spawn task to broadcast debounced events
        let broadcaster = self.broadcaster.clone();
        let root_for_broadcast = root_dir;

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(DRAIN_INTERVAL);

            loop {
                interval.tick().await;

                for fs_event in debouncer.drain_ready() {
                    Self::broadcast_reload(&fs_event, &root_for_broadcast, &broadcaster);
                }
            }
        });

        Ok(())
    }

    /// Record a raw filesystem event into the debouncer.
    fn record_event(
        event: &Event,
        root_dir: &Path,
        watch_patterns: &[String],
        debouncer: &EventDebouncer,
    ) {
        let kind = match event.kind {
            EventKind::Create(_) => FsEventKind::Created,
            EventKind::Modify(_) => FsEventKind::Modified,
            EventKind::Remove(_) => FsEventKind::Removed,
            _ => return,
        };

        for path in &event.paths {
            if !Self::matches_patterns(path, root_dir, watch_patterns) {
                continue;
            }

            debouncer.record(path.clone(), kind);
            tracing::debug!(path = %path.display(), ?kind, "Recorded filesystem event");
        }
    }

    /// Broadcast a reload event for a debounced filesystem event.
    fn broadcast_reload(
        fs_event: &FsEvent,
        root_dir: &Path,
        broadcaster: &broadcast::Sender<ReloadEvent>,
    ) {
        let Some(path) = Self::relative_url_path(&fs_event.path, root_dir) else {
            return;
        };

        let receivers = broadcaster.send(ReloadEvent::new(path.clone())).unwrap_or(0);

        tracing::info!(
            path = %path,
            kind = ?fs_event.kind,
            clients = receivers,
            "Live reload event broadcast"
        );
    }

    /// Convert a filesystem path into a root-relative URL-style path.
    fn relative_url_path(file_path: &Path, root_dir: &Path) -> Option<String> {
        let relative = file_path.strip_prefix(root_dir).ok()?;
        Some(relative.to_string_lossy().replace('\\', "/"))
    }

    /// Check if a path matches any watch pattern.
    fn matches_patterns(path: &Path, root_dir: &Path, patterns: &[String]) -> bool {
        let Ok(relative) = path.strip_prefix(root_dir) else {
            return false;
        };

        let relative_str = relative.to_string_lossy();

        patterns
            .iter()
            .filter_map(|p| glob::Pattern::new(p).ok())
            .any(|glob_pattern| glob_pattern.matches(&relative_str))
    }

    /// Get a receiver for reload events.
    #[must_use]
    pub(crate) fn subscribe(&self) -> broadcast::Receiver<ReloadEvent> {
        self.broadcaster.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reload_event_serialization() {
        let event = ReloadEvent::new("css/site.css".to_string());

        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["type"], "reload");
        assert_eq!(json["path"], "css/site.css");
    }

    #[test]
    fn test_matches_patterns_catch_all() {
        let root = PathBuf::from("/site");
        let patterns = vec!["**/*".to_string()];

        assert!(LiveReloadManager::matches_patterns(
            &PathBuf::from("/site/index.html"),
            &root,
            &patterns
        ));
        assert!(LiveReloadManager::matches_patterns(
            &PathBuf::from("/site/assets/deep/logo.png"),
            &root,
            &patterns
        ));
    }

    #[test]
    fn test_matches_patterns_by_extension() {
        let root = PathBuf::from("/site");
        let patterns = vec!["**/*.html".to_string()];

        assert!(LiveReloadManager::matches_patterns(
            &PathBuf::from("/site/nested/page.html"),
            &root,
            &patterns
        ));
        assert!(!LiveReloadManager::matches_patterns(
            &PathBuf::from("/site/image.png"),
            &root,
            &patterns
        ));
    }

    #[test]
    fn test_matches_patterns_outside_root() {
        let root = PathBuf::from("/site");
        let patterns = vec!["**/*".to_string()];

        assert!(!LiveReloadManager::matches_patterns(
            &PathBuf::from("/other/index.html"),
            &root,
            &patterns
        ));
    }

    #[test]
    fn test_relative_url_path() {
        let root = PathBuf::from("/site");

        assert_eq!(
            LiveReloadManager::relative_url_path(&PathBuf::from("/site/css/site.css"), &root),
            Some("css/site.css".to_string())
        );
        assert_eq!(
            LiveReloadManager::relative_url_path(&PathBuf::from("/other/file"), &root),
            None
        );
    }

    /// End-to-end watcher check: a file change produces a reload event on
    /// the broadcast channel within one second.
    #[tokio::test]
    async fn test_file_change_broadcasts_reload_within_one_second() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("index.html");
        std::fs::write(&file, "<html></html>").unwrap();

        let (tx, mut rx) = broadcast::channel(100);
        let mut manager = LiveReloadManager::new(
            dir.path().to_path_buf(),
            vec!["**/*".to_string()],
            50,
            tx,
        );
        manager.start().unwrap();

        // Give the watcher a moment to register before writing
        tokio::time::sleep(Duration::from_millis(100)).await;
        std::fs::write(&file, "<html><body>changed</body></html>").unwrap();

        let event = tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .expect("no reload event within one second")
            .expect("broadcast channel closed");

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "reload");
        assert_eq!(json["path"], "index.html");
    }
}
