//! Event debouncing for live reload.
//!
//! Editors rarely produce a single clean event per save: atomic writes show
//! up as create+rename pairs, and some emit several modifications in a row.
//! The debouncer coalesces raw filesystem events into at most one pending
//! event per path, so each save triggers a single browser reload.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Kind of filesystem event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum FsEventKind {
    Created,
    Modified,
    Removed,
}

/// A debounced filesystem event.
#[derive(Clone, Debug)]
pub(crate) struct FsEvent {
    pub path: PathBuf,
    pub kind: FsEventKind,
}

/// Pending event waiting to be emitted.
struct PendingEvent {
    kind: FsEventKind,
    deadline: Instant,
}

/// Thread-safe event debouncer.
///
/// Each recorded event resets the path's deadline; an event is emitted only
/// once its path has been quiet for the full debounce window.
pub(crate) struct EventDebouncer {
    pending: Mutex<HashMap<PathBuf, PendingEvent>>,
    debounce_window: Duration,
}

impl EventDebouncer {
    /// Create a new debouncer with the given debounce window.
    pub fn new(debounce_window: Duration) -> Self {
        Self {
            pending: Mutex::new(HashMap::new()),
            debounce_window,
        }
    }

    /// Record a raw filesystem event.
    ///
    /// Thread-safe, can be called from the notify callback.
    pub fn record(&self, path: PathBuf, kind: FsEventKind) {
        use std::collections::hash_map::Entry;

        let mut pending = self.pending.lock().unwrap();
        let deadline = Instant::now() + self.debounce_window;

        match pending.entry(path) {
            Entry::Vacant(entry) => {
                entry.insert(PendingEvent { kind, deadline });
            }
            Entry::Occupied(mut entry) => {
                if let Some(kind) = Self::coalesce(entry.get().kind, kind) {
                    entry.get_mut().kind = kind;
                    entry.get_mut().deadline = deadline;
                } else {
                    // Created followed by Removed within the window: the
                    // file never existed as far as clients are concerned
                    entry.remove();
                }
            }
        }
    }

    /// Coalesce a pending event kind with a newly observed one.
    ///
    /// Returns `None` when both events cancel out.
    #[allow(clippy::match_same_arms)]
    fn coalesce(existing: FsEventKind, new: FsEventKind) -> Option<FsEventKind> {
        use FsEventKind::{Created, Modified, Removed};

        match (existing, new) {
            (Created, Created) => Some(Created),
            (Created, Modified) => Some(Created), // Content arrives with the create
            (Created, Removed) => None,

            (Modified, Created) => Some(Created), // File was recreated
            (Modified, Modified) => Some(Modified),
            (Modified, Removed) => Some(Removed),

            (Removed, Created) => Some(Modified), // Atomic replace (write temp + rename)
            (Removed, Modified) => Some(Removed), // Stale event for a gone file
            (Removed, Removed) => Some(Removed),
        }
    }

    /// Drain events whose debounce deadline has passed.
    ///
    /// Thread-safe, called from the async drain task.
    pub fn drain_ready(&self) -> Vec<FsEvent> {
        let mut pending = self.pending.lock().unwrap();
        let now = Instant::now();

        let mut ready = Vec::new();
        pending.retain(|path, event| {
            if event.deadline <= now {
                ready.push(FsEvent {
                    path: path.clone(),
                    kind: event.kind,
                });
                false
            } else {
                true
            }
        });

        ready
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_event_emitted_only_after_deadline() {
        let debouncer = EventDebouncer::new(Duration::from_millis(10));
        let path = PathBuf::from("/site/index.html");

        debouncer.record(path.clone(), FsEventKind::Modified);

        assert!(debouncer.drain_ready().is_empty());

        thread::sleep(Duration::from_millis(15));

        let events = debouncer.drain_ready();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].path, path);
        assert_eq!(events[0].kind, FsEventKind::Modified);

        // Drained events are gone
        assert!(debouncer.drain_ready().is_empty());
    }

    #[test]
    fn test_editor_save_burst_coalesces_to_one_event() {
        let debouncer = EventDebouncer::new(Duration::from_millis(10));
        let path = PathBuf::from("/site/index.html");

        debouncer.record(path.clone(), FsEventKind::Modified);
        debouncer.record(path.clone(), FsEventKind::Modified);
        debouncer.record(path, FsEventKind::Modified);

        thread::sleep(Duration::from_millis(15));

        let events = debouncer.drain_ready();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, FsEventKind::Modified);
    }

    #[test]
    fn test_created_then_removed_discards_both() {
        let debouncer = EventDebouncer::new(Duration::from_millis(10));
        let path = PathBuf::from("/site/tmp.html");

        debouncer.record(path.clone(), FsEventKind::Created);
        debouncer.record(path, FsEventKind::Removed);

        thread::sleep(Duration::from_millis(15));

        assert!(debouncer.drain_ready().is_empty());
    }

    #[test]
    fn test_atomic_replace_becomes_modified() {
        let debouncer = EventDebouncer::new(Duration::from_millis(10));
        let path = PathBuf::from("/site/index.html");

        debouncer.record(path.clone(), FsEventKind::Removed);
        debouncer.record(path, FsEventKind::Created);

        thread::sleep(Duration::from_millis(15));

        let events = debouncer.drain_ready();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, FsEventKind::Modified);
    }

    #[test]
    fn test_multiple_paths_are_independent() {
        let debouncer = EventDebouncer::new(Duration::from_millis(10));

        debouncer.record(PathBuf::from("/site/a.html"), FsEventKind::Modified);
        debouncer.record(PathBuf::from("/site/b.css"), FsEventKind::Created);

        thread::sleep(Duration::from_millis(15));

        assert_eq!(debouncer.drain_ready().len(), 2);
    }

    #[test]
    fn test_coalesce_matrix() {
        use FsEventKind::{Created, Modified, Removed};

        assert_eq!(EventDebouncer::coalesce(Created, Created), Some(Created));
        assert_eq!(EventDebouncer::coalesce(Created, Modified), Some(Created));
        assert_eq!(EventDebouncer::coalesce(Created, Removed), None);

        assert_eq!(EventDebouncer::coalesce(Modified, Created), Some(Created));
        assert_eq!(EventDebouncer::coalesce(Modified, Modified), Some(Modified));
        assert_eq!(EventDebouncer::coalesce(Modified, Removed), Some(Removed));

        assert_eq!(EventDebouncer::coalesce(Removed, Created), Some(Modified));
        assert_eq!(EventDebouncer::coalesce(Removed, Modified), Some(Removed));
        assert_eq!(EventDebouncer::coalesce(Removed, Removed), Some(Removed));
    }
}
