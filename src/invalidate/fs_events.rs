//! Notify-backed filesystem event feed for standalone watch sessions.
//!
//! Hosts with their own watching subsystem call
//! [`InvalidationTracker::handle_change`] directly from their event
//! subscription. This feed exists for sessions without one: it bridges
//! notify's sync callback into an async channel, debounces bursts, filters
//! to stylesheet paths, and forwards each surviving path to the tracker.

use notify::{Event, EventKind, RecursiveMode, Watcher};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tokio::time::{Duration, sleep};
use tracing::{debug, warn};

use super::InvalidationTracker;
use crate::error::{GlobImportError, GlobImportResult};
use crate::types::is_stylesheet;

/// Cloneable handle for registering directories with the feed's watcher.
///
/// A host wrapper can hold one of these and delegate its `watch_directory`
/// to it while the feed's event loop runs elsewhere.
#[derive(Clone)]
pub struct WatchHandle {
    watcher: Arc<Mutex<notify::RecommendedWatcher>>,
}

impl WatchHandle {
    /// Register a directory (recursively) with the underlying watcher.
    pub fn watch_directory(&self, dir: &Path) -> GlobImportResult<()> {
        self.watcher
            .lock()
            .watch(dir, RecursiveMode::Recursive)
            .map_err(|e| GlobImportError::WatchFailed {
                path: dir.to_path_buf(),
                reason: e.to_string(),
            })
    }
}

/// Feeds debounced filesystem change events into an [`InvalidationTracker`].
pub struct FsEventFeed {
    tracker: Arc<InvalidationTracker>,
    debounce_ms: u64,
    event_rx: mpsc::Receiver<notify::Result<Event>>,
    handle: WatchHandle,
}

impl FsEventFeed {
    pub fn new(tracker: Arc<InvalidationTracker>, debounce_ms: u64) -> GlobImportResult<Self> {
        let (tx, rx) = mpsc::channel(100);
        // The notify callback is sync; blocking_send bridges into the
        // async channel.
        let watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            let _ = tx.blocking_send(res);
        })
        .map_err(|e| GlobImportError::WatcherInit {
            reason: e.to_string(),
        })?;

        Ok(Self {
            tracker,
            debounce_ms,
            event_rx: rx,
            handle: WatchHandle {
                watcher: Arc::new(Mutex::new(watcher)),
            },
        })
    }

    /// Handle for registering watch directories, safe to clone into a host.
    pub fn handle(&self) -> WatchHandle {
        self.handle.clone()
    }

    /// Run the event loop until the event channel closes.
    pub async fn run(mut self) {
        let debounce = Duration::from_millis(self.debounce_ms);
        let mut pending: HashMap<PathBuf, Instant> = HashMap::new();

        loop {
            let timeout = sleep(Duration::from_millis(100));
            tokio::pin!(timeout);

            tokio::select! {
                maybe_event = self.event_rx.recv() => {
                    match maybe_event {
                        Some(Ok(event)) => {
                            if matches!(
                                event.kind,
                                EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
                            ) {
                                for path in event.paths {
                                    if is_stylesheet(&path) {
                                        pending.insert(path, Instant::now());
                                    }
                                }
                            }
                        }
                        Some(Err(e)) => warn!("file watch error: {e}"),
                        None => break,
                    }
                }

                _ = &mut timeout => {
                    let now = Instant::now();
                    let mut ready = Vec::new();
                    pending.retain(|path, last_change| {
                        if now.duration_since(*last_change) >= debounce {
                            ready.push(path.clone());
                            false
                        } else {
                            true
                        }
                    });
                    for path in ready {
                        debug!("stylesheet changed: {}", path.display());
                        self.tracker.handle_change(&path);
                    }
                }
            }
        }
    }
}
