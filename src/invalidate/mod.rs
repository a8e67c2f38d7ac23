//! The Invalidation Tracker: keeps expanded glob imports in sync with the
//! filesystem during a watch session.
//!
//! The tracker owns a session-wide registry mapping each normalized glob
//! pattern to the set of source files whose imports referenced it. The
//! transform entry point registers patterns as it finds them; the
//! filesystem event side asks which previously processed files a changed
//! path makes stale, marks their modules invalidated through the host, and
//! requests reloads fire-and-forget.

pub mod fs_events;

pub use fs_events::{FsEventFeed, WatchHandle};

use glob::Pattern;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;
use tracing::{debug, warn};

use crate::host::BuildHost;
use crate::rewrite::resolve::{SEGMENT_MATCH, normalize_slashes, static_prefix};
use crate::types::is_stylesheet;

struct RegistryEntry {
    /// Compiled matcher for the normalized pattern.
    matcher: Pattern,
    /// Source files containing an import that referenced this glob.
    /// Grows for the lifetime of the session; never pruned.
    importers: HashSet<PathBuf>,
}

/// Session-wide glob registry plus the host handle needed to act on it.
///
/// Explicitly lifetimed rather than global: the watch-session controller
/// owns it and passes it by reference into both the transform entry point
/// and the event-reaction handler, so independent sessions stay independent
/// and teardown is just a drop.
pub struct InvalidationTracker {
    host: Arc<dyn BuildHost>,
    project_root: PathBuf,
    registry: RwLock<HashMap<String, RegistryEntry>>,
}

impl InvalidationTracker {
    /// Create a tracker for one watch session.
    ///
    /// Returns `None` when the host has no active watcher: the feature
    /// disables itself with a diagnostic and processing continues without it.
    pub fn new(host: Arc<dyn BuildHost>, project_root: &Path) -> Option<Arc<Self>> {
        if !host.watching() {
            warn!("auto-invalidation requires active file watching");
            return None;
        }
        Some(Arc::new(Self {
            host,
            project_root: project_root.to_path_buf(),
            registry: RwLock::new(HashMap::new()),
        }))
    }

    /// Record that `importer` references `pattern`, resolved against `base`.
    ///
    /// The first registration of a pattern also registers its non-wildcard
    /// directory prefix with the host's watcher so future changes under
    /// that directory become observable.
    pub fn register(&self, pattern: &str, base: &Path, importer: &Path) {
        let key = self.normalize(pattern, base);
        let mut registry = self.registry.write();
        if let Some(entry) = registry.get_mut(&key) {
            entry.importers.insert(importer.to_path_buf());
            return;
        }

        let matcher = match Pattern::new(&key) {
            Ok(matcher) => matcher,
            Err(e) => {
                warn!("cannot track glob pattern \"{key}\": {e}");
                return;
            }
        };
        let watch_dir = watch_dir(pattern, base);
        if let Err(e) = self.host.watch_directory(&watch_dir) {
            warn!("cannot watch '{}' for glob imports: {e}", watch_dir.display());
        }
        debug!("tracking glob \"{key}\" (watching {})", watch_dir.display());

        let mut importers = HashSet::new();
        importers.insert(importer.to_path_buf());
        registry.insert(key, RegistryEntry { matcher, importers });
    }

    /// React to a filesystem change event.
    ///
    /// Non-stylesheet paths are ignored. For a relevant path, every source
    /// file whose registered glob matches it gets its module invalidated
    /// with the current timestamp, then reloads are dispatched concurrently
    /// without waiting on each other; duplicate or failed reloads are the
    /// host's problem, not tracked here.
    pub fn handle_change(&self, changed: &Path) {
        if !is_stylesheet(changed) {
            return;
        }
        let relative = normalize_slashes(
            &changed
                .strip_prefix(&self.project_root)
                .unwrap_or(changed)
                .to_string_lossy(),
        );

        let stale: HashSet<PathBuf> = {
            let registry = self.registry.read();
            registry
                .values()
                .filter(|entry| entry.matcher.matches_with(&relative, SEGMENT_MATCH))
                .flat_map(|entry| entry.importers.iter().cloned())
                .collect()
        };
        if stale.is_empty() {
            return;
        }
        debug!("\"{relative}\" invalidates {} importer(s)", stale.len());

        let timestamp = SystemTime::now();
        for importer in stale {
            let Some(module) = self.host.module_for_path(&importer) else {
                continue;
            };
            self.host.invalidate(module, timestamp);
            let host = Arc::clone(&self.host);
            // Hosts without their own runtime forward events synchronously;
            // reloads are best-effort either way, so dispatch inline there.
            match tokio::runtime::Handle::try_current() {
                Ok(runtime) => {
                    runtime.spawn(async move {
                        host.request_reload(module);
                    });
                }
                Err(_) => host.request_reload(module),
            }
        }
    }

    /// Number of distinct patterns currently registered.
    pub fn pattern_count(&self) -> usize {
        self.registry.read().len()
    }

    /// Normalize a pattern to a project-root-relative key. `.` and `..`
    /// components are resolved lexically first, so a parent-relative pattern
    /// produces the same key a root-relative changed path does. Patterns
    /// resolved from bases outside the root keep their full path as the key.
    fn normalize(&self, pattern: &str, base: &Path) -> String {
        let joined = resolve_dots(&base.join(normalize_slashes(pattern)));
        let relative = joined.strip_prefix(&self.project_root).unwrap_or(&joined);
        normalize_slashes(&relative.to_string_lossy())
            .trim_start_matches('/')
            .to_string()
    }
}

/// Lexically resolve `.` and `..` components without touching the
/// filesystem. A `..` that would climb past the start of the path is kept.
fn resolve_dots(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(Component::ParentDir);
                }
            }
            other => out.push(other),
        }
    }
    out
}

/// Directory to watch for a pattern: the directory component of its
/// non-wildcard prefix, resolved against the search base.
fn watch_dir(pattern: &str, base: &Path) -> PathBuf {
    let prefix = static_prefix(&normalize_slashes(pattern)).to_string();
    match prefix.rfind('/') {
        Some(end) => resolve_dots(&base.join(&prefix[..end])),
        None => base.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn watch_dir_is_static_directory_prefix() {
        let base = Path::new("/proj/src");
        assert_eq!(watch_dir("files/*.scss", base), Path::new("/proj/src/files"));
        assert_eq!(
            watch_dir("files/blocks/*/foo.scss", base),
            Path::new("/proj/src/files/blocks")
        );
        // Wildcard in the first segment falls back to the base itself
        assert_eq!(watch_dir("*.scss", base), Path::new("/proj/src"));
        // Parent-relative prefixes resolve lexically
        assert_eq!(
            watch_dir("../shared/*.scss", base),
            Path::new("/proj/shared")
        );
    }

    #[test]
    fn dot_components_resolve_lexically() {
        assert_eq!(
            resolve_dots(Path::new("/proj/src/../shared/*.scss")),
            Path::new("/proj/shared/*.scss")
        );
        assert_eq!(
            resolve_dots(Path::new("/proj/./files/*.scss")),
            Path::new("/proj/files/*.scss")
        );
        // A `..` with nothing left to pop is kept
        assert_eq!(resolve_dots(Path::new("../files")), Path::new("../files"));
    }
}
