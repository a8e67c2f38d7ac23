//! Trait boundary to the host build pipeline.
//!
//! The preprocessor does not own a dev server, a module graph, or a file
//! watcher; those belong to whatever build tool embeds it. Everything the
//! invalidation tracker needs from that host is expressed here, so the
//! tracker stays testable against a mock and indifferent to which pipeline
//! is driving it.

use crate::error::GlobImportResult;
use crate::types::ModuleId;
use std::path::Path;
use std::time::SystemTime;

/// The watch-session surface the host exposes to the invalidation tracker.
pub trait BuildHost: Send + Sync {
    /// Whether the host is running with an active file watcher.
    /// Auto-invalidation disables itself when this is false.
    fn watching(&self) -> bool;

    /// Register a directory with the host's filesystem watcher so changes
    /// under it become observable.
    fn watch_directory(&self, dir: &Path) -> GlobImportResult<()>;

    /// Look up the module node for a source file, if the host's dependency
    /// graph has one.
    fn module_for_path(&self, path: &Path) -> Option<ModuleId>;

    /// Mark a module stale as of `timestamp`. Cascading to dependents is the
    /// host's own invalidation semantics, not this crate's.
    fn invalidate(&self, module: ModuleId, timestamp: SystemTime);

    /// Ask the host to reload a module. Best-effort: failures are the host's
    /// responsibility to surface, and the tracker never retries.
    fn request_reload(&self, module: ModuleId);
}
