//! Thin glue between a host build pipeline and the rewriter.
//!
//! Mirrors the two hooks a host is expected to call: configuration
//! resolution once at startup, then the per-file transform.

use std::path::Path;
use std::sync::Arc;

use crate::config::Settings;
use crate::error::GlobImportResult;
use crate::host::BuildHost;
use crate::invalidate::InvalidationTracker;
use crate::rewrite;
use crate::types::TransformOutput;

/// The glob-import preprocessor, packaged as a build-pipeline plugin.
pub struct SassGlobImport {
    settings: Settings,
    tracker: Option<Arc<InvalidationTracker>>,
}

impl SassGlobImport {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            tracker: None,
        }
    }

    /// The configuration-resolution hook: records the host's project root
    /// and, when `auto_invalidation` is enabled and the host watches,
    /// activates the invalidation tracker for this session.
    pub fn configure(&mut self, host: Arc<dyn BuildHost>, project_root: &Path) {
        self.settings.project_root = Some(project_root.to_path_buf());
        if self.settings.auto_invalidation {
            self.tracker = InvalidationTracker::new(host, project_root);
        }
    }

    /// The tracker for this session, if auto-invalidation is active.
    /// The host's event subscription forwards change events to it.
    pub fn tracker(&self) -> Option<Arc<InvalidationTracker>> {
        self.tracker.clone()
    }

    /// The per-file transform hook. `id` is the importing file's path; its
    /// directory is the search base and its extension picks the dialect.
    /// The source map slot is always empty.
    pub fn transform(&self, src: &str, id: &Path) -> GlobImportResult<TransformOutput> {
        let code =
            rewrite::rewrite_with_tracker(src, id, &self.settings, self.tracker.as_deref())?;
        Ok(TransformOutput { code, map: None })
    }
}
