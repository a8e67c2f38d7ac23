//! Source-to-source preprocessor that expands glob patterns in Sass/SCSS
//! `@import` and `@use` statements into explicit, deterministically ordered
//! import lists before the stylesheet compiler sees them.
//!
//! Sass has no native wildcard imports; this crate resolves them against
//! the filesystem at transform time and, during a watch session, keeps
//! the expansions in sync with filesystem changes through the
//! [`invalidate::InvalidationTracker`].

pub mod config;
pub mod error;
pub mod host;
pub mod invalidate;
pub mod plugin;
pub mod rewrite;
pub mod types;

// Explicit exports for better API clarity
pub use config::Settings;
pub use error::{GlobImportError, GlobImportResult};
pub use host::BuildHost;
pub use invalidate::{FsEventFeed, InvalidationTracker, WatchHandle};
pub use plugin::SassGlobImport;
pub use rewrite::rewrite;
pub use types::{Dialect, ModuleId, TransformOutput};
