//! Small shared types used across the rewriter and the invalidation tracker.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Identifier for a module node in the host's dependency graph.
///
/// The host hands these out from its own lookup; this crate never mints one
/// itself outside of tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModuleId(pub u32);

impl ModuleId {
    pub fn new(value: u32) -> Option<Self> {
        if value == 0 { None } else { Some(Self(value)) }
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

/// Which stylesheet dialect the importing file is written in.
///
/// SCSS statements end with `;`; the indented syntax has no terminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Scss,
    Indented,
}

impl Dialect {
    /// Judge the dialect from the importing file's extension.
    /// Anything that is not `.sass` is treated as SCSS.
    pub fn of_importer(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("sass") => Self::Indented,
            _ => Self::Scss,
        }
    }

    pub fn terminator(self) -> &'static str {
        match self {
            Self::Scss => ";",
            Self::Indented => "",
        }
    }
}

/// Whether a path carries one of the two recognized stylesheet extensions
/// (`.scss` or `.sass`, case-insensitive).
pub fn is_stylesheet(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some(ext) if ext.eq_ignore_ascii_case("scss") || ext.eq_ignore_ascii_case("sass")
    )
}

/// What the per-file transform hook hands back to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformOutput {
    pub code: String,
    /// Source map. Always `None`: the rewrite is line-local and the
    /// downstream compiler re-maps anyway.
    pub map: Option<String>,
}
