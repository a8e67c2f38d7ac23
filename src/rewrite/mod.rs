//! The Pattern Rewriter: expands glob `@import`/`@use` statements into
//! explicit, deterministically ordered statement blocks.
//!
//! `rewrite` is a pure function of the source text, the importing file's
//! location, the filesystem state, and the configuration. It never writes
//! to disk, and applying it to its own output is a no-op: generated
//! statements contain no wildcard, so a second pass finds nothing.

pub mod pattern;
pub mod resolve;

pub use pattern::{ImportKind, ImportMatch};

use std::path::Path;

use crate::config::Settings;
use crate::error::GlobImportResult;
use crate::invalidate::InvalidationTracker;
use crate::types::Dialect;

/// Rewrite every glob import statement in `src`.
///
/// The importing file's own directory is the only populated search base
/// today; resolution still walks the base list in order and stops at the
/// first base with matches, so more bases can be added without touching
/// the algorithm.
pub fn rewrite(src: &str, importer: &Path, settings: &Settings) -> GlobImportResult<String> {
    rewrite_with_tracker(src, importer, settings, None)
}

/// Like [`rewrite`], but registers every detected glob with the
/// invalidation tracker before resolving it.
pub(crate) fn rewrite_with_tracker(
    src: &str,
    importer: &Path,
    settings: &Settings,
    tracker: Option<&InvalidationTracker>,
) -> GlobImportResult<String> {
    let dialect = Dialect::of_importer(importer);
    let importer_dir = match importer.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let search_bases = [importer_dir];

    let mut out = src.to_string();
    // Rescans are bounded by the line count of the original source so a
    // pathological replacement cannot loop forever; running out of matches
    // is the normal exit.
    let max_passes = src.lines().count().max(1);
    for _ in 0..max_passes {
        let Some(found) = pattern::find_first(&out) else {
            break;
        };
        if let Some(tracker) = tracker {
            tracker.register(&found.pattern, importer_dir, importer);
        }

        let (base, files) = resolve::resolve(&search_bases, &found.pattern)?;
        let targets = resolve::surviving_targets(
            &base,
            &files,
            settings.project_root.as_deref(),
            &settings.ignore_paths,
        )?;

        let replacement = compose(&found, &targets, dialect);
        out.replace_range(found.span.clone(), &replacement);
    }
    Ok(out)
}

/// Compose the replacement block for one matched statement: one line per
/// surviving entry, preserved comments re-attached on their own lines.
/// Zero survivors erase the statement, comments included.
fn compose(found: &ImportMatch, targets: &[String], dialect: Dialect) -> String {
    if targets.is_empty() {
        return String::new();
    }

    let aliased = !resolve::has_dynamic_trail(&found.pattern);
    let mut lines = Vec::with_capacity(targets.len() + 2);
    if !found.leading.is_empty() {
        lines.push(found.leading.clone());
    }
    for (index, target) in targets.iter().enumerate() {
        let keyword = found.kind.keyword();
        let terminator = dialect.terminator();
        if aliased {
            let stem = file_stem(target);
            lines.push(format!("@{keyword} \"{target}\" as {stem}_{index}{terminator}"));
        } else {
            lines.push(format!("@{keyword} \"{target}\"{terminator}"));
        }
    }
    if !found.trailing.is_empty() {
        lines.push(found.trailing.clone());
    }
    lines.join("\n")
}

/// Base name of a forward-slashed target path, extension removed.
fn file_stem(target: &str) -> &str {
    let name = target.rsplit('/').next().unwrap_or(target);
    match name.rfind('.') {
        Some(dot) if dot > 0 => &name[..dot],
        _ => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_stem_strips_extension_only() {
        assert_eq!(file_stem("files/a/foo.scss"), "foo");
        assert_eq!(file_stem("files/_file-a.scss"), "_file-a");
        assert_eq!(file_stem("foo"), "foo");
        // A lone leading dot is part of the name, not an extension marker
        assert_eq!(file_stem("files/.hidden"), ".hidden");
    }

    #[test]
    fn compose_erases_statement_with_zero_survivors() {
        let found = ImportMatch {
            span: 0..0,
            leading: "/* gone */".to_string(),
            kind: ImportKind::Import,
            pattern: "files/*.scss".to_string(),
            trailing: " // gone".to_string(),
        };
        assert_eq!(compose(&found, &[], Dialect::Scss), "");
    }
}
