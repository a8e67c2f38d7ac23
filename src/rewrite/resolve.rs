//! Filesystem resolution of glob patterns against search bases.

use glob::{MatchOptions, Pattern};

/// Matching options for exclusion patterns: `*` stays within one path
/// segment (`**` still crosses), mirroring the expansion semantics.
pub(crate) const SEGMENT_MATCH: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::error::{GlobImportError, GlobImportResult};
use crate::types::is_stylesheet;

/// The non-wildcard prefix of a pattern: everything before the first `*`.
pub fn static_prefix(pattern: &str) -> &str {
    &pattern[..pattern.find('*').unwrap_or(pattern.len())]
}

/// Whether the final path segment of the pattern contains a wildcard.
///
/// `files/*` has a dynamic trail; `files/*/foo.scss` does not, and its
/// expansion gets namespace aliases to keep same-named files apart.
pub fn has_dynamic_trail(pattern: &str) -> bool {
    normalize_slashes(pattern)
        .rsplit('/')
        .next()
        .is_some_and(|segment| segment.contains('*'))
}

/// Replace backslashes with forward slashes. Patterns and generated import
/// targets always use `/`, whatever the platform separator is.
pub fn normalize_slashes(path: &str) -> String {
    path.replace('\\', "/")
}

/// Expand `pattern` against each search base in order, stopping at the
/// first base that yields at least one match. Returns the winning base and
/// its matches, sorted for reproducible output.
///
/// A pattern whose non-wildcard directory prefix is absent from disk gets a
/// non-fatal warning and still resolves (to whatever the glob returns).
pub fn resolve(bases: &[&Path], pattern: &str) -> GlobImportResult<(PathBuf, Vec<PathBuf>)> {
    let options = MatchOptions {
        case_sensitive: true,
        require_literal_separator: false,
        require_literal_leading_dot: false,
    };
    let normalized = normalize_slashes(pattern);

    let mut base_path = PathBuf::new();
    let mut files = Vec::new();
    for base in bases {
        base_path = base.to_path_buf();
        let full = format!("{}/{}", normalize_slashes(&base.to_string_lossy()), normalized);

        let mut matched = Vec::new();
        let entries =
            glob::glob_with(&full, options).map_err(|source| GlobImportError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })?;
        for entry in entries {
            matched.push(entry.map_err(|source| GlobImportError::GlobExpansion {
                pattern: pattern.to_string(),
                source,
            })?);
        }
        matched.sort_by_cached_key(|path| sort_key(path));

        let prefix = static_prefix(&normalized);
        if !prefix.is_empty() && !base.join(prefix).exists() {
            warn!("directory does not exist for glob pattern \"{pattern}\"");
        }

        if !matched.is_empty() {
            files = matched;
            break;
        }
    }
    Ok((base_path, files))
}

/// Ordering key: case-insensitive primary weight with a codepoint tiebreak.
/// A stable, platform-independent stand-in for an English-locale compare,
/// so repeated runs emit byte-identical statement order.
///
/// Known divergence from en collation: punctuation keeps its codepoint
/// weight here, so `_b.scss` sorts before `a.scss` while en collation
/// would give `_` secondary weight and order it after.
fn sort_key(path: &Path) -> (String, String) {
    let s = normalize_slashes(&path.to_string_lossy());
    (s.to_lowercase(), s)
}

/// Filter resolved entries down to stylesheet files and compute their
/// base-relative import targets, dropping anything the exclusion list hits.
///
/// Exclusion patterns are matched against the project-root-relative path
/// when a root is known, and against the base-relative path otherwise.
pub fn surviving_targets(
    base: &Path,
    files: &[PathBuf],
    project_root: Option<&Path>,
    ignore_paths: &[String],
) -> GlobImportResult<Vec<String>> {
    let exclusions = ignore_paths
        .iter()
        .map(|p| {
            Pattern::new(p).map_err(|source| GlobImportError::InvalidPattern {
                pattern: p.clone(),
                source,
            })
        })
        .collect::<GlobImportResult<Vec<_>>>()?;

    let mut targets = Vec::new();
    for file in files {
        let meta = std::fs::metadata(file).map_err(|source| GlobImportError::FileStat {
            path: file.clone(),
            source,
        })?;
        if meta.is_dir() || !is_stylesheet(file) {
            continue;
        }

        let target = relative_to(file, base);
        let exclusion_key = match project_root {
            Some(root) => relative_to(file, root),
            None => target.clone(),
        };
        if exclusions.iter().any(|p| p.matches_with(&exclusion_key, SEGMENT_MATCH)) {
            continue;
        }
        targets.push(target);
    }
    Ok(targets)
}

/// Path of `file` relative to `ancestor`, forward-slashed, no leading slash.
/// Falls back to the file's own path when it is not under `ancestor`.
fn relative_to(file: &Path, ancestor: &Path) -> String {
    let rel = file.strip_prefix(ancestor).unwrap_or(file);
    let s = normalize_slashes(&rel.to_string_lossy());
    s.trim_start_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn static_prefix_stops_at_first_wildcard() {
        assert_eq!(static_prefix("files/*.scss"), "files/");
        assert_eq!(static_prefix("files/*/foo.scss"), "files/");
        assert_eq!(static_prefix("a/b/c*.scss"), "a/b/c");
        assert_eq!(static_prefix("no-wildcard.scss"), "no-wildcard.scss");
    }

    #[test]
    fn dynamic_trail_detection() {
        assert!(has_dynamic_trail("files/*.scss"));
        assert!(has_dynamic_trail("files/**"));
        assert!(!has_dynamic_trail("files/*/foo.scss"));
        assert!(!has_dynamic_trail("*/foo.scss"));
    }

    #[test]
    fn resolution_is_sorted_and_short_circuits() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first");
        let second = dir.path().join("second");
        fs::create_dir_all(first.join("files")).unwrap();
        fs::create_dir_all(second.join("files")).unwrap();
        fs::write(first.join("files/_b.scss"), "").unwrap();
        fs::write(first.join("files/_a.scss"), "").unwrap();
        fs::write(second.join("files/_z.scss"), "").unwrap();

        let bases = [first.as_path(), second.as_path()];
        let (base, files) = resolve(&bases, "files/*.scss").unwrap();

        // First base wins; the second is never consulted
        assert_eq!(base, first);
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["_a.scss", "_b.scss"]);
    }

    #[test]
    fn falls_through_to_next_base() {
        let dir = tempfile::tempdir().unwrap();
        let empty = dir.path().join("empty");
        let full = dir.path().join("full");
        fs::create_dir_all(&empty).unwrap();
        fs::create_dir_all(full.join("files")).unwrap();
        fs::write(full.join("files/_a.scss"), "").unwrap();

        let bases = [empty.as_path(), full.as_path()];
        let (base, files) = resolve(&bases, "files/*.scss").unwrap();
        assert_eq!(base, full);
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn filtering_drops_directories_and_foreign_extensions() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("files/nested.scss")).unwrap();
        fs::write(dir.path().join("files/_a.scss"), "").unwrap();
        fs::write(dir.path().join("files/readme.txt"), "").unwrap();

        let (base, files) = resolve(&[dir.path()], "files/*").unwrap();
        let targets = surviving_targets(&base, &files, None, &[]).unwrap();
        assert_eq!(targets, vec!["files/_a.scss"]);
    }

    #[test]
    fn exclusion_matches_base_relative_without_root() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("files")).unwrap();
        fs::write(dir.path().join("files/_a.scss"), "").unwrap();
        fs::write(dir.path().join("files/_b.scss"), "").unwrap();

        let (base, files) = resolve(&[dir.path()], "files/*.scss").unwrap();
        let ignore = vec!["files/_b.scss".to_string()];
        let targets = surviving_targets(&base, &files, None, &ignore).unwrap();
        assert_eq!(targets, vec!["files/_a.scss"]);
    }

    #[test]
    fn exclusion_matches_root_relative_when_root_known() {
        let root = tempfile::tempdir().unwrap();
        let base = root.path().join("src");
        fs::create_dir_all(base.join("files")).unwrap();
        fs::write(base.join("files/_a.scss"), "").unwrap();

        let (base, files) = resolve(&[base.as_path()], "files/*.scss").unwrap();
        let ignore = vec!["src/files/*.scss".to_string()];
        let targets = surviving_targets(&base, &files, Some(root.path()), &ignore).unwrap();
        assert!(targets.is_empty());
    }
}
