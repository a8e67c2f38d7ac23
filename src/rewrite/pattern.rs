//! Detection of glob `@import`/`@use` statements in stylesheet source text.

use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

/// Matches one whole source line holding a glob import statement:
/// optional leading indentation/comment, the `@import` or `@use` keyword,
/// a quoted path containing at least one `*`, an optional `;`, and an
/// optional trailing same-line comment. Statements without a `*` in the
/// quoted path never match and pass through untouched.
static IMPORT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?m)^([ \t]*(?:/\*.*)?)@(import|use)\s+["']([^"']+\*[^"']*(?:\.scss|\.sass)?)["'];?([ \t]*(?:/[/*].*)?)$"#,
    )
    .expect("glob import regex is valid")
});

/// A located occurrence of a glob import in source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportMatch {
    /// Byte span of the whole matched statement, for in-place replacement.
    pub span: Range<usize>,
    /// Leading indentation and/or `/*` comment, verbatim. Empty when absent.
    pub leading: String,
    pub kind: ImportKind,
    /// The quoted path pattern; guaranteed to contain a `*`.
    pub pattern: String,
    /// Trailing same-line comment, verbatim. Empty when absent.
    pub trailing: String,
}

/// Which statement keyword the match used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportKind {
    Import,
    Use,
}

impl ImportKind {
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Import => "import",
            Self::Use => "use",
        }
    }
}

/// Find the first glob import statement in `src`, if any.
pub fn find_first(src: &str) -> Option<ImportMatch> {
    let caps = IMPORT_REGEX.captures(src)?;
    let whole = caps.get(0)?;
    let kind = match &caps[2] {
        "use" => ImportKind::Use,
        _ => ImportKind::Import,
    };
    Some(ImportMatch {
        span: whole.range(),
        leading: caps[1].to_string(),
        kind,
        pattern: caps[3].to_string(),
        trailing: caps[4].to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_import_with_wildcard() {
        let m = find_first("body {}\n@import \"files/*.scss\";\n").unwrap();
        assert_eq!(m.kind, ImportKind::Import);
        assert_eq!(m.pattern, "files/*.scss");
        assert_eq!(m.leading, "");
        assert_eq!(m.trailing, "");
    }

    #[test]
    fn matches_use_with_single_quotes() {
        let m = find_first("@use 'files/*/foo.scss';").unwrap();
        assert_eq!(m.kind, ImportKind::Use);
        assert_eq!(m.pattern, "files/*/foo.scss");
    }

    #[test]
    fn ignores_statements_without_wildcard() {
        assert!(find_first("@import \"files/_file-a.scss\";").is_none());
        assert!(find_first("@use \"sass:math\";").is_none());
    }

    #[test]
    fn captures_surrounding_comments() {
        let src = "/* blocks */@import \"blocks/*.scss\"; // generated";
        let m = find_first(src).unwrap();
        assert_eq!(m.leading, "/* blocks */");
        assert_eq!(m.trailing, " // generated");
        assert_eq!(&src[m.span.clone()], src);
    }

    #[test]
    fn span_excludes_surrounding_lines() {
        let src = "a {}\n@import \"x/*.scss\";\nb {}\n";
        let m = find_first(src).unwrap();
        assert_eq!(&src[m.span.clone()], "@import \"x/*.scss\";");
    }

    #[test]
    fn statement_without_terminator_matches() {
        let m = find_first("@import \"files/*.scss\"").unwrap();
        assert_eq!(m.pattern, "files/*.scss");
    }
}
