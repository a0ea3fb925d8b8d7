//! Line-oriented docblock surgery.
//!
//! The migration engine must remove exactly the tag line that was converted
//! into an attribute and leave every other line of the documentation comment
//! byte-identical, in its original order. The source format is unstructured
//! prose, so this stays plain text processing: pure functions from
//! `(comment, tag)` to a new comment, independent of any tree mutation.
//!
//! # Matching Rules
//!
//! A tag line is recognized by stripping leading comment decoration
//! (whitespace, `*`, `/`) and testing whether the remainder starts with one
//! of two literal candidate forms: `@Name` and its complement with or
//! without a leading namespace separator (`@\Name`). Only the first matching
//! line is removed per call; continuation lines of a multi-line tag are
//! deliberately left behind.
//!
//! After all removals for a declaration, a comment whose remaining lines are
//! nothing but decoration collapses to nothing rather than surviving as a
//! hollow `/** */` block.

use std::sync::LazyLock;

use regex::Regex;

/// `@var TYPE` extraction pattern, shared across calls.
static VAR_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@var\s+(\S+)").expect("static pattern compiles"));

/// Result of a single tag-line removal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StripOutcome {
    /// The surviving comment text. `None` when the comment collapsed to a
    /// hollow block after the removal.
    pub comment: Option<String>,
    /// Whether a tag line was actually found and removed.
    pub removed: bool,
}

/// Returns true for a character that is docblock decoration rather than
/// content: whitespace, `*`, or `/`.
fn is_decoration(c: char) -> bool {
    c.is_whitespace() || c == '*' || c == '/'
}

/// Returns true when a line consists solely of decoration characters.
fn is_decoration_only(line: &str) -> bool {
    line.chars().all(is_decoration)
}

/// Build the two literal candidate forms for a tag.
///
/// For the resolved name `App\Foo` the candidates are `@App\Foo` and
/// `@\App\Foo`; for `\App\Foo` the same pair in the opposite order. Bare
/// names like `var` produce `@var` plus the (never-matching, but harmless)
/// separator-prefixed complement.
pub fn tag_candidates(name: &str) -> [String; 2] {
    match name.strip_prefix('\\') {
        Some(stripped) => [format!("@{name}"), format!("@{stripped}")],
        None => [format!("@{name}"), format!("@\\{name}")],
    }
}

/// Remove the first line carrying the given tag from a docblock.
///
/// Lines are scanned in order; the first line whose decoration-trimmed form
/// starts with one of the [`tag_candidates`] is excluded from the output.
/// All other lines are retained verbatim, including blank lines and
/// unrelated tags. If the removal leaves only decoration, the comment
/// collapses to `None`.
///
/// `removed` is false when no line matched; the caller is expected to
/// surface that as an inconsistency rather than ignore it.
pub fn strip_tag_line(comment: &str, tag: &str) -> StripOutcome {
    let candidates = tag_candidates(tag);
    let mut removed = false;
    let mut retained: Vec<&str> = Vec::new();

    for line in comment.split('\n') {
        if !removed {
            let content = line.trim_start_matches(is_decoration);
            if candidates.iter().any(|c| content.starts_with(c.as_str())) {
                removed = true;
                continue;
            }
        }
        retained.push(line);
    }

    if removed && retained.iter().all(|line| is_decoration_only(line)) {
        return StripOutcome {
            comment: None,
            removed: true,
        };
    }

    StripOutcome {
        comment: Some(retained.join("\n")),
        removed,
    }
}

/// Returns true when every line of the comment is decoration only.
pub fn is_hollow(comment: &str) -> bool {
    comment.split('\n').all(is_decoration_only)
}

/// Read the type named by a `@var TYPE` tag, if any.
///
/// Returns the raw token following `@var`; interpreting it (array markers,
/// `callable`, qualification) is the caller's concern.
pub fn var_tag_type(doc: &str) -> Option<&str> {
    VAR_TAG
        .captures(doc)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(lines: &[&str]) -> String {
        lines.join("\n")
    }

    mod candidates {
        use super::*;

        #[test]
        fn unqualified_name() {
            assert_eq!(tag_candidates("Foo"), ["@Foo".to_string(), "@\\Foo".to_string()]);
        }

        #[test]
        fn qualified_name() {
            assert_eq!(
                tag_candidates("App\\Annotation\\Foo"),
                [
                    "@App\\Annotation\\Foo".to_string(),
                    "@\\App\\Annotation\\Foo".to_string()
                ]
            );
        }

        #[test]
        fn separator_prefixed_name() {
            assert_eq!(
                tag_candidates("\\App\\Foo"),
                ["@\\App\\Foo".to_string(), "@App\\Foo".to_string()]
            );
        }
    }

    mod strip {
        use super::*;

        #[test]
        fn removes_only_the_matching_line() {
            let comment = doc(&[
                "/**",
                " * Sends mail.",
                " *",
                " * @Cacheable(ttl=60)",
                " * @deprecated use send() instead",
                " */",
            ]);
            let out = strip_tag_line(&comment, "Cacheable");
            assert!(out.removed);
            assert_eq!(
                out.comment.as_deref(),
                Some(
                    doc(&[
                        "/**",
                        " * Sends mail.",
                        " *",
                        " * @deprecated use send() instead",
                        " */",
                    ])
                    .as_str()
                )
            );
        }

        #[test]
        fn retained_lines_are_byte_identical() {
            let comment = doc(&["/**", " *   weird   spacing\t", " * @Foo", " */"]);
            let out = strip_tag_line(&comment, "Foo");
            assert_eq!(
                out.comment.as_deref(),
                Some(doc(&["/**", " *   weird   spacing\t", " */"]).as_str())
            );
        }

        #[test]
        fn matches_separator_prefixed_form() {
            let comment = doc(&["/**", " * @\\App\\Annotation\\Foo", " */"]);
            let out = strip_tag_line(&comment, "App\\Annotation\\Foo");
            assert!(out.removed);
            assert_eq!(out.comment, None);
        }

        #[test]
        fn removes_only_the_first_match() {
            let comment = doc(&["/**", " * @Foo(a=1)", " * @Foo(b=2)", " */"]);
            let out = strip_tag_line(&comment, "Foo");
            assert!(out.removed);
            assert_eq!(
                out.comment.as_deref(),
                Some(doc(&["/**", " * @Foo(b=2)", " */"]).as_str())
            );
        }

        #[test]
        fn continuation_lines_survive() {
            // Known limitation: only the opening line of a multi-line tag
            // is removed.
            let comment = doc(&["/**", " * @Foo(", " *     a=1,", " * )", " */"]);
            let out = strip_tag_line(&comment, "Foo");
            assert!(out.removed);
            assert_eq!(
                out.comment.as_deref(),
                Some(doc(&["/**", " *     a=1,", " * )", " */"]).as_str())
            );
        }

        #[test]
        fn collapses_to_none_when_hollow() {
            let comment = doc(&["/**", " * @Inject", " */"]);
            let out = strip_tag_line(&comment, "Inject");
            assert!(out.removed);
            assert_eq!(out.comment, None);
        }

        #[test]
        fn no_match_reports_not_removed() {
            let comment = doc(&["/**", " * @Bar", " */"]);
            let out = strip_tag_line(&comment, "Foo");
            assert!(!out.removed);
            assert_eq!(out.comment.as_deref(), Some(comment.as_str()));
        }

        #[test]
        fn unrelated_comment_without_removal_keeps_hollow_block() {
            // The hollow-collapse rule only applies after an actual removal.
            let comment = doc(&["/**", " */"]);
            let out = strip_tag_line(&comment, "Foo");
            assert!(!out.removed);
            assert_eq!(out.comment.as_deref(), Some(comment.as_str()));
        }

        #[test]
        fn single_line_docblock() {
            let out = strip_tag_line("/** @Inject */", "Inject");
            assert!(out.removed);
            assert_eq!(out.comment, None);
        }
    }

    mod hollow {
        use super::*;

        #[test]
        fn decoration_only_lines_are_hollow() {
            assert!(is_hollow("/**\n *\n */"));
        }

        #[test]
        fn prose_is_not_hollow() {
            assert!(!is_hollow("/**\n * text\n */"));
        }
    }

    mod var_tag {
        use super::*;

        #[test]
        fn extracts_type_token() {
            assert_eq!(var_tag_type("/** @var Bar */"), Some("Bar"));
        }

        #[test]
        fn extracts_qualified_type() {
            assert_eq!(
                var_tag_type("/**\n * @var \\App\\Entity\\User comment\n */"),
                Some("\\App\\Entity\\User")
            );
        }

        #[test]
        fn extracts_array_marker() {
            assert_eq!(var_tag_type("/** @var Bar[] */"), Some("Bar[]"));
        }

        #[test]
        fn missing_tag_is_none() {
            assert_eq!(var_tag_type("/** plain prose */"), None);
        }
    }
}
