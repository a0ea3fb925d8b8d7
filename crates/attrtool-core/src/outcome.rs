//! Migration outcome reporting.
//!
//! One [`MigrationOutcome`] is produced per file traversal and handed back
//! to the external orchestrator, which uses the `handled` flag to decide
//! whether the mutated tree is worth persisting. The outcome also carries
//! the two non-fatal signal channels of the engine: comment-surgery
//! inconsistencies (a tag was matched but its text was not found in the
//! docblock) and declarations skipped because reflection could not resolve
//! them. All types serialize for JSON responses.

use serde::Serialize;
use tracing::warn;

use crate::error::{DeclKind, MigrateError};

/// A matched annotation whose tag text could not be located in the
/// documentation comment.
///
/// This means the matching step and the removal step disagree about the
/// source text; it is reported rather than silently dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationWarning {
    /// Kind of the declaration the annotation was attached to.
    pub kind: DeclKind,
    /// Name of the declaration.
    pub declaration: String,
    /// The tag whose text was expected (without the leading `@`).
    pub tag: String,
}

/// A declaration whose migration was aborted by a reflection failure.
///
/// Only the affected declaration is abandoned; siblings are still visited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedDeclaration {
    /// Kind of the skipped declaration.
    pub kind: DeclKind,
    /// Name of the skipped declaration.
    pub declaration: String,
    /// Human-readable failure reason.
    pub reason: String,
}

/// Result of one file traversal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MigrationOutcome {
    /// True once any annotation in the file has been migrated. Monotonic:
    /// never reset within a run.
    pub handled: bool,
    /// Comment-surgery inconsistencies.
    pub warnings: Vec<MigrationWarning>,
    /// Declarations abandoned due to reflection lookup failures.
    pub skipped: Vec<SkippedDeclaration>,
}

impl MigrationOutcome {
    /// Create an empty outcome.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that at least one annotation was migrated.
    pub fn mark_handled(&mut self) {
        self.handled = true;
    }

    /// Record a comment-surgery inconsistency for a declaration.
    pub fn warn_tag_not_found(
        &mut self,
        kind: DeclKind,
        declaration: impl Into<String>,
        tag: impl Into<String>,
    ) {
        let declaration = declaration.into();
        let tag = tag.into();
        warn!(
            kind = kind.as_str(),
            declaration = declaration.as_str(),
            tag = tag.as_str(),
            "annotation tag not found in documentation comment"
        );
        self.warnings.push(MigrationWarning {
            kind,
            declaration,
            tag,
        });
    }

    /// Record a declaration abandoned because of a reflection failure.
    pub fn skip_declaration(
        &mut self,
        kind: DeclKind,
        declaration: impl Into<String>,
        error: &MigrateError,
    ) {
        self.skipped.push(SkippedDeclaration {
            kind,
            declaration: declaration.into(),
            reason: error.to_string(),
        });
    }

    /// True when the run produced neither warnings nor skipped declarations.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty() && self.skipped.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod handled_flag {
        use super::*;

        #[test]
        fn starts_false() {
            assert!(!MigrationOutcome::new().handled);
        }

        #[test]
        fn mark_handled_is_monotonic() {
            let mut outcome = MigrationOutcome::new();
            outcome.mark_handled();
            outcome.mark_handled();
            assert!(outcome.handled);
        }
    }

    mod reporting {
        use super::*;

        #[test]
        fn warning_is_recorded() {
            let mut outcome = MigrationOutcome::new();
            outcome.warn_tag_not_found(DeclKind::Property, "bar", "Inject");
            assert_eq!(outcome.warnings.len(), 1);
            assert_eq!(outcome.warnings[0].tag, "Inject");
            assert!(!outcome.is_clean());
        }

        #[test]
        fn skip_is_recorded_with_reason() {
            let mut outcome = MigrationOutcome::new();
            let err = MigrateError::class_not_found("App\\Gone");
            outcome.skip_declaration(DeclKind::Class, "App\\Gone", &err);
            assert_eq!(outcome.skipped.len(), 1);
            assert_eq!(
                outcome.skipped[0].reason,
                "class not found in reflection provider: App\\Gone"
            );
        }
    }

    mod serialization {
        use super::*;

        #[test]
        fn outcome_json_shape() {
            let mut outcome = MigrationOutcome::new();
            outcome.mark_handled();
            outcome.warn_tag_not_found(DeclKind::Method, "send", "Cacheable");
            let json = serde_json::to_value(&outcome).unwrap();
            assert_eq!(json["handled"], true);
            assert_eq!(json["warnings"][0]["kind"], "method");
            assert_eq!(json["warnings"][0]["declaration"], "send");
            assert_eq!(json["warnings"][0]["tag"], "Cacheable");
            assert_eq!(json["skipped"], serde_json::json!([]));
        }
    }
}
