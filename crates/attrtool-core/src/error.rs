//! Error types for the annotation migration engine.
//!
//! A reflection lookup failure aborts migration for the affected declaration
//! only; the traversal continues with its siblings. The visitor records the
//! failure in the [`MigrationOutcome`](crate::outcome::MigrationOutcome)
//! rather than unwinding, so a single unresolvable class never poisons the
//! rest of the file.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// The kind of declaration an error or warning refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclKind {
    /// A class declaration.
    Class,
    /// A method declaration.
    Method,
    /// A property declaration.
    Property,
}

impl DeclKind {
    /// Returns the string representation used in output.
    pub fn as_str(&self) -> &'static str {
        match self {
            DeclKind::Class => "class",
            DeclKind::Method => "method",
            DeclKind::Property => "property",
        }
    }
}

impl fmt::Display for DeclKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error type for migration failures.
///
/// Every variant is scoped to one declaration. There are no retryable
/// failures: all operations are deterministic transformations over in-memory
/// structures, so any error is a logic or input error.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MigrateError {
    /// A class could not be resolved through the reflection provider.
    #[error("class not found in reflection provider: {class}")]
    ClassNotFound { class: String },

    /// A member named by the syntax tree is missing from the reflected class.
    #[error("{kind} '{member}' not found on reflected class {class}")]
    MemberNotFound {
        class: String,
        kind: DeclKind,
        member: String,
    },
}

impl MigrateError {
    /// Create a class-not-found error.
    pub fn class_not_found(class: impl Into<String>) -> Self {
        MigrateError::ClassNotFound {
            class: class.into(),
        }
    }

    /// Create a member-not-found error.
    pub fn member_not_found(
        class: impl Into<String>,
        kind: DeclKind,
        member: impl Into<String>,
    ) -> Self {
        MigrateError::MemberNotFound {
            class: class.into(),
            kind,
            member: member.into(),
        }
    }
}
