//! PHP language support for attrtool.
//!
//! This crate owns the declaration tree data model (the contract between the
//! external parser/printer and the migration engine), the traversal
//! protocol, the reflection and annotation-reader seams, and the two
//! migration visitors:
//!
//! - [`migrate::MigrateVisitor`] — the full annotation-to-attribute rewrite:
//!   allow-list matching, import-aware marker naming, default-omitting
//!   argument synthesis, property type inference with the inheritance
//!   guard, and docblock surgery.
//! - [`inject::InjectOnlyVisitor`] — a restricted best-effort pass that
//!   only rewrites dependency-injection markers on properties.
//!
//! The external orchestrator parses a file, calls [`migrate_file`] or
//! [`migrate_inject_only`], and persists the tree when the returned
//! outcome's `handled` flag is set.

pub mod annotations;
pub mod infer;
pub mod inject;
pub mod migrate;
pub mod nodes;
pub mod reflect;
pub mod visitor;

pub use annotations::{AnnotationField, AnnotationInstance, AnnotationReader, StaticAnnotations};
pub use infer::InferredType;
pub use inject::{migrate_inject_only, InjectOnlyVisitor};
pub use migrate::{migrate_file, MigrateConfig, MigrateVisitor};
pub use nodes::{
    Arg, ArrayItem, Attribute, ClassDecl, Member, MethodDecl, Name, NameKind, NamespaceDecl,
    PropertyDecl, SourceFile, Stmt, UseDecl, UseItem, Value,
};
pub use reflect::{
    ReflectedClass, ReflectedMethod, ReflectedProperty, ReflectionProvider, StaticReflection,
};
pub use visitor::{walk_source_file, VisitResult, Visitor};
