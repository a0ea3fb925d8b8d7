//! The restricted inject-only migration pass.
//!
//! A narrower, best-effort variant of the full visitor for codebases where
//! only dependency-injection markers need migrating: property declarations
//! only, one target annotation kind, no argument synthesis, no import-table
//! lookups, no inheritance guard. A property whose type cannot be resolved
//! is skipped without any mutation; a resolved one gets a bare marker, an
//! explicit type, and its docblock discarded wholesale (the tag carried no
//! information beyond the type, so no line-level surgery is needed).

use std::sync::Arc;

use attrtool_core::error::{DeclKind, MigrateError};
use attrtool_core::outcome::MigrationOutcome;
use tracing::debug;

use crate::annotations::AnnotationReader;
use crate::infer;
use crate::nodes::{last_segment, Attribute, Name, PropertyDecl, SourceFile};
use crate::reflect::{ReflectedClass, ReflectionProvider};
use crate::visitor::{walk_source_file, Visitor};

/// Run the inject-only pass over one parsed file.
///
/// The class is resolved up front from its fully-qualified name; unlike the
/// full visitor, this pass tracks no namespace context to recover with, so
/// an unresolvable class is a hard failure.
pub fn migrate_inject_only(
    file: &mut SourceFile,
    class_name: &str,
    inject_annotation: &str,
    reflection: &dyn ReflectionProvider,
    reader: &dyn AnnotationReader,
) -> Result<MigrationOutcome, MigrateError> {
    let class = reflection.resolve_class(class_name)?;
    let mut visitor = InjectOnlyVisitor::new(class, inject_annotation, reader);
    walk_source_file(file, &mut visitor);
    Ok(visitor.into_outcome())
}

/// Property-only traversal targeting a single injection-marker kind.
pub struct InjectOnlyVisitor<'a> {
    class: Arc<ReflectedClass>,
    /// Fully-qualified kind of the injection marker.
    inject_annotation: &'a str,
    reader: &'a dyn AnnotationReader,
    outcome: MigrationOutcome,
}

impl<'a> InjectOnlyVisitor<'a> {
    /// Create a visitor bound to one reflected class.
    pub fn new(
        class: Arc<ReflectedClass>,
        inject_annotation: &'a str,
        reader: &'a dyn AnnotationReader,
    ) -> Self {
        InjectOnlyVisitor {
            class,
            inject_annotation,
            reader,
            outcome: MigrationOutcome::new(),
        }
    }

    /// Consume the visitor, yielding the run's outcome.
    pub fn into_outcome(self) -> MigrationOutcome {
        self.outcome
    }
}

impl Visitor for InjectOnlyVisitor<'_> {
    fn leave_property(&mut self, node: &mut PropertyDecl) {
        let Some(property) = self.class.property(&node.name).cloned() else {
            let err =
                MigrateError::member_not_found(&self.class.name, DeclKind::Property, &node.name);
            self.outcome
                .skip_declaration(DeclKind::Property, &node.name, &err);
            return;
        };

        let annotations = self.reader.property_annotations(&self.class, &property);
        let mut planned_type: Option<Name> = None;
        let mut new_attrs: Vec<Attribute> = Vec::new();

        for annotation in &annotations {
            if annotation.kind != self.inject_annotation {
                continue;
            }
            let declared = node.ty.as_ref().or(planned_type.as_ref());
            let Some(inferred) = infer::property_type(declared, &property) else {
                debug!(
                    property = node.name.as_str(),
                    "no resolvable type, property left unmigrated"
                );
                continue;
            };
            new_attrs.push(Attribute::new(Name::unqualified(last_segment(
                self.inject_annotation,
            ))));
            planned_type = Some(inferred.name);
            self.outcome.mark_handled();
            debug!(property = node.name.as_str(), "attached injection marker");
        }

        if new_attrs.is_empty() {
            return;
        }
        if let Some(ty) = planned_type {
            node.ty = Some(ty);
        }
        node.attrs.extend(new_attrs);
        node.doc = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotations::{AnnotationInstance, StaticAnnotations};
    use crate::nodes::{ClassDecl, Member, Stmt};
    use crate::reflect::{ReflectedProperty, StaticReflection};

    const INJECT: &str = "App\\Annotation\\Inject";

    #[test]
    fn unresolvable_class_is_a_hard_failure() {
        let reflection = StaticReflection::new();
        let reader = StaticAnnotations::new();
        let mut file = SourceFile::new();
        let err = migrate_inject_only(&mut file, "App\\Gone", INJECT, &reflection, &reader)
            .unwrap_err();
        assert_eq!(err, MigrateError::class_not_found("App\\Gone"));
    }

    #[test]
    fn unresolved_type_leaves_property_untouched() {
        let mut reflection = StaticReflection::new();
        reflection.insert(
            ReflectedClass::new("App\\Foo")
                .with_property(ReflectedProperty::new("bar").with_doc("/** No type here. */")),
        );
        let mut reader = StaticAnnotations::new();
        reader.add_property_annotation("App\\Foo", "bar", AnnotationInstance::new(INJECT));

        let original = PropertyDecl::new("bar").with_doc("/** No type here. */");
        let mut file = SourceFile::new().with_stmt(Stmt::Class(
            ClassDecl::new("Foo").with_member(Member::Property(original.clone())),
        ));
        let outcome =
            migrate_inject_only(&mut file, "App\\Foo", INJECT, &reflection, &reader).unwrap();

        assert!(!outcome.handled);
        let Stmt::Class(class) = &file.stmts[0] else {
            panic!("expected class");
        };
        let Member::Property(property) = &class.members[0] else {
            panic!("expected property");
        };
        assert_eq!(property, &original);
    }
}
