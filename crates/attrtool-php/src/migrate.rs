//! The annotation-to-attribute migration visitor.
//!
//! One pass over a parsed file: enter hooks accumulate traversal context
//! (current namespace, import table, reflected class), leave hooks rewrite
//! declarations. For every legacy annotation whose kind is on the configured
//! allow-list, the visitor synthesizes an equivalent attribute marker,
//! appends it to the declaration, and removes exactly the migrated tag's
//! line from the docblock. Non-listed annotations are left untouched.
//!
//! Reflection failures abort the affected declaration only; they are
//! recorded on the outcome and the traversal continues with siblings.
//! Each declaration's mutation is computed on a local plan and committed in
//! one step, so a declaration is never left half-migrated.

use std::collections::HashSet;
use std::sync::Arc;

use attrtool_core::docblock;
use attrtool_core::error::{DeclKind, MigrateError};
use attrtool_core::outcome::MigrationOutcome;
use tracing::debug;

use crate::annotations::{AnnotationInstance, AnnotationReader};
use crate::infer::{self, InferredType};
use crate::nodes::{
    Arg, Attribute, ClassDecl, MethodDecl, Name, NameKind, NamespaceDecl, PropertyDecl,
    SourceFile, UseDecl, UseItem, Value,
};
use crate::reflect::{ReflectedClass, ReflectionProvider};
use crate::visitor::{walk_source_file, VisitResult, Visitor};

/// Configuration for a migration run.
#[derive(Debug, Clone, Default)]
pub struct MigrateConfig {
    /// Annotation kinds eligible for conversion.
    annotations: HashSet<String>,
    /// The dependency-injection marker kind, if one is configured.
    inject: Option<String>,
}

impl MigrateConfig {
    /// Create a config from the migration allow-list (fully-qualified
    /// annotation class names, without leading separators).
    pub fn new<I, S>(annotations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        MigrateConfig {
            annotations: annotations.into_iter().map(Into::into).collect(),
            inject: None,
        }
    }

    /// Mark one kind as the dependency-injection marker. It is added to the
    /// allow-list as well; the inheritance guard treats it specially.
    pub fn with_inject_annotation(mut self, kind: impl Into<String>) -> Self {
        let kind = kind.into();
        self.annotations.insert(kind.clone());
        self.inject = Some(kind);
        self
    }

    /// Whether a kind is on the allow-list.
    pub fn is_allowed(&self, kind: &str) -> bool {
        self.annotations.contains(kind)
    }

    /// Whether a kind is the configured injection marker.
    pub fn is_inject(&self, kind: &str) -> bool {
        self.inject.as_deref() == Some(kind)
    }

    /// The configured injection marker kind.
    pub fn inject_annotation(&self) -> Option<&str> {
        self.inject.as_deref()
    }
}

/// Run the migration visitor over one parsed file.
///
/// The returned outcome's `handled` flag tells the orchestrator whether the
/// tree was mutated and is worth persisting.
pub fn migrate_file(
    file: &mut SourceFile,
    reflection: &dyn ReflectionProvider,
    reader: &dyn AnnotationReader,
    config: &MigrateConfig,
) -> MigrationOutcome {
    let mut visitor = MigrateVisitor::new(reflection, reader, config);
    walk_source_file(file, &mut visitor);
    visitor.into_outcome()
}

/// Stateful traversal that rewrites matching annotations into attributes.
pub struct MigrateVisitor<'a> {
    reflection: &'a dyn ReflectionProvider,
    reader: &'a dyn AnnotationReader,
    config: &'a MigrateConfig,
    /// Current namespace, set on enter.
    namespace: Option<String>,
    /// Import table: insertion-ordered, unique by short name (a later
    /// import of the same short name overwrites).
    imports: Vec<UseItem>,
    /// Reflected handle for the class currently being visited.
    class: Option<Arc<ReflectedClass>>,
    outcome: MigrationOutcome,
}

impl<'a> MigrateVisitor<'a> {
    /// Create a visitor for one file traversal.
    pub fn new(
        reflection: &'a dyn ReflectionProvider,
        reader: &'a dyn AnnotationReader,
        config: &'a MigrateConfig,
    ) -> Self {
        MigrateVisitor {
            reflection,
            reader,
            config,
            namespace: None,
            imports: Vec::new(),
            class: None,
            outcome: MigrationOutcome::new(),
        }
    }

    /// Consume the visitor, yielding the run's outcome.
    pub fn into_outcome(self) -> MigrationOutcome {
        self.outcome
    }

    fn add_import(&mut self, item: UseItem) {
        match self
            .imports
            .iter()
            .position(|existing| existing.short_name() == item.short_name())
        {
            Some(pos) => self.imports[pos] = item,
            None => self.imports.push(item),
        }
    }

    /// Resolve the marker name for an annotation kind: the imported alias
    /// if one was declared, else the import's short name, else the
    /// fully-qualified kind itself.
    fn resolve_class_name(&self, kind: &str) -> String {
        for item in &self.imports {
            if item.qualified == kind {
                return item.short_name().to_string();
            }
        }
        kind.to_string()
    }

    fn qualified_class_name(&self, class: &str) -> String {
        match &self.namespace {
            Some(ns) => format!("{ns}\\{class}"),
            None => class.to_string(),
        }
    }

    /// The type name carried by the guard's `value` argument: built-in
    /// types and fully-qualified names pass through verbatim, everything
    /// else is qualified with the current namespace.
    fn inject_property_type(&self, ty: &Name) -> String {
        if infer::is_builtin(ty.text()) {
            return ty.text().to_string();
        }
        match (ty.kind(), &self.namespace) {
            (NameKind::FullyQualified, _) | (_, None) => ty.text().to_string(),
            (_, Some(ns)) => format!("{ns}\\{}", ty.text()),
        }
    }

    /// Remove a tag line from the in-plan comment, surfacing a warning if
    /// the tag's text was not found (the matching step and the removal step
    /// disagree about the source).
    fn remove_tag(
        &mut self,
        kind: DeclKind,
        declaration: &str,
        comment: Option<String>,
        tag: &str,
    ) -> Option<String> {
        match comment {
            Some(text) if !text.is_empty() => {
                let stripped = docblock::strip_tag_line(&text, tag);
                if !stripped.removed {
                    self.outcome.warn_tag_not_found(kind, declaration, tag);
                }
                stripped.comment
            }
            _ => {
                self.outcome.warn_tag_not_found(kind, declaration, tag);
                None
            }
        }
    }

    /// Shared class/method procedure: match against the allow-list,
    /// synthesize markers, strip migrated tag lines, commit.
    fn apply_annotations(
        &mut self,
        kind: DeclKind,
        declaration: &str,
        annotations: &[AnnotationInstance],
        doc: &mut Option<String>,
        attrs: &mut Vec<Attribute>,
    ) {
        let mut comment = doc.take();
        let mut new_attrs: Vec<Attribute> = Vec::new();
        for annotation in annotations {
            if !self.config.is_allowed(&annotation.kind) {
                continue;
            }
            let marker = self.resolve_class_name(&annotation.kind);
            let args = build_attribute_args(annotation, Vec::new());
            new_attrs.push(Attribute::new(Name::resolved(&marker)).with_args(args));
            comment = self.remove_tag(kind, declaration, comment, &marker);
            self.outcome.mark_handled();
            debug!(
                kind = kind.as_str(),
                declaration,
                marker = marker.as_str(),
                "migrated annotation to attribute"
            );
        }
        attrs.extend(new_attrs);
        *doc = comment;
    }

    /// Property procedure: class/method steps plus type inference and the
    /// inheritance guard.
    fn migrate_property(&mut self, class: &ReflectedClass, node: &mut PropertyDecl) {
        let Some(property) = class.property(&node.name).cloned() else {
            let err = MigrateError::member_not_found(&class.name, DeclKind::Property, &node.name);
            self.outcome
                .skip_declaration(DeclKind::Property, &node.name, &err);
            return;
        };
        let annotations = self.reader.property_annotations(class, &property);

        let mut comment = node.doc.take();
        let mut planned_type: Option<Name> = None;
        let mut new_attrs: Vec<Attribute> = Vec::new();

        for annotation in &annotations {
            if !self.config.is_allowed(&annotation.kind) {
                continue;
            }
            let declared = node.ty.as_ref().or(planned_type.as_ref());
            let Some(InferredType { name: ty, from_comment }) =
                infer::property_type(declared, &property)
            else {
                debug!(
                    property = node.name.as_str(),
                    annotation = annotation.kind.as_str(),
                    "no resolvable type, annotation left in place"
                );
                continue;
            };

            // Writing an explicit type onto a redeclaration whose parent is
            // untyped would change override compatibility, so the type stays
            // off and an injection marker carries it as an argument instead.
            let mut leading: Vec<Arg> = Vec::new();
            let guarded = from_comment
                && class.parent.as_ref().is_some_and(|parent| {
                    parent
                        .property(&node.name)
                        .is_some_and(|p| !p.has_explicit_type())
                });
            if guarded {
                if self.config.is_inject(&annotation.kind) {
                    leading.push(Arg::new("value", Value::str(self.inject_property_type(&ty))));
                }
            } else {
                planned_type = Some(ty.clone());
            }
            if from_comment {
                comment = self.remove_tag(DeclKind::Property, &node.name, comment, "var");
            }

            let marker = self.resolve_class_name(&annotation.kind);
            new_attrs.push(
                Attribute::new(Name::resolved(&marker))
                    .with_args(build_attribute_args(annotation, leading)),
            );
            comment = self.remove_tag(DeclKind::Property, &node.name, comment, &marker);
            self.outcome.mark_handled();
            debug!(
                property = node.name.as_str(),
                marker = marker.as_str(),
                "migrated property annotation to attribute"
            );
        }

        if let Some(ty) = planned_type {
            node.ty = Some(ty);
        }
        node.attrs.extend(new_attrs);
        node.doc = comment;
    }
}

impl Visitor for MigrateVisitor<'_> {
    fn enter_namespace(&mut self, node: &NamespaceDecl) -> VisitResult {
        self.namespace = Some(node.name.clone());
        VisitResult::Continue
    }

    fn enter_use(&mut self, node: &UseDecl) -> VisitResult {
        for item in &node.items {
            self.add_import(item.clone());
        }
        VisitResult::Continue
    }

    fn enter_class(&mut self, node: &ClassDecl) -> VisitResult {
        let qualified = self.qualified_class_name(&node.name);
        match self.reflection.resolve_class(&qualified) {
            Ok(class) => {
                self.class = Some(class);
                VisitResult::Continue
            }
            Err(err) => {
                debug!(class = qualified.as_str(), error = %err, "skipping unresolvable class");
                self.outcome
                    .skip_declaration(DeclKind::Class, &qualified, &err);
                self.class = None;
                VisitResult::SkipChildren
            }
        }
    }

    fn leave_class(&mut self, node: &mut ClassDecl) {
        let Some(class) = self.class.take() else {
            return;
        };
        let annotations = self.reader.class_annotations(&class);
        self.apply_annotations(
            DeclKind::Class,
            &class.name,
            &annotations,
            &mut node.doc,
            &mut node.attrs,
        );
    }

    fn leave_method(&mut self, node: &mut MethodDecl) {
        let Some(class) = self.class.clone() else {
            return;
        };
        let Some(method) = class.method(&node.name) else {
            let err = MigrateError::member_not_found(&class.name, DeclKind::Method, &node.name);
            self.outcome
                .skip_declaration(DeclKind::Method, &node.name, &err);
            return;
        };
        let annotations = self.reader.method_annotations(&class, method);
        self.apply_annotations(
            DeclKind::Method,
            &node.name,
            &annotations,
            &mut node.doc,
            &mut node.attrs,
        );
    }

    fn leave_property(&mut self, node: &mut PropertyDecl) {
        let Some(class) = self.class.clone() else {
            return;
        };
        self.migrate_property(&class, node);
    }
}

/// Merge leading arguments (the inheritance guard's `value`) with the
/// annotation's non-default fields, in declared field order. A same-named
/// annotation field overrides the leading argument in place.
fn build_attribute_args(annotation: &AnnotationInstance, leading: Vec<Arg>) -> Vec<Arg> {
    let mut args = leading;
    for field in annotation.non_default_fields() {
        match args.iter_mut().find(|arg| arg.name == field.name) {
            Some(existing) => existing.value = field.value.clone(),
            None => args.push(Arg::new(field.name.clone(), field.value.clone())),
        }
    }
    args
}
