//! Annotation reader seam.
//!
//! Legacy annotations live in documentation comments and are parsed by an
//! external reader; the engine only ever sees [`AnnotationInstance`] values:
//! the annotation's kind (its fully-qualified class name) plus its fields
//! with current and declared-default values. Instances are read-only to the
//! engine.
//!
//! [`StaticAnnotations`] is the in-memory implementation used by
//! orchestrators and tests.

use std::collections::HashMap;

use crate::nodes::Value;
use crate::reflect::{ReflectedClass, ReflectedMethod, ReflectedProperty};

/// One public field of an annotation instance.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationField {
    /// Field name.
    pub name: String,
    /// Current value on this instance.
    pub value: Value,
    /// Default value declared on the annotation class, if any.
    pub default: Option<Value>,
}

impl AnnotationField {
    /// Create a field with no declared default.
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        AnnotationField {
            name: name.into(),
            value,
            default: None,
        }
    }

    /// Set the declared default, builder-style.
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    /// Whether the current value equals the declared default. Fields
    /// without a declared default are never "at default".
    pub fn is_default(&self) -> bool {
        self.default.as_ref() == Some(&self.value)
    }
}

/// One already-parsed legacy annotation occurrence.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationInstance {
    /// Fully-qualified class name of the annotation, without a leading
    /// separator. Identifies which marker this maps to.
    pub kind: String,
    /// Public fields in declaration order on the annotation class.
    pub fields: Vec<AnnotationField>,
}

impl AnnotationInstance {
    /// Create an instance with no fields.
    pub fn new(kind: impl Into<String>) -> Self {
        AnnotationInstance {
            kind: kind.into(),
            fields: Vec::new(),
        }
    }

    /// Append a field, builder-style.
    pub fn with_field(mut self, field: AnnotationField) -> Self {
        self.fields.push(field);
        self
    }

    /// Fields whose current value differs from their declared default, in
    /// declaration order.
    pub fn non_default_fields(&self) -> impl Iterator<Item = &AnnotationField> {
        self.fields.iter().filter(|f| !f.is_default())
    }
}

/// Yields the legacy annotations attached to reflected members.
pub trait AnnotationReader {
    /// Annotations attached to the class itself, in source order.
    fn class_annotations(&self, class: &ReflectedClass) -> Vec<AnnotationInstance>;

    /// Annotations attached to a method, in source order.
    fn method_annotations(
        &self,
        class: &ReflectedClass,
        method: &ReflectedMethod,
    ) -> Vec<AnnotationInstance>;

    /// Annotations attached to a property, in source order.
    fn property_annotations(
        &self,
        class: &ReflectedClass,
        property: &ReflectedProperty,
    ) -> Vec<AnnotationInstance>;
}

/// In-memory [`AnnotationReader`] keyed by class and member name.
#[derive(Debug, Default)]
pub struct StaticAnnotations {
    classes: HashMap<String, Vec<AnnotationInstance>>,
    methods: HashMap<(String, String), Vec<AnnotationInstance>>,
    properties: HashMap<(String, String), Vec<AnnotationInstance>>,
}

impl StaticAnnotations {
    /// Create an empty reader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach an annotation to a class.
    pub fn add_class_annotation(
        &mut self,
        class: impl Into<String>,
        annotation: AnnotationInstance,
    ) {
        self.classes.entry(class.into()).or_default().push(annotation);
    }

    /// Attach an annotation to a method.
    pub fn add_method_annotation(
        &mut self,
        class: impl Into<String>,
        method: impl Into<String>,
        annotation: AnnotationInstance,
    ) {
        self.methods
            .entry((class.into(), method.into()))
            .or_default()
            .push(annotation);
    }

    /// Attach an annotation to a property.
    pub fn add_property_annotation(
        &mut self,
        class: impl Into<String>,
        property: impl Into<String>,
        annotation: AnnotationInstance,
    ) {
        self.properties
            .entry((class.into(), property.into()))
            .or_default()
            .push(annotation);
    }
}

impl AnnotationReader for StaticAnnotations {
    fn class_annotations(&self, class: &ReflectedClass) -> Vec<AnnotationInstance> {
        self.classes.get(&class.name).cloned().unwrap_or_default()
    }

    fn method_annotations(
        &self,
        class: &ReflectedClass,
        method: &ReflectedMethod,
    ) -> Vec<AnnotationInstance> {
        self.methods
            .get(&(class.name.clone(), method.name.clone()))
            .cloned()
            .unwrap_or_default()
    }

    fn property_annotations(
        &self,
        class: &ReflectedClass,
        property: &ReflectedProperty,
    ) -> Vec<AnnotationInstance> {
        self.properties
            .get(&(class.name.clone(), property.name.clone()))
            .cloned()
            .unwrap_or_default()
    }
}
