//! Reflection seam for the migration engine.
//!
//! The engine never performs ambient reflection lookups; it asks an injected
//! [`ReflectionProvider`] for a class handle and reads declared members from
//! it. [`StaticReflection`] is the in-memory implementation: orchestrators
//! (and tests) load pre-indexed class data into it up front.
//!
//! Parent chains live on the handles themselves, so inheritance checks never
//! perform a fallible lookup mid-migration.

use std::collections::HashMap;
use std::sync::Arc;

use attrtool_core::error::MigrateError;

/// Resolves fully-qualified class names to reflected class handles.
pub trait ReflectionProvider {
    /// Resolve a class by its fully-qualified name (no leading separator).
    fn resolve_class(&self, qualified_name: &str) -> Result<Arc<ReflectedClass>, MigrateError>;
}

/// A reflected class: declared members plus the parent chain.
#[derive(Debug, Clone, Default)]
pub struct ReflectedClass {
    /// Fully-qualified class name, without a leading separator.
    pub name: String,
    /// Parent class handle, if the class extends one.
    pub parent: Option<Arc<ReflectedClass>>,
    /// Declared properties in declaration order.
    pub properties: Vec<ReflectedProperty>,
    /// Declared methods in declaration order.
    pub methods: Vec<ReflectedMethod>,
}

impl ReflectedClass {
    /// Create a class with no parent or members.
    pub fn new(name: impl Into<String>) -> Self {
        ReflectedClass {
            name: name.into(),
            parent: None,
            properties: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// Set the parent class, builder-style.
    pub fn with_parent(mut self, parent: Arc<ReflectedClass>) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Append a declared property, builder-style.
    pub fn with_property(mut self, property: ReflectedProperty) -> Self {
        self.properties.push(property);
        self
    }

    /// Append a declared method, builder-style.
    pub fn with_method(mut self, method: ReflectedMethod) -> Self {
        self.methods.push(method);
        self
    }

    /// Look up a declared property by name.
    pub fn property(&self, name: &str) -> Option<&ReflectedProperty> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Look up a declared method by name.
    pub fn method(&self, name: &str) -> Option<&ReflectedMethod> {
        self.methods.iter().find(|m| m.name == name)
    }
}

/// A reflected property declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReflectedProperty {
    /// Property name without the leading sigil.
    pub name: String,
    /// Explicit declared type, if any.
    pub ty: Option<String>,
    /// Raw documentation comment text, if any.
    pub doc: Option<String>,
}

impl ReflectedProperty {
    /// Create an untyped, undocumented property.
    pub fn new(name: impl Into<String>) -> Self {
        ReflectedProperty {
            name: name.into(),
            ty: None,
            doc: None,
        }
    }

    /// Set the explicit type, builder-style.
    pub fn with_type(mut self, ty: impl Into<String>) -> Self {
        self.ty = Some(ty.into());
        self
    }

    /// Set the raw documentation text, builder-style.
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Whether the declaration carries an explicit type.
    pub fn has_explicit_type(&self) -> bool {
        self.ty.is_some()
    }

    /// The raw documentation text.
    pub fn raw_doc(&self) -> Option<&str> {
        self.doc.as_deref()
    }
}

/// A reflected method declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReflectedMethod {
    /// Method name.
    pub name: String,
    /// Raw documentation comment text, if any.
    pub doc: Option<String>,
}

impl ReflectedMethod {
    /// Create an undocumented method.
    pub fn new(name: impl Into<String>) -> Self {
        ReflectedMethod {
            name: name.into(),
            doc: None,
        }
    }

    /// Set the raw documentation text, builder-style.
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// The raw documentation text.
    pub fn raw_doc(&self) -> Option<&str> {
        self.doc.as_deref()
    }
}

/// In-memory [`ReflectionProvider`] keyed by fully-qualified class name.
#[derive(Debug, Default)]
pub struct StaticReflection {
    classes: HashMap<String, Arc<ReflectedClass>>,
}

impl StaticReflection {
    /// Create an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a class, returning the shared handle (useful for wiring the
    /// same handle in as another class's parent).
    pub fn insert(&mut self, class: ReflectedClass) -> Arc<ReflectedClass> {
        let handle = Arc::new(class);
        self.classes.insert(handle.name.clone(), Arc::clone(&handle));
        handle
    }
}

impl ReflectionProvider for StaticReflection {
    fn resolve_class(&self, qualified_name: &str) -> Result<Arc<ReflectedClass>, MigrateError> {
        self.classes
            .get(qualified_name)
            .cloned()
            .ok_or_else(|| MigrateError::class_not_found(qualified_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_returns_registered_class() {
        let mut reflection = StaticReflection::new();
        reflection.insert(ReflectedClass::new("App\\Foo").with_property(ReflectedProperty::new("bar")));

        let class = reflection.resolve_class("App\\Foo").unwrap();
        assert_eq!(class.name, "App\\Foo");
        assert!(class.property("bar").is_some());
        assert!(class.property("missing").is_none());
    }

    #[test]
    fn resolve_unknown_class_fails() {
        let reflection = StaticReflection::new();
        let err = reflection.resolve_class("App\\Gone").unwrap_err();
        assert_eq!(err, MigrateError::class_not_found("App\\Gone"));
    }

    #[test]
    fn parent_chain_is_reachable_from_handle() {
        let mut reflection = StaticReflection::new();
        let parent = reflection.insert(
            ReflectedClass::new("App\\Base").with_property(ReflectedProperty::new("bar")),
        );
        reflection.insert(ReflectedClass::new("App\\Child").with_parent(parent));

        let child = reflection.resolve_class("App\\Child").unwrap();
        let parent = child.parent.as_ref().unwrap();
        assert!(parent.property("bar").is_some());
        assert!(!parent.property("bar").unwrap().has_explicit_type());
    }
}
