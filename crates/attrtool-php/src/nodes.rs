//! Declaration tree data model for one parsed PHP source file.
//!
//! The external parser produces this tree and the external printer
//! re-serializes it; the migration engine mutates it in place. Declarations
//! are never deleted or reordered by the engine — it only sets property
//! types, appends attributes, and replaces documentation comments.
//!
//! Node kinds form closed tagged unions ([`Stmt`], [`Member`]) so visitor
//! dispatch is exhaustive pattern matching.

use std::fmt;

/// One parsed source file: an ordered list of top-level statements.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SourceFile {
    /// Top-level statements in source order.
    pub stmts: Vec<Stmt>,
}

impl SourceFile {
    /// Create an empty file.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a statement, builder-style.
    pub fn with_stmt(mut self, stmt: Stmt) -> Self {
        self.stmts.push(stmt);
        self
    }
}

/// A top-level statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// A namespace declaration; applies to the statements that follow it.
    Namespace(NamespaceDecl),
    /// An import (`use`) statement.
    Use(UseDecl),
    /// A class declaration.
    Class(ClassDecl),
    /// Any other statement; opaque to the migration engine.
    Other,
}

/// A namespace declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceDecl {
    /// Qualified namespace name without a leading separator.
    pub name: String,
}

impl NamespaceDecl {
    /// Create a namespace declaration.
    pub fn new(name: impl Into<String>) -> Self {
        NamespaceDecl { name: name.into() }
    }
}

/// An import statement carrying one or more imported names.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UseDecl {
    /// Imported items in source order.
    pub items: Vec<UseItem>,
}

impl UseDecl {
    /// Create an import statement for a single qualified name.
    pub fn single(qualified: impl Into<String>) -> Self {
        UseDecl {
            items: vec![UseItem::new(qualified)],
        }
    }

    /// Append an item, builder-style.
    pub fn with_item(mut self, item: UseItem) -> Self {
        self.items.push(item);
        self
    }
}

/// One imported name within an import statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UseItem {
    /// The fully-qualified imported name, without a leading separator.
    pub qualified: String,
    /// The alias if an `as` clause was used.
    pub alias: Option<String>,
}

impl UseItem {
    /// Create an item without an alias.
    pub fn new(qualified: impl Into<String>) -> Self {
        UseItem {
            qualified: qualified.into(),
            alias: None,
        }
    }

    /// Create an aliased item.
    pub fn aliased(qualified: impl Into<String>, alias: impl Into<String>) -> Self {
        UseItem {
            qualified: qualified.into(),
            alias: Some(alias.into()),
        }
    }

    /// The short name this import binds: the alias if declared, else the
    /// last segment of the qualified name.
    pub fn short_name(&self) -> &str {
        match &self.alias {
            Some(alias) => alias.as_str(),
            None => last_segment(&self.qualified),
        }
    }
}

/// A class declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    /// Unqualified class name.
    pub name: String,
    /// Raw documentation comment text, if any.
    pub doc: Option<String>,
    /// Attached attribute markers in source order.
    pub attrs: Vec<Attribute>,
    /// Class members in source order.
    pub members: Vec<Member>,
}

impl ClassDecl {
    /// Create a class with no doc, attributes, or members.
    pub fn new(name: impl Into<String>) -> Self {
        ClassDecl {
            name: name.into(),
            doc: None,
            attrs: Vec::new(),
            members: Vec::new(),
        }
    }

    /// Set the documentation comment, builder-style.
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Append a member, builder-style.
    pub fn with_member(mut self, member: Member) -> Self {
        self.members.push(member);
        self
    }
}

/// A class member.
#[derive(Debug, Clone, PartialEq)]
pub enum Member {
    /// A method declaration.
    Method(MethodDecl),
    /// A property declaration.
    Property(PropertyDecl),
    /// Any other member; opaque to the migration engine.
    Other,
}

/// A method declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodDecl {
    /// Method name.
    pub name: String,
    /// Raw documentation comment text, if any.
    pub doc: Option<String>,
    /// Attached attribute markers in source order.
    pub attrs: Vec<Attribute>,
}

impl MethodDecl {
    /// Create a method with no doc or attributes.
    pub fn new(name: impl Into<String>) -> Self {
        MethodDecl {
            name: name.into(),
            doc: None,
            attrs: Vec::new(),
        }
    }

    /// Set the documentation comment, builder-style.
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }
}

/// A property declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDecl {
    /// Property name, without the leading sigil.
    pub name: String,
    /// Explicit declared type, if any.
    pub ty: Option<Name>,
    /// Raw documentation comment text, if any.
    pub doc: Option<String>,
    /// Attached attribute markers in source order.
    pub attrs: Vec<Attribute>,
}

impl PropertyDecl {
    /// Create an untyped property with no doc or attributes.
    pub fn new(name: impl Into<String>) -> Self {
        PropertyDecl {
            name: name.into(),
            ty: None,
            doc: None,
            attrs: Vec::new(),
        }
    }

    /// Set the explicit type, builder-style.
    pub fn with_type(mut self, ty: Name) -> Self {
        self.ty = Some(ty);
        self
    }

    /// Set the documentation comment, builder-style.
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }
}

/// How a name is qualified relative to the current namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NameKind {
    /// A bare name: `Foo`.
    Unqualified,
    /// A relative path: `Sub\Foo`.
    Qualified,
    /// An absolute path: `\App\Sub\Foo`.
    FullyQualified,
}

/// A possibly-qualified identifier.
///
/// The text is stored without a leading separator; display adds exactly one
/// for fully-qualified names.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Name {
    text: String,
    kind: NameKind,
}

impl Name {
    /// Create a bare, unqualified name.
    pub fn unqualified(text: impl Into<String>) -> Self {
        Name {
            text: text.into(),
            kind: NameKind::Unqualified,
        }
    }

    /// Create a namespace-relative qualified name.
    pub fn qualified(text: impl Into<String>) -> Self {
        Name {
            text: text.into(),
            kind: NameKind::Qualified,
        }
    }

    /// Create a fully-qualified name. A leading separator in the input is
    /// normalized away; display re-adds exactly one.
    pub fn fully_qualified(text: impl Into<String>) -> Self {
        let text = text.into();
        let text = text.strip_prefix('\\').map(str::to_string).unwrap_or(text);
        Name {
            text,
            kind: NameKind::FullyQualified,
        }
    }

    /// Classify a resolved textual name the way the printer expects:
    /// anything containing a separator is emitted fully qualified, a bare
    /// name stays unqualified.
    pub fn resolved(text: &str) -> Self {
        if text.contains('\\') {
            Name::fully_qualified(text)
        } else {
            Name::unqualified(text)
        }
    }

    /// The name text without any leading separator.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The qualification kind.
    pub fn kind(&self) -> NameKind {
        self.kind
    }

    /// The last segment of the name.
    pub fn last_segment(&self) -> &str {
        last_segment(&self.text)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            NameKind::FullyQualified => write!(f, "\\{}", self.text),
            _ => write!(f, "{}", self.text),
        }
    }
}

/// The last backslash-separated segment of a qualified name.
pub fn last_segment(qualified: &str) -> &str {
    qualified.rsplit('\\').next().unwrap_or(qualified)
}

/// A structured attribute marker attached to a declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    /// Resolved marker name (bare, aliased, or fully qualified).
    pub name: Name,
    /// Keyword arguments in synthesis order.
    pub args: Vec<Arg>,
}

impl Attribute {
    /// Create a bare marker with no arguments.
    pub fn new(name: Name) -> Self {
        Attribute {
            name,
            args: Vec::new(),
        }
    }

    /// Set the argument list, builder-style.
    pub fn with_args(mut self, args: Vec<Arg>) -> Self {
        self.args = args;
        self
    }
}

/// A keyword argument of an attribute marker.
#[derive(Debug, Clone, PartialEq)]
pub struct Arg {
    /// Argument name.
    pub name: String,
    /// Argument value.
    pub value: Value,
}

impl Arg {
    /// Create a keyword argument.
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        Arg {
            name: name.into(),
            value,
        }
    }
}

/// An annotation field or attribute argument value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// `null`.
    Null,
    /// A boolean literal.
    Bool(bool),
    /// An integer literal.
    Int(i64),
    /// A float literal.
    Float(f64),
    /// A string literal.
    Str(String),
    /// An array literal with optionally keyed elements, in source order.
    Array(Vec<ArrayItem>),
}

impl Value {
    /// Shorthand for a string value.
    pub fn str(s: impl Into<String>) -> Self {
        Value::Str(s.into())
    }
}

/// One element of an array value.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayItem {
    /// Explicit key, if any.
    pub key: Option<Value>,
    /// Element value.
    pub value: Value,
}
