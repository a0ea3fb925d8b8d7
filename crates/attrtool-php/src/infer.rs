//! Property type inference.
//!
//! A property's type comes from one of two places: an explicit declared type
//! on the syntax node, or a `@var TYPE` tag in the reflected property's
//! docblock. The source matters downstream — only comment-sourced types are
//! subject to the inheritance guard and to `@var` tag removal — so the
//! result carries it.

use attrtool_core::docblock;

use crate::nodes::Name;
use crate::reflect::ReflectedProperty;

/// Built-in type names that are never namespace-qualified.
pub const BUILTIN_TYPES: &[&str] = &["bool", "int", "float", "string", "object", "array"];

/// Whether a name denotes a built-in type.
pub fn is_builtin(name: &str) -> bool {
    BUILTIN_TYPES.contains(&name)
}

/// A resolved property type and where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferredType {
    /// The resolved type.
    pub name: Name,
    /// True when the type was read from a `@var` docblock tag rather than
    /// an explicit declaration.
    pub from_comment: bool,
}

/// Determine a property's type.
///
/// The explicit declared type wins when present. Otherwise the reflected
/// property's docblock is consulted for a `@var` tag: an `X[]` array marker
/// collapses to the built-in sequence type `array`, and `callable` is
/// treated as unresolved (it cannot be written as a property type).
/// Returns `None` when neither path yields a type — a recognized skip
/// outcome, not an error.
pub fn property_type(
    explicit: Option<&Name>,
    property: &ReflectedProperty,
) -> Option<InferredType> {
    if let Some(ty) = explicit {
        return Some(InferredType {
            name: ty.clone(),
            from_comment: false,
        });
    }

    let doc = property.raw_doc()?;
    let tag = docblock::var_tag_type(doc)?;
    if tag.ends_with("[]") {
        return Some(InferredType {
            name: Name::unqualified("array"),
            from_comment: true,
        });
    }
    if tag == "callable" {
        return None;
    }
    Some(InferredType {
        name: Name::resolved(tag),
        from_comment: true,
    })
}
