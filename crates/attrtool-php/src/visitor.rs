//! Traversal protocol for the declaration tree.
//!
//! Single-threaded, single pass, depth-first: `enter_*` hooks fire before a
//! node's children, `leave_*` hooks after. Enter hooks are read-only and
//! return a [`VisitResult`] to control descent; leave hooks receive `&mut`
//! nodes because the migration engine mutates declarations in place on the
//! way out.

use crate::nodes::{ClassDecl, Member, MethodDecl, NamespaceDecl, PropertyDecl, SourceFile, Stmt, UseDecl};

/// Result of entering a node - controls traversal behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VisitResult {
    /// Continue traversal into children. `leave_*` fires afterwards.
    #[default]
    Continue,

    /// Skip children, continue with siblings. `leave_*` still fires for
    /// this node.
    SkipChildren,

    /// Stop traversal entirely. No further `enter_*` or `leave_*` calls.
    Stop,
}

/// Enter/leave hooks over the declaration tree.
///
/// Every method has a no-op default, so a visitor only implements the node
/// kinds it cares about.
pub trait Visitor {
    /// Enter a namespace declaration.
    fn enter_namespace(&mut self, _node: &NamespaceDecl) -> VisitResult {
        VisitResult::Continue
    }

    /// Enter an import statement.
    fn enter_use(&mut self, _node: &UseDecl) -> VisitResult {
        VisitResult::Continue
    }

    /// Enter a class declaration, before its members.
    fn enter_class(&mut self, _node: &ClassDecl) -> VisitResult {
        VisitResult::Continue
    }

    /// Leave a class declaration, after all members.
    fn leave_class(&mut self, _node: &mut ClassDecl) {}

    /// Enter a method declaration.
    fn enter_method(&mut self, _node: &MethodDecl) -> VisitResult {
        VisitResult::Continue
    }

    /// Leave a method declaration.
    fn leave_method(&mut self, _node: &mut MethodDecl) {}

    /// Enter a property declaration.
    fn enter_property(&mut self, _node: &PropertyDecl) -> VisitResult {
        VisitResult::Continue
    }

    /// Leave a property declaration.
    fn leave_property(&mut self, _node: &mut PropertyDecl) {}
}

/// Walk a source file, driving the visitor over every declaration in source
/// order. Returns early if any hook requests [`VisitResult::Stop`].
pub fn walk_source_file<V: Visitor>(file: &mut SourceFile, visitor: &mut V) {
    for stmt in &mut file.stmts {
        if !walk_stmt(stmt, visitor) {
            return;
        }
    }
}

/// Walk one statement. Returns false when traversal should stop.
fn walk_stmt<V: Visitor>(stmt: &mut Stmt, visitor: &mut V) -> bool {
    match stmt {
        Stmt::Namespace(ns) => visitor.enter_namespace(ns) != VisitResult::Stop,
        Stmt::Use(import) => visitor.enter_use(import) != VisitResult::Stop,
        Stmt::Class(class) => walk_class(class, visitor),
        Stmt::Other => true,
    }
}

/// Walk a class declaration and its members. Returns false on stop.
fn walk_class<V: Visitor>(class: &mut ClassDecl, visitor: &mut V) -> bool {
    match visitor.enter_class(class) {
        VisitResult::Stop => return false,
        VisitResult::Continue => {
            for member in &mut class.members {
                if !walk_member(member, visitor) {
                    return false;
                }
            }
        }
        VisitResult::SkipChildren => {}
    }
    visitor.leave_class(class);
    true
}

/// Walk one class member. Returns false on stop.
fn walk_member<V: Visitor>(member: &mut Member, visitor: &mut V) -> bool {
    match member {
        Member::Method(method) => {
            if visitor.enter_method(method) == VisitResult::Stop {
                return false;
            }
            visitor.leave_method(method);
            true
        }
        Member::Property(property) => {
            if visitor.enter_property(property) == VisitResult::Stop {
                return false;
            }
            visitor.leave_property(property);
            true
        }
        Member::Other => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::{ClassDecl, Member, MethodDecl, PropertyDecl, SourceFile, Stmt};

    /// Records hook order for traversal assertions.
    #[derive(Default)]
    struct Tracer {
        events: Vec<String>,
        skip_classes: bool,
        stop_on_method: bool,
    }

    impl Visitor for Tracer {
        fn enter_namespace(&mut self, node: &crate::nodes::NamespaceDecl) -> VisitResult {
            self.events.push(format!("ns:{}", node.name));
            VisitResult::Continue
        }

        fn enter_class(&mut self, node: &ClassDecl) -> VisitResult {
            self.events.push(format!("enter:{}", node.name));
            if self.skip_classes {
                VisitResult::SkipChildren
            } else {
                VisitResult::Continue
            }
        }

        fn leave_class(&mut self, node: &mut ClassDecl) {
            self.events.push(format!("leave:{}", node.name));
        }

        fn enter_method(&mut self, node: &MethodDecl) -> VisitResult {
            self.events.push(format!("method:{}", node.name));
            if self.stop_on_method {
                VisitResult::Stop
            } else {
                VisitResult::Continue
            }
        }

        fn leave_property(&mut self, node: &mut PropertyDecl) {
            self.events.push(format!("prop:{}", node.name));
        }
    }

    fn sample_file() -> SourceFile {
        SourceFile::new()
            .with_stmt(Stmt::Namespace(crate::nodes::NamespaceDecl::new("App")))
            .with_stmt(Stmt::Class(
                ClassDecl::new("Foo")
                    .with_member(Member::Method(MethodDecl::new("run")))
                    .with_member(Member::Property(PropertyDecl::new("bar"))),
            ))
    }

    #[test]
    fn members_are_walked_between_enter_and_leave() {
        let mut file = sample_file();
        let mut tracer = Tracer::default();
        walk_source_file(&mut file, &mut tracer);
        assert_eq!(
            tracer.events,
            vec!["ns:App", "enter:Foo", "method:run", "prop:bar", "leave:Foo"]
        );
    }

    #[test]
    fn skip_children_still_fires_leave() {
        let mut file = sample_file();
        let mut tracer = Tracer {
            skip_classes: true,
            ..Tracer::default()
        };
        walk_source_file(&mut file, &mut tracer);
        assert_eq!(tracer.events, vec!["ns:App", "enter:Foo", "leave:Foo"]);
    }

    #[test]
    fn stop_halts_traversal_without_further_hooks() {
        let mut file = sample_file();
        let mut tracer = Tracer {
            stop_on_method: true,
            ..Tracer::default()
        };
        walk_source_file(&mut file, &mut tracer);
        assert_eq!(tracer.events, vec!["ns:App", "enter:Foo", "method:run"]);
    }
}
