//! Callee resolution: from a matched node to a canonical callee identity.

use crate::model::{CalleeKind, SourceModel};
use crate::scan::classify::{ExceptionGuarantee, classify};

/// Resolved target of an invocation site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalleeIdentity {
    /// Fully qualified name; `Class::Class` for constructors. Never empty.
    pub qualified_name: String,
    /// Pretty-printed declaration, for human inspection only
    pub declared_signature: String,
    pub exception_guarantee: ExceptionGuarantee,
}

/// Resolve the direct callee of `node`.
///
/// Returns `None` when the front end has no statically bound target
/// (function pointers, unresolved dispatch) or the target has no name.
pub fn resolve<'m, M: SourceModel>(model: &'m M, node: &M::Node<'m>) -> Option<CalleeIdentity> {
    let callee = model.direct_callee(node)?;

    let qualified_name = match model.callee_kind(&callee) {
        CalleeKind::Constructor {
            parent_qualified_name,
            class_name,
        } => constructor_name(&parent_qualified_name, &class_name),
        CalleeKind::Function | CalleeKind::Method => model.qualified_name(&callee),
    };
    if qualified_name.is_empty() {
        return None;
    }

    Some(CalleeIdentity {
        qualified_name,
        declared_signature: model.pretty_signature(&callee),
        exception_guarantee: classify(model.function_type(&callee).as_ref()),
    })
}

/// `Namespace::Class` + `Class` → `Namespace::Class::Class`.
pub fn constructor_name(parent_qualified_name: &str, class_name: &str) -> String {
    if class_name.is_empty() {
        return String::new();
    }
    if parent_qualified_name.is_empty() {
        return format!("{class_name}::{class_name}");
    }
    format!("{parent_qualified_name}::{class_name}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ExceptionSpec;
    use crate::scan::testing::{FakeModel, FakeNode};

    fn resolve_first(node: FakeNode) -> Option<CalleeIdentity> {
        let model = FakeModel::new(vec![node]);
        let node = model.invocations().next().expect("one node");
        resolve(&model, &node)
    }

    #[test]
    fn test_function_identity() {
        let identity = resolve_first(
            FakeNode::call("util::f")
                .signature("void f() noexcept")
                .spec(ExceptionSpec::NoexceptTrue),
        )
        .expect("resolved");
        assert_eq!(identity.qualified_name, "util::f");
        assert_eq!(identity.declared_signature, "void f() noexcept");
        assert_eq!(identity.exception_guarantee, ExceptionGuarantee::NoThrow);
    }

    #[test]
    fn test_constructor_uses_parent_and_class_name() {
        let identity = resolve_first(FakeNode::construct("geo::Point", "Point")).expect("resolved");
        assert_eq!(identity.qualified_name, "geo::Point::Point");
        assert_eq!(identity.exception_guarantee, ExceptionGuarantee::MayThrow);
    }

    #[test]
    fn test_indirect_call_is_dropped() {
        assert!(resolve_first(FakeNode::indirect()).is_none());
    }

    #[test]
    fn test_missing_prototype_may_throw() {
        let identity = resolve_first(FakeNode::call("std::sort").no_proto()).expect("resolved");
        assert_eq!(identity.exception_guarantee, ExceptionGuarantee::MayThrow);
    }

    #[test]
    fn test_constructor_name() {
        assert_eq!(constructor_name("ns::C", "C"), "ns::C::C");
        assert_eq!(constructor_name("", "C"), "C::C");
        assert_eq!(constructor_name("Box<int>", "Box"), "Box<int>::Box");
        assert_eq!(constructor_name("ns::C", ""), "");
    }
}
