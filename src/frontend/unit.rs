//! A loaded translation unit and its [`SourceModel`] implementation.

use crate::frontend::decls::DeclIndex;
use crate::frontend::line_map::LineMap;
use crate::frontend::sema::{Callee, Sema};
use crate::frontend::syntax::named_children;
use crate::model::{
    CalleeKind, FunctionProto, InvocationKind, PresumedLocation, SourceModel, SourceRange,
};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::PathBuf;
use tree_sitter::{Node, Tree};

/// One file of the unit: the main source or an included header.
pub struct SourceFile {
    pub path: PathBuf,
    pub display_name: String,
    pub text: String,
    pub tree: Tree,
    pub is_system: bool,
    pub line_map: LineMap,
    /// Start byte of an `#include` directive → index of the loaded file
    pub includes: HashMap<usize, usize>,
}

impl fmt::Debug for SourceFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceFile")
            .field("path", &self.path)
            .field("is_system", &self.is_system)
            .field("includes", &self.includes.len())
            .finish()
    }
}

/// A problem reported while loading a unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub file: String,
    pub line: u32,
    pub column: u32,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}: error: {}",
            self.file, self.line, self.column, self.message
        )
    }
}

#[derive(Debug)]
pub struct TranslationUnit {
    files: Vec<SourceFile>,
    index: DeclIndex,
    diagnostics: Vec<Diagnostic>,
}

impl TranslationUnit {
    pub fn new(files: Vec<SourceFile>, diagnostics: Vec<Diagnostic>) -> Self {
        let index = DeclIndex::build(&files);
        Self {
            files,
            index,
            diagnostics,
        }
    }

    pub fn files(&self) -> &[SourceFile] {
        &self.files
    }

    pub fn index(&self) -> &DeclIndex {
        &self.index
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

/// Handle to one classified invocation node.
#[derive(Debug, Clone)]
pub struct CppInvocation<'u> {
    file: usize,
    kind: InvocationKind,
    anchor: Node<'u>,
    range: (usize, usize),
    callee: Option<Callee<'u>>,
}

/// Document-order walk over the unit, entering each header at its
/// include point the first time it is reached.
struct InvocationIter<'u> {
    unit: &'u TranslationUnit,
    sema: Sema<'u>,
    stack: Vec<(usize, Node<'u>)>,
    entered: HashSet<usize>,
}

impl<'u> InvocationIter<'u> {
    fn new(unit: &'u TranslationUnit) -> Self {
        let mut stack = Vec::new();
        let mut entered = HashSet::new();
        if let Some(main) = unit.files.first() {
            stack.push((0, main.tree.root_node()));
            entered.insert(0);
        }
        Self {
            unit,
            sema: Sema::new(&unit.files, &unit.index),
            stack,
            entered,
        }
    }
}

impl<'u> Iterator for InvocationIter<'u> {
    type Item = CppInvocation<'u>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((file, node)) = self.stack.pop() {
            if node.kind() == "preproc_include" {
                if let Some(&target) = self.unit.files[file].includes.get(&node.start_byte())
                    && self.entered.insert(target)
                {
                    self.stack
                        .push((target, self.unit.files[target].tree.root_node()));
                }
                continue;
            }

            for child in named_children(node).into_iter().rev() {
                self.stack.push((file, child));
            }

            if let Some(resolution) = self.sema.analyze(file, node) {
                return Some(CppInvocation {
                    file,
                    kind: resolution.kind,
                    anchor: resolution.anchor,
                    range: resolution.range,
                    callee: resolution.callee,
                });
            }
        }
        None
    }
}

impl SourceModel for TranslationUnit {
    type Node<'m> = CppInvocation<'m>;
    type Callee<'m> = Callee<'m>;

    fn invocations<'m>(&'m self) -> Box<dyn Iterator<Item = Self::Node<'m>> + 'm> {
        Box::new(InvocationIter::new(self))
    }

    fn kind<'m>(&'m self, node: &Self::Node<'m>) -> InvocationKind {
        node.kind
    }

    fn in_system_header<'m>(&'m self, node: &Self::Node<'m>) -> bool {
        self.files.get(node.file).is_some_and(|file| file.is_system)
    }

    fn source_range<'m>(&'m self, node: &Self::Node<'m>) -> SourceRange {
        SourceRange::new(node.file, node.range.0, node.range.1)
    }

    fn presumed_location<'m>(&'m self, node: &Self::Node<'m>) -> Option<PresumedLocation> {
        let file = self.files.get(node.file)?;
        let point = node.anchor.start_position();
        let (name, line) = file.line_map.presume(point.row);
        Some(PresumedLocation {
            file: name.to_string(),
            line,
            column: u32::try_from(point.column + 1).ok()?,
        })
    }

    fn source_text(&self, range: &SourceRange) -> Option<&str> {
        self.files
            .get(range.file)?
            .text
            .get(range.start_byte..range.end_byte)
    }

    fn direct_callee<'m>(&'m self, node: &Self::Node<'m>) -> Option<Self::Callee<'m>> {
        node.callee.clone()
    }

    fn callee_kind<'m>(&'m self, callee: &Self::Callee<'m>) -> CalleeKind {
        callee.kind()
    }

    fn qualified_name<'m>(&'m self, callee: &Self::Callee<'m>) -> String {
        callee.qualified_name()
    }

    fn pretty_signature<'m>(&'m self, callee: &Self::Callee<'m>) -> String {
        callee.signature()
    }

    fn function_type<'m>(&'m self, callee: &Self::Callee<'m>) -> Option<FunctionProto> {
        callee.prototype()
    }
}

#[cfg(test)]
impl SourceFile {
    /// Parse a standalone in-memory file.
    pub(crate) fn parse_for_tests(name: &str, code: &str) -> Self {
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&tree_sitter_cpp::LANGUAGE.into())
            .expect("C++ grammar loads");
        let tree = parser.parse(code, None).expect("parse succeeds");
        Self {
            path: PathBuf::from(name),
            display_name: name.to_string(),
            text: code.to_string(),
            tree,
            is_system: false,
            line_map: LineMap::new(name, code),
            includes: HashMap::new(),
        }
    }
}

#[cfg(test)]
pub(crate) fn unit_for_tests(code: &str) -> TranslationUnit {
    TranslationUnit::new(vec![SourceFile::parse_for_tests("test.cpp", code)], Vec::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ExceptionSpec;

    /// (kind, qualified name, line, column, snippet, spec) per invocation with a callee.
    fn scan(code: &str) -> Vec<(InvocationKind, String, u32, u32, String, Option<ExceptionSpec>)> {
        let unit = unit_for_tests(code);
        unit.invocations()
            .filter_map(|node| {
                let callee = unit.direct_callee(&node)?;
                let location = unit.presumed_location(&node).expect("location");
                let snippet = unit
                    .source_text(&unit.source_range(&node))
                    .unwrap_or_default()
                    .to_string();
                Some((
                    unit.kind(&node),
                    unit.qualified_name(&callee),
                    location.line,
                    location.column,
                    snippet,
                    unit.function_type(&callee).map(|p| p.exception_spec),
                ))
            })
            .collect()
    }

    fn names(code: &str) -> Vec<(InvocationKind, String)> {
        scan(code)
            .into_iter()
            .map(|(kind, name, ..)| (kind, name))
            .collect()
    }

    #[test]
    fn test_free_call_location_and_spec() {
        let code = "void f() noexcept {}\nint main() {\n  f();\n}\n";
        let rows = scan(code);
        assert_eq!(rows.len(), 1);
        let (kind, name, line, column, snippet, spec) = &rows[0];
        assert_eq!(*kind, InvocationKind::Call);
        assert_eq!(name, "f");
        assert_eq!((*line, *column), (3, 3));
        assert_eq!(snippet, "f()");
        assert_eq!(*spec, Some(ExceptionSpec::NoexceptTrue));
    }

    #[test]
    fn test_construct_from_declaration() {
        let code = "class C {\npublic:\n  C(int) {}\n};\nvoid g() { C c(5); }\n";
        let rows = scan(code);
        assert_eq!(rows.len(), 1);
        let (kind, name, line, _, snippet, spec) = &rows[0];
        assert_eq!(*kind, InvocationKind::Construct);
        assert_eq!(name, "C::C");
        assert_eq!(*line, 5);
        assert_eq!(snippet, "c(5)");
        assert_eq!(*spec, Some(ExceptionSpec::None));
    }

    #[test]
    fn test_member_calls_and_namespaces() {
        let code = r#"
namespace util {
struct Counter {
    void bump() noexcept;
    static Counter make();
    int value() const;
};
void helper();
}
void run() {
    util::Counter counter = util::Counter::make();
    counter.bump();
    util::Counter* ptr = &counter;
    ptr->value();
    util::helper();
}
"#;
        assert_eq!(
            names(code),
            vec![
                (InvocationKind::Call, "util::Counter::make".to_string()),
                (InvocationKind::MemberCall, "util::Counter::bump".to_string()),
                (InvocationKind::MemberCall, "util::Counter::value".to_string()),
                (InvocationKind::Call, "util::helper".to_string()),
            ]
        );
    }

    #[test]
    fn test_operator_overloads() {
        let code = r#"
struct V {
    V operator-() const;
    V& operator+=(const V& other);
    int operator[](int i) const;
};
V operator+(const V& a, const V& b) noexcept;
void use(V a, V b, int x, int y) {
    V c = a + b;
    c += a;
    -c;
    c[0];
    x + y;
}
"#;
        let rows = scan(code);
        let kinds: Vec<_> = rows.iter().map(|r| (r.0, r.1.as_str())).collect();
        assert_eq!(
            kinds,
            vec![
                (InvocationKind::OperatorCall, "operator+"),
                (InvocationKind::OperatorCall, "V::operator+="),
                (InvocationKind::OperatorCall, "V::operator-"),
                (InvocationKind::OperatorCall, "V::operator[]"),
            ]
        );
        let plus = &rows[0];
        assert_eq!(plus.4, "a + b");
        assert_eq!(plus.5, Some(ExceptionSpec::NoexceptTrue));
        assert_eq!(plus.3, 13, "operator location is the operator token");
    }

    #[test]
    fn test_external_callees_keep_template_arguments() {
        let code = r#"
#include <vector>
void fill() {
    std::vector<int> values;
    values.push_back(1);
    std::sort(values.begin(), values.end());
}
"#;
        assert_eq!(
            names(code),
            vec![
                (InvocationKind::Construct, "std::vector<int>::vector".to_string()),
                (InvocationKind::MemberCall, "std::vector<int>::push_back".to_string()),
                (InvocationKind::Call, "std::sort".to_string()),
                (InvocationKind::MemberCall, "std::vector<int>::begin".to_string()),
                (InvocationKind::MemberCall, "std::vector<int>::end".to_string()),
            ]
        );
    }

    #[test]
    fn test_indirect_calls_have_no_callee() {
        let code = r#"
void target();
void run(void (*fp)()) {
    fp();
    auto lambda = [] {};
    lambda();
    (*fp)();
}
"#;
        let unit = unit_for_tests(code);
        let nodes: Vec<_> = unit.invocations().collect();
        assert_eq!(nodes.len(), 3);
        assert!(nodes.iter().all(|n| unit.direct_callee(n).is_none()));
        assert!(nodes.iter().all(|n| unit.kind(n) == InvocationKind::Call));
    }

    #[test]
    fn test_implicit_and_aggregate_construction() {
        let code = r#"
struct Plain { int a; int b; };
struct Holder { Plain p; };
void run(const Plain& other) {
    Plain x;
    Plain y{1, 2};
    Plain z = other;
}
"#;
        let rows = scan(code);
        let summary: Vec<_> = rows.iter().map(|r| (r.1.as_str(), r.5)).collect();
        assert_eq!(
            summary,
            vec![
                ("Plain::Plain", Some(ExceptionSpec::NoexceptTrue)),
                ("Plain::Plain", Some(ExceptionSpec::NoexceptTrue)),
            ]
        );
        let unit = unit_for_tests(code);
        let callee = unit
            .invocations()
            .filter_map(|n| unit.direct_callee(&n))
            .last()
            .expect("copy construction");
        assert_eq!(unit.pretty_signature(&callee), "Plain(const Plain &)");
    }

    #[test]
    fn test_implicit_constructor_spec_follows_members() {
        let code = r#"
struct Loud { Loud(); Loud(const Loud&) noexcept; };
struct Quiet { Quiet() noexcept; };
struct Mixed { Quiet q; Loud l; };
struct Calm : Quiet { int n; std::size_t size; };
struct Opaque { std::string text; };
void run(const Mixed& other) {
    Mixed a;
    Mixed b(other);
    Calm c;
    Opaque d;
}
"#;
        let rows = scan(code);
        let summary: Vec<_> = rows.iter().map(|r| (r.1.as_str(), r.5)).collect();
        assert_eq!(
            summary,
            vec![
                ("Mixed::Mixed", Some(ExceptionSpec::NoexceptFalse)),
                ("Mixed::Mixed", Some(ExceptionSpec::NoexceptTrue)),
                ("Calm::Calm", Some(ExceptionSpec::NoexceptTrue)),
                ("Opaque::Opaque", Some(ExceptionSpec::Unresolved)),
            ]
        );
    }

    #[test]
    fn test_overloads_ranked_by_argument_types() {
        let code = r#"
struct W {
    W(int) {}
    W(const W&) noexcept {}
};
struct Base {};
struct Derived : Base {};
void take(int) {}
void take(const char*) noexcept {}
void visit(int);
void visit(const Base&) noexcept;
void run() {
    W a(1);
    W b(a);
    take("x");
    take(2);
    Derived d;
    visit(d);
}
"#;
        let unit = unit_for_tests(code);
        let rows: Vec<_> = unit
            .invocations()
            .filter_map(|node| {
                let callee = unit.direct_callee(&node)?;
                Some((
                    unit.source_text(&unit.source_range(&node))?.to_string(),
                    unit.pretty_signature(&callee),
                    unit.function_type(&callee).map(|p| p.exception_spec),
                ))
            })
            .collect();
        let expected = [
            ("a(1)", "W(int)", Some(ExceptionSpec::None)),
            ("b(a)", "W(const W&) noexcept", Some(ExceptionSpec::NoexceptTrue)),
            ("take(\"x\")", "void take(const char*) noexcept", Some(ExceptionSpec::NoexceptTrue)),
            ("take(2)", "void take(int)", Some(ExceptionSpec::None)),
            ("d", "Derived()", Some(ExceptionSpec::NoexceptTrue)),
            ("visit(d)", "void visit(const Base&) noexcept", Some(ExceptionSpec::NoexceptTrue)),
        ];
        let actual: Vec<_> = rows
            .iter()
            .map(|(snippet, signature, spec)| (snippet.as_str(), signature.as_str(), *spec))
            .collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_copy_without_declared_copy_constructor_is_implicit() {
        let code = r#"
struct Tag { Tag(int) noexcept; };
void run(const Tag& other) { Tag copy(other); }
"#;
        let unit = unit_for_tests(code);
        let callee = unit
            .invocations()
            .find_map(|n| unit.direct_callee(&n))
            .expect("copy construction");
        assert_eq!(unit.pretty_signature(&callee), "Tag(const Tag &)");
        assert_eq!(
            unit.function_type(&callee).map(|p| p.exception_spec),
            Some(ExceptionSpec::NoexceptTrue)
        );
    }

    #[test]
    fn test_ambiguous_overloads_are_dropped() {
        let code = r#"
void pick(long);
void pick(short) noexcept;
void pick(long) {}
void keep(double);
void run() {
    pick(1);
    keep(1);
}
"#;
        let unit = unit_for_tests(code);
        let calls: Vec<_> = unit.invocations().collect();
        assert_eq!(calls.len(), 2);
        let bound: Vec<_> = calls
            .iter()
            .map(|n| unit.direct_callee(n).map(|c| unit.pretty_signature(&c)))
            .collect();
        assert_eq!(bound[0], None);
        assert_eq!(bound[1].as_deref(), Some("void keep(double)"));
    }

    #[test]
    fn test_constructor_callee_kind_and_members() {
        let code = r#"
namespace geo {
struct Base { Base(int) noexcept; };
struct Point : Base {
    Point() : Base(1), tag_("p") {}
    int length() const;
    int twice() const { return length() * 2; }
    Label tag_;
};
}
"#;
        let unit = unit_for_tests(code);
        let callees: Vec<_> = unit
            .invocations()
            .filter_map(|n| Some((unit.kind(&n), unit.direct_callee(&n)?)))
            .collect();
        assert_eq!(callees.len(), 2);
        assert_eq!(callees[0].0, InvocationKind::Construct);
        assert_eq!(
            unit.callee_kind(&callees[0].1),
            CalleeKind::Constructor {
                parent_qualified_name: "geo::Base".to_string(),
                class_name: "Base".to_string(),
            }
        );
        assert_eq!(callees[1].0, InvocationKind::MemberCall);
        assert_eq!(unit.qualified_name(&callees[1].1), "geo::Point::length");
    }

    #[test]
    fn test_line_directive_remaps_location() {
        let code = "void f();\n#line 100 \"generated.cpp\"\nvoid g() { f(); }\n";
        let unit = unit_for_tests(code);
        let node = unit.invocations().next().expect("one call");
        let location = unit.presumed_location(&node).expect("location");
        assert_eq!(location.file, "generated.cpp");
        assert_eq!(location.line, 100);
        assert_eq!(location.column, 12);
    }

    #[test]
    fn test_traversal_is_document_order() {
        let code = "void a();\nvoid b(int);\nint c();\nvoid run() { a(); b(c()); }\n";
        assert_eq!(
            names(code),
            vec![
                (InvocationKind::Call, "a".to_string()),
                (InvocationKind::Call, "b".to_string()),
                (InvocationKind::Call, "c".to_string()),
            ]
        );
    }
}
