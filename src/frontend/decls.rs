//! Declaration index over every loaded file of a translation unit.
//!
//! The index walks declaration scopes only (namespaces, classes, linkage
//! blocks, templates); function bodies are never entered. Included files
//! are indexed at their include point so declaration order follows the
//! preprocessed unit.

use crate::frontend::syntax::{self, DeclaratorShape, declarator_shape, named_children, text};
use crate::frontend::types::{QualifiedName, join_scope, normalize_type, scope_prefixes};
use crate::frontend::unit::SourceFile;
use crate::model::ExceptionSpec;
use std::collections::{HashMap, HashSet};
use tree_sitter::Node;

pub const ANONYMOUS_NAMESPACE: &str = "(anonymous namespace)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionRole {
    Free,
    Method { is_static: bool },
    Constructor,
}

/// A type as written at a declaration, looked up from `scope`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRef {
    pub name: String,
    pub scope: String,
    pub indirection: u8,
    pub reference: bool,
    /// Function pointer or similar callable declarator
    pub callable: bool,
}

impl TypeRef {
    pub fn new(name: &str, scope: &str) -> Self {
        Self {
            name: normalize_type(name),
            scope: scope.to_string(),
            indirection: 0,
            reference: false,
            callable: false,
        }
    }

    fn from_shape(type_text: &str, scope: &str, shape: &DeclaratorShape) -> Self {
        Self {
            indirection: shape.indirection,
            reference: shape.reference,
            callable: shape.function_pointer,
            ..Self::new(type_text, scope)
        }
    }

    pub fn is_auto(&self) -> bool {
        matches!(self.name.as_str(), "auto" | "decltype(auto)")
    }
}

#[derive(Debug, Clone)]
pub struct FunctionDecl {
    /// Unqualified name, operators normalized (`operator+`)
    pub name: String,
    /// Lookup key of the enclosing scope, no template arguments
    pub scope: String,
    pub role: FunctionRole,
    pub min_params: usize,
    /// `None` for variadic functions
    pub max_params: Option<usize>,
    /// Declared parameter types, pointer and reference shape included
    pub params: Vec<TypeRef>,
    pub return_type: Option<TypeRef>,
    /// Declaration text up to the end of the declarator, whitespace collapsed
    pub signature: String,
    pub exception_spec: ExceptionSpec,
    pub file: usize,
    is_static: bool,
}

impl FunctionDecl {
    pub fn key(&self) -> String {
        join_scope(&self.scope, &self.name)
    }

    pub fn accepts(&self, arity: usize) -> bool {
        arity >= self.min_params && self.max_params.is_none_or(|max| arity <= max)
    }
}

#[derive(Debug, Clone)]
pub struct ClassDecl {
    pub name: String,
    /// Lookup key, e.g. `geo::Point`
    pub qualified_name: String,
    pub bases: Vec<String>,
    pub fields: Vec<(String, TypeRef)>,
    pub is_template: bool,
    pub has_user_constructor: bool,
    pub file: usize,
}

impl ClassDecl {
    pub fn field(&self, name: &str) -> Option<&TypeRef> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, ty)| ty)
    }

    /// Key of the scope enclosing the class.
    pub fn parent_scope(&self) -> &str {
        match self.qualified_name.rfind("::") {
            Some(pos) => &self.qualified_name[..pos],
            None => "",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsingDirective {
    /// Scope key where the directive appears
    pub scope: String,
    /// Namespace as written
    pub namespace: String,
}

#[derive(Debug, Default)]
pub struct DeclIndex {
    functions: Vec<FunctionDecl>,
    by_key: HashMap<String, Vec<usize>>,
    classes: HashMap<String, ClassDecl>,
    aliases: HashMap<String, TypeRef>,
    namespace_aliases: HashMap<String, String>,
    variables: HashMap<String, TypeRef>,
    namespaces: HashSet<String>,
    using_directives: Vec<UsingDirective>,
    using_declarations: HashMap<String, String>,
}

impl DeclIndex {
    /// Index `files`, starting from the main file at index 0.
    pub fn build(files: &[SourceFile]) -> Self {
        let mut builder = IndexBuilder {
            files,
            index: DeclIndex::default(),
            visited: HashSet::new(),
        };
        if !files.is_empty() {
            builder.visited.insert(0);
            builder.visit(0, files[0].tree.root_node(), &Scope::default(), false);
        }
        builder.index.finalize();
        builder.index
    }

    /// Overloads registered under a qualified lookup key.
    pub fn functions<'a>(&'a self, key: &str) -> impl Iterator<Item = &'a FunctionDecl> + use<'a> {
        self.by_key
            .get(key)
            .into_iter()
            .flatten()
            .map(|&id| &self.functions[id])
    }

    pub fn has_functions(&self, key: &str) -> bool {
        self.by_key.contains_key(key)
    }

    pub fn class(&self, key: &str) -> Option<&ClassDecl> {
        self.classes.get(key)
    }

    pub fn alias(&self, key: &str) -> Option<&TypeRef> {
        self.aliases.get(key)
    }

    pub fn variable(&self, key: &str) -> Option<&TypeRef> {
        self.variables.get(key)
    }

    pub fn is_namespace(&self, key: &str) -> bool {
        self.namespaces.contains(key)
    }

    /// Expand a namespace alias at the head of `name` (`fs::path` → `std::filesystem::path`).
    pub fn expand_namespace_alias(&self, name: &str) -> String {
        match name.split_once("::") {
            Some((head, rest)) => match self.namespace_aliases.get(head) {
                Some(target) => format!("{target}::{rest}"),
                None => name.to_string(),
            },
            None => name.to_string(),
        }
    }

    /// `using namespace` directives whose scope encloses `scope`.
    pub fn visible_directives<'a>(
        &'a self,
        scope: &'a str,
    ) -> impl Iterator<Item = &'a str> + 'a {
        self.using_directives
            .iter()
            .filter(move |d| scope_encloses(&d.scope, scope))
            .map(|d| d.namespace.as_str())
    }

    /// Target of a `using ns::name;` declaration registered under `key`.
    pub fn using_declaration(&self, key: &str) -> Option<&str> {
        self.using_declarations.get(key).map(String::as_str)
    }

    pub fn function_count(&self) -> usize {
        self.functions.len()
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    fn add_function(&mut self, decl: FunctionDecl) {
        let key = decl.key();
        self.by_key
            .entry(key)
            .or_default()
            .push(self.functions.len());
        self.functions.push(decl);
    }

    fn finalize(&mut self) {
        let static_keys: HashSet<String> = self
            .functions
            .iter()
            .filter(|f| f.is_static)
            .map(FunctionDecl::key)
            .collect();

        for function in &mut self.functions {
            let Some(class) = self.classes.get_mut(&function.scope) else {
                continue;
            };
            if function.name == class.name {
                function.role = FunctionRole::Constructor;
                class.has_user_constructor = true;
            } else {
                function.role = FunctionRole::Method {
                    is_static: static_keys.contains(&function.key()),
                };
            }
        }
    }
}

/// Whether `outer` is `inner` or one of its enclosing scopes.
pub fn scope_encloses(outer: &str, inner: &str) -> bool {
    outer.is_empty()
        || inner == outer
        || inner
            .strip_prefix(outer)
            .is_some_and(|rest| rest.starts_with("::"))
}

#[derive(Debug, Clone, Default)]
struct Scope {
    namespace: String,
    class: Option<String>,
}

impl Scope {
    fn current(&self) -> &str {
        self.class.as_deref().unwrap_or(&self.namespace)
    }

    fn enter_namespace(&self, name: &str) -> Scope {
        Scope {
            namespace: join_scope(&self.namespace, name),
            class: None,
        }
    }

    fn enter_class(&self, key: &str) -> Scope {
        Scope {
            namespace: self.namespace.clone(),
            class: Some(key.to_string()),
        }
    }

    fn outside_class(&self) -> Scope {
        Scope {
            namespace: self.namespace.clone(),
            class: None,
        }
    }
}

struct IndexBuilder<'a> {
    files: &'a [SourceFile],
    index: DeclIndex,
    visited: HashSet<usize>,
}

impl<'a> IndexBuilder<'a> {
    fn source(&self, file: usize) -> &'a str {
        &self.files[file].text
    }

    fn visit(&mut self, file: usize, node: Node<'a>, scope: &Scope, is_template: bool) {
        match node.kind() {
            "translation_unit" | "declaration_list" | "field_declaration_list" | "preproc_if"
            | "preproc_ifdef" | "preproc_else" | "preproc_elif" | "preproc_elifdef" => {
                for child in named_children(node) {
                    self.visit(file, child, scope, false);
                }
            }
            "preproc_include" => {
                if let Some(&target) = self.files[file].includes.get(&node.start_byte())
                    && self.visited.insert(target)
                {
                    let root = self.files[target].tree.root_node();
                    self.visit(target, root, scope, false);
                }
            }
            "namespace_definition" => self.visit_namespace(file, node, scope),
            "namespace_alias_definition" => self.add_namespace_alias(file, node),
            "linkage_specification" => {
                if let Some(body) = node.child_by_field_name("body") {
                    self.visit(file, body, scope, is_template);
                }
            }
            "template_declaration" => {
                for child in named_children(node) {
                    if child.kind() != "template_parameter_list" {
                        self.visit(file, child, scope, true);
                    }
                }
            }
            "class_specifier" | "struct_specifier" | "union_specifier" => {
                self.add_class(file, node, scope, is_template, None);
            }
            "function_definition" => {
                if let Some(declarator) = node.child_by_field_name("declarator") {
                    let shape = declarator_shape(declarator);
                    if shape.is_function() {
                        self.add_function(file, node, &shape, scope);
                    }
                }
            }
            "declaration" | "field_declaration" => {
                self.add_declaration(file, node, scope, is_template)
            }
            "alias_declaration" => {
                let source = self.source(file);
                if let (Some(name), Some(ty)) = (
                    node.child_by_field_name("name"),
                    node.child_by_field_name("type"),
                ) {
                    let key = join_scope(scope.current(), text(name, source));
                    let target = TypeRef::new(text(ty, source), scope.current());
                    self.index.aliases.insert(key, target);
                }
            }
            "type_definition" => self.add_typedef(file, node, scope),
            "using_declaration" => self.add_using(file, node, scope),
            "friend_declaration" => {
                // Friend functions belong to the enclosing namespace.
                let outer = scope.outside_class();
                for child in named_children(node) {
                    if matches!(child.kind(), "declaration" | "function_definition") {
                        self.visit(file, child, &outer, is_template);
                    }
                }
            }
            _ => {}
        }
    }

    fn visit_namespace(&mut self, file: usize, node: Node<'a>, scope: &Scope) {
        let source = self.source(file);
        let name = node
            .child_by_field_name("name")
            .map(|n| normalize_type(text(n, source)))
            .unwrap_or_else(|| ANONYMOUS_NAMESPACE.to_string());

        let inner = scope.enter_namespace(&name);
        // `namespace a::b` registers both levels.
        let mut key = scope.namespace.clone();
        for segment in name.split("::") {
            key = join_scope(&key, segment);
            self.index.namespaces.insert(key.clone());
        }

        if let Some(body) = node.child_by_field_name("body") {
            self.visit(file, body, &inner, false);
        }
    }

    fn add_namespace_alias(&mut self, file: usize, node: Node<'a>) {
        let source = self.source(file);
        let children = named_children(node);
        if let [name, target, ..] = children.as_slice() {
            let target = normalize_type(text(*target, source));
            let target = target.trim_start_matches("::").to_string();
            self.index
                .namespace_aliases
                .insert(text(*name, source).to_string(), target);
        }
    }

    fn add_class(
        &mut self,
        file: usize,
        node: Node<'a>,
        scope: &Scope,
        is_template: bool,
        typedef_name: Option<&str>,
    ) -> Option<String> {
        let source = self.source(file);
        let body = node.child_by_field_name("body")?;

        let name = match node.child_by_field_name("name") {
            Some(name) => QualifiedName::parse(text(name, source)),
            None => QualifiedName::parse(typedef_name?),
        };
        let key = join_scope(scope.current(), &name.key);

        let bases = named_children(node)
            .into_iter()
            .filter(|child| child.kind() == "base_class_clause")
            .flat_map(named_children)
            .filter(|base| !matches!(base.kind(), "access_specifier" | "virtual"))
            .map(|base| normalize_type(text(base, source)))
            .collect();

        self.index
            .classes
            .entry(key.clone())
            .or_insert_with(|| ClassDecl {
                name: name.last.clone(),
                qualified_name: key.clone(),
                bases,
                fields: Vec::new(),
                is_template,
                has_user_constructor: false,
                file,
            });

        let inner = scope.enter_class(&key);
        self.visit(file, body, &inner, false);
        Some(key)
    }

    fn add_declaration(&mut self, file: usize, node: Node<'a>, scope: &Scope, is_template: bool) {
        let source = self.source(file);
        let type_node = node.child_by_field_name("type");

        if let Some(ty) = type_node
            && matches!(
                ty.kind(),
                "class_specifier" | "struct_specifier" | "union_specifier"
            )
        {
            self.add_class(file, ty, scope, is_template, None);
        }

        let type_text = type_node.map(|t| text(t, source)).unwrap_or_default();

        for declarator in syntax::field_children(node, "declarator") {
            let shape = declarator_shape(declarator);
            if shape.is_function() {
                self.add_function(file, node, &shape, scope);
                continue;
            }
            let Some(name) = shape.name else { continue };
            let name = text(name, source).to_string();
            let ty = TypeRef::from_shape(type_text, scope.current(), &shape);

            match &scope.class {
                Some(class) => {
                    if let Some(class) = self.index.classes.get_mut(class) {
                        class.fields.push((name, ty));
                    }
                }
                None => {
                    self.index
                        .variables
                        .insert(join_scope(&scope.namespace, &name), ty);
                }
            }
        }
    }

    fn add_typedef(&mut self, file: usize, node: Node<'a>, scope: &Scope) {
        let source = self.source(file);
        let Some(ty) = node.child_by_field_name("type") else {
            return;
        };
        let declarators = syntax::field_children(node, "declarator");
        let first_name = declarators
            .first()
            .and_then(|d| declarator_shape(*d).name)
            .map(|n| text(n, source));

        let mut type_text = text(ty, source).to_string();
        if matches!(
            ty.kind(),
            "class_specifier" | "struct_specifier" | "union_specifier"
        ) {
            match self.add_class(file, ty, scope, false, first_name) {
                Some(key) => type_text = key,
                None => return,
            }
        }

        for declarator in declarators {
            let shape = declarator_shape(declarator);
            let Some(name) = shape.name else { continue };
            let name = text(name, source);
            let key = join_scope(scope.current(), name);
            if type_text == key {
                continue;
            }
            let target = TypeRef::from_shape(&type_text, scope.current(), &shape);
            self.index.aliases.insert(key, target);
        }
    }

    fn add_using(&mut self, file: usize, node: Node<'a>, scope: &Scope) {
        let source = self.source(file);
        let is_directive = {
            let mut cursor = node.walk();
            node.children(&mut cursor)
                .any(|child| child.kind() == "namespace")
        };
        let Some(target) = named_children(node).into_iter().last() else {
            return;
        };
        let target = normalize_type(text(target, source));
        let target = target.trim_start_matches("::").to_string();

        if is_directive {
            self.index.using_directives.push(UsingDirective {
                scope: scope.current().to_string(),
                namespace: target,
            });
        } else {
            let name = QualifiedName::parse(&target);
            self.index
                .using_declarations
                .insert(join_scope(scope.current(), &name.last), name.key);
        }
    }

    fn add_function(&mut self, file: usize, decl: Node<'a>, shape: &DeclaratorShape<'a>, scope: &Scope) {
        let source = self.source(file);
        let (Some(function), Some(name_node)) = (shape.function, shape.name) else {
            return;
        };

        let (name, owner) = match name_node.kind() {
            "destructor_name" => return,
            "operator_name" => (syntax::normalize_operator_name(text(name_node, source)), None),
            "qualified_identifier" => {
                let qualified = QualifiedName::parse(text(name_node, source));
                if qualified.last.starts_with('~') {
                    return;
                }
                let last = if qualified.last.starts_with("operator") {
                    syntax::normalize_operator_name(&qualified.last)
                } else {
                    qualified.last.clone()
                };
                (last, Some(self.resolve_owner(qualified.key_scope(), scope)))
            }
            "template_function" => {
                let base = name_node
                    .child_by_field_name("name")
                    .map(|n| text(n, source))
                    .unwrap_or_default();
                (base.to_string(), None)
            }
            _ => (text(name_node, source).to_string(), None),
        };
        if name.is_empty() {
            return;
        }
        let owner = owner.unwrap_or_else(|| scope.current().to_string());

        let (min_params, max_params) = syntax::parameter_arity(function, source);
        let params = function
            .child_by_field_name("parameters")
            .map(named_children)
            .unwrap_or_default()
            .into_iter()
            .filter(|param| matches!(param.kind(), "parameter_declaration" | "optional_parameter_declaration"))
            .take(max_params.unwrap_or(usize::MAX))
            .filter_map(|param| {
                let ty = param.child_by_field_name("type")?;
                let shape = param
                    .child_by_field_name("declarator")
                    .map(declarator_shape)
                    .unwrap_or_default();
                let mut param_type = TypeRef::from_shape(text(ty, source), &owner, &shape);
                // Array parameters decay to pointers.
                if shape.array {
                    param_type.indirection = param_type.indirection.saturating_add(1);
                }
                Some(param_type)
            })
            .collect();

        let return_type = return_type(decl, function, source).map(|ty| TypeRef {
            indirection: shape.indirection,
            reference: shape.reference,
            ..TypeRef::new(ty, &owner)
        });

        let signature_start = decl.start_byte();
        let signature_end = function.end_byte().max(signature_start);
        let signature =
            syntax::collapse_whitespace(source.get(signature_start..signature_end).unwrap_or(""));

        let is_static = named_children(decl).into_iter().any(|child| {
            child.kind() == "storage_class_specifier" && text(child, source) == "static"
        });

        self.index.add_function(FunctionDecl {
            name,
            scope: owner,
            role: FunctionRole::Free,
            min_params,
            max_params,
            params,
            return_type,
            signature,
            exception_spec: exception_spec(function, source),
            file,
            is_static,
        });
    }

    /// Resolve the written qualifier of an out-of-line definition.
    fn resolve_owner(&self, qualifier: &str, scope: &Scope) -> String {
        if qualifier.is_empty() {
            return scope.current().to_string();
        }
        scope_prefixes(scope.current())
            .into_iter()
            .map(|prefix| join_scope(&prefix, qualifier))
            .find(|key| self.index.classes.contains_key(key) || self.index.namespaces.contains(key))
            .unwrap_or_else(|| join_scope(scope.current(), qualifier))
    }
}

fn return_type<'s>(decl: Node, function: Node, source: &'s str) -> Option<&'s str> {
    let written = decl.child_by_field_name("type").map(|t| text(t, source));
    let trailing = named_children(function)
        .into_iter()
        .find(|child| child.kind() == "trailing_return_type")
        .and_then(|trailing| named_children(trailing).into_iter().last())
        .map(|ty| text(ty, source));

    match (written, trailing) {
        (Some("auto"), Some(trailing)) => Some(trailing),
        (written, _) => written,
    }
}

/// Exception specification attached to a function declarator.
pub fn exception_spec(function: Node, source: &str) -> ExceptionSpec {
    for child in named_children(function) {
        match child.kind() {
            "noexcept" => {
                return match named_children(child).into_iter().next() {
                    None => ExceptionSpec::NoexceptTrue,
                    Some(expr) => match evaluate_bool(expr, source) {
                        Some(true) => ExceptionSpec::NoexceptTrue,
                        Some(false) => ExceptionSpec::NoexceptFalse,
                        None => ExceptionSpec::Unresolved,
                    },
                };
            }
            "throw_specifier" => {
                return if named_children(child).is_empty() {
                    ExceptionSpec::DynamicNone
                } else {
                    ExceptionSpec::Dynamic
                };
            }
            _ => {}
        }
    }
    ExceptionSpec::None
}

/// Constant-fold the boolean subset accepted in `noexcept(...)`.
fn evaluate_bool(expr: Node, source: &str) -> Option<bool> {
    match expr.kind() {
        "true" => Some(true),
        "false" => Some(false),
        "number_literal" => Some(text(expr, source).trim_start_matches('0') != ""),
        "parenthesized_expression" => evaluate_bool(named_children(expr).into_iter().next()?, source),
        "unary_expression" => {
            let operator = expr.child_by_field_name("operator")?;
            let argument = expr.child_by_field_name("argument")?;
            match text(operator, source) {
                "!" | "not" => evaluate_bool(argument, source).map(|value| !value),
                _ => None,
            }
        }
        "binary_expression" => {
            let operator = expr.child_by_field_name("operator")?;
            let left = evaluate_bool(expr.child_by_field_name("left")?, source)?;
            let right = evaluate_bool(expr.child_by_field_name("right")?, source)?;
            match text(operator, source) {
                "&&" | "and" => Some(left && right),
                "||" | "or" => Some(left || right),
                "==" => Some(left == right),
                "!=" => Some(left != right),
                _ => None,
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::unit::SourceFile;

    fn index(code: &str) -> DeclIndex {
        let file = SourceFile::parse_for_tests("test.cpp", code);
        DeclIndex::build(std::slice::from_ref(&file))
    }

    fn only<'a>(index: &'a DeclIndex, key: &str) -> &'a FunctionDecl {
        let found: Vec<_> = index.functions(key).collect();
        assert_eq!(found.len(), 1, "expected one declaration of {key}");
        found[0]
    }

    #[test]
    fn test_namespaces_and_free_functions() {
        let idx = index(
            r#"
namespace util {
    void helper() noexcept;
    namespace {
        int hidden(int a, int b = 1) { return a + b; }
    }
}
namespace a::b { void deep(...); }
"#,
        );

        let helper = only(&idx, "util::helper");
        assert_eq!(helper.role, FunctionRole::Free);
        assert_eq!(helper.exception_spec, ExceptionSpec::NoexceptTrue);
        assert_eq!(helper.signature, "void helper() noexcept");

        let hidden = only(&idx, "util::(anonymous namespace)::hidden");
        assert!(hidden.accepts(1));
        assert!(hidden.accepts(2));
        assert!(!hidden.accepts(3));
        let names: Vec<_> = hidden.params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["int", "int"]);

        let deep = only(&idx, "a::b::deep");
        assert!(deep.accepts(7));
        assert!(idx.is_namespace("a::b"));
    }

    #[test]
    fn test_class_members_and_constructors() {
        let idx = index(
            r#"
namespace geo {
struct Base { void base_method(); };
class Point : public Base {
public:
    Point(int x, int y) noexcept(false);
    static Point origin();
    int length() const throw();
    Point operator+(const Point& other) const noexcept;
private:
    int x_;
    Base* parent_;
};
Point Point::origin() { return Point(0, 0); }
}
"#,
        );

        let class = idx.class("geo::Point").expect("class indexed");
        assert_eq!(class.name, "Point");
        assert_eq!(class.bases, vec!["Base".to_string()]);
        assert!(class.has_user_constructor);
        assert_eq!(class.field("x_").map(|t| t.name.as_str()), Some("int"));
        assert_eq!(class.field("parent_").map(|t| t.indirection), Some(1));

        let ctor = only(&idx, "geo::Point::Point");
        assert_eq!(ctor.role, FunctionRole::Constructor);
        assert_eq!(ctor.exception_spec, ExceptionSpec::NoexceptFalse);

        let length = only(&idx, "geo::Point::length");
        assert_eq!(length.role, FunctionRole::Method { is_static: false });
        assert_eq!(length.exception_spec, ExceptionSpec::DynamicNone);

        let plus = only(&idx, "geo::Point::operator+");
        assert_eq!(plus.name, "operator+");
        assert_eq!(plus.exception_spec, ExceptionSpec::NoexceptTrue);
        assert_eq!(plus.params.len(), 1);
        assert_eq!(plus.params[0].name, "Point");
        assert!(plus.params[0].reference);

        let origins: Vec<_> = idx.functions("geo::Point::origin").collect();
        assert_eq!(origins.len(), 2);
        assert!(
            origins
                .iter()
                .all(|f| f.role == FunctionRole::Method { is_static: true })
        );
    }

    #[test]
    fn test_conditional_noexcept_evaluation() {
        let idx = index(
            r#"
void a() noexcept(true);
void b() noexcept(!false && (true || false));
void c() noexcept(sizeof(int) > 2);
void d() throw(int);
template <typename T> void e() noexcept(noexcept(T()));
"#,
        );
        assert_eq!(only(&idx, "a").exception_spec, ExceptionSpec::NoexceptTrue);
        assert_eq!(only(&idx, "b").exception_spec, ExceptionSpec::NoexceptTrue);
        assert_eq!(only(&idx, "c").exception_spec, ExceptionSpec::Unresolved);
        assert_eq!(only(&idx, "d").exception_spec, ExceptionSpec::Dynamic);
        assert_eq!(only(&idx, "e").exception_spec, ExceptionSpec::Unresolved);
    }

    #[test]
    fn test_aliases_globals_and_using() {
        let idx = index(
            r#"
namespace fs = std::filesystem;
struct Widget {};
using W = Widget;
typedef struct { int v; } Plain;
Widget global_widget;
namespace app {
    using namespace std;
    using std::swap;
}
"#,
        );
        assert_eq!(idx.alias("W").map(|t| t.name.as_str()), Some("Widget"));
        assert!(idx.class("Plain").is_some());
        assert_eq!(
            idx.variable("global_widget").map(|t| t.name.as_str()),
            Some("Widget")
        );
        assert_eq!(idx.expand_namespace_alias("fs::exists"), "std::filesystem::exists");
        assert_eq!(
            idx.visible_directives("app::inner").collect::<Vec<_>>(),
            vec!["std"]
        );
        assert_eq!(idx.visible_directives("other").count(), 0);
        assert_eq!(idx.using_declaration("app::swap"), Some("std::swap"));
    }

    #[test]
    fn test_friend_operator_lives_in_namespace() {
        let idx = index(
            r#"
namespace m {
struct V {
    friend V operator*(V a, V b) noexcept { return a; }
};
}
"#,
        );
        let op = only(&idx, "m::operator*");
        assert_eq!(op.role, FunctionRole::Free);
        assert_eq!(op.min_params, 2);
    }

    #[test]
    fn test_scope_encloses() {
        assert!(scope_encloses("", "a::b"));
        assert!(scope_encloses("a", "a::b"));
        assert!(scope_encloses("a::b", "a::b"));
        assert!(!scope_encloses("a", "ab::c"));
    }
}
