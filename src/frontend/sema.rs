//! Semantic analysis of invocation candidates.
//!
//! Every syntactic candidate (call, operator expression, declaration,
//! `new`, member initializer) is classified into exactly one
//! [`InvocationKind`] and, where name lookup succeeds, bound to a direct
//! callee. Lookup is scope-based: enclosing classes and their bases,
//! enclosing namespaces, `using` directives and declarations. Types are
//! inferred from declarations only, never from template instantiation.

use crate::frontend::decls::{ANONYMOUS_NAMESPACE, ClassDecl, DeclIndex, FunctionDecl, FunctionRole, TypeRef};
use crate::frontend::syntax::{self, DeclaratorShape, declarator_shape, named_children, text};
use crate::frontend::types::{self, QualifiedName, join_scope, scope_prefixes};
use crate::frontend::unit::SourceFile;
use crate::model::{CalleeKind, ExceptionSpec, FunctionProto, InvocationKind};
use tree_sitter::Node;

const MAX_DEPTH: u8 = 16;

const CAST_KEYWORDS: &[&str] = &[
    "static_cast",
    "dynamic_cast",
    "reinterpret_cast",
    "const_cast",
];

/// Statically bound target of an invocation.
#[derive(Debug, Clone)]
pub enum CalleeTarget<'u> {
    Declared(&'u FunctionDecl),
    /// Default (`arity` 0) or copy constructor the class never declares
    ImplicitConstructor {
        arity: usize,
        exception_spec: ExceptionSpec,
    },
    /// Declaration not present in the loaded sources
    External { constructor: bool, member: bool },
}

#[derive(Debug, Clone)]
pub struct Callee<'u> {
    pub target: CalleeTarget<'u>,
    /// Display spelling of the owning scope, template arguments kept
    pub scope: String,
    pub name: String,
}

impl<'u> Callee<'u> {
    fn declared(decl: &'u FunctionDecl, scope: String) -> Self {
        Self {
            target: CalleeTarget::Declared(decl),
            scope,
            name: decl.name.clone(),
        }
    }

    fn external(scope: &str, name: &str, constructor: bool, member: bool) -> Self {
        Self {
            target: CalleeTarget::External {
                constructor,
                member,
            },
            scope: scope.to_string(),
            name: name.to_string(),
        }
    }

    pub fn qualified_name(&self) -> String {
        join_scope(&self.scope, &self.name)
    }

    pub fn kind(&self) -> CalleeKind {
        let constructor = || CalleeKind::Constructor {
            parent_qualified_name: self.scope.clone(),
            class_name: self.name.clone(),
        };
        match &self.target {
            CalleeTarget::Declared(decl) => match decl.role {
                FunctionRole::Constructor => constructor(),
                FunctionRole::Method { .. } => CalleeKind::Method,
                FunctionRole::Free => CalleeKind::Function,
            },
            CalleeTarget::ImplicitConstructor { .. } => constructor(),
            CalleeTarget::External {
                constructor: true, ..
            } => constructor(),
            CalleeTarget::External { member: true, .. } => CalleeKind::Method,
            CalleeTarget::External { .. } => CalleeKind::Function,
        }
    }

    pub fn signature(&self) -> String {
        match &self.target {
            CalleeTarget::Declared(decl) => decl.signature.clone(),
            CalleeTarget::ImplicitConstructor { arity: 0, .. } => format!("{}()", self.name),
            CalleeTarget::ImplicitConstructor { .. } => {
                format!("{name}(const {name} &)", name = self.name)
            }
            CalleeTarget::External { .. } => String::new(),
        }
    }

    pub fn prototype(&self) -> Option<FunctionProto> {
        match &self.target {
            CalleeTarget::Declared(decl) => Some(FunctionProto {
                exception_spec: decl.exception_spec,
            }),
            CalleeTarget::ImplicitConstructor { exception_spec, .. } => Some(FunctionProto {
                exception_spec: *exception_spec,
            }),
            CalleeTarget::External { .. } => None,
        }
    }
}

/// One classified invocation node.
#[derive(Debug, Clone)]
pub struct Resolution<'u> {
    pub kind: InvocationKind,
    /// Node whose start is the expression location
    pub anchor: Node<'u>,
    /// Byte range covered by the snippet
    pub range: (usize, usize),
    pub callee: Option<Callee<'u>>,
    result: ValueType,
}

#[derive(Debug, Clone, PartialEq)]
enum ValueType {
    Object(TypeRef),
    /// Builtin value; the type is known for literals and declared variables
    Primitive(Option<TypeRef>),
    Callable,
    Unknown,
}

impl ValueType {
    fn scalar(name: &str) -> Self {
        ValueType::Primitive(Some(TypeRef::new(name, "")))
    }

    fn from_type(ty: TypeRef) -> Self {
        if ty.callable {
            ValueType::Callable
        } else if types::is_builtin(&ty.name) {
            ValueType::Primitive(Some(ty))
        } else if ty.is_auto() {
            ValueType::Unknown
        } else {
            ValueType::Object(ty)
        }
    }
}

#[derive(Debug, Clone)]
enum ClassTarget<'u> {
    Known { class: &'u ClassDecl, display: String },
    External { display: String, last: String },
}

enum MethodHit<'u> {
    Declared { decl: &'u FunctionDecl, owner: String },
    External { owner: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InitForm {
    Default,
    Paren,
    Brace,
    Copy,
}

#[derive(Debug, Clone)]
struct Context<'u> {
    node: Node<'u>,
    file: usize,
    /// Innermost declaration scope key
    scope: String,
    class: Option<String>,
}

impl<'u> Context<'u> {
    fn at(&self, node: Node<'u>) -> Self {
        Self {
            node,
            ..self.clone()
        }
    }
}

pub struct Sema<'u> {
    files: &'u [SourceFile],
    index: &'u DeclIndex,
}

impl<'u> Sema<'u> {
    pub fn new(files: &'u [SourceFile], index: &'u DeclIndex) -> Self {
        Self { files, index }
    }

    fn source(&self, file: usize) -> &'u str {
        &self.files[file].text
    }

    /// Classify `node`; `None` when it is not an invocation.
    pub fn analyze(&self, file: usize, node: Node<'u>) -> Option<Resolution<'u>> {
        let is_declarator = || {
            node.parent().is_some_and(|parent| {
                parent.kind() == "declaration" && syntax::is_field_child(parent, "declarator", node)
            })
        };
        let candidate = match node.kind() {
            "call_expression" | "field_initializer" | "new_expression"
            | "compound_literal_expression" | "binary_expression" | "assignment_expression"
            | "unary_expression" | "pointer_expression" | "update_expression"
            | "subscript_expression" => true,
            "identifier" | "init_declarator" | "function_declarator" => is_declarator(),
            _ => false,
        };
        if !candidate {
            return None;
        }

        let ctx = self.context(file, node);
        match node.kind() {
            "call_expression" => self.resolve_call(node, &ctx, 0),
            "field_initializer" => self.resolve_field_initializer(node, &ctx),
            "new_expression" => self.resolve_new(node, &ctx),
            "compound_literal_expression" => self.resolve_compound_literal(node, &ctx),
            "identifier" | "init_declarator" | "function_declarator" => {
                self.resolve_declarator(node.parent()?, node, &ctx)
            }
            _ => self.resolve_operator(node, &ctx, 0),
        }
    }

    fn context(&self, file: usize, node: Node<'u>) -> Context<'u> {
        let source = self.source(file);
        let mut namespaces = Vec::new();
        let mut classes = Vec::new();
        let mut owner = None;

        let mut current = node.parent();
        while let Some(n) = current {
            match n.kind() {
                "namespace_definition" => namespaces.push(
                    n.child_by_field_name("name")
                        .map(|name| types::normalize_type(text(name, source)))
                        .unwrap_or_else(|| ANONYMOUS_NAMESPACE.to_string()),
                ),
                "class_specifier" | "struct_specifier" | "union_specifier"
                    if n.child_by_field_name("body").is_some() =>
                {
                    if let Some(name) = n.child_by_field_name("name") {
                        classes.push(QualifiedName::parse(text(name, source)).key);
                    }
                }
                "function_definition" if owner.is_none() && classes.is_empty() => {
                    owner = n
                        .child_by_field_name("declarator")
                        .map(declarator_shape)
                        .and_then(|shape| shape.name)
                        .filter(|name| name.kind() == "qualified_identifier")
                        .map(|name| QualifiedName::parse(text(name, source)).key_scope().to_string());
                }
                _ => {}
            }
            current = n.parent();
        }

        namespaces.reverse();
        classes.reverse();
        let mut namespace = namespaces.join("::");
        let mut class = None;

        if !classes.is_empty() {
            class = Some(join_scope(&namespace, &classes.join("::")));
        } else if let Some(owner) = owner.filter(|o| !o.is_empty()) {
            for prefix in scope_prefixes(&namespace) {
                let key = join_scope(&prefix, &owner);
                if self.index.class(&key).is_some() {
                    class = Some(key);
                    break;
                }
                if self.index.is_namespace(&key) {
                    namespace = key;
                    break;
                }
            }
        }

        Context {
            node,
            file,
            scope: class.clone().unwrap_or_else(|| namespace.clone()),
            class,
        }
    }

    // ----- calls -----

    fn resolve_call(&self, call: Node<'u>, ctx: &Context<'u>, depth: u8) -> Option<Resolution<'u>> {
        if depth > MAX_DEPTH {
            return None;
        }
        let function = call.child_by_field_name("function")?;
        if matches!(function.kind(), "primitive_type" | "sized_type_specifier") {
            return None;
        }
        let args = self.argument_types(call.child_by_field_name("arguments"), ctx, depth);

        match function.kind() {
            "field_expression" => self.resolve_member_call(call, function, &args, ctx, depth),
            "identifier" | "qualified_identifier" | "template_function" => {
                self.resolve_named_call(call, function, &args, ctx, depth)
            }
            "template_type" => {
                let ty = TypeRef::new(text(function, self.source(ctx.file)), &ctx.scope);
                let target = self.resolve_class(&ty, depth + 1)?;
                self.construct(target, InitForm::Paren, &args, function, call, depth)
            }
            _ => {
                let ty = self.expr_type(function, ctx, depth + 1);
                self.call_operator(call, &ty, &args, depth)
                    .or_else(|| Some(indirect_call(call)))
            }
        }
    }

    fn resolve_named_call(
        &self,
        call: Node<'u>,
        function: Node<'u>,
        args: &[ValueType],
        ctx: &Context<'u>,
        depth: u8,
    ) -> Option<Resolution<'u>> {
        let written = text(function, self.source(ctx.file));
        let name = QualifiedName::parse(&self.index.expand_namespace_alias(
            &types::normalize_type(written),
        ));
        if !name.is_qualified() && CAST_KEYWORDS.contains(&name.last.as_str()) {
            return None;
        }

        if !name.is_qualified()
            && let Some(variable) = self.lookup_variable(&name.last, ctx, depth)
        {
            return self
                .call_operator(call, &variable, args, depth)
                .or_else(|| Some(indirect_call(call)));
        }

        if let Some((decl, scope)) = self.lookup_function(&name, args, ctx, depth) {
            let implicit_this =
                matches!(decl.role, FunctionRole::Method { is_static: false }) && ctx.class.is_some();
            let (kind, anchor) = if implicit_this {
                (InvocationKind::MemberCall, function)
            } else {
                (InvocationKind::Call, call)
            };
            return Some(Resolution {
                kind,
                anchor,
                range: (call.start_byte(), call.end_byte()),
                result: self.return_value(decl),
                callee: Some(Callee::declared(decl, scope)),
            });
        }

        let ty = TypeRef::new(&name.display, &ctx.scope);
        if let Some(target) = self.resolve_known_class(&ty, depth + 1) {
            return self.construct(target, InitForm::Paren, args, function, call, depth);
        }
        let declared = scope_prefixes(&ctx.scope)
            .iter()
            .any(|scope| self.index.has_functions(&join_scope(scope, &name.key)));
        if declared {
            // Declared, but no overload binds unambiguously.
            return Some(indirect_call(call));
        }

        let external = if name.is_qualified() {
            Some((name.display_scope().to_string(), name.last.clone()))
        } else {
            self.using_target(&name.last, ctx).map(|target| {
                let target = QualifiedName::parse(&target);
                (target.key_scope().to_string(), target.last)
            })
        };

        Some(match external {
            Some((scope, last)) => Resolution {
                kind: InvocationKind::Call,
                anchor: call,
                range: (call.start_byte(), call.end_byte()),
                callee: Some(Callee::external(&scope, &last, false, false)),
                result: ValueType::Unknown,
            },
            None => indirect_call(call),
        })
    }

    fn resolve_member_call(
        &self,
        call: Node<'u>,
        field_expr: Node<'u>,
        args: &[ValueType],
        ctx: &Context<'u>,
        depth: u8,
    ) -> Option<Resolution<'u>> {
        let source = self.source(ctx.file);
        let object = field_expr.child_by_field_name("argument")?;
        let field = field_expr.child_by_field_name("field")?;

        let method = match field.kind() {
            "destructor_name" => return None,
            "template_method" => field
                .child_by_field_name("name")
                .map(|n| text(n, source).to_string())?,
            "qualified_identifier" => QualifiedName::parse(text(field, source)).last,
            "operator_name" => syntax::normalize_operator_name(text(field, source)),
            _ => text(field, source).to_string(),
        };

        let mut resolution = Resolution {
            kind: InvocationKind::MemberCall,
            anchor: field,
            range: (call.start_byte(), call.end_byte()),
            callee: None,
            result: ValueType::Unknown,
        };

        let ValueType::Object(object_type) = self.expr_type(object, ctx, depth + 1) else {
            return Some(resolution);
        };

        match self.resolve_class(&object_type, depth + 1) {
            Some(ClassTarget::Known { class, display }) => {
                match self.find_method(class, &display, &method, args, false, depth + 1) {
                    Some(MethodHit::Declared { decl, owner }) => {
                        if matches!(decl.role, FunctionRole::Method { is_static: true }) {
                            resolution.kind = InvocationKind::Call;
                        }
                        resolution.result = self.return_value(decl);
                        resolution.callee = Some(Callee::declared(decl, owner));
                    }
                    Some(MethodHit::External { owner }) => {
                        resolution.callee = Some(Callee::external(&owner, &method, false, true));
                    }
                    None => {}
                }
            }
            Some(ClassTarget::External { display, .. }) => {
                resolution.callee = Some(Callee::external(&display, &method, false, true));
            }
            None => {}
        }
        Some(resolution)
    }

    /// `obj(args)` on a class object with a declared `operator()`.
    fn call_operator(
        &self,
        call: Node<'u>,
        object: &ValueType,
        args: &[ValueType],
        depth: u8,
    ) -> Option<Resolution<'u>> {
        let (class, display) = self.class_of(object, depth)?;
        let MethodHit::Declared { decl, owner } =
            self.find_method(class, &display, "operator()", args, true, depth + 1)?
        else {
            return None;
        };
        Some(Resolution {
            kind: InvocationKind::OperatorCall,
            anchor: call,
            range: (call.start_byte(), call.end_byte()),
            result: self.return_value(decl),
            callee: Some(Callee::declared(decl, owner)),
        })
    }

    // ----- constructions -----

    fn resolve_declarator(
        &self,
        declaration: Node<'u>,
        declarator: Node<'u>,
        ctx: &Context<'u>,
    ) -> Option<Resolution<'u>> {
        let source = self.source(ctx.file);
        let type_node = declaration.child_by_field_name("type")?;
        if type_node.kind() == "placeholder_type_specifier" || text(type_node, source) == "auto" {
            return None;
        }
        let is_extern = named_children(declaration).into_iter().any(|child| {
            child.kind() == "storage_class_specifier" && text(child, source) == "extern"
        });
        if is_extern {
            return None;
        }

        let shape = declarator_shape(declarator);
        let name = shape.name?;
        let (form, args) = if shape.function.is_some() {
            (InitForm::Paren, self.vexing_parse_arguments(declaration, &shape, ctx)?)
        } else if shape.is_plain_object() {
            match shape.init {
                None => (InitForm::Default, Vec::new()),
                Some(init) => match init.kind() {
                    "argument_list" => (InitForm::Paren, self.argument_types(Some(init), ctx, 0)),
                    "initializer_list" => (InitForm::Brace, self.argument_types(Some(init), ctx, 0)),
                    // The initializing prvalue is constructed in place.
                    "call_expression" | "compound_literal_expression" => return None,
                    _ if self.resolve_operator(init, &ctx.at(init), 1).is_some() => return None,
                    _ => (InitForm::Copy, vec![self.expr_type(init, &ctx.at(init), 1)]),
                },
            }
        } else {
            return None;
        };

        let ty = TypeRef::new(text(type_node, source), &ctx.scope);
        let target = self.resolve_class(&ty, 0)?;
        self.construct(target, form, &args, name, declarator, 0)
    }

    /// `C c(x);` parsed as a function declaration whose parameter "types"
    /// are variables in scope.
    fn vexing_parse_arguments(
        &self,
        declaration: Node<'u>,
        shape: &DeclaratorShape<'u>,
        ctx: &Context<'u>,
    ) -> Option<Vec<ValueType>> {
        if shape.function_pointer || !inside_function_body(declaration) {
            return None;
        }
        let params = named_children(shape.function?.child_by_field_name("parameters")?);
        if params.is_empty() {
            return None;
        }
        let source = self.source(ctx.file);
        params
            .iter()
            .map(|param| {
                if param.kind() != "parameter_declaration"
                    || param.child_by_field_name("declarator").is_some()
                {
                    return None;
                }
                let ty = param
                    .child_by_field_name("type")
                    .filter(|ty| ty.kind() == "type_identifier")?;
                self.lookup_variable(text(ty, source), ctx, 0)
            })
            .collect()
    }

    fn resolve_field_initializer(&self, node: Node<'u>, ctx: &Context<'u>) -> Option<Resolution<'u>> {
        let source = self.source(ctx.file);
        let children = named_children(node);
        let name = *children.first()?;
        let list = children
            .iter()
            .copied()
            .find(|c| matches!(c.kind(), "argument_list" | "initializer_list"))?;
        let form = if list.kind() == "argument_list" {
            InitForm::Paren
        } else {
            InitForm::Brace
        };
        let args = self.argument_types(Some(list), ctx, 0);

        let class_key = ctx.class.as_deref()?;
        let class = self.index.class(class_key)?;
        let member = text(name, source);

        let target = match class.field(member) {
            Some(field) if field.indirection > 0 || field.reference || field.callable => return None,
            Some(field) => self.resolve_class(field, 0)?,
            None => self.resolve_class(&TypeRef::new(member, class_key), 0)?,
        };
        self.construct(target, form, &args, name, node, 0)
    }

    fn resolve_new(&self, node: Node<'u>, ctx: &Context<'u>) -> Option<Resolution<'u>> {
        if node.child_by_field_name("declarator").is_some() {
            return None;
        }
        let ty_node = node.child_by_field_name("type")?;
        let list = node.child_by_field_name("arguments");
        let form = match list {
            None => InitForm::Default,
            Some(args) if args.kind() == "initializer_list" => InitForm::Brace,
            Some(_) => InitForm::Paren,
        };
        let args = self.argument_types(list, ctx, 0);
        let ty = TypeRef::new(text(ty_node, self.source(ctx.file)), &ctx.scope);
        let target = self.resolve_class(&ty, 0)?;
        let mut resolution = self.construct(target, form, &args, ty_node, node, 0)?;
        resolution.range = (ty_node.start_byte(), node.end_byte());
        Some(resolution)
    }

    fn resolve_compound_literal(&self, node: Node<'u>, ctx: &Context<'u>) -> Option<Resolution<'u>> {
        let ty_node = node.child_by_field_name("type")?;
        let args = self.argument_types(node.child_by_field_name("value"), ctx, 0);
        let ty = TypeRef::new(text(ty_node, self.source(ctx.file)), &ctx.scope);
        let target = self.resolve_class(&ty, 0)?;
        self.construct(target, InitForm::Brace, &args, ty_node, node, 0)
    }

    fn construct(
        &self,
        target: ClassTarget<'u>,
        form: InitForm,
        args: &[ValueType],
        anchor: Node<'u>,
        range: Node<'u>,
        depth: u8,
    ) -> Option<Resolution<'u>> {
        let (callee, result) = match target {
            ClassTarget::Known { class, display } => {
                let target = self.constructor_for(class, form, args, depth)?;
                (
                    Callee {
                        target,
                        scope: display,
                        name: class.name.clone(),
                    },
                    TypeRef::new(&class.qualified_name, ""),
                )
            }
            ClassTarget::External { display, last } => (
                Callee::external(&display, &last, true, false),
                TypeRef::new(&display, ""),
            ),
        };

        Some(Resolution {
            kind: InvocationKind::Construct,
            anchor,
            range: (range.start_byte(), range.end_byte()),
            callee: Some(callee),
            result: ValueType::Object(result),
        })
    }

    /// Constructor of `class` selected for `args`; `None` when no
    /// constructor runs or none binds unambiguously.
    fn constructor_for(
        &self,
        class: &'u ClassDecl,
        form: InitForm,
        args: &[ValueType],
        depth: u8,
    ) -> Option<CalleeTarget<'u>> {
        let key = join_scope(&class.qualified_name, &class.name);
        let ctors: Vec<_> = self.index.functions(&key).collect();
        let copies = args.len() == 1 && self.is_class_value(&args[0], class, depth);

        if copies && !ctors.iter().any(|ctor| is_copy_constructor(ctor, class)) {
            return Some(self.implicit_constructor(class, 1, depth));
        }
        if let Some(decl) = self.best_overload(&ctors, args, depth) {
            return Some(CalleeTarget::Declared(decl));
        }
        if class.has_user_constructor {
            return None;
        }
        match (form, args.len()) {
            // Brace initialization of an aggregate runs no constructor.
            (InitForm::Brace, _) => None,
            (_, 0) => Some(self.implicit_constructor(class, 0, depth)),
            (_, 1) if args[0] == ValueType::Unknown => Some(self.implicit_constructor(class, 1, depth)),
            _ => None,
        }
    }

    fn implicit_constructor(&self, class: &'u ClassDecl, arity: usize, depth: u8) -> CalleeTarget<'u> {
        CalleeTarget::ImplicitConstructor {
            arity,
            exception_spec: self.implicit_spec(class, arity == 1, depth + 1),
        }
    }

    /// Implicit default or copy constructors are `noexcept` when the matching
    /// constructor of every base and by-value field is. A member whose
    /// constructor is unknown leaves the specification unresolved.
    fn implicit_spec(&self, class: &'u ClassDecl, copy: bool, depth: u8) -> ExceptionSpec {
        // Members of a template depend on its arguments.
        if depth > MAX_DEPTH || class.is_template {
            return ExceptionSpec::Unresolved;
        }
        let bases = class
            .bases
            .iter()
            .map(|base| TypeRef::new(base, &class.qualified_name));
        let fields = class.fields.iter().map(|(_, ty)| ty.clone());

        let mut spec = ExceptionSpec::NoexceptTrue;
        for member in bases.chain(fields) {
            if member.indirection > 0 || member.reference || member.callable || types::is_builtin(&member.name) {
                continue;
            }
            let member_spec = match self.resolve_class(&member, depth + 1) {
                Some(ClassTarget::Known { class: inner, .. }) => {
                    self.special_member_spec(inner, copy, depth + 1)
                }
                Some(ClassTarget::External { .. }) => ExceptionSpec::Unresolved,
                None if self.names_scalar(&member) => ExceptionSpec::NoexceptTrue,
                None => ExceptionSpec::Unresolved,
            };
            match member_spec {
                ExceptionSpec::NoexceptTrue | ExceptionSpec::DynamicNone => {}
                ExceptionSpec::Unresolved => spec = ExceptionSpec::Unresolved,
                _ => return ExceptionSpec::NoexceptFalse,
            }
        }
        spec
    }

    fn special_member_spec(&self, class: &'u ClassDecl, copy: bool, depth: u8) -> ExceptionSpec {
        let key = join_scope(&class.qualified_name, &class.name);
        let ctors: Vec<_> = self.index.functions(&key).collect();
        let declared = ctors.iter().find(|ctor| {
            if copy {
                is_copy_constructor(ctor, class)
            } else {
                ctor.accepts(0)
            }
        });
        match declared {
            Some(decl) => decl.exception_spec,
            None if copy || !class.has_user_constructor => self.implicit_spec(class, copy, depth),
            None => ExceptionSpec::Unresolved,
        }
    }

    /// A type alias or `_t` typedef that does not name a class.
    fn names_scalar(&self, ty: &TypeRef) -> bool {
        let name = QualifiedName::parse(&ty.name);
        types::looks_like_scalar_typedef(&name)
            || scope_prefixes(&ty.scope)
                .iter()
                .any(|scope| self.index.alias(&join_scope(scope, &name.key)).is_some())
    }

    /// `value` is an object of `class` or of a class derived from it.
    fn is_class_value(&self, value: &ValueType, class: &ClassDecl, depth: u8) -> bool {
        self.class_of(value, depth).is_some_and(|(found, _)| {
            found.qualified_name == class.qualified_name || self.has_base(found, &class.name, depth + 1)
        })
    }

    // ----- operators -----

    fn resolve_operator(&self, node: Node<'u>, ctx: &Context<'u>, depth: u8) -> Option<Resolution<'u>> {
        if depth > MAX_DEPTH {
            return None;
        }
        let source = self.source(ctx.file);

        match node.kind() {
            "binary_expression" | "assignment_expression" => {
                let op = node.child_by_field_name("operator")?;
                let left = node.child_by_field_name("left")?;
                let right = node.child_by_field_name("right")?;
                let name = format!("operator{}", text(op, source));
                let values = [
                    self.expr_type(left, ctx, depth + 1),
                    self.expr_type(right, ctx, depth + 1),
                ];
                self.overloaded_operator(node, op, &name, &values, ctx, depth)
            }
            "unary_expression" | "pointer_expression" | "update_expression" => {
                let op = node.child_by_field_name("operator")?;
                let argument = node.child_by_field_name("argument")?;
                let name = format!("operator{}", text(op, source));
                let operand = self.expr_type(argument, ctx, depth + 1);
                self.class_of(&operand, depth)?;
                let postfix = argument.start_byte() < op.start_byte();
                let anchor = if node.kind() == "update_expression" { node } else { op };
                // Postfix forms take a dummy `int` parameter.
                let values = if postfix {
                    vec![operand, ValueType::scalar("int")]
                } else {
                    vec![operand]
                };
                self.overloaded_operator(node, anchor, &name, &values, ctx, depth)
            }
            "subscript_expression" => {
                let argument = node.child_by_field_name("argument")?;
                let (class, display) =
                    self.class_of(&self.expr_type(argument, ctx, depth + 1), depth)?;
                let index = node
                    .child_by_field_name("indices")
                    .and_then(|indices| named_children(indices).into_iter().next())
                    .map_or(ValueType::Unknown, |index| self.expr_type(index, &ctx.at(index), depth + 1));
                let MethodHit::Declared { decl, owner } =
                    self.find_method(class, &display, "operator[]", &[index], true, depth + 1)?
                else {
                    return None;
                };
                Some(self.operator_resolution(node, node, decl, owner))
            }
            _ => None,
        }
    }

    /// Member overload on the first operand, then free overloads found
    /// through the enclosing scopes and the operands' namespaces.
    fn overloaded_operator(
        &self,
        node: Node<'u>,
        anchor: Node<'u>,
        name: &str,
        values: &[ValueType],
        ctx: &Context<'u>,
        depth: u8,
    ) -> Option<Resolution<'u>> {
        let operands: Vec<_> = values.iter().map(|value| self.class_of(value, depth)).collect();
        if operands.iter().all(Option::is_none) {
            return None;
        }

        if let Some((class, display)) = &operands[0]
            && let Some(MethodHit::Declared { decl, owner }) =
                self.find_method(class, display, name, &values[1..], true, depth + 1)
        {
            return Some(self.operator_resolution(node, anchor, decl, owner));
        }

        let mut scopes = scope_prefixes(&ctx.scope);
        for (class, _) in operands.iter().flatten() {
            scopes.extend(scope_prefixes(class.parent_scope()));
        }
        scopes.extend(self.index.visible_directives(&ctx.scope).map(str::to_string));
        let mut seen = std::collections::HashSet::new();
        scopes.retain(|scope| seen.insert(scope.clone()));

        // Only overloads taking one of the class operands by name compete.
        let mut candidates: Vec<(&'u FunctionDecl, String)> = Vec::new();
        for scope in scopes {
            let key = join_scope(&scope, name);
            for decl in self.index.functions(&key) {
                let takes_operand = operands.iter().zip(&decl.params).any(|(operand, param)| {
                    operand
                        .as_ref()
                        .is_some_and(|(class, _)| QualifiedName::parse(&param.name).last == class.name)
                });
                if decl.role == FunctionRole::Free
                    && takes_operand
                    && !candidates.iter().any(|(seen, _)| std::ptr::eq(*seen, decl))
                {
                    candidates.push((decl, scope.clone()));
                }
            }
        }

        let decls: Vec<_> = candidates.iter().map(|(decl, _)| *decl).collect();
        let decl = self.best_overload(&decls, values, depth)?;
        let (_, scope) = candidates.into_iter().find(|(found, _)| std::ptr::eq(*found, decl))?;
        Some(self.operator_resolution(node, anchor, decl, scope))
    }

    fn operator_resolution(
        &self,
        node: Node<'u>,
        anchor: Node<'u>,
        decl: &'u FunctionDecl,
        scope: String,
    ) -> Resolution<'u> {
        Resolution {
            kind: InvocationKind::OperatorCall,
            anchor,
            range: (node.start_byte(), node.end_byte()),
            result: self.return_value(decl),
            callee: Some(Callee::declared(decl, scope)),
        }
    }

    // ----- lookup -----

    fn lookup_function(
        &self,
        name: &QualifiedName,
        args: &[ValueType],
        ctx: &Context<'u>,
        depth: u8,
    ) -> Option<(&'u FunctionDecl, String)> {
        if !name.is_qualified()
            && let Some(class_key) = &ctx.class
            && let Some(class) = self.index.class(class_key)
            && let Some(MethodHit::Declared { decl, owner }) =
                self.find_method(class, class_key, &name.last, args, false, depth + 1)
            && decl.role != FunctionRole::Constructor
        {
            return Some((decl, owner));
        }

        let mut scopes = if name.global {
            vec![String::new()]
        } else {
            scope_prefixes(&ctx.scope)
        };
        scopes.extend(self.index.visible_directives(&ctx.scope).map(str::to_string));

        for scope in scopes {
            let key = join_scope(&scope, &name.key);
            let found: Vec<_> = self
                .index
                .functions(&key)
                .filter(|f| f.role != FunctionRole::Constructor)
                .collect();
            if !found.is_empty() {
                let decl = self.best_overload(&found, args, depth)?;
                return Some((decl, join_scope(&scope, name.display_scope())));
            }
            if let Some(target) = self.index.using_declaration(&key) {
                let found: Vec<_> = self.index.functions(target).collect();
                if let Some(decl) = self.best_overload(&found, args, depth) {
                    return Some((decl, decl.scope.clone()));
                }
            }
        }
        None
    }

    /// Target of a `using ns::name;` visible from the context.
    fn using_target(&self, name: &str, ctx: &Context<'u>) -> Option<String> {
        scope_prefixes(&ctx.scope).into_iter().find_map(|scope| {
            self.index
                .using_declaration(&join_scope(&scope, name))
                .map(str::to_string)
        })
    }

    fn find_method(
        &self,
        class: &'u ClassDecl,
        display: &str,
        name: &str,
        args: &[ValueType],
        strict: bool,
        depth: u8,
    ) -> Option<MethodHit<'u>> {
        if depth > MAX_DEPTH {
            return None;
        }
        let key = join_scope(&class.qualified_name, name);
        let found: Vec<_> = self.index.functions(&key).collect();
        if !found.is_empty() {
            // Members named here hide those of the bases.
            return self.best_overload(&found, args, depth).map(|decl| MethodHit::Declared {
                decl,
                owner: display.to_string(),
            });
        }

        for base in &class.bases {
            match self.resolve_class(&TypeRef::new(base, &class.qualified_name), depth + 1) {
                Some(ClassTarget::Known { class, display }) => {
                    if let Some(hit) = self.find_method(class, &display, name, args, strict, depth + 1) {
                        return Some(hit);
                    }
                }
                Some(ClassTarget::External { display, .. }) if !strict => {
                    return Some(MethodHit::External { owner: display });
                }
                _ => {}
            }
        }
        None
    }

    fn find_field(&self, class: &'u ClassDecl, name: &str, depth: u8) -> Option<TypeRef> {
        if depth > MAX_DEPTH {
            return None;
        }
        if let Some(field) = class.field(name) {
            return Some(field.clone());
        }
        class.bases.iter().find_map(|base| {
            match self.resolve_class(&TypeRef::new(base, &class.qualified_name), depth + 1)? {
                ClassTarget::Known { class, .. } => self.find_field(class, name, depth + 1),
                ClassTarget::External { .. } => None,
            }
        })
    }

    fn resolve_known_class(&self, ty: &TypeRef, depth: u8) -> Option<ClassTarget<'u>> {
        match self.resolve_class(ty, depth)? {
            known @ ClassTarget::Known { .. } => Some(known),
            ClassTarget::External { .. } => None,
        }
    }

    /// Class named by a type, through aliases and `using` directives.
    fn resolve_class(&self, ty: &TypeRef, depth: u8) -> Option<ClassTarget<'u>> {
        if depth > MAX_DEPTH || ty.callable || ty.is_auto() || types::is_builtin(&ty.name) {
            return None;
        }
        let name = QualifiedName::parse(&ty.name);
        if name.key.is_empty() {
            return None;
        }

        let mut scopes = if name.global {
            vec![String::new()]
        } else {
            scope_prefixes(&ty.scope)
        };
        let directives: Vec<_> = self.index.visible_directives(&ty.scope).collect();
        scopes.extend(directives.iter().map(|d| d.to_string()));

        for scope in &scopes {
            let key = join_scope(scope, &name.key);
            if let Some(class) = self.index.class(&key) {
                return Some(ClassTarget::Known {
                    class,
                    display: join_scope(scope, &name.display),
                });
            }
            if let Some(alias) = self.index.alias(&key) {
                return self.resolve_class(alias, depth + 1);
            }
        }

        let expanded = QualifiedName::parse(&self.index.expand_namespace_alias(&name.display));
        if types::looks_like_scalar_typedef(&expanded) {
            return None;
        }
        if expanded.is_qualified() {
            return Some(ClassTarget::External {
                last: expanded.last.clone(),
                display: expanded.display,
            });
        }

        // `using namespace std; vector<int> v;` names a library type.
        let mut foreign = directives.iter().filter(|d| !self.index.is_namespace(d));
        match (foreign.next(), foreign.next()) {
            (Some(namespace), None) => Some(ClassTarget::External {
                display: join_scope(namespace, &expanded.display),
                last: expanded.last,
            }),
            _ => None,
        }
    }

    fn class_of(&self, ty: &ValueType, depth: u8) -> Option<(&'u ClassDecl, String)> {
        let ValueType::Object(ty) = ty else {
            return None;
        };
        if ty.indirection > 0 {
            return None;
        }
        match self.resolve_class(ty, depth + 1)? {
            ClassTarget::Known { class, display } => Some((class, display)),
            ClassTarget::External { .. } => None,
        }
    }

    // ----- overloads -----

    fn argument_types(&self, list: Option<Node<'u>>, ctx: &Context<'u>, depth: u8) -> Vec<ValueType> {
        list.map(syntax::arguments)
            .unwrap_or_default()
            .into_iter()
            .map(|arg| self.expr_type(arg, &ctx.at(arg), depth + 1))
            .collect()
    }

    /// The single best viable candidate for `args`. Candidates differing only
    /// as declaration and definition count once; any other tie is ambiguous.
    fn best_overload(
        &self,
        candidates: &[&'u FunctionDecl],
        args: &[ValueType],
        depth: u8,
    ) -> Option<&'u FunctionDecl> {
        let mut best: Option<(u32, &'u FunctionDecl)> = None;
        let mut ambiguous = false;
        for &decl in candidates.iter().filter(|decl| decl.accepts(args.len())) {
            let Some(score) = self.overload_score(decl, args, depth) else {
                continue;
            };
            match best {
                Some((top, _)) if score < top => {}
                Some((top, kept)) if score == top => {
                    ambiguous |= !same_parameters(kept, decl);
                }
                _ => {
                    best = Some((score, decl));
                    ambiguous = false;
                }
            }
        }
        match best {
            Some((_, decl)) if !ambiguous => Some(decl),
            _ => None,
        }
    }

    fn overload_score(&self, decl: &FunctionDecl, args: &[ValueType], depth: u8) -> Option<u32> {
        args.iter()
            .zip(&decl.params)
            .map(|(arg, param)| self.conversion_rank(arg, param, depth).map(u32::from))
            .sum()
    }

    /// How well `arg` binds to `param`: 3 exact, 2 promotion or
    /// derived-to-base, 1 conversion or unknown, 0 for a class value passed
    /// to a scalar. `None` when it cannot bind at all.
    fn conversion_rank(&self, arg: &ValueType, param: &TypeRef, depth: u8) -> Option<u8> {
        let param_pointer = param.indirection > 0 || param.callable;
        let param_scalar = !param_pointer && types::is_builtin(&param.name);
        match arg {
            ValueType::Unknown => Some(1),
            ValueType::Callable => (!param_scalar).then_some(1),
            ValueType::Primitive(None) => Some(if param_scalar { 2 } else { 1 }),
            ValueType::Primitive(Some(ty)) if ty.name == "nullptr_t" => {
                if param_pointer {
                    Some(3)
                } else if param_scalar {
                    None
                } else {
                    Some(1)
                }
            }
            ValueType::Primitive(Some(ty)) if ty.indirection > 0 => {
                if param_pointer {
                    pointer_rank(ty, param)
                } else if param_scalar {
                    None
                } else {
                    Some(1)
                }
            }
            ValueType::Primitive(Some(ty)) => {
                if param_pointer {
                    None
                } else if param_scalar {
                    Some(if types::normalize_type(&ty.name) == param.name { 3 } else { 2 })
                } else {
                    Some(1)
                }
            }
            ValueType::Object(ty) if ty.indirection > 0 => {
                if param_pointer {
                    if ty.indirection == param.indirection {
                        if same_type_name(ty, param) {
                            return Some(3);
                        }
                        if let Some((class, _)) = self.class_of(&ValueType::Object(TypeRef::new(&ty.name, &ty.scope)), depth)
                            && self.has_base(class, &QualifiedName::parse(&param.name).last, depth + 1)
                        {
                            return Some(2);
                        }
                    }
                    pointer_rank(ty, param)
                } else if param_scalar {
                    None
                } else {
                    Some(1)
                }
            }
            ValueType::Object(ty) => {
                if param_pointer {
                    None
                } else if param_scalar {
                    Some(0)
                } else if same_type_name(ty, param) {
                    Some(3)
                } else if let Some((class, _)) = self.class_of(arg, depth)
                    && self.has_base(class, &QualifiedName::parse(&param.name).last, depth + 1)
                {
                    Some(2)
                } else {
                    Some(1)
                }
            }
        }
    }

    /// Whether `class` derives, directly or not, from a class named `base`.
    fn has_base(&self, class: &'u ClassDecl, base: &str, depth: u8) -> bool {
        if depth > MAX_DEPTH {
            return false;
        }
        class.bases.iter().any(|name| {
            QualifiedName::parse(name).last == base
                || matches!(
                    self.resolve_class(&TypeRef::new(name, &class.qualified_name), depth + 1),
                    Some(ClassTarget::Known { class, .. }) if self.has_base(class, base, depth + 1)
                )
        })
    }

    // ----- types -----

    fn return_value(&self, decl: &FunctionDecl) -> ValueType {
        match (&decl.role, &decl.return_type) {
            (FunctionRole::Constructor, _) => {
                ValueType::Object(TypeRef::new(&decl.scope, ""))
            }
            (_, Some(ty)) => ValueType::from_type(ty.clone()),
            (_, None) => ValueType::Unknown,
        }
    }

    fn lookup_variable(&self, name: &str, ctx: &Context<'u>, depth: u8) -> Option<ValueType> {
        if depth > MAX_DEPTH {
            return None;
        }

        let mut child = ctx.node;
        let mut current = ctx.node.parent();
        while let Some(n) = current {
            if let Some(found) = self.declared_in(n, child, name, ctx, depth) {
                return Some(found);
            }
            if n.kind() == "function_definition" {
                break;
            }
            child = n;
            current = n.parent();
        }

        if let Some(class) = ctx.class.as_deref().and_then(|key| self.index.class(key))
            && let Some(field) = self.find_field(class, name, depth + 1)
        {
            return Some(ValueType::from_type(field));
        }

        scope_prefixes(&ctx.scope).into_iter().find_map(|scope| {
            self.index
                .variable(&join_scope(&scope, name))
                .cloned()
                .map(ValueType::from_type)
        })
    }

    /// A declaration of `name` in `scope_node` visible from `child`.
    fn declared_in(
        &self,
        scope_node: Node<'u>,
        child: Node<'u>,
        name: &str,
        ctx: &Context<'u>,
        depth: u8,
    ) -> Option<ValueType> {
        match scope_node.kind() {
            "compound_statement" => named_children(scope_node)
                .into_iter()
                .take_while(|stmt| stmt.start_byte() < child.start_byte())
                .filter(|stmt| stmt.kind() == "declaration")
                .find_map(|stmt| self.match_declaration(stmt, name, ctx, depth)),
            "for_statement" => scope_node
                .child_by_field_name("initializer")
                .filter(|init| init.kind() == "declaration" && init.id() != child.id())
                .and_then(|init| self.match_declaration(init, name, ctx, depth)),
            "for_range_loop" => {
                let declarator = scope_node.child_by_field_name("declarator")?;
                let ty = scope_node.child_by_field_name("type")?;
                let shape = declarator_shape(declarator);
                (shape.name.map(|n| text(n, self.source(ctx.file))) == Some(name))
                    .then(|| self.declared_value(ty, &DeclaratorShape { init: None, ..shape }, ctx, depth))
            }
            "catch_clause" => scope_node
                .child_by_field_name("parameters")
                .and_then(|params| self.match_parameters(params, name, ctx)),
            "lambda_expression" => scope_node
                .child_by_field_name("declarator")
                .and_then(|d| d.child_by_field_name("parameters"))
                .and_then(|params| self.match_parameters(params, name, ctx)),
            "function_definition" => scope_node
                .child_by_field_name("declarator")
                .map(declarator_shape)
                .and_then(|shape| shape.function)
                .and_then(|function| function.child_by_field_name("parameters"))
                .and_then(|params| self.match_parameters(params, name, ctx)),
            _ => None,
        }
    }

    fn match_declaration(
        &self,
        declaration: Node<'u>,
        name: &str,
        ctx: &Context<'u>,
        depth: u8,
    ) -> Option<ValueType> {
        let source = self.source(ctx.file);
        let ty = declaration.child_by_field_name("type")?;
        syntax::field_children(declaration, "declarator")
            .into_iter()
            .map(declarator_shape)
            .find(|shape| shape.name.map(|n| text(n, source)) == Some(name) && !shape.is_function())
            .map(|shape| self.declared_value(ty, &shape, ctx, depth))
    }

    fn match_parameters(&self, params: Node<'u>, name: &str, ctx: &Context<'u>) -> Option<ValueType> {
        let source = self.source(ctx.file);
        named_children(params).into_iter().find_map(|param| {
            let declarator = param.child_by_field_name("declarator")?;
            let ty = param.child_by_field_name("type")?;
            let shape = declarator_shape(declarator);
            (shape.name.map(|n| text(n, source)) == Some(name))
                .then(|| self.declared_value(ty, &shape, ctx, 0))
        })
    }

    fn declared_value(
        &self,
        ty: Node<'u>,
        shape: &DeclaratorShape<'u>,
        ctx: &Context<'u>,
        depth: u8,
    ) -> ValueType {
        if shape.function_pointer {
            return ValueType::Callable;
        }
        if shape.array {
            return ValueType::Unknown;
        }

        let type_text = text(ty, self.source(ctx.file));
        if ty.kind() == "placeholder_type_specifier" || type_text == "auto" {
            return match shape.init {
                Some(init) if init.kind() == "lambda_expression" => ValueType::Callable,
                Some(init) if shape.indirection == 0 => {
                    self.expr_type(init, &ctx.at(init), depth + 1)
                }
                _ => ValueType::Unknown,
            };
        }
        ValueType::from_type(TypeRef {
            indirection: shape.indirection,
            reference: shape.reference,
            ..TypeRef::new(type_text, &ctx.scope)
        })
    }

    fn expr_type(&self, expr: Node<'u>, ctx: &Context<'u>, depth: u8) -> ValueType {
        if depth > MAX_DEPTH {
            return ValueType::Unknown;
        }
        let source = self.source(ctx.file);
        let first_child = || named_children(expr).into_iter().next();

        match expr.kind() {
            "identifier" => self
                .lookup_variable(text(expr, source), &ctx.at(expr), depth + 1)
                .unwrap_or(ValueType::Unknown),
            "qualified_identifier" => {
                let name = QualifiedName::parse(text(expr, source));
                scope_prefixes(&ctx.scope)
                    .into_iter()
                    .find_map(|scope| self.index.variable(&join_scope(&scope, &name.key)).cloned())
                    .map_or(ValueType::Unknown, ValueType::from_type)
            }
            "this" => match &ctx.class {
                Some(class) => ValueType::Object(TypeRef {
                    indirection: 1,
                    ..TypeRef::new(class, "")
                }),
                None => ValueType::Unknown,
            },
            "parenthesized_expression" => first_child()
                .map_or(ValueType::Unknown, |inner| self.expr_type(inner, ctx, depth + 1)),
            "field_expression" => {
                let (Some(object), Some(field)) = (
                    expr.child_by_field_name("argument"),
                    expr.child_by_field_name("field"),
                ) else {
                    return ValueType::Unknown;
                };
                let ValueType::Object(ty) = self.expr_type(object, ctx, depth + 1) else {
                    return ValueType::Unknown;
                };
                match self.resolve_class(&ty, depth + 1) {
                    Some(ClassTarget::Known { class, .. }) => self
                        .find_field(class, text(field, source), depth + 1)
                        .map_or(ValueType::Unknown, ValueType::from_type),
                    _ => ValueType::Unknown,
                }
            }
            "call_expression" => self
                .resolve_call(expr, &ctx.at(expr), depth + 1)
                .map_or(ValueType::Unknown, |r| r.result),
            "pointer_expression" => {
                let (Some(op), Some(argument)) = (
                    expr.child_by_field_name("operator"),
                    expr.child_by_field_name("argument"),
                ) else {
                    return ValueType::Unknown;
                };
                match (text(op, source), self.expr_type(argument, ctx, depth + 1)) {
                    ("*", ValueType::Object(ty)) if ty.indirection > 0 => {
                        ValueType::Object(TypeRef {
                            indirection: ty.indirection - 1,
                            ..ty
                        })
                    }
                    ("&", ValueType::Object(ty)) => ValueType::Object(TypeRef {
                        indirection: ty.indirection.saturating_add(1),
                        ..ty
                    }),
                    _ => self
                        .resolve_operator(expr, ctx, depth + 1)
                        .map_or(ValueType::Unknown, |r| r.result),
                }
            }
            "new_expression" => expr
                .child_by_field_name("type")
                .map_or(ValueType::Unknown, |ty| {
                    ValueType::from_type(TypeRef {
                        indirection: 1,
                        ..TypeRef::new(text(ty, source), &ctx.scope)
                    })
                }),
            "compound_literal_expression" | "cast_expression" => expr
                .child_by_field_name("type")
                .map_or(ValueType::Unknown, |ty| {
                    ValueType::from_type(TypeRef::new(text(ty, source), &ctx.scope))
                }),
            "lambda_expression" => ValueType::Callable,
            "number_literal" => ValueType::scalar(number_type(text(expr, source))),
            "true" | "false" => ValueType::scalar("bool"),
            "char_literal" => ValueType::scalar("char"),
            "string_literal" | "raw_string_literal" | "concatenated_string" => {
                ValueType::Primitive(Some(TypeRef {
                    indirection: 1,
                    ..TypeRef::new("char", "")
                }))
            }
            "null" => ValueType::scalar("nullptr_t"),
            "sizeof_expression" => ValueType::scalar("size_t"),
            "binary_expression" | "assignment_expression" | "unary_expression"
            | "update_expression" | "subscript_expression" => {
                if let Some(resolution) = self.resolve_operator(expr, ctx, depth + 1) {
                    return resolution.result;
                }
                match expr.kind() {
                    "assignment_expression" => expr
                        .child_by_field_name("left")
                        .map_or(ValueType::Unknown, |left| self.expr_type(left, ctx, depth + 1)),
                    "binary_expression" | "unary_expression" => ValueType::Primitive(None),
                    _ => ValueType::Unknown,
                }
            }
            "conditional_expression" => expr
                .child_by_field_name("consequence")
                .map_or(ValueType::Unknown, |c| self.expr_type(c, ctx, depth + 1)),
            _ => ValueType::Unknown,
        }
    }
}

fn indirect_call(call: Node<'_>) -> Resolution<'_> {
    Resolution {
        kind: InvocationKind::Call,
        anchor: call,
        range: (call.start_byte(), call.end_byte()),
        callee: None,
        result: ValueType::Unknown,
    }
}

/// A copy or move constructor of `class`.
fn is_copy_constructor(ctor: &FunctionDecl, class: &ClassDecl) -> bool {
    ctor.accepts(1)
        && ctor.params.first().is_some_and(|param| {
            param.reference && param.indirection == 0 && QualifiedName::parse(&param.name).last == class.name
        })
}

/// Declaration and definition of the same function are one candidate.
fn same_parameters(a: &FunctionDecl, b: &FunctionDecl) -> bool {
    a.params.len() == b.params.len()
        && a.params.iter().zip(&b.params).all(|(x, y)| {
            QualifiedName::parse(&x.name).last == QualifiedName::parse(&y.name).last
                && x.indirection == y.indirection
                && x.reference == y.reference
        })
}

/// Rank of a pointer argument bound to a pointer parameter.
fn pointer_rank(arg: &TypeRef, param: &TypeRef) -> Option<u8> {
    if arg.indirection == param.indirection && same_type_name(arg, param) {
        Some(3)
    } else if param.name == "void" {
        Some(2)
    } else if types::is_builtin(&arg.name) && types::is_builtin(&param.name) {
        None
    } else {
        Some(1)
    }
}

fn same_type_name(a: &TypeRef, b: &TypeRef) -> bool {
    QualifiedName::parse(&a.name).last == QualifiedName::parse(&b.name).last
}

/// Builtin type of a numeric literal, suffixes other than `f` ignored.
fn number_type(literal: &str) -> &'static str {
    let lower = literal.to_ascii_lowercase();
    if lower.starts_with("0x") || lower.starts_with("0b") {
        "int"
    } else if lower.contains('.') || lower.contains('e') {
        if lower.ends_with('f') { "float" } else { "double" }
    } else {
        "int"
    }
}

fn inside_function_body(node: Node) -> bool {
    let mut current = node.parent();
    while let Some(n) = current {
        match n.kind() {
            "compound_statement" => return true,
            "field_declaration_list" | "declaration_list" | "translation_unit" => return false,
            _ => current = n.parent(),
        }
    }
    false
}
