//! Source model capability consumed by the scanner core.
//!
//! The core never touches a parser's node taxonomy. Any front end that can
//! enumerate invocation nodes, resolve their direct callee and report
//! locations and exception specifications can drive the pipeline through
//! [`SourceModel`].

use std::fmt;

/// Structural shape of an invocation node.
///
/// The set is closed; every consumer matches on it exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvocationKind {
    /// Free or namespace-scoped function call
    Call,
    /// Call through `.` or `->` on an object
    MemberCall,
    /// Constructor invocation, explicit or materialized by the front end
    Construct,
    /// Call of a user-declared overloaded operator
    OperatorCall,
}

impl InvocationKind {
    pub const ALL: [InvocationKind; 4] = [
        InvocationKind::Call,
        InvocationKind::MemberCall,
        InvocationKind::Construct,
        InvocationKind::OperatorCall,
    ];

    /// Label used in the `kind` output column.
    pub fn label(&self) -> &'static str {
        match self {
            InvocationKind::Call => "call",
            InvocationKind::MemberCall => "member-call",
            InvocationKind::Construct => "construct",
            InvocationKind::OperatorCall => "operator-call",
        }
    }
}

impl fmt::Display for InvocationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Token range of a node inside one loaded file of the translation unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceRange {
    pub file: usize,
    pub start_byte: usize,
    pub end_byte: usize,
}

impl SourceRange {
    pub fn new(file: usize, start_byte: usize, end_byte: usize) -> Self {
        Self {
            file,
            start_byte,
            end_byte,
        }
    }

    pub fn len(&self) -> usize {
        self.end_byte.saturating_sub(self.start_byte)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Location after `#line` remapping, 1-based line and column.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PresumedLocation {
    pub file: String,
    pub line: u32,
    pub column: u32,
}

/// What kind of declaration a callee is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalleeKind {
    Function,
    Method,
    Constructor {
        /// Qualified name of the class that owns the constructor
        parent_qualified_name: String,
        /// Unqualified class name
        class_name: String,
    },
}

/// Exception specification carried by a resolved function prototype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExceptionSpec {
    /// No specification written
    None,
    /// `noexcept` or `noexcept(true)` after evaluation
    NoexceptTrue,
    /// `noexcept(false)`
    NoexceptFalse,
    /// `throw()`
    DynamicNone,
    /// `throw(T, ...)`
    Dynamic,
    /// `noexcept(expr)` that could not be evaluated to a constant
    Unresolved,
}

impl ExceptionSpec {
    /// Whether the specification statically guarantees no exception escapes.
    pub fn is_nothrow(&self) -> bool {
        matches!(self, ExceptionSpec::NoexceptTrue | ExceptionSpec::DynamicNone)
    }
}

/// Resolved function type with its exception information.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FunctionProto {
    pub exception_spec: ExceptionSpec,
}

/// A parsed, semantically resolved translation unit.
///
/// `Node` is an opaque handle to one invocation node, `Callee` an opaque
/// handle to its statically bound target.
pub trait SourceModel {
    type Node<'m>
    where
        Self: 'm;
    type Callee<'m>
    where
        Self: 'm;

    /// Every invocation node of the unit in document order.
    fn invocations<'m>(&'m self) -> Box<dyn Iterator<Item = Self::Node<'m>> + 'm>;

    fn kind<'m>(&'m self, node: &Self::Node<'m>) -> InvocationKind;

    /// True when the node's expansion location lies in a system header.
    fn in_system_header<'m>(&'m self, node: &Self::Node<'m>) -> bool;

    fn source_range<'m>(&'m self, node: &Self::Node<'m>) -> SourceRange;

    /// Presumed location of the node's expression anchor.
    fn presumed_location<'m>(&'m self, node: &Self::Node<'m>) -> Option<PresumedLocation>;

    /// Literal source text covered by `range`.
    fn source_text(&self, range: &SourceRange) -> Option<&str>;

    /// Statically bound target, `None` for indirect dispatch.
    fn direct_callee<'m>(&'m self, node: &Self::Node<'m>) -> Option<Self::Callee<'m>>;

    fn callee_kind<'m>(&'m self, callee: &Self::Callee<'m>) -> CalleeKind;

    fn qualified_name<'m>(&'m self, callee: &Self::Callee<'m>) -> String;

    fn pretty_signature<'m>(&'m self, callee: &Self::Callee<'m>) -> String;

    /// Resolved function prototype, `None` when no prototype is visible.
    fn function_type<'m>(&'m self, callee: &Self::Callee<'m>) -> Option<FunctionProto>;
}
