//! In-memory source model for exercising the pipeline without a parser.

use crate::model::{
    CalleeKind, ExceptionSpec, FunctionProto, InvocationKind, PresumedLocation, SourceModel,
    SourceRange,
};

#[derive(Debug, Clone)]
pub struct FakeCallee {
    name: String,
    kind: CalleeKind,
    signature: String,
    proto: Option<FunctionProto>,
}

#[derive(Debug, Clone)]
pub struct FakeNode {
    kind: InvocationKind,
    callee: Option<FakeCallee>,
    location: Option<PresumedLocation>,
    system: bool,
    text: String,
    range: SourceRange,
}

impl FakeNode {
    fn with_callee(kind: InvocationKind, name: &str, callee_kind: CalleeKind) -> Self {
        Self {
            kind,
            callee: Some(FakeCallee {
                name: name.to_string(),
                kind: callee_kind,
                signature: String::new(),
                proto: Some(FunctionProto {
                    exception_spec: ExceptionSpec::None,
                }),
            }),
            location: None,
            system: false,
            text: String::new(),
            range: SourceRange::new(0, 0, 0),
        }
    }

    pub fn call(name: &str) -> Self {
        Self::with_callee(InvocationKind::Call, name, CalleeKind::Function)
    }

    pub fn member(name: &str) -> Self {
        Self::with_callee(InvocationKind::MemberCall, name, CalleeKind::Method)
    }

    pub fn operator(name: &str) -> Self {
        Self::with_callee(InvocationKind::OperatorCall, name, CalleeKind::Function)
    }

    pub fn construct(parent: &str, class: &str) -> Self {
        Self::with_callee(
            InvocationKind::Construct,
            "",
            CalleeKind::Constructor {
                parent_qualified_name: parent.to_string(),
                class_name: class.to_string(),
            },
        )
    }

    /// Call through a function pointer: no direct callee.
    pub fn indirect() -> Self {
        let mut node = Self::call("");
        node.callee = None;
        node
    }

    pub fn at(mut self, file: &str, line: u32, column: u32) -> Self {
        self.location = Some(PresumedLocation {
            file: file.to_string(),
            line,
            column,
        });
        self
    }

    pub fn system(mut self) -> Self {
        self.system = true;
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    pub fn signature(mut self, signature: &str) -> Self {
        if let Some(callee) = self.callee.as_mut() {
            callee.signature = signature.to_string();
        }
        self
    }

    pub fn spec(mut self, spec: ExceptionSpec) -> Self {
        if let Some(callee) = self.callee.as_mut() {
            callee.proto = Some(FunctionProto {
                exception_spec: spec,
            });
        }
        self
    }

    pub fn no_proto(mut self) -> Self {
        if let Some(callee) = self.callee.as_mut() {
            callee.proto = None;
        }
        self
    }
}

/// Nodes laid out back to back in a single text buffer.
pub struct FakeModel {
    nodes: Vec<FakeNode>,
    text: String,
}

impl FakeModel {
    pub fn new(mut nodes: Vec<FakeNode>) -> Self {
        let mut text = String::new();
        for node in &mut nodes {
            let start = text.len();
            text.push_str(&node.text);
            node.range = SourceRange::new(0, start, text.len());
        }
        Self { nodes, text }
    }
}

impl SourceModel for FakeModel {
    type Node<'m> = &'m FakeNode;
    type Callee<'m> = &'m FakeCallee;

    fn invocations<'m>(&'m self) -> Box<dyn Iterator<Item = Self::Node<'m>> + 'm> {
        Box::new(self.nodes.iter())
    }

    fn kind<'m>(&'m self, node: &Self::Node<'m>) -> InvocationKind {
        node.kind
    }

    fn in_system_header<'m>(&'m self, node: &Self::Node<'m>) -> bool {
        node.system
    }

    fn source_range<'m>(&'m self, node: &Self::Node<'m>) -> SourceRange {
        node.range
    }

    fn presumed_location<'m>(&'m self, node: &Self::Node<'m>) -> Option<PresumedLocation> {
        node.location.clone()
    }

    fn source_text(&self, range: &SourceRange) -> Option<&str> {
        self.text.get(range.start_byte..range.end_byte)
    }

    fn direct_callee<'m>(&'m self, node: &Self::Node<'m>) -> Option<Self::Callee<'m>> {
        node.callee.as_ref()
    }

    fn callee_kind<'m>(&'m self, callee: &Self::Callee<'m>) -> CalleeKind {
        callee.kind.clone()
    }

    fn qualified_name<'m>(&'m self, callee: &Self::Callee<'m>) -> String {
        callee.name.clone()
    }

    fn pretty_signature<'m>(&'m self, callee: &Self::Callee<'m>) -> String {
        callee.signature.clone()
    }

    fn function_type<'m>(&'m self, callee: &Self::Callee<'m>) -> Option<FunctionProto> {
        callee.proto
    }
}
