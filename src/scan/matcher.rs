//! Node matcher: selects invocation nodes and drops system-header ones.

use crate::model::{InvocationKind, PresumedLocation, SourceModel, SourceRange};

/// One matched call-like node, consumed by a single pipeline pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationSite {
    pub kind: InvocationKind,
    pub source_range: SourceRange,
    /// `None` when the front end cannot resolve a location
    pub expr_location: Option<PresumedLocation>,
}

/// A site together with the model node it was built from.
pub struct MatchedInvocation<N> {
    pub site: InvocationSite,
    pub node: N,
}

/// Policy for nodes located in system headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SystemHeaderPolicy {
    /// System-header nodes are never reported
    #[default]
    Exclude,
    /// Report them like any other node
    Include,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NodeMatcher {
    system_headers: SystemHeaderPolicy,
}

impl NodeMatcher {
    pub fn new(system_headers: SystemHeaderPolicy) -> Self {
        Self { system_headers }
    }

    /// Lazily match every invocation node of `model` in document order.
    pub fn matches<'m, M: SourceModel>(
        self,
        model: &'m M,
    ) -> impl Iterator<Item = MatchedInvocation<M::Node<'m>>> + 'm {
        let policy = self.system_headers;
        model
            .invocations()
            .filter(move |node| {
                policy == SystemHeaderPolicy::Include || !model.in_system_header(node)
            })
            .map(move |node| MatchedInvocation {
                site: InvocationSite {
                    kind: model.kind(&node),
                    source_range: model.source_range(&node),
                    expr_location: model.presumed_location(&node),
                },
                node,
            })
    }
}
