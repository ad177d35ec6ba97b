//! Call-site classification and extraction engine.
//!
//! Works purely against [`crate::model::SourceModel`]; the concrete front end
//! lives in [`crate::frontend`].

pub mod classify;
pub mod filter;
pub mod matcher;
pub mod pipeline;
pub mod record;
pub mod resolver;
#[cfg(test)]
pub(crate) mod testing;

pub use classify::{ExceptionGuarantee, classify};
pub use filter::{FilterConfig, STD_NAMESPACE_PREFIX};
pub use matcher::{InvocationSite, MatchedInvocation, NodeMatcher, SystemHeaderPolicy};
pub use pipeline::{ScanPipeline, ScanStats};
pub use record::{ELLIPSIS, OutputRecord, RecordOptions, SNIPPET_MAX_CHARS, UNKNOWN_FILE};
pub use resolver::{CalleeIdentity, resolve};
