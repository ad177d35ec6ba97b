//! User-configurable inclusion predicates.

use crate::scan::resolver::CalleeIdentity;
use serde::{Deserialize, Serialize};

/// Literal qualifier of the standard namespace.
pub const STD_NAMESPACE_PREFIX: &str = "std::";

/// Inclusion filters, immutable for the whole run.
///
/// Both predicates must pass; a `false`/empty predicate imposes nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct FilterConfig {
    /// Keep only callees whose qualified name starts with `std::`
    #[serde(default)]
    pub only_std: bool,

    /// Keep only callees whose qualified name starts with this literal text
    #[serde(default)]
    pub name_prefix: String,
}

impl FilterConfig {
    pub fn new(only_std: bool, name_prefix: impl Into<String>) -> Self {
        Self {
            only_std,
            name_prefix: name_prefix.into(),
        }
    }

    /// Whether a resolved callee passes both predicates.
    ///
    /// Prefix checks are plain string prefixes, not segment-aware:
    /// `std::filesystem::pat` matches `std::filesystem::path`.
    pub fn accept(&self, identity: &CalleeIdentity) -> bool {
        self.accepts_name(&identity.qualified_name)
    }

    pub fn accepts_name(&self, qualified_name: &str) -> bool {
        if self.only_std && !qualified_name.starts_with(STD_NAMESPACE_PREFIX) {
            return false;
        }
        self.name_prefix.is_empty() || qualified_name.starts_with(&self.name_prefix)
    }

    /// True when no predicate restricts output.
    pub fn is_unrestricted(&self) -> bool {
        !self.only_std && self.name_prefix.is_empty()
    }
}
