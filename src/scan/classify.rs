//! Exception classification from a callee's resolved function type.
//!
//! This is a declared-contract check. A `noexcept` function that would call
//! `std::terminate` is still `noexcept`; a function with a throwing
//! specification that never throws is still `may-throw`.

use crate::model::FunctionProto;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExceptionGuarantee {
    NoThrow,
    MayThrow,
}

impl ExceptionGuarantee {
    /// Label used in the `noexcept` output column.
    pub fn label(&self) -> &'static str {
        match self {
            ExceptionGuarantee::NoThrow => "noexcept",
            ExceptionGuarantee::MayThrow => "may-throw",
        }
    }
}

impl fmt::Display for ExceptionGuarantee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classify a callee from its function type.
///
/// Anything short of a provable non-throwing specification is `MayThrow`,
/// including a missing prototype.
pub fn classify(function_type: Option<&FunctionProto>) -> ExceptionGuarantee {
    match function_type {
        Some(proto) if proto.exception_spec.is_nothrow() => ExceptionGuarantee::NoThrow,
        _ => ExceptionGuarantee::MayThrow,
    }
}
