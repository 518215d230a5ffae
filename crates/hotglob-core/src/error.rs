//! Transform error taxonomy.
//!
//! Shape mismatches ("this isn't a glob-accept call") are not errors —
//! those call-sites are silently skipped. Everything here means the user
//! intended a glob-accept call and got it wrong; all variants carry the
//! byte offset of the offending call-site so hosts can point at it.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    /// Unbalanced delimiters, or the parse budget ran out.
    #[error("invalid glob import syntax: {reason}")]
    MalformedCall { pos: usize, reason: String },

    /// The statement is not the expected call expression.
    #[error("invalid glob import syntax: expected call expression, got {found}")]
    InvalidCallShape { pos: usize, found: String },

    /// A `glob` property is present but its value has the wrong shape.
    #[error("invalid glob import syntax: {reason}")]
    InvalidGlobValue { pos: usize, reason: String },

    /// A relative glob was used in a module with no on-disk location.
    #[error("in virtual modules, all globs must start with '/'")]
    VirtualModuleRelativeGlob { pos: usize },

    /// A bare-specifier glob did not resolve to an absolute path.
    #[error("invalid glob: \"{glob}\" (resolved: \"{resolved}\"). It must start with '/' or './'")]
    UnresolvableGlob {
        pos: usize,
        glob: String,
        resolved: String,
    },
}

impl TransformError {
    /// Byte offset of the call-site this error belongs to.
    pub fn pos(&self) -> usize {
        match self {
            TransformError::MalformedCall { pos, .. }
            | TransformError::InvalidCallShape { pos, .. }
            | TransformError::InvalidGlobValue { pos, .. }
            | TransformError::VirtualModuleRelativeGlob { pos }
            | TransformError::UnresolvableGlob { pos, .. } => *pos,
        }
    }
}
