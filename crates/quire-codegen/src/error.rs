//! Code generation errors
//!
//! Errors fall into three tiers (see [`ErrorTier`]):
//! - assembly-time: the operation registry itself is misconfigured
//! - call-site: one compilation unit asked for something invalid
//! - protocol: an output sink failed or its protocol was violated

use thiserror::Error;

use crate::plugin::Backend;

/// Result alias for code generation.
pub type CodegenResult<T> = Result<T, CodegenError>;

/// Result alias for output sinks.
pub type StreamResult<T> = Result<T, StreamError>;

/// Severity class of a [`CodegenError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorTier {
    /// Pipeline assembly failed; nothing can compile until it is fixed.
    Assembly,
    /// A single call site is invalid; other units may still compile.
    CallSite,
    /// Output could not be written faithfully; the render must be abandoned.
    Protocol,
}

/// Errors raised while assembling the registry or realizing a call.
#[derive(Debug, Error)]
pub enum CodegenError {
    #[error("Duplicate operation: {name}")]
    DuplicateOperation { name: String },

    #[error("Operation {name} has an empty realization table")]
    EmptyRealizationTable { name: String },

    #[error("Operation {name} accepts no arities")]
    NoArities { name: String },

    #[error("Duplicate method registration: {owner}.{name}/{arity}")]
    DuplicateMethod {
        owner: String,
        name: String,
        arity: usize,
    },

    #[error("Unknown operation: {name}")]
    UnknownOperation { name: String },

    #[error("Unknown backend requested for operation {operation}: {backend}")]
    UnknownBackend { operation: String, backend: Backend },

    #[error("Arity {arity} not registered for operation {operation}")]
    ArityNotRegistered { operation: String, arity: usize },

    #[error("Malformed literal argument: `{text}`")]
    MalformedLiteral { text: String },

    #[error("Unrecognized allow-list entry: `{name}`")]
    UnrecognizedAllowListEntry { name: String },

    #[error("No overload of {owner}.{name} takes {arity} arguments")]
    NoOverload {
        owner: String,
        name: String,
        arity: usize,
    },

    #[error("Unknown global: {name}")]
    UnknownGlobal { name: String },

    #[error("Operation {name} has no streaming form")]
    NoStreamingForm { name: String },

    #[error("Backend {backend} does not render text")]
    NotATextBackend { backend: Backend },

    #[error(transparent)]
    Stream(#[from] StreamError),
}

impl CodegenError {
    /// Classify this error.
    pub fn tier(&self) -> ErrorTier {
        match self {
            CodegenError::DuplicateOperation { .. }
            | CodegenError::EmptyRealizationTable { .. }
            | CodegenError::NoArities { .. }
            | CodegenError::DuplicateMethod { .. } => ErrorTier::Assembly,
            // Output already written to the sink can no longer be trusted.
            CodegenError::Stream(_) => ErrorTier::Protocol,
            _ => ErrorTier::CallSite,
        }
    }

    pub(crate) fn arity(operation: &str, arity: usize) -> Self {
        CodegenError::ArityNotRegistered {
            operation: operation.to_string(),
            arity,
        }
    }
}

/// Errors raised by output sinks.
#[derive(Debug, Error)]
pub enum StreamError {
    #[error("Log-only suppression depth overflowed at {depth}")]
    SuppressionOverflow { depth: u32 },

    #[error("Range {start}..{end} is not valid for a {len}-byte string")]
    InvalidRange { start: usize, end: usize, len: usize },

    #[error("Output sink failed: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_include_offending_text() {
        let err = CodegenError::MalformedLiteral {
            text: "'sp'an'".to_string(),
        };
        assert_eq!(err.to_string(), "Malformed literal argument: `'sp'an'`");

        let err = CodegenError::UnrecognizedAllowListEntry {
            name: "notatag".to_string(),
        };
        assert!(err.to_string().contains("notatag"));

        let err = CodegenError::arity("flat", 3);
        assert_eq!(err.to_string(), "Arity 3 not registered for operation flat");
    }

    #[test]
    fn test_tiers() {
        assert_eq!(
            CodegenError::DuplicateOperation { name: "x".into() }.tier(),
            ErrorTier::Assembly
        );
        assert_eq!(CodegenError::arity("x", 0).tier(), ErrorTier::CallSite);
        assert_eq!(
            CodegenError::from(StreamError::SuppressionOverflow { depth: u32::MAX }).tier(),
            ErrorTier::Protocol
        );
    }

    #[test]
    fn test_every_sink_failure_aborts_the_render() {
        let range = StreamError::InvalidRange { start: 0, end: 1, len: 0 };
        assert_eq!(CodegenError::from(range).tier(), ErrorTier::Protocol);

        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed");
        assert_eq!(CodegenError::from(StreamError::from(io)).tier(), ErrorTier::Protocol);
    }
}
