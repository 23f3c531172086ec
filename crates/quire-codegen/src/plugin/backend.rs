//! Backend tags

use std::fmt;

use crate::ir::Dialect;

/// One supported output form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Backend {
    /// JavaScript source text
    JavaScript,
    /// Python source text
    Python,
    /// In-process invocations of registered methods
    Bytecode,
}

impl Backend {
    pub const ALL: [Backend; 3] = [Backend::JavaScript, Backend::Python, Backend::Bytecode];

    /// The text dialect, for text backends.
    pub fn dialect(self) -> Option<Dialect> {
        match self {
            Backend::JavaScript => Some(Dialect::JavaScript),
            Backend::Python => Some(Dialect::Python),
            Backend::Bytecode => None,
        }
    }

    pub fn is_text(self) -> bool {
        self.dialect().is_some()
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Backend::JavaScript => "javascript",
            Backend::Python => "python",
            Backend::Bytecode => "bytecode",
        };
        write!(f, "{}", s)
    }
}
