use std::io;
use std::path::PathBuf;

use crate::cast::Kind;

/// Why a line was rejected while building the section tree.
#[derive(Debug, thiserror::Error)]
pub enum SyntaxErrorKind {
    #[error("missing assignment operator")]
    MissingAssignment,
    #[error("invalid depth jump from {from} to {to}")]
    DepthJump { from: usize, to: usize },
    #[error("duplicate section '{0}' at this level")]
    DuplicateSection(String),
    #[error("duplicate key '{0}' in section")]
    DuplicateKey(String),
    #[error("malformed section header")]
    MalformedHeader,
}

/// A parse failure. The whole document is discarded; there is no partial tree.
/// Line numbers are 1-based.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("{kind} on line #{line}")]
    Syntax { line: usize, kind: SyntaxErrorKind },
    /// The stream failed while reading `line`.
    #[error("read failed on line #{line}: {source}")]
    Read {
        line: usize,
        #[source]
        source: io::Error,
    },
}

impl ParseError {
    pub fn syntax(line: usize, kind: SyntaxErrorKind) -> Self {
        Self::Syntax { line, kind }
    }

    pub fn line(&self) -> usize {
        match self {
            Self::Syntax { line, .. } | Self::Read { line, .. } => *line,
        }
    }

    /// The grammar or invariant violation, if this is not a read failure.
    pub fn syntax_kind(&self) -> Option<&SyntaxErrorKind> {
        match self {
            Self::Syntax { kind, .. } => Some(kind),
            Self::Read { .. } => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to open file: {}", path.display())]
    StreamUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Parse(#[from] ParseError),
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CastError {
    #[error("'{input}' is not a valid {kind}")]
    InvalidLiteral { input: String, kind: Kind },
    #[error("'{input}' is not a brace-delimited array")]
    NotAnArray { input: String },
}
