use std::fmt;

use serde::Serialize;

use crate::frontend::diagnostic::Diagnostic;
use crate::frontend::position::Position;
use crate::runtime::host::HostError;
use crate::runtime::stack::StackError;

/// What went wrong. Every kind aborts the whole program; there is no
/// catch or resume in the language.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ErrorKind {
    StackUnderflow,
    StackOverflow,
    TypeMismatch {
        operation: &'static str,
        expected: &'static str,
        got: String,
    },
    UndefinedRegister(u8),
    ArityMismatch {
        left: usize,
    },
    HostFailure(HostError),
    InvalidPattern {
        pattern: String,
        detail: String,
    },
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::StackUnderflow => write!(f, "stack underflow"),
            ErrorKind::StackOverflow => write!(f, "stack overflow"),
            ErrorKind::TypeMismatch {
                operation,
                expected,
                got,
            } => write!(
                f,
                "type mismatch in `{operation}`: expected {expected}, got {got}"
            ),
            ErrorKind::UndefinedRegister(register) => {
                write!(f, "undefined register {register}")
            }
            ErrorKind::ArityMismatch { left } => {
                write!(f, "block left {left} values on its stack, expected exactly 1")
            }
            ErrorKind::HostFailure(error) => write!(f, "host failure: {error}"),
            ErrorKind::InvalidPattern { pattern, detail } => {
                write!(f, "invalid pattern {pattern:?}: {detail}")
            }
        }
    }
}

impl From<StackError> for ErrorKind {
    fn from(error: StackError) -> Self {
        match error {
            StackError::Underflow => ErrorKind::StackUnderflow,
            StackError::Overflow => ErrorKind::StackOverflow,
        }
    }
}

impl From<HostError> for ErrorKind {
    fn from(error: HostError) -> Self {
        ErrorKind::HostFailure(error)
    }
}

/// A runtime failure, pinned to the source position of the instruction
/// that was executing. Inside a block invocation the position is the
/// instruction inside the block, not the combinator that called it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuntimeError {
    pub kind: ErrorKind,
    pub position: Position,
}

impl RuntimeError {
    pub fn new(kind: ErrorKind, position: Position) -> Self {
        Self { kind, position }
    }

    /// Renders the error as a diagnostic, for embedders that report
    /// parse and runtime failures through the same channel.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diagnostic = Diagnostic::error(self.kind.to_string()).with_position(self.position);
        match &self.kind {
            ErrorKind::UndefinedRegister(_) => {
                diagnostic.with_hint("Define it first with `iload`.")
            }
            ErrorKind::ArityMismatch { .. } => {
                diagnostic.with_hint("A block must leave exactly one result for its caller.")
            }
            _ => diagnostic,
        }
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.kind, self.position)
    }
}

impl std::error::Error for RuntimeError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_position() {
        let error = RuntimeError::new(ErrorKind::StackUnderflow, Position::new(3, 7));
        assert_eq!(error.to_string(), "stack underflow at 3:7");
    }

    #[test]
    fn type_mismatch_display() {
        let kind = ErrorKind::TypeMismatch {
            operation: "+",
            expected: "Number and Number",
            got: "Number and String".to_string(),
        };
        assert_eq!(
            kind.to_string(),
            "type mismatch in `+`: expected Number and Number, got Number and String"
        );
    }

    #[test]
    fn stack_errors_convert() {
        assert_eq!(ErrorKind::from(StackError::Underflow), ErrorKind::StackUnderflow);
        assert_eq!(ErrorKind::from(StackError::Overflow), ErrorKind::StackOverflow);
    }

    #[test]
    fn diagnostic_carries_hint_for_registers() {
        let error = RuntimeError::new(ErrorKind::UndefinedRegister(4), Position::new(1, 1));
        let rendered = error.to_diagnostic().render(None);
        let plain = crate::frontend::diagnostic::strip_ansi(&rendered);
        assert!(plain.contains("undefined register 4"));
        assert!(plain.contains("Hint: Define it first with `iload`."));
    }
}
