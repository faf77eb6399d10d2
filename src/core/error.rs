// This module defines the error types for tapec using the thiserror crate. CompileError
// covers everything that can stop a translation: loop brackets that do not pair up
// (reported with the line and column of the offending bracket), labels that were branched
// to but never placed, failures reported by the iced-x86 assembler, and failures while
// laying out the ELF container. RuntimeError covers the interpreter: stream I/O failures
// and tape accesses outside the tape. CompileResult<T> and RuntimeResult<T> are the
// matching Result aliases.

//! Error types for compilation and execution.

use thiserror::Error;

/// Errors raised while translating source text into a code unit.
#[derive(Error, Debug)]
pub enum CompileError {
    #[error("unmatched ']' at line {line}, column {column}")]
    UnmatchedClose { line: usize, column: usize },

    #[error("unclosed '[' at line {line}, column {column}")]
    UnclosedLoop { line: usize, column: usize },

    #[error("label {label} is a branch target but was never placed")]
    UnplacedLabel { label: usize },

    #[error("machine code encoding failed: {reason}")]
    Encoding { reason: String },

    #[error("failed to write executable: {reason}")]
    ObjectWrite { reason: String },
}

/// Errors raised while a compiled program runs in the interpreter.
#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("stream I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("cursor {cursor} is outside the tape (operation {op})")]
    CursorOutOfBounds { cursor: isize, op: usize },
}

/// Result type alias for compile operations.
pub type CompileResult<T> = Result<T, CompileError>;

/// Result type alias for program execution.
pub type RuntimeResult<T> = Result<T, RuntimeError>;
