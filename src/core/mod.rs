// This module gathers the target-independent parts of tapec: the scanner that picks the
// eight operators out of arbitrary source text, the Backend trait that abstracts over code
// producers, the single-pass Generator with its loop stack, compile options (end-of-input
// policy) and the error types. Backends live in their own modules (program, x64) and only
// depend on the items re-exported here.

//! Core translation infrastructure shared by all backends.

pub mod backend;
pub mod error;
pub mod generator;
pub mod options;
pub mod scanner;

pub use backend::Backend;

pub use error::{CompileError, CompileResult, RuntimeError, RuntimeResult};

pub use generator::{generate, generate_with_stats, CompileStats, Generator};

pub use options::{CompileOptions, EofPolicy};

pub use scanner::{Position, Scanner, Spanned, Token};
