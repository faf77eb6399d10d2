//! tapec - a compiler for the eight-instruction tape language.
//!
//! Source text is scanned for the operators `+ - > < . , [ ]` (everything else
//! is a comment) and translated in one pass into a backend. Two backends
//! exist: an operation list run by a portable interpreter, and x86-64 machine
//! code that is wrapped into a standalone Linux executable.
//!
//! # Primary Usage
//!
//! ```no_run
//! use tapec::{compile_program, CompileOptions};
//!
//! let program = compile_program("++++++++[>++++++++<-]>+.", CompileOptions::default())?;
//! program.run()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Architecture
//!
//! - [`core`](crate::core) - scanner, generator, backend trait, options and errors
//! - [`program`] - operation list backend and interpreter
//! - [`x64`] - x86-64 encoder and ELF writer
//! - [`driver`] - one-call compilation entry points

pub mod core;
pub mod driver;
pub mod program;
pub mod x64;

pub use crate::core::{
    generate, Backend, CompileError, CompileOptions, CompileResult, CompileStats, EofPolicy,
    Generator, RuntimeError, RuntimeResult, Token,
};
pub use driver::{compile_executable, compile_machine_code, compile_program};
pub use program::{ExecStats, Machine, Op, Program, ProgramBuilder};
pub use x64::{MachineCode, X64Backend};

/// Number of cells on the tape.
pub const TAPE_LEN: usize = 32768;

/// Cursor position at the start of every execution.
pub const CURSOR_START: usize = TAPE_LEN / 2;
