// This module offers the two entry points the command-line front end (and library users)
// need: compile_program produces an interpreter Program for immediate execution, and
// compile_executable produces the bytes of a standalone Linux x86-64 executable. Both run
// the same generator over the source, only the backend differs, and both fail with the
// first CompileError without producing any partial output.

//! High-level compilation entry points.

use crate::core::{generate_with_stats, CompileOptions, CompileResult};
use crate::program::{Program, ProgramBuilder};
use crate::x64::{self, MachineCode, X64Backend};

/// Compile `source` into an interpreter program.
pub fn compile_program(source: &str, options: CompileOptions) -> CompileResult<Program> {
    let (program, stats) = generate_with_stats(source, ProgramBuilder::new(options))?;
    log::trace!("{stats}");
    Ok(program)
}

/// Compile `source` into raw x86-64 machine code.
pub fn compile_machine_code(source: &str, options: CompileOptions) -> CompileResult<MachineCode> {
    let (code, stats) = generate_with_stats(source, X64Backend::new(options)?)?;
    log::trace!("{stats}");
    Ok(code)
}

/// Compile `source` into a standalone ELF executable image.
pub fn compile_executable(source: &str, options: CompileOptions) -> CompileResult<Vec<u8>> {
    let code = compile_machine_code(source, options)?;
    x64::write_executable(&code)
}
