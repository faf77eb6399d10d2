//! Portable backend: an explicit operation list and the interpreter loop that runs it.
//!
//! [`ProgramBuilder`] is the [`Backend`](crate::core::Backend) the generator
//! drives in immediate mode. The finished [`Program`] is immutable and can be
//! run any number of times; every run gets its own [`Machine`] with a fresh
//! zeroed tape.

pub mod builder;
pub mod machine;

pub use builder::{Label, ProgramBuilder};
pub use machine::{ExecStats, Machine};

use crate::core::{EofPolicy, RuntimeResult};
use std::fmt;
use std::io::{self, BufWriter, Read, Write};

/// One interpreter operation. Jump targets are operation indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Increment,
    Decrement,
    MoveRight,
    MoveLeft,
    Output,
    Input,
    JumpIfZero(usize),
    JumpIfNonZero(usize),
}

/// A finalized code unit for the interpreter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    ops: Vec<Op>,
    eof: EofPolicy,
}

impl Program {
    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    pub fn eof_policy(&self) -> EofPolicy {
        self.eof
    }

    /// Run against the process's standard input and output.
    pub fn run(&self) -> RuntimeResult<ExecStats> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        let mut input = stdin.lock();
        let mut output = BufWriter::new(stdout.lock());
        self.run_with(&mut input, &mut output)
    }

    /// Run against arbitrary byte streams.
    pub fn run_with<R: Read, W: Write>(&self, input: &mut R, output: &mut W) -> RuntimeResult<ExecStats> {
        let mut machine = Machine::new();
        machine.execute(self, input, output)
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, op) in self.ops.iter().enumerate() {
            match op {
                Op::Increment => writeln!(f, "{idx:5}: inc")?,
                Op::Decrement => writeln!(f, "{idx:5}: dec")?,
                Op::MoveRight => writeln!(f, "{idx:5}: right")?,
                Op::MoveLeft => writeln!(f, "{idx:5}: left")?,
                Op::Output => writeln!(f, "{idx:5}: out")?,
                Op::Input => writeln!(f, "{idx:5}: in")?,
                Op::JumpIfZero(target) => writeln!(f, "{idx:5}: jz {target}")?,
                Op::JumpIfNonZero(target) => writeln!(f, "{idx:5}: jnz {target}")?,
            }
        }
        Ok(())
    }
}
