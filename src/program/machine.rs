// This module implements the interpreter loop that executes a Program. Machine owns the
// tape (TAPE_LEN zeroed cells) and the cursor (starting at CURSOR_START) for exactly one
// execution. Cell arithmetic wraps at 8 bits. Cursor motion itself is unchecked and may
// leave the tape, but any operation that touches a cell outside the tape stops the run
// with RuntimeError::CursorOutOfBounds instead of corrupting memory. Output is flushed
// before every read so that prompts appear before the program blocks on input, and
// end-of-input is handled according to the EofPolicy the program was compiled with.

//! Interpreter loop for [`Program`].

use super::{Op, Program};
use crate::core::{RuntimeError, RuntimeResult};
use crate::{CURSOR_START, TAPE_LEN};
use std::io::{self, Read, Write};

/// Counters for one execution.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ExecStats {
    /// Operations dispatched, including branches.
    pub ops_executed: u64,
    /// Times a loop body was entered, either from its `[` or by branching back from its `]`.
    pub loop_iterations: u64,
}

/// Tape and cursor for a single execution.
pub struct Machine {
    tape: Box<[u8]>,
    cursor: usize,
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}

impl Machine {
    pub fn new() -> Self {
        Self {
            tape: vec![0; TAPE_LEN].into_boxed_slice(),
            cursor: CURSOR_START,
        }
    }

    pub fn tape(&self) -> &[u8] {
        &self.tape
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Value under the cursor, or `None` if the cursor is off the tape.
    pub fn cell(&self) -> Option<u8> {
        self.tape.get(self.cursor).copied()
    }

    fn load(&self, op: usize) -> RuntimeResult<u8> {
        self.cell().ok_or(RuntimeError::CursorOutOfBounds {
            cursor: self.cursor as isize,
            op,
        })
    }

    fn cell_mut(&mut self, op: usize) -> RuntimeResult<&mut u8> {
        let cursor = self.cursor;
        self.tape.get_mut(cursor).ok_or(RuntimeError::CursorOutOfBounds {
            cursor: cursor as isize,
            op,
        })
    }

    /// Execute `program` to completion on this machine's tape.
    pub fn execute<R: Read, W: Write>(
        &mut self,
        program: &Program,
        input: &mut R,
        output: &mut W,
    ) -> RuntimeResult<ExecStats> {
        let ops = program.ops();
        let fill = program.eof_policy().fill_byte();
        let mut stats = ExecStats::default();
        let mut pc = 0;

        while let Some(&op) = ops.get(pc) {
            let at = pc;
            pc += 1;
            stats.ops_executed += 1;

            match op {
                Op::Increment => {
                    let cell = self.cell_mut(at)?;
                    *cell = cell.wrapping_add(1);
                }
                Op::Decrement => {
                    let cell = self.cell_mut(at)?;
                    *cell = cell.wrapping_sub(1);
                }
                Op::MoveRight => self.cursor = self.cursor.wrapping_add(1),
                Op::MoveLeft => self.cursor = self.cursor.wrapping_sub(1),
                Op::Output => {
                    let value = self.load(at)?;
                    output.write_all(&[value])?;
                }
                Op::Input => {
                    output.flush()?;
                    let cell = self.cell_mut(at)?;
                    match read_byte(input)? {
                        Some(byte) => *cell = byte,
                        None => {
                            if let Some(byte) = fill {
                                *cell = byte;
                            }
                        }
                    }
                }
                Op::JumpIfZero(target) => {
                    if self.load(at)? == 0 {
                        pc = target;
                    } else {
                        stats.loop_iterations += 1;
                    }
                }
                Op::JumpIfNonZero(target) => {
                    if self.load(at)? != 0 {
                        pc = target;
                        stats.loop_iterations += 1;
                    }
                }
            }
        }

        output.flush()?;
        Ok(stats)
    }
}

fn read_byte<R: Read>(input: &mut R) -> io::Result<Option<u8>> {
    let mut buf = [0u8; 1];
    loop {
        match input.read(&mut buf) {
            Ok(0) => return Ok(None),
            Ok(_) => return Ok(Some(buf[0])),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{generate, CompileOptions, EofPolicy};
    use crate::program::ProgramBuilder;

    fn run(source: &str, eof: EofPolicy, input: &[u8]) -> (Machine, Vec<u8>, RuntimeResult<ExecStats>) {
        let options = CompileOptions::default().with_eof(eof);
        let program = generate(source, ProgramBuilder::new(options)).unwrap();
        let mut machine = Machine::new();
        let mut output: Vec<u8> = Vec::new();
        let result = machine.execute(&program, &mut &input[..], &mut output);
        (machine, output, result)
    }

    #[test]
    fn test_fresh_machine() {
        let machine = Machine::new();
        assert_eq!(machine.tape().len(), TAPE_LEN);
        assert_eq!(machine.cursor(), CURSOR_START);
        assert!(machine.tape().iter().all(|&c| c == 0));
    }

    #[test]
    fn test_eof_policies() {
        let (machine, _, result) = run("+++,", EofPolicy::Unchanged, b"");
        result.unwrap();
        assert_eq!(machine.cell(), Some(3));

        let (machine, _, result) = run("+++,", EofPolicy::Zero, b"");
        result.unwrap();
        assert_eq!(machine.cell(), Some(0));

        let (machine, _, result) = run("+++,", EofPolicy::Max, b"");
        result.unwrap();
        assert_eq!(machine.cell(), Some(0xFF));
    }

    #[test]
    fn test_out_of_bounds_access_is_reported() {
        let source = format!("{}+", "<".repeat(CURSOR_START + 1));
        let (_, _, result) = run(&source, EofPolicy::Unchanged, b"");
        match result {
            Err(RuntimeError::CursorOutOfBounds { cursor, op }) => {
                assert_eq!(cursor, -1);
                assert_eq!(op, CURSOR_START + 1);
            }
            other => panic!("expected out of bounds error, got {other:?}"),
        }
    }

    #[test]
    fn test_leaving_and_returning_without_access_is_fine() {
        let source = format!("{}{}+", ">".repeat(TAPE_LEN), "<".repeat(TAPE_LEN));
        let (machine, _, result) = run(&source, EofPolicy::Unchanged, b"");
        result.unwrap();
        assert_eq!(machine.cursor(), CURSOR_START);
        assert_eq!(machine.cell(), Some(1));
    }

    #[test]
    fn test_output_is_flushed_before_input() {
        struct Probe {
            written: Vec<u8>,
            flushed: usize,
        }
        impl Write for Probe {
            fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
                self.written.extend_from_slice(buf);
                Ok(buf.len())
            }
            fn flush(&mut self) -> io::Result<()> {
                self.flushed = self.written.len();
                Ok(())
            }
        }

        let program = generate("+.,", ProgramBuilder::default()).unwrap();
        let mut probe = Probe { written: Vec::new(), flushed: 0 };
        let mut machine = Machine::new();
        machine.execute(&program, &mut &b"x"[..], &mut probe).unwrap();
        assert_eq!(probe.flushed, 1);
        assert_eq!(machine.cell(), Some(b'x'));
    }
}
