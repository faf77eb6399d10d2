// This module implements the code generator, the heart of tapec. Generator walks the
// scanned operator stream once, front to back, and maps every operator onto the Backend
// primitives. Loops are resolved with a stack of open loop contexts: an opening bracket
// creates an entry and an exit label, branches to the exit when the current cell is zero
// and places the entry; the matching closing bracket pops the context, branches back to
// the entry when the cell is non-zero and places the exit. Both bracket mismatches (a
// close with nothing open, an open left at end of input) are reported with their source
// position before the backend is finalized, so no partially generated unit ever escapes.
// CompileStats records what was seen for logging and tests.

//! Single-pass translation from source text into a [`Backend`].

use super::backend::Backend;
use super::error::{CompileError, CompileResult};
use super::scanner::{Position, Scanner, Spanned, Token};
use std::fmt;

/// Counters gathered during one generation pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CompileStats {
    pub increments: usize,
    pub decrements: usize,
    pub moves_right: usize,
    pub moves_left: usize,
    pub outputs: usize,
    pub inputs: usize,
    pub loops: usize,
    pub max_depth: usize,
    /// Characters skipped as comments.
    pub ignored: usize,
}

impl CompileStats {
    /// Total number of operators translated.
    pub fn operators(&self) -> usize {
        self.increments
            + self.decrements
            + self.moves_right
            + self.moves_left
            + self.outputs
            + self.inputs
            + self.loops * 2
    }
}

impl fmt::Display for CompileStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Compilation Statistics:")?;
        writeln!(f, "  Operators: {}", self.operators())?;
        writeln!(f, "  Cell updates: +{} -{}", self.increments, self.decrements)?;
        writeln!(f, "  Cursor moves: >{} <{}", self.moves_right, self.moves_left)?;
        writeln!(f, "  I/O: .{} ,{}", self.outputs, self.inputs)?;
        writeln!(f, "  Loops: {} (max depth {})", self.loops, self.max_depth)?;
        write!(f, "  Ignored characters: {}", self.ignored)
    }
}

struct OpenLoop<L> {
    entry: L,
    exit: L,
    pos: Position,
}

/// Drives a backend from a stream of operators.
pub struct Generator<B: Backend> {
    backend: B,
    loops: Vec<OpenLoop<B::Label>>,
    stats: CompileStats,
}

impl<B: Backend> Generator<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            loops: Vec::new(),
            stats: CompileStats::default(),
        }
    }

    /// Current loop nesting depth.
    pub fn depth(&self) -> usize {
        self.loops.len()
    }

    /// Translate one operator.
    pub fn emit(&mut self, spanned: Spanned) -> CompileResult<()> {
        let Spanned { token, pos } = spanned;
        log::trace!("{}:{} emit '{}'", pos.line, pos.column, token.as_char());

        match token {
            Token::Increment => {
                self.stats.increments += 1;
                self.backend.increment()
            }
            Token::Decrement => {
                self.stats.decrements += 1;
                self.backend.decrement()
            }
            Token::MoveRight => {
                self.stats.moves_right += 1;
                self.backend.move_right()
            }
            Token::MoveLeft => {
                self.stats.moves_left += 1;
                self.backend.move_left()
            }
            Token::Output => {
                self.stats.outputs += 1;
                self.backend.output()
            }
            Token::Input => {
                self.stats.inputs += 1;
                self.backend.input()
            }
            Token::LoopBegin => {
                let entry = self.backend.label_create();
                let exit = self.backend.label_create();
                self.backend.branch_if_zero(exit)?;
                self.backend.label_place(entry)?;
                self.loops.push(OpenLoop { entry, exit, pos });
                self.stats.loops += 1;
                self.stats.max_depth = self.stats.max_depth.max(self.loops.len());
                Ok(())
            }
            Token::LoopEnd => {
                let open = self.loops.pop().ok_or(CompileError::UnmatchedClose {
                    line: pos.line,
                    column: pos.column,
                })?;
                self.backend.branch_if_nonzero(open.entry)?;
                self.backend.label_place(open.exit)
            }
        }
    }

    /// Check that every loop was closed and finalize the backend.
    pub fn finish(self) -> CompileResult<(B::Unit, CompileStats)> {
        if let Some(open) = self.loops.last() {
            return Err(CompileError::UnclosedLoop {
                line: open.pos.line,
                column: open.pos.column,
            });
        }
        let unit = self.backend.finalize()?;
        Ok((unit, self.stats))
    }
}

/// Translate `source` into `backend` and return the finished unit with its statistics.
pub fn generate_with_stats<B: Backend>(source: &str, backend: B) -> CompileResult<(B::Unit, CompileStats)> {
    let mut generator = Generator::new(backend);
    let mut scanner = Scanner::new(source);
    for spanned in scanner.by_ref() {
        generator.emit(spanned)?;
    }
    generator.stats.ignored = scanner.ignored();

    let (unit, stats) = generator.finish()?;
    log::debug!(
        "generated {} operators ({} loops, max depth {}, {} ignored characters)",
        stats.operators(),
        stats.loops,
        stats.max_depth,
        stats.ignored
    );
    Ok((unit, stats))
}

/// Translate `source` into `backend`.
pub fn generate<B: Backend>(source: &str, backend: B) -> CompileResult<B::Unit> {
    generate_with_stats(source, backend).map(|(unit, _)| unit)
}
