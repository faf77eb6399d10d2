//! Backend that records an explicit operation list.
//!
//! Branches are emitted against label ids and patched to operation indices in
//! [`ProgramBuilder::finalize`]. A label is bound to the index of the next
//! operation, so a label placed at the very end points one past the last
//! operation, which the interpreter treats as "stop".

use super::{Op, Program};
use crate::core::{Backend, CompileError, CompileOptions, CompileResult};

/// Label handle issued by [`ProgramBuilder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Label(usize);

/// Builds a [`Program`] for the interpreter.
#[derive(Debug, Default)]
pub struct ProgramBuilder {
    ops: Vec<Op>,
    /// Bound operation index per label.
    labels: Vec<Option<usize>>,
    /// Indices of branch operations still holding a label id.
    fixups: Vec<usize>,
    options: CompileOptions,
}

impl ProgramBuilder {
    pub fn new(options: CompileOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Number of operations emitted so far.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    fn push_branch(&mut self, op: Op) {
        self.fixups.push(self.ops.len());
        self.ops.push(op);
    }

    fn resolve(&self, label: usize) -> CompileResult<usize> {
        self.labels
            .get(label)
            .copied()
            .flatten()
            .ok_or(CompileError::UnplacedLabel { label })
    }
}

impl Backend for ProgramBuilder {
    type Label = Label;
    type Unit = Program;

    fn label_create(&mut self) -> Label {
        self.labels.push(None);
        Label(self.labels.len() - 1)
    }

    fn label_place(&mut self, label: Label) -> CompileResult<()> {
        match self.labels.get_mut(label.0) {
            Some(slot) => {
                *slot = Some(self.ops.len());
                Ok(())
            }
            None => Err(CompileError::UnplacedLabel { label: label.0 }),
        }
    }

    fn increment(&mut self) -> CompileResult<()> {
        self.ops.push(Op::Increment);
        Ok(())
    }

    fn decrement(&mut self) -> CompileResult<()> {
        self.ops.push(Op::Decrement);
        Ok(())
    }

    fn move_right(&mut self) -> CompileResult<()> {
        self.ops.push(Op::MoveRight);
        Ok(())
    }

    fn move_left(&mut self) -> CompileResult<()> {
        self.ops.push(Op::MoveLeft);
        Ok(())
    }

    fn output(&mut self) -> CompileResult<()> {
        self.ops.push(Op::Output);
        Ok(())
    }

    fn input(&mut self) -> CompileResult<()> {
        self.ops.push(Op::Input);
        Ok(())
    }

    fn branch_if_zero(&mut self, target: Label) -> CompileResult<()> {
        self.push_branch(Op::JumpIfZero(target.0));
        Ok(())
    }

    fn branch_if_nonzero(&mut self, target: Label) -> CompileResult<()> {
        self.push_branch(Op::JumpIfNonZero(target.0));
        Ok(())
    }

    fn finalize(mut self) -> CompileResult<Program> {
        for &at in &self.fixups {
            let patched = match self.ops[at] {
                Op::JumpIfZero(label) => Op::JumpIfZero(self.resolve(label)?),
                Op::JumpIfNonZero(label) => Op::JumpIfNonZero(self.resolve(label)?),
                other => other,
            };
            self.ops[at] = patched;
        }
        log::trace!("program backend finalized {} operations", self.ops.len());
        Ok(Program {
            ops: self.ops,
            eof: self.options.eof,
        })
    }
}
