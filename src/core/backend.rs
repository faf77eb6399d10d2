// This module defines the Backend trait, the seam between the code generator and the
// concrete code producers. A backend accepts the primitive tape operations in program
// order, hands out labels that can be branched to before they are placed, and is finally
// turned into its unit type: an executable operation list for the interpreter, or raw
// x86-64 machine code for the executable writer. The generator never inspects the unit
// it produces, so adding a backend requires no change to the translation logic.

//! Emitter interface driven by the code generator.

use super::error::CompileResult;

/// A code producer driven by [`Generator`](super::generator::Generator).
///
/// Labels follow a create/place protocol: a label may be used as a branch
/// target as soon as it is created, and is bound to the position of the next
/// emitted operation when placed. Every label used as a target must be placed
/// before [`finalize`](Backend::finalize) is called.
pub trait Backend {
    type Label: Copy;
    type Unit;

    fn label_create(&mut self) -> Self::Label;
    fn label_place(&mut self, label: Self::Label) -> CompileResult<()>;

    /// cell = cell + 1 (mod 256)
    fn increment(&mut self) -> CompileResult<()>;
    /// cell = cell - 1 (mod 256)
    fn decrement(&mut self) -> CompileResult<()>;
    fn move_right(&mut self) -> CompileResult<()>;
    fn move_left(&mut self) -> CompileResult<()>;
    fn output(&mut self) -> CompileResult<()>;
    fn input(&mut self) -> CompileResult<()>;

    fn branch_if_zero(&mut self, target: Self::Label) -> CompileResult<()>;
    fn branch_if_nonzero(&mut self, target: Self::Label) -> CompileResult<()>;

    /// Seal the emitted stream into the backend's unit.
    fn finalize(self) -> CompileResult<Self::Unit>;
}
