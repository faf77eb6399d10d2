// This module provides the x86-64 backend for tapec using the iced-x86 code assembler. It
// targets a freestanding Linux process: the prologue reserves TAPE_LEN bytes on the stack,
// clears them with `rep stosb` and points rbx at the middle of the tape; every tape
// operator then becomes a short instruction sequence over `byte ptr [rbx]`. Output and
// input use raw write(1)/read(0) syscalls of one byte each, so rbx survives them (the
// kernel only clobbers rcx and r11). End-of-input is detected from read's return value
// and handled according to the EofPolicy. Loop brackets map onto cmp/je and cmp/jne
// against iced-x86 labels, which the assembler resolves when the code is finalized. Only
// relative branches are emitted, so the resulting bytes can be placed at any address.
// Cursor motion is not bounds checked here; leaving the tape is undefined behavior of
// the emitted program.

//! x86-64 machine code backend.

use crate::core::{Backend, CompileError, CompileOptions, CompileResult};
use crate::{CURSOR_START, TAPE_LEN};
use iced_x86::code_asm::*;
use iced_x86::IcedError;

const SYS_READ: i32 = 0;
const SYS_WRITE: i32 = 1;
const SYS_EXIT: i32 = 60;
const STDOUT: i32 = 1;

fn encoding(e: IcedError) -> CompileError {
    CompileError::Encoding {
        reason: e.to_string(),
    }
}

struct LabelSlot {
    label: CodeLabel,
    placed: bool,
    used: bool,
}

/// Finished x86-64 code for the whole program, entry at offset 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MachineCode {
    bytes: Vec<u8>,
}

impl MachineCode {
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Backend emitting x86-64 code for a freestanding Linux executable.
pub struct X64Backend {
    assembler: CodeAssembler,
    labels: Vec<LabelSlot>,
    options: CompileOptions,
}

impl X64Backend {
    /// Create a backend and emit the program prologue.
    pub fn new(options: CompileOptions) -> CompileResult<Self> {
        let assembler = CodeAssembler::new(64).map_err(encoding)?;
        let mut backend = Self {
            assembler,
            labels: Vec::new(),
            options,
        };
        backend.emit_prologue()?;
        Ok(backend)
    }

    fn emit_prologue(&mut self) -> CompileResult<()> {
        let a = &mut self.assembler;
        a.sub(rsp, TAPE_LEN as i32).map_err(encoding)?;
        a.mov(rdi, rsp).map_err(encoding)?;
        a.mov(ecx, TAPE_LEN as i32).map_err(encoding)?;
        a.xor(eax, eax).map_err(encoding)?;
        a.rep().stosb().map_err(encoding)?;
        a.lea(rbx, ptr(rsp + CURSOR_START as i32)).map_err(encoding)?;
        Ok(())
    }

    fn emit_epilogue(&mut self) -> CompileResult<()> {
        let a = &mut self.assembler;
        a.mov(eax, SYS_EXIT).map_err(encoding)?;
        a.xor(edi, edi).map_err(encoding)?;
        a.syscall().map_err(encoding)?;
        Ok(())
    }

    fn slot(&mut self, label: usize) -> CompileResult<&mut LabelSlot> {
        self.labels
            .get_mut(label)
            .ok_or(CompileError::UnplacedLabel { label })
    }

    fn target(&mut self, label: usize) -> CompileResult<CodeLabel> {
        let slot = self.slot(label)?;
        slot.used = true;
        Ok(slot.label)
    }

    fn compare_cell_with_zero(&mut self) -> CompileResult<()> {
        self.assembler.cmp(byte_ptr(rbx), 0i32).map_err(encoding)?;
        Ok(())
    }
}

impl Backend for X64Backend {
    type Label = usize;
    type Unit = MachineCode;

    fn label_create(&mut self) -> usize {
        let label = self.assembler.create_label();
        self.labels.push(LabelSlot {
            label,
            placed: false,
            used: false,
        });
        self.labels.len() - 1
    }

    fn label_place(&mut self, label: usize) -> CompileResult<()> {
        let slot = self.slot(label)?;
        slot.placed = true;
        let mut code_label = slot.label;
        self.assembler.set_label(&mut code_label).map_err(encoding)?;
        Ok(())
    }

    fn increment(&mut self) -> CompileResult<()> {
        self.assembler.inc(byte_ptr(rbx)).map_err(encoding)?;
        Ok(())
    }

    fn decrement(&mut self) -> CompileResult<()> {
        self.assembler.dec(byte_ptr(rbx)).map_err(encoding)?;
        Ok(())
    }

    fn move_right(&mut self) -> CompileResult<()> {
        self.assembler.inc(rbx).map_err(encoding)?;
        Ok(())
    }

    fn move_left(&mut self) -> CompileResult<()> {
        self.assembler.dec(rbx).map_err(encoding)?;
        Ok(())
    }

    fn output(&mut self) -> CompileResult<()> {
        let a = &mut self.assembler;
        a.mov(eax, SYS_WRITE).map_err(encoding)?;
        a.mov(edi, STDOUT).map_err(encoding)?;
        a.mov(rsi, rbx).map_err(encoding)?;
        a.mov(edx, 1i32).map_err(encoding)?;
        a.syscall().map_err(encoding)?;
        Ok(())
    }

    fn input(&mut self) -> CompileResult<()> {
        {
            let a = &mut self.assembler;
            a.mov(eax, SYS_READ).map_err(encoding)?;
            a.xor(edi, edi).map_err(encoding)?;
            a.mov(rsi, rbx).map_err(encoding)?;
            a.mov(edx, 1i32).map_err(encoding)?;
            a.syscall().map_err(encoding)?;
        }

        // read() returns 1 on success, 0 at end of input and a negative errno on failure.
        if let Some(fill) = self.options.eof.fill_byte() {
            let mut done = self.assembler.create_label();
            let a = &mut self.assembler;
            a.cmp(rax, 1i32).map_err(encoding)?;
            a.je(done).map_err(encoding)?;
            a.mov(byte_ptr(rbx), fill as i8 as i32).map_err(encoding)?;
            a.set_label(&mut done).map_err(encoding)?;
        }
        Ok(())
    }

    fn branch_if_zero(&mut self, target: usize) -> CompileResult<()> {
        let label = self.target(target)?;
        self.compare_cell_with_zero()?;
        self.assembler.je(label).map_err(encoding)?;
        Ok(())
    }

    fn branch_if_nonzero(&mut self, target: usize) -> CompileResult<()> {
        let label = self.target(target)?;
        self.compare_cell_with_zero()?;
        self.assembler.jne(label).map_err(encoding)?;
        Ok(())
    }

    fn finalize(mut self) -> CompileResult<MachineCode> {
        if let Some(label) = self.labels.iter().position(|slot| slot.used && !slot.placed) {
            return Err(CompileError::UnplacedLabel { label });
        }
        self.emit_epilogue()?;
        let bytes = self.assembler.assemble(0).map_err(encoding)?;
        log::debug!("x64 backend assembled {} bytes", bytes.len());
        Ok(MachineCode { bytes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{generate, EofPolicy};
    use iced_x86::{Decoder, DecoderOptions, Instruction, Mnemonic};

    fn decode(code: &MachineCode) -> Vec<Instruction> {
        let mut decoder = Decoder::with_ip(64, code.bytes(), 0, DecoderOptions::NONE);
        let mut instructions = Vec::new();
        while decoder.can_decode() {
            instructions.push(decoder.decode());
        }
        instructions
    }

    fn mnemonics(code: &MachineCode) -> Vec<Mnemonic> {
        decode(code).iter().map(|i| i.mnemonic()).collect()
    }

    const PROLOGUE: [Mnemonic; 6] = [
        Mnemonic::Sub,
        Mnemonic::Mov,
        Mnemonic::Mov,
        Mnemonic::Xor,
        Mnemonic::Stosb,
        Mnemonic::Lea,
    ];
    const EPILOGUE: [Mnemonic; 3] = [Mnemonic::Mov, Mnemonic::Xor, Mnemonic::Syscall];

    #[test]
    fn test_empty_program_is_prologue_and_exit() {
        let code = generate("", X64Backend::new(CompileOptions::default()).unwrap()).unwrap();
        let mut expected = PROLOGUE.to_vec();
        expected.extend(EPILOGUE);
        assert_eq!(mnemonics(&code), expected);
        assert!(decode(&code)[4].has_rep_prefix());
    }

    #[test]
    fn test_cell_and_cursor_updates() {
        let code = generate("+-><", X64Backend::new(CompileOptions::default()).unwrap()).unwrap();
        let all = mnemonics(&code);
        let body = &all[PROLOGUE.len()..][..4];
        assert_eq!(body, &[Mnemonic::Inc, Mnemonic::Dec, Mnemonic::Inc, Mnemonic::Dec]);
    }

    #[test]
    fn test_loop_branch_targets() {
        let code = generate("[-]", X64Backend::new(CompileOptions::default()).unwrap()).unwrap();
        let instructions = decode(&code);
        let body = &instructions[PROLOGUE.len()..];
        let kinds: Vec<Mnemonic> = body.iter().map(|i| i.mnemonic()).collect();
        assert_eq!(
            &kinds[..5],
            &[Mnemonic::Cmp, Mnemonic::Je, Mnemonic::Dec, Mnemonic::Cmp, Mnemonic::Jne]
        );

        // je skips to the exit sequence, jne returns to the loop body.
        assert_eq!(body[1].near_branch_target(), body[5].ip());
        assert_eq!(body[4].near_branch_target(), body[2].ip());
    }

    #[test]
    fn test_input_with_fill_checks_read_result() {
        let unchanged = generate(",", X64Backend::new(CompileOptions::default()).unwrap()).unwrap();
        let body: Vec<Mnemonic> = mnemonics(&unchanged)[PROLOGUE.len()..].to_vec();
        assert_eq!(
            &body[..5],
            &[Mnemonic::Mov, Mnemonic::Xor, Mnemonic::Mov, Mnemonic::Mov, Mnemonic::Syscall]
        );
        assert_eq!(&body[5..], &EPILOGUE);

        let options = CompileOptions::default().with_eof(EofPolicy::Max);
        let filled = generate(",", X64Backend::new(options).unwrap()).unwrap();
        let instructions = decode(&filled);
        let body = &instructions[PROLOGUE.len()..];
        assert_eq!(body[5].mnemonic(), Mnemonic::Cmp);
        assert_eq!(body[6].mnemonic(), Mnemonic::Je);
        assert_eq!(body[7].mnemonic(), Mnemonic::Mov);
        assert_eq!(body[7].immediate8(), 0xFF);
        assert_eq!(body[6].near_branch_target(), body[8].ip());
    }

    #[test]
    fn test_unplaced_target_fails_finalize() {
        let mut backend = X64Backend::new(CompileOptions::default()).unwrap();
        let label = backend.label_create();
        backend.branch_if_zero(label).unwrap();
        assert!(matches!(
            backend.finalize(),
            Err(CompileError::UnplacedLabel { label: 0 })
        ));
    }
}
