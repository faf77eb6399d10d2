//! Standalone ELF executables for Linux x86-64.
//!
//! The file is laid out as:
//!
//! ```text
//! 0x000  ELF64 file header
//! 0x040  PT_LOAD       (R+X, covers the whole file)
//! 0x078  PT_GNU_STACK  (RW, non-executable stack)
//! 0x0b0  machine code, entry point
//! ```
//!
//! The whole file is mapped at [`BASE_ADDRESS`]; there are no sections, no
//! symbols and no dynamic linking. Output depends only on the machine code,
//! so identical programs produce identical files.

use super::encoder::MachineCode;
use crate::core::{CompileError, CompileResult};
use object::elf;
use object::write::elf::{FileHeader, ProgramHeader, Writer};
use object::Endianness;

/// Virtual address the file is mapped at.
pub const BASE_ADDRESS: u64 = 0x40_0000;

const PAGE_SIZE: u64 = 0x1000;
const CODE_ALIGN: usize = 16;

fn object_write(e: object::write::Error) -> CompileError {
    CompileError::ObjectWrite {
        reason: e.to_string(),
    }
}

/// Wrap `code` into an executable image whose entry point is the first code byte.
pub fn write_executable(code: &MachineCode) -> CompileResult<Vec<u8>> {
    let mut buffer = Vec::new();
    let mut writer = Writer::new(Endianness::Little, true, &mut buffer);

    writer.reserve_file_header();
    writer.reserve_program_headers(2);
    let code_offset = writer.reserve(code.len(), CODE_ALIGN);
    let file_len = writer.reserved_len() as u64;
    let entry = BASE_ADDRESS + code_offset as u64;

    writer
        .write_file_header(&FileHeader {
            os_abi: elf::ELFOSABI_NONE,
            abi_version: 0,
            e_type: elf::ET_EXEC,
            e_machine: elf::EM_X86_64,
            e_entry: entry,
            e_flags: 0,
        })
        .map_err(object_write)?;

    writer.write_align_program_headers();
    writer.write_program_header(&ProgramHeader {
        p_type: elf::PT_LOAD,
        p_flags: elf::PF_R | elf::PF_X,
        p_offset: 0,
        p_vaddr: BASE_ADDRESS,
        p_paddr: BASE_ADDRESS,
        p_filesz: file_len,
        p_memsz: file_len,
        p_align: PAGE_SIZE,
    });
    writer.write_program_header(&ProgramHeader {
        p_type: elf::PT_GNU_STACK,
        p_flags: elf::PF_R | elf::PF_W,
        p_offset: 0,
        p_vaddr: 0,
        p_paddr: 0,
        p_filesz: 0,
        p_memsz: 0,
        p_align: CODE_ALIGN as u64,
    });

    writer.write_align(CODE_ALIGN);
    writer.write(code.bytes());

    log::debug!(
        "wrote ELF executable: {} bytes, entry {:#x}",
        file_len,
        entry
    );
    Ok(buffer)
}
