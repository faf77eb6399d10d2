//! x86-64 architecture-specific components.
//!
//! - Instruction encoding of the tape operators using iced-x86
//! - ELF executable writer for Linux

pub mod elf;
pub mod encoder;

pub use elf::{write_executable, BASE_ADDRESS};
pub use encoder::{MachineCode, X64Backend};
