//! Core library for a two-pass cross-assembler targeting the Motorola
//! MC6809 and Hitachi HD6309 CPU family.

pub mod addressing;
pub mod assembler;
pub mod contiguous;
pub mod encoder;
pub mod error;
pub mod opcodes;
pub mod primitives;
pub mod statement;

pub use addressing::{AddrMode, AddrValue, IndexBase, IndexOffset, ModeCode, OperandDescriptor, SizedInt};
pub use assembler::{assemble, Assembler, MAX_PASSES};
pub use contiguous::ContiguousBytes;
pub use error::{Error, Result};
pub use primitives::{Label, Register};
pub use statement::{MacroFn, Mnemonic, Statement};
