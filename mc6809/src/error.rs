//! Structured error taxonomy for the core assembler.

use crate::addressing::ModeCode;

/// Every way an assemble invocation can fail.
///
/// All variants are fatal to the current `assemble` call; nothing here is
/// retried internally. Unreferenced labels are a warning surfaced through
/// `log::warn!`, not an `Error` variant.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid register {name:?}: {message}")]
    InvalidRegister { name: String, message: String },

    #[error("invalid label {name:?}: {message}")]
    InvalidLabel { name: String, message: String },

    #[error("operand descriptor did not match any known shape: {description}")]
    DescriptorShape { description: String },

    #[error("value {value} out of range: {message}")]
    ValueRange { value: i64, message: String },

    #[error(
        "mnemonic {mnemonic:?} does not support this operand (supports {supported:?}, operand advertises {operand:?})"
    )]
    AddressingModeType {
        mnemonic: String,
        supported: Vec<ModeCode>,
        operand: Vec<ModeCode>,
    },

    #[error("unknown mnemonic {0:?}")]
    UnknownMnemonic(String),

    #[error("label {name:?} already bound to 0x{existing:04X}, cannot rebind to 0x{attempted:04X} on the first pass")]
    DuplicateLabel {
        name: String,
        existing: u32,
        attempted: u32,
    },

    #[error("register {register} has no inter-register nybble mapping")]
    InterRegister { register: String },

    #[error("origin 0x{origin:04X} lies inside an existing code fragment")]
    FragmentOverlap { origin: u32 },

    #[error("too many passes ({passes}); unresolved labels: {unresolved:?}; unreferenced labels: {unreferenced:?}")]
    TooManyPasses {
        passes: usize,
        unresolved: Vec<String>,
        unreferenced: Vec<String>,
    },

    #[error("macro expansion failed: {0}")]
    MacroExpansion(String),
}

pub type Result<T> = std::result::Result<T, Error>;
