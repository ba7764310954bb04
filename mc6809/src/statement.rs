//! The statement model: mnemonic-tagged instruction records plus the four
//! directives (ORG, FCB, FDB, CALL), each carrying an optional label and
//! comment.

use std::rc::Rc;

use crate::addressing::AddrMode;
use crate::assembler::Assembler;
use crate::error::{Error, Result};
use crate::opcodes::opcode_table;
use crate::primitives::Label;

/// A non-empty, letter-led identifier indexing the opcode table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Mnemonic {
    key: String,
}

impl Mnemonic {
    pub fn new(key: impl Into<String>) -> Result<Self> {
        let key = key.into();
        let starts_with_letter = key.chars().next().is_some_and(|c| c.is_alphabetic());
        if key.is_empty() || !starts_with_letter {
            return Err(Error::DescriptorShape {
                description: format!("mnemonic {key:?} must be non-empty and start with a letter"),
            });
        }
        Ok(Mnemonic { key })
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

/// The callback invoked by a CALL directive. It receives the assembler and
/// may return statements to splice in for assembly, or `None` for a
/// side-effect-only macro.
pub type MacroFn = Rc<dyn Fn(&mut Assembler) -> Result<Option<Vec<Statement>>>>;

#[derive(Clone)]
pub enum StatementBody {
    Instruction { mnemonic: Mnemonic, operand: AddrMode },
    Org { operand: AddrMode },
    Fcb { operand: AddrMode },
    Fdb { operand: AddrMode },
    Call { callback: MacroFn },
}

impl std::fmt::Debug for StatementBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatementBody::Instruction { mnemonic, operand } => {
                f.debug_struct("Instruction").field("mnemonic", mnemonic).field("operand", operand).finish()
            }
            StatementBody::Org { operand } => f.debug_struct("Org").field("operand", operand).finish(),
            StatementBody::Fcb { operand } => f.debug_struct("Fcb").field("operand", operand).finish(),
            StatementBody::Fdb { operand } => f.debug_struct("Fdb").field("operand", operand).finish(),
            StatementBody::Call { .. } => f.write_str("Call(<macro>)"),
        }
    }
}

/// `{mnemonic-or-directive, operand, label?, comment?}`.
#[derive(Debug, Clone)]
pub struct Statement {
    pub body: StatementBody,
    pub label: Option<Label>,
    pub comment: Option<String>,
}

impl Statement {
    /// Builds an instruction statement, validating that the operand's mode
    /// codes intersect the mnemonic's supported modes in at least one
    /// element (a statement-construction invariant, not merely an
    /// encode-time concern).
    pub fn instruction(mnemonic: Mnemonic, operand: AddrMode) -> Result<Self> {
        let modes = opcode_table()
            .get(mnemonic.key())
            .ok_or_else(|| Error::UnknownMnemonic(mnemonic.key().to_string()))?;
        let supported: Vec<_> = modes.keys().copied().collect();
        let operand_codes = operand.codes();
        let intersects = operand_codes.iter().any(|code| supported.contains(code));
        if !intersects {
            return Err(Error::AddressingModeType {
                mnemonic: mnemonic.key().to_string(),
                supported,
                operand: operand_codes.to_vec(),
            });
        }
        Ok(Statement {
            body: StatementBody::Instruction { mnemonic, operand },
            label: None,
            comment: None,
        })
    }

    pub fn org(operand: AddrMode) -> Self {
        Statement {
            body: StatementBody::Org { operand },
            label: None,
            comment: None,
        }
    }

    pub fn fcb(operand: AddrMode) -> Self {
        Statement {
            body: StatementBody::Fcb { operand },
            label: None,
            comment: None,
        }
    }

    pub fn fdb(operand: AddrMode) -> Self {
        Statement {
            body: StatementBody::Fdb { operand },
            label: None,
            comment: None,
        }
    }

    pub fn call(callback: MacroFn) -> Self {
        Statement {
            body: StatementBody::Call { callback },
            label: None,
            comment: None,
        }
    }

    pub fn with_label(mut self, label: Label) -> Self {
        self.label = Some(label);
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::addressing::{AddrMode, OperandDescriptor};

    #[test]
    fn mnemonic_rejects_leading_digit() {
        assert!(Mnemonic::new("1dA").is_err());
        assert!(Mnemonic::new("ldA").is_ok());
    }

    #[test]
    fn instruction_rejects_mode_code_mismatch() {
        let mnemonic = Mnemonic::new("ldA").unwrap();
        let operand = crate::addressing::classify(OperandDescriptor::Absent).unwrap();
        assert_eq!(operand, AddrMode::Inherent);
        let err = Statement::instruction(mnemonic, operand).unwrap_err();
        assert!(matches!(err, Error::AddressingModeType { .. }));
    }

    #[test]
    fn instruction_accepts_matching_mode() {
        let mnemonic = Mnemonic::new("ldA").unwrap();
        let operand = AddrMode::Immediate {
            value: 0x40,
            width: Some(1),
        };
        assert!(Statement::instruction(mnemonic, operand).is_ok());
    }

    #[test]
    fn unknown_mnemonic_is_rejected() {
        let mnemonic = Mnemonic::new("frobnicate").unwrap();
        let err = Statement::instruction(mnemonic, AddrMode::Inherent).unwrap_err();
        assert!(matches!(err, Error::UnknownMnemonic(_)));
    }
}
