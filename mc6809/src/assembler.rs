//! The multi-pass assembler driver: PC tracking, origin handling, the label
//! table, unresolved/unreferenced label sets, and fragment layout.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::addressing::{AddrMode, AddrValue, ModeCode};
use crate::encoder;
use crate::error::{Error, Result};
use crate::opcodes::{inherent_width, opcode_table};
use crate::primitives::{Label, PROGRAM_COUNTER_LABEL_NAME};
use crate::statement::{MacroFn, Mnemonic, Statement, StatementBody};

/// Default pass cap; `Assembler::assemble` accepts an override.
pub const MAX_PASSES: usize = 3;

/// Owns all per-invocation mutable state: the current origin/PC, the
/// address-anchored fragment map, and the label bookkeeping sets.
/// One instance lives for exactly one `assemble` call.
pub struct Assembler {
    origin: u32,
    pc: u32,
    code: BTreeMap<u32, Vec<u8>>,
    label_addresses: HashMap<String, u32>,
    unresolved_labels: HashSet<String>,
    unreferenced_labels: HashSet<String>,
    more_passes_required: bool,
    pass_index: usize,
}

impl Default for Assembler {
    fn default() -> Self {
        Self::new()
    }
}

impl Assembler {
    pub fn new() -> Self {
        Assembler {
            origin: 0,
            pc: 0,
            code: BTreeMap::new(),
            label_addresses: HashMap::new(),
            unresolved_labels: HashSet::new(),
            unreferenced_labels: HashSet::new(),
            more_passes_required: true,
            pass_index: 0,
        }
    }

    pub fn pc(&self) -> u32 {
        self.pc
    }

    pub fn origin(&self) -> u32 {
        self.origin
    }

    pub fn label_addresses(&self) -> &HashMap<String, u32> {
        &self.label_addresses
    }

    pub fn unresolved_labels(&self) -> &HashSet<String> {
        &self.unresolved_labels
    }

    pub fn unreferenced_labels(&self) -> &HashSet<String> {
        &self.unreferenced_labels
    }

    /// The non-overlapping address -> bytes fragment map as it stands right
    /// now (already flat; fragments are coalesced eagerly as they're
    /// extended rather than on demand).
    pub fn object_code(&self) -> &BTreeMap<u32, Vec<u8>> {
        &self.code
    }

    fn in_existing_fragment(&self, address: u32) -> bool {
        self.code
            .iter()
            .any(|(&start, bytes)| start <= address && address < start + bytes.len() as u32)
    }

    fn set_origin(&mut self, value: u32) -> Result<()> {
        if self.in_existing_fragment(value) {
            return Err(Error::FragmentOverlap { origin: value });
        }
        self.origin = value;
        self.pc = value;
        Ok(())
    }

    fn extend(&mut self, bytes: &[u8]) {
        self.code.entry(self.origin).or_default().extend_from_slice(bytes);
        self.pc += bytes.len() as u32;
    }

    /// Looks up a label's address, clearing it from `unresolved_labels` on
    /// success and adding it (plus requesting another pass) on failure.
    /// Either way, reading a label clears it from `unreferenced_labels`.
    pub(crate) fn resolve_label(&mut self, name: &str) -> Option<u32> {
        let address = self.label_addresses.get(name).copied();
        match address {
            Some(_) => {
                self.unresolved_labels.remove(name);
            }
            None => {
                self.more_passes_required = true;
                self.unresolved_labels.insert(name.to_string());
            }
        }
        self.unreferenced_labels.remove(name);
        address
    }

    /// Flags `name` as still outstanding and requests another pass. Called
    /// by encoders after a failed `resolve_label` (which already does this
    /// bookkeeping internally); kept as a separate method so encoders don't
    /// need to know `resolve_label`'s internals.
    pub(crate) fn mark_unresolved(&mut self, name: &str) {
        self.more_passes_required = true;
        self.unresolved_labels.insert(name.to_string());
    }

    fn label_statement(&mut self, label: Option<&Label>) -> Result<()> {
        let Some(label) = label else { return Ok(()) };
        let name = label.name();
        if let Some(&existing) = self.label_addresses.get(name) {
            if existing != self.pc && self.pass_index == 0 {
                return Err(Error::DuplicateLabel {
                    name: name.to_string(),
                    existing,
                    attempted: self.pc,
                });
            }
        }
        self.label_addresses.insert(name.to_string(), self.pc);
        self.unreferenced_labels.insert(name.to_string());
        self.unresolved_labels.remove(name);
        Ok(())
    }

    /// Runs the multi-pass loop to a fixed point (or raises
    /// [`Error::TooManyPasses`]), starting the fragment layout at `origin`.
    pub fn assemble(&mut self, statements: &[Statement], origin: u32, max_passes: usize) -> Result<()> {
        self.pass_index = 0;
        self.more_passes_required = true;
        while self.more_passes_required {
            self.more_passes_required = false;
            self.code.clear();
            self.origin = origin;
            self.pc = origin;
            for statement in statements {
                self.assemble_statement(statement)?;
            }
            self.pass_index += 1;
            if self.pass_index > max_passes {
                let mut unresolved: Vec<String> = self.unresolved_labels.iter().cloned().collect();
                unresolved.sort();
                let mut unreferenced: Vec<String> = self.unreferenced_labels.iter().cloned().collect();
                unreferenced.sort();
                return Err(Error::TooManyPasses {
                    passes: self.pass_index,
                    unresolved,
                    unreferenced,
                });
            }
        }
        self.warn_about_unreferenced_labels();
        Ok(())
    }

    fn warn_about_unreferenced_labels(&self) {
        for label in &self.unreferenced_labels {
            log::warn!("unreferenced label: {label}");
        }
    }

    fn assemble_statement(&mut self, statement: &Statement) -> Result<()> {
        self.label_addresses.insert(PROGRAM_COUNTER_LABEL_NAME.to_string(), self.pc);
        self.label_statement(statement.label.as_ref())?;
        match &statement.body {
            StatementBody::Instruction { mnemonic, operand } => self.assemble_instruction(mnemonic, operand),
            StatementBody::Org { operand } => self.assemble_org(operand),
            StatementBody::Fcb { operand } => self.assemble_fcb(operand),
            StatementBody::Fdb { operand } => self.assemble_fdb(operand),
            StatementBody::Call { callback } => self.assemble_call(callback),
        }
    }

    fn assemble_instruction(&mut self, mnemonic: &Mnemonic, operand: &AddrMode) -> Result<()> {
        let modes = opcode_table()
            .get(mnemonic.key())
            .ok_or_else(|| Error::UnknownMnemonic(mnemonic.key().to_string()))?;
        let candidates: Vec<ModeCode> = operand.codes().iter().copied().filter(|code| modes.contains_key(code)).collect();
        let mode_code = match candidates.as_slice() {
            [one] => *one,
            [] => {
                return Err(Error::AddressingModeType {
                    mnemonic: mnemonic.key().to_string(),
                    supported: modes.keys().copied().collect(),
                    operand: operand.codes().to_vec(),
                })
            }
            _ => unreachable!("opcode table construction bug: more than one mode code matched for {}", mnemonic.key()),
        };
        let opcode_bytes = modes[&mode_code];
        let operand_bytes = match mode_code {
            ModeCode::Inh => encoder::encode_inherent(),
            ModeCode::Imm => {
                let width = inherent_width(mnemonic.key()).unwrap_or(2);
                encoder::encode_immediate(operand, width, self)?
            }
            ModeCode::Dir => encoder::encode_page_direct(operand),
            ModeCode::Ext => encoder::encode_extended(operand, self)?,
            ModeCode::Idx => encoder::encode_indexed(operand)?,
            ModeCode::Rel8 => self.assemble_relative(operand, opcode_bytes.len(), 1)?,
            ModeCode::Rel16 => self.assemble_relative(operand, opcode_bytes.len(), 2)?,
            ModeCode::Int => encoder::encode_register_pair(operand)?,
        };
        let mut bytes = opcode_bytes.to_vec();
        bytes.extend(operand_bytes);
        self.extend(&bytes);
        Ok(())
    }

    fn assemble_relative(&mut self, operand: &AddrMode, opcode_len: usize, width: usize) -> Result<Vec<u8>> {
        match operand {
            AddrMode::Relative8(value) => Ok(vec![*value]),
            AddrMode::Relative16(value) => Ok(vec![(*value >> 8) as u8, (*value & 0xFF) as u8]),
            AddrMode::LabelRef(label) => {
                if width == 1 {
                    encoder::encode_short_relative(label.name(), opcode_len, self)
                } else {
                    encoder::encode_long_relative(label.name(), opcode_len, self)
                }
            }
            other => unreachable!("relative operand encoding called with {other:?}"),
        }
    }

    fn assemble_org(&mut self, operand: &AddrMode) -> Result<()> {
        let AddrMode::Immediate { value, .. } = operand else {
            return Err(Error::DescriptorShape {
                description: "ORG operand must be an immediate value".to_string(),
            });
        };
        self.set_origin(*value)
    }

    fn assemble_fcb(&mut self, operand: &AddrMode) -> Result<()> {
        let AddrMode::Integers(items) = operand else {
            return Err(Error::DescriptorShape {
                description: "FCB operand must be integers".to_string(),
            });
        };
        let mut bytes = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let AddrValue::Integer(value) = item else {
                return Err(Error::DescriptorShape {
                    description: format!("FCB entry at index {index} must be an integer, not a label"),
                });
            };
            if !(0..256).contains(value) {
                return Err(Error::ValueRange {
                    value: *value,
                    message: format!("FCB value {value} at index {index} not in range(0, 256)"),
                });
            }
            bytes.push(*value as u8);
        }
        self.extend(&bytes);
        Ok(())
    }

    fn assemble_fdb(&mut self, operand: &AddrMode) -> Result<()> {
        let AddrMode::Integers(items) = operand else {
            return Err(Error::DescriptorShape {
                description: "FDB operand must be integers".to_string(),
            });
        };
        let mut bytes = Vec::with_capacity(items.len() * 2);
        for item in items {
            let value = match item {
                AddrValue::Integer(value) => *value,
                AddrValue::Label(label) => match self.resolve_label(label.name()) {
                    Some(address) => address as i64,
                    None => 0,
                },
            };
            if !(0..65536).contains(&value) {
                return Err(Error::ValueRange {
                    value,
                    message: format!("FDB value {value} (0x{value:04x}) not in 0-65535 (0x0000-0xFFFF)"),
                });
            }
            bytes.push((value >> 8) as u8);
            bytes.push((value & 0xFF) as u8);
        }
        self.extend(&bytes);
        Ok(())
    }

    fn assemble_call(&mut self, callback: &MacroFn) -> Result<()> {
        if let Some(statements) = callback(self)? {
            for statement in &statements {
                self.assemble_statement(statement)?;
            }
        }
        Ok(())
    }
}

impl std::fmt::Display for Assembler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Origin: 0x{:04X}", self.origin)?;
        write!(f, "PC:     0x{:04X}", self.pc)
    }
}

/// Assembles `statements` starting at `origin` with the default pass cap,
/// returning the resulting address -> bytes fragment map.
pub fn assemble(statements: &[Statement], origin: u32) -> Result<BTreeMap<u32, Vec<u8>>> {
    let mut asm = Assembler::new();
    asm.assemble(statements, origin, MAX_PASSES)?;
    Ok(asm.object_code().clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::addressing::{classify, AddrMode, DirectItem, OperandDescriptor};
    use crate::statement::{Mnemonic, Statement};

    fn instr(mnemonic: &str, descriptor: OperandDescriptor) -> Statement {
        let operand = classify(descriptor).unwrap();
        Statement::instruction(Mnemonic::new(mnemonic).unwrap(), operand).unwrap()
    }

    #[test]
    fn eight_bit_data_transfer() {
        let statements = vec![
            instr("ldA", OperandDescriptor::Direct(DirectItem::Integer(0x40))),
            instr("stA", OperandDescriptor::Direct(DirectItem::Integer(0x41))),
            instr("swi", OperandDescriptor::Absent),
        ];
        let code = assemble(&statements, 0).unwrap();
        assert_eq!(code[&0], vec![0x96, 0x40, 0x97, 0x41, 0x3F]);
    }

    #[test]
    fn find_larger_with_forward_branch() {
        let statements = vec![
            instr("ldA", OperandDescriptor::Direct(DirectItem::Integer(0x40))),
            instr("cmpA", OperandDescriptor::Direct(DirectItem::Integer(0x41))),
            {
                let label = Label::new("stres").unwrap();
                Statement::instruction(
                    Mnemonic::new("bhs").unwrap(),
                    classify(OperandDescriptor::Label(label)).unwrap(),
                )
                .unwrap()
            },
            instr("ldA", OperandDescriptor::Direct(DirectItem::Integer(0x41))),
            instr("stA", OperandDescriptor::Direct(DirectItem::Integer(0x42))).with_label(Label::new("stres").unwrap()),
            instr("swi", OperandDescriptor::Absent),
        ];
        let code = assemble(&statements, 0).unwrap();
        assert_eq!(code[&0], vec![0x96, 0x40, 0x91, 0x41, 0x24, 0x02, 0x96, 0x41, 0x97, 0x42, 0x3F]);
    }

    #[test]
    fn table_of_squares_with_org_produces_two_fragments() {
        let sqtab = Label::new("SQTAB").unwrap();
        let statements = vec![
            instr("ldB", OperandDescriptor::Direct(DirectItem::Integer(0x41))),
            instr("ldX", OperandDescriptor::Sized(crate::addressing::SizedInt::U16(0x50))),
            {
                use crate::addressing::{IndexBase, IndexOffset};
                use crate::primitives::{B, X};
                Statement::instruction(
                    Mnemonic::new("ldA").unwrap(),
                    AddrMode::Indexed {
                        base: IndexBase::Register(X),
                        offset: IndexOffset::Accumulator(B),
                    },
                )
                .unwrap()
            },
            instr("stA", OperandDescriptor::Direct(DirectItem::Integer(0x42))),
            instr("swi", OperandDescriptor::Absent),
            Statement::org(classify(OperandDescriptor::Integer(0x50)).unwrap()),
            Statement::fcb(
                classify(OperandDescriptor::Integers(
                    [0u8, 1, 4, 9, 16, 25, 36, 49].into_iter().map(|v| DirectItem::Integer(v as i64)).collect(),
                ))
                .unwrap(),
            )
            .with_label(sqtab),
        ];
        let code = assemble(&statements, 0).unwrap();
        assert_eq!(code[&0], vec![0xD6, 0x41, 0x8E, 0x00, 0x50, 0xA6, 0x85, 0x97, 0x42, 0x3F]);
        assert_eq!(code[&0x50], vec![0x00, 0x01, 0x04, 0x09, 0x10, 0x19, 0x24, 0x31]);
    }

    #[test]
    fn long_branch_to_immediately_following_label_has_zero_distance() {
        // LBNE TEST; TEST: NOP — target is the statement right after LBNE,
        // so offset = target - (pc + opcode_len + operand_len) = 0.
        let test_label = Label::new("TEST").unwrap();
        let statements = vec![
            Statement::instruction(Mnemonic::new("lbne").unwrap(), classify(OperandDescriptor::Label(test_label.clone())).unwrap()).unwrap(),
            instr("nop", OperandDescriptor::Absent).with_label(test_label),
        ];
        let code = assemble(&statements, 0).unwrap();
        assert_eq!(code[&0], vec![0x10, 0x26, 0x00, 0x00, 0x12]);
    }

    #[test]
    fn org_inside_existing_fragment_is_rejected() {
        let statements = vec![instr("nop", OperandDescriptor::Absent), Statement::org(classify(OperandDescriptor::Integer(0)).unwrap())];
        let err = assemble(&statements, 0).unwrap_err();
        assert!(matches!(err, Error::FragmentOverlap { .. }));
    }

    #[test]
    fn duplicate_label_on_first_pass_is_rejected() {
        let label = Label::new("here").unwrap();
        let statements = vec![
            instr("nop", OperandDescriptor::Absent).with_label(label.clone()),
            instr("nop", OperandDescriptor::Absent).with_label(label),
        ];
        let err = assemble(&statements, 0).unwrap_err();
        assert!(matches!(err, Error::DuplicateLabel { .. }));
    }
}
