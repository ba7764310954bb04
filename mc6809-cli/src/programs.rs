//! A built-in registry of named programs, standing in for the dynamic
//! module loading the host front-end would otherwise perform. Each entry
//! builds its `Statement` sequence directly through the classifier, the
//! way a fluent DSL front-end would before handing it to the assembler.

use mc6809::addressing::{classify, DirectItem, IndexBase, IndexOffset, OperandDescriptor, SizedInt};
use mc6809::primitives::{B, D, U, X};
use mc6809::{Label, Mnemonic, Statement};

fn instruction(mnemonic: &str, descriptor: OperandDescriptor) -> Statement {
    let operand = classify(descriptor).expect("built-in program operand must classify cleanly");
    Statement::instruction(Mnemonic::new(mnemonic).unwrap(), operand).expect("built-in program operand must match its mnemonic")
}

/// `LDA {0x40}; STA {0x41}; SWI`
fn eight_bit_transfer() -> Vec<Statement> {
    vec![
        instruction("ldA", OperandDescriptor::Direct(DirectItem::Integer(0x40))),
        instruction("stA", OperandDescriptor::Direct(DirectItem::Integer(0x41))),
        instruction("swi", OperandDescriptor::Absent),
    ]
}

/// `LDA {0x40}; CMPA {0x41}; BHS stres; LDA {0x41}; stres: STA {0x42}; SWI`
fn find_larger() -> Vec<Statement> {
    let stres = Label::new("stres").unwrap();
    vec![
        instruction("ldA", OperandDescriptor::Direct(DirectItem::Integer(0x40))),
        instruction("cmpA", OperandDescriptor::Direct(DirectItem::Integer(0x41))),
        instruction("bhs", OperandDescriptor::Label(stres.clone())),
        instruction("ldA", OperandDescriptor::Direct(DirectItem::Integer(0x41))),
        instruction("stA", OperandDescriptor::Direct(DirectItem::Integer(0x42))).with_label(stres),
        instruction("swi", OperandDescriptor::Absent),
    ]
}

/// `LDB {0x41}; LDX #0x50; LDA {B:X}; STA {0x42}; SWI; ORG 0x50;
/// SQTAB: FCB (0,1,4,9,16,25,36,49)`
fn table_of_squares() -> Vec<Statement> {
    let sqtab = Label::new("SQTAB").unwrap();
    vec![
        instruction("ldB", OperandDescriptor::Direct(DirectItem::Integer(0x41))),
        instruction("ldX", OperandDescriptor::Sized(SizedInt::U16(0x50))),
        Statement::instruction(
            Mnemonic::new("ldA").unwrap(),
            classify(OperandDescriptor::Indexed {
                offset: IndexOffset::Accumulator(B),
                base: IndexBase::Register(X),
            })
            .unwrap(),
        )
        .unwrap(),
        instruction("stA", OperandDescriptor::Direct(DirectItem::Integer(0x42))),
        instruction("swi", OperandDescriptor::Absent),
        Statement::org(classify(OperandDescriptor::Integer(0x50)).unwrap()),
        Statement::fcb(
            classify(OperandDescriptor::Integers(
                [0u8, 1, 4, 9, 16, 25, 36, 49].into_iter().map(|v| DirectItem::Integer(v as i64)).collect(),
            ))
            .unwrap(),
        )
        .with_label(sqtab),
    ]
}

/// `LDA {-1:X}` followed by `LDA {D:U}` and `SWI` — the two indexed-mode
/// calibration scenarios back to back.
fn indexed_calibration() -> Vec<Statement> {
    vec![
        Statement::instruction(
            Mnemonic::new("ldA").unwrap(),
            classify(OperandDescriptor::Indexed {
                offset: IndexOffset::Integer(-1),
                base: IndexBase::Register(X),
            })
            .unwrap(),
        )
        .unwrap(),
        Statement::instruction(
            Mnemonic::new("ldA").unwrap(),
            classify(OperandDescriptor::Indexed {
                offset: IndexOffset::Accumulator(D),
                base: IndexBase::Register(U),
            })
            .unwrap(),
        )
        .unwrap(),
        instruction("swi", OperandDescriptor::Absent),
    ]
}

type ProgramFn = fn() -> Vec<Statement>;

static PROGRAMS: &[(&str, ProgramFn)] = &[
    ("eight-bit-transfer", eight_bit_transfer),
    ("find-larger", find_larger),
    ("table-of-squares", table_of_squares),
    ("indexed-calibration", indexed_calibration),
];

/// Looks up a built-in program by name.
pub fn lookup(name: &str) -> Option<ProgramFn> {
    PROGRAMS.iter().find(|(key, _)| *key == name).map(|(_, program)| *program)
}

/// The names of every registered program, for `--list` and error messages.
pub fn names() -> impl Iterator<Item = &'static str> {
    PROGRAMS.iter().map(|(key, _)| *key)
}
