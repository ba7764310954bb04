//! Named programs assembled by the fixture-driven tests, transcribed from
//! the Leventhal example listings. Each function builds its `Statement`
//! sequence directly through the classifier, the way a fluent DSL front-end
//! would before handing it to the assembler.

use mc6809::addressing::{classify, DirectItem, IndexBase, IndexOffset, OperandDescriptor, SizedInt};
use mc6809::primitives::{AutoIncrementedRegister, B, D, U, X, Y};
use mc6809::{Label, Mnemonic, Statement};

fn instruction(mnemonic: &str, descriptor: OperandDescriptor) -> Statement {
    let operand = classify(descriptor).expect("fixture operand must classify cleanly");
    Statement::instruction(Mnemonic::new(mnemonic).unwrap(), operand).expect("fixture operand must match its mnemonic")
}

fn direct(address: i64) -> OperandDescriptor {
    OperandDescriptor::Direct(DirectItem::Integer(address))
}

/// `LDA {0x40}; STA {0x41}; SWI`
fn leventhal_4_1() -> Vec<Statement> {
    vec![
        instruction("ldA", direct(0x40)),
        instruction("stA", direct(0x41)),
        instruction("swi", OperandDescriptor::Absent),
    ]
}

/// `LDA {0x40}; ADDA {0x41}; STA {0x42}; SWI`
fn leventhal_4_2() -> Vec<Statement> {
    vec![
        instruction("ldA", direct(0x40)),
        instruction("addA", direct(0x41)),
        instruction("stA", direct(0x42)),
        instruction("swi", OperandDescriptor::Absent),
    ]
}

/// `LDA {0x40}; CMPA {0x41}; BHS stres; LDA {0x41}; stres: STA {0x42}; SWI`
fn leventhal_4_7() -> Vec<Statement> {
    let stres = Label::new("stres").unwrap();
    vec![
        instruction("ldA", direct(0x40)),
        instruction("cmpA", direct(0x41)),
        instruction("bhs", OperandDescriptor::Label(stres.clone())),
        instruction("ldA", direct(0x41)),
        instruction("stA", direct(0x42)).with_label(stres),
        instruction("swi", OperandDescriptor::Absent),
    ]
}

/// `LDB {0x41}; LDX #0x50; LDA {B:X}; STA {0x42}; SWI; ORG 0x50;
/// SQTAB: FCB (0,1,4,9,16,25,36,49)`
fn leventhal_4_9() -> Vec<Statement> {
    let sqtab = Label::new("SQTAB").unwrap();
    vec![
        instruction("ldB", direct(0x41)),
        instruction("ldX", OperandDescriptor::Integer(0x50)),
        instruction(
            "ldA",
            OperandDescriptor::Indexed {
                offset: IndexOffset::Accumulator(B),
                base: IndexBase::Register(X),
            },
        ),
        instruction("stA", direct(0x42)),
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

/// `CLRA; LDB {0x41}; LDX #0x42; SUMD: ADDA {0:X+1}; DECB; BNE SUMD;
/// STA {0x40}; SWI`
fn leventhal_5_1a() -> Vec<Statement> {
    let sumd = Label::new("SUMD").unwrap();
    let auto_x = AutoIncrementedRegister::new(X, 1).unwrap();
    vec![
        instruction("clrA", OperandDescriptor::Absent),
        instruction("ldB", direct(0x41)),
        instruction("ldX", OperandDescriptor::Integer(0x42)),
        instruction(
            "addA",
            OperandDescriptor::Indexed {
                offset: IndexOffset::Integer(0),
                base: IndexBase::AutoIncrement(auto_x),
            },
        )
        .with_label(sumd.clone()),
        instruction("decB", OperandDescriptor::Absent),
        instruction("bne", OperandDescriptor::Label(sumd)),
        instruction("stA", direct(0x40)),
        instruction("swi", OperandDescriptor::Absent),
    ]
}

/// `CLRA; LDB {0x41}; LDY #0x42; SUMD: ADDA {0:Y+1}; DECB; BNE SUMD;
/// STA {0x40}; SWI`
fn leventhal_5_1b() -> Vec<Statement> {
    let sumd = Label::new("SUMD").unwrap();
    let auto_y = AutoIncrementedRegister::new(Y, 1).unwrap();
    vec![
        instruction("clrA", OperandDescriptor::Absent),
        instruction("ldB", direct(0x41)),
        instruction("ldY", OperandDescriptor::Integer(0x42)),
        instruction(
            "addA",
            OperandDescriptor::Indexed {
                offset: IndexOffset::Integer(0),
                base: IndexBase::AutoIncrement(auto_y),
            },
        )
        .with_label(sumd.clone()),
        instruction("decB", OperandDescriptor::Absent),
        instruction("bne", OperandDescriptor::Label(sumd)),
        instruction("stA", direct(0x40)),
        instruction("swi", OperandDescriptor::Absent),
    ]
}

/// `CLRA; CLRB; LDX #0x43; SUMD: ADDB {0:X+1}; ADCA 0; DEC {0x42}; BNE SUMD;
/// STD {0x40}; SWI`
fn leventhal_5_2() -> Vec<Statement> {
    let sumd = Label::new("SUMD").unwrap();
    let auto_x = AutoIncrementedRegister::new(X, 1).unwrap();
    vec![
        instruction("clrA", OperandDescriptor::Absent),
        instruction("clrB", OperandDescriptor::Absent),
        instruction("ldX", OperandDescriptor::Integer(0x43)),
        instruction(
            "addB",
            OperandDescriptor::Indexed {
                offset: IndexOffset::Integer(0),
                base: IndexBase::AutoIncrement(auto_x),
            },
        )
        .with_label(sumd.clone()),
        instruction("adcA", OperandDescriptor::Integer(0)),
        instruction("dec", direct(0x42)),
        instruction("bne", OperandDescriptor::Label(sumd)),
        instruction("stD", direct(0x40)),
        instruction("swi", OperandDescriptor::Absent),
    ]
}

/// Same program as [`leventhal_5_2`], but the backward branch to `SUMD` is a
/// long branch reached through a long branch around it, exercising both a
/// zero-distance forward long branch and a negative-distance backward one.
fn leventhal_5_2_long_offset() -> Vec<Statement> {
    let sumd = Label::new("SUMD").unwrap();
    let test = Label::new("TEST").unwrap();
    let auto_x = AutoIncrementedRegister::new(X, 1).unwrap();
    vec![
        instruction("clrA", OperandDescriptor::Absent),
        instruction("clrB", OperandDescriptor::Absent),
        instruction("ldX", OperandDescriptor::Integer(0x43)),
        instruction(
            "addB",
            OperandDescriptor::Indexed {
                offset: IndexOffset::Integer(0),
                base: IndexBase::AutoIncrement(auto_x),
            },
        )
        .with_label(sumd.clone()),
        instruction("adcA", OperandDescriptor::Integer(0)),
        instruction("dec", direct(0x42)),
        instruction("lbra", OperandDescriptor::Label(test.clone())),
        instruction("lbne", OperandDescriptor::Label(sumd)).with_label(test),
        instruction("stD", direct(0x40)),
        instruction("swi", OperandDescriptor::Absent),
    ]
}

/// `LDA {-1:X}; LDA {D:U}; SWI`
fn leventhal_indexed_calibration() -> Vec<Statement> {
    vec![
        instruction(
            "ldA",
            OperandDescriptor::Indexed {
                offset: IndexOffset::Integer(-1),
                base: IndexBase::Register(X),
            },
        ),
        instruction(
            "ldA",
            OperandDescriptor::Indexed {
                offset: IndexOffset::Accumulator(D),
                base: IndexBase::Register(U),
            },
        ),
        instruction("swi", OperandDescriptor::Absent),
    ]
}

type ProgramFn = fn() -> Vec<Statement>;

static PROGRAMS: &[(&str, ProgramFn)] = &[
    ("leventhal_4_1", leventhal_4_1),
    ("leventhal_4_2", leventhal_4_2),
    ("leventhal_4_7", leventhal_4_7),
    ("leventhal_4_9", leventhal_4_9),
    ("leventhal_5_1a", leventhal_5_1a),
    ("leventhal_5_1b", leventhal_5_1b),
    ("leventhal_5_2", leventhal_5_2),
    ("leventhal_5_2_long_offset", leventhal_5_2_long_offset),
    ("leventhal_indexed_calibration", leventhal_indexed_calibration),
];

/// Looks up a fixture's statement sequence by the name its `.toml` file
/// shares.
pub fn build(name: &str) -> Option<Vec<Statement>> {
    PROGRAMS.iter().find(|(key, _)| *key == name).map(|(_, program)| program())
}
