//! The build-time-constant opcode table: `mnemonic_key -> {mode_code ->
//! opcode bytes}`, merged from the 6809 base set and the 6309 extensions.
//!
//! Reproduced verbatim from the original Python `OPCODES_6809`/`OPCODES_6309`
//! dictionaries, quirks included (`incD`'s leading-zero byte, `ldQ` sharing
//! `ldD`'s bytes).

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::addressing::ModeCode;

type ModeTable = HashMap<ModeCode, &'static [u8]>;

struct Entry {
    mnemonic: &'static str,
    mode: ModeCode,
    bytes: &'static [u8],
}

use ModeCode::*;

macro_rules! e {
    ($mnemonic:literal, $mode:expr, $bytes:expr) => {
        Entry {
            mnemonic: $mnemonic,
            mode: $mode,
            bytes: $bytes,
        }
    };
}

static OPCODES_6809: &[Entry] = &[
    e!("abX", Inh, &[0x3A]),
    e!("adcA", Imm, &[0x89]),
    e!("adcA", Dir, &[0x99]),
    e!("adcA", Idx, &[0xA9]),
    e!("adcA", Ext, &[0xB9]),
    e!("adcB", Imm, &[0xC9]),
    e!("adcB", Dir, &[0xD9]),
    e!("adcB", Idx, &[0xE9]),
    e!("adcB", Ext, &[0xF9]),
    e!("addA", Imm, &[0x8B]),
    e!("addA", Dir, &[0x9B]),
    e!("addA", Idx, &[0xAB]),
    e!("addA", Ext, &[0xBB]),
    e!("addB", Imm, &[0xCB]),
    e!("addB", Dir, &[0xDB]),
    e!("addB", Idx, &[0xEB]),
    e!("addB", Ext, &[0xFB]),
    e!("addD", Imm, &[0xC3]),
    e!("addD", Dir, &[0xD3]),
    e!("addD", Idx, &[0xE3]),
    e!("addD", Ext, &[0xF3]),
    e!("andA", Imm, &[0x84]),
    e!("andA", Dir, &[0x94]),
    e!("andA", Idx, &[0xA4]),
    e!("andA", Ext, &[0xB4]),
    e!("andB", Imm, &[0xC4]),
    e!("andB", Dir, &[0xD4]),
    e!("andB", Idx, &[0xE4]),
    e!("andB", Ext, &[0xF4]),
    e!("andCC", Imm, &[0x1C]),
    e!("aslA", Inh, &[0x48]),
    e!("aslB", Inh, &[0x58]),
    e!("asl", Dir, &[0x08]),
    e!("asl", Idx, &[0x68]),
    e!("asl", Ext, &[0x78]),
    e!("asrA", Inh, &[0x47]),
    e!("asrB", Inh, &[0x57]),
    e!("asr", Dir, &[0x07]),
    e!("asr", Idx, &[0x67]),
    e!("asr", Ext, &[0x77]),
    e!("bcc", Rel8, &[0x24]),
    e!("bcs", Rel8, &[0x25]),
    e!("beq", Rel8, &[0x27]),
    e!("bitA", Imm, &[0x85]),
    e!("bitA", Dir, &[0x95]),
    e!("bitA", Idx, &[0xA5]),
    e!("bitA", Ext, &[0xB5]),
    e!("bitB", Imm, &[0xC5]),
    e!("bitB", Dir, &[0xD5]),
    e!("bitB", Idx, &[0xE5]),
    e!("bitB", Ext, &[0xF5]),
    e!("bhs", Rel8, &[0x24]),
    e!("blo", Rel8, &[0x25]),
    e!("bne", Rel8, &[0x26]),
    e!("bpl", Rel8, &[0x2A]),
    e!("bra", Rel8, &[0x20]),
    e!("clrA", Inh, &[0x4F]),
    e!("clrB", Inh, &[0x5F]),
    e!("clr", Dir, &[0x0F]),
    e!("clr", Idx, &[0x6F]),
    e!("clr", Ext, &[0x7F]),
    e!("cmpA", Imm, &[0x81]),
    e!("cmpA", Dir, &[0x91]),
    e!("cmpA", Idx, &[0xA1]),
    e!("cmpA", Ext, &[0xB1]),
    e!("cmpB", Imm, &[0xC1]),
    e!("cmpB", Dir, &[0xD1]),
    e!("cmpB", Idx, &[0xE1]),
    e!("cmpB", Ext, &[0xF1]),
    e!("cmpD", Imm, &[0x10, 0x83]),
    e!("cmpD", Dir, &[0x10, 0x93]),
    e!("cmpD", Idx, &[0x10, 0xA3]),
    e!("cmpD", Ext, &[0x10, 0xB3]),
    e!("cmpS", Imm, &[0x11, 0x8C]),
    e!("cmpS", Dir, &[0x11, 0x9C]),
    e!("cmpS", Idx, &[0x11, 0xAC]),
    e!("cmpS", Ext, &[0x11, 0xBC]),
    e!("cmpU", Imm, &[0x11, 0x83]),
    e!("cmpU", Dir, &[0x11, 0x93]),
    e!("cmpU", Idx, &[0x11, 0xA3]),
    e!("cmpU", Ext, &[0x11, 0xB3]),
    e!("cmpX", Imm, &[0x8C]),
    e!("cmpX", Dir, &[0x9C]),
    e!("cmpX", Idx, &[0xAC]),
    e!("cmpX", Ext, &[0xBC]),
    e!("cmpY", Imm, &[0x10, 0x8C]),
    e!("cmpY", Dir, &[0x10, 0x9C]),
    e!("cmpY", Idx, &[0x10, 0xAC]),
    e!("cmpY", Ext, &[0x10, 0xBC]),
    e!("comA", Inh, &[0x43]),
    e!("comB", Inh, &[0x53]),
    e!("com", Dir, &[0x03]),
    e!("com", Idx, &[0x63]),
    e!("com", Ext, &[0x73]),
    e!("cwai", Imm, &[0x3C]),
    e!("daa", Inh, &[0x19]),
    e!("decA", Inh, &[0x4A]),
    e!("decB", Inh, &[0x5A]),
    e!("dec", Dir, &[0x0A]),
    e!("dec", Idx, &[0x6A]),
    e!("dec", Ext, &[0x7A]),
    e!("eorA", Imm, &[0x88]),
    e!("eorA", Dir, &[0x98]),
    e!("eorA", Idx, &[0xA8]),
    e!("eorA", Ext, &[0xB8]),
    e!("eorB", Imm, &[0xC8]),
    e!("eorB", Dir, &[0xD8]),
    e!("eorB", Idx, &[0xE8]),
    e!("eorB", Ext, &[0xF8]),
    e!("exg", Int, &[0x1E]),
    e!("incA", Inh, &[0x4C]),
    e!("incB", Inh, &[0x5C]),
    e!("inc", Dir, &[0x0C]),
    e!("inc", Idx, &[0x6C]),
    e!("inc", Ext, &[0x7C]),
    e!("jmp", Dir, &[0x0E]),
    e!("jmp", Idx, &[0x6E]),
    e!("jmp", Ext, &[0x7E]),
    e!("jsr", Dir, &[0x9D]),
    e!("jsr", Idx, &[0xAD]),
    e!("jsr", Ext, &[0xBD]),
    e!("lbra", Rel16, &[0x16]),
    e!("lbne", Rel16, &[0x10, 0x26]),
    e!("ldA", Imm, &[0x86]),
    e!("ldA", Dir, &[0x96]),
    e!("ldA", Idx, &[0xA6]),
    e!("ldA", Ext, &[0xB6]),
    e!("ldB", Imm, &[0xC6]),
    e!("ldB", Dir, &[0xD6]),
    e!("ldB", Idx, &[0xE6]),
    e!("ldB", Ext, &[0xF6]),
    e!("ldD", Imm, &[0xCC]),
    e!("ldD", Dir, &[0xDC]),
    e!("ldD", Idx, &[0xEC]),
    e!("ldD", Ext, &[0xFC]),
    e!("ldS", Imm, &[0x10, 0xCE]),
    e!("ldS", Dir, &[0x10, 0xDE]),
    e!("ldS", Idx, &[0x10, 0xEE]),
    e!("ldS", Ext, &[0x10, 0xFE]),
    e!("ldU", Imm, &[0xCE]),
    e!("ldU", Dir, &[0xDE]),
    e!("ldU", Idx, &[0xEE]),
    e!("ldU", Ext, &[0xFE]),
    e!("ldX", Imm, &[0x8E]),
    e!("ldX", Dir, &[0x9E]),
    e!("ldX", Idx, &[0xAE]),
    e!("ldX", Ext, &[0xBE]),
    e!("ldY", Imm, &[0x10, 0x8E]),
    e!("ldY", Dir, &[0x10, 0x9E]),
    e!("ldY", Idx, &[0x10, 0xAE]),
    e!("ldY", Ext, &[0x10, 0xBE]),
    e!("leaS", Idx, &[0x32]),
    e!("leaU", Idx, &[0x33]),
    e!("leaX", Idx, &[0x30]),
    e!("leaY", Idx, &[0x31]),
    e!("lslA", Inh, &[0x48]),
    e!("lslB", Inh, &[0x58]),
    e!("lsl", Dir, &[0x08]),
    e!("lsl", Idx, &[0x68]),
    e!("lsl", Ext, &[0x78]),
    e!("lsrA", Inh, &[0x44]),
    e!("lsrB", Inh, &[0x54]),
    e!("lsr", Dir, &[0x04]),
    e!("lsr", Idx, &[0x64]),
    e!("lsr", Ext, &[0x74]),
    e!("mul", Inh, &[0x3D]),
    e!("negA", Inh, &[0x40]),
    e!("negB", Inh, &[0x50]),
    e!("neg", Dir, &[0x00]),
    e!("neg", Idx, &[0x60]),
    e!("neg", Ext, &[0x70]),
    e!("nop", Inh, &[0x12]),
    e!("orA", Imm, &[0x8A]),
    e!("orA", Dir, &[0x9A]),
    e!("orA", Idx, &[0xAA]),
    e!("orA", Ext, &[0xBA]),
    e!("orB", Imm, &[0xCA]),
    e!("orB", Dir, &[0xDA]),
    e!("orB", Idx, &[0xEA]),
    e!("orB", Ext, &[0xFA]),
    e!("orCC", Imm, &[0x1A]),
    e!("pshS", Imm, &[0x34]),
    e!("pshU", Imm, &[0x36]),
    e!("pulS", Imm, &[0x35]),
    e!("pulU", Imm, &[0x37]),
    e!("rolA", Inh, &[0x49]),
    e!("rolB", Inh, &[0x59]),
    e!("rol", Dir, &[0x09]),
    e!("rol", Idx, &[0x69]),
    e!("rol", Ext, &[0x79]),
    e!("rorA", Inh, &[0x46]),
    e!("rorB", Inh, &[0x56]),
    e!("ror", Dir, &[0x06]),
    e!("ror", Idx, &[0x66]),
    e!("ror", Ext, &[0x76]),
    e!("rti", Inh, &[0x3B]),
    e!("rts", Inh, &[0x39]),
    e!("sbcA", Imm, &[0x82]),
    e!("sbcA", Dir, &[0x92]),
    e!("sbcA", Idx, &[0xA2]),
    e!("sbcA", Ext, &[0xB2]),
    e!("sbcB", Imm, &[0xC2]),
    e!("sbcB", Dir, &[0xD2]),
    e!("sbcB", Idx, &[0xE2]),
    e!("sbcB", Ext, &[0xF2]),
    e!("sex", Inh, &[0x1D]),
    e!("stA", Dir, &[0x97]),
    e!("stA", Idx, &[0xA7]),
    e!("stA", Ext, &[0xB7]),
    e!("stB", Dir, &[0xD7]),
    e!("stB", Idx, &[0xE7]),
    e!("stB", Ext, &[0xF7]),
    e!("stD", Dir, &[0xDD]),
    e!("stD", Idx, &[0xED]),
    e!("stD", Ext, &[0xFD]),
    e!("stS", Dir, &[0x10, 0xDF]),
    e!("stS", Idx, &[0x10, 0xEF]),
    e!("stS", Ext, &[0x10, 0xFF]),
    e!("stU", Dir, &[0xDF]),
    e!("stU", Idx, &[0xEF]),
    e!("stU", Ext, &[0xFF]),
    e!("stX", Dir, &[0x9F]),
    e!("stX", Idx, &[0xAF]),
    e!("stX", Ext, &[0xBF]),
    e!("stY", Dir, &[0x10, 0x9F]),
    e!("stY", Idx, &[0x10, 0xAF]),
    e!("stY", Ext, &[0x10, 0xBF]),
    e!("subA", Imm, &[0x80]),
    e!("subA", Dir, &[0x90]),
    e!("subA", Idx, &[0xA0]),
    e!("subA", Ext, &[0xB0]),
    e!("subB", Imm, &[0xC0]),
    e!("subB", Dir, &[0xD0]),
    e!("subB", Idx, &[0xE0]),
    e!("subB", Ext, &[0xF0]),
    e!("subD", Imm, &[0x83]),
    e!("subD", Dir, &[0x93]),
    e!("subD", Idx, &[0xA3]),
    e!("subD", Ext, &[0xB3]),
    e!("swi", Inh, &[0x3F]),
    e!("swi2", Inh, &[0x10, 0x3F]),
    e!("swi3", Inh, &[0x11, 0x3F]),
    e!("sync", Inh, &[0x13]),
    e!("tfr", Int, &[0x1F]),
    e!("tstA", Inh, &[0x4D]),
    e!("tstB", Inh, &[0x5D]),
    e!("tst", Dir, &[0x0D]),
    e!("tst", Idx, &[0x6D]),
    e!("tst", Ext, &[0x7D]),
];

static OPCODES_6309: &[Entry] = &[
    e!("bitMD", Imm, &[0x11, 0x3C]),
    e!("cmpr", Int, &[0x10, 0x37]),
    e!("decD", Inh, &[0x10, 0x4A]),
    e!("decE", Inh, &[0x11, 0x4A]),
    e!("decF", Inh, &[0x11, 0x5A]),
    e!("decW", Inh, &[0x10, 0x5A]),
    // !! leading zeros, reproduced verbatim from the original table.
    e!("incD", Inh, &[0x00, 0x4C]),
    e!("incE", Inh, &[0x01, 0x4C]),
    e!("incF", Inh, &[0x01, 0x5C]),
    e!("incW", Inh, &[0x00, 0x5C]),
    e!("ldE", Imm, &[0x01, 0x86]),
    e!("ldE", Dir, &[0x01, 0x96]),
    e!("ldE", Idx, &[0x01, 0xA6]),
    e!("ldE", Ext, &[0x01, 0xB6]),
    e!("ldF", Imm, &[0x01, 0xC6]),
    e!("ldF", Dir, &[0x01, 0xD6]),
    e!("ldF", Idx, &[0x01, 0xE6]),
    e!("ldF", Ext, &[0x01, 0xF6]),
    // ldQ shares ldD's bytes in the original table, reproduced as-is.
    e!("ldQ", Imm, &[0xCD]),
    e!("ldQ", Dir, &[0xDC]),
    e!("ldQ", Idx, &[0xEC]),
    e!("ldQ", Ext, &[0xFC]),
    e!("ldW", Imm, &[0x86]),
    e!("ldW", Dir, &[0x96]),
    e!("ldW", Idx, &[0xA6]),
    e!("ldW", Ext, &[0xB6]),
    e!("ldMD", Imm, &[0x11, 0x3D]),
    e!("stE", Dir, &[0x01, 0x97]),
    e!("stE", Idx, &[0x01, 0xA7]),
    e!("stE", Ext, &[0x01, 0xB7]),
    e!("stF", Dir, &[0x01, 0xD7]),
    e!("stF", Idx, &[0x01, 0xE7]),
    e!("stF", Ext, &[0x01, 0xF7]),
    e!("stQ", Dir, &[0x00, 0xDD]),
    e!("stQ", Idx, &[0x00, 0xED]),
    e!("stQ", Ext, &[0x00, 0xFD]),
    e!("stW", Dir, &[0x00, 0x97]),
    e!("stW", Idx, &[0x00, 0xA7]),
    e!("stW", Ext, &[0x00, 0xB7]),
];

/// Returns the merged 6809+6309 opcode table, building and validating it on
/// first use: every (mnemonic, mode) pair must be unique.
pub fn opcode_table() -> &'static HashMap<&'static str, ModeTable> {
    static TABLE: OnceLock<HashMap<&'static str, ModeTable>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut table: HashMap<&'static str, ModeTable> = HashMap::new();
        for entry in OPCODES_6809.iter().chain(OPCODES_6309.iter()) {
            let modes = table.entry(entry.mnemonic).or_default();
            let previous = modes.insert(entry.mode, entry.bytes);
            assert!(
                previous.is_none(),
                "duplicate mode-code key {:?} for mnemonic {:?}",
                entry.mode,
                entry.mnemonic
            );
        }
        table
    })
}

/// The byte width of the "inherent register" an immediate-mode mnemonic
/// implies (e.g. `ldA` implies `A`, width 1; `ldD` implies `D`, width 2;
/// `ldQ` implies `Q`, width 4). Only mnemonics with an `Imm` entry in the
/// opcode table need one.
pub fn inherent_width(mnemonic: &str) -> Option<u8> {
    static WIDTHS: &[(&str, u8)] = &[
        ("adcA", 1),
        ("adcB", 1),
        ("addA", 1),
        ("addB", 1),
        ("addD", 2),
        ("andA", 1),
        ("andB", 1),
        ("andCC", 1),
        ("bitA", 1),
        ("bitB", 1),
        ("cmpA", 1),
        ("cmpB", 1),
        ("cmpD", 2),
        ("cmpS", 2),
        ("cmpU", 2),
        ("cmpX", 2),
        ("cmpY", 2),
        ("cwai", 1),
        ("eorA", 1),
        ("eorB", 1),
        ("ldA", 1),
        ("ldB", 1),
        ("ldD", 2),
        ("ldS", 2),
        ("ldU", 2),
        ("ldX", 2),
        ("ldY", 2),
        ("orA", 1),
        ("orB", 1),
        ("orCC", 1),
        ("pshS", 2),
        ("pshU", 2),
        ("pulS", 2),
        ("pulU", 2),
        ("sbcA", 1),
        ("sbcB", 1),
        ("subA", 1),
        ("subB", 1),
        ("subD", 2),
        ("bitMD", 1),
        ("ldE", 1),
        ("ldF", 1),
        ("ldQ", 4),
        ("ldW", 2),
        ("ldMD", 1),
    ];
    WIDTHS
        .iter()
        .find(|(key, _)| *key == mnemonic)
        .map(|(_, width)| *width)
}
