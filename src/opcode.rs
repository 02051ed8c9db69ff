//! Operand extraction and the decode table.
//!
//! Decoding is pure data: the top nibble of an opcode picks a group, and the
//! group is a short list of `mask`/`bits` patterns tried in order. The first
//! pattern with `opcode & mask == bits` builds the [`Instruction`]. Anything
//! that matches no pattern is not a CHIP-8 instruction.

use std::fmt;

pub const NNN: u16 = 0x0fff;
pub const NN: u16 = 0x00ff;
pub const N: u16 = 0x000f;
pub const X: u16 = 0x0f00;
pub const Y: u16 = 0x00f0;

/// A raw 16-bit instruction word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opcode(pub u16);

impl Opcode {
    /// the primary group, i.e. the top nibble
    pub fn group(self) -> usize {
        ((self.0 & 0xf000) >> 12) as usize
    }

    pub fn nnn(self) -> u16 {
        self.0 & NNN
    }

    pub fn kk(self) -> u8 {
        (self.0 & NN) as u8
    }

    pub fn n(self) -> u8 {
        (self.0 & N) as u8
    }

    pub fn x(self) -> usize {
        ((self.0 & X) >> 8) as usize
    }

    pub fn y(self) -> usize {
        ((self.0 & Y) >> 4) as usize
    }

    pub fn decode(self) -> Option<Instruction> {
        TABLE[self.group()]
            .iter()
            .find(|p| self.0 & p.mask == p.bits)
            .map(|p| (p.decode)(self))
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#06x}", self.0)
    }
}

/// One decoded CHIP-8 instruction with its operands. `x` and `y` are
/// register indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// 00E0
    Cls,
    /// 00EE
    Ret,
    /// 1nnn
    Jp(u16),
    /// 2nnn
    Call(u16),
    /// 3xkk
    SeImm { x: usize, kk: u8 },
    /// 4xkk
    SneImm { x: usize, kk: u8 },
    /// 5xy0
    SeReg { x: usize, y: usize },
    /// 6xkk
    LdImm { x: usize, kk: u8 },
    /// 7xkk
    AddImm { x: usize, kk: u8 },
    /// 8xy0
    LdReg { x: usize, y: usize },
    /// 8xy1
    Or { x: usize, y: usize },
    /// 8xy2
    And { x: usize, y: usize },
    /// 8xy3
    Xor { x: usize, y: usize },
    /// 8xy4
    AddReg { x: usize, y: usize },
    /// 8xy5
    Sub { x: usize, y: usize },
    /// 8xy6
    Shr { x: usize, y: usize },
    /// 8xy7
    Subn { x: usize, y: usize },
    /// 8xyE
    Shl { x: usize, y: usize },
    /// 9xy0
    SneReg { x: usize, y: usize },
    /// Annn
    LdI(u16),
    /// Bnnn
    JpV0(u16),
    /// Cxkk
    Rnd { x: usize, kk: u8 },
    /// Dxyn
    Drw { x: usize, y: usize, n: u8 },
    /// Ex9E
    Skp { x: usize },
    /// ExA1
    Sknp { x: usize },
    /// Fx07
    LdFromDelay { x: usize },
    /// Fx0A
    WaitKey { x: usize },
    /// Fx15
    LdDelay { x: usize },
    /// Fx18
    LdSound { x: usize },
    /// Fx1E
    AddI { x: usize },
    /// Fx29
    LdFont { x: usize },
    /// Fx33
    Bcd { x: usize },
    /// Fx55
    Store { x: usize },
    /// Fx65
    Load { x: usize },
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Instruction::*;

        match *self {
            Cls => write!(f, "CLS"),
            Ret => write!(f, "RET"),
            Jp(nnn) => write!(f, "JP {:#05x}", nnn),
            Call(nnn) => write!(f, "CALL {:#05x}", nnn),
            SeImm { x, kk } => write!(f, "SE V{:X}, {:#04x}", x, kk),
            SneImm { x, kk } => write!(f, "SNE V{:X}, {:#04x}", x, kk),
            SeReg { x, y } => write!(f, "SE V{:X}, V{:X}", x, y),
            LdImm { x, kk } => write!(f, "LD V{:X}, {:#04x}", x, kk),
            AddImm { x, kk } => write!(f, "ADD V{:X}, {:#04x}", x, kk),
            LdReg { x, y } => write!(f, "LD V{:X}, V{:X}", x, y),
            Or { x, y } => write!(f, "OR V{:X}, V{:X}", x, y),
            And { x, y } => write!(f, "AND V{:X}, V{:X}", x, y),
            Xor { x, y } => write!(f, "XOR V{:X}, V{:X}", x, y),
            AddReg { x, y } => write!(f, "ADD V{:X}, V{:X}", x, y),
            Sub { x, y } => write!(f, "SUB V{:X}, V{:X}", x, y),
            Shr { x, y } => write!(f, "SHR V{:X}, V{:X}", x, y),
            Subn { x, y } => write!(f, "SUBN V{:X}, V{:X}", x, y),
            Shl { x, y } => write!(f, "SHL V{:X}, V{:X}", x, y),
            SneReg { x, y } => write!(f, "SNE V{:X}, V{:X}", x, y),
            LdI(nnn) => write!(f, "LD I, {:#05x}", nnn),
            JpV0(nnn) => write!(f, "JP V0, {:#05x}", nnn),
            Rnd { x, kk } => write!(f, "RND V{:X}, {:#04x}", x, kk),
            Drw { x, y, n } => write!(f, "DRW V{:X}, V{:X}, {}", x, y, n),
            Skp { x } => write!(f, "SKP V{:X}", x),
            Sknp { x } => write!(f, "SKNP V{:X}", x),
            LdFromDelay { x } => write!(f, "LD V{:X}, DT", x),
            WaitKey { x } => write!(f, "LD V{:X}, K", x),
            LdDelay { x } => write!(f, "LD DT, V{:X}", x),
            LdSound { x } => write!(f, "LD ST, V{:X}", x),
            AddI { x } => write!(f, "ADD I, V{:X}", x),
            LdFont { x } => write!(f, "LD F, V{:X}", x),
            Bcd { x } => write!(f, "LD B, V{:X}", x),
            Store { x } => write!(f, "LD [I], V{:X}", x),
            Load { x } => write!(f, "LD V{:X}, [I]", x),
        }
    }
}

/// mnemonic for any opcode, including ones that don't decode
pub fn disassemble(opcode: u16) -> String {
    match Opcode(opcode).decode() {
        Some(instr) => instr.to_string(),
        None => format!("??? {:#06x}", opcode),
    }
}

struct Pattern {
    mask: u16,
    bits: u16,
    decode: fn(Opcode) -> Instruction,
}

const fn pattern(mask: u16, bits: u16, decode: fn(Opcode) -> Instruction) -> Pattern {
    Pattern { mask, bits, decode }
}

const GROUP_0: &[Pattern] = &[
    pattern(0xffff, 0x00e0, |_| Instruction::Cls),
    pattern(0xffff, 0x00ee, |_| Instruction::Ret),
];

const GROUP_1: &[Pattern] = &[pattern(0xf000, 0x1000, |op| Instruction::Jp(op.nnn()))];

const GROUP_2: &[Pattern] = &[pattern(0xf000, 0x2000, |op| Instruction::Call(op.nnn()))];

const GROUP_3: &[Pattern] = &[pattern(0xf000, 0x3000, |op| Instruction::SeImm {
    x: op.x(),
    kk: op.kk(),
})];

const GROUP_4: &[Pattern] = &[pattern(0xf000, 0x4000, |op| Instruction::SneImm {
    x: op.x(),
    kk: op.kk(),
})];

const GROUP_5: &[Pattern] = &[pattern(0xf00f, 0x5000, |op| Instruction::SeReg {
    x: op.x(),
    y: op.y(),
})];

const GROUP_6: &[Pattern] = &[pattern(0xf000, 0x6000, |op| Instruction::LdImm {
    x: op.x(),
    kk: op.kk(),
})];

const GROUP_7: &[Pattern] = &[pattern(0xf000, 0x7000, |op| Instruction::AddImm {
    x: op.x(),
    kk: op.kk(),
})];

const GROUP_8: &[Pattern] = &[
    pattern(0xf00f, 0x8000, |op| Instruction::LdReg { x: op.x(), y: op.y() }),
    pattern(0xf00f, 0x8001, |op| Instruction::Or { x: op.x(), y: op.y() }),
    pattern(0xf00f, 0x8002, |op| Instruction::And { x: op.x(), y: op.y() }),
    pattern(0xf00f, 0x8003, |op| Instruction::Xor { x: op.x(), y: op.y() }),
    pattern(0xf00f, 0x8004, |op| Instruction::AddReg { x: op.x(), y: op.y() }),
    pattern(0xf00f, 0x8005, |op| Instruction::Sub { x: op.x(), y: op.y() }),
    pattern(0xf00f, 0x8006, |op| Instruction::Shr { x: op.x(), y: op.y() }),
    pattern(0xf00f, 0x8007, |op| Instruction::Subn { x: op.x(), y: op.y() }),
    pattern(0xf00f, 0x800e, |op| Instruction::Shl { x: op.x(), y: op.y() }),
];

const GROUP_9: &[Pattern] = &[pattern(0xf00f, 0x9000, |op| Instruction::SneReg {
    x: op.x(),
    y: op.y(),
})];

const GROUP_A: &[Pattern] = &[pattern(0xf000, 0xa000, |op| Instruction::LdI(op.nnn()))];

const GROUP_B: &[Pattern] = &[pattern(0xf000, 0xb000, |op| Instruction::JpV0(op.nnn()))];

const GROUP_C: &[Pattern] = &[pattern(0xf000, 0xc000, |op| Instruction::Rnd {
    x: op.x(),
    kk: op.kk(),
})];

const GROUP_D: &[Pattern] = &[pattern(0xf000, 0xd000, |op| Instruction::Drw {
    x: op.x(),
    y: op.y(),
    n: op.n(),
})];

const GROUP_E: &[Pattern] = &[
    pattern(0xf0ff, 0xe09e, |op| Instruction::Skp { x: op.x() }),
    pattern(0xf0ff, 0xe0a1, |op| Instruction::Sknp { x: op.x() }),
];

const GROUP_F: &[Pattern] = &[
    pattern(0xf0ff, 0xf007, |op| Instruction::LdFromDelay { x: op.x() }),
    pattern(0xf0ff, 0xf00a, |op| Instruction::WaitKey { x: op.x() }),
    pattern(0xf0ff, 0xf015, |op| Instruction::LdDelay { x: op.x() }),
    pattern(0xf0ff, 0xf018, |op| Instruction::LdSound { x: op.x() }),
    pattern(0xf0ff, 0xf01e, |op| Instruction::AddI { x: op.x() }),
    pattern(0xf0ff, 0xf029, |op| Instruction::LdFont { x: op.x() }),
    pattern(0xf0ff, 0xf033, |op| Instruction::Bcd { x: op.x() }),
    pattern(0xf0ff, 0xf055, |op| Instruction::Store { x: op.x() }),
    pattern(0xf0ff, 0xf065, |op| Instruction::Load { x: op.x() }),
];

const TABLE: [&[Pattern]; 16] = [
    GROUP_0, GROUP_1, GROUP_2, GROUP_3, GROUP_4, GROUP_5, GROUP_6, GROUP_7, GROUP_8, GROUP_9,
    GROUP_A, GROUP_B, GROUP_C, GROUP_D, GROUP_E, GROUP_F,
];

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_fields() {
        let op = Opcode(0xd5a7);
        assert_eq!(op.group(), 0xd);
        assert_eq!(op.nnn(), 0x5a7);
        assert_eq!(op.kk(), 0xa7);
        assert_eq!(op.n(), 0x7);
        assert_eq!(op.x(), 0x5);
        assert_eq!(op.y(), 0xa);
    }

    #[test]
    fn test_every_group_decodes() {
        let cases = [
            (0x00e0, Instruction::Cls),
            (0x00ee, Instruction::Ret),
            (0x1234, Instruction::Jp(0x234)),
            (0x2abc, Instruction::Call(0xabc)),
            (0x3a12, Instruction::SeImm { x: 0xa, kk: 0x12 }),
            (0x4b34, Instruction::SneImm { x: 0xb, kk: 0x34 }),
            (0x5120, Instruction::SeReg { x: 1, y: 2 }),
            (0x6c56, Instruction::LdImm { x: 0xc, kk: 0x56 }),
            (0x7d78, Instruction::AddImm { x: 0xd, kk: 0x78 }),
            (0x8120, Instruction::LdReg { x: 1, y: 2 }),
            (0x8121, Instruction::Or { x: 1, y: 2 }),
            (0x8122, Instruction::And { x: 1, y: 2 }),
            (0x8123, Instruction::Xor { x: 1, y: 2 }),
            (0x8124, Instruction::AddReg { x: 1, y: 2 }),
            (0x8125, Instruction::Sub { x: 1, y: 2 }),
            (0x8126, Instruction::Shr { x: 1, y: 2 }),
            (0x8127, Instruction::Subn { x: 1, y: 2 }),
            (0x812e, Instruction::Shl { x: 1, y: 2 }),
            (0x9340, Instruction::SneReg { x: 3, y: 4 }),
            (0xa123, Instruction::LdI(0x123)),
            (0xb456, Instruction::JpV0(0x456)),
            (0xc7ff, Instruction::Rnd { x: 7, kk: 0xff }),
            (0xd125, Instruction::Drw { x: 1, y: 2, n: 5 }),
            (0xe39e, Instruction::Skp { x: 3 }),
            (0xe4a1, Instruction::Sknp { x: 4 }),
            (0xf507, Instruction::LdFromDelay { x: 5 }),
            (0xf60a, Instruction::WaitKey { x: 6 }),
            (0xf715, Instruction::LdDelay { x: 7 }),
            (0xf818, Instruction::LdSound { x: 8 }),
            (0xf91e, Instruction::AddI { x: 9 }),
            (0xfa29, Instruction::LdFont { x: 0xa }),
            (0xfb33, Instruction::Bcd { x: 0xb }),
            (0xfc55, Instruction::Store { x: 0xc }),
            (0xfd65, Instruction::Load { x: 0xd }),
        ];

        for (raw, expected) in cases {
            assert_eq!(Opcode(raw).decode(), Some(expected), "{:#06x}", raw);
        }
    }

    #[test]
    fn test_unknown_opcodes() {
        for raw in [
            0x0000, 0x0123, 0x00e1, 0x5121, 0x8008, 0x800f, 0x9001, 0xe000, 0xe19f, 0xf000,
            0xf1ff,
        ] {
            assert_eq!(Opcode(raw).decode(), None, "{:#06x}", raw);
        }
    }

    #[test]
    fn test_disassemble() {
        assert_eq!(disassemble(0x00e0), "CLS");
        assert_eq!(disassemble(0x6005), "LD V0, 0x05");
        assert_eq!(disassemble(0x1200), "JP 0x200");
        assert_eq!(disassemble(0xd01f), "DRW V0, V1, 15");
        assert_eq!(disassemble(0xfa55), "LD [I], VA");
        assert_eq!(disassemble(0x5121), "??? 0x5121");
    }
}
