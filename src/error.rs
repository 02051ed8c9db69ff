use thiserror::Error;

/// Everything that can stop the machine from stepping.
///
/// A step that fails leaves the machine exactly as it was before the step,
/// with the program counter pointing at the offending instruction.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Chip8Error {
    #[error("Unknown instruction {opcode:#06x} at {pc:#05x}")]
    UnknownOpcode { pc: u16, opcode: u16 },

    #[error("Stack overflow: call at {pc:#05x} with all stack slots in use")]
    StackOverflow { pc: u16 },

    #[error("Stack underflow: return at {pc:#05x} with an empty call stack")]
    StackUnderflow { pc: u16 },

    #[error("ROM is too large ({size} bytes), max size is {max_size} bytes")]
    RomTooLarge { size: usize, max_size: usize },
}

impl Chip8Error {
    /// Program counter of the faulting instruction, if the error came from a step.
    pub fn pc(&self) -> Option<u16> {
        match *self {
            Chip8Error::UnknownOpcode { pc, .. }
            | Chip8Error::StackOverflow { pc }
            | Chip8Error::StackUnderflow { pc } => Some(pc),
            Chip8Error::RomTooLarge { .. } => None,
        }
    }
}
