use log::debug;

use crate::error::Chip8Error;

/// how much RAM we have
pub const MEMORY_SIZE: usize = 4096;

/// where the program is loaded
pub const ADDR_OFFSET: u16 = 0x200;

/// where the built-in hex font starts
pub const FONT_ADDR: u16 = 0x000;

/// bytes per font glyph
pub const FONT_GLYPH_SIZE: u16 = 5;

const FONT: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

/// 4K of byte-addressed RAM. Every address wraps modulo the memory size, so
/// reads and writes never go out of bounds.
#[derive(Clone)]
pub struct Memory {
    bytes: Box<[u8; MEMORY_SIZE]>,
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl Memory {
    /// zeroed memory with the font baked in at the bottom
    pub fn new() -> Self {
        let mut m = Memory {
            bytes: Box::new([0u8; MEMORY_SIZE]),
        };
        m.load_font();
        m
    }

    pub fn clear(&mut self) {
        self.bytes.fill(0);
        self.load_font();
    }

    fn load_font(&mut self) {
        let start = FONT_ADDR as usize;
        self.bytes[start..start + FONT.len()].copy_from_slice(&FONT);
    }

    pub fn read(&self, addr: u16) -> u8 {
        self.bytes[wrap(addr)]
    }

    pub fn write(&mut self, addr: u16, value: u8) {
        self.bytes[wrap(addr)] = value;
    }

    /// big-endian two-byte word, as instructions are stored
    pub fn read_word(&self, addr: u16) -> u16 {
        u16::from(self.read(addr)) << 8 | u16::from(self.read(addr.wrapping_add(1)))
    }

    /// load a CHIP-8 program at 0x200. Nothing is written if it doesn't fit.
    pub fn load_program(&mut self, program: &[u8]) -> Result<(), Chip8Error> {
        let start = ADDR_OFFSET as usize;
        let max_size = MEMORY_SIZE - start;
        if program.len() > max_size {
            return Err(Chip8Error::RomTooLarge {
                size: program.len(),
                max_size,
            });
        }

        self.bytes[start..start + program.len()].copy_from_slice(program);
        debug!("Loaded {} byte program at {:#05x}", program.len(), start);
        Ok(())
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes[..]
    }
}

fn wrap(addr: u16) -> usize {
    addr as usize % MEMORY_SIZE
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_memory_zeroed() {
        let m = Memory::new();
        // NB. memory is zeroed from 0x200 because before that we bake in the font
        assert!(m.as_slice()[0x200..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_font_loaded_at_base() {
        let m = Memory::new();
        assert_eq!(&m.as_slice()[..5], &[0xF0, 0x90, 0x90, 0x90, 0xF0]);
        // glyph F
        assert_eq!(&m.as_slice()[75..80], &[0xF0, 0x80, 0xF0, 0x80, 0x80]);
    }

    #[test]
    fn test_addresses_wrap() {
        let mut m = Memory::new();
        m.write(0x1000, 0xAB);
        assert_eq!(m.read(0x0000), 0xAB);
        m.write(0xFFFF, 0xCD);
        assert_eq!(m.read(0x0FFF), 0xCD);
    }

    #[test]
    fn test_read_word() {
        let mut m = Memory::new();
        m.load_program(&[0x12, 0x34, 0x56]).unwrap();
        assert_eq!(m.read_word(0x200), 0x1234);
        assert_eq!(m.read_word(0x201), 0x3456);
    }

    #[test]
    fn test_read_word_wraps_at_top() {
        let mut m = Memory::new();
        m.write(0xFFF, 0xA2);
        assert_eq!(m.read_word(0xFFF), 0xA2F0);
    }

    #[test]
    fn test_program_load_ok() {
        let mut m = Memory::new();
        m.load_program(&[0x00, 0xe0]).unwrap(); // clear screen
        assert_eq!(&m.as_slice()[0x200..0x202], &[0x00, 0xe0]);
    }

    #[test]
    fn test_program_exactly_fills_memory() {
        let mut m = Memory::new();
        let prog = vec![0x11; MEMORY_SIZE - 0x200];
        m.load_program(&prog).unwrap();
        assert_eq!(m.read(0xFFF), 0x11);
    }

    #[test]
    fn test_program_too_large() {
        let mut m = Memory::new();
        let prog = vec![0x11; MEMORY_SIZE - 0x200 + 1];
        assert_eq!(
            m.load_program(&prog),
            Err(Chip8Error::RomTooLarge {
                size: 3585,
                max_size: 3584
            })
        );
        assert_eq!(m.read(0x200), 0);
    }

    #[test]
    fn test_clear_keeps_font() {
        let mut m = Memory::new();
        m.load_program(&[0xff; 16]).unwrap();
        m.clear();
        assert_eq!(m.read(0x200), 0);
        assert_eq!(m.read(0), 0xF0);
    }
}
