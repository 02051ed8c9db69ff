/// Number of keys on the keypad (0x0-0xF)
pub const KEY_COUNT: u8 = 16;

/// Latched keypad state as a bitmask, bit `k` set while logical key `k` is
/// held. The mask from the previous cycle is kept so a release can be told
/// apart from a key that was never pressed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Keypad {
    current: u16,
    previous: u16,
}

impl Keypad {
    pub fn set(&mut self, mask: u16) {
        self.current = mask;
    }

    pub fn get(&self) -> u16 {
        self.current
    }

    pub fn previous(&self) -> u16 {
        self.previous
    }

    pub fn is_pressed(&self, key: u8) -> bool {
        key < KEY_COUNT && self.current & (1 << key) != 0
    }

    /// take the snapshot the next cycle compares against
    pub fn latch(&mut self) {
        self.previous = self.current;
    }

    /// lowest key that was down last cycle and is up now
    pub fn released(&self) -> Option<u8> {
        let edges = self.previous & !self.current;
        (0..KEY_COUNT).find(|&key| edges & (1 << key) != 0)
    }
}
