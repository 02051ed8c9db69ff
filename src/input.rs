use anyhow::{anyhow, Result};
use log::warn;
use sdl2::{event::Event, keyboard::Keycode, EventPump};

use crate::args::Keymap;
use crate::display::Display;

/// keys 0-9 and a-f map straight onto the keypad key of the same name
const LITERAL_KEYMAP: [(Keycode, u8); 16] = [
    (Keycode::Num0, 0x00),
    (Keycode::Num1, 0x01),
    (Keycode::Num2, 0x02),
    (Keycode::Num3, 0x03),
    (Keycode::Num4, 0x04),
    (Keycode::Num5, 0x05),
    (Keycode::Num6, 0x06),
    (Keycode::Num7, 0x07),
    (Keycode::Num8, 0x08),
    (Keycode::Num9, 0x09),
    (Keycode::A, 0x0a),
    (Keycode::B, 0x0b),
    (Keycode::C, 0x0c),
    (Keycode::D, 0x0d),
    (Keycode::E, 0x0e),
    (Keycode::F, 0x0f),
];

/// ditto using left-hand side of qwerty keyboard
///
///   1 2 3 C        1 2 3 4
///   4 5 6 D   <=   q w e r
///   7 8 9 E        a s d f
///   A 0 B F        z x c v
const CONVENTIONAL_KEYMAP: [(Keycode, u8); 16] = [
    (Keycode::X, 0x00),
    (Keycode::Num1, 0x01),
    (Keycode::Num2, 0x02),
    (Keycode::Num3, 0x03),
    (Keycode::Q, 0x04),
    (Keycode::W, 0x05),
    (Keycode::E, 0x06),
    (Keycode::A, 0x07),
    (Keycode::S, 0x08),
    (Keycode::D, 0x09),
    (Keycode::Z, 0x0a),
    (Keycode::C, 0x0b),
    (Keycode::Num4, 0x0c),
    (Keycode::R, 0x0d),
    (Keycode::F, 0x0e),
    (Keycode::V, 0x0f),
];

#[derive(PartialEq)]
pub enum InputAction {
    BreakDisplay,
    None,
}

pub struct Input {
    pub key_pad: u16,
    keymap: &'static [(Keycode, u8); 16],
    event_pump: EventPump,
}

impl Input {
    pub fn new(display: &mut Display, keymap: Keymap) -> Result<Self> {
        let event_pump = display.sdl_context.event_pump().map_err(|e| anyhow!(e))?;

        Ok(Self {
            event_pump,
            key_pad: 0,
            keymap: keymap_table(keymap),
        })
    }

    /// drain pending events into the key mask
    pub fn handle_input(&mut self) -> InputAction {
        for event in self.event_pump.poll_iter() {
            match event {
                Event::Quit { .. } => return InputAction::BreakDisplay,
                Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => return InputAction::BreakDisplay,
                Event::KeyDown {
                    keycode: Some(keycode),
                    repeat: false,
                    ..
                } => match lookup(self.keymap, keycode) {
                    Some(key) => self.key_pad |= 1 << key,
                    None => warn!("Can't map {:?} to a keypad key", keycode),
                },
                Event::KeyUp {
                    keycode: Some(keycode),
                    ..
                } => {
                    if let Some(key) = lookup(self.keymap, keycode) {
                        self.key_pad &= !(1 << key);
                    }
                }
                _ => {}
            }
        }

        InputAction::None
    }
}

fn keymap_table(keymap: Keymap) -> &'static [(Keycode, u8); 16] {
    match keymap {
        Keymap::Literal => &LITERAL_KEYMAP,
        Keymap::Conventional => &CONVENTIONAL_KEYMAP,
    }
}

fn lookup(keymap: &[(Keycode, u8)], keycode: Keycode) -> Option<u8> {
    keymap
        .iter()
        .find(|(k, _)| *k == keycode)
        .map(|&(_, key)| key)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_every_key_mapped_once() {
        for keymap in [Keymap::Literal, Keymap::Conventional] {
            let table = keymap_table(keymap);
            let mask = table.iter().fold(0u16, |mask, &(_, key)| mask | 1 << key);
            assert_eq!(mask, 0xffff, "{:?}", keymap);
        }
    }

    #[test]
    fn test_literal_lookup() {
        assert_eq!(lookup(&LITERAL_KEYMAP, Keycode::Num7), Some(0x7));
        assert_eq!(lookup(&LITERAL_KEYMAP, Keycode::C), Some(0xc));
        assert_eq!(lookup(&LITERAL_KEYMAP, Keycode::Q), None);
    }

    #[test]
    fn test_conventional_lookup() {
        assert_eq!(lookup(&CONVENTIONAL_KEYMAP, Keycode::X), Some(0x0));
        assert_eq!(lookup(&CONVENTIONAL_KEYMAP, Keycode::Num4), Some(0xc));
        assert_eq!(lookup(&CONVENTIONAL_KEYMAP, Keycode::V), Some(0xf));
        assert_eq!(lookup(&CONVENTIONAL_KEYMAP, Keycode::Num0), None);
    }
}
