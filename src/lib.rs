//! CHIP-8 virtual machine core.
//!
//! [`Chip8`] owns all machine state (memory, registers, stack, timers, the
//! frame buffer and the keypad latch). The host drives it from outside: it
//! calls [`Chip8::step`] at the instruction rate, [`Chip8::tick_timers`] at
//! 60 Hz, feeds key state through [`Chip8::set_keys`] and presents
//! [`Chip8::screen`] whenever a step reports [`StepOk::Draw`].

pub mod chip;
pub mod error;
pub mod keypad;
pub mod memory;
pub mod opcode;
pub mod screen;

pub use chip::{Chip8, StepOk};
pub use error::Chip8Error;
