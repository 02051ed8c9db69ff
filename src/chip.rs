use std::fmt;

use log::{debug, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::Chip8Error;
use crate::keypad::Keypad;
use crate::memory::{Memory, ADDR_OFFSET, FONT_ADDR, FONT_GLYPH_SIZE};
use crate::opcode::{Instruction, Opcode};
use crate::screen::Screen;

pub const REGISTER_COUNT: usize = 16;

/// Levels of subroutine nesting.
pub const STACK_SIZE: usize = 16;

/// VF, written by arithmetic, shifts and draws
const FLAG: usize = 0xf;

/// What a successful step did, as far as the host cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOk {
    Normal,
    /// the screen changed and should be presented
    Draw,
    /// parked on Fx0A until a key is released
    Waiting,
}

pub struct Chip8 {
    stack: [u16; STACK_SIZE],
    sp: usize,
    delay_timer: u8,
    sound_timer: u8,
    registers: [u8; REGISTER_COUNT],
    ip: u16, // Instruction pointer
    ireg: u16,
    memory: Memory,
    screen: Screen,
    keypad: Keypad,
    rng: StdRng,
    instr_per_secs: f32,
}

impl Chip8 {
    /// A zeroed machine with the font loaded, ready for a ROM. The rate is
    /// only carried for the host, stepping is driven from outside.
    pub fn new(instr_per_secs: f32) -> Self {
        Self::with_rng(instr_per_secs, StdRng::from_entropy())
    }

    /// Same as [`Chip8::new`] but with a reproducible random source.
    pub fn with_seed(instr_per_secs: f32, seed: u64) -> Self {
        Self::with_rng(instr_per_secs, StdRng::seed_from_u64(seed))
    }

    fn with_rng(instr_per_secs: f32, rng: StdRng) -> Self {
        Chip8 {
            stack: [0; STACK_SIZE],
            sp: 0,
            delay_timer: 0,
            sound_timer: 0,
            registers: [0; REGISTER_COUNT],
            ip: ADDR_OFFSET,
            ireg: 0,
            memory: Memory::new(),
            screen: Screen::new(),
            keypad: Keypad::default(),
            rng,
            instr_per_secs,
        }
    }

    /// Back to power-on state, ROM included. Keeps the rate and the random source.
    pub fn reset(&mut self) {
        self.stack = [0; STACK_SIZE];
        self.sp = 0;
        self.delay_timer = 0;
        self.sound_timer = 0;
        self.registers = [0; REGISTER_COUNT];
        self.ip = ADDR_OFFSET;
        self.ireg = 0;
        self.memory.clear();
        self.screen.clear();
        self.keypad = Keypad::default();
        debug!("Machine reset");
    }

    pub fn load_rom(&mut self, rom: &[u8]) -> Result<(), Chip8Error> {
        self.memory.load_program(rom)
    }

    /// Run one instruction.
    ///
    /// On error nothing is changed and the program counter is left on the
    /// faulting instruction, so the caller can report it or reset.
    pub fn step(&mut self) -> Result<StepOk, Chip8Error> {
        let pc = self.ip;
        let opcode = self.fetch();

        let result = match opcode.decode() {
            Some(instr) => {
                trace!("{:#05x}: {} {}", pc, opcode, instr);
                self.execute(instr)
            }
            None => Err(Chip8Error::UnknownOpcode {
                pc,
                opcode: opcode.0,
            }),
        };

        match result {
            Ok(ok) => {
                self.keypad.latch();
                Ok(ok)
            }
            Err(e) => {
                self.ip = pc;
                Err(e)
            }
        }
    }

    /// One 60 Hz timer step.
    pub fn tick_timers(&mut self) {
        if self.delay_timer > 0 {
            self.delay_timer -= 1;
        }

        if self.sound_timer > 0 {
            self.sound_timer -= 1;
        }
    }

    pub fn set_keys(&mut self, mask: u16) {
        self.keypad.set(mask);
    }

    pub fn keys(&self) -> u16 {
        self.keypad.get()
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn registers(&self) -> &[u8; REGISTER_COUNT] {
        &self.registers
    }

    pub fn index(&self) -> u16 {
        self.ireg
    }

    pub fn pc(&self) -> u16 {
        self.ip
    }

    pub fn sp(&self) -> usize {
        self.sp
    }

    /// return addresses currently on the stack, oldest first
    pub fn stack(&self) -> &[u16] {
        &self.stack[..self.sp]
    }

    pub fn delay_timer(&self) -> u8 {
        self.delay_timer
    }

    pub fn sound_timer(&self) -> u8 {
        self.sound_timer
    }

    pub fn sound_active(&self) -> bool {
        self.sound_timer > 0
    }

    pub fn instr_per_secs(&self) -> f32 {
        self.instr_per_secs
    }

    fn fetch(&mut self) -> Opcode {
        let bytes = self.memory.read_word(self.ip);
        self.ip = self.ip.wrapping_add(2);

        Opcode(bytes)
    }

    fn skip_instructions(&mut self, num_instr: u16) {
        self.ip = self.ip.wrapping_add(num_instr * 2);
    }

    /// address of the instruction being executed
    fn current_pc(&self) -> u16 {
        self.ip.wrapping_sub(2)
    }

    fn execute(&mut self, instr: Instruction) -> Result<StepOk, Chip8Error> {
        use Instruction::*;

        match instr {
            Cls => {
                self.screen.clear();
                return Ok(StepOk::Draw);
            }
            Ret => {
                if self.sp == 0 {
                    return Err(Chip8Error::StackUnderflow {
                        pc: self.current_pc(),
                    });
                }
                self.sp -= 1;
                self.ip = self.stack[self.sp];
            }
            Jp(nnn) => self.ip = nnn,
            Call(nnn) => {
                if self.sp == STACK_SIZE {
                    return Err(Chip8Error::StackOverflow {
                        pc: self.current_pc(),
                    });
                }
                self.stack[self.sp] = self.ip;
                self.sp += 1;
                self.ip = nnn;
            }
            SeImm { x, kk } => {
                if self.registers[x] == kk {
                    self.skip_instructions(1);
                }
            }
            SneImm { x, kk } => {
                if self.registers[x] != kk {
                    self.skip_instructions(1);
                }
            }
            SeReg { x, y } => {
                if self.registers[x] == self.registers[y] {
                    self.skip_instructions(1);
                }
            }
            SneReg { x, y } => {
                if self.registers[x] != self.registers[y] {
                    self.skip_instructions(1);
                }
            }
            LdImm { x, kk } => self.registers[x] = kk,
            AddImm { x, kk } => self.registers[x] = self.registers[x].wrapping_add(kk),
            LdReg { x, y } => self.registers[x] = self.registers[y],
            Or { x, y } => self.registers[x] |= self.registers[y],
            And { x, y } => self.registers[x] &= self.registers[y],
            Xor { x, y } => self.registers[x] ^= self.registers[y],
            AddReg { x, y } => {
                let (sum, carry) = self.registers[x].overflowing_add(self.registers[y]);
                self.registers[x] = sum;
                self.registers[FLAG] = carry as u8;
            }
            Sub { x, y } => {
                let (vx, vy) = (self.registers[x], self.registers[y]);
                self.registers[x] = vx.wrapping_sub(vy);
                self.registers[FLAG] = (vx >= vy) as u8;
            }
            Subn { x, y } => {
                let (vx, vy) = (self.registers[x], self.registers[y]);
                self.registers[x] = vy.wrapping_sub(vx);
                self.registers[FLAG] = (vy >= vx) as u8;
            }
            Shr { x, .. } => {
                let vx = self.registers[x];
                self.registers[x] = vx >> 1;
                self.registers[FLAG] = vx & 0b0000_0001;
            }
            Shl { x, .. } => {
                let vx = self.registers[x];
                self.registers[x] = vx << 1;
                self.registers[FLAG] = vx >> 7;
            }
            LdI(nnn) => self.ireg = nnn,
            JpV0(nnn) => self.ip = nnn + u16::from(self.registers[0]),
            Rnd { x, kk } => self.registers[x] = self.rng.gen::<u8>() & kk,
            Drw { x, y, n } => {
                self.draw_instr(self.registers[x], self.registers[y], n);
                return Ok(StepOk::Draw);
            }
            Skp { x } => {
                if self.keypad.is_pressed(self.registers[x]) {
                    self.skip_instructions(1);
                }
            }
            Sknp { x } => {
                if !self.keypad.is_pressed(self.registers[x]) {
                    self.skip_instructions(1);
                }
            }
            LdFromDelay { x } => self.registers[x] = self.delay_timer,
            WaitKey { x } => match self.keypad.released() {
                Some(key) => self.registers[x] = key,
                None => {
                    self.ip = self.current_pc();
                    return Ok(StepOk::Waiting);
                }
            },
            LdDelay { x } => self.delay_timer = self.registers[x],
            LdSound { x } => self.sound_timer = self.registers[x],
            AddI { x } => self.ireg = self.ireg.wrapping_add(u16::from(self.registers[x])),
            LdFont { x } => {
                self.ireg = FONT_ADDR + FONT_GLYPH_SIZE * u16::from(self.registers[x]);
            }
            Bcd { x } => {
                let vx = self.registers[x];
                self.memory.write(self.ireg, vx / 100);
                self.memory.write(self.ireg.wrapping_add(1), vx / 10 % 10);
                self.memory.write(self.ireg.wrapping_add(2), vx % 10);
            }
            Store { x } => {
                for i in 0..=x {
                    self.memory
                        .write(self.ireg.wrapping_add(i as u16), self.registers[i]);
                }
            }
            Load { x } => {
                for i in 0..=x {
                    self.registers[i] = self.memory.read(self.ireg.wrapping_add(i as u16));
                }
            }
        }

        Ok(StepOk::Normal)
    }

    fn draw_instr(&mut self, x: u8, y: u8, height: u8) {
        let sprite: Vec<u8> = (0..u16::from(height))
            .map(|row| self.memory.read(self.ireg.wrapping_add(row)))
            .collect();

        let collision = self.screen.draw_sprite(x, y, &sprite);
        self.registers[FLAG] = collision as u8;
    }
}

/// one-line status, for the host's periodic report
impl fmt::Display for Chip8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PC: {:#05x}, I: {:#05x}, SP: {}, DT: {}, ST: {}, V: {:02x?}",
            self.ip, self.ireg, self.sp, self.delay_timer, self.sound_timer, self.registers
        )
    }
}
