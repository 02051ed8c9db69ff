use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(version, about = "CHIP-8 interpreter")]
pub struct Args {
    /// ROM image to run
    pub rom: PathBuf,

    /// Instructions executed per second
    #[arg(long, default_value_t = 500.0)]
    pub ips: f32,

    /// Window pixels per CHIP-8 pixel
    #[arg(short, long, default_value_t = 20)]
    pub scale: u32,

    /// Physical key layout
    #[arg(short, long, value_enum, default_value_t = Keymap::Conventional)]
    pub keymap: Keymap,

    /// Seed for the random instruction, for reproducible runs
    #[arg(long)]
    pub seed: Option<u64>,

    /// Seconds between status lines, 0 to disable
    #[arg(long, default_value_t = 0.0)]
    pub status_secs: f32,

    /// Stop after this many instructions
    #[arg(long)]
    pub max_cycles: Option<u64>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Keymap {
    /// keys 0-9 and A-F map to the keypad key of the same name
    Literal,
    /// the 1234/QWER/ASDF/ZXCV block stands in for the 4x4 keypad
    Conventional,
}
