use std::fs;

use anyhow::{ensure, Context, Result};
use chip8_vm::Chip8;
use clap::Parser;
use log::info;

use crate::args::Args;
use crate::chip8::Externals;

mod args;
mod chip8;
mod display;
mod input;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    ensure!(args.ips > 0.0, "Instruction rate must be positive");

    let rom = fs::read(&args.rom)
        .with_context(|| format!("Failed to read ROM {}", args.rom.display()))?;

    let mut cpu = match args.seed {
        Some(seed) => Chip8::with_seed(args.ips, seed),
        None => Chip8::new(args.ips),
    };
    cpu.load_rom(&rom)?;
    info!("Loaded {} ({} bytes)", args.rom.display(), rom.len());

    let mut externals = Externals::new(&args)?;
    chip8::main_chip_loop(&mut cpu, &mut externals, &args)
}
