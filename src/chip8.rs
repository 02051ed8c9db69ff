use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chip8_vm::{Chip8, StepOk};
use log::{error, info};

use crate::args::Args;
use crate::display::Display;
use crate::input::{Input, InputAction};

const TIMER_HZ: f32 = 60.0;

/// how far a clock may fall behind before it stops trying to catch up
const MAX_BACKLOG: u32 = 8;

pub struct Externals {
    pub display: Display,
    pub input: Input,
}

impl Externals {
    pub fn new(args: &Args) -> Result<Self> {
        let mut display = Display::new(args.scale)?;

        Ok(Self {
            input: Input::new(&mut display, args.keymap)?,
            display,
        })
    }
}

/// Fixed-rate schedule gated on elapsed wall-clock time.
struct Cadence {
    period: Duration,
    next: Instant,
}

impl Cadence {
    fn new(period: Duration, start: Instant) -> Self {
        Cadence {
            period,
            next: start + period,
        }
    }

    fn from_hz(hz: f32, start: Instant) -> Self {
        Self::new(Duration::from_secs_f32(1.0 / hz), start)
    }

    /// true at most once per period; a late clock runs back-to-back until
    /// it has caught up
    fn due(&mut self, now: Instant) -> bool {
        if now < self.next {
            return false;
        }

        self.next += self.period;
        if now > self.next + self.period * MAX_BACKLOG {
            self.next = now + self.period;
        }
        true
    }
}

pub fn main_chip_loop(cpu: &mut Chip8, externals: &mut Externals, args: &Args) -> Result<()> {
    let start = Instant::now();
    let mut instr_clock = Cadence::from_hz(cpu.instr_per_secs(), start);
    let mut timer_clock = Cadence::from_hz(TIMER_HZ, start);
    let mut status_clock = (args.status_secs > 0.0)
        .then(|| Cadence::new(Duration::from_secs_f32(args.status_secs), start));
    let mut cycles: u64 = 0;

    externals.display.present(cpu.screen())?;

    'mainloop: loop {
        if InputAction::BreakDisplay == externals.input.handle_input() {
            break 'mainloop;
        }
        cpu.set_keys(externals.input.key_pad);

        let now = Instant::now();

        if instr_clock.due(now) {
            match cpu.step() {
                Ok(StepOk::Draw) => externals.display.present(cpu.screen())?,
                Ok(_) => {}
                Err(e) => {
                    error!("{}", cpu);
                    return Err(e).context(format!("Machine halted after {} instructions", cycles));
                }
            }

            cycles += 1;
            if args.max_cycles.is_some_and(|max| cycles >= max) {
                info!("Reached cycle limit");
                break 'mainloop;
            }
        }

        if timer_clock.due(now) {
            cpu.tick_timers();
        }

        if let Some(clock) = status_clock.as_mut() {
            if clock.due(now) {
                info!("{} instructions; {}", cycles, cpu);
            }
        }

        let wake = instr_clock.next.min(timer_clock.next);
        std::thread::sleep(wake.saturating_duration_since(Instant::now()));
    }

    info!("Stopped after {} instructions", cycles);
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_cadence_waits_one_period() {
        let start = Instant::now();
        let mut c = Cadence::new(Duration::from_millis(10), start);
        assert!(!c.due(start));
        assert!(!c.due(start + Duration::from_millis(9)));
        assert!(c.due(start + Duration::from_millis(10)));
        assert!(!c.due(start + Duration::from_millis(11)));
        assert!(c.due(start + Duration::from_millis(20)));
    }

    #[test]
    fn test_cadence_catches_up() {
        let start = Instant::now();
        let mut c = Cadence::new(Duration::from_millis(10), start);
        let late = start + Duration::from_millis(35);
        assert!(c.due(late));
        assert!(c.due(late));
        assert!(c.due(late));
        assert!(!c.due(late));
    }

    #[test]
    fn test_cadence_drops_long_backlog() {
        let start = Instant::now();
        let mut c = Cadence::new(Duration::from_millis(10), start);
        let very_late = start + Duration::from_secs(5);
        assert!(c.due(very_late));
        assert!(!c.due(very_late));
        assert!(c.due(very_late + Duration::from_millis(10)));
    }

    #[test]
    fn test_timer_and_instruction_rates_independent() {
        let start = Instant::now();
        let mut instr = Cadence::from_hz(500.0, start);
        let mut timer = Cadence::from_hz(TIMER_HZ, start);
        let (mut steps, mut ticks) = (0, 0);

        for ms in 1..=1000u64 {
            let now = start + Duration::from_millis(ms);
            while instr.due(now) {
                steps += 1;
            }
            if timer.due(now) {
                ticks += 1;
            }
        }

        assert!((499..=500).contains(&steps), "{}", steps);
        assert!((59..=60).contains(&ticks), "{}", ticks);
    }
}
