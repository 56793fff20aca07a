//! The host side of timing: run a batch of instructions per frame, tick the
//! timers at their own fixed rate, and sleep off whatever is left of the
//! frame. CHIP-8 instructions will run as fast as possible then sleep, so not
//! quite authentic, but wall-clock timing looks right.
use crate::error::Chip8Error;
use crate::interpreter::Chip8Interpreter;
use std::time::{Duration, Instant};

/// how the host paces the interpreter
#[derive(Debug, Clone)]
pub struct Schedule {
    pub instructions_per_frame: usize,
    pub frame_period: Duration,
    pub timer_period: Duration,
    pub max_frames: Option<u64>,
}

/// Counts whole timer periods as wall-clock time goes by. Fractions carry
/// over, so timers decay at the nominal rate however the frames jitter.
pub struct TimerPacer {
    period: Duration,
    next_tick: Duration,
}

impl TimerPacer {
    pub fn new(period: Duration) -> Self {
        TimerPacer {
            period,
            next_tick: period,
        }
    }

    /// how many ticks are owed now that `elapsed` has passed since the start
    pub fn ticks_due(&mut self, elapsed: Duration) -> u32 {
        let mut ticks = 0;
        while elapsed >= self.next_tick {
            self.next_tick += self.period;
            ticks += 1;
        }
        ticks
    }
}

/// Drive `chip8` until `max_frames` frames have run or something fails.
/// Returns the number of frames run. A quit request from the keypad comes
/// back as an error; see `Chip8Error::is_interrupt`.
pub fn run(chip8: &mut Chip8Interpreter, schedule: &Schedule) -> Result<u64, Chip8Error> {
    let start = Instant::now();
    let mut pacer = TimerPacer::new(schedule.timer_period);
    let mut frames: u64 = 0;
    let mut next_frame = Duration::ZERO;

    while schedule.max_frames.map_or(true, |max| frames < max) {
        chip8.input().pump()?;
        chip8.step(schedule.instructions_per_frame)?;
        for _ in 0..pacer.ticks_due(start.elapsed()) {
            chip8.tick_timers()?;
        }
        frames += 1;

        next_frame += schedule.frame_period;
        let elapsed = start.elapsed();
        if next_frame > elapsed {
            spin_sleep::sleep(next_frame - elapsed);
        }
    }
    Ok(frames)
}
