use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// frames per second; instructions run in batches of `--ipf` per frame
pub const FRAME_HZ: u32 = 60;

/// Run a CHIP-8 program in the terminal
#[derive(Parser, Debug, Clone)]
#[command(name = "chip8-vm", version)]
pub struct Config {
    /// program image to load at 0x200
    pub rom: PathBuf,

    /// instructions executed per frame
    #[arg(long = "ipf", default_value_t = 12)]
    pub instructions_per_frame: usize,

    /// delay and sound timer tick rate
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(1..=1000))]
    pub timer_hz: u32,

    /// seed for CXNN; entropy when absent
    #[arg(long)]
    pub seed: Option<u64>,

    /// no sound
    #[arg(long)]
    pub mute: bool,

    /// don't draw to the terminal
    #[arg(long)]
    pub headless: bool,

    /// stop after this many frames
    #[arg(long)]
    pub frames: Option<u64>,
}

impl Config {
    /// wall-clock length of one frame, independent of the timer rate
    pub fn frame_period(&self) -> Duration {
        Duration::from_secs(1) / FRAME_HZ
    }

    /// wall-clock length of one timer tick
    pub fn timer_period(&self) -> Duration {
        Duration::from_secs(1) / self.timer_hz
    }
}
