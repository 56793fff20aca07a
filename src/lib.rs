//! # chip8-vm
//!
//! A CHIP-8 virtual machine. The interpreter itself knows nothing about
//! terminals, keyboards or speakers; the host lends it three devices and
//! drives it.
//!
//! ## Design
//!
//! * bit-exact opcode semantics, including VF ordering and address wraparound
//! * abstract display so can plug alternatives; starting with TUI in-console
//! * abstract keypad and buzzer the same way, with fakes for tests
//! * instructions and timers are driven separately by the host, so the
//!   instruction rate can change without changing how fast timers decay
//! * errors come back as values; nothing in the interpreter logs or panics
//!   on bad programs
//!
//! Model
//!
//! ```text
//! main
//!  |-- config (command line)
//!  |-- display, input, sound
//!  |-- interpreter(display, input, sound)
//!  |    |-- memory map, loader bounds
//!  |    |-- opcode decode
//!  |    `-- registers, stack, timers, frame buffer
//!  `-- scheduler
//!       |-- input.pump()
//!       |-- interpreter.step(instructions per frame)
//!       |-- interpreter.tick_timers() x however many timer periods passed
//!       `-- sleep out the rest of the frame
//! ```
pub mod config;
pub mod display;
pub mod error;
pub mod input;
pub mod interpreter;
pub mod memory;
pub mod opcode;
pub mod scheduler;
pub mod sound;

pub use error::Chip8Error;
pub use interpreter::Chip8Interpreter;
