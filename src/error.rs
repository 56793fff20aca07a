use std::io;
use thiserror::Error;

/// Everything that can stop the interpreter. None of these are retried
/// internally; the host decides whether to halt, reset or report.
#[derive(Debug, Error)]
pub enum Chip8Error {
    #[error("invalid program: {len} bytes, must be 1 to {max} bytes")]
    InvalidProgram { len: usize, max: usize },

    #[error("unknown opcode {opcode:#06X} at {addr:#06X}")]
    UnknownOpcode { opcode: u16, addr: u16 },

    #[error("program counter {pc:#06X} outside program bounds {start:#06X}..{end:#06X}")]
    ProgramCounterOutOfBounds { pc: u16, start: u16, end: u16 },

    #[error("call stack overflow at {pc:#06X}")]
    StackOverflow { pc: u16 },

    #[error("return from empty call stack at {pc:#06X}")]
    StackUnderflow { pc: u16 },

    /// a host collaborator (display, keypad, speaker) failed
    #[error("device error: {0}")]
    Device(#[from] io::Error),
}

impl Chip8Error {
    /// true when the keypad asked the host to stop (Esc, Ctrl-C)
    pub fn is_interrupt(&self) -> bool {
        matches!(self, Chip8Error::Device(e) if e.kind() == io::ErrorKind::Interrupted)
    }
}
