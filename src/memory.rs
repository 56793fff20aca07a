use crate::error::Chip8Error;
use std::ops::Range;

// NB. addresses are u16 as per the chip-8; lengths are usize to stop endless casting

/// how much RAM we have
pub const CHIP8_RAM_SIZE_BYTES: usize = 4096;

/// low 12 bits; everything addressable
pub const CHIP8_ADDRESS_MASK: u16 = 0x0fff;

/// where the program is loaded
pub const CHIP8_PROGRAM_ADDR: u16 = 0x0200;

/// largest program image that fits above the program address
pub const CHIP8_MAX_PROGRAM_BYTES: usize = CHIP8_RAM_SIZE_BYTES - CHIP8_PROGRAM_ADDR as usize;

/// where the built-in font lives; Fx29 relies on this being zero
pub const CHIP8_FONT_ADDR: u16 = 0x000;

/// bytes per font glyph
pub const CHIP8_FONT_GLYPH_BYTES: u16 = 5;

/// Represents memory map, ROM, RAM etc.
pub trait MemoryMap {
    /// write a chunk of bytes into "RAM"
    fn write(&mut self, data: &[u8], addr: u16) {
        self.get_rw_slice(addr, data.len()).copy_from_slice(data);
    }

    /// get a two-byte big-endian word (instructions)
    fn get_word(&self, addr: u16) -> u16 {
        let word = self.get_ro_slice(addr, 2);
        ((word[0] as u16) << 8) | (word[1] as u16)
    }

    /// read one byte; the address wraps around the 4K space
    fn read_byte(&self, addr: u16) -> u8 {
        self.get_ro_slice(addr & CHIP8_ADDRESS_MASK, 1)[0]
    }

    /// write one byte; the address wraps around the 4K space
    fn write_byte(&mut self, addr: u16, value: u8) {
        self.get_rw_slice(addr & CHIP8_ADDRESS_MASK, 1)[0] = value;
    }

    /// get a r/w slice of the underlying memory (heap)
    fn get_rw_slice(&mut self, addr: u16, len: usize) -> &mut [u8];

    /// get a r/o slice of the underlying memory (heap)
    fn get_ro_slice(&self, addr: u16, len: usize) -> &[u8];
}

/// Defines the CHIP-8 memory map used by this interpreter
///   0x0000-0x004f  font, 16 glyphs of 5 bytes
///   0x0050-0x01ff  unused
///   0x0200-0x0fff  program, then whatever the program writes
///
/// `program_end` marks the upper bound of the loaded image; fetches outside
/// `program_addr..program_end` are rejected by the interpreter
pub struct Chip8MemoryMap {
    bytes: Box<[u8]>,
    pub program_addr: u16,
    program_end: u16,
}

impl MemoryMap for Chip8MemoryMap {
    fn get_rw_slice(&mut self, addr: u16, len: usize) -> &mut [u8] {
        let a = addr as usize;
        &mut self.bytes[a..(a + len)]
    }
    fn get_ro_slice(&self, addr: u16, len: usize) -> &[u8] {
        let a = addr as usize;
        &self.bytes[a..(a + len)]
    }
}

impl Chip8MemoryMap {
    /// zeroed memory with the font baked in and nothing loaded
    pub fn new() -> Self {
        let mut mm = Chip8MemoryMap {
            bytes: vec![0u8; CHIP8_RAM_SIZE_BYTES].into_boxed_slice(),
            program_addr: CHIP8_PROGRAM_ADDR,
            program_end: CHIP8_PROGRAM_ADDR,
        };
        mm.reset();
        mm
    }

    /// zero everything, put the font back and forget the loaded program
    pub fn reset(&mut self) {
        self.bytes.fill(0);
        self.write(&CHIP8_FONT, CHIP8_FONT_ADDR);
        self.program_end = self.program_addr;
    }

    /// load a CHIP-8 program at 0x200
    ///
    /// The previous image is wiped first. On error nothing is touched.
    pub fn load_program(&mut self, data: &[u8]) -> Result<(), Chip8Error> {
        if data.is_empty() || data.len() > CHIP8_MAX_PROGRAM_BYTES {
            return Err(Chip8Error::InvalidProgram {
                len: data.len(),
                max: CHIP8_MAX_PROGRAM_BYTES,
            });
        }
        let old_len = (self.program_end - self.program_addr) as usize;
        self.get_rw_slice(self.program_addr, old_len).fill(0);
        self.write(data, self.program_addr);
        self.program_end = self.program_addr + data.len() as u16;
        Ok(())
    }

    /// executable window of the loaded program
    pub fn program_bounds(&self) -> Range<u16> {
        self.program_addr..self.program_end
    }

    pub fn is_loaded(&self) -> bool {
        self.program_end > self.program_addr
    }

    /// whole of RAM, for debuggers and tests
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }
}

impl Default for Chip8MemoryMap {
    fn default() -> Self {
        Self::new()
    }
}

const CHIP8_FONT: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];
