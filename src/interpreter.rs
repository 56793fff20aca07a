//! # interpreter
//!
//! Machine state plus the fetch/decode/execute cycle. The interpreter owns
//! registers, memory, stack, timers and the frame buffer; the host lends it a
//! display, a keypad and a buzzer, and drives it with `step` and
//! `tick_timers` at whatever ratio it likes.
//!
//! VF doubles as the flag register. Every opcode that reports a flag writes
//! VF *before* its result, so `8FY4` and friends leave the result in VF, not
//! the flag. OR, AND and XOR report a flag too: always 0.
//!
//! FX0A blocks inside `step` until the keypad reports a key. While it waits
//! the host cannot tick the timers, so they freeze for the duration.
use crate::display::{Display, FrameBuffer, DISPLAY_HEIGHT, DISPLAY_WIDTH};
use crate::error::Chip8Error;
use crate::input::Input;
use crate::memory::{
    self, Chip8MemoryMap, MemoryMap, CHIP8_ADDRESS_MASK, CHIP8_FONT_ADDR, CHIP8_FONT_GLYPH_BYTES,
};
use crate::opcode::Instruction;
use crate::sound::Sound;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::ops::Range;

/// the address programs are loaded at
pub const PROGRAM_START: u16 = memory::CHIP8_PROGRAM_ADDR;

const FLAG: usize = 0xf;
const STACK_DEPTH: usize = 16;

pub struct Chip8Interpreter<'a> {
    memory: Chip8MemoryMap,
    display: &'a mut dyn Display,
    input: &'a mut dyn Input,
    sound: &'a mut dyn Sound,
    rng: Box<dyn RngCore + 'a>,
    v: [u8; 16],
    i: u16,
    program_counter: u16,
    stack: [u16; STACK_DEPTH],
    stack_pointer: usize,
    delay_timer: u8,
    sound_timer: u8,
    frame: FrameBuffer,
}

impl<'a> Chip8Interpreter<'a> {
    pub fn new(
        display: &'a mut dyn Display,
        input: &'a mut dyn Input,
        sound: &'a mut dyn Sound,
    ) -> Chip8Interpreter<'a> {
        let memory = Chip8MemoryMap::new();
        let program_counter = memory.program_addr;
        Chip8Interpreter {
            memory,
            display,
            input,
            sound,
            rng: Box::new(StdRng::from_entropy()),
            v: [0; 16],
            i: 0,
            program_counter,
            stack: [0; STACK_DEPTH],
            stack_pointer: 0,
            delay_timer: 0,
            sound_timer: 0,
            frame: FrameBuffer::new(),
        }
    }

    /// deterministic CXNN
    pub fn with_seed(self, seed: u64) -> Self {
        self.with_rng(Box::new(StdRng::seed_from_u64(seed)))
    }

    /// swap in any random source for CXNN
    pub fn with_rng(mut self, rng: Box<dyn RngCore + 'a>) -> Self {
        self.rng = rng;
        self
    }

    /// zero registers, memory, stack and timers, reload the font, rewind the
    /// program counter and blank the frame buffer
    pub fn reset(&mut self) {
        self.memory.reset();
        self.v = [0; 16];
        self.i = 0;
        self.program_counter = self.memory.program_addr;
        self.stack = [0; STACK_DEPTH];
        self.stack_pointer = 0;
        self.delay_timer = 0;
        self.sound_timer = 0;
        self.frame.clear();
    }

    /// load a chip8 program and point the program counter at it
    ///
    /// registers, timers and stack are left alone
    pub fn load_program(&mut self, program: &[u8]) -> Result<(), Chip8Error> {
        self.memory.load_program(program)?;
        self.program_counter = self.memory.program_addr;
        Ok(())
    }

    /// run `count` instructions; does nothing until a program is loaded
    pub fn step(&mut self, count: usize) -> Result<(), Chip8Error> {
        if !self.memory.is_loaded() {
            return Ok(());
        }
        for _ in 0..count {
            self.cycle()?;
        }
        Ok(())
    }

    /// 60Hz: count both timers down and keep the buzzer in step with the
    /// sound timer
    pub fn tick_timers(&mut self) -> Result<(), Chip8Error> {
        if self.delay_timer > 0 {
            self.delay_timer -= 1;
        }
        if self.sound_timer > 0 {
            self.sound_timer -= 1;
            self.sound.set_tone(self.sound_timer > 0)?;
        }
        Ok(())
    }

    /// fetch, decode and execute one instruction
    fn cycle(&mut self) -> Result<(), Chip8Error> {
        let pc = self.program_counter;
        let bounds = self.memory.program_bounds();
        if pc < bounds.start || pc + 1 >= bounds.end {
            return Err(Chip8Error::ProgramCounterOutOfBounds {
                pc,
                start: bounds.start,
                end: bounds.end,
            });
        }
        let instruction = Instruction::decode(self.memory.get_word(pc), pc)?;
        self.program_counter = pc + 2;
        self.execute(instruction)
    }

    fn execute(&mut self, instruction: Instruction) -> Result<(), Chip8Error> {
        use Instruction::*;
        match instruction {
            ClearScreen => {
                self.frame.clear();
                self.display.clear()?;
                self.display.render(&self.frame)?;
            }
            Return => {
                if self.stack_pointer == 0 {
                    return Err(self.stack_error(false));
                }
                self.stack_pointer -= 1;
                self.program_counter = self.stack[self.stack_pointer];
            }
            Jump(addr) => self.program_counter = addr,
            Call(addr) => {
                if self.stack_pointer == STACK_DEPTH {
                    return Err(self.stack_error(true));
                }
                self.stack[self.stack_pointer] = self.program_counter;
                self.stack_pointer += 1;
                self.program_counter = addr;
            }
            SkipEqImm(x, nn) => self.skip_if(self.v[x as usize] == nn),
            SkipNeImm(x, nn) => self.skip_if(self.v[x as usize] != nn),
            SkipEqReg(x, y) => self.skip_if(self.v[x as usize] == self.v[y as usize]),
            SkipNeReg(x, y) => self.skip_if(self.v[x as usize] != self.v[y as usize]),
            LoadImm(x, nn) => self.v[x as usize] = nn,
            AddImm(x, nn) => self.v[x as usize] = self.v[x as usize].wrapping_add(nn),
            Assign(x, y) => self.v[x as usize] = self.v[y as usize],
            Or(x, y) => {
                let result = self.v[x as usize] | self.v[y as usize];
                self.set_flag_then(x, false, result);
            }
            And(x, y) => {
                let result = self.v[x as usize] & self.v[y as usize];
                self.set_flag_then(x, false, result);
            }
            Xor(x, y) => {
                let result = self.v[x as usize] ^ self.v[y as usize];
                self.set_flag_then(x, false, result);
            }
            AddReg(x, y) => {
                let (sum, carry) = self.v[x as usize].overflowing_add(self.v[y as usize]);
                self.set_flag_then(x, carry, sum);
            }
            SubReg(x, y) => {
                let (vx, vy) = (self.v[x as usize], self.v[y as usize]);
                self.set_flag_then(x, vx >= vy, vx.wrapping_sub(vy));
            }
            ShiftRight(x) => {
                let vx = self.v[x as usize];
                self.set_flag_then(x, vx & 0x01 != 0, vx >> 1);
            }
            SubRegRev(x, y) => {
                let (vx, vy) = (self.v[x as usize], self.v[y as usize]);
                self.set_flag_then(x, vy >= vx, vy.wrapping_sub(vx));
            }
            ShiftLeft(x) => {
                let vx = self.v[x as usize];
                self.set_flag_then(x, vx & 0x80 != 0, vx << 1);
            }
            SetIndex(addr) => self.i = addr,
            JumpOffset(addr) => {
                self.program_counter = (self.v[0] as u16 + addr) & CHIP8_ADDRESS_MASK
            }
            Random(x, nn) => {
                let mut byte = [0u8; 1];
                self.rng.fill_bytes(&mut byte);
                self.v[x as usize] = byte[0] & nn;
            }
            Draw(x, y, n) => self.draw_sprite(x, y, n)?,
            SkipIfKey(x) => {
                let pressed = self.input.is_pressed(self.v[x as usize] & 0xf)?;
                self.skip_if(pressed);
            }
            SkipIfNotKey(x) => {
                let pressed = self.input.is_pressed(self.v[x as usize] & 0xf)?;
                self.skip_if(!pressed);
            }
            WaitKey(x) => {
                let key = loop {
                    let key = self.input.wait_key()?;
                    if key < 16 {
                        break key;
                    }
                };
                self.v[x as usize] = key;
            }
            GetDelay(x) => self.v[x as usize] = self.delay_timer,
            SetDelay(x) => self.delay_timer = self.v[x as usize],
            SetSound(x) => self.sound_timer = self.v[x as usize],
            AddToIndex(x) => self.i = (self.i + self.v[x as usize] as u16) & CHIP8_ADDRESS_MASK,
            FontAddress(x) => {
                self.i = CHIP8_FONT_ADDR + self.v[x as usize] as u16 * CHIP8_FONT_GLYPH_BYTES
            }
            StoreBcd(x) => {
                let vx = self.v[x as usize];
                let digits = [vx / 100, vx / 10 % 10, vx % 10];
                for (offset, digit) in digits.iter().enumerate() {
                    self.memory.write_byte(self.i + offset as u16, *digit);
                }
            }
            StoreRegisters(x) => {
                for r in 0..=x as usize {
                    self.memory.write_byte(self.i + r as u16, self.v[r]);
                }
            }
            LoadRegisters(x) => {
                for r in 0..=x as usize {
                    self.v[r] = self.memory.read_byte(self.i + r as u16);
                }
            }
        }
        Ok(())
    }

    /// VF first, then Vx, so a result aimed at VF wins
    fn set_flag_then(&mut self, x: u8, flag: bool, result: u8) {
        self.v[FLAG] = flag as u8;
        self.v[x as usize] = result;
    }

    fn skip_if(&mut self, condition: bool) {
        if condition {
            self.program_counter += 2;
        }
    }

    /// the PC has already moved past the offending instruction; report its
    /// address and put the PC back so nothing changes
    fn stack_error(&mut self, overflow: bool) -> Chip8Error {
        self.program_counter -= 2;
        let pc = self.program_counter;
        if overflow {
            Chip8Error::StackOverflow { pc }
        } else {
            Chip8Error::StackUnderflow { pc }
        }
    }

    /// XOR an n-row sprite from memory at I onto the frame, wrapping at the
    /// edges; VF ends up 1 if any lit pixel was switched off
    fn draw_sprite(&mut self, x: u8, y: u8, n: u8) -> Result<(), Chip8Error> {
        let origin_x = self.v[x as usize] as usize % DISPLAY_WIDTH;
        let origin_y = self.v[y as usize] as usize % DISPLAY_HEIGHT;
        self.v[FLAG] = 0;
        for row in 0..n as usize {
            let bits = self.memory.read_byte(self.i + row as u16);
            for col in 0..8 {
                if bits & (0x80 >> col) == 0 {
                    continue;
                }
                if self.frame.toggle(origin_x + col, origin_y + row) {
                    self.v[FLAG] = 1;
                }
            }
        }
        self.display.render(&self.frame)?;
        Ok(())
    }

    pub fn pc(&self) -> u16 {
        self.program_counter
    }

    pub fn index(&self) -> u16 {
        self.i
    }

    pub fn registers(&self) -> &[u8; 16] {
        &self.v
    }

    pub fn delay_timer(&self) -> u8 {
        self.delay_timer
    }

    pub fn sound_timer(&self) -> u8 {
        self.sound_timer
    }

    pub fn stack_depth(&self) -> usize {
        self.stack_pointer
    }

    pub fn frame_buffer(&self) -> &FrameBuffer {
        &self.frame
    }

    pub fn program_bounds(&self) -> Range<u16> {
        self.memory.program_bounds()
    }

    pub fn is_loaded(&self) -> bool {
        self.memory.is_loaded()
    }

    pub fn memory(&self) -> &[u8] {
        self.memory.as_slice()
    }

    /// the keypad, so the host can pump it between frames
    pub fn input(&mut self) -> &mut dyn Input {
        &mut *self.input
    }
}
