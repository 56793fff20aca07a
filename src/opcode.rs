//! # Opcodes
//!
//! Every instruction is one big-endian 16-bit word. The top nibble picks a
//! family; families 0x0, 0x8, 0xE and 0xF carry sub-opcodes in their low
//! nibble or low byte.
//!
//! Operand fields, when present:
//! - `(_, x, _, _)` register Vx, or the last register of V0..Vx
//! - `(_, _, y, _)` register Vy
//! - `(_, _, _, n)` 4-bit immediate (sprite height)
//! - `(_, _, n, n)` 8-bit immediate
//! - `(_, n, n, n)` 12-bit address

use crate::error::Chip8Error;

/// Field accessors on a raw instruction word
pub trait Opcode {
    /// `[n___]` family
    fn family(&self) -> u8;
    /// `[_x__]`
    fn x(&self) -> u8;
    /// `[__y_]`
    fn y(&self) -> u8;
    /// `[___n]`
    fn n(&self) -> u8;
    /// `[__nn]`
    fn nn(&self) -> u8;
    /// `[_nnn]`
    fn nnn(&self) -> u16;
}

impl Opcode for u16 {
    fn family(&self) -> u8 {
        (self >> 12) as u8
    }

    fn x(&self) -> u8 {
        ((self & 0x0F00) >> 8) as u8
    }

    fn y(&self) -> u8 {
        ((self & 0x00F0) >> 4) as u8
    }

    fn n(&self) -> u8 {
        (self & 0x000F) as u8
    }

    fn nn(&self) -> u8 {
        (self & 0x00FF) as u8
    }

    fn nnn(&self) -> u16 {
        self & 0x0FFF
    }
}

/// A decoded instruction; register selectors are already extracted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// 00E0
    ClearScreen,
    /// 00EE
    Return,
    /// 1NNN
    Jump(u16),
    /// 2NNN
    Call(u16),
    /// 3XNN
    SkipEqImm(u8, u8),
    /// 4XNN
    SkipNeImm(u8, u8),
    /// 5XY0
    SkipEqReg(u8, u8),
    /// 6XNN
    LoadImm(u8, u8),
    /// 7XNN
    AddImm(u8, u8),
    /// 8XY0
    Assign(u8, u8),
    /// 8XY1
    Or(u8, u8),
    /// 8XY2
    And(u8, u8),
    /// 8XY3
    Xor(u8, u8),
    /// 8XY4
    AddReg(u8, u8),
    /// 8XY5
    SubReg(u8, u8),
    /// 8XY6
    ShiftRight(u8),
    /// 8XY7
    SubRegRev(u8, u8),
    /// 8XYE
    ShiftLeft(u8),
    /// 9XY0
    SkipNeReg(u8, u8),
    /// ANNN
    SetIndex(u16),
    /// BNNN
    JumpOffset(u16),
    /// CXNN
    Random(u8, u8),
    /// DXYN
    Draw(u8, u8, u8),
    /// EX9E
    SkipIfKey(u8),
    /// EXA1
    SkipIfNotKey(u8),
    /// FX07
    GetDelay(u8),
    /// FX0A
    WaitKey(u8),
    /// FX15
    SetDelay(u8),
    /// FX18
    SetSound(u8),
    /// FX1E
    AddToIndex(u8),
    /// FX29
    FontAddress(u8),
    /// FX33
    StoreBcd(u8),
    /// FX55
    StoreRegisters(u8),
    /// FX65
    LoadRegisters(u8),
}

impl Instruction {
    /// Decode a word fetched from `addr`. `addr` is only used for the error.
    pub fn decode(op: u16, addr: u16) -> Result<Instruction, Chip8Error> {
        use Instruction::*;
        let (x, y) = (op.x(), op.y());
        let instruction = match (op.family(), op.n()) {
            (0x0, _) => match op.nnn() {
                0x0E0 => ClearScreen,
                0x0EE => Return,
                _ => return Err(Chip8Error::UnknownOpcode { opcode: op, addr }),
            },
            (0x1, _) => Jump(op.nnn()),
            (0x2, _) => Call(op.nnn()),
            (0x3, _) => SkipEqImm(x, op.nn()),
            (0x4, _) => SkipNeImm(x, op.nn()),
            (0x5, 0x0) => SkipEqReg(x, y),
            (0x6, _) => LoadImm(x, op.nn()),
            (0x7, _) => AddImm(x, op.nn()),
            (0x8, 0x0) => Assign(x, y),
            (0x8, 0x1) => Or(x, y),
            (0x8, 0x2) => And(x, y),
            (0x8, 0x3) => Xor(x, y),
            (0x8, 0x4) => AddReg(x, y),
            (0x8, 0x5) => SubReg(x, y),
            (0x8, 0x6) => ShiftRight(x),
            (0x8, 0x7) => SubRegRev(x, y),
            (0x8, 0xE) => ShiftLeft(x),
            (0x9, 0x0) => SkipNeReg(x, y),
            (0xA, _) => SetIndex(op.nnn()),
            (0xB, _) => JumpOffset(op.nnn()),
            (0xC, _) => Random(x, op.nn()),
            (0xD, _) => Draw(x, y, op.n()),
            (0xE, _) => match op.nn() {
                0x9E => SkipIfKey(x),
                0xA1 => SkipIfNotKey(x),
                _ => return Err(Chip8Error::UnknownOpcode { opcode: op, addr }),
            },
            (0xF, _) => match op.nn() {
                0x07 => GetDelay(x),
                0x0A => WaitKey(x),
                0x15 => SetDelay(x),
                0x18 => SetSound(x),
                0x1E => AddToIndex(x),
                0x29 => FontAddress(x),
                0x33 => StoreBcd(x),
                0x55 => StoreRegisters(x),
                0x65 => LoadRegisters(x),
                _ => return Err(Chip8Error::UnknownOpcode { opcode: op, addr }),
            },
            _ => return Err(Chip8Error::UnknownOpcode { opcode: op, addr }),
        };
        Ok(instruction)
    }
}
