//! Core CHIP-8 machine: memory image, register file, call stack and
//! framebuffer, advanced one instruction at a time by [`Machine::step`].
//! Platform concerns (windows, input events, rendering) live behind the
//! [`Presenter`] and [`InputSource`] traits and are implemented by the
//! frontend crates.

mod display;
mod error;
mod memory;
mod opcode;
mod options;
mod run;
mod stack;

use std::fmt::Display as FmtDisplay;

use crate::display::Display;
use crate::memory::Memory;
use crate::stack::CallStack;

pub use crate::display::{FrameBuffer, SCREEN_HEIGHT, SCREEN_WIDTH};
pub use crate::error::{Error, StackError};
pub use crate::memory::MEM_SIZE;
pub use crate::opcode::Instruction;
pub use crate::options::{Color, RunOptions, VideoOptions};
pub use crate::run::{run, InputSource, Presenter, Signal};
pub use crate::stack::STACK_SIZE;

pub const FONT_CHAR_LENGTH: usize = 5;

pub const FONT_DATA: [u8; FONT_CHAR_LENGTH * 0x10] = [
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

pub const FONT_ADDR: usize = 0x000;

pub const ROM_ADDR: usize = 0x200;
pub const MAX_ROM_SIZE: usize = MEM_SIZE - ROM_ADDR;
pub const REGISTER_COUNT: usize = 0x10;
pub const KEY_COUNT: usize = 0x10;

/// Whether the machine is advancing. Transitions arrive from the input
/// adapter; `Quit` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    Paused,
    Quit,
}

pub struct Machine {
    /// Heap of the interpreted program: font table, ROM image, work RAM
    memory: Memory,
    /// A frame buffer containing binary pixel states
    display: Display,
    /// Bounded return-address stack used by subroutine call/return
    stack: CallStack,
    /// 16 8-bit general-purpose variable registers numbered 0 through F hexadecimal
    v: [u8; REGISTER_COUNT],
    /// The program counter points to the current instruction in memory
    pc: u16,
    /// The index register is used to point at locations in memory
    i: u16,
    /// The delay timer is decremented at a rate of 60 Hz until it reaches 0
    dt: u8,
    /// The sound timer is decremented at a rate of 60 Hz until it reaches 0
    st: u8,
    /// A hexadecimal keypad containing 16 key states labelled 0 through F.
    /// Writable from outside; no implemented opcode reads it.
    keypad: [bool; KEY_COUNT],
    run_state: RunState,
}

impl Machine {
    pub fn new() -> Self {
        let mut memory = Memory::new();
        memory.write(FONT_ADDR, &FONT_DATA);

        Machine {
            memory,
            display: Display::new(),
            stack: CallStack::new(),
            v: [0; REGISTER_COUNT],
            pc: ROM_ADDR as u16,
            i: 0,
            dt: 0,
            st: 0,
            keypad: [false; KEY_COUNT],
            run_state: RunState::Running,
        }
    }

    /// Copy a program image into memory at [`ROM_ADDR`] and rewind the
    /// program counter. Rejects an image that does not fit without writing
    /// anything.
    pub fn load_rom(&mut self, rom: &[u8]) -> Result<(), Error> {
        if rom.len() > MAX_ROM_SIZE {
            return Err(Error::RomTooLarge { len: rom.len() });
        }
        self.memory.write(ROM_ADDR, rom);
        self.pc = ROM_ADDR as u16;
        Ok(())
    }

    /// Fetch, decode and execute one instruction.
    pub fn step(&mut self) -> Result<(), Error> {
        let addr = self.pc;
        let opcode = self.fetch()?;
        let instruction = Instruction::decode(opcode);
        log::debug!("{:#05X}: {}", addr, instruction);
        self.execute(instruction)
    }

    /// Read the two-byte big-endian opcode at PC and advance PC past it.
    fn fetch(&mut self) -> Result<u16, Error> {
        let pc = self.pc as usize;
        if pc + 1 >= MEM_SIZE {
            return Err(Error::ProgramCounterOutOfBounds { pc: self.pc });
        }

        let b1 = self.memory.data[pc] as u16;
        let b2 = self.memory.data[pc + 1] as u16;

        self.pc += 2;

        Ok(b1 << 8 | b2)
    }

    fn execute(&mut self, instruction: Instruction) -> Result<(), Error> {
        match instruction {
            Instruction::ClearScreen => self.display.clear(),
            Instruction::Return => self.pc = self.stack.pop()?,
            Instruction::Jump(nnn) => self.pc = nnn,
            Instruction::Call(nnn) => {
                self.stack.push(self.pc)?;
                self.pc = nnn;
            }
            Instruction::SetRegister { x, nn } => self.v[x] = nn,
            Instruction::AddRegister { x, nn } => self.v[x] = self.v[x].wrapping_add(nn),
            Instruction::SetIndex(nnn) => self.i = nnn,
            Instruction::Draw { x, y, n } => self.draw_sprite(x, y, n),
            Instruction::Unknown(opcode) => {
                log::warn!(
                    "unimplemented opcode {:#06X} at {:#05X}",
                    opcode,
                    self.pc.wrapping_sub(2)
                );
            }
        }
        Ok(())
    }

    /// XOR-blit an 8-wide, `n`-high sprite from `memory[I]` at
    /// `(V[x] mod 64, V[y] mod 32)`. VF reports whether any lit pixel was
    /// toggled off. Sprites clip at the right and bottom edges, they do not
    /// wrap.
    fn draw_sprite(&mut self, x: usize, y: usize, n: u8) {
        let x0 = self.v[x] as usize % SCREEN_WIDTH;
        let y0 = self.v[y] as usize % SCREEN_HEIGHT;
        self.v[0xF] = 0;

        for row in 0..n as usize {
            let py = y0 + row;
            if py >= SCREEN_HEIGHT {
                break;
            }

            let sprite_row = self.memory.read(self.i as usize + row);
            for col in 0..8 {
                let px = x0 + col;
                if px >= SCREEN_WIDTH {
                    break;
                }

                if (sprite_row >> (7 - col)) & 0x1 == 1 && self.display.toggle(px, py) {
                    self.v[0xF] = 1;
                }
            }
        }
    }

    pub fn framebuffer(&self) -> &FrameBuffer {
        self.display.fb()
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    pub fn toggle_pause(&mut self) {
        self.run_state = match self.run_state {
            RunState::Running => {
                log::info!("paused");
                RunState::Paused
            }
            RunState::Paused => {
                log::info!("running");
                RunState::Running
            }
            RunState::Quit => RunState::Quit,
        };
    }

    pub fn request_quit(&mut self) {
        self.run_state = RunState::Quit;
    }

    pub fn pc(&self) -> u16 {
        self.pc
    }

    pub fn set_key(&mut self, key: usize, pressed: bool) {
        self.keypad[key] = pressed;
    }

    pub fn keys(&self) -> &[bool; KEY_COUNT] {
        &self.keypad
    }

    pub fn delay_timer(&self) -> u8 {
        self.dt
    }

    pub fn sound_timer(&self) -> u8 {
        self.st
    }
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}

impl FmtDisplay for Machine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "=== Memory ===\n{}", self.memory)
    }
}
