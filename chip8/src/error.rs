use thiserror::Error;

use crate::MAX_ROM_SIZE;

/// Fatal machine faults. Every variant aborts execution; there are no
/// retries.
#[derive(Error, Debug, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    #[error("rom is too large ({len} bytes, the program region holds {} bytes)", MAX_ROM_SIZE)]
    RomTooLarge { len: usize },
    #[error("invalid call stack state: {0}")]
    Stack(#[from] StackError),
    #[error("program counter out of bounds ({pc:#06X})")]
    ProgramCounterOutOfBounds { pc: u16 },
}

#[derive(Error, Debug, PartialEq, Eq, Clone, Copy)]
pub enum StackError {
    #[error("stack is full")]
    Full,
    #[error("stack is empty")]
    Empty,
}
