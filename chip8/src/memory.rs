use std::fmt::Display;

/// Capacity of the address space, 4 KiB.
pub const MEM_SIZE: usize = 0x1000;

/// Flat 4 KiB address space: font table at the bottom, program image from
/// [`crate::ROM_ADDR`], everything else zero until the program writes to it.
pub struct Memory {
    pub(crate) data: [u8; MEM_SIZE],
}

impl Memory {
    /// Create an empty instance of the Memory struct
    pub fn new() -> Self {
        Self {
            data: [0; MEM_SIZE],
        }
    }

    /// Copy `data` into memory starting at `addr`. The caller checks that
    /// the region fits; an overrun here is a programming error.
    pub(crate) fn write(&mut self, addr: usize, data: &[u8]) {
        let end = addr + data.len();
        assert!(end <= MEM_SIZE, "write past end of memory");
        self.data[addr..end].copy_from_slice(data);
    }

    /// Read a byte, treating addresses past the end of memory as open bus.
    pub(crate) fn read(&self, addr: usize) -> u8 {
        self.data.get(addr).copied().unwrap_or(0)
    }
}

impl Display for Memory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        const BYTES_PER_LINE: usize = 16;
        for (line, chunk) in self.data.chunks(BYTES_PER_LINE).enumerate() {
            write!(f, "{:04X}: ", line * BYTES_PER_LINE)?;
            for byte in chunk {
                write!(f, "{:02X} ", byte)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Memory, MEM_SIZE};

    #[test]
    fn test_write_and_read() {
        let mut memory = Memory::new();
        memory.write(0x200, &[0xDE, 0xAD, 0xBE, 0xEF]);
        assert_eq!(memory.data[0x200..0x204], [0xDE, 0xAD, 0xBE, 0xEF]);
        assert_eq!(memory.read(0x201), 0xAD);
    }

    #[test]
    fn test_read_past_end_is_open_bus() {
        let memory = Memory::new();
        assert_eq!(memory.read(MEM_SIZE), 0);
        assert_eq!(memory.read(usize::MAX), 0);
    }

    #[test]
    #[should_panic]
    fn test_write_past_end_panics() {
        let mut memory = Memory::new();
        memory.write(MEM_SIZE - 1, &[0x01, 0x02]);
    }
}
