use std::fmt::Display as FmtDisplay;

/// One decoded instruction. The raw opcode is split into fixed nibble
/// fields: the top nibble selects the family, `X`/`Y` are register indices,
/// and `N`/`NN`/`NNN` are 4-, 8- and 12-bit immediates. Anything the
/// interpreter does not implement decodes to [`Instruction::Unknown`] so the
/// engine can report it instead of silently skipping it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// 0x00E0
    ClearScreen,
    /// 0x00EE
    Return,
    /// 0x1NNN
    Jump(u16),
    /// 0x2NNN
    Call(u16),
    /// 0x6XNN
    SetRegister { x: usize, nn: u8 },
    /// 0x7XNN
    AddRegister { x: usize, nn: u8 },
    /// 0xANNN
    SetIndex(u16),
    /// 0xDXYN
    Draw { x: usize, y: usize, n: u8 },
    Unknown(u16),
}

impl Instruction {
    pub fn decode(opcode: u16) -> Self {
        let x = ((opcode & 0x0F00) >> 8) as usize;
        let y = ((opcode & 0x00F0) >> 4) as usize;
        let n = (opcode & 0x000F) as u8;
        let nn = (opcode & 0x00FF) as u8;
        let nnn = opcode & 0x0FFF;

        match (opcode & 0xF000) >> 12 {
            0x0 => match nn {
                0xE0 => Self::ClearScreen,
                0xEE => Self::Return,
                _ => Self::Unknown(opcode),
            },
            0x1 => Self::Jump(nnn),
            0x2 => Self::Call(nnn),
            0x6 => Self::SetRegister { x, nn },
            0x7 => Self::AddRegister { x, nn },
            0xA => Self::SetIndex(nnn),
            0xD => Self::Draw { x, y, n },
            _ => Self::Unknown(opcode),
        }
    }
}

impl FmtDisplay for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Self::ClearScreen => write!(f, "cls"),
            Self::Return => write!(f, "ret"),
            Self::Jump(nnn) => write!(f, "jp {:#05X}", nnn),
            Self::Call(nnn) => write!(f, "call {:#05X}", nnn),
            Self::SetRegister { x, nn } => write!(f, "ld v{:X}, {:#04X}", x, nn),
            Self::AddRegister { x, nn } => write!(f, "add v{:X}, {:#04X}", x, nn),
            Self::SetIndex(nnn) => write!(f, "ld i, {:#05X}", nnn),
            Self::Draw { x, y, n } => write!(f, "drw v{:X}, v{:X}, {}", x, y, n),
            Self::Unknown(opcode) => write!(f, "dw {:#06X}", opcode),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Instruction;

    #[test]
    fn test_decode_implemented_subset() {
        assert_eq!(Instruction::decode(0x00E0), Instruction::ClearScreen);
        assert_eq!(Instruction::decode(0x00EE), Instruction::Return);
        assert_eq!(Instruction::decode(0x1228), Instruction::Jump(0x228));
        assert_eq!(Instruction::decode(0x2ABC), Instruction::Call(0xABC));
        assert_eq!(
            Instruction::decode(0x6A42),
            Instruction::SetRegister { x: 0xA, nn: 0x42 }
        );
        assert_eq!(
            Instruction::decode(0x7B01),
            Instruction::AddRegister { x: 0xB, nn: 0x01 }
        );
        assert_eq!(Instruction::decode(0xA200), Instruction::SetIndex(0x200));
        assert_eq!(
            Instruction::decode(0xD015),
            Instruction::Draw { x: 0, y: 1, n: 5 }
        );
    }

    #[test]
    fn test_decode_unknown() {
        // 0x0NNN machine-code call, skip and timer/keypad families
        for opcode in [0x0123, 0x3A10, 0x8AB4, 0xE09E, 0xF00A, 0xFFFF] {
            assert_eq!(Instruction::decode(opcode), Instruction::Unknown(opcode));
        }
    }
}
