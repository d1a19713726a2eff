use crate::cpu::R;

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum OperandSize {
    _8bit,
    _16bit,
}

impl OperandSize {
    /// operand size of opcodes encoding it in bit 0 (0 = byte, 1 = word)
    pub fn from_opcode(op: u8) -> Self {
        if op & 1 == 0 {
            OperandSize::_8bit
        } else {
            OperandSize::_16bit
        }
    }

    pub fn bits(self) -> u32 {
        match self {
            OperandSize::_8bit => 8,
            OperandSize::_16bit => 16,
        }
    }

    pub fn bytes(self) -> u16 {
        match self {
            OperandSize::_8bit => 1,
            OperandSize::_16bit => 2,
        }
    }

    pub fn mask(self) -> u32 {
        match self {
            OperandSize::_8bit => 0xFF,
            OperandSize::_16bit => 0xFFFF,
        }
    }

    pub fn sign_bit(self) -> u32 {
        match self {
            OperandSize::_8bit => 0x80,
            OperandSize::_16bit => 0x8000,
        }
    }
}

/// a resolved instruction operand
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Parameter {
    Imm16(u16),
    ImmS8(i8),
    Reg8(R),
    Reg16(R),
    SReg16(R),
    /// byte in memory at segment:offset
    Ptr8(u16, u16),
    /// word in memory at segment:offset
    Ptr16(u16, u16),
}
