use std::fmt;

use crate::cpu::Flags;

#[cfg(test)]
#[path = "./register_test.rs"]
mod register_test;

/// a 16-bit register whose low and high bytes are also addressable
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Register16 {
    pub val: u16,
}

impl Register16 {
    pub fn set_hi(&mut self, val: u8) {
        self.val = (self.val & 0x00FF) | (u16::from(val) << 8);
    }

    pub fn set_lo(&mut self, val: u8) {
        self.val = (self.val & 0xFF00) | u16::from(val);
    }

    pub fn lo_u8(self) -> u8 {
        self.val as u8
    }

    pub fn hi_u8(self) -> u8 {
        (self.val >> 8) as u8
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum R {
    AL, CL, DL, BL, AH, CH, DH, BH,
    AX, CX, DX, BX, SP, BP, SI, DI,
    ES, CS, SS, DS,
}

/// byte registers in ModR/M reg field order
pub static R8: [R; 8] = [R::AL, R::CL, R::DL, R::BL, R::AH, R::CH, R::DH, R::BH];

/// word registers in ModR/M reg field order
pub static R16: [R; 8] = [R::AX, R::CX, R::DX, R::BX, R::SP, R::BP, R::SI, R::DI];

/// segment registers in ModR/M reg field order
pub static SR: [R; 4] = [R::ES, R::CS, R::SS, R::DS];

/// returns the byte register encoded by the low 3 bits of `v`
pub fn r8(v: u8) -> R {
    R8[usize::from(v & 7)]
}

/// returns the word register encoded by the low 3 bits of `v`
pub fn r16(v: u8) -> R {
    R16[usize::from(v & 7)]
}

/// returns the segment register encoded by the low 2 bits of `v`, the 8086 ignores bit 2
pub fn sr(v: u8) -> R {
    SR[usize::from(v & 3)]
}

impl R {
    /// index into the register file of its class
    fn index(self) -> usize {
        match self {
            R::AL | R::AH | R::AX | R::ES => 0,
            R::CL | R::CH | R::CX | R::CS => 1,
            R::DL | R::DH | R::DX | R::SS => 2,
            R::BL | R::BH | R::BX | R::DS => 3,
            R::SP => 4,
            R::BP => 5,
            R::SI => 6,
            R::DI => 7,
        }
    }

    pub fn is_8bit(self) -> bool {
        match self {
            R::AL | R::CL | R::DL | R::BL | R::AH | R::CH | R::DH | R::BH => true,
            _ => false,
        }
    }

    pub fn is_segment(self) -> bool {
        match self {
            R::ES | R::CS | R::SS | R::DS => true,
            _ => false,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            R::AL => "al", R::CL => "cl", R::DL => "dl", R::BL => "bl",
            R::AH => "ah", R::CH => "ch", R::DH => "dh", R::BH => "bh",
            R::AX => "ax", R::CX => "cx", R::DX => "dx", R::BX => "bx",
            R::SP => "sp", R::BP => "bp", R::SI => "si", R::DI => "di",
            R::ES => "es", R::CS => "cs", R::SS => "ss", R::DS => "ds",
        }
    }
}

impl fmt::Display for R {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// all registers of the cpu
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RegisterState {
    pub ip: u16,

    /// AX, CX, DX, BX, SP, BP, SI, DI
    pub gpr: [Register16; 8],

    /// ES, CS, SS, DS
    pub sreg16: [u16; 4],

    pub flags: Flags,
}

impl RegisterState {
    pub fn get_r8(&self, r: R) -> u8 {
        match r {
            R::AL | R::CL | R::DL | R::BL => self.gpr[r.index()].lo_u8(),
            R::AH | R::CH | R::DH | R::BH => self.gpr[r.index()].hi_u8(),
            _ => unreachable!("{} is not a byte register", r),
        }
    }

    pub fn set_r8(&mut self, r: R, val: u8) {
        match r {
            R::AL | R::CL | R::DL | R::BL => self.gpr[r.index()].set_lo(val),
            R::AH | R::CH | R::DH | R::BH => self.gpr[r.index()].set_hi(val),
            _ => unreachable!("{} is not a byte register", r),
        }
    }

    pub fn get_r16(&self, r: R) -> u16 {
        if r.is_segment() {
            self.sreg16[r.index()]
        } else if r.is_8bit() {
            unreachable!("{} is not a word register", r)
        } else {
            self.gpr[r.index()].val
        }
    }

    pub fn set_r16(&mut self, r: R, val: u16) {
        if r.is_segment() {
            self.sreg16[r.index()] = val;
        } else if r.is_8bit() {
            unreachable!("{} is not a word register", r)
        } else {
            self.gpr[r.index()].val = val;
        }
    }
}
