use crate::cpu::{CPU, Invalid, R, RegisterState};
use crate::memory::MMU;

#[cfg(test)]
#[path = "./amode_test.rs"]
mod amode_test;

/// a decoded ModR/M byte
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ModRegRm {
    /// "mod" is a reserved word
    pub md: u8,
    pub reg: u8,
    pub rm: u8,
}

impl ModRegRm {
    pub fn from_u8(b: u8) -> Self {
        ModRegRm {
            md: b >> 6,
            reg: (b >> 3) & 7,
            rm: b & 7,
        }
    }
}

/// the base expression selected by the r/m field of a memory operand
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum AMode {
    BXSI,
    BXDI,
    BPSI,
    BPDI,
    SI,
    DI,
    BP,
    BX,
}

static AMODES: [AMode; 8] = [
    AMode::BXSI, AMode::BXDI, AMode::BPSI, AMode::BPDI,
    AMode::SI, AMode::DI, AMode::BP, AMode::BX,
];

impl AMode {
    pub fn from_rm(rm: u8) -> Self {
        AMODES[usize::from(rm & 7)]
    }

    /// addressing relative to BP uses the stack segment
    pub fn default_segment(self) -> R {
        match self {
            AMode::BPSI | AMode::BPDI | AMode::BP => R::SS,
            _ => R::DS,
        }
    }

    pub fn base(self, regs: &RegisterState) -> u16 {
        let get = |r| regs.get_r16(r);
        match self {
            AMode::BXSI => get(R::BX).wrapping_add(get(R::SI)),
            AMode::BXDI => get(R::BX).wrapping_add(get(R::DI)),
            AMode::BPSI => get(R::BP).wrapping_add(get(R::SI)),
            AMode::BPDI => get(R::BP).wrapping_add(get(R::DI)),
            AMode::SI => get(R::SI),
            AMode::DI => get(R::DI),
            AMode::BP => get(R::BP),
            AMode::BX => get(R::BX),
        }
    }
}

impl CPU {
    /// Resolves a memory operand to its effective segment:offset, reading the
    /// 8- or 16-bit displacement that follows the ModR/M byte.
    /// Displacements are sign extended and the offset wraps at 64k.
    /// Mode 3 encodes a register operand and is rejected.
    pub fn effective_address(&mut self, mmu: &MMU, md: u8, rm: u8) -> Result<(u16, u16), Invalid> {
        let (seg, offset) = match (md, rm & 7) {
            (0, 6) => (R::DS, self.read_u16(mmu)),
            (0, rm) => {
                let amode = AMode::from_rm(rm);
                (amode.default_segment(), amode.base(&self.regs))
            }
            (1, rm) => {
                let amode = AMode::from_rm(rm);
                let disp = self.read_s8(mmu) as i16 as u16;
                (amode.default_segment(), amode.base(&self.regs).wrapping_add(disp))
            }
            (2, rm) => {
                let amode = AMode::from_rm(rm);
                let disp = self.read_u16(mmu);
                (amode.default_segment(), amode.base(&self.regs).wrapping_add(disp))
            }
            _ => return Err(Invalid::RegisterOperand),
        };
        Ok((self.segment_or(seg), offset))
    }
}
