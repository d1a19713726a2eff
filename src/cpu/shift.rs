use crate::cpu::{CPU, Flow, Invalid, OperandSize, R};
use crate::memory::MMU;

#[cfg(test)]
#[path = "./shift_test.rs"]
mod shift_test;

/// the shift/rotate operations, selected by the ModR/M reg field of opcodes 0xC0, 0xC1 and 0xD0-0xD3
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ShiftOp {
    Rol,
    Ror,
    Rcl,
    Rcr,
    Shl,
    Shr,
    Sar,
}

impl ShiftOp {
    pub fn from_u8(v: u8) -> Self {
        match v & 7 {
            0 => ShiftOp::Rol,
            1 => ShiftOp::Ror,
            2 => ShiftOp::Rcl,
            3 => ShiftOp::Rcr,
            // 6 is an undocumented alias of shl (sal)
            4 | 6 => ShiftOp::Shl,
            5 => ShiftOp::Shr,
            _ => ShiftOp::Sar,
        }
    }
}

impl CPU {
    /// Shifts or rotates `val` by `count` bits and updates flags.
    ///
    /// The count is masked to 5 bits; a masked count of 0 leaves the operand
    /// and all flags untouched. Carry receives the last bit shifted out.
    /// Overflow is only defined for a count of exactly 1, for any other
    /// count it is cleared.
    pub fn shift(&mut self, op: ShiftOp, val: u16, count: u8, size: OperandSize) -> u16 {
        let n = u32::from(count & 0x1F);
        if n == 0 {
            return val;
        }
        let bits = size.bits();
        let mask = size.mask();
        let msb = size.sign_bit();
        let val = u32::from(val) & mask;

        let (res, carry) = match op {
            ShiftOp::Rol => {
                let r = n % bits;
                let res = ((val << r) | (val >> (bits - r))) & mask;
                (res, res & 1 != 0)
            }
            ShiftOp::Ror => {
                let r = n % bits;
                let res = ((val >> r) | (val << (bits - r))) & mask;
                (res, res & msb != 0)
            }
            ShiftOp::Rcl => {
                // the carry flag is bit `bits` of a (bits + 1) wide rotation
                let wide = bits + 1;
                let r = n % wide;
                let ext = (self.regs.flags.carry_numeric() << bits) | val;
                let ext = ((ext << r) | (ext >> (wide - r))) & ((1 << wide) - 1);
                (ext & mask, ext & (1 << bits) != 0)
            }
            ShiftOp::Rcr => {
                let wide = bits + 1;
                let r = n % wide;
                let ext = (self.regs.flags.carry_numeric() << bits) | val;
                let ext = ((ext >> r) | (ext << (wide - r))) & ((1 << wide) - 1);
                (ext & mask, ext & (1 << bits) != 0)
            }
            ShiftOp::Shl => {
                if n > bits {
                    (0, false)
                } else {
                    ((val << n) & mask, (val >> (bits - n)) & 1 != 0)
                }
            }
            ShiftOp::Shr => {
                if n > bits {
                    (0, false)
                } else {
                    (val >> n, (val >> (n - 1)) & 1 != 0)
                }
            }
            ShiftOp::Sar => {
                // sign extend to i32 so vacated bits receive the sign
                let signed = ((val << (32 - bits)) as i32) >> (32 - bits);
                (((signed >> n) as u32) & mask, (signed >> (n - 1)) & 1 != 0)
            }
        };

        match op {
            ShiftOp::Shl | ShiftOp::Shr | ShiftOp::Sar => {
                self.logical(res, size);
            }
            _ => {}
        }

        let flags = &mut self.regs.flags;
        flags.set_carry(carry);
        let overflow = count == 1 && match op {
            ShiftOp::Rol | ShiftOp::Rcl | ShiftOp::Shl => carry != (res & msb != 0),
            ShiftOp::Ror | ShiftOp::Rcr | ShiftOp::Shr => ((res ^ (res << 1)) & msb) != 0,
            ShiftOp::Sar => false,
        };
        flags.set_overflow(overflow);
        res as u16
    }

    /// shift group: D0-D3 (by 1 or CL) and C0/C1 (by imm8)
    pub(super) fn shift_group(&mut self, mmu: &mut MMU, op: u8) -> Result<Flow, Invalid> {
        let size = OperandSize::from_opcode(op);
        let x = self.read_modrm(mmu);
        let dst = self.rm(mmu, x, size)?;
        let count = match op {
            0xC0 | 0xC1 => self.read_u8(mmu),
            0xD0 | 0xD1 => 1,
            _ => self.get_r8(R::CL),
        };
        let val = self.read_parameter_value(mmu, &dst);
        let res = self.shift(ShiftOp::from_u8(x.reg), val, count, size);
        self.write_parameter(mmu, &dst, res);
        Ok(Flow::Continue)
    }
}
