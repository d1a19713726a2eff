use crate::cpu::OperandSize;

#[cfg(test)]
#[path = "./flag_test.rs"]
mod flag_test;

pub const FLAG_CF: u16 = 0x0000_0001;
pub const FLAG_PF: u16 = 0x0000_0004;
pub const FLAG_AF: u16 = 0x0000_0010;
pub const FLAG_ZF: u16 = 0x0000_0040;
pub const FLAG_SF: u16 = 0x0000_0080;
pub const FLAG_TF: u16 = 0x0000_0100;
pub const FLAG_IF: u16 = 0x0000_0200;
pub const FLAG_DF: u16 = 0x0000_0400;
pub const FLAG_OF: u16 = 0x0000_0800;

/// the FLAGS register, stored as the raw 16-bit word.
/// https://en.wikipedia.org/wiki/FLAGS_register
///
/// ____ O___ SZ_A _P_C
///
/// Only the named bits are interpreted. Reserved bits are kept as written
/// (by POPF or the loader) and have no effect on execution.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Flags {
    val: u16,
}

impl Flags {
    pub fn new_from_u16(val: u16) -> Self {
        Flags { val }
    }

    pub fn u16(self) -> u16 {
        self.val
    }

    pub fn set_u16(&mut self, val: u16) {
        self.val = val;
    }

    fn get(self, mask: u16) -> bool {
        self.val & mask != 0
    }

    fn set(&mut self, mask: u16, v: bool) {
        if v {
            self.val |= mask;
        } else {
            self.val &= !mask;
        }
    }

    pub fn carry(self) -> bool { self.get(FLAG_CF) }
    pub fn parity(self) -> bool { self.get(FLAG_PF) }
    pub fn adjust(self) -> bool { self.get(FLAG_AF) }
    pub fn zero(self) -> bool { self.get(FLAG_ZF) }
    pub fn sign(self) -> bool { self.get(FLAG_SF) }
    pub fn trap(self) -> bool { self.get(FLAG_TF) }
    pub fn interrupt(self) -> bool { self.get(FLAG_IF) }
    pub fn direction(self) -> bool { self.get(FLAG_DF) }
    pub fn overflow(self) -> bool { self.get(FLAG_OF) }

    pub fn set_carry(&mut self, v: bool) { self.set(FLAG_CF, v) }
    pub fn set_parity(&mut self, v: bool) { self.set(FLAG_PF, v) }
    pub fn set_adjust(&mut self, v: bool) { self.set(FLAG_AF, v) }
    pub fn set_zero(&mut self, v: bool) { self.set(FLAG_ZF, v) }
    pub fn set_sign(&mut self, v: bool) { self.set(FLAG_SF, v) }
    pub fn set_trap(&mut self, v: bool) { self.set(FLAG_TF, v) }
    pub fn set_interrupt(&mut self, v: bool) { self.set(FLAG_IF, v) }
    pub fn set_direction(&mut self, v: bool) { self.set(FLAG_DF, v) }
    pub fn set_overflow(&mut self, v: bool) { self.set(FLAG_OF, v) }

    /// carry as 0 or 1, for adc, sbb and the through-carry rotates
    pub fn carry_numeric(self) -> u32 {
        u32::from(self.carry())
    }

    /// Carry: bit `width` of the widened result, the carry or borrow out of the operand.
    pub fn set_carry_from(&mut self, res: u32, size: OperandSize) {
        self.set_carry(res & (1 << size.bits()) != 0);
    }

    /// Set if an arithmetic operation generates a carry or a borrow out
    /// of bit 3 of the result; cleared otherwise. This flag is used in
    /// binary-coded decimal (BCD) arithmetic.
    pub fn set_adjust_from(&mut self, res: u32, v1: u32, v2: u32) {
        self.set_adjust((res ^ v1 ^ v2) & 0x10 != 0);
    }

    /// Both operands have the same sign and the sign of the result differs.
    pub fn set_overflow_add(&mut self, res: u32, v1: u32, v2: u32, size: OperandSize) {
        self.set_overflow((res ^ v1) & (res ^ v2) & size.sign_bit() != 0);
    }

    /// The operands `dst - src` differ in sign and the sign of the result differs from `dst`.
    pub fn set_overflow_sub(&mut self, res: u32, dst: u32, src: u32, size: OperandSize) {
        self.set_overflow((dst ^ src) & (dst ^ res) & size.sign_bit() != 0);
    }

    /// sets sign, zero and parity according to the truncated result
    pub fn set_szp(&mut self, res: u32, size: OperandSize) {
        self.set_sign(res & size.sign_bit() != 0);
        self.set_zero(res & size.mask() == 0);
        // even number of bits set in the low byte
        self.set_parity((res as u8).count_ones() & 1 == 0);
    }
}
