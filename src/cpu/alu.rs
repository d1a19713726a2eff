use crate::cpu::{CPU, Flow, OperandSize, R};

#[cfg(test)]
#[path = "./alu_test.rs"]
mod alu_test;

/// interrupt raised by a divide error
pub const DIVIDE_ERROR: u8 = 0x00;

/// the eight arithmetic/logic operations, in the order of their opcode rows
/// and of the ModR/M reg field of opcodes 0x80-0x83
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum AluOp {
    Add,
    Or,
    Adc,
    Sbb,
    And,
    Sub,
    Xor,
    Cmp,
}

static ALU_OPS: [AluOp; 8] = [
    AluOp::Add, AluOp::Or, AluOp::Adc, AluOp::Sbb,
    AluOp::And, AluOp::Sub, AluOp::Xor, AluOp::Cmp,
];

impl AluOp {
    pub fn from_u8(v: u8) -> Self {
        ALU_OPS[usize::from(v & 7)]
    }

    /// false for cmp, which only updates flags
    pub fn writes_result(self) -> bool {
        self != AluOp::Cmp
    }
}

impl CPU {
    /// Computes `dst op src` at the given width and updates all affected flags.
    /// Returns the result truncated to the operand size.
    pub fn alu(&mut self, op: AluOp, dst: u16, src: u16, size: OperandSize) -> u16 {
        let dst = u32::from(dst) & size.mask();
        let src = u32::from(src) & size.mask();
        let res = match op {
            AluOp::Add => self.add_with_carry(dst, src, 0, size),
            AluOp::Adc => {
                let carry = self.regs.flags.carry_numeric();
                self.add_with_carry(dst, src, carry, size)
            }
            AluOp::Sub | AluOp::Cmp => self.sub_with_borrow(dst, src, 0, size),
            AluOp::Sbb => {
                let borrow = self.regs.flags.carry_numeric();
                self.sub_with_borrow(dst, src, borrow, size)
            }
            AluOp::Or => self.logical(dst | src, size),
            AluOp::And => self.logical(dst & src, size),
            AluOp::Xor => self.logical(dst ^ src, size),
        };
        (res & size.mask()) as u16
    }

    fn add_with_carry(&mut self, dst: u32, src: u32, carry: u32, size: OperandSize) -> u32 {
        let res = dst + src + carry;
        let flags = &mut self.regs.flags;
        flags.set_carry_from(res, size);
        flags.set_overflow_add(res, dst, src, size);
        flags.set_adjust_from(res, dst, src);
        flags.set_szp(res, size);
        res
    }

    fn sub_with_borrow(&mut self, dst: u32, src: u32, borrow: u32, size: OperandSize) -> u32 {
        // a borrow wraps the u32 and sets bit `width`
        let res = dst.wrapping_sub(src).wrapping_sub(borrow);
        let flags = &mut self.regs.flags;
        flags.set_carry_from(res, size);
        flags.set_overflow_sub(res, dst, src, size);
        flags.set_adjust_from(res, dst, src);
        flags.set_szp(res, size);
        res
    }

    /// or, and, xor, test: carry, adjust and overflow are cleared
    pub fn logical(&mut self, res: u32, size: OperandSize) -> u32 {
        let flags = &mut self.regs.flags;
        flags.set_carry(false);
        flags.set_adjust(false);
        flags.set_overflow(false);
        flags.set_szp(res, size);
        res
    }

    /// add 1, leaving carry unmodified
    pub fn inc(&mut self, v: u16, size: OperandSize) -> u16 {
        let carry = self.regs.flags.carry();
        let res = self.alu(AluOp::Add, v, 1, size);
        self.regs.flags.set_carry(carry);
        res
    }

    /// subtract 1, leaving carry unmodified
    pub fn dec(&mut self, v: u16, size: OperandSize) -> u16 {
        let carry = self.regs.flags.carry();
        let res = self.alu(AluOp::Sub, v, 1, size);
        self.regs.flags.set_carry(carry);
        res
    }

    /// two's complement negation. carry is set unless the operand is 0
    pub fn neg(&mut self, v: u16, size: OperandSize) -> u16 {
        self.alu(AluOp::Sub, 0, v, size)
    }

    /// unsigned multiply of the accumulator. AX = AL * src, or DX:AX = AX * src
    pub fn mul(&mut self, src: u16, size: OperandSize) {
        let upper = match size {
            OperandSize::_8bit => {
                let res = u16::from(self.get_r8(R::AL)) * (src & 0xFF);
                self.set_r16(R::AX, res);
                res >> 8
            }
            OperandSize::_16bit => {
                let res = u32::from(self.get_r16(R::AX)) * u32::from(src);
                self.set_r16(R::AX, res as u16);
                self.set_r16(R::DX, (res >> 16) as u16);
                (res >> 16) as u16
            }
        };
        self.regs.flags.set_carry(upper != 0);
        self.regs.flags.set_overflow(upper != 0);
    }

    /// signed multiply of the accumulator
    pub fn imul(&mut self, src: u16, size: OperandSize) {
        let fits = match size {
            OperandSize::_8bit => {
                let res = i16::from(self.get_r8(R::AL) as i8) * i16::from(src as u8 as i8);
                self.set_r16(R::AX, res as u16);
                res == i16::from(res as i8)
            }
            OperandSize::_16bit => {
                let res = i32::from(self.get_r16(R::AX) as i16) * i32::from(src as i16);
                self.set_r16(R::AX, res as u16);
                self.set_r16(R::DX, (res >> 16) as u16);
                res == i32::from(res as i16)
            }
        };
        self.regs.flags.set_carry(!fits);
        self.regs.flags.set_overflow(!fits);
    }

    /// signed 16 x 16 multiply truncated to 16 bits, as used by the three operand imul
    pub fn imul16_truncated(&mut self, a: u16, b: u16) -> u16 {
        let res = i32::from(a as i16) * i32::from(b as i16);
        let fits = res == i32::from(res as i16);
        self.regs.flags.set_carry(!fits);
        self.regs.flags.set_overflow(!fits);
        res as u16
    }

    /// unsigned divide of the accumulator. raises a divide error on division by
    /// zero or if the quotient does not fit
    pub fn div(&mut self, src: u16, size: OperandSize) -> Flow {
        match size {
            OperandSize::_8bit => {
                let divisor = src & 0xFF;
                if divisor == 0 {
                    return Flow::Interrupt(DIVIDE_ERROR);
                }
                let ax = self.get_r16(R::AX);
                let quotient = ax / divisor;
                if quotient > 0xFF {
                    return Flow::Interrupt(DIVIDE_ERROR);
                }
                self.set_r8(R::AL, quotient as u8);
                self.set_r8(R::AH, (ax % divisor) as u8);
            }
            OperandSize::_16bit => {
                if src == 0 {
                    return Flow::Interrupt(DIVIDE_ERROR);
                }
                let dividend = u32::from(self.get_r16(R::DX)) << 16 | u32::from(self.get_r16(R::AX));
                let quotient = dividend / u32::from(src);
                if quotient > 0xFFFF {
                    return Flow::Interrupt(DIVIDE_ERROR);
                }
                self.set_r16(R::AX, quotient as u16);
                self.set_r16(R::DX, (dividend % u32::from(src)) as u16);
            }
        }
        Flow::Continue
    }

    /// signed divide of the accumulator, the remainder has the sign of the dividend
    pub fn idiv(&mut self, src: u16, size: OperandSize) -> Flow {
        match size {
            OperandSize::_8bit => {
                let divisor = i32::from(src as u8 as i8);
                if divisor == 0 {
                    return Flow::Interrupt(DIVIDE_ERROR);
                }
                let dividend = i32::from(self.get_r16(R::AX) as i16);
                let quotient = dividend / divisor;
                if quotient > i32::from(i8::max_value()) || quotient < i32::from(i8::min_value()) {
                    return Flow::Interrupt(DIVIDE_ERROR);
                }
                self.set_r8(R::AL, quotient as u8);
                self.set_r8(R::AH, (dividend % divisor) as u8);
            }
            OperandSize::_16bit => {
                let divisor = i64::from(src as i16);
                if divisor == 0 {
                    return Flow::Interrupt(DIVIDE_ERROR);
                }
                let dx_ax = u32::from(self.get_r16(R::DX)) << 16 | u32::from(self.get_r16(R::AX));
                let dividend = i64::from(dx_ax as i32);
                let quotient = dividend / divisor;
                if quotient > i64::from(i16::max_value()) || quotient < i64::from(i16::min_value()) {
                    return Flow::Interrupt(DIVIDE_ERROR);
                }
                self.set_r16(R::AX, quotient as u16);
                self.set_r16(R::DX, (dividend % divisor) as u16);
            }
        }
        Flow::Continue
    }

    /// sign extend AL into AX
    pub fn cbw(&mut self) {
        let al = self.get_r8(R::AL) as i8;
        self.set_r16(R::AX, i16::from(al) as u16);
    }

    /// sign extend AX into DX:AX
    pub fn cwd(&mut self) {
        let dx = if self.get_r16(R::AX) & 0x8000 != 0 { 0xFFFF } else { 0 };
        self.set_r16(R::DX, dx);
    }

    /// Decimal Adjust AL after Addition
    pub fn daa(&mut self) {
        let old_al = self.get_r8(R::AL);
        let old_cf = self.regs.flags.carry();
        let mut al = old_al;
        if old_al & 0x0F > 9 || self.regs.flags.adjust() {
            al = al.wrapping_add(6);
            self.regs.flags.set_adjust(true);
        } else {
            self.regs.flags.set_adjust(false);
        }
        let cf = old_al > 0x99 || old_cf;
        if cf {
            al = al.wrapping_add(0x60);
        }
        self.set_r8(R::AL, al);
        self.regs.flags.set_szp(u32::from(al), OperandSize::_8bit);
        self.regs.flags.set_carry(cf);
    }

    /// Decimal Adjust AL after Subtraction
    pub fn das(&mut self) {
        let old_al = self.get_r8(R::AL);
        let old_cf = self.regs.flags.carry();
        let mut al = old_al;
        let mut cf = false;
        if old_al & 0x0F > 9 || self.regs.flags.adjust() {
            al = al.wrapping_sub(6);
            cf = old_cf || old_al < 6;
            self.regs.flags.set_adjust(true);
        } else {
            self.regs.flags.set_adjust(false);
        }
        if old_al > 0x99 || old_cf {
            al = al.wrapping_sub(0x60);
            cf = true;
        }
        self.set_r8(R::AL, al);
        self.regs.flags.set_szp(u32::from(al), OperandSize::_8bit);
        self.regs.flags.set_carry(cf);
    }

    /// ASCII Adjust After Addition
    pub fn aaa(&mut self) {
        let adjust = self.get_r8(R::AL) & 0x0F > 9 || self.regs.flags.adjust();
        if adjust {
            let ax = self.get_r16(R::AX).wrapping_add(0x106);
            self.set_r16(R::AX, ax);
        }
        self.ascii_adjust_done(adjust);
    }

    /// ASCII Adjust AL After Subtraction
    pub fn aas(&mut self) {
        let adjust = self.get_r8(R::AL) & 0x0F > 9 || self.regs.flags.adjust();
        if adjust {
            let ax = self.get_r16(R::AX).wrapping_sub(6);
            self.set_r16(R::AX, ax);
            let ah = self.get_r8(R::AH).wrapping_sub(1);
            self.set_r8(R::AH, ah);
        }
        self.ascii_adjust_done(adjust);
    }

    fn ascii_adjust_done(&mut self, adjust: bool) {
        let al = self.get_r8(R::AL) & 0x0F;
        self.set_r8(R::AL, al);
        self.regs.flags.set_szp(u32::from(al), OperandSize::_8bit);
        self.regs.flags.set_adjust(adjust);
        self.regs.flags.set_carry(adjust);
    }

    /// ASCII Adjust AX After Multiply: AH = AL / base, AL = AL % base
    pub fn aam(&mut self, base: u8) -> Flow {
        if base == 0 {
            return Flow::Interrupt(DIVIDE_ERROR);
        }
        if base != 10 {
            debug!("aam with unusual base {}", base);
        }
        let al = self.get_r8(R::AL);
        self.set_r8(R::AH, al / base);
        self.set_r8(R::AL, al % base);
        self.logical(u32::from(al % base), OperandSize::_8bit);
        Flow::Continue
    }

    /// ASCII Adjust AX Before Division: AL = AH * base + AL, AH = 0
    pub fn aad(&mut self, base: u8) {
        if base != 10 {
            debug!("aad with unusual base {}", base);
        }
        let al = self.get_r8(R::AH).wrapping_mul(base).wrapping_add(self.get_r8(R::AL));
        self.set_r16(R::AX, u16::from(al));
        self.logical(u32::from(al), OperandSize::_8bit);
    }
}
