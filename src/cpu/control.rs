use crate::cpu::{CPU, Flow, Invalid, OperandSize, R, r16};
use crate::memory::MMU;

/// interrupt raised by INTO when the overflow flag is set
pub const OVERFLOW_INTERRUPT: u8 = 0x04;

/// interrupt raised by BOUND when the index is out of range
pub const BOUND_INTERRUPT: u8 = 0x05;

impl CPU {
    fn jump_relative(&mut self, disp: u16) {
        self.regs.ip = self.regs.ip.wrapping_add(disp);
    }

    fn far_jump(&mut self, segment: u16, offset: u16) {
        self.set_r16(R::CS, segment);
        self.regs.ip = offset;
    }

    /// pushes the return address CS:IP, segment first
    fn push_far_return(&mut self, mmu: &mut MMU) {
        let cs = self.get_r16(R::CS);
        let ip = self.regs.ip;
        self.push16(mmu, cs);
        self.push16(mmu, ip);
    }

    /// evaluates the condition encoded in the low 4 bits of a Jcc opcode.
    /// odd codes negate the predicate of the even code before them
    pub fn condition(&self, cc: u8) -> bool {
        let f = self.regs.flags;
        let res = match (cc >> 1) & 7 {
            0 => f.overflow(),
            1 => f.carry(),
            2 => f.zero(),
            3 => f.carry() || f.zero(),
            4 => f.sign(),
            5 => f.parity(),
            6 => f.sign() != f.overflow(),
            _ => f.zero() || f.sign() != f.overflow(),
        };
        if cc & 1 == 0 { res } else { !res }
    }

    /// 70-7F: jcc rel8. the displacement is consumed even if the branch is not taken
    pub(super) fn jcc(&mut self, mmu: &mut MMU, op: u8) -> Result<Flow, Invalid> {
        let disp = self.read_s8(mmu) as i16 as u16;
        if self.condition(op) {
            self.jump_relative(disp);
        }
        Ok(Flow::Continue)
    }

    /// EB: jmp rel8
    pub(super) fn jmp_short(&mut self, mmu: &mut MMU, _op: u8) -> Result<Flow, Invalid> {
        let disp = self.read_s8(mmu) as i16 as u16;
        self.jump_relative(disp);
        Ok(Flow::Continue)
    }

    /// E9: jmp rel16
    pub(super) fn jmp_near(&mut self, mmu: &mut MMU, _op: u8) -> Result<Flow, Invalid> {
        let disp = self.read_u16(mmu);
        self.jump_relative(disp);
        Ok(Flow::Continue)
    }

    /// EA: jmp ptr16:16, the offset is encoded before the segment
    pub(super) fn jmp_far(&mut self, mmu: &mut MMU, _op: u8) -> Result<Flow, Invalid> {
        let offset = self.read_u16(mmu);
        let segment = self.read_u16(mmu);
        self.far_jump(segment, offset);
        Ok(Flow::Continue)
    }

    /// E8: call rel16
    pub(super) fn call_near(&mut self, mmu: &mut MMU, _op: u8) -> Result<Flow, Invalid> {
        let disp = self.read_u16(mmu);
        let ip = self.regs.ip;
        self.push16(mmu, ip);
        self.jump_relative(disp);
        Ok(Flow::Continue)
    }

    /// 9A: call ptr16:16
    pub(super) fn call_far(&mut self, mmu: &mut MMU, _op: u8) -> Result<Flow, Invalid> {
        let offset = self.read_u16(mmu);
        let segment = self.read_u16(mmu);
        self.push_far_return(mmu);
        self.far_jump(segment, offset);
        Ok(Flow::Continue)
    }

    /// C3 ret, C2 ret imm16
    pub(super) fn ret_near(&mut self, mmu: &mut MMU, op: u8) -> Result<Flow, Invalid> {
        let release = if op == 0xC2 { self.read_u16(mmu) } else { 0 };
        self.regs.ip = self.pop16(mmu);
        let sp = self.get_r16(R::SP).wrapping_add(release);
        self.set_r16(R::SP, sp);
        Ok(Flow::Continue)
    }

    /// CB retf, CA retf imm16: pops offset, then segment, then releases imm16 bytes
    pub(super) fn ret_far(&mut self, mmu: &mut MMU, op: u8) -> Result<Flow, Invalid> {
        let release = if op == 0xCA { self.read_u16(mmu) } else { 0 };
        let offset = self.pop16(mmu);
        let segment = self.pop16(mmu);
        self.far_jump(segment, offset);
        let sp = self.get_r16(R::SP).wrapping_add(release);
        self.set_r16(R::SP, sp);
        Ok(Flow::Continue)
    }

    /// CF: iret
    pub(super) fn iret(&mut self, mmu: &mut MMU, _op: u8) -> Result<Flow, Invalid> {
        let offset = self.pop16(mmu);
        let segment = self.pop16(mmu);
        let flags = self.pop16(mmu);
        self.far_jump(segment, offset);
        self.regs.flags.set_u16(flags);
        Ok(Flow::Continue)
    }

    /// E0 loopne, E1 loope, E2 loop: decrement CX, then branch if it is not zero
    /// (and the zero flag matches). E3 jcxz branches if CX is zero, without decrementing
    pub(super) fn loop_op(&mut self, mmu: &mut MMU, op: u8) -> Result<Flow, Invalid> {
        let disp = self.read_s8(mmu) as i16 as u16;
        let taken = if op == 0xE3 {
            self.get_r16(R::CX) == 0
        } else {
            let cx = self.get_r16(R::CX).wrapping_sub(1);
            self.set_r16(R::CX, cx);
            cx != 0 && match op {
                0xE0 => !self.regs.flags.zero(),
                0xE1 => self.regs.flags.zero(),
                _ => true,
            }
        };
        if taken {
            self.jump_relative(disp);
        }
        Ok(Flow::Continue)
    }

    /// CC int3, CD int imm8, CE into
    pub(super) fn int(&mut self, mmu: &mut MMU, op: u8) -> Result<Flow, Invalid> {
        Ok(match op {
            0xCC => Flow::Interrupt(0x03),
            0xCD => Flow::Interrupt(self.read_u8(mmu)),
            _ if self.regs.flags.overflow() => Flow::Interrupt(OVERFLOW_INTERRUPT),
            _ => Flow::Continue,
        })
    }

    /// F4: hlt
    pub(super) fn hlt(&mut self, _mmu: &mut MMU, _op: u8) -> Result<Flow, Invalid> {
        Ok(Flow::Halt)
    }

    /// C8: enter imm16, imm8. creates a stack frame with `level` nested frame pointers
    pub(super) fn enter(&mut self, mmu: &mut MMU, _op: u8) -> Result<Flow, Invalid> {
        let size = self.read_u16(mmu);
        let level = self.read_u8(mmu) & 0x1F;
        let bp = self.get_r16(R::BP);
        self.push16(mmu, bp);
        let frame = self.get_r16(R::SP);
        if level > 0 {
            let ss = self.get_r16(R::SS);
            let mut bp = bp;
            for _ in 1..level {
                bp = bp.wrapping_sub(2);
                let data = mmu.read_u16(ss, bp);
                self.push16(mmu, data);
            }
            self.push16(mmu, frame);
        }
        self.set_r16(R::BP, frame);
        let sp = self.get_r16(R::SP).wrapping_sub(size);
        self.set_r16(R::SP, sp);
        Ok(Flow::Continue)
    }

    /// C9: leave
    pub(super) fn leave(&mut self, mmu: &mut MMU, _op: u8) -> Result<Flow, Invalid> {
        let bp = self.get_r16(R::BP);
        self.set_r16(R::SP, bp);
        let data = self.pop16(mmu);
        self.set_r16(R::BP, data);
        Ok(Flow::Continue)
    }

    /// 62: bound reg16, mem. raises interrupt 5 unless lower <= reg <= upper (signed)
    pub(super) fn bound(&mut self, mmu: &mut MMU, _op: u8) -> Result<Flow, Invalid> {
        let x = self.read_modrm(mmu);
        let (seg, off) = self.mem(mmu, x)?;
        let index = self.get_r16(r16(x.reg)) as i16;
        let lower = mmu.read_u16(seg, off) as i16;
        let upper = mmu.read_u16(seg, off.wrapping_add(2)) as i16;
        if index < lower || index > upper {
            return Ok(Flow::Interrupt(BOUND_INTERRUPT));
        }
        Ok(Flow::Continue)
    }

    /// F5 cmc, F8 clc, F9 stc, FA cli, FB sti, FC cld, FD std
    pub(super) fn flag_op(&mut self, _mmu: &mut MMU, op: u8) -> Result<Flow, Invalid> {
        let flags = &mut self.regs.flags;
        match op {
            0xF5 => {
                let carry = flags.carry();
                flags.set_carry(!carry);
            }
            0xF8 => flags.set_carry(false),
            0xF9 => flags.set_carry(true),
            0xFA => flags.set_interrupt(false),
            0xFB => flags.set_interrupt(true),
            0xFC => flags.set_direction(false),
            _ => flags.set_direction(true),
        }
        Ok(Flow::Continue)
    }

    /// FF: inc, dec, call, call far, jmp, jmp far and push on r/m16
    pub(super) fn group_ff(&mut self, mmu: &mut MMU, _op: u8) -> Result<Flow, Invalid> {
        let x = self.read_modrm(mmu);
        match x.reg {
            0 | 1 => {
                let dst = self.rm(mmu, x, OperandSize::_16bit)?;
                let v = self.read_parameter_value(mmu, &dst);
                let res = if x.reg == 0 {
                    self.inc(v, OperandSize::_16bit)
                } else {
                    self.dec(v, OperandSize::_16bit)
                };
                self.write_parameter(mmu, &dst, res);
            }
            2 | 4 => {
                let src = self.rm(mmu, x, OperandSize::_16bit)?;
                let target = self.read_parameter_value(mmu, &src);
                if x.reg == 2 {
                    let ip = self.regs.ip;
                    self.push16(mmu, ip);
                }
                self.regs.ip = target;
            }
            3 | 5 => {
                let (seg, off) = self.mem(mmu, x)?;
                let offset = mmu.read_u16(seg, off);
                let segment = mmu.read_u16(seg, off.wrapping_add(2));
                if x.reg == 3 {
                    self.push_far_return(mmu);
                }
                self.far_jump(segment, offset);
            }
            6 => {
                let src = self.rm(mmu, x, OperandSize::_16bit)?;
                let data = self.read_parameter_value(mmu, &src);
                self.push16(mmu, data);
            }
            reg => return Err(Invalid::Reg(reg)),
        }
        Ok(Flow::Continue)
    }
}
