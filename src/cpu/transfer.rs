use crate::cpu::string::FLOATING_BUS;
use crate::cpu::{CPU, Flow, Invalid, OperandSize, Parameter, R, r8, r16, sr};
use crate::cpu::{FLAG_AF, FLAG_CF, FLAG_PF, FLAG_SF, FLAG_ZF};
use crate::memory::MMU;

impl CPU {
    /// stack segment loads inhibit interrupts until after the next instruction
    fn loaded_segment(&mut self, r: R) {
        if r == R::SS {
            self.interrupt_delay = 2;
        }
    }

    /// 88-8B: mov r/m, reg and mov reg, r/m
    pub(super) fn mov_modrm(&mut self, mmu: &mut MMU, op: u8) -> Result<Flow, Invalid> {
        let size = OperandSize::from_opcode(op);
        let x = self.read_modrm(mmu);
        let rm = self.rm(mmu, x, size)?;
        let reg = Self::reg(x.reg, size);
        let (dst, src) = if op & 2 == 0 { (rm, reg) } else { (reg, rm) };
        let v = self.read_parameter_value(mmu, &src);
        self.write_parameter(mmu, &dst, v);
        Ok(Flow::Continue)
    }

    /// 8C: mov r/m16, sreg
    pub(super) fn mov_rm_sreg(&mut self, mmu: &mut MMU, _op: u8) -> Result<Flow, Invalid> {
        let x = self.read_modrm(mmu);
        let dst = self.rm(mmu, x, OperandSize::_16bit)?;
        let v = self.get_r16(sr(x.reg));
        self.write_parameter(mmu, &dst, v);
        Ok(Flow::Continue)
    }

    /// 8E: mov sreg, r/m16
    pub(super) fn mov_sreg_rm(&mut self, mmu: &mut MMU, _op: u8) -> Result<Flow, Invalid> {
        let x = self.read_modrm(mmu);
        let src = self.rm(mmu, x, OperandSize::_16bit)?;
        let v = self.read_parameter_value(mmu, &src);
        let r = sr(x.reg);
        self.write_parameter(mmu, &Parameter::SReg16(r), v);
        self.loaded_segment(r);
        Ok(Flow::Continue)
    }

    /// A0-A3: mov between the accumulator and a direct offset
    pub(super) fn mov_moffs(&mut self, mmu: &mut MMU, op: u8) -> Result<Flow, Invalid> {
        let size = OperandSize::from_opcode(op);
        let offset = self.read_u16(mmu);
        let seg = self.segment_or(R::DS);
        let (mem, acc) = match size {
            OperandSize::_8bit => (Parameter::Ptr8(seg, offset), Parameter::Reg8(R::AL)),
            OperandSize::_16bit => (Parameter::Ptr16(seg, offset), Parameter::Reg16(R::AX)),
        };
        let (dst, src) = if op & 2 == 0 { (acc, mem) } else { (mem, acc) };
        let v = self.read_parameter_value(mmu, &src);
        self.write_parameter(mmu, &dst, v);
        Ok(Flow::Continue)
    }

    /// B0-BF: mov reg, imm
    pub(super) fn mov_reg_imm(&mut self, mmu: &mut MMU, op: u8) -> Result<Flow, Invalid> {
        if op < 0xB8 {
            let imm = self.read_u8(mmu);
            self.set_r8(r8(op), imm);
        } else {
            let imm = self.read_u16(mmu);
            self.set_r16(r16(op), imm);
        }
        Ok(Flow::Continue)
    }

    /// C6/C7: mov r/m, imm
    pub(super) fn mov_rm_imm(&mut self, mmu: &mut MMU, op: u8) -> Result<Flow, Invalid> {
        let size = OperandSize::from_opcode(op);
        let x = self.read_modrm(mmu);
        if x.reg != 0 {
            return Err(Invalid::Reg(x.reg));
        }
        let dst = self.rm(mmu, x, size)?;
        let imm = self.read_imm(mmu, size);
        self.write_parameter(mmu, &dst, imm);
        Ok(Flow::Continue)
    }

    /// 86/87: xchg r/m, reg
    pub(super) fn xchg_modrm(&mut self, mmu: &mut MMU, op: u8) -> Result<Flow, Invalid> {
        let size = OperandSize::from_opcode(op);
        let x = self.read_modrm(mmu);
        let rm = self.rm(mmu, x, size)?;
        let reg = Self::reg(x.reg, size);
        let a = self.read_parameter_value(mmu, &rm);
        let b = self.read_parameter_value(mmu, &reg);
        self.write_parameter(mmu, &rm, b);
        self.write_parameter(mmu, &reg, a);
        Ok(Flow::Continue)
    }

    /// 90-97: xchg ax, reg16. 90 is nop
    pub(super) fn xchg_ax(&mut self, _mmu: &mut MMU, op: u8) -> Result<Flow, Invalid> {
        let r = r16(op);
        let ax = self.get_r16(R::AX);
        let v = self.get_r16(r);
        self.set_r16(R::AX, v);
        self.set_r16(r, ax);
        Ok(Flow::Continue)
    }

    /// 8D: lea reg16, mem
    pub(super) fn lea(&mut self, mmu: &mut MMU, _op: u8) -> Result<Flow, Invalid> {
        let x = self.read_modrm(mmu);
        let (_, offset) = self.mem(mmu, x)?;
        self.set_r16(r16(x.reg), offset);
        Ok(Flow::Continue)
    }

    /// C4 les, C5 lds: loads a far pointer from memory into reg16 and ES or DS
    pub(super) fn load_far_pointer(&mut self, mmu: &mut MMU, op: u8) -> Result<Flow, Invalid> {
        let x = self.read_modrm(mmu);
        let (seg, off) = self.mem(mmu, x)?;
        let offset = mmu.read_u16(seg, off);
        let segment = mmu.read_u16(seg, off.wrapping_add(2));
        self.set_r16(r16(x.reg), offset);
        self.set_r16(if op == 0xC4 { R::ES } else { R::DS }, segment);
        Ok(Flow::Continue)
    }

    /// D7: xlat, AL = [DS:BX + AL]
    pub(super) fn xlat(&mut self, mmu: &mut MMU, _op: u8) -> Result<Flow, Invalid> {
        let seg = self.segment_or(R::DS);
        let offset = self.get_r16(R::BX).wrapping_add(u16::from(self.get_r8(R::AL)));
        let v = mmu.read_u8(seg, offset);
        self.set_r8(R::AL, v);
        Ok(Flow::Continue)
    }

    /// 50-57: push reg16
    pub(super) fn push_reg(&mut self, mmu: &mut MMU, op: u8) -> Result<Flow, Invalid> {
        let r = r16(op);
        let mut data = self.get_r16(r);
        if r == R::SP {
            // 8086 and 80186 push the decremented value
            data = data.wrapping_sub(2);
        }
        self.push16(mmu, data);
        Ok(Flow::Continue)
    }

    /// 58-5F: pop reg16
    pub(super) fn pop_reg(&mut self, mmu: &mut MMU, op: u8) -> Result<Flow, Invalid> {
        let data = self.pop16(mmu);
        self.set_r16(r16(op), data);
        Ok(Flow::Continue)
    }

    /// 06, 0E, 16, 1E: push sreg
    pub(super) fn push_sreg(&mut self, mmu: &mut MMU, op: u8) -> Result<Flow, Invalid> {
        let data = self.get_r16(sr(op >> 3));
        self.push16(mmu, data);
        Ok(Flow::Continue)
    }

    /// 07, 17, 1F: pop sreg
    pub(super) fn pop_sreg(&mut self, mmu: &mut MMU, op: u8) -> Result<Flow, Invalid> {
        let r = sr(op >> 3);
        let data = self.pop16(mmu);
        self.set_r16(r, data);
        self.loaded_segment(r);
        Ok(Flow::Continue)
    }

    /// 8F /0: pop r/m16
    pub(super) fn pop_rm(&mut self, mmu: &mut MMU, _op: u8) -> Result<Flow, Invalid> {
        let x = self.read_modrm(mmu);
        if x.reg != 0 {
            return Err(Invalid::Reg(x.reg));
        }
        let dst = self.rm(mmu, x, OperandSize::_16bit)?;
        let data = self.pop16(mmu);
        self.write_parameter(mmu, &dst, data);
        Ok(Flow::Continue)
    }

    /// 68 push imm16, 6A push sign extended imm8
    pub(super) fn push_imm(&mut self, mmu: &mut MMU, op: u8) -> Result<Flow, Invalid> {
        let data = if op == 0x6A {
            self.read_s8(mmu) as i16 as u16
        } else {
            self.read_u16(mmu)
        };
        self.push16(mmu, data);
        Ok(Flow::Continue)
    }

    /// 60: pusha
    pub(super) fn pusha(&mut self, mmu: &mut MMU, _op: u8) -> Result<Flow, Invalid> {
        let sp = self.get_r16(R::SP);
        for r in &[R::AX, R::CX, R::DX, R::BX] {
            let data = self.get_r16(*r);
            self.push16(mmu, data);
        }
        self.push16(mmu, sp);
        for r in &[R::BP, R::SI, R::DI] {
            let data = self.get_r16(*r);
            self.push16(mmu, data);
        }
        Ok(Flow::Continue)
    }

    /// 61: popa, the stored SP is skipped
    pub(super) fn popa(&mut self, mmu: &mut MMU, _op: u8) -> Result<Flow, Invalid> {
        for r in &[R::DI, R::SI, R::BP, R::SP, R::BX, R::DX, R::CX, R::AX] {
            let data = self.pop16(mmu);
            if *r != R::SP {
                self.set_r16(*r, data);
            }
        }
        Ok(Flow::Continue)
    }

    /// 9C: pushf
    pub(super) fn pushf(&mut self, mmu: &mut MMU, _op: u8) -> Result<Flow, Invalid> {
        let data = self.regs.flags.u16();
        self.push16(mmu, data);
        Ok(Flow::Continue)
    }

    /// 9D: popf
    pub(super) fn popf(&mut self, mmu: &mut MMU, _op: u8) -> Result<Flow, Invalid> {
        let data = self.pop16(mmu);
        self.regs.flags.set_u16(data);
        Ok(Flow::Continue)
    }

    /// 9E: sahf, loads SF, ZF, AF, PF and CF from AH
    pub(super) fn sahf(&mut self, _mmu: &mut MMU, _op: u8) -> Result<Flow, Invalid> {
        let mask = FLAG_SF | FLAG_ZF | FLAG_AF | FLAG_PF | FLAG_CF;
        let ah = u16::from(self.get_r8(R::AH));
        let flags = (self.regs.flags.u16() & !mask) | (ah & mask);
        self.regs.flags.set_u16(flags);
        Ok(Flow::Continue)
    }

    /// 9F: lahf
    pub(super) fn lahf(&mut self, _mmu: &mut MMU, _op: u8) -> Result<Flow, Invalid> {
        let flags = self.regs.flags.u16() as u8;
        self.set_r8(R::AH, flags);
        Ok(Flow::Continue)
    }

    /// 98 cbw, 99 cwd
    pub(super) fn sign_extend(&mut self, _mmu: &mut MMU, op: u8) -> Result<Flow, Invalid> {
        if op == 0x98 {
            self.cbw();
        } else {
            self.cwd();
        }
        Ok(Flow::Continue)
    }

    /// E4-E7, EC-EF: in and out. no devices are attached
    pub(super) fn port_io(&mut self, mmu: &mut MMU, op: u8) -> Result<Flow, Invalid> {
        let size = OperandSize::from_opcode(op);
        let port = if op & 8 == 0 {
            u16::from(self.read_u8(mmu))
        } else {
            self.get_r16(R::DX)
        };
        if op & 2 == 0 {
            debug!("in from port {:04X}, no device", port);
            match size {
                OperandSize::_8bit => self.set_r8(R::AL, FLOATING_BUS),
                OperandSize::_16bit => self.set_r16(R::AX, u16::from_le_bytes([FLOATING_BUS, FLOATING_BUS])),
            }
        } else {
            debug!("out {:04X} to port {:04X}, no device", self.get_r16(R::AX), port);
        }
        Ok(Flow::Continue)
    }

    /// 9B wait
    pub(super) fn nop(&mut self, _mmu: &mut MMU, _op: u8) -> Result<Flow, Invalid> {
        Ok(Flow::Continue)
    }
}
