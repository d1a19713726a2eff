use crate::cpu::{AluOp, CPU, Flow, Invalid, OperandSize, Parameter, R, r16};
use crate::memory::MMU;

impl CPU {
    fn accumulator_parameter(size: OperandSize) -> Parameter {
        match size {
            OperandSize::_8bit => Parameter::Reg8(R::AL),
            OperandSize::_16bit => Parameter::Reg16(R::AX),
        }
    }

    /// applies `op` to the operands, writing the result to `dst` unless it is a compare
    fn alu_parameters(&mut self, mmu: &mut MMU, op: AluOp, dst: &Parameter, src: &Parameter, size: OperandSize) {
        let a = self.read_parameter_value(mmu, dst);
        let b = self.read_parameter_value(mmu, src);
        let res = self.alu(op, a, b, size);
        if op.writes_result() {
            self.write_parameter(mmu, dst, res);
        }
    }

    /// rows 00-3F, columns 0-3: op r/m, reg and op reg, r/m
    pub(super) fn alu_modrm(&mut self, mmu: &mut MMU, op: u8) -> Result<Flow, Invalid> {
        let alu_op = AluOp::from_u8(op >> 3);
        let size = OperandSize::from_opcode(op);
        let x = self.read_modrm(mmu);
        let rm = self.rm(mmu, x, size)?;
        let reg = Self::reg(x.reg, size);
        if op & 2 == 0 {
            self.alu_parameters(mmu, alu_op, &rm, &reg, size);
        } else {
            self.alu_parameters(mmu, alu_op, &reg, &rm, size);
        }
        Ok(Flow::Continue)
    }

    /// rows 00-3F, columns 4-5: op AL, imm8 and op AX, imm16
    pub(super) fn alu_acc_imm(&mut self, mmu: &mut MMU, op: u8) -> Result<Flow, Invalid> {
        let alu_op = AluOp::from_u8(op >> 3);
        let size = OperandSize::from_opcode(op);
        let imm = self.read_imm(mmu, size);
        let acc = Self::accumulator_parameter(size);
        self.alu_parameters(mmu, alu_op, &acc, &Parameter::Imm16(imm), size);
        Ok(Flow::Continue)
    }

    /// 80-83: op r/m, imm. 82 is an alias of 80, 83 sign extends its imm8
    pub(super) fn alu_group(&mut self, mmu: &mut MMU, op: u8) -> Result<Flow, Invalid> {
        let size = OperandSize::from_opcode(op);
        let x = self.read_modrm(mmu);
        let dst = self.rm(mmu, x, size)?;
        let src = match op {
            0x83 => Parameter::ImmS8(self.read_s8(mmu)),
            _ => Parameter::Imm16(self.read_imm(mmu, size)),
        };
        self.alu_parameters(mmu, AluOp::from_u8(x.reg), &dst, &src, size);
        Ok(Flow::Continue)
    }

    /// 84/85: test r/m, reg
    pub(super) fn test_modrm(&mut self, mmu: &mut MMU, op: u8) -> Result<Flow, Invalid> {
        let size = OperandSize::from_opcode(op);
        let x = self.read_modrm(mmu);
        let rm = self.rm(mmu, x, size)?;
        let a = self.read_parameter_value(mmu, &rm);
        let b = self.read_parameter_value(mmu, &Self::reg(x.reg, size));
        self.logical(u32::from(a & b), size);
        Ok(Flow::Continue)
    }

    /// A8/A9: test AL, imm8 and test AX, imm16
    pub(super) fn test_acc_imm(&mut self, mmu: &mut MMU, op: u8) -> Result<Flow, Invalid> {
        let size = OperandSize::from_opcode(op);
        let imm = self.read_imm(mmu, size);
        let acc = self.read_parameter_value(mmu, &Self::accumulator_parameter(size));
        self.logical(u32::from(acc & imm), size);
        Ok(Flow::Continue)
    }

    /// 40-47 inc reg16, 48-4F dec reg16
    pub(super) fn inc_dec_reg(&mut self, _mmu: &mut MMU, op: u8) -> Result<Flow, Invalid> {
        let r = r16(op);
        let v = self.get_r16(r);
        let res = if op < 0x48 {
            self.inc(v, OperandSize::_16bit)
        } else {
            self.dec(v, OperandSize::_16bit)
        };
        self.set_r16(r, res);
        Ok(Flow::Continue)
    }

    /// FE /0 inc r/m8, FE /1 dec r/m8
    pub(super) fn group_fe(&mut self, mmu: &mut MMU, _op: u8) -> Result<Flow, Invalid> {
        let x = self.read_modrm(mmu);
        if x.reg > 1 {
            return Err(Invalid::Reg(x.reg));
        }
        let dst = self.rm(mmu, x, OperandSize::_8bit)?;
        let v = self.read_parameter_value(mmu, &dst);
        let res = if x.reg == 0 {
            self.inc(v, OperandSize::_8bit)
        } else {
            self.dec(v, OperandSize::_8bit)
        };
        self.write_parameter(mmu, &dst, res);
        Ok(Flow::Continue)
    }

    /// F6/F7: test, not, neg, mul, imul, div and idiv on r/m
    pub(super) fn group_f6(&mut self, mmu: &mut MMU, op: u8) -> Result<Flow, Invalid> {
        let size = OperandSize::from_opcode(op);
        let x = self.read_modrm(mmu);
        let dst = self.rm(mmu, x, size)?;
        let v = self.read_parameter_value(mmu, &dst);
        match x.reg {
            // 1 is an undocumented alias of test
            0 | 1 => {
                let imm = self.read_imm(mmu, size);
                self.logical(u32::from(v & imm), size);
            }
            2 => self.write_parameter(mmu, &dst, !v),
            3 => {
                let res = self.neg(v, size);
                self.write_parameter(mmu, &dst, res);
            }
            4 => self.mul(v, size),
            5 => self.imul(v, size),
            6 => return Ok(self.div(v, size)),
            _ => return Ok(self.idiv(v, size)),
        }
        Ok(Flow::Continue)
    }

    /// 69 imul reg16, r/m16, imm16 and 6B imul reg16, r/m16, imm8
    pub(super) fn imul_imm(&mut self, mmu: &mut MMU, op: u8) -> Result<Flow, Invalid> {
        let x = self.read_modrm(mmu);
        let src = self.rm(mmu, x, OperandSize::_16bit)?;
        let imm = if op == 0x6B {
            self.read_s8(mmu) as i16 as u16
        } else {
            self.read_u16(mmu)
        };
        let v = self.read_parameter_value(mmu, &src);
        let res = self.imul16_truncated(v, imm);
        self.set_r16(r16(x.reg), res);
        Ok(Flow::Continue)
    }

    /// 27 daa, 2F das, 37 aaa, 3F aas
    pub(super) fn decimal_adjust(&mut self, _mmu: &mut MMU, op: u8) -> Result<Flow, Invalid> {
        match op {
            0x27 => self.daa(),
            0x2F => self.das(),
            0x37 => self.aaa(),
            _ => self.aas(),
        }
        Ok(Flow::Continue)
    }

    /// D4 aam imm8, D5 aad imm8
    pub(super) fn ascii_adjust_base(&mut self, mmu: &mut MMU, op: u8) -> Result<Flow, Invalid> {
        let base = self.read_u8(mmu);
        if op == 0xD4 {
            return Ok(self.aam(base));
        }
        self.aad(base);
        Ok(Flow::Continue)
    }

    /// D6: salc (undocumented), AL = CF ? 0xFF : 0
    pub(super) fn salc(&mut self, _mmu: &mut MMU, _op: u8) -> Result<Flow, Invalid> {
        let al = if self.regs.flags.carry() { 0xFF } else { 0x00 };
        self.set_r8(R::AL, al);
        Ok(Flow::Continue)
    }
}
