use crate::cpu::{AluOp, CPU, Flow, Invalid, OperandSize, R, RepeatMode};
use crate::memory::MMU;

#[cfg(test)]
#[path = "./string_test.rs"]
mod string_test;

/// value read from ports without a device attached
pub const FLOATING_BUS: u8 = 0xFF;

#[derive(Copy, Clone, Debug, PartialEq)]
enum StringOp {
    Movs,
    Cmps,
    Stos,
    Lods,
    Scas,
    Ins,
    Outs,
}

impl StringOp {
    /// compare and scan end a REPE/REPNE loop on the zero flag
    fn compares(self) -> bool {
        self == StringOp::Cmps || self == StringOp::Scas
    }
}

impl CPU {
    /// distance the index registers move per element, negative if the direction flag is set
    fn string_step(&self, size: OperandSize) -> u16 {
        if self.regs.flags.direction() {
            0u16.wrapping_sub(size.bytes())
        } else {
            size.bytes()
        }
    }

    fn advance_index(&mut self, r: R, size: OperandSize) {
        let v = self.get_r16(r).wrapping_add(self.string_step(size));
        self.set_r16(r, v);
    }

    /// source element at DS:SI, DS can be overridden
    fn string_source(&self, mmu: &MMU, size: OperandSize) -> u16 {
        let seg = self.segment_or(R::DS);
        let si = self.get_r16(R::SI);
        match size {
            OperandSize::_8bit => u16::from(mmu.read_u8(seg, si)),
            OperandSize::_16bit => mmu.read_u16(seg, si),
        }
    }

    /// destination element at ES:DI, ES can not be overridden
    fn string_destination(&self, mmu: &MMU, size: OperandSize) -> u16 {
        let es = self.get_r16(R::ES);
        let di = self.get_r16(R::DI);
        match size {
            OperandSize::_8bit => u16::from(mmu.read_u8(es, di)),
            OperandSize::_16bit => mmu.read_u16(es, di),
        }
    }

    fn write_string_destination(&self, mmu: &mut MMU, size: OperandSize, data: u16) {
        let es = self.get_r16(R::ES);
        let di = self.get_r16(R::DI);
        match size {
            OperandSize::_8bit => mmu.write_u8(es, di, data as u8),
            OperandSize::_16bit => mmu.write_u16(es, di, data),
        }
    }

    fn accumulator(&self, size: OperandSize) -> u16 {
        match size {
            OperandSize::_8bit => u16::from(self.get_r8(R::AL)),
            OperandSize::_16bit => self.get_r16(R::AX),
        }
    }

    fn set_accumulator(&mut self, size: OperandSize, data: u16) {
        match size {
            OperandSize::_8bit => self.set_r8(R::AL, data as u8),
            OperandSize::_16bit => self.set_r16(R::AX, data),
        }
    }

    /// copies DS:SI to ES:DI
    pub fn movs(&mut self, mmu: &mut MMU, size: OperandSize) {
        let data = self.string_source(mmu, size);
        self.write_string_destination(mmu, size, data);
        self.advance_index(R::SI, size);
        self.advance_index(R::DI, size);
    }

    /// compares DS:SI with ES:DI, flags as for `source - destination`
    pub fn cmps(&mut self, mmu: &mut MMU, size: OperandSize) {
        let src = self.string_source(mmu, size);
        let dst = self.string_destination(mmu, size);
        self.alu(AluOp::Cmp, src, dst, size);
        self.advance_index(R::SI, size);
        self.advance_index(R::DI, size);
    }

    /// stores the accumulator to ES:DI
    pub fn stos(&mut self, mmu: &mut MMU, size: OperandSize) {
        let data = self.accumulator(size);
        self.write_string_destination(mmu, size, data);
        self.advance_index(R::DI, size);
    }

    /// loads DS:SI into the accumulator
    pub fn lods(&mut self, mmu: &mut MMU, size: OperandSize) {
        let data = self.string_source(mmu, size);
        self.set_accumulator(size, data);
        self.advance_index(R::SI, size);
    }

    /// compares the accumulator with ES:DI, flags as for `accumulator - memory`
    pub fn scas(&mut self, mmu: &mut MMU, size: OperandSize) {
        let acc = self.accumulator(size);
        let dst = self.string_destination(mmu, size);
        self.alu(AluOp::Cmp, acc, dst, size);
        self.advance_index(R::DI, size);
    }

    fn string_primitive(&mut self, mmu: &mut MMU, op: StringOp, size: OperandSize) {
        match op {
            StringOp::Movs => self.movs(mmu, size),
            StringOp::Cmps => self.cmps(mmu, size),
            StringOp::Stos => self.stos(mmu, size),
            StringOp::Lods => self.lods(mmu, size),
            StringOp::Scas => self.scas(mmu, size),
            StringOp::Ins => {
                let port = self.get_r16(R::DX);
                debug!("ins from port {:04X}, no device", port);
                let data = u16::from_le_bytes([FLOATING_BUS, FLOATING_BUS]);
                self.write_string_destination(mmu, size, data);
                self.advance_index(R::DI, size);
            }
            StringOp::Outs => {
                let data = self.string_source(mmu, size);
                debug!("outs {:04X} to port {:04X}, no device", data, self.get_r16(R::DX));
                self.advance_index(R::SI, size);
            }
        }
    }

    /// runs a string primitive once, or CX times under a repeat prefix.
    /// compare and scan also stop when the zero flag no longer matches the prefix
    fn repeat_string(&mut self, mmu: &mut MMU, op: StringOp, size: OperandSize) -> Result<Flow, Invalid> {
        if self.repeat == RepeatMode::None {
            self.string_primitive(mmu, op, size);
            return Ok(Flow::Continue);
        }
        while self.get_r16(R::CX) != 0 {
            self.string_primitive(mmu, op, size);
            let cx = self.get_r16(R::CX).wrapping_sub(1);
            self.set_r16(R::CX, cx);
            if op.compares() {
                let zero = self.regs.flags.zero();
                match self.repeat {
                    RepeatMode::Rep if !zero => break,
                    RepeatMode::Repne if zero => break,
                    _ => {}
                }
            }
        }
        Ok(Flow::Continue)
    }

    /// opcodes A4-A7, AA-AF and the 80186 port strings 6C-6F
    pub(super) fn string_op(&mut self, mmu: &mut MMU, op: u8) -> Result<Flow, Invalid> {
        let size = OperandSize::from_opcode(op);
        let string_op = match op {
            0xA4 | 0xA5 => StringOp::Movs,
            0xA6 | 0xA7 => StringOp::Cmps,
            0xAA | 0xAB => StringOp::Stos,
            0xAC | 0xAD => StringOp::Lods,
            0xAE | 0xAF => StringOp::Scas,
            0x6C | 0x6D => StringOp::Ins,
            0x6E | 0x6F => StringOp::Outs,
            _ => return Err(Invalid::Op),
        };
        self.repeat_string(mmu, string_op, size)
    }
}
