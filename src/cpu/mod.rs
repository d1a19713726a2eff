// these modules are re-exported as a single module

pub use self::alu::*;
mod alu;

pub use self::amode::*;
mod amode;

pub use self::dispatch::*;
mod dispatch;

pub use self::flag::*;
mod flag;

pub use self::parameter::*;
mod parameter;

pub use self::register::*;
mod register;

pub use self::segment::*;
mod segment;

pub use self::shift::*;
mod shift;

mod arith;
mod control;
mod string;
mod transfer;

use crate::memory::{MemoryAddress, MMU};


/// prints diagnostics of stack usage (push / pop)
const DEBUG_STACK: bool = false;

/// a x86 instruction is at most 15 bytes long on later models, prefixes included
const MAX_PREFIXES: usize = 14;

/// what the engine should do after an instruction completed
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Flow {
    Continue,

    /// software interrupt raised by INT, INT3, INTO, BOUND or a divide error
    Interrupt(u8),

    /// HLT
    Halt,
}

/// reason an instruction could not be executed
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Invalid {
    /// opcode has no handler
    Op,

    /// FPU escape opcode, no coprocessor is emulated
    FPUOp,

    /// the ModR/M reg field selects no operation for this opcode
    Reg(u8),

    /// a register operand was encoded where only memory is valid
    RegisterOperand,
}

pub struct CPU {
    pub instruction_count: usize,

    /// general purpose registers, segment registers, ip and flags
    pub regs: RegisterState,

    /// suppresses interrupt boundaries after a load of SS. set to 2 by the
    /// loading instruction and decremented once per dispatched instruction
    pub interrupt_delay: u8,

    /// offset of the first byte of the instruction being executed
    pub instruction_start: u16,

    segment_prefix: Segment,
    repeat: RepeatMode,
}

impl CPU {
    pub fn default() -> Self {
        CPU {
            instruction_count: 0,
            regs: RegisterState::default(),
            interrupt_delay: 0,
            instruction_start: 0,
            segment_prefix: Segment::Default,
            repeat: RepeatMode::None,
        }
    }

    /// clears general purpose and pointer registers and the interrupt delay.
    /// segment registers, flags and ip are left as configured by the loader
    pub fn reset(&mut self) {
        for r in &mut self.regs.gpr {
            r.val = 0;
        }
        self.interrupt_delay = 0;
    }

    pub fn get_r8(&self, r: R) -> u8 {
        self.regs.get_r8(r)
    }

    pub fn set_r8(&mut self, r: R, val: u8) {
        self.regs.set_r8(r, val);
    }

    pub fn get_r16(&self, r: R) -> u16 {
        self.regs.get_r16(r)
    }

    pub fn set_r16(&mut self, r: R, val: u16) {
        self.regs.set_r16(r, val);
    }

    /// returns the address of CS:IP
    pub fn get_memory_address(&self, mmu: &MMU) -> MemoryAddress {
        mmu.address(self.get_r16(R::CS), self.regs.ip)
    }

    /// fetches, decodes and executes one instruction at CS:IP
    pub fn execute_instruction(&mut self, mmu: &mut MMU) -> Result<Flow, Invalid> {
        self.instruction_start = self.regs.ip;
        self.segment_prefix = Segment::Default;
        self.repeat = RepeatMode::None;

        let mut prefixes = 0;
        let op = loop {
            let b = self.read_u8(mmu);
            match b {
                0x26 => self.segment_prefix = Segment::ES,
                0x2E => self.segment_prefix = Segment::CS,
                0x36 => self.segment_prefix = Segment::SS,
                0x3E => self.segment_prefix = Segment::DS,
                0xF0 => {} // lock
                0xF2 => self.repeat = RepeatMode::Repne,
                0xF3 => self.repeat = RepeatMode::Rep,
                _ => break b,
            }
            prefixes += 1;
            if prefixes > MAX_PREFIXES {
                return Err(Invalid::Op);
            }
        };

        if self.interrupt_delay > 0 {
            self.interrupt_delay -= 1;
        }
        self.instruction_count += 1;

        OPCODES[usize::from(op)](self, mmu, op)
    }

    /// returns the segment register value used for an operand defaulting to `default`,
    /// taking a segment override prefix into account
    pub fn segment_or(&self, default: R) -> u16 {
        self.get_r16(self.segment_prefix.or(default))
    }

    pub fn push16(&mut self, mmu: &mut MMU, data: u16) {
        let sp = self.get_r16(R::SP).wrapping_sub(2);
        self.set_r16(R::SP, sp);
        let ss = self.get_r16(R::SS);
        if DEBUG_STACK {
            debug!("push16 {:04X} to {:04X}:{:04X}", data, ss, sp);
        }
        mmu.write_u16(ss, sp, data);
    }

    pub fn pop16(&mut self, mmu: &mut MMU) -> u16 {
        let ss = self.get_r16(R::SS);
        let sp = self.get_r16(R::SP);
        let data = mmu.read_u16(ss, sp);
        if DEBUG_STACK {
            debug!("pop16 {:04X} from {:04X}:{:04X}", data, ss, sp);
        }
        self.set_r16(R::SP, sp.wrapping_add(2));
        data
    }

    /// reads the next byte of the instruction stream
    fn read_u8(&mut self, mmu: &MMU) -> u8 {
        let cs = self.get_r16(R::CS);
        let b = mmu.read_u8(cs, self.regs.ip);
        self.regs.ip = self.regs.ip.wrapping_add(1);
        b
    }

    fn read_u16(&mut self, mmu: &MMU) -> u16 {
        let lo = self.read_u8(mmu);
        let hi = self.read_u8(mmu);
        u16::from(hi) << 8 | u16::from(lo)
    }

    fn read_s8(&mut self, mmu: &MMU) -> i8 {
        self.read_u8(mmu) as i8
    }

    /// reads an immediate of the given size
    fn read_imm(&mut self, mmu: &MMU, size: OperandSize) -> u16 {
        match size {
            OperandSize::_8bit => u16::from(self.read_u8(mmu)),
            OperandSize::_16bit => self.read_u16(mmu),
        }
    }

    fn read_modrm(&mut self, mmu: &MMU) -> ModRegRm {
        ModRegRm::from_u8(self.read_u8(mmu))
    }

    /// decodes the r/m part of `x` into a register or memory operand of the given size
    fn rm(&mut self, mmu: &MMU, x: ModRegRm, size: OperandSize) -> Result<Parameter, Invalid> {
        if x.md == 3 {
            return Ok(Self::reg(x.rm, size));
        }
        let (seg, off) = self.effective_address(mmu, x.md, x.rm)?;
        Ok(match size {
            OperandSize::_8bit => Parameter::Ptr8(seg, off),
            OperandSize::_16bit => Parameter::Ptr16(seg, off),
        })
    }

    /// the register operand encoded by a ModR/M reg field
    fn reg(v: u8, size: OperandSize) -> Parameter {
        match size {
            OperandSize::_8bit => Parameter::Reg8(r8(v)),
            OperandSize::_16bit => Parameter::Reg16(r16(v)),
        }
    }

    /// decodes a memory-only operand and returns its segment:offset
    fn mem(&mut self, mmu: &MMU, x: ModRegRm) -> Result<(u16, u16), Invalid> {
        self.effective_address(mmu, x.md, x.rm)
    }

    pub fn read_parameter_value(&self, mmu: &MMU, p: &Parameter) -> u16 {
        match *p {
            Parameter::Imm16(imm) => imm,
            Parameter::ImmS8(imm) => imm as i16 as u16,
            Parameter::Reg8(r) => u16::from(self.get_r8(r)),
            Parameter::Reg16(r) | Parameter::SReg16(r) => self.get_r16(r),
            Parameter::Ptr8(seg, off) => u16::from(mmu.read_u8(seg, off)),
            Parameter::Ptr16(seg, off) => mmu.read_u16(seg, off),
        }
    }

    /// writes `data` to the operand, truncated to its size
    pub fn write_parameter(&mut self, mmu: &mut MMU, p: &Parameter, data: u16) {
        match *p {
            Parameter::Reg8(r) => self.set_r8(r, data as u8),
            Parameter::Reg16(r) | Parameter::SReg16(r) => self.set_r16(r, data),
            Parameter::Ptr8(seg, off) => mmu.write_u8(seg, off, data as u8),
            Parameter::Ptr16(seg, off) => mmu.write_u16(seg, off, data),
            Parameter::Imm16(_) | Parameter::ImmS8(_) => {
                unreachable!("write to immediate {:?}", p)
            }
        }
    }
}
