use std::path::Path;

use crate::config::Config;
use crate::cpu::{CPU, Flow, Invalid, R, RegisterState};
use crate::dos::DOS;
use crate::error::Error;
use crate::hex::hex_bytes;
use crate::memory::{MMU, SEGMENT_SIZE};
use crate::tools::read_binary;

#[cfg(test)]
#[path = "./machine_test.rs"]
mod machine_test;

/// .com programs are loaded at offset 0x100, after the PSP
pub const COM_OFFSET: u16 = 0x0100;

/// initial stack pointer, the top of the first segment
pub const COM_STACK_POINTER: u16 = 0xFFFF;

/// initial FLAGS: interrupts enabled and the reserved bit 1 set
pub const COM_FLAGS: u16 = 0x0202;

/// what a component wants the machine to do after it handled an interrupt
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Signal {
    Continue,

    /// the program terminated with an exit code
    Exit(u8),
}

pub trait Component {
    /// returns Some(signal) if the interrupt was handled
    fn int(&mut self, _int: u8, _cpu: &mut CPU, _mmu: &mut MMU) -> Option<Signal> {
        None
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Status {
    Running,

    /// the program exited through INT 21h/AH=4Ch (with its code) or HLT (with 0)
    Exited(u8),

    /// execution stopped at an instruction that could not be executed
    Stopped(Invalid),
}

pub struct Machine {
    pub cpu: CPU,
    pub mmu: MMU,
    pub dos: DOS,
    config: Config,
    status: Status,
}

impl Machine {
    pub fn default() -> Self {
        Self::new(Config::default())
    }

    pub fn new(config: Config) -> Self {
        Machine {
            cpu: CPU::default(),
            mmu: MMU::new(config.memory_size, config.addressing),
            dos: DOS::new(config.max_string_length),
            config,
            status: Status::Running,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// reset the CPU registers, memory is kept
    pub fn reset(&mut self) {
        self.cpu.reset();
        self.status = Status::Running;
    }

    pub fn load_com_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), Error> {
        let data = read_binary(path)?;
        self.load_com(&data)
    }

    /// load .com program into 0000:0100 and set IP to program start
    pub fn load_com(&mut self, data: &[u8]) -> Result<(), Error> {
        let limit = std::cmp::min(SEGMENT_SIZE, self.mmu.size() - usize::from(COM_OFFSET));
        if data.len() > limit {
            return Err(Error::ImageTooLarge { size: data.len(), limit });
        }

        self.reset();
        for r in &[R::CS, R::DS, R::ES, R::SS] {
            self.cpu.set_r16(*r, 0);
        }
        self.cpu.regs.ip = COM_OFFSET;
        self.cpu.set_r16(R::SP, COM_STACK_POINTER);
        self.cpu.regs.flags.set_u16(COM_FLAGS);

        if !self.mmu.write_physical(usize::from(COM_OFFSET), data) {
            return Err(Error::ImageTooLarge { size: data.len(), limit });
        }
        info!("loaded {} bytes at {}, {:?} addressing", data.len(),
              self.cpu.get_memory_address(&self.mmu), self.mmu.addressing());
        Ok(())
    }

    /// returns a copy of register values at a given time
    pub fn register_snapshot(&self) -> RegisterState {
        self.cpu.regs.clone()
    }

    /// the exit status for the host process, once the program is no longer running
    pub fn exit_code(&self) -> Option<u8> {
        match self.status {
            Status::Running => None,
            Status::Exited(code) => Some(code),
            Status::Stopped(_) => Some(0),
        }
    }

    /// runs until the program exits, stops, or the configured instruction limit is reached
    pub fn run(&mut self) -> Status {
        match self.config.instruction_limit {
            Some(limit) => self.execute_instructions(limit),
            None => {
                while self.status == Status::Running {
                    self.execute_instruction();
                }
                self.status
            }
        }
    }

    /// executes n instructions of the cpu
    pub fn execute_instructions(&mut self, count: usize) -> Status {
        for _ in 0..count {
            if self.execute_instruction() != Status::Running {
                break;
            }
        }
        self.status
    }

    /// executes one instruction. does nothing once the program exited or stopped
    pub fn execute_instruction(&mut self) -> Status {
        if self.status != Status::Running {
            return self.status;
        }
        if self.config.trace {
            self.trace();
        }

        self.status = match self.cpu.execute_instruction(&mut self.mmu) {
            Ok(Flow::Continue) => Status::Running,
            Ok(Flow::Interrupt(int)) => self.handle_interrupt(int),
            Ok(Flow::Halt) => {
                debug!("[{:04X}:{:04X}] hlt, exiting", self.cpu.get_r16(R::CS), self.cpu.instruction_start);
                Status::Exited(0)
            }
            Err(reason) => {
                self.report_invalid(reason);
                Status::Stopped(reason)
            }
        };
        self.status
    }

    fn handle_interrupt(&mut self, int: u8) -> Status {
        match self.dos.int(int, &mut self.cpu, &mut self.mmu) {
            Some(Signal::Exit(code)) => Status::Exited(code),
            Some(Signal::Continue) => Status::Running,
            None => {
                warn!("[{:04X}:{:04X}] unhandled interrupt {:02X}, AX={:04X}",
                      self.cpu.get_r16(R::CS), self.cpu.instruction_start,
                      int, self.cpu.get_r16(R::AX));
                Status::Running
            }
        }
    }

    fn report_invalid(&self, reason: Invalid) {
        let cs = self.cpu.get_r16(R::CS);
        let ip = self.cpu.instruction_start;
        let length = usize::from(self.cpu.regs.ip.wrapping_sub(ip));
        let hex = hex_bytes(&self.mmu.read(cs, ip, length));
        match reason {
            Invalid::Op => error!("[{:04X}:{:04X}] {} unhandled opcode", cs, ip, hex),
            Invalid::FPUOp => error!("[{:04X}:{:04X}] {} unhandled FPU opcode", cs, ip, hex),
            Invalid::Reg(reg) => error!("[{:04X}:{:04X}] {} unhandled reg value {:02X}", cs, ip, hex, reg),
            Invalid::RegisterOperand => error!("[{:04X}:{:04X}] {} register operand where memory is required", cs, ip, hex),
        }
        error!("{} instructions executed", self.cpu.instruction_count);
    }

    /// logs the next instruction and the register state, similar to the dosbox debugger "LOGS" format
    fn trace(&self) {
        let cpu = &self.cpu;
        let cs = cpu.get_r16(R::CS);
        let ip = cpu.regs.ip;
        let f = cpu.regs.flags;
        trace!("{:04X}:{:04X}  {}  AX:{:04X} BX:{:04X} CX:{:04X} DX:{:04X} SI:{:04X} DI:{:04X} BP:{:04X} SP:{:04X} DS:{:04X} ES:{:04X} SS:{:04X} C{} Z{} S{} O{} I{}",
               cs, ip, hex_bytes(&self.mmu.read(cs, ip, 6)),
               cpu.get_r16(R::AX), cpu.get_r16(R::BX), cpu.get_r16(R::CX), cpu.get_r16(R::DX),
               cpu.get_r16(R::SI), cpu.get_r16(R::DI), cpu.get_r16(R::BP), cpu.get_r16(R::SP),
               cpu.get_r16(R::DS), cpu.get_r16(R::ES), cpu.get_r16(R::SS),
               f.carry() as u8, f.zero() as u8, f.sign() as u8, f.overflow() as u8, f.interrupt() as u8);
    }
}
