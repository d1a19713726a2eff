use pretty_assertions::assert_eq;

use crate::cpu::{CPU, Flow, Invalid, R};
use crate::memory::MMU;

/// runs the instruction in `code` from 0000:0100
fn execute(code: &[u8]) -> (CPU, Result<Flow, Invalid>) {
    let mut cpu = CPU::default();
    let mut mmu = MMU::default();
    mmu.write(0, 0x100, code);
    cpu.regs.ip = 0x100;
    let res = cpu.execute_instruction(&mut mmu);
    (cpu, res)
}

#[test]
fn undocumented_opcodes_are_invalid() {
    for op in &[0x0F, 0x63, 0x64, 0x65, 0x66, 0x67, 0xF1] {
        let (_, res) = execute(&[*op, 0x00, 0x00]);
        assert_eq!(Err(Invalid::Op), res, "opcode {:02X}", op);
    }
}

#[test]
fn fpu_escapes_are_invalid() {
    for op in 0xD8..=0xDFu8 {
        let (_, res) = execute(&[op, 0xC0]);
        assert_eq!(Err(Invalid::FPUOp), res, "opcode {:02X}", op);
    }
}

#[test]
fn unused_group_members_are_invalid() {
    let (_, res) = execute(&[0xFF, 0xF8]); // ff /7
    assert_eq!(Err(Invalid::Reg(7)), res);

    let (_, res) = execute(&[0xFE, 0xD0]); // fe /2
    assert_eq!(Err(Invalid::Reg(2)), res);

    let (_, res) = execute(&[0xC6, 0xC8, 0x00]); // c6 /1
    assert_eq!(Err(Invalid::Reg(1)), res);

    let (_, res) = execute(&[0x8F, 0xC8]); // 8f /1
    assert_eq!(Err(Invalid::Reg(1)), res);
}

#[test]
fn memory_only_operands_reject_registers() {
    let (_, res) = execute(&[0x8D, 0xC3]); // lea ax,bx
    assert_eq!(Err(Invalid::RegisterOperand), res);

    let (_, res) = execute(&[0xC4, 0xC3]); // les ax,bx
    assert_eq!(Err(Invalid::RegisterOperand), res);

    let (_, res) = execute(&[0xFF, 0xD8]); // call far bx
    assert_eq!(Err(Invalid::RegisterOperand), res);

    let (_, res) = execute(&[0x62, 0xC3]); // bound ax,bx
    assert_eq!(Err(Invalid::RegisterOperand), res);
}

#[test]
fn prefixes_are_consumed_before_dispatch() {
    let mut code = vec![0x3E; 14];
    code.push(0x90); // nop
    let (cpu, res) = execute(&code);
    assert_eq!(Ok(Flow::Continue), res);
    assert_eq!(0x010F, cpu.regs.ip);
    assert_eq!(1, cpu.instruction_count);

    let code = vec![0xF0; 15];
    let (_, res) = execute(&code);
    assert_eq!(Err(Invalid::Op), res);
}

#[test]
fn can_signal_interrupts() {
    let (cpu, res) = execute(&[0xCD, 0x21]); // int 0x21
    assert_eq!(Ok(Flow::Interrupt(0x21)), res);
    assert_eq!(0x0102, cpu.regs.ip);

    let (_, res) = execute(&[0xCC]); // int3
    assert_eq!(Ok(Flow::Interrupt(3)), res);

    let (_, res) = execute(&[0xF4]); // hlt
    assert_eq!(Ok(Flow::Halt), res);
}

#[test]
fn into_only_interrupts_on_overflow() {
    let mut cpu = CPU::default();
    let mut mmu = MMU::default();
    mmu.write(0, 0x100, &[0xCE, 0xCE]); // into, into
    cpu.regs.ip = 0x100;
    assert_eq!(Ok(Flow::Continue), cpu.execute_instruction(&mut mmu));
    cpu.regs.flags.set_overflow(true);
    assert_eq!(Ok(Flow::Interrupt(4)), cpu.execute_instruction(&mut mmu));
}

#[test]
fn bound_interrupts_when_out_of_range() {
    let mut cpu = CPU::default();
    let mut mmu = MMU::default();
    mmu.write(0, 0x100, &[0x62, 0x07, 0x62, 0x07]); // bound ax,[bx] x2
    mmu.write_u16(0, 0x200, 0xFFFE); // lower -2
    mmu.write_u16(0, 0x202, 0x000A); // upper 10
    cpu.regs.ip = 0x100;
    cpu.set_r16(R::BX, 0x200);

    cpu.set_r16(R::AX, 0xFFFF);
    assert_eq!(Ok(Flow::Continue), cpu.execute_instruction(&mut mmu));
    cpu.set_r16(R::AX, 0x000B);
    assert_eq!(Ok(Flow::Interrupt(5)), cpu.execute_instruction(&mut mmu));
}

#[test]
fn divide_error_is_signaled() {
    let (cpu, res) = execute(&[0xF6, 0xF3]); // div bl
    assert_eq!(Ok(Flow::Interrupt(0)), res);
    assert_eq!(0x0102, cpu.regs.ip);
}
