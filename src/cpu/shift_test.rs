use pretty_assertions::assert_eq;
use rand::{Rng, SeedableRng};
use rand_xorshift::XorShiftRng;

use crate::cpu::{CPU, OperandSize, ShiftOp, R};
use crate::machine::Machine;

#[test]
fn can_decode_shift_ops() {
    assert_eq!(ShiftOp::Rol, ShiftOp::from_u8(0));
    assert_eq!(ShiftOp::Rcr, ShiftOp::from_u8(3));
    assert_eq!(ShiftOp::Shl, ShiftOp::from_u8(4));
    assert_eq!(ShiftOp::Shl, ShiftOp::from_u8(6));
    assert_eq!(ShiftOp::Sar, ShiftOp::from_u8(7));
}

#[test]
fn rotate_by_operand_width_is_identity() {
    let mut cpu = CPU::default();
    assert_eq!(0x81, cpu.shift(ShiftOp::Rol, 0x81, 8, OperandSize::_8bit));
    assert_eq!(true, cpu.regs.flags.carry());
    assert_eq!(0x81, cpu.shift(ShiftOp::Ror, 0x81, 8, OperandSize::_8bit));
    assert_eq!(true, cpu.regs.flags.carry());
    assert_eq!(0x8001, cpu.shift(ShiftOp::Rol, 0x8001, 16, OperandSize::_16bit));
}

#[test]
fn rotate_left_by_width_carries_original_bit_0() {
    let mut cpu = CPU::default();
    // the last bit rotated out of the top is the original lsb
    assert_eq!(0x80, cpu.shift(ShiftOp::Rol, 0x80, 8, OperandSize::_8bit));
    assert_eq!(false, cpu.regs.flags.carry());
    assert_eq!(0x01, cpu.shift(ShiftOp::Rol, 0x01, 8, OperandSize::_8bit));
    assert_eq!(true, cpu.regs.flags.carry());

    assert_eq!(0x8000, cpu.shift(ShiftOp::Rol, 0x8000, 16, OperandSize::_16bit));
    assert_eq!(false, cpu.regs.flags.carry());
    assert_eq!(0x0001, cpu.shift(ShiftOp::Rol, 0x0001, 16, OperandSize::_16bit));
    assert_eq!(true, cpu.regs.flags.carry());

    // ror by width carries the original msb
    assert_eq!(0x80, cpu.shift(ShiftOp::Ror, 0x80, 8, OperandSize::_8bit));
    assert_eq!(true, cpu.regs.flags.carry());
    assert_eq!(0x01, cpu.shift(ShiftOp::Ror, 0x01, 8, OperandSize::_8bit));
    assert_eq!(false, cpu.regs.flags.carry());
}

#[test]
fn can_rotate_by_one() {
    let mut cpu = CPU::default();
    assert_eq!(0x03, cpu.shift(ShiftOp::Rol, 0x81, 1, OperandSize::_8bit));
    assert_eq!(true, cpu.regs.flags.carry());
    // msb of result (0) differs from carry
    assert_eq!(true, cpu.regs.flags.overflow());

    assert_eq!(0xC0, cpu.shift(ShiftOp::Ror, 0x81, 1, OperandSize::_8bit));
    assert_eq!(true, cpu.regs.flags.carry());
    assert_eq!(false, cpu.regs.flags.overflow());
}

#[test]
fn can_rotate_through_carry() {
    let mut cpu = CPU::default();
    cpu.regs.flags.set_carry(true);
    assert_eq!(0x01, cpu.shift(ShiftOp::Rcl, 0x80, 1, OperandSize::_8bit));
    assert_eq!(true, cpu.regs.flags.carry());

    cpu.regs.flags.set_carry(false);
    assert_eq!(0x40, cpu.shift(ShiftOp::Rcr, 0x81, 1, OperandSize::_8bit));
    assert_eq!(true, cpu.regs.flags.carry());

    // 9 bit rotation by 9 brings everything back
    cpu.regs.flags.set_carry(true);
    assert_eq!(0x5A, cpu.shift(ShiftOp::Rcl, 0x5A, 9, OperandSize::_8bit));
    assert_eq!(true, cpu.regs.flags.carry());
}

#[test]
fn can_shift_left_and_right() {
    let mut cpu = CPU::default();
    assert_eq!(0x02, cpu.shift(ShiftOp::Shl, 0x81, 1, OperandSize::_8bit));
    assert_eq!(true, cpu.regs.flags.carry());
    assert_eq!(true, cpu.regs.flags.overflow());

    assert_eq!(0x40, cpu.shift(ShiftOp::Shr, 0x81, 1, OperandSize::_8bit));
    assert_eq!(true, cpu.regs.flags.carry());
    // msb of the original operand
    assert_eq!(true, cpu.regs.flags.overflow());

    assert_eq!(0x0000, cpu.shift(ShiftOp::Shl, 0xFFFF, 17, OperandSize::_16bit));
    assert_eq!(false, cpu.regs.flags.carry());
    assert_eq!(true, cpu.regs.flags.zero());

    assert_eq!(0x0001, cpu.shift(ShiftOp::Shr, 0x8000, 15, OperandSize::_16bit));
    assert_eq!(false, cpu.regs.flags.carry());
}

#[test]
fn zero_count_changes_nothing() {
    let mut cpu = CPU::default();
    cpu.regs.flags.set_u16(0x0ED7);
    let flags = cpu.regs.flags.u16();
    assert_eq!(0x1234, cpu.shift(ShiftOp::Shl, 0x1234, 0, OperandSize::_16bit));
    assert_eq!(flags, cpu.regs.flags.u16());
    // the count is masked to 5 bits
    assert_eq!(0x1234, cpu.shift(ShiftOp::Rol, 0x1234, 0x20, OperandSize::_16bit));
    assert_eq!(flags, cpu.regs.flags.u16());
}

#[test]
fn overflow_is_cleared_for_counts_above_one() {
    let mut cpu = CPU::default();
    cpu.regs.flags.set_overflow(true);
    assert_eq!(0x04, cpu.shift(ShiftOp::Shl, 0x41, 2, OperandSize::_8bit));
    assert_eq!(false, cpu.regs.flags.overflow());
    assert_eq!(true, cpu.regs.flags.carry());
}

#[test]
fn sar_preserves_sign() {
    let mut rng = XorShiftRng::seed_from_u64(0x186);
    let mut cpu = CPU::default();
    for _ in 0..2_000 {
        let v: u16 = rng.gen();
        let count: u8 = rng.gen_range(1, 32);
        let res = cpu.shift(ShiftOp::Sar, v, count, OperandSize::_16bit);
        assert_eq!(v & 0x8000, res & 0x8000, "sar {:04X}, {}", v, count);
        assert_eq!(((v as i16) >> (count & 0x1F).min(15)) as u16, res);
        assert_eq!(false, cpu.regs.flags.overflow());
    }
    assert_eq!(0xFF, cpu.shift(ShiftOp::Sar, 0x80, 31, OperandSize::_8bit));
    assert_eq!(true, cpu.regs.flags.carry());
}

#[test]
fn can_shift_by_cl_and_imm8() {
    let mut machine = Machine::default();
    let code: Vec<u8> = vec![
        0xB0, 0x81,         // mov al,0x81
        0xD0, 0xC0,         // rol al,1
        0xB1, 0x04,         // mov cl,0x4
        0xD3, 0xE3,         // shl bx,cl
        0xC1, 0xE8, 0x04,   // shr ax,byte 0x4
    ];
    machine.load_com(&code).unwrap();
    machine.cpu.set_r16(R::BX, 0x0123);

    machine.execute_instructions(2);
    assert_eq!(0x03, machine.cpu.get_r8(R::AL));
    assert_eq!(true, machine.cpu.regs.flags.carry());

    machine.execute_instructions(2);
    assert_eq!(0x1230, machine.cpu.get_r16(R::BX));

    machine.execute_instruction();
    assert_eq!(0x0000, machine.cpu.get_r16(R::AX));
    assert_eq!(0x010B, machine.cpu.regs.ip);
}
