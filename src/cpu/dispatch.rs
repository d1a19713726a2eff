use crate::cpu::{CPU, Flow, Invalid};
use crate::memory::MMU;

#[cfg(test)]
#[path = "./dispatch_test.rs"]
mod dispatch_test;

/// executes one instruction whose opcode byte has been read. handlers
/// consume their own operand bytes, advancing IP
pub type Handler = fn(&mut CPU, &mut MMU, u8) -> Result<Flow, Invalid>;

/// handlers indexed by opcode byte. prefix bytes are consumed before the lookup
pub static OPCODES: [Handler; 256] = {
    let mut t: [Handler; 256] = [CPU::invalid_op as Handler; 256];

    // add, or, adc, sbb, and, sub, xor, cmp
    let mut row = 0;
    while row < 0x40 {
        t[row] = CPU::alu_modrm;
        t[row + 1] = CPU::alu_modrm;
        t[row + 2] = CPU::alu_modrm;
        t[row + 3] = CPU::alu_modrm;
        t[row + 4] = CPU::alu_acc_imm;
        t[row + 5] = CPU::alu_acc_imm;
        row += 8;
    }
    t[0x06] = CPU::push_sreg;
    t[0x07] = CPU::pop_sreg;
    t[0x0E] = CPU::push_sreg;
    t[0x16] = CPU::push_sreg;
    t[0x17] = CPU::pop_sreg;
    t[0x1E] = CPU::push_sreg;
    t[0x1F] = CPU::pop_sreg;
    t[0x27] = CPU::decimal_adjust;
    t[0x2F] = CPU::decimal_adjust;
    t[0x37] = CPU::decimal_adjust;
    t[0x3F] = CPU::decimal_adjust;

    let mut op = 0x40;
    while op < 0x50 {
        t[op] = CPU::inc_dec_reg;
        t[op + 0x10] = if op < 0x48 { CPU::push_reg } else { CPU::pop_reg };
        op += 1;
    }

    t[0x60] = CPU::pusha;
    t[0x61] = CPU::popa;
    t[0x62] = CPU::bound;
    t[0x68] = CPU::push_imm;
    t[0x69] = CPU::imul_imm;
    t[0x6A] = CPU::push_imm;
    t[0x6B] = CPU::imul_imm;
    t[0x6C] = CPU::string_op;
    t[0x6D] = CPU::string_op;
    t[0x6E] = CPU::string_op;
    t[0x6F] = CPU::string_op;

    let mut op = 0x70;
    while op < 0x80 {
        t[op] = CPU::jcc;
        op += 1;
    }

    t[0x80] = CPU::alu_group;
    t[0x81] = CPU::alu_group;
    t[0x82] = CPU::alu_group;
    t[0x83] = CPU::alu_group;
    t[0x84] = CPU::test_modrm;
    t[0x85] = CPU::test_modrm;
    t[0x86] = CPU::xchg_modrm;
    t[0x87] = CPU::xchg_modrm;
    t[0x88] = CPU::mov_modrm;
    t[0x89] = CPU::mov_modrm;
    t[0x8A] = CPU::mov_modrm;
    t[0x8B] = CPU::mov_modrm;
    t[0x8C] = CPU::mov_rm_sreg;
    t[0x8D] = CPU::lea;
    t[0x8E] = CPU::mov_sreg_rm;
    t[0x8F] = CPU::pop_rm;

    let mut op = 0x90;
    while op < 0x98 {
        t[op] = CPU::xchg_ax;
        op += 1;
    }
    t[0x98] = CPU::sign_extend;
    t[0x99] = CPU::sign_extend;
    t[0x9A] = CPU::call_far;
    t[0x9B] = CPU::nop;
    t[0x9C] = CPU::pushf;
    t[0x9D] = CPU::popf;
    t[0x9E] = CPU::sahf;
    t[0x9F] = CPU::lahf;

    t[0xA0] = CPU::mov_moffs;
    t[0xA1] = CPU::mov_moffs;
    t[0xA2] = CPU::mov_moffs;
    t[0xA3] = CPU::mov_moffs;
    t[0xA4] = CPU::string_op;
    t[0xA5] = CPU::string_op;
    t[0xA6] = CPU::string_op;
    t[0xA7] = CPU::string_op;
    t[0xA8] = CPU::test_acc_imm;
    t[0xA9] = CPU::test_acc_imm;
    t[0xAA] = CPU::string_op;
    t[0xAB] = CPU::string_op;
    t[0xAC] = CPU::string_op;
    t[0xAD] = CPU::string_op;
    t[0xAE] = CPU::string_op;
    t[0xAF] = CPU::string_op;

    let mut op = 0xB0;
    while op < 0xC0 {
        t[op] = CPU::mov_reg_imm;
        op += 1;
    }

    t[0xC0] = CPU::shift_group;
    t[0xC1] = CPU::shift_group;
    t[0xC2] = CPU::ret_near;
    t[0xC3] = CPU::ret_near;
    t[0xC4] = CPU::load_far_pointer;
    t[0xC5] = CPU::load_far_pointer;
    t[0xC6] = CPU::mov_rm_imm;
    t[0xC7] = CPU::mov_rm_imm;
    t[0xC8] = CPU::enter;
    t[0xC9] = CPU::leave;
    t[0xCA] = CPU::ret_far;
    t[0xCB] = CPU::ret_far;
    t[0xCC] = CPU::int;
    t[0xCD] = CPU::int;
    t[0xCE] = CPU::int;
    t[0xCF] = CPU::iret;

    t[0xD0] = CPU::shift_group;
    t[0xD1] = CPU::shift_group;
    t[0xD2] = CPU::shift_group;
    t[0xD3] = CPU::shift_group;
    t[0xD4] = CPU::ascii_adjust_base;
    t[0xD5] = CPU::ascii_adjust_base;
    t[0xD6] = CPU::salc;
    t[0xD7] = CPU::xlat;
    let mut op = 0xD8;
    while op < 0xE0 {
        t[op] = CPU::invalid_fpu_op;
        op += 1;
    }

    t[0xE0] = CPU::loop_op;
    t[0xE1] = CPU::loop_op;
    t[0xE2] = CPU::loop_op;
    t[0xE3] = CPU::loop_op;
    t[0xE4] = CPU::port_io;
    t[0xE5] = CPU::port_io;
    t[0xE6] = CPU::port_io;
    t[0xE7] = CPU::port_io;
    t[0xE8] = CPU::call_near;
    t[0xE9] = CPU::jmp_near;
    t[0xEA] = CPU::jmp_far;
    t[0xEB] = CPU::jmp_short;
    t[0xEC] = CPU::port_io;
    t[0xED] = CPU::port_io;
    t[0xEE] = CPU::port_io;
    t[0xEF] = CPU::port_io;

    t[0xF4] = CPU::hlt;
    t[0xF5] = CPU::flag_op;
    t[0xF6] = CPU::group_f6;
    t[0xF7] = CPU::group_f6;
    t[0xF8] = CPU::flag_op;
    t[0xF9] = CPU::flag_op;
    t[0xFA] = CPU::flag_op;
    t[0xFB] = CPU::flag_op;
    t[0xFC] = CPU::flag_op;
    t[0xFD] = CPU::flag_op;
    t[0xFE] = CPU::group_fe;
    t[0xFF] = CPU::group_ff;
    t
};

impl CPU {
    fn invalid_op(&mut self, _mmu: &mut MMU, _op: u8) -> Result<Flow, Invalid> {
        Err(Invalid::Op)
    }

    fn invalid_fpu_op(&mut self, _mmu: &mut MMU, _op: u8) -> Result<Flow, Invalid> {
        Err(Invalid::FPUOp)
    }
}
