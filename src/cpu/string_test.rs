use pretty_assertions::assert_eq;

use crate::cpu::R;
use crate::machine::Machine;
use super::FLOATING_BUS;

#[test]
fn can_execute_rep_movsb() {
    let mut machine = Machine::default();
    let code: Vec<u8> = vec![
        0xBE, 0x20, 0x01,   // mov si,0x120
        0xBF, 0x00, 0x02,   // mov di,0x200
        0xB9, 0x05, 0x00,   // mov cx,0x5
        0xFC,               // cld
        0xF3, 0xA4,         // rep movsb
    ];
    machine.load_com(&code).unwrap();
    machine.mmu.write(0, 0x120, b"hello");

    machine.execute_instructions(5);
    assert_eq!(b"hello".to_vec(), machine.mmu.read(0, 0x200, 5));
    assert_eq!(0x0000, machine.cpu.get_r16(R::CX));
    assert_eq!(0x0125, machine.cpu.get_r16(R::SI));
    assert_eq!(0x0205, machine.cpu.get_r16(R::DI));
    assert_eq!(0x010C, machine.cpu.regs.ip);
}

#[test]
fn can_execute_stosw_backwards() {
    let mut machine = Machine::default();
    let code: Vec<u8> = vec![
        0xB8, 0x34, 0x12,   // mov ax,0x1234
        0xBF, 0x00, 0x03,   // mov di,0x300
        0xFD,               // std
        0xAB,               // stosw
        0xAB,               // stosw
    ];
    machine.load_com(&code).unwrap();

    machine.execute_instructions(5);
    assert_eq!(0x1234, machine.mmu.read_u16(0, 0x300));
    assert_eq!(0x1234, machine.mmu.read_u16(0, 0x2FE));
    assert_eq!(0x02FC, machine.cpu.get_r16(R::DI));
}

#[test]
fn can_execute_lodsw() {
    let mut machine = Machine::default();
    let code: Vec<u8> = vec![
        0xBE, 0x00, 0x02,   // mov si,0x200
        0xAD,               // lodsw
    ];
    machine.load_com(&code).unwrap();
    machine.mmu.write_u16(0, 0x200, 0xBEEF);

    machine.execute_instructions(2);
    assert_eq!(0xBEEF, machine.cpu.get_r16(R::AX));
    assert_eq!(0x0202, machine.cpu.get_r16(R::SI));
}

#[test]
fn can_execute_repe_cmpsb_until_mismatch() {
    let mut machine = Machine::default();
    let code: Vec<u8> = vec![
        0xBE, 0x00, 0x02,   // mov si,0x200
        0xBF, 0x00, 0x03,   // mov di,0x300
        0xB9, 0x0A, 0x00,   // mov cx,0xa
        0xF3, 0xA6,         // repe cmpsb
    ];
    machine.load_com(&code).unwrap();
    machine.mmu.write(0, 0x200, b"abcx");
    machine.mmu.write(0, 0x300, b"abcy");

    machine.execute_instructions(4);
    assert_eq!(0x0006, machine.cpu.get_r16(R::CX));
    assert_eq!(0x0204, machine.cpu.get_r16(R::SI));
    assert_eq!(0x0304, machine.cpu.get_r16(R::DI));
    assert_eq!(false, machine.cpu.regs.flags.zero());
    // 'x' - 'y' borrows
    assert_eq!(true, machine.cpu.regs.flags.carry());
}

#[test]
fn can_execute_repne_scasb_until_match() {
    let mut machine = Machine::default();
    let code: Vec<u8> = vec![
        0xB0, 0x24,         // mov al,'$'
        0xBF, 0x00, 0x03,   // mov di,0x300
        0xB9, 0x10, 0x00,   // mov cx,0x10
        0xF2, 0xAE,         // repne scasb
    ];
    machine.load_com(&code).unwrap();
    machine.mmu.write(0, 0x300, b"ab$cd");

    machine.execute_instructions(4);
    assert_eq!(0x000D, machine.cpu.get_r16(R::CX));
    assert_eq!(0x0303, machine.cpu.get_r16(R::DI));
    assert_eq!(true, machine.cpu.regs.flags.zero());
}

#[test]
fn rep_with_zero_count_does_nothing() {
    let mut machine = Machine::default();
    let code: Vec<u8> = vec![
        0xB0, 0x55,         // mov al,0x55
        0xBF, 0x00, 0x03,   // mov di,0x300
        0xF3, 0xAA,         // rep stosb
    ];
    machine.load_com(&code).unwrap();

    machine.execute_instructions(3);
    assert_eq!(0x00, machine.mmu.read_u8(0, 0x300));
    assert_eq!(0x0300, machine.cpu.get_r16(R::DI));
    assert_eq!(0x0107, machine.cpu.regs.ip);
}

#[test]
fn can_override_string_source_segment() {
    let mut machine = Machine::default();
    let code: Vec<u8> = vec![
        0xB8, 0x05, 0x00,   // mov ax,0x5
        0x8E, 0xC0,         // mov es,ax
        0xBE, 0x10, 0x00,   // mov si,0x10
        0x26, 0xAC,         // es lodsb
        0x26, 0xA4,         // es movsb
    ];
    machine.load_com(&code).unwrap();
    machine.mmu.write(0x05, 0x10, &[0x42, 0x43]);

    machine.execute_instructions(4);
    assert_eq!(0x42, machine.cpu.get_r8(R::AL));
    assert_eq!(0x0011, machine.cpu.get_r16(R::SI));

    // destination stays at ES:DI
    machine.execute_instruction();
    assert_eq!(0x43, machine.mmu.read_u8(0x05, 0x00));
}

#[test]
fn ins_reads_floating_bus() {
    let mut machine = Machine::default();
    let code: Vec<u8> = vec![
        0xBF, 0x00, 0x03,   // mov di,0x300
        0xBA, 0x60, 0x00,   // mov dx,0x60
        0x6C,               // insb
    ];
    machine.load_com(&code).unwrap();

    machine.execute_instructions(3);
    assert_eq!(FLOATING_BUS, machine.mmu.read_u8(0, 0x300));
    assert_eq!(0x0301, machine.cpu.get_r16(R::DI));
}
