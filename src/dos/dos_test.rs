use pretty_assertions::assert_eq;

use crate::cpu::{CPU, R};
use crate::dos::{console_bytes, CapturedOutput, DOS};
use crate::machine::{Component, Signal};
use crate::memory::MMU;

fn captured_dos(max_string_length: usize) -> (DOS, CapturedOutput) {
    let out = CapturedOutput::new();
    let mut dos = DOS::new(max_string_length);
    dos.set_output(Box::new(out.clone()));
    (dos, out)
}

#[test]
fn can_write_char() {
    let (mut dos, out) = captured_dos(0x100);
    let mut cpu = CPU::default();
    let mut mmu = MMU::default();
    cpu.set_r8(R::AH, 0x02);
    cpu.set_r8(R::DL, b'A');

    assert_eq!(Some(Signal::Continue), dos.int(0x21, &mut cpu, &mut mmu));
    assert_eq!("A", out.to_string_lossy());
    assert_eq!(b'A', cpu.get_r8(R::AL));
}

#[test]
fn can_write_dollar_terminated_string() {
    let (mut dos, out) = captured_dos(0x100);
    let mut cpu = CPU::default();
    let mut mmu = MMU::default();
    mmu.write(0x0020, 0x0010, b"HI$THERE");
    cpu.set_r16(R::DS, 0x0020);
    cpu.set_r16(R::DX, 0x0010);
    cpu.set_r8(R::AH, 0x09);

    assert_eq!(Some(Signal::Continue), dos.int(0x21, &mut cpu, &mut mmu));
    assert_eq!("HI", out.to_string_lossy());
    assert_eq!(b'$', cpu.get_r8(R::AL));
}

#[test]
fn unterminated_string_is_not_printed() {
    let (mut dos, out) = captured_dos(4);
    let mut cpu = CPU::default();
    let mut mmu = MMU::default();
    mmu.write(0, 0x0200, b"HELLO$");
    cpu.set_r16(R::DX, 0x0200);
    cpu.set_r8(R::AH, 0x09);

    assert_eq!(Some(Signal::Continue), dos.int(0x21, &mut cpu, &mut mmu));
    assert_eq!(Vec::<u8>::new(), out.contents());
}

#[test]
fn can_filter_console_bytes() {
    assert_eq!(b"ab\r\n\tc\x07".to_vec(), console_bytes(b"a\x00b\r\n\t\x1bc\x07\xFF"));
    assert_eq!(b"a\x1b[1D \x1b[1D".to_vec(), console_bytes(b"a\x08"));
}

#[test]
fn can_exit_with_code() {
    let (mut dos, _) = captured_dos(0x100);
    let mut cpu = CPU::default();
    let mut mmu = MMU::default();
    cpu.set_r16(R::AX, 0x4C08);
    assert_eq!(Some(Signal::Exit(8)), dos.int(0x21, &mut cpu, &mut mmu));
}

#[test]
fn unsupported_functions_continue() {
    let (mut dos, out) = captured_dos(0x100);
    let mut cpu = CPU::default();
    let mut mmu = MMU::default();
    cpu.set_r16(R::AX, 0x3000);
    assert_eq!(Some(Signal::Continue), dos.int(0x21, &mut cpu, &mut mmu));
    assert_eq!(0x3000, cpu.get_r16(R::AX));
    assert_eq!(Vec::<u8>::new(), out.contents());
}

#[test]
fn other_interrupts_are_not_handled() {
    let (mut dos, _) = captured_dos(0x100);
    let mut cpu = CPU::default();
    let mut mmu = MMU::default();
    cpu.set_r16(R::AX, 0x4C00);
    assert_eq!(None, dos.int(0x10, &mut cpu, &mut mmu));
    assert_eq!(None, dos.int(0x20, &mut cpu, &mut mmu));
}
