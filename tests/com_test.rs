use std::io::Write;

use pretty_assertions::assert_eq;
use tempfile::NamedTempFile;

use realbox::config::Config;
use realbox::dos::CapturedOutput;
use realbox::machine::{Machine, Status};

fn run_com(code: &[u8]) -> (Machine, String) {
    let out = CapturedOutput::new();
    let mut machine = Machine::default();
    machine.dos.set_output(Box::new(out.clone()));
    machine.load_com(code).unwrap();
    machine.run();
    (machine, out.to_string_lossy())
}

#[test]
fn can_run_com_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(&[
        0xB8, 0x2A, 0x4C,   // mov ax,0x4c2a
        0xCD, 0x21,         // int 0x21
    ]).unwrap();

    let mut machine = Machine::default();
    machine.load_com_file(file.path()).unwrap();
    assert_eq!(Status::Exited(42), machine.run());
    assert_eq!(Some(42), machine.exit_code());
}

#[test]
fn missing_file_is_an_error() {
    let mut machine = Machine::default();
    assert!(machine.load_com_file("/nonexistent/program.com").is_err());
}

#[test]
fn can_run_string_upcase() {
    // copies "hello, dos$" to 0x180, upper casing letters, and prints it
    let code: Vec<u8> = vec![
        0xBE, 0x1D, 0x01,   // mov si,0x11d
        0xBF, 0x80, 0x01,   // mov di,0x180
        0xFC,               // cld
        0xAC,               // lodsb
        0x3C, 0x61,         // cmp al,'a'
        0x72, 0x02,         // jc 0x10e
        0x24, 0xDF,         // and al,0xdf
        0xAA,               // stosb
        0x3C, 0x24,         // cmp al,'$'
        0x75, 0xF4,         // jnz 0x107
        0xBA, 0x80, 0x01,   // mov dx,0x180
        0xB4, 0x09,         // mov ah,0x9
        0xCD, 0x21,         // int 0x21
        0xF4,               // hlt
        0x90,               // nop
        0x90,               // nop
        b'h', b'e', b'l', b'l', b'o', b',', b' ', b'd', b'o', b's', b'$',
    ];
    let (machine, out) = run_com(&code);
    assert_eq!(Status::Exited(0), machine.status());
    assert_eq!("HELLO, DOS", out);
}

#[test]
fn can_run_recursive_factorial() {
    // computes 5! with a recursive near call, exits with the low byte
    let code: Vec<u8> = vec![
        0xB8, 0x05, 0x00,   // mov ax,0x5
        0xE8, 0x04, 0x00,   // call 0x10a
        0xB4, 0x4C,         // mov ah,0x4c
        0xCD, 0x21,         // int 0x21
        0x3D, 0x01, 0x00,   // cmp ax,0x1   (0x10a)
        0x76, 0x08,         // jna 0x117
        0x50,               // push ax
        0x48,               // dec ax
        0xE8, 0xF6, 0xFF,   // call 0x10a
        0x5B,               // pop bx
        0xF7, 0xE3,         // mul bx
        0xC3,               // ret          (0x117)
    ];
    let (machine, _) = run_com(&code);
    assert_eq!(Status::Exited(120), machine.status());
    assert_eq!(0xFFFF, machine.cpu.get_r16(realbox::cpu::R::SP));
}

#[test]
fn can_run_with_config() {
    let config = Config::from_toml("instruction_limit = 10\n").unwrap();
    let mut machine = Machine::new(config);
    assert_eq!(Some(10), machine.config().instruction_limit);
    machine.load_com(&[0xEB, 0xFE]).unwrap();
    assert_eq!(Status::Running, machine.run());
    assert_eq!(None, machine.exit_code());
}
