use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use crate::config::DEFAULT_MAX_STRING_LENGTH;
use crate::cpu::{CPU, R};
use crate::machine::{Component, Signal};
use crate::memory::MMU;

#[cfg(test)]
#[path = "./dos_test.rs"]
mod dos_test;

/// cursor left, space, cursor left: erases the previous character on a terminal
const BACKSPACE_ERASE: &[u8] = b"\x1b[1D \x1b[1D";

/// DOS services of INT 21h, writing console output to a host stream
pub struct DOS {
    stdout: Box<dyn Write>,

    /// longest string AH=09h scans for its '$' terminator
    max_string_length: usize,
}

impl DOS {
    pub fn default() -> Self {
        Self::new(DEFAULT_MAX_STRING_LENGTH)
    }

    pub fn new(max_string_length: usize) -> Self {
        DOS {
            stdout: Box::new(io::stdout()),
            max_string_length,
        }
    }

    /// redirects console output
    pub fn set_output(&mut self, out: Box<dyn Write>) {
        self.stdout = out;
    }

    fn write_bytes(&mut self, data: &[u8]) {
        let res = self.stdout.write_all(data).and_then(|_| self.stdout.flush());
        if let Err(e) = res {
            warn!("dos: console write failed: {}", e);
        }
    }

    /// AH=02h: writes DL to standard output
    fn write_char(&mut self, cpu: &mut CPU) {
        let dl = cpu.get_r8(R::DL);
        self.write_bytes(&[dl]);
        // AL = last character output (despite the official docs which state nothing is returned)
        cpu.set_r8(R::AL, dl);
    }

    /// AH=09h: writes the '$'-terminated string at DS:DX to standard output
    fn write_string(&mut self, cpu: &mut CPU, mmu: &MMU) {
        let ds = cpu.get_r16(R::DS);
        let dx = cpu.get_r16(R::DX);
        match mmu.read_asciid(ds, dx, self.max_string_length) {
            Some(text) => {
                let out = console_bytes(&text);
                self.write_bytes(&out);
            }
            None => warn!("dos: string at {:04X}:{:04X} has no '$' within {} bytes, not printed",
                          ds, dx, self.max_string_length),
        }
        cpu.set_r8(R::AL, b'$');
    }
}

/// filters `text` to what is passed on to the host terminal: printable ascii,
/// tab, carriage return, line feed and bell. backspace erases the previous
/// character, everything else is dropped
pub fn console_bytes(text: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    for &b in text {
        match b {
            0x20..=0x7E | b'\t' | b'\r' | b'\n' | 0x07 => out.push(b),
            0x08 => out.extend_from_slice(BACKSPACE_ERASE),
            _ => {}
        }
    }
    out
}

impl Component for DOS {
    /// handles INT 21h functions 02h, 09h and 4Ch
    fn int(&mut self, int: u8, cpu: &mut CPU, mmu: &mut MMU) -> Option<Signal> {
        if int != 0x21 {
            return None;
        }
        match cpu.get_r8(R::AH) {
            0x02 => self.write_char(cpu),
            0x09 => self.write_string(cpu, mmu),
            0x4C => {
                // DOS 2+ - EXIT - TERMINATE WITH RETURN CODE
                let code = cpu.get_r8(R::AL);
                debug!("dos: program exit with code {}", code);
                return Some(Signal::Exit(code));
            }
            ah => warn!("dos: unsupported int 21h function AH={:02X}, AX={:04X}", ah, cpu.get_r16(R::AX)),
        }
        Some(Signal::Continue)
    }
}

/// an in-memory console, clones share the same buffer
#[derive(Clone, Default)]
pub struct CapturedOutput {
    buffer: Rc<RefCell<Vec<u8>>>,
}

impl CapturedOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> Vec<u8> {
        self.buffer.borrow().clone()
    }

    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(&self.buffer.borrow()).into_owned()
    }
}

impl Write for CapturedOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
