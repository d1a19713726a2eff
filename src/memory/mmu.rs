use std::cmp;

use crate::memory::{Addressing, MemoryAddress};

#[cfg(test)]
#[path = "./mmu_test.rs"]
mod mmu_test;

const DEBUG_MMU: bool = false;

/// size of one segment, and the largest image a .com program can have
pub const SEGMENT_SIZE: usize = 0x1_0000;

/// 1 MiB, the 8086 address space
pub const DEFAULT_MEMORY_SIZE: usize = 0x10_0000;

/// flat byte addressable memory, accessed through segment:offset pairs
#[derive(Clone)]
pub struct MMU {
    memory: Vec<u8>,
    addressing: Addressing,
}

impl MMU {
    pub fn default() -> Self {
        Self::new(DEFAULT_MEMORY_SIZE, Addressing::default())
    }

    /// memory smaller than one segment is rounded up to a full segment
    pub fn new(size: usize, addressing: Addressing) -> Self {
        MMU {
            memory: vec![0; cmp::max(size, SEGMENT_SIZE)],
            addressing,
        }
    }

    pub fn size(&self) -> usize {
        self.memory.len()
    }

    pub fn addressing(&self) -> Addressing {
        self.addressing
    }

    pub fn address(&self, seg: u16, offset: u16) -> MemoryAddress {
        MemoryAddress::new(self.addressing, seg, offset)
    }

    /// translates seg:offset into an index of the memory store.
    /// addresses past the end wrap around, like the 20-bit address bus of the 8086
    pub fn physical(&self, seg: u16, offset: u16) -> usize {
        self.address(seg, offset).value() as usize % self.memory.len()
    }

    pub fn read_u8(&self, seg: u16, offset: u16) -> u8 {
        let addr = self.physical(seg, offset);
        let v = self.memory[addr];
        if DEBUG_MMU {
            debug!("mmu.read_u8 from ({:04X}:{:04X} == {:06X}) = {:02X}", seg, offset, addr, v);
        }
        v
    }

    /// little endian read. the high byte wraps to offset 0 if `offset` is 0xFFFF
    pub fn read_u16(&self, seg: u16, offset: u16) -> u16 {
        let lo = self.read_u8(seg, offset);
        let hi = self.read_u8(seg, offset.wrapping_add(1));
        u16::from(hi) << 8 | u16::from(lo)
    }

    pub fn write_u8(&mut self, seg: u16, offset: u16, data: u8) {
        let addr = self.physical(seg, offset);
        if DEBUG_MMU {
            debug!("mmu.write_u8 to ({:04X}:{:04X} == {:06X}) = {:02X}", seg, offset, addr, data);
        }
        self.memory[addr] = data;
    }

    pub fn write_u16(&mut self, seg: u16, offset: u16, data: u16) {
        self.write_u8(seg, offset, data as u8);
        self.write_u8(seg, offset.wrapping_add(1), (data >> 8) as u8);
    }

    /// reads a sequence of data from memory, the offset wraps inside the segment
    pub fn read(&self, seg: u16, offset: u16, length: usize) -> Vec<u8> {
        let mut addr = self.address(seg, offset);
        let mut res = Vec::with_capacity(length);
        for _ in 0..length {
            res.push(self.read_u8(addr.segment(), addr.offset()));
            addr.inc_u8();
        }
        res
    }

    /// writes a sequence of data to memory, the offset wraps inside the segment
    pub fn write(&mut self, seg: u16, offset: u16, data: &[u8]) {
        let mut addr = self.address(seg, offset);
        for b in data {
            self.write_u8(addr.segment(), addr.offset(), *b);
            addr.inc_u8();
        }
    }

    /// copies `data` to physical address `addr` without segment translation.
    /// returns false if it does not fit
    pub fn write_physical(&mut self, addr: usize, data: &[u8]) -> bool {
        match addr.checked_add(data.len()) {
            Some(end) if end <= self.memory.len() => {
                self.memory[addr..end].copy_from_slice(data);
                true
            }
            _ => false,
        }
    }

    pub fn read_physical(&self, addr: usize, length: usize) -> &[u8] {
        let start = cmp::min(addr, self.memory.len());
        let end = cmp::min(start.saturating_add(length), self.memory.len());
        &self.memory[start..end]
    }

    /// reads a sequence of text until a $ terminator is found.
    /// returns None if no terminator is found within `limit` bytes
    pub fn read_asciid(&self, seg: u16, offset: u16, limit: usize) -> Option<Vec<u8>> {
        let mut res = Vec::new();
        let mut addr = self.address(seg, offset);
        for _ in 0..limit {
            let b = self.read_u8(addr.segment(), addr.offset());
            if b == b'$' {
                return Some(res);
            }
            res.push(b);
            addr.inc_u8();
        }
        None
    }
}
