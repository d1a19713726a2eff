use std::fmt;

/// selects how a segment:offset pair maps to a physical address
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Addressing {
    /// segment * 65536 + offset, every segment is a separate 64k bank
    Banked,

    /// segment * 16 + offset, segments overlap at paragraph granularity
    Real,
}

impl Default for Addressing {
    fn default() -> Self {
        Addressing::Banked
    }
}

/// represents a memory address inside the vm
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MemoryAddress {
    /// a real mode segment:offset pair (0x0_0000 - 0x10_FFEF)
    RealSegmentOffset(u16, u16),

    /// a banked segment:offset pair (0x0000_0000 - 0xFFFF_FFFF)
    BankedSegmentOffset(u16, u16),
}

impl fmt::Display for MemoryAddress {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:04X}:{:04X}", self.segment(), self.offset())
    }
}

impl MemoryAddress {
    pub fn new(addressing: Addressing, seg: u16, offset: u16) -> Self {
        match addressing {
            Addressing::Real => MemoryAddress::RealSegmentOffset(seg, offset),
            Addressing::Banked => MemoryAddress::BankedSegmentOffset(seg, offset),
        }
    }

    /// translates a segment:offset pair to a physical (flat) address
    pub fn value(self) -> u32 {
        match self {
            MemoryAddress::RealSegmentOffset(seg, off) => (u32::from(seg) << 4) + u32::from(off),
            MemoryAddress::BankedSegmentOffset(seg, off) => (u32::from(seg) << 16) | u32::from(off),
        }
    }

    pub fn segment(self) -> u16 {
        match self {
            MemoryAddress::RealSegmentOffset(seg, _) |
            MemoryAddress::BankedSegmentOffset(seg, _) => seg,
        }
    }

    pub fn offset(self) -> u16 {
        match self {
            MemoryAddress::RealSegmentOffset(_, off) |
            MemoryAddress::BankedSegmentOffset(_, off) => off,
        }
    }

    /// increase offset by 1, wrapping inside the segment
    pub fn inc_u8(&mut self) {
        match *self {
            MemoryAddress::RealSegmentOffset(_, ref mut off) |
            MemoryAddress::BankedSegmentOffset(_, ref mut off) => *off = off.wrapping_add(1),
        }
    }
}
