use crate::cpu::R;

/// segment override selected by an instruction prefix
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Segment {
    Default,
    ES,
    CS,
    SS,
    DS,
}

impl Segment {
    /// returns the overriding register, or `default` if there is no override
    pub fn or(self, default: R) -> R {
        match self {
            Segment::Default => default,
            Segment::ES => R::ES,
            Segment::CS => R::CS,
            Segment::SS => R::SS,
            Segment::DS => R::DS,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum RepeatMode {
    None,
    /// REP for movs/lods/stos, REPE for cmps/scas (F3)
    Rep,
    /// REPNE (F2)
    Repne,
}
