//! Addressing mode definitions for the 68000.
//!
//! The 68000 has 12 addressing modes, selected by a 3-bit mode field and a
//! 3-bit register field. Mode 7 uses the register field to pick one of
//! five register-less modes; register values 5-7 are unassigned.

/// Addressing mode for 68000 instructions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddrMode {
    /// Data register direct: Dn
    DataReg(u8),
    /// Address register direct: An
    AddrReg(u8),
    /// Address register indirect: (An)
    AddrInd(u8),
    /// Address register indirect with postincrement: (An)+
    AddrIndPostInc(u8),
    /// Address register indirect with predecrement: -(An)
    AddrIndPreDec(u8),
    /// Address register indirect with displacement: d16(An)
    AddrIndDisp(u8),
    /// Address register indirect with index: d8(An,Xn)
    AddrIndIndex(u8),
    /// Absolute short: (xxx).W
    AbsShort,
    /// Absolute long: (xxx).L
    AbsLong,
    /// Program counter with displacement: d16(PC)
    PcDisp,
    /// Program counter with index: d8(PC,Xn)
    PcIndex,
    /// Immediate: #<data>
    Immediate,
}

impl AddrMode {
    /// Decode addressing mode from mode/register fields.
    #[must_use]
    pub const fn decode(mode: u16, reg: u16) -> Option<Self> {
        let reg = (reg & 7) as u8;
        match mode & 7 {
            0 => Some(Self::DataReg(reg)),
            1 => Some(Self::AddrReg(reg)),
            2 => Some(Self::AddrInd(reg)),
            3 => Some(Self::AddrIndPostInc(reg)),
            4 => Some(Self::AddrIndPreDec(reg)),
            5 => Some(Self::AddrIndDisp(reg)),
            6 => Some(Self::AddrIndIndex(reg)),
            _ => match reg {
                0 => Some(Self::AbsShort),
                1 => Some(Self::AbsLong),
                2 => Some(Self::PcDisp),
                3 => Some(Self::PcIndex),
                4 => Some(Self::Immediate),
                _ => None,
            },
        }
    }

    /// Decode the effective address in the low six bits of an opcode.
    #[must_use]
    pub const fn from_ea(opcode: u16) -> Option<Self> {
        Self::decode(opcode >> 3, opcode)
    }

    /// Position of the mode in the standard timing tables (0-11).
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::DataReg(_) => 0,
            Self::AddrReg(_) => 1,
            Self::AddrInd(_) => 2,
            Self::AddrIndPostInc(_) => 3,
            Self::AddrIndPreDec(_) => 4,
            Self::AddrIndDisp(_) => 5,
            Self::AddrIndIndex(_) => 6,
            Self::AbsShort => 7,
            Self::AbsLong => 8,
            Self::PcDisp => 9,
            Self::PcIndex => 10,
            Self::Immediate => 11,
        }
    }

    /// True for modes that name a register rather than memory.
    #[must_use]
    pub const fn is_register(self) -> bool {
        matches!(self, Self::DataReg(_) | Self::AddrReg(_))
    }

    /// Check if this mode is a data alterable destination.
    #[must_use]
    pub const fn is_data_alterable(self) -> bool {
        ModeSet::DATA_ALTERABLE.contains(self)
    }
}

/// A set of addressing modes, one bit per [`AddrMode::index`].
///
/// The constants are the operand categories of the 68000 programmer's
/// reference. Instruction encodings whose effective address falls outside
/// the category the instruction accepts are illegal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeSet(u16);

impl ModeSet {
    /// Every mode.
    pub const ALL: Self = Self(0x0FFF);
    /// Everything except An.
    pub const DATA: Self = Self(0x0FFD);
    /// Everything except Dn and An.
    pub const MEMORY: Self = Self(0x0FFC);
    /// (An), d16(An), d8(An,Xn), abs, d16(PC), d8(PC,Xn).
    pub const CONTROL: Self = Self(0x07E4);
    /// Everything except the PC-relative and immediate modes.
    pub const ALTERABLE: Self = Self(0x01FF);
    pub const DATA_ALTERABLE: Self = Self(0x01FD);
    pub const MEMORY_ALTERABLE: Self = Self(0x01FC);
    pub const CONTROL_ALTERABLE: Self = Self(0x01E4);
    /// MOVEM registers to memory: control alterable plus -(An).
    pub const MOVEM_TO_MEMORY: Self = Self(0x01F4);
    /// MOVEM memory to registers: control plus (An)+.
    pub const MOVEM_FROM_MEMORY: Self = Self(0x07EC);

    /// Check whether `mode` belongs to the set.
    #[must_use]
    pub const fn contains(self, mode: AddrMode) -> bool {
        self.0 & (1 << mode.index()) != 0
    }

    /// Decode the low six bits of `opcode` and check membership.
    #[must_use]
    pub const fn accepts(self, opcode: u16) -> Option<AddrMode> {
        match AddrMode::from_ea(opcode) {
            Some(mode) if self.contains(mode) => Some(mode),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_mode_seven() {
        assert_eq!(AddrMode::decode(7, 0), Some(AddrMode::AbsShort));
        assert_eq!(AddrMode::decode(7, 4), Some(AddrMode::Immediate));
        assert_eq!(AddrMode::decode(7, 5), None);
        assert_eq!(AddrMode::decode(7, 7), None);
    }

    #[test]
    fn categories() {
        let an = AddrMode::AddrReg(0);
        let dn = AddrMode::DataReg(0);
        let pc = AddrMode::PcDisp;
        let imm = AddrMode::Immediate;
        let postinc = AddrMode::AddrIndPostInc(0);
        let predec = AddrMode::AddrIndPreDec(0);

        assert!(!ModeSet::DATA.contains(an));
        assert!(ModeSet::DATA.contains(imm));
        assert!(!ModeSet::MEMORY.contains(dn));
        assert!(ModeSet::CONTROL.contains(pc));
        assert!(!ModeSet::CONTROL.contains(postinc));
        assert!(!ModeSet::ALTERABLE.contains(pc));
        assert!(ModeSet::ALTERABLE.contains(an));
        assert!(!ModeSet::DATA_ALTERABLE.contains(an));
        assert!(!ModeSet::CONTROL_ALTERABLE.contains(pc));
        assert!(ModeSet::MOVEM_TO_MEMORY.contains(predec));
        assert!(!ModeSet::MOVEM_TO_MEMORY.contains(postinc));
        assert!(ModeSet::MOVEM_FROM_MEMORY.contains(postinc));
        assert!(ModeSet::MOVEM_FROM_MEMORY.contains(pc));
        assert!(!ModeSet::MOVEM_FROM_MEMORY.contains(predec));
    }

    #[test]
    fn accepts_rejects_unassigned_mode_seven() {
        assert_eq!(ModeSet::ALL.accepts(0x003D), None);
        assert_eq!(ModeSet::ALL.accepts(0x0039), Some(AddrMode::AbsLong));
    }
}
