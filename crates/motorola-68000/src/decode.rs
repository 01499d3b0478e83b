//! Opcode decoding and the shared dispatch table.
//!
//! Every one of the 65,536 instruction words is decoded once, the first
//! time any CPU needs the table, into an [`Entry`] holding the operation
//! family with its operand fields already extracted and the encoding's
//! static cycle cost. Encodings the 68000 does not implement, including
//! every operand mode an instruction's category forbids, decode to
//! [`Op::Illegal`], [`Op::LineA`] or [`Op::LineF`], so no handler ever
//! sees an invalid combination.
//!
//! The table is immutable after construction and shared by every CPU.

use std::sync::OnceLock;

use crate::addressing::{AddrMode, ModeSet};
use crate::alu::{ShiftKind, Size};
use crate::timing;

/// Two-operand ALU operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AluOp {
    Add,
    Sub,
    And,
    Or,
    Eor,
    Cmp,
}

/// Operations with an address register destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddrOp {
    Add,
    Sub,
    Cmp,
}

/// Register-to-register or -(An),-(An) operations that consume X.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtOp {
    Addx,
    Subx,
    Abcd,
    Sbcd,
}

/// Single-operand read-modify-write operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Negx,
    Clr,
    Neg,
    Not,
}

/// Bit manipulation operations, in opcode field order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitOp {
    Tst,
    Chg,
    Clr,
    Set,
}

/// Where a bit instruction takes its bit number from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitSource {
    /// Bit number in a data register.
    Register(u8),
    /// Bit number in the following extension word.
    Immediate,
}

/// Register shift count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftCount {
    /// Count 1-8 from the opcode.
    Immediate(u8),
    /// Count modulo 64 from a data register.
    Register(u8),
}

/// EXG register pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExgMode {
    Data,
    Address,
    DataAddress,
}

/// A decoded operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    /// No such instruction (vector 4).
    Illegal,
    /// Line 1010 emulator (vector 10).
    LineA,
    /// Line 1111 emulator (vector 11).
    LineF,

    Move { size: Size, src: AddrMode, dst: AddrMode },
    Movea { size: Size, src: AddrMode, reg: u8 },
    Moveq { reg: u8, data: u8 },
    MoveToCcr(AddrMode),
    MoveToSr(AddrMode),
    MoveFromSr(AddrMode),
    MoveUsp { to_usp: bool, reg: u8 },
    Movem { size: Size, to_memory: bool, mode: AddrMode },
    Movep { size: Size, to_memory: bool, dreg: u8, areg: u8 },
    Lea { src: AddrMode, reg: u8 },
    Pea(AddrMode),
    Exg { mode: ExgMode, rx: u8, ry: u8 },
    Swap(u8),
    Ext { size: Size, reg: u8 },
    Link(u8),
    Unlk(u8),

    /// ADD/SUB/AND/OR/CMP/EOR between a data register and an effective
    /// address. `to_ea` selects `Dn,<ea>` over `<ea>,Dn`.
    Alu { op: AluOp, size: Size, ea: AddrMode, reg: u8, to_ea: bool },
    /// ADDA/SUBA/CMPA.
    AluAddr { op: AddrOp, size: Size, src: AddrMode, reg: u8 },
    /// ORI/ANDI/SUBI/ADDI/EORI/CMPI.
    AluImm { op: AluOp, size: Size, dst: AddrMode },
    /// ORI/ANDI/EORI to CCR.
    ImmToCcr(AluOp),
    /// ORI/ANDI/EORI to SR.
    ImmToSr(AluOp),
    /// ADDQ/SUBQ with data 1-8.
    Quick { sub: bool, size: Size, data: u8, dst: AddrMode },
    /// ADDX/SUBX/ABCD/SBCD. `memory` selects the -(Ay),-(Ax) form.
    Extended { op: ExtOp, size: Size, rx: u8, ry: u8, memory: bool },
    Cmpm { size: Size, ax: u8, ay: u8 },
    Unary { op: UnaryOp, size: Size, dst: AddrMode },
    Tst { size: Size, src: AddrMode },
    Nbcd(AddrMode),
    Tas(AddrMode),
    Scc { cond: u8, dst: AddrMode },
    Mul { signed: bool, src: AddrMode, reg: u8 },
    Div { signed: bool, src: AddrMode, reg: u8 },
    Chk { src: AddrMode, reg: u8 },

    Bit { op: BitOp, source: BitSource, dst: AddrMode },
    ShiftReg { kind: ShiftKind, left: bool, size: Size, count: ShiftCount, reg: u8 },
    ShiftMem { kind: ShiftKind, left: bool, dst: AddrMode },

    /// Bcc, with condition 0 meaning BRA and 1 meaning BSR. A zero
    /// displacement means a 16-bit displacement follows.
    Branch { cond: u8, disp: u8 },
    Dbcc { cond: u8, reg: u8 },
    Jmp(AddrMode),
    Jsr(AddrMode),
    Rts,
    Rtr,
    Rte,
    Trap(u8),
    Trapv,
    Reset,
    Stop,
    Nop,
}

impl Op {
    /// True for instructions that require supervisor mode.
    #[must_use]
    pub const fn is_privileged(&self) -> bool {
        matches!(
            self,
            Self::MoveToSr(_)
                | Self::ImmToSr(_)
                | Self::MoveUsp { .. }
                | Self::Reset
                | Self::Stop
                | Self::Rte
        )
    }
}

/// One dispatch table slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entry {
    pub op: Op,
    /// Static cycle cost of this encoding. Data-dependent costs are added
    /// by the handler.
    pub cycles: u8,
}

static TABLE: OnceLock<Box<[Entry]>> = OnceLock::new();

/// The shared dispatch table, built on first use.
pub fn table() -> &'static [Entry] {
    TABLE.get_or_init(|| {
        (0..=u16::MAX)
            .map(|opcode| {
                let op = decode(opcode);
                Entry {
                    op,
                    cycles: timing::base_cycles(&op),
                }
            })
            .collect()
    })
}

/// Look up a single instruction word.
#[must_use]
pub fn lookup(opcode: u16) -> Entry {
    table()[usize::from(opcode)]
}

fn reg9(opcode: u16) -> u8 {
    ((opcode >> 9) & 7) as u8
}

fn reg0(opcode: u16) -> u8 {
    (opcode & 7) as u8
}

/// Reject byte-sized access to an address register.
fn sized(mode: AddrMode, size: Size) -> Option<AddrMode> {
    match (mode, size) {
        (AddrMode::AddrReg(_), Size::Byte) => None,
        _ => Some(mode),
    }
}

/// Decode one instruction word.
#[must_use]
pub fn decode(opcode: u16) -> Op {
    let op = match opcode >> 12 {
        0x0 => decode_immediate_and_bits(opcode),
        0x1..=0x3 => decode_move(opcode),
        0x4 => decode_misc(opcode),
        0x5 => decode_quick(opcode),
        0x6 => Some(Op::Branch {
            cond: ((opcode >> 8) & 0xF) as u8,
            disp: opcode as u8,
        }),
        0x7 => (opcode & 0x0100 == 0).then_some(Op::Moveq {
            reg: reg9(opcode),
            data: opcode as u8,
        }),
        0x8 => decode_or_div(opcode),
        0x9 => decode_add_sub(opcode, AluOp::Sub),
        0xA => Some(Op::LineA),
        0xB => decode_cmp_eor(opcode),
        0xC => decode_and_mul(opcode),
        0xD => decode_add_sub(opcode, AluOp::Add),
        0xE => decode_shift(opcode),
        _ => Some(Op::LineF),
    };
    op.unwrap_or(Op::Illegal)
}

fn decode_immediate_and_bits(opcode: u16) -> Option<Op> {
    match opcode {
        0x003C => return Some(Op::ImmToCcr(AluOp::Or)),
        0x007C => return Some(Op::ImmToSr(AluOp::Or)),
        0x023C => return Some(Op::ImmToCcr(AluOp::And)),
        0x027C => return Some(Op::ImmToSr(AluOp::And)),
        0x0A3C => return Some(Op::ImmToCcr(AluOp::Eor)),
        0x0A7C => return Some(Op::ImmToSr(AluOp::Eor)),
        _ => {}
    }

    if opcode & 0x0100 != 0 {
        if (opcode >> 3) & 7 == 1 {
            let opmode = (opcode >> 6) & 7;
            return Some(Op::Movep {
                size: if opmode & 1 == 0 { Size::Word } else { Size::Long },
                to_memory: opmode >= 6,
                dreg: reg9(opcode),
                areg: reg0(opcode),
            });
        }
        return decode_bit(opcode, BitSource::Register(reg9(opcode)));
    }

    if opcode & 0x0F00 == 0x0800 {
        return decode_bit(opcode, BitSource::Immediate);
    }

    let op = match (opcode >> 9) & 7 {
        0 => AluOp::Or,
        1 => AluOp::And,
        2 => AluOp::Sub,
        3 => AluOp::Add,
        5 => AluOp::Eor,
        6 => AluOp::Cmp,
        _ => return None,
    };
    let size = Size::from_bits(opcode >> 6)?;
    let dst = ModeSet::DATA_ALTERABLE.accepts(opcode)?;
    Some(Op::AluImm { op, size, dst })
}

fn decode_bit(opcode: u16, source: BitSource) -> Option<Op> {
    let op = match (opcode >> 6) & 3 {
        0 => BitOp::Tst,
        1 => BitOp::Chg,
        2 => BitOp::Clr,
        _ => BitOp::Set,
    };
    let dst = match (op, source) {
        (BitOp::Tst, BitSource::Register(_)) => ModeSet::DATA.accepts(opcode)?,
        (BitOp::Tst, BitSource::Immediate) => {
            let mode = ModeSet::DATA.accepts(opcode)?;
            if mode == AddrMode::Immediate {
                return None;
            }
            mode
        }
        _ => ModeSet::DATA_ALTERABLE.accepts(opcode)?,
    };
    Some(Op::Bit { op, source, dst })
}

fn decode_move(opcode: u16) -> Option<Op> {
    let size = Size::from_move_bits(opcode >> 12)?;
    let src = sized(ModeSet::ALL.accepts(opcode)?, size)?;
    let dst_mode = (opcode >> 6) & 7;
    if dst_mode == 1 {
        if size == Size::Byte {
            return None;
        }
        return Some(Op::Movea {
            size,
            src,
            reg: reg9(opcode),
        });
    }
    let dst = AddrMode::decode(dst_mode, opcode >> 9)?;
    if !dst.is_data_alterable() {
        return None;
    }
    Some(Op::Move { size, src, dst })
}

fn decode_misc(opcode: u16) -> Option<Op> {
    match opcode {
        0x4AFC => return None,
        0x4E70 => return Some(Op::Reset),
        0x4E71 => return Some(Op::Nop),
        0x4E72 => return Some(Op::Stop),
        0x4E73 => return Some(Op::Rte),
        0x4E75 => return Some(Op::Rts),
        0x4E76 => return Some(Op::Trapv),
        0x4E77 => return Some(Op::Rtr),
        _ => {}
    }

    if opcode & 0xF1C0 == 0x4180 {
        let src = ModeSet::DATA.accepts(opcode)?;
        return Some(Op::Chk {
            src,
            reg: reg9(opcode),
        });
    }
    if opcode & 0xF1C0 == 0x41C0 {
        let src = ModeSet::CONTROL.accepts(opcode)?;
        return Some(Op::Lea {
            src,
            reg: reg9(opcode),
        });
    }

    match opcode & 0xFFC0 {
        0x40C0 => return ModeSet::DATA_ALTERABLE.accepts(opcode).map(Op::MoveFromSr),
        0x44C0 => return ModeSet::DATA.accepts(opcode).map(Op::MoveToCcr),
        0x46C0 => return ModeSet::DATA.accepts(opcode).map(Op::MoveToSr),
        0x4800 => return ModeSet::DATA_ALTERABLE.accepts(opcode).map(Op::Nbcd),
        0x4AC0 => return ModeSet::DATA_ALTERABLE.accepts(opcode).map(Op::Tas),
        0x4E80 => return ModeSet::CONTROL.accepts(opcode).map(Op::Jsr),
        0x4EC0 => return ModeSet::CONTROL.accepts(opcode).map(Op::Jmp),
        _ => {}
    }

    match opcode & 0xFFF8 {
        0x4840 => return Some(Op::Swap(reg0(opcode))),
        0x4880 => {
            return Some(Op::Ext {
                size: Size::Word,
                reg: reg0(opcode),
            });
        }
        0x48C0 => {
            return Some(Op::Ext {
                size: Size::Long,
                reg: reg0(opcode),
            });
        }
        0x4E50 => return Some(Op::Link(reg0(opcode))),
        0x4E58 => return Some(Op::Unlk(reg0(opcode))),
        _ => {}
    }

    if opcode & 0xFFF0 == 0x4E40 {
        return Some(Op::Trap((opcode & 0xF) as u8));
    }
    if opcode & 0xFFF0 == 0x4E60 {
        return Some(Op::MoveUsp {
            to_usp: opcode & 0x0008 == 0,
            reg: reg0(opcode),
        });
    }
    if opcode & 0xFFC0 == 0x4840 {
        return ModeSet::CONTROL.accepts(opcode).map(Op::Pea);
    }
    if opcode & 0xFB80 == 0x4880 {
        let to_memory = opcode & 0x0400 == 0;
        let size = if opcode & 0x0040 == 0 { Size::Word } else { Size::Long };
        let set = if to_memory {
            ModeSet::MOVEM_TO_MEMORY
        } else {
            ModeSet::MOVEM_FROM_MEMORY
        };
        let mode = set.accepts(opcode)?;
        return Some(Op::Movem {
            size,
            to_memory,
            mode,
        });
    }

    let size = Size::from_bits(opcode >> 6)?;
    let unary = match opcode & 0xFF00 {
        0x4000 => UnaryOp::Negx,
        0x4200 => UnaryOp::Clr,
        0x4400 => UnaryOp::Neg,
        0x4600 => UnaryOp::Not,
        0x4A00 => {
            let src = ModeSet::DATA_ALTERABLE.accepts(opcode)?;
            return Some(Op::Tst { size, src });
        }
        _ => return None,
    };
    let dst = ModeSet::DATA_ALTERABLE.accepts(opcode)?;
    Some(Op::Unary {
        op: unary,
        size,
        dst,
    })
}

fn decode_quick(opcode: u16) -> Option<Op> {
    let cond = ((opcode >> 8) & 0xF) as u8;
    let Some(size) = Size::from_bits(opcode >> 6) else {
        if (opcode >> 3) & 7 == 1 {
            return Some(Op::Dbcc {
                cond,
                reg: reg0(opcode),
            });
        }
        let dst = ModeSet::DATA_ALTERABLE.accepts(opcode)?;
        return Some(Op::Scc { cond, dst });
    };
    let dst = sized(ModeSet::ALTERABLE.accepts(opcode)?, size)?;
    let data = match reg9(opcode) {
        0 => 8,
        n => n,
    };
    Some(Op::Quick {
        sub: opcode & 0x0100 != 0,
        size,
        data,
        dst,
    })
}

/// Shared decoding for the `<ea>,Dn` / `Dn,<ea>` halves of lines 8, 9, B,
/// C and D.
fn decode_alu(opcode: u16, op: AluOp, source: ModeSet) -> Option<Op> {
    let opmode = (opcode >> 6) & 7;
    let size = Size::from_bits(opmode)?;
    let reg = reg9(opcode);
    if opmode < 4 {
        let ea = sized(source.accepts(opcode)?, size)?;
        Some(Op::Alu {
            op,
            size,
            ea,
            reg,
            to_ea: false,
        })
    } else {
        let set = if op == AluOp::Eor {
            ModeSet::DATA_ALTERABLE
        } else {
            ModeSet::MEMORY_ALTERABLE
        };
        let ea = set.accepts(opcode)?;
        Some(Op::Alu {
            op,
            size,
            ea,
            reg,
            to_ea: true,
        })
    }
}

fn decode_bcd(opcode: u16, op: ExtOp) -> Op {
    Op::Extended {
        op,
        size: Size::Byte,
        rx: reg9(opcode),
        ry: reg0(opcode),
        memory: opcode & 0x0008 != 0,
    }
}

fn decode_or_div(opcode: u16) -> Option<Op> {
    match (opcode >> 6) & 7 {
        3 | 7 => {
            let src = ModeSet::DATA.accepts(opcode)?;
            return Some(Op::Div {
                signed: opcode & 0x0100 != 0,
                src,
                reg: reg9(opcode),
            });
        }
        _ => {}
    }
    if opcode & 0x01F0 == 0x0100 {
        return Some(decode_bcd(opcode, ExtOp::Sbcd));
    }
    decode_alu(opcode, AluOp::Or, ModeSet::DATA)
}

fn decode_and_mul(opcode: u16) -> Option<Op> {
    match (opcode >> 6) & 7 {
        3 | 7 => {
            let src = ModeSet::DATA.accepts(opcode)?;
            return Some(Op::Mul {
                signed: opcode & 0x0100 != 0,
                src,
                reg: reg9(opcode),
            });
        }
        _ => {}
    }
    if opcode & 0x01F0 == 0x0100 {
        return Some(decode_bcd(opcode, ExtOp::Abcd));
    }
    let exg = match opcode & 0x01F8 {
        0x0140 => Some(ExgMode::Data),
        0x0148 => Some(ExgMode::Address),
        0x0188 => Some(ExgMode::DataAddress),
        _ => None,
    };
    if let Some(mode) = exg {
        return Some(Op::Exg {
            mode,
            rx: reg9(opcode),
            ry: reg0(opcode),
        });
    }
    decode_alu(opcode, AluOp::And, ModeSet::DATA)
}

fn decode_add_sub(opcode: u16, op: AluOp) -> Option<Op> {
    let opmode = (opcode >> 6) & 7;
    if opmode == 3 || opmode == 7 {
        let src = ModeSet::ALL.accepts(opcode)?;
        return Some(Op::AluAddr {
            op: if op == AluOp::Add { AddrOp::Add } else { AddrOp::Sub },
            size: if opmode == 3 { Size::Word } else { Size::Long },
            src,
            reg: reg9(opcode),
        });
    }
    if opmode >= 4 && (opcode >> 3) & 6 == 0 {
        let size = Size::from_bits(opmode)?;
        return Some(Op::Extended {
            op: if op == AluOp::Add { ExtOp::Addx } else { ExtOp::Subx },
            size,
            rx: reg9(opcode),
            ry: reg0(opcode),
            memory: opcode & 0x0008 != 0,
        });
    }
    decode_alu(opcode, op, ModeSet::ALL)
}

fn decode_cmp_eor(opcode: u16) -> Option<Op> {
    let opmode = (opcode >> 6) & 7;
    if opmode == 3 || opmode == 7 {
        let src = ModeSet::ALL.accepts(opcode)?;
        return Some(Op::AluAddr {
            op: AddrOp::Cmp,
            size: if opmode == 3 { Size::Word } else { Size::Long },
            src,
            reg: reg9(opcode),
        });
    }
    if opmode < 4 {
        return decode_alu(opcode, AluOp::Cmp, ModeSet::ALL);
    }
    if (opcode >> 3) & 7 == 1 {
        return Some(Op::Cmpm {
            size: Size::from_bits(opmode)?,
            ax: reg9(opcode),
            ay: reg0(opcode),
        });
    }
    decode_alu(opcode, AluOp::Eor, ModeSet::DATA_ALTERABLE)
}

fn decode_shift(opcode: u16) -> Option<Op> {
    let left = opcode & 0x0100 != 0;
    let Some(size) = Size::from_bits(opcode >> 6) else {
        if opcode & 0x0800 != 0 {
            return None;
        }
        let dst = ModeSet::MEMORY_ALTERABLE.accepts(opcode)?;
        return Some(Op::ShiftMem {
            kind: ShiftKind::from_bits(opcode >> 9),
            left,
            dst,
        });
    };
    let count = if opcode & 0x0020 != 0 {
        ShiftCount::Register(reg9(opcode))
    } else {
        ShiftCount::Immediate(match reg9(opcode) {
            0 => 8,
            n => n,
        })
    };
    Some(Op::ShiftReg {
        kind: ShiftKind::from_bits(opcode >> 3),
        left,
        size,
        count,
        reg: reg0(opcode),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_total() {
        assert_eq!(table().len(), 0x10000);
    }

    #[test]
    fn decodes_common_instructions() {
        assert_eq!(decode(0x4E71), Op::Nop);
        assert_eq!(decode(0x7042), Op::Moveq { reg: 0, data: 0x42 });
        assert_eq!(
            decode(0x20BC), // MOVE.L #imm,(A0)
            Op::Move {
                size: Size::Long,
                src: AddrMode::Immediate,
                dst: AddrMode::AddrInd(0)
            }
        );
        assert_eq!(
            decode(0xD241), // ADD.W D1,D1
            Op::Alu {
                op: AluOp::Add,
                size: Size::Word,
                ea: AddrMode::DataReg(1),
                reg: 1,
                to_ea: false
            }
        );
        assert_eq!(decode(0x4E4F), Op::Trap(15));
        assert_eq!(decode(0x46FC), Op::MoveToSr(AddrMode::Immediate));
        assert_eq!(
            decode(0xC141),
            Op::Exg {
                mode: ExgMode::Data,
                rx: 0,
                ry: 1
            }
        );
        assert_eq!(
            decode(0xD380), // ADDX.L D0,D1
            Op::Extended {
                op: ExtOp::Addx,
                size: Size::Long,
                rx: 1,
                ry: 0,
                memory: false
            }
        );
        assert_eq!(decode(0x51C8), Op::Dbcc { cond: 1, reg: 0 });
    }

    #[test]
    fn forbidden_modes_are_illegal() {
        // MOVE.B A0,D0
        assert_eq!(decode(0x1008), Op::Illegal);
        // MOVE.W D0,#imm
        assert_eq!(decode(0x39C0), Op::Illegal);
        // MOVE.W D0,d16(PC)
        assert_eq!(decode(0x35C0), Op::Illegal);
        // LEA (A0)+,A0
        assert_eq!(decode(0x41D8), Op::Illegal);
        // JMP D0
        assert_eq!(decode(0x4EC0), Op::Illegal);
        // ADDQ.B #1,A0
        assert_eq!(decode(0x5208), Op::Illegal);
        // CLR.W with mode 7 reg 5
        assert_eq!(decode(0x427D), Op::Illegal);
        // Size field 3 on ADDI
        assert_eq!(decode(0x06C0), Op::Illegal);
        // RTD is 68010+
        assert_eq!(decode(0x4E74), Op::Illegal);
        assert_eq!(decode(0x4AFC), Op::Illegal);
    }

    #[test]
    fn line_a_and_f() {
        assert_eq!(decode(0xA000), Op::LineA);
        assert_eq!(decode(0xFFFF), Op::LineF);
    }

    #[test]
    fn privileged_set() {
        assert!(decode(0x4E72).is_privileged());
        assert!(decode(0x4E70).is_privileged());
        assert!(decode(0x4E60).is_privileged());
        assert!(decode(0x007C).is_privileged());
        assert!(!decode(0x003C).is_privileged());
        assert!(!decode(0x40C0).is_privileged());
    }

    #[test]
    fn movem_direction_and_modes() {
        // MOVEM.L D0-D7/A0-A6,-(A7)
        assert_eq!(
            decode(0x48E7),
            Op::Movem {
                size: Size::Long,
                to_memory: true,
                mode: AddrMode::AddrIndPreDec(7)
            }
        );
        // MOVEM.W (A7)+,...
        assert_eq!(
            decode(0x4C9F),
            Op::Movem {
                size: Size::Word,
                to_memory: false,
                mode: AddrMode::AddrIndPostInc(7)
            }
        );
        // MOVEM to (An)+ is not allowed
        assert_eq!(decode(0x48D8), Op::Illegal);
    }

    #[test]
    fn shifts() {
        assert_eq!(
            decode(0xE308), // LSL.B #1,D0
            Op::ShiftReg {
                kind: ShiftKind::Logical,
                left: true,
                size: Size::Byte,
                count: ShiftCount::Immediate(1),
                reg: 0
            }
        );
        assert_eq!(
            decode(0xE0A1), // ASR.L D0,D1
            Op::ShiftReg {
                kind: ShiftKind::Arithmetic,
                left: false,
                size: Size::Long,
                count: ShiftCount::Register(0),
                reg: 1
            }
        );
        assert_eq!(
            decode(0xE7D0), // ROL.W (A0)
            Op::ShiftMem {
                kind: ShiftKind::Rotate,
                left: true,
                dst: AddrMode::AddrInd(0)
            }
        );
    }
}
