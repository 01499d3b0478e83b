//! Instruction and exception timing for the 68000.
//!
//! Costs are in clock cycles and follow the MC68000 user's manual tables.
//! [`base_cycles`] gives the static cost of an encoding, fixed at table
//! build time. Handlers add the data-dependent part (shift counts, MOVEM
//! register counts, taken branches, multiply and divide).

use crate::addressing::AddrMode;
use crate::alu::Size;
use crate::decode::{AddrOp, AluOp, BitOp, BitSource, ExtOp, Op};

/// Cost of a privilege violation, charged in place of the instruction.
pub const PRIVILEGE_VIOLATION_CYCLES: i32 = 34;

/// Cost of taking an interrupt, whatever vector the device supplies.
pub const INTERRUPT_CYCLES: i32 = 44;

/// Effective address calculation time, byte/word, by [`AddrMode::index`].
const EA_WORD: [u8; 12] = [0, 0, 4, 4, 6, 8, 10, 8, 12, 8, 10, 4];
/// Effective address calculation time, long.
const EA_LONG: [u8; 12] = [0, 0, 8, 8, 10, 12, 14, 12, 16, 12, 14, 8];

/// MOVE destination write time, byte/word, Dn through (xxx).L.
const MOVE_DST_WORD: [u8; 9] = [0, 0, 4, 4, 4, 8, 10, 8, 12];
/// MOVE destination write time, long.
const MOVE_DST_LONG: [u8; 9] = [0, 0, 8, 8, 8, 12, 14, 12, 16];

// Control-mode instructions, by AddrMode::index. Slots for modes the
// instruction cannot take are zero and never read.
const LEA: [u8; 12] = [0, 0, 4, 0, 0, 8, 12, 8, 12, 8, 12, 0];
const PEA: [u8; 12] = [0, 0, 12, 0, 0, 16, 20, 16, 20, 16, 20, 0];
const JMP: [u8; 12] = [0, 0, 8, 0, 0, 10, 14, 10, 12, 10, 14, 0];
const JSR: [u8; 12] = [0, 0, 16, 0, 0, 18, 22, 18, 20, 18, 22, 0];
const MOVEM_TO_REGS: [u8; 12] = [0, 0, 12, 12, 0, 16, 18, 16, 20, 16, 18, 0];
const MOVEM_TO_MEM: [u8; 12] = [0, 0, 8, 0, 8, 12, 14, 12, 16, 0, 0, 0];

/// Effective address calculation time for one operand.
#[must_use]
pub fn ea_time(mode: AddrMode, size: Size) -> u8 {
    match size {
        Size::Long => EA_LONG[mode.index()],
        _ => EA_WORD[mode.index()],
    }
}

fn long(size: Size) -> bool {
    size == Size::Long
}

/// Pick the byte/word or long figure.
fn by_size(size: Size, word: u8, long_cost: u8) -> u8 {
    if long(size) { long_cost } else { word }
}

/// Static cost of an encoding.
#[must_use]
pub fn base_cycles(op: &Op) -> u8 {
    match *op {
        // Charged as exceptions by the driver.
        Op::Illegal | Op::LineA | Op::LineF | Op::Trap(_) => 0,

        Op::Move { size, src, dst } => {
            let dst_cost = match size {
                Size::Long => MOVE_DST_LONG[dst.index()],
                _ => MOVE_DST_WORD[dst.index()],
            };
            4 + ea_time(src, size) + dst_cost
        }
        Op::Movea { size, src, .. } => 4 + ea_time(src, size),
        Op::Moveq { .. } => 4,
        Op::MoveToCcr(src) | Op::MoveToSr(src) => 12 + ea_time(src, Size::Word),
        Op::MoveFromSr(dst) => {
            if dst.is_register() {
                6
            } else {
                8 + ea_time(dst, Size::Word)
            }
        }
        Op::MoveUsp { .. } => 4,
        Op::Movem { to_memory, mode, .. } => {
            if to_memory {
                MOVEM_TO_MEM[mode.index()]
            } else {
                MOVEM_TO_REGS[mode.index()]
            }
        }
        Op::Movep { size, .. } => by_size(size, 16, 24),
        Op::Lea { src, .. } => LEA[src.index()],
        Op::Pea(src) => PEA[src.index()],
        Op::Exg { .. } => 6,
        Op::Swap(_) | Op::Ext { .. } => 4,
        Op::Link(_) => 16,
        Op::Unlk(_) => 12,

        Op::Alu {
            op,
            size,
            ea,
            to_ea,
            ..
        } => alu_cycles(op, size, ea, to_ea),
        Op::AluAddr { op, size, src, .. } => {
            let ea = ea_time(src, size);
            match (op, size) {
                (AddrOp::Cmp, _) => 6 + ea,
                (_, Size::Long) => {
                    let direct = src.is_register() || src == AddrMode::Immediate;
                    6 + ea + if direct { 2 } else { 0 }
                }
                _ => 8 + ea,
            }
        }
        Op::AluImm { op, size, dst } => {
            if dst.is_register() {
                match op {
                    AluOp::And | AluOp::Cmp => by_size(size, 8, 14),
                    _ => by_size(size, 8, 16),
                }
            } else if op == AluOp::Cmp {
                by_size(size, 8, 12) + ea_time(dst, size)
            } else {
                by_size(size, 12, 20) + ea_time(dst, size)
            }
        }
        Op::ImmToCcr(_) | Op::ImmToSr(_) => 20,
        Op::Quick { size, dst, .. } => match dst {
            AddrMode::DataReg(_) => by_size(size, 4, 8),
            AddrMode::AddrReg(_) => 8,
            _ => by_size(size, 8, 12) + ea_time(dst, size),
        },
        Op::Extended { op, size, memory, .. } => match (op, memory) {
            (ExtOp::Abcd | ExtOp::Sbcd, false) => 6,
            (ExtOp::Abcd | ExtOp::Sbcd, true) => 18,
            (_, false) => by_size(size, 4, 8),
            (_, true) => by_size(size, 18, 30),
        },
        Op::Cmpm { size, .. } => by_size(size, 12, 20),
        Op::Unary { size, dst, .. } => {
            if dst.is_register() {
                by_size(size, 4, 6)
            } else {
                by_size(size, 8, 12) + ea_time(dst, size)
            }
        }
        Op::Tst { size, src } => 4 + ea_time(src, size),
        Op::Nbcd(dst) => {
            if dst.is_register() {
                6
            } else {
                8 + ea_time(dst, Size::Byte)
            }
        }
        Op::Tas(dst) => {
            if dst.is_register() {
                4
            } else {
                10 + ea_time(dst, Size::Byte)
            }
        }
        Op::Scc { dst, .. } => {
            if dst.is_register() {
                4
            } else {
                8 + ea_time(dst, Size::Byte)
            }
        }
        Op::Mul { src, .. } | Op::Div { src, .. } => ea_time(src, Size::Word),
        Op::Chk { src, .. } => 10 + ea_time(src, Size::Word),

        Op::Bit { op, source, dst } => bit_cycles(op, source, dst),
        Op::ShiftReg { size, .. } => by_size(size, 6, 8),
        Op::ShiftMem { dst, .. } => 8 + ea_time(dst, Size::Word),

        Op::Branch { cond, .. } => match cond {
            0 => 10,
            1 => 18,
            _ => 8,
        },
        Op::Dbcc { .. } => 10,
        Op::Jmp(dst) => JMP[dst.index()],
        Op::Jsr(dst) => JSR[dst.index()],
        Op::Rts => 16,
        Op::Rte | Op::Rtr => 20,
        Op::Trapv | Op::Stop | Op::Nop => 4,
        Op::Reset => 132,
    }
}

fn alu_cycles(op: AluOp, size: Size, ea: AddrMode, to_ea: bool) -> u8 {
    let ea_cost = ea_time(ea, size);
    if to_ea {
        if ea.is_register() {
            // EOR Dn,Dn
            return by_size(size, 4, 8);
        }
        return by_size(size, 8, 12) + ea_cost;
    }
    match (op, size) {
        (AluOp::Cmp, Size::Long) => 6 + ea_cost,
        (_, Size::Long) => {
            let direct = ea.is_register() || ea == AddrMode::Immediate;
            6 + ea_cost + if direct { 2 } else { 0 }
        }
        _ => 4 + ea_cost,
    }
}

fn bit_cycles(op: BitOp, source: BitSource, dst: AddrMode) -> u8 {
    let immediate = source == BitSource::Immediate;
    if let AddrMode::DataReg(_) = dst {
        let base = match op {
            BitOp::Tst => 6,
            BitOp::Chg | BitOp::Set => 8,
            BitOp::Clr => 10,
        };
        return base + if immediate { 4 } else { 0 };
    }
    let base = match op {
        // BTST Dn,#imm takes two more than the EA table suggests.
        BitOp::Tst if dst == AddrMode::Immediate => 6,
        BitOp::Tst => 4,
        _ => 8,
    };
    base + if immediate { 4 } else { 0 } + ea_time(dst, Size::Byte)
}

/// Exception processing cost by vector number.
#[must_use]
pub const fn exception_cycles(vector: u8) -> i32 {
    match vector {
        2 | 3 => 50,
        4 | 7 | 8 | 9 | 10 | 11 => 34,
        5 => 38,
        6 => 40,
        15 | 24..=31 => 44,
        32..=47 => 34,
        _ => 4,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::decode;

    fn cost(opcode: u16) -> u8 {
        base_cycles(&decode(opcode))
    }

    #[test]
    fn move_timing() {
        assert_eq!(cost(0x2010), 12); // MOVE.L (A0),D0
        assert_eq!(cost(0x20BC), 20); // MOVE.L #imm,(A0)
        assert_eq!(cost(0x3010), 8); // MOVE.W (A0),D0
        assert_eq!(cost(0x3080), 8); // MOVE.W D0,(A0)
        assert_eq!(cost(0x23F9), 36); // MOVE.L abs.L,abs.L
    }

    #[test]
    fn alu_timing() {
        assert_eq!(cost(0xD081), 8); // ADD.L D1,D0
        assert_eq!(cost(0xD041), 4); // ADD.W D1,D0
        assert_eq!(cost(0xB081), 6); // CMP.L D1,D0
        assert_eq!(cost(0xD190), 20); // ADD.L D0,(A0)
        assert_eq!(cost(0x0680), 16); // ADDI.L #,D0
        assert_eq!(cost(0x0280), 14); // ANDI.L #,D0
        assert_eq!(cost(0x0C50), 12); // CMPI.W #,(A0)
        assert_eq!(cost(0xD1C0), 8); // ADDA.L D0,A0
        assert_eq!(cost(0xD0C0), 8); // ADDA.W D0,A0
        assert_eq!(cost(0x5280), 8); // ADDQ.L #1,D0
        assert_eq!(cost(0x5248), 8); // ADDQ.W #1,A0
    }

    #[test]
    fn control_timing() {
        assert_eq!(cost(0x41F9), 12); // LEA abs.L,A0
        assert_eq!(cost(0x4E90), 16); // JSR (A0)
        assert_eq!(cost(0x4ED0), 8); // JMP (A0)
        assert_eq!(cost(0x4E75), 16); // RTS
        assert_eq!(cost(0x6000), 10); // BRA
        assert_eq!(cost(0x6100), 18); // BSR
        assert_eq!(cost(0x6600), 8); // BNE, before the taken/not-taken adjustment
        assert_eq!(cost(0x4E70), 132); // RESET
    }

    #[test]
    fn bit_timing() {
        assert_eq!(cost(0x0800), 10); // BTST #,D0
        assert_eq!(cost(0x0100), 6); // BTST D0,D0
        assert_eq!(cost(0x01C0), 8); // BSET D0,D0
        assert_eq!(cost(0x0880), 14); // BCLR #,D0
        assert_eq!(cost(0x0810), 12); // BTST #,(A0)
        assert_eq!(cost(0x013C), 10); // BTST D0,#imm
    }

    #[test]
    fn exception_costs() {
        assert_eq!(exception_cycles(3), 50);
        assert_eq!(exception_cycles(4), 34);
        assert_eq!(exception_cycles(5), 38);
        assert_eq!(exception_cycles(6), 40);
        assert_eq!(exception_cycles(8), PRIVILEGE_VIOLATION_CYCLES);
        assert_eq!(exception_cycles(26), 44);
        assert_eq!(exception_cycles(47), 34);
        assert_eq!(exception_cycles(64), 4);
    }
}
