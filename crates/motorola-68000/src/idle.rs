//! Busy-wait loop detection.
//!
//! Software commonly spins on a status flag:
//!
//! ```text
//! loop: tst.w  $C00004     ; or cmp, cmpi, btst
//!       beq.s  loop
//! ```
//!
//! When the idle layer is on, a taken short branch backwards over such a
//! body ends the slice early: the driver charges the rest of the budget
//! instead of running the loop until it expires. The loop would have
//! changed nothing but the cycle count, so only timing differs, and it is
//! inexact by the unspent part of the last iteration.
//!
//! The recognised shapes are BNE/BEQ with displacement -6, -8, -10 or -14,
//! and BRA with -2 (branch to self) or -4, whose body holds only TST, CMP,
//! CMPA, CMPI, BTST and NOP with no (An)+ or -(An) operand. The verdict is
//! cached per branch address.

use std::collections::HashMap;

use log::debug;

use crate::addressing::AddrMode;
use crate::alu::Size;
use crate::bus::M68kBus;
use crate::decode::{self, AddrOp, AluOp, BitOp, BitSource, Op};

/// Counters reported by [`Cpu68000::idle_stats`](crate::Cpu68000::idle_stats).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IdleStats {
    /// Distinct branch addresses recognised as busy-wait loops.
    pub loops_detected: u64,
    /// Times a slice was cut short.
    pub skips: u64,
    /// Cycles charged without executing.
    pub cycles_skipped: u64,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct IdleDetector {
    verdicts: HashMap<u32, bool>,
    stats: IdleStats,
}

impl IdleDetector {
    pub(crate) fn stats(&self) -> IdleStats {
        self.stats
    }

    /// Forget cached verdicts, for example after new code is loaded.
    pub(crate) fn clear(&mut self) {
        self.verdicts.clear();
    }

    pub(crate) fn record_skip(&mut self, cycles: i32) {
        self.stats.skips += 1;
        self.stats.cycles_skipped += u64::try_from(cycles).unwrap_or(0);
    }

    /// Check whether the branch at `branch_pc` closes a busy-wait loop.
    pub(crate) fn is_idle_loop(
        &mut self,
        bus: &mut dyn M68kBus,
        branch_pc: u32,
        cond: u8,
        disp: u8,
    ) -> bool {
        if !candidate(cond, disp) {
            return false;
        }
        if let Some(&verdict) = self.verdicts.get(&branch_pc) {
            return verdict;
        }
        let body_len = u32::from(disp.wrapping_neg()) - 2;
        let start = branch_pc.wrapping_sub(body_len);
        let verdict = body_is_passive(bus, start, body_len);
        if verdict {
            self.stats.loops_detected += 1;
            debug!("idle loop at ${start:08X}, branch at ${branch_pc:08X}");
        }
        self.verdicts.insert(branch_pc, verdict);
        verdict
    }
}

fn candidate(cond: u8, disp: u8) -> bool {
    match cond {
        // BRA
        0 => matches!(disp, 0xFE | 0xFC),
        // BNE, BEQ
        6 | 7 => matches!(disp, 0xFA | 0xF8 | 0xF6 | 0xF2),
        _ => false,
    }
}

/// Extension words taken by an operand.
fn extension_words(mode: AddrMode, size: Size) -> u32 {
    match mode {
        AddrMode::AddrIndDisp(_)
        | AddrMode::AddrIndIndex(_)
        | AddrMode::AbsShort
        | AddrMode::PcDisp
        | AddrMode::PcIndex => 1,
        AddrMode::AbsLong => 2,
        AddrMode::Immediate => {
            if size == Size::Long {
                2
            } else {
                1
            }
        }
        _ => 0,
    }
}

fn steps_register(mode: AddrMode) -> bool {
    matches!(mode, AddrMode::AddrIndPostInc(_) | AddrMode::AddrIndPreDec(_))
}

/// Length in bytes of a side-effect-free test instruction, or `None` if
/// `op` could change anything but the flags.
fn passive_length(op: Op) -> Option<u32> {
    let (mode, size, extra) = match op {
        Op::Nop => return Some(2),
        Op::Tst { size, src } => (src, size, 0),
        Op::Alu {
            op: AluOp::Cmp,
            size,
            ea,
            to_ea: false,
            ..
        } => (ea, size, 0),
        Op::AluAddr {
            op: AddrOp::Cmp,
            size,
            src,
            ..
        } => (src, size, 0),
        Op::AluImm {
            op: AluOp::Cmp,
            size,
            dst,
        } => (dst, size, extension_words(AddrMode::Immediate, size)),
        Op::Bit {
            op: BitOp::Tst,
            source,
            dst,
        } => {
            let extra = u32::from(source == BitSource::Immediate);
            (dst, Size::Byte, extra)
        }
        _ => return None,
    };
    if steps_register(mode) {
        return None;
    }
    Some(2 * (1 + extra + extension_words(mode, size)))
}

/// True if `[start, start + len)` is made up exactly of passive tests.
fn body_is_passive(bus: &mut dyn M68kBus, start: u32, len: u32) -> bool {
    let mut offset = 0;
    while offset < len {
        let opcode = bus.fetch_word(start.wrapping_add(offset));
        match passive_length(decode::lookup(opcode).op) {
            Some(n) => offset += n,
            None => return false,
        }
    }
    offset == len
}

#[cfg(test)]
mod tests {
    use super::*;
    use emu_core::SimpleBus;

    fn detector_with(words: &[u16]) -> (IdleDetector, SimpleBus) {
        let mut bus = SimpleBus::new(0x10000);
        bus.load_words(0x1000, words).expect("program fits");
        (IdleDetector::default(), bus)
    }

    #[test]
    fn tst_abs_long_beq_is_idle() {
        // TST.W $00C00004 ; BEQ.S -8
        let (mut idle, mut bus) = detector_with(&[0x4A79, 0x00C0, 0x0004, 0x67F8]);
        assert!(idle.is_idle_loop(&mut bus, 0x1006, 7, 0xF8));
        assert_eq!(idle.stats().loops_detected, 1);
        // Cached: not counted twice.
        assert!(idle.is_idle_loop(&mut bus, 0x1006, 7, 0xF8));
        assert_eq!(idle.stats().loops_detected, 1);
    }

    #[test]
    fn branch_to_self_is_idle() {
        let (mut idle, mut bus) = detector_with(&[0x60FE]);
        assert!(idle.is_idle_loop(&mut bus, 0x1000, 0, 0xFE));
    }

    #[test]
    fn postincrement_body_is_not_idle() {
        // TST.W (A0)+ ; NOP ; BNE.S -6
        let (mut idle, mut bus) = detector_with(&[0x4A58, 0x4E71, 0x66FA]);
        assert!(!idle.is_idle_loop(&mut bus, 0x1004, 6, 0xFA));
    }

    #[test]
    fn writing_body_is_not_idle() {
        // ADDQ.W #1,D0 ; NOP ; BNE.S -6
        let (mut idle, mut bus) = detector_with(&[0x5240, 0x4E71, 0x66FA]);
        assert!(!idle.is_idle_loop(&mut bus, 0x1004, 6, 0xFA));
    }

    #[test]
    fn btst_immediate_counts_bit_number_word() {
        // BTST #0,$1234.W ; BEQ.S -8
        let (mut idle, mut bus) = detector_with(&[0x0838, 0x0000, 0x1234, 0x67F8]);
        assert!(idle.is_idle_loop(&mut bus, 0x1006, 7, 0xF8));
    }

    #[test]
    fn other_displacements_are_ignored() {
        let (mut idle, mut bus) = detector_with(&[0x4E71, 0x4E71, 0x66FA]);
        assert!(!idle.is_idle_loop(&mut bus, 0x1004, 6, 0xF0));
        assert!(!idle.is_idle_loop(&mut bus, 0x1004, 2, 0xFA));
    }
}
