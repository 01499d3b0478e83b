//! Save and restore of the complete CPU state.
//!
//! The snapshot holds everything that survives between instructions. The
//! configuration and the idle layer's cache are not part of it.

use std::fmt;

use log::debug;

use crate::config::InstanceId;
use crate::cpu::{Cpu68000, RunState};
use crate::flags::Flags;
use crate::registers::Registers;

/// A point-in-time copy of a CPU's state.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CpuState {
    /// Instance the snapshot was taken from.
    pub instance: InstanceId,
    pub d: [u32; 8],
    /// A0-A6. A7 is whichever of `usp`/`ssp` the mode selects.
    pub a: [u32; 7],
    pub usp: u32,
    pub ssp: u32,
    pub pc: u32,
    pub flags: Flags,
    pub supervisor: bool,
    pub trace: bool,
    pub int_mask: u8,
    pub run_state: RunState,
    pub total_cycles: u64,
    pub opcode: u16,
    pub last_irq_level: u8,
}

/// Reasons a [`CpuState`] is rejected by [`Cpu68000::restore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    /// Interrupt mask above 7.
    InterruptMask(u8),
}

impl fmt::Display for StateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InterruptMask(level) => write!(f, "interrupt mask {level} is above 7"),
        }
    }
}

impl std::error::Error for StateError {}

impl Cpu68000 {
    /// Capture the current state.
    #[must_use]
    pub fn snapshot(&self) -> CpuState {
        let mut a = [0; 7];
        a.copy_from_slice(&self.regs.a[..7]);
        CpuState {
            instance: self.config.instance,
            d: self.regs.d,
            a,
            usp: self.regs.usp(),
            ssp: self.regs.ssp(),
            pc: self.regs.pc,
            flags: self.regs.flags,
            supervisor: self.regs.is_supervisor(),
            trace: self.regs.trace,
            int_mask: self.regs.interrupt_mask(),
            run_state: self.state,
            total_cycles: self.total_cycles,
            opcode: self.opcode,
            last_irq_level: self.last_irq_level,
        }
    }

    /// Replace the CPU's state with a snapshot. The CPU is unchanged if the
    /// snapshot is rejected.
    ///
    /// PC and stack pointers are taken as they are. Bits above the address
    /// mask are legal register contents, since every access masks them.
    pub fn restore(&mut self, state: &CpuState) -> Result<(), StateError> {
        if state.int_mask > 7 {
            return Err(StateError::InterruptMask(state.int_mask));
        }
        if state.instance != self.config.instance {
            debug!(
                "{}: restoring snapshot taken from {}",
                self.config.instance, state.instance
            );
        }

        let mut regs = Registers::new();
        regs.d = state.d;
        regs.a[..7].copy_from_slice(&state.a);
        regs.load_stack_pointers(state.supervisor, state.usp, state.ssp);
        regs.pc = state.pc;
        regs.flags = state.flags;
        regs.trace = state.trace;
        regs.set_interrupt_mask(state.int_mask);

        self.regs = regs;
        self.state = state.run_state;
        self.total_cycles = state.total_cycles;
        self.opcode = state.opcode;
        self.last_irq_level = state.last_irq_level;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use emu_core::SimpleBus;

    #[test]
    fn snapshot_restore_round_trip() {
        let mut cpu = Cpu68000::new();
        cpu.regs.d[3] = 0xDEAD_BEEF;
        cpu.regs.a[2] = 0x0000_4000;
        cpu.regs.a[7] = 0x8000;
        cpu.regs.set_usp(0x6000);
        cpu.regs.set_sr(0x0415);
        cpu.regs.pc = 0x1234;
        let state = cpu.snapshot();
        assert!(!state.supervisor);
        assert_eq!(state.ssp, 0x8000);
        assert_eq!(state.usp, 0x6000);

        let mut other = Cpu68000::new();
        other.restore(&state).expect("valid snapshot");
        assert_eq!(other.regs, cpu.regs);
        assert_eq!(other.snapshot(), state);
    }

    #[test]
    fn rejects_bad_mask() {
        let mut cpu = Cpu68000::new();
        let mut state = cpu.snapshot();
        state.int_mask = 9;
        assert_eq!(cpu.restore(&state), Err(StateError::InterruptMask(9)));
    }

    #[test]
    fn restores_stack_pointer_above_address_mask() {
        // LEA ($FE00).W,A7 ; NOP
        let mut bus = SimpleBus::new(0x10000);
        bus.poke_long(0, 0x8000);
        bus.poke_long(4, 0x1000);
        bus.load_words(0x1000, &[0x4FF8, 0xFE00, 0x4E71])
            .expect("program fits");
        let mut cpu = Cpu68000::new();
        cpu.reset(&mut bus);
        cpu.execute(&mut bus, 8);
        assert_eq!(cpu.regs.a[7], 0xFFFF_FE00);

        let state = cpu.snapshot();
        assert_eq!(state.ssp, 0xFFFF_FE00);
        let mut other = Cpu68000::new();
        assert_eq!(other.restore(&state), Ok(()));
        assert_eq!(other.regs.a[7], 0xFFFF_FE00);
        assert_eq!(other.snapshot(), state);
    }
}
