//! 68000-specific bus extensions.
//!
//! Memory traffic goes through [`emu_core::Bus`]. [`M68kBus`] adds the
//! pins the 68000 needs beyond plain memory: the interrupt priority level
//! inputs, the interrupt acknowledge cycle and the RESET output. Every
//! method has a default, so a plain memory bus only needs an empty impl.

use emu_core::{Bus, SimpleBus};

/// Function code driven on FC0-FC2 during an access.
///
/// Only used to fill in the status word of an address or bus error frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionCode {
    /// User data access (FC=1).
    UserData = 1,
    /// User program access (FC=2).
    UserProgram = 2,
    /// Supervisor data access (FC=5).
    SupervisorData = 5,
    /// Supervisor program access (FC=6).
    SupervisorProgram = 6,
    /// Interrupt acknowledge cycle (FC=7).
    InterruptAck = 7,
}

impl FunctionCode {
    /// Build a function code from supervisor flag and program/data flag.
    #[must_use]
    pub fn from_flags(supervisor: bool, program: bool) -> Self {
        match (supervisor, program) {
            (false, false) => Self::UserData,
            (false, true) => Self::UserProgram,
            (true, false) => Self::SupervisorData,
            (true, true) => Self::SupervisorProgram,
        }
    }

    /// Returns the 3-bit value for the function code.
    #[must_use]
    pub fn bits(self) -> u8 {
        self as u8
    }
}

/// What the interrupting device answers during the acknowledge cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterruptAck {
    /// VPA asserted: use the autovector for the level (24 + level).
    Autovector,
    /// The device supplied a vector number.
    Vector(u8),
    /// Nobody answered: take the spurious interrupt vector (24).
    Spurious,
    /// A peripheral whose vector register was never programmed: take the
    /// uninitialized interrupt vector (15).
    Uninitialized,
}

/// Bus with the 68000's interrupt and reset pins.
pub trait M68kBus: Bus {
    /// Current level on IPL0-IPL2, 0 for none.
    fn pending_interrupt(&mut self) -> u8 {
        0
    }

    /// Run the interrupt acknowledge cycle for `level`.
    ///
    /// The device is expected to drop its request here if it is edge
    /// triggered.
    fn acknowledge_interrupt(&mut self, level: u8) -> InterruptAck {
        let _ = level;
        InterruptAck::Autovector
    }

    /// The RESET instruction pulsed the reset line.
    fn reset_devices(&mut self) {}
}

impl M68kBus for SimpleBus {}
