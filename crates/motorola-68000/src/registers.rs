//! Motorola 68000 CPU registers.
//!
//! - D0-D7: 8 data registers (32-bit)
//! - A0-A7: 8 address registers; A7 is the live stack pointer
//! - USP/SSP: the user and supervisor stack pointers. Whichever one the
//!   current mode does not use is parked in a shadow slot, and the two are
//!   swapped every time the S bit changes.
//! - PC: Program counter
//! - SR: Status register, held split as mode bits plus [`Flags`]

use crate::alu::Size;
use crate::flags::{self, Flags};

/// 68000 CPU register set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registers {
    /// Data registers D0-D7.
    pub d: [u32; 8],
    /// Address registers A0-A7. A7 is the stack pointer of the current mode.
    pub a: [u32; 8],
    /// Program counter.
    pub pc: u32,
    /// Condition codes.
    pub flags: Flags,
    /// Trace bit.
    pub trace: bool,
    /// The stack pointer of the mode not currently active.
    inactive_sp: u32,
    supervisor: bool,
    int_mask: u8,
}

impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}

impl Registers {
    /// Create registers in reset state: supervisor mode, interrupt mask 7.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            d: [0; 8],
            a: [0; 8],
            pc: 0,
            flags: Flags::from_ccr(0),
            trace: false,
            inactive_sp: 0,
            supervisor: true,
            int_mask: 7,
        }
    }

    /// Check if in supervisor mode.
    #[must_use]
    pub const fn is_supervisor(&self) -> bool {
        self.supervisor
    }

    /// Change privilege mode, swapping the live A7 with the shadow stack
    /// pointer when the mode actually changes.
    pub fn set_supervisor(&mut self, supervisor: bool) {
        if supervisor != self.supervisor {
            std::mem::swap(&mut self.a[7], &mut self.inactive_sp);
            self.supervisor = supervisor;
        }
    }

    /// User stack pointer, wherever it currently lives.
    #[must_use]
    pub const fn usp(&self) -> u32 {
        if self.supervisor { self.inactive_sp } else { self.a[7] }
    }

    pub fn set_usp(&mut self, value: u32) {
        if self.supervisor {
            self.inactive_sp = value;
        } else {
            self.a[7] = value;
        }
    }

    /// Supervisor stack pointer, wherever it currently lives.
    #[must_use]
    pub const fn ssp(&self) -> u32 {
        if self.supervisor { self.a[7] } else { self.inactive_sp }
    }

    pub fn set_ssp(&mut self, value: u32) {
        if self.supervisor {
            self.a[7] = value;
        } else {
            self.inactive_sp = value;
        }
    }

    /// Get the interrupt mask level (0-7).
    #[must_use]
    pub const fn interrupt_mask(&self) -> u8 {
        self.int_mask
    }

    /// Set the interrupt mask level (0-7).
    pub fn set_interrupt_mask(&mut self, level: u8) {
        self.int_mask = level & 7;
    }

    /// Pack the status register.
    #[must_use]
    pub const fn sr(&self) -> u16 {
        let mut sr = self.flags.ccr() as u16 | ((self.int_mask as u16) << 8);
        if self.supervisor {
            sr |= flags::S;
        }
        if self.trace {
            sr |= flags::T;
        }
        sr
    }

    /// Load the whole status register. Unimplemented bits are dropped, and
    /// a change of the S bit swaps the stack pointers.
    pub fn set_sr(&mut self, sr: u16) {
        let sr = sr & flags::SR_MASK;
        self.flags = Flags::from_ccr(sr as u8);
        self.trace = sr & flags::T != 0;
        self.int_mask = ((sr & flags::INT_MASK) >> 8) as u8;
        self.set_supervisor(sr & flags::S != 0);
    }

    /// Get the condition code register (low byte of SR).
    #[must_use]
    pub const fn ccr(&self) -> u8 {
        self.flags.ccr()
    }

    /// Set the condition code register.
    pub fn set_ccr(&mut self, value: u8) {
        self.flags = Flags::from_ccr(value);
    }

    /// Read the low `size` bits of a data register.
    #[must_use]
    pub const fn d_sized(&self, n: usize, size: Size) -> u32 {
        self.d[n] & size.mask()
    }

    /// Write the low `size` bits of a data register, keeping the rest.
    pub fn set_d_sized(&mut self, n: usize, size: Size, value: u32) {
        let mask = size.mask();
        self.d[n] = (self.d[n] & !mask) | (value & mask);
    }

    /// Write an address register. Word values are sign-extended, as every
    /// write to An is a full 32-bit write.
    pub fn set_a_sized(&mut self, n: usize, size: Size, value: u32) {
        self.a[n] = match size {
            Size::Word => Size::Word.sign_extend(value),
            _ => value,
        };
    }

    /// Restore the raw stack pointer pair without swapping, used when
    /// loading a snapshot.
    pub(crate) fn load_stack_pointers(&mut self, supervisor: bool, usp: u32, ssp: u32) {
        self.supervisor = supervisor;
        if supervisor {
            self.a[7] = ssp;
            self.inactive_sp = usp;
        } else {
            self.a[7] = usp;
            self.inactive_sp = ssp;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_state() {
        let regs = Registers::new();
        assert!(regs.is_supervisor());
        assert_eq!(regs.sr(), 0x2700);
    }

    #[test]
    fn mode_change_swaps_stack_pointers() {
        let mut regs = Registers::new();
        regs.a[7] = 0x1000; // SSP
        regs.set_usp(0x2000);
        assert_eq!(regs.ssp(), 0x1000);

        regs.set_sr(0x0000);
        assert!(!regs.is_supervisor());
        assert_eq!(regs.a[7], 0x2000);
        assert_eq!(regs.ssp(), 0x1000);

        regs.a[7] = 0x1FFC;
        regs.set_supervisor(true);
        assert_eq!(regs.a[7], 0x1000);
        assert_eq!(regs.usp(), 0x1FFC);
    }

    #[test]
    fn same_mode_does_not_swap() {
        let mut regs = Registers::new();
        regs.a[7] = 0x1000;
        regs.set_usp(0x2000);
        regs.set_sr(0x2000);
        assert_eq!(regs.a[7], 0x1000);
    }

    #[test]
    fn sr_round_trips_through_split_form() {
        let mut regs = Registers::new();
        for sr in [0x2700u16, 0xA71F, 0x0000, 0x2415, 0x801F] {
            regs.set_sr(sr);
            assert_eq!(regs.sr(), sr);
        }
        regs.set_sr(0xFFFF);
        assert_eq!(regs.sr(), 0xA71F);
    }

    #[test]
    fn sized_data_writes_keep_upper_bits() {
        let mut regs = Registers::new();
        regs.d[0] = 0x1234_5678;
        regs.set_d_sized(0, Size::Byte, 0xFF);
        assert_eq!(regs.d[0], 0x1234_56FF);
        regs.set_d_sized(0, Size::Word, 0x0000_ABCD);
        assert_eq!(regs.d[0], 0x1234_ABCD);
        assert_eq!(regs.d_sized(0, Size::Byte), 0xCD);
    }

    #[test]
    fn address_word_writes_sign_extend() {
        let mut regs = Registers::new();
        regs.set_a_sized(0, Size::Word, 0x8000);
        assert_eq!(regs.a[0], 0xFFFF_8000);
    }
}
