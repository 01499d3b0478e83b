//! Motorola 68000 status register and condition codes.
//!
//! The status register is 16 bits:
//! - Bits 0-4: Condition code register (CCR)
//!   - C (bit 0): Carry
//!   - V (bit 1): Overflow
//!   - Z (bit 2): Zero
//!   - N (bit 3): Negative
//!   - X (bit 4): Extend
//! - Bits 8-10: Interrupt mask (I0, I1, I2)
//! - Bit 13: Supervisor mode (S)
//! - Bit 15: Trace mode (T)
//!
//! The interpreter keeps the condition codes split into a [`Flags`] value
//! and only packs them when SR or CCR is read. Zero is stored inverted as
//! `not_zero` so extended-precision chains can OR-accumulate it.

use crate::alu::Size;

/// Carry flag.
pub const C: u16 = 0x0001;
/// Overflow flag.
pub const V: u16 = 0x0002;
/// Zero flag.
pub const Z: u16 = 0x0004;
/// Negative flag.
pub const N: u16 = 0x0008;
/// Extend flag.
pub const X: u16 = 0x0010;

/// Interrupt mask field.
pub const INT_MASK: u16 = 0x0700;
/// Supervisor mode flag.
pub const S: u16 = 0x2000;
/// Trace mode flag.
pub const T: u16 = 0x8000;

/// Mask for condition codes only (bits 0-4).
pub const CCR_MASK: u16 = 0x001F;
/// Mask for implemented SR bits.
pub const SR_MASK: u16 = 0xA71F;

/// Split condition codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Flags {
    /// Carry.
    pub c: bool,
    /// Overflow.
    pub v: bool,
    /// Inverted zero: set when the last result was nonzero.
    pub not_zero: bool,
    /// Negative.
    pub n: bool,
    /// Extend.
    pub x: bool,
}

impl Default for Flags {
    fn default() -> Self {
        Self::from_ccr(0)
    }
}

impl Flags {
    /// Unpack from the low five bits of SR/CCR.
    #[must_use]
    pub const fn from_ccr(ccr: u8) -> Self {
        let ccr = ccr as u16;
        Self {
            c: ccr & C != 0,
            v: ccr & V != 0,
            not_zero: ccr & Z == 0,
            n: ccr & N != 0,
            x: ccr & X != 0,
        }
    }

    /// Pack into the CCR byte.
    #[must_use]
    pub const fn ccr(&self) -> u8 {
        let mut ccr = 0u16;
        if self.c {
            ccr |= C;
        }
        if self.v {
            ccr |= V;
        }
        if !self.not_zero {
            ccr |= Z;
        }
        if self.n {
            ccr |= N;
        }
        if self.x {
            ccr |= X;
        }
        ccr as u8
    }

    /// Zero flag.
    #[must_use]
    pub const fn z(&self) -> bool {
        !self.not_zero
    }

    /// Set N and Z from a sized result.
    pub fn set_nz(&mut self, result: u32, size: Size) {
        self.n = result & size.msb() != 0;
        self.not_zero = result & size.mask() != 0;
    }

    /// Flags of a logical operation or a move: N and Z from the result,
    /// V and C cleared, X untouched.
    pub fn set_logic(&mut self, result: u32, size: Size) {
        self.set_nz(result, size);
        self.v = false;
        self.c = false;
    }

    /// Fold a partial result into an extended-precision chain.
    ///
    /// A nonzero result clears Z. A zero result leaves Z as it was, so Z
    /// stays set only if every partial result of the chain was zero.
    pub fn accumulate_zero(&mut self, result: u32, size: Size) {
        self.not_zero |= result & size.mask() != 0;
    }

    /// Evaluate one of the sixteen condition codes.
    #[must_use]
    pub const fn condition(&self, cc: u8) -> bool {
        let z = !self.not_zero;
        match cc & 0x0F {
            0x0 => true,               // T
            0x1 => false,              // F
            0x2 => !self.c && !z,      // HI
            0x3 => self.c || z,        // LS
            0x4 => !self.c,            // CC
            0x5 => self.c,             // CS
            0x6 => !z,                 // NE
            0x7 => z,                  // EQ
            0x8 => !self.v,            // VC
            0x9 => self.v,             // VS
            0xA => !self.n,            // PL
            0xB => self.n,             // MI
            0xC => self.n == self.v,   // GE
            0xD => self.n != self.v,   // LT
            0xE => !z && self.n == self.v, // GT
            _ => z || self.n != self.v, // LE
        }
    }
}
