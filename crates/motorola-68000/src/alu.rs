//! Arithmetic, logic, shift, BCD, multiply and divide primitives.
//!
//! Everything here is a pure function of its operands, the operation size
//! and (where the instruction reads them) the incoming flags. Results are
//! returned already truncated to the operation size.

use crate::flags::Flags;

/// Operation size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Size {
    Byte,
    Word,
    Long,
}

impl Size {
    /// Decode the standard two-bit size field (00=byte, 01=word, 10=long).
    #[must_use]
    pub const fn from_bits(bits: u16) -> Option<Self> {
        match bits & 3 {
            0 => Some(Self::Byte),
            1 => Some(Self::Word),
            2 => Some(Self::Long),
            _ => None,
        }
    }

    /// Decode the MOVE size field (01=byte, 11=word, 10=long).
    #[must_use]
    pub const fn from_move_bits(bits: u16) -> Option<Self> {
        match bits & 3 {
            1 => Some(Self::Byte),
            3 => Some(Self::Word),
            2 => Some(Self::Long),
            _ => None,
        }
    }

    /// Operand width in bytes.
    #[must_use]
    pub const fn bytes(self) -> u32 {
        match self {
            Self::Byte => 1,
            Self::Word => 2,
            Self::Long => 4,
        }
    }

    /// Operand width in bits.
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.bytes() * 8
    }

    #[must_use]
    pub const fn mask(self) -> u32 {
        match self {
            Self::Byte => 0xFF,
            Self::Word => 0xFFFF,
            Self::Long => 0xFFFF_FFFF,
        }
    }

    /// Sign bit for this size.
    #[must_use]
    pub const fn msb(self) -> u32 {
        match self {
            Self::Byte => 0x80,
            Self::Word => 0x8000,
            Self::Long => 0x8000_0000,
        }
    }

    /// Sign-extend the low bits of `value` to 32 bits.
    #[must_use]
    pub const fn sign_extend(self, value: u32) -> u32 {
        match self {
            Self::Byte => value as u8 as i8 as i32 as u32,
            Self::Word => value as u16 as i16 as i32 as u32,
            Self::Long => value,
        }
    }
}

/// Add `src` to `dst`. Sets all five flags.
#[must_use]
pub fn add(src: u32, dst: u32, size: Size) -> (u32, Flags) {
    let result = dst.wrapping_add(src) & size.mask();
    let mut flags = Flags::default();
    flags.set_nz(result, size);
    flags.c = add_carry(src, dst, result, size);
    flags.x = flags.c;
    flags.v = add_overflow(src, dst, result, size);
    (result, flags)
}

/// Subtract `src` from `dst`. Sets all five flags.
#[must_use]
pub fn sub(src: u32, dst: u32, size: Size) -> (u32, Flags) {
    let result = dst.wrapping_sub(src) & size.mask();
    let mut flags = Flags::default();
    flags.set_nz(result, size);
    flags.c = sub_borrow(src, dst, result, size);
    flags.x = flags.c;
    flags.v = sub_overflow(src, dst, result, size);
    (result, flags)
}

/// Compare: flags of `dst - src` with X preserved.
#[must_use]
pub fn cmp(src: u32, dst: u32, size: Size, flags: Flags) -> Flags {
    let (_, mut out) = sub(src, dst, size);
    out.x = flags.x;
    out
}

/// `dst + src + X`. Z is only ever cleared.
#[must_use]
pub fn addx(src: u32, dst: u32, size: Size, flags: Flags) -> (u32, Flags) {
    let result = dst.wrapping_add(src).wrapping_add(u32::from(flags.x)) & size.mask();
    let mut out = flags;
    out.n = result & size.msb() != 0;
    out.accumulate_zero(result, size);
    out.c = add_carry(src, dst, result, size);
    out.x = out.c;
    out.v = add_overflow(src, dst, result, size);
    (result, out)
}

/// `dst - src - X`. Z is only ever cleared.
#[must_use]
pub fn subx(src: u32, dst: u32, size: Size, flags: Flags) -> (u32, Flags) {
    let result = dst.wrapping_sub(src).wrapping_sub(u32::from(flags.x)) & size.mask();
    let mut out = flags;
    out.n = result & size.msb() != 0;
    out.accumulate_zero(result, size);
    out.c = sub_borrow(src, dst, result, size);
    out.x = out.c;
    out.v = sub_overflow(src, dst, result, size);
    (result, out)
}

/// `0 - value`.
#[must_use]
pub fn neg(value: u32, size: Size) -> (u32, Flags) {
    sub(value, 0, size)
}

/// `0 - value - X`.
#[must_use]
pub fn negx(value: u32, size: Size, flags: Flags) -> (u32, Flags) {
    subx(value, 0, size, flags)
}

/// Flags for a logical result, X preserved.
#[must_use]
pub fn logic(result: u32, size: Size, flags: Flags) -> Flags {
    let mut out = flags;
    out.set_logic(result, size);
    out
}

fn add_carry(src: u32, dst: u32, result: u32, size: Size) -> bool {
    ((src & dst) | (!result & (src | dst))) & size.msb() != 0
}

fn add_overflow(src: u32, dst: u32, result: u32, size: Size) -> bool {
    ((src ^ result) & (dst ^ result)) & size.msb() != 0
}

fn sub_borrow(src: u32, dst: u32, result: u32, size: Size) -> bool {
    ((src & !dst) | (result & !dst) | (src & result)) & size.msb() != 0
}

fn sub_overflow(src: u32, dst: u32, result: u32, size: Size) -> bool {
    ((src ^ dst) & (result ^ dst)) & size.msb() != 0
}

/// Shift and rotate kinds, in opcode field order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftKind {
    /// ASL/ASR
    Arithmetic,
    /// LSL/LSR
    Logical,
    /// ROXL/ROXR
    RotateExtend,
    /// ROL/ROR
    Rotate,
}

impl ShiftKind {
    #[must_use]
    pub const fn from_bits(bits: u16) -> Self {
        match bits & 3 {
            0 => Self::Arithmetic,
            1 => Self::Logical,
            2 => Self::RotateExtend,
            _ => Self::Rotate,
        }
    }
}

/// Shift or rotate `value` by `count` (0-63).
///
/// The shift is carried out one bit at a time, so counts at or beyond the
/// operand width behave exactly as the hardware's repeated single shifts:
/// logical shifts run out to zero with the last bit out in C and X,
/// arithmetic right shifts fill with the sign, and ROXL/ROXR rotate
/// through X with period width + 1.
#[must_use]
pub fn shift(
    kind: ShiftKind,
    left: bool,
    value: u32,
    count: u32,
    size: Size,
    flags: Flags,
) -> (u32, Flags) {
    let mask = size.mask();
    let msb = size.msb();
    let mut v = value & mask;
    let mut carry = false;
    let mut extend = flags.x;
    let mut overflow = false;
    let sign = v & msb;

    for _ in 0..count {
        if left {
            carry = v & msb != 0;
            v = (v << 1) & mask;
            match kind {
                ShiftKind::Arithmetic => overflow |= v & msb != sign,
                ShiftKind::Logical => {}
                ShiftKind::RotateExtend => {
                    v |= u32::from(extend);
                    extend = carry;
                }
                ShiftKind::Rotate => v |= u32::from(carry),
            }
        } else {
            carry = v & 1 != 0;
            v >>= 1;
            match kind {
                ShiftKind::Arithmetic => v |= sign,
                ShiftKind::Logical => {}
                ShiftKind::RotateExtend => {
                    if extend {
                        v |= msb;
                    }
                    extend = carry;
                }
                ShiftKind::Rotate => {
                    if carry {
                        v |= msb;
                    }
                }
            }
        }
    }

    let mut out = flags;
    out.set_nz(v, size);
    out.v = overflow;
    if count == 0 {
        out.c = kind == ShiftKind::RotateExtend && flags.x;
    } else {
        out.c = carry;
        if kind != ShiftKind::Rotate {
            out.x = carry;
        }
    }
    (v, out)
}

/// Packed BCD `dst + src + X`.
///
/// Returns the result byte, decimal carry and the undocumented V, which is
/// set when the correction turns bit 7 on.
#[must_use]
pub fn bcd_add(src: u8, dst: u8, extend: bool) -> (u8, bool, bool) {
    let x = u16::from(extend);
    let low = u16::from(dst & 0x0F) + u16::from(src & 0x0F) + x;
    let binary = u16::from(dst) + u16::from(src) + x;

    let low_carry = low > 9;
    let high = u16::from(dst >> 4) + u16::from(src >> 4) + u16::from(low_carry);
    let carry = high > 9;

    let mut result = binary;
    if low_carry {
        result += 6;
    }
    if carry {
        result += 0x60;
    }
    let overflow = !binary & result & 0x80 != 0;
    (result as u8, carry, overflow)
}

/// Packed BCD `dst - src - X`.
///
/// Returns the result byte, decimal borrow and the undocumented V, which
/// is set when the correction turns bit 7 off.
#[must_use]
pub fn bcd_sub(src: u8, dst: u8, extend: bool) -> (u8, bool, bool) {
    let x = u8::from(extend);
    let binary = dst.wrapping_sub(src).wrapping_sub(x);

    let mut result = binary;
    let low_borrow = (dst & 0x0F) < (src & 0x0F).saturating_add(x);
    if low_borrow {
        result = result.wrapping_sub(6);
    }
    let high_borrow = (dst >> 4) < (src >> 4) + u8::from(low_borrow);
    if high_borrow {
        result = result.wrapping_sub(0x60);
    }
    let borrow = high_borrow || (low_borrow && binary < 6);
    let overflow = binary & !result & 0x80 != 0;
    (result, borrow, overflow)
}

/// Apply a BCD byte result to the flags: C and X from the decimal carry,
/// Z accumulated, N from bit 7.
#[must_use]
pub fn bcd_flags(result: u8, carry: bool, overflow: bool, flags: Flags) -> Flags {
    let mut out = flags;
    out.c = carry;
    out.x = carry;
    out.v = overflow;
    out.n = result & 0x80 != 0;
    out.accumulate_zero(u32::from(result), Size::Byte);
    out
}

/// Unsigned 16x16 multiply. Returns the product, flags and cycle cost
/// excluding the effective address.
#[must_use]
pub fn mulu(src: u16, dst: u16, flags: Flags) -> (u32, Flags, u32) {
    let product = u32::from(src) * u32::from(dst);
    let cycles = 38 + 2 * src.count_ones();
    (product, logic(product, Size::Long, flags), cycles)
}

/// Signed 16x16 multiply. Returns the product, flags and cycle cost
/// excluding the effective address.
#[must_use]
pub fn muls(src: u16, dst: u16, flags: Flags) -> (u32, Flags, u32) {
    let product = (i32::from(src as i16) * i32::from(dst as i16)) as u32;
    // One extra step per 01 or 10 pair in the source, with a zero appended
    // below bit 0.
    let pattern = u32::from(src) << 1;
    let transitions = ((pattern ^ (pattern >> 1)) & 0xFFFF).count_ones();
    let cycles = 38 + 2 * transitions;
    (product, logic(product, Size::Long, flags), cycles)
}

/// Outcome of a division by a nonzero divisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Division {
    /// Remainder in the high word, quotient in the low word.
    Quotient { value: u32, flags: Flags },
    /// The quotient does not fit in 16 bits. The destination is left alone.
    Overflow { flags: Flags },
}

fn division_overflow_flags(flags: Flags) -> Flags {
    let mut out = flags;
    out.v = true;
    out.c = false;
    out
}

/// Unsigned 32/16 divide. `divisor` must be nonzero.
#[must_use]
pub fn divu(dividend: u32, divisor: u16, flags: Flags) -> Division {
    let divisor = u32::from(divisor);
    let quotient = dividend / divisor;
    if quotient > 0xFFFF {
        return Division::Overflow {
            flags: division_overflow_flags(flags),
        };
    }
    let remainder = dividend % divisor;
    Division::Quotient {
        value: (remainder << 16) | quotient,
        flags: logic(quotient, Size::Word, flags),
    }
}

/// Signed 32/16 divide. `divisor` must be nonzero.
///
/// The remainder takes the sign of the dividend.
#[must_use]
pub fn divs(dividend: u32, divisor: u16, flags: Flags) -> Division {
    let dividend = i64::from(dividend as i32);
    let divisor = i64::from(divisor as i16);
    let quotient = dividend / divisor;
    if quotient < i64::from(i16::MIN) || quotient > i64::from(i16::MAX) {
        return Division::Overflow {
            flags: division_overflow_flags(flags),
        };
    }
    let remainder = dividend % divisor;
    let quotient = quotient as u32 & 0xFFFF;
    Division::Quotient {
        value: ((remainder as u32) << 16) | quotient,
        flags: logic(quotient, Size::Word, flags),
    }
}

/// DIVU execution time, excluding the effective address.
///
/// Jorge Cwik's model of the microcode's restoring division loop.
#[must_use]
pub fn divu_cycles(dividend: u32, divisor: u16) -> u32 {
    if (dividend >> 16) >= u32::from(divisor) {
        return 10;
    }

    let mut mcycles: u32 = 38;
    let hdivisor = u32::from(divisor) << 16;
    let mut dvd = dividend;

    for _ in 0..15 {
        let temp = dvd;
        dvd <<= 1;
        if temp & 0x8000_0000 != 0 {
            dvd = dvd.wrapping_sub(hdivisor);
        } else {
            mcycles += 2;
            if dvd >= hdivisor {
                dvd = dvd.wrapping_sub(hdivisor);
                mcycles -= 1;
            }
        }
    }
    mcycles * 2
}

/// DIVS execution time, excluding the effective address.
#[must_use]
pub fn divs_cycles(dividend: u32, divisor: u16) -> u32 {
    let dividend = dividend as i32;
    let divisor = divisor as i16;
    let mut mcycles: u32 = 6;
    if dividend < 0 {
        mcycles += 1;
    }

    let abs_dividend = dividend.unsigned_abs();
    let abs_divisor = divisor.unsigned_abs();
    if (abs_dividend >> 16) >= u32::from(abs_divisor) {
        return (mcycles + 2) * 2;
    }

    let mut aquot = abs_dividend / u32::from(abs_divisor);
    mcycles += 55;
    if divisor >= 0 {
        if dividend >= 0 {
            mcycles -= 1;
        } else {
            mcycles += 1;
        }
    }

    // Each zero among the 15 high quotient bits costs one more step.
    for _ in 0..15 {
        if (aquot as i16) >= 0 {
            mcycles += 1;
        }
        aquot <<= 1;
    }
    mcycles * 2
}
