//! Bit manipulation and shifts.

use super::Exec;
use crate::addressing::AddrMode;
use crate::alu::{self, ShiftKind, Size};
use crate::bus::M68kBus;
use crate::cpu::Cpu68000;
use crate::decode::{BitOp, BitSource, ShiftCount};

impl Cpu68000 {
    /// BTST, BCHG, BCLR and BSET. Data registers are 32 bits wide and
    /// memory operands one byte, the bit number taken modulo the width.
    /// Z reflects the bit before the change.
    pub(super) fn exec_bit(
        &mut self,
        bus: &mut dyn M68kBus,
        op: BitOp,
        source: BitSource,
        dst: AddrMode,
    ) -> Exec {
        let number = match source {
            BitSource::Register(r) => self.regs.d[usize::from(r)],
            BitSource::Immediate => self.fetch_immediate(bus, Size::Byte),
        };
        let size = if let AddrMode::DataReg(_) = dst {
            Size::Long
        } else {
            Size::Byte
        };
        let mask = 1u32 << (number % size.bits());

        let operand = self.resolve(bus, dst, size);
        let value = self.read_operand(bus, operand, size);
        self.regs.flags.not_zero = value & mask != 0;

        let result = match op {
            BitOp::Tst => return Ok(0),
            BitOp::Chg => value ^ mask,
            BitOp::Clr => value & !mask,
            BitOp::Set => value | mask,
        };
        self.write_operand(bus, operand, size, result);
        Ok(0)
    }

    /// Register shifts and rotates. A register count is taken modulo 64.
    /// Each bit shifted costs 2 cycles.
    pub(super) fn exec_shift_reg(
        &mut self,
        kind: ShiftKind,
        left: bool,
        size: Size,
        count: ShiftCount,
        reg: u8,
    ) -> Exec {
        let count = match count {
            ShiftCount::Immediate(n) => u32::from(n),
            ShiftCount::Register(r) => self.regs.d[usize::from(r)] % 64,
        };
        let reg = usize::from(reg);
        let value = self.regs.d_sized(reg, size);
        let (result, flags) = alu::shift(kind, left, value, count, size, self.regs.flags);
        self.regs.set_d_sized(reg, size, result);
        self.regs.flags = flags;
        Ok(2 * count as i32)
    }

    /// Memory shifts and rotates: one bit of a word.
    pub(super) fn exec_shift_mem(
        &mut self,
        bus: &mut dyn M68kBus,
        kind: ShiftKind,
        left: bool,
        dst: AddrMode,
    ) -> Exec {
        let operand = self.resolve(bus, dst, Size::Word);
        let value = self.read_operand(bus, operand, Size::Word);
        let (result, flags) = alu::shift(kind, left, value, 1, Size::Word, self.regs.flags);
        self.write_operand(bus, operand, Size::Word, result);
        self.regs.flags = flags;
        Ok(0)
    }
}
