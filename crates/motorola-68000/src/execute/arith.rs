//! Arithmetic and logic: the two-operand ALU group, immediates, quick
//! forms, extended-precision and BCD, unary operations, Scc, multiply,
//! divide and CHK.

use super::Exec;
use crate::addressing::AddrMode;
use crate::alu::{self, Division, Size};
use crate::bus::M68kBus;
use crate::cpu::Cpu68000;
use crate::decode::{AddrOp, AluOp, ExtOp, UnaryOp};
use crate::exceptions;
use crate::timing;

impl Cpu68000 {
    /// Apply a two-operand ALU op and set the flags. Returns `None` for
    /// CMP, which has no result to store.
    fn alu_apply(&mut self, op: AluOp, src: u32, dst: u32, size: Size) -> Option<u32> {
        let flags = &mut self.regs.flags;
        match op {
            AluOp::Add => {
                let (result, out) = alu::add(src, dst, size);
                *flags = out;
                Some(result)
            }
            AluOp::Sub => {
                let (result, out) = alu::sub(src, dst, size);
                *flags = out;
                Some(result)
            }
            AluOp::Cmp => {
                *flags = alu::cmp(src, dst, size, *flags);
                None
            }
            AluOp::And | AluOp::Or | AluOp::Eor => {
                let result = match op {
                    AluOp::And => src & dst,
                    AluOp::Or => src | dst,
                    _ => src ^ dst,
                } & size.mask();
                *flags = alu::logic(result, size, *flags);
                Some(result)
            }
        }
    }

    /// `<ea>,Dn` and `Dn,<ea>` forms of ADD, SUB, AND, OR, EOR and CMP.
    pub(super) fn exec_alu(
        &mut self,
        bus: &mut dyn M68kBus,
        op: AluOp,
        size: Size,
        ea: AddrMode,
        reg: u8,
        to_ea: bool,
    ) -> Exec {
        let reg = usize::from(reg);
        if to_ea {
            let operand = self.resolve(bus, ea, size);
            let dst = self.read_operand(bus, operand, size);
            let src = self.regs.d_sized(reg, size);
            if let Some(result) = self.alu_apply(op, src, dst, size) {
                self.write_operand(bus, operand, size, result);
            }
        } else {
            let src = self.read_ea(bus, ea, size);
            let dst = self.regs.d_sized(reg, size);
            if let Some(result) = self.alu_apply(op, src, dst, size) {
                self.regs.set_d_sized(reg, size, result);
            }
        }
        Ok(0)
    }

    /// ADDA, SUBA and CMPA. The source is sign-extended to 32 bits and
    /// ADDA/SUBA leave the flags alone.
    pub(super) fn exec_alu_addr(
        &mut self,
        bus: &mut dyn M68kBus,
        op: AddrOp,
        size: Size,
        src: AddrMode,
        reg: u8,
    ) -> Exec {
        let src = size.sign_extend(self.read_ea(bus, src, size));
        let reg = usize::from(reg);
        let dst = self.regs.a[reg];
        match op {
            AddrOp::Add => self.regs.a[reg] = dst.wrapping_add(src),
            AddrOp::Sub => self.regs.a[reg] = dst.wrapping_sub(src),
            AddrOp::Cmp => {
                self.regs.flags = alu::cmp(src, dst, Size::Long, self.regs.flags);
            }
        }
        Ok(0)
    }

    /// ORI, ANDI, SUBI, ADDI, EORI and CMPI. The immediate precedes the
    /// destination's extension words.
    pub(super) fn exec_alu_imm(
        &mut self,
        bus: &mut dyn M68kBus,
        op: AluOp,
        size: Size,
        dst: AddrMode,
    ) -> Exec {
        let src = self.fetch_immediate(bus, size);
        let operand = self.resolve(bus, dst, size);
        let value = self.read_operand(bus, operand, size);
        if let Some(result) = self.alu_apply(op, src, value, size) {
            self.write_operand(bus, operand, size, result);
        }
        Ok(0)
    }

    pub(super) fn exec_imm_to_ccr(&mut self, bus: &mut dyn M68kBus, op: AluOp) -> Exec {
        let imm = self.fetch_word(bus) as u8;
        let ccr = self.regs.ccr();
        let value = match op {
            AluOp::And => ccr & imm,
            AluOp::Or => ccr | imm,
            _ => ccr ^ imm,
        };
        self.regs.set_ccr(value);
        Ok(0)
    }

    pub(super) fn exec_imm_to_sr(&mut self, bus: &mut dyn M68kBus, op: AluOp) -> Exec {
        let imm = self.fetch_word(bus);
        let sr = self.regs.sr();
        let value = match op {
            AluOp::And => sr & imm,
            AluOp::Or => sr | imm,
            _ => sr ^ imm,
        };
        self.regs.set_sr(value);
        Ok(0)
    }

    /// ADDQ/SUBQ. On an address register the whole register changes and
    /// the flags are kept.
    pub(super) fn exec_quick(
        &mut self,
        bus: &mut dyn M68kBus,
        sub: bool,
        size: Size,
        data: u8,
        dst: AddrMode,
    ) -> Exec {
        let data = u32::from(data);
        if let AddrMode::AddrReg(r) = dst {
            let r = usize::from(r);
            self.regs.a[r] = if sub {
                self.regs.a[r].wrapping_sub(data)
            } else {
                self.regs.a[r].wrapping_add(data)
            };
            return Ok(0);
        }
        let operand = self.resolve(bus, dst, size);
        let value = self.read_operand(bus, operand, size);
        let op = if sub { AluOp::Sub } else { AluOp::Add };
        if let Some(result) = self.alu_apply(op, data, value, size) {
            self.write_operand(bus, operand, size, result);
        }
        Ok(0)
    }

    /// ADDX, SUBX, ABCD and SBCD, register or -(Ay),-(Ax) form.
    pub(super) fn exec_extended(
        &mut self,
        bus: &mut dyn M68kBus,
        op: ExtOp,
        size: Size,
        rx: u8,
        ry: u8,
        memory: bool,
    ) -> Exec {
        let (src_mode, dst_mode) = if memory {
            (AddrMode::AddrIndPreDec(ry), AddrMode::AddrIndPreDec(rx))
        } else {
            (AddrMode::DataReg(ry), AddrMode::DataReg(rx))
        };
        let src = self.read_ea(bus, src_mode, size);
        let operand = self.resolve(bus, dst_mode, size);
        let dst = self.read_operand(bus, operand, size);

        let flags = self.regs.flags;
        let result = match op {
            ExtOp::Addx => {
                let (result, out) = alu::addx(src, dst, size, flags);
                self.regs.flags = out;
                result
            }
            ExtOp::Subx => {
                let (result, out) = alu::subx(src, dst, size, flags);
                self.regs.flags = out;
                result
            }
            ExtOp::Abcd | ExtOp::Sbcd => {
                let (result, carry, overflow) = if op == ExtOp::Abcd {
                    alu::bcd_add(src as u8, dst as u8, flags.x)
                } else {
                    alu::bcd_sub(src as u8, dst as u8, flags.x)
                };
                self.regs.flags = alu::bcd_flags(result, carry, overflow, flags);
                u32::from(result)
            }
        };
        self.write_operand(bus, operand, size, result);
        Ok(0)
    }

    /// CMPM (Ay)+,(Ax)+.
    pub(super) fn exec_cmpm(&mut self, bus: &mut dyn M68kBus, size: Size, ax: u8, ay: u8) -> Exec {
        let src = self.read_ea(bus, AddrMode::AddrIndPostInc(ay), size);
        let dst = self.read_ea(bus, AddrMode::AddrIndPostInc(ax), size);
        self.regs.flags = alu::cmp(src, dst, size, self.regs.flags);
        Ok(0)
    }

    /// NEGX, CLR, NEG and NOT.
    pub(super) fn exec_unary(
        &mut self,
        bus: &mut dyn M68kBus,
        op: UnaryOp,
        size: Size,
        dst: AddrMode,
    ) -> Exec {
        let operand = self.resolve(bus, dst, size);
        let flags = self.regs.flags;
        let result = match op {
            UnaryOp::Clr => {
                self.regs.flags = alu::logic(0, size, flags);
                0
            }
            UnaryOp::Negx => {
                let value = self.read_operand(bus, operand, size);
                let (result, out) = alu::negx(value, size, flags);
                self.regs.flags = out;
                result
            }
            UnaryOp::Neg => {
                let value = self.read_operand(bus, operand, size);
                let (result, out) = alu::neg(value, size);
                self.regs.flags = out;
                result
            }
            UnaryOp::Not => {
                let value = self.read_operand(bus, operand, size);
                let result = !value & size.mask();
                self.regs.flags = alu::logic(result, size, flags);
                result
            }
        };
        self.write_operand(bus, operand, size, result);
        Ok(0)
    }

    pub(super) fn exec_tst(&mut self, bus: &mut dyn M68kBus, size: Size, src: AddrMode) -> Exec {
        let value = self.read_ea(bus, src, size);
        self.regs.flags.set_logic(value, size);
        Ok(0)
    }

    /// NBCD: `0 - <ea> - X` in decimal.
    pub(super) fn exec_nbcd(&mut self, bus: &mut dyn M68kBus, dst: AddrMode) -> Exec {
        let operand = self.resolve(bus, dst, Size::Byte);
        let value = self.read_operand(bus, operand, Size::Byte) as u8;
        let flags = self.regs.flags;
        let (result, borrow, overflow) = alu::bcd_sub(value, 0, flags.x);
        self.regs.flags = alu::bcd_flags(result, borrow, overflow, flags);
        self.write_operand(bus, operand, Size::Byte, u32::from(result));
        Ok(0)
    }

    /// TAS: test the byte, then set its bit 7.
    pub(super) fn exec_tas(&mut self, bus: &mut dyn M68kBus, dst: AddrMode) -> Exec {
        let operand = self.resolve(bus, dst, Size::Byte);
        let value = self.read_operand(bus, operand, Size::Byte);
        self.regs.flags.set_logic(value, Size::Byte);
        self.write_operand(bus, operand, Size::Byte, value | 0x80);
        Ok(0)
    }

    /// Scc: all ones if the condition holds, else zero. A true condition
    /// costs 2 more on a data register.
    pub(super) fn exec_scc(&mut self, bus: &mut dyn M68kBus, cond: u8, dst: AddrMode) -> Exec {
        let taken = self.regs.flags.condition(cond);
        self.write_ea(bus, dst, Size::Byte, if taken { 0xFF } else { 0 });
        Ok(if taken && dst.is_register() { 2 } else { 0 })
    }

    /// MULU/MULS 16x16 to 32. The time depends on the source bits.
    pub(super) fn exec_mul(
        &mut self,
        bus: &mut dyn M68kBus,
        signed: bool,
        src: AddrMode,
        reg: u8,
    ) -> Exec {
        let src = self.read_ea(bus, src, Size::Word) as u16;
        let reg = usize::from(reg);
        let dst = self.regs.d[reg] as u16;
        let (product, flags, cycles) = if signed {
            alu::muls(src, dst, self.regs.flags)
        } else {
            alu::mulu(src, dst, self.regs.flags)
        };
        self.regs.d[reg] = product;
        self.regs.flags = flags;
        Ok(cycles as i32)
    }

    /// DIVU/DIVS 32/16. A zero divisor clears C and raises the zero
    /// divide exception with the destination untouched.
    pub(super) fn exec_div(
        &mut self,
        bus: &mut dyn M68kBus,
        signed: bool,
        src: AddrMode,
        reg: u8,
    ) -> Exec {
        let divisor = self.read_ea(bus, src, Size::Word) as u16;
        if divisor == 0 {
            self.regs.flags.c = false;
            let ea = i32::from(timing::ea_time(src, Size::Word));
            return Err(self.fault_after(exceptions::ZERO_DIVIDE).with_cycles(ea));
        }

        let reg = usize::from(reg);
        let dividend = self.regs.d[reg];
        let (division, cycles) = if signed {
            (
                alu::divs(dividend, divisor, self.regs.flags),
                alu::divs_cycles(dividend, divisor),
            )
        } else {
            (
                alu::divu(dividend, divisor, self.regs.flags),
                alu::divu_cycles(dividend, divisor),
            )
        };
        match division {
            Division::Quotient { value, flags } => {
                self.regs.d[reg] = value;
                self.regs.flags = flags;
            }
            Division::Overflow { flags } => self.regs.flags = flags,
        }
        Ok(cycles as i32)
    }

    /// CHK: trap if Dn.W is negative or greater than the bound. N tells
    /// which limit was crossed.
    pub(super) fn exec_chk(&mut self, bus: &mut dyn M68kBus, src: AddrMode, reg: u8) -> Exec {
        let bound = self.read_ea(bus, src, Size::Word) as u16 as i16;
        let value = self.regs.d[usize::from(reg)] as u16 as i16;
        let out_of_range = if value < 0 {
            self.regs.flags.n = true;
            true
        } else if value > bound {
            self.regs.flags.n = false;
            true
        } else {
            false
        };
        if out_of_range {
            let ea = i32::from(timing::ea_time(src, Size::Word));
            return Err(self.fault_after(exceptions::CHK).with_cycles(ea));
        }
        Ok(0)
    }
}
