//! Data movement: MOVE and its variants, MOVEM, MOVEP, LEA/PEA, EXG,
//! SWAP, EXT and the LINK/UNLK frame instructions.

use super::Exec;
use crate::addressing::AddrMode;
use crate::alu::Size;
use crate::bus::M68kBus;
use crate::cpu::Cpu68000;
use crate::decode::ExgMode;

impl Cpu68000 {
    /// MOVE: N and Z from the value moved, V and C cleared, X kept.
    pub(super) fn exec_move(
        &mut self,
        bus: &mut dyn M68kBus,
        size: Size,
        src: AddrMode,
        dst: AddrMode,
    ) -> Exec {
        let value = self.read_ea(bus, src, size);
        self.write_ea(bus, dst, size, value);
        self.regs.flags.set_logic(value, size);
        Ok(0)
    }

    pub(super) fn exec_movea(
        &mut self,
        bus: &mut dyn M68kBus,
        size: Size,
        src: AddrMode,
        reg: u8,
    ) -> Exec {
        let value = self.read_ea(bus, src, size);
        self.regs.set_a_sized(usize::from(reg), size, value);
        Ok(0)
    }

    pub(super) fn exec_moveq(&mut self, reg: u8, data: u8) -> Exec {
        let value = Size::Byte.sign_extend(u32::from(data));
        self.regs.d[usize::from(reg)] = value;
        self.regs.flags.set_logic(value, Size::Long);
        Ok(0)
    }

    pub(super) fn exec_move_to_ccr(&mut self, bus: &mut dyn M68kBus, src: AddrMode) -> Exec {
        let value = self.read_ea(bus, src, Size::Word);
        self.regs.set_ccr(value as u8);
        Ok(0)
    }

    pub(super) fn exec_move_to_sr(&mut self, bus: &mut dyn M68kBus, src: AddrMode) -> Exec {
        let value = self.read_ea(bus, src, Size::Word);
        self.regs.set_sr(value as u16);
        Ok(0)
    }

    /// MOVE from SR is unprivileged on the 68000.
    pub(super) fn exec_move_from_sr(&mut self, bus: &mut dyn M68kBus, dst: AddrMode) -> Exec {
        let sr = u32::from(self.regs.sr());
        self.write_ea(bus, dst, Size::Word, sr);
        Ok(0)
    }

    pub(super) fn exec_move_usp(&mut self, to_usp: bool, reg: u8) -> Exec {
        let reg = usize::from(reg);
        if to_usp {
            self.regs.set_usp(self.regs.a[reg]);
        } else {
            self.regs.a[reg] = self.regs.usp();
        }
        Ok(0)
    }

    /// Register `index` of a MOVEM mask: 0-7 are D0-D7, 8-15 are A0-A7.
    fn movem_reg(&self, index: usize) -> u32 {
        if index < 8 {
            self.regs.d[index]
        } else {
            self.regs.a[index - 8]
        }
    }

    fn set_movem_reg(&mut self, index: usize, value: u32) {
        if index < 8 {
            self.regs.d[index] = value;
        } else {
            self.regs.a[index - 8] = value;
        }
    }

    /// MOVEM. The mask word precedes any extension words of the address.
    ///
    /// For -(An) the mask is reversed (bit 0 is A7) and registers are
    /// stored from A7 down to D0. For (An)+ the address register is
    /// written back once at the end. Word loads are sign-extended into the
    /// whole register.
    pub(super) fn exec_movem(
        &mut self,
        bus: &mut dyn M68kBus,
        size: Size,
        to_memory: bool,
        mode: AddrMode,
    ) -> Exec {
        let mask = self.fetch_word(bus);
        let step = size.bytes();
        let count = mask.count_ones() as i32;

        if let AddrMode::AddrIndPreDec(r) = mode {
            let r = usize::from(r);
            let mut address = self.regs.a[r];
            for bit in 0..16 {
                if mask & (1 << bit) == 0 {
                    continue;
                }
                let value = self.movem_reg(15 - bit);
                address = address.wrapping_sub(step);
                if size == Size::Long {
                    self.write_long_descending(bus, address, value);
                } else {
                    self.write(bus, address, size, value);
                }
            }
            self.regs.a[r] = address;
        } else if let AddrMode::AddrIndPostInc(r) = mode {
            let r = usize::from(r);
            let mut address = self.regs.a[r];
            for bit in 0..16 {
                if mask & (1 << bit) != 0 {
                    let value = self.read(bus, address, size);
                    self.set_movem_reg(bit, size.sign_extend(value));
                    address = address.wrapping_add(step);
                }
            }
            self.regs.a[r] = address;
        } else {
            let mut address = self.control_address(bus, mode);
            for bit in 0..16 {
                if mask & (1 << bit) == 0 {
                    continue;
                }
                if to_memory {
                    let value = self.movem_reg(bit);
                    self.write(bus, address, size, value);
                } else {
                    let value = self.read(bus, address, size);
                    self.set_movem_reg(bit, size.sign_extend(value));
                }
                address = address.wrapping_add(step);
            }
        }

        let per_register = if size == Size::Long { 8 } else { 4 };
        Ok(count * per_register)
    }

    /// MOVEP: bytes of Dn to or from every other byte starting at
    /// d16(An), most significant first.
    pub(super) fn exec_movep(
        &mut self,
        bus: &mut dyn M68kBus,
        size: Size,
        to_memory: bool,
        dreg: u8,
        areg: u8,
    ) -> Exec {
        let disp = Size::Word.sign_extend(u32::from(self.fetch_word(bus)));
        let base = self.regs.a[usize::from(areg)].wrapping_add(disp);
        let dreg = usize::from(dreg);
        let bytes = size.bytes();

        if to_memory {
            let value = self.regs.d[dreg];
            for i in 0..bytes {
                let shift = 8 * (bytes - 1 - i);
                self.write(bus, base.wrapping_add(2 * i), Size::Byte, value >> shift);
            }
        } else {
            let mut value = 0;
            for i in 0..bytes {
                value = (value << 8) | self.read(bus, base.wrapping_add(2 * i), Size::Byte);
            }
            self.regs.set_d_sized(dreg, size, value);
        }
        Ok(0)
    }

    pub(super) fn exec_lea(&mut self, bus: &mut dyn M68kBus, src: AddrMode, reg: u8) -> Exec {
        self.regs.a[usize::from(reg)] = self.control_address(bus, src);
        Ok(0)
    }

    pub(super) fn exec_pea(&mut self, bus: &mut dyn M68kBus, src: AddrMode) -> Exec {
        let address = self.control_address(bus, src);
        self.push_long(bus, address);
        Ok(0)
    }

    pub(super) fn exec_exg(&mut self, mode: ExgMode, rx: u8, ry: u8) -> Exec {
        let (x, y) = (usize::from(rx), usize::from(ry));
        let regs = &mut self.regs;
        match mode {
            ExgMode::Data => regs.d.swap(x, y),
            ExgMode::Address => regs.a.swap(x, y),
            ExgMode::DataAddress => std::mem::swap(&mut regs.d[x], &mut regs.a[y]),
        }
        Ok(0)
    }

    pub(super) fn exec_swap(&mut self, reg: u8) -> Exec {
        let reg = usize::from(reg);
        let value = self.regs.d[reg].rotate_left(16);
        self.regs.d[reg] = value;
        self.regs.flags.set_logic(value, Size::Long);
        Ok(0)
    }

    /// EXT.W sign-extends the low byte into the low word, EXT.L the low
    /// word into the register.
    pub(super) fn exec_ext(&mut self, size: Size, reg: u8) -> Exec {
        let reg = usize::from(reg);
        let value = self.regs.d[reg];
        let extended = match size {
            Size::Long => Size::Word.sign_extend(value),
            _ => Size::Byte.sign_extend(value) & 0xFFFF,
        };
        self.regs.set_d_sized(reg, size, extended);
        self.regs.flags.set_logic(extended, size);
        Ok(0)
    }

    /// LINK. For A7 the value stacked is the stack pointer after the push
    /// has decremented it.
    pub(super) fn exec_link(&mut self, bus: &mut dyn M68kBus, reg: u8) -> Exec {
        let reg = usize::from(reg);
        let disp = Size::Word.sign_extend(u32::from(self.fetch_word(bus)));
        let value = if reg == 7 {
            self.regs.a[7].wrapping_sub(4)
        } else {
            self.regs.a[reg]
        };
        self.push_long(bus, value);
        self.regs.a[reg] = self.regs.a[7];
        self.regs.a[7] = self.regs.a[7].wrapping_add(disp);
        Ok(0)
    }

    pub(super) fn exec_unlk(&mut self, bus: &mut dyn M68kBus, reg: u8) -> Exec {
        let reg = usize::from(reg);
        self.regs.a[7] = self.regs.a[reg];
        let value = self.pop_long(bus);
        self.regs.a[reg] = value;
        Ok(0)
    }
}
