//! Effective address resolution.
//!
//! An operand is resolved exactly once per instruction into an
//! [`Operand`]. Resolution fetches the extension words and applies the
//! (An)+ and -(An) side effects, so a read-modify-write reads and writes
//! the same place and the register moves only once.

use crate::addressing::AddrMode;
use crate::alu::Size;
use crate::bus::M68kBus;
use crate::cpu::Cpu68000;

/// A resolved operand location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Operand {
    DataReg(usize),
    AddrReg(usize),
    /// Memory at an address. `descending` marks -(An), where long writes
    /// store the low word first.
    Memory { address: u32, descending: bool },
    /// Immediate data, already fetched.
    Immediate(u32),
}

impl Operand {
    /// The memory address, for control-mode operands.
    pub(crate) fn address(self) -> Option<u32> {
        match self {
            Self::Memory { address, .. } => Some(address),
            _ => None,
        }
    }
}

/// Address register step for (An)+ and -(An). A7 stays word aligned.
fn step(reg: usize, size: Size) -> u32 {
    if reg == 7 && size == Size::Byte {
        2
    } else {
        size.bytes()
    }
}

fn memory(address: u32) -> Operand {
    Operand::Memory {
        address,
        descending: false,
    }
}

impl Cpu68000 {
    /// Resolve `mode` for an access of `size`.
    pub(crate) fn resolve(&mut self, bus: &mut dyn M68kBus, mode: AddrMode, size: Size) -> Operand {
        match mode {
            AddrMode::DataReg(r) => Operand::DataReg(usize::from(r)),
            AddrMode::AddrReg(r) => Operand::AddrReg(usize::from(r)),
            AddrMode::AddrInd(r) => memory(self.regs.a[usize::from(r)]),
            AddrMode::AddrIndPostInc(r) => {
                let r = usize::from(r);
                let address = self.regs.a[r];
                self.regs.a[r] = address.wrapping_add(step(r, size));
                memory(address)
            }
            AddrMode::AddrIndPreDec(r) => {
                let r = usize::from(r);
                let address = self.regs.a[r].wrapping_sub(step(r, size));
                self.regs.a[r] = address;
                Operand::Memory {
                    address,
                    descending: true,
                }
            }
            AddrMode::AddrIndDisp(r) => {
                let disp = Size::Word.sign_extend(u32::from(self.fetch_word(bus)));
                memory(self.regs.a[usize::from(r)].wrapping_add(disp))
            }
            AddrMode::AddrIndIndex(r) => {
                let base = self.regs.a[usize::from(r)];
                let address = self.indexed(bus, base);
                memory(address)
            }
            AddrMode::AbsShort => {
                memory(Size::Word.sign_extend(u32::from(self.fetch_word(bus))))
            }
            AddrMode::AbsLong => memory(self.fetch_long(bus)),
            AddrMode::PcDisp => {
                let base = self.regs.pc;
                let disp = Size::Word.sign_extend(u32::from(self.fetch_word(bus)));
                memory(base.wrapping_add(disp))
            }
            AddrMode::PcIndex => {
                let base = self.regs.pc;
                let address = self.indexed(bus, base);
                memory(address)
            }
            AddrMode::Immediate => Operand::Immediate(self.fetch_immediate(bus, size)),
        }
    }

    /// Immediate data from the instruction stream. Byte immediates occupy
    /// a whole word and use its low byte.
    pub(crate) fn fetch_immediate(&mut self, bus: &mut dyn M68kBus, size: Size) -> u32 {
        match size {
            Size::Byte => u32::from(self.fetch_word(bus)) & 0xFF,
            Size::Word => u32::from(self.fetch_word(bus)),
            Size::Long => self.fetch_long(bus),
        }
    }

    /// Address of a control-mode operand (LEA, PEA, JMP, JSR, MOVEM).
    pub(crate) fn control_address(&mut self, bus: &mut dyn M68kBus, mode: AddrMode) -> u32 {
        // The decoder only admits control modes here, which always resolve
        // to memory.
        self.resolve(bus, mode, Size::Long).address().unwrap_or_default()
    }

    /// Brief extension word: 8-bit displacement plus a D or A index
    /// register, sign-extended word or full long.
    fn indexed(&mut self, bus: &mut dyn M68kBus, base: u32) -> u32 {
        let ext = self.fetch_word(bus);
        let disp = Size::Byte.sign_extend(u32::from(ext));
        let reg = usize::from((ext >> 12) & 7);
        let index = if ext & 0x8000 != 0 {
            self.regs.a[reg]
        } else {
            self.regs.d[reg]
        };
        let index = if ext & 0x0800 != 0 {
            index
        } else {
            Size::Word.sign_extend(index)
        };
        base.wrapping_add(disp).wrapping_add(index)
    }

    pub(crate) fn read_operand(&mut self, bus: &mut dyn M68kBus, operand: Operand, size: Size) -> u32 {
        match operand {
            Operand::DataReg(r) => self.regs.d_sized(r, size),
            Operand::AddrReg(r) => self.regs.a[r] & size.mask(),
            Operand::Memory { address, .. } => self.read(bus, address, size),
            Operand::Immediate(value) => value,
        }
    }

    pub(crate) fn write_operand(
        &mut self,
        bus: &mut dyn M68kBus,
        operand: Operand,
        size: Size,
        value: u32,
    ) {
        match operand {
            Operand::DataReg(r) => self.regs.set_d_sized(r, size, value),
            Operand::AddrReg(r) => self.regs.set_a_sized(r, size, value),
            Operand::Memory {
                address,
                descending: true,
            } if size == Size::Long => self.write_long_descending(bus, address, value),
            Operand::Memory { address, .. } => self.write(bus, address, size, value),
            // Immediate destinations are illegal encodings.
            Operand::Immediate(_) => {}
        }
    }

    /// Resolve and read in one go, for source operands.
    pub(crate) fn read_ea(&mut self, bus: &mut dyn M68kBus, mode: AddrMode, size: Size) -> u32 {
        let operand = self.resolve(bus, mode, size);
        self.read_operand(bus, operand, size)
    }

    /// Resolve and write in one go, for pure destinations.
    pub(crate) fn write_ea(&mut self, bus: &mut dyn M68kBus, mode: AddrMode, size: Size, value: u32) {
        let operand = self.resolve(bus, mode, size);
        self.write_operand(bus, operand, size, value);
    }
}
