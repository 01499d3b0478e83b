//! Program control: branches, jumps, returns, traps and the system
//! instructions.

use log::debug;

use super::Exec;
use crate::addressing::AddrMode;
use crate::alu::Size;
use crate::bus::M68kBus;
use crate::cpu::{Cpu68000, RunState};
use crate::decode::Op;
use crate::exceptions;

impl Cpu68000 {
    /// Illegal encodings and the unimplemented line A and line F groups.
    /// The stacked PC is the opcode's own address.
    pub(super) fn exec_unimplemented(&mut self, op: Op) -> Exec {
        let vector = match op {
            Op::LineA => exceptions::LINE_A,
            Op::LineF => exceptions::LINE_F,
            _ => exceptions::ILLEGAL_INSTRUCTION,
        };
        Err(self.fault_at_opcode(vector))
    }

    /// BRA, BSR and Bcc. A zero byte displacement means a word
    /// displacement follows. Displacements are relative to the address
    /// after the opcode.
    ///
    /// Bcc costs 2 more when taken, and 4 more when not taken with a word
    /// displacement.
    pub(super) fn exec_branch(&mut self, bus: &mut dyn M68kBus, cond: u8, disp: u8) -> Exec {
        let base = self.regs.pc;
        let word = disp == 0;
        let offset = if word {
            Size::Word.sign_extend(u32::from(self.fetch_word(bus)))
        } else {
            Size::Byte.sign_extend(u32::from(disp))
        };
        let target = base.wrapping_add(offset);

        match cond {
            0 => {
                self.jump(target)?;
                Ok(0)
            }
            1 => {
                let ret = self.regs.pc;
                self.push_long(bus, ret);
                self.jump(target)?;
                Ok(0)
            }
            _ if self.regs.flags.condition(cond) => {
                self.jump(target)?;
                Ok(2)
            }
            _ => Ok(if word { 4 } else { 0 }),
        }
    }

    /// DBcc: if the condition is false, decrement Dn.W and loop unless it
    /// reached -1.
    pub(super) fn exec_dbcc(&mut self, bus: &mut dyn M68kBus, cond: u8, reg: u8) -> Exec {
        let base = self.regs.pc;
        let offset = Size::Word.sign_extend(u32::from(self.fetch_word(bus)));
        if self.regs.flags.condition(cond) {
            return Ok(2);
        }
        let reg = usize::from(reg);
        let counter = self.regs.d_sized(reg, Size::Word).wrapping_sub(1) & 0xFFFF;
        self.regs.set_d_sized(reg, Size::Word, counter);
        if counter == 0xFFFF {
            return Ok(4);
        }
        self.jump(base.wrapping_add(offset))?;
        Ok(0)
    }

    pub(super) fn exec_jmp(&mut self, bus: &mut dyn M68kBus, dst: AddrMode) -> Exec {
        let target = self.control_address(bus, dst);
        self.jump(target)?;
        Ok(0)
    }

    pub(super) fn exec_jsr(&mut self, bus: &mut dyn M68kBus, dst: AddrMode) -> Exec {
        let target = self.control_address(bus, dst);
        let ret = self.regs.pc;
        self.push_long(bus, ret);
        self.jump(target)?;
        Ok(0)
    }

    pub(super) fn exec_rts(&mut self, bus: &mut dyn M68kBus) -> Exec {
        let target = self.pop_long(bus);
        self.jump(target)?;
        Ok(0)
    }

    pub(super) fn exec_rtr(&mut self, bus: &mut dyn M68kBus) -> Exec {
        let ccr = self.pop_word(bus);
        self.regs.set_ccr(ccr as u8);
        let target = self.pop_long(bus);
        self.jump(target)?;
        Ok(0)
    }

    /// RTE: both words come off the supervisor stack before the new SR
    /// can switch stacks.
    pub(super) fn exec_rte(&mut self, bus: &mut dyn M68kBus) -> Exec {
        let sr = self.pop_word(bus);
        let target = self.pop_long(bus);
        self.regs.set_sr(sr);
        self.jump(target)?;
        Ok(0)
    }

    pub(super) fn exec_trap(&mut self, n: u8) -> Exec {
        Err(self.fault_after(exceptions::TRAP_BASE + n))
    }

    pub(super) fn exec_trapv(&mut self) -> Exec {
        if self.regs.flags.v {
            return Err(self.fault_after(exceptions::TRAPV));
        }
        Ok(0)
    }

    /// RESET pulses the reset line. The CPU's own state is unchanged.
    pub(super) fn exec_reset(&mut self, bus: &mut dyn M68kBus) -> Exec {
        debug!(
            "{}: RESET instruction at ${:08X}",
            self.config.instance, self.opcode_pc
        );
        bus.reset_devices();
        Ok(0)
    }

    /// STOP #imm: load SR and wait for an interrupt above the new mask.
    pub(super) fn exec_stop(&mut self, bus: &mut dyn M68kBus) -> Exec {
        let sr = self.fetch_word(bus);
        self.regs.set_sr(sr);
        self.state = RunState::Stopped;
        debug!(
            "{}: STOP #${sr:04X} at ${:08X}",
            self.config.instance, self.opcode_pc
        );
        Ok(0)
    }
}
