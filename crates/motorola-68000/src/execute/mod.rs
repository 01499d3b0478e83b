//! Instruction handlers.
//!
//! One handler per operation family, grouped by file. A handler runs the
//! whole instruction, fetching its own extension words, and returns the
//! cycles it spent beyond the encoding's static cost, or the exception the
//! instruction raised. Handlers never process exceptions themselves.

mod arith;
mod bits;
mod control;
mod moves;

use crate::bus::M68kBus;
use crate::cpu::Cpu68000;
use crate::decode::Op;
use crate::exceptions::{ExceptionRequest, Outcome};

/// What a handler returns: extra cycles, or the exception to take.
pub(crate) type Exec = Result<i32, ExceptionRequest>;

impl Cpu68000 {
    /// Run the handler for `op`. The opcode word has been fetched and the
    /// privilege gate passed.
    pub(crate) fn dispatch(&mut self, bus: &mut dyn M68kBus, op: Op) -> Outcome {
        let result = match op {
            Op::Illegal | Op::LineA | Op::LineF => self.exec_unimplemented(op),

            Op::Move { size, src, dst } => self.exec_move(bus, size, src, dst),
            Op::Movea { size, src, reg } => self.exec_movea(bus, size, src, reg),
            Op::Moveq { reg, data } => self.exec_moveq(reg, data),
            Op::MoveToCcr(src) => self.exec_move_to_ccr(bus, src),
            Op::MoveToSr(src) => self.exec_move_to_sr(bus, src),
            Op::MoveFromSr(dst) => self.exec_move_from_sr(bus, dst),
            Op::MoveUsp { to_usp, reg } => self.exec_move_usp(to_usp, reg),
            Op::Movem {
                size,
                to_memory,
                mode,
            } => self.exec_movem(bus, size, to_memory, mode),
            Op::Movep {
                size,
                to_memory,
                dreg,
                areg,
            } => self.exec_movep(bus, size, to_memory, dreg, areg),
            Op::Lea { src, reg } => self.exec_lea(bus, src, reg),
            Op::Pea(src) => self.exec_pea(bus, src),
            Op::Exg { mode, rx, ry } => self.exec_exg(mode, rx, ry),
            Op::Swap(reg) => self.exec_swap(reg),
            Op::Ext { size, reg } => self.exec_ext(size, reg),
            Op::Link(reg) => self.exec_link(bus, reg),
            Op::Unlk(reg) => self.exec_unlk(bus, reg),

            Op::Alu {
                op,
                size,
                ea,
                reg,
                to_ea,
            } => self.exec_alu(bus, op, size, ea, reg, to_ea),
            Op::AluAddr { op, size, src, reg } => self.exec_alu_addr(bus, op, size, src, reg),
            Op::AluImm { op, size, dst } => self.exec_alu_imm(bus, op, size, dst),
            Op::ImmToCcr(op) => self.exec_imm_to_ccr(bus, op),
            Op::ImmToSr(op) => self.exec_imm_to_sr(bus, op),
            Op::Quick {
                sub,
                size,
                data,
                dst,
            } => self.exec_quick(bus, sub, size, data, dst),
            Op::Extended {
                op,
                size,
                rx,
                ry,
                memory,
            } => self.exec_extended(bus, op, size, rx, ry, memory),
            Op::Cmpm { size, ax, ay } => self.exec_cmpm(bus, size, ax, ay),
            Op::Unary { op, size, dst } => self.exec_unary(bus, op, size, dst),
            Op::Tst { size, src } => self.exec_tst(bus, size, src),
            Op::Nbcd(dst) => self.exec_nbcd(bus, dst),
            Op::Tas(dst) => self.exec_tas(bus, dst),
            Op::Scc { cond, dst } => self.exec_scc(bus, cond, dst),
            Op::Mul { signed, src, reg } => self.exec_mul(bus, signed, src, reg),
            Op::Div { signed, src, reg } => self.exec_div(bus, signed, src, reg),
            Op::Chk { src, reg } => self.exec_chk(bus, src, reg),

            Op::Bit { op, source, dst } => self.exec_bit(bus, op, source, dst),
            Op::ShiftReg {
                kind,
                left,
                size,
                count,
                reg,
            } => self.exec_shift_reg(kind, left, size, count, reg),
            Op::ShiftMem { kind, left, dst } => self.exec_shift_mem(bus, kind, left, dst),

            Op::Branch { cond, disp } => self.exec_branch(bus, cond, disp),
            Op::Dbcc { cond, reg } => self.exec_dbcc(bus, cond, reg),
            Op::Jmp(dst) => self.exec_jmp(bus, dst),
            Op::Jsr(dst) => self.exec_jsr(bus, dst),
            Op::Rts => self.exec_rts(bus),
            Op::Rtr => self.exec_rtr(bus),
            Op::Rte => self.exec_rte(bus),
            Op::Trap(n) => self.exec_trap(n),
            Op::Trapv => self.exec_trapv(),
            Op::Reset => self.exec_reset(bus),
            Op::Stop => self.exec_stop(bus),
            Op::Nop => Ok(0),
        };
        Outcome::from(result)
    }
}
