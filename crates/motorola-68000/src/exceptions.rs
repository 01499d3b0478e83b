//! Exception processing.
//!
//! Handlers never jump into exception processing themselves. A handler
//! that hits a trap, a divide by zero or an odd branch target returns an
//! [`ExceptionRequest`], and the driver turns it into a stack frame and a
//! vector fetch. Interrupts and trace are raised the same way by the
//! driver at instruction boundaries.
//!
//! Frame layout, lowest address first:
//! - group 1/2: SR, PC
//! - group 0 (bus and address error): status word, access address, IR,
//!   SR, PC

use log::{debug, trace, warn};

use crate::alu::Size;
use crate::bus::{FunctionCode, InterruptAck, M68kBus};
use crate::cpu::Cpu68000;

pub const BUS_ERROR: u8 = 2;
pub const ADDRESS_ERROR: u8 = 3;
pub const ILLEGAL_INSTRUCTION: u8 = 4;
pub const ZERO_DIVIDE: u8 = 5;
pub const CHK: u8 = 6;
pub const TRAPV: u8 = 7;
pub const PRIVILEGE_VIOLATION: u8 = 8;
pub const TRACE: u8 = 9;
pub const LINE_A: u8 = 10;
pub const LINE_F: u8 = 11;
pub const UNINITIALIZED_INTERRUPT: u8 = 15;
pub const SPURIOUS_INTERRUPT: u8 = 24;
/// Level 1 autovector; level n uses `AUTOVECTOR_BASE + n - 1`.
pub const AUTOVECTOR_BASE: u8 = 25;
/// TRAP #0; TRAP #n uses `TRAP_BASE + n`.
pub const TRAP_BASE: u8 = 32;

/// Extra information stacked by address and bus errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessFault {
    /// The address of the faulting access.
    pub address: u32,
    /// Status word: R/W in bit 4, instruction/not in bit 3, function code
    /// in bits 0-2.
    pub info: u16,
    /// Instruction register at the time of the fault.
    pub ir: u16,
}

impl AccessFault {
    /// Build the status word for an access.
    #[must_use]
    pub fn status(read: bool, instruction: bool, fc: FunctionCode) -> u16 {
        let mut info = u16::from(fc.bits());
        if read {
            info |= 0x10;
        }
        if !instruction {
            info |= 0x08;
        }
        info
    }
}

/// A pending exception, produced by a handler or by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExceptionRequest {
    pub vector: u8,
    /// Program counter to stack.
    pub pc: u32,
    /// Status register to stack, captured before the exception changes it.
    pub sr: u16,
    /// Cycles spent by the instruction before it faulted, charged on top of
    /// the exception's own cost.
    pub cycles: i32,
    /// Present for bus and address errors.
    pub access: Option<AccessFault>,
}

impl ExceptionRequest {
    #[must_use]
    pub fn new(vector: u8, pc: u32, sr: u16) -> Self {
        Self {
            vector,
            pc,
            sr,
            cycles: 0,
            access: None,
        }
    }

    #[must_use]
    pub fn with_cycles(mut self, cycles: i32) -> Self {
        self.cycles = cycles;
        self
    }

    #[must_use]
    pub fn with_access(mut self, access: AccessFault) -> Self {
        self.access = Some(access);
        self
    }
}

/// Result of executing one instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Completed. Carries the cycles spent beyond the encoding's static
    /// cost.
    Normal(i32),
    /// Ended in an exception, which the driver processes.
    Faulted(ExceptionRequest),
}

impl From<Result<i32, ExceptionRequest>> for Outcome {
    fn from(result: Result<i32, ExceptionRequest>) -> Self {
        match result {
            Ok(extra) => Self::Normal(extra),
            Err(request) => Self::Faulted(request),
        }
    }
}

/// A bus or address error reported by the host, see
/// [`Cpu68000::inject_fault`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusFault {
    /// [`BUS_ERROR`] or [`ADDRESS_ERROR`].
    pub vector: u8,
    pub address: u32,
    /// True if the faulting access was a read.
    pub read: bool,
    /// True if the faulting access was an instruction fetch.
    pub instruction: bool,
}

impl Cpu68000 {
    /// Build the frame for `request` and jump through its vector.
    ///
    /// The vector is read before anything is pushed. The caller charges the
    /// cycles.
    pub(crate) fn process_exception(&mut self, bus: &mut dyn M68kBus, request: &ExceptionRequest) {
        let vector_address = u32::from(request.vector) * 4;
        let mut target = self.read(bus, vector_address, Size::Long);

        self.regs.trace = false;
        self.regs.set_supervisor(true);
        self.push_long(bus, request.pc);
        self.push_word(bus, request.sr);
        if let Some(access) = request.access {
            self.push_word(bus, access.ir);
            self.push_long(bus, access.address);
            self.push_word(bus, access.info);
        }

        if target & 1 != 0 && self.config.check_branches {
            warn!(
                "{}: vector {} points to odd address ${target:08X}",
                self.config.instance, request.vector
            );
            target &= !1;
        }
        trace!(
            "{}: exception {} from ${:08X} to ${target:08X}",
            self.config.instance, request.vector, request.pc
        );
        self.regs.pc = target;
    }

    /// Request for an exception whose stacked PC is the faulting opcode.
    pub(crate) fn fault_at_opcode(&self, vector: u8) -> ExceptionRequest {
        ExceptionRequest::new(vector, self.opcode_pc, self.regs.sr())
    }

    /// Request for an exception whose stacked PC is the next instruction.
    pub(crate) fn fault_after(&self, vector: u8) -> ExceptionRequest {
        ExceptionRequest::new(vector, self.regs.pc, self.regs.sr())
    }

    /// Address error for a branch, jump or return to an odd address.
    pub(crate) fn odd_target(&self, target: u32) -> ExceptionRequest {
        warn!(
            "{}: ${:08X} transfers control to odd address ${target:08X}",
            self.config.instance, self.opcode_pc
        );
        let fc = FunctionCode::from_flags(self.regs.is_supervisor(), true);
        ExceptionRequest::new(ADDRESS_ERROR, target, self.regs.sr()).with_access(AccessFault {
            address: target,
            info: AccessFault::status(true, true, fc),
            ir: self.opcode,
        })
    }

    /// Whether a request at `level` would be taken before the next
    /// instruction. Changes nothing, so hosts can ask before raising a line.
    ///
    /// A level above the mask is taken. Level 7 cannot be masked, but is
    /// only taken on the transition to 7, so a held line does not re-enter
    /// its handler forever.
    #[must_use]
    pub fn would_interrupt(&self, level: u8) -> bool {
        let level = level & 7;
        let nmi_edge = level == 7 && self.last_irq_level != 7;
        level > self.regs.interrupt_mask() || nmi_edge
    }

    /// Level of an interrupt that should be taken now, if any. Records the
    /// level for level 7 edge detection.
    pub(crate) fn pending_interrupt(&mut self, bus: &mut dyn M68kBus) -> Option<u8> {
        let level = bus.pending_interrupt() & 7;
        let taken = self.would_interrupt(level);
        self.last_irq_level = level;
        taken.then_some(level)
    }

    /// Acknowledge and take an interrupt at `level`. The caller charges
    /// the cycles.
    pub(crate) fn take_interrupt(&mut self, bus: &mut dyn M68kBus, level: u8) {
        let vector = match bus.acknowledge_interrupt(level) {
            InterruptAck::Autovector => AUTOVECTOR_BASE + level - 1,
            InterruptAck::Vector(vector) => vector,
            InterruptAck::Spurious => SPURIOUS_INTERRUPT,
            InterruptAck::Uninitialized => UNINITIALIZED_INTERRUPT,
        };
        debug!(
            "{}: interrupt level {level} vector {vector}",
            self.config.instance
        );
        let request = ExceptionRequest::new(vector, self.regs.pc, self.regs.sr());
        self.process_exception(bus, &request);
        self.regs.set_interrupt_mask(level);
    }
}
