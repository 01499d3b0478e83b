//! Motorola 68000 interpreter core.
//!
//! # Execution model
//!
//! Each instruction is one table lookup and one handler call. The opcode
//! indexes the shared dispatch table in [`decode`](crate::decode), the
//! handler runs the whole instruction against the bus, and the driver
//! charges the entry's static cost plus whatever the handler reports.
//!
//! [`execute`](Cpu68000::execute) runs instructions until the cycle budget
//! is used up. The budget is a countdown: an instruction is started while
//! any budget remains, so a slice can overrun by the cost of its last
//! instruction. Bus devices see the remaining budget on every data access
//! and may shorten or extend it.
//!
//! Interrupts are sampled before each instruction fetch. While the CPU is
//! stopped (after STOP) or halted by the host, a call to `execute` consumes
//! its whole budget unless an interrupt wakes the CPU.

use emu_core::Cpu;
use log::{debug, trace};

use crate::alu::Size;
use crate::bus::{FunctionCode, M68kBus};
use crate::config::{ConfigError, CpuConfig};
use crate::decode::{self, Op};
use crate::exceptions::{self, AccessFault, BusFault, ExceptionRequest, Outcome};
use crate::idle::{IdleDetector, IdleStats};
use crate::registers::Registers;
use crate::timing;

/// Whether the CPU is fetching instructions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RunState {
    #[default]
    Running,
    /// Executed STOP; waits for an interrupt above the mask.
    Stopped,
    /// Held by the host; only [`Cpu68000::set_halted`] releases it.
    Halted,
}

/// Motorola 68000 CPU.
#[derive(Debug, Clone)]
pub struct Cpu68000 {
    /// CPU registers.
    pub regs: Registers,
    pub(crate) config: CpuConfig,
    pub(crate) state: RunState,
    /// Instruction register: the opcode being executed.
    pub(crate) opcode: u16,
    /// Address of the opcode being executed.
    pub(crate) opcode_pc: u32,
    /// Remaining budget of the current slice.
    pub(crate) cycles_left: i32,
    pub(crate) total_cycles: u64,
    /// IPL level seen at the last boundary, for level 7 edge detection.
    pub(crate) last_irq_level: u8,
    pub(crate) idle: IdleDetector,
}

impl Default for Cpu68000 {
    fn default() -> Self {
        Self::new()
    }
}

impl Cpu68000 {
    /// Create a CPU with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::build(CpuConfig::default())
    }

    /// Create a CPU with a validated configuration.
    pub fn with_config(config: CpuConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: CpuConfig) -> Self {
        // Build the dispatch table now rather than inside the first slice.
        let _ = decode::table();
        Self {
            regs: Registers::new(),
            config,
            state: RunState::Running,
            opcode: 0,
            opcode_pc: 0,
            cycles_left: 0,
            total_cycles: 0,
            last_irq_level: 0,
            idle: IdleDetector::default(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &CpuConfig {
        &self.config
    }

    #[must_use]
    pub fn run_state(&self) -> RunState {
        self.state
    }

    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.state == RunState::Stopped
    }

    /// Hold or release the CPU. A held CPU executes nothing and consumes
    /// every slice it is given.
    pub fn set_halted(&mut self, halted: bool) {
        if halted {
            self.state = RunState::Halted;
        } else if self.state == RunState::Halted {
            self.state = RunState::Running;
        }
    }

    /// Cycles consumed since creation.
    #[must_use]
    pub fn total_cycles(&self) -> u64 {
        self.total_cycles
    }

    /// The opcode of the instruction executed last.
    #[must_use]
    pub fn opcode(&self) -> u16 {
        self.opcode
    }

    /// Remaining budget of the running slice, for bus devices that call
    /// back into the host.
    #[must_use]
    pub fn cycles_left(&self) -> i32 {
        self.cycles_left
    }

    #[must_use]
    pub fn idle_stats(&self) -> IdleStats {
        self.idle.stats()
    }

    /// Reset: supervisor mode, interrupt mask 7, trace off, then SSP from
    /// address 0 and PC from address 4.
    pub fn reset(&mut self, bus: &mut dyn M68kBus) {
        self.regs = Registers::new();
        self.state = RunState::Running;
        self.last_irq_level = 0;
        self.idle.clear();
        let ssp = self.read(bus, 0, Size::Long);
        let pc = self.read(bus, 4, Size::Long);
        self.regs.a[7] = ssp;
        self.regs.pc = pc;
        debug!(
            "{}: reset, SSP=${ssp:08X} PC=${pc:08X}",
            self.config.instance
        );
    }

    /// Run for `budget` cycles and return the cycles consumed.
    ///
    /// Stops early only when the CPU stops or halts, in which case the
    /// whole budget counts as consumed.
    pub fn execute(&mut self, bus: &mut dyn M68kBus, budget: i32) -> i32 {
        self.cycles_left = budget;
        while self.cycles_left > 0 {
            let cost = self.step_instruction(bus);
            self.cycles_left -= cost;
            if self.state != RunState::Running {
                self.cycles_left = self.cycles_left.min(0);
                break;
            }
        }
        let consumed = budget - self.cycles_left;
        self.cycles_left = 0;
        self.total_cycles += u64::try_from(consumed).unwrap_or(0);
        consumed
    }

    /// Execute one instruction, or take one pending interrupt, and return
    /// its cost. Returns 0 if the CPU is halted, or stopped with nothing to
    /// wake it.
    pub fn step(&mut self, bus: &mut dyn M68kBus) -> i32 {
        let cost = self.step_instruction(bus);
        self.total_cycles += u64::try_from(cost).unwrap_or(0);
        cost
    }

    /// Raise a bus or address error reported by the host, as if the
    /// current instruction's access had faulted. Returns the cost.
    pub fn inject_fault(&mut self, bus: &mut dyn M68kBus, fault: BusFault) -> i32 {
        let fc = FunctionCode::from_flags(self.regs.is_supervisor(), fault.instruction);
        let request = ExceptionRequest::new(fault.vector, self.regs.pc, self.regs.sr()).with_access(
            AccessFault {
                address: fault.address,
                info: AccessFault::status(fault.read, fault.instruction, fc),
                ir: self.opcode,
            },
        );
        debug!(
            "{}: injected fault vector {} at ${:08X}",
            self.config.instance, fault.vector, fault.address
        );
        if self.state == RunState::Stopped {
            self.state = RunState::Running;
        }
        self.process_exception(bus, &request);
        let cost = timing::exception_cycles(fault.vector);
        self.total_cycles += u64::try_from(cost).unwrap_or(0);
        cost
    }

    /// One boundary: interrupt check, then fetch, dispatch and charge.
    /// Does not touch `cycles_left`; the caller debits the returned cost.
    fn step_instruction(&mut self, bus: &mut dyn M68kBus) -> i32 {
        match self.state {
            RunState::Halted => return 0,
            RunState::Stopped => {
                let Some(level) = self.pending_interrupt(bus) else {
                    return 0;
                };
                self.state = RunState::Running;
                self.take_interrupt(bus, level);
                return timing::INTERRUPT_CYCLES;
            }
            RunState::Running => {}
        }

        if let Some(level) = self.pending_interrupt(bus) {
            self.take_interrupt(bus, level);
            return timing::INTERRUPT_CYCLES;
        }

        let tracing = self.config.emulate_trace && self.regs.trace;
        self.opcode_pc = self.regs.pc;
        self.opcode = self.fetch_word(bus);
        let entry = decode::lookup(self.opcode);

        let outcome = if entry.op.is_privileged() && !self.regs.is_supervisor() {
            Outcome::Faulted(self.fault_at_opcode(exceptions::PRIVILEGE_VIOLATION))
        } else {
            self.dispatch(bus, entry.op)
        };

        match outcome {
            Outcome::Normal(extra) => {
                let mut cost = i32::from(entry.cycles) + extra;
                if self.config.idle_loop_skip {
                    cost += self.skip_idle_loop(bus, entry.op, cost);
                }
                if tracing {
                    // A traced STOP does not stop.
                    self.state = RunState::Running;
                    let request = self.fault_after(exceptions::TRACE);
                    self.process_exception(bus, &request);
                    cost += timing::exception_cycles(exceptions::TRACE);
                }
                cost
            }
            Outcome::Faulted(request) => {
                trace!(
                    "{}: ${:08X} {:04X} faulted with vector {}",
                    self.config.instance, self.opcode_pc, self.opcode, request.vector
                );
                self.process_exception(bus, &request);
                timing::exception_cycles(request.vector) + request.cycles
            }
        }
    }

    /// If the branch just taken closes a recognised busy-wait loop, return
    /// the rest of the slice as extra cost.
    fn skip_idle_loop(&mut self, bus: &mut dyn M68kBus, op: Op, cost: i32) -> i32 {
        let Op::Branch { cond, disp } = op else {
            return 0;
        };
        let remaining = self.cycles_left - cost;
        if remaining <= 0 || self.regs.pc >= self.opcode_pc {
            return 0;
        }
        if !self.idle.is_idle_loop(bus, self.opcode_pc, cond, disp) {
            return 0;
        }
        self.idle.record_skip(remaining);
        remaining
    }

    // --- Bus access ---
    //
    // Data accesses are masked to the configured address width and
    // bracketed by the bus I/O hooks. Fetches are neither hooked nor
    // counted against the budget separately.

    pub(crate) fn mask(&self, address: u32) -> u32 {
        address & self.config.address_mask
    }

    pub(crate) fn read(&mut self, bus: &mut dyn M68kBus, address: u32, size: Size) -> u32 {
        let address = self.mask(address);
        bus.begin_io(self.cycles_left);
        let value = match size {
            Size::Byte => u32::from(bus.read_byte(address)),
            Size::Word => u32::from(bus.read_word(address)),
            Size::Long => bus.read_long(address),
        };
        self.cycles_left = bus.end_io(self.cycles_left);
        value
    }

    pub(crate) fn write(&mut self, bus: &mut dyn M68kBus, address: u32, size: Size, value: u32) {
        let address = self.mask(address);
        bus.begin_io(self.cycles_left);
        match size {
            Size::Byte => bus.write_byte(address, value as u8),
            Size::Word => bus.write_word(address, value as u16),
            Size::Long => bus.write_long(address, value),
        }
        self.cycles_left = bus.end_io(self.cycles_left);
    }

    /// Long write for -(An) destinations and pushes: low word first, as
    /// the hardware does when it walks down the stack.
    pub(crate) fn write_long_descending(&mut self, bus: &mut dyn M68kBus, address: u32, value: u32) {
        let address = self.mask(address);
        bus.begin_io(self.cycles_left);
        bus.write_word(self.mask(address.wrapping_add(2)), value as u16);
        bus.write_word(address, (value >> 16) as u16);
        self.cycles_left = bus.end_io(self.cycles_left);
    }

    pub(crate) fn fetch_word(&mut self, bus: &mut dyn M68kBus) -> u16 {
        let word = bus.fetch_word(self.mask(self.regs.pc));
        self.regs.pc = self.regs.pc.wrapping_add(2);
        word
    }

    pub(crate) fn fetch_long(&mut self, bus: &mut dyn M68kBus) -> u32 {
        let hi = self.fetch_word(bus);
        let lo = self.fetch_word(bus);
        (u32::from(hi) << 16) | u32::from(lo)
    }

    pub(crate) fn push_word(&mut self, bus: &mut dyn M68kBus, value: u16) {
        self.regs.a[7] = self.regs.a[7].wrapping_sub(2);
        self.write(bus, self.regs.a[7], Size::Word, u32::from(value));
    }

    pub(crate) fn push_long(&mut self, bus: &mut dyn M68kBus, value: u32) {
        self.regs.a[7] = self.regs.a[7].wrapping_sub(4);
        self.write_long_descending(bus, self.regs.a[7], value);
    }

    pub(crate) fn pop_word(&mut self, bus: &mut dyn M68kBus) -> u16 {
        let value = self.read(bus, self.regs.a[7], Size::Word) as u16;
        self.regs.a[7] = self.regs.a[7].wrapping_add(2);
        value
    }

    pub(crate) fn pop_long(&mut self, bus: &mut dyn M68kBus) -> u32 {
        let value = self.read(bus, self.regs.a[7], Size::Long);
        self.regs.a[7] = self.regs.a[7].wrapping_add(4);
        value
    }

    /// Jump to `target`, or produce the address error an odd target raises
    /// when branch checking is on.
    pub(crate) fn jump(&mut self, target: u32) -> Result<(), ExceptionRequest> {
        if target & 1 != 0 && self.config.check_branches {
            return Err(self.odd_target(target));
        }
        self.regs.pc = target;
        Ok(())
    }
}

impl<B: M68kBus> Cpu<B> for Cpu68000 {
    type Registers = Registers;

    fn run(&mut self, bus: &mut B, budget: i32) -> i32 {
        self.execute(bus, budget)
    }

    fn step(&mut self, bus: &mut B) -> i32 {
        Cpu68000::step(self, bus)
    }

    fn reset(&mut self, bus: &mut B) {
        Cpu68000::reset(self, bus);
    }

    fn pc(&self) -> u32 {
        self.regs.pc
    }

    fn registers(&self) -> Registers {
        self.regs
    }

    fn is_halted(&self) -> bool {
        self.state != RunState::Running
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use emu_core::SimpleBus;

    fn bus_with_vectors() -> SimpleBus {
        let mut bus = SimpleBus::new(0x10000);
        bus.poke_long(0, 0x8000);
        bus.poke_long(4, 0x1000);
        bus
    }

    #[test]
    fn reset_loads_stack_and_pc() {
        let mut bus = bus_with_vectors();
        let mut cpu = Cpu68000::new();
        cpu.reset(&mut bus);
        assert_eq!(cpu.regs.a[7], 0x8000);
        assert_eq!(cpu.regs.pc, 0x1000);
        assert_eq!(cpu.regs.sr(), 0x2700);
    }

    #[test]
    fn with_config_rejects_invalid() {
        let config = CpuConfig::default().with_address_mask(0x0F0F_FFFF);
        assert!(Cpu68000::with_config(config).is_err());
    }

    #[test]
    fn halted_cpu_consumes_budget() {
        let mut bus = bus_with_vectors();
        let mut cpu = Cpu68000::new();
        cpu.reset(&mut bus);
        cpu.set_halted(true);
        assert_eq!(cpu.execute(&mut bus, 100), 100);
        assert_eq!(cpu.regs.pc, 0x1000);
        cpu.set_halted(false);
        assert_eq!(cpu.run_state(), RunState::Running);
    }

    #[test]
    fn masked_address_wraps() {
        let mut bus = SimpleBus::new(0x100_0000);
        let mut cpu = Cpu68000::new();
        cpu.write(&mut bus, 0xFF00_1000, Size::Word, 0xBEEF);
        assert_eq!(bus.peek_word(0x1000), 0xBEEF);
    }
}
