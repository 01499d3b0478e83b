//! Shared test bus and program setup for the integration tests.

#![allow(dead_code)]

use emu_core::{Bus, SimpleBus};
use motorola_68000::{Cpu68000, CpuConfig, InterruptAck, M68kBus};

/// Initial supervisor stack pointer.
pub const STACK: u32 = 0x8000;
/// Where programs are loaded and reset starts.
pub const CODE: u32 = 0x1000;
/// Exception handlers: one 16-byte slot of NOPs per vector.
pub const HANDLERS: u32 = 0x4000;

/// Handler address installed for `vector`.
pub fn handler(vector: u8) -> u32 {
    HANDLERS + u32::from(vector) * 0x10
}

/// One bus event, in the order the CPU caused it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Begin,
    End,
    Fetch(u32),
    ReadByte(u32),
    ReadWord(u32),
    WriteByte(u32, u8),
    WriteWord(u32, u16),
}

/// Flat memory with an interrupt line, a reset counter and an event log.
pub struct TestBus {
    pub mem: SimpleBus,
    /// Level presented on IPL0-IPL2.
    pub irq_level: u8,
    /// Answer to the acknowledge cycle.
    pub ack: InterruptAck,
    /// Drop the request when it is acknowledged, like an edge-triggered
    /// device.
    pub clear_on_ack: bool,
    /// Levels acknowledged so far.
    pub acks: Vec<u8>,
    /// RESET instructions seen.
    pub resets: u32,
    /// Every access, when `logging` is on.
    pub events: Vec<Event>,
    pub logging: bool,
    /// When set, `end_io` ends the slice.
    pub cut_slice: bool,
    /// Budget reported to each `begin_io`.
    pub budgets: Vec<i32>,
}

impl TestBus {
    pub fn new() -> Self {
        Self {
            mem: SimpleBus::new(0x10_0000),
            irq_level: 0,
            ack: InterruptAck::Autovector,
            clear_on_ack: true,
            acks: Vec::new(),
            resets: 0,
            events: Vec::new(),
            logging: false,
            cut_slice: false,
            budgets: Vec::new(),
        }
    }

    fn log(&mut self, event: Event) {
        if self.logging {
            self.events.push(event);
        }
    }

    /// Data accesses only, without fetches and hooks.
    pub fn data_events(&self) -> Vec<Event> {
        self.events
            .iter()
            .copied()
            .filter(|e| !matches!(e, Event::Begin | Event::End | Event::Fetch(_)))
            .collect()
    }
}

impl Bus for TestBus {
    fn read_byte(&mut self, address: u32) -> u8 {
        self.log(Event::ReadByte(address));
        self.mem.read_byte(address)
    }

    fn read_word(&mut self, address: u32) -> u16 {
        self.log(Event::ReadWord(address));
        self.mem.read_word(address)
    }

    fn write_byte(&mut self, address: u32, value: u8) {
        self.log(Event::WriteByte(address, value));
        self.mem.write_byte(address, value);
    }

    fn write_word(&mut self, address: u32, value: u16) {
        self.log(Event::WriteWord(address, value));
        self.mem.write_word(address, value);
    }

    fn fetch_word(&mut self, address: u32) -> u16 {
        self.log(Event::Fetch(address));
        self.mem.read_word(address)
    }

    fn begin_io(&mut self, cycles_left: i32) {
        self.budgets.push(cycles_left);
        self.log(Event::Begin);
    }

    fn end_io(&mut self, cycles_left: i32) -> i32 {
        self.log(Event::End);
        if self.cut_slice { 0 } else { cycles_left }
    }
}

impl M68kBus for TestBus {
    fn pending_interrupt(&mut self) -> u8 {
        self.irq_level
    }

    fn acknowledge_interrupt(&mut self, level: u8) -> InterruptAck {
        self.acks.push(level);
        if self.clear_on_ack {
            self.irq_level = 0;
        }
        self.ack
    }

    fn reset_devices(&mut self) {
        self.resets += 1;
    }
}

/// A bus with the reset vectors, every exception vector pointing at its
/// own NOP-filled handler, and `program` at [`CODE`].
pub fn bus_with(program: &[u16]) -> TestBus {
    let mut bus = TestBus::new();
    bus.mem.poke_long(0, STACK);
    bus.mem.poke_long(4, CODE);
    for vector in 2..=255u8 {
        bus.mem.poke_long(u32::from(vector) * 4, handler(vector));
    }
    for address in (HANDLERS..handler(255) + 0x10).step_by(2) {
        bus.mem.poke_word(address, 0x4E71);
    }
    bus.mem.load_words(CODE, program).expect("program fits");
    bus
}

/// A reset CPU with the default configuration and its bus.
pub fn setup(program: &[u16]) -> (Cpu68000, TestBus) {
    setup_with(CpuConfig::default(), program)
}

pub fn setup_with(config: CpuConfig, program: &[u16]) -> (Cpu68000, TestBus) {
    let mut bus = bus_with(program);
    let mut cpu = Cpu68000::with_config(config).expect("valid config");
    cpu.reset(&mut bus);
    (cpu, bus)
}

/// Run one instruction of `program` after `init` has prepared the CPU.
/// Returns the CPU, the bus and the instruction's cost.
pub fn run_one(
    program: &[u16],
    init: impl FnOnce(&mut Cpu68000, &mut TestBus),
) -> (Cpu68000, TestBus, i32) {
    let (mut cpu, mut bus) = setup(program);
    init(&mut cpu, &mut bus);
    let cycles = cpu.step(&mut bus);
    (cpu, bus, cycles)
}

/// Word on the stack at `offset` bytes above A7.
pub fn stacked_word(cpu: &Cpu68000, bus: &TestBus, offset: u32) -> u16 {
    bus.mem.peek_word(cpu.regs.a[7] + offset)
}

/// Long on the stack at `offset` bytes above A7.
pub fn stacked_long(cpu: &Cpu68000, bus: &TestBus, offset: u32) -> u32 {
    bus.mem.peek_long(cpu.regs.a[7] + offset)
}
