//! Motorola 68000 instruction-set interpreter.
//!
//! A table-driven interpreter for the MC68000: every opcode word is decoded
//! once into a shared 65,536-entry dispatch table, and each instruction is
//! a lookup plus one handler call. Memory and devices are reached through
//! [`M68kBus`]; timing is charged per instruction from the documented cycle
//! counts.
//!
//! ```
//! use emu_core::SimpleBus;
//! use motorola_68000::Cpu68000;
//!
//! let mut bus = SimpleBus::new(0x10000);
//! bus.poke_long(0, 0x8000); // initial SSP
//! bus.poke_long(4, 0x1000); // initial PC
//! bus.load_words(0x1000, &[0x7005, 0xD080]).unwrap(); // MOVEQ #5,D0; ADD.L D0,D0
//!
//! let mut cpu = Cpu68000::new();
//! cpu.reset(&mut bus);
//! cpu.step(&mut bus);
//! cpu.step(&mut bus);
//! assert_eq!(cpu.regs.d[0], 10);
//! ```

pub mod addressing;
pub mod alu;
pub mod bus;
pub mod config;
pub mod cpu;
pub mod decode;
mod ea;
pub mod exceptions;
mod execute;
pub mod flags;
mod idle;
mod observable;
pub mod registers;
pub mod state;
pub mod timing;

pub use bus::{FunctionCode, InterruptAck, M68kBus};
pub use config::{ConfigError, CpuConfig, InstanceId};
pub use cpu::{Cpu68000, RunState};
pub use exceptions::{AccessFault, BusFault, ExceptionRequest, Outcome};
pub use flags::Flags;
pub use idle::IdleStats;
pub use registers::Registers;
pub use state::{CpuState, StateError};
