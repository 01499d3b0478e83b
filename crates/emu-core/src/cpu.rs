//! CPU core trait.

use crate::Bus;

/// A CPU core driven by a cycle budget.
///
/// The bus is passed in, not owned, so it can be shared with other
/// components and so several cores can be stepped by one scheduler.
pub trait Cpu<B: Bus + ?Sized> {
    /// The type used for register inspection.
    type Registers;

    /// Run until at least `budget` cycles have been consumed, or the core
    /// stops or halts. Returns the cycles actually consumed, which may
    /// exceed the budget by the cost of the last instruction.
    fn run(&mut self, bus: &mut B, budget: i32) -> i32;

    /// Execute exactly one instruction (or one pending exception) and
    /// return its cost in cycles.
    fn step(&mut self, bus: &mut B) -> i32;

    /// Reset the CPU, loading its initial state through the bus.
    fn reset(&mut self, bus: &mut B);

    /// Returns the current program counter.
    fn pc(&self) -> u32;

    /// Returns a snapshot of all registers for inspection.
    fn registers(&self) -> Self::Registers;

    /// Returns true if the CPU will not execute until something external
    /// happens (an interrupt, or the host releasing it).
    fn is_halted(&self) -> bool;
}
