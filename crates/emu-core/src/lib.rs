//! Core traits and types shared by the interpreter crates.
//!
//! A CPU core only ever talks to its environment through [`Bus`]. Hosts
//! drive it through [`Cpu`] and inspect it through [`Observable`].

mod bus;
mod cpu;
mod observable;

pub use bus::{Bus, LoadError, SimpleBus};
pub use cpu::Cpu;
pub use observable::{Observable, Value};
