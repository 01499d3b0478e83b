//! Observable implementation for the 68000 CPU.

use emu_core::{Observable, Value};

use crate::cpu::{Cpu68000, RunState};

/// Query paths supported by the 68000.
const QUERY_PATHS: &[&str] = &[
    "d0", "d1", "d2", "d3", "d4", "d5", "d6", "d7",
    "a0", "a1", "a2", "a3", "a4", "a5", "a6", "a7",
    "usp", "ssp",
    "pc",
    "sr", "ccr",
    "flags.x", "flags.n", "flags.z", "flags.v", "flags.c", "flags.s", "flags.t",
    "int_mask",
    "stopped", "halted",
    "cycles", "opcode", "instance",
];

impl Observable for Cpu68000 {
    fn query(&self, path: &str) -> Option<Value> {
        let regs = &self.regs;
        if let Some(n) = register_index(path, 'd') {
            return Some(regs.d[n].into());
        }
        if let Some(n) = register_index(path, 'a') {
            return Some(regs.a[n].into());
        }
        match path {
            "usp" => Some(regs.usp().into()),
            "ssp" => Some(regs.ssp().into()),
            "pc" => Some(regs.pc.into()),
            "sr" => Some(regs.sr().into()),
            "ccr" => Some(regs.ccr().into()),
            "flags.x" => Some(regs.flags.x.into()),
            "flags.n" => Some(regs.flags.n.into()),
            "flags.z" => Some(regs.flags.z().into()),
            "flags.v" => Some(regs.flags.v.into()),
            "flags.c" => Some(regs.flags.c.into()),
            "flags.s" => Some(regs.is_supervisor().into()),
            "flags.t" => Some(regs.trace.into()),
            "int_mask" => Some(regs.interrupt_mask().into()),
            "stopped" => Some((self.state == RunState::Stopped).into()),
            "halted" => Some((self.state == RunState::Halted).into()),
            "cycles" => Some(self.total_cycles.into()),
            "opcode" => Some(self.opcode.into()),
            "instance" => Some(self.config.instance.0.into()),
            _ => None,
        }
    }

    fn query_paths(&self) -> &'static [&'static str] {
        QUERY_PATHS
    }
}

/// Parse `d0`-`d7` / `a0`-`a7`.
fn register_index(path: &str, bank: char) -> Option<usize> {
    let mut chars = path.chars();
    if chars.next()? != bank {
        return None;
    }
    let digit = chars.next()?.to_digit(10)?;
    (chars.next().is_none() && digit < 8).then_some(digit as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_paths_resolve() {
        let cpu = Cpu68000::new();
        for path in cpu.query_paths() {
            assert!(cpu.query(path).is_some(), "{path}");
        }
        assert_eq!(cpu.query("a8"), None);
        assert_eq!(cpu.query("d10"), None);
        assert_eq!(cpu.query("sr"), Some(Value::U16(0x2700)));
    }

    #[test]
    fn flags_follow_ccr() {
        let mut cpu = Cpu68000::new();
        cpu.regs.set_ccr(0x15);
        assert_eq!(cpu.query("flags.x"), Some(Value::Bool(true)));
        assert_eq!(cpu.query("flags.z"), Some(Value::Bool(true)));
        assert_eq!(cpu.query("flags.n"), Some(Value::Bool(false)));
        assert_eq!(cpu.query("flags.c"), Some(Value::Bool(true)));
        assert_eq!(cpu.query("ccr"), Some(Value::U8(0x15)));
    }
}
