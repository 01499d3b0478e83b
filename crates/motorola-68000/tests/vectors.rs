//! Table-driven single-instruction vectors from `tests/vectors/*.json`.
//!
//! Each file holds an array of cases. A case names the program words, the
//! registers and memory to set up, and the registers, memory and cycle
//! count expected after one step. Registers are named by their query path
//! (`d0`, `a7`, `sr`, `pc`, ...). Values are hex strings.

mod common;

use std::collections::BTreeMap;
use std::path::Path;

use emu_core::Observable;
use motorola_68000::Cpu68000;
use serde::Deserialize;

use common::{CODE, TestBus, setup};

#[derive(Debug, Deserialize)]
struct Case {
    name: String,
    code: Vec<String>,
    #[serde(default)]
    initial: BTreeMap<String, String>,
    /// Word writes as `[address, value]`.
    #[serde(default)]
    memory: Vec<(String, String)>,
    #[serde(default)]
    expect: BTreeMap<String, String>,
    #[serde(default)]
    expect_memory: Vec<(String, String)>,
    cycles: i32,
}

fn hex(text: &str) -> Result<u32, String> {
    u32::from_str_radix(text.trim_start_matches("0x"), 16).map_err(|e| format!("bad hex {text:?}: {e}"))
}

fn hex_word(text: &str) -> Result<u16, String> {
    u16::try_from(hex(text)?).map_err(|_| format!("{text:?} is not a word"))
}

fn set_register(cpu: &mut Cpu68000, name: &str, value: u32) -> Result<(), String> {
    let regs = &mut cpu.regs;
    let bank = |prefix: char| {
        name.strip_prefix(prefix)
            .and_then(|n| n.parse::<usize>().ok())
            .filter(|&n| n < 8)
    };
    if let Some(n) = bank('d') {
        regs.d[n] = value;
    } else if let Some(n) = bank('a') {
        regs.a[n] = value;
    } else {
        match name {
            "pc" => regs.pc = value,
            "usp" => regs.set_usp(value),
            "ssp" => regs.set_ssp(value),
            "ccr" => regs.set_ccr(value as u8),
            _ => return Err(format!("cannot set {name}")),
        }
    }
    Ok(())
}

fn run_case(case: &Case) -> Result<(), String> {
    let words = case
        .code
        .iter()
        .map(|w| hex_word(w))
        .collect::<Result<Vec<_>, _>>()?;
    let (mut cpu, mut bus): (Cpu68000, TestBus) = setup(&words);

    // SR first: it decides which stack pointer A7 names.
    if let Some(sr) = case.initial.get("sr") {
        cpu.regs.set_sr(hex_word(sr)?);
    }
    for (name, value) in case.initial.iter().filter(|(name, _)| *name != "sr") {
        set_register(&mut cpu, name, hex(value)?)?;
    }
    for (address, value) in &case.memory {
        bus.mem.poke_word(hex(address)?, hex_word(value)?);
    }

    let cycles = cpu.step(&mut bus);

    let mut errors = Vec::new();
    if cycles != case.cycles {
        errors.push(format!("cycles: got {cycles}, expected {}", case.cycles));
    }
    let mut expect = case.expect.clone();
    expect
        .entry("pc".to_string())
        .or_insert_with(|| format!("{:X}", CODE + 2 * words.len() as u32));
    for (path, value) in &expect {
        let expected = u64::from(hex(value)?);
        match cpu.query(path).and_then(|v| v.as_u64()) {
            Some(actual) if actual == expected => {}
            Some(actual) => errors.push(format!("{path}: got ${actual:X}, expected ${expected:X}")),
            None => errors.push(format!("{path}: unknown register")),
        }
    }
    for (address, value) in &case.expect_memory {
        let address = hex(address)?;
        let expected = hex_word(value)?;
        let actual = bus.mem.peek_word(address);
        if actual != expected {
            errors.push(format!(
                "memory ${address:06X}: got ${actual:04X}, expected ${expected:04X}"
            ));
        }
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors.join("; "))
    }
}

fn run_file(path: &Path) -> (usize, Vec<String>) {
    let text = std::fs::read_to_string(path).expect("read vector file");
    let cases: Vec<Case> = serde_json::from_str(&text)
        .unwrap_or_else(|e| panic!("{}: {e}", path.display()));
    let failures = cases
        .iter()
        .filter_map(|case| {
            run_case(case)
                .err()
                .map(|e| format!("{} / {}: {e}", path.display(), case.name))
        })
        .collect();
    (cases.len(), failures)
}

#[test]
fn test_json_vectors() {
    let pattern = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/vectors/*.json");
    let mut total = 0;
    let mut failures = Vec::new();
    for entry in glob::glob(pattern).expect("valid glob pattern") {
        let path = entry.expect("readable path");
        let (count, failed) = run_file(&path);
        total += count;
        failures.extend(failed);
    }
    assert!(total > 0, "no vectors found under {pattern}");
    assert!(
        failures.is_empty(),
        "{} of {total} vectors failed:\n{}",
        failures.len(),
        failures.join("\n")
    );
}
