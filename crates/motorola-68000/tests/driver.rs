//! Slice execution, bus hooks, the idle layer and host-facing state.

mod common;

use common::{CODE, Event, TestBus, bus_with, setup, setup_with};
use emu_core::{Cpu, Observable, Value};
use motorola_68000::{Cpu68000, CpuConfig, InstanceId, Registers, RunState};

const NOPS: [u16; 8] = [0x4E71; 8];

#[test]
fn test_slice_overruns_by_last_instruction() {
    let (mut cpu, mut bus) = setup(&NOPS);
    assert_eq!(cpu.execute(&mut bus, 10), 12);
    assert_eq!(cpu.regs.pc, CODE + 6);
    assert_eq!(cpu.total_cycles(), 12);
    assert_eq!(cpu.cycles_left(), 0);
}

#[test]
fn test_zero_budget_runs_nothing() {
    let (mut cpu, mut bus) = setup(&NOPS);
    assert_eq!(cpu.execute(&mut bus, 0), 0);
    assert_eq!(cpu.regs.pc, CODE);
}

#[test]
fn test_data_access_is_bracketed_by_hooks() {
    // MOVE.W D0,(A0) (opcode: 0x3080)
    let (mut cpu, mut bus) = setup(&[0x3080]);
    cpu.regs.a[0] = 0x2000;
    cpu.regs.d[0] = 0xBEEF;
    bus.logging = true;
    cpu.execute(&mut bus, 100);
    let first = &bus.events[..4];
    assert_eq!(
        first,
        &[
            Event::Fetch(CODE),
            Event::Begin,
            Event::WriteWord(0x2000, 0xBEEF),
            Event::End,
        ]
    );
    assert_eq!(bus.budgets[0], 100, "device sees the budget before the charge");
}

#[test]
fn test_device_can_end_slice() {
    // NOP ; MOVE.W D0,(A0) ; NOP ; NOP
    let (mut cpu, mut bus) = setup(&[0x4E71, 0x3080, 0x4E71, 0x4E71]);
    cpu.regs.a[0] = 0x2000;
    bus.cut_slice = true;
    let consumed = cpu.execute(&mut bus, 1000);
    assert_eq!(cpu.regs.pc, CODE + 4, "stopped after the accessing instruction");
    assert_eq!(consumed, 1008);
}

#[test]
fn test_addresses_wrap_at_24_bits() {
    // MOVE.W D0,(A0) (opcode: 0x3080) with A0 = $FF002000
    let (mut cpu, mut bus) = setup(&[0x3080]);
    cpu.regs.a[0] = 0xFF00_2000;
    cpu.regs.d[0] = 0x1234;
    cpu.step(&mut bus);
    assert_eq!(bus.mem.peek_word(0x2000), 0x1234);
}

// === Idle loop skipping ===

// loop: TST.W $2000.W ; BEQ.S loop
const IDLE_LOOP: [u16; 3] = [0x4A78, 0x2000, 0x67FA];

#[test]
fn test_idle_loop_burns_rest_of_slice() {
    let config = CpuConfig::default().with_idle_loop_skip(true);
    let (mut cpu, mut bus) = setup_with(config, &IDLE_LOOP);
    assert_eq!(cpu.execute(&mut bus, 1000), 1000);
    assert_eq!(cpu.regs.pc, CODE);
    let stats = cpu.idle_stats();
    assert_eq!(stats.loops_detected, 1);
    assert_eq!(stats.skips, 1);
    assert_eq!(stats.cycles_skipped, 1000 - 12 - 10);

    cpu.execute(&mut bus, 1000);
    let stats = cpu.idle_stats();
    assert_eq!(stats.loops_detected, 1, "verdict is cached");
    assert_eq!(stats.skips, 2);
}

#[test]
fn test_idle_loop_exits_when_flag_changes() {
    let config = CpuConfig::default().with_idle_loop_skip(true);
    let (mut cpu, mut bus) = setup_with(config, &IDLE_LOOP);
    cpu.execute(&mut bus, 100);
    bus.mem.poke_word(0x2000, 1);
    cpu.execute(&mut bus, 20);
    assert_eq!(cpu.regs.pc, CODE + 6);
}

#[test]
fn test_idle_loop_skip_off_spins() {
    let (mut cpu, mut bus) = setup(&IDLE_LOOP);
    let consumed = cpu.execute(&mut bus, 1000);
    assert!(consumed >= 1000);
    assert_eq!(cpu.idle_stats().skips, 0);
    assert_eq!(cpu.regs.d, [0; 8]);
}

// === Host interface ===

type HostCpu = dyn Cpu<TestBus, Registers = Registers>;

#[test]
fn test_cpu_trait() {
    let mut bus = bus_with(&NOPS);
    let mut cpu = Cpu68000::new();
    let host: &mut HostCpu = &mut cpu;
    host.reset(&mut bus);
    assert_eq!(host.pc(), CODE);
    assert_eq!(host.run(&mut bus, 8), 8);
    assert_eq!(host.step(&mut bus), 4);
    assert_eq!(host.registers().pc, CODE + 6);
    assert!(!host.is_halted());

    cpu.set_halted(true);
    let host: &mut HostCpu = &mut cpu;
    assert!(host.is_halted());
    assert_eq!(host.run(&mut bus, 50), 50);
    assert_eq!(host.step(&mut bus), 0);
    assert_eq!(cpu.regs.pc, CODE + 6);
}

#[test]
fn test_instances_are_independent() {
    let first = CpuConfig::default().with_instance(InstanceId(0));
    let second = CpuConfig::default().with_instance(InstanceId(1));
    // MOVEQ #1,D0 and MOVEQ #2,D0
    let (mut a, mut bus_a) = setup_with(first, &[0x7001]);
    let (mut b, mut bus_b) = setup_with(second, &[0x7002, 0x4E71]);
    a.step(&mut bus_a);
    b.step(&mut bus_b);
    b.step(&mut bus_b);
    assert_eq!((a.regs.d[0], b.regs.d[0]), (1, 2));
    assert_eq!((a.total_cycles(), b.total_cycles()), (4, 8));
    assert_eq!(a.query("instance"), Some(Value::U32(0)));
    assert_eq!(b.query("instance"), Some(Value::U32(1)));
}

#[test]
fn test_snapshot_resumes_identically() {
    // MOVEQ #3,D0 ; loop: ADDQ.L #1,D1 ; DBF D0,loop ; STOP #$2700
    let program = [0x7003, 0x5281, 0x51C8, 0xFFFC, 0x4E72, 0x2700];
    let (mut original, mut bus) = setup(&program);
    original.step(&mut bus);
    original.step(&mut bus);
    let state = original.snapshot();

    let mut copy = Cpu68000::new();
    copy.restore(&state).expect("valid snapshot");
    let mut copy_bus = bus_with(&program);

    let a = original.execute(&mut bus, 200);
    let b = copy.execute(&mut copy_bus, 200);
    assert_eq!(a, b);
    assert_eq!(original.regs, copy.regs);
    assert_eq!(original.regs.d[1], 4);
    assert_eq!(copy.run_state(), RunState::Stopped);
    assert_eq!(original.snapshot(), copy.snapshot());
}

#[test]
fn test_observable_paths() {
    // MOVEQ #-1,D2 (opcode: 0x74FF)
    let (mut cpu, mut bus) = setup(&[0x74FF]);
    cpu.step(&mut bus);
    assert_eq!(cpu.query("d2"), Some(Value::U32(0xFFFF_FFFF)));
    assert_eq!(cpu.query("pc"), Some(Value::U32(CODE + 2)));
    assert_eq!(cpu.query("flags.n"), Some(Value::Bool(true)));
    assert_eq!(cpu.query("flags.s"), Some(Value::Bool(true)));
    assert_eq!(cpu.query("int_mask"), Some(Value::U8(7)));
    assert_eq!(cpu.query("opcode"), Some(Value::U16(0x74FF)));
    assert_eq!(cpu.query("cycles"), Some(Value::U64(4)));
    assert_eq!(cpu.query("nonsense"), None);
}
