//! Simulator Lifecycle Tests.
//!
//! Covers loading, stepping, termination, faults and reloads, and runs the
//! three-section COPY program end to end against file-backed devices.

use pretty_assertions::assert_eq;

use crate::common::builder::instruction::{assemble, word};
use crate::common::{InstructionBuilder as I, ObjectBuilder, TestContext, program};
use sicsim_core::SimError;
use sicsim_core::common::Reg;
use sicsim_core::core::ConditionCode;
use sicsim_core::isa::Mnemonic;
use sicsim_core::sim::RunState;

const COPY: &str = include_str!("../../fixtures/copy.obj");

#[test]
fn step_before_load_is_an_error() {
    let mut ctx = TestContext::new();
    assert_eq!(ctx.sim.state(), RunState::Unloaded);
    assert!(matches!(ctx.sim.step(), Err(SimError::NotLoaded)));
    assert!(ctx.sim.log().is_empty());
}

#[test]
fn single_clear_instruction() {
    let mut ctx = TestContext::new();
    let info = ctx.load("HCOPY  001000001077\nT00100002B400\nE001000\n");
    assert_eq!(info.name, "COPY");
    assert_eq!(info.length, 0x1077);
    assert_eq!(ctx.pc(), 0x1000);
    assert_eq!(ctx.sim.state(), RunState::Running);

    assert!(ctx.step());
    assert_eq!(ctx.reg(Reg::A), 0);
    assert_eq!(ctx.pc(), 0x1002);
    assert_eq!(ctx.sim.log(), &[Mnemonic::Clear]);
    assert_eq!(ctx.sim.current_address(), Some(0x1000));
    assert_eq!(ctx.sim.current_object_code().as_deref(), Some("B400"));
    assert_eq!(ctx.sim.disassembly().as_deref(), Some("CLEAR A"));
    assert_eq!(ctx.sim.last_target(), None);
}

#[test]
fn jump_to_zero_finishes_the_program() {
    // 0x1000 LDA #1 / 0x1003 J @ZERO / 0x1006 ZERO WORD 0
    let parts = vec![
        I::new(Mnemonic::Lda).immediate().direct(1).build(),
        I::new(Mnemonic::J).indirect().pc_relative(0).build(),
        word(0),
    ];
    let mut ctx = TestContext::new();
    let _ = ctx.load(&program(0x1000, &assemble(&parts)));

    assert!(ctx.step());
    assert!(!ctx.step());
    assert_eq!(ctx.sim.state(), RunState::Finished);
    assert_eq!(ctx.sim.log(), &[Mnemonic::Lda, Mnemonic::J]);

    // further steps are inert
    assert!(!ctx.step());
    assert_eq!(ctx.sim.log().len(), 2);
    assert_eq!(ctx.reg(Reg::A), 1);
}

#[test]
fn fault_halts_and_keeps_state() {
    // LDA #9 followed by an opcode the catalog does not define
    let mut code = I::new(Mnemonic::Lda).immediate().direct(9).build();
    code.extend([0xFC, 0x00, 0x00]);
    let mut ctx = TestContext::new();
    let _ = ctx.load(&program(0x1000, &code));

    assert!(ctx.step());
    let err = ctx.sim.step().unwrap_err();
    assert!(matches!(
        err,
        SimError::InvalidOpcode {
            opcode: 0xFC,
            addr: 0x1003
        }
    ));
    assert_eq!(ctx.sim.state(), RunState::Faulted);
    assert_eq!(ctx.sim.log(), &[Mnemonic::Lda]);
    assert_eq!(ctx.reg(Reg::A), 9);
    assert_eq!(ctx.pc(), 0x1003);

    assert!(!ctx.step());
}

#[test]
fn run_for_bounds_an_endless_loop() {
    // 0x1000 J 0x1000
    let code = I::new(Mnemonic::J).pc_relative(-3).build();
    let mut ctx = TestContext::new();
    let _ = ctx.load(&program(0x1000, &code));

    assert!(ctx.sim.run_for(50).unwrap());
    assert_eq!(ctx.sim.log().len(), 50);
    assert_eq!(ctx.pc(), 0x1000);
}

#[test]
fn reloading_resets_everything() {
    let mut ctx = TestContext::new();
    let source = program(0x1000, &I::new(Mnemonic::Lda).immediate().direct(4).build());

    let _ = ctx.load(&source);
    ctx.step_n(1);
    assert_eq!(ctx.reg(Reg::A), 4);

    let _ = ctx.load(&source);
    assert_eq!(ctx.reg(Reg::A), 0);
    assert_eq!(ctx.pc(), 0x1000);
    assert!(ctx.sim.log().is_empty());
    assert!(ctx.sim.current_instruction().is_none());
    assert_eq!(ctx.sim.condition_code(), ConditionCode::Greater);
    assert_eq!(ctx.sim.state(), RunState::Running);
}

#[test]
fn failed_load_leaves_simulator_unloaded() {
    let mut ctx = TestContext::new();
    let _ = ctx.load(COPY);
    assert!(!ctx.sim.symbols().is_empty());

    let broken = ObjectBuilder::new()
        .header("BAD", 0, 3)
        .refer(&["NOWHERE"])
        .text(0, &[0, 0, 0])
        .modify(0, 6, '+', "NOWHERE")
        .end(None)
        .build();
    assert!(matches!(
        ctx.sim.load(&broken),
        Err(SimError::UnresolvedSymbol(ref name)) if name == "NOWHERE"
    ));
    assert_eq!(ctx.sim.state(), RunState::Unloaded);
    assert!(ctx.sim.symbols().is_empty());
    assert!(ctx.sim.program().is_none());
    assert!(matches!(ctx.sim.step(), Err(SimError::NotLoaded)));
}

#[test]
fn reset_unloads() {
    let mut ctx = TestContext::new();
    let _ = ctx.load(COPY);
    ctx.sim.reset();
    assert_eq!(ctx.sim.state(), RunState::Unloaded);
    assert_eq!(ctx.pc(), 0);
    assert_eq!(ctx.word_at(0x1033 + 0x28), 0);
}

// ══════════════════════════════════════════════════════════
// COPY: read a record from F1 and write it to 05
// ══════════════════════════════════════════════════════════

#[test]
fn copy_program_links_three_sections() {
    let mut ctx = TestContext::new();
    let info = ctx.load(COPY);

    assert_eq!(info.name, "COPY");
    assert_eq!(info.first_instruction, 0);
    let sections: Vec<(&str, u32)> = info
        .sections
        .iter()
        .map(|s| (s.name.as_str(), s.start))
        .collect();
    assert_eq!(
        sections,
        vec![("COPY", 0), ("RDREC", 0x1033), ("WRREC", 0x105E)]
    );

    let symbols = ctx.sim.symbols();
    for (name, addr) in [
        ("COPY", 0),
        ("BUFFER", 0x33),
        ("BUFEND", 0x1033),
        ("LENGTH", 0x2D),
        ("RDREC", 0x1033),
        ("WRREC", 0x105E),
    ] {
        assert_eq!(symbols.resolve(name).unwrap(), addr, "{name}");
    }

    // MAXLEN WORD BUFEND-BUFFER after relocation
    assert_eq!(ctx.word_at(0x105B), 0x1000);
}

#[test]
fn copy_program_copies_the_record_then_eof() {
    let mut ctx = TestContext::new();
    ctx.create_device("F1", b"HELLO");
    ctx.create_device("05", b"");
    let _ = ctx.load(COPY);

    ctx.sim.run().unwrap();

    assert_eq!(ctx.sim.state(), RunState::Finished);
    assert_eq!(ctx.device_contents("05"), b"HELLOEOF");
    assert_eq!(ctx.sim.last_device(), Some("05"));

    let log = ctx.sim.log();
    assert_eq!(log.len(), 133);
    assert_eq!(
        &log[..12],
        &[
            Mnemonic::Stl,
            Mnemonic::Jsub,
            Mnemonic::Clear,
            Mnemonic::Clear,
            Mnemonic::Clear,
            Mnemonic::Ldt,
            Mnemonic::Td,
            Mnemonic::Jeq,
            Mnemonic::Rd,
            Mnemonic::Compr,
            Mnemonic::Jeq,
            Mnemonic::Stch,
        ]
    );
    assert_eq!(log.last(), Some(&Mnemonic::J));

    assert_eq!(ctx.reg(Reg::A), 0x46);
    assert_eq!(ctx.reg(Reg::X), 3);
    assert_eq!(ctx.reg(Reg::L), 0x27);
    assert_eq!(ctx.sim.condition_code(), ConditionCode::Equal);
}

#[test]
fn copy_program_waits_while_input_device_is_missing() {
    let mut ctx = TestContext::new();
    let _ = ctx.load(COPY);

    // TD/JEQ spins until F1 appears
    assert!(ctx.sim.run_for(200).unwrap());
    assert_eq!(ctx.sim.last_device(), Some("F1"));
    assert_eq!(ctx.sim.condition_code(), ConditionCode::Equal);
    assert!(!ctx.sim.log().contains(&Mnemonic::Rd));
}
