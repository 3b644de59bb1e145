//! Drives the `acc8` binary against state files in a temporary directory.

#![allow(clippy::pedantic, clippy::nursery)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use acc8_core::{BreakpointKey, Emulator, Opcode};
use anyhow as _;
use clap as _;
use env_logger as _;
use log as _;
use tempfile::TempDir;

fn acc8(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_acc8"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("spawn acc8")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

/// Writes a countdown program (LDR 20; ADD 21; JNE 2; JMP 0) starting at 3.
fn countdown_state(dir: &TempDir) -> PathBuf {
    let mut emu = Emulator::new();
    emu.load_program(
        0,
        &[
            Opcode::Ldr.as_u8(),
            20,
            Opcode::Add.as_u8(),
            21,
            Opcode::Jne.as_u8(),
            2,
            Opcode::Jmp.as_u8(),
            0,
        ],
    );
    emu.write_memory(20, 3);
    emu.write_memory(21, 0xFF);
    let path = dir.path().join("countdown.state");
    emu.save_state(&path).expect("save fixture");
    path
}

fn reload(path: &Path) -> Emulator {
    let mut emu = Emulator::new();
    emu.load_state(path).expect("reload");
    emu
}

fn arg(path: &Path) -> &str {
    path.to_str().expect("utf-8 temp path")
}

#[test]
fn run_overwrites_state_in_place() {
    let dir = TempDir::new().expect("tempdir");
    let state = countdown_state(&dir);

    let output = acc8(&["run", arg(&state), "--steps", "3"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let text = stdout(&output);
    assert!(text.contains("completed 3 steps"), "stdout: {text}");
    assert!(text.contains("acc:    2"), "stdout: {text}");

    let emu = reload(&state);
    assert_eq!(emu.cycles(), 3);
    assert_eq!(emu.read_program_counter(), 2);
}

#[test]
fn run_with_output_leaves_input_untouched() {
    let dir = TempDir::new().expect("tempdir");
    let state = countdown_state(&dir);
    let out = dir.path().join("after.state");
    let original = std::fs::read_to_string(&state).expect("read input");

    let output = acc8(&["run", arg(&state), "-s", "2", "-o", arg(&out)]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(std::fs::read_to_string(&state).expect("read input"), original);
    assert_eq!(reload(&out).cycles(), 2);
}

#[test]
fn breakpoint_round_trip_through_commands() {
    let dir = TempDir::new().expect("tempdir");
    let state = countdown_state(&dir);

    let added = acc8(&["break", "add", arg(&state), "6", "exit"]);
    assert!(added.status.success(), "stderr: {}", stderr(&added));
    assert!(reload(&state)
        .find_breakpoint(BreakpointKey::Name("exit"))
        .is_some());

    let run = acc8(&["run", arg(&state), "--steps", "100"]);
    assert!(run.status.success(), "stderr: {}", stderr(&run));
    let text = stdout(&run);
    assert!(
        text.contains("stopped at breakpoint exit (6) after 7 steps"),
        "stdout: {text}"
    );

    let info = acc8(&["info", arg(&state)]);
    let text = stdout(&info);
    assert!(text.contains("cycles: 7"), "stdout: {text}");
    assert!(text.contains("breakpoints: 1"), "stdout: {text}");
    assert!(text.contains("  6 exit"), "stdout: {text}");

    let deleted = acc8(&["break", "del", arg(&state), "6"]);
    assert!(deleted.status.success(), "stderr: {}", stderr(&deleted));
    assert_eq!(reload(&state).num_breakpoints(), 0);
}

#[test]
fn duplicate_breakpoint_fails_without_touching_file() {
    let dir = TempDir::new().expect("tempdir");
    let state = countdown_state(&dir);
    assert!(acc8(&["break", "add", arg(&state), "4", "branch"])
        .status
        .success());
    let before = std::fs::read_to_string(&state).expect("read");

    let output = acc8(&["break", "add", arg(&state), "8", "branch"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("cannot add breakpoint"));
    assert_eq!(std::fs::read_to_string(&state).expect("read"), before);
}

#[test]
fn numeric_breakpoint_name_can_be_deleted_by_name() {
    let dir = TempDir::new().expect("tempdir");
    let state = countdown_state(&dir);
    assert!(acc8(&["break", "add", arg(&state), "4", "12"]).status.success());
    assert!(acc8(&["break", "add", arg(&state), "12", "far"]).status.success());

    let by_name = acc8(&["break", "del", arg(&state), "12"]);
    assert!(by_name.status.success(), "stderr: {}", stderr(&by_name));
    assert!(stdout(&by_name).contains("deleted breakpoint 12 far"));

    let fallback = acc8(&["break", "del", arg(&state), "12"]);
    assert!(fallback.status.success(), "stderr: {}", stderr(&fallback));
    assert!(stdout(&fallback).contains("deleted breakpoint 4 12"));
    assert_eq!(reload(&state).num_breakpoints(), 0);
}

#[test]
fn deleting_unknown_name_fails() {
    let dir = TempDir::new().expect("tempdir");
    let state = countdown_state(&dir);

    let output = acc8(&["break", "del", arg(&state), "nowhere"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("cannot delete breakpoint nowhere"));
}

#[test]
fn list_prints_decoded_instructions() {
    let dir = TempDir::new().expect("tempdir");
    let state = countdown_state(&dir);

    let output = acc8(&["list", arg(&state)]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let text = stdout(&output);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 128);
    assert!(lines[0].starts_with("0:\t4\t20\t:\tLDR"), "line: {}", lines[0]);
    assert!(lines[3].starts_with("6:\t6\t0\t:\tJMP"), "line: {}", lines[3]);
    assert_eq!(lines[4], "8:\t0\t0");
}

#[test]
fn fault_exits_with_failure_and_saves_state() {
    let dir = TempDir::new().expect("tempdir");
    let mut emu = Emulator::new();
    emu.load_program(0, &[Opcode::Ldr.as_u8(), 9, 0xEE, 0]);
    emu.write_memory(9, 42);
    let state = dir.path().join("fault.state");
    emu.save_state(&state).expect("save fixture");

    let output = acc8(&["run", arg(&state), "--steps", "10"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("fault at pc 2 after 1 steps"));
    let emu = reload(&state);
    assert_eq!(emu.cycles(), 1);
    assert_eq!(emu.read_accumulator(), 42);
}

#[test]
fn missing_state_file_reports_context() {
    let dir = TempDir::new().expect("tempdir");
    let missing = dir.path().join("absent.state");

    let output = acc8(&["info", arg(&missing)]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("failed to load state file"));
}

#[test]
fn argument_errors_exit_with_usage_status() {
    let output = acc8(&["run"]);
    assert_eq!(output.status.code(), Some(2));
}
