//! Runs a small countdown loop, stopping on a named breakpoint, and prints
//! the program listing plus the final machine state.

use acc8_core::{CoreConfig, Emulator, Opcode, RunOutcome};
use log as _;
use proptest as _;
use rstest as _;
#[cfg(feature = "serde")]
use serde as _;
use tempfile as _;
use thiserror as _;

fn main() {
    let mut emu = Emulator::with_config(CoreConfig::default());
    let program = [
        (Opcode::Ldr, 20),
        (Opcode::Add, 21),
        (Opcode::Jne, 2),
        (Opcode::Jmp, 0),
    ];
    let bytes: Vec<u8> = program
        .iter()
        .flat_map(|(opcode, address)| [opcode.as_u8(), *address])
        .collect();
    emu.load_program(0, &bytes);
    emu.write_memory(20, 5);
    emu.write_memory(21, 0xFF);

    if let Err(err) = emu.insert_breakpoint(6, "exit") {
        eprintln!("breakpoint rejected: {err}");
        return;
    }

    for row in emu.list_program().iter().take(program.len()) {
        println!("{row}");
    }

    match emu.run(1_000) {
        RunOutcome::Breakpoint { steps, address } => {
            println!("stopped at breakpoint {address} after {steps} steps");
        }
        other => println!("run ended: {other:?}"),
    }
    println!(
        "acc={} pc={} cycles={}",
        emu.read_accumulator(),
        emu.read_program_counter(),
        emu.cycles()
    );
}
