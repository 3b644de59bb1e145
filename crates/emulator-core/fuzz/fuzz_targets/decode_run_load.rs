#![no_main]

use acc8_core::{Decoder, Emulator, InstructionData, MEMORY_SIZE};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    if let Some(instruction) = Decoder::decode(InstructionData {
        opcode: data[0],
        address: data[1],
    }) {
        assert_eq!(instruction.encode().opcode, data[0]);
        assert_eq!(instruction.encode().address, data[1]);
        let _ = instruction.to_string();
    }

    // Arbitrary memory image: run a bounded number of steps and list it.
    let mut emu = Emulator::new();
    let image = &data[..data.len().min(MEMORY_SIZE)];
    emu.load_program(0, image);
    let outcome = emu.run(u32::from(data[0]) * 4);
    assert_eq!(u64::from(outcome.steps()), emu.cycles());
    let _ = emu.list_program();

    // Arbitrary text as a state file must never panic, and a failed load
    // leaves no breakpoints behind.
    let before = emu.state().clone();
    match emu.read_state_from(data) {
        Ok(()) => {
            let mut saved = Vec::new();
            emu.write_state_to(&mut saved).expect("write to vec");
            let mut reloaded = Emulator::new();
            reloaded.read_state_from(saved.as_slice()).expect("saved state reloads");
            assert_eq!(reloaded.state(), emu.state());
        }
        Err(_) => {
            assert_eq!(emu.num_breakpoints(), 0);
            assert_eq!(emu.state(), &before);
        }
    }
});
