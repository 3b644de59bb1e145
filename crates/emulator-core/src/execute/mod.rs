//! Instruction execution for the Acc8 ISA.
//!
//! Every instruction runs through the same commit sequence:
//! 1. Apply the opcode-specific effect
//! 2. Advance PC by `INSTRUCTION_SIZE`
//! 3. Truncate ACC and PC to the architecture width
//!
//! Step 3 is free: registers are `u8` and all arithmetic wraps, so the
//! architecture mask is applied by the storage type itself.

use crate::decoder::{Decoder, Instruction};
use crate::encoding::Opcode;
use crate::fault::FaultCode;
use crate::memory::INSTRUCTION_SIZE;
use crate::state::ProcessorState;

/// Amount a jump effect subtracts from its target.
///
/// The commit sequence advances PC by `INSTRUCTION_SIZE` after every effect,
/// jumps included, so a jump stores `target - JUMP_ADVANCE_COMPENSATION` and
/// the advance lands PC exactly on `target`. The subtraction wraps, so a jump
/// to address 0 or 1 stores 254 or 255 before the advance.
pub const JUMP_ADVANCE_COMPENSATION: u8 = INSTRUCTION_SIZE;

/// Executes one decoded instruction against `state`.
pub fn execute_instruction(instruction: Instruction, state: &mut ProcessorState) {
    apply_effect(instruction, state);
    state.set_pc(state.pc().wrapping_add(INSTRUCTION_SIZE));
}

fn apply_effect(instruction: Instruction, state: &mut ProcessorState) {
    let address = instruction.address();

    match instruction.opcode() {
        Opcode::Add => state.set_acc(state.acc().wrapping_add(state.read(address))),
        Opcode::And => state.set_acc(state.acc() & state.read(address)),
        Opcode::Orr => state.set_acc(state.acc() | state.read(address)),
        Opcode::Xor => state.set_acc(state.acc() ^ state.read(address)),
        Opcode::Ldr => state.set_acc(state.read(address)),
        Opcode::Str => state.write(address, state.acc()),
        Opcode::Jmp => jump_to(state, address),
        Opcode::Jne => {
            if !state.is_zero() {
                jump_to(state, address);
            }
        }
    }
}

const fn jump_to(state: &mut ProcessorState, target: u8) {
    state.set_pc(target.wrapping_sub(JUMP_ADVANCE_COMPENSATION));
}

/// Fetches and decodes the instruction addressed by PC.
///
/// # Errors
///
/// Returns [`FaultCode::UnalignedProgramCounter`] for an odd PC and
/// [`FaultCode::IllegalOpcode`] when the opcode byte does not decode.
pub const fn fetch_and_decode(state: &ProcessorState) -> Result<Instruction, FaultCode> {
    if state.pc() % INSTRUCTION_SIZE != 0 {
        return Err(FaultCode::UnalignedProgramCounter);
    }

    match Decoder::decode(state.fetch()) {
        Some(instruction) => Ok(instruction),
        None => Err(FaultCode::IllegalOpcode),
    }
}

/// Fetches, decodes and executes one instruction.
///
/// On a fault no state is modified. On success the executed instruction is
/// returned so callers can trace it.
///
/// # Errors
///
/// Propagates the fault from [`fetch_and_decode`].
pub fn step_one(state: &mut ProcessorState) -> Result<Instruction, FaultCode> {
    let instruction = fetch_and_decode(state)?;
    execute_instruction(instruction, state);
    Ok(instruction)
}
