//! Core emulator crate for the Acc8 accumulator machine.

/// Architecture constants and the flat memory model.
pub mod memory;
pub use memory::{
    mask_address, new_memory_image, MemoryImage, ARCH_BITMASK, ARCH_BITS, ARCH_MAXVAL,
    INSTRUCTION_SIZE, MAX_INSTRUCTIONS, MEMORY_SIZE,
};

/// Processor state model primitives.
pub mod state;
pub use state::ProcessorState;

/// Opcode table.
pub mod encoding;
pub use encoding::{Opcode, OPCODE_COUNT};

/// Instruction decode from raw byte pairs.
pub mod decoder;
pub use decoder::{Decoder, Instruction, InstructionData};

/// Fault taxonomy for the execution loop.
pub mod fault;
pub use fault::FaultCode;

/// Instruction execution pipeline.
pub mod execute;
pub use execute::{execute_instruction, fetch_and_decode, step_one, JUMP_ADVANCE_COMPENSATION};

/// Instruction rendering and program listings.
pub mod disasm;
pub use disasm::{list_program, ListingRow};

/// Named execution breakpoints.
pub mod breakpoints;
pub use breakpoints::{Breakpoint, BreakpointError, BreakpointKey, BreakpointTable};

/// Public host-facing API contract and integration types.
pub mod api;
pub use api::{CoreConfig, LogTraceSink, NullTraceSink, RunOutcome, TraceEvent, TraceSink};

/// The emulator engine.
pub mod emulator;
pub use emulator::{Emulator, MAX_CYCLES};

/// Text state-file load and save.
pub mod persist;
pub use persist::{PersistError, StateField};

#[cfg(test)]
use proptest as _;
#[cfg(test)]
use rstest as _;
#[cfg(test)]
use tempfile as _;
