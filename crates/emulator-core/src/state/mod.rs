//! Processor state model: accumulator, program counter and memory.

/// Register file and memory storage.
pub mod processor;

pub use processor::ProcessorState;
