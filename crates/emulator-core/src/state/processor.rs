use crate::decoder::InstructionData;
use crate::memory::{new_memory_image, MemoryImage};

/// Full architectural state of the Acc8 core.
///
/// All values are stored as `u8`, so every register and memory write is
/// already truncated to the architecture width. Program-counter alignment is
/// not enforced here; the engine checks it before each fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessorState {
    acc: u8,
    pc: u8,
    memory: MemoryImage,
}

impl Default for ProcessorState {
    fn default() -> Self {
        Self {
            acc: 0,
            pc: 0,
            memory: new_memory_image(),
        }
    }
}

impl ProcessorState {
    /// Builds a state from raw register values and a memory image.
    #[must_use]
    pub const fn from_parts(acc: u8, pc: u8, memory: MemoryImage) -> Self {
        Self { acc, pc, memory }
    }

    /// Reads the accumulator.
    #[must_use]
    pub const fn acc(&self) -> u8 {
        self.acc
    }

    /// Writes the accumulator.
    pub const fn set_acc(&mut self, value: u8) {
        self.acc = value;
    }

    /// Reads the program counter.
    #[must_use]
    pub const fn pc(&self) -> u8 {
        self.pc
    }

    /// Writes the program counter.
    pub const fn set_pc(&mut self, value: u8) {
        self.pc = value;
    }

    /// Returns `true` when the accumulator holds zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.acc == 0
    }

    /// Reads one memory cell.
    #[must_use]
    pub const fn read(&self, address: u8) -> u8 {
        self.memory[address as usize]
    }

    /// Writes one memory cell.
    pub const fn write(&mut self, address: u8, value: u8) {
        self.memory[address as usize] = value;
    }

    /// Borrows the whole memory image.
    #[must_use]
    pub const fn memory(&self) -> &MemoryImage {
        &self.memory
    }

    /// Reads the raw instruction pair at `address` and `address + 1`.
    #[must_use]
    pub const fn instruction_data_at(&self, address: u8) -> InstructionData {
        InstructionData {
            opcode: self.read(address),
            address: self.read(address.wrapping_add(1)),
        }
    }

    /// Reads the raw instruction pair addressed by the program counter.
    #[must_use]
    pub const fn fetch(&self) -> InstructionData {
        self.instruction_data_at(self.pc)
    }

    /// Returns the state to power-on values: zeroed registers and memory.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
