//! Instruction decoder for the Acc8 ISA.
//!
//! An instruction is two consecutive bytes: the opcode byte followed by the
//! operand address byte. Decoding either yields one of the eight opcode
//! variants or nothing when the opcode byte is unassigned.

use crate::encoding::Opcode;
use crate::memory::mask_address;

/// Raw instruction bytes as fetched from memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct InstructionData {
    /// Opcode byte at the even address.
    pub opcode: u8,
    /// Operand address byte that follows it.
    pub address: u8,
}

/// A decoded instruction: an opcode and its operand address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Instruction {
    opcode: Opcode,
    address: u8,
}

impl Instruction {
    /// Builds an instruction, masking `address` into the address space.
    #[must_use]
    pub const fn new(opcode: Opcode, address: u16) -> Self {
        Self {
            opcode,
            address: mask_address(address),
        }
    }

    /// The instruction's opcode.
    #[must_use]
    pub const fn opcode(self) -> Opcode {
        self.opcode
    }

    /// The operand address.
    #[must_use]
    pub const fn address(self) -> u8 {
        self.address
    }

    /// Re-encodes this instruction into its raw byte pair.
    #[must_use]
    pub const fn encode(self) -> InstructionData {
        InstructionData {
            opcode: self.opcode.as_u8(),
            address: self.address,
        }
    }
}

/// Instruction decoder for the Acc8 ISA.
#[derive(Debug)]
pub struct Decoder;

impl Decoder {
    /// Decodes a raw `(opcode, address)` pair.
    ///
    /// Returns `None` when the opcode byte is not one of the eight assigned
    /// values.
    #[must_use]
    pub const fn decode(data: InstructionData) -> Option<Instruction> {
        match Opcode::from_u8(data.opcode) {
            Some(opcode) => Some(Instruction::new(opcode, data.address as u16)),
            None => None,
        }
    }
}
