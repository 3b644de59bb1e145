//! Human-readable instruction rendering and program listings.
//!
//! Used only for diagnostics; execution never consults these strings.

use std::fmt;

use crate::decoder::{Decoder, Instruction, InstructionData};
use crate::encoding::Opcode;
use crate::memory::{MemoryImage, INSTRUCTION_SIZE, MEMORY_SIZE};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.opcode().mnemonic();
        let a = self.address();
        match self.opcode() {
            Opcode::Add => write!(f, "{name}: ACC <- ACC + [{a}]"),
            Opcode::And => write!(f, "{name}: ACC <- ACC & [{a}]"),
            Opcode::Orr => write!(f, "{name}: ACC <- ACC | [{a}]"),
            Opcode::Xor => write!(f, "{name}: ACC <- ACC ^ [{a}]"),
            Opcode::Ldr => write!(f, "{name}: ACC <- [{a}]"),
            Opcode::Str => write!(f, "{name}: ACC -> [{a}]"),
            Opcode::Jmp => write!(f, "{name}: PC  <- {a}"),
            Opcode::Jne => write!(f, "{name}: PC  <- {a} if ACC != 0"),
        }
    }
}

/// One instruction slot of a program listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ListingRow {
    /// Address of the opcode byte.
    pub offset: u8,
    /// Raw opcode and operand bytes.
    pub data: InstructionData,
    /// Decoded instruction, or `None` for undecodable and all-zero slots.
    pub instruction: Option<Instruction>,
}

impl fmt::Display for ListingRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:\t{}\t{}",
            self.offset, self.data.opcode, self.data.address
        )?;
        if let Some(instruction) = self.instruction {
            write!(f, "\t:\t{instruction}")?;
        }
        Ok(())
    }
}

/// Lists every instruction slot of `memory`.
///
/// An all-zero slot decodes as `ADD 0`, which in practice is almost always
/// unused memory, so such slots are listed without a rendering.
#[must_use]
pub fn list_program(memory: &MemoryImage) -> Vec<ListingRow> {
    (0..MEMORY_SIZE)
        .step_by(usize::from(INSTRUCTION_SIZE))
        .map(|offset| {
            let data = InstructionData {
                opcode: memory[offset],
                address: memory[offset + 1],
            };
            let instruction = if data == InstructionData::default() {
                None
            } else {
                Decoder::decode(data)
            };
            ListingRow {
                offset: u8::try_from(offset).unwrap_or(u8::MAX),
                data,
                instruction,
            }
        })
        .collect()
}
