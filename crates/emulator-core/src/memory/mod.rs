//! Architecture constants and the flat memory model.

/// Register and memory cell width in bits.
pub const ARCH_BITS: u32 = 8;
/// Mask applied to host-supplied addresses and values.
pub const ARCH_BITMASK: u16 = (1 << ARCH_BITS) - 1;
/// Largest value a register or memory cell can hold.
pub const ARCH_MAXVAL: u8 = u8::MAX;
/// Number of addressable memory cells.
pub const MEMORY_SIZE: usize = 1 << ARCH_BITS;
/// Bytes per instruction: one opcode byte and one operand byte.
pub const INSTRUCTION_SIZE: u8 = 2;
/// Number of instruction slots in memory, which also bounds the breakpoint table.
pub const MAX_INSTRUCTIONS: usize = MEMORY_SIZE / INSTRUCTION_SIZE as usize;

/// Backing store for the whole address space.
pub type MemoryImage = [u8; MEMORY_SIZE];

/// Masks a host-side address into the architectural address space.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub const fn mask_address(address: u16) -> u8 {
    (address & ARCH_BITMASK) as u8
}

/// Allocates a zeroed memory image.
#[must_use]
pub const fn new_memory_image() -> MemoryImage {
    [0; MEMORY_SIZE]
}

#[cfg(test)]
mod tests {
    use super::{
        mask_address, new_memory_image, ARCH_BITMASK, ARCH_MAXVAL, INSTRUCTION_SIZE,
        MAX_INSTRUCTIONS, MEMORY_SIZE,
    };

    #[test]
    fn constants_describe_an_8_bit_machine() {
        assert_eq!(ARCH_BITMASK, 0x00FF);
        assert_eq!(u16::from(ARCH_MAXVAL), ARCH_BITMASK);
        assert_eq!(MEMORY_SIZE, 256);
        assert_eq!(INSTRUCTION_SIZE, 2);
        assert_eq!(MAX_INSTRUCTIONS, 128);
    }

    #[test]
    fn addresses_wrap_into_address_space() {
        assert_eq!(mask_address(0x0000), 0x00);
        assert_eq!(mask_address(0x00FF), 0xFF);
        assert_eq!(mask_address(0x0100), 0x00);
        assert_eq!(mask_address(0x1234), 0x34);
    }

    #[test]
    fn new_image_is_zeroed_and_full_size() {
        let memory = new_memory_image();
        assert_eq!(memory.len(), MEMORY_SIZE);
        assert!(memory.iter().all(|cell| *cell == 0));
    }
}
