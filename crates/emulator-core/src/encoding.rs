/// The eight Acc8 opcodes, tagged with their encoded opcode byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[repr(u8)]
pub enum Opcode {
    /// `ACC <- ACC + [a]`
    Add = 0,
    /// `ACC <- ACC & [a]`
    And = 1,
    /// `ACC <- ACC | [a]`
    Orr = 2,
    /// `ACC <- ACC ^ [a]`
    Xor = 3,
    /// `ACC <- [a]`
    Ldr = 4,
    /// `[a] <- ACC`
    Str = 5,
    /// `PC <- a`
    Jmp = 6,
    /// `PC <- a` when `ACC != 0`
    Jne = 7,
}

/// Number of assigned opcodes.
pub const OPCODE_COUNT: usize = 8;

impl Opcode {
    /// All opcodes in encoding order.
    pub const ALL: [Self; OPCODE_COUNT] = [
        Self::Add,
        Self::And,
        Self::Orr,
        Self::Xor,
        Self::Ldr,
        Self::Str,
        Self::Jmp,
        Self::Jne,
    ];

    /// Classifies a raw opcode byte. Unassigned bytes yield `None`.
    #[must_use]
    pub const fn from_u8(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(Self::Add),
            1 => Some(Self::And),
            2 => Some(Self::Orr),
            3 => Some(Self::Xor),
            4 => Some(Self::Ldr),
            5 => Some(Self::Str),
            6 => Some(Self::Jmp),
            7 => Some(Self::Jne),
            _ => None,
        }
    }

    /// Returns the encoded opcode byte.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Three-letter assembler mnemonic.
    #[must_use]
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Add => "ADD",
            Self::And => "AND",
            Self::Orr => "ORR",
            Self::Xor => "XOR",
            Self::Ldr => "LDR",
            Self::Str => "STR",
            Self::Jmp => "JMP",
            Self::Jne => "JNE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Opcode, OPCODE_COUNT};

    #[test]
    fn opcode_byte_roundtrip_is_bijective_for_assigned_values() {
        for byte in 0u8..8 {
            let opcode = Opcode::from_u8(byte).expect("assigned opcode byte");
            assert_eq!(opcode.as_u8(), byte);
        }
    }

    #[test]
    fn unassigned_opcode_bytes_are_rejected() {
        for byte in 8u8..=u8::MAX {
            assert!(Opcode::from_u8(byte).is_none(), "byte {byte} should be unassigned");
        }
    }

    #[test]
    fn all_table_is_in_encoding_order() {
        assert_eq!(Opcode::ALL.len(), OPCODE_COUNT);
        for (index, opcode) in Opcode::ALL.iter().enumerate() {
            assert_eq!(usize::from(opcode.as_u8()), index);
        }
    }
}
