use thiserror::Error;

/// Faults that stop the fetch-decode-execute loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum FaultCode {
    /// Program counter was odd at fetch time.
    #[error("program counter is not aligned to an instruction boundary")]
    UnalignedProgramCounter,
    /// Fetched opcode byte is not one of the eight assigned opcodes.
    #[error("illegal opcode")]
    IllegalOpcode,
}

#[cfg(test)]
mod tests {
    use super::FaultCode;

    #[test]
    fn messages_name_the_fault() {
        assert_eq!(FaultCode::IllegalOpcode.to_string(), "illegal opcode");
        assert!(FaultCode::UnalignedProgramCounter
            .to_string()
            .contains("not aligned"));
    }
}
