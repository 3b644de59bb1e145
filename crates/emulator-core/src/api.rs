//! Public host-facing API contracts for embedding the emulator core.

use crate::decoder::Instruction;
use crate::fault::FaultCode;
use crate::memory::MAX_INSTRUCTIONS;

/// Top-level configuration for an emulator instance.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct CoreConfig {
    /// Maximum number of breakpoints. Clamped to `MAX_INSTRUCTIONS`.
    pub breakpoint_capacity: usize,
    /// Forwards every trace event from `run` to the `log` facade at trace level.
    pub tracing_enabled: bool,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            breakpoint_capacity: MAX_INSTRUCTIONS,
            tracing_enabled: false,
        }
    }
}

/// Result of a `run` call.
///
/// `steps` always counts the instructions this call executed successfully.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum RunOutcome {
    /// All requested steps executed.
    Completed {
        /// Executed instruction count.
        steps: u32,
    },
    /// Execution stopped because PC reached a breakpoint.
    Breakpoint {
        /// Executed instruction count, including the one landing on the breakpoint.
        steps: u32,
        /// Breakpoint address (the new PC).
        address: u8,
    },
    /// Execution stopped on a fault. The faulting instruction did not execute.
    Fault {
        /// Executed instruction count before the fault.
        steps: u32,
        /// Fault raised at fetch/decode.
        cause: FaultCode,
        /// PC at which the fault was raised.
        pc: u8,
    },
}

impl RunOutcome {
    /// Number of instructions executed by the run.
    #[must_use]
    pub const fn steps(self) -> u32 {
        match self {
            Self::Completed { steps }
            | Self::Breakpoint { steps, .. }
            | Self::Fault { steps, .. } => steps,
        }
    }

    /// Returns `true` unless the run stopped on a fault.
    #[must_use]
    pub const fn is_success(self) -> bool {
        !matches!(self, Self::Fault { .. })
    }

    /// Returns the fault, if the run stopped on one.
    #[must_use]
    pub const fn fault(self) -> Option<FaultCode> {
        match self {
            Self::Fault { cause, .. } => Some(cause),
            Self::Completed { .. } | Self::Breakpoint { .. } => None,
        }
    }
}

/// Trace events emitted at step boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraceEvent {
    /// An instruction executed.
    InstructionRetired {
        /// PC the instruction was fetched from.
        pc: u8,
        /// The executed instruction.
        instruction: Instruction,
        /// Accumulator after execution.
        acc: u8,
        /// PC after execution.
        next_pc: u8,
    },
    /// PC landed on a breakpoint after an executed instruction.
    BreakpointHit {
        /// Breakpoint address.
        address: u8,
    },
    /// Fetch or decode faulted.
    FaultRaised {
        /// Raised fault.
        cause: FaultCode,
        /// PC active when the fault was observed.
        pc: u8,
    },
}

/// Sink trait for step-boundary trace hooks.
pub trait TraceSink {
    /// Records an event in execution order.
    fn on_event(&mut self, event: TraceEvent);
}

impl<F: FnMut(TraceEvent)> TraceSink for F {
    fn on_event(&mut self, event: TraceEvent) {
        self(event);
    }
}

/// Trace sink that writes events to the `log` facade at trace level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogTraceSink;

impl TraceSink for LogTraceSink {
    fn on_event(&mut self, event: TraceEvent) {
        match event {
            TraceEvent::InstructionRetired {
                pc,
                instruction,
                acc,
                next_pc,
            } => log::trace!("{pc:3}: {instruction} ; acc={acc} pc={next_pc}"),
            TraceEvent::BreakpointHit { address } => log::trace!("breakpoint at {address}"),
            TraceEvent::FaultRaised { cause, pc } => log::trace!("fault at {pc}: {cause}"),
        }
    }
}

/// Trace sink that discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullTraceSink;

impl TraceSink for NullTraceSink {
    fn on_event(&mut self, _event: TraceEvent) {}
}
