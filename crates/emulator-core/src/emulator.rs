//! The emulator engine: fetch-decode-execute loop and breakpoint management.

use crate::api::{CoreConfig, LogTraceSink, NullTraceSink, RunOutcome, TraceEvent, TraceSink};
use crate::breakpoints::{Breakpoint, BreakpointError, BreakpointKey, BreakpointTable};
use crate::disasm::{list_program, ListingRow};
use crate::execute::step_one;
use crate::memory::mask_address;
use crate::state::ProcessorState;

/// Largest cycle count the engine records. The counter saturates here so
/// every reachable count can be written to and read back from a state file.
pub const MAX_CYCLES: u64 = i64::MAX.unsigned_abs();

/// An Acc8 machine: processor state, breakpoints and a cycle counter.
///
/// All mutation goes through methods on this type. Cloning produces a fully
/// independent machine.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Emulator {
    pub(crate) config: CoreConfig,
    pub(crate) state: ProcessorState,
    pub(crate) breakpoints: BreakpointTable,
    pub(crate) total_cycles: u64,
}

impl Emulator {
    /// Creates a zeroed machine with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a zeroed machine with the given configuration.
    #[must_use]
    pub fn with_config(config: CoreConfig) -> Self {
        let breakpoints = BreakpointTable::with_capacity(config.breakpoint_capacity);
        Self {
            config,
            state: ProcessorState::default(),
            breakpoints,
            total_cycles: 0,
        }
    }

    /// The configuration this machine was built with.
    #[must_use]
    pub const fn config(&self) -> &CoreConfig {
        &self.config
    }

    /// Borrows the processor state.
    #[must_use]
    pub const fn state(&self) -> &ProcessorState {
        &self.state
    }

    /// Runs up to `steps` instructions.
    ///
    /// Stops early on a fault or when PC lands on a breakpoint after an
    /// executed instruction. A breakpoint at the starting PC does not stop
    /// the run; it only triggers when execution arrives there again.
    pub fn run(&mut self, steps: u32) -> RunOutcome {
        if self.config.tracing_enabled {
            self.run_traced(steps, &mut LogTraceSink)
        } else {
            self.run_traced(steps, &mut NullTraceSink)
        }
    }

    /// Executes a single instruction.
    pub fn step(&mut self) -> RunOutcome {
        self.run(1)
    }

    /// Runs like [`Emulator::run`], reporting every step to `sink`.
    pub fn run_traced(&mut self, steps: u32, sink: &mut dyn TraceSink) -> RunOutcome {
        let mut executed = 0;

        while executed < steps {
            let pc = self.state.pc();
            let instruction = match step_one(&mut self.state) {
                Ok(instruction) => instruction,
                Err(cause) => {
                    log::warn!("fault at pc {pc} after {executed} steps: {cause}");
                    sink.on_event(TraceEvent::FaultRaised { cause, pc });
                    return RunOutcome::Fault {
                        steps: executed,
                        cause,
                        pc,
                    };
                }
            };

            executed += 1;
            self.total_cycles = self.total_cycles.saturating_add(1).min(MAX_CYCLES);

            let next_pc = self.state.pc();
            sink.on_event(TraceEvent::InstructionRetired {
                pc,
                instruction,
                acc: self.state.acc(),
                next_pc,
            });

            if self.breakpoints.contains(next_pc) {
                log::debug!("breakpoint hit at {next_pc} after {executed} steps");
                sink.on_event(TraceEvent::BreakpointHit { address: next_pc });
                return RunOutcome::Breakpoint {
                    steps: executed,
                    address: next_pc,
                };
            }
        }

        RunOutcome::Completed { steps: executed }
    }

    /// Adds a named breakpoint.
    ///
    /// # Errors
    ///
    /// See [`BreakpointTable::insert`].
    pub fn insert_breakpoint(&mut self, address: u16, name: &str) -> Result<(), BreakpointError> {
        self.breakpoints.insert(address, name)
    }

    /// Removes the breakpoint matching `key`.
    ///
    /// # Errors
    ///
    /// Returns [`BreakpointError::NotFound`] when nothing matches.
    pub fn delete_breakpoint(
        &mut self,
        key: BreakpointKey<'_>,
    ) -> Result<Breakpoint, BreakpointError> {
        self.breakpoints.remove(key)
    }

    /// Looks up the breakpoint matching `key`.
    #[must_use]
    pub fn find_breakpoint(&self, key: BreakpointKey<'_>) -> Option<&Breakpoint> {
        self.breakpoints.position(key).map(|(_, breakpoint)| breakpoint)
    }

    /// Borrows the breakpoint table.
    #[must_use]
    pub const fn breakpoints(&self) -> &BreakpointTable {
        &self.breakpoints
    }

    /// Number of breakpoints currently set.
    #[must_use]
    pub fn num_breakpoints(&self) -> usize {
        self.breakpoints.len()
    }

    /// Returns `true` when a breakpoint sits at the current PC.
    #[must_use]
    pub fn is_breakpoint(&self) -> bool {
        self.breakpoints.contains(self.state.pc())
    }

    /// Instructions executed since the last load or reset, saturating at
    /// [`MAX_CYCLES`].
    #[must_use]
    pub const fn cycles(&self) -> u64 {
        self.total_cycles
    }

    /// Reads the accumulator.
    #[must_use]
    pub const fn read_accumulator(&self) -> u8 {
        self.state.acc()
    }

    /// Reads the program counter.
    #[must_use]
    pub const fn read_program_counter(&self) -> u8 {
        self.state.pc()
    }

    /// Returns `true` when the accumulator holds zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.state.is_zero()
    }

    /// Reads memory at `address` (after masking).
    #[must_use]
    pub const fn read_memory(&self, address: u16) -> u8 {
        self.state.read(mask_address(address))
    }

    /// Writes memory at `address` (after masking).
    pub const fn write_memory(&mut self, address: u16, value: u8) {
        self.state.write(mask_address(address), value);
    }

    /// Copies `bytes` into memory starting at `offset`, wrapping at the top of
    /// the address space.
    pub fn load_program(&mut self, offset: u16, bytes: &[u8]) {
        let mut address = mask_address(offset);
        for byte in bytes {
            self.state.write(address, *byte);
            address = address.wrapping_add(1);
        }
    }

    /// Clears registers, memory, breakpoints and the cycle counter.
    pub fn reset(&mut self) {
        self.state.reset();
        self.breakpoints.clear();
        self.total_cycles = 0;
    }

    /// Lists every instruction slot of memory.
    #[must_use]
    pub fn list_program(&self) -> Vec<ListingRow> {
        list_program(self.state.memory())
    }
}
