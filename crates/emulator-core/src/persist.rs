//! Text state-file persistence.
//!
//! The layout is strictly line oriented, one value per line:
//!
//! ```text
//! <total cycles>
//! <accumulator>
//! <program counter>
//! <memory[0]>
//! ...
//! <memory[MEMORY_SIZE - 1]>
//! <address> <name>      (zero or more breakpoint lines)
//! ```

use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use thiserror::Error;

use crate::breakpoints::{BreakpointError, BreakpointTable};
use crate::emulator::{Emulator, MAX_CYCLES};
use crate::memory::{new_memory_image, ARCH_MAXVAL, MEMORY_SIZE};
use crate::state::ProcessorState;

/// Identifies which value of the state file a line holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateField {
    /// Executed-instruction counter.
    TotalCycles,
    /// Accumulator register.
    Accumulator,
    /// Program counter register.
    ProgramCounter,
    /// One memory cell.
    Memory(usize),
    /// Address column of a breakpoint line.
    BreakpointAddress,
}

impl fmt::Display for StateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TotalCycles => f.write_str("total cycles"),
            Self::Accumulator => f.write_str("accumulator"),
            Self::ProgramCounter => f.write_str("program counter"),
            Self::Memory(offset) => write!(f, "memory cell {offset}"),
            Self::BreakpointAddress => f.write_str("breakpoint address"),
        }
    }
}

/// Failures reported while loading or saving a state file.
///
/// Line numbers are 1-based.
#[derive(Debug, Error)]
pub enum PersistError {
    /// The file could not be opened, read or written.
    #[error("state file i/o failed")]
    Io(#[from] io::Error),
    /// The file ended before a required value.
    #[error("line {line}: missing {field}")]
    MissingField {
        /// Line where the value was expected.
        line: usize,
        /// Expected value.
        field: StateField,
    },
    /// A value is not an integer.
    #[error("line {line}: {field} is not an integer: {text:?}")]
    MalformedInteger {
        /// Offending line.
        line: usize,
        /// Value being parsed.
        field: StateField,
        /// Offending text.
        text: String,
    },
    /// A value is outside its permitted range.
    #[error("line {line}: {field} {value} is outside 0..={max}")]
    OutOfRange {
        /// Offending line.
        line: usize,
        /// Value being parsed.
        field: StateField,
        /// Parsed value.
        value: i128,
        /// Largest permitted value.
        max: u64,
    },
    /// A value line holds more than one token.
    #[error("line {line}: unexpected text after {field}")]
    TrailingGarbage {
        /// Offending line.
        line: usize,
        /// Value being parsed.
        field: StateField,
    },
    /// A breakpoint line is not `<address> <name>`.
    #[error("line {line}: breakpoint must be `<address> <name>`")]
    MalformedBreakpoint {
        /// Offending line.
        line: usize,
    },
    /// A breakpoint line was rejected by the breakpoint table.
    #[error("line {line}: rejected breakpoint")]
    Breakpoint {
        /// Offending line.
        line: usize,
        /// Table rejection reason.
        #[source]
        source: BreakpointError,
    },
}

struct LineReader<R> {
    lines: io::Lines<R>,
    line: usize,
}

impl<R: BufRead> LineReader<R> {
    fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line: 0,
        }
    }

    fn next_line(&mut self) -> Result<Option<String>, PersistError> {
        match self.lines.next() {
            Some(line) => {
                self.line += 1;
                Ok(Some(line?))
            }
            None => Ok(None),
        }
    }

    fn required(&mut self, field: StateField) -> Result<String, PersistError> {
        self.next_line()?.ok_or(PersistError::MissingField {
            line: self.line + 1,
            field,
        })
    }

    fn value(&mut self, field: StateField, max: u64) -> Result<u64, PersistError> {
        let text = self.required(field)?;
        let mut tokens = text.split_whitespace();
        let Some(token) = tokens.next() else {
            return Err(PersistError::MissingField {
                line: self.line,
                field,
            });
        };
        if tokens.next().is_some() {
            return Err(PersistError::TrailingGarbage {
                line: self.line,
                field,
            });
        }
        parse_bounded(token, self.line, field, max)
    }
}

fn parse_bounded(token: &str, line: usize, field: StateField, max: u64) -> Result<u64, PersistError> {
    let value: i128 = token.parse().map_err(|_| PersistError::MalformedInteger {
        line,
        field,
        text: token.to_string(),
    })?;
    match u64::try_from(value) {
        Ok(unsigned) if unsigned <= max => Ok(unsigned),
        _ => Err(PersistError::OutOfRange {
            line,
            field,
            value,
            max,
        }),
    }
}

fn narrow(value: u64) -> u8 {
    u8::try_from(value).unwrap_or(ARCH_MAXVAL)
}

impl Emulator {
    /// Loads machine state from the file at `path`.
    ///
    /// The breakpoint table is cleared before anything else happens, so it
    /// stays empty if the load fails. Registers, memory and the cycle counter
    /// are only replaced when the whole file parses.
    ///
    /// # Errors
    ///
    /// Returns a [`PersistError`] for an unreadable file or any malformed,
    /// missing or out-of-range value.
    pub fn load_state(&mut self, path: impl AsRef<Path>) -> Result<(), PersistError> {
        let path = path.as_ref();
        self.breakpoints.clear();
        let file = File::open(path).inspect_err(|err| {
            log::warn!("cannot open state file {}: {err}", path.display());
        })?;
        self.read_state_from(BufReader::new(file))
            .inspect(|_| log::debug!("loaded state from {}", path.display()))
    }

    /// Loads machine state from any buffered reader.
    ///
    /// # Errors
    ///
    /// See [`Emulator::load_state`].
    pub fn read_state_from(&mut self, reader: impl BufRead) -> Result<(), PersistError> {
        self.breakpoints.clear();
        let (total_cycles, state, breakpoints) =
            parse_state(reader, self.breakpoints.capacity()).inspect_err(|err| {
                log::warn!("rejected state file: {err}");
            })?;

        self.total_cycles = total_cycles;
        self.state = state;
        self.breakpoints = breakpoints;
        Ok(())
    }

    /// Saves machine state to the file at `path`, replacing its contents.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError::Io`] when the file cannot be created or written.
    pub fn save_state(&self, path: impl AsRef<Path>) -> Result<(), PersistError> {
        let path = path.as_ref();
        let file = File::create(path)?;
        self.write_state_to(BufWriter::new(file))?;
        log::debug!("saved state to {}", path.display());
        Ok(())
    }

    /// Writes machine state to any writer.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError::Io`] when writing fails.
    pub fn write_state_to(&self, mut out: impl Write) -> Result<(), PersistError> {
        writeln!(out, "{}", self.total_cycles)?;
        writeln!(out, "{}", self.state.acc())?;
        writeln!(out, "{}", self.state.pc())?;
        for cell in self.state.memory() {
            writeln!(out, "{cell}")?;
        }
        for breakpoint in &self.breakpoints {
            writeln!(out, "{breakpoint}")?;
        }
        out.flush()?;
        Ok(())
    }
}

fn parse_state(
    reader: impl BufRead,
    breakpoint_capacity: usize,
) -> Result<(u64, ProcessorState, BreakpointTable), PersistError> {
    let mut lines = LineReader::new(reader);
    let max_value = u64::from(ARCH_MAXVAL);
    let max_address = (MEMORY_SIZE - 1) as u64;

    let total_cycles = lines.value(StateField::TotalCycles, MAX_CYCLES)?;
    let acc = narrow(lines.value(StateField::Accumulator, max_value)?);
    let pc = narrow(lines.value(StateField::ProgramCounter, max_address)?);

    let mut memory = new_memory_image();
    for (offset, cell) in memory.iter_mut().enumerate() {
        *cell = narrow(lines.value(StateField::Memory(offset), max_value)?);
    }

    let mut breakpoints = BreakpointTable::with_capacity(breakpoint_capacity);
    while let Some(text) = lines.next_line()? {
        let line = lines.line;
        let tokens: Vec<&str> = text.split_whitespace().collect();
        let (address, name) = match tokens.as_slice() {
            [] => continue,
            [address, name] => (*address, *name),
            _ => return Err(PersistError::MalformedBreakpoint { line }),
        };
        let address = parse_bounded(address, line, StateField::BreakpointAddress, max_address)?;
        breakpoints
            .insert(u16::from(narrow(address)), name)
            .map_err(|source| PersistError::Breakpoint { line, source })?;
    }

    Ok((
        total_cycles,
        ProcessorState::from_parts(acc, pc, memory),
        breakpoints,
    ))
}
