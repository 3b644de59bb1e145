//! Named execution breakpoints.
//!
//! The table keeps breakpoints in insertion order. Both the address and the
//! name of every entry are unique, so any lookup matches at most one entry.

use std::fmt;

use thiserror::Error;

use crate::memory::{mask_address, MAX_INSTRUCTIONS};

/// A named program-counter value that halts execution when reached.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Breakpoint {
    address: u8,
    name: String,
}

impl Breakpoint {
    /// Builds a breakpoint, masking `address` into the address space.
    #[must_use]
    pub fn new(address: u16, name: impl Into<String>) -> Self {
        Self {
            address: mask_address(address),
            name: name.into(),
        }
    }

    /// The breakpoint address.
    #[must_use]
    pub const fn address(&self) -> u8 {
        self.address
    }

    /// The breakpoint name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `true` when this breakpoint sits at `address` (after masking).
    #[must_use]
    pub const fn has_address(&self, address: u16) -> bool {
        self.address == mask_address(address)
    }

    /// Returns `true` when this breakpoint is called `name`.
    #[must_use]
    pub fn has_name(&self, name: &str) -> bool {
        self.name == name
    }
}

impl fmt::Display for Breakpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.address, self.name)
    }
}

/// Selects a breakpoint either by address or by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BreakpointKey<'a> {
    /// Match on the (masked) address.
    Address(u16),
    /// Match on the exact name.
    Name(&'a str),
}

impl BreakpointKey<'_> {
    fn matches(self, breakpoint: &Breakpoint) -> bool {
        match self {
            Self::Address(address) => breakpoint.has_address(address),
            Self::Name(name) => breakpoint.has_name(name),
        }
    }
}

impl fmt::Display for BreakpointKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Address(address) => write!(f, "address {}", mask_address(*address)),
            Self::Name(name) => write!(f, "name {name:?}"),
        }
    }
}

/// Failures reported by breakpoint table mutation and lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
pub enum BreakpointError {
    /// The table already holds its maximum number of entries.
    #[error("breakpoint table is full ({capacity} entries)")]
    TableFull {
        /// Configured table capacity.
        capacity: usize,
    },
    /// Another breakpoint already uses this address.
    #[error("a breakpoint already exists at address {address}")]
    DuplicateAddress {
        /// The conflicting address.
        address: u8,
    },
    /// Another breakpoint already uses this name.
    #[error("a breakpoint named {name:?} already exists")]
    DuplicateName {
        /// The conflicting name.
        name: String,
    },
    /// Names must be a single non-empty whitespace-free token.
    #[error("invalid breakpoint name {name:?}")]
    InvalidName {
        /// The rejected name.
        name: String,
    },
    /// No breakpoint matches the requested key.
    #[error("no breakpoint with {key}")]
    NotFound {
        /// Rendered lookup key.
        key: String,
    },
}

/// Insertion-ordered breakpoint storage with a fixed capacity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreakpointTable {
    entries: Vec<Breakpoint>,
    capacity: usize,
}

impl Default for BreakpointTable {
    fn default() -> Self {
        Self::with_capacity(MAX_INSTRUCTIONS)
    }
}

impl BreakpointTable {
    /// Creates an empty table. Capacity is clamped to `MAX_INSTRUCTIONS`.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.min(MAX_INSTRUCTIONS);
        Self {
            entries: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Maximum number of entries.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Current number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when no breakpoints are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Breakpoint> {
        self.entries.iter()
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Appends a breakpoint.
    ///
    /// # Errors
    ///
    /// Fails when the table is full, when `name` is empty or contains
    /// whitespace, or when the address or name is already in use. The table
    /// is unchanged on failure.
    pub fn insert(&mut self, address: u16, name: &str) -> Result<(), BreakpointError> {
        if self.entries.len() >= self.capacity {
            return Err(BreakpointError::TableFull {
                capacity: self.capacity,
            });
        }

        if name.is_empty() || name.chars().any(char::is_whitespace) {
            return Err(BreakpointError::InvalidName {
                name: name.to_string(),
            });
        }

        if self.find_by_address(address).is_some() {
            return Err(BreakpointError::DuplicateAddress {
                address: mask_address(address),
            });
        }

        if self.find_by_name(name).is_some() {
            return Err(BreakpointError::DuplicateName {
                name: name.to_string(),
            });
        }

        self.entries.push(Breakpoint::new(address, name));
        Ok(())
    }

    /// Finds the entry matching `key` together with its position.
    #[must_use]
    pub fn position(&self, key: BreakpointKey<'_>) -> Option<(usize, &Breakpoint)> {
        self.entries
            .iter()
            .enumerate()
            .find(|(_, breakpoint)| key.matches(breakpoint))
    }

    /// Finds the entry at `address` (after masking).
    #[must_use]
    pub fn find_by_address(&self, address: u16) -> Option<&Breakpoint> {
        self.position(BreakpointKey::Address(address))
            .map(|(_, breakpoint)| breakpoint)
    }

    /// Finds the entry called `name`.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<&Breakpoint> {
        self.position(BreakpointKey::Name(name))
            .map(|(_, breakpoint)| breakpoint)
    }

    /// Returns `true` when a breakpoint sits at `pc`.
    #[must_use]
    pub fn contains(&self, pc: u8) -> bool {
        self.find_by_address(u16::from(pc)).is_some()
    }

    /// Removes the entry matching `key`, keeping the remaining entries in order.
    ///
    /// # Errors
    ///
    /// Returns [`BreakpointError::NotFound`] when nothing matches; the table
    /// is unchanged in that case.
    pub fn remove(&mut self, key: BreakpointKey<'_>) -> Result<Breakpoint, BreakpointError> {
        let Some((index, _)) = self.position(key) else {
            return Err(BreakpointError::NotFound {
                key: key.to_string(),
            });
        };
        Ok(self.entries.remove(index))
    }
}

impl<'a> IntoIterator for &'a BreakpointTable {
    type Item = &'a Breakpoint;
    type IntoIter = std::slice::Iter<'a, Breakpoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
