//! # generator state
//!
//! value types describing where a generator is in its lifecycle
//!

use std::fmt;
use std::str::FromStr;

/// generator lifecycle state
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum GeneratorState {
    /// parked at a yield point (or not started yet), can be resumed
    Suspended,
    /// inside a resumer step, any entry is a nesting error
    Running,
    /// finished, terminal
    Closed,
}

impl GeneratorState {
    /// the name used in diagnostics
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            GeneratorState::Suspended => "suspended",
            GeneratorState::Running => "running",
            GeneratorState::Closed => "closed",
        }
    }
}

impl fmt::Display for GeneratorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// completion signaling convention of a generator
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Flavor {
    /// completion is a `{ value, done: true }` result
    Modern,
    /// completion is the `IterationFinished` error, supports `close`
    Legacy,
}

impl fmt::Display for Flavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Flavor::Modern => f.write_str("modern"),
            Flavor::Legacy => f.write_str("legacy"),
        }
    }
}

/// how the resumer should deliver the input at the suspension point
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ResumeMode {
    /// input becomes the result of the yield expression
    Next,
    /// input is raised as an error at the yield point
    Throw,
    /// run pending cleanup blocks and finish, input is ignored
    Close,
}

impl ResumeMode {
    /// the resume kind string
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            ResumeMode::Next => "next",
            ResumeMode::Throw => "throw",
            ResumeMode::Close => "close",
        }
    }
}

impl fmt::Display for ResumeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// returned when parsing an unknown resume kind
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ParseModeError(String);

impl fmt::Display for ParseModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid resume kind: {:?}", self.0)
    }
}

impl std::error::Error for ParseModeError {}

impl FromStr for ResumeMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "next" => Ok(ResumeMode::Next),
            "throw" => Ok(ResumeMode::Throw),
            "close" => Ok(ResumeMode::Close),
            other => Err(ParseModeError(other.to_owned())),
        }
    }
}
