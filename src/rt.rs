//! # generator run time support
//!
//! error types and the running state guard
//!
use std::cell::Cell;
use std::fmt;

use crate::state::{Flavor, GeneratorState};

/// generator operation error
///
/// `E` is the host's thrown value type, errors raised by the generator body
/// and errors injected with `resume_with_error` travel in `Raised` untouched.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Error<E> {
    /// resume or close attempted while the generator is running
    Nesting,
    /// a legacy generator has no more values
    IterationFinished,
    /// the receiver is not a generator of the expected flavor
    Type(TypeError),
    /// error raised by the generator body or rethrown from a closed generator
    Raised(E),
}

impl<E> Error<E> {
    /// return the raised value if this error carries one
    pub fn into_raised(self) -> Option<E> {
        match self {
            Error::Raised(e) => Some(e),
            _ => None,
        }
    }

    /// is this the legacy "no more values" signal
    #[inline]
    pub fn is_iteration_finished(&self) -> bool {
        matches!(self, Error::IterationFinished)
    }
}

impl<E: fmt::Display> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Nesting => f.write_str("already executing generator"),
            Error::IterationFinished => f.write_str("iteration finished"),
            Error::Type(e) => e.fmt(f),
            Error::Raised(e) => e.fmt(f),
        }
    }
}

impl<E: fmt::Debug + fmt::Display> std::error::Error for Error<E> {}

/// a generator method was called on an incompatible receiver
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TypeError {
    /// the flavor the method belongs to
    pub expected: Flavor,
    /// the method name, `next`, `throw` or `close`
    pub method: &'static str,
}

impl TypeError {
    pub(crate) fn new(expected: Flavor, method: &'static str) -> Self {
        TypeError { expected, method }
    }
}

impl fmt::Display for TypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} generator method `{}` called on incompatible receiver",
            self.expected, self.method
        )
    }
}

/// holds a generator in `Running` for the extent of one resumer step
///
/// the exit state is written back on drop, so error returns and panics
/// out of the step release the flag too. A closed generator stays closed.
pub(crate) struct Running<'a> {
    state: &'a Cell<GeneratorState>,
    exit: GeneratorState,
}

impl<'a> Running<'a> {
    #[inline]
    pub(crate) fn enter(state: &'a Cell<GeneratorState>) -> Self {
        debug_assert_eq!(state.get(), GeneratorState::Suspended);
        state.set(GeneratorState::Running);
        // anything but a clean suspend closes
        Running {
            state,
            exit: GeneratorState::Closed,
        }
    }

    /// leave the step parked at a yield point
    #[inline]
    pub(crate) fn suspend(mut self) {
        self.exit = GeneratorState::Suspended;
    }

    /// leave the step finished
    #[inline]
    pub(crate) fn finish(self) {}
}

impl Drop for Running<'_> {
    fn drop(&mut self) {
        if self.state.get() != GeneratorState::Closed {
            self.state.set(self.exit);
        }
    }
}
