//! # resumer
//!
//! the suspension engine seam, runs a generator body one step at a time
//!

use std::fmt;
use std::marker::PhantomData;

use crate::gen_impl::Generator;
use crate::state::ResumeMode;

/// outcome of a single resumer step
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct StepResult<V> {
    /// the yielded or returned value
    pub value: V,
    /// true when the body returned instead of yielding
    pub completed: bool,
}

impl<V> StepResult<V> {
    /// the body stopped at a yield point
    #[inline]
    pub fn yielded(value: V) -> Self {
        StepResult {
            value,
            completed: false,
        }
    }

    /// the body ran to completion
    #[inline]
    pub fn returned(value: V) -> Self {
        StepResult {
            value,
            completed: true,
        }
    }
}

/// runs a suspended generator body forward
///
/// `step` is only ever called while the owning generator is `Running`, and
/// the generator handle passed in is the one being stepped. A body may call
/// back into it, every such entry fails with `Error::Nesting`.
pub trait Resumer: Sized {
    /// values passed in and yielded out
    type Value;
    /// errors raised by the body, also the injected error type
    type Error;

    /// advance the body to its next yield, return, or uncaught error
    ///
    /// `Next` delivers `input` as the result of the pending yield, `Throw`
    /// raises it there, `Close` ignores it and only runs pending cleanup.
    fn step(
        &mut self,
        generator: &Generator<Self>,
        input: StepInput<Self::Value, Self::Error>,
        mode: ResumeMode,
    ) -> Result<StepResult<Self::Value>, Self::Error>;
}

/// the input delivered at the suspension point
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum StepInput<V, E> {
    /// a value to resume with, `None` is undefined
    Value(Option<V>),
    /// an error to raise inside the body
    Error(E),
    /// nothing, used by `Close`
    Empty,
}

impl<V, E> StepInput<V, E> {
    /// the delivered value, if any
    pub fn into_value(self) -> Option<V> {
        match self {
            StepInput::Value(v) => v,
            _ => None,
        }
    }

    /// the injected error, if any
    pub fn into_error(self) -> Option<E> {
        match self {
            StepInput::Error(e) => Some(e),
            _ => None,
        }
    }
}

/// a resumer backed by a closure that doesn't need the generator handle
pub struct FnResumer<V, E, F> {
    f: F,
    _marker: PhantomData<fn(StepInput<V, E>) -> Result<StepResult<V>, E>>,
}

impl<V, E, F> FnResumer<V, E, F>
where
    F: FnMut(StepInput<V, E>, ResumeMode) -> Result<StepResult<V>, E>,
{
    /// wrap a step closure
    pub fn new(f: F) -> Self {
        FnResumer {
            f,
            _marker: PhantomData,
        }
    }
}

impl<V, E, F> Resumer for FnResumer<V, E, F>
where
    F: FnMut(StepInput<V, E>, ResumeMode) -> Result<StepResult<V>, E>,
{
    type Value = V;
    type Error = E;

    #[inline]
    fn step(
        &mut self,
        _generator: &Generator<Self>,
        input: StepInput<V, E>,
        mode: ResumeMode,
    ) -> Result<StepResult<V>, E> {
        (self.f)(input, mode)
    }
}

impl<V, E, F> fmt::Debug for FnResumer<V, E, F> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "FnResumer {{ ... }}")
    }
}
