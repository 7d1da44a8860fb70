//! # gencontrol
//!
//! Rust generator lifecycle controller
//!
//! A [`Generator`] owns the suspended/running/closed state of a generator
//! object and sequences `next`, `throw` and `close` requests against an
//! external [`Resumer`], the engine that actually runs the body between
//! yield points. The controller guarantees a generator is never re-entered
//! while a step is running, that a raised error closes it, and that close
//! happens exactly once.
//!
//! Two flavors exist. A modern generator reports completion with a
//! `{ value, done: true }` result. A legacy generator hands back bare
//! values, reports exhaustion with [`Error::IterationFinished`], and can be
//! closed explicitly.
//!

#![deny(missing_docs)]

#[macro_use]
extern crate log;

mod gen_impl;
pub mod host;
mod resumer;
mod rt;
mod state;

pub use crate::gen_impl::{Completion, Generator, Gn, Iter, IterResult, Method};
pub use crate::resumer::{FnResumer, Resumer, StepInput, StepResult};
pub use crate::rt::{Error, TypeError};
pub use crate::state::{Flavor, GeneratorState, ParseModeError, ResumeMode};
