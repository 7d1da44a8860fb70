//! # generator
//!
//! generator object and the resume/throw/close protocol
//!

use std::cell::{Cell, Ref, RefCell};
use std::fmt;

use crate::resumer::{Resumer, StepInput, StepResult};
use crate::rt::{Error, Running, TypeError};
use crate::state::{Flavor, GeneratorState, ResumeMode};

/// Generator helper
pub struct Gn;

impl Gn {
    /// create a suspended generator of the given flavor
    pub fn new<R: Resumer>(flavor: Flavor, resumer: R) -> Generator<R> {
        Generator {
            state: Cell::new(GeneratorState::Suspended),
            newborn: Cell::new(flavor == Flavor::Legacy),
            flavor,
            resumer: RefCell::new(resumer),
        }
    }

    /// create a generator that completes with a `{ value, done }` result
    pub fn modern<R: Resumer>(resumer: R) -> Generator<R> {
        Self::new(Flavor::Modern, resumer)
    }

    /// create a newborn generator that completes with `IterationFinished`
    pub fn legacy<R: Resumer>(resumer: R) -> Generator<R> {
        Self::new(Flavor::Legacy, resumer)
    }
}

/// the `{ value, done }` result of a modern generator
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct IterResult<V> {
    /// the produced value, `None` is undefined
    pub value: Option<V>,
    /// true once the generator has finished
    pub done: bool,
}

impl<V> IterResult<V> {
    /// the `{ value: undefined, done: true }` sentinel
    #[inline]
    pub fn done() -> Self {
        IterResult {
            value: None,
            done: true,
        }
    }
}

/// what a successful resume hands back, shaped by the generator flavor
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Completion<V> {
    /// modern generators return a result object
    Result(IterResult<V>),
    /// legacy generators return the bare value
    Value(V),
}

impl<V> Completion<V> {
    /// the carried value, `None` for the done sentinel
    pub fn into_value(self) -> Option<V> {
        match self {
            Completion::Result(r) => r.value,
            Completion::Value(v) => Some(v),
        }
    }

    /// only a modern result can report completion
    #[inline]
    pub fn is_done(&self) -> bool {
        matches!(self, Completion::Result(IterResult { done: true, .. }))
    }
}

/// a host-level generator method call
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Method<V, E> {
    /// `next(value)`
    Next(Option<V>),
    /// `throw(error)`
    Throw(E),
    /// `close()`, legacy only
    Close,
}

impl<V, E> Method<V, E> {
    /// the method name
    pub fn name(&self) -> &'static str {
        self.mode().as_str()
    }

    /// the resume mode this method steps with
    pub fn mode(&self) -> ResumeMode {
        match self {
            Method::Next(_) => ResumeMode::Next,
            Method::Throw(_) => ResumeMode::Throw,
            Method::Close => ResumeMode::Close,
        }
    }
}

/// a generator object
///
/// the state gates every entry point, so while a resumer step is running
/// any resume, throw or close through the same handle fails with
/// `Error::Nesting` and leaves the state alone.
pub struct Generator<R> {
    state: Cell<GeneratorState>,
    // legacy only, cleared by the first resume or close
    newborn: Cell<bool>,
    flavor: Flavor,
    resumer: RefCell<R>,
}

impl<R> Generator<R> {
    /// current lifecycle state
    #[inline]
    pub fn state(&self) -> GeneratorState {
        self.state.get()
    }

    /// completion convention
    #[inline]
    pub fn flavor(&self) -> Flavor {
        self.flavor
    }

    /// is finished
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.state.get() == GeneratorState::Closed
    }

    /// is inside a resumer step
    #[inline]
    pub fn is_running(&self) -> bool {
        self.state.get() == GeneratorState::Running
    }

    /// a legacy generator that was never resumed or closed
    #[inline]
    pub fn is_newborn(&self) -> bool {
        self.newborn.get()
    }

    /// borrow the resumer, `None` while a step is running
    pub fn resumer(&self) -> Option<Ref<'_, R>> {
        self.resumer.try_borrow().ok()
    }

    /// consume the generator and return its resumer
    pub fn into_inner(self) -> R {
        self.resumer.into_inner()
    }
}

impl<R: Resumer> Generator<R> {
    /// resume with a value delivered at the pending yield
    ///
    /// a closed modern generator returns the done sentinel and a closed
    /// legacy one fails with `IterationFinished`, neither steps the body.
    pub fn resume_with_value(
        &self,
        value: Option<R::Value>,
    ) -> Result<Completion<R::Value>, Error<R::Error>> {
        if self.is_closed() {
            return match self.flavor {
                Flavor::Modern => Ok(Completion::Result(IterResult::done())),
                Flavor::Legacy => Err(Error::IterationFinished),
            };
        }

        if self.is_running() {
            return Err(Error::Nesting);
        }

        let ret = self.resume_gen(StepInput::Value(value), ResumeMode::Next)?;
        Ok(self.complete(ret))
    }

    /// resume by raising `err` at the pending yield
    ///
    /// a closed generator of either flavor rethrows `err` untouched
    pub fn resume_with_error(
        &self,
        err: R::Error,
    ) -> Result<Completion<R::Value>, Error<R::Error>> {
        if self.is_closed() {
            return Err(Error::Raised(err));
        }

        if self.is_running() {
            return Err(Error::Nesting);
        }

        let ret = self.resume_gen(StepInput::Error(err), ResumeMode::Throw)?;
        Ok(self.complete(ret))
    }

    /// close a legacy generator, running the body's pending cleanup
    ///
    /// a newborn generator is closed without stepping, a closed one is left
    /// alone. Every path that returns, including an error raised by the
    /// cleanup, leaves the generator closed, except `Error::Nesting`.
    pub fn close(&self) -> Result<(), Error<R::Error>> {
        if self.flavor != Flavor::Legacy {
            return Err(Error::Type(TypeError::new(Flavor::Legacy, "close")));
        }

        if self.is_closed() || self.close_newborn() {
            return Ok(());
        }

        self.close_internal()
    }

    /// dispatch a host method call
    ///
    /// `Close` has no result value and returns `None`
    pub fn resume(
        &self,
        method: Method<R::Value, R::Error>,
    ) -> Result<Option<Completion<R::Value>>, Error<R::Error>> {
        match method {
            Method::Next(v) => self.resume_with_value(v).map(Some),
            Method::Throw(e) => self.resume_with_error(e).map(Some),
            Method::Close => self.close().map(|_| None),
        }
    }

    /// iterate the remaining values
    pub fn iter(&self) -> Iter<'_, R> {
        Iter {
            gen: self,
            finished: false,
        }
    }

    fn close_newborn(&self) -> bool {
        if !self.newborn.get() {
            return false;
        }
        debug!("close newborn generator");
        self.newborn.set(false);
        self.state.set(GeneratorState::Closed);
        true
    }

    // the generator must be a started legacy generator that is not closed
    pub(crate) fn close_internal(&self) -> Result<(), Error<R::Error>> {
        debug_assert_eq!(self.flavor, Flavor::Legacy);
        debug_assert!(!self.is_closed(), "already closed");
        debug_assert!(!self.newborn.get(), "newborn");

        if self.is_running() {
            return Err(Error::Nesting);
        }

        let ret = self.resume_gen(StepInput::Empty, ResumeMode::Close);

        // the body may yield again from a cleanup block
        if !self.is_closed() {
            debug!("force close generator after close step");
            self.state.set(GeneratorState::Closed);
        }
        ret.map(drop)
    }

    /// step the body once, holding the running flag for the whole call
    fn resume_gen(
        &self,
        input: StepInput<R::Value, R::Error>,
        mode: ResumeMode,
    ) -> Result<StepResult<R::Value>, Error<R::Error>> {
        self.newborn.set(false);

        trace!("resume {} generator with {}", self.flavor, mode);
        let guard = Running::enter(&self.state);
        let ret = self.resumer.borrow_mut().step(self, input, mode);

        match ret {
            Ok(r) => {
                if r.completed {
                    guard.finish();
                } else {
                    guard.suspend();
                }
                trace!("generator step done, now {}", self.state());
                Ok(r)
            }
            Err(e) => {
                drop(guard);
                trace!("generator raised, now {}", self.state());
                Err(Error::Raised(e))
            }
        }
    }

    #[inline]
    fn complete(&self, ret: StepResult<R::Value>) -> Completion<R::Value> {
        match self.flavor {
            Flavor::Modern => Completion::Result(IterResult {
                value: Some(ret.value),
                done: ret.completed,
            }),
            Flavor::Legacy => Completion::Value(ret.value),
        }
    }
}

impl<R> fmt::Debug for Generator<R> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Generator")
            .field("state", &self.state.get())
            .field("flavor", &self.flavor)
            .field("newborn", &self.newborn.get())
            .finish_non_exhaustive()
    }
}

/// iterator over the values of a generator
///
/// a raised error is yielded once, then the iterator is fused. Dropping an
/// unfinished iterator over a legacy generator closes the generator.
pub struct Iter<'a, R: Resumer> {
    gen: &'a Generator<R>,
    finished: bool,
}

impl<'a, R: Resumer> Iterator for Iter<'a, R> {
    type Item = Result<R::Value, Error<R::Error>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        match self.gen.resume_with_value(None) {
            Ok(Completion::Result(IterResult { done: true, .. })) => {
                self.finished = true;
                None
            }
            Ok(Completion::Result(IterResult { value, .. })) => value.map(Ok),
            Ok(Completion::Value(v)) => Some(Ok(v)),
            Err(Error::IterationFinished) => {
                self.finished = true;
                None
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

impl<R: Resumer> Drop for Iter<'_, R> {
    fn drop(&mut self) {
        if self.finished || self.gen.flavor() != Flavor::Legacy {
            return;
        }

        if self.gen.close().is_err() {
            warn!("legacy generator failed to close while dropping its iterator");
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::resumer::FnResumer;

    fn counting(
        limit: u32,
    ) -> FnResumer<u32, String, impl FnMut(StepInput<u32, String>, ResumeMode) -> Result<StepResult<u32>, String>>
    {
        let mut n = 0;
        FnResumer::new(move |input, mode| match mode {
            ResumeMode::Next => {
                n += 1 + input.into_value().unwrap_or(0);
                if n >= limit {
                    Ok(StepResult::returned(n))
                } else {
                    Ok(StepResult::yielded(n))
                }
            }
            ResumeMode::Throw => Err(input.into_error().unwrap_or_default()),
            ResumeMode::Close => Ok(StepResult::returned(0)),
        })
    }

    #[test]
    fn modern_runs_to_done() {
        let g = Gn::modern(counting(2));
        assert!(!g.is_newborn());

        let r = g.resume_with_value(None).unwrap();
        assert_eq!(
            r,
            Completion::Result(IterResult {
                value: Some(1),
                done: false
            })
        );
        assert_eq!(g.state(), GeneratorState::Suspended);

        let r = g.resume_with_value(None).unwrap();
        assert!(r.is_done());
        assert_eq!(r.into_value(), Some(2));
        assert!(g.is_closed());

        let r = g.resume_with_value(Some(7)).unwrap();
        assert_eq!(r, Completion::Result(IterResult::done()));
    }

    #[test]
    fn sent_value_reaches_body() {
        let g = Gn::legacy(counting(100));
        assert_eq!(g.resume_with_value(Some(9)).unwrap(), Completion::Value(10));
        assert_eq!(g.resume_with_value(None).unwrap(), Completion::Value(11));
    }

    #[test]
    fn throw_closes_on_uncaught() {
        let g = Gn::modern(counting(10));
        g.resume_with_value(None).unwrap();

        let err = g.resume_with_error("boom".to_owned()).unwrap_err();
        assert_eq!(err, Error::Raised("boom".to_owned()));
        assert!(g.is_closed());

        // closed generators rethrow without stepping
        let err = g.resume_with_error("again".to_owned()).unwrap_err();
        assert_eq!(err, Error::Raised("again".to_owned()));
    }

    #[test]
    fn close_modern_is_type_error() {
        let g = Gn::modern(counting(10));
        let err = g.close().unwrap_err();
        assert_eq!(err, Error::Type(TypeError::new(Flavor::Legacy, "close")));
        assert_eq!(g.state(), GeneratorState::Suspended);
    }

    #[test]
    fn resume_dispatch() {
        let g = Gn::legacy(counting(10));
        assert_eq!(
            g.resume(Method::Next(None)).unwrap(),
            Some(Completion::Value(1))
        );
        assert_eq!(g.resume(Method::Close).unwrap(), None);
        assert!(g.is_closed());
        assert_eq!(
            g.resume(Method::Next(None)).unwrap_err(),
            Error::IterationFinished
        );
        assert_eq!(Method::<u32, String>::Close.name(), "close");
    }

    #[test]
    fn iter_modern_skips_return_value() {
        let g = Gn::modern(counting(4));
        let v: Vec<u32> = g.iter().map(Result::unwrap).collect();
        assert_eq!(v, vec![1, 2, 3]);
        assert!(g.is_closed());
    }

    #[test]
    fn iter_legacy_yields_return_value() {
        let g = Gn::legacy(counting(4));
        let v: Vec<u32> = g.iter().map(Result::unwrap).collect();
        assert_eq!(v, vec![1, 2, 3, 4]);
        assert!(g.is_closed());
    }

    #[test]
    fn dropped_legacy_iter_closes() {
        let g = Gn::legacy(counting(10));
        {
            let mut it = g.iter();
            assert_eq!(it.next(), Some(Ok(1)));
        }
        assert!(g.is_closed());

        // a modern generator is left suspended
        let g = Gn::modern(counting(10));
        {
            let mut it = g.iter();
            assert_eq!(it.next(), Some(Ok(1)));
        }
        assert_eq!(g.state(), GeneratorState::Suspended);
    }

    #[test]
    fn debug_shows_state() {
        let g = Gn::legacy(counting(1));
        assert_eq!(
            format!("{:?}", g),
            "Generator { state: Suspended, flavor: Legacy, newborn: true, .. }"
        );
    }
}
