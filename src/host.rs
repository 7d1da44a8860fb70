//! # host surface
//!
//! `next`/`throw`/`close` entry points as a host calls them, on a receiver
//! of unknown type. The receiver is type checked against the expected
//! flavor before any state is looked at; a receiver that fails the check is
//! handed to a `CrossRealm` strategy, which may unwrap it to a generator
//! living in another realm.
//!

use std::any::Any;

use crate::gen_impl::{Completion, Generator, Method};
use crate::resumer::Resumer;
use crate::rt::{Error, TypeError};
use crate::state::Flavor;

/// result of a host method call, `None` is undefined
pub type MethodResult<V, E> = Result<Option<Completion<V>>, Error<E>>;

/// what to do with a receiver that is not a generator of the expected flavor
pub trait CrossRealm<R: Resumer> {
    /// try to find the generator behind `receiver` and run `method` on it
    fn call_if_wrapped(
        &self,
        receiver: &dyn Any,
        expected: Flavor,
        method: Method<R::Value, R::Error>,
    ) -> MethodResult<R::Value, R::Error>;
}

/// no wrappers exist, every mismatch is a type error
#[derive(Debug, Default, Clone, Copy)]
pub struct NoWrappers;

impl<R: Resumer> CrossRealm<R> for NoWrappers {
    fn call_if_wrapped(
        &self,
        _receiver: &dyn Any,
        expected: Flavor,
        method: Method<R::Value, R::Error>,
    ) -> MethodResult<R::Value, R::Error> {
        Err(Error::Type(TypeError::new(expected, method.name())))
    }
}

/// unwrap the receiver with a closure and retry once
pub struct Unwrapper<F> {
    unwrap: F,
}

impl<F> Unwrapper<F> {
    /// `f` returns the generator wrapped by a receiver, if any
    pub fn new<R>(f: F) -> Self
    where
        R: Resumer + 'static,
        F: for<'a> Fn(&'a dyn Any) -> Option<&'a Generator<R>>,
    {
        Unwrapper { unwrap: f }
    }
}

impl<R, F> CrossRealm<R> for Unwrapper<F>
where
    R: Resumer + 'static,
    F: for<'a> Fn(&'a dyn Any) -> Option<&'a Generator<R>>,
{
    fn call_if_wrapped(
        &self,
        receiver: &dyn Any,
        expected: Flavor,
        method: Method<R::Value, R::Error>,
    ) -> MethodResult<R::Value, R::Error> {
        match (self.unwrap)(receiver) {
            Some(g) if g.flavor() == expected => {
                trace!("forward {} to unwrapped {} generator", method.name(), expected);
                g.resume(method)
            }
            _ => Err(Error::Type(TypeError::new(expected, method.name()))),
        }
    }
}

/// call a generator method on `receiver`
pub fn call_method<R>(
    receiver: &dyn Any,
    expected: Flavor,
    method: Method<R::Value, R::Error>,
    realm: &dyn CrossRealm<R>,
) -> MethodResult<R::Value, R::Error>
where
    R: Resumer + 'static,
{
    match receiver.downcast_ref::<Generator<R>>() {
        Some(g) if g.flavor() == expected => g.resume(method),
        _ => realm.call_if_wrapped(receiver, expected, method),
    }
}

/// `next(value)`
#[inline]
pub fn generator_next<R>(
    receiver: &dyn Any,
    expected: Flavor,
    value: Option<R::Value>,
    realm: &dyn CrossRealm<R>,
) -> MethodResult<R::Value, R::Error>
where
    R: Resumer + 'static,
{
    call_method(receiver, expected, Method::Next(value), realm)
}

/// `throw(error)`
#[inline]
pub fn generator_throw<R>(
    receiver: &dyn Any,
    expected: Flavor,
    err: R::Error,
    realm: &dyn CrossRealm<R>,
) -> MethodResult<R::Value, R::Error>
where
    R: Resumer + 'static,
{
    call_method(receiver, expected, Method::Throw(err), realm)
}

/// `close()`, only legacy generators have it
#[inline]
pub fn generator_close<R>(receiver: &dyn Any, realm: &dyn CrossRealm<R>) -> Result<(), Error<R::Error>>
where
    R: Resumer + 'static,
{
    call_method(receiver, Flavor::Legacy, Method::Close, realm).map(drop)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::gen_impl::Gn;
    use crate::resumer::{FnResumer, StepInput, StepResult};
    use crate::state::ResumeMode;

    type Step = fn(StepInput<i32, String>, ResumeMode) -> Result<StepResult<i32>, String>;
    type Res = FnResumer<i32, String, Step>;

    fn one(_: StepInput<i32, String>, _: ResumeMode) -> Result<StepResult<i32>, String> {
        Ok(StepResult::yielded(1))
    }

    fn make(flavor: Flavor) -> Generator<Res> {
        Gn::new(flavor, FnResumer::new(one as Step))
    }

    struct Wrapper(Generator<Res>);

    #[test]
    fn matching_receiver_is_dispatched() {
        let g = make(Flavor::Modern);
        let r = generator_next::<Res>(&g, Flavor::Modern, None, &NoWrappers).unwrap();
        assert_eq!(r.and_then(Completion::into_value), Some(1));
    }

    #[test]
    fn mismatch_is_type_error_before_state() {
        let g = make(Flavor::Legacy);
        let err = generator_next::<Res>(&g, Flavor::Modern, None, &NoWrappers).unwrap_err();
        assert_eq!(err, Error::Type(TypeError::new(Flavor::Modern, "next")));
        assert!(g.is_newborn());

        let not_a_generator = String::from("nope");
        let err = generator_close::<Res>(&not_a_generator, &NoWrappers).unwrap_err();
        assert_eq!(err, Error::Type(TypeError::new(Flavor::Legacy, "close")));
    }

    #[test]
    fn wrapped_receiver_is_forwarded() {
        let w = Wrapper(make(Flavor::Legacy));
        let realm = Unwrapper::new(|obj: &dyn Any| obj.downcast_ref::<Wrapper>().map(|w| &w.0));

        let r = generator_next::<Res>(&w, Flavor::Legacy, None, &realm).unwrap();
        assert_eq!(r, Some(Completion::Value(1)));

        generator_close::<Res>(&w, &realm).unwrap();
        assert!(w.0.is_closed());

        // wrong flavor behind the wrapper
        let err = generator_throw::<Res>(&w, Flavor::Modern, "x".to_owned(), &realm).unwrap_err();
        assert_eq!(err, Error::Type(TypeError::new(Flavor::Modern, "throw")));
    }

    #[test]
    fn close_on_modern_receiver() {
        let g = make(Flavor::Modern);
        let err = generator_close::<Res>(&g, &NoWrappers).unwrap_err();
        assert!(matches!(err, Error::Type(_)));
        assert!(!g.is_closed());
    }
}
