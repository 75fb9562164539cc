//! Handler system for directors.
//!
//! A handler is a plain function or closure whose first parameter is the
//! [`Director`] it belongs to (its receiver), followed by up to eight typed
//! positional parameters. Each positional parameter is deserialized from the
//! matching signal argument; a missing argument reads as `null`, so trailing
//! `Option<T>` parameters see `None`.
//!
//! ```rust,ignore
//! use mediator_core::Director;
//!
//! // Receiver only
//! fn reset(d: &Director<Cart>) {
//!     d.state().items.clear();
//! }
//!
//! // Typed positional arguments
//! fn add(d: &Director<Cart>, sku: String, qty: Option<u32>) {
//!     d.state().items.push((sku, qty.unwrap_or(1)));
//! }
//! ```
//!
//! Handlers that want the untouched [`Args`] can be registered with
//! [`Director::add_raw_handler`].

use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::args::Args;
use crate::director::{Director, DirectorState};
use crate::error::ArgumentError;

// ============================================================================
// Handler Trait
// ============================================================================

/// The trait implemented by director handlers.
///
/// Implemented automatically for `Fn(&Director<S>, T1, ..., Tn)` with
/// `n <= 8` and every `Ti: DeserializeOwned`. The `T` parameter only serves
/// to tell the arities apart.
pub trait Handler<S, T>: Send + Sync + 'static {
    /// Invokes the handler with `director` as receiver.
    fn call(&self, director: &Director<S>, args: Args) -> Result<(), ArgumentError>;
}

// ============================================================================
// Type erasure
// ============================================================================

/// Type-erased handler trait for dynamic dispatch.
pub trait ErasedHandler<S>: Send + Sync {
    /// Invokes the handler with `director` as receiver.
    fn call(&self, director: &Director<S>, args: Args) -> Result<(), ArgumentError>;
}

/// A type-erased handler that can be stored in a director.
pub type BoxedHandler<S> = Arc<dyn ErasedHandler<S>>;

/// Wraps a [`Handler`] so it can be stored without its arity marker.
pub struct HandlerFn<F, T> {
    f: F,
    _marker: PhantomData<fn() -> T>,
}

impl<F, T> HandlerFn<F, T> {
    /// Creates a new handler function wrapper.
    pub fn new(f: F) -> Self {
        Self {
            f,
            _marker: PhantomData,
        }
    }
}

impl<S, F, T> ErasedHandler<S> for HandlerFn<F, T>
where
    F: Handler<S, T>,
    T: 'static,
{
    fn call(&self, director: &Director<S>, args: Args) -> Result<(), ArgumentError> {
        self.f.call(director, args)
    }
}

/// A handler receiving the untouched [`Args`].
pub struct RawHandler<F>(F);

impl<S, F> ErasedHandler<S> for RawHandler<F>
where
    F: Fn(&Director<S>, Args) + Send + Sync,
{
    fn call(&self, director: &Director<S>, args: Args) -> Result<(), ArgumentError> {
        (self.0)(director, args);
        Ok(())
    }
}

/// Convert a handler function into a boxed handler.
pub fn into_handler<S, F, T>(f: F) -> BoxedHandler<S>
where
    S: DirectorState,
    F: Handler<S, T>,
    T: 'static,
{
    Arc::new(HandlerFn::new(f))
}

/// Convert a raw-args function into a boxed handler.
pub fn into_raw_handler<S, F>(f: F) -> BoxedHandler<S>
where
    S: DirectorState,
    F: Fn(&Director<S>, Args) + Send + Sync + 'static,
{
    Arc::new(RawHandler(f))
}

// ============================================================================
// Handler implementations for functions
// ============================================================================

impl<S, F> Handler<S, ()> for F
where
    F: Fn(&Director<S>) + Send + Sync + 'static,
{
    fn call(&self, director: &Director<S>, _args: Args) -> Result<(), ArgumentError> {
        (self)(director);
        Ok(())
    }
}

fn from_arg<T: DeserializeOwned>(value: Option<Value>, index: usize) -> Result<T, ArgumentError> {
    serde_json::from_value(value.unwrap_or(Value::Null))
        .map_err(|source| ArgumentError { index, source })
}

/// Macro to generate Handler implementations for functions with different arities.
macro_rules! impl_handler {
    (
        $($ty:ident),*
    ) => {
        #[allow(non_snake_case, unused_assignments)]
        impl<S, F, $($ty,)*> Handler<S, ($($ty,)*)> for F
        where
            F: Fn(&Director<S>, $($ty,)*) + Send + Sync + 'static,
            $( $ty: DeserializeOwned + 'static, )*
        {
            fn call(&self, director: &Director<S>, args: Args) -> Result<(), ArgumentError> {
                let mut positional = args.into_positional().into_iter();
                let mut index = 0usize;
                $(
                    let $ty = from_arg::<$ty>(positional.next(), index)?;
                    index += 1;
                )*

                (self)(director, $($ty,)*);
                Ok(())
            }
        }
    };
}

impl_handler!(T1);
impl_handler!(T1, T2);
impl_handler!(T1, T2, T3);
impl_handler!(T1, T2, T3, T4);
impl_handler!(T1, T2, T3, T4, T5);
impl_handler!(T1, T2, T3, T4, T5, T6);
impl_handler!(T1, T2, T3, T4, T5, T6, T7);
impl_handler!(T1, T2, T3, T4, T5, T6, T7, T8);
