//! Directors: named handlers plus the state they act on.
//!
//! A [`Director`] plays the part a controller plays elsewhere. It owns some
//! application state `S` and a map from handler name to handler. Directors
//! are built by application code and handed to a
//! [`Mediator`](crate::Mediator), which broadcasts signals to every director
//! exposing the signalled name.
//!
//! ```rust,ignore
//! use mediator_core::{Director, DirectorState};
//!
//! #[derive(Default)]
//! struct Documents { saved: Vec<String> }
//!
//! impl DirectorState for Documents {
//!     fn teardown(&mut self) {
//!         self.saved.clear();
//!     }
//! }
//!
//! let director = Director::new(Documents::default())
//!     .handler("save", |d: &Director<Documents>, body: String| d.state().saved.push(body));
//! ```

use std::collections::HashMap;
use std::fmt;

use parking_lot::{Mutex, MutexGuard, RwLock};
use tracing::{debug, trace};

use crate::args::Args;
use crate::error::SignalResult;
use crate::handler::{BoxedHandler, Handler, into_handler, into_raw_handler};

/// Lifecycle hooks for the state held by a [`Director`].
///
/// Both hooks default to no-ops.
pub trait DirectorState: Send + 'static {
    /// Called once when the director is constructed.
    fn initialize(&mut self) {}

    /// Called by the mediator right before the director is removed.
    fn teardown(&mut self) {}
}

impl DirectorState for () {}

/// Application state plus a map of named handlers.
///
/// Handler names are unique within one director. Different directors may
/// expose the same name; a signal for that name reaches all of them.
pub struct Director<S> {
    state: Mutex<S>,
    handlers: RwLock<HashMap<String, BoxedHandler<S>>>,
}

impl<S: DirectorState> Director<S> {
    /// Creates a director around `state` and runs its
    /// [`initialize`](DirectorState::initialize) hook.
    pub fn new(mut state: S) -> Self {
        state.initialize();
        Self {
            state: Mutex::new(state),
            handlers: RwLock::new(HashMap::new()),
        }
    }

    /// Adds a handler (builder pattern).
    pub fn handler<F, T>(self, name: impl Into<String>, f: F) -> Self
    where
        F: Handler<S, T>,
        T: 'static,
    {
        self.add_handler(name, f);
        self
    }

    /// Adds a raw-args handler (builder pattern).
    pub fn raw_handler<F>(self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Director<S>, Args) + Send + Sync + 'static,
    {
        self.add_raw_handler(name, f);
        self
    }

    /// Adds or replaces one handler.
    ///
    /// Safe to call at any time, including from inside a running handler.
    pub fn add_handler<F, T>(&self, name: impl Into<String>, f: F)
    where
        F: Handler<S, T>,
        T: 'static,
    {
        self.insert(name.into(), into_handler(f));
    }

    /// Adds or replaces one handler receiving the untouched [`Args`].
    pub fn add_raw_handler<F>(&self, name: impl Into<String>, f: F)
    where
        F: Fn(&Director<S>, Args) + Send + Sync + 'static,
    {
        self.insert(name.into(), into_raw_handler(f));
    }

    /// Merges `handlers` into this director.
    ///
    /// Same-named entries are overwritten; entries not mentioned are kept.
    pub fn add_handlers<I, K>(&self, handlers: I)
    where
        I: IntoIterator<Item = (K, BoxedHandler<S>)>,
        K: Into<String>,
    {
        let mut map = self.handlers.write();
        for (name, handler) in handlers {
            let name = name.into();
            trace!(handler = %name, "Adding handler");
            map.insert(name, handler);
        }
    }

    fn insert(&self, name: String, handler: BoxedHandler<S>) {
        trace!(handler = %name, "Adding handler");
        self.handlers.write().insert(name, handler);
    }
}

impl<S> Director<S> {
    /// Returns the handler registered under `name`.
    pub fn get_handler(&self, name: &str) -> Option<BoxedHandler<S>> {
        self.handlers.read().get(name).cloned()
    }

    /// Returns `true` if a handler is registered under `name`.
    pub fn has_handler(&self, name: &str) -> bool {
        self.handlers.read().contains_key(name)
    }

    /// Returns the registered handler names, sorted.
    pub fn handler_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.handlers.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Returns the number of registered handlers.
    pub fn handler_count(&self) -> usize {
        self.handlers.read().len()
    }

    /// Locks and returns the director's state.
    ///
    /// The lock is not re-entrant: do not hold the guard across a nested
    /// signal that can reach this same director.
    pub fn state(&self) -> MutexGuard<'_, S> {
        self.state.lock()
    }

    /// Locks the state if it is not currently held.
    pub fn try_state(&self) -> Option<MutexGuard<'_, S>> {
        self.state.try_lock()
    }

    /// Consumes the director and returns its state.
    pub fn into_state(self) -> S {
        self.state.into_inner()
    }
}

impl<S: DirectorState> Director<S> {
    /// Runs the state's [`teardown`](DirectorState::teardown) hook.
    pub fn teardown(&self) {
        self.state.lock().teardown();
    }

    /// Invokes the handler registered under `name` with this director as receiver.
    ///
    /// Returns `Ok(false)` if there is no such handler. No lock is held while
    /// the handler runs.
    pub fn invoke(&self, name: &str, args: Args) -> SignalResult<bool> {
        let Some(handler) = self.get_handler(name) else {
            return Ok(false);
        };
        handler
            .call(self, args)
            .map_err(|err| err.for_handler(name))?;
        Ok(true)
    }
}

impl<S: DirectorState + Default> Default for Director<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}

impl<S> fmt::Debug for Director<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Director")
            .field("handlers", &self.handler_names())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Type erasure
// ============================================================================

/// Object-safe view of a director, as stored by the mediator.
///
/// Implemented for every [`Director<S>`]; custom director types can
/// implement it directly.
pub trait ErasedDirector: Send + Sync {
    /// Returns `true` if a handler is registered under `name`.
    fn has_handler(&self, name: &str) -> bool;

    /// Invokes the handler registered under `name`, returning whether one ran.
    fn invoke(&self, name: &str, args: Args) -> SignalResult<bool>;

    /// Runs the teardown hook.
    fn teardown(&self);

    /// Returns the registered handler names.
    fn handler_names(&self) -> Vec<String>;
}

impl<S: DirectorState> ErasedDirector for Director<S> {
    fn has_handler(&self, name: &str) -> bool {
        Director::has_handler(self, name)
    }

    fn invoke(&self, name: &str, args: Args) -> SignalResult<bool> {
        Director::invoke(self, name, args)
    }

    fn teardown(&self) {
        debug!("Tearing down director");
        Director::teardown(self);
    }

    fn handler_names(&self) -> Vec<String> {
        Director::handler_names(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SignalError;
    use serde_json::json;

    #[derive(Default)]
    struct Notes {
        initialized: bool,
        torn_down: bool,
        items: Vec<String>,
    }

    impl DirectorState for Notes {
        fn initialize(&mut self) {
            self.initialized = true;
        }

        fn teardown(&mut self) {
            self.torn_down = true;
        }
    }

    #[test]
    fn test_new_runs_initialize() {
        let director = Director::new(Notes::default());
        assert!(director.state().initialized);
        assert!(!director.state().torn_down);
    }

    #[test]
    fn test_lookup() {
        let director = Director::new(Notes::default())
            .handler("add", |d: &Director<Notes>, item: String| d.state().items.push(item));

        assert!(director.has_handler("add"));
        assert!(director.get_handler("add").is_some());
        assert!(!director.has_handler("remove"));
        assert!(director.get_handler("remove").is_none());
    }

    #[test]
    fn test_add_handlers_merges() {
        let director = Director::new(Notes::default())
            .handler("a", |d: &Director<Notes>| d.state().items.push("old a".into()))
            .handler("b", |d: &Director<Notes>| d.state().items.push("b".into()));

        director.add_handlers([
            (
                "a",
                into_handler(|d: &Director<Notes>| d.state().items.push("new a".into())),
            ),
            (
                "c",
                into_handler(|d: &Director<Notes>| d.state().items.push("c".into())),
            ),
        ]);

        assert_eq!(director.handler_names(), vec!["a", "b", "c"]);
        assert_eq!(director.handler_count(), 3);
        director.invoke("a", Args::none()).unwrap();
        director.invoke("b", Args::none()).unwrap();
        assert_eq!(director.state().items, vec!["new a", "b"]);
    }

    #[test]
    fn test_invoke_missing_handler() {
        let director = Director::<Notes>::default();
        assert!(!director.invoke("nothing", Args::none()).unwrap());
    }

    #[test]
    fn test_invoke_reports_argument_error() {
        let director =
            Director::new(Notes::default()).handler("count", |_: &Director<Notes>, _n: u32| {});

        let err = director.invoke("count", Args::single(json!("ten"))).unwrap_err();
        assert!(matches!(
            err,
            SignalError::Argument { ref handler, index: 0, .. } if handler == "count"
        ));
    }

    #[test]
    fn test_handler_can_extend_its_director() {
        let director = Director::new(Notes::default()).handler("arm", |d: &Director<Notes>| {
            d.add_handler("fire", |d: &Director<Notes>| d.state().items.push("fired".into()));
        });

        assert!(!director.has_handler("fire"));
        director.invoke("arm", Args::none()).unwrap();
        director.invoke("fire", Args::none()).unwrap();
        assert_eq!(director.state().items, vec!["fired"]);
    }

    #[test]
    fn test_try_state_while_locked() {
        let director = Director::new(Notes::default());

        let guard = director.state();
        assert!(director.try_state().is_none());
        drop(guard);

        director.try_state().unwrap().items.push("free".into());
        assert_eq!(director.state().items, vec!["free"]);
    }

    #[test]
    fn test_teardown_reaches_state() {
        let director = Director::new(Notes::default());
        ErasedDirector::teardown(&director);
        assert!(director.into_state().torn_down);
    }
}
