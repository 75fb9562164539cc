//! The director registry and the signal entry point.
//!
//! A [`Mediator`] holds zero or more directors keyed by name and broadcasts
//! signals to them:
//!
//! 1. The handler definition is normalized against the context and event
//! 2. A bypass definition is invoked directly and nothing is dispatched
//! 3. Every registered director exposing the handler name is snapshotted
//! 4. The handler of each snapshotted director runs, in registration order
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use mediator_core::{Director, HandlerDef, Mediator};
//!
//! let mediator = Mediator::new();
//! let documents = Arc::new(
//!     Director::new(Documents::default())
//!         .handler("save", |d: &Director<Documents>, body: String| d.state().saved.push(body)),
//! );
//! mediator.register_default(documents);
//!
//! let save = HandlerDef::with_args_fn("save", |view: &EditorView, _e| Args::single(view.body()));
//! mediator.signal(&save, Some(&editor), None)?;
//! ```
//!
//! # Re-entrancy
//!
//! The registry lock is never held while a handler, a teardown hook or a
//! bypass callable runs, so any of them may signal, register or unregister.
//! A broadcast works on the snapshot taken before the first handler runs:
//! directors removed mid-broadcast still receive it, directors added
//! mid-broadcast do not. A director whose teardown hook is running is
//! already gone for lookups, registrations and new broadcasts.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{Level, debug, span, trace};

use crate::args::Event;
use crate::definition::{HandlerDef, Resolution, normalize};
use crate::director::ErasedDirector;
use crate::error::{SignalError, SignalResult};
use crate::options::{SignalOptions, UnmatchedPolicy};

/// Key used by [`Mediator::register_default`].
pub const DEFAULT_KEY: &str = "default";

/// A director as stored by the mediator.
pub type SharedDirector = Arc<dyn ErasedDirector>;

/// What a successful [`Mediator::signal`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The definition was a bypass callable and was invoked directly.
    Bypassed,
    /// The signal was broadcast.
    Dispatched {
        /// The signalled handler name.
        handler: String,
        /// How many directors ran a handler.
        matched: usize,
    },
}

impl Outcome {
    /// Number of directors that ran a handler.
    pub fn matched(&self) -> usize {
        match self {
            Self::Bypassed => 0,
            Self::Dispatched { matched, .. } => *matched,
        }
    }

    /// Returns `true` for [`Outcome::Bypassed`].
    pub fn is_bypassed(&self) -> bool {
        matches!(self, Self::Bypassed)
    }
}

/// A registry slot.
///
/// A retiring entry is running its teardown hook. It stays in place until
/// the hook returns but is invisible to lookups and broadcasts.
struct Entry {
    key: String,
    director: SharedDirector,
    retiring: bool,
}

impl Entry {
    fn is_live(&self, key: &str) -> bool {
        !self.retiring && self.key == key
    }
}

/// Registry of directors and broadcast dispatcher.
///
/// At most one director is registered per key. Directors are kept in
/// registration order, which is also broadcast order.
///
/// # Thread Safety
///
/// `Mediator` is `Send + Sync` and can be shared behind an `Arc`.
#[derive(Default)]
pub struct Mediator {
    directors: RwLock<Vec<Entry>>,
    options: SignalOptions,
}

impl Mediator {
    /// Creates an empty mediator with default options.
    pub fn new() -> Self {
        Self::with_options(SignalOptions::default())
    }

    /// Creates an empty mediator with the given options.
    pub fn with_options(options: SignalOptions) -> Self {
        Self {
            directors: RwLock::new(Vec::new()),
            options,
        }
    }

    /// Returns the options this mediator signals with.
    pub fn options(&self) -> &SignalOptions {
        &self.options
    }

    /// Registers `director` under `key`.
    ///
    /// A director already registered under `key` is unregistered first,
    /// which runs its teardown hook. The new director goes to the end of the
    /// broadcast order. If a teardown hook registers under `key` again, that
    /// director is replaced in turn.
    pub fn register<D>(&self, key: impl Into<String>, director: Arc<D>) -> &Self
    where
        D: ErasedDirector + 'static,
    {
        let key = key.into();
        let director: SharedDirector = director;
        loop {
            if self.unregister(&key) {
                debug!(director = %key, "Replacing director");
            }

            let mut directors = self.directors.write();
            if directors.iter().any(|e| e.is_live(&key)) {
                continue;
            }
            directors.push(Entry {
                key: key.clone(),
                director,
                retiring: false,
            });
            break;
        }
        debug!(director = %key, "Registered director");
        self
    }

    /// Registers `director` under [`DEFAULT_KEY`].
    pub fn register_default<D>(&self, director: Arc<D>) -> &Self
    where
        D: ErasedDirector + 'static,
    {
        self.register(DEFAULT_KEY, director)
    }

    /// Unregisters the director under `key`.
    ///
    /// The director's teardown hook runs before it leaves the registry, and
    /// exactly once even under concurrent or nested calls. Returns `false`,
    /// without tearing anything down, if `key` is absent.
    pub fn unregister(&self, key: &str) -> bool {
        let director = {
            let mut directors = self.directors.write();
            let Some(entry) = directors.iter_mut().find(|e| e.is_live(key)) else {
                trace!(director = %key, "Nothing to unregister");
                return false;
            };
            entry.retiring = true;
            Arc::clone(&entry.director)
        };

        director.teardown();

        self.directors
            .write()
            .retain(|e| !(e.key == key && Arc::ptr_eq(&e.director, &director)));
        debug!(director = %key, "Unregistered director");
        true
    }

    /// Returns the director registered under `key`.
    pub fn get(&self, key: &str) -> Option<SharedDirector> {
        self.directors
            .read()
            .iter()
            .find(|e| e.is_live(key))
            .map(|e| Arc::clone(&e.director))
    }

    /// Returns `true` if a director is registered under `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.directors.read().iter().any(|e| e.is_live(key))
    }

    /// Returns the registered keys in broadcast order.
    pub fn keys(&self) -> Vec<String> {
        self.directors
            .read()
            .iter()
            .filter(|e| !e.retiring)
            .map(|e| e.key.clone())
            .collect()
    }

    /// Returns the number of registered directors.
    pub fn len(&self) -> usize {
        self.directors.read().iter().filter(|e| !e.retiring).count()
    }

    /// Returns `true` if no director is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Unregisters every director, tearing each one down.
    pub fn clear(&self) {
        for key in self.keys() {
            self.unregister(&key);
        }
    }

    /// Signals `def` on behalf of `context`.
    ///
    /// The definition is normalized against `context` and `event`. A bypass
    /// callable is invoked directly; anything else is broadcast to every
    /// director exposing the resulting handler name. Reaching no director is
    /// a no-op unless the mediator was configured with
    /// [`UnmatchedPolicy::Strict`].
    ///
    /// A handler failing on its arguments stops the broadcast and the error
    /// is returned.
    pub fn signal<C: ?Sized>(
        &self,
        def: &HandlerDef<C>,
        context: Option<&C>,
        event: Option<&Event>,
    ) -> SignalResult<Outcome> {
        let Some(ctx) = context else {
            return Err(SignalError::MissingContext);
        };

        let span = span!(
            Level::DEBUG,
            "signal",
            handler = def.handler_name().unwrap_or("<bypass>")
        );
        let _enter = span.enter();

        let (name, args) = match normalize(def, ctx, event, &self.options)? {
            Resolution::Bypass(f) => {
                trace!("Bypassing directors");
                f(ctx, event);
                return Ok(Outcome::Bypassed);
            }
            Resolution::Dispatch { name, args } => (name, args),
        };

        let matching = self.matching(name);
        if matching.is_empty() {
            return match self.options.unmatched {
                UnmatchedPolicy::Silent => {
                    debug!("No director handles this signal");
                    Ok(Outcome::Dispatched {
                        handler: name.to_string(),
                        matched: 0,
                    })
                }
                UnmatchedPolicy::Strict => Err(SignalError::NoHandler {
                    handler: name.to_string(),
                }),
            };
        }

        let mut matched = 0;
        for (key, director) in &matching {
            trace!(director = %key, "Invoking handler");
            if director.invoke(name, args.clone())? {
                matched += 1;
            }
        }

        Ok(Outcome::Dispatched {
            handler: name.to_string(),
            matched,
        })
    }

    /// Signals `def` on behalf of `context`, which is always present.
    pub fn signal_with<C: ?Sized>(
        &self,
        def: &HandlerDef<C>,
        context: &C,
        event: Option<&Event>,
    ) -> SignalResult<Outcome> {
        self.signal(def, Some(context), event)
    }

    /// Snapshots the directors exposing `name`, in broadcast order.
    fn matching(&self, name: &str) -> Vec<(String, SharedDirector)> {
        self.directors
            .read()
            .iter()
            .filter(|e| !e.retiring && e.director.has_handler(name))
            .map(|e| (e.key.clone(), Arc::clone(&e.director)))
            .collect()
    }
}

impl fmt::Debug for Mediator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mediator")
            .field("directors", &self.keys())
            .field("options", &self.options)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::Args;
    use crate::director::{Director, DirectorState};
    use crate::options::EventArgs;
    use serde_json::{Value, json};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;

    struct View {
        name: &'static str,
    }

    const VIEW: View = View { name: "editor" };

    #[derive(Default)]
    struct Recorder {
        saved: Option<i64>,
        pings: usize,
        events: Vec<Value>,
        teardowns: usize,
    }

    impl DirectorState for Recorder {
        fn teardown(&mut self) {
            self.teardowns += 1;
        }
    }

    struct OnTeardown(Box<dyn FnMut() + Send>);

    impl DirectorState for OnTeardown {
        fn teardown(&mut self) {
            (self.0)();
        }
    }

    fn recorder() -> Arc<Director<Recorder>> {
        Arc::new(
            Director::new(Recorder::default())
                .handler("save", |d: &Director<Recorder>, data: i64| {
                    d.state().saved = Some(data);
                })
                .handler("ping", |d: &Director<Recorder>| d.state().pings += 1)
                .raw_handler("record", |d: &Director<Recorder>, args: Args| {
                    d.state().events.extend(args.into_positional());
                }),
        )
    }

    #[test]
    fn test_save_with_generated_args() {
        let mediator = Mediator::new();
        let director = recorder();
        mediator.register_default(Arc::clone(&director));

        let def = HandlerDef::with_args_fn("save", |_: &View, e: Option<&Event>| {
            Args::Single(e.and_then(|e| e.get("value")).cloned().unwrap_or(Value::Null))
        });
        let outcome = mediator
            .signal(&def, Some(&VIEW), Some(&json!({"value": 42})))
            .unwrap();

        assert_eq!(outcome.matched(), 1);
        assert_eq!(director.state().saved, Some(42));
    }

    #[test]
    fn test_broadcast_reaches_every_director() {
        let mediator = Mediator::new();
        let d1 = recorder();
        let d2 = recorder();
        mediator
            .register("d1", Arc::clone(&d1))
            .register("d2", Arc::clone(&d2));

        let outcome = mediator
            .signal(&HandlerDef::name("ping"), Some(&VIEW), None)
            .unwrap();

        assert_eq!(outcome.matched(), 2);
        assert_eq!(d1.state().pings, 1);
        assert_eq!(d2.state().pings, 1);
    }

    #[test]
    fn test_bare_name_passes_event() {
        let mediator = Mediator::new();
        let director = recorder();
        mediator.register_default(Arc::clone(&director));

        let event = json!({"type": "click"});
        mediator
            .signal(&HandlerDef::name("record"), Some(&VIEW), Some(&event))
            .unwrap();

        assert_eq!(director.state().events, vec![event]);
    }

    #[test]
    fn test_bare_name_passes_target_when_configured() {
        let mediator =
            Mediator::with_options(SignalOptions::default().event_args(EventArgs::EventAndTarget));
        let director = recorder();
        mediator.register_default(Arc::clone(&director));

        let event = json!({"type": "click", "target": "button.save"});
        mediator
            .signal(&HandlerDef::name("record"), Some(&VIEW), Some(&event))
            .unwrap();

        assert_eq!(
            director.state().events,
            vec![event.clone(), json!("button.save")]
        );
    }

    #[test]
    fn test_fixed_args_pass_through_unmodified() {
        let mediator = Mediator::new();
        let director = recorder();
        mediator.register_default(Arc::clone(&director));

        let payload = json!({"page": 3, "tags": ["a", "b"]});
        mediator
            .signal(
                &HandlerDef::<View>::with_args("record", Args::Single(payload.clone())),
                Some(&VIEW),
                None,
            )
            .unwrap();

        assert_eq!(director.state().events, vec![payload]);
    }

    #[test]
    fn test_missing_context() {
        let mediator = Mediator::new();
        mediator.register_default(recorder());

        let err = mediator
            .signal::<View>(&HandlerDef::name("ping"), None, None)
            .unwrap_err();
        assert!(matches!(err, SignalError::MissingContext));
    }

    #[test]
    fn test_invalid_definition() {
        let mediator = Mediator::new();
        let director = recorder();
        mediator.register_default(Arc::clone(&director));

        let err = mediator
            .signal(
                &HandlerDef::<View>::with_args("save", Args::single(0)),
                Some(&VIEW),
                None,
            )
            .unwrap_err();
        assert!(matches!(err, SignalError::InvalidDefinition { .. }));
        assert_eq!(director.state().saved, None);
    }

    #[test]
    fn test_unmatched_is_silent_by_default() {
        let mediator = Mediator::new();
        let director = recorder();
        mediator.register_default(Arc::clone(&director));

        let outcome = mediator
            .signal(&HandlerDef::name("unknown"), Some(&VIEW), None)
            .unwrap();

        assert_eq!(
            outcome,
            Outcome::Dispatched {
                handler: "unknown".into(),
                matched: 0
            }
        );
        assert_eq!(director.state().pings, 0);
    }

    #[test]
    fn test_unmatched_fails_when_strict() {
        let mediator =
            Mediator::with_options(SignalOptions::default().unmatched(UnmatchedPolicy::Strict));
        mediator.register_default(recorder());

        let err = mediator
            .signal(&HandlerDef::name("unknown"), Some(&VIEW), None)
            .unwrap_err();
        assert!(matches!(err, SignalError::NoHandler { ref handler } if handler == "unknown"));
    }

    #[test]
    fn test_bypass_skips_directors() {
        let mediator = Mediator::new();
        let director = recorder();
        mediator.register_default(Arc::clone(&director));

        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = Arc::clone(&calls);
        let def = HandlerDef::bypass(move |view: &View, e: Option<&Event>| {
            assert_eq!(view.name, "editor");
            assert_eq!(e, Some(&json!("blur")));
            calls_clone.fetch_add(1, Ordering::SeqCst);
        });

        let outcome = mediator
            .signal(&def, Some(&VIEW), Some(&json!("blur")))
            .unwrap();

        assert!(outcome.is_bypassed());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(director.state().events.is_empty());
    }

    #[test]
    fn test_replacement_tears_down_once() {
        let mediator = Mediator::new();
        let a = recorder();
        let b = recorder();

        mediator.register("k", Arc::clone(&a));
        mediator.register("k", Arc::clone(&b));

        assert_eq!(a.state().teardowns, 1);
        assert_eq!(b.state().teardowns, 0);
        assert_eq!(mediator.len(), 1);

        mediator
            .signal(&HandlerDef::name("ping"), Some(&VIEW), None)
            .unwrap();
        assert_eq!(a.state().pings, 0);
        assert_eq!(b.state().pings, 1);
    }

    #[test]
    fn test_unregister() {
        let mediator = Mediator::new();
        let director = recorder();
        mediator.register("k", Arc::clone(&director));

        assert!(!mediator.unregister("absent"));
        assert_eq!(director.state().teardowns, 0);

        assert!(mediator.unregister("k"));
        assert_eq!(director.state().teardowns, 1);
        assert!(!mediator.contains("k"));
        assert!(!mediator.unregister("k"));
        assert_eq!(director.state().teardowns, 1);
    }

    #[test]
    fn test_registration_order_is_broadcast_order() {
        let mediator = Mediator::new();
        mediator
            .register("b", recorder())
            .register("a", recorder())
            .register("b", recorder());

        assert_eq!(mediator.keys(), vec!["a", "b"]);
    }

    #[test]
    fn test_clear_tears_down_everything() {
        let mediator = Mediator::new();
        let a = recorder();
        let b = recorder();
        mediator.register("a", Arc::clone(&a)).register("b", Arc::clone(&b));

        mediator.clear();

        assert!(mediator.is_empty());
        assert_eq!(a.state().teardowns, 1);
        assert_eq!(b.state().teardowns, 1);
    }

    #[test]
    fn test_handler_can_signal_and_register() {
        let mediator = Arc::new(Mediator::new());
        let weak = Arc::downgrade(&mediator);
        let inner = recorder();
        let late = recorder();
        let late_clone = Arc::clone(&late);

        let outer = Arc::new(Director::new(()).handler("ping", move |_: &Director<()>| {
            let Some(mediator) = weak.upgrade() else {
                return;
            };
            mediator
                .signal_with(&HandlerDef::<()>::with_args("save", Args::single(7)), &(), None)
                .unwrap();
            mediator.register("late", Arc::clone(&late_clone));
        }));

        mediator
            .register("outer", outer)
            .register("inner", Arc::clone(&inner));

        let outcome = mediator
            .signal(&HandlerDef::name("ping"), Some(&VIEW), None)
            .unwrap();

        // outer and inner; `late` joined mid-broadcast
        assert_eq!(outcome.matched(), 2);
        assert_eq!(inner.state().saved, Some(7));
        assert_eq!(inner.state().pings, 1);
        assert_eq!(late.state().pings, 0);
        assert!(mediator.contains("late"));
    }

    #[test]
    fn test_argument_error_stops_broadcast() {
        let mediator = Mediator::new();
        let first = recorder();
        let second = recorder();
        mediator
            .register("first", Arc::clone(&first))
            .register("second", Arc::clone(&second));

        let err = mediator
            .signal(
                &HandlerDef::<View>::with_args("save", Args::single("not a number")),
                Some(&VIEW),
                None,
            )
            .unwrap_err();

        assert!(matches!(err, SignalError::Argument { index: 0, .. }));
        assert_eq!(second.state().saved, None);
    }

    #[test]
    fn test_teardown_can_reregister_its_key() {
        let mediator = Arc::new(Mediator::new());
        let weak = Arc::downgrade(&mediator);
        let teardowns = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&teardowns);
        mediator.register(
            "k",
            Arc::new(Director::new(OnTeardown(Box::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
                if let Some(mediator) = weak.upgrade() {
                    mediator.register("k", Arc::new(Director::new(())));
                }
            })))),
        );

        let replacement = recorder();
        let (tx, rx) = mpsc::channel();
        let shared = Arc::clone(&mediator);
        let next = Arc::clone(&replacement);
        thread::spawn(move || {
            shared.register("k", next);
            let _ = tx.send(());
        });
        rx.recv_timeout(Duration::from_secs(3)).expect("register returned");

        assert_eq!(teardowns.load(Ordering::SeqCst), 1);
        assert_eq!(mediator.keys(), vec!["k"]);
        mediator
            .signal(&HandlerDef::name("ping"), Some(&VIEW), None)
            .unwrap();
        assert_eq!(replacement.state().pings, 1);
    }

    #[test]
    fn test_teardown_cannot_unregister_itself_twice() {
        let mediator = Arc::new(Mediator::new());
        let weak = Arc::downgrade(&mediator);
        let nested = Arc::new(parking_lot::Mutex::new(None));
        let seen = Arc::clone(&nested);
        mediator.register(
            "k",
            Arc::new(Director::new(OnTeardown(Box::new(move || {
                if let Some(mediator) = weak.upgrade() {
                    *seen.lock() = Some((mediator.contains("k"), mediator.unregister("k")));
                }
            })))),
        );

        assert!(mediator.unregister("k"));
        assert_eq!(*nested.lock(), Some((false, false)));
        assert!(mediator.is_empty());
    }

    #[test]
    fn test_concurrent_registration_keeps_one_director() {
        let mediator = Mediator::new();
        let directors: Vec<_> = (0..8).map(|_| recorder()).collect();

        thread::scope(|scope| {
            for director in &directors {
                let mediator = &mediator;
                scope.spawn(move || {
                    mediator.register("k", Arc::clone(director));
                });
            }
        });

        assert_eq!(mediator.len(), 1);
        let teardowns: Vec<usize> = directors.iter().map(|d| d.state().teardowns).collect();
        assert!(teardowns.iter().all(|&n| n <= 1));
        assert_eq!(teardowns.iter().sum::<usize>(), directors.len() - 1);
    }

    #[test]
    fn test_director_removed_mid_broadcast_still_receives_it() {
        let mediator = Arc::new(Mediator::new());
        let weak = Arc::downgrade(&mediator);
        let second = recorder();

        let first = Arc::new(Director::new(()).handler("ping", move |_: &Director<()>| {
            if let Some(mediator) = weak.upgrade() {
                mediator.unregister("second");
            }
        }));
        mediator
            .register("first", first)
            .register("second", Arc::clone(&second));

        let outcome = mediator
            .signal(&HandlerDef::name("ping"), Some(&VIEW), None)
            .unwrap();
        assert_eq!(outcome.matched(), 2);
        assert_eq!(second.state().pings, 1);
        assert_eq!(second.state().teardowns, 1);
        assert!(!mediator.contains("second"));

        let outcome = mediator
            .signal(&HandlerDef::name("ping"), Some(&VIEW), None)
            .unwrap();
        assert_eq!(outcome.matched(), 1);
        assert_eq!(second.state().pings, 1);
        assert_eq!(second.state().teardowns, 1);
    }
}
