//! Mediated trigger tables for views.
//!
//! A view declares which of its triggers are mediated by attaching a
//! [`Mediated`] table: trigger key → [`HandlerDef`]. The view layer keeps
//! binding and unbinding its own events; when one fires it calls
//! [`Mediated::trigger`] (or [`MediatedView::trigger`]) with the view as
//! context and the signal goes through the [`Mediator`].
//!
//! Trigger keys are opaque here. Whatever the view layer uses to name its
//! events (`"click .save"`, `"submit"`) works.
//!
//! ```rust,ignore
//! use mediator_framework::{Mediated, MediatedView};
//!
//! struct EditorView { mediated: Mediated<EditorView>, body: String }
//!
//! impl MediatedView for EditorView {
//!     fn mediated(&self) -> &Mediated<Self> {
//!         &self.mediated
//!     }
//! }
//!
//! let view = EditorView {
//!     mediated: Mediated::new()
//!         .on("click .save", HandlerDef::with_args_fn("save", |v: &EditorView, _| Args::single(v.body.clone())))
//!         .on("click .close", "close"),
//!     body: String::new(),
//! };
//!
//! view.trigger(&mediator, "click .save", Some(&event))?;
//! ```

use std::fmt;

use tracing::trace;

use mediator_core::{Event, HandlerDef, Mediator, Outcome, SignalResult};

/// An ordered table of trigger key → handler definition.
pub struct Mediated<C: ?Sized> {
    bindings: Vec<(String, HandlerDef<C>)>,
}

impl<C: ?Sized> Default for Mediated<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: ?Sized> Clone for Mediated<C> {
    fn clone(&self) -> Self {
        Self {
            bindings: self.bindings.clone(),
        }
    }
}

impl<C: ?Sized> Mediated<C> {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self {
            bindings: Vec::new(),
        }
    }

    /// Binds `key` to `def` (builder pattern).
    ///
    /// Rebinding a key replaces its definition in place.
    pub fn on(mut self, key: impl Into<String>, def: impl Into<HandlerDef<C>>) -> Self {
        self.bind(key, def);
        self
    }

    /// Binds `key` to `def`.
    pub fn bind(&mut self, key: impl Into<String>, def: impl Into<HandlerDef<C>>) {
        let key = key.into();
        let def = def.into();
        match self.bindings.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = def,
            None => self.bindings.push((key, def)),
        }
    }

    /// Removes the binding for `key`, returning its definition.
    pub fn unbind(&mut self, key: &str) -> Option<HandlerDef<C>> {
        let index = self.bindings.iter().position(|(k, _)| k == key)?;
        Some(self.bindings.remove(index).1)
    }

    /// Returns the definition bound to `key`.
    pub fn get(&self, key: &str) -> Option<&HandlerDef<C>> {
        self.bindings
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, def)| def)
    }

    /// Returns the bound keys in declaration order.
    ///
    /// The view layer uses this to know which of its events to bind.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.bindings.iter().map(|(k, _)| k.as_str())
    }

    /// Returns the number of bindings.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Returns `true` if nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Signals the definition bound to `key` with `context` as its context.
    ///
    /// Returns `Ok(None)` if `key` is not bound.
    pub fn trigger(
        &self,
        mediator: &Mediator,
        key: &str,
        context: &C,
        event: Option<&Event>,
    ) -> SignalResult<Option<Outcome>> {
        let Some(def) = self.get(key) else {
            trace!(trigger = %key, "Trigger is not mediated");
            return Ok(None);
        };
        mediator.signal(def, Some(context), event).map(Some)
    }
}

impl<C: ?Sized> fmt::Debug for Mediated<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.bindings.iter().map(|(k, def)| (k, def)))
            .finish()
    }
}

/// A view carrying a [`Mediated`] table.
pub trait MediatedView {
    /// The view's trigger table.
    fn mediated(&self) -> &Mediated<Self>;

    /// Signals the definition bound to `key`, with this view as context.
    fn trigger(
        &self,
        mediator: &Mediator,
        key: &str,
        event: Option<&Event>,
    ) -> SignalResult<Option<Outcome>> {
        self.mediated().trigger(mediator, key, self, event)
    }
}
