//! Handler definitions and their normalization.
//!
//! A [`HandlerDef`] is authored next to a view or router and describes what
//! to call and with which arguments. [`normalize`] turns it into a
//! [`Resolution`]: either a handler name plus [`Args`] ready for broadcast,
//! or a bypass callable that skips the directors entirely.
//!
//! ```rust,ignore
//! use mediator_core::{Args, HandlerDef};
//!
//! // Bare name, the event becomes the only argument
//! let open = HandlerDef::<View>::name("open");
//!
//! // Arguments computed from the view and the event
//! let save = HandlerDef::with_args_fn("save", |view: &View, _e| Args::single(view.id));
//!
//! // Precomputed arguments
//! let page = HandlerDef::<View>::with_args("page", Args::spread([1, 20]));
//!
//! // Not mediated at all
//! let blur = HandlerDef::bypass(|view: &View, _e| view.blur());
//! ```

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::args::{Args, Event, is_truthy};
use crate::error::{SignalError, SignalResult};
use crate::options::{EventArgs, SignalOptions};

/// Argument generator, called with the originating context and event.
pub type ArgsFn<C> = Arc<dyn Fn(&C, Option<&Event>) -> Args + Send + Sync>;

/// A callable invoked directly instead of being mediated.
pub type BypassFn<C> = Arc<dyn Fn(&C, Option<&Event>) + Send + Sync>;

/// Describes what a trigger should call and with which arguments.
///
/// `C` is the type of the view or router that owns the definition; it is
/// handed to argument generators and bypass callables as their context.
pub enum HandlerDef<C: ?Sized> {
    /// Bare handler name. Arguments come from the event.
    Name(String),
    /// Handler name plus an argument generator.
    NameWithArgsFn(String, ArgsFn<C>),
    /// Handler name plus precomputed arguments.
    NameWithArgs(String, Args),
    /// A callable invoked with the context and event, bypassing all directors.
    Bypass(BypassFn<C>),
}

impl<C: ?Sized> HandlerDef<C> {
    /// A bare handler name.
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    /// A handler name whose arguments are produced by `f` at signal time.
    pub fn with_args_fn<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&C, Option<&Event>) -> Args + Send + Sync + 'static,
    {
        Self::NameWithArgsFn(name.into(), Arc::new(f))
    }

    /// A handler name with fixed arguments.
    pub fn with_args(name: impl Into<String>, args: impl Into<Args>) -> Self {
        Self::NameWithArgs(name.into(), args.into())
    }

    /// A callable that is invoked directly instead of being dispatched.
    pub fn bypass<F>(f: F) -> Self
    where
        F: Fn(&C, Option<&Event>) + Send + Sync + 'static,
    {
        Self::Bypass(Arc::new(f))
    }

    /// The handler name this definition targets, if it is mediated.
    pub fn handler_name(&self) -> Option<&str> {
        match self {
            Self::Name(name) | Self::NameWithArgsFn(name, _) | Self::NameWithArgs(name, _) => {
                Some(name)
            }
            Self::Bypass(_) => None,
        }
    }

    /// Returns `true` for [`HandlerDef::Bypass`].
    pub fn is_bypass(&self) -> bool {
        matches!(self, Self::Bypass(_))
    }
}

impl<C: ?Sized> Clone for HandlerDef<C> {
    fn clone(&self) -> Self {
        match self {
            Self::Name(name) => Self::Name(name.clone()),
            Self::NameWithArgsFn(name, f) => Self::NameWithArgsFn(name.clone(), Arc::clone(f)),
            Self::NameWithArgs(name, args) => Self::NameWithArgs(name.clone(), args.clone()),
            Self::Bypass(f) => Self::Bypass(Arc::clone(f)),
        }
    }
}

impl<C: ?Sized> fmt::Debug for HandlerDef<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => f.debug_tuple("Name").field(name).finish(),
            Self::NameWithArgsFn(name, _) => f
                .debug_tuple("NameWithArgsFn")
                .field(name)
                .field(&"<fn>")
                .finish(),
            Self::NameWithArgs(name, args) => f
                .debug_tuple("NameWithArgs")
                .field(name)
                .field(args)
                .finish(),
            Self::Bypass(_) => f.debug_tuple("Bypass").field(&"<fn>").finish(),
        }
    }
}

impl<C: ?Sized> From<&str> for HandlerDef<C> {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl<C: ?Sized> From<String> for HandlerDef<C> {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

/// The outcome of normalizing a [`HandlerDef`].
pub enum Resolution<'d, C: ?Sized> {
    /// Broadcast `args` to every director exposing `name`.
    Dispatch {
        /// Handler name to look up.
        name: &'d str,
        /// Arguments for the handler.
        args: Args,
    },
    /// Call this directly with the context and event; dispatch nothing.
    Bypass(&'d BypassFn<C>),
}

impl<C: ?Sized> fmt::Debug for Resolution<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dispatch { name, args } => f
                .debug_struct("Dispatch")
                .field("name", name)
                .field("args", args)
                .finish(),
            Self::Bypass(_) => f.debug_tuple("Bypass").field(&"<fn>").finish(),
        }
    }
}

/// Normalizes a handler definition against its context and triggering event.
///
/// Rules are tried in order and the first match wins:
///
/// 1. a bare name takes `[event]` (or `[event, target]`), or nothing when the
///    event is absent or falsy
/// 2. a name with a generator takes whatever the generator returns
/// 3. a name with fixed arguments requires a non-empty name and truthy arguments
/// 4. a bypass callable resolves to [`Resolution::Bypass`]
///
/// Anything else is [`SignalError::InvalidDefinition`].
pub fn normalize<'d, C: ?Sized>(
    def: &'d HandlerDef<C>,
    ctx: &C,
    event: Option<&Event>,
    options: &SignalOptions,
) -> SignalResult<Resolution<'d, C>> {
    match def {
        HandlerDef::Name(name) => Ok(Resolution::Dispatch {
            name,
            args: event_args(event, options.event_args),
        }),
        HandlerDef::NameWithArgsFn(name, f) => Ok(Resolution::Dispatch {
            name,
            args: f(ctx, event),
        }),
        HandlerDef::NameWithArgs(name, args)
            if !name.is_empty() && (args.is_truthy() || !options.reject_falsy_args) =>
        {
            Ok(Resolution::Dispatch {
                name,
                args: args.clone(),
            })
        }
        HandlerDef::NameWithArgs(name, _) if name.is_empty() => Err(SignalError::invalid(
            "a name with arguments requires a non-empty name",
        )),
        HandlerDef::NameWithArgs(name, args) => Err(SignalError::invalid(format!(
            "arguments for '{name}' are falsy ({args:?})"
        ))),
        HandlerDef::Bypass(f) => Ok(Resolution::Bypass(f)),
    }
}

fn event_args(event: Option<&Event>, shape: EventArgs) -> Args {
    match (event, shape) {
        (None, _) => Args::none(),
        (Some(event), _) if !is_truthy(event) => Args::none(),
        (Some(event), EventArgs::Event) => Args::Spread(vec![event.clone()]),
        (Some(event), EventArgs::EventAndTarget) => {
            let target = event.get("target").cloned().unwrap_or(Value::Null);
            Args::Spread(vec![event.clone(), target])
        }
    }
}
