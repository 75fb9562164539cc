//! Mediated route tables for routers.
//!
//! A router maps each mediated route to a handler name. The host router
//! still does the matching and parameter extraction; once a route fires, it
//! hands the extracted parameters to [`MediatedRoutes::navigate`], which
//! signals the handler with the parameters spread positionally.
//!
//! ```rust,ignore
//! use mediator_framework::MediatedRoutes;
//!
//! let routes = MediatedRoutes::new()
//!     .route("", "home")
//!     .route("docs/:id", "showDocument");
//!
//! // The host router matched "docs/:id" and extracted ["42"]
//! routes.navigate(&mediator, "docs/:id", vec![json!("42")], &router)?;
//! ```

use serde_json::Value;
use tracing::{debug, trace};

use mediator_core::{Args, HandlerDef, Mediator, Outcome, SignalResult};

/// An ordered table of route → handler name.
#[derive(Debug, Clone, Default)]
pub struct MediatedRoutes {
    routes: Vec<(String, String)>,
}

impl MediatedRoutes {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Maps `route` to the handler `name` (builder pattern).
    pub fn route(mut self, route: impl Into<String>, name: impl Into<String>) -> Self {
        self.add_route(route, name);
        self
    }

    /// Maps `route` to the handler `name`, replacing any previous mapping.
    pub fn add_route(&mut self, route: impl Into<String>, name: impl Into<String>) {
        let route = route.into();
        let name = name.into();
        match self.routes.iter_mut().find(|(r, _)| *r == route) {
            Some((_, existing)) => *existing = name,
            None => self.routes.push((route, name)),
        }
    }

    /// Returns the handler name mapped to `route`.
    pub fn handler_for(&self, route: &str) -> Option<&str> {
        self.routes
            .iter()
            .find(|(r, _)| r == route)
            .map(|(_, name)| name.as_str())
    }

    /// Returns the mediated routes in declaration order.
    pub fn routes(&self) -> impl Iterator<Item = &str> {
        self.routes.iter().map(|(r, _)| r.as_str())
    }

    /// Returns the number of mediated routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns `true` if no route is mediated.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Signals the handler mapped to `route`, spreading `params` as its arguments.
    ///
    /// `context` is the router. Returns `Ok(None)` if `route` is not mediated.
    /// A route without parameters still counts as carrying arguments.
    pub fn navigate<C: ?Sized>(
        &self,
        mediator: &Mediator,
        route: &str,
        params: Vec<Value>,
        context: &C,
    ) -> SignalResult<Option<Outcome>> {
        let Some(name) = self.handler_for(route) else {
            trace!(route = %route, "Route is not mediated");
            return Ok(None);
        };

        debug!(route = %route, handler = %name, params = params.len(), "Mediated route fired");
        let def = HandlerDef::<C>::with_args(name, Args::Spread(params));
        mediator.signal(&def, Some(context), None).map(Some)
    }
}

/// A router carrying a [`MediatedRoutes`] table.
pub trait MediatedRouter {
    /// The router's mediated routes.
    fn mediated_routes(&self) -> &MediatedRoutes;

    /// Signals the handler mapped to `route`, with this router as context.
    fn navigate(
        &self,
        mediator: &Mediator,
        route: &str,
        params: Vec<Value>,
    ) -> SignalResult<Option<Outcome>> {
        self.mediated_routes()
            .navigate(mediator, route, params, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mediator_core::{Director, DirectorState};
    use serde_json::json;
    use std::sync::Arc;

    struct AppRouter {
        routes: MediatedRoutes,
    }

    impl MediatedRouter for AppRouter {
        fn mediated_routes(&self) -> &MediatedRoutes {
            &self.routes
        }
    }

    #[derive(Default)]
    struct Pages {
        visits: Vec<String>,
    }

    impl DirectorState for Pages {}

    fn setup() -> (Mediator, Arc<Director<Pages>>, AppRouter) {
        let mediator = Mediator::new();
        let director = Arc::new(
            Director::new(Pages::default())
                .handler("home", |d: &Director<Pages>| {
                    d.state().visits.push("home".into());
                })
                .handler(
                    "showDocument",
                    |d: &Director<Pages>, id: String, section: Option<String>| {
                        d.state()
                            .visits
                            .push(format!("doc {id} {}", section.unwrap_or_default()));
                    },
                ),
        );
        mediator.register_default(Arc::clone(&director));

        let router = AppRouter {
            routes: MediatedRoutes::new()
                .route("", "home")
                .route("docs/:id(/:section)", "showDocument"),
        };
        (mediator, director, router)
    }

    #[test]
    fn test_route_params_are_spread() {
        let (mediator, director, router) = setup();

        router
            .navigate(
                &mediator,
                "docs/:id(/:section)",
                vec![json!("42"), json!("intro")],
            )
            .unwrap();

        assert_eq!(director.state().visits, vec!["doc 42 intro"]);
    }

    #[test]
    fn test_route_without_params() {
        let (mediator, director, router) = setup();

        let outcome = router.navigate(&mediator, "", Vec::new()).unwrap();

        assert_eq!(outcome.map(|o| o.matched()), Some(1));
        assert_eq!(director.state().visits, vec!["home"]);
    }

    #[test]
    fn test_unmediated_route() {
        let (mediator, director, router) = setup();

        assert!(router.navigate(&mediator, "about", Vec::new()).unwrap().is_none());
        assert!(director.state().visits.is_empty());
    }

    #[test]
    fn test_remapping_route() {
        let mut routes = MediatedRoutes::new().route("", "home");
        routes.add_route("", "landing");

        assert_eq!(routes.handler_for(""), Some("landing"));
        assert_eq!(routes.len(), 1);
    }
}
