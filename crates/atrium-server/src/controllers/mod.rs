//! Route handlers, registered through an explicit static registry rather
//! than runtime discovery.

pub mod sessions;
pub mod users;

use std::sync::Arc;

use axum::routing::MethodRouter;

use atrium_core::models::Role;

use crate::state::AppState;

/// Access policy for a registered route.
#[derive(Debug, Clone, Copy)]
pub enum Access {
    /// Reachable without a token.
    Anonymous,
    /// Requires a valid token; an empty role set admits any authenticated
    /// caller, otherwise at least one listed role must be present.
    Authenticated(&'static [Role]),
}

/// One entry in the route registry: a path, its access policy, and the
/// handler(s) mounted there.
pub struct RouteSpec {
    pub path: &'static str,
    pub access: Access,
    pub handler: MethodRouter<Arc<AppState>>,
}

impl RouteSpec {
    pub fn new(path: &'static str, access: Access, handler: MethodRouter<Arc<AppState>>) -> Self {
        Self {
            path,
            access,
            handler,
        }
    }
}

/// The complete registration list, assembled at startup. Adding a controller
/// means adding its `routes()` here.
pub fn registry() -> Vec<RouteSpec> {
    let mut routes = Vec::new();
    routes.extend(sessions::routes());
    routes.extend(users::routes());
    routes
}
