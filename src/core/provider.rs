//! Routing provider boundary
//!
//! The engine never performs path-finding itself. It hands an ordered list of
//! waypoints to a [`RoutingProvider`] and gets back either a path in
//! (lat, lon) order or a [`RouteFailure`] marker. Transport errors never
//! cross this boundary.

use std::time::Duration;

use futures::future::BoxFuture;
use once_cell::sync::Lazy;
use reqwest::{Client, ClientBuilder};

use crate::core::geo::Coordinate;
use crate::core::selection::RouteFailure;

/// Outcome of a single routing request
pub type Resolution = std::result::Result<Vec<Coordinate>, RouteFailure>;

/// Anything that can turn waypoints into a real travel path
///
/// The returned future must be `'static` so the resolver can run it as an
/// independent task while the rest of the application stays interactive.
pub trait RoutingProvider: Send + Sync {
    fn resolve_path(&self, waypoints: Vec<Coordinate>) -> BoxFuture<'static, Resolution>;
}

/// Shared HTTP client for the routing and geocoding clients
pub(crate) static GLOBAL_CLIENT: Lazy<Client> = Lazy::new(|| {
    ClientBuilder::new()
        .tcp_keepalive(Duration::from_secs(60))
        .pool_idle_timeout(Duration::from_secs(90))
        .pool_max_idle_per_host(8)
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .user_agent(format!("ecopoint/{}", env!("ECOPOINT_VERSION")))
        .build()
        .expect("Failed to create HTTP client")
});
