//! # EcoPoint Library
//!
//! Map engine for recycling collection points: keeps the selected point,
//! the map center, the marker highlights and the drawn route consistent
//! while route lookups against an external provider complete in any order.
//!
//! ## How a selection flows
//!
//! - The [`SelectionStore`] bumps its generation, records the new center and
//!   clears the previous route synchronously.
//! - The [`ViewportController`] recenters the map right away.
//! - The [`RouteResolver`] asks the [`RoutingProvider`] for a route tagged
//!   with that generation; results for a superseded generation are dropped.
//! - [`reconcile`] projects the store snapshot onto markers and overlays and
//!   the [`Engine`] pushes the projection to a [`RenderSurface`].
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use ecopoint::{Catalog, Engine, EngineConfig, OsrmProvider, RecordingSurface, RoutingConfig};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = Arc::new(OsrmProvider::new(RoutingConfig::default()));
//!     let mut engine = Engine::new(
//!         Catalog::builtin(),
//!         provider,
//!         &EngineConfig::default(),
//!         RecordingSurface::default(),
//!     );
//!
//!     engine.select("centro")?;
//!     engine.select("rodoviaria")?; // supersedes the first lookup
//!     engine.settle().await;
//!
//!     println!("{:?}", engine.snapshot().resolved_path);
//!     Ok(())
//! }
//! ```

// Internal modules
mod core;

pub use crate::core::catalog::{Catalog, CollectionPoint};
pub use crate::core::config::{AppConfig, EngineConfig, GeocoderConfig, RoutingConfig};
pub use crate::core::engine::{Engine, UserEvent};
pub use crate::core::error::{Error, Result};
pub use crate::core::geo::Coordinate;
pub use crate::core::geocode::{Geocoder, Place};
pub use crate::core::osrm::OsrmProvider;
pub use crate::core::provider::{Resolution, RoutingProvider};
pub use crate::core::reconcile::{
    present, reconcile, MarkerState, MarkerVariant, RecordingSurface, RenderSurface, Scene,
    SurfaceCommand,
};
pub use crate::core::resolver::{Completion, Dispatch, RouteResolver};
pub use crate::core::selection::{
    Generation, RouteFailure, RoutePath, SelectionStore, Snapshot, Unavailable,
};
pub use crate::core::viewport::{ViewCommand, ViewportController};
