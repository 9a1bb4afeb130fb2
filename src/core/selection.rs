//! Selection store
//!
//! Holds the single "current focus" of the session: which collection point
//! is selected, where the map should be centered, and the route resolved for
//! the current selection episode. Every `select`/`deselect` starts a new
//! episode by bumping the generation; route results are only accepted when
//! they carry the generation of the episode that is still current.

use std::fmt;
use std::sync::Arc;

use log::debug;

use crate::core::catalog::CollectionPoint;
use crate::core::geo::Coordinate;

/// Identifies one selection episode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(pub u64);

impl Generation {
    fn next(self) -> Self {
        Generation(self.0 + 1)
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Why no route is shown for the current selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unavailable {
    /// The point has fewer than two waypoints; nothing was requested
    NoWaypoints,
    /// The routing provider was asked and did not produce a usable route
    LookupFailed(RouteFailure),
}

/// How a routing request failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteFailure {
    /// Connection, DNS, or other transport problem
    Transport,
    /// Provider answered with a non-success HTTP status
    BadStatus(u16),
    /// Response body could not be decoded
    Malformed,
    /// Provider reported no route, or returned a degenerate geometry
    NoRoute,
    /// The resolver stopped waiting
    Timeout,
    /// The request was aborted because its selection was superseded
    Cancelled,
}

impl fmt::Display for RouteFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteFailure::Transport => write!(f, "transport error"),
            RouteFailure::BadStatus(code) => write!(f, "provider returned HTTP {code}"),
            RouteFailure::Malformed => write!(f, "malformed provider response"),
            RouteFailure::NoRoute => write!(f, "no route found"),
            RouteFailure::Timeout => write!(f, "timed out"),
            RouteFailure::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Route state of the current selection
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RoutePath {
    /// Nothing committed yet for this generation (or nothing selected)
    #[default]
    Absent,
    /// Resolution finished without a drawable route
    Unavailable(Unavailable),
    /// Resolved route in (lat, lon) order
    Resolved(Arc<[Coordinate]>),
}

impl RoutePath {
    pub fn resolved(path: Vec<Coordinate>) -> Self {
        RoutePath::Resolved(path.into())
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, RoutePath::Absent)
    }

    /// The drawable path, if any
    pub fn coordinates(&self) -> Option<&[Coordinate]> {
        match self {
            RoutePath::Resolved(path) if !path.is_empty() => Some(&path[..]),
            _ => None,
        }
    }
}

/// Immutable view of the store handed to the viewport controller,
/// reconciler, and rendering code
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub entity: Option<Arc<CollectionPoint>>,
    pub center: Coordinate,
    pub resolved_path: RoutePath,
    pub generation: Generation,
    pub details_open: bool,
}

impl Snapshot {
    pub fn selected_id(&self) -> Option<&str> {
        self.entity.as_deref().map(|p| p.id.as_str())
    }
}

/// Owner of the current selection
#[derive(Debug)]
pub struct SelectionStore {
    entity: Option<Arc<CollectionPoint>>,
    center: Coordinate,
    resolved_path: RoutePath,
    generation: Generation,
    details_open: bool,
}

impl SelectionStore {
    /// Empty selection centered on `initial_center`
    pub fn new(initial_center: Coordinate) -> Self {
        Self {
            entity: None,
            center: initial_center,
            resolved_path: RoutePath::Absent,
            generation: Generation::default(),
            details_open: false,
        }
    }

    /// Select `entity`, starting a new episode
    pub fn select(&mut self, entity: Arc<CollectionPoint>) -> Generation {
        self.generation = self.generation.next();
        self.center = entity.coordinate;
        self.resolved_path = RoutePath::Absent;
        self.details_open = false;
        debug!("Selected '{}' at {}", entity.id, self.generation);
        self.entity = Some(entity);
        self.generation
    }

    /// Clear the selection; the map stays where it is
    pub fn deselect(&mut self) -> Generation {
        self.generation = self.generation.next();
        self.entity = None;
        self.resolved_path = RoutePath::Absent;
        self.details_open = false;
        debug!("Selection cleared at {}", self.generation);
        self.generation
    }

    /// Commit a route for `for_generation`; returns whether it was accepted
    pub fn commit_path(&mut self, for_generation: Generation, path: RoutePath) -> bool {
        if for_generation != self.generation || self.entity.is_none() {
            debug!(
                "Dropping stale route for {for_generation} (current {})",
                self.generation
            );
            return false;
        }
        self.resolved_path = path;
        true
    }

    /// Open the detail overlay for the selected point; no-op without a selection
    pub fn open_details(&mut self) -> bool {
        if self.entity.is_none() {
            return false;
        }
        self.details_open = true;
        true
    }

    /// Move the map without touching the selection
    pub fn focus(&mut self, center: Coordinate) {
        self.center = center;
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn current_snapshot(&self) -> Snapshot {
        Snapshot {
            entity: self.entity.clone(),
            center: self.center,
            resolved_path: self.resolved_path.clone(),
            generation: self.generation,
            details_open: self.details_open,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGIN: Coordinate = Coordinate::new(-3.7333, -40.9919);

    fn point(id: &str, lat: f64, lon: f64) -> Arc<CollectionPoint> {
        Arc::new(CollectionPoint {
            id: id.to_string(),
            name: id.to_uppercase(),
            description: String::new(),
            coordinate: Coordinate::new(lat, lon),
            waypoints: None,
        })
    }

    #[test]
    fn test_new_store_is_empty() {
        let store = SelectionStore::new(ORIGIN);
        let snap = store.current_snapshot();
        assert!(snap.entity.is_none());
        assert_eq!(snap.center, ORIGIN);
        assert!(snap.resolved_path.is_absent());
        assert_eq!(snap.generation, Generation(0));
        assert!(!snap.details_open);
    }

    #[test]
    fn test_generation_strictly_increases() {
        let mut store = SelectionStore::new(ORIGIN);
        let e1 = point("e1", -3.733, -40.991);
        let e2 = point("e2", -3.73, -40.997);

        let mut last = store.generation();
        for step in 0..12 {
            let g = match step % 4 {
                0 => store.select(e1.clone()),
                1 => store.select(e1.clone()),
                2 => store.deselect(),
                _ => store.select(e2.clone()),
            };
            assert!(g > last, "generation must grow on every call");
            assert_eq!(g, store.generation());
            last = g;
        }
    }

    #[test]
    fn test_select_sets_center_and_clears_path() {
        let mut store = SelectionStore::new(ORIGIN);
        let e1 = point("e1", -3.733, -40.991);

        let g = store.select(e1.clone());
        assert!(store.commit_path(g, RoutePath::resolved(vec![ORIGIN, e1.coordinate])));

        let e2 = point("e2", -3.73, -40.997);
        store.select(e2.clone());
        let snap = store.current_snapshot();
        assert_eq!(snap.selected_id(), Some("e2"));
        assert_eq!(snap.center, e2.coordinate);
        assert!(snap.resolved_path.is_absent());
    }

    #[test]
    fn test_reselect_same_entity_clears_path() {
        let mut store = SelectionStore::new(ORIGIN);
        let e1 = point("e1", -3.733, -40.991);

        let g1 = store.select(e1.clone());
        store.commit_path(g1, RoutePath::Unavailable(Unavailable::NoWaypoints));
        let g2 = store.select(e1);

        assert_eq!(g2, Generation(2));
        assert!(store.current_snapshot().resolved_path.is_absent());
        assert!(!store.commit_path(g1, RoutePath::resolved(vec![ORIGIN])));
    }

    #[test]
    fn test_deselect_keeps_center() {
        let mut store = SelectionStore::new(ORIGIN);
        let e1 = point("e1", -3.72, -40.987);
        let g = store.select(e1.clone());
        store.commit_path(g, RoutePath::resolved(vec![ORIGIN, e1.coordinate]));
        store.open_details();

        store.deselect();
        let snap = store.current_snapshot();
        assert!(snap.entity.is_none());
        assert_eq!(snap.center, e1.coordinate);
        assert!(snap.resolved_path.is_absent());
        assert!(!snap.details_open);
    }

    #[test]
    fn test_commit_requires_current_generation() {
        let mut store = SelectionStore::new(ORIGIN);
        let g1 = store.select(point("e1", -3.733, -40.991));
        let g2 = store.select(point("e2", -3.73, -40.997));

        let stale = RoutePath::resolved(vec![ORIGIN, Coordinate::new(-3.734, -40.993)]);
        assert!(!store.commit_path(g1, stale));
        assert!(store.current_snapshot().resolved_path.is_absent());

        let fresh = RoutePath::resolved(vec![ORIGIN, Coordinate::new(-3.73, -40.997)]);
        assert!(store.commit_path(g2, fresh.clone()));
        assert_eq!(store.current_snapshot().resolved_path, fresh);
    }

    #[test]
    fn test_commit_after_deselect_is_dropped() {
        let mut store = SelectionStore::new(ORIGIN);
        let g1 = store.select(point("e1", -3.733, -40.991));
        let g2 = store.deselect();

        assert!(!store.commit_path(g1, RoutePath::resolved(vec![ORIGIN])));
        assert!(!store.commit_path(g2, RoutePath::resolved(vec![ORIGIN])));
        assert!(store.current_snapshot().resolved_path.is_absent());
    }

    #[test]
    fn test_open_details_requires_selection() {
        let mut store = SelectionStore::new(ORIGIN);
        assert!(!store.open_details());
        assert!(!store.current_snapshot().details_open);

        store.select(point("e1", -3.733, -40.991));
        assert!(store.open_details());
        assert!(store.current_snapshot().details_open);

        store.select(point("e2", -3.73, -40.997));
        assert!(!store.current_snapshot().details_open);
    }

    #[test]
    fn test_focus_moves_center_only() {
        let mut store = SelectionStore::new(ORIGIN);
        let g = store.select(point("e1", -3.733, -40.991));
        let target = Coordinate::new(-3.5, -40.5);

        store.focus(target);
        let snap = store.current_snapshot();
        assert_eq!(snap.center, target);
        assert_eq!(snap.generation, g);
        assert_eq!(snap.selected_id(), Some("e1"));
    }

    #[test]
    fn test_route_path_coordinates() {
        assert!(RoutePath::Absent.coordinates().is_none());
        assert!(RoutePath::Unavailable(Unavailable::NoWaypoints)
            .coordinates()
            .is_none());
        assert!(RoutePath::resolved(vec![]).coordinates().is_none());
        assert_eq!(
            RoutePath::resolved(vec![ORIGIN]).coordinates(),
            Some(&[ORIGIN][..])
        );
    }
}
