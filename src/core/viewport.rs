//! Viewport controller
//!
//! Turns changes of the store's `center` into recenter commands. It only
//! remembers the last center it pushed, so repeated renders with the same
//! center leave user pan/zoom alone.

use crate::core::geo::Coordinate;
use crate::core::selection::Snapshot;

/// "Show this point at this zoom"
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewCommand {
    pub center: Coordinate,
    pub zoom: u8,
}

#[derive(Debug, Clone)]
pub struct ViewportController {
    zoom: u8,
    last_center: Option<Coordinate>,
}

impl ViewportController {
    pub fn new(zoom: u8) -> Self {
        Self {
            zoom,
            last_center: None,
        }
    }

    /// A recenter command if `center` differs from the last one issued
    pub fn sync(&mut self, snapshot: &Snapshot) -> Option<ViewCommand> {
        if self.last_center == Some(snapshot.center) {
            return None;
        }
        self.last_center = Some(snapshot.center);
        Some(ViewCommand {
            center: snapshot.center,
            zoom: self.zoom,
        })
    }
}
