//! Marker and overlay reconciliation
//!
//! [`reconcile`] is a pure projection of a [`Snapshot`] onto the catalog:
//! which marker is highlighted, whether a route is drawn, whether the detail
//! overlay is open. It holds no state of its own and is re-run on every
//! store change.

use std::sync::Arc;

use crate::core::catalog::CollectionPoint;
use crate::core::geo::Coordinate;
use crate::core::selection::Snapshot;
use crate::core::viewport::ViewCommand;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerVariant {
    Normal,
    Highlighted,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarkerState<'a> {
    pub id: &'a str,
    pub coordinate: Coordinate,
    pub variant: MarkerVariant,
}

/// Everything the rendering surface should currently show
#[derive(Debug, Clone, PartialEq)]
pub struct Scene<'a> {
    pub markers: Vec<MarkerState<'a>>,
    pub path: Option<&'a [Coordinate]>,
    pub details: Option<&'a CollectionPoint>,
}

pub fn reconcile<'a>(snapshot: &'a Snapshot, points: &'a [Arc<CollectionPoint>]) -> Scene<'a> {
    let selected = snapshot.selected_id();

    let markers = points
        .iter()
        .map(|p| MarkerState {
            id: p.id.as_str(),
            coordinate: p.coordinate,
            variant: if selected == Some(p.id.as_str()) {
                MarkerVariant::Highlighted
            } else {
                MarkerVariant::Normal
            },
        })
        .collect();

    let details = match &snapshot.entity {
        Some(entity) if snapshot.details_open => Some(entity.as_ref()),
        _ => None,
    };

    Scene {
        markers,
        path: snapshot.resolved_path.coordinates(),
        details,
    }
}

/// Receiver of map commands (the map widget, a console, a recorder)
pub trait RenderSurface {
    fn set_view(&mut self, command: ViewCommand);
    fn draw_path(&mut self, path: &[Coordinate]);
    fn clear_path(&mut self);
    fn set_marker(&mut self, id: &str, variant: MarkerVariant);
    fn open_details(&mut self, point: &CollectionPoint);
    fn close_details(&mut self);
}

/// Push a scene to a surface
pub fn present<S: RenderSurface + ?Sized>(scene: &Scene<'_>, surface: &mut S) {
    for marker in &scene.markers {
        surface.set_marker(marker.id, marker.variant);
    }

    match scene.path {
        Some(path) => surface.draw_path(path),
        None => surface.clear_path(),
    }

    match scene.details {
        Some(point) => surface.open_details(point),
        None => surface.close_details(),
    }
}

/// Owned record of one surface call
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCommand {
    SetView(ViewCommand),
    DrawPath(Vec<Coordinate>),
    ClearPath,
    SetMarker { id: String, variant: MarkerVariant },
    OpenDetails(String),
    CloseDetails,
}

/// Surface that keeps every command it receives
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    pub commands: Vec<SurfaceCommand>,
}

impl RecordingSurface {
    /// Remove and return everything recorded so far
    pub fn drain(&mut self) -> Vec<SurfaceCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn view_commands(&self) -> Vec<ViewCommand> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                SurfaceCommand::SetView(v) => Some(*v),
                _ => None,
            })
            .collect()
    }

    /// Path currently drawn according to the latest draw/clear command
    pub fn drawn_path(&self) -> Option<&[Coordinate]> {
        self.commands.iter().rev().find_map(|c| match c {
            SurfaceCommand::DrawPath(p) => Some(Some(p.as_slice())),
            SurfaceCommand::ClearPath => Some(None),
            _ => None,
        })?
    }
}

impl RenderSurface for RecordingSurface {
    fn set_view(&mut self, command: ViewCommand) {
        self.commands.push(SurfaceCommand::SetView(command));
    }

    fn draw_path(&mut self, path: &[Coordinate]) {
        self.commands.push(SurfaceCommand::DrawPath(path.to_vec()));
    }

    fn clear_path(&mut self) {
        self.commands.push(SurfaceCommand::ClearPath);
    }

    fn set_marker(&mut self, id: &str, variant: MarkerVariant) {
        self.commands.push(SurfaceCommand::SetMarker {
            id: id.to_string(),
            variant,
        });
    }

    fn open_details(&mut self, point: &CollectionPoint) {
        self.commands.push(SurfaceCommand::OpenDetails(point.id.clone()));
    }

    fn close_details(&mut self) {
        self.commands.push(SurfaceCommand::CloseDetails);
    }
}
