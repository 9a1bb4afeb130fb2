//! Text rendering surface
//!
//! Stands in for the map widget: keeps what is currently on screen and
//! prints a line to stderr only when something actually changes.

use std::collections::HashMap;

use ecopoint::{CollectionPoint, Coordinate, MarkerVariant, RenderSurface, ViewCommand};

#[derive(Debug, Default)]
pub struct ConsoleSurface {
    markers: HashMap<String, MarkerVariant>,
    path: Option<Vec<Coordinate>>,
    details: Option<String>,
    lines: Vec<String>,
}

impl ConsoleSurface {
    /// Lines emitted so far
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    fn emit(&mut self, line: String) {
        eprintln!("{line}");
        self.lines.push(line);
    }
}

impl RenderSurface for ConsoleSurface {
    fn set_view(&mut self, command: ViewCommand) {
        self.emit(format!(
            "📍 Map centered on {} (zoom {})",
            command.center, command.zoom
        ));
    }

    fn draw_path(&mut self, path: &[Coordinate]) {
        if self.path.as_deref() != Some(path) {
            self.path = Some(path.to_vec());
            self.emit(format!("🛣️  Route drawn ({} points)", path.len()));
        }
    }

    fn clear_path(&mut self) {
        if self.path.take().is_some() {
            self.emit("🧹 Route cleared".to_string());
        }
    }

    fn set_marker(&mut self, id: &str, variant: MarkerVariant) {
        let previous = self.markers.insert(id.to_string(), variant);
        if previous.is_some() && previous != Some(variant) {
            let state = match variant {
                MarkerVariant::Highlighted => "highlighted",
                MarkerVariant::Normal => "normal",
            };
            self.emit(format!("   marker '{id}' → {state}"));
        }
    }

    fn open_details(&mut self, point: &CollectionPoint) {
        if self.details.as_deref() != Some(point.id.as_str()) {
            self.details = Some(point.id.clone());
            self.emit(format!("ℹ️  {}: {}", point.name, point.description));
        }
    }

    fn close_details(&mut self) {
        if self.details.take().is_some() {
            self.emit("   details closed".to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_changes_are_printed() {
        let mut surface = ConsoleSurface::default();

        surface.set_marker("a", MarkerVariant::Normal);
        surface.set_marker("a", MarkerVariant::Normal);
        assert!(surface.lines().is_empty());

        surface.set_marker("a", MarkerVariant::Highlighted);
        assert_eq!(surface.lines().len(), 1);

        surface.clear_path();
        assert_eq!(surface.lines().len(), 1);

        let path = [Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 1.0)];
        surface.draw_path(&path);
        surface.draw_path(&path);
        surface.clear_path();
        assert_eq!(
            &surface.lines()[1..],
            &["🛣️  Route drawn (2 points)".to_string(), "🧹 Route cleared".to_string()]
        );
    }

    #[test]
    fn test_different_route_of_same_length_is_redrawn() {
        let mut surface = ConsoleSurface::default();
        let first = [Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 1.0)];
        let second = [Coordinate::new(2.0, 2.0), Coordinate::new(3.0, 3.0)];

        surface.draw_path(&first);
        surface.draw_path(&second);
        surface.draw_path(&second);

        assert_eq!(surface.lines().len(), 2);
    }
}
