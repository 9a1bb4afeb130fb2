//! Selection engine
//!
//! Owns the selection store and drives the viewport controller, route
//! resolver and reconciler from one logical thread. User events and route
//! completions are processed one at a time; every state change is followed
//! by a fresh projection pushed to the rendering surface.

use std::sync::Arc;

use log::{debug, warn};
use tokio::sync::mpsc;

use crate::core::catalog::{Catalog, CollectionPoint};
use crate::core::config::EngineConfig;
use crate::core::error::Result;
use crate::core::geo::Coordinate;
use crate::core::provider::RoutingProvider;
use crate::core::reconcile::{present, reconcile, RenderSurface};
use crate::core::resolver::{Completion, RouteResolver};
use crate::core::selection::{Generation, SelectionStore, Snapshot};
use crate::core::viewport::ViewportController;

/// Input consumed by the engine
#[derive(Debug, Clone, PartialEq)]
pub enum UserEvent {
    /// Marker tap or list action
    Select(String),
    /// Background tap or overlay close
    Deselect,
    /// Secondary action on the selected point
    ViewDetails,
    /// Programmatic navigation (e.g. a geocoding result)
    Focus(Coordinate),
}

pub struct Engine<S: RenderSurface> {
    catalog: Catalog,
    store: SelectionStore,
    resolver: RouteResolver,
    viewport: ViewportController,
    surface: S,
}

impl<S: RenderSurface> Engine<S> {
    /// Build the engine and render the initial, empty selection
    pub fn new(
        catalog: Catalog,
        provider: Arc<dyn RoutingProvider>,
        config: &EngineConfig,
        surface: S,
    ) -> Self {
        let mut engine = Self {
            catalog,
            store: SelectionStore::new(config.initial_center),
            resolver: RouteResolver::new(
                provider,
                config.resolve_timeout(),
                config.abort_superseded,
            ),
            viewport: ViewportController::new(config.zoom),
            surface,
        };
        engine.sync_viewport();
        engine.render();
        engine
    }

    /// Select a catalog point by id
    ///
    /// Unknown ids leave the selection untouched.
    pub fn select(&mut self, id: &str) -> Result<Generation> {
        let point = self.catalog.require(id)?;
        Ok(self.select_point(point))
    }

    pub fn select_point(&mut self, point: Arc<CollectionPoint>) -> Generation {
        let generation = self.store.select(Arc::clone(&point));
        // Recenter before the route request goes out
        self.sync_viewport();
        self.resolver.start(&mut self.store, generation, &point);
        self.render();
        generation
    }

    pub fn deselect(&mut self) -> Generation {
        self.resolver.supersede();
        let generation = self.store.deselect();
        self.render();
        generation
    }

    /// Open the detail overlay; returns false when nothing is selected
    pub fn view_details(&mut self) -> bool {
        let opened = self.store.open_details();
        if opened {
            self.render();
        }
        opened
    }

    pub fn focus(&mut self, center: Coordinate) {
        self.store.focus(center);
        self.sync_viewport();
        self.render();
    }

    pub fn handle(&mut self, event: UserEvent) -> Result<()> {
        debug!("Handling {event:?}");
        match event {
            UserEvent::Select(id) => {
                self.select(&id)?;
            }
            UserEvent::Deselect => {
                self.deselect();
            }
            UserEvent::ViewDetails => {
                if !self.view_details() {
                    debug!("Ignoring details request without a selection");
                }
            }
            UserEvent::Focus(center) => self.focus(center),
        }
        Ok(())
    }

    /// Apply the next route completion; `None` when nothing is outstanding
    ///
    /// `Some(true)` means the route was committed, `Some(false)` that it
    /// belonged to a superseded selection and was dropped.
    pub async fn process_next_completion(&mut self) -> Option<bool> {
        let completion = self.resolver.next_completion().await?;
        Some(self.apply_completion(completion))
    }

    /// Wait until every outstanding route request has reported back
    pub async fn settle(&mut self) {
        while self.process_next_completion().await.is_some() {}
    }

    /// Event loop: interleave user events with route completions until the
    /// event channel closes, then drain outstanding requests
    pub async fn run(&mut self, mut events: mpsc::Receiver<UserEvent>) {
        loop {
            tokio::select! {
                event = events.recv() => match event {
                    Some(event) => {
                        if let Err(e) = self.handle(event) {
                            warn!("{e}");
                        }
                    }
                    None => break,
                },
                Some(completion) = self.resolver.next_completion() => {
                    self.apply_completion(completion);
                }
            }
        }
        self.settle().await;
    }

    pub fn snapshot(&self) -> Snapshot {
        self.store.current_snapshot()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn pending_routes(&self) -> usize {
        self.resolver.in_flight()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    fn apply_completion(&mut self, completion: Completion) -> bool {
        let accepted = RouteResolver::commit(&mut self.store, completion);
        if accepted {
            self.render();
        }
        accepted
    }

    fn sync_viewport(&mut self) {
        let snapshot = self.store.current_snapshot();
        if let Some(command) = self.viewport.sync(&snapshot) {
            self.surface.set_view(command);
        }
    }

    fn render(&mut self) {
        let snapshot = self.store.current_snapshot();
        let scene = reconcile(&snapshot, self.catalog.points());
        present(&scene, &mut self.surface);
    }
}
