//! Route resolver
//!
//! Bridges selection changes to the routing provider. Each request runs as
//! its own task and reports back over a channel tagged with the generation
//! that started it; the store decides whether that generation is still
//! current when the completion is applied. Superseded requests may also be
//! aborted outright, but nothing depends on that happening. Every request
//! reports back exactly once, even when the provider panics.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use log::{debug, info, warn};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::core::catalog::CollectionPoint;
use crate::core::geo::is_routable;
use crate::core::provider::{Resolution, RoutingProvider};
use crate::core::selection::{Generation, RouteFailure, RoutePath, SelectionStore, Unavailable};

/// A finished routing request, not yet applied to the store
#[derive(Debug)]
pub struct Completion {
    pub generation: Generation,
    pub point_id: String,
    pub outcome: Resolution,
}

impl Completion {
    fn into_path(self) -> RoutePath {
        match self.outcome {
            Ok(path) if !path.is_empty() => RoutePath::resolved(path),
            Ok(_) => RoutePath::Unavailable(Unavailable::LookupFailed(RouteFailure::NoRoute)),
            Err(failure) => RoutePath::Unavailable(Unavailable::LookupFailed(failure)),
        }
    }
}

/// What `start` did for a selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// A provider request is outstanding for this generation
    Requested,
    /// No request was needed; "unavailable" was committed immediately
    ShortCircuited,
}

pub struct RouteResolver {
    provider: Arc<dyn RoutingProvider>,
    timeout: Duration,
    abort_superseded: bool,
    tx: mpsc::UnboundedSender<Completion>,
    rx: mpsc::UnboundedReceiver<Completion>,
    in_flight: usize,
    live: Option<CancellationToken>,
}

impl RouteResolver {
    pub fn new(provider: Arc<dyn RoutingProvider>, timeout: Duration, abort_superseded: bool) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            provider,
            timeout,
            abort_superseded,
            tx,
            rx,
            in_flight: 0,
            live: None,
        }
    }

    /// Begin resolving the route for a selection that produced `generation`
    ///
    /// Must be called after the store has been updated, so the new center is
    /// already visible before any request goes out.
    pub fn start(
        &mut self,
        store: &mut SelectionStore,
        generation: Generation,
        point: &CollectionPoint,
    ) -> Dispatch {
        self.supersede();

        let waypoints = match point.waypoints.as_deref() {
            Some(w) if is_routable(Some(w)) => w.to_vec(),
            _ => {
                debug!("'{}' has no routable waypoints, skipping provider", point.id);
                store.commit_path(generation, RoutePath::Unavailable(Unavailable::NoWaypoints));
                return Dispatch::ShortCircuited;
            }
        };

        let token = CancellationToken::new();
        self.live = Some(token.clone());

        let request = self.provider.resolve_path(waypoints);
        let tx = self.tx.clone();
        let timeout = self.timeout;
        let point_id = point.id.clone();

        tokio::spawn(async move {
            let outcome = tokio::select! {
                _ = token.cancelled() => Err(RouteFailure::Cancelled),
                result = tokio::time::timeout(timeout, AssertUnwindSafe(request).catch_unwind()) => {
                    match result {
                        Ok(Ok(resolution)) => resolution,
                        Ok(Err(_)) => {
                            warn!("Routing provider panicked while resolving '{point_id}'");
                            Err(RouteFailure::Transport)
                        }
                        Err(_) => Err(RouteFailure::Timeout),
                    }
                }
            };
            // The receiver only goes away with the engine itself
            let _ = tx.send(Completion {
                generation,
                point_id,
                outcome,
            });
        });

        self.in_flight += 1;
        debug!("Route request for '{}' dispatched at {generation}", point.id);
        Dispatch::Requested
    }

    /// Retire the live request, aborting its transport when configured to
    pub fn supersede(&mut self) {
        if let Some(token) = self.live.take() {
            if self.abort_superseded {
                token.cancel();
            }
        }
    }

    /// Requests dispatched whose completion has not been received yet
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Wait for the next completion; `None` when nothing is outstanding
    pub async fn next_completion(&mut self) -> Option<Completion> {
        if self.in_flight == 0 {
            return None;
        }
        let completion = self.rx.recv().await?;
        self.in_flight -= 1;
        Some(completion)
    }

    /// Apply a completion to the store; returns whether it was accepted
    pub fn commit(store: &mut SelectionStore, completion: Completion) -> bool {
        let generation = completion.generation;
        let point_id = completion.point_id.clone();
        let path = completion.into_path();

        let accepted = store.commit_path(generation, path.clone());
        match (&path, accepted) {
            (_, false) => debug!("Ignored stale route for '{point_id}' ({generation})"),
            (RoutePath::Resolved(p), true) => {
                info!("Route for '{point_id}' committed ({} points)", p.len())
            }
            (RoutePath::Unavailable(reason), true) => {
                warn!("No route for '{point_id}': {reason:?}")
            }
            (RoutePath::Absent, true) => {}
        }
        accepted
    }
}
