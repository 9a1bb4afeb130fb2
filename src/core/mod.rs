//! Core library modules for ecopoint
//!
//! Leaves first: geo types, catalog, selection store, provider boundary and
//! clients, then the resolver, viewport controller, reconciler and engine.

pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod geo;
pub mod geocode;
pub mod osrm;
pub mod provider;
pub mod reconcile;
pub mod resolver;
pub mod selection;
pub mod viewport;
