//! CLI-specific utilities for ecopoint
//!
//! This module contains code specific to the command-line interface,
//! separate from the core library functionality.

pub mod console;
pub mod progress;

pub use console::ConsoleSurface;
pub use progress::RouteProgress;
