//! CLI-specific progress handling for ecopoint
//!
//! Shows a spinner while route lookups are outstanding.

use indicatif::{ProgressBar, ProgressStyle};

/// Creates a spinner for pending route lookups
pub fn create_spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .expect("Failed to create progress style"),
    );
    pb
}

/// Tracks outstanding route lookups on stderr
pub struct RouteProgress {
    pub pb: ProgressBar,
}

impl RouteProgress {
    pub fn new(pending: usize) -> Self {
        let pb = create_spinner();
        pb.set_message(pending_message(pending));
        Self { pb }
    }

    pub fn update(&self, pending: usize) {
        self.pb.set_message(pending_message(pending));
        self.pb.tick();
    }

    pub fn finish(&self) {
        self.pb.finish_and_clear();
    }
}

fn pending_message(pending: usize) -> String {
    match pending {
        1 => "🗺️  Resolving 1 route...".to_string(),
        n => format!("🗺️  Resolving {n} routes..."),
    }
}
