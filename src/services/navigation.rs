//! Navigation sink
//!
//! Forced navigations (login redirect, profile completion) are requested
//! through `Navigator`; the application shell decides how to perform them.

use std::sync::Mutex;
use tracing::info;

pub trait Navigator: Send + Sync {
    fn navigate(&self, destination: &str);
}

/// Records navigations in order; the last one is the current location
#[derive(Debug, Default)]
pub struct NavigationHistory {
    visits: Mutex<Vec<String>>,
}

impl NavigationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<String> {
        self.visits.lock().unwrap_or_else(|e| e.into_inner()).last().cloned()
    }

    pub fn visits(&self) -> Vec<String> {
        self.visits.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// How many times `destination` was navigated to
    pub fn count_of(&self, destination: &str) -> usize {
        self.visits
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|v| v.as_str() == destination)
            .count()
    }
}

impl Navigator for NavigationHistory {
    fn navigate(&self, destination: &str) {
        info!(destination = destination, "Navigating");
        self.visits
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(destination.to_string());
    }
}
