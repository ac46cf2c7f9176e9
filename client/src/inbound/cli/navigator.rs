//! Navigation adapter for a one-shot terminal session.
//!
//! Navigation requests are recorded rather than acted on immediately; after a
//! command finishes the runner shows whichever view was requested last.

use std::sync::{Mutex, PoisonError};

use tracing::debug;

use crate::domain::ports::{Navigator, Route};

/// Remembers the most recent navigation request.
#[derive(Debug, Default)]
pub struct RouteRecorder {
    pending: Mutex<Option<Route>>,
}

impl RouteRecorder {
    /// Create a recorder with no pending route.
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the pending route, leaving none behind.
    pub fn take(&self) -> Option<Route> {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}

impl Navigator for RouteRecorder {
    fn navigate(&self, route: Route) {
        debug!(%route, "navigation requested");
        *self.pending.lock().unwrap_or_else(PoisonError::into_inner) = Some(route);
    }
}
