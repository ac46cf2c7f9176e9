//! Driven port for navigation side effects.
//!
//! The session manager decides *where* the user goes after a state change;
//! the view layer decides *how* to show it.

use std::fmt;

/// Views the client can send the user to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// Unauthenticated landing view.
    Login,
    /// Authenticated landing view: the task list.
    Tasks,
}

impl Route {
    /// Path of the view, matching the web client's routes.
    pub fn path(self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Tasks => "/tasks",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Fire-and-forget navigation requests.
#[cfg_attr(test, mockall::automock)]
pub trait Navigator: Send + Sync {
    /// Ask the view layer to show `route`.
    fn navigate(&self, route: Route);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Route::Login, "/login")]
    #[case(Route::Tasks, "/tasks")]
    fn routes_render_as_paths(#[case] route: Route, #[case] expected: &str) {
        assert_eq!(route.to_string(), expected);
    }
}
