//! Navigation lifecycle events.

/// Signal emitted by the navigation controller around a page transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationEvent {
    /// Fired before the partial content for `path` is requested
    BeforeNavigate {
        path: String,
        previous_path: String,
    },
    /// Fired after the content swap to `path` completed
    ContentChanged {
        path: String,
        previous_path: String,
        title: Option<String>,
    },
}
