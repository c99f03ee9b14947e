//! Navigation Module
//!
//! Page transitions without full reloads: route mapping, history and the
//! controller that broadcasts navigation lifecycle events.

mod controller;
mod events;
pub mod history;
mod routes;

pub use controller::{NavigationController, NavigationOutcome, NavigationStats};
pub use events::NavigationEvent;
pub use history::{NavigationRecord, SessionHistory};
pub use routes::{query_param, RouteMap};
