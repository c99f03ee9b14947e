//! Background Tasks Module
//!
//! Long-running tasks spawned for the lifetime of a session.
//!
//! # Tasks
//! - Page policy: warms and loads page data in response to navigation events

mod page_policy;

pub use page_policy::spawn_page_policy;
