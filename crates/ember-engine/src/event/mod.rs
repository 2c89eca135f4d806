//! Window events and their publish/subscribe delivery.
//!
//! Public API is platform-agnostic; the runtime translates winit events into
//! [`Event`]s and hands them to the window synchronously.

mod manager;
pub(crate) mod platform;
mod types;

pub use manager::{EventManager, SubscriptionId};
pub use types::{Event, EventKind, Key, MouseButton};
