//! Interaction events, dispatchable targets, and trigger subscriptions.
//!
//! This module provides:
//! - The qualifying interaction kinds and the event value delivered to listeners
//! - [`EventTarget`], a window/document node with DOM-style listener semantics
//! - [`Subscription`], the cancellation handle over a set of registrations

mod kinds;
mod subscription;
mod target;

pub use kinds::{InteractionEvent, InteractionKind};
pub use subscription::Subscription;
pub use target::{EventTarget, ListenerId, ListenerOptions};
