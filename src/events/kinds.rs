//! Interaction event kinds.
//!
//! This module defines the set of user interactions that qualify as engagement
//! and arm the deferred script loader.

use clap::ValueEnum;
use strum_macros::EnumIter as EnumIterMacro;

/// User interactions that qualify to trigger deferred loading.
///
/// Any one of these counts as "the user has engaged with the page"; the loader
/// listens for all of them and fires on whichever arrives first. Scroll and
/// pointer movement arrive continuously once a user is active, touch-start
/// covers mobile, key-down covers keyboard-first navigation, and click is the
/// catch-all for pointing devices that produce neither scroll nor movement
/// (e.g., tap-to-click without hover).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro, ValueEnum, serde::Serialize)]
#[value(rename_all = "lower")]
#[serde(rename_all = "lowercase")]
pub enum InteractionKind {
    /// Any scroll of the page or a scrollable container
    Scroll,
    /// Pointer (mouse) movement
    PointerMove,
    /// Touch contact on a touchscreen
    TouchStart,
    /// Key press
    KeyDown,
    /// Completed click or tap
    Click,
}

impl InteractionKind {
    /// Returns the DOM event name this kind is registered under.
    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionKind::Scroll => "scroll",
            InteractionKind::PointerMove => "pointermove",
            InteractionKind::TouchStart => "touchstart",
            InteractionKind::KeyDown => "keydown",
            InteractionKind::Click => "click",
        }
    }
}

impl std::fmt::Display for InteractionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A dispatched interaction event.
///
/// Carries only the kind: the loader's trigger decision never inspects event
/// payloads (coordinates, keys, deltas), so none are modeled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InteractionEvent {
    /// Which interaction occurred.
    pub kind: InteractionKind,
}

impl InteractionEvent {
    /// Creates an event of the given kind.
    pub fn new(kind: InteractionKind) -> Self {
        Self { kind }
    }
}
