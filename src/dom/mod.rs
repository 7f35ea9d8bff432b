//! Headless page model.
//!
//! A minimal rendition of the pieces of a document the loader actually
//! touches: script elements, injection descriptors, and an append-only body.
//! There is no layout and no network; script "loading" means recording the
//! element and, when the host says so, firing its completion callback.

mod element;
mod page;

pub use element::{LoadMode, ScriptDescriptor, ScriptElement};
pub use page::Page;
