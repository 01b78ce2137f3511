//! delicious: a store directory with full-text and proximity search, and a
//! terminal typeahead that queries it as you type.
//!
//! This crate re-exports the workspace members so integration tests and
//! benches can import them from one place.
//!
//! # Architecture
//!
//! ```text
//!  delicious search                       delicious serve
//! ┌──────────────────┐   GET /api/search  ┌────────────────────┐
//! │ typeahead        │ ─────────────────► │ server (axum)      │
//! │  controller      │                    │  routes            │
//! │  navigator, pane │ ◄───────────────── │  ── core ────────  │
//! └──────────────────┘   [SearchResult]   │  search, store,    │
//!          │                              │  accounts          │
//!          └──── core::render ────────────└────────────────────┘
//! ```

pub use delicious_core;
pub use delicious_server;
pub use delicious_typeahead;
