//! delicious-core: store directory core library.
//!
//! This crate holds everything the HTTP server and the terminal typeahead
//! share: the domain records, the search query builders, the data-store
//! collaborator traits (with in-memory implementations) and the result
//! renderer.
//!
//! # Architecture
//!
//! ```text
//! keystroke ──► typeahead ──► GET /api/search ──► TextQuery ──► StoreRepository
//!                   ▲                                                │
//!                   └──────────── render_results ◄── [SearchResult] ◄┘
//! ```
//!
//! The server depends on the repository traits only; the in-memory
//! implementations back the binary and every test harness.

pub mod accounts;
pub mod config;
pub mod render;
pub mod reviews;
pub mod search;
pub mod store;
pub mod types;

pub use types::{GeoPoint, Location, NearbyStore, SearchResult, Store, StoreDraft, TagCount};
