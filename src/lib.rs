//! World Text — localized text resolution and world-action dispatch.
//!
//! Resolves user-facing strings by key against an active language pack with a
//! default-language fallback, and applies declarative world actions (doors,
//! node animation, drones) to registered effect handlers.

pub mod core;
pub mod schema;
