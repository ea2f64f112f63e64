//! FitPlan Engine library.
//!
//! Server-side placement of exercises into workout templates.
//!
//! ## Structure
//!
//! - `use_cases/` - Placement operations (add, remove, reorder, copy, view)
//! - `infrastructure/` - Ports plus the SQLite and in-memory adapters
//! - `api/` - HTTP entry points
//! - `app` - Application composition

pub mod api;
pub mod app;
pub mod infrastructure;
pub mod use_cases;

/// Shared fixtures for use case and API tests.
#[cfg(test)]
pub mod test_fixtures;

pub use app::App;
