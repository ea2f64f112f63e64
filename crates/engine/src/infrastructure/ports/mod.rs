//! Port traits for infrastructure boundaries.
//!
//! Ports exist for:
//! - Reference data owned by other services (templates, exercises, exercise links)
//! - Placement storage with read/write unit-of-work scopes (could swap SQLite -> Postgres)
//! - Clock (for testing)

mod error;
mod repos;
mod testing;

// =============================================================================
// Repository Ports
// =============================================================================
pub use repos::{
    ExerciseLinkRepo, ExerciseRepo, PlacementReadScope, PlacementStore, PlacementWriteScope,
    WorkoutTemplateRepo,
};

// =============================================================================
// Test-Only Mock Repositories (only available during test builds)
// =============================================================================
#[cfg(test)]
pub use repos::{MockExerciseLinkRepo, MockExerciseRepo, MockWorkoutTemplateRepo};

#[cfg(test)]
pub use testing::MockClockPort;

// =============================================================================
// Testing Ports
// =============================================================================
pub use testing::ClockPort;

// =============================================================================
// Error Types
// =============================================================================
pub use error::RepoError;
