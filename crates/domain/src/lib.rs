//! FitPlan domain - workout template placement types and invariants.
//!
//! Pure data: no I/O, no async. The engine crate owns ports and orchestration.

pub mod entities;
pub mod error;
pub mod ids;
pub mod value_objects;

pub use entities::{
    Exercise, ExerciseLink, PlacementGroup, TemplateExercisePlacement, WorkoutTemplate,
};

pub use error::DomainError;

pub use ids::{ExerciseId, ExerciseLinkId, PlacementId, WorkoutTemplateId};

pub use value_objects::{
    ExerciseLinkType, ExerciseMetadata, RoundNumber, WorkoutPhase, WorkoutState,
};
