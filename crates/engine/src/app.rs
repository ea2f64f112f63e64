//! Application state and composition.

use std::sync::Arc;

use crate::infrastructure::ports::{
    ClockPort, ExerciseLinkRepo, ExerciseRepo, PlacementStore, WorkoutTemplateRepo,
};
use crate::use_cases::PlacementUseCases;

/// Main application state.
///
/// Passed to HTTP handlers via Axum state.
pub struct App {
    pub use_cases: UseCases,
}

/// Container for all use cases.
pub struct UseCases {
    pub placement: PlacementUseCases,
}

impl App {
    pub fn new(
        templates: Arc<dyn WorkoutTemplateRepo>,
        exercises: Arc<dyn ExerciseRepo>,
        links: Arc<dyn ExerciseLinkRepo>,
        placements: Arc<dyn PlacementStore>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            use_cases: UseCases {
                placement: PlacementUseCases::new(templates, exercises, links, placements, clock),
            },
        }
    }

    /// Wires every port to one store that implements them all.
    pub fn with_store<S>(store: Arc<S>, clock: Arc<dyn ClockPort>) -> Self
    where
        S: WorkoutTemplateRepo + ExerciseRepo + ExerciseLinkRepo + PlacementStore + 'static,
    {
        Self::new(store.clone(), store.clone(), store.clone(), store, clock)
    }
}
