//! Template exercise placement use cases.
//!
//! Places exercises into a template's phases and rounds, keeps every group
//! densely ordered, and attaches or detaches linked warm-ups and
//! cool-downs as Main exercises come and go.

use std::sync::Arc;

use crate::infrastructure::ports::{
    ClockPort, ExerciseLinkRepo, ExerciseRepo, PlacementStore, WorkoutTemplateRepo,
};

mod add_exercise;
mod auto_link;
mod copy_round;
mod error;
pub mod ordering;
mod organized_view;
mod orphans;
mod remove_exercise;
mod reorder_exercise;
mod types;
mod update_metadata;
mod validation;


pub use add_exercise::{AddExercise, AddExerciseInput};
pub use auto_link::AutoLinker;
pub use copy_round::{CopyRound, CopyRoundInput};
pub use error::PlacementError;
pub use organized_view::GetOrganizedView;
pub use orphans::OrphanDetector;
pub use remove_exercise::RemoveExercise;
pub use reorder_exercise::ReorderExercise;
pub use types::{
    AddExerciseResult, CopyRoundResult, OrganizedTemplate, PhaseView, RemoveExerciseResult,
    ReorderExerciseResult, RoundView, UpdateMetadataResult,
};
pub use update_metadata::UpdateMetadata;
pub use validation::{ExerciseStatus, PlacementValidator};

/// Container for placement use cases.
pub struct PlacementUseCases {
    pub validator: Arc<PlacementValidator>,
    pub add_exercise: AddExercise,
    pub remove_exercise: RemoveExercise,
    pub update_metadata: UpdateMetadata,
    pub reorder_exercise: ReorderExercise,
    pub copy_round: CopyRound,
    pub organized_view: GetOrganizedView,
}

impl PlacementUseCases {
    pub fn new(
        templates: Arc<dyn WorkoutTemplateRepo>,
        exercises: Arc<dyn ExerciseRepo>,
        links: Arc<dyn ExerciseLinkRepo>,
        placements: Arc<dyn PlacementStore>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        let validator = Arc::new(PlacementValidator::new(
            templates,
            exercises,
            placements.clone(),
        ));
        let auto_linker = Arc::new(AutoLinker::new(links.clone(), clock.clone()));
        let orphans = Arc::new(OrphanDetector::new(links));

        Self {
            add_exercise: AddExercise::new(
                validator.clone(),
                auto_linker,
                placements.clone(),
                clock.clone(),
            ),
            remove_exercise: RemoveExercise::new(
                validator.clone(),
                orphans,
                placements.clone(),
                clock.clone(),
            ),
            update_metadata: UpdateMetadata::new(validator.clone(), placements.clone(), clock.clone()),
            reorder_exercise: ReorderExercise::new(
                validator.clone(),
                placements.clone(),
                clock.clone(),
            ),
            copy_round: CopyRound::new(validator.clone(), placements.clone(), clock),
            organized_view: GetOrganizedView::new(validator.clone(), placements),
            validator,
        }
    }
}
