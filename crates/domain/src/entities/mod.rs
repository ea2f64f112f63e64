//! Domain entities - Core business objects with identity

mod exercise;
mod exercise_link;
mod placement;
mod workout_template;

pub use exercise::Exercise;
pub use exercise_link::ExerciseLink;
pub use placement::{PlacementGroup, TemplateExercisePlacement};
pub use workout_template::WorkoutTemplate;
