//! Value objects - Immutable objects defined by their attributes

mod link_type;
mod metadata;
mod phase;
mod round;
mod workout_state;

pub use link_type::ExerciseLinkType;
pub use metadata::ExerciseMetadata;
pub use phase::WorkoutPhase;
pub use round::RoundNumber;
pub use workout_state::WorkoutState;
