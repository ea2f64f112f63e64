//! Use cases - orchestration over the infrastructure ports.

pub mod placement;

pub use placement::PlacementUseCases;
