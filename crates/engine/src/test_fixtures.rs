//! Shared test helpers: a seeded in-memory store and placement use cases over it.
//!
//! # Usage
//!
//! ```rust,ignore
//! let gym = TestGym::new().await;
//! let squat = gym.exercise("Squat").await;
//! let result = gym.use_cases.add_exercise.execute(gym.template_id, gym.main(squat)).await?;
//! ```

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use fitplan_domain::{
    Exercise, ExerciseId, ExerciseLink, ExerciseLinkType, PlacementGroup, RoundNumber,
    TemplateExercisePlacement, WorkoutPhase, WorkoutState, WorkoutTemplate, WorkoutTemplateId,
};

use crate::infrastructure::clock::SystemClock;
use crate::infrastructure::memory::InMemoryStore;
use crate::use_cases::placement::{AddExerciseInput, PlacementUseCases};

pub struct TestGym {
    pub store: Arc<InMemoryStore>,
    pub use_cases: PlacementUseCases,
    pub template_id: WorkoutTemplateId,
    link_order: AtomicU32,
}

impl TestGym {
    /// Store with one Draft template and nothing else.
    pub async fn new() -> Self {
        let store = Arc::new(InMemoryStore::new());
        let template = WorkoutTemplate::new("Full body", WorkoutState::Draft);
        let template_id = template.id;
        store.insert_template(template).await;

        let use_cases = PlacementUseCases::new(
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            Arc::new(SystemClock::new()),
        );

        Self {
            store,
            use_cases,
            template_id,
            link_order: AtomicU32::new(1),
        }
    }

    pub async fn template(&self, state: WorkoutState) -> WorkoutTemplateId {
        let template = WorkoutTemplate::new("Other template", state);
        let id = template.id;
        self.store.insert_template(template).await;
        id
    }

    /// An active exercise.
    pub async fn exercise(&self, name: &str) -> ExerciseId {
        let exercise = Exercise::new(name);
        let id = exercise.id;
        self.store.insert_exercise(exercise).await;
        id
    }

    pub async fn inactive_exercise(&self, name: &str) -> ExerciseId {
        let exercise = Exercise::new(name).inactive();
        let id = exercise.id;
        self.store.insert_exercise(exercise).await;
        id
    }

    /// Links get increasing display orders, so they resolve in creation order.
    pub async fn link(&self, source: ExerciseId, target: ExerciseId, link_type: ExerciseLinkType) {
        let display_order = self.link_order.fetch_add(1, Ordering::SeqCst);
        self.store
            .insert_link(ExerciseLink::new(source, target, link_type, display_order))
            .await;
    }

    pub fn input(&self, exercise_id: ExerciseId, phase: &str, round: u32) -> AddExerciseInput {
        AddExerciseInput {
            exercise_id,
            phase: phase.to_string(),
            round_number: round,
            metadata: r#"{"sets":3,"reps":10}"#.to_string(),
        }
    }

    pub fn main(&self, exercise_id: ExerciseId) -> AddExerciseInput {
        self.input(exercise_id, "Main", 1)
    }

    pub fn group(&self, phase: WorkoutPhase, round: u32) -> PlacementGroup {
        PlacementGroup::new(
            self.template_id,
            phase,
            RoundNumber::new(round).expect("valid round"),
        )
    }

    /// Committed placements of one group, by order.
    pub async fn placements_in(&self, group: PlacementGroup) -> Vec<TemplateExercisePlacement> {
        self.store
            .all_placements()
            .await
            .into_iter()
            .filter(|p| p.is_in(&group))
            .collect()
    }

    pub async fn exercises_in(&self, group: PlacementGroup) -> Vec<ExerciseId> {
        self.placements_in(group)
            .await
            .into_iter()
            .map(|p| p.exercise_id)
            .collect()
    }

    /// Asserts every group of the template holds exactly the orders `1..=N`.
    pub async fn assert_dense(&self) {
        let all = self.store.all_placements().await;
        let mut groups: Vec<PlacementGroup> = all.iter().map(|p| p.group()).collect();
        groups.sort();
        groups.dedup();
        for group in groups {
            let orders: Vec<u32> = all
                .iter()
                .filter(|p| p.is_in(&group))
                .map(|p| p.order_in_round)
                .collect();
            let expected: Vec<u32> = (1..=orders.len() as u32).collect();
            assert_eq!(orders, expected, "group {group:?} is not densely ordered");
        }
    }
}
