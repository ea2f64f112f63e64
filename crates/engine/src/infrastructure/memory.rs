//! In-memory storage for placements and the reference data they depend on.
//!
//! Used by the engine tests and by `FITPLAN_STORE=memory` deployments.
//! Test builds add a switch that makes batch deletes fail.
//! Writers are serialized through one owned mutex guard per write scope;
//! each scope edits a working copy that replaces the published table on
//! commit. Readers take a snapshot, so they never observe a half-applied
//! operation.

use std::collections::HashMap;
#[cfg(test)]
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use fitplan_domain::{
    Exercise, ExerciseId, ExerciseLink, ExerciseLinkType, PlacementGroup, PlacementId,
    TemplateExercisePlacement, WorkoutPhase, WorkoutTemplate, WorkoutTemplateId,
};
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

use crate::infrastructure::ports::{
    ExerciseLinkRepo, ExerciseRepo, PlacementReadScope, PlacementStore, PlacementWriteScope,
    RepoError, WorkoutTemplateRepo,
};

#[derive(Default)]
struct ReferenceData {
    templates: HashMap<WorkoutTemplateId, WorkoutTemplate>,
    exercises: HashMap<ExerciseId, Exercise>,
    links: Vec<ExerciseLink>,
}

/// Placement rows keyed by id with the query shapes the ports need.
#[derive(Clone, Default)]
struct PlacementTable {
    rows: HashMap<PlacementId, TemplateExercisePlacement>,
}

impl PlacementTable {
    fn select(
        &self,
        filter: impl Fn(&TemplateExercisePlacement) -> bool,
    ) -> Vec<TemplateExercisePlacement> {
        let mut rows: Vec<_> = self.rows.values().filter(|p| filter(p)).cloned().collect();
        rows.sort_by(|a, b| {
            (a.phase, a.round_number, a.order_in_round, a.created_at, a.id).cmp(&(
                b.phase,
                b.round_number,
                b.order_in_round,
                b.created_at,
                b.id,
            ))
        });
        rows
    }

    fn by_template(&self, template_id: WorkoutTemplateId) -> Vec<TemplateExercisePlacement> {
        self.select(|p| p.template_id == template_id)
    }

    fn by_phase(
        &self,
        template_id: WorkoutTemplateId,
        phase: WorkoutPhase,
    ) -> Vec<TemplateExercisePlacement> {
        self.select(|p| p.template_id == template_id && p.phase == phase)
    }

    fn by_round(&self, group: PlacementGroup) -> Vec<TemplateExercisePlacement> {
        self.select(|p| p.is_in(&group))
    }

    fn max_order(&self, group: PlacementGroup) -> Option<u32> {
        self.rows
            .values()
            .filter(|p| p.is_in(&group))
            .map(|p| p.order_in_round)
            .max()
    }

    fn by_id(&self, id: PlacementId) -> Option<TemplateExercisePlacement> {
        self.rows.get(&id).cloned()
    }
}

/// In-memory implementation of every engine port.
pub struct InMemoryStore {
    reference: RwLock<ReferenceData>,
    placements: Arc<Mutex<PlacementTable>>,
    #[cfg(test)]
    fail_deletes: Arc<AtomicBool>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            reference: RwLock::new(ReferenceData::default()),
            placements: Arc::new(Mutex::new(PlacementTable::default())),
            #[cfg(test)]
            fail_deletes: Arc::new(AtomicBool::new(false)),
        }
    }

    pub async fn insert_template(&self, template: WorkoutTemplate) {
        self.reference
            .write()
            .await
            .templates
            .insert(template.id, template);
    }

    pub async fn insert_exercise(&self, exercise: Exercise) {
        self.reference
            .write()
            .await
            .exercises
            .insert(exercise.id, exercise);
    }

    pub async fn insert_link(&self, link: ExerciseLink) {
        let mut reference = self.reference.write().await;
        reference.links.retain(|l| l.id != link.id);
        reference.links.push(link);
    }

    /// Makes every subsequent `delete_batch` fail until switched off again.
    #[cfg(test)]
    pub fn set_fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    /// Every committed placement, sorted like `get_by_template`.
    pub async fn all_placements(&self) -> Vec<TemplateExercisePlacement> {
        self.placements.lock().await.select(|_| true)
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WorkoutTemplateRepo for InMemoryStore {
    async fn get(&self, id: WorkoutTemplateId) -> Result<Option<WorkoutTemplate>, RepoError> {
        Ok(self.reference.read().await.templates.get(&id).cloned())
    }
}

#[async_trait]
impl ExerciseRepo for InMemoryStore {
    async fn get(&self, id: ExerciseId) -> Result<Option<Exercise>, RepoError> {
        Ok(self.reference.read().await.exercises.get(&id).cloned())
    }
}

#[async_trait]
impl ExerciseLinkRepo for InMemoryStore {
    async fn links_by_source(
        &self,
        exercise_id: ExerciseId,
        link_type: ExerciseLinkType,
    ) -> Result<Vec<ExerciseLink>, RepoError> {
        let reference = self.reference.read().await;
        let mut links: Vec<ExerciseLink> = reference
            .links
            .iter()
            .filter(|l| {
                l.is_active && l.source_exercise_id == exercise_id && l.link_type == link_type
            })
            .cloned()
            .collect();
        links.sort_by_key(|l| l.display_order);
        Ok(links)
    }
}

#[async_trait]
impl PlacementStore for InMemoryStore {
    async fn read_only(&self) -> Result<Box<dyn PlacementReadScope>, RepoError> {
        let snapshot = self.placements.lock().await.clone();
        Ok(Box::new(SnapshotScope { table: snapshot }))
    }

    async fn writable(&self) -> Result<Box<dyn PlacementWriteScope>, RepoError> {
        let guard = self.placements.clone().lock_owned().await;
        let working = guard.clone();
        Ok(Box::new(WriteScope {
            guard,
            working,
            #[cfg(test)]
            fail_deletes: self.fail_deletes.clone(),
        }))
    }
}

/// Read scope over a copy of the committed table.
struct SnapshotScope {
    table: PlacementTable,
}

/// Holds the writer lock for its whole life; `working` is published on commit.
struct WriteScope {
    guard: OwnedMutexGuard<PlacementTable>,
    working: PlacementTable,
    #[cfg(test)]
    fail_deletes: Arc<AtomicBool>,
}

macro_rules! impl_read_scope {
    ($scope:ty, $table:ident) => {
        #[async_trait]
        impl PlacementReadScope for $scope {
            async fn get_by_template(
                &mut self,
                template_id: WorkoutTemplateId,
            ) -> Result<Vec<TemplateExercisePlacement>, RepoError> {
                Ok(self.$table.by_template(template_id))
            }

            async fn get_by_phase(
                &mut self,
                template_id: WorkoutTemplateId,
                phase: WorkoutPhase,
            ) -> Result<Vec<TemplateExercisePlacement>, RepoError> {
                Ok(self.$table.by_phase(template_id, phase))
            }

            async fn get_by_round(
                &mut self,
                group: PlacementGroup,
            ) -> Result<Vec<TemplateExercisePlacement>, RepoError> {
                Ok(self.$table.by_round(group))
            }

            async fn get_max_order_in_round(
                &mut self,
                group: PlacementGroup,
            ) -> Result<Option<u32>, RepoError> {
                Ok(self.$table.max_order(group))
            }

            async fn get_by_id(
                &mut self,
                id: PlacementId,
            ) -> Result<Option<TemplateExercisePlacement>, RepoError> {
                Ok(self.$table.by_id(id))
            }
        }
    };
}

impl_read_scope!(SnapshotScope, table);
impl_read_scope!(WriteScope, working);

#[async_trait]
impl PlacementWriteScope for WriteScope {
    async fn add(&mut self, placement: &TemplateExercisePlacement) -> Result<(), RepoError> {
        if self.working.rows.contains_key(&placement.id) {
            return Err(RepoError::constraint(format!(
                "Placement {} already exists",
                placement.id
            )));
        }
        self.working.rows.insert(placement.id, placement.clone());
        Ok(())
    }

    async fn update(&mut self, placement: &TemplateExercisePlacement) -> Result<(), RepoError> {
        match self.working.rows.get_mut(&placement.id) {
            Some(row) => {
                *row = placement.clone();
                Ok(())
            }
            None => Err(RepoError::not_found("Placement", placement.id)),
        }
    }

    async fn delete_batch(&mut self, ids: &[PlacementId]) -> Result<(), RepoError> {
        #[cfg(test)]
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(RepoError::database("delete_batch", "injected failure"));
        }
        if let Some(missing) = ids.iter().find(|id| !self.working.rows.contains_key(id)) {
            return Err(RepoError::not_found("Placement", missing));
        }
        for id in ids {
            self.working.rows.remove(id);
        }
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), RepoError> {
        let WriteScope {
            mut guard, working, ..
        } = *self;
        *guard = working;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use fitplan_domain::{ExerciseMetadata, RoundNumber};

    fn placement(group: PlacementGroup, order: u32) -> TemplateExercisePlacement {
        TemplateExercisePlacement::new(
            group,
            ExerciseId::new(),
            order,
            ExerciseMetadata::empty_object(),
            Utc::now(),
        )
    }

    fn main_group(template_id: WorkoutTemplateId) -> PlacementGroup {
        PlacementGroup::new(template_id, WorkoutPhase::Main, RoundNumber::FIRST)
    }

    #[tokio::test]
    async fn committed_writes_are_visible_to_new_scopes() {
        let store = InMemoryStore::new();
        let group = main_group(WorkoutTemplateId::new());
        let p = placement(group, 1);

        let mut scope = store.writable().await.expect("writable");
        scope.add(&p).await.expect("add");
        scope.commit().await.expect("commit");

        let mut read = store.read_only().await.expect("read");
        assert_eq!(read.get_by_id(p.id).await.expect("get"), Some(p));
        assert_eq!(read.get_max_order_in_round(group).await.expect("max"), Some(1));
    }

    #[tokio::test]
    async fn dropped_write_scope_discards_changes() {
        let store = InMemoryStore::new();
        let group = main_group(WorkoutTemplateId::new());
        let p = placement(group, 1);

        {
            let mut scope = store.writable().await.expect("writable");
            scope.add(&p).await.expect("add");
            assert!(scope.get_by_id(p.id).await.expect("get").is_some());
        }

        assert!(store.all_placements().await.is_empty());
    }

    #[tokio::test]
    async fn delete_batch_is_all_or_nothing() {
        let store = InMemoryStore::new();
        let group = main_group(WorkoutTemplateId::new());
        let p = placement(group, 1);

        let mut scope = store.writable().await.expect("writable");
        scope.add(&p).await.expect("add");
        let err = scope
            .delete_batch(&[p.id, PlacementId::new()])
            .await
            .expect_err("missing id must fail");
        assert!(err.is_not_found());
        assert!(scope.get_by_id(p.id).await.expect("get").is_some());
    }

    #[tokio::test]
    async fn injected_delete_failure_is_reported() {
        let store = InMemoryStore::new();
        store.set_fail_deletes(true);
        let mut scope = store.writable().await.expect("writable");
        let err = scope.delete_batch(&[]).await.expect_err("must fail");
        assert!(matches!(err, RepoError::Database { .. }));
    }

    #[tokio::test]
    async fn update_of_unknown_placement_is_not_found() {
        let store = InMemoryStore::new();
        let p = placement(main_group(WorkoutTemplateId::new()), 1);
        let mut scope = store.writable().await.expect("writable");
        let err = scope.update(&p).await.expect_err("must fail");
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn queries_sort_by_phase_round_and_order() {
        let store = InMemoryStore::new();
        let template_id = WorkoutTemplateId::new();
        let round2 = PlacementGroup::new(
            template_id,
            WorkoutPhase::Main,
            RoundNumber::new(2).expect("round"),
        );
        let warmup = PlacementGroup::new(template_id, WorkoutPhase::Warmup, RoundNumber::FIRST);
        let main_second = placement(main_group(template_id), 2);
        let main_first = placement(main_group(template_id), 1);
        let later_round = placement(round2, 1);
        let warm = placement(warmup, 1);

        let mut scope = store.writable().await.expect("writable");
        for p in [&main_second, &later_round, &warm, &main_first] {
            scope.add(p).await.expect("add");
        }
        scope.commit().await.expect("commit");

        let mut read = store.read_only().await.expect("read");
        let ids: Vec<_> = read
            .get_by_template(template_id)
            .await
            .expect("list")
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec![warm.id, main_first.id, main_second.id, later_round.id]);

        let main = read
            .get_by_phase(template_id, WorkoutPhase::Main)
            .await
            .expect("phase");
        assert_eq!(main.len(), 3);
    }

    #[tokio::test]
    async fn links_are_filtered_and_sorted_by_display_order() {
        let store = InMemoryStore::new();
        let source = ExerciseId::new();
        let second = ExerciseLink::new(source, ExerciseId::new(), ExerciseLinkType::Warmup, 2);
        let first = ExerciseLink::new(source, ExerciseId::new(), ExerciseLinkType::Warmup, 1);
        let retired =
            ExerciseLink::new(source, ExerciseId::new(), ExerciseLinkType::Warmup, 0).inactive();
        let cooldown = ExerciseLink::new(source, ExerciseId::new(), ExerciseLinkType::Cooldown, 1);
        for link in [&second, &first, &retired, &cooldown] {
            store.insert_link(link.clone()).await;
        }

        let links = store
            .links_by_source(source, ExerciseLinkType::Warmup)
            .await
            .expect("links");
        assert_eq!(links, vec![first, second]);
    }
}
