//! SQLite-backed placement storage plus the reference tables it reads.
//!
//! Read and write scopes both wrap a database transaction. A write scope is
//! committed explicitly; dropping either kind rolls the transaction back.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fitplan_domain::{
    Exercise, ExerciseId, ExerciseLink, ExerciseLinkId, ExerciseLinkType, ExerciseMetadata,
    PlacementGroup, PlacementId, RoundNumber, TemplateExercisePlacement, WorkoutPhase,
    WorkoutState, WorkoutTemplate, WorkoutTemplateId,
};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, Sqlite, SqlitePool, Transaction};
use uuid::Uuid;

use crate::infrastructure::ports::{
    ExerciseLinkRepo, ExerciseRepo, PlacementReadScope, PlacementStore, PlacementWriteScope,
    RepoError, WorkoutTemplateRepo,
};

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS workout_templates (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        state TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS exercises (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        is_active INTEGER NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS exercise_links (
        id TEXT PRIMARY KEY,
        source_exercise_id TEXT NOT NULL,
        target_exercise_id TEXT NOT NULL,
        link_type TEXT NOT NULL,
        display_order INTEGER NOT NULL,
        is_active INTEGER NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS workout_template_exercises (
        id TEXT PRIMARY KEY,
        template_id TEXT NOT NULL,
        exercise_id TEXT NOT NULL,
        phase TEXT NOT NULL,
        round_number INTEGER NOT NULL,
        order_in_round INTEGER NOT NULL,
        metadata TEXT NOT NULL,
        auto_linked INTEGER NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_wte_group ON workout_template_exercises (template_id, phase, round_number)",
    "CREATE INDEX IF NOT EXISTS idx_links_source ON exercise_links (source_exercise_id, link_type)",
];

const PLACEMENT_COLUMNS: &str = "id, template_id, exercise_id, phase, round_number, order_in_round, metadata, auto_linked, created_at, updated_at";

/// Matches the in-memory ordering: Warmup, Main, Cooldown, then round and order.
const PLACEMENT_ORDER: &str = "CASE phase WHEN 'Warmup' THEN 0 WHEN 'Main' THEN 1 ELSE 2 END, round_number, order_in_round, created_at, id";

/// SQLite implementation of every engine port.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub async fn connect(db_path: &str) -> Result<Self, RepoError> {
        let pool = SqlitePool::connect(&format!("sqlite:{}?mode=rwc", db_path))
            .await
            .map_err(|e| RepoError::database("connect", e))?;

        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&pool)
                .await
                .map_err(|e| RepoError::database("schema", e))?;
        }

        Ok(Self { pool })
    }

    pub async fn upsert_template(&self, template: &WorkoutTemplate) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            INSERT INTO workout_templates (id, name, state)
            VALUES (?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                state = excluded.state
            "#,
        )
        .bind(template.id.to_string())
        .bind(&template.name)
        .bind(template.state.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("upsert_template", e))?;
        Ok(())
    }

    pub async fn upsert_exercise(&self, exercise: &Exercise) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            INSERT INTO exercises (id, name, is_active)
            VALUES (?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                is_active = excluded.is_active
            "#,
        )
        .bind(exercise.id.to_string())
        .bind(&exercise.name)
        .bind(exercise.is_active)
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("upsert_exercise", e))?;
        Ok(())
    }

    pub async fn upsert_link(&self, link: &ExerciseLink) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            INSERT INTO exercise_links
                (id, source_exercise_id, target_exercise_id, link_type, display_order, is_active)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                source_exercise_id = excluded.source_exercise_id,
                target_exercise_id = excluded.target_exercise_id,
                link_type = excluded.link_type,
                display_order = excluded.display_order,
                is_active = excluded.is_active
            "#,
        )
        .bind(link.id.to_string())
        .bind(link.source_exercise_id.to_string())
        .bind(link.target_exercise_id.to_string())
        .bind(link.link_type.as_str())
        .bind(i64::from(link.display_order))
        .bind(link.is_active)
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("upsert_link", e))?;
        Ok(())
    }

    async fn begin(&self, operation: &'static str) -> Result<SqliteScope, RepoError> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepoError::database(operation, e))?;
        Ok(SqliteScope { tx })
    }
}

#[async_trait]
impl WorkoutTemplateRepo for SqliteStore {
    async fn get(&self, id: WorkoutTemplateId) -> Result<Option<WorkoutTemplate>, RepoError> {
        let row = sqlx::query("SELECT id, name, state FROM workout_templates WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("get_template", e))?;

        row.map(|row| -> Result<WorkoutTemplate, RepoError> {
            let state: String = column(&row, "state")?;
            Ok(WorkoutTemplate {
                id: WorkoutTemplateId::from_uuid(uuid_column(&row, "id")?),
                name: column(&row, "name")?,
                state: WorkoutState::from_str(&state).map_err(RepoError::serialization)?,
            })
        })
        .transpose()
    }
}

#[async_trait]
impl ExerciseRepo for SqliteStore {
    async fn get(&self, id: ExerciseId) -> Result<Option<Exercise>, RepoError> {
        let row = sqlx::query("SELECT id, name, is_active FROM exercises WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("get_exercise", e))?;

        row.map(|row| -> Result<Exercise, RepoError> {
            Ok(Exercise {
                id: ExerciseId::from_uuid(uuid_column(&row, "id")?),
                name: column(&row, "name")?,
                is_active: column(&row, "is_active")?,
            })
        })
        .transpose()
    }
}

#[async_trait]
impl ExerciseLinkRepo for SqliteStore {
    async fn links_by_source(
        &self,
        exercise_id: ExerciseId,
        link_type: ExerciseLinkType,
    ) -> Result<Vec<ExerciseLink>, RepoError> {
        let rows = sqlx::query(
            r#"
            SELECT id, source_exercise_id, target_exercise_id, link_type, display_order, is_active
            FROM exercise_links
            WHERE source_exercise_id = ? AND link_type = ? AND is_active = 1
            ORDER BY display_order ASC
            "#,
        )
        .bind(exercise_id.to_string())
        .bind(link_type.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::database("links_by_source", e))?;

        rows.iter().map(row_to_link).collect()
    }
}

#[async_trait]
impl PlacementStore for SqliteStore {
    async fn read_only(&self) -> Result<Box<dyn PlacementReadScope>, RepoError> {
        Ok(Box::new(self.begin("read_only").await?))
    }

    async fn writable(&self) -> Result<Box<dyn PlacementWriteScope>, RepoError> {
        Ok(Box::new(self.begin("writable").await?))
    }
}

/// One transaction; serves as both read and write scope.
struct SqliteScope {
    tx: Transaction<'static, Sqlite>,
}

#[async_trait]
impl PlacementReadScope for SqliteScope {
    async fn get_by_template(
        &mut self,
        template_id: WorkoutTemplateId,
    ) -> Result<Vec<TemplateExercisePlacement>, RepoError> {
        let sql = format!(
            "SELECT {PLACEMENT_COLUMNS} FROM workout_template_exercises WHERE template_id = ? ORDER BY {PLACEMENT_ORDER}"
        );
        let rows = sqlx::query(&sql)
            .bind(template_id.to_string())
            .fetch_all(&mut *self.tx)
            .await
            .map_err(|e| RepoError::database("get_by_template", e))?;
        rows.iter().map(row_to_placement).collect()
    }

    async fn get_by_phase(
        &mut self,
        template_id: WorkoutTemplateId,
        phase: WorkoutPhase,
    ) -> Result<Vec<TemplateExercisePlacement>, RepoError> {
        let sql = format!(
            "SELECT {PLACEMENT_COLUMNS} FROM workout_template_exercises WHERE template_id = ? AND phase = ? ORDER BY {PLACEMENT_ORDER}"
        );
        let rows = sqlx::query(&sql)
            .bind(template_id.to_string())
            .bind(phase.as_str())
            .fetch_all(&mut *self.tx)
            .await
            .map_err(|e| RepoError::database("get_by_phase", e))?;
        rows.iter().map(row_to_placement).collect()
    }

    async fn get_by_round(
        &mut self,
        group: PlacementGroup,
    ) -> Result<Vec<TemplateExercisePlacement>, RepoError> {
        let sql = format!(
            "SELECT {PLACEMENT_COLUMNS} FROM workout_template_exercises WHERE template_id = ? AND phase = ? AND round_number = ? ORDER BY {PLACEMENT_ORDER}"
        );
        let rows = sqlx::query(&sql)
            .bind(group.template_id.to_string())
            .bind(group.phase.as_str())
            .bind(i64::from(group.round_number.value()))
            .fetch_all(&mut *self.tx)
            .await
            .map_err(|e| RepoError::database("get_by_round", e))?;
        rows.iter().map(row_to_placement).collect()
    }

    async fn get_max_order_in_round(
        &mut self,
        group: PlacementGroup,
    ) -> Result<Option<u32>, RepoError> {
        let max: Option<i64> = sqlx::query_scalar(
            "SELECT MAX(order_in_round) FROM workout_template_exercises WHERE template_id = ? AND phase = ? AND round_number = ?",
        )
        .bind(group.template_id.to_string())
        .bind(group.phase.as_str())
        .bind(i64::from(group.round_number.value()))
        .fetch_one(&mut *self.tx)
        .await
        .map_err(|e| RepoError::database("get_max_order_in_round", e))?;

        max.map(|order| to_u32(order, "order_in_round")).transpose()
    }

    async fn get_by_id(
        &mut self,
        id: PlacementId,
    ) -> Result<Option<TemplateExercisePlacement>, RepoError> {
        let sql = format!("SELECT {PLACEMENT_COLUMNS} FROM workout_template_exercises WHERE id = ?");
        let row = sqlx::query(&sql)
            .bind(id.to_string())
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(|e| RepoError::database("get_by_id", e))?;
        row.as_ref().map(row_to_placement).transpose()
    }
}

#[async_trait]
impl PlacementWriteScope for SqliteScope {
    async fn add(&mut self, placement: &TemplateExercisePlacement) -> Result<(), RepoError> {
        let sql = format!(
            "INSERT INTO workout_template_exercises ({PLACEMENT_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
        );
        sqlx::query(&sql)
            .bind(placement.id.to_string())
            .bind(placement.template_id.to_string())
            .bind(placement.exercise_id.to_string())
            .bind(placement.phase.as_str())
            .bind(i64::from(placement.round_number.value()))
            .bind(i64::from(placement.order_in_round))
            .bind(placement.metadata.as_str())
            .bind(placement.auto_linked)
            .bind(placement.created_at)
            .bind(placement.updated_at)
            .execute(&mut *self.tx)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(db) if db.is_unique_violation() => {
                    RepoError::constraint(format!("Placement {} already exists", placement.id))
                }
                other => RepoError::database("add", other),
            })?;
        Ok(())
    }

    async fn update(&mut self, placement: &TemplateExercisePlacement) -> Result<(), RepoError> {
        let result = sqlx::query(
            r#"
            UPDATE workout_template_exercises SET
                exercise_id = ?,
                phase = ?,
                round_number = ?,
                order_in_round = ?,
                metadata = ?,
                auto_linked = ?,
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(placement.exercise_id.to_string())
        .bind(placement.phase.as_str())
        .bind(i64::from(placement.round_number.value()))
        .bind(i64::from(placement.order_in_round))
        .bind(placement.metadata.as_str())
        .bind(placement.auto_linked)
        .bind(placement.updated_at)
        .bind(placement.id.to_string())
        .execute(&mut *self.tx)
        .await
        .map_err(|e| RepoError::database("update", e))?;

        if result.rows_affected() == 0 {
            return Err(RepoError::not_found("Placement", placement.id));
        }
        Ok(())
    }

    async fn delete_batch(&mut self, ids: &[PlacementId]) -> Result<(), RepoError> {
        for id in ids {
            let result = sqlx::query("DELETE FROM workout_template_exercises WHERE id = ?")
                .bind(id.to_string())
                .execute(&mut *self.tx)
                .await
                .map_err(|e| RepoError::database("delete_batch", e))?;
            if result.rows_affected() == 0 {
                return Err(RepoError::not_found("Placement", id));
            }
        }
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), RepoError> {
        self.tx
            .commit()
            .await
            .map_err(|e| RepoError::database("commit", e))
    }
}

// =============================================================================
// Row mapping
// =============================================================================

fn column<'r, T>(row: &'r SqliteRow, name: &str) -> Result<T, RepoError>
where
    T: sqlx::Decode<'r, Sqlite> + sqlx::Type<Sqlite>,
{
    row.try_get(name)
        .map_err(|e| RepoError::serialization(format!("column {name}: {e}")))
}

fn uuid_column(row: &SqliteRow, name: &str) -> Result<Uuid, RepoError> {
    let raw: String = column(row, name)?;
    Uuid::parse_str(&raw).map_err(|e| RepoError::serialization(format!("column {name}: {e}")))
}

fn to_u32(value: i64, name: &str) -> Result<u32, RepoError> {
    u32::try_from(value)
        .map_err(|_| RepoError::serialization(format!("column {name} out of range: {value}")))
}

fn row_to_link(row: &SqliteRow) -> Result<ExerciseLink, RepoError> {
    let link_type: String = column(row, "link_type")?;
    Ok(ExerciseLink {
        id: ExerciseLinkId::from_uuid(uuid_column(row, "id")?),
        source_exercise_id: ExerciseId::from_uuid(uuid_column(row, "source_exercise_id")?),
        target_exercise_id: ExerciseId::from_uuid(uuid_column(row, "target_exercise_id")?),
        link_type: ExerciseLinkType::from_str(&link_type).map_err(RepoError::serialization)?,
        display_order: to_u32(column(row, "display_order")?, "display_order")?,
        is_active: column(row, "is_active")?,
    })
}

fn row_to_placement(row: &SqliteRow) -> Result<TemplateExercisePlacement, RepoError> {
    let phase: String = column(row, "phase")?;
    let metadata: String = column(row, "metadata")?;
    let round: i64 = column(row, "round_number")?;
    let created_at: DateTime<Utc> = column(row, "created_at")?;
    let updated_at: DateTime<Utc> = column(row, "updated_at")?;

    Ok(TemplateExercisePlacement {
        id: PlacementId::from_uuid(uuid_column(row, "id")?),
        template_id: WorkoutTemplateId::from_uuid(uuid_column(row, "template_id")?),
        exercise_id: ExerciseId::from_uuid(uuid_column(row, "exercise_id")?),
        phase: WorkoutPhase::from_str(&phase).map_err(RepoError::serialization)?,
        round_number: RoundNumber::new(to_u32(round, "round_number")?)
            .map_err(RepoError::serialization)?,
        order_in_round: to_u32(column(row, "order_in_round")?, "order_in_round")?,
        metadata: ExerciseMetadata::parse(metadata).map_err(RepoError::serialization)?,
        auto_linked: column(row, "auto_linked")?,
        created_at,
        updated_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use tempfile::TempDir;

    async fn store() -> (SqliteStore, TempDir) {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("fitplan.db");
        let store = SqliteStore::connect(&path.to_string_lossy())
            .await
            .expect("connect");
        (store, dir)
    }

    fn placement(group: PlacementGroup, order: u32, metadata: &str) -> TemplateExercisePlacement {
        TemplateExercisePlacement::new(
            group,
            ExerciseId::new(),
            order,
            ExerciseMetadata::parse(metadata).expect("metadata"),
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn reference_data_round_trips() {
        let (store, _dir) = store().await;
        let template = WorkoutTemplate::new("Leg day", WorkoutState::Production);
        let exercise = Exercise::new("Squat").inactive();
        store.upsert_template(&template).await.expect("template");
        store.upsert_exercise(&exercise).await.expect("exercise");

        let loaded = WorkoutTemplateRepo::get(&store, template.id)
            .await
            .expect("get template");
        assert_eq!(loaded, Some(template));

        let loaded = ExerciseRepo::get(&store, exercise.id)
            .await
            .expect("get exercise");
        assert_eq!(loaded, Some(exercise));

        let missing = ExerciseRepo::get(&store, ExerciseId::new())
            .await
            .expect("get missing");
        assert_eq!(missing, None);
    }

    #[tokio::test]
    async fn links_by_source_skips_inactive_and_sorts() {
        let (store, _dir) = store().await;
        let source = ExerciseId::new();
        let late = ExerciseLink::new(source, ExerciseId::new(), ExerciseLinkType::Cooldown, 5);
        let early = ExerciseLink::new(source, ExerciseId::new(), ExerciseLinkType::Cooldown, 1);
        let retired =
            ExerciseLink::new(source, ExerciseId::new(), ExerciseLinkType::Cooldown, 2).inactive();
        for link in [&late, &early, &retired] {
            store.upsert_link(link).await.expect("link");
        }

        let links = store
            .links_by_source(source, ExerciseLinkType::Cooldown)
            .await
            .expect("links");
        assert_eq!(links, vec![early, late]);

        let warmups = store
            .links_by_source(source, ExerciseLinkType::Warmup)
            .await
            .expect("links");
        assert!(warmups.is_empty());
    }

    #[tokio::test]
    async fn committed_placements_are_readable_in_order() {
        let (store, _dir) = store().await;
        let template_id = WorkoutTemplateId::new();
        let main = PlacementGroup::new(template_id, WorkoutPhase::Main, RoundNumber::FIRST);
        let cooldown = PlacementGroup::new(template_id, WorkoutPhase::Cooldown, RoundNumber::FIRST);
        let second = placement(main, 2, r#"{"reps":5}"#);
        let first = placement(main, 1, r#"{"reps":10}"#);
        let cool = placement(cooldown, 1, "{}");

        let mut scope = store.writable().await.expect("writable");
        for p in [&cool, &second, &first] {
            scope.add(p).await.expect("add");
        }
        scope.commit().await.expect("commit");

        let mut read = store.read_only().await.expect("read");
        let all = read.get_by_template(template_id).await.expect("list");
        let ids: Vec<_> = all.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![first.id, second.id, cool.id]);
        assert_eq!(
            read.get_max_order_in_round(main).await.expect("max"),
            Some(2)
        );
        let empty = PlacementGroup::new(template_id, WorkoutPhase::Warmup, RoundNumber::FIRST);
        assert_eq!(read.get_max_order_in_round(empty).await.expect("max"), None);
        assert_eq!(
            read.get_by_id(first.id).await.expect("get").map(|p| p.metadata),
            Some(first.metadata.clone())
        );
    }

    #[tokio::test]
    async fn uncommitted_scope_rolls_back() {
        let (store, _dir) = store().await;
        let group = PlacementGroup::new(WorkoutTemplateId::new(), WorkoutPhase::Main, RoundNumber::FIRST);
        let p = placement(group, 1, "{}");

        {
            let mut scope = store.writable().await.expect("writable");
            scope.add(&p).await.expect("add");
        }

        let mut read = store.read_only().await.expect("read");
        assert_eq!(read.get_by_id(p.id).await.expect("get"), None);
    }

    #[tokio::test]
    async fn update_and_delete_batch_apply_inside_transaction() {
        let (store, _dir) = store().await;
        let group = PlacementGroup::new(WorkoutTemplateId::new(), WorkoutPhase::Main, RoundNumber::FIRST);
        let mut keep = placement(group, 1, "{}");
        let drop_a = placement(group, 2, "{}");
        let drop_b = placement(group, 3, "{}");

        let mut scope = store.writable().await.expect("writable");
        for p in [&keep, &drop_a, &drop_b] {
            scope.add(p).await.expect("add");
        }
        scope.commit().await.expect("commit");

        let mut scope = store.writable().await.expect("writable");
        keep.set_order(1, keep.updated_at + Duration::seconds(5));
        keep.set_metadata(ExerciseMetadata::parse(r#"{"sets":3}"#).expect("metadata"), keep.updated_at);
        scope.update(&keep).await.expect("update");
        scope
            .delete_batch(&[drop_a.id, drop_b.id])
            .await
            .expect("delete");
        scope.commit().await.expect("commit");

        let mut read = store.read_only().await.expect("read");
        let remaining = read.get_by_round(group).await.expect("round");
        assert_eq!(remaining, vec![keep]);
    }

    #[tokio::test]
    async fn delete_batch_with_unknown_id_fails() {
        let (store, _dir) = store().await;
        let mut scope = store.writable().await.expect("writable");
        let err = scope
            .delete_batch(&[PlacementId::new()])
            .await
            .expect_err("must fail");
        assert!(err.is_not_found());
    }
}
