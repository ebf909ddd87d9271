use std::collections::HashMap;

use chrono::Utc;

use crate::error::AppError;
use crate::types::{
    AuthUser, LogStatus, NewExerciseLog, SetLog, Workout, WorkoutExercise, WorkoutLog,
};

/// Backend operations the session flow needs. `SupabaseClient` implements
/// this for the app; tests plug in an in-memory double.
// Single-threaded wasm target, so no Send bound on the returned futures.
#[allow(async_fn_in_trait)]
pub trait WorkoutBackend {
    fn current_user(&self) -> Option<AuthUser>;
    async fn fetch_workout(&self, workout_id: &str) -> Result<Workout, AppError>;
    async fn fetch_workout_exercises(
        &self,
        workout_id: &str,
    ) -> Result<Vec<WorkoutExercise>, AppError>;
    async fn create_workout_log(
        &self,
        athlete_id: &str,
        workout_id: &str,
    ) -> Result<WorkoutLog, AppError>;
    async fn insert_exercise_log(&self, row: &NewExerciseLog) -> Result<(), AppError>;
    async fn complete_workout_log(&self, log_id: &str) -> Result<(), AppError>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

/// An in-memory edit to a not-yet-completed set.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SetChange {
    Reps(u32),
    Weight(f64),
}

/// Drives one guided workout session: ordered exercises, per-set logs keyed
/// by workout-exercise id, a current-exercise pointer, and the
/// not-started → in-progress → completed lifecycle. Persists progress through
/// the injected backend as sets and the workout complete.
#[derive(Clone, Debug)]
pub struct SessionFlow<B> {
    backend: B,
    workout: Workout,
    exercises: Vec<WorkoutExercise>,
    set_logs: HashMap<String, Vec<SetLog>>,
    current: usize,
    log: Option<WorkoutLog>,
    status: LogStatus,
}

impl<B: WorkoutBackend> SessionFlow<B> {
    /// Loads the workout and seeds one editable log per prescribed set.
    /// Read-only against the backend, so retrying is always safe.
    pub async fn load(backend: B, workout_id: &str) -> Result<Self, AppError> {
        let workout = backend.fetch_workout(workout_id).await?;
        let mut exercises = backend.fetch_workout_exercises(workout_id).await?;
        // Equal positions fall back to id order so every load agrees.
        exercises.sort_by(|a, b| {
            a.exercise_order
                .cmp(&b.exercise_order)
                .then_with(|| a.id.cmp(&b.id))
        });

        let set_logs = exercises
            .iter()
            .map(|ex| {
                let logs = (1..=ex.sets)
                    .map(|n| SetLog {
                        set_number: n,
                        reps: ex.reps,
                        weight: ex.weight.unwrap_or(0.0),
                        completed: false,
                    })
                    .collect();
                (ex.id.clone(), logs)
            })
            .collect();

        Ok(Self {
            backend,
            workout,
            exercises,
            set_logs,
            current: 0,
            log: None,
            status: LogStatus::NotStarted,
        })
    }

    pub fn workout(&self) -> &Workout {
        &self.workout
    }

    pub fn exercises(&self) -> &[WorkoutExercise] {
        &self.exercises
    }

    pub fn status(&self) -> LogStatus {
        self.status
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_exercise(&self) -> Option<&WorkoutExercise> {
        self.exercises.get(self.current)
    }

    pub fn sets_for(&self, exercise_id: &str) -> &[SetLog] {
        self.set_logs
            .get(exercise_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Creates the persisted workout log and moves to in-progress. Guarded so
    /// a second call cannot create a second log row.
    pub async fn start(&mut self) -> Result<(), AppError> {
        if self.status != LogStatus::NotStarted {
            return Err(AppError::InvalidState("passet är redan startat"));
        }
        let user = self.backend.current_user().ok_or(AppError::Unauthenticated)?;

        let log = self
            .backend
            .create_workout_log(&user.id, &self.workout.id)
            .await?;
        self.log = Some(log);
        self.status = LogStatus::InProgress;
        Ok(())
    }

    /// Edits reps or weight for a set that is not yet completed. Completed
    /// sets are frozen, so edits against them (or unknown addresses) are
    /// silent no-ops. Never touches the backend.
    pub fn update_set(&mut self, exercise_id: &str, set_index: usize, change: SetChange) {
        let Some(set) = self
            .set_logs
            .get_mut(exercise_id)
            .and_then(|sets| sets.get_mut(set_index))
        else {
            return;
        };
        if set.completed {
            return;
        }
        match change {
            SetChange::Reps(reps) => set.reps = reps,
            SetChange::Weight(weight) => set.weight = weight.max(0.0),
        }
    }

    /// Persists one exercise-log row, then marks the set completed. The local
    /// flag only flips after the insert succeeds, so a failed write leaves
    /// the set retryable. A set already marked completed is left alone
    /// without a second insert.
    pub async fn complete_set(
        &mut self,
        exercise_id: &str,
        set_index: usize,
    ) -> Result<(), AppError> {
        if self.status != LogStatus::InProgress {
            return Err(AppError::InvalidState("passet är inte igång"));
        }
        let log_id = self
            .log
            .as_ref()
            .map(|l| l.id.clone())
            .ok_or(AppError::InvalidState("passet är inte igång"))?;

        let Some(set) = self
            .set_logs
            .get(exercise_id)
            .and_then(|sets| sets.get(set_index))
        else {
            return Err(AppError::not_found("setet"));
        };
        if set.completed {
            return Ok(());
        }

        let row = NewExerciseLog {
            workout_log_id: log_id,
            workout_exercise_id: exercise_id.to_string(),
            set_number: set.set_number,
            reps: set.reps,
            weight: set.weight,
        };
        self.backend.insert_exercise_log(&row).await?;

        if let Some(set) = self
            .set_logs
            .get_mut(exercise_id)
            .and_then(|sets| sets.get_mut(set_index))
        {
            set.completed = true;
        }
        Ok(())
    }

    /// Moves the current-exercise pointer one step, clamped to the list.
    pub fn advance(&mut self, direction: Direction) {
        match direction {
            Direction::Previous => {
                self.current = self.current.saturating_sub(1);
            }
            Direction::Next => {
                if self.current + 1 < self.exercises.len() {
                    self.current += 1;
                }
            }
        }
    }

    /// Marks the persisted log completed and closes the session. Calling
    /// again once completed is an error, not a second update.
    pub async fn complete_workout(&mut self) -> Result<(), AppError> {
        if self.status != LogStatus::InProgress {
            return Err(AppError::InvalidState("passet är inte igång"));
        }
        let log_id = self
            .log
            .as_ref()
            .map(|l| l.id.clone())
            .ok_or(AppError::InvalidState("passet är inte igång"))?;

        self.backend.complete_workout_log(&log_id).await?;

        if let Some(log) = self.log.as_mut() {
            log.status = LogStatus::Completed;
            log.completed_at = Some(Utc::now());
        }
        self.status = LogStatus::Completed;
        Ok(())
    }

    pub fn completed_sets(&self, exercise_id: &str) -> usize {
        self.sets_for(exercise_id)
            .iter()
            .filter(|s| s.completed)
            .count()
    }

    pub fn exercise_done(&self, exercise_id: &str) -> bool {
        let sets = self.sets_for(exercise_id);
        !sets.is_empty() && sets.iter().all(|s| s.completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    #[derive(Default)]
    struct MockState {
        user: Option<AuthUser>,
        workout: Option<Workout>,
        exercises: Vec<WorkoutExercise>,
        fail_set_insert: Cell<bool>,
        inserted_sets: RefCell<Vec<NewExerciseLog>>,
        created_logs: Cell<u32>,
        completed_logs: Cell<u32>,
    }

    #[derive(Clone, Default)]
    struct MockBackend(Rc<MockState>);

    impl std::fmt::Debug for MockBackend {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("MockBackend")
        }
    }

    impl WorkoutBackend for MockBackend {
        fn current_user(&self) -> Option<AuthUser> {
            self.0.user.clone()
        }

        async fn fetch_workout(&self, workout_id: &str) -> Result<Workout, AppError> {
            self.0
                .workout
                .clone()
                .filter(|w| w.id == workout_id)
                .ok_or_else(|| AppError::not_found("passet"))
        }

        async fn fetch_workout_exercises(
            &self,
            _workout_id: &str,
        ) -> Result<Vec<WorkoutExercise>, AppError> {
            Ok(self.0.exercises.clone())
        }

        async fn create_workout_log(
            &self,
            athlete_id: &str,
            workout_id: &str,
        ) -> Result<WorkoutLog, AppError> {
            self.0.created_logs.set(self.0.created_logs.get() + 1);
            Ok(WorkoutLog {
                id: "log1".into(),
                athlete_id: athlete_id.into(),
                workout_id: workout_id.into(),
                started_at: Utc::now(),
                completed_at: None,
                status: LogStatus::InProgress,
            })
        }

        async fn insert_exercise_log(&self, row: &NewExerciseLog) -> Result<(), AppError> {
            if self.0.fail_set_insert.get() {
                return Err(AppError::backend("nätverksfel"));
            }
            self.0.inserted_sets.borrow_mut().push(row.clone());
            Ok(())
        }

        async fn complete_workout_log(&self, _log_id: &str) -> Result<(), AppError> {
            self.0.completed_logs.set(self.0.completed_logs.get() + 1);
            Ok(())
        }
    }

    fn prescription(id: &str, order: i32, sets: u32, reps: u32, weight: Option<f64>) -> WorkoutExercise {
        WorkoutExercise {
            id: id.into(),
            workout_id: "w1".into(),
            exercise_id: format!("ex-{id}"),
            sets,
            reps,
            weight,
            rest_time: 90,
            exercise_order: order,
            exercise_name: format!("Övning {id}"),
            exercise_description: None,
        }
    }

    fn backend_with(exercises: Vec<WorkoutExercise>) -> MockBackend {
        MockBackend(Rc::new(MockState {
            user: Some(AuthUser {
                id: "athlete1".into(),
                email: "a@example.com".into(),
            }),
            workout: Some(Workout {
                id: "w1".into(),
                program_id: "p1".into(),
                name: "Dag 1".into(),
                day: 1,
            }),
            exercises,
            ..Default::default()
        }))
    }

    fn loaded(exercises: Vec<WorkoutExercise>) -> (SessionFlow<MockBackend>, MockBackend) {
        let backend = backend_with(exercises);
        let flow = block_on(SessionFlow::load(backend.clone(), "w1")).unwrap();
        (flow, backend)
    }

    fn started(exercises: Vec<WorkoutExercise>) -> (SessionFlow<MockBackend>, MockBackend) {
        let (mut flow, backend) = loaded(exercises);
        block_on(flow.start()).unwrap();
        (flow, backend)
    }

    #[test]
    fn load_seeds_dense_set_numbers_from_prescription() {
        let (flow, _) = loaded(vec![prescription("a", 1, 4, 8, Some(60.0))]);

        let sets = flow.sets_for("a");
        assert_eq!(sets.len(), 4);
        for (i, set) in sets.iter().enumerate() {
            assert_eq!(set.set_number, i as u32 + 1);
            assert_eq!(set.reps, 8);
            assert_eq!(set.weight, 60.0);
            assert!(!set.completed);
        }
        assert_eq!(flow.status(), LogStatus::NotStarted);
    }

    #[test]
    fn load_without_prescribed_weight_seeds_zero() {
        let (flow, _) = loaded(vec![prescription("a", 1, 2, 12, None)]);
        assert_eq!(flow.sets_for("a")[0].weight, 0.0);
    }

    #[test]
    fn load_orders_by_position_with_id_tiebreak() {
        let (flow, _) = loaded(vec![
            prescription("b", 2, 3, 5, None),
            prescription("c", 1, 3, 5, None),
            prescription("a", 2, 3, 5, None),
        ]);
        let order: Vec<&str> = flow.exercises().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(order, ["c", "a", "b"]);
    }

    #[test]
    fn load_unknown_workout_is_not_found() {
        let backend = backend_with(vec![]);
        let err = block_on(SessionFlow::load(backend, "nope")).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn start_creates_one_log_and_rejects_second_call() {
        let (mut flow, backend) = loaded(vec![prescription("a", 1, 3, 5, None)]);

        block_on(flow.start()).unwrap();
        assert_eq!(flow.status(), LogStatus::InProgress);
        assert_eq!(backend.0.created_logs.get(), 1);

        let err = block_on(flow.start()).unwrap_err();
        assert!(matches!(err, AppError::InvalidState(_)));
        assert_eq!(backend.0.created_logs.get(), 1);
    }

    #[test]
    fn start_without_user_is_unauthenticated() {
        let signed_in = backend_with(vec![prescription("a", 1, 3, 5, None)]);
        let anon = MockBackend(Rc::new(MockState {
            workout: signed_in.0.workout.clone(),
            exercises: signed_in.0.exercises.clone(),
            ..Default::default()
        }));
        let mut flow = block_on(SessionFlow::load(anon, "w1")).unwrap();

        assert_eq!(block_on(flow.start()).unwrap_err(), AppError::Unauthenticated);
        assert_eq!(flow.status(), LogStatus::NotStarted);
    }

    #[test]
    fn update_set_edits_pending_sets() {
        let (mut flow, _) = loaded(vec![prescription("a", 1, 3, 8, Some(40.0))]);

        flow.update_set("a", 1, SetChange::Reps(6));
        flow.update_set("a", 1, SetChange::Weight(42.5));

        let set = &flow.sets_for("a")[1];
        assert_eq!((set.reps, set.weight), (6, 42.5));
    }

    #[test]
    fn update_set_on_completed_set_is_a_noop() {
        let (mut flow, _) = started(vec![prescription("a", 1, 3, 8, Some(40.0))]);
        block_on(flow.complete_set("a", 0)).unwrap();

        let before = flow.sets_for("a").to_vec();
        flow.update_set("a", 0, SetChange::Reps(1));
        flow.update_set("a", 0, SetChange::Weight(999.0));
        assert_eq!(flow.sets_for("a"), before.as_slice());
    }

    #[test]
    fn update_set_with_unknown_address_is_a_noop() {
        let (mut flow, _) = loaded(vec![prescription("a", 1, 3, 8, None)]);
        let before = flow.sets_for("a").to_vec();
        flow.update_set("missing", 0, SetChange::Reps(1));
        flow.update_set("a", 99, SetChange::Reps(1));
        assert_eq!(flow.sets_for("a"), before.as_slice());
    }

    #[test]
    fn complete_set_persists_current_values_then_flips_flag() {
        let (mut flow, backend) = started(vec![prescription("a", 1, 3, 8, Some(40.0))]);
        flow.update_set("a", 0, SetChange::Reps(7));

        block_on(flow.complete_set("a", 0)).unwrap();

        assert!(flow.sets_for("a")[0].completed);
        let rows = backend.0.inserted_sets.borrow();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].workout_log_id, "log1");
        assert_eq!(rows[0].workout_exercise_id, "a");
        assert_eq!(rows[0].set_number, 1);
        assert_eq!(rows[0].reps, 7);
        assert_eq!(rows[0].weight, 40.0);
    }

    #[test]
    fn complete_set_failure_leaves_flag_unset() {
        let (mut flow, backend) = started(vec![prescription("a", 1, 3, 8, Some(40.0))]);
        backend.0.fail_set_insert.set(true);

        let err = block_on(flow.complete_set("a", 0)).unwrap_err();
        assert!(matches!(err, AppError::Backend(_)));
        assert!(!flow.sets_for("a")[0].completed);

        // The caller may retry once the backend recovers.
        backend.0.fail_set_insert.set(false);
        block_on(flow.complete_set("a", 0)).unwrap();
        assert!(flow.sets_for("a")[0].completed);
        assert_eq!(backend.0.inserted_sets.borrow().len(), 1);
    }

    #[test]
    fn complete_set_before_start_is_invalid_state() {
        let (mut flow, backend) = loaded(vec![prescription("a", 1, 3, 8, None)]);
        let err = block_on(flow.complete_set("a", 0)).unwrap_err();
        assert!(matches!(err, AppError::InvalidState(_)));
        assert!(backend.0.inserted_sets.borrow().is_empty());
    }

    #[test]
    fn completing_a_completed_set_inserts_nothing_new() {
        let (mut flow, backend) = started(vec![prescription("a", 1, 2, 8, None)]);
        block_on(flow.complete_set("a", 0)).unwrap();
        block_on(flow.complete_set("a", 0)).unwrap();
        assert_eq!(backend.0.inserted_sets.borrow().len(), 1);
    }

    #[test]
    fn advance_clamps_at_both_ends() {
        let (mut flow, _) = loaded(vec![
            prescription("a", 1, 3, 5, None),
            prescription("b", 2, 3, 5, None),
            prescription("c", 3, 3, 5, None),
        ]);

        flow.advance(Direction::Previous);
        assert_eq!(flow.current_index(), 0);

        flow.advance(Direction::Next);
        flow.advance(Direction::Next);
        assert_eq!(flow.current_index(), 2);
        flow.advance(Direction::Next);
        assert_eq!(flow.current_index(), 2);

        flow.advance(Direction::Previous);
        assert_eq!(flow.current_index(), 1);
    }

    #[test]
    fn complete_workout_closes_session_once() {
        let (mut flow, backend) = started(vec![prescription("a", 1, 1, 5, None)]);

        block_on(flow.complete_workout()).unwrap();
        assert_eq!(flow.status(), LogStatus::Completed);
        assert_eq!(backend.0.completed_logs.get(), 1);

        let err = block_on(flow.complete_workout()).unwrap_err();
        assert!(matches!(err, AppError::InvalidState(_)));
        assert_eq!(backend.0.completed_logs.get(), 1);
    }

    #[test]
    fn complete_workout_before_start_is_invalid_state() {
        let (mut flow, backend) = loaded(vec![prescription("a", 1, 1, 5, None)]);
        let err = block_on(flow.complete_workout()).unwrap_err();
        assert!(matches!(err, AppError::InvalidState(_)));
        assert_eq!(backend.0.completed_logs.get(), 0);
    }

    #[test]
    fn exercise_done_tracks_all_sets() {
        let (mut flow, _) = started(vec![prescription("a", 1, 2, 8, None)]);
        assert!(!flow.exercise_done("a"));
        block_on(flow.complete_set("a", 0)).unwrap();
        assert_eq!(flow.completed_sets("a"), 1);
        assert!(!flow.exercise_done("a"));
        block_on(flow.complete_set("a", 1)).unwrap();
        assert!(flow.exercise_done("a"));
    }
}
