use chrono::{SecondsFormat, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, RequestMode, Response};

use crate::error::AppError;
use crate::types::{
    AthleteStats, AuthSession, AuthUser, CalendarEvent, CoachAthlete, CoachInvitation, Exercise,
    LogStatus, Message, NewExerciseLog, Profile, Program, ProgramStatus, UserRole, Workout,
    WorkoutExercise, WorkoutLog,
};

const SUPABASE_URL: &str = "https://qwkzfxbecpcvvqoahzwd.supabase.co";
const SUPABASE_KEY: &str = "sb_publishable_Jk3nWqTf0yPzRvXb9cLm4A_Hu8sEiGt";
const AUTH_SESSION_KEY: &str = "ironcoach_auth_session";

/// Handle to the hosted backend. Constructed once in the app shell and passed
/// down explicitly (Leptos context / by value into the session flow).
#[derive(Clone, Debug, PartialEq)]
pub struct SupabaseClient {
    url: String,
    key: String,
}

impl Default for SupabaseClient {
    fn default() -> Self {
        Self::new(SUPABASE_URL, SUPABASE_KEY)
    }
}

// ============ AUTH ============

#[derive(Deserialize, Debug)]
struct SupabaseAuthResponse {
    access_token: String,
    user: SupabaseUser,
}

#[derive(Deserialize, Debug)]
struct SupabaseUser {
    id: String,
    email: String,
}

#[derive(Deserialize, Debug)]
struct SupabaseError {
    error: Option<String>,
    error_description: Option<String>,
    msg: Option<String>,
}

impl SupabaseClient {
    pub fn new(url: &str, key: &str) -> Self {
        Self {
            url: url.to_string(),
            key: key.to_string(),
        }
    }

    async fn auth_request(&self, path: &str, body: String) -> Result<AuthSession, AppError> {
        let window = web_sys::window().ok_or_else(|| AppError::backend("no window"))?;

        let headers = Headers::new().map_err(js_err)?;
        headers.set("apikey", &self.key).map_err(js_err)?;
        headers
            .set("Content-Type", "application/json")
            .map_err(js_err)?;

        let opts = RequestInit::new();
        opts.set_method("POST");
        opts.set_mode(RequestMode::Cors);
        opts.set_body(&JsValue::from_str(&body));
        opts.set_headers(&JsValue::from(&headers));

        let url = format!("{}{}", self.url, path);
        let request = Request::new_with_str_and_init(&url, &opts).map_err(js_err)?;

        let resp_value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(js_err)?;
        let resp: Response = resp_value.dyn_into().map_err(js_err)?;

        let json = JsFuture::from(resp.json().map_err(js_err)?)
            .await
            .map_err(js_err)?;

        if !resp.ok() {
            let err: SupabaseError = serde_wasm_bindgen::from_value(json).unwrap_or(SupabaseError {
                error: None,
                error_description: None,
                msg: None,
            });
            let msg = err
                .error_description
                .or(err.msg)
                .or(err.error)
                .unwrap_or_else(|| "inloggningen misslyckades".into());
            return Err(AppError::backend(msg));
        }

        let auth: SupabaseAuthResponse =
            serde_wasm_bindgen::from_value(json).map_err(|_| AppError::backend("ogiltigt svar"))?;

        let session = AuthSession {
            access_token: auth.access_token,
            user: AuthUser {
                id: auth.user.id,
                email: auth.user.email,
            },
        };
        save_auth_session(&session);
        Ok(session)
    }

    pub async fn sign_up(&self, email: &str, password: &str) -> Result<AuthSession, AppError> {
        let body = serde_json::json!({ "email": email, "password": password }).to_string();
        self.auth_request("/auth/v1/signup", body).await
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, AppError> {
        let body = serde_json::json!({ "email": email, "password": password }).to_string();
        self.auth_request("/auth/v1/token?grant_type=password", body)
            .await
    }

    pub fn sign_out(&self) {
        if let Some(storage) = local_storage() {
            let _ = storage.remove_item(AUTH_SESSION_KEY);
        }
    }

    /// Identity of the signed-in user, if any.
    pub fn current_auth_user(&self) -> Option<AuthUser> {
        load_auth_session().map(|s| s.user)
    }
}

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok()?
}

fn save_auth_session(session: &AuthSession) {
    if let Some(storage) = local_storage() {
        if let Ok(json) = serde_json::to_string(session) {
            let _ = storage.set_item(AUTH_SESSION_KEY, &json);
        }
    }
}

pub fn load_auth_session() -> Option<AuthSession> {
    let storage = local_storage()?;
    let json = storage.get_item(AUTH_SESSION_KEY).ok()??;
    serde_json::from_str(&json).ok()
}

fn js_err(e: impl Into<JsValue>) -> AppError {
    let v: JsValue = e.into();
    AppError::backend(
        v.as_string()
            .unwrap_or_else(|| "anrop mot servern misslyckades".into()),
    )
}

// ============ REST CORE ============

impl SupabaseClient {
    fn rest_headers(&self) -> Result<Headers, AppError> {
        let headers = Headers::new().map_err(js_err)?;
        headers.set("apikey", &self.key).map_err(js_err)?;
        // User token when signed in, anon key otherwise.
        if let Some(session) = load_auth_session() {
            headers
                .set("Authorization", &format!("Bearer {}", session.access_token))
                .map_err(js_err)?;
        } else {
            headers
                .set("Authorization", &format!("Bearer {}", self.key))
                .map_err(js_err)?;
        }
        headers
            .set("Content-Type", "application/json")
            .map_err(js_err)?;
        Ok(headers)
    }

    async fn rest_fetch(
        &self,
        method: &str,
        table: &str,
        query: &str,
        body: Option<String>,
        prefer: Option<&str>,
    ) -> Result<Response, AppError> {
        let window = web_sys::window().ok_or_else(|| AppError::backend("no window"))?;

        let headers = self.rest_headers()?;
        if let Some(p) = prefer {
            headers.set("Prefer", p).map_err(js_err)?;
        }

        let opts = RequestInit::new();
        opts.set_method(method);
        opts.set_mode(RequestMode::Cors);
        if let Some(b) = body {
            opts.set_body(&JsValue::from_str(&b));
        }
        opts.set_headers(&JsValue::from(&headers));

        let url = if query.is_empty() {
            format!("{}/rest/v1/{}", self.url, table)
        } else {
            format!("{}/rest/v1/{}?{}", self.url, table, query)
        };
        let request = Request::new_with_str_and_init(&url, &opts).map_err(js_err)?;

        let resp_value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(js_err)?;
        let resp: Response = resp_value.dyn_into().map_err(js_err)?;

        if !resp.ok() {
            log::warn!("{} {} -> HTTP {}", method, table, resp.status());
            return Err(AppError::backend(format!("HTTP {}", resp.status())));
        }
        Ok(resp)
    }

    /// GET rows matching a PostgREST filter string.
    pub async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &str,
    ) -> Result<Vec<T>, AppError> {
        let resp = self.rest_fetch("GET", table, query, None, None).await?;
        let json = JsFuture::from(resp.json().map_err(js_err)?)
            .await
            .map_err(js_err)?;
        serde_wasm_bindgen::from_value(json).map_err(|_| AppError::backend("ogiltigt radformat"))
    }

    /// POST one row and get the stored representation back.
    pub async fn insert_returning<B: Serialize, T: DeserializeOwned>(
        &self,
        table: &str,
        row: &B,
    ) -> Result<T, AppError> {
        let body = serde_json::to_string(row).map_err(|e| AppError::backend(e.to_string()))?;
        let resp = self
            .rest_fetch(
                "POST",
                table,
                "",
                Some(body),
                Some("return=representation"),
            )
            .await?;
        let json = JsFuture::from(resp.json().map_err(js_err)?)
            .await
            .map_err(js_err)?;
        let mut rows: Vec<T> = serde_wasm_bindgen::from_value(json)
            .map_err(|_| AppError::backend("ogiltigt radformat"))?;
        rows.pop()
            .ok_or_else(|| AppError::backend("tom radlista från insert"))
    }

    /// POST one row, ignoring the response body.
    pub async fn insert<B: Serialize>(&self, table: &str, row: &B) -> Result<(), AppError> {
        let body = serde_json::to_string(row).map_err(|e| AppError::backend(e.to_string()))?;
        self.rest_fetch("POST", table, "", Some(body), None).await?;
        Ok(())
    }

    /// POST with merge-duplicates so repeated setup calls stay idempotent.
    pub async fn upsert<B: Serialize>(&self, table: &str, row: &B) -> Result<(), AppError> {
        let body = serde_json::to_string(row).map_err(|e| AppError::backend(e.to_string()))?;
        self.rest_fetch(
            "POST",
            table,
            "",
            Some(body),
            Some("resolution=merge-duplicates"),
        )
        .await?;
        Ok(())
    }

    /// PATCH rows matching a filter.
    pub async fn update<B: Serialize>(
        &self,
        table: &str,
        query: &str,
        patch: &B,
    ) -> Result<(), AppError> {
        let body = serde_json::to_string(patch).map_err(|e| AppError::backend(e.to_string()))?;
        self.rest_fetch("PATCH", table, query, Some(body), None)
            .await?;
        Ok(())
    }
}

// ============ PROFILES & ROLES ============

#[derive(Serialize)]
struct ProfileRow<'a> {
    id: &'a str,
    email: &'a str,
    full_name: &'a str,
    role: UserRole,
}

impl SupabaseClient {
    pub async fn fetch_profile(&self, user_id: &str) -> Result<Option<Profile>, AppError> {
        let query = format!("select=*&id=eq.{user_id}");
        let mut rows: Vec<Profile> = self.select("users", &query).await?;
        Ok(rows.pop())
    }

    pub async fn upsert_profile(
        &self,
        user: &AuthUser,
        full_name: &str,
        role: UserRole,
    ) -> Result<(), AppError> {
        let row = ProfileRow {
            id: &user.id,
            email: &user.email,
            full_name,
            role,
        };
        self.upsert("users", &row).await
    }

    pub async fn fetch_profiles_by_ids(&self, ids: &[String]) -> Result<Vec<Profile>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!("select=*&id=in.({})", ids.join(","));
        self.select("users", &query).await
    }
}

// ============ COACH / ATHLETE LINKS ============

#[derive(Serialize)]
struct NewCoachAthlete<'a> {
    coach_id: &'a str,
    athlete_id: &'a str,
}

impl SupabaseClient {
    pub async fn fetch_coach_athletes(&self, coach_id: &str) -> Result<Vec<CoachAthlete>, AppError> {
        let query = format!("select=*&coach_id=eq.{coach_id}&order=created_at.asc");
        self.select("coach_athletes", &query).await
    }

    pub async fn fetch_coach_of(&self, athlete_id: &str) -> Result<Option<CoachAthlete>, AppError> {
        let query = format!("select=*&athlete_id=eq.{athlete_id}");
        let mut rows: Vec<CoachAthlete> = self.select("coach_athletes", &query).await?;
        Ok(rows.pop())
    }

    pub async fn link_coach_athlete(
        &self,
        coach_id: &str,
        athlete_id: &str,
    ) -> Result<(), AppError> {
        let row = NewCoachAthlete {
            coach_id,
            athlete_id,
        };
        self.insert("coach_athletes", &row).await
    }
}

// ============ INVITATIONS ============

#[derive(Serialize)]
struct NewInvitation<'a> {
    coach_id: &'a str,
    token: &'a str,
    expires_at: String,
}

#[derive(Serialize)]
struct InvitationUsedPatch<'a> {
    used_by_athlete_id: &'a str,
}

impl SupabaseClient {
    /// Creates a share token valid for seven days.
    pub async fn create_invitation(&self, coach_id: &str) -> Result<CoachInvitation, AppError> {
        let token = random_token();
        let expires_at = (Utc::now() + chrono::Duration::days(7))
            .to_rfc3339_opts(SecondsFormat::Secs, true);
        let row = NewInvitation {
            coach_id,
            token: &token,
            expires_at,
        };
        self.insert_returning("coach_invitations", &row).await
    }

    /// Finds an invitation that is unexpired and still unclaimed.
    pub async fn find_usable_invitation(
        &self,
        token: &str,
    ) -> Result<Option<CoachInvitation>, AppError> {
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        let token = js_sys::encode_uri_component(token);
        let query = format!(
            "select=*&token=eq.{token}&used_by_athlete_id=is.null&expires_at=gt.{now}"
        );
        let mut rows: Vec<CoachInvitation> = self.select("coach_invitations", &query).await?;
        Ok(rows.pop())
    }

    pub async fn mark_invitation_used(
        &self,
        token: &str,
        athlete_id: &str,
    ) -> Result<(), AppError> {
        let token = js_sys::encode_uri_component(token);
        let query = format!("token=eq.{token}");
        let patch = InvitationUsedPatch {
            used_by_athlete_id: athlete_id,
        };
        self.update("coach_invitations", &query, &patch).await
    }
}

/// Random share token: time plus two random draws, hex-packed. Uniqueness is
/// good enough for a 7-day invite code.
fn random_token() -> String {
    let now = js_sys::Date::now() as u64;
    let a = (js_sys::Math::random() * 0xffff_ffffu32 as f64) as u64;
    let b = (js_sys::Math::random() * 0xffff_ffffu32 as f64) as u64;
    format!("{now:x}{a:x}{b:x}")
}

// ============ EXERCISE LIBRARY ============

impl SupabaseClient {
    /// Built-in exercises plus the coach's own, by name.
    pub async fn fetch_exercises(&self, coach_id: &str) -> Result<Vec<Exercise>, AppError> {
        let query = format!("select=*&or=(coach_id.is.null,coach_id.eq.{coach_id})&order=name.asc");
        self.select("exercises", &query).await
    }
}

// ============ PROGRAMS & WORKOUTS ============

#[derive(Serialize)]
struct NewProgram<'a> {
    coach_id: &'a str,
    name: &'a str,
    description: Option<&'a str>,
    status: ProgramStatus,
}

#[derive(Serialize)]
struct NewWorkout<'a> {
    program_id: &'a str,
    name: &'a str,
    day: i32,
}

#[derive(Serialize)]
pub struct NewWorkoutExercise<'a> {
    pub workout_id: &'a str,
    pub exercise_id: &'a str,
    pub sets: u32,
    pub reps: u32,
    pub weight: Option<f64>,
    pub rest_time: u32,
    pub exercise_order: i32,
}

/// Wire shape for a workout-exercise row with its embedded library entry.
#[derive(Deserialize)]
struct WorkoutExerciseRow {
    id: String,
    workout_id: String,
    exercise_id: String,
    sets: u32,
    reps: u32,
    weight: Option<f64>,
    rest_time: u32,
    exercise_order: i32,
    exercise: Option<ExerciseRef>,
}

#[derive(Deserialize)]
struct ExerciseRef {
    name: String,
    description: Option<String>,
}

impl From<WorkoutExerciseRow> for WorkoutExercise {
    fn from(row: WorkoutExerciseRow) -> Self {
        let (name, description) = row
            .exercise
            .map(|e| (e.name, e.description))
            .unwrap_or_else(|| ("Okänd övning".to_string(), None));
        WorkoutExercise {
            id: row.id,
            workout_id: row.workout_id,
            exercise_id: row.exercise_id,
            sets: row.sets,
            reps: row.reps,
            weight: row.weight,
            rest_time: row.rest_time,
            exercise_order: row.exercise_order,
            exercise_name: name,
            exercise_description: description,
        }
    }
}

impl SupabaseClient {
    pub async fn fetch_programs(&self, coach_id: &str) -> Result<Vec<Program>, AppError> {
        let query = format!("select=*&coach_id=eq.{coach_id}&order=created_at.desc");
        self.select("programs", &query).await
    }

    pub async fn fetch_program(&self, program_id: &str) -> Result<Option<Program>, AppError> {
        let query = format!("select=*&id=eq.{program_id}");
        let mut rows: Vec<Program> = self.select("programs", &query).await?;
        Ok(rows.pop())
    }

    pub async fn create_program(
        &self,
        coach_id: &str,
        name: &str,
        description: Option<&str>,
    ) -> Result<Program, AppError> {
        let row = NewProgram {
            coach_id,
            name,
            description,
            status: ProgramStatus::Draft,
        };
        self.insert_returning("programs", &row).await
    }

    pub async fn fetch_workouts(&self, program_id: &str) -> Result<Vec<Workout>, AppError> {
        let query = format!("select=*&program_id=eq.{program_id}&order=day.asc");
        self.select("workouts", &query).await
    }

    pub async fn create_workout(
        &self,
        program_id: &str,
        name: &str,
        day: i32,
    ) -> Result<Workout, AppError> {
        let row = NewWorkout {
            program_id,
            name,
            day,
        };
        self.insert_returning("workouts", &row).await
    }

    pub async fn create_workout_exercise(
        &self,
        row: &NewWorkoutExercise<'_>,
    ) -> Result<(), AppError> {
        self.insert("workout_exercises", row).await
    }

    async fn fetch_workout_row(&self, workout_id: &str) -> Result<Workout, AppError> {
        let query = format!("select=*&id=eq.{workout_id}");
        let mut rows: Vec<Workout> = self.select("workouts", &query).await?;
        rows.pop().ok_or_else(|| AppError::not_found("passet"))
    }

    async fn fetch_workout_exercise_rows(
        &self,
        workout_id: &str,
    ) -> Result<Vec<WorkoutExercise>, AppError> {
        let query = format!(
            "select=*,exercise:exercises(name,description)&workout_id=eq.{workout_id}&order=exercise_order.asc"
        );
        let rows: Vec<WorkoutExerciseRow> = self.select("workout_exercises", &query).await?;
        Ok(rows.into_iter().map(WorkoutExercise::from).collect())
    }
}

// ============ WORKOUT LOGS ============

#[derive(Serialize)]
struct NewWorkoutLog<'a> {
    athlete_id: &'a str,
    workout_id: &'a str,
    started_at: String,
    status: LogStatus,
}

#[derive(Serialize)]
struct WorkoutLogDonePatch {
    completed_at: String,
    status: LogStatus,
}

impl crate::session::WorkoutBackend for SupabaseClient {
    fn current_user(&self) -> Option<AuthUser> {
        self.current_auth_user()
    }

    async fn fetch_workout(&self, workout_id: &str) -> Result<Workout, AppError> {
        self.fetch_workout_row(workout_id).await
    }

    async fn fetch_workout_exercises(
        &self,
        workout_id: &str,
    ) -> Result<Vec<WorkoutExercise>, AppError> {
        self.fetch_workout_exercise_rows(workout_id).await
    }

    async fn create_workout_log(
        &self,
        athlete_id: &str,
        workout_id: &str,
    ) -> Result<WorkoutLog, AppError> {
        let row = NewWorkoutLog {
            athlete_id,
            workout_id,
            started_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            status: LogStatus::InProgress,
        };
        let log = self.insert_returning("workout_logs", &row).await?;
        log::info!("workout log created for workout {workout_id}");
        Ok(log)
    }

    async fn insert_exercise_log(&self, row: &NewExerciseLog) -> Result<(), AppError> {
        self.insert("exercise_logs", row).await
    }

    async fn complete_workout_log(&self, log_id: &str) -> Result<(), AppError> {
        let patch = WorkoutLogDonePatch {
            completed_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            status: LogStatus::Completed,
        };
        let query = format!("id=eq.{log_id}");
        self.update("workout_logs", &query, &patch).await?;
        log::info!("workout log {log_id} completed");
        Ok(())
    }
}

// ============ ATHLETE STATS ============

#[derive(Serialize)]
struct NewAthleteStats<'a> {
    athlete_id: &'a str,
    max_squat: Option<f64>,
    max_bench: Option<f64>,
    max_deadlift: Option<f64>,
    total_volume: f64,
}

impl SupabaseClient {
    pub async fn fetch_athlete_stats(
        &self,
        athlete_id: &str,
    ) -> Result<Option<AthleteStats>, AppError> {
        let query = format!("select=*&athlete_id=eq.{athlete_id}");
        let mut rows: Vec<AthleteStats> = self.select("athlete_stats", &query).await?;
        Ok(rows.pop())
    }

    pub async fn seed_athlete_stats(&self, athlete_id: &str) -> Result<(), AppError> {
        let row = NewAthleteStats {
            athlete_id,
            max_squat: None,
            max_bench: None,
            max_deadlift: None,
            total_volume: 0.0,
        };
        self.upsert("athlete_stats", &row).await
    }
}

// ============ CALENDAR ============

impl SupabaseClient {
    pub async fn fetch_calendar_events(
        &self,
        user_id: &str,
    ) -> Result<Vec<CalendarEvent>, AppError> {
        let query = format!("select=*&user_id=eq.{user_id}&order=event_date.asc");
        self.select("calendar_events", &query).await
    }
}

// ============ MESSAGES ============

#[derive(Serialize)]
struct NewMessage<'a> {
    sender_id: &'a str,
    recipient_id: &'a str,
    content: &'a str,
    read: bool,
}

impl SupabaseClient {
    /// Both directions of one conversation, oldest first.
    pub async fn fetch_conversation(
        &self,
        user_id: &str,
        partner_id: &str,
    ) -> Result<Vec<Message>, AppError> {
        let query = format!(
            "select=*&or=(and(sender_id.eq.{user_id},recipient_id.eq.{partner_id}),and(sender_id.eq.{partner_id},recipient_id.eq.{user_id}))&order=created_at.asc"
        );
        self.select("messages", &query).await
    }

    pub async fn send_message(
        &self,
        sender_id: &str,
        recipient_id: &str,
        content: &str,
    ) -> Result<Message, AppError> {
        let row = NewMessage {
            sender_id,
            recipient_id,
            content,
            read: false,
        };
        self.insert_returning("messages", &row).await
    }
}
