use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Coach,
    Athlete,
    Both,
}

impl UserRole {
    pub fn coaches(self) -> bool {
        matches!(self, UserRole::Coach | UserRole::Both)
    }

    pub fn trains(self) -> bool {
        matches!(self, UserRole::Athlete | UserRole::Both)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AuthUser {
    pub id: String,
    pub email: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AuthSession {
    pub access_token: String,
    pub user: AuthUser,
}

/// Row in the `users` table. `role` stays empty until profile setup.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Profile {
    pub id: String,
    pub email: String,
    pub full_name: Option<String>,
    pub role: Option<UserRole>,
}

impl Profile {
    pub fn display_name(&self) -> &str {
        self.full_name.as_deref().unwrap_or(&self.email)
    }
}

/// Library exercise. `coach_id = None` marks a built-in entry visible to all.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Exercise {
    pub id: String,
    pub coach_id: Option<String>,
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub muscle_groups: Vec<String>,
    #[serde(default)]
    pub equipment: Vec<String>,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProgramStatus {
    Draft,
    InProgress,
    Completed,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Program {
    pub id: String,
    pub coach_id: String,
    pub name: String,
    pub description: Option<String>,
    pub status: ProgramStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Workout {
    pub id: String,
    pub program_id: String,
    pub name: String,
    pub day: i32,
}

/// One prescribed exercise slot in a workout. Immutable once a session has
/// loaded it; `exercise_order` drives presentation order.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WorkoutExercise {
    pub id: String,
    pub workout_id: String,
    pub exercise_id: String,
    pub sets: u32,
    pub reps: u32,
    pub weight: Option<f64>,
    pub rest_time: u32,
    pub exercise_order: i32,
    pub exercise_name: String,
    pub exercise_description: Option<String>,
}

/// In-memory log for one set. Reps and weight stay editable until the set is
/// completed; `completed` never reverts.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SetLog {
    pub set_number: u32,
    pub reps: u32,
    pub weight: f64,
    pub completed: bool,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LogStatus {
    NotStarted,
    InProgress,
    Completed,
}

/// Persisted record of one athlete's attempt at one workout.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WorkoutLog {
    pub id: String,
    pub athlete_id: String,
    pub workout_id: String,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub status: LogStatus,
}

/// Insert payload for one completed set.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct NewExerciseLog {
    pub workout_log_id: String,
    pub workout_exercise_id: String,
    pub set_number: u32,
    pub reps: u32,
    pub weight: f64,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Program,
    Competition,
    Holiday,
    Other,
}

impl EventKind {
    pub fn label(self) -> &'static str {
        match self {
            EventKind::Program => "Program",
            EventKind::Competition => "Tävling",
            EventKind::Holiday => "Ledighet",
            EventKind::Other => "Övrigt",
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            EventKind::Program => "event-program",
            EventKind::Competition => "event-competition",
            EventKind::Holiday => "event-holiday",
            EventKind::Other => "event-other",
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CalendarEvent {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub description: Option<String>,
    pub event_date: NaiveDate,
    pub event_type: EventKind,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub id: String,
    pub sender_id: String,
    pub recipient_id: String,
    pub content: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CoachInvitation {
    pub id: String,
    pub coach_id: String,
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub used_by_athlete_id: Option<String>,
}

impl CoachInvitation {
    /// Usable means unexpired and not yet claimed by an athlete.
    pub fn is_usable(&self, now: DateTime<Utc>) -> bool {
        self.used_by_athlete_id.is_none() && self.expires_at > now
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CoachAthlete {
    pub id: String,
    pub coach_id: String,
    pub athlete_id: String,
    pub notes: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AthleteStats {
    pub athlete_id: String,
    pub max_squat: Option<f64>,
    pub max_bench: Option<f64>,
    pub max_deadlift: Option<f64>,
    pub total_volume: f64,
}

/// Which page the single-page shell is showing.
#[derive(Clone, Debug, PartialEq)]
pub enum AppView {
    Loading,
    Login,
    Register,
    Setup,
    CoachHome,
    AthleteHome,
    Exercises,
    Programs,
    ProgramBuilder,
    ProgramDetail(String),
    Workout(String),
    Calendar,
    Messages,
    Invite,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn invitation(expires_at: DateTime<Utc>, used_by: Option<&str>) -> CoachInvitation {
        CoachInvitation {
            id: "inv1".into(),
            coach_id: "c1".into(),
            token: "tok".into(),
            expires_at,
            used_by_athlete_id: used_by.map(String::from),
        }
    }

    #[test]
    fn invitation_usable_only_when_unexpired_and_unused() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2024, 3, 17, 12, 0, 0).unwrap();
        let earlier = Utc.with_ymd_and_hms(2024, 3, 3, 12, 0, 0).unwrap();

        assert!(invitation(later, None).is_usable(now));
        assert!(!invitation(earlier, None).is_usable(now));
        assert!(!invitation(later, Some("a1")).is_usable(now));
    }

    #[test]
    fn role_capabilities() {
        assert!(UserRole::Coach.coaches());
        assert!(!UserRole::Coach.trains());
        assert!(UserRole::Athlete.trains());
        assert!(UserRole::Both.coaches() && UserRole::Both.trains());
    }
}
