mod athlete;
mod auth;
mod calendar_page;
mod coach;
mod exercises;
mod invite;
mod messages;
mod program_detail;
mod programs;
mod setup;
mod workout;

pub use athlete::AthleteHome;
pub use auth::{Login, Register};
pub use calendar_page::CalendarPage;
pub use coach::CoachHome;
pub use exercises::ExercisesPage;
pub use invite::InvitePage;
pub use messages::MessagesPage;
pub use program_detail::ProgramDetailPage;
pub use programs::{ProgramBuilderPage, ProgramsPage};
pub use setup::Setup;
pub use workout::WorkoutPage;
