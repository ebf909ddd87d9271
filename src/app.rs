use chrono::{DateTime, Datelike, NaiveDate, Timelike, Utc};
use leptos::*;

use crate::pages::{
    AthleteHome, CalendarPage, CoachHome, ExercisesPage, InvitePage, Login, MessagesPage,
    ProgramBuilderPage, ProgramDetailPage, ProgramsPage, Register, Setup, WorkoutPage,
};
use crate::routing::resolve_destination;
use crate::supabase::{self, SupabaseClient};
use crate::types::{AppView, AuthSession, Profile};

/// Today's calendar date in the browser's local timezone.
pub fn today_naive() -> NaiveDate {
    let d = js_sys::Date::new_0();
    NaiveDate::from_ymd_opt(d.get_full_year() as i32, d.get_month() + 1, d.get_date())
        .unwrap_or_else(|| NaiveDate::from_ymd_opt(1970, 1, 1).unwrap())
}

pub fn format_weight(w: f64) -> String {
    if w.fract() == 0.0 {
        format!("{w:.0}")
    } else {
        format!("{w:.1}")
    }
}

pub fn format_day(date: NaiveDate) -> String {
    format!(
        "{} {} {}",
        date.day(),
        crate::calendar::month_name(date.month()).to_lowercase(),
        date.year()
    )
}

/// Short timestamp for conversation bubbles.
pub fn format_message_time(ts: &DateTime<Utc>) -> String {
    format!(
        "{} {} {:02}:{:02}",
        ts.day(),
        crate::calendar::month_name(ts.month()).to_lowercase(),
        ts.hour(),
        ts.minute()
    )
}

#[component]
pub fn App() -> impl IntoView {
    provide_context(SupabaseClient::default());

    let initial_view = if supabase::load_auth_session().is_some() {
        AppView::Loading
    } else {
        AppView::Login
    };

    let (view, set_view) = create_signal(initial_view);
    let (auth, set_auth) = create_signal(supabase::load_auth_session());
    let (profile, set_profile) = create_signal(Option::<Profile>::None);

    // Whenever the signed-in user changes, look up the profile and route
    // through the one authorization decision.
    create_effect(move |_| {
        let Some(session) = auth.get() else {
            return;
        };
        let client = expect_context::<SupabaseClient>();
        spawn_local(async move {
            let fetched = client
                .fetch_profile(&session.user.id)
                .await
                .unwrap_or_default();
            set_profile.set(fetched.clone());
            let dest = resolve_destination(Some(&session.user), fetched.as_ref());
            set_view.set(dest.into_view());
        });
    });

    view! {
        <div class="app">
            {move || match view.get() {
                AppView::Loading => view! { <div class="loading">"Laddar..."</div> }.into_view(),
                AppView::Login => view! { <Login set_view=set_view set_auth=set_auth /> }.into_view(),
                AppView::Register => view! { <Register set_view=set_view set_auth=set_auth /> }.into_view(),
                AppView::Setup => view! { <Setup set_view=set_view set_profile=set_profile /> }.into_view(),
                AppView::CoachHome => view! { <CoachHome set_view=set_view profile=profile set_auth=set_auth /> }.into_view(),
                AppView::AthleteHome => view! { <AthleteHome set_view=set_view profile=profile set_auth=set_auth /> }.into_view(),
                AppView::Exercises => view! { <ExercisesPage set_view=set_view /> }.into_view(),
                AppView::Programs => view! { <ProgramsPage set_view=set_view profile=profile /> }.into_view(),
                AppView::ProgramBuilder => view! { <ProgramBuilderPage set_view=set_view /> }.into_view(),
                AppView::ProgramDetail(id) => view! { <ProgramDetailPage program_id=id set_view=set_view profile=profile /> }.into_view(),
                AppView::Workout(id) => view! { <WorkoutPage workout_id=id set_view=set_view /> }.into_view(),
                AppView::Calendar => view! { <CalendarPage set_view=set_view /> }.into_view(),
                AppView::Messages => view! { <MessagesPage set_view=set_view profile=profile /> }.into_view(),
                AppView::Invite => view! { <InvitePage set_view=set_view /> }.into_view(),
            }}
        </div>
    }
}

/// Top navigation for coach pages.
#[component]
pub fn CoachNav(set_view: WriteSignal<AppView>, active: &'static str) -> impl IntoView {
    let link_class = move |name: &str| {
        if name == active {
            "nav-link active"
        } else {
            "nav-link"
        }
    };
    view! {
        <nav class="top-nav">
            <span class="nav-logo">"IRONCOACH"</span>
            <button class=link_class("athletes") on:click=move |_| set_view.set(AppView::CoachHome)>"Atleter"</button>
            <button class=link_class("exercises") on:click=move |_| set_view.set(AppView::Exercises)>"Övningar"</button>
            <button class=link_class("programs") on:click=move |_| set_view.set(AppView::Programs)>"Program"</button>
            <button class=link_class("messages") on:click=move |_| set_view.set(AppView::Messages)>"Meddelanden"</button>
        </nav>
    }
}

/// Top navigation for athlete pages.
#[component]
pub fn AthleteNav(set_view: WriteSignal<AppView>, active: &'static str) -> impl IntoView {
    let link_class = move |name: &str| {
        if name == active {
            "nav-link active"
        } else {
            "nav-link"
        }
    };
    view! {
        <nav class="top-nav">
            <span class="nav-logo">"IRONCOACH"</span>
            <button class=link_class("home") on:click=move |_| set_view.set(AppView::AthleteHome)>"Hem"</button>
            <button class=link_class("programs") on:click=move |_| set_view.set(AppView::Programs)>"Program"</button>
            <button class=link_class("calendar") on:click=move |_| set_view.set(AppView::Calendar)>"Kalender"</button>
            <button class=link_class("messages") on:click=move |_| set_view.set(AppView::Messages)>"Meddelanden"</button>
        </nav>
    }
}

/// Shared sign-out control shown on the dashboards.
#[component]
pub fn SignOut(
    set_view: WriteSignal<AppView>,
    set_auth: WriteSignal<Option<AuthSession>>,
) -> impl IntoView {
    let client = expect_context::<SupabaseClient>();
    view! {
        <button class="logout-link" on:click=move |_| {
            client.sign_out();
            set_auth.set(None);
            set_view.set(AppView::Login);
        }>"Logga ut"</button>
    }
}
