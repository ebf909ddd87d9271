use leptos::*;

use crate::app::{format_weight, AthleteNav, SignOut};
use crate::supabase::SupabaseClient;
use crate::types::{AppView, AthleteStats, AuthSession, Profile};

/// Athlete landing page: personal bests and the coach connection.
#[component]
pub fn AthleteHome(
    set_view: WriteSignal<AppView>,
    profile: ReadSignal<Option<Profile>>,
    set_auth: WriteSignal<Option<AuthSession>>,
) -> impl IntoView {
    let client = expect_context::<SupabaseClient>();
    let (stats, set_stats) = create_signal(Option::<AthleteStats>::None);
    let (coach, set_coach) = create_signal(Option::<Profile>::None);

    spawn_local(async move {
        let Some(user) = client.current_auth_user() else {
            set_view.set(AppView::Login);
            return;
        };

        match client.fetch_athlete_stats(&user.id).await {
            Ok(s) => set_stats.set(s),
            Err(e) => log::warn!("kunde inte hämta statistik: {e}"),
        }

        match client.fetch_coach_of(&user.id).await {
            Ok(Some(link)) => {
                let ids = vec![link.coach_id.clone()];
                if let Ok(mut profiles) = client.fetch_profiles_by_ids(&ids).await {
                    set_coach.set(profiles.pop());
                }
            }
            Ok(None) => {}
            Err(e) => log::warn!("kunde inte hämta coachkopplingen: {e}"),
        }
    });

    let stat_value = |value: Option<f64>| {
        value
            .map(|v| format!("{} kg", format_weight(v)))
            .unwrap_or_else(|| "–".to_string())
    };

    view! {
        <div class="page">
            <AthleteNav set_view=set_view active="home" />

            <div class="page-header">
                <h2 class="page-title">
                    {move || match profile.get() {
                        Some(p) => format!("Hej {}!", p.display_name()),
                        None => "Hej!".to_string(),
                    }}
                </h2>
                <SignOut set_view=set_view set_auth=set_auth />
            </div>

            {move || coach.get().map(|c| view! {
                <p class="page-subtitle">{format!("Coachas av {}", c.display_name())}</p>
            })}

            <div class="stat-cards">
                <div class="stat-card">
                    <span class="stat-label">"Max knäböj"</span>
                    <span class="stat-value">{move || stat_value(stats.get().and_then(|s| s.max_squat))}</span>
                </div>
                <div class="stat-card">
                    <span class="stat-label">"Max bänkpress"</span>
                    <span class="stat-value">{move || stat_value(stats.get().and_then(|s| s.max_bench))}</span>
                </div>
                <div class="stat-card">
                    <span class="stat-label">"Max marklyft"</span>
                    <span class="stat-value">{move || stat_value(stats.get().and_then(|s| s.max_deadlift))}</span>
                </div>
            </div>

            <div class="home-links">
                <button class="home-link-card" on:click=move |_| set_view.set(AppView::Programs)>
                    <span class="home-link-title">"Mina program"</span>
                    <span class="home-link-text">"Se pass från din coach och börja träna"</span>
                </button>
                <button class="home-link-card" on:click=move |_| set_view.set(AppView::Calendar)>
                    <span class="home-link-title">"Kalender"</span>
                    <span class="home-link-text">"Tävlingar, program och annat på gång"</span>
                </button>
            </div>
        </div>
    }
}
