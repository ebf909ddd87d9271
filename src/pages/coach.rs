use leptos::*;

use crate::app::{CoachNav, SignOut};
use crate::supabase::SupabaseClient;
use crate::types::{AppView, AuthSession, Profile};

/// Coach landing page: the athlete roster.
#[component]
pub fn CoachHome(
    set_view: WriteSignal<AppView>,
    profile: ReadSignal<Option<Profile>>,
    set_auth: WriteSignal<Option<AuthSession>>,
) -> impl IntoView {
    let client = expect_context::<SupabaseClient>();
    let (athletes, set_athletes) = create_signal(Vec::<Profile>::new());
    let (loading, set_loading) = create_signal(true);

    spawn_local(async move {
        let Some(user) = client.current_auth_user() else {
            set_view.set(AppView::Login);
            return;
        };

        match client.fetch_coach_athletes(&user.id).await {
            Ok(links) => {
                let ids: Vec<String> = links.iter().map(|l| l.athlete_id.clone()).collect();
                match client.fetch_profiles_by_ids(&ids).await {
                    Ok(profiles) => set_athletes.set(profiles),
                    Err(e) => log::warn!("kunde inte hämta atletprofiler: {e}"),
                }
            }
            Err(e) => log::warn!("kunde inte hämta atletlistan: {e}"),
        }
        set_loading.set(false);
    });

    view! {
        <div class="page">
            <CoachNav set_view=set_view active="athletes" />

            <div class="page-header">
                <h2 class="page-title">"Mina atleter"</h2>
                <div class="page-header-actions">
                    <button class="primary-btn" on:click=move |_| set_view.set(AppView::Invite)>
                        "Bjud in atlet"
                    </button>
                    <SignOut set_view=set_view set_auth=set_auth />
                </div>
            </div>

            {move || profile.get().map(|p| view! {
                <p class="page-subtitle">{format!("Inloggad som {}", p.display_name())}</p>
            })}

            {move || {
                if loading.get() {
                    view! { <div class="loading">"Laddar atleter..."</div> }.into_view()
                } else if athletes.get().is_empty() {
                    view! {
                        <div class="empty-state">
                            <p class="empty-title">"Inga atleter ännu"</p>
                            <p class="empty-text">"Bjud in din första atlet för att komma igång"</p>
                        </div>
                    }.into_view()
                } else {
                    view! {
                        <div class="card-grid">
                            {athletes.get().into_iter().map(|a| {
                                let initial = a.display_name().chars().next().unwrap_or('?')
                                    .to_uppercase().to_string();
                                let name = a.display_name().to_string();
                                let email = a.email.clone();
                                view! {
                                    <div class="athlete-card">
                                        <span class="athlete-avatar">{initial}</span>
                                        <div class="athlete-info">
                                            <span class="athlete-name">{name}</span>
                                            <span class="athlete-email">{email}</span>
                                        </div>
                                    </div>
                                }
                            }).collect_view()}
                        </div>
                    }.into_view()
                }
            }}
        </div>
    }
}
