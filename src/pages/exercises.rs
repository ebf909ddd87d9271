use leptos::*;

use crate::app::CoachNav;
use crate::supabase::SupabaseClient;
use crate::types::{AppView, Exercise};

/// Exercise library: built-in entries plus the coach's own.
#[component]
pub fn ExercisesPage(set_view: WriteSignal<AppView>) -> impl IntoView {
    let client = expect_context::<SupabaseClient>();
    let (exercises, set_exercises) = create_signal(Vec::<Exercise>::new());
    let (loading, set_loading) = create_signal(true);

    spawn_local(async move {
        let Some(user) = client.current_auth_user() else {
            set_view.set(AppView::Login);
            return;
        };
        match client.fetch_exercises(&user.id).await {
            Ok(list) => set_exercises.set(list),
            Err(e) => log::warn!("kunde inte hämta övningsbiblioteket: {e}"),
        }
        set_loading.set(false);
    });

    view! {
        <div class="page">
            <CoachNav set_view=set_view active="exercises" />

            <div class="page-header">
                <h2 class="page-title">"Övningsbibliotek"</h2>
            </div>

            {move || {
                if loading.get() {
                    view! { <div class="loading">"Laddar övningar..."</div> }.into_view()
                } else if exercises.get().is_empty() {
                    view! {
                        <div class="empty-state">
                            <p class="empty-title">"Inga övningar tillgängliga"</p>
                        </div>
                    }.into_view()
                } else {
                    view! {
                        <div class="card-grid">
                            {exercises.get().into_iter().map(|ex| {
                                let description = ex.description.clone();
                                view! {
                                    <div class="exercise-card">
                                        <span class="exercise-card-name">{ex.name.clone()}</span>
                                        {description.map(|d| view! { <p class="exercise-card-desc">{d}</p> })}
                                        {(!ex.muscle_groups.is_empty()).then(|| view! {
                                            <div class="chip-row">
                                                {ex.muscle_groups.iter().map(|m| view! {
                                                    <span class="chip chip-muscle">{m.clone()}</span>
                                                }).collect_view()}
                                            </div>
                                        })}
                                        {(!ex.equipment.is_empty()).then(|| view! {
                                            <div class="chip-row">
                                                {ex.equipment.iter().map(|e| view! {
                                                    <span class="chip chip-equipment">{e.clone()}</span>
                                                }).collect_view()}
                                            </div>
                                        })}
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
