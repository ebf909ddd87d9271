use leptos::*;

use crate::app::format_weight;
use crate::session::WorkoutBackend;
use crate::supabase::SupabaseClient;
use crate::types::{AppView, Profile, Program, Workout, WorkoutExercise};

/// One program with its workouts and prescriptions. Athletes get a start
/// button per workout; coaches see the same content read-only.
#[component]
pub fn ProgramDetailPage(
    program_id: String,
    set_view: WriteSignal<AppView>,
    profile: ReadSignal<Option<Profile>>,
) -> impl IntoView {
    let client = expect_context::<SupabaseClient>();
    let (program, set_program) = create_signal(Option::<Program>::None);
    let (workouts, set_workouts) = create_signal(Vec::<(Workout, Vec<WorkoutExercise>)>::new());
    let (loading, set_loading) = create_signal(true);

    {
        let program_id = program_id.clone();
        spawn_local(async move {
            match client.fetch_program(&program_id).await {
                Ok(Some(p)) => set_program.set(Some(p)),
                Ok(None) => {
                    set_loading.set(false);
                    return;
                }
                Err(e) => {
                    log::warn!("kunde inte hämta programmet: {e}");
                    set_loading.set(false);
                    return;
                }
            }

            match client.fetch_workouts(&program_id).await {
                Ok(list) => {
                    let mut loaded = Vec::with_capacity(list.len());
                    for workout in list {
                        let exercises = client
                            .fetch_workout_exercises(&workout.id)
                            .await
                            .unwrap_or_default();
                        loaded.push((workout, exercises));
                    }
                    set_workouts.set(loaded);
                }
                Err(e) => log::warn!("kunde inte hämta passen: {e}"),
            }
            set_loading.set(false);
        });
    }

    let can_train = move || {
        profile
            .get()
            .and_then(|p| p.role)
            .map(|r| r.trains())
            .unwrap_or(false)
    };

    view! {
        <div class="page narrow">
            <button class="back-link" on:click=move |_| set_view.set(AppView::Programs)>
                "← Tillbaka till program"
            </button>

            {move || {
                if loading.get() {
                    return view! { <div class="loading">"Laddar program..."</div> }.into_view();
                }
                let Some(p) = program.get() else {
                    return view! { <div class="empty-state"><p class="empty-title">"Programmet hittades inte"</p></div> }.into_view();
                };

                view! {
                    <div>
                        <h2 class="page-title">{p.name.clone()}</h2>
                        {p.description.clone().map(|d| view! { <p class="page-subtitle">{d}</p> })}

                        {workouts.get().into_iter().map(|(workout, exercises)| {
                            let workout_id = workout.id.clone();
                            view! {
                                <div class="panel workout-summary">
                                    <div class="workout-summary-head">
                                        <span class="workout-summary-name">{workout.name.clone()}</span>
                                        {can_train().then(|| {
                                            let id = workout_id.clone();
                                            view! {
                                                <button
                                                    class="primary-btn"
                                                    on:click=move |_| set_view.set(AppView::Workout(id.clone()))
                                                >
                                                    "Starta pass"
                                                </button>
                                            }
                                        })}
                                    </div>

                                    {if exercises.is_empty() {
                                        view! { <p class="empty-text">"Inga övningar i det här passet"</p> }.into_view()
                                    } else {
                                        exercises.iter().enumerate().map(|(i, we)| {
                                            let summary = {
                                                let weight = we.weight
                                                    .map(|w| format!(" @ {} kg", format_weight(w)))
                                                    .unwrap_or_default();
                                                format!(
                                                    "{} set × {} reps{} · Vila {}s",
                                                    we.sets, we.reps, weight, we.rest_time
                                                )
                                            };
                                            view! {
                                                <div class="exercise-summary-row">
                                                    <span class="exercise-summary-name">
                                                        {format!("{}. {}", i + 1, we.exercise_name)}
                                                    </span>
                                                    <span class="exercise-summary-meta">{summary}</span>
                                                </div>
                                            }
                                        }).collect_view()
                                    }}
                                </div>
                            }
                        }).collect_view()}
                    </div>
                }.into_view()
            }}
        </div>
    }
}
