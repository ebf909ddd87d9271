use leptos::*;

use crate::app::format_weight;
use crate::error::AppError;
use crate::session::{Direction, SessionFlow, SetChange};
use crate::supabase::SupabaseClient;
use crate::types::{AppView, LogStatus};

/// Guided workout session: start gate, one exercise at a time, per-set
/// logging, and workout completion. All state lives in the session flow;
/// the page swaps the whole flow value in and out of its signal so no view
/// holds a stale nested reference.
#[component]
pub fn WorkoutPage(workout_id: String, set_view: WriteSignal<AppView>) -> impl IntoView {
    let (flow, set_flow) = create_signal(Option::<SessionFlow<SupabaseClient>>::None);
    let (load_error, set_load_error) = create_signal(Option::<AppError>::None);
    let (error, set_error) = create_signal(Option::<String>::None);
    // One backend call at a time; buttons stay disabled while one is pending.
    let (busy, set_busy) = create_signal(false);

    {
        let client = expect_context::<SupabaseClient>();
        let workout_id = workout_id.clone();
        spawn_local(async move {
            match SessionFlow::load(client, &workout_id).await {
                Ok(f) => set_flow.set(Some(f)),
                Err(e) => set_load_error.set(Some(e)),
            }
        });
    }

    let start = move |_| {
        set_busy.set(true);
        set_error.set(None);
        spawn_local(async move {
            if let Some(mut f) = flow.get() {
                match f.start().await {
                    Ok(()) => set_flow.set(Some(f)),
                    Err(e) => set_error.set(Some(e.to_string())),
                }
            }
            set_busy.set(false);
        });
    };

    let complete_set = move |exercise_id: String, set_index: usize| {
        set_busy.set(true);
        set_error.set(None);
        spawn_local(async move {
            if let Some(mut f) = flow.get() {
                match f.complete_set(&exercise_id, set_index).await {
                    Ok(()) => set_flow.set(Some(f)),
                    Err(e) => set_error.set(Some(e.to_string())),
                }
            }
            set_busy.set(false);
        });
    };

    let edit_set = move |exercise_id: String, set_index: usize, change: SetChange| {
        set_flow.update(|opt| {
            if let Some(f) = opt {
                f.update_set(&exercise_id, set_index, change);
            }
        });
    };

    let step = move |direction: Direction| {
        set_flow.update(|opt| {
            if let Some(f) = opt {
                f.advance(direction);
            }
        });
    };

    let finish = move |_| {
        set_busy.set(true);
        set_error.set(None);
        spawn_local(async move {
            if let Some(mut f) = flow.get() {
                match f.complete_workout().await {
                    Ok(()) => {
                        set_flow.set(Some(f));
                        set_view.set(AppView::AthleteHome);
                    }
                    Err(e) => set_error.set(Some(e.to_string())),
                }
            }
            set_busy.set(false);
        });
    };

    view! {
        <div class="page narrow workout-page">
            <button class="back-link" on:click=move |_| set_view.set(AppView::Programs)>
                "← Lämna passet"
            </button>

            {move || error.get().map(|e| view! { <div class="auth-error">{e}</div> })}

            {move || {
                if let Some(e) = load_error.get() {
                    let text = match e {
                        AppError::NotFound(_) => "Passet hittades inte".to_string(),
                        other => other.to_string(),
                    };
                    return view! { <div class="empty-state"><p class="empty-title">{text}</p></div> }.into_view();
                }
                let Some(f) = flow.get() else {
                    return view! { <div class="loading">"Laddar pass..."</div> }.into_view();
                };

                let workout_name = f.workout().name.clone();
                let exercise_count = f.exercises().len();

                if f.status() == LogStatus::NotStarted {
                    return view! {
                        <div class="panel start-gate">
                            <h2 class="page-title">{workout_name}</h2>
                            <p class="page-subtitle">
                                {format!("Passet innehåller {exercise_count} övningar")}
                            </p>
                            <button class="primary-btn start-btn" on:click=start disabled=move || busy.get()>
                                {move || if busy.get() { "Startar..." } else { "Starta pass" }}
                            </button>
                        </div>
                    }.into_view();
                }

                let current_idx = f.current_index();
                let Some(exercise) = f.current_exercise().cloned() else {
                    return view! { <div class="empty-state"><p class="empty-title">"Passet saknar övningar"</p></div> }.into_view();
                };
                let sets = f.sets_for(&exercise.id).to_vec();
                let is_last = current_idx + 1 >= exercise_count;
                let dots = f.exercises().iter().enumerate().map(|(i, ex)| {
                    let class = if f.exercise_done(&ex.id) {
                        "progress-dot done"
                    } else if i == current_idx {
                        "progress-dot current"
                    } else {
                        "progress-dot"
                    };
                    view! { <span class=class></span> }
                }).collect_view();

                view! {
                    <div>
                        <div class="workout-header">
                            <h2 class="page-title">{workout_name}</h2>
                            <span class="status-badge in-progress">"Pågår"</span>
                        </div>

                        <div class="exercise-progress">
                            <span class="exercise-progress-label">
                                {format!("Övning {} av {}", current_idx + 1, exercise_count)}
                            </span>
                            <div class="progress-dots">{dots}</div>
                        </div>

                        <div class="panel exercise-panel">
                            <h3 class="exercise-name-big">{exercise.exercise_name.clone()}</h3>
                            {exercise.exercise_description.clone().map(|d| view! {
                                <p class="exercise-desc">{d}</p>
                            })}
                            <p class="rest-hint">{format!("Vila {} sekunder mellan seten", exercise.rest_time)}</p>

                            {sets.into_iter().enumerate().map(|(set_index, set)| {
                                let ex_id = exercise.id.clone();
                                let ex_id_reps = ex_id.clone();
                                let ex_id_weight = ex_id.clone();
                                let row_class = if set.completed { "set-row completed" } else { "set-row" };
                                view! {
                                    <div class=row_class>
                                        <div class="set-row-head">
                                            <span class="set-number">{format!("Set {}", set.set_number)}</span>
                                            {set.completed.then(|| view! {
                                                <span class="set-done-mark">"✓ Klart"</span>
                                            })}
                                        </div>
                                        <div class="set-inputs">
                                            <label class="field-label">"Reps"
                                                <input
                                                    type="number"
                                                    class="num-input"
                                                    prop:value=set.reps.to_string()
                                                    disabled=set.completed
                                                    on:input=move |ev| {
                                                        if let Ok(v) = event_target_value(&ev).parse() {
                                                            edit_set(ex_id_reps.clone(), set_index, SetChange::Reps(v));
                                                        }
                                                    }
                                                />
                                            </label>
                                            <label class="field-label">"Vikt (kg)"
                                                <input
                                                    type="number"
                                                    step="0.5"
                                                    class="num-input"
                                                    prop:value=format_weight(set.weight)
                                                    disabled=set.completed
                                                    on:input=move |ev| {
                                                        if let Ok(v) = event_target_value(&ev).parse() {
                                                            edit_set(ex_id_weight.clone(), set_index, SetChange::Weight(v));
                                                        }
                                                    }
                                                />
                                            </label>
                                        </div>
                                        {(!set.completed).then(|| {
                                            let ex_id = ex_id.clone();
                                            view! {
                                                <button
                                                    class="complete-set-btn"
                                                    disabled=move || busy.get()
                                                    on:click=move |_| complete_set(ex_id.clone(), set_index)
                                                >
                                                    "Slutför set"
                                                </button>
                                            }
                                        })}
                                    </div>
                                }
                            }).collect_view()}
                        </div>

                        <div class="workout-footer">
                            {(current_idx > 0).then(|| view! {
                                <button class="secondary-btn" on:click=move |_| step(Direction::Previous)>
                                    "← Föregående övning"
                                </button>
                            })}
                            {if is_last {
                                view! {
                                    <button class="primary-btn finish-btn" on:click=finish disabled=move || busy.get()>
                                        {move || if busy.get() { "Sparar..." } else { "Avsluta pass" }}
                                    </button>
                                }.into_view()
                            } else {
                                view! {
                                    <button class="primary-btn" on:click=move |_| step(Direction::Next)>
                                        "Nästa övning →"
                                    </button>
                                }.into_view()
                            }}
                        </div>
                    </div>
                }.into_view()
            }}
        </div>
    }
}
