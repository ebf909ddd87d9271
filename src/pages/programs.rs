use leptos::*;

use crate::app::{AthleteNav, CoachNav};
use crate::supabase::{NewWorkoutExercise, SupabaseClient};
use crate::types::{AppView, Exercise, Profile, Program, ProgramStatus};

fn status_label(status: ProgramStatus) -> &'static str {
    match status {
        ProgramStatus::Draft => "Utkast",
        ProgramStatus::InProgress => "Pågår",
        ProgramStatus::Completed => "Avslutat",
    }
}

fn status_class(status: ProgramStatus) -> &'static str {
    match status {
        ProgramStatus::Draft => "status-badge draft",
        ProgramStatus::InProgress => "status-badge in-progress",
        ProgramStatus::Completed => "status-badge completed",
    }
}

/// Program list. Coaches see their own programs, athletes the ones their
/// coach has published.
#[component]
pub fn ProgramsPage(
    set_view: WriteSignal<AppView>,
    profile: ReadSignal<Option<Profile>>,
) -> impl IntoView {
    let (programs, set_programs) = create_signal(Vec::<Program>::new());
    let (loading, set_loading) = create_signal(true);

    create_effect(move |_| {
        let Some(p) = profile.get() else {
            return;
        };
        let is_coach = p.role.map(|r| r.coaches()).unwrap_or(false);
        let client = expect_context::<SupabaseClient>();
        spawn_local(async move {
            let Some(user) = client.current_auth_user() else {
                set_view.set(AppView::Login);
                return;
            };

            let result = if is_coach {
                client.fetch_programs(&user.id).await
            } else {
                match client.fetch_coach_of(&user.id).await {
                    Ok(Some(link)) => client.fetch_programs(&link.coach_id).await,
                    Ok(None) => Ok(Vec::new()),
                    Err(e) => Err(e),
                }
            };

            match result {
                Ok(list) => set_programs.set(list),
                Err(e) => log::warn!("kunde inte hämta program: {e}"),
            }
            set_loading.set(false);
        });
    });

    let is_coach = move || {
        profile
            .get()
            .and_then(|p| p.role)
            .map(|r| r.coaches())
            .unwrap_or(false)
    };

    view! {
        <div class="page">
            {move || if is_coach() {
                view! { <CoachNav set_view=set_view active="programs" /> }.into_view()
            } else {
                view! { <AthleteNav set_view=set_view active="programs" /> }.into_view()
            }}

            <div class="page-header">
                <h2 class="page-title">{move || if is_coach() { "Mina program" } else { "Program från din coach" }}</h2>
                {move || is_coach().then(|| view! {
                    <button class="primary-btn" on:click=move |_| set_view.set(AppView::ProgramBuilder)>
                        "Nytt program"
                    </button>
                })}
            </div>

            {move || {
                if loading.get() {
                    view! { <div class="loading">"Laddar program..."</div> }.into_view()
                } else if programs.get().is_empty() {
                    view! {
                        <div class="empty-state">
                            <p class="empty-title">"Inga program ännu"</p>
                            <p class="empty-text">
                                {if is_coach() { "Skapa ditt första program" } else { "Din coach har inte publicerat något program ännu" }}
                            </p>
                        </div>
                    }.into_view()
                } else {
                    view! {
                        <div class="card-grid">
                            {programs.get().into_iter().map(|prog| {
                                let id = prog.id.clone();
                                let description = prog.description.clone();
                                view! {
                                    <button
                                        class="program-card"
                                        on:click=move |_| set_view.set(AppView::ProgramDetail(id.clone()))
                                    >
                                        <div class="program-card-head">
                                            <span class="program-card-name">{prog.name.clone()}</span>
                                            <span class=status_class(prog.status)>{status_label(prog.status)}</span>
                                        </div>
                                        {description.map(|d| view! { <p class="program-card-desc">{d}</p> })}
                                    </button>
                                }
                            }).collect_view()}
                        </div>
                    }.into_view()
                }
            }}
        </div>
    }
}

#[derive(Clone, Debug, PartialEq)]
struct ExerciseDraft {
    exercise_id: String,
    sets: u32,
    reps: u32,
    weight: Option<f64>,
    rest_time: u32,
}

#[derive(Clone, Debug, PartialEq)]
struct WorkoutDraft {
    name: String,
    day: i32,
    exercises: Vec<ExerciseDraft>,
}

impl WorkoutDraft {
    fn numbered(day: i32) -> Self {
        Self {
            name: format!("Dag {day}"),
            day,
            exercises: Vec::new(),
        }
    }
}

/// Builder for a new program: day-numbered workouts, each with ordered
/// exercise prescriptions. Everything is edited locally and persisted with
/// sequential inserts on save.
#[component]
pub fn ProgramBuilderPage(set_view: WriteSignal<AppView>) -> impl IntoView {
    let client = expect_context::<SupabaseClient>();
    let fetch_client = client.clone();
    let (name, set_name) = create_signal(String::new());
    let (description, set_description) = create_signal(String::new());
    let (workouts, set_workouts) = create_signal(vec![WorkoutDraft::numbered(1)]);
    let (available, set_available) = create_signal(Vec::<Exercise>::new());
    let (error, set_error) = create_signal(Option::<String>::None);
    let (saving, set_saving) = create_signal(false);

    spawn_local(async move {
        let client = fetch_client;
        let Some(user) = client.current_auth_user() else {
            set_view.set(AppView::Login);
            return;
        };
        match client.fetch_exercises(&user.id).await {
            Ok(list) => set_available.set(list),
            Err(e) => log::warn!("kunde inte hämta övningsbiblioteket: {e}"),
        }
    });

    let add_workout = move |_| {
        set_workouts.update(|ws| {
            let day = ws.len() as i32 + 1;
            ws.push(WorkoutDraft::numbered(day));
        });
    };

    let add_exercise = move |widx: usize| {
        let first_id = available.get().first().map(|e| e.id.clone()).unwrap_or_default();
        set_workouts.update(|ws| {
            if let Some(w) = ws.get_mut(widx) {
                w.exercises.push(ExerciseDraft {
                    exercise_id: first_id,
                    sets: 3,
                    reps: 10,
                    weight: None,
                    rest_time: 60,
                });
            }
        });
    };

    let save = move |_| {
        let client = client.clone();
        let program_name = name.get().trim().to_string();
        if program_name.is_empty() {
            set_error.set(Some("Ge programmet ett namn".into()));
            return;
        }
        let program_description = description.get().trim().to_string();
        let drafts = workouts.get();

        set_saving.set(true);
        set_error.set(None);

        spawn_local(async move {
            let Some(user) = client.current_auth_user() else {
                set_view.set(AppView::Login);
                return;
            };

            let desc = (!program_description.is_empty()).then_some(program_description.as_str());
            let program = match client.create_program(&user.id, &program_name, desc).await {
                Ok(p) => p,
                Err(e) => {
                    set_error.set(Some(e.to_string()));
                    set_saving.set(false);
                    return;
                }
            };

            for draft in &drafts {
                let workout = match client
                    .create_workout(&program.id, &draft.name, draft.day)
                    .await
                {
                    Ok(w) => w,
                    Err(e) => {
                        set_error.set(Some(e.to_string()));
                        set_saving.set(false);
                        return;
                    }
                };

                for (i, ex) in draft.exercises.iter().enumerate() {
                    let row = NewWorkoutExercise {
                        workout_id: &workout.id,
                        exercise_id: &ex.exercise_id,
                        sets: ex.sets,
                        reps: ex.reps,
                        weight: ex.weight,
                        rest_time: ex.rest_time,
                        exercise_order: i as i32 + 1,
                    };
                    if let Err(e) = client.create_workout_exercise(&row).await {
                        set_error.set(Some(e.to_string()));
                        set_saving.set(false);
                        return;
                    }
                }
            }

            log::info!("program \"{program_name}\" skapat");
            set_view.set(AppView::Programs);
        });
    };

    view! {
        <div class="page narrow">
            <button class="back-link" on:click=move |_| set_view.set(AppView::Programs)>
                "← Tillbaka"
            </button>

            <h2 class="page-title">"Nytt program"</h2>

            {move || error.get().map(|e| view! { <div class="auth-error">{e}</div> })}

            <div class="panel">
                <input
                    type="text"
                    class="auth-input"
                    placeholder="Programnamn"
                    on:input=move |ev| set_name.set(event_target_value(&ev))
                    prop:value=name
                />
                <textarea
                    class="auth-input builder-description"
                    placeholder="Beskrivning (valfritt)"
                    on:input=move |ev| set_description.set(event_target_value(&ev))
                    prop:value=description
                />
            </div>

            {move || {
                let exercise_options = available.get();
                workouts.get().into_iter().enumerate().map(|(widx, draft)| {
                    let exercise_options = exercise_options.clone();
                    view! {
                        <div class="panel workout-panel">
                            <div class="workout-panel-head">
                                <input
                                    type="text"
                                    class="auth-input workout-name-input"
                                    prop:value=draft.name.clone()
                                    on:input=move |ev| {
                                        let v = event_target_value(&ev);
                                        set_workouts.update(|ws| {
                                            if let Some(w) = ws.get_mut(widx) { w.name = v.clone(); }
                                        });
                                    }
                                />
                                <button class="remove-btn" on:click=move |_| {
                                    set_workouts.update(|ws| {
                                        if ws.len() > 1 { ws.remove(widx); }
                                    });
                                }>"Ta bort"</button>
                            </div>

                            {draft.exercises.iter().enumerate().map(|(eidx, ex)| {
                                let selected_id = ex.exercise_id.clone();
                                let weight_text = ex.weight.map(|w| w.to_string()).unwrap_or_default();
                                view! {
                                    <div class="exercise-row">
                                        <select
                                            class="exercise-select"
                                            on:change=move |ev| {
                                                let v = event_target_value(&ev);
                                                set_workouts.update(|ws| {
                                                    if let Some(e) = ws.get_mut(widx).and_then(|w| w.exercises.get_mut(eidx)) {
                                                        e.exercise_id = v.clone();
                                                    }
                                                });
                                            }
                                        >
                                            {exercise_options.iter().map(|opt| {
                                                let is_selected = opt.id == selected_id;
                                                view! {
                                                    <option value=opt.id.clone() selected=is_selected>
                                                        {opt.name.clone()}
                                                    </option>
                                                }
                                            }).collect_view()}
                                        </select>

                                        <label class="field-label">"Set"
                                            <input type="number" class="num-input" prop:value=ex.sets.to_string()
                                                on:input=move |ev| {
                                                    let v: u32 = event_target_value(&ev).parse().unwrap_or(3);
                                                    set_workouts.update(|ws| {
                                                        if let Some(e) = ws.get_mut(widx).and_then(|w| w.exercises.get_mut(eidx)) {
                                                            e.sets = v.max(1);
                                                        }
                                                    });
                                                }
                                            />
                                        </label>
                                        <label class="field-label">"Reps"
                                            <input type="number" class="num-input" prop:value=ex.reps.to_string()
                                                on:input=move |ev| {
                                                    let v: u32 = event_target_value(&ev).parse().unwrap_or(10);
                                                    set_workouts.update(|ws| {
                                                        if let Some(e) = ws.get_mut(widx).and_then(|w| w.exercises.get_mut(eidx)) {
                                                            e.reps = v.max(1);
                                                        }
                                                    });
                                                }
                                            />
                                        </label>
                                        <label class="field-label">"Vikt (kg)"
                                            <input type="number" step="0.5" class="num-input" prop:value=weight_text
                                                on:input=move |ev| {
                                                    let v = event_target_value(&ev);
                                                    set_workouts.update(|ws| {
                                                        if let Some(e) = ws.get_mut(widx).and_then(|w| w.exercises.get_mut(eidx)) {
                                                            e.weight = v.parse().ok();
                                                        }
                                                    });
                                                }
                                            />
                                        </label>
                                        <label class="field-label">"Vila (s)"
                                            <input type="number" class="num-input" prop:value=ex.rest_time.to_string()
                                                on:input=move |ev| {
                                                    let v: u32 = event_target_value(&ev).parse().unwrap_or(60);
                                                    set_workouts.update(|ws| {
                                                        if let Some(e) = ws.get_mut(widx).and_then(|w| w.exercises.get_mut(eidx)) {
                                                            e.rest_time = v;
                                                        }
                                                    });
                                                }
                                            />
                                        </label>

                                        <button class="remove-btn" on:click=move |_| {
                                            set_workouts.update(|ws| {
                                                if let Some(w) = ws.get_mut(widx) {
                                                    if eidx < w.exercises.len() { w.exercises.remove(eidx); }
                                                }
                                            });
                                        }>"✕"</button>
                                    </div>
                                }
                            }).collect_view()}

                            <button class="secondary-btn" on:click=move |_| add_exercise(widx)>
                                "Lägg till övning"
                            </button>
                        </div>
                    }
                }).collect_view()
            }}

            <div class="builder-actions">
                <button class="secondary-btn" on:click=add_workout>"Lägg till pass"</button>
                <button class="primary-btn" on:click=save disabled=move || saving.get()>
                    {move || if saving.get() { "Sparar..." } else { "Spara program" }}
                </button>
            </div>
        </div>
    }
}
