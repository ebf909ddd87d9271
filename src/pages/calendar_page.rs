use chrono::Datelike;
use leptos::*;

use crate::app::{format_day, today_naive, AthleteNav};
use crate::calendar::{build_month_grid, upcoming_events, MonthCursor, WEEKDAYS};
use crate::supabase::SupabaseClient;
use crate::types::{AppView, CalendarEvent};

/// Month view over the athlete's calendar events plus the next few upcoming.
#[component]
pub fn CalendarPage(set_view: WriteSignal<AppView>) -> impl IntoView {
    let today = today_naive();
    let client = expect_context::<SupabaseClient>();
    let (cursor, set_cursor) = create_signal(MonthCursor::new(today.year(), today.month()));
    let (events, set_events) = create_signal(Vec::<CalendarEvent>::new());
    let (loading, set_loading) = create_signal(true);

    spawn_local(async move {
        let Some(user) = client.current_auth_user() else {
            set_view.set(AppView::Login);
            return;
        };
        match client.fetch_calendar_events(&user.id).await {
            Ok(list) => set_events.set(list),
            Err(e) => log::warn!("kunde inte hämta kalendern: {e}"),
        }
        set_loading.set(false);
    });

    view! {
        <div class="page">
            <AthleteNav set_view=set_view active="calendar" />

            <div class="page-header">
                <h2 class="page-title">"Kalender"</h2>
            </div>

            <div class="panel calendar-panel">
                <div class="calendar-head">
                    <button class="secondary-btn" on:click=move |_| set_cursor.update(|c| *c = c.previous())>
                        "← Föregående"
                    </button>
                    <span class="calendar-title">{move || cursor.get().title()}</span>
                    <button class="secondary-btn" on:click=move |_| set_cursor.update(|c| *c = c.next())>
                        "Nästa →"
                    </button>
                </div>

                <div class="calendar-weekdays">
                    {WEEKDAYS.iter().map(|d| view! { <span class="calendar-weekday">{*d}</span> }).collect_view()}
                </div>

                <div class="calendar-grid">
                    {move || {
                        let grid = build_month_grid(cursor.get(), &events.get(), today_naive());
                        grid.cells.into_iter().map(|cell| match cell {
                            None => view! { <div class="calendar-cell empty"></div> }.into_view(),
                            Some(cell) => {
                                let class = if cell.is_today { "calendar-cell today" } else { "calendar-cell" };
                                view! {
                                    <div class=class>
                                        <span class="calendar-day-num">{cell.day}</span>
                                        {cell.events.into_iter().map(|e| {
                                            let chip_class = format!("event-chip {}", e.event_type.css_class());
                                            view! { <span class=chip_class title=e.title.clone()>{e.title.clone()}</span> }
                                        }).collect_view()}
                                    </div>
                                }.into_view()
                            }
                        }).collect_view()
                    }}
                </div>

                <div class="calendar-legend">
                    <span class="legend-item"><span class="legend-dot event-program"></span>"Program"</span>
                    <span class="legend-item"><span class="legend-dot event-competition"></span>"Tävling"</span>
                    <span class="legend-item"><span class="legend-dot event-holiday"></span>"Ledighet"</span>
                    <span class="legend-item"><span class="legend-dot event-other"></span>"Övrigt"</span>
                </div>
            </div>

            <h3 class="section-title">"Kommande"</h3>
            {move || {
                if loading.get() {
                    return view! { <div class="loading">"Laddar händelser..."</div> }.into_view();
                }
                let upcoming = upcoming_events(&events.get(), today_naive(), 5);
                if upcoming.is_empty() {
                    view! {
                        <div class="empty-state"><p class="empty-text">"Inget inplanerat"</p></div>
                    }.into_view()
                } else {
                    upcoming.into_iter().map(|e| {
                        let description = e.description.clone();
                        view! {
                            <div class="upcoming-event">
                                <div class="upcoming-event-info">
                                    <span class="upcoming-event-title">{e.title.clone()}</span>
                                    {description.map(|d| view! { <span class="upcoming-event-desc">{d}</span> })}
                                </div>
                                <div class="upcoming-event-meta">
                                    <span class="upcoming-event-date">{format_day(e.event_date)}</span>
                                    <span class="upcoming-event-kind">{e.event_type.label()}</span>
                                </div>
                            </div>
                        }
                    }).collect_view()
                }
            }}
        </div>
    }
}
