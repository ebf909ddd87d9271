use leptos::*;

use crate::app::{format_message_time, AthleteNav, CoachNav};
use crate::supabase::SupabaseClient;
use crate::types::{AppView, Message, Profile};

/// Conversations between a coach and their athletes. Coaches pick a partner
/// from the roster; athletes get their coach preselected.
#[component]
pub fn MessagesPage(
    set_view: WriteSignal<AppView>,
    profile: ReadSignal<Option<Profile>>,
) -> impl IntoView {
    let client = expect_context::<SupabaseClient>();
    let my_id = client
        .current_auth_user()
        .map(|u| u.id)
        .unwrap_or_default();
    let (partners, set_partners) = create_signal(Vec::<Profile>::new());
    let (selected, set_selected) = create_signal(Option::<String>::None);
    let (messages, set_messages) = create_signal(Vec::<Message>::new());
    let (draft, set_draft) = create_signal(String::new());
    let (sending, set_sending) = create_signal(false);

    // Partner list depends on which side of the relation we are on.
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

            let ids: Vec<String> = if is_coach {
                match client.fetch_coach_athletes(&user.id).await {
                    Ok(links) => links.into_iter().map(|l| l.athlete_id).collect(),
                    Err(e) => {
                        log::warn!("kunde inte hämta atletlistan: {e}");
                        return;
                    }
                }
            } else {
                match client.fetch_coach_of(&user.id).await {
                    Ok(Some(link)) => vec![link.coach_id],
                    Ok(None) => Vec::new(),
                    Err(e) => {
                        log::warn!("kunde inte hämta coachkopplingen: {e}");
                        return;
                    }
                }
            };

            match client.fetch_profiles_by_ids(&ids).await {
                Ok(profiles) => {
                    if selected.get().is_none() {
                        set_selected.set(profiles.first().map(|p| p.id.clone()));
                    }
                    set_partners.set(profiles);
                }
                Err(e) => log::warn!("kunde inte hämta samtalspartners: {e}"),
            }
        });
    });

    // Reload the conversation whenever the partner changes.
    create_effect(move |_| {
        let Some(partner_id) = selected.get() else {
            set_messages.set(Vec::new());
            return;
        };
        let client = expect_context::<SupabaseClient>();
        spawn_local(async move {
            let Some(user) = client.current_auth_user() else {
                return;
            };
            match client.fetch_conversation(&user.id, &partner_id).await {
                Ok(list) => set_messages.set(list),
                Err(e) => log::warn!("kunde inte hämta meddelanden: {e}"),
            }
        });
    });

    let send_client = client.clone();
    let send = move |_| {
        let client = send_client.clone();
        let content = draft.get().trim().to_string();
        let Some(partner_id) = selected.get() else {
            return;
        };
        if content.is_empty() || sending.get() {
            return;
        }
        set_sending.set(true);
        spawn_local(async move {
            let Some(user) = client.current_auth_user() else {
                set_sending.set(false);
                return;
            };
            match client.send_message(&user.id, &partner_id, &content).await {
                Ok(msg) => {
                    set_messages.update(|ms| ms.push(msg));
                    set_draft.set(String::new());
                }
                Err(e) => log::warn!("kunde inte skicka meddelandet: {e}"),
            }
            set_sending.set(false);
        });
    };

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
                view! { <CoachNav set_view=set_view active="messages" /> }.into_view()
            } else {
                view! { <AthleteNav set_view=set_view active="messages" /> }.into_view()
            }}

            <div class="page-header">
                <h2 class="page-title">"Meddelanden"</h2>
            </div>

            <div class="messages-layout">
                <div class="partner-list">
                    <h3 class="section-title">{move || if is_coach() { "Atleter" } else { "Coach" }}</h3>
                    {move || {
                        let list = partners.get();
                        if list.is_empty() {
                            return view! { <p class="empty-text">"Ingen att skriva till ännu"</p> }.into_view();
                        }
                        list.into_iter().map(|p| {
                            let id = p.id.clone();
                            let class = move || {
                                if selected.get().as_deref() == Some(id.as_str()) {
                                    "partner-item selected"
                                } else {
                                    "partner-item"
                                }
                            };
                            let pick = p.id.clone();
                            view! {
                                <button class=class on:click=move |_| set_selected.set(Some(pick.clone()))>
                                    <span class="partner-name">{p.display_name().to_string()}</span>
                                    <span class="partner-email">{p.email.clone()}</span>
                                </button>
                            }
                        }).collect_view().into_view()
                    }}
                </div>

                <div class="conversation">
                    {move || {
                        let list = messages.get();
                        if list.is_empty() {
                            return view! {
                                <div class="empty-state">
                                    <p class="empty-text">"Inga meddelanden ännu. Säg hej!"</p>
                                </div>
                            }.into_view();
                        }
                        let me = my_id.clone();
                        list.into_iter().map(|m| {
                            let class = if m.sender_id == me {
                                "message-bubble sent"
                            } else {
                                "message-bubble received"
                            };
                            view! {
                                <div class=class>
                                    <p class="message-content">{m.content.clone()}</p>
                                    <span class="message-time">{format_message_time(&m.created_at)}</span>
                                </div>
                            }
                        }).collect_view().into_view()
                    }}

                    <div class="composer">
                        <textarea
                            class="composer-input"
                            placeholder="Skriv ett meddelande..."
                            prop:value=draft
                            on:input=move |ev| set_draft.set(event_target_value(&ev))
                            disabled=move || sending.get()
                        />
                        <button
                            class="primary-btn"
                            on:click=send
                            disabled=move || sending.get() || draft.get().trim().is_empty()
                        >
                            {move || if sending.get() { "Skickar..." } else { "Skicka" }}
                        </button>
                    </div>
                </div>
            </div>
        </div>
    }
}
