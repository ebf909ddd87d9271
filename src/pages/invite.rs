use leptos::*;

use crate::supabase::SupabaseClient;
use crate::types::AppView;

/// Generates a share token an athlete redeems during profile setup.
#[component]
pub fn InvitePage(set_view: WriteSignal<AppView>) -> impl IntoView {
    let (token, set_token) = create_signal(Option::<String>::None);
    let (error, set_error) = create_signal(Option::<String>::None);
    let (loading, set_loading) = create_signal(false);
    let (copied, set_copied) = create_signal(false);

    let generate = move |_| {
        let client = expect_context::<SupabaseClient>();
        set_loading.set(true);
        set_error.set(None);
        spawn_local(async move {
            let Some(user) = client.current_auth_user() else {
                set_view.set(AppView::Login);
                return;
            };
            match client.create_invitation(&user.id).await {
                Ok(inv) => set_token.set(Some(inv.token)),
                Err(e) => set_error.set(Some(e.to_string())),
            }
            set_loading.set(false);
        });
    };

    let copy = move |_| {
        if let Some(t) = token.get() {
            if let Some(window) = web_sys::window() {
                let _ = window.navigator().clipboard().write_text(&t);
            }
            set_copied.set(true);
            gloo_timers::callback::Timeout::new(2000, move || set_copied.set(false)).forget();
        }
    };

    view! {
        <div class="page narrow">
            <button class="back-link" on:click=move |_| set_view.set(AppView::CoachHome)>
                "← Tillbaka"
            </button>

            <div class="panel">
                <h2 class="page-title">"Bjud in en atlet"</h2>
                <p class="page-subtitle">
                    "Skapa en inbjudningskod och dela den med din atlet. Koden gäller i 7 dagar."
                </p>

                {move || error.get().map(|e| view! { <div class="auth-error">{e}</div> })}

                {move || match token.get() {
                    None => view! {
                        <button class="primary-btn" on:click=generate disabled=move || loading.get()>
                            {move || if loading.get() { "Skapar..." } else { "Skapa inbjudningskod" }}
                        </button>
                    }.into_view(),
                    Some(t) => view! {
                        <div class="invite-result">
                            <div class="invite-token-row">
                                <code class="invite-token">{t}</code>
                                <button class="secondary-btn" on:click=copy>
                                    {move || if copied.get() { "Kopierad!" } else { "Kopiera" }}
                                </button>
                            </div>
                            <p class="invite-hint">
                                "Atleten anger koden när hen sätter upp sitt konto, så kopplas ni ihop."
                            </p>
                            <button class="secondary-btn" on:click=move |_| set_token.set(None)>
                                "Skapa en till"
                            </button>
                        </div>
                    }.into_view(),
                }}
            </div>
        </div>
    }
}
