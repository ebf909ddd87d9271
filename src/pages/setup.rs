use leptos::*;

use crate::routing::resolve_destination;
use crate::supabase::SupabaseClient;
use crate::types::{AppView, Profile, UserRole};

/// Profile setup after the first sign-in: pick a role, set a display name,
/// and for athletes redeem the coach's invitation token.
#[component]
pub fn Setup(
    set_view: WriteSignal<AppView>,
    set_profile: WriteSignal<Option<Profile>>,
) -> impl IntoView {
    let client = expect_context::<SupabaseClient>();
    let (full_name, set_full_name) = create_signal(String::new());
    let (role, set_role) = create_signal(Option::<UserRole>::None);
    let (token, set_token) = create_signal(String::new());
    let (error, set_error) = create_signal(Option::<String>::None);
    let (saving, set_saving) = create_signal(false);

    let submit = move |_| {
        let client = client.clone();
        let name = full_name.get().trim().to_string();
        let Some(picked_role) = role.get() else {
            set_error.set(Some("Välj en roll".into()));
            return;
        };
        if name.is_empty() {
            set_error.set(Some("Fyll i ditt namn".into()));
            return;
        }
        let token = token.get().trim().to_string();
        if picked_role.trains() && token.is_empty() {
            set_error.set(Some("Atleter behöver en inbjudningskod från sin coach".into()));
            return;
        }

        set_saving.set(true);
        set_error.set(None);

        spawn_local(async move {
            let Some(user) = client.current_auth_user() else {
                set_view.set(AppView::Login);
                return;
            };

            let invitation = if token.is_empty() {
                None
            } else {
                match client.find_usable_invitation(&token).await {
                    Ok(Some(inv)) => Some(inv),
                    Ok(None) => {
                        set_error.set(Some("Ogiltig eller utgången inbjudningskod".into()));
                        set_saving.set(false);
                        return;
                    }
                    Err(e) => {
                        set_error.set(Some(e.to_string()));
                        set_saving.set(false);
                        return;
                    }
                }
            };

            if let Err(e) = client.upsert_profile(&user, &name, picked_role).await {
                set_error.set(Some(e.to_string()));
                set_saving.set(false);
                return;
            }

            if let Some(inv) = invitation {
                if let Err(e) = client.link_coach_athlete(&inv.coach_id, &user.id).await {
                    set_error.set(Some(e.to_string()));
                    set_saving.set(false);
                    return;
                }
                if let Err(e) = client.mark_invitation_used(&inv.token, &user.id).await {
                    log::warn!("kunde inte markera inbjudan som använd: {e}");
                }
            }

            if picked_role.trains() {
                if let Err(e) = client.seed_athlete_stats(&user.id).await {
                    log::warn!("kunde inte skapa statistikrad: {e}");
                }
            }

            let profile = Profile {
                id: user.id.clone(),
                email: user.email.clone(),
                full_name: Some(name),
                role: Some(picked_role),
            };
            set_profile.set(Some(profile.clone()));
            set_view.set(resolve_destination(Some(&user), Some(&profile)).into_view());
        });
    };

    let role_button = move |value: UserRole, title: &'static str, subtitle: &'static str| {
        let class = move || {
            if role.get() == Some(value) {
                "role-option selected"
            } else {
                "role-option"
            }
        };
        view! {
            <button class=class on:click=move |_| set_role.set(Some(value))>
                <span class="role-title">{title}</span>
                <span class="role-subtitle">{subtitle}</span>
            </button>
        }
    };

    view! {
        <div class="auth-container">
            <div class="auth-logo">"IRONCOACH"</div>
            <div class="auth-card setup-card">
                <h2 class="auth-title">"Välkommen!"</h2>
                <p class="setup-intro">"Berätta vem du är så ordnar vi resten."</p>

                {move || error.get().map(|e| view! { <div class="auth-error">{e}</div> })}

                <input
                    type="text"
                    class="auth-input"
                    placeholder="Fullständigt namn"
                    on:input=move |ev| set_full_name.set(event_target_value(&ev))
                    prop:value=full_name
                />

                <div class="role-picker">
                    {role_button(UserRole::Coach, "Coach", "Bygg program och följ dina atleter")}
                    {role_button(UserRole::Athlete, "Atlet", "Kör pass och logga dina set")}
                    {role_button(UserRole::Both, "Båda", "Coacha andra och träna själv")}
                </div>

                {move || {
                    let needs_token = role.get().map(|r| r.trains()).unwrap_or(false);
                    needs_token.then(|| view! {
                        <div class="token-field">
                            <input
                                type="text"
                                class="auth-input"
                                placeholder="Inbjudningskod från din coach"
                                on:input=move |ev| set_token.set(event_target_value(&ev))
                                prop:value=token
                            />
                            <p class="token-hint">"Be din coach om en kod för att kopplas ihop"</p>
                        </div>
                    })
                }}

                <button
                    class="auth-button"
                    on:click=submit
                    disabled=move || saving.get()
                >
                    {move || if saving.get() { "Sparar..." } else { "Slutför" }}
                </button>
            </div>
        </div>
    }
}
