use std::rc::Rc;

use chrono::Utc;
use drowsy_dashboard_shared::{
    auth::{AuthEvent, AuthState},
    identity::{sign_in, IdentityProvider},
    subscription::Cancellation,
    sync::{save_settings, MissingDocument},
};
use gloo::{dialogs::alert, timers::callback::Timeout};
use patternfly_yew::prelude::*;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::{
    config::AppConfig,
    hooks::use_settings_subscription,
    page::Page,
    services::{
        session::{clear_session, observe_auth_state, store_session},
        SettingsServices,
    },
};

use self::{form::SettingsForm, login::LoginForm};

mod form;
mod login;

#[function_component(Settings)]
pub fn settings() -> Html {
    let config = use_context::<AppConfig>();
    let services = use_memo(config, |config| {
        config
            .as_ref()
            .map(|AppConfig(config)| SettingsServices::new(config.clone()))
    });

    match &*services {
        None => html!(),
        Some(Ok(services)) => html!(<AdminConsole services={services.clone()} />),
        Some(Err(error)) => html!(
            <Page title="Admin Settings">
                <Alert r#type={AlertType::Danger} title="Invalid identity provider configuration" inline=true>
                    { error.to_string() }
                </Alert>
            </Page>
        ),
    }
}

#[derive(Default, PartialEq)]
struct AuthMachine(AuthState);

impl Reducible for AuthMachine {
    type Action = AuthEvent;

    fn reduce(self: Rc<Self>, event: AuthEvent) -> Rc<Self> {
        let next = self.0.clone().apply(event);
        if next != self.0 {
            log::debug!(
                "auth state: ready={}, logged in={}",
                next.is_ready(),
                next.session().is_some()
            );
        }
        Rc::new(AuthMachine(next))
    }
}

#[derive(Clone, PartialEq, Properties)]
struct ConsoleProps {
    services: SettingsServices,
}

#[function_component(AdminConsole)]
fn admin_console(props: &ConsoleProps) -> Html {
    let services = props.services.clone();
    let auth = use_reducer(AuthMachine::default);
    let signing_in = use_state_eq(|| false);
    let saving = use_state_eq(|| false);

    {
        let auth = auth.clone();
        use_effect_with(services.identity.clone(), move |identity| {
            let subscription = observe_auth_state(
                identity.clone(),
                Callback::from(move |event| auth.dispatch(event)),
            );
            move || drop(subscription)
        });
    }

    let session = auth.0.session().cloned();

    // id tokens are short lived, exchange the refresh token shortly before expiry
    {
        let auth = auth.clone();
        let identity = services.identity.clone();
        use_effect_with(session.clone(), move |session| {
            let refresh = session.clone().map(|session| {
                let cancellation = Cancellation::default();
                let running = cancellation.clone();
                let delay = session.refresh_delay(Utc::now()).as_millis();
                let timer = Timeout::new(u32::try_from(delay).unwrap_or(u32::MAX), move || {
                    spawn_local(async move {
                        let refreshed = identity.refresh(&session).await;
                        if running.is_cancelled() {
                            return;
                        }
                        match refreshed {
                            Ok(refreshed) => {
                                store_session(&refreshed);
                                auth.dispatch(AuthEvent::SignedIn(refreshed));
                            }
                            Err(error) => {
                                log::warn!("could not refresh session: {error}");
                                clear_session();
                                auth.dispatch(AuthEvent::SignedOut);
                            }
                        }
                    });
                });
                cancellation.guard(move || drop(timer))
            });
            move || drop(refresh)
        });
    }

    let store = {
        let services = services.clone();
        use_memo(session.clone(), move |session| {
            session
                .as_ref()
                .map(|session| Rc::new(services.settings_store(session)))
        })
    };

    let settings = use_settings_subscription(
        (*store).clone(),
        services.settings_document().clone(),
        MissingDocument::CreateWithDefaults,
        services.config.settings_refresh_interval_ms,
    );

    let on_login = {
        let auth = auth.clone();
        let identity = services.identity.clone();
        let signing_in = signing_in.clone();
        Callback::from(move |(email, password): (String, String)| {
            if *signing_in {
                return;
            }
            signing_in.set(true);
            let auth = auth.clone();
            let identity = identity.clone();
            let signing_in = signing_in.clone();
            spawn_local(async move {
                let event = sign_in(identity.as_ref(), &email, &password).await;
                if let AuthEvent::SignedIn(session) = &event {
                    store_session(session);
                }
                signing_in.set(false);
                auth.dispatch(event);
            });
        })
    };

    let on_logout = {
        let auth = auth.clone();
        Callback::from(move |()| {
            clear_session();
            auth.dispatch(AuthEvent::SignedOut);
        })
    };

    let on_change = {
        let settings = settings.clone();
        Callback::from(move |updated| settings.set(updated))
    };

    let on_save = {
        let store = store.clone();
        let settings = settings.clone();
        let saving = saving.clone();
        let path = services.settings_document().clone();
        Callback::from(move |()| {
            let Some(store) = (*store).clone() else {
                return;
            };
            if *saving {
                return;
            }
            saving.set(true);
            let current = (*settings).clone();
            let saving = saving.clone();
            let path = path.clone();
            spawn_local(async move {
                match save_settings(store.as_ref(), &path, &current).await {
                    Ok(()) => alert("Settings saved successfully! Backend will use these instantly."),
                    Err(error) => {
                        log::error!("error saving settings: {error}");
                        alert("Failed to save settings.");
                    }
                }
                saving.set(false);
            });
        })
    };

    match &auth.0 {
        AuthState::Initializing => html!(
            <Page title="Admin Settings">
                <p>{"Initializing security components..."}</p>
            </Page>
        ),
        AuthState::LoggedOut { error } => html!(
            <Page title="Admin Login">
                <LoginForm error={error.clone()} busy={*signing_in} onsubmit={on_login} />
            </Page>
        ),
        AuthState::LoggedIn(session) => html!(
            <Page
                title="System Alert Configuration"
                subtitle={AttrValue::from(format!("Logged in as Admin ({})", session.email))}
            >
                <SettingsForm
                    settings={(*settings).clone()}
                    sounds_path={services.config.sounds_path.clone()}
                    saving={*saving}
                    onchange={on_change}
                    onsave={on_save}
                    onlogout={on_logout}
                />
            </Page>
        ),
    }
}
