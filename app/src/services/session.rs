use std::rc::Rc;

use chrono::Utc;
use drowsy_dashboard_shared::{
    auth::{AuthEvent, Session},
    identity::restore_session,
    subscription::{Cancellation, Subscription},
};
use gloo::{
    events::EventListener,
    storage::{LocalStorage, Storage},
};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::StorageEvent;
use yew::Callback;

use super::http::IdentityToolkit;

const SESSION_KEY: &str = "drowsy-dashboard.session";

pub(crate) fn stored_session() -> Option<Session> {
    LocalStorage::get(SESSION_KEY).ok()
}

pub(crate) fn store_session(session: &Session) {
    if let Err(error) = LocalStorage::set(SESSION_KEY, session) {
        log::warn!("could not persist session: {error}");
    }
}

pub(crate) fn clear_session() {
    LocalStorage::delete(SESSION_KEY);
}

/// Reports the restored session once, then every session change made by
/// another tab.
pub(crate) fn observe_auth_state(
    identity: Rc<IdentityToolkit>,
    on_change: Callback<AuthEvent>,
) -> Subscription {
    let cancellation = Cancellation::default();

    let restoring = cancellation.clone();
    let initial = on_change.clone();
    spawn_local(async move {
        let restore = async {
            let restored =
                restore_session(identity.as_ref(), stored_session(), Utc::now()).await;
            match &restored {
                Some(session) => store_session(session),
                None => clear_session(),
            }
            restored
        };
        restoring
            .complete(restore, |restored| initial.emit(AuthEvent::Restored(restored)))
            .await;
    });

    let listener = EventListener::new(&gloo::utils::window(), "storage", move |event| {
        let changed_key = event
            .dyn_ref::<StorageEvent>()
            .and_then(StorageEvent::key);
        // a cleared storage reports no key at all
        if changed_key.as_deref().map_or(true, |key| key == SESSION_KEY) {
            on_change.emit(AuthEvent::Restored(stored_session()));
        }
    });

    cancellation.guard(move || drop(listener))
}
