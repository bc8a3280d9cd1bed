use std::rc::Rc;

use drowsy_dashboard_shared::{
    alarm::{Alarm, AlarmInputs},
    firestore::DocumentPath,
    settings::AlertSettings,
    status::StatusView,
    sync::{poll_status, MissingDocument, SettingsListener, SettingsStore, StatusSource},
};
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlAudioElement;
use yew::prelude::*;

use crate::{
    services::audio::AudioAlarm,
    tasks::{listen_settings, repeat},
};

/// Polls `source` every `period_ms` for as long as the calling component lives.
#[hook]
pub(crate) fn use_status_poll<S>(source: Rc<S>, period_ms: u32) -> StatusView
where
    S: StatusSource + PartialEq + 'static,
{
    let view = use_state_eq(StatusView::default);
    {
        let view = view.clone();
        use_effect_with(source, move |source| {
            let source = source.clone();
            let task = repeat(period_ms, move |cancellation| {
                let source = source.clone();
                let view = view.clone();
                spawn_local(async move {
                    cancellation
                        .complete(poll_status(source.as_ref()), |polled| view.set(polled))
                        .await;
                });
            });
            move || drop(task)
        });
    }
    *view
}

/// Live copy of the settings document. `None` for the store means there is
/// nobody to read on behalf of and no subscription is held.
#[hook]
pub(crate) fn use_settings_subscription<S>(
    store: Option<Rc<S>>,
    path: DocumentPath,
    on_missing: MissingDocument,
    refresh_ms: u32,
) -> UseStateHandle<AlertSettings>
where
    S: SettingsStore + PartialEq + 'static,
{
    let settings = use_state_eq(AlertSettings::default);
    {
        let settings = settings.clone();
        use_effect_with((store, path), move |(store, path)| {
            let subscription = store.clone().map(|store| {
                let listener = SettingsListener::new(store, path.clone(), on_missing);
                listen_settings(
                    listener,
                    refresh_ms,
                    Callback::from(move |update| settings.set(update)),
                )
            });
            move || drop(subscription)
        });
    }
    settings
}

/// Drives the hidden audio element from the drowsiness state and the
/// alarm settings.
#[hook]
pub(crate) fn use_alarm(audio: NodeRef, inputs: AlarmInputs, sounds_path: String) {
    let alarm = use_mut_ref(|| Alarm::new(sounds_path));

    {
        let alarm = alarm.clone();
        let audio = audio.clone();
        use_effect_with(inputs, move |inputs| {
            if let Some(element) = audio.cast::<HtmlAudioElement>() {
                let transition = alarm
                    .borrow_mut()
                    .evaluate(*inputs, &mut AudioAlarm(element));
                log::debug!("alarm {transition:?} for {inputs:?}");
            }
            || ()
        });
    }

    use_effect_with((), move |_| {
        let element = audio.cast::<HtmlAudioElement>();
        move || {
            if let Some(element) = element {
                alarm.borrow_mut().silence(&mut AudioAlarm(element));
            }
        }
    });
}
