use drowsy_dashboard_shared::{
    settings::AlertSettings,
    subscription::{Cancellation, Subscription},
    sync::{SettingsListener, SettingsStore},
};
use gloo::timers::{callback::Interval, future::TimeoutFuture};
use wasm_bindgen_futures::spawn_local;
use yew::Callback;

/// Runs `tick` right away and then every `period_ms` until the returned
/// subscription is dropped. Work spawned by a tick publishes its result
/// through [`Cancellation::complete`] so nothing lands after teardown.
pub(crate) fn repeat(period_ms: u32, mut tick: impl FnMut(Cancellation) + 'static) -> Subscription {
    let cancellation = Cancellation::default();
    tick(cancellation.clone());

    let ticking = cancellation.clone();
    let interval = Interval::new(period_ms, move || tick(ticking.clone()));
    cancellation.guard(move || drop(interval))
}

/// Delivers the settings document to `on_update` whenever it changes.
pub(crate) fn listen_settings<S>(
    listener: SettingsListener<S>,
    refresh_ms: u32,
    on_update: Callback<AlertSettings>,
) -> Subscription
where
    S: SettingsStore + ?Sized + 'static,
{
    let cancellation = listener.cancellation();
    spawn_local(listener.run(
        move || TimeoutFuture::new(refresh_ms),
        move |settings| on_update.emit(settings),
    ));
    cancellation.guard(|| ())
}
