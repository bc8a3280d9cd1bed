use crate::{
    app::AppRoute,
    config::AppConfig,
    hooks::{use_alarm, use_settings_subscription, use_status_poll},
    page::Page,
    services::StatusServices,
};
use drowsy_dashboard_shared::{
    alarm::AlarmInputs,
    status::{Connection, StatusView},
    sync::MissingDocument,
};
use patternfly_yew::prelude::*;
use yew::prelude::*;
use yew_nested_router::components::Link;

#[function_component(Status)]
pub fn status() -> Html {
    let config = use_context::<AppConfig>();
    let services = use_memo(config, |config| {
        config
            .as_ref()
            .map(|AppConfig(config)| StatusServices::new(config.clone()))
    });

    match &*services {
        None => html!(),
        Some(Ok(services)) => html!(<StatusBoard services={services.clone()} />),
        Some(Err(error)) => html!(
            <Page title="Drowsiness Detection System">
                <Alert r#type={AlertType::Danger} title="Invalid backend configuration" inline=true>
                    { error.to_string() }
                </Alert>
            </Page>
        ),
    }
}

#[derive(Clone, PartialEq, Properties)]
struct BoardProps {
    services: StatusServices,
}

#[function_component(StatusBoard)]
fn status_board(props: &BoardProps) -> Html {
    let StatusServices {
        config,
        video_feed_url,
        status,
        settings,
    } = props.services.clone();

    let view = use_status_poll(status, config.status_poll_interval_ms);
    let alert_settings = use_settings_subscription(
        Some(settings),
        config.settings_document.clone(),
        MissingDocument::UseDefaults,
        config.settings_refresh_interval_ms,
    );

    let audio = use_node_ref();
    use_alarm(
        audio.clone(),
        AlarmInputs::new(&view, &alert_settings),
        config.sounds_path.clone(),
    );

    let feed = use_video_feed(view.connection);

    let panel_style = if view.is_drowsy {
        "background: #c9190b; color: #fff; padding: 1.5rem; border-radius: 0.75rem;"
    } else {
        "background: #f3faf2; color: #1e4f18; padding: 1.5rem; border-radius: 0.75rem;"
    };
    let frame_style = if view.is_drowsy {
        "border: 8px solid #c9190b; border-radius: 0.75rem; overflow: hidden; max-width: 656px;"
    } else {
        "border: 8px solid #d2d2d2; border-radius: 0.75rem; overflow: hidden; max-width: 656px;"
    };

    html!(
        <Page title="Drowsiness Detection System">
            <>
                <Link<AppRoute> target={AppRoute::Settings}>{"(Go to Admin Settings)"}</Link<AppRoute>>

                <audio ref={audio} preload="auto" />

                <div style={frame_style}>
                    <img
                        key={feed.epoch.to_string()}
                        src={video_feed_url.to_string()}
                        alt="Live Video Feed"
                        width="640"
                        height="480"
                        style="display: block; width: 100%; height: auto;"
                        onerror={feed.on_error}
                    />
                </div>
                if feed.failed {
                    <Alert r#type={AlertType::Warning} title="Video feed unavailable" inline=true />
                }
            </>
            <div style={panel_style}>
                <StatusHeadline view={view} />
                <hr />
                <p>{ format!("EAR Value: {}", view.ear_caption()) }</p>
                <p>{ format!("Alert Sound: {}", alert_settings.sound_caption()) }</p>
                <p><small><i>{ format!("* Backend Email Alert: {}", alert_settings.email_caption()) }</i></small></p>
            </div>
        </Page>
    )
}

#[derive(Clone, PartialEq, Properties)]
struct HeadlineProps {
    view: StatusView,
}

#[function_component(StatusHeadline)]
fn status_headline(props: &HeadlineProps) -> Html {
    html!(
        <div style="display: flex; justify-content: space-between; font-size: 1.25rem; font-weight: bold;">
            <span>{ props.view.headline() }</span>
            <span>{ props.view.indicator() }</span>
        </div>
    )
}

struct VideoFeed {
    epoch: u32,
    failed: bool,
    on_error: Callback<Event>,
}

/// Tracks load failures of the MJPEG stream and re-keys the image once the
/// backend answers again, which makes the browser reconnect.
#[hook]
fn use_video_feed(connection: Connection) -> VideoFeed {
    let epoch = use_state_eq(|| 0u32);
    let failed = use_state_eq(|| false);
    let previous = use_mut_ref(|| connection);

    {
        let epoch = epoch.clone();
        let failed = failed.clone();
        use_effect_with(connection, move |connection| {
            let was = std::mem::replace(&mut *previous.borrow_mut(), *connection);
            if was == Connection::Offline && *connection == Connection::Online {
                log::info!("backend is back, reconnecting video feed");
                epoch.set(*epoch + 1);
                failed.set(false);
            }
            || ()
        });
    }

    let on_error = {
        let failed = failed.clone();
        Callback::from(move |_: Event| failed.set(true))
    };

    VideoFeed {
        epoch: *epoch,
        failed: *failed,
        on_error,
    }
}
