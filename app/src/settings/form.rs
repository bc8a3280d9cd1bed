use drowsy_dashboard_shared::settings::{AlertSettings, SoundTone};
use patternfly_yew::prelude::*;
use strum::IntoEnumIterator;
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

#[derive(Clone, PartialEq, Properties)]
pub(crate) struct FormProps {
    pub settings: AlertSettings,
    pub sounds_path: String,
    pub saving: bool,
    pub onchange: Callback<AlertSettings>,
    pub onsave: Callback<()>,
    pub onlogout: Callback<()>,
}

#[function_component(SettingsForm)]
pub(crate) fn settings_form(props: &FormProps) -> Html {
    let settings = props.settings.clone();

    let update = |apply: fn(&mut AlertSettings, Event)| {
        let settings = settings.clone();
        let onchange = props.onchange.clone();
        Callback::from(move |e: Event| {
            let mut updated = settings.clone();
            apply(&mut updated, e);
            onchange.emit(updated);
        })
    };

    let on_email_enabled = update(|s, e| s.email_enabled = checked(&e));
    let on_sound_enabled = update(|s, e| s.sound_enabled = checked(&e));
    let on_tone = update(|s, e| {
        let value = e.target_unchecked_into::<HtmlSelectElement>().value();
        match value.parse::<SoundTone>() {
            Ok(tone) => s.sound_tone = tone,
            Err(_) => log::warn!("ignoring unknown tone selection '{value}'"),
        }
    });
    let on_emergency_email = {
        let settings = settings.clone();
        let onchange = props.onchange.clone();
        Callback::from(move |e: InputEvent| {
            let mut updated = settings.clone();
            updated.emergency_email = e.target_unchecked_into::<HtmlInputElement>().value();
            onchange.emit(updated);
        })
    };
    let on_save = props.onsave.reform(|_: MouseEvent| ());
    let on_logout = props.onlogout.reform(|_: MouseEvent| ());

    let preview = settings.sound_tone.asset_path(&props.sounds_path);

    html!(
        <>
            <Button variant={ButtonVariant::Link} label="Logout" onclick={on_logout} />

            <section>
                <Title level={Level::H3}>{"Email Alert Settings (Backend Action)"}</Title>
                <label>
                    <input type="checkbox" checked={settings.email_enabled} onchange={on_email_enabled} />
                    {" Enable Email Alerts on Drowsiness"}
                </label>
                <label for="emergency-email">{"Emergency Email Address:"}</label>
                <input
                    id="emergency-email"
                    class="pf-v5-c-form-control"
                    type="email"
                    placeholder="e.g., fleetmanager@safety.com"
                    value={settings.emergency_email.clone()}
                    oninput={on_emergency_email}
                />
            </section>

            <section>
                <Title level={Level::H3}>{"Audible Alert Settings (Frontend Action)"}</Title>
                <label>
                    <input type="checkbox" checked={settings.sound_enabled} onchange={on_sound_enabled} />
                    {" Enable Audible Alarm in Browser"}
                </label>
                <label for="alarm-tone">{"Alarm Tone:"}</label>
                <select id="alarm-tone" class="pf-v5-c-form-control" onchange={on_tone}>
                    { for SoundTone::iter().map(|tone| html!(
                        <option
                            key={tone.to_string()}
                            value={tone.to_string()}
                            selected={tone == settings.sound_tone}
                        >
                            { tone.to_caption() }
                        </option>
                    )) }
                </select>
                <p><small>{ format!("Test tone (requires {preview}):") }</small></p>
                <audio key={preview.clone()} controls=true src={preview.clone()} />
            </section>

            <Button
                variant={ButtonVariant::Primary}
                label={if props.saving { "Saving..." } else { "Save Configuration" }}
                disabled={props.saving}
                block=true
                onclick={on_save}
            />
            <p><small>
                {"*Note: The 'Call' feature requires a paid third-party API (like Twilio) and is not implemented here."}
            </small></p>
        </>
    )
}

fn checked(e: &Event) -> bool {
    e.target_unchecked_into::<HtmlInputElement>().checked()
}
