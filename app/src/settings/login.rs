use patternfly_yew::prelude::*;
use web_sys::HtmlInputElement;
use yew::prelude::*;

#[derive(Clone, PartialEq, Properties)]
pub(crate) struct LoginProps {
    #[prop_or_default]
    pub error: Option<String>,
    pub busy: bool,
    /// Receives `(email, password)`.
    pub onsubmit: Callback<(String, String)>,
}

#[function_component(LoginForm)]
pub(crate) fn login_form(props: &LoginProps) -> Html {
    let email = use_state(String::new);
    let password = use_state(String::new);

    let on_email = {
        let email = email.clone();
        Callback::from(move |e: InputEvent| {
            email.set(e.target_unchecked_into::<HtmlInputElement>().value())
        })
    };
    let on_password = {
        let password = password.clone();
        Callback::from(move |e: InputEvent| {
            password.set(e.target_unchecked_into::<HtmlInputElement>().value())
        })
    };
    let onsubmit = {
        let email = email.clone();
        let password = password.clone();
        let submit = props.onsubmit.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            submit.emit(((*email).clone(), (*password).clone()));
        })
    };

    html!(
        <form {onsubmit} style="max-width: 28rem;">
            <p style="color: #c9190b;">
                {"*Note: If this is the first login, you must manually create an admin user in your Firebase Console."}
            </p>
            <label for="login-email">{"Email"}</label>
            <input
                id="login-email"
                class="pf-v5-c-form-control"
                type="email"
                required=true
                value={(*email).clone()}
                oninput={on_email}
            />
            <label for="login-password">{"Password"}</label>
            <input
                id="login-password"
                class="pf-v5-c-form-control"
                type="password"
                required=true
                value={(*password).clone()}
                oninput={on_password}
            />
            if let Some(error) = &props.error {
                <Alert r#type={AlertType::Danger} title={error.clone()} inline=true />
            }
            <Button
                r#type={ButtonType::Submit}
                variant={ButtonVariant::Primary}
                label={if props.busy { "Logging in..." } else { "Login" }}
                disabled={props.busy}
                block=true
            />
        </form>
    )
}
