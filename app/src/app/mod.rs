use crate::config::{fetch_config, AppConfig};
use crate::settings::Settings;
use crate::status::Status;
use patternfly_yew::prelude::*;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yew_hooks::use_effect_once;
use yew_nested_router::prelude::{Switch as RouterSwitch, *};
use yew_nested_router::Target;

#[derive(Debug, Default, Clone, PartialEq, Eq, Target)]
pub enum AppRoute {
    #[default]
    #[target(index)]
    Status,
    Settings,
}

#[derive(Clone, Debug, PartialEq)]
enum ConfigState {
    Loading,
    Ready(AppConfig),
    Failed(String),
}

#[function_component(Application)]
pub fn app() -> Html {
    let config = use_state_eq(|| ConfigState::Loading);

    {
        let config = config.clone();
        use_effect_once(move || {
            spawn_local(async move {
                match fetch_config().await {
                    Ok(loaded) => config.set(ConfigState::Ready(loaded)),
                    Err(error) => {
                        log::error!("could not load dashboard configuration: {error}");
                        config.set(ConfigState::Failed(error.to_string()));
                    }
                }
            });
            || ()
        });
    }

    match &*config {
        ConfigState::Loading => html!(<p>{"Loading configuration..."}</p>),
        ConfigState::Failed(error) => html!(
            <Alert r#type={AlertType::Danger} title="Dashboard is not configured" inline=true>
                { error.clone() }
            </Alert>
        ),
        ConfigState::Ready(loaded) => html! {
            <ContextProvider<AppConfig> context={loaded.clone()}>
                <Router<AppRoute> default={AppRoute::Status}>
                    <RouterSwitch<AppRoute> render={switch_app_route} />
                </Router<AppRoute>>
            </ContextProvider<AppConfig>>
        },
    }
}

fn switch_app_route(target: AppRoute) -> Html {
    match target {
        AppRoute::Status => html! {<AppPage><Status/></AppPage>},
        AppRoute::Settings => html! {<AppPage><Settings/></AppPage>},
    }
}

#[derive(Clone, Debug, PartialEq, Properties)]
pub struct PageProps {
    pub children: Children,
}

#[function_component(AppPage)]
fn page(props: &PageProps) -> Html {
    let sidebar = html_nested! {
        <PageSidebar>
                <Nav>
                    <NavList>
                        <NavRouterItem<AppRoute> to={AppRoute::Status}>{"Live Status"}</NavRouterItem<AppRoute>>
                        <NavRouterItem<AppRoute> to={AppRoute::Settings}>{"Admin Settings"}</NavRouterItem<AppRoute>>
                    </NavList>
                </Nav>
        </PageSidebar>
    };

    let brand = html! (
        <MastheadBrand>
            <h1>{"Drowsiness Detection System"}</h1>
        </MastheadBrand>
    );

    html! (
        <Page {brand} {sidebar} >
            { for props.children.iter() }
        </Page>
    )
}
