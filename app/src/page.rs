use patternfly_yew::prelude::*;
use yew::prelude::*;

#[derive(Clone, Debug, Properties, PartialEq)]
pub struct Props {
    pub title: AttrValue,
    #[prop_or_default]
    pub subtitle: Option<AttrValue>,
    #[prop_or_default]
    pub children: Children,
}

/// Titled page body; every child becomes its own section.
#[function_component(Page)]
pub fn page(props: &Props) -> Html {
    html! (
        <PageSectionGroup>
            <PageSection
                r#type={PageSectionType::Default}
                variant={PageSectionVariant::Light}
                limit_width=true
                sticky={[PageSectionSticky::Top]}
            >
                <Content>
                    <Title size={Size::XXLarge}>
                        { props.title.clone() }
                    </Title>
                    if let Some(subtitle) = &props.subtitle {
                        <p>{ subtitle.clone() }</p>
                    }
                </Content>
            </PageSection>

            { for props.children.iter().map(|child|{
                html!(<PageSection limit_width=true>{child}</PageSection>)
            })}
        </PageSectionGroup>
    )
}
