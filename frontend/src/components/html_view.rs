use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct RawHtmlProps {
    pub html: AttrValue,
    #[prop_or_default]
    pub class: Classes,
}

/// Renders backend supplied markup as-is inside a wrapper `div`.
#[function_component(RawHtml)]
pub fn raw_html(props: &RawHtmlProps) -> Html {
    let node = web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.create_element("div").ok());

    match node {
        Some(element) => {
            element.set_inner_html(&props.html);
            element.set_class_name(&props.class.to_string());
            Html::VRef(element.into())
        }
        None => {
            log::error!("no document available to render analysis markup");
            html! {}
        }
    }
}
