use yew::prelude::*;

#[derive(Clone, Debug, PartialEq)]
pub enum Notice {
    Success(String),
    Error(String),
}

impl Notice {
    pub fn error(text: impl Into<String>) -> Self {
        Notice::Error(text.into())
    }

    pub fn success(text: impl Into<String>) -> Self {
        Notice::Success(text.into())
    }
}

#[derive(Properties, PartialEq)]
pub struct BannerProps {
    pub notice: Option<Notice>,
}

#[function_component(Banner)]
pub fn banner(props: &BannerProps) -> Html {
    match &props.notice {
        Some(Notice::Error(text)) => html! {
            <div class="rounded-[10px] border border-red-200 bg-red-50 px-4 py-3 text-sm text-red-600">{ text.clone() }</div>
        },
        Some(Notice::Success(text)) => html! {
            <div class="rounded-[10px] border border-green-200 bg-green-50 px-4 py-3 text-sm text-green-700">{ text.clone() }</div>
        },
        None => html! {},
    }
}
