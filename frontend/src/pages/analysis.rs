use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::analysis::{error_message, interpret, AnalysisOutcome, SIGN_IN_MESSAGE, UNAVAILABLE_MESSAGE};
use crate::api;
use crate::auth::AuthSession;
use crate::components::html_view::RawHtml;
use crate::components::layout::page_shell;
use crate::pages::{loading_row, use_session, CARD_CLASS, PRIMARY_BUTTON};

#[derive(Clone, Debug, PartialEq)]
enum AnalysisState {
    Loading,
    Ready(String),
    Empty,
    Failed(&'static str),
}

#[function_component(AnalysisPage)]
pub fn analysis_page() -> Html {
    let session = use_session();
    let state = use_state(|| AnalysisState::Loading);
    let reload = use_state(|| 0u32);

    {
        let state = state.clone();
        use_effect_with_deps(
            move |(session, _): &(Option<AuthSession>, u32)| {
                match session.clone() {
                    Some(session) => {
                        state.set(AnalysisState::Loading);
                        spawn_local(async move {
                            let next = match api::fetch_analysis(&session).await {
                                Ok(raw) => match interpret(&raw) {
                                    AnalysisOutcome::Ready(html) => AnalysisState::Ready(html),
                                    AnalysisOutcome::Empty => AnalysisState::Empty,
                                    AnalysisOutcome::Unavailable => {
                                        AnalysisState::Failed(UNAVAILABLE_MESSAGE)
                                    }
                                },
                                Err(err) => {
                                    log::error!("AI analysis request failed: {}", err);
                                    AnalysisState::Failed(error_message(&err))
                                }
                            };
                            state.set(next);
                        });
                    }
                    None => state.set(AnalysisState::Failed(SIGN_IN_MESSAGE)),
                }
                || ()
            },
            (session, *reload),
        );
    }

    let on_reload = {
        let reload = reload.clone();
        Callback::from(move |_| reload.set(*reload + 1))
    };

    let body = match &*state {
        AnalysisState::Loading => loading_row("Analyzing your utility data..."),
        AnalysisState::Ready(html) => html! {
            <div class={CARD_CLASS}>
                <RawHtml html={html.clone()} class={classes!("prose", "max-w-none", "text-sm")} />
            </div>
        },
        AnalysisState::Empty => html! {
            <div class={CARD_CLASS}>
                <p class="text-sm text-muted-foreground">{"No analysis data available. Record a few expenses and check back."}</p>
            </div>
        },
        AnalysisState::Failed(message) => html! {
            <div class="rounded-[10px] border border-yellow-200 bg-yellow-50 px-4 py-3 text-sm text-yellow-800">{ *message }</div>
        },
    };

    page_shell(
        "AI Analysis",
        html! {
            <button class={PRIMARY_BUTTON} disabled={*state == AnalysisState::Loading} onclick={on_reload}>{"Refresh"}</button>
        },
        body,
    )
}
