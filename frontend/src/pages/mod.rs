use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

use crate::api;
use crate::auth::{AuthContext, AuthSession};
use crate::error::ApiError;
use crate::models::{Expense, ExpenseType};

pub mod analysis;
pub mod auth;
pub mod dashboard;
pub mod expenses;
pub mod plans;
pub mod properties;
pub mod utilities;

/// State of a list fetched when a page mounts.
#[derive(Clone, Debug, PartialEq)]
pub enum Load<T> {
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> Load<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            Load::Ready(value) => Some(value),
            _ => None,
        }
    }
}

#[hook]
pub fn use_session() -> Option<AuthSession> {
    use_context::<AuthContext>().and_then(|auth| (*auth).clone())
}

#[hook]
pub fn use_expenses(session: Option<AuthSession>) -> Load<Vec<Expense>> {
    let state = use_state(|| Load::Loading);
    {
        let state = state.clone();
        use_effect_with_deps(
            move |session: &Option<AuthSession>| {
                match session.clone() {
                    Some(session) => spawn_local(async move {
                        match api::fetch_expenses(&session).await {
                            Ok(list) => {
                                log::debug!("loaded {} expenses", list.len());
                                state.set(Load::Ready(list));
                            }
                            Err(err) => {
                                log::error!("could not load expenses: {}", err);
                                state.set(Load::Failed(
                                    err.user_message("Could not load your expenses."),
                                ));
                            }
                        }
                    }),
                    None => state.set(Load::Failed(ApiError::MissingSession.user_message(""))),
                }
                || ()
            },
            session,
        );
    }
    (*state).clone()
}

/// Active expense types. `refresh` is bumped to reload after an insert.
#[hook]
pub fn use_expense_types(session: Option<AuthSession>, refresh: u32) -> Load<Vec<ExpenseType>> {
    let state = use_state(|| Load::Loading);
    {
        let state = state.clone();
        use_effect_with_deps(
            move |(session, _): &(Option<AuthSession>, u32)| {
                match session.clone() {
                    Some(session) => spawn_local(async move {
                        match api::fetch_expense_types(&session).await {
                            Ok(list) => state.set(Load::Ready(list)),
                            Err(err) => {
                                log::error!("could not load expense types: {}", err);
                                state.set(Load::Failed(
                                    err.user_message("Could not load utility types."),
                                ));
                            }
                        }
                    }),
                    None => state.set(Load::Failed(ApiError::MissingSession.user_message(""))),
                }
                || ()
            },
            (session, refresh),
        );
    }
    (*state).clone()
}

pub fn bind_input(state: &UseStateHandle<String>) -> Callback<InputEvent> {
    let state = state.clone();
    Callback::from(move |e: InputEvent| {
        let input: HtmlInputElement = e.target_unchecked_into();
        state.set(input.value());
    })
}

pub fn bind_select(state: &UseStateHandle<String>) -> Callback<Event> {
    let state = state.clone();
    Callback::from(move |e: Event| {
        let select: HtmlSelectElement = e.target_unchecked_into();
        state.set(select.value());
    })
}

pub fn loading_row(text: &'static str) -> Html {
    html! { <p class="text-sm text-muted-foreground text-center py-10">{ text }</p> }
}

pub const INPUT_CLASS: &str =
    "w-full bg-[#f1f4f9] rounded-[10px] px-3 py-2 text-[12px] text-[#173E63] border-none";
pub const CARD_CLASS: &str = "bg-card rounded-[10px] p-6 border border-border";
pub const PRIMARY_BUTTON: &str =
    "bg-[#173E63] text-white px-4 py-2 rounded-[10px] text-xs font-bold flex items-center justify-center gap-2";
pub const SECONDARY_BUTTON: &str =
    "bg-[#B2CBDE] text-[#173E63] px-4 py-2 rounded-[10px] text-xs font-bold flex items-center justify-center gap-2";
