use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::api;
use crate::components::banner::{Banner, Notice};
use crate::components::icons::icon_plus;
use crate::components::layout::page_shell;
use crate::components::upload::BillUpload;
use crate::models::{parse_amount, parse_day, ExpenseType, NewExpense, NewExpenseType, OcrReading};
use crate::pages::{
    bind_input, bind_select, loading_row, use_expense_types, use_session, Load, CARD_CLASS,
    INPUT_CLASS, PRIMARY_BUTTON, SECONDARY_BUTTON,
};

/// Validated entry form, ready to post.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct EntryForm {
    pub rate_per_unit: f64,
    pub quantity: f64,
    pub date: String,
}

pub(crate) fn validate_entry(rate: &str, units: &str, date: &str) -> Result<EntryForm, &'static str> {
    if rate.trim().is_empty() || units.trim().is_empty() || date.trim().is_empty() {
        return Err("Please fill in all required fields.");
    }
    let rate_per_unit = parse_amount(rate).ok_or("Rate per unit must be a non-negative number.")?;
    let quantity = parse_amount(units).ok_or("Units consumed must be a non-negative number.")?;
    let day = parse_day(date).ok_or("Please pick a valid date.")?;
    Ok(EntryForm {
        rate_per_unit,
        quantity,
        date: day.format("%Y-%m-%d").to_string(),
    })
}

/// Input handler that drops edits which would make the field a negative or
/// non-numeric value.
pub(crate) fn bind_amount(state: &UseStateHandle<String>) -> Callback<InputEvent> {
    let state = state.clone();
    Callback::from(move |e: InputEvent| {
        let input: HtmlInputElement = e.target_unchecked_into();
        let value = input.value();
        if value.is_empty() || parse_amount(&value).is_some() {
            state.set(value);
        } else {
            input.set_value(&state);
        }
    })
}

#[function_component(UtilitiesPage)]
pub fn utilities_page() -> Html {
    let session = use_session();
    let refresh = use_state(|| 0u32);
    let types = use_expense_types(session.clone(), *refresh);
    let selected_id = use_state(String::new);
    let show_add = use_state(|| false);
    let new_type = use_state(String::new);
    let notice = use_state(|| None::<Notice>);

    let can_add = session
        .as_ref()
        .map(|s| s.can_manage_expense_types())
        .unwrap_or(false);

    let type_list: Vec<ExpenseType> = types.ready().cloned().unwrap_or_default();
    let selected = type_list
        .iter()
        .find(|t| t.expense_type_id == *selected_id)
        .cloned();

    let on_toggle_add = {
        let show_add = show_add.clone();
        Callback::from(move |_| show_add.set(!*show_add))
    };

    let on_add_type = {
        let session = session.clone();
        let new_type = new_type.clone();
        let show_add = show_add.clone();
        let notice = notice.clone();
        let refresh = refresh.clone();
        Callback::from(move |_| {
            let name = new_type.trim().to_string();
            if name.is_empty() {
                notice.set(Some(Notice::error("Please enter an expense type name.")));
                return;
            }
            let Some(session) = session.clone() else {
                notice.set(Some(Notice::error("Please sign in again.")));
                return;
            };
            let new_type = new_type.clone();
            let show_add = show_add.clone();
            let notice = notice.clone();
            let refresh = refresh.clone();
            spawn_local(async move {
                match api::add_expense_type(&session, &NewExpenseType::custom(&name)).await {
                    Ok(()) => {
                        log::info!("added expense type {}", name);
                        notice.set(Some(Notice::success("Expense type added successfully.")));
                        new_type.set(String::new());
                        show_add.set(false);
                        refresh.set(*refresh + 1);
                    }
                    Err(err) => notice.set(Some(Notice::error(
                        err.user_message("Failed to add expense type."),
                    ))),
                }
            });
        })
    };

    let actions = if can_add {
        html! {
            <button class={PRIMARY_BUTTON} onclick={on_toggle_add}>
                { icon_plus() }
                { if *show_add { "Close" } else { "Add Expense Type" } }
            </button>
        }
    } else {
        html! {}
    };

    let picker = match &types {
        Load::Loading => loading_row("Loading utility types..."),
        Load::Failed(message) => html! { <Banner notice={Some(Notice::error(message.clone()))} /> },
        Load::Ready(list) => html! {
            <div class={CARD_CLASS}>
                <label class="text-[12px] font-bold text-muted-foreground">{"Utility Type"}</label>
                <select class={INPUT_CLASS} onchange={bind_select(&selected_id)}>
                    <option value="" selected={selected.is_none()}>{"Select a utility type"}</option>
                    { for list.iter().map(|t| html! {
                        <option value={t.expense_type_id.clone()} selected={*selected_id == t.expense_type_id}>{ t.name.clone() }</option>
                    }) }
                </select>
            </div>
        },
    };

    html! {
        { page_shell(
            "Utility Management",
            actions,
            html! {
                <>
                    <Banner notice={(*notice).clone()} />
                    if *show_add && can_add {
                        <div class={CARD_CLASS}>
                            <h4 class="text-[#1D617A] font-bold text-[15px] mb-3">{"New Expense Type"}</h4>
                            <div class="flex gap-3">
                                <input type="text" placeholder="e.g. Internet" class={INPUT_CLASS} value={(*new_type).clone()} oninput={bind_input(&new_type)} />
                                <button class={PRIMARY_BUTTON} onclick={on_add_type}>{"Save"}</button>
                            </div>
                        </div>
                    }
                    { picker }
                    <EntrySection expense_type={selected} />
                </>
            }
        ) }
    }
}

#[derive(Properties, PartialEq)]
struct EntrySectionProps {
    expense_type: Option<ExpenseType>,
}

#[function_component(EntrySection)]
fn entry_section(props: &EntrySectionProps) -> Html {
    let session = use_session();
    let rate = use_state(String::new);
    let units = use_state(String::new);
    let date = use_state(String::new);
    let notes = use_state(String::new);
    let notice = use_state(|| None::<Notice>);
    let saving = use_state(|| false);
    let upload_reset = use_state(|| 0u32);

    let disabled = props.expense_type.is_none();
    let type_name = props
        .expense_type
        .as_ref()
        .map(|t| t.name.clone())
        .unwrap_or_else(|| "Utility".to_string());

    let on_reading = {
        let rate = rate.clone();
        let units = units.clone();
        let date = date.clone();
        let notes = notes.clone();
        Callback::from(move |reading: OcrReading| {
            if let Some(value) = reading.rate_per_unit {
                rate.set(value.to_string());
            }
            if let Some(value) = reading.units_consumed {
                units.set(value.to_string());
            }
            date.set(reading.date.format("%Y-%m-%d").to_string());
            notes.set(reading.notes);
        })
    };

    let clear_form = {
        let rate = rate.clone();
        let units = units.clone();
        let date = date.clone();
        let notes = notes.clone();
        let upload_reset = upload_reset.clone();
        move || {
            rate.set(String::new());
            units.set(String::new());
            date.set(String::new());
            notes.set(String::new());
            upload_reset.set(*upload_reset + 1);
        }
    };

    let on_submit = {
        let clear_form = clear_form.clone();
        let expense_type = props.expense_type.clone();
        let rate = rate.clone();
        let units = units.clone();
        let date = date.clone();
        let notice = notice.clone();
        let saving = saving.clone();
        let type_name = type_name.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let form = match validate_entry(&rate, &units, &date) {
                Ok(form) => form,
                Err(msg) => {
                    notice.set(Some(Notice::error(msg)));
                    return;
                }
            };
            let Some(user_id) = session.as_ref().and_then(|s| s.user_id.clone()) else {
                notice.set(Some(Notice::error("User ID not found. Please log in again.")));
                return;
            };
            let Some(expense_type) = expense_type.clone() else {
                notice.set(Some(Notice::error("Please select a utility type first.")));
                return;
            };
            let Some(session) = session.clone() else {
                return;
            };

            let body = NewExpense {
                user_id,
                expense_type_id: expense_type.expense_type_id,
                quantity: form.quantity,
                rate_per_unit: form.rate_per_unit,
                status: 1,
                expense_for_date: form.date,
            };

            saving.set(true);
            let notice = notice.clone();
            let saving = saving.clone();
            let type_name = type_name.clone();
            let clear_form = clear_form.clone();
            spawn_local(async move {
                match api::create_expense(&session, &body).await {
                    Ok(()) => {
                        log::info!("recorded {} expense", type_name);
                        notice.set(Some(Notice::success(format!(
                            "{} expense recorded successfully.",
                            type_name
                        ))));
                        clear_form();
                    }
                    Err(err) => notice.set(Some(Notice::error(err.user_message(&format!(
                        "Failed to record {} expense.",
                        type_name.to_lowercase()
                    ))))),
                }
                saving.set(false);
            });
        })
    };

    html! {
        <div class="grid grid-cols-1 lg:grid-cols-2 gap-6">
            <BillUpload
                disabled={disabled}
                expense_type_id={props.expense_type.as_ref().map(|t| t.expense_type_id.clone())}
                on_reading={on_reading}
                reset={*upload_reset}
            />
            <form class={CARD_CLASS} onsubmit={on_submit}>
                <h4 class="text-[#1D617A] font-bold text-[15px] mb-3">{ format!("Record {} Usage", type_name) }</h4>
                <fieldset class="space-y-3" disabled={disabled}>
                    <div class="space-y-1">
                        <label class="text-[12px] font-bold text-muted-foreground">{"Rate per Unit *"}</label>
                        <input type="number" min="0" step="any" class={INPUT_CLASS} value={(*rate).clone()} oninput={bind_amount(&rate)} />
                    </div>
                    <div class="space-y-1">
                        <label class="text-[12px] font-bold text-muted-foreground">{"Units Consumed *"}</label>
                        <input type="number" min="0" step="any" class={INPUT_CLASS} value={(*units).clone()} oninput={bind_amount(&units)} />
                    </div>
                    <div class="space-y-1">
                        <label class="text-[12px] font-bold text-muted-foreground">{"Date *"}</label>
                        <input type="date" class={INPUT_CLASS} value={(*date).clone()} oninput={bind_input(&date)} />
                    </div>
                    <div class="space-y-1">
                        <label class="text-[12px] font-bold text-muted-foreground">{"Notes"}</label>
                        <textarea class={INPUT_CLASS} value={(*notes).clone()} oninput={{
                            let notes = notes.clone();
                            Callback::from(move |e: InputEvent| {
                                let input: web_sys::HtmlTextAreaElement = e.target_unchecked_into();
                                notes.set(input.value());
                            })
                        }} />
                    </div>
                    <div class="flex gap-3">
                        <button type="submit" class={classes!(PRIMARY_BUTTON, "flex-1")} disabled={*saving}>
                            { if *saving { "Saving..." } else { "Submit" } }
                        </button>
                        <button type="button" class={classes!(SECONDARY_BUTTON, "flex-1")} onclick={{
                            let clear_form = clear_form.clone();
                            Callback::from(move |_| clear_form())
                        }}>{"Clear"}</button>
                    </div>
                </fieldset>
                <div class="mt-3">
                    <Banner notice={(*notice).clone()} />
                </div>
            </form>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_needs_rate_units_and_date() {
        assert_eq!(
            validate_entry("", "10", "2024-01-01"),
            Err("Please fill in all required fields.")
        );
        assert_eq!(
            validate_entry("0.2", "10", " "),
            Err("Please fill in all required fields.")
        );
    }

    #[test]
    fn entry_rejects_negative_numbers() {
        assert_eq!(
            validate_entry("-1", "10", "2024-01-01"),
            Err("Rate per unit must be a non-negative number.")
        );
        assert_eq!(
            validate_entry("1", "abc", "2024-01-01"),
            Err("Units consumed must be a non-negative number.")
        );
    }

    #[test]
    fn entry_normalises_date() {
        let form = validate_entry("0.25", "120", "2024-03-05").unwrap();
        assert_eq!(form.quantity, 120.0);
        assert_eq!(form.rate_per_unit, 0.25);
        assert_eq!(form.date, "2024-03-05");
    }
}
