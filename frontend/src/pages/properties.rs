use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlSelectElement;
use yew::prelude::*;

use crate::api;
use crate::auth::AuthSession;
use crate::components::banner::{Banner, Notice};
use crate::components::icons::{icon_building, icon_plus, icon_search};
use crate::components::layout::page_shell;
use crate::format::{format_currency, format_day_or_na, format_timestamp_day, CURRENCY_SYMBOL};
use crate::models::{
    address_type_label, parse_day, parse_timestamp, Address, AddressExpense, NewAddress,
    NewAddressExpense,
};
use crate::pages::utilities::{bind_amount, validate_entry};
use crate::pages::{
    bind_input, bind_select, loading_row, use_expense_types, use_session, Load, CARD_CLASS,
    INPUT_CLASS, PRIMARY_BUTTON,
};

const ADD_NEW: &str = "add_new";
const ADDRESS_TYPES: [i32; 6] = [0, 1, 2, 3, 4, 5];

fn validate_address(
    name: &str,
    complete: &str,
    description: &str,
    kind: &str,
) -> Result<NewAddress, &'static str> {
    let (name, complete) = (name.trim(), complete.trim());
    if name.is_empty() || complete.is_empty() {
        return Err("Please enter Address Name and Complete Address.");
    }
    Ok(NewAddress {
        address_name: name.to_string(),
        complete_address: complete.to_string(),
        description: description.trim().to_string(),
        address_type: kind.parse().unwrap_or(0),
        status: 1,
    })
}

#[hook]
fn use_addresses(session: Option<AuthSession>, refresh: u32) -> Load<Vec<Address>> {
    let state = use_state(|| Load::Loading);
    {
        let state = state.clone();
        use_effect_with_deps(
            move |(session, _): &(Option<AuthSession>, u32)| {
                if let Some(session) = session.clone() {
                    spawn_local(async move {
                        match api::fetch_addresses(&session).await {
                            Ok(list) => state.set(Load::Ready(list)),
                            Err(err) => {
                                log::error!("could not load addresses: {}", err);
                                state.set(Load::Failed(
                                    "Failed to load addresses. Please try again.".to_string(),
                                ));
                            }
                        }
                    });
                }
                || ()
            },
            (session, refresh),
        );
    }
    (*state).clone()
}

#[hook]
fn use_address_expenses(session: Option<AuthSession>, refresh: u32) -> Load<Vec<AddressExpense>> {
    let state = use_state(|| Load::Loading);
    {
        let state = state.clone();
        use_effect_with_deps(
            move |(session, _): &(Option<AuthSession>, u32)| {
                if let Some(session) = session.clone() {
                    spawn_local(async move {
                        match api::fetch_address_expenses(&session).await {
                            Ok(list) => state.set(Load::Ready(list)),
                            Err(err) => {
                                log::error!("could not load property expenses: {}", err);
                                state.set(Load::Failed(
                                    "Failed to load expense overview. Please try again.".to_string(),
                                ));
                            }
                        }
                    });
                }
                || ()
            },
            (session, refresh),
        );
    }
    (*state).clone()
}

#[function_component(PropertiesPage)]
pub fn properties_page() -> Html {
    let session = use_session();
    let is_company = session.as_ref().map(|s| s.is_company()).unwrap_or(false);
    let address_refresh = use_state(|| 0u32);
    let expense_refresh = use_state(|| 0u32);
    let addresses = use_addresses(session.clone(), *address_refresh);
    let expenses = use_address_expenses(session.clone(), *expense_refresh);
    let types = use_expense_types(session.clone(), 0);

    let selected_address = use_state(String::new);
    let selected_type = use_state(String::new);
    let show_add = use_state(|| false);
    let notice = use_state(|| None::<Notice>);

    if !is_company {
        return page_shell(
            "Property Management",
            html! {},
            html! { <Banner notice={Some(Notice::error("Property management is available on the Company plan."))} /> },
        );
    }

    let on_toggle_add = {
        let show_add = show_add.clone();
        Callback::from(move |_| show_add.set(!*show_add))
    };

    let on_address_change = {
        let selected_address = selected_address.clone();
        let show_add = show_add.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            let value = select.value();
            if value == ADD_NEW {
                show_add.set(true);
                selected_address.set(String::new());
            } else {
                selected_address.set(value);
            }
        })
    };

    let on_address_added = {
        let selected_address = selected_address.clone();
        let show_add = show_add.clone();
        let address_refresh = address_refresh.clone();
        let notice = notice.clone();
        Callback::from(move |(name, id): (String, Option<String>)| {
            notice.set(Some(Notice::success(format!("Address '{}' added successfully.", name))));
            show_add.set(false);
            address_refresh.set(*address_refresh + 1);
            if let Some(id) = id {
                selected_address.set(id);
            }
        })
    };

    let on_expense_added = {
        let expense_refresh = expense_refresh.clone();
        let notice = notice.clone();
        Callback::from(move |date: String| {
            notice.set(Some(Notice::success(format!("Expense recorded for {} successfully.", date))));
            expense_refresh.set(*expense_refresh + 1);
        })
    };

    let on_failure = {
        let notice = notice.clone();
        Callback::from(move |message: String| notice.set(Some(Notice::error(message))))
    };

    let known_addresses: Vec<Address> = addresses.ready().cloned().unwrap_or_default();
    let type_list = types.ready().cloned().unwrap_or_default();
    let enabled = !selected_address.is_empty() && !selected_type.is_empty();

    let pickers = html! {
        <div class={CARD_CLASS}>
            <div class="grid grid-cols-1 md:grid-cols-2 gap-4">
                <div class="space-y-1">
                    <label class="text-[12px] font-bold text-muted-foreground">{"Address"}</label>
                    <select class={INPUT_CLASS} onchange={on_address_change}>
                        <option value="" selected={selected_address.is_empty()}>{"Select an address"}</option>
                        { for known_addresses.iter().map(|a| html! {
                            <option value={a.address_id.clone()} selected={*selected_address == a.address_id}>
                                { format!("{} ({})", a.address_name, a.type_label()) }
                            </option>
                        }) }
                        <option value={ADD_NEW}>{"+ Add new address"}</option>
                    </select>
                </div>
                <div class="space-y-1">
                    <label class="text-[12px] font-bold text-muted-foreground">{"Expense Type"}</label>
                    <select class={INPUT_CLASS} onchange={bind_select(&selected_type)}>
                        <option value="" selected={selected_type.is_empty()}>{"Select expense type"}</option>
                        { for type_list.iter().map(|t| html! {
                            <option value={t.expense_type_id.clone()} selected={*selected_type == t.expense_type_id}>{ t.name.clone() }</option>
                        }) }
                    </select>
                </div>
            </div>
        </div>
    };

    page_shell(
        "Property Management",
        html! {
            <button class={PRIMARY_BUTTON} onclick={on_toggle_add}>
                { icon_plus() }
                { if *show_add { "Close" } else { "Add Address" } }
            </button>
        },
        html! {
            <>
                <Banner notice={(*notice).clone()} />
                if *show_add {
                    <AddressForm on_added={on_address_added} on_failure={on_failure.clone()} />
                }
                { pickers }
                <AddressExpenseForm
                    address_id={(*selected_address).clone()}
                    expense_type_id={(*selected_type).clone()}
                    enabled={enabled}
                    on_added={on_expense_added}
                    on_failure={on_failure}
                />
                <AddressList addresses={addresses} />
                <ExpenseOverview expenses={expenses} />
            </>
        },
    )
}

#[derive(Properties, PartialEq)]
struct AddressFormProps {
    on_added: Callback<(String, Option<String>)>,
    on_failure: Callback<String>,
}

#[function_component(AddressForm)]
fn address_form(props: &AddressFormProps) -> Html {
    let session = use_session();
    let name = use_state(String::new);
    let complete = use_state(String::new);
    let description = use_state(String::new);
    let kind = use_state(|| "0".to_string());
    let saving = use_state(|| false);

    let on_save = {
        let name = name.clone();
        let complete = complete.clone();
        let description = description.clone();
        let kind = kind.clone();
        let saving = saving.clone();
        let on_added = props.on_added.clone();
        let on_failure = props.on_failure.clone();
        Callback::from(move |_| {
            let address = match validate_address(&name, &complete, &description, &kind) {
                Ok(address) => address,
                Err(msg) => {
                    on_failure.emit(msg.to_string());
                    return;
                }
            };
            let Some(session) = session.clone() else {
                on_failure.emit("Please sign in again.".to_string());
                return;
            };
            saving.set(true);
            let name = name.clone();
            let complete = complete.clone();
            let description = description.clone();
            let saving = saving.clone();
            let on_added = on_added.clone();
            let on_failure = on_failure.clone();
            spawn_local(async move {
                match api::add_address(&session, &address).await {
                    Ok(created) => {
                        log::info!("added address {}", address.address_name);
                        name.set(String::new());
                        complete.set(String::new());
                        description.set(String::new());
                        on_added.emit((address.address_name, created.address_id));
                    }
                    Err(err) => {
                        log::error!("could not add address: {}", err);
                        on_failure.emit(err.user_message("Failed to add address. Please try again."));
                    }
                }
                saving.set(false);
            });
        })
    };

    html! {
        <div class={CARD_CLASS}>
            <h4 class="text-[#1D617A] font-bold text-[15px] mb-3">{"New Address"}</h4>
            <div class="grid grid-cols-1 md:grid-cols-2 gap-3">
                <input type="text" placeholder="Enter address name" class={INPUT_CLASS} value={(*name).clone()} oninput={bind_input(&name)} />
                <input type="text" placeholder="Enter complete address" class={INPUT_CLASS} value={(*complete).clone()} oninput={bind_input(&complete)} />
                <input type="text" placeholder="Enter address description (optional)" class={INPUT_CLASS} value={(*description).clone()} oninput={bind_input(&description)} />
                <select class={INPUT_CLASS} onchange={bind_select(&kind)}>
                    { for ADDRESS_TYPES.iter().map(|k| html! {
                        <option value={k.to_string()} selected={*kind == k.to_string()}>{ address_type_label(*k) }</option>
                    }) }
                </select>
            </div>
            <div class="flex justify-end mt-3">
                <button class={PRIMARY_BUTTON} disabled={*saving} onclick={on_save}>
                    { if *saving { "Saving..." } else { "Save Address" } }
                </button>
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct AddressExpenseFormProps {
    address_id: String,
    expense_type_id: String,
    enabled: bool,
    on_added: Callback<String>,
    on_failure: Callback<String>,
}

#[function_component(AddressExpenseForm)]
fn address_expense_form(props: &AddressExpenseFormProps) -> Html {
    let session = use_session();
    let rate = use_state(String::new);
    let units = use_state(String::new);
    let date = use_state(String::new);
    let saving = use_state(|| false);

    {
        let rate = rate.clone();
        let units = units.clone();
        let date = date.clone();
        use_effect_with_deps(
            move |enabled: &bool| {
                if !*enabled {
                    rate.set(String::new());
                    units.set(String::new());
                    date.set(String::new());
                }
                || ()
            },
            props.enabled,
        );
    }

    let on_submit = {
        let rate = rate.clone();
        let units = units.clone();
        let date = date.clone();
        let saving = saving.clone();
        let address_id = props.address_id.clone();
        let expense_type_id = props.expense_type_id.clone();
        let enabled = props.enabled;
        let on_added = props.on_added.clone();
        let on_failure = props.on_failure.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if !enabled {
                on_failure.emit("Please select an address and an expense type first".to_string());
                return;
            }
            let form = match validate_entry(&rate, &units, &date) {
                Ok(form) => form,
                Err(msg) => {
                    on_failure.emit(msg.to_string());
                    return;
                }
            };
            let Some(session) = session.clone() else {
                on_failure.emit("Please sign in again.".to_string());
                return;
            };
            let body = NewAddressExpense {
                expense_type_id: expense_type_id.clone(),
                address_id: address_id.clone(),
                status: 1,
                quantity: form.quantity,
                rate_per_unit: form.rate_per_unit,
                expense_for_date: form.date,
            };

            saving.set(true);
            let rate = rate.clone();
            let units = units.clone();
            let date = date.clone();
            let saving = saving.clone();
            let on_added = on_added.clone();
            let on_failure = on_failure.clone();
            spawn_local(async move {
                match api::add_address_expense(&session, &body).await {
                    Ok(()) => {
                        rate.set(String::new());
                        units.set(String::new());
                        date.set(String::new());
                        on_added.emit(body.expense_for_date);
                    }
                    Err(err) => {
                        log::error!("could not record property expense: {}", err);
                        on_failure.emit(err.user_message("Failed to process location. Please try again."));
                    }
                }
                saving.set(false);
            });
        })
    };

    html! {
        <form class={CARD_CLASS} onsubmit={on_submit}>
            <h4 class="text-[#1D617A] font-bold text-[15px] mb-3">{"Record Property Expense"}</h4>
            <fieldset class="grid grid-cols-1 md:grid-cols-3 gap-3" disabled={!props.enabled}>
                <input type="number" min="0" step="any" placeholder="Enter rate" class={INPUT_CLASS} value={(*rate).clone()} oninput={bind_amount(&rate)} />
                <input type="number" min="0" step="any" placeholder="Enter units" class={INPUT_CLASS} value={(*units).clone()} oninput={bind_amount(&units)} />
                <input type="date" class={INPUT_CLASS} value={(*date).clone()} oninput={bind_input(&date)} />
            </fieldset>
            <div class="flex justify-end gap-3 mt-3">
                <button type="submit" class={PRIMARY_BUTTON} disabled={!props.enabled || *saving}>
                    { if *saving { "Saving..." } else { "Submit" } }
                </button>
            </div>
        </form>
    }
}

#[derive(Properties, PartialEq)]
struct AddressListProps {
    addresses: Load<Vec<Address>>,
}

#[function_component(AddressList)]
fn address_list(props: &AddressListProps) -> Html {
    match &props.addresses {
        Load::Loading => loading_row("Loading addresses..."),
        Load::Failed(message) => html! { <Banner notice={Some(Notice::error(message.clone()))} /> },
        Load::Ready(list) if list.is_empty() => html! {
            <div class={CARD_CLASS}>
                <p class="text-sm text-muted-foreground">{"No addresses yet. Add your first property to start tracking its expenses."}</p>
            </div>
        },
        Load::Ready(list) => html! {
            <div class="grid grid-cols-1 md:grid-cols-3 gap-4">
                { for list.iter().map(|a| html! {
                    <div key={a.address_id.clone()} class={CARD_CLASS}>
                        <div class="flex items-center gap-3">
                            <span class="text-[#1D617A]">{ icon_building() }</span>
                            <h4 class="font-bold text-foreground">{ a.address_name.clone() }</h4>
                        </div>
                        <p class="text-sm text-muted-foreground mt-2">{ a.complete_address.clone() }</p>
                        <div class="flex items-center justify-between mt-3 text-[11px] text-muted-foreground">
                            <span class="bg-secondary text-secondary-foreground px-3 py-1 rounded-full font-bold">{ a.type_label() }</span>
                            <span>{ format_timestamp_day(a.created_date.as_deref().and_then(parse_timestamp)) }</span>
                        </div>
                    </div>
                }) }
            </div>
        },
    }
}

#[derive(Properties, PartialEq)]
struct ExpenseOverviewProps {
    expenses: Load<Vec<AddressExpense>>,
}

#[function_component(ExpenseOverview)]
fn expense_overview(props: &ExpenseOverviewProps) -> Html {
    let search = use_state(String::new);

    let rows = match &props.expenses {
        Load::Loading => html! {
            <tr><td colspan="4" class="px-8 py-6 text-center text-muted-foreground">{"Loading expense data..."}</td></tr>
        },
        Load::Failed(message) => html! {
            <tr><td colspan="4" class="px-8 py-6 text-center text-red-600">{ message.clone() }</td></tr>
        },
        Load::Ready(list) => {
            let visible: Vec<&AddressExpense> = list.iter().filter(|e| e.matches(&search)).collect();
            if visible.is_empty() {
                let text = if search.trim().is_empty() {
                    "No expense data recorded yet."
                } else {
                    "No expenses match your search."
                };
                html! { <tr><td colspan="4" class="px-8 py-6 text-center text-muted-foreground">{ text }</td></tr> }
            } else {
                html! {
                    <>
                    { for visible.iter().enumerate().map(|(idx, item)| html! {
                        <tr key={item.user_address_expense_id.clone().unwrap_or_else(|| idx.to_string())} class="text-sm hover:bg-muted/40 transition-colors">
                            <td class="px-8 py-4 text-foreground font-medium">{ item.address_name.clone().unwrap_or_else(|| "N/A".to_string()) }</td>
                            <td class="px-8 py-4">
                                <span class="bg-secondary text-secondary-foreground px-3 py-1 rounded-full text-[10px] font-bold">
                                    { item.expense_type_name.clone().unwrap_or_else(|| "N/A".to_string()) }
                                </span>
                            </td>
                            <td class="px-8 py-4 text-center font-semibold text-foreground">
                                { item.total_cost.map(|c| format_currency(c, CURRENCY_SYMBOL)).unwrap_or_else(|| "N/A".to_string()) }
                            </td>
                            <td class="px-8 py-4 text-right text-muted-foreground">
                                { format_day_or_na(item.expense_for_date.as_deref().and_then(parse_day)) }
                            </td>
                        </tr>
                    }) }
                    </>
                }
            }
        }
    };

    html! {
        <div class="bg-card rounded-2xl shadow-md border border-border overflow-hidden">
            <div class="p-5 border-b border-border flex items-center justify-between gap-4">
                <h3 class="font-bold text-foreground">{"Expense Overview"}</h3>
                <div class="flex items-center gap-2 bg-[#f1f4f9] rounded-[10px] px-3 w-64">
                    { icon_search() }
                    <input type="text" placeholder="Search expenses..." class="w-full bg-transparent py-2 text-[12px] border-none" value={(*search).clone()} oninput={bind_input(&search)} />
                </div>
            </div>
            <div class="overflow-x-auto">
                <table class="w-full text-left border-collapse">
                    <thead>
                        <tr class="bg-muted text-muted-foreground text-[10px] uppercase tracking-widest">
                            <th class="px-8 py-4 font-bold">{"Address Name"}</th>
                            <th class="px-8 py-4 font-bold">{"Expense Type"}</th>
                            <th class="px-8 py-4 font-bold text-center">{"Total Cost"}</th>
                            <th class="px-8 py-4 font-bold text-right">{"Expense Date"}</th>
                        </tr>
                    </thead>
                    <tbody class="divide-y divide-border">
                        { rows }
                    </tbody>
                </table>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_needs_name_and_location() {
        assert_eq!(
            validate_address(" ", "1 Main St", "", "0"),
            Err("Please enter Address Name and Complete Address.")
        );
        assert_eq!(
            validate_address("HQ", "", "", "0"),
            Err("Please enter Address Name and Complete Address.")
        );
    }

    #[test]
    fn address_defaults_to_office_and_active() {
        let address = validate_address(" HQ ", "1 Main St", " main office ", "").unwrap();
        assert_eq!(address.address_name, "HQ");
        assert_eq!(address.description, "main office");
        assert_eq!(address.address_type, 0);
        assert_eq!(address_type_label(address.address_type), "Office");
        assert_eq!(address.status, 1);
    }

    #[test]
    fn address_keeps_selected_type() {
        let address = validate_address("Depot", "Dock 4", "", "2").unwrap();
        assert_eq!(address_type_label(address.address_type), "Warehouse");
    }
}
