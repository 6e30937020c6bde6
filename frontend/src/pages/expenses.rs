use yew::prelude::*;

use crate::components::banner::{Banner, Notice};
use crate::components::icons::icon_search;
use crate::components::layout::page_shell;
use crate::filter::{page_count, page_slice, showing_range, ExpenseFilter, SortKey, SortState};
use crate::format::{format_currency, format_day_or_na, format_number, CURRENCY_SYMBOL};
use crate::models::{parse_day, Expense};
use crate::pages::{
    bind_input, bind_select, loading_row, use_expenses, use_session, Load, INPUT_CLASS,
    SECONDARY_BUTTON,
};
use crate::stats::{expense_type_names, unit_for};

#[function_component(ExpensesPage)]
pub fn expenses_page() -> Html {
    let session = use_session();
    let expenses = use_expenses(session);

    let body = match &expenses {
        Load::Loading => loading_row("Loading expenses..."),
        Load::Failed(message) => html! { <Banner notice={Some(Notice::error(message.clone()))} /> },
        Load::Ready(list) => html! { <ExpenseTable expenses={list.clone()} /> },
    };

    page_shell("My Expenses", html! {}, body)
}

#[derive(Properties, PartialEq)]
struct ExpenseTableProps {
    expenses: Vec<Expense>,
}

#[function_component(ExpenseTable)]
fn expense_table(props: &ExpenseTableProps) -> Html {
    let type_filter = use_state(|| "all".to_string());
    let start = use_state(String::new);
    let end = use_state(String::new);
    let search = use_state(String::new);
    let sort = use_state(SortState::default);
    let page = use_state(|| 1usize);

    let filter = ExpenseFilter {
        expense_type: Some((*type_filter).clone()).filter(|t| t != "all"),
        start: parse_day(&start),
        end: parse_day(&end),
        search: (*search).clone(),
    };

    {
        let page = page.clone();
        use_effect_with_deps(
            move |_| {
                page.set(1);
                || ()
            },
            filter.clone(),
        );
    }

    let mut rows = filter.apply(&props.expenses);
    sort.apply(&mut rows);
    let pages = page_count(rows.len()).max(1);
    let current = (*page).clamp(1, pages);
    let (first, last) = showing_range(current, rows.len());
    let visible = page_slice(&rows, current);

    let on_sort = |key: SortKey| {
        let sort = sort.clone();
        Callback::from(move |_: MouseEvent| sort.set(sort.toggle(key)))
    };

    let on_clear = {
        let type_filter = type_filter.clone();
        let start = start.clone();
        let end = end.clone();
        let search = search.clone();
        Callback::from(move |_| {
            type_filter.set("all".to_string());
            start.set(String::new());
            end.set(String::new());
            search.set(String::new());
        })
    };

    let go_to = |target: usize| {
        let page = page.clone();
        Callback::from(move |_: MouseEvent| page.set(target))
    };

    let names = expense_type_names(&props.expenses);

    html! {
        <div class="bg-card rounded-2xl shadow-md border border-border overflow-hidden">
            <div class="p-5 border-b border-border grid grid-cols-1 md:grid-cols-5 gap-3 items-end">
                <div class="space-y-1">
                    <label class="text-[12px] font-bold text-muted-foreground">{"Type"}</label>
                    <select class={INPUT_CLASS} onchange={bind_select(&type_filter)}>
                        <option value="all" selected={filter.expense_type.is_none()}>{"All Types"}</option>
                        { for names.iter().map(|name| html! {
                            <option value={name.clone()} selected={filter.expense_type.as_deref() == Some(name.as_str())}>{ name.clone() }</option>
                        }) }
                    </select>
                </div>
                <div class="space-y-1">
                    <label class="text-[12px] font-bold text-muted-foreground">{"From"}</label>
                    <input type="date" class={INPUT_CLASS} value={(*start).clone()} oninput={bind_input(&start)} />
                </div>
                <div class="space-y-1">
                    <label class="text-[12px] font-bold text-muted-foreground">{"To"}</label>
                    <input type="date" class={INPUT_CLASS} value={(*end).clone()} oninput={bind_input(&end)} />
                </div>
                <div class="space-y-1">
                    <label class="text-[12px] font-bold text-muted-foreground">{"Search"}</label>
                    <div class="flex items-center gap-2 bg-[#f1f4f9] rounded-[10px] px-3">
                        { icon_search() }
                        <input type="text" placeholder="Search expenses" class="w-full bg-transparent py-2 text-[12px] border-none" value={(*search).clone()} oninput={bind_input(&search)} />
                    </div>
                </div>
                if filter.is_active() {
                    <button class={SECONDARY_BUTTON} onclick={on_clear}>{"Clear Filters"}</button>
                }
            </div>

            <div class="overflow-x-auto">
                <table class="w-full text-left border-collapse">
                    <thead>
                        <tr class="bg-muted text-muted-foreground text-[10px] uppercase tracking-widest">
                            <th class="px-8 py-4 font-bold">{"Type"}</th>
                            <th class="px-8 py-4 font-bold cursor-pointer" onclick={on_sort(SortKey::Date)}>
                                { format!("Date{}", sort.indicator(SortKey::Date)) }
                            </th>
                            <th class="px-8 py-4 font-bold cursor-pointer" onclick={on_sort(SortKey::Quantity)}>
                                { format!("Quantity{}", sort.indicator(SortKey::Quantity)) }
                            </th>
                            <th class="px-8 py-4 font-bold">{"Rate"}</th>
                            <th class="px-8 py-4 font-bold cursor-pointer text-right" onclick={on_sort(SortKey::TotalCost)}>
                                { format!("Total Cost{}", sort.indicator(SortKey::TotalCost)) }
                            </th>
                        </tr>
                    </thead>
                    <tbody class="divide-y divide-border">
                        if visible.is_empty() {
                            <tr><td colspan="5" class="px-8 py-6 text-center text-muted-foreground">{"No expenses match the current filters."}</td></tr>
                        } else {
                            { for visible.iter().enumerate().map(|(idx, item)| html! {
                                <tr key={idx} class="text-sm hover:bg-muted/40 transition-colors">
                                    <td class="px-8 py-4">
                                        <span class="bg-secondary text-secondary-foreground px-3 py-1 rounded-full text-[10px] font-bold">{ item.expense_type_name.clone() }</span>
                                    </td>
                                    <td class="px-8 py-4 text-muted-foreground">{ format_day_or_na(item.expense_day()) }</td>
                                    <td class="px-8 py-4 text-foreground">{ format!("{} {}", format_number(item.quantity), unit_for(&item.expense_type_name)) }</td>
                                    <td class="px-8 py-4 text-foreground">{ format_currency(item.rate_per_unit, CURRENCY_SYMBOL) }</td>
                                    <td class="px-8 py-4 text-right font-semibold text-foreground">{ format_currency(item.total_cost, CURRENCY_SYMBOL) }</td>
                                </tr>
                            }) }
                        }
                    </tbody>
                </table>
            </div>

            <div class="p-5 flex items-center justify-between text-sm text-muted-foreground">
                <span>{ format!("Showing {} to {} of {} entries", first, last, rows.len()) }</span>
                <div class="flex items-center gap-1">
                    <button class="px-3 py-1 rounded border border-border" disabled={current <= 1} onclick={go_to(current.saturating_sub(1))}>{"Previous"}</button>
                    { for (1..=pages).map(|n| {
                        let class_name = if n == current {
                            "px-3 py-1 rounded bg-[#173E63] text-white"
                        } else {
                            "px-3 py-1 rounded border border-border"
                        };
                        html! { <button class={class_name} onclick={go_to(n)}>{ n }</button> }
                    }) }
                    <button class="px-3 py-1 rounded border border-border" disabled={current >= pages} onclick={go_to(current + 1)}>{"Next"}</button>
                </div>
            </div>
        </div>
    }
}
