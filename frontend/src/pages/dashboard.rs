use chrono::NaiveDate;
use yew::prelude::*;

use crate::chart::{
    chart_title, consumption_series, cost_by_type, ChartKind, TimeRange,
};
use crate::components::banner::{Banner, Notice};
use crate::components::charts::{ConsumptionChart, PieChart};
use crate::components::icons::{
    icon_chevron_left, icon_chevron_right, icon_trending_down, icon_trending_up, icon_wallet,
};
use crate::components::layout::page_shell;
use crate::components::stat_card::StatCard;
use crate::format::{
    format_change, format_currency, format_day_or_na, format_number, format_timestamp_day,
    CURRENCY_SYMBOL,
};
use crate::models::Expense;
use crate::pages::{bind_select, loading_row, use_expenses, use_session, Load, CARD_CLASS, INPUT_CLASS};
use crate::stats::{expense_type_names, last_update, total_cost, type_card, usage_summary, UsageStatus};

const VISIBLE_CARDS: usize = 2;

/// Carousel index after pressing "next"; wraps back to the start.
pub fn next_slide(current: usize, len: usize) -> usize {
    if current + VISIBLE_CARDS >= len {
        0
    } else {
        current + 1
    }
}

/// Carousel index after pressing "previous"; wraps to the last full pair.
pub fn prev_slide(current: usize, len: usize) -> usize {
    if current == 0 {
        if len % 2 == 0 {
            len.saturating_sub(2)
        } else {
            len.saturating_sub(1)
        }
    } else {
        current - 1
    }
}

pub fn dot_count(len: usize) -> usize {
    len.saturating_sub(1)
}

/// The last dot also stands for the final card when `prev_slide` lands on it.
pub fn dot_active(index: usize, current: usize, len: usize) -> bool {
    index == current || (len >= 2 && index == len - 2 && current == len - 1)
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

#[function_component(DashboardPage)]
pub fn dashboard_page() -> Html {
    let session = use_session();
    let expenses = use_expenses(session);

    let body = match &expenses {
        Load::Loading => loading_row("Loading your utility data..."),
        Load::Failed(message) => html! { <Banner notice={Some(Notice::error(message.clone()))} /> },
        Load::Ready(list) if list.is_empty() => html! {
            <div class={CARD_CLASS}>
                <p class="text-sm text-muted-foreground">{"No expenses recorded yet. Add one from Utility Management."}</p>
            </div>
        },
        Load::Ready(list) => html! {
            <>
                <Overview expenses={list.clone()} />
                <TypeCarousel expenses={list.clone()} />
                <Distribution expenses={list.clone()} />
                <Summary expenses={list.clone()} />
            </>
        },
    };

    page_shell("Dashboard", html! {}, body)
}

#[derive(Properties, PartialEq)]
struct ExpensesProps {
    expenses: Vec<Expense>,
}

#[function_component(Overview)]
fn overview(props: &ExpensesProps) -> Html {
    let range_key = use_state(|| TimeRange::Month.key().to_string());
    let range = TimeRange::from_key(&range_key);
    let slices = cost_by_type(&props.expenses, range.cutoff(today()));

    html! {
        <div class="grid grid-cols-1 lg:grid-cols-3 gap-6">
            <StatCard
                title="Total Cost"
                value={format_currency(total_cost(&props.expenses), CURRENCY_SYMBOL)}
                caption={format!("All types, last update {}", format_timestamp_day(last_update(&props.expenses)))}
                icon={icon_wallet as fn() -> Html}
            />
            <div class={classes!(CARD_CLASS, "lg:col-span-2")}>
                <div class="flex items-center justify-between mb-4">
                    <h3 class="font-bold text-foreground text-lg">{"Cost Distribution"}</h3>
                    <select class={classes!(INPUT_CLASS, "max-w-[160px]")} onchange={bind_select(&range_key)}>
                        { for TimeRange::ALL.iter().map(|r| html! {
                            <option value={r.key()} selected={*r == range}>{ r.label() }</option>
                        }) }
                    </select>
                </div>
                <PieChart slices={slices} />
            </div>
        </div>
    }
}

#[function_component(TypeCarousel)]
fn type_carousel(props: &ExpensesProps) -> Html {
    let slide = use_state(|| 0usize);
    let names = expense_type_names(&props.expenses);
    let len = names.len();
    let current = (*slide).min(len.saturating_sub(1));

    let on_prev = {
        let slide = slide.clone();
        Callback::from(move |_| slide.set(prev_slide(*slide, len)))
    };
    let on_next = {
        let slide = slide.clone();
        Callback::from(move |_| slide.set(next_slide(*slide, len)))
    };

    html! {
        <div class={CARD_CLASS}>
            <div class="flex items-center justify-between mb-4">
                <h3 class="font-bold text-foreground text-lg">{"Utility Types"}</h3>
                if len > VISIBLE_CARDS {
                    <div class="flex gap-2">
                        <button class="p-2 rounded-full border border-border" aria-label="Previous" onclick={on_prev}>{ icon_chevron_left() }</button>
                        <button class="p-2 rounded-full border border-border" aria-label="Next" onclick={on_next}>{ icon_chevron_right() }</button>
                    </div>
                }
            </div>
            <div class="grid grid-cols-1 md:grid-cols-2 gap-4">
                { for names.iter().skip(current).take(VISIBLE_CARDS).map(|name| {
                    let card = type_card(&props.expenses, name);
                    let rising = card.change > 0.0;
                    html! {
                        <div class="rounded-[10px] border border-border p-5 space-y-3">
                            <div class="flex items-center justify-between">
                                <h4 class="font-semibold text-foreground">{ name.clone() }</h4>
                                <span class={if rising { "flex items-center gap-1 text-xs text-red-600" } else { "flex items-center gap-1 text-xs text-green-600" }}>
                                    { if rising { icon_trending_up() } else { icon_trending_down() } }
                                    { format_change(card.change) }
                                </span>
                            </div>
                            <p class="text-2xl font-bold text-[#1D617A]">{ format!("{} {}", format_number(card.quantity), card.unit) }</p>
                            <div class="grid grid-cols-2 gap-2 text-xs text-muted-foreground">
                                <span>{"Total cost"}</span>
                                <span class="text-right text-foreground">{ format_currency(card.total_cost, CURRENCY_SYMBOL) }</span>
                                <span>{ format!("Avg cost / {}", card.unit) }</span>
                                <span class="text-right text-foreground">{ format_currency(card.avg_cost, CURRENCY_SYMBOL) }</span>
                                <span>{"Cost change"}</span>
                                <span class="text-right text-foreground">{ format_change(card.cost_change) }</span>
                                <span>{"Last reading"}</span>
                                <span class="text-right text-foreground">
                                    { card.last_reading.map(|q| format!("{} {}", format_number(q), card.unit)).unwrap_or_else(|| "N/A".to_string()) }
                                </span>
                                <span>{"Last update"}</span>
                                <span class="text-right text-foreground">{ format_day_or_na(card.last_update) }</span>
                            </div>
                        </div>
                    }
                }) }
            </div>
            if len > VISIBLE_CARDS {
                <div class="flex justify-center gap-2 mt-4">
                    { for (0..dot_count(len)).map(|i| {
                        let slide = slide.clone();
                        let class_name = if dot_active(i, current, len) { "w-2 h-2 rounded-full bg-[#173E63]" } else { "w-2 h-2 rounded-full bg-[#B2CBDE]" };
                        html! { <button class={class_name} aria-label={format!("Slide {}", i + 1)} onclick={Callback::from(move |_| slide.set(i))}></button> }
                    }) }
                </div>
            }
        </div>
    }
}

#[function_component(Distribution)]
fn distribution(props: &ExpensesProps) -> Html {
    let selected = use_state(|| "all".to_string());
    let range_key = use_state(|| TimeRange::Month.key().to_string());
    let kind_key = use_state(|| ChartKind::Line.key().to_string());

    let names = expense_type_names(&props.expenses);
    let selected_type = Some(selected.as_str()).filter(|s| *s != "all");
    let range = TimeRange::from_key(&range_key);
    let kind = ChartKind::from_key(&kind_key);
    let series = consumption_series(&props.expenses, selected_type, range, today());

    html! {
        <div class={CARD_CLASS}>
            <div class="flex flex-wrap items-center justify-between gap-3 mb-4">
                <h3 class="font-bold text-foreground text-lg">{ chart_title(selected_type) }</h3>
                <div class="flex flex-wrap gap-2">
                    <select class={classes!(INPUT_CLASS, "max-w-[160px]")} onchange={bind_select(&selected)}>
                        <option value="all" selected={selected_type.is_none()}>{"All Types"}</option>
                        { for names.iter().map(|name| html! {
                            <option value={name.clone()} selected={selected_type == Some(name.as_str())}>{ name.clone() }</option>
                        }) }
                    </select>
                    <select class={classes!(INPUT_CLASS, "max-w-[160px]")} onchange={bind_select(&range_key)}>
                        { for TimeRange::ALL.iter().map(|r| html! {
                            <option value={r.key()} selected={*r == range}>{ r.label() }</option>
                        }) }
                    </select>
                    <select class={classes!(INPUT_CLASS, "max-w-[120px]")} onchange={bind_select(&kind_key)}>
                        { for ChartKind::ALL.iter().map(|k| html! {
                            <option value={k.key()} selected={*k == kind}>{ k.label() }</option>
                        }) }
                    </select>
                </div>
            </div>
            <ConsumptionChart series={series} kind={kind} />
        </div>
    }
}

#[function_component(Summary)]
fn summary(props: &ExpensesProps) -> Html {
    let names = expense_type_names(&props.expenses);

    html! {
        <div class="grid grid-cols-1 md:grid-cols-2 lg:grid-cols-3 gap-6">
            { for names.iter().map(|name| {
                let summary = usage_summary(&props.expenses, name);
                let status = summary.status();
                let status_class = match status {
                    UsageStatus::Optimal => "bg-green-100 text-green-700 px-3 py-1 rounded-full text-[10px] font-bold",
                    UsageStatus::HighUsage => "bg-red-100 text-red-700 px-3 py-1 rounded-full text-[10px] font-bold",
                };
                html! {
                    <div class={CARD_CLASS}>
                        <h3 class="font-bold text-foreground mb-4">{ format!("{} Summary", name) }</h3>
                        <dl class="grid grid-cols-2 gap-2 text-sm">
                            <dt class="text-muted-foreground">{"Current Usage"}</dt>
                            <dd class="text-right">{ format!("{} {}", format_number(summary.current_usage), summary.unit) }</dd>
                            <dt class="text-muted-foreground">{"Average"}</dt>
                            <dd class="text-right">{ format!("{} {}", format_number(summary.average), summary.unit) }</dd>
                            <dt class="text-muted-foreground">{"Change"}</dt>
                            <dd class="text-right">{ format_change(summary.change) }</dd>
                            <dt class="text-muted-foreground">{"Status"}</dt>
                            <dd class="text-right"><span class={status_class}>{ status.label() }</span></dd>
                        </dl>
                    </div>
                }
            }) }
            <div class={CARD_CLASS}>
                <h3 class="font-bold text-foreground mb-4">{"Overall Summary"}</h3>
                <dl class="grid grid-cols-2 gap-2 text-sm">
                    <dt class="text-muted-foreground">{"Total Cost"}</dt>
                    <dd class="text-right">{ format_currency(total_cost(&props.expenses), CURRENCY_SYMBOL) }</dd>
                    <dt class="text-muted-foreground">{"Active Types"}</dt>
                    <dd class="text-right">{ names.len() }</dd>
                    <dt class="text-muted-foreground">{"Total Records"}</dt>
                    <dd class="text-right">{ props.expenses.len() }</dd>
                    <dt class="text-muted-foreground">{"Last Updated"}</dt>
                    <dd class="text-right">{ format_timestamp_day(last_update(&props.expenses)) }</dd>
                </dl>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_wraps_after_last_pair() {
        assert_eq!(next_slide(0, 4), 1);
        assert_eq!(next_slide(1, 4), 2);
        assert_eq!(next_slide(2, 4), 0);
        assert_eq!(next_slide(0, 2), 0);
        assert_eq!(next_slide(0, 0), 0);
    }

    #[test]
    fn prev_wraps_to_last_pair() {
        assert_eq!(prev_slide(0, 4), 2);
        assert_eq!(prev_slide(0, 5), 4);
        assert_eq!(prev_slide(3, 5), 2);
        assert_eq!(prev_slide(0, 0), 0);
    }

    #[test]
    fn one_dot_less_than_types() {
        assert_eq!(dot_count(4), 3);
        assert_eq!(dot_count(0), 0);
    }

    #[test]
    fn last_dot_lights_for_final_card() {
        let lit = |current, len| (0..dot_count(len)).filter(|i| dot_active(*i, current, len)).collect::<Vec<_>>();
        assert_eq!(lit(prev_slide(0, 5), 5), vec![3]);
        assert_eq!(lit(0, 5), vec![0]);
        assert_eq!(lit(2, 4), vec![2]);
        assert!(!dot_active(0, 0, 0));
    }
}
