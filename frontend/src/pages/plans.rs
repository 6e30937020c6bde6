use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::api;
use crate::billing::{find_price, format_price, purchase_request, BillingCycle, FeatureCell, Plan, FEATURES};
use crate::components::banner::{Banner, Notice};
use crate::components::icons::{icon_check, icon_x};
use crate::components::layout::page_shell;
use crate::config::app_origin;
use crate::models::{Price, Product};
use crate::pages::{loading_row, use_session, Load, CARD_CLASS, PRIMARY_BUTTON, SECONDARY_BUTTON};
use crate::routes::redirect;

const CHECKOUT_FAILED: &str = "Failed to initiate checkout. Please try again later.";

fn toggle(label_on: &'static str, label_off: &'static str, on: bool, onclick: Callback<MouseEvent>) -> Html {
    let (left, right) = if on {
        (PRIMARY_BUTTON, SECONDARY_BUTTON)
    } else {
        (SECONDARY_BUTTON, PRIMARY_BUTTON)
    };
    html! {
        <div class="flex gap-1 bg-[#f1f4f9] rounded-[12px] p-1">
            <button class={left} onclick={onclick.clone()} disabled={on}>{ label_on }</button>
            <button class={right} onclick={onclick} disabled={!on}>{ label_off }</button>
        </div>
    }
}

/// Card price. A paid plan with no catalogue price shows as zero euros.
fn price_label(plan: Plan, price: Option<&Price>) -> String {
    match (plan, price) {
        (Plan::Free, _) => "Free".to_string(),
        (_, Some(price)) => format_price(price.amount, &price.currency),
        (_, None) => format_price(0.0, "eur"),
    }
}

#[function_component(PlansPage)]
pub fn plans_page() -> Html {
    let session = use_session();
    let products = use_state(|| Load::<Vec<Product>>::Loading);
    let annual = use_state(|| true);
    let recurring = use_state(|| true);
    let notice = use_state(|| None::<Notice>);
    let redirecting = use_state(|| false);

    {
        let products = products.clone();
        use_effect_with_deps(
            move |session: &Option<crate::auth::AuthSession>| {
                if let Some(session) = session.clone() {
                    spawn_local(async move {
                        match api::fetch_products(&session).await {
                            Ok(list) => products.set(Load::Ready(list)),
                            Err(err) => {
                                log::error!("could not load plans: {}", err);
                                products.set(Load::Failed(
                                    "Failed to load plans. Please try again later.".to_string(),
                                ));
                            }
                        }
                    });
                }
                || ()
            },
            session.clone(),
        );
    }

    let cycle = if *annual {
        BillingCycle::Annual
    } else {
        BillingCycle::Monthly
    };

    let on_toggle_cycle = {
        let annual = annual.clone();
        Callback::from(move |_| annual.set(!*annual))
    };
    let on_toggle_recurring = {
        let recurring = recurring.clone();
        Callback::from(move |_| recurring.set(!*recurring))
    };

    let subscribe = |plan: Plan, price: Option<Price>| {
        let session = session.clone();
        let notice = notice.clone();
        let redirecting = redirecting.clone();
        let recurring = *recurring;
        Callback::from(move |_: MouseEvent| {
            let Some(session) = session.clone() else {
                notice.set(Some(Notice::error("Please sign in again.")));
                return;
            };
            let Some(price) = price.clone() else {
                notice.set(Some(Notice::error(CHECKOUT_FAILED)));
                return;
            };
            let origin = app_origin().unwrap_or_default();
            let request = match purchase_request(&session, plan, &price, recurring, cycle, &origin) {
                Ok(request) => request,
                Err(err) => {
                    log::warn!("checkout blocked: {:?}", err);
                    notice.set(Some(Notice::error(err.to_string())));
                    return;
                }
            };

            log::info!("starting {} checkout ({})", plan.title(), request.plan_purchase_type);
            redirecting.set(true);
            let notice = notice.clone();
            let redirecting = redirecting.clone();
            spawn_local(async move {
                match api::purchase_plan(&session, &request).await {
                    Ok(checkout) => match checkout.url.filter(|url| !url.is_empty()) {
                        Some(url) => redirect(&url),
                        None => {
                            log::error!("checkout response carried no url");
                            notice.set(Some(Notice::error(CHECKOUT_FAILED)));
                            redirecting.set(false);
                        }
                    },
                    Err(err) => {
                        log::error!("purchase request failed: {}", err);
                        notice.set(Some(Notice::error(
                            "Failed to initiate subscription. Please try again later.",
                        )));
                        redirecting.set(false);
                    }
                }
            });
        })
    };

    let current_role = session.as_ref().and_then(|s| s.primary_role().map(str::to_string));

    let body = match &*products {
        Load::Loading => loading_row("Loading..."),
        Load::Failed(message) => html! { <Banner notice={Some(Notice::error(message.clone()))} /> },
        Load::Ready(list) => html! {
            <>
                <div class="flex flex-wrap items-center justify-center gap-4">
                    { toggle("Annual", "Monthly", *annual, on_toggle_cycle) }
                    { toggle("Recurring", "One-time", *recurring, on_toggle_recurring) }
                </div>

                <div class="grid grid-cols-1 md:grid-cols-3 gap-6">
                    { for Plan::ALL.iter().map(|plan| {
                        let plan = *plan;
                        let price = find_price(list, plan, cycle);
                        let is_current = current_role.as_deref() == Some(plan.title());
                        let price_label = price_label(plan, price.as_ref());
                        html! {
                            <div class={CARD_CLASS}>
                                <h3 class="font-bold text-foreground text-lg">{ plan.title() }</h3>
                                <p class="text-sm text-muted-foreground mt-1 min-h-[40px]">{ plan.description() }</p>
                                <p class="text-3xl font-bold text-[#1D617A] mt-4">
                                    { price_label }
                                    if plan != Plan::Free {
                                        <span class="text-sm font-normal text-muted-foreground ml-1">{ cycle.per_label() }</span>
                                    }
                                </p>
                                if is_current {
                                    <button class={classes!(SECONDARY_BUTTON, "w-full", "mt-6")} disabled={true}>{"Current Plan"}</button>
                                } else if plan != Plan::Free {
                                    <button class={classes!(PRIMARY_BUTTON, "w-full", "mt-6")} disabled={*redirecting} onclick={subscribe(plan, price.clone())}>
                                        { if *redirecting { "Redirecting..." } else { "Subscribe" } }
                                    </button>
                                }
                            </div>
                        }
                    }) }
                </div>

                <div class="bg-card rounded-2xl shadow-md border border-border overflow-hidden">
                    <table class="w-full text-left border-collapse">
                        <thead>
                            <tr class="bg-muted text-muted-foreground text-[10px] uppercase tracking-widest">
                                <th class="px-8 py-4 font-bold">{"Features"}</th>
                                { for Plan::ALL.iter().map(|plan| html! { <th class="px-8 py-4 font-bold">{ plan.title() }</th> }) }
                            </tr>
                        </thead>
                        <tbody class="divide-y divide-border">
                            { for FEATURES.iter().map(|row| html! {
                                <tr class="text-sm">
                                    <td class="px-8 py-4 text-foreground">{ row.title }</td>
                                    { for Plan::ALL.iter().map(|plan| match row.cell(*plan) {
                                        FeatureCell::Text(text) => html! {
                                            <td class="px-8 py-4 text-muted-foreground">
                                                <span class="inline-flex items-center gap-2 text-green-700">{ icon_check() }</span>
                                                { text }
                                            </td>
                                        },
                                        FeatureCell::Unavailable => html! {
                                            <td class="px-8 py-4 text-red-500">{ icon_x() }</td>
                                        },
                                    }) }
                                </tr>
                            }) }
                        </tbody>
                    </table>
                </div>
            </>
        },
    };

    page_shell(
        "Billing Plans",
        html! {},
        html! {
            <>
                <Banner notice={(*notice).clone()} />
                { body }
            </>
        },
    )
}

#[derive(Properties, PartialEq)]
pub struct PaymentResultProps {
    pub success: bool,
    pub on_back: Callback<()>,
}

#[function_component(PaymentResult)]
pub fn payment_result(props: &PaymentResultProps) -> Html {
    let (title, message) = if props.success {
        (
            "Payment Successful!",
            "Thank you for your payment. Your plan is being activated.",
        )
    } else {
        (
            "Payment Failed",
            "Your payment was not completed. No charges were made.",
        )
    };
    let on_back = {
        let on_back = props.on_back.clone();
        Callback::from(move |_| on_back.emit(()))
    };

    page_shell(
        "Billing Plans",
        html! {},
        html! {
            <div class="flex flex-col items-center justify-center min-h-[400px] p-4 text-center gap-4">
                <div class={if props.success { "p-4 rounded-full bg-green-100 text-green-700" } else { "p-4 rounded-full bg-red-100 text-red-600" }}>
                    { if props.success { icon_check() } else { icon_x() } }
                </div>
                <h2 class="text-2xl font-bold">{ title }</h2>
                <p class="text-muted-foreground">{ message }</p>
                <button class={PRIMARY_BUTTON} onclick={on_back}>{"Back to plans"}</button>
            </div>
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_price_shows_zero_euros() {
        assert_eq!(price_label(Plan::Premium, None), "€0.00");
        assert_eq!(price_label(Plan::Free, None), "Free");
    }

    #[test]
    fn catalogue_price_keeps_its_currency() {
        let price = Price {
            id: "price_1".to_string(),
            amount: 99.0,
            currency: "usd".to_string(),
            interval: Some("year".to_string()),
        };
        assert_eq!(price_label(Plan::Company, Some(&price)), "$99.00");
    }
}
