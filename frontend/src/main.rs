use yew::prelude::*;

mod analysis;
mod api;
mod auth;
mod billing;
mod chart;
mod components;
mod config;
mod error;
mod filter;
mod format;
mod models;
mod pages;
mod routes;
mod stats;
mod storage;

use auth::{load_session, AuthContext};
use components::layout::Layout;
use config::config;
use pages::analysis::AnalysisPage;
use pages::auth::AuthScreen;
use pages::dashboard::DashboardPage;
use pages::expenses::ExpensesPage;
use pages::plans::{PaymentResult, PlansPage};
use pages::properties::PropertiesPage;
use pages::utilities::UtilitiesPage;
use routes::{auth_route_for, current_location, page_for, Page};

#[function_component(App)]
fn app() -> Html {
    let auth: AuthContext = use_state(load_session);
    let active_page = use_state(|| {
        let (path, query, _) = current_location();
        page_for(&path, &query)
    });
    let on_select = {
        let active_page = active_page.clone();
        Callback::from(move |page: Page| active_page.set(page))
    };
    let on_back = {
        let active_page = active_page.clone();
        Callback::from(move |_| active_page.set(Page::Plans))
    };

    let Some(session) = (*auth).clone() else {
        let (path, query, href) = current_location();
        return html! {
            <ContextProvider<AuthContext> context={auth}>
                <AuthScreen route={auth_route_for(&path, &query, &href)} />
            </ContextProvider<AuthContext>>
        };
    };

    let content = match *active_page {
        Page::Dashboard => html! { <DashboardPage /> },
        Page::Expenses => html! { <ExpensesPage /> },
        Page::Utilities => html! { <UtilitiesPage /> },
        Page::Analysis => html! { <AnalysisPage /> },
        Page::Plans => html! { <PlansPage /> },
        Page::PaymentSuccess => html! { <PaymentResult success={true} on_back={on_back} /> },
        Page::PaymentFailed => html! { <PaymentResult success={false} on_back={on_back} /> },
        Page::Properties if session.is_company() => html! { <PropertiesPage /> },
        Page::Properties => html! { <DashboardPage /> },
    };

    html! {
        <ContextProvider<AuthContext> context={auth}>
            <Layout active_page={*active_page} on_select={on_select}>
                { content }
            </Layout>
        </ContextProvider<AuthContext>>
    }
}

fn main() {
    wasm_logger::init(wasm_logger::Config::new(config().log_level));
    console_error_panic_hook::set_once();
    log::info!("starting UtiliTrack against {}", config().api_base_url);
    yew::Renderer::<App>::new().render();
}
