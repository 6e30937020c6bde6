use yew::prelude::*;

use crate::auth::{logout, AuthContext};
use crate::components::icons::{
    icon_building, icon_credit_card, icon_layout_grid, icon_list, icon_log_out, icon_sparkles,
    icon_zap,
};
use crate::routes::Page;

#[derive(Properties, PartialEq)]
pub struct LayoutProps {
    pub children: Children,
    pub active_page: Page,
    pub on_select: Callback<Page>,
}

#[function_component(Layout)]
pub fn layout(props: &LayoutProps) -> Html {
    html! {
        <div class="flex h-screen bg-background">
            <div class="hidden md:flex">
                <Sidebar active_page={props.active_page} on_select={props.on_select.clone()} />
            </div>

            <div class="flex-1 flex flex-col overflow-hidden">
                <Header />
                <main class="flex-1 overflow-y-auto">
                    { for props.children.iter() }
                </main>
            </div>
        </div>
    }
}

#[function_component(Header)]
fn header() -> Html {
    let auth = use_context::<AuthContext>();
    let name = auth
        .as_ref()
        .and_then(|auth| auth.as_ref().map(|s| s.display_name().to_string()))
        .unwrap_or_default();
    let role = auth
        .as_ref()
        .and_then(|auth| auth.as_ref().and_then(|s| s.primary_role().map(str::to_string)));

    html! {
        <header class="bg-[#D8E1E8] border-b border-border h-16 flex items-center justify-between px-6">
            <div class="flex-1"></div>
            <div class="flex items-center gap-3">
                if let Some(role) = role {
                    <span class="bg-secondary text-secondary-foreground px-3 py-1 rounded-full text-[10px] font-bold">{ role }</span>
                }
                <span class="text-sm font-bold text-[#173E63]">{ name }</span>
            </div>
        </header>
    }
}

struct NavItem {
    label: &'static str,
    page: Page,
    icon: fn() -> Html,
}

fn nav_items(is_company: bool) -> Vec<NavItem> {
    let mut items = vec![
        NavItem {
            label: "Dashboard",
            page: Page::Dashboard,
            icon: icon_layout_grid,
        },
        NavItem {
            label: "My Expenses",
            page: Page::Expenses,
            icon: icon_list,
        },
        NavItem {
            label: "Utility Management",
            page: Page::Utilities,
            icon: icon_zap,
        },
        NavItem {
            label: "AI Analysis",
            page: Page::Analysis,
            icon: icon_sparkles,
        },
        NavItem {
            label: "Billing Plans",
            page: Page::Plans,
            icon: icon_credit_card,
        },
    ];
    if is_company {
        items.push(NavItem {
            label: "Property Management",
            page: Page::Properties,
            icon: icon_building,
        });
    }
    items
}

#[derive(Properties, PartialEq)]
struct SidebarProps {
    active_page: Page,
    on_select: Callback<Page>,
}

#[function_component(Sidebar)]
fn sidebar(props: &SidebarProps) -> Html {
    let auth = use_context::<AuthContext>();
    let is_company = auth
        .as_ref()
        .and_then(|auth| auth.as_ref().map(|s| s.is_company()))
        .unwrap_or(false);
    let items = nav_items(is_company);

    let on_logout = {
        let auth = auth.clone();
        Callback::from(move |_| {
            if let Some(auth) = &auth {
                logout(auth);
            }
        })
    };

    let active = match props.active_page {
        Page::PaymentSuccess | Page::PaymentFailed => Page::Plans,
        page => page,
    };

    html! {
        <div class="w-[220px] h-screen bg-[#D8E1E8] p-4 flex flex-col">
            <div class="flex items-center gap-3 px-2 mb-8">
                <div class="w-12 h-12 bg-[#173E63] rounded-full flex items-center justify-center text-white">
                    { icon_zap() }
                </div>
                <span class="text-[#173E63] text-2xl font-black tracking-tight">{"UtiliTrack"}</span>
            </div>

            <div class="flex-1 bg-[#173E63] rounded-[24px] flex flex-col py-6 px-3 shadow-lg">
                <nav class="flex-1 space-y-2">
                    { for items.iter().map(|item| {
                        let class_name = if item.page == active {
                            "flex items-center gap-3 px-4 py-3 rounded-xl transition-all text-[13px] font-medium bg-[#B2CBDE] text-[#173E63] w-full"
                        } else {
                            "flex items-center gap-3 px-4 py-3 rounded-xl transition-all text-[13px] font-medium text-slate-300 hover:bg-white/5 hover:text-white w-full"
                        };
                        let on_select = props.on_select.clone();
                        let page = item.page;

                        html! {
                            <button type="button" class={class_name} onclick={Callback::from(move |_| on_select.emit(page))}>
                                <span class="shrink-0">{ (item.icon)() }</span>
                                <span class="truncate whitespace-nowrap text-left">{ item.label }</span>
                            </button>
                        }
                    }) }
                </nav>

                <div class="mt-auto pt-4">
                    <button onclick={on_logout} class="flex items-center gap-3 w-full px-4 py-3 rounded-xl hover:bg-white/10 transition-colors text-[13px] font-medium text-slate-300">
                        { icon_log_out() }
                        <span>{"Log Out"}</span>
                    </button>
                </div>
            </div>
        </div>
    }
}

/// Page heading with an action slot, shared by every page.
pub fn page_shell(title: &'static str, actions: Html, children: Html) -> Html {
    html! {
        <div class="p-6 max-w-7xl mx-auto">
            <div class="flex items-center justify-between pb-4 border-b border-border">
                <h1 class="text-2xl font-bold text-foreground">{ title }</h1>
                { actions }
            </div>
            <div class="pt-5 space-y-6">
                { children }
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn property_management_is_company_only() {
        let pages = |company| {
            nav_items(company)
                .into_iter()
                .map(|item| item.page)
                .collect::<Vec<_>>()
        };
        assert!(!pages(false).contains(&Page::Properties));
        assert!(pages(true).contains(&Page::Properties));
        assert_eq!(pages(true).len(), pages(false).len() + 1);
    }
}
