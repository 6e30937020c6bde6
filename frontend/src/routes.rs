//! Maps the browser location onto the page held by the root component.

use crate::billing::{FAILED_PATH, SUCCESS_PATH};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Page {
    Dashboard,
    Expenses,
    Utilities,
    Analysis,
    Plans,
    PaymentSuccess,
    PaymentFailed,
    Properties,
}

impl Page {
    pub fn title(self) -> &'static str {
        match self {
            Page::Dashboard => "Dashboard",
            Page::Expenses => "My Expenses",
            Page::Utilities => "Utility Management",
            Page::Analysis => "AI Analysis",
            Page::Plans | Page::PaymentSuccess | Page::PaymentFailed => "Billing Plans",
            Page::Properties => "Property Management",
        }
    }
}

/// What the signed-out screen should open with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthRoute {
    SignIn,
    ResetPassword { email: String, token: String },
    ConfirmEmail { link: String },
}

pub fn query_param(query: &str, name: &str) -> Option<String> {
    query
        .trim_start_matches('?')
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| decode_component(value))
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    match urlencoding::decode(&spaced) {
        Ok(text) => text.into_owned(),
        Err(_) => String::from_utf8_lossy(&urlencoding::decode_binary(spaced.as_bytes())).into_owned(),
    }
}

pub fn page_for(path: &str, query: &str) -> Page {
    match query_param(query, "payment_status").as_deref() {
        Some("success") => return Page::PaymentSuccess,
        Some("failed") => return Page::PaymentFailed,
        _ => {}
    }

    let path = path.trim_end_matches('/');
    match path {
        SUCCESS_PATH => Page::PaymentSuccess,
        FAILED_PATH => Page::PaymentFailed,
        "/account/billing/plans" => Page::Plans,
        "/expenses" => Page::Expenses,
        "/utilities" => Page::Utilities,
        "/ai-analysis" => Page::Analysis,
        "/property/add-property" => Page::Properties,
        _ => Page::Dashboard,
    }
}

pub fn auth_route_for(path: &str, query: &str, href: &str) -> AuthRoute {
    let path = path.trim_end_matches('/');
    if path.ends_with("/reset-password") {
        if let (Some(email), Some(token)) = (query_param(query, "email"), query_param(query, "token")) {
            return AuthRoute::ResetPassword { email, token };
        }
    }
    if path.ends_with("/email-confirmation") || path.ends_with("/confirm-email") {
        return AuthRoute::ConfirmEmail {
            link: query_param(query, "url").unwrap_or_else(|| href.to_string()),
        };
    }
    AuthRoute::SignIn
}

/// Current `(pathname, search, href)` of the window.
pub fn current_location() -> (String, String, String) {
    match web_sys::window().map(|w| w.location()) {
        Some(location) => (
            location.pathname().unwrap_or_default(),
            location.search().unwrap_or_default(),
            location.href().unwrap_or_default(),
        ),
        None => Default::default(),
    }
}

pub fn redirect(url: &str) {
    if let Some(window) = web_sys::window() {
        if window.location().set_href(url).is_err() {
            log::error!("could not navigate to {}", url);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_return_pages() {
        assert_eq!(page_for(SUCCESS_PATH, ""), Page::PaymentSuccess);
        assert_eq!(page_for("/account/billing/plans/failed/", ""), Page::PaymentFailed);
        assert_eq!(
            page_for("/account/billing/plans", "?payment_status=success"),
            Page::PaymentSuccess
        );
        assert_eq!(page_for("/account/billing/plans", ""), Page::Plans);
    }

    #[test]
    fn unknown_paths_open_the_dashboard() {
        assert_eq!(page_for("/", ""), Page::Dashboard);
        assert_eq!(page_for("/nowhere", "?x=1"), Page::Dashboard);
        assert_eq!(page_for("/property/add-property", ""), Page::Properties);
    }

    #[test]
    fn query_values_are_decoded() {
        assert_eq!(
            query_param("?email=ana%40mail.com&token=a+b", "email").as_deref(),
            Some("ana@mail.com")
        );
        assert_eq!(query_param("email=x&token=a+b", "token").as_deref(), Some("a b"));
        assert_eq!(query_param("?token=%zz", "token").as_deref(), Some("%zz"));
        assert_eq!(query_param("?name=caf%C3%A9", "name").as_deref(), Some("café"));
        assert_eq!(query_param("", "email"), None);
    }

    #[test]
    fn malformed_escapes_stay_literal() {
        assert_eq!(query_param("?token=%+1", "token").as_deref(), Some("% 1"));
        assert_eq!(query_param("?token=%-f", "token").as_deref(), Some("%-f"));
        assert_eq!(query_param("?token=ab%4", "token").as_deref(), Some("ab%4"));
        assert_eq!(query_param("?token=%FF", "token").as_deref(), Some("\u{FFFD}"));
    }

    #[test]
    fn auth_routes() {
        assert_eq!(
            auth_route_for("/auth/reset-password", "?email=a%40b.c&token=t1", ""),
            AuthRoute::ResetPassword {
                email: "a@b.c".into(),
                token: "t1".into()
            }
        );
        assert_eq!(
            auth_route_for("/auth/reset-password", "?email=a%40b.c", ""),
            AuthRoute::SignIn
        );
        assert_eq!(
            auth_route_for("/auth/email-confirmation", "", "https://x/api/Auth/confirm?id=1"),
            AuthRoute::ConfirmEmail {
                link: "https://x/api/Auth/confirm?id=1".into()
            }
        );
        assert_eq!(auth_route_for("/", "", ""), AuthRoute::SignIn);
    }
}
