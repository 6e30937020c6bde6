use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::api;
use crate::auth::{save_session, AuthContext};
use crate::components::banner::{Banner, Notice};
use crate::routes::AuthRoute;

const MIN_PASSWORD_LEN: usize = 8;

#[derive(Clone, Debug, PartialEq, Eq)]
enum Mode {
    Login,
    Register,
    Forgot,
    Reset { email: String, token: String },
}

impl Mode {
    fn heading(&self) -> (&'static str, &'static str) {
        match self {
            Mode::Login => ("Welcome back", "Sign in to track your utilities."),
            Mode::Register => ("Create account", "Start tracking your utility expenses."),
            Mode::Forgot => ("Forgot password", "We will email you a reset link."),
            Mode::Reset { .. } => ("Reset password", "Choose a new password."),
        }
    }
}

/// Checks the form before anything is sent. Returns the message to show.
fn validate(mode: &Mode, email: &str, user_name: &str, password: &str, confirm: &str) -> Option<&'static str> {
    if !matches!(mode, Mode::Reset { .. }) && email.trim().is_empty() {
        return Some("Email is required");
    }
    if matches!(mode, Mode::Forgot) {
        return None;
    }
    if matches!(mode, Mode::Register) && user_name.trim().is_empty() {
        return Some("User name is required");
    }
    if password.is_empty() {
        return Some("Password is required");
    }
    if !matches!(mode, Mode::Login) {
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Some("Password must be at least 8 characters");
        }
        if password != confirm {
            return Some("Passwords do not match");
        }
    }
    None
}

fn text_input(value: &UseStateHandle<String>, kind: &'static str, label: &'static str) -> Html {
    let state = value.clone();
    let oninput = Callback::from(move |e: InputEvent| {
        let input: HtmlInputElement = e.target_unchecked_into();
        state.set(input.value());
    });
    html! {
        <div class="space-y-1">
            <label class="text-sm font-medium text-foreground">{ label }</label>
            <input
                type={kind}
                class="w-full px-4 py-2 bg-input border border-input rounded-lg text-foreground focus:outline-none focus:ring-2 focus:ring-primary"
                value={(**value).clone()}
                oninput={oninput}
            />
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct AuthScreenProps {
    pub route: AuthRoute,
}

#[function_component(AuthScreen)]
pub fn auth_screen(props: &AuthScreenProps) -> Html {
    let auth = use_context::<AuthContext>();
    let mode = use_state(|| match &props.route {
        AuthRoute::ResetPassword { email, token } => Mode::Reset {
            email: email.clone(),
            token: token.clone(),
        },
        _ => Mode::Login,
    });
    let email = use_state(String::new);
    let user_name = use_state(String::new);
    let password = use_state(String::new);
    let confirm_password = use_state(String::new);
    let notice = use_state(|| None::<Notice>);
    let loading = use_state(|| false);

    {
        let notice = notice.clone();
        let loading = loading.clone();
        use_effect_with_deps(
            move |route: &AuthRoute| {
                if let AuthRoute::ConfirmEmail { link } = route.clone() {
                    loading.set(true);
                    spawn_local(async move {
                        match api::confirm_email(&link).await {
                            Ok(()) => notice.set(Some(Notice::success(
                                "Your email is confirmed. You can sign in now.",
                            ))),
                            Err(err) => {
                                log::warn!("email confirmation failed: {}", err);
                                notice.set(Some(Notice::error(
                                    err.user_message("Email confirmation failed"),
                                )));
                            }
                        }
                        loading.set(false);
                    });
                }
                || ()
            },
            props.route.clone(),
        );
    }

    let on_submit = {
        let mode = mode.clone();
        let email = email.clone();
        let user_name = user_name.clone();
        let password = password.clone();
        let confirm_password = confirm_password.clone();
        let notice = notice.clone();
        let loading = loading.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let current = (*mode).clone();
            let email_val = email.trim().to_string();
            let user_val = user_name.trim().to_string();
            let password_val = (*password).clone();
            let confirm_val = (*confirm_password).clone();

            if let Some(msg) = validate(&current, &email_val, &user_val, &password_val, &confirm_val) {
                notice.set(Some(Notice::error(msg)));
                return;
            }

            loading.set(true);
            notice.set(None);

            let auth = auth.clone();
            let mode = mode.clone();
            let password = password.clone();
            let confirm_password = confirm_password.clone();
            let notice = notice.clone();
            let loading = loading.clone();
            spawn_local(async move {
                match current {
                    Mode::Login => match api::login(&email_val, &password_val).await {
                        Ok(session) => {
                            log::info!("signed in as {}", session.display_name());
                            if let Some(auth) = &auth {
                                save_session(auth, Some(session));
                            }
                        }
                        Err(err) => {
                            notice.set(Some(Notice::error(err.user_message("Login failed"))));
                        }
                    },
                    Mode::Register => {
                        match api::register(&email_val, &password_val, &user_val).await {
                            Ok(Some(session)) => {
                                if let Some(auth) = &auth {
                                    save_session(auth, Some(session));
                                }
                            }
                            Ok(None) => {
                                notice.set(Some(Notice::success(
                                    "Account created. Check your inbox to confirm your email, then sign in.",
                                )));
                                mode.set(Mode::Login);
                            }
                            Err(err) => {
                                notice.set(Some(Notice::error(
                                    err.user_message("Registration failed"),
                                )));
                            }
                        }
                    }
                    Mode::Forgot => match api::request_password_reset(&email_val).await {
                        Ok(()) => notice.set(Some(Notice::success(
                            "If the address is registered, a reset link is on its way.",
                        ))),
                        Err(err) => notice.set(Some(Notice::error(
                            err.user_message("Could not send the reset link"),
                        ))),
                    },
                    Mode::Reset { email, token } => {
                        match api::reset_password(&email, &token, &password_val, &confirm_val).await {
                            Ok(()) => {
                                password.set(String::new());
                                confirm_password.set(String::new());
                                notice.set(Some(Notice::success(
                                    "Password changed. You can sign in now.",
                                )));
                                mode.set(Mode::Login);
                            }
                            Err(err) => notice.set(Some(Notice::error(
                                err.user_message("Could not reset the password"),
                            ))),
                        }
                    }
                }
                loading.set(false);
            });
        })
    };

    let switch_to = |target: Mode| {
        let mode = mode.clone();
        let notice = notice.clone();
        Callback::from(move |_: MouseEvent| {
            notice.set(None);
            mode.set(target.clone());
        })
    };

    let (title, subtitle) = mode.heading();
    let submit_label = match &*mode {
        Mode::Login => "Login",
        Mode::Register => "Sign up",
        Mode::Forgot => "Send reset link",
        Mode::Reset { .. } => "Change password",
    };
    let needs_password = !matches!(&*mode, Mode::Forgot);
    let needs_confirm = matches!(&*mode, Mode::Register | Mode::Reset { .. });

    html! {
        <div class="min-h-screen flex items-center justify-center bg-background">
            <div class="w-full max-w-md bg-card border border-border rounded-2xl shadow-lg p-8">
                <div class="text-center mb-6">
                    <h1 class="text-2xl font-bold text-foreground">{ title }</h1>
                    <p class="text-sm text-muted-foreground mt-2">{ subtitle }</p>
                </div>

                <form class="space-y-4" onsubmit={on_submit}>
                    if let Mode::Reset { email, .. } = &*mode {
                        <p class="text-sm text-muted-foreground">{ format!("Account: {}", email) }</p>
                    } else {
                        { text_input(&email, "email", "Email") }
                    }
                    if *mode == Mode::Register {
                        { text_input(&user_name, "text", "User name") }
                    }
                    if needs_password {
                        { text_input(&password, "password", "Password") }
                    }
                    if needs_confirm {
                        { text_input(&confirm_password, "password", "Confirm Password") }
                    }

                    <Banner notice={(*notice).clone()} />

                    <button
                        type="submit"
                        class="w-full bg-primary text-primary-foreground py-2 rounded-lg font-semibold hover:opacity-90 transition-opacity"
                        disabled={*loading}
                    >
                        { if *loading { "Please wait..." } else { submit_label } }
                    </button>
                </form>

                <div class="mt-6 flex flex-col items-center gap-2 text-sm text-muted-foreground">
                    if *mode == Mode::Login {
                        <div>
                            {"No account?"}
                            <button class="ml-2 text-primary font-semibold" onclick={switch_to(Mode::Register)}>{"Sign up"}</button>
                        </div>
                        <button class="text-primary font-semibold" onclick={switch_to(Mode::Forgot)}>{"Forgot password?"}</button>
                    } else {
                        <div>
                            {"Already have an account?"}
                            <button class="ml-2 text-primary font-semibold" onclick={switch_to(Mode::Login)}>{"Login"}</button>
                        </div>
                    }
                </div>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_needs_email_and_password() {
        assert_eq!(validate(&Mode::Login, "", "", "pw", ""), Some("Email is required"));
        assert_eq!(validate(&Mode::Login, "a@b.c", "", "", ""), Some("Password is required"));
        assert_eq!(validate(&Mode::Login, "a@b.c", "", "short", ""), None);
    }

    #[test]
    fn register_checks_length_and_confirmation() {
        assert_eq!(
            validate(&Mode::Register, "a@b.c", "", "longenough", "longenough"),
            Some("User name is required")
        );
        assert_eq!(
            validate(&Mode::Register, "a@b.c", "ana", "short", "short"),
            Some("Password must be at least 8 characters")
        );
        assert_eq!(
            validate(&Mode::Register, "a@b.c", "ana", "longenough", "different"),
            Some("Passwords do not match")
        );
        assert_eq!(validate(&Mode::Register, "a@b.c", "ana", "longenough", "longenough"), None);
    }

    #[test]
    fn forgot_only_needs_email() {
        assert_eq!(validate(&Mode::Forgot, "a@b.c", "", "", ""), None);
        assert_eq!(validate(&Mode::Forgot, " ", "", "", ""), Some("Email is required"));
    }

    #[test]
    fn reset_ignores_email_field() {
        let mode = Mode::Reset {
            email: "a@b.c".into(),
            token: "t".into(),
        };
        assert_eq!(validate(&mode, "", "", "longenough", "longenough"), None);
        assert_eq!(validate(&mode, "", "", "longenough", "x"), Some("Passwords do not match"));
    }
}
