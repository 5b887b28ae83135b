//! Login page component.

use dioxus::prelude::*;

use crate::app::api::ApiError;
use crate::app::components::{form_inputs::TextInput, ErrorAlert, Layout};
use crate::app::prefs::use_prefs;
use crate::app::session::use_session;
use crate::app::Route;

/// Login form. On success the session is persisted per the remember
/// checkbox and the user lands on the page for their role.
#[component]
pub fn Login() -> Element {
    let session = use_session();
    let prefs = use_prefs();
    let nav = navigator();

    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut remember = use_signal(|| false);
    let mut error = use_signal(|| None::<ApiError>);
    let mut busy = use_signal(|| false);

    // Already signed in (or just finished signing in): leave.
    let session_redirect = session.clone();
    use_effect(move || {
        if let Some(role) = session_redirect.role() {
            if role.is_staff() {
                nav.replace(Route::Orders {});
            } else {
                nav.replace(Route::Menu {});
            }
        }
    });

    let submit = move |e: FormEvent| {
        e.prevent_default();
        if busy() {
            return;
        }
        let session = session.clone();
        let prefs = prefs.clone();
        spawn(async move {
            busy.set(true);
            error.set(None);
            match session.handle_login(&email(), &password(), remember()).await {
                Ok(()) => {
                    // First good moment to ask: the user just acted.
                    prefs.request_notification_permission();
                }
                Err(e) => error.set(Some(e)),
            }
            busy.set(false);
        });
    };

    rsx! {
        Layout {
            title: "Log in".to_string(),
            nav_active: "login".to_string(),

            h1 { "Log in" }

            if let Some(err) = error() {
                ErrorAlert {
                    error: err,
                    on_dismiss: move |_| error.set(None),
                }
            }

            form { class: "login-form", onsubmit: submit,
                TextInput {
                    label: "Email",
                    input_type: "email",
                    value: email(),
                    on_input: move |v| email.set(v),
                }
                TextInput {
                    label: "Password",
                    input_type: "password",
                    value: password(),
                    on_input: move |v| password.set(v),
                }
                label { class: "field field-inline",
                    input {
                        r#type: "checkbox",
                        checked: remember(),
                        onchange: move |e: FormEvent| remember.set(e.checked()),
                    }
                    span { "Stay signed in on this device" }
                }
                button {
                    class: "btn btn-primary",
                    r#type: "submit",
                    disabled: busy(),
                    if busy() { "Signing in…" } else { "Log in" }
                }
            }
        }
    }
}
