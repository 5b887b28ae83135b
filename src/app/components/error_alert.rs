//! Dismissable error alert component.

use dioxus::prelude::*;

use crate::app::api::ApiError;

/// A dismissable alert for a failed backend call. Field-level validation
/// errors are listed under the main message when the backend sent any.
#[component]
pub fn ErrorAlert(
    /// The error to display
    error: ApiError,
    /// Called when the dismiss button is clicked
    on_dismiss: EventHandler<()>,
) -> Element {
    let field_errors: Vec<(String, String)> = error
        .field_errors()
        .map(|fields| {
            let mut list: Vec<(String, String)> = fields
                .iter()
                .map(|(field, messages)| (field.clone(), messages.join(", ")))
                .collect();
            list.sort();
            list
        })
        .unwrap_or_default();

    rsx! {
        div { class: "alert alert-error", role: "alert",
            "{error}"
            if !field_errors.is_empty() {
                ul {
                    for (field, messages) in field_errors {
                        li { key: "{field}",
                            strong { "{field}: " }
                            "{messages}"
                        }
                    }
                }
            }
            button {
                class: "btn btn-ghost btn-sm",
                "aria-label": "Dismiss",
                onclick: move |_| on_dismiss.call(()),
                "×"
            }
        }
    }
}
