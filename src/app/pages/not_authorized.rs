//! Not-authorized page component.

use dioxus::prelude::*;

use crate::app::components::Layout;
use crate::app::Route;

/// Shown when a signed-in user opens a page their role does not allow.
#[component]
pub fn NotAuthorized() -> Element {
    rsx! {
        Layout {
            title: "Not authorized".to_string(),
            nav_active: String::new(),

            h1 { "Not authorized" }
            p { "Your account does not have access to this page." }
            Link { class: "btn", to: Route::Menu {}, "Back to the menu" }
        }
    }
}
