//! Layout component wrapping all pages.

use dioxus::prelude::*;

use super::nav::Nav;
use super::order_modal::OrderSummaryModal;
use crate::app::live::LiveUpdates;
use crate::app::toast::ToastHost;

#[derive(Props, Clone, PartialEq)]
pub struct LayoutProps {
    /// Page title (shown in browser tab)
    pub title: String,
    /// Active navigation item ID
    pub nav_active: String,
    /// Page content
    pub children: Element,
}

/// Main layout component wrapping all pages.
///
/// Also hosts the singletons that must live inside the router: the live
/// effect pipeline, the order summary modal, and the toast stack.
#[component]
pub fn Layout(props: LayoutProps) -> Element {
    let version = env!("CARGO_PKG_VERSION");
    let full_title = format!("{} - Taproom", props.title);

    rsx! {
        // Head elements - Dioxus hoists these to the real <head>
        document::Title { "{full_title}" }

        // Body content
        Nav { active: props.nav_active.clone() }
        main { class: "page",
            {props.children}
        }
        footer { class: "page-footer",
            small { class: "text-muted", "Taproom v{version}" }
        }

        LiveUpdates {}
        OrderSummaryModal {}
        ToastHost {}
    }
}
