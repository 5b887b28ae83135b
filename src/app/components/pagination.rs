//! Pager for Spring-style page envelopes.

use dioxus::prelude::*;

/// Previous/next pager. Pages are zero-based on the wire, one-based in the
/// label. Hidden entirely when there is a single page.
#[component]
pub fn Pagination(
    /// Current zero-based page
    page: u32,
    /// Total page count
    total_pages: u32,
    /// Called with the new zero-based page
    on_change: EventHandler<u32>,
) -> Element {
    if total_pages <= 1 {
        return rsx! {};
    }
    let last = total_pages - 1;
    let display = page + 1;

    rsx! {
        nav { class: "pager", "aria-label": "Pagination",
            button {
                class: "btn btn-sm",
                disabled: page == 0,
                onclick: move |_| on_change.call(page.saturating_sub(1)),
                "Previous"
            }
            span { class: "pager-label", "Page {display} of {total_pages}" }
            button {
                class: "btn btn-sm",
                disabled: page >= last,
                onclick: move |_| on_change.call((page + 1).min(last)),
                "Next"
            }
        }
    }
}
