//! Order summary modal raised by live status pushes.

use dioxus::prelude::*;

use crate::app::api::{format_cents, OrderRecord};
use crate::app::live::{use_live, ModalState};
use crate::app::Route;

/// Modal shown when a status push arrives for one of the user's orders.
/// Renders a spinner while the record is fetched, the summary once it is
/// available, and an explicit empty state when the fetch failed.
#[component]
pub fn OrderSummaryModal() -> Element {
    let live = use_live();
    let state = live.modal_state();

    if state == ModalState::Idle {
        return rsx! {};
    }

    rsx! {
        div { class: "modal-backdrop",
            dialog { class: "modal", open: true, "aria-label": "Order update",
                match state {
                    ModalState::Loading { .. } => rsx! {
                        p { "aria-busy": "true", "Loading order…" }
                    },
                    ModalState::Ready(order) => rsx! {
                        OrderSummary { order }
                    },
                    ModalState::Missing => rsx! {
                        p { "Order details are not available." }
                    },
                    ModalState::Idle => rsx! {},
                }
                footer {
                    button {
                        class: "btn",
                        onclick: move |_| live.dismiss_modal(),
                        "Close"
                    }
                }
            }
        }
    }
}

#[component]
fn OrderSummary(order: OrderRecord) -> Element {
    let live = use_live();
    let total = format_cents(order.total_cents());
    let uuid = order.uuid.clone();

    rsx! {
        header {
            strong { "Order {order.status.label().to_lowercase()}" }
        }
        ul { class: "order-lines",
            for (idx, drink) in order.drinks.iter().enumerate() {
                li { key: "{idx}",
                    span { "{drink.name}" }
                    span { class: "text-muted", {format_cents(drink.price_cents)} }
                }
            }
        }
        p {
            strong { "Total: {total}" }
            if let Some(table) = &order.table {
                span { class: "text-muted", " · Table {table.number}" }
            }
        }
        Link {
            class: "btn btn-ghost btn-sm",
            to: Route::OrderDetail { uuid },
            onclick: move |_| live.dismiss_modal(),
            "View order"
        }
    }
}
