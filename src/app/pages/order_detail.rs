//! Single order detail page component.

use dioxus::prelude::*;

use crate::app::api::{format_cents, item_path, routes, OrderRecord};
use crate::app::components::Layout;
use crate::app::live::use_live;
use crate::app::session::use_api;

use super::{use_auth_guard, Access};

/// Order detail page. Refetches when a status push for this order arrives
/// while the page is open.
#[component]
pub fn OrderDetail(uuid: String) -> Element {
    use_auth_guard(Access::Authenticated);

    let client = use_api();
    let live = use_live();

    // Mirror the route param into a signal so the resource and the stale
    // check both follow in-place navigation between orders.
    let mut target = use_signal(|| uuid.clone());
    if *target.peek() != uuid {
        target.set(uuid.clone());
    }

    let mut order = use_resource(move || {
        let client = client.clone();
        async move {
            client
                .get::<OrderRecord>(&item_path(routes::ORDERS, &target()))
                .await
        }
    });

    use_effect(move || {
        // Subscribes to the live event counter; the stale marker tells us
        // whether the push was for this order.
        let _ = (live.event_count)();
        if live.take_detail_stale(&target.peek()) {
            order.restart();
        }
    });

    let body = match order.read().as_ref() {
        None => rsx! {
            div { class: "card", "aria-busy": "true", "Loading order…" }
        },
        Some(Err(e)) => rsx! {
            div { class: "card", "Could not load this order: {e}" }
        },
        Some(Ok(record)) => {
            let record = record.clone();
            let total = format_cents(record.total_cents());
            let created = record
                .created_at
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string());
            rsx! {
                article { class: "card order-detail",
                    header {
                        h2 { "Order {record.uuid}" }
                        span { class: "badge", "{record.status.label()}" }
                    }
                    if let Some(created) = created {
                        p { class: "text-muted", "Placed {created}" }
                    }
                    if let Some(table) = &record.table {
                        p { "Table {table.number}" }
                    }
                    ul { class: "order-lines",
                        for (idx, drink) in record.drinks.iter().enumerate() {
                            li { key: "{idx}",
                                span { "{drink.name}" }
                                span { class: "text-muted", {format_cents(drink.price_cents)} }
                            }
                        }
                    }
                    p {
                        strong { "Total: {total}" }
                    }
                }
            }
        }
    };

    rsx! {
        Layout {
            title: "Order".to_string(),
            nav_active: "orders".to_string(),

            h1 { "Order details" }
            {body}
        }
    }
}
