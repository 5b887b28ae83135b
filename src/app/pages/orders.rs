//! Staff order queue page component.

use dioxus::prelude::*;

use crate::app::api::{
    format_cents, item_path, paged_path, routes, ApiError, OrderRecord, OrderStatus, Page,
    StatusUpdateRequest,
};
use crate::app::components::{ErrorAlert, Layout, Pagination};
use crate::app::live::use_live;
use crate::app::session::use_api;
use crate::app::Route;

use super::{use_auth_guard, Access};

const PAGE_SIZE: u32 = 10;

/// Transitions staff may apply from a given status. Terminal states have
/// none.
fn next_statuses(status: OrderStatus) -> &'static [OrderStatus] {
    match status {
        OrderStatus::Started => &[OrderStatus::Finished, OrderStatus::Canceled],
        OrderStatus::Finished => &[OrderStatus::Delivered, OrderStatus::Canceled],
        OrderStatus::Canceled | OrderStatus::Delivered => &[],
    }
}

/// Staff order queue with a status filter. Refetches when a
/// requests-changed push arrives while the page is open.
#[component]
pub fn Orders() -> Element {
    use_auth_guard(Access::Staff);

    let client = use_api();
    let live = use_live();

    let mut page = use_signal(|| 0u32);
    let mut filter = use_signal(|| None::<OrderStatus>);
    let mut error = use_signal(|| None::<ApiError>);

    let orders_client = client.clone();
    let mut orders = use_resource(move || {
        let client = orders_client.clone();
        async move {
            let status = filter().map(OrderStatus::tag).unwrap_or("");
            client
                .get::<Page<OrderRecord>>(&paged_path(
                    routes::ORDERS,
                    page(),
                    PAGE_SIZE,
                    &[("status", status)],
                ))
                .await
        }
    });

    // Refetch on requests-changed pushes while this page is open.
    use_effect(move || {
        if (live.orders_stale)() > 0 {
            orders.restart();
        }
    });

    let transition = move |(uuid, status): (String, OrderStatus)| {
        let client = client.clone();
        spawn(async move {
            let result = client
                .patch(
                    &item_path(routes::ORDERS, &uuid),
                    &StatusUpdateRequest { status },
                )
                .await;
            match result {
                Ok(()) => orders.restart(),
                Err(e) => error.set(Some(e)),
            }
        });
    };

    let body = match orders.read().as_ref() {
        None => rsx! {
            div { class: "card", "aria-busy": "true", "Loading orders…" }
        },
        Some(Err(e)) => rsx! {
            div { class: "card", "Could not load orders: {e}" }
        },
        Some(Ok(page_data)) => {
            let total_pages = page_data.total_pages;
            if page_data.content.is_empty() {
                rsx! {
                    div { class: "card", "No orders here." }
                }
            } else {
                rsx! {
                    table { class: "orders-table",
                        thead {
                            tr {
                                th { "Order" }
                                th { "Customer" }
                                th { "Table" }
                                th { "Total" }
                                th { "Status" }
                                th {}
                            }
                        }
                        tbody {
                            for order in page_data.content.clone() {
                                OrderRow {
                                    key: "{order.uuid}",
                                    order,
                                    on_transition: transition.clone(),
                                }
                            }
                        }
                    }
                    Pagination {
                        page: page(),
                        total_pages,
                        on_change: move |p| page.set(p),
                    }
                }
            }
        }
    };

    rsx! {
        Layout {
            title: "Orders".to_string(),
            nav_active: "orders".to_string(),

            h1 { "Orders" }

            if let Some(err) = error() {
                ErrorAlert {
                    error: err,
                    on_dismiss: move |_| error.set(None),
                }
            }

            div { class: "filter-row", role: "group",
                button {
                    class: if filter().is_none() { "btn btn-primary btn-sm" } else { "btn btn-sm" },
                    onclick: move |_| {
                        filter.set(None);
                        page.set(0);
                    },
                    "All"
                }
                for status in [
                    OrderStatus::Started,
                    OrderStatus::Finished,
                    OrderStatus::Delivered,
                    OrderStatus::Canceled,
                ] {
                    button {
                        key: "{status.tag()}",
                        class: if filter() == Some(status) { "btn btn-primary btn-sm" } else { "btn btn-sm" },
                        onclick: move |_| {
                            filter.set(Some(status));
                            page.set(0);
                        },
                        "{status.label()}"
                    }
                }
            }

            {body}
        }
    }
}

#[component]
fn OrderRow(order: OrderRecord, on_transition: EventHandler<(String, OrderStatus)>) -> Element {
    let total = format_cents(order.total_cents());
    let table = order
        .table
        .as_ref()
        .map(|t| format!("Table {}", t.number))
        .unwrap_or_else(|| "—".to_string());
    let owner = order.owner_email.clone().unwrap_or_default();
    let uuid = order.uuid.clone();
    let short = short_id(&order.uuid).to_string();
    let status_class = format!("badge status-{}", order.status.tag().to_lowercase());

    rsx! {
        tr {
            td {
                Link { to: Route::OrderDetail { uuid: uuid.clone() }, "{short}" }
            }
            td { "{owner}" }
            td { "{table}" }
            td { "{total}" }
            td {
                span { class: "{status_class}", "{order.status.label()}" }
            }
            td {
                for next in next_statuses(order.status).iter().copied() {
                    button {
                        key: "{next.tag()}",
                        class: "btn btn-sm",
                        onclick: {
                            let uuid = order.uuid.clone();
                            move |_| on_transition.call((uuid.clone(), next))
                        },
                        "{next.label()}"
                    }
                }
            }
        }
    }
}

/// First uuid segment, enough to tell orders apart on a crowded shift.
fn short_id(uuid: &str) -> &str {
    uuid.split('-').next().unwrap_or(uuid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_statuses_offer_no_transitions() {
        assert!(next_statuses(OrderStatus::Canceled).is_empty());
        assert!(next_statuses(OrderStatus::Delivered).is_empty());
        assert_eq!(
            next_statuses(OrderStatus::Started),
            &[OrderStatus::Finished, OrderStatus::Canceled]
        );
        assert_eq!(
            next_statuses(OrderStatus::Finished),
            &[OrderStatus::Delivered, OrderStatus::Canceled]
        );
    }

    #[test]
    fn short_id_takes_the_first_segment() {
        assert_eq!(short_id("8f14e45f-ceea-467f-9575-6b1d3a60c1ce"), "8f14e45f");
        assert_eq!(short_id("plain"), "plain");
    }
}
