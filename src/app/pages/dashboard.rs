//! Revenue dashboard page component (admin).

use dioxus::prelude::*;

use crate::app::api::{format_cents, routes, MonthlyRevenue, StatusCounts};
use crate::app::components::Layout;
use crate::app::session::use_api;

use super::{use_auth_guard, Access};

/// Admin dashboard: order counts per status and revenue per month.
#[component]
pub fn Dashboard() -> Element {
    use_auth_guard(Access::Admin);

    let client = use_api();

    let counts_client = client.clone();
    let counts = use_resource(move || {
        let client = counts_client.clone();
        async move { client.get::<StatusCounts>(routes::STATS_STATUS).await }
    });

    let revenue = use_resource(move || {
        let client = client.clone();
        async move {
            client
                .get::<Vec<MonthlyRevenue>>(routes::STATS_MONTHLY)
                .await
        }
    });

    let counts_body = match counts.read().as_ref() {
        None => rsx! {
            div { class: "card", "aria-busy": "true", "Loading…" }
        },
        Some(Err(e)) => rsx! {
            div { class: "card", "Could not load status counts: {e}" }
        },
        Some(Ok(counts)) => {
            let cards = [
                ("Started", counts.started),
                ("Finished", counts.finished),
                ("Delivered", counts.delivered),
                ("Canceled", counts.canceled),
            ];
            rsx! {
                div { class: "stat-grid",
                    for (label, value) in cards {
                        div { key: "{label}", class: "card stat-card",
                            span { class: "stat-value", "{value}" }
                            span { class: "text-muted", "{label}" }
                        }
                    }
                }
            }
        }
    };

    let revenue_body = match revenue.read().as_ref() {
        None => rsx! {
            div { class: "card", "aria-busy": "true", "Loading…" }
        },
        Some(Err(e)) => rsx! {
            div { class: "card", "Could not load revenue: {e}" }
        },
        Some(Ok(months)) if months.is_empty() => rsx! {
            div { class: "card", "No revenue recorded yet." }
        },
        Some(Ok(months)) => rsx! {
            table { class: "admin-table",
                thead {
                    tr {
                        th { "Month" }
                        th { "Revenue" }
                    }
                }
                tbody {
                    for month in months.clone() {
                        tr { key: "{month.month}",
                            td { "{month.month}" }
                            td { {format_cents(month.total_cents)} }
                        }
                    }
                }
            }
        },
    };

    rsx! {
        Layout {
            title: "Dashboard".to_string(),
            nav_active: "dashboard".to_string(),

            h1 { "Dashboard" }

            section {
                h2 { "Orders by status" }
                {counts_body}
            }
            section {
                h2 { "Monthly revenue" }
                {revenue_body}
            }
        }
    }
}
