//! Cart page component: review, pick a table, submit.

use std::collections::BTreeMap;

use dioxus::prelude::*;

use crate::app::api::{
    format_cents, paged_path, routes, ApiError, Drink, OrderRecord, Page, SubmitOrderRequest, Table,
};
use crate::app::cart::use_cart;
use crate::app::components::{ErrorAlert, Layout};
use crate::app::session::{use_api, use_session};
use crate::app::toast::use_toast;
use crate::app::Route;

use super::{use_auth_guard, Access};

/// A cart line: one drink with the number of units ordered.
fn grouped_lines(drinks: &[Drink]) -> Vec<(Drink, usize)> {
    let mut counts: BTreeMap<u64, (Drink, usize)> = BTreeMap::new();
    for drink in drinks {
        counts
            .entry(drink.id)
            .and_modify(|(_, n)| *n += 1)
            .or_insert_with(|| (drink.clone(), 1));
    }
    counts.into_values().collect()
}

/// Cart page. Submission sends one drink id per unit; on success the local
/// cart is cleared and the user is taken to the order's detail page.
#[component]
pub fn CartPage() -> Element {
    use_auth_guard(Access::Authenticated);

    let client = use_api();
    let session = use_session();
    let cart = use_cart();
    let toast = use_toast();
    let nav = navigator();

    let locked = session.orderer().locked;

    let mut error = use_signal(|| None::<ApiError>);
    let mut busy = use_signal(|| false);

    // All tables fit on one page in practice.
    let tables_client = client.clone();
    let tables = use_resource(move || {
        let client = tables_client.clone();
        async move {
            client
                .get::<Page<Table>>(&paged_path(routes::TABLES, 0, 100, &[]))
                .await
                .map(|p| p.content)
                .unwrap_or_default()
        }
    });

    let snapshot = cart.snapshot();
    let lines = grouped_lines(&snapshot.drinks);
    let total = format_cents(snapshot.total_cents());
    let table_list = tables.read().clone().unwrap_or_default();

    let cart_for_table = cart.clone();
    let pick_table = move |e: FormEvent| {
        let picked = e
            .value()
            .parse::<u64>()
            .ok()
            .and_then(|id| table_list.iter().find(|t| t.id == id).cloned());
        cart_for_table.change_table(picked);
    };

    let cart_for_submit = cart.clone();
    let submit = move |_| {
        if busy() {
            return;
        }
        let client = client.clone();
        let cart = cart_for_submit.clone();
        spawn(async move {
            busy.set(true);
            error.set(None);
            let snapshot = cart.snapshot();
            let request = SubmitOrderRequest {
                drink_ids: snapshot.drinks.iter().map(|d| d.id).collect(),
                table_id: snapshot.table.as_ref().map(|t| t.id),
            };
            match client
                .post::<_, OrderRecord>(routes::ORDERS, &request)
                .await
            {
                Ok(order) => {
                    cart.clear_request();
                    toast.success("Order submitted.");
                    nav.push(Route::OrderDetail { uuid: order.uuid });
                }
                Err(e) => error.set(Some(e)),
            }
            busy.set(false);
        });
    };

    let selected_table = snapshot.table.as_ref().map(|t| t.id);
    let cart_for_remove = cart.clone();

    rsx! {
        Layout {
            title: "Cart".to_string(),
            nav_active: "cart".to_string(),

            h1 { "Your cart" }

            if let Some(err) = error() {
                ErrorAlert {
                    error: err,
                    on_dismiss: move |_| error.set(None),
                }
            }

            if locked {
                div { class: "alert alert-error",
                    "Your account is locked for ordering. Talk to the staff to unlock it."
                }
            }

            if lines.is_empty() {
                div { class: "card", "Your cart is empty. Find something on the menu." }
            } else {
                table { class: "cart-table",
                    thead {
                        tr {
                            th { "Drink" }
                            th { "Units" }
                            th { "Price" }
                            th {}
                        }
                    }
                    tbody {
                        for (drink, count) in lines {
                            tr { key: "{drink.id}",
                                td { "{drink.name}" }
                                td { "{count}" }
                                td { {format_cents(drink.price_cents * count as i64)} }
                                td {
                                    button {
                                        class: "btn btn-ghost btn-sm",
                                        "aria-label": "Remove one {drink.name}",
                                        onclick: {
                                            let cart = cart_for_remove.clone();
                                            move |_| cart.remove_one(drink.id)
                                        },
                                        "−"
                                    }
                                }
                            }
                        }
                    }
                    tfoot {
                        tr {
                            th { "Total" }
                            th {}
                            th { "{total}" }
                            th {}
                        }
                    }
                }

                label { class: "field",
                    span { class: "field-label", "Table" }
                    select { class: "input", onchange: pick_table,
                        option { value: "", selected: selected_table.is_none(), "No table" }
                        for table in tables.read().clone().unwrap_or_default() {
                            option {
                                key: "{table.id}",
                                value: "{table.id}",
                                selected: selected_table == Some(table.id),
                                "Table {table.number} ({table.seats} seats)"
                            }
                        }
                    }
                }

                button {
                    class: "btn btn-primary",
                    disabled: busy() || locked,
                    onclick: submit,
                    if busy() { "Submitting…" } else { "Submit order" }
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn lines_group_units_of_the_same_drink() {
        let cola = Drink {
            id: 1,
            name: "Cola".into(),
            price_cents: 350,
            ..Default::default()
        };
        let spezi = Drink {
            id: 2,
            name: "Spezi".into(),
            price_cents: 380,
            ..Default::default()
        };
        let lines = grouped_lines(&[cola.clone(), spezi.clone(), cola]);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].0.id, 1);
        assert_eq!(lines[0].1, 2);
        assert_eq!(lines[1].1, 1);
    }
}
