//! Table management page component (admin).

use dioxus::prelude::*;

use crate::app::api::{item_path, paged_path, routes, ApiError, Page, Table, TablePayload};
use crate::app::components::form_inputs::NumberInput;
use crate::app::components::{ErrorAlert, Layout};
use crate::app::session::use_api;
use crate::app::toast::use_toast;

use super::{use_auth_guard, Access};

/// Table management: list, create, delete.
#[component]
pub fn Tables() -> Element {
    use_auth_guard(Access::Admin);

    let client = use_api();
    let toast = use_toast();

    let mut number = use_signal(|| 1u32);
    let mut seats = use_signal(|| 4u32);
    let mut error = use_signal(|| None::<ApiError>);

    let list_client = client.clone();
    let mut tables = use_resource(move || {
        let client = list_client.clone();
        async move {
            client
                .get::<Page<Table>>(&paged_path(routes::TABLES, 0, 100, &[]))
                .await
        }
    });

    let create_client = client.clone();
    let create = move |e: FormEvent| {
        e.prevent_default();
        let client = create_client.clone();
        spawn(async move {
            let payload = TablePayload {
                number: number(),
                seats: seats(),
            };
            match client.post::<_, Table>(routes::TABLES, &payload).await {
                Ok(created) => {
                    toast.success(format!("Table {} created.", created.number));
                    error.set(None);
                    tables.restart();
                }
                Err(e) => error.set(Some(e)),
            }
        });
    };

    let delete_client = client.clone();
    let delete = move |id: u64| {
        let client = delete_client.clone();
        spawn(async move {
            match client.delete(&item_path(routes::TABLES, id)).await {
                Ok(()) => {
                    toast.success("Table deleted.");
                    tables.restart();
                }
                Err(e) => error.set(Some(e)),
            }
        });
    };

    let body = match tables.read().as_ref() {
        None => rsx! {
            div { class: "card", "aria-busy": "true", "Loading tables…" }
        },
        Some(Err(e)) => rsx! {
            div { class: "card", "Could not load tables: {e}" }
        },
        Some(Ok(page_data)) => rsx! {
            table { class: "admin-table",
                thead {
                    tr {
                        th { "Number" }
                        th { "Seats" }
                        th {}
                    }
                }
                tbody {
                    for table in page_data.content.clone() {
                        tr { key: "{table.id}",
                            td { "Table {table.number}" }
                            td { "{table.seats}" }
                            td {
                                button {
                                    class: "btn btn-ghost btn-sm",
                                    onclick: {
                                        let delete = delete.clone();
                                        move |_| delete(table.id)
                                    },
                                    "Delete"
                                }
                            }
                        }
                    }
                }
            }
        },
    };

    rsx! {
        Layout {
            title: "Tables".to_string(),
            nav_active: "tables".to_string(),

            h1 { "Tables" }

            if let Some(err) = error() {
                ErrorAlert {
                    error: err,
                    on_dismiss: move |_| error.set(None),
                }
            }

            {body}

            form { class: "admin-form", onsubmit: create,
                h2 { "New table" }
                NumberInput {
                    label: "Number",
                    value: number(),
                    on_change: move |v| number.set(v),
                }
                NumberInput {
                    label: "Seats",
                    value: seats(),
                    on_change: move |v| seats.set(v),
                }
                button { class: "btn btn-primary", r#type: "submit", "Create table" }
            }
        }
    }
}
