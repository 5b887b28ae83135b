//! User management page component (admin).

use dioxus::prelude::*;

use crate::app::api::{
    item_path, paged_path, routes, ApiError, LockRequest, Page, User,
};
use crate::app::components::form_inputs::SearchBox;
use crate::app::components::{ErrorAlert, Layout, Pagination};
use crate::app::session::use_api;
use crate::app::toast::use_toast;

use super::{use_auth_guard, Access};

const PAGE_SIZE: u32 = 15;

/// User management: search, list, and toggle the ordering lock.
#[component]
pub fn Users() -> Element {
    use_auth_guard(Access::Admin);

    let client = use_api();
    let toast = use_toast();

    let mut page = use_signal(|| 0u32);
    let mut search = use_signal(String::new);
    let mut error = use_signal(|| None::<ApiError>);

    let list_client = client.clone();
    let mut users = use_resource(move || {
        let client = list_client.clone();
        async move {
            client
                .get::<Page<User>>(&paged_path(
                    routes::USERS,
                    page(),
                    PAGE_SIZE,
                    &[("email", &search())],
                ))
                .await
        }
    });

    let set_lock = move |(id, locked): (u64, bool)| {
        let client = client.clone();
        spawn(async move {
            let result = client
                .patch(
                    &item_path(routes::USERS, id),
                    &LockRequest {
                        locked_requests: locked,
                    },
                )
                .await;
            match result {
                Ok(()) => {
                    toast.success(if locked {
                        "Ordering locked for this account."
                    } else {
                        "Ordering unlocked."
                    });
                    users.restart();
                }
                Err(e) => error.set(Some(e)),
            }
        });
    };

    let body = match users.read().as_ref() {
        None => rsx! {
            div { class: "card", "aria-busy": "true", "Loading users…" }
        },
        Some(Err(e)) => rsx! {
            div { class: "card", "Could not load users: {e}" }
        },
        Some(Ok(page_data)) => {
            let total_pages = page_data.total_pages;
            if page_data.content.is_empty() {
                rsx! {
                    div { class: "card", "No users match your search." }
                }
            } else {
                rsx! {
                    table { class: "admin-table",
                        thead {
                            tr {
                                th { "Email" }
                                th { "Role" }
                                th { "Ordering" }
                                th {}
                            }
                        }
                        tbody {
                            for user in page_data.content.clone() {
                                tr { key: "{user.id}",
                                    td { "{user.email}" }
                                    td { "{user.role:?}" }
                                    td {
                                        if user.locked_requests {
                                            span { class: "badge badge-locked", "Locked" }
                                        } else {
                                            span { class: "badge", "Open" }
                                        }
                                    }
                                    td {
                                        button {
                                            class: "btn btn-sm",
                                            onclick: {
                                                let set_lock = set_lock.clone();
                                                move |_| set_lock((user.id, !user.locked_requests))
                                            },
                                            if user.locked_requests { "Unlock" } else { "Lock" }
                                        }
                                    }
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
            title: "Users".to_string(),
            nav_active: "users".to_string(),

            h1 { "Users" }

            if let Some(err) = error() {
                ErrorAlert {
                    error: err,
                    on_dismiss: move |_| error.set(None),
                }
            }

            SearchBox {
                placeholder: "Search by email…",
                value: search(),
                on_input: move |q| {
                    search.set(q);
                    page.set(0);
                },
            }

            {body}
        }
    }
}
