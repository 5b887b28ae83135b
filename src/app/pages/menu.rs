//! Menu page component: the paginated drink list customers order from.

use dioxus::prelude::*;

use crate::app::api::{paged_path, routes, Drink, Page};
use crate::app::cart::{use_cart, AddOutcome};
use crate::app::components::{DrinkCard, Layout, Pagination};
use crate::app::components::form_inputs::SearchBox;
use crate::app::session::{use_api, use_session};
use crate::app::toast::use_toast;

use super::{use_auth_guard, Access};

const PAGE_SIZE: u32 = 12;

/// Menu page. Adding a drink runs the ordering rules; a duplicate add asks
/// for confirmation before the second unit goes in.
#[component]
pub fn Menu() -> Element {
    use_auth_guard(Access::Authenticated);

    let client = use_api();
    let session = use_session();
    let cart = use_cart();
    let toast = use_toast();

    let mut page = use_signal(|| 0u32);
    let mut search = use_signal(String::new);
    let mut pending_duplicate = use_signal(|| None::<Drink>);

    let drinks = use_resource(move || {
        let client = client.clone();
        async move {
            client
                .get::<Page<Drink>>(&paged_path(
                    routes::DRINKS,
                    page(),
                    PAGE_SIZE,
                    &[("name", &search())],
                ))
                .await
        }
    });

    let cart_for_add = cart.clone();
    let session_for_add = session.clone();
    let add = move |drink: Drink| {
        match cart_for_add.add_drink(&session_for_add.orderer(), &drink) {
            AddOutcome::Added => toast.success(format!("{} added to cart.", drink.name)),
            AddOutcome::NeedsConfirmation => pending_duplicate.set(Some(drink)),
            AddOutcome::Rejected(reason) => toast.error(reason.user_message()),
        }
    };

    let cart_for_confirm = cart.clone();
    let session_for_confirm = session.clone();
    let confirm_duplicate = move |_| {
        if let Some(drink) = pending_duplicate.take() {
            match cart_for_confirm.add_confirmed(&session_for_confirm.orderer(), &drink) {
                AddOutcome::Added => toast.success(format!("Another {} added.", drink.name)),
                AddOutcome::Rejected(reason) => toast.error(reason.user_message()),
                AddOutcome::NeedsConfirmation => {}
            }
        }
    };

    let snapshot = cart.snapshot();
    let body = match drinks.read().as_ref() {
        None => rsx! {
            div { class: "card", "aria-busy": "true", "Loading menu…" }
        },
        Some(Err(e)) => rsx! {
            div { class: "card", "Could not load the menu: {e}" }
        },
        Some(Ok(page_data)) => {
            let total_pages = page_data.total_pages;
            if page_data.content.is_empty() {
                rsx! {
                    div { class: "card", "No drinks match your search." }
                }
            } else {
                rsx! {
                    div { class: "drink-grid",
                        for drink in page_data.content.clone() {
                            DrinkCard {
                                key: "{drink.id}",
                                in_cart: snapshot.contains(drink.id),
                                drink,
                                on_add: add.clone(),
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
            title: "Menu".to_string(),
            nav_active: "menu".to_string(),

            h1 { "Menu" }
            SearchBox {
                placeholder: "Search drinks…",
                value: search(),
                on_input: move |q| {
                    search.set(q);
                    page.set(0);
                },
            }

            {body}

            if let Some(drink) = pending_duplicate() {
                div { class: "modal-backdrop",
                    dialog { class: "modal", open: true, "aria-label": "Confirm duplicate",
                        p { "{drink.name} is already in your cart. Add another one?" }
                        footer {
                            button {
                                class: "btn btn-primary",
                                onclick: confirm_duplicate,
                                "Add another"
                            }
                            button {
                                class: "btn",
                                onclick: move |_| pending_duplicate.set(None),
                                "Cancel"
                            }
                        }
                    }
                }
            }
        }
    }
}
