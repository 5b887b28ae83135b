//! Drink management page component (admin).

use dioxus::prelude::*;

use crate::app::api::{
    format_cents, item_path, paged_path, parse_cents, routes, ApiError, Drink, DrinkPayload, Page,
};
use crate::app::components::form_inputs::{TextInput, ToggleInput};
use crate::app::components::{ErrorAlert, Layout, Pagination};
use crate::app::session::use_api;
use crate::app::toast::use_toast;

use super::{use_auth_guard, Access};

const PAGE_SIZE: u32 = 10;

/// The edit form, kept as plain strings until submit.
#[derive(Clone, Default, PartialEq)]
struct DrinkForm {
    editing: Option<u64>,
    name: String,
    price: String,
    alcoholic: bool,
    additives: String,
    picture_url: String,
}

impl DrinkForm {
    fn from_drink(drink: &Drink) -> Self {
        Self {
            editing: Some(drink.id),
            name: drink.name.clone(),
            price: format_cents(drink.price_cents),
            alcoholic: drink.alcoholic,
            additives: drink.additives.join(", "),
            picture_url: drink.picture_url.clone().unwrap_or_default(),
        }
    }

    /// Build the request payload; `None` when the form does not validate.
    fn payload(&self) -> Option<DrinkPayload> {
        let name = self.name.trim();
        if name.is_empty() {
            return None;
        }
        let price_cents = parse_cents(&self.price)?;
        let additives = self
            .additives
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        let picture_url = match self.picture_url.trim() {
            "" => None,
            url => Some(url.to_string()),
        };
        Some(DrinkPayload {
            name: name.to_string(),
            price_cents,
            alcoholic: self.alcoholic,
            additives,
            picture_url,
        })
    }
}

/// Drink catalog management: list, create, edit, delete.
#[component]
pub fn DrinksAdmin() -> Element {
    use_auth_guard(Access::Admin);

    let client = use_api();
    let toast = use_toast();

    let mut page = use_signal(|| 0u32);
    let mut form = use_signal(DrinkForm::default);
    let mut error = use_signal(|| None::<ApiError>);

    let list_client = client.clone();
    let mut drinks = use_resource(move || {
        let client = list_client.clone();
        async move {
            client
                .get::<Page<Drink>>(&paged_path(routes::DRINKS, page(), PAGE_SIZE, &[]))
                .await
        }
    });

    let save_client = client.clone();
    let save = move |e: FormEvent| {
        e.prevent_default();
        let Some(payload) = form.read().payload() else {
            toast.error("Please fill in a name and a valid price.");
            return;
        };
        let editing = form.read().editing;
        let client = save_client.clone();
        spawn(async move {
            let result = match editing {
                Some(id) => client
                    .put::<_, Drink>(&item_path(routes::DRINKS, id), &payload)
                    .await,
                None => client.post::<_, Drink>(routes::DRINKS, &payload).await,
            };
            match result {
                Ok(saved) => {
                    toast.success(format!("{} saved.", saved.name));
                    form.set(DrinkForm::default());
                    error.set(None);
                    drinks.restart();
                }
                Err(e) => error.set(Some(e)),
            }
        });
    };

    let delete_client = client.clone();
    let delete = move |id: u64| {
        let client = delete_client.clone();
        spawn(async move {
            match client.delete(&item_path(routes::DRINKS, id)).await {
                Ok(()) => {
                    toast.success("Drink deleted.");
                    drinks.restart();
                }
                Err(e) => error.set(Some(e)),
            }
        });
    };

    let editing = form.read().editing;
    let body = match drinks.read().as_ref() {
        None => rsx! {
            div { class: "card", "aria-busy": "true", "Loading drinks…" }
        },
        Some(Err(e)) => rsx! {
            div { class: "card", "Could not load drinks: {e}" }
        },
        Some(Ok(page_data)) => {
            let total_pages = page_data.total_pages;
            rsx! {
                table { class: "admin-table",
                    thead {
                        tr {
                            th { "Name" }
                            th { "Price" }
                            th { "Alcoholic" }
                            th {}
                        }
                    }
                    tbody {
                        for drink in page_data.content.clone() {
                            tr { key: "{drink.id}",
                                td { "{drink.name}" }
                                td { {format_cents(drink.price_cents)} }
                                td { if drink.alcoholic { "Yes" } else { "No" } }
                                td {
                                    button {
                                        class: "btn btn-ghost btn-sm",
                                        onclick: {
                                            let drink = drink.clone();
                                            move |_| form.set(DrinkForm::from_drink(&drink))
                                        },
                                        "Edit"
                                    }
                                    button {
                                        class: "btn btn-ghost btn-sm",
                                        onclick: {
                                            let delete = delete.clone();
                                            move |_| delete(drink.id)
                                        },
                                        "Delete"
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
    };

    rsx! {
        Layout {
            title: "Drinks".to_string(),
            nav_active: "drinks".to_string(),

            h1 { "Drinks" }

            if let Some(err) = error() {
                ErrorAlert {
                    error: err,
                    on_dismiss: move |_| error.set(None),
                }
            }

            {body}

            form { class: "admin-form", onsubmit: save,
                h2 { if editing.is_some() { "Edit drink" } else { "New drink" } }
                TextInput {
                    label: "Name",
                    value: form.read().name.clone(),
                    on_input: move |v| form.with_mut(|f| f.name = v),
                }
                TextInput {
                    label: "Price",
                    value: form.read().price.clone(),
                    on_input: move |v| form.with_mut(|f| f.price = v),
                }
                ToggleInput {
                    label: "Contains alcohol",
                    checked: form.read().alcoholic,
                    on_change: move |v| form.with_mut(|f| f.alcoholic = v),
                }
                TextInput {
                    label: "Additives (comma separated)",
                    value: form.read().additives.clone(),
                    on_input: move |v| form.with_mut(|f| f.additives = v),
                }
                TextInput {
                    label: "Picture URL",
                    value: form.read().picture_url.clone(),
                    on_input: move |v| form.with_mut(|f| f.picture_url = v),
                }
                button {
                    class: "btn btn-primary",
                    r#type: "submit",
                    if editing.is_some() { "Save changes" } else { "Create drink" }
                }
                if editing.is_some() {
                    button {
                        class: "btn",
                        r#type: "button",
                        onclick: move |_| form.set(DrinkForm::default()),
                        "Cancel"
                    }
                }
            }
        }
    }
}
