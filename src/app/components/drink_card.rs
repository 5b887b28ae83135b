//! Menu card for a single drink.

use dioxus::prelude::*;

use crate::app::api::{format_cents, Drink};

/// A drink on the menu with its price and an add-to-cart button.
#[component]
pub fn DrinkCard(
    /// The drink to render
    drink: Drink,
    /// True when the cart already holds a unit of this drink
    in_cart: bool,
    /// Called when the add button is clicked
    on_add: EventHandler<Drink>,
) -> Element {
    let price = format_cents(drink.price_cents);
    let additives = drink.additives.join(", ");
    let drink_for_add = drink.clone();

    rsx! {
        article { class: "card drink-card",
            if let Some(url) = &drink.picture_url {
                img { class: "drink-picture", src: "{url}", alt: "{drink.name}" }
            }
            header {
                strong { "{drink.name}" }
                if drink.alcoholic {
                    span { class: "badge badge-alcohol", title: "Contains alcohol", "18+" }
                }
            }
            if !additives.is_empty() {
                p { class: "text-muted drink-additives", "Additives: {additives}" }
            }
            footer {
                span { class: "drink-price", "{price}" }
                button {
                    class: "btn btn-primary btn-sm",
                    onclick: move |_| on_add.call(drink_for_add.clone()),
                    if in_cart { "Add another" } else { "Add to cart" }
                }
            }
        }
    }
}
