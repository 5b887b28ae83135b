//! Navigation component for the web UI.

use dioxus::prelude::*;

use crate::app::api::Role;
use crate::app::cart::use_cart;
use crate::app::prefs::use_prefs;
use crate::app::session::use_session;
use crate::app::Route;

#[derive(Props, Clone, PartialEq)]
pub struct NavProps {
    /// The currently active page ID (e.g., "menu", "orders")
    pub active: String,
}

#[component]
fn NavTab(active: bool, to: Route, label: String, badge: Option<usize>) -> Element {
    rsx! {
        li {
            Link {
                to,
                "aria-current": if active { "page" },
                if active {
                    strong { "{label}" }
                } else {
                    "{label}"
                }
                if let Some(count) = badge.filter(|c| *c > 0) {
                    span { class: "badge", "{count}" }
                }
            }
        }
    }
}

/// Navigation bar. Tabs follow the role: customers get menu and cart, staff
/// get the order queue, admins get the management pages.
#[component]
pub fn Nav(props: NavProps) -> Element {
    let session = use_session();
    let cart = use_cart();
    let prefs = use_prefs();
    let nav = navigator();

    let session_logout = session.clone();
    let cart_logout = cart.clone();
    let role = session.role();
    let is_staff = role.is_some_and(|r| r.is_staff());
    let is_admin = role.is_some_and(|r| r == Role::Admin);
    let sound_on = prefs.sound_enabled();

    rsx! {
        nav {
            ul {
                li {
                    strong { "Taproom" }
                }
            }
            ul {
                if !is_staff {
                    NavTab {
                        active: props.active == "menu",
                        to: Route::Menu {},
                        label: "Menu",
                    }
                    NavTab {
                        active: props.active == "cart",
                        to: Route::CartPage {},
                        label: "Cart",
                        badge: cart.item_count(),
                    }
                }
                if is_staff {
                    NavTab {
                        active: props.active == "orders",
                        to: Route::Orders {},
                        label: "Orders",
                    }
                }
                if is_admin {
                    NavTab {
                        active: props.active == "drinks",
                        to: Route::DrinksAdmin {},
                        label: "Drinks",
                    }
                    NavTab {
                        active: props.active == "tables",
                        to: Route::Tables {},
                        label: "Tables",
                    }
                    NavTab {
                        active: props.active == "users",
                        to: Route::Users {},
                        label: "Users",
                    }
                    NavTab {
                        active: props.active == "dashboard",
                        to: Route::Dashboard {},
                        label: "Dashboard",
                    }
                }
            }
            ul {
                li {
                    button {
                        class: "btn btn-ghost",
                        "aria-label": if sound_on { "Mute update sounds" } else { "Unmute update sounds" },
                        onclick: move |_| prefs.toggle_sound(),
                        if sound_on { "🔊" } else { "🔇" }
                    }
                }
                if session.authenticated() {
                    li {
                        span { class: "text-muted", {session.email().unwrap_or_default()} }
                    }
                    li {
                        button {
                            class: "btn btn-ghost",
                            onclick: move |_| {
                                // A cart must not leak into the next login.
                                cart_logout.clear_request();
                                session_logout.handle_logout();
                                nav.push(Route::Login {});
                            },
                            "Log out"
                        }
                    }
                } else {
                    li {
                        Link { to: Route::Login {}, "Log in" }
                    }
                }
            }
        }
    }
}
