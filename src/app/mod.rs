//! Browser ordering client entry point.
//!
//! This module provides the root App component: context providers for the
//! shared state holders, then the router.

use dioxus::prelude::*;

pub mod api;
pub mod cart;
pub mod components;
pub mod live;
pub mod pages;
pub mod prefs;
pub mod session;
pub mod stomp;
pub mod storage;
pub mod toast;

use cart::use_cart_provider;
use live::use_live_provider;
use pages::{
    CartPage, Dashboard, DrinksAdmin, Login, Menu, NotAuthorized, OrderDetail, Orders, Tables,
    Users,
};
use prefs::use_prefs_provider;
use session::use_session_provider;
use toast::use_toast_provider;

/// Root app component with routing
#[component]
pub fn App() -> Element {
    // Provider order matters: the live listener reads the session, the
    // effect pipeline reads prefs and toasts.
    use_toast_provider();
    use_prefs_provider();
    use_session_provider();
    use_cart_provider();
    use_live_provider();

    rsx! {
        document::Link { rel: "stylesheet", href: "/assets/taproom.css" }
        Router::<Route> {}
    }
}

/// Application routes
#[derive(Clone, Routable, Debug, PartialEq)]
pub enum Route {
    #[route("/")]
    Menu {},
    #[route("/cart")]
    CartPage {},
    #[route("/login")]
    Login {},
    #[route("/orders")]
    Orders {},
    #[route("/orders/:uuid")]
    OrderDetail { uuid: String },
    #[route("/admin/drinks")]
    DrinksAdmin {},
    #[route("/admin/tables")]
    Tables {},
    #[route("/admin/users")]
    Users {},
    #[route("/dashboard")]
    Dashboard {},
    #[route("/not-authorized")]
    NotAuthorized {},
}
