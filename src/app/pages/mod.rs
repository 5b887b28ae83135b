//! Page components for the ordering web UI.

use dioxus::prelude::*;

use crate::app::api::Role;
use crate::app::session::use_session;
use crate::app::Route;

pub mod cart;
pub mod dashboard;
pub mod drinks_admin;
pub mod login;
pub mod menu;
pub mod not_authorized;
pub mod order_detail;
pub mod orders;
pub mod tables;
pub mod users;

pub use cart::CartPage;
pub use dashboard::Dashboard;
pub use drinks_admin::DrinksAdmin;
pub use login::Login;
pub use menu::Menu;
pub use not_authorized::NotAuthorized;
pub use order_detail::OrderDetail;
pub use orders::Orders;
pub use tables::Tables;
pub use users::Users;

/// Minimum role a page requires.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Access {
    Authenticated,
    Staff,
    Admin,
}

/// Route guard: unauthenticated visitors go to the login page, users with
/// an insufficient role to the not-authorized page. Waits for a restored
/// session's profile fetch before deciding.
pub(crate) fn use_auth_guard(access: Access) {
    let session = use_session();
    let nav = navigator();
    use_effect(move || {
        if session.is_loading() {
            return;
        }
        let Some(role) = session.role() else {
            nav.replace(Route::Login {});
            return;
        };
        let allowed = match access {
            Access::Authenticated => true,
            Access::Staff => role.is_staff(),
            Access::Admin => role == Role::Admin,
        };
        if !allowed {
            nav.replace(Route::NotAuthorized {});
        }
    });
}
