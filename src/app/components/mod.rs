//! Shared UI components for the ordering web UI.

pub mod drink_card;
pub mod error_alert;
pub mod form_inputs;
pub mod layout;
pub mod nav;
pub mod order_modal;
pub mod pagination;

pub use drink_card::DrinkCard;
pub use error_alert::ErrorAlert;
pub use layout::Layout;
pub use nav::Nav;
pub use order_modal::OrderSummaryModal;
pub use pagination::Pagination;
