//! Taproom - browser-based table ordering client for bars and restaurants.
//!
//! This library provides:
//! - A typed REST client with a token-refresh interceptor
//! - A local-storage-backed cart enforcing the ordering rules
//! - A WebSocket/STOMP listener for live order updates
//! - The Dioxus web UI (menu, cart, staff queue, admin pages)

pub mod app;
