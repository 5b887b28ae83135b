//! Taproom - browser-based table ordering client.
//!
//! The binary only does anything useful as a wasm bundle (built with the
//! `web` feature); the native build exists so `cargo test` runs on the host.

fn main() {
    #[cfg(feature = "web")]
    {
        dioxus::logger::initialize_default();
        dioxus::launch(taproom::app::App);
    }

    #[cfg(not(feature = "web"))]
    eprintln!("taproom is a browser app; build with `dx build --features web`");
}
