//! Reusable form input components.

use dioxus::prelude::*;

/// A labeled text input.
#[component]
pub fn TextInput(
    /// Input label
    label: &'static str,
    /// Current value
    value: String,
    /// `type` attribute (defaults to "text")
    #[props(default = "text")]
    input_type: &'static str,
    /// Called on every keystroke
    on_input: EventHandler<String>,
) -> Element {
    rsx! {
        label { class: "field",
            span { class: "field-label", "{label}" }
            input {
                class: "input",
                r#type: input_type,
                value: "{value}",
                oninput: move |e| on_input.call(e.value()),
            }
        }
    }
}

/// A labeled non-negative number input. Unparseable input is ignored.
#[component]
pub fn NumberInput(
    /// Input label
    label: &'static str,
    /// Current value
    value: u32,
    /// Called when the value changes
    on_change: EventHandler<u32>,
) -> Element {
    rsx! {
        label { class: "field",
            span { class: "field-label", "{label}" }
            input {
                class: "input",
                r#type: "number",
                min: "0",
                value: "{value}",
                oninput: move |e| {
                    if let Ok(v) = e.value().parse::<u32>() {
                        on_change.call(v);
                    }
                },
            }
        }
    }
}

/// A labeled toggle switch.
#[component]
pub fn ToggleInput(
    /// Input label
    label: &'static str,
    /// Current checked state
    checked: bool,
    /// Called when the toggle changes
    on_change: EventHandler<bool>,
) -> Element {
    rsx! {
        label { class: "field field-inline",
            span { class: "field-label", "{label}" }
            input {
                class: "toggle",
                r#type: "checkbox",
                checked,
                onchange: move |e| on_change.call(e.checked()),
            }
        }
    }
}

/// A debounce-free search box; callers refetch on every keystroke.
#[component]
pub fn SearchBox(
    /// Placeholder text
    placeholder: &'static str,
    /// Current query
    value: String,
    /// Called on every keystroke
    on_input: EventHandler<String>,
) -> Element {
    rsx! {
        input {
            class: "input search",
            r#type: "search",
            placeholder,
            value: "{value}",
            oninput: move |e| on_input.call(e.value()),
        }
    }
}
