//! App-global toast notifications.
//!
//! Transient, dismissible notices for backend errors and live updates. A
//! toast can carry a shortcut action (e.g. "open orders" on a
//! requests-changed push). Rendered by `ToastHost` inside the layout.

use dioxus::prelude::*;

use super::Route;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Success,
    Error,
}

impl ToastKind {
    fn css_class(self) -> &'static str {
        match self {
            ToastKind::Info => "toast toast-info",
            ToastKind::Success => "toast toast-success",
            ToastKind::Error => "toast toast-error",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub message: String,
    /// Optional shortcut: label + route to navigate to.
    pub action: Option<(String, Route)>,
}

/// Toast queue shared via context.
#[derive(Clone, Copy)]
pub struct ToastContext {
    toasts: Signal<Vec<Toast>>,
    next_id: Signal<u64>,
}

impl ToastContext {
    pub fn push(&self, kind: ToastKind, message: impl Into<String>) {
        self.push_toast(kind, message.into(), None);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.push(ToastKind::Info, message);
    }

    pub fn success(&self, message: impl Into<String>) {
        self.push(ToastKind::Success, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.push(ToastKind::Error, message);
    }

    pub fn with_action(&self, message: impl Into<String>, label: impl Into<String>, route: Route) {
        self.push_toast(ToastKind::Info, message.into(), Some((label.into(), route)));
    }

    pub fn dismiss(&self, id: u64) {
        let mut toasts = self.toasts;
        toasts.with_mut(|list| list.retain(|t| t.id != id));
    }

    fn push_toast(&self, kind: ToastKind, message: String, action: Option<(String, Route)>) {
        let mut next_id = self.next_id;
        let id = next_id();
        next_id.set(id + 1);
        let mut toasts = self.toasts;
        toasts.with_mut(|list| {
            list.push(Toast {
                id,
                kind,
                message,
                action,
            })
        });
    }
}

/// Initialize the toast context provider - call once at app root.
pub fn use_toast_provider() {
    let toasts = use_signal(Vec::new);
    let next_id = use_signal(|| 0u64);
    use_context_provider(|| ToastContext { toasts, next_id });
}

/// Get the toast context - use in any component.
pub fn use_toast() -> ToastContext {
    use_context::<ToastContext>()
}

/// Renders the active toasts in a fixed corner stack.
#[component]
pub fn ToastHost() -> Element {
    let ctx = use_toast();
    let toasts = (ctx.toasts)();

    rsx! {
        div { class: "toast-stack",
            for toast in toasts {
                div { key: "{toast.id}", class: "{toast.kind.css_class()}",
                    span { "{toast.message}" }
                    if let Some((label, route)) = toast.action.clone() {
                        Link {
                            class: "btn btn-ghost btn-sm",
                            to: route,
                            onclick: move |_| ctx.dismiss(toast.id),
                            "{label}"
                        }
                    }
                    button {
                        class: "btn btn-ghost btn-sm",
                        "aria-label": "Dismiss",
                        onclick: move |_| ctx.dismiss(toast.id),
                        "×"
                    }
                }
            }
        }
    }
}
