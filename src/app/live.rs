//! Live-update listener.
//!
//! Subscribes to the per-user STOMP topics over a single WebSocket for as
//! long as a session exists, and turns inbound pushes into side effects:
//! sound cue, browser notification, order summary modal, and stale markers
//! for the pages currently showing the affected data.
//!
//! Message handling is deliberately "latest wins": a single-slot [`Mailbox`]
//! replaces any unconsumed event, and modal fetches carry a generation so a
//! stale response can never clobber a newer one.

#[cfg(target_arch = "wasm32")]
use std::cell::RefCell;
#[cfg(target_arch = "wasm32")]
use std::rc::Rc;

use dioxus::prelude::*;
use serde::Deserialize;

use super::api::{item_path, routes, OrderRecord, OrderStatus};
use super::prefs::{use_prefs, PermissionSnapshot};
use super::session::use_api;
#[cfg(target_arch = "wasm32")]
use super::session::use_session;
use super::toast::use_toast;
use super::Route;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use super::stomp::{Frame, FrameError};

/// Literal marker on the staff topic for "the order list changed".
pub const REQUESTS_CHANGED_MARKER: &str = "requests-changed";

pub fn updated_topic(email: &str) -> String {
    format!("/topic/updated/{email}")
}

pub fn requests_changed_topic(email: &str) -> String {
    format!("/topic/request-changed/{email}")
}

// =============================================================================
// Boundary validation
// =============================================================================

/// Raw push body: `{ uuid?, message }`.
#[derive(Debug, Deserialize)]
struct WireMessage {
    #[serde(default)]
    uuid: Option<String>,
    message: String,
}

/// A validated live notification event.
#[derive(Clone, Debug, PartialEq)]
pub enum LiveEvent {
    StatusChanged { uuid: String, status: OrderStatus },
    RequestsChanged,
}

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum LiveParseError {
    #[error("unparseable push body: {0}")]
    Json(String),
    #[error("unknown status tag: {0}")]
    UnknownTag(String),
    #[error("status push without an order id")]
    MissingUuid,
}

/// Validate a push body into a [`LiveEvent`]. Unknown tags are errors for
/// the caller to log and drop - they never crash the listener.
pub fn parse_live_message(body: &str) -> Result<LiveEvent, LiveParseError> {
    let wire: WireMessage =
        serde_json::from_str(body).map_err(|e| LiveParseError::Json(e.to_string()))?;
    if wire.message == REQUESTS_CHANGED_MARKER {
        return Ok(LiveEvent::RequestsChanged);
    }
    let status =
        OrderStatus::from_tag(&wire.message).ok_or(LiveParseError::UnknownTag(wire.message))?;
    let uuid = wire.uuid.ok_or(LiveParseError::MissingUuid)?;
    Ok(LiveEvent::StatusChanged { uuid, status })
}

// =============================================================================
// Side-effect selection
// =============================================================================

/// Audio cue per event kind. Canceled orders get their own sound; every
/// other status change shares the finish cue.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SoundCue {
    Canceled,
    Finished,
    Updated,
}

impl SoundCue {
    pub fn for_event(event: &LiveEvent) -> Self {
        match event {
            LiveEvent::StatusChanged {
                status: OrderStatus::Canceled,
                ..
            } => SoundCue::Canceled,
            LiveEvent::StatusChanged { .. } => SoundCue::Finished,
            LiveEvent::RequestsChanged => SoundCue::Updated,
        }
    }

    /// Bundled cue file, shipped under `assets/sounds/`.
    pub fn asset_path(self) -> &'static str {
        match self {
            SoundCue::Canceled => "/assets/sounds/canceled.wav",
            SoundCue::Finished => "/assets/sounds/finished.wav",
            SoundCue::Updated => "/assets/sounds/updated.wav",
        }
    }
}

/// Human-readable modal/notification title for an event.
pub fn title_for(event: &LiveEvent) -> &'static str {
    match event {
        LiveEvent::StatusChanged {
            status: OrderStatus::Finished,
            ..
        } => "Your order is ready",
        LiveEvent::StatusChanged {
            status: OrderStatus::Canceled,
            ..
        } => "Your order was canceled",
        LiveEvent::StatusChanged {
            status: OrderStatus::Delivered,
            ..
        } => "Your order was delivered",
        LiveEvent::StatusChanged { .. } => "Your order was updated",
        LiveEvent::RequestsChanged => "Order list changed",
    }
}

// =============================================================================
// Single-slot mailbox
// =============================================================================

/// Replace-on-arrival, consume-once slot. Makes "latest message wins" an
/// explicit contract instead of a re-render accident.
#[derive(Debug, Default)]
pub struct Mailbox<T> {
    slot: Option<T>,
}

impl<T> Mailbox<T> {
    pub fn new() -> Self {
        Self { slot: None }
    }

    /// Deposit a value, discarding any unconsumed predecessor.
    pub fn post(&mut self, value: T) {
        self.slot = Some(value);
    }

    /// Atomically consume the pending value, if any.
    pub fn take(&mut self) -> Option<T> {
        self.slot.take()
    }
}

// =============================================================================
// Modal state machine
// =============================================================================

/// `Idle -> Loading -> Ready | Missing`, terminal on dismissal. A new event
/// restarts the cycle regardless of what was in flight.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum ModalState {
    #[default]
    Idle,
    Loading {
        uuid: String,
    },
    Ready(OrderRecord),
    /// The detail fetch failed; rendered as an explicit empty state.
    Missing,
}

/// Modal state plus a fetch generation. Resolutions from an overwritten
/// fetch are ignored.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ModalMachine {
    pub state: ModalState,
    generation: u64,
}

impl ModalMachine {
    /// Start loading an order; returns the generation token the fetch must
    /// present on resolution.
    pub fn begin(&mut self, uuid: &str) -> u64 {
        self.generation += 1;
        self.state = ModalState::Loading {
            uuid: uuid.to_string(),
        };
        self.generation
    }

    /// Apply a fetch result. No-op when `generation` is stale.
    pub fn resolve(&mut self, generation: u64, order: Option<OrderRecord>) {
        if generation != self.generation {
            return;
        }
        self.state = match order {
            Some(order) => ModalState::Ready(order),
            None => ModalState::Missing,
        };
    }

    pub fn dismiss(&mut self) {
        self.state = ModalState::Idle;
    }
}

// =============================================================================
// Context
// =============================================================================

/// Live-update state shared via context.
#[derive(Clone, Copy)]
pub struct LiveContext {
    /// WebSocket/STOMP connection status.
    pub connected: Signal<bool>,
    inbox: Signal<Mailbox<LiveEvent>>,
    /// Increments on each accepted event (effect trigger).
    pub event_count: Signal<u64>,
    modal: Signal<ModalMachine>,
    /// Bumped when the staff order list should refetch.
    pub orders_stale: Signal<u64>,
    /// Set to the affected uuid when an open detail page should refetch.
    detail_stale: Signal<Option<String>>,
}

impl LiveContext {
    fn post_event(&self, event: LiveEvent) {
        let mut inbox = self.inbox;
        inbox.with_mut(|m| m.post(event));
        let mut count = self.event_count;
        count.set(count() + 1);
    }

    pub fn take_event(&self) -> Option<LiveEvent> {
        let mut inbox = self.inbox;
        inbox.with_mut(Mailbox::take)
    }

    pub fn modal_state(&self) -> ModalState {
        self.modal.read().state.clone()
    }

    pub fn begin_modal(&self, uuid: &str) -> u64 {
        let mut modal = self.modal;
        modal.with_mut(|m| m.begin(uuid))
    }

    pub fn resolve_modal(&self, generation: u64, order: Option<OrderRecord>) {
        let mut modal = self.modal;
        modal.with_mut(|m| m.resolve(generation, order));
    }

    pub fn dismiss_modal(&self) {
        let mut modal = self.modal;
        modal.with_mut(ModalMachine::dismiss);
    }

    pub fn mark_orders_stale(&self) {
        let mut stale = self.orders_stale;
        stale.set(stale() + 1);
    }

    fn mark_detail_stale(&self, uuid: &str) {
        let mut stale = self.detail_stale;
        stale.set(Some(uuid.to_string()));
    }

    /// Consume the stale marker if it names the given order.
    pub fn take_detail_stale(&self, uuid: &str) -> bool {
        let matches = self.detail_stale.read().as_deref() == Some(uuid);
        if matches {
            let mut stale = self.detail_stale;
            stale.set(None);
        }
        matches
    }
}

/// RAII guard closing the WebSocket on drop.
#[cfg(target_arch = "wasm32")]
struct SocketGuard {
    ws: web_sys::WebSocket,
    // Closures must outlive the socket (prevents leaks).
    _onopen: Closure<dyn FnMut(web_sys::Event)>,
    _onmessage: Closure<dyn FnMut(web_sys::MessageEvent)>,
    _onerror: Closure<dyn FnMut(web_sys::Event)>,
    _onclose: Closure<dyn FnMut(web_sys::CloseEvent)>,
}

#[cfg(target_arch = "wasm32")]
impl Drop for SocketGuard {
    fn drop(&mut self) {
        web_sys::console::log_1(&"live: closing WebSocket connection".into());
        let _ = self.ws.close();
    }
}

/// Initialize the live-update context provider - call once at app root,
/// after the session provider. The socket follows the session: it opens on
/// login (or a restored session) and closes on logout.
pub fn use_live_provider() {
    let connected = use_signal(|| false);
    let inbox = use_signal(Mailbox::new);
    let event_count = use_signal(|| 0u64);
    let modal = use_signal(ModalMachine::default);
    let orders_stale = use_signal(|| 0u64);
    let detail_stale = use_signal(|| None::<String>);

    let ctx = LiveContext {
        connected,
        inbox,
        event_count,
        modal,
        orders_stale,
        detail_stale,
    };

    use_context_provider(|| ctx);

    #[cfg(target_arch = "wasm32")]
    {
        let session = use_session();
        let guard: Rc<RefCell<Option<SocketGuard>>> = use_hook(|| Rc::new(RefCell::new(None)));

        let guard_clone = guard.clone();
        use_effect(move || {
            let authenticated = session.authenticated();
            if !authenticated {
                // Logout (or startup without a session): drop any socket.
                *guard_clone.borrow_mut() = None;
                let mut connected = connected;
                connected.set(false);
                return;
            }
            if guard_clone.borrow().is_some() {
                return;
            }
            let Some(email) = session.email() else {
                return;
            };
            match open_socket(ctx, &email, session.token().as_deref()) {
                Ok(new_guard) => *guard_clone.borrow_mut() = Some(new_guard),
                Err(e) => {
                    web_sys::console::error_1(&format!("live: failed to connect: {e:?}").into())
                }
            }
        });
    }
}

#[cfg(target_arch = "wasm32")]
fn socket_url() -> Option<String> {
    let location = web_sys::window()?.location();
    let protocol = location.protocol().ok()?;
    let host = location.host().ok()?;
    let scheme = if protocol == "https:" { "wss:" } else { "ws:" };
    Some(format!("{scheme}//{host}/ws"))
}

#[cfg(target_arch = "wasm32")]
fn open_socket(ctx: LiveContext, email: &str, token: Option<&str>) -> Result<SocketGuard, JsValue> {
    use web_sys::{CloseEvent, Event, MessageEvent, WebSocket};

    let url = socket_url().ok_or_else(|| JsValue::from_str("no window.location"))?;
    let ws = WebSocket::new(&url)?;
    web_sys::console::log_1(&format!("live: connecting to {url}").into());

    let connect_frame = Frame::connect("taproom", token).encode();
    let sub_updated = Frame::subscribe("sub-0", &updated_topic(email)).encode();
    let sub_requests = Frame::subscribe("sub-1", &requests_changed_topic(email)).encode();

    let ws_open = ws.clone();
    let onopen = Closure::wrap(Box::new(move |_: Event| {
        let _ = ws_open.send_with_str(&connect_frame);
    }) as Box<dyn FnMut(_)>);
    ws.set_onopen(Some(onopen.as_ref().unchecked_ref()));

    let ws_msg = ws.clone();
    let mut connected = ctx.connected;
    let onmessage = Closure::wrap(Box::new(move |e: MessageEvent| {
        let Some(data) = e.data().as_string() else {
            return;
        };
        let frame = match Frame::parse(&data) {
            Ok(frame) => frame,
            Err(FrameError::Heartbeat) => return,
            Err(e) => {
                web_sys::console::warn_1(&format!("live: bad frame: {e}").into());
                return;
            }
        };
        match frame.command.as_str() {
            "CONNECTED" => {
                connected.set(true);
                let _ = ws_msg.send_with_str(&sub_updated);
                let _ = ws_msg.send_with_str(&sub_requests);
            }
            "MESSAGE" => match parse_live_message(&frame.body) {
                Ok(event) => ctx.post_event(event),
                Err(e) => {
                    web_sys::console::warn_1(&format!("live: dropped push: {e}").into());
                }
            },
            "ERROR" => {
                web_sys::console::error_1(
                    &format!("live: broker error: {}", frame.body).into(),
                );
            }
            _ => {}
        }
    }) as Box<dyn FnMut(_)>);
    ws.set_onmessage(Some(onmessage.as_ref().unchecked_ref()));

    let mut connected_err = ctx.connected;
    let onerror = Closure::wrap(Box::new(move |_: Event| {
        web_sys::console::warn_1(&"live: connection error".into());
        connected_err.set(false);
    }) as Box<dyn FnMut(_)>);
    ws.set_onerror(Some(onerror.as_ref().unchecked_ref()));

    let mut connected_close = ctx.connected;
    let onclose = Closure::wrap(Box::new(move |_: CloseEvent| {
        connected_close.set(false);
    }) as Box<dyn FnMut(_)>);
    ws.set_onclose(Some(onclose.as_ref().unchecked_ref()));

    Ok(SocketGuard {
        ws,
        _onopen: onopen,
        _onmessage: onmessage,
        _onerror: onerror,
        _onclose: onclose,
    })
}

/// Get the live-update context - use in any component.
pub fn use_live() -> LiveContext {
    use_context::<LiveContext>()
}

// =============================================================================
// Effect pipeline
// =============================================================================

/// Invisible component running the notification side effects. Mounted once
/// inside the layout so it can see the current route.
#[component]
pub fn LiveUpdates() -> Element {
    let live = use_live();
    let prefs = use_prefs();
    let toast = use_toast();
    let client = use_api();

    // The effect closure is captured once, so the current route is mirrored
    // into a signal it can peek at event time.
    let route = use_route::<Route>();
    let mut current_route = use_signal(|| route.clone());
    if *current_route.peek() != route {
        current_route.set(route.clone());
    }

    use_effect(move || {
        // Re-run per accepted event; the mailbox hands us at most one.
        let _ = (live.event_count)();
        let Some(event) = live.take_event() else {
            return;
        };
        let route = current_route.peek().clone();

        if prefs.sound_enabled() {
            play_cue(SoundCue::for_event(&event));
        }
        if prefs.notifications() == PermissionSnapshot::Granted {
            raise_notification(title_for(&event));
        }

        match event {
            LiveEvent::StatusChanged { uuid, .. } => {
                if matches!(&route, Route::OrderDetail { uuid: current } if *current == uuid) {
                    live.mark_detail_stale(&uuid);
                }
                let generation = live.begin_modal(&uuid);
                let client = client.clone();
                spawn(async move {
                    let order = client
                        .get::<OrderRecord>(&item_path(routes::ORDERS, &uuid))
                        .await
                        .ok();
                    live.resolve_modal(generation, order);
                });
            }
            LiveEvent::RequestsChanged => {
                if matches!(route, Route::Orders {}) {
                    live.mark_orders_stale();
                } else {
                    toast.with_action("The order list changed.", "Open orders", Route::Orders {});
                }
            }
        }
    });

    rsx! {}
}

#[cfg(target_arch = "wasm32")]
fn play_cue(cue: SoundCue) {
    if let Ok(audio) = web_sys::HtmlAudioElement::new_with_src(cue.asset_path()) {
        let _ = audio.play();
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn play_cue(cue: SoundCue) {
    tracing::debug!("sound cue: {cue:?}");
}

#[cfg(target_arch = "wasm32")]
fn raise_notification(title: &str) {
    let _ = web_sys::Notification::new(title);
}

#[cfg(not(target_arch = "wasm32"))]
fn raise_notification(title: &str) {
    tracing::debug!("browser notification: {title}");
}
