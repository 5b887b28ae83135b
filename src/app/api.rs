//! REST client wrapper: wire types, error taxonomy, and the token-refresh
//! interceptor.
//!
//! All backend traffic goes through [`ApiClient`]. The HTTP transport is a
//! trait seam so the refresh/replay logic can be exercised with a mock
//! transport on the host; the browser implementation uses `fetch`.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

// =============================================================================
// Wire Types
// =============================================================================

/// A drink as served by the menu endpoints. Read-only snapshot on the client.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Drink {
    pub id: u64,
    pub name: String,
    /// Price in cents - money never touches floats.
    pub price_cents: i64,
    pub alcoholic: bool,
    #[serde(default)]
    pub additives: Vec<String>,
    #[serde(default)]
    pub picture_url: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    pub id: u64,
    pub number: u32,
    pub seats: u32,
}

/// User roles as issued by the backend.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    #[default]
    Customer,
    Waiter,
    Admin,
}

impl Role {
    /// Staff see the management pages; customers see menu and cart.
    pub fn is_staff(self) -> bool {
        matches!(self, Role::Waiter | Role::Admin)
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: u64,
    pub email: String,
    pub role: Role,
    /// Staff can lock an account out of placing orders.
    #[serde(default)]
    pub locked_requests: bool,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
}

/// Order lifecycle states on the wire.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Started,
    Finished,
    Canceled,
    Delivered,
}

impl OrderStatus {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "STARTED" => Some(OrderStatus::Started),
            "FINISHED" => Some(OrderStatus::Finished),
            "CANCELED" => Some(OrderStatus::Canceled),
            "DELIVERED" => Some(OrderStatus::Delivered),
            _ => None,
        }
    }

    /// Wire tag, as used in query filters and push messages.
    pub fn tag(self) -> &'static str {
        match self {
            OrderStatus::Started => "STARTED",
            OrderStatus::Finished => "FINISHED",
            OrderStatus::Canceled => "CANCELED",
            OrderStatus::Delivered => "DELIVERED",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            OrderStatus::Started => "Started",
            OrderStatus::Finished => "Finished",
            OrderStatus::Canceled => "Canceled",
            OrderStatus::Delivered => "Delivered",
        }
    }
}

/// An order as tracked by the backend (the authoritative copy).
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    pub uuid: String,
    pub status: OrderStatus,
    #[serde(default)]
    pub drinks: Vec<Drink>,
    #[serde(default)]
    pub table: Option<Table>,
    #[serde(default)]
    pub owner_email: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl OrderRecord {
    pub fn total_cents(&self) -> i64 {
        self.drinks.iter().map(|d| d.price_cents).sum()
    }
}

/// Spring-style page envelope.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub number: u32,
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u32,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            content: Vec::new(),
            number: 0,
            size: 0,
            total_elements: 0,
            total_pages: 0,
        }
    }
}

// =============================================================================
// Request bodies
// =============================================================================

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
}

/// Cart submission: one drink id per unit ordered, duplicates allowed.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubmitOrderRequest {
    pub drink_ids: Vec<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_id: Option<u64>,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdateRequest {
    pub status: OrderStatus,
}

/// Create/update payload for drinks (id assigned server-side).
#[derive(Clone, Debug, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DrinkPayload {
    pub name: String,
    pub price_cents: i64,
    pub alcoholic: bool,
    pub additives: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub picture_url: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TablePayload {
    pub number: u32,
    pub seats: u32,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LockRequest {
    pub locked_requests: bool,
}

// =============================================================================
// Dashboard stats
// =============================================================================

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StatusCounts {
    pub started: u64,
    pub finished: u64,
    pub canceled: u64,
    pub delivered: u64,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyRevenue {
    /// `YYYY-MM`
    pub month: String,
    pub total_cents: i64,
}

// =============================================================================
// Endpoint paths
// =============================================================================

/// Backend endpoint paths, pinned by `tests/endpoint_contract.rs`.
pub mod routes {
    pub const LOGIN: &str = "/api/auth/login";
    pub const PROFILE: &str = "/api/users/me";
    pub const DRINKS: &str = "/api/drinks";
    pub const TABLES: &str = "/api/tables";
    pub const USERS: &str = "/api/users";
    pub const ORDERS: &str = "/api/requests";
    pub const STATS_STATUS: &str = "/api/stats/status-counts";
    pub const STATS_MONTHLY: &str = "/api/stats/monthly-revenue";
}

/// Build a paginated path with optional extra query parameters.
///
/// Values are percent-encoded; empty values are skipped (search boxes send
/// nothing rather than `name=`).
pub fn paged_path(base: &str, page: u32, size: u32, extra: &[(&str, &str)]) -> String {
    let mut path = format!("{base}?page={page}&size={size}");
    for (key, value) in extra {
        if value.is_empty() {
            continue;
        }
        path.push('&');
        path.push_str(key);
        path.push('=');
        path.push_str(&urlencoding::encode(value));
    }
    path
}

/// Path for a single resource under a collection endpoint.
pub fn item_path(base: &str, id: impl std::fmt::Display) -> String {
    format!("{base}/{id}")
}

/// Format integer cents for display (`1050` -> `"10.50"`).
pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.abs();
    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}

/// Parse a user-entered price (`"10.50"`, `"10,5"`, `"10"`) into cents.
/// At most two fraction digits; anything else is rejected.
pub fn parse_cents(input: &str) -> Option<i64> {
    let input = input.trim().replace(',', ".");
    if input.is_empty() {
        return None;
    }
    let (whole, frac) = match input.split_once('.') {
        Some((w, f)) => (w, f),
        None => (input.as_str(), ""),
    };
    if frac.len() > 2 || !frac.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let whole: i64 = whole.parse().ok()?;
    if whole < 0 {
        return None;
    }
    let frac_cents = match frac.len() {
        0 => 0,
        1 => frac.parse::<i64>().ok()? * 10,
        _ => frac.parse::<i64>().ok()?,
    };
    Some(whole * 100 + frac_cents)
}

// =============================================================================
// Error taxonomy
// =============================================================================

/// Backend error body: `{ details, status, expired, fieldErrors }`.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub status: Option<u16>,
    #[serde(default)]
    pub expired: bool,
    #[serde(default)]
    pub field_errors: HashMap<String, Vec<String>>,
}

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ApiError {
    /// The backend answered with an error body.
    #[error("{details}")]
    Backend {
        status: u16,
        details: String,
        expired: bool,
        field_errors: HashMap<String, Vec<String>>,
    },
    /// The request never completed (offline, DNS, CORS).
    #[error("network error: {0}")]
    Network(String),
    /// The response body did not match the expected shape.
    #[error("malformed response: {0}")]
    Decode(String),
    /// Token refresh failed; the caller should send the user to login.
    #[error("session expired, please log in again")]
    SessionExpired,
}

impl ApiError {
    /// Field-level validation messages, if the backend sent any.
    pub fn field_errors(&self) -> Option<&HashMap<String, Vec<String>>> {
        match self {
            ApiError::Backend { field_errors, .. } if !field_errors.is_empty() => {
                Some(field_errors)
            }
            _ => None,
        }
    }

    fn from_response(status: u16, body: &str) -> Self {
        let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
        ApiError::Backend {
            status: parsed.status.unwrap_or(status),
            details: parsed
                .details
                .unwrap_or_else(|| format!("request failed ({status})")),
            expired: parsed.expired,
            field_errors: parsed.field_errors,
        }
    }

    fn is_expired(&self) -> bool {
        matches!(self, ApiError::Backend { expired: true, .. })
    }
}

// =============================================================================
// Transport seam
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

#[derive(Clone, Debug)]
pub struct HttpRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<String>,
    pub bearer: Option<String>,
}

#[derive(Clone, Debug)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// One HTTP round-trip. Implementations must not retry.
#[async_trait(?Send)]
pub trait Transport {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, ApiError>;
}

/// Browser `fetch` transport.
#[cfg(target_arch = "wasm32")]
pub struct FetchTransport;

#[cfg(target_arch = "wasm32")]
#[async_trait(?Send)]
impl Transport for FetchTransport {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, ApiError> {
        use wasm_bindgen::JsCast;
        use wasm_bindgen_futures::JsFuture;
        use web_sys::{Headers, Request, RequestInit, Response};

        let window = web_sys::window().ok_or_else(|| ApiError::Network("no window".into()))?;

        let headers = Headers::new().map_err(|e| ApiError::Network(format!("{e:?}")))?;
        headers
            .set("Accept", "application/json")
            .map_err(|e| ApiError::Network(format!("{e:?}")))?;
        if req.body.is_some() {
            headers
                .set("Content-Type", "application/json")
                .map_err(|e| ApiError::Network(format!("{e:?}")))?;
        }
        if let Some(token) = &req.bearer {
            headers
                .set("Authorization", &format!("Bearer {token}"))
                .map_err(|e| ApiError::Network(format!("{e:?}")))?;
        }

        let opts = RequestInit::new();
        opts.set_method(req.method.as_str());
        opts.set_headers(&headers);
        if let Some(body) = &req.body {
            opts.set_body(&wasm_bindgen::JsValue::from_str(body));
        }

        let request = Request::new_with_str_and_init(&req.path, &opts)
            .map_err(|e| ApiError::Network(format!("{e:?}")))?;

        let resp_value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|e| ApiError::Network(format!("{e:?}")))?;
        let resp: Response = resp_value
            .dyn_into()
            .map_err(|_| ApiError::Network("not a Response".into()))?;

        let text = JsFuture::from(
            resp.text()
                .map_err(|e| ApiError::Network(format!("{e:?}")))?,
        )
        .await
        .map_err(|e| ApiError::Network(format!("{e:?}")))?;

        Ok(HttpResponse {
            status: resp.status(),
            body: text.as_string().unwrap_or_default(),
        })
    }
}

/// Host stand-in - REST calls only happen in the browser.
#[cfg(not(target_arch = "wasm32"))]
pub struct FetchTransport;

#[cfg(not(target_arch = "wasm32"))]
#[async_trait(?Send)]
impl Transport for FetchTransport {
    async fn send(&self, _req: HttpRequest) -> Result<HttpResponse, ApiError> {
        Err(ApiError::Network(
            "fetch is only available in browser".into(),
        ))
    }
}

// =============================================================================
// Auth slot (shared token + retained login credentials)
// =============================================================================

#[derive(Default)]
struct AuthInner {
    token: Option<String>,
    credentials: Option<(String, String)>,
}

/// Shared between the session holder and the client so the interceptor can
/// re-login and swap tokens without the session being in the call path.
#[derive(Clone, Default)]
pub struct AuthSlot(Rc<RefCell<AuthInner>>);

impl AuthSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn token(&self) -> Option<String> {
        self.0.borrow().token.clone()
    }

    pub fn set_token(&self, token: Option<String>) {
        self.0.borrow_mut().token = token;
    }

    pub fn set_credentials(&self, email: &str, password: &str) {
        self.0.borrow_mut().credentials = Some((email.to_string(), password.to_string()));
    }

    pub fn credentials(&self) -> Option<(String, String)> {
        self.0.borrow().credentials.clone()
    }

    pub fn clear(&self) {
        let mut inner = self.0.borrow_mut();
        inner.token = None;
        inner.credentials = None;
    }
}

// =============================================================================
// ApiClient
// =============================================================================

/// Typed REST client with bearer attachment and a single-shot token refresh.
#[derive(Clone)]
pub struct ApiClient {
    transport: Rc<dyn Transport>,
    auth: AuthSlot,
    expired_hook: Rc<RefCell<Option<Rc<dyn Fn()>>>>,
}

impl ApiClient {
    pub fn new(transport: Rc<dyn Transport>, auth: AuthSlot) -> Self {
        Self {
            transport,
            auth,
            expired_hook: Rc::new(RefCell::new(None)),
        }
    }

    /// Client over the browser fetch transport.
    pub fn browser(auth: AuthSlot) -> Self {
        Self::new(Rc::new(FetchTransport), auth)
    }

    pub fn auth(&self) -> &AuthSlot {
        &self.auth
    }

    /// Register the callback that fires when the refresh interceptor gives
    /// up. The session holder hangs a forced logout off it.
    pub fn on_session_expired(&self, hook: impl Fn() + 'static) {
        *self.expired_hook.borrow_mut() = Some(Rc::new(hook));
    }

    /// The session is beyond saving: drop the auth state, tell the session
    /// holder, reject the request.
    fn expire_session(&self) -> ApiError {
        self.auth.clear();
        let hook = self.expired_hook.borrow().clone();
        if let Some(hook) = hook {
            hook();
        }
        ApiError::SessionExpired
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let resp = self.send_authorized(Method::Get, path, None).await?;
        decode_body(&resp.body)
    }

    pub async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let body = encode_body(body)?;
        let resp = self.send_authorized(Method::Post, path, Some(body)).await?;
        decode_body(&resp.body)
    }

    pub async fn put<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let body = encode_body(body)?;
        let resp = self.send_authorized(Method::Put, path, Some(body)).await?;
        decode_body(&resp.body)
    }

    pub async fn patch<B: Serialize>(&self, path: &str, body: &B) -> Result<(), ApiError> {
        let body = encode_body(body)?;
        self.send_authorized(Method::Patch, path, Some(body))
            .await?;
        Ok(())
    }

    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.send_authorized(Method::Delete, path, None).await?;
        Ok(())
    }

    /// Send with the current bearer token. On an `expired` error, re-login
    /// once with the retained credentials and replay the original request;
    /// a second expiry (or a failed re-login) clears the auth slot, fires
    /// the session-expired hook and rejects with
    /// [`ApiError::SessionExpired`].
    async fn send_authorized(
        &self,
        method: Method,
        path: &str,
        body: Option<String>,
    ) -> Result<HttpResponse, ApiError> {
        let err = match self.send_once(method, path, body.clone()).await {
            Ok(resp) => return Ok(resp),
            Err(err) => err,
        };
        if !err.is_expired() {
            return Err(err);
        }

        let Some((email, password)) = self.auth.credentials() else {
            return Err(self.expire_session());
        };

        tracing::debug!("token expired, attempting silent re-login");
        let login = HttpRequest {
            method: Method::Post,
            path: routes::LOGIN.to_string(),
            body: Some(encode_body(&LoginRequest { email, password })?),
            bearer: None,
        };
        let token = match self.transport.send(login).await {
            Ok(resp) if resp.is_success() => decode_body::<LoginResponse>(&resp.body)?.token,
            _ => return Err(self.expire_session()),
        };
        self.auth.set_token(Some(token));

        match self.send_once(method, path, body).await {
            Ok(resp) => Ok(resp),
            Err(err) if err.is_expired() => Err(self.expire_session()),
            Err(err) => Err(err),
        }
    }

    async fn send_once(
        &self,
        method: Method,
        path: &str,
        body: Option<String>,
    ) -> Result<HttpResponse, ApiError> {
        let resp = self
            .transport
            .send(HttpRequest {
                method,
                path: path.to_string(),
                body,
                bearer: self.auth.token(),
            })
            .await?;
        if resp.is_success() {
            Ok(resp)
        } else {
            Err(ApiError::from_response(resp.status, &resp.body))
        }
    }
}

fn encode_body<B: Serialize>(body: &B) -> Result<String, ApiError> {
    serde_json::to_string(body).map_err(|e| ApiError::Decode(e.to_string()))
}

fn decode_body<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    // Empty 2xx bodies decode into Option targets via "null".
    let body = if body.trim().is_empty() { "null" } else { body };
    serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))
}

#[cfg(test)]
#[allow(clippy::expect_used)]
pub(crate) mod test_support {
    use super::*;

    /// Scripted transport: pops one canned response per request and records
    /// everything it was asked to send.
    pub(crate) struct ScriptedTransport {
        responses: RefCell<Vec<Result<HttpResponse, ApiError>>>,
        seen: RefCell<Vec<HttpRequest>>,
    }

    impl ScriptedTransport {
        pub(crate) fn new(mut responses: Vec<Result<HttpResponse, ApiError>>) -> Rc<Self> {
            responses.reverse();
            Rc::new(Self {
                responses: RefCell::new(responses),
                seen: RefCell::new(Vec::new()),
            })
        }

        pub(crate) fn requests(&self) -> Vec<HttpRequest> {
            self.seen.borrow().clone()
        }
    }

    #[async_trait(?Send)]
    impl Transport for ScriptedTransport {
        async fn send(&self, req: HttpRequest) -> Result<HttpResponse, ApiError> {
            self.seen.borrow_mut().push(req);
            self.responses
                .borrow_mut()
                .pop()
                .expect("transport script exhausted")
        }
    }

    pub(crate) fn ok(body: &str) -> Result<HttpResponse, ApiError> {
        Ok(HttpResponse {
            status: 200,
            body: body.to_string(),
        })
    }

    pub(crate) fn expired_401() -> Result<HttpResponse, ApiError> {
        Ok(HttpResponse {
            status: 401,
            body: r#"{"details":"token expired","status":401,"expired":true}"#.to_string(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use std::cell::Cell;

    use super::test_support::{expired_401, ok, ScriptedTransport};
    use super::*;
    use futures::executor::block_on;

    #[test]
    fn paged_path_encodes_and_skips_empty() {
        assert_eq!(
            paged_path(routes::DRINKS, 2, 20, &[("name", "gin tonic"), ("sort", "")]),
            "/api/drinks?page=2&size=20&name=gin%20tonic"
        );
        assert_eq!(
            paged_path(routes::TABLES, 0, 10, &[]),
            "/api/tables?page=0&size=10"
        );
    }

    #[test]
    fn format_cents_renders_two_decimals() {
        assert_eq!(format_cents(1050), "10.50");
        assert_eq!(format_cents(5), "0.05");
        assert_eq!(format_cents(-250), "-2.50");
    }

    #[test]
    fn parse_cents_accepts_common_price_spellings() {
        assert_eq!(parse_cents("10.50"), Some(1050));
        assert_eq!(parse_cents("10,5"), Some(1050));
        assert_eq!(parse_cents("10"), Some(1000));
        assert_eq!(parse_cents(" 0.05 "), Some(5));
        assert_eq!(parse_cents("10.505"), None);
        assert_eq!(parse_cents("-1"), None);
        assert_eq!(parse_cents("abc"), None);
        assert_eq!(parse_cents(""), None);
    }

    #[test]
    fn error_body_parse_keeps_field_errors() {
        let body = r#"{"details":"validation failed","status":400,"expired":false,
            "fieldErrors":{"name":["must not be blank"]}}"#;
        let err = ApiError::from_response(400, body);
        match &err {
            ApiError::Backend {
                status,
                details,
                expired,
                field_errors,
            } => {
                assert_eq!(*status, 400);
                assert_eq!(details, "validation failed");
                assert!(!expired);
                assert_eq!(field_errors["name"], vec!["must not be blank"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.field_errors().is_some());
    }

    #[test]
    fn unparseable_error_body_gets_fallback_details() {
        let err = ApiError::from_response(502, "<html>bad gateway</html>");
        match err {
            ApiError::Backend {
                status, details, ..
            } => {
                assert_eq!(status, 502);
                assert_eq!(details, "request failed (502)");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn order_status_tags_round_trip() {
        assert_eq!(
            OrderStatus::from_tag("FINISHED"),
            Some(OrderStatus::Finished)
        );
        assert_eq!(
            OrderStatus::from_tag("CANCELED"),
            Some(OrderStatus::Canceled)
        );
        assert_eq!(OrderStatus::from_tag("requests-changed"), None);
        let json = serde_json::to_string(&OrderStatus::Delivered).unwrap();
        assert_eq!(json, "\"DELIVERED\"");
    }

    // -------------------------------------------------------------------------
    // Refresh interceptor
    // -------------------------------------------------------------------------

    #[test]
    fn expired_token_triggers_exactly_one_relogin_and_replay() {
        let transport = ScriptedTransport::new(vec![
            expired_401(),
            ok(r#"{"token":"fresh-token"}"#),
            ok(r#"{"content":[],"number":0,"size":10,"totalElements":0,"totalPages":0}"#),
        ]);
        let auth = AuthSlot::new();
        auth.set_token(Some("stale-token".into()));
        auth.set_credentials("amy@example.com", "hunter2");
        let client = ApiClient::new(transport.clone(), auth.clone());

        let page: Page<Drink> =
            block_on(client.get(&paged_path(routes::DRINKS, 0, 10, &[]))).unwrap();
        assert!(page.content.is_empty());

        let seen = transport.requests();
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[0].bearer.as_deref(), Some("stale-token"));
        assert_eq!(seen[1].path, routes::LOGIN);
        assert_eq!(seen[1].bearer, None);
        assert_eq!(seen[2].bearer.as_deref(), Some("fresh-token"));
        assert_eq!(auth.token().as_deref(), Some("fresh-token"));
    }

    #[test]
    fn second_expiry_is_fatal_and_clears_auth() {
        let transport = ScriptedTransport::new(vec![
            expired_401(),
            ok(r#"{"token":"fresh-token"}"#),
            expired_401(),
        ]);
        let auth = AuthSlot::new();
        auth.set_token(Some("stale-token".into()));
        auth.set_credentials("amy@example.com", "hunter2");
        let client = ApiClient::new(transport.clone(), auth.clone());

        let result: Result<Page<Drink>, _> =
            block_on(client.get(&paged_path(routes::DRINKS, 0, 10, &[])));
        assert_eq!(result.unwrap_err(), ApiError::SessionExpired);
        assert_eq!(auth.token(), None);
        assert_eq!(auth.credentials(), None);
    }

    #[test]
    fn failed_relogin_rejects_with_session_expired() {
        let transport = ScriptedTransport::new(vec![
            expired_401(),
            Ok(HttpResponse {
                status: 401,
                body: r#"{"details":"bad credentials","status":401}"#.to_string(),
            }),
        ]);
        let auth = AuthSlot::new();
        auth.set_token(Some("stale-token".into()));
        auth.set_credentials("amy@example.com", "wrong");
        let client = ApiClient::new(transport.clone(), auth.clone());

        let result: Result<User, _> = block_on(client.get(routes::PROFILE));
        assert_eq!(result.unwrap_err(), ApiError::SessionExpired);
        assert_eq!(transport.requests().len(), 2);
    }

    #[test]
    fn non_expired_errors_pass_through_without_retry() {
        let transport = ScriptedTransport::new(vec![Ok(HttpResponse {
            status: 404,
            body: r#"{"details":"no such drink","status":404}"#.to_string(),
        })]);
        let auth = AuthSlot::new();
        auth.set_token(Some("token".into()));
        auth.set_credentials("amy@example.com", "hunter2");
        let client = ApiClient::new(transport.clone(), auth);

        let result: Result<Drink, _> = block_on(client.get(&item_path(routes::DRINKS, 7)));
        match result.unwrap_err() {
            ApiError::Backend {
                status, details, ..
            } => {
                assert_eq!(status, 404);
                assert_eq!(details, "no such drink");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(transport.requests().len(), 1);
    }

    #[test]
    fn giving_up_fires_the_session_expired_hook() {
        let transport = ScriptedTransport::new(vec![
            expired_401(),
            Ok(HttpResponse {
                status: 401,
                body: r#"{"details":"bad credentials","status":401}"#.to_string(),
            }),
        ]);
        let auth = AuthSlot::new();
        auth.set_token(Some("stale-token".into()));
        auth.set_credentials("amy@example.com", "wrong");
        let client = ApiClient::new(transport, auth.clone());
        let fired = Rc::new(Cell::new(0u32));
        let counter = fired.clone();
        client.on_session_expired(move || counter.set(counter.get() + 1));

        let result: Result<User, _> = block_on(client.get(routes::PROFILE));
        assert_eq!(result.unwrap_err(), ApiError::SessionExpired);
        assert_eq!(fired.get(), 1);
        assert_eq!(auth.token(), None);
        assert_eq!(auth.credentials(), None);
    }

    #[test]
    fn successful_refresh_leaves_the_expiry_hook_alone() {
        let transport = ScriptedTransport::new(vec![
            expired_401(),
            ok(r#"{"token":"fresh-token"}"#),
            ok(r#"{"content":[],"number":0,"size":10,"totalElements":0,"totalPages":0}"#),
        ]);
        let auth = AuthSlot::new();
        auth.set_token(Some("stale-token".into()));
        auth.set_credentials("amy@example.com", "hunter2");
        let client = ApiClient::new(transport, auth);
        let fired = Rc::new(Cell::new(0u32));
        let counter = fired.clone();
        client.on_session_expired(move || counter.set(counter.get() + 1));

        let page: Result<Page<Drink>, _> =
            block_on(client.get(&paged_path(routes::DRINKS, 0, 10, &[])));
        assert!(page.is_ok());
        assert_eq!(fired.get(), 0);
    }
}
