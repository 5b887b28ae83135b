//! Auth session holder.
//!
//! Owns the bearer token and the fetched user profile. On startup a
//! previously stored session is adopted and the profile eagerly refetched;
//! if that fetch fails the session is silently treated as logged out.
//!
//! The token itself is shared with the REST client through [`AuthSlot`] so
//! the refresh interceptor can re-login and swap tokens without calling back
//! into this module.

use std::rc::Rc;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{Datelike, NaiveDate, Utc};
use dioxus::prelude::*;
use serde::{Deserialize, Serialize};

use super::api::{
    routes, ApiClient, ApiError, AuthSlot, LoginRequest, LoginResponse, Role, User,
};
use super::cart::Orderer;
use super::storage::{self, KeyValueStore};

/// JWT payload claims we care about. The signature is not verified here;
/// the backend rejects tampered tokens, the client only reads display data.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct Claims {
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub exp: Option<i64>,
}

/// Decode the payload segment of a JWT without verifying it.
pub fn decode_claims(token: &str) -> Option<Claims> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
    serde_json::from_slice(&bytes).ok()
}

/// Whole years between `birth` and `today`.
pub fn age_on(birth: NaiveDate, today: NaiveDate) -> u32 {
    let mut age = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    age.max(0) as u32
}

/// Persisted credentials blob under [`storage::SESSION_KEY`].
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StoredSession {
    pub token: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

// =============================================================================
// Context
// =============================================================================

/// Session holder shared via context.
#[derive(Clone)]
pub struct SessionContext {
    user: Signal<Option<User>>,
    /// True while a stored session's profile fetch is still in flight.
    loading: Signal<bool>,
    client: ApiClient,
    durable: Rc<dyn KeyValueStore>,
    tab_scoped: Rc<dyn KeyValueStore>,
}

impl SessionContext {
    pub fn new(
        client: ApiClient,
        durable: Rc<dyn KeyValueStore>,
        tab_scoped: Rc<dyn KeyValueStore>,
    ) -> Self {
        Self {
            user: Signal::new(None),
            loading: Signal::new(false),
            client,
            durable,
            tab_scoped,
        }
    }

    pub fn authenticated(&self) -> bool {
        self.user.read().is_some()
    }

    pub fn is_loading(&self) -> bool {
        (self.loading)()
    }

    pub fn user(&self) -> Option<User> {
        (self.user)()
    }

    pub fn email(&self) -> Option<String> {
        if let Some(user) = self.user.read().as_ref() {
            return Some(user.email.clone());
        }
        self.client
            .auth()
            .token()
            .and_then(|t| decode_claims(&t))
            .and_then(|c| c.sub)
    }

    pub fn role(&self) -> Option<Role> {
        self.user.read().as_ref().map(|u| u.role)
    }

    pub fn token(&self) -> Option<String> {
        self.client.auth().token()
    }

    /// The facts the cart gates need, computed against today's date.
    pub fn orderer(&self) -> Orderer {
        let today = Utc::now().date_naive();
        match self.user.read().as_ref() {
            Some(user) => Orderer {
                is_customer: user.role == Role::Customer,
                locked: user.locked_requests,
                age: user.birth_date.map(|b| age_on(b, today)),
            },
            None => Orderer::default(),
        }
    }

    /// Log in, persist the session per `remember`, and fetch the profile.
    /// Backend errors propagate unchanged for the login form to present.
    pub async fn handle_login(
        &self,
        email: &str,
        password: &str,
        remember: bool,
    ) -> Result<(), ApiError> {
        let resp: LoginResponse = self
            .client
            .post(
                routes::LOGIN,
                &LoginRequest {
                    email: email.to_string(),
                    password: password.to_string(),
                },
            )
            .await?;

        self.client.auth().set_token(Some(resp.token.clone()));
        self.client.auth().set_credentials(email, password);

        let blob = StoredSession {
            token: resp.token,
            email: Some(email.to_string()),
            password: Some(password.to_string()),
        };
        let (target, other) = if remember {
            (&self.durable, &self.tab_scoped)
        } else {
            (&self.tab_scoped, &self.durable)
        };
        if let Ok(raw) = serde_json::to_string(&blob) {
            target.set(storage::SESSION_KEY, &raw);
        }
        other.remove(storage::SESSION_KEY);

        let profile: User = self.client.get(routes::PROFILE).await?;
        let mut user = self.user;
        user.set(Some(profile));
        Ok(())
    }

    /// Clear the in-memory session and both storage locations.
    pub fn handle_logout(&self) {
        let mut user = self.user;
        user.set(None);
        self.client.auth().clear();
        self.durable.remove(storage::SESSION_KEY);
        self.tab_scoped.remove(storage::SESSION_KEY);
    }

}

/// Load a stored session blob from either storage location into the auth
/// slot. Returns the blob so the caller can kick off the profile fetch.
fn adopt_stored(
    durable: &dyn KeyValueStore,
    tab_scoped: &dyn KeyValueStore,
    auth: &AuthSlot,
) -> Option<StoredSession> {
    let raw = durable
        .get(storage::SESSION_KEY)
        .or_else(|| tab_scoped.get(storage::SESSION_KEY))?;
    let blob: StoredSession = serde_json::from_str(&raw).ok()?;
    auth.set_token(Some(blob.token.clone()));
    if let (Some(email), Some(password)) = (&blob.email, &blob.password) {
        auth.set_credentials(email, password);
    }
    Some(blob)
}

/// Initialize the session context provider - call once at app root.
///
/// Also provides the [`ApiClient`] so pages can fetch without going through
/// the session.
pub fn use_session_provider() {
    let client = use_context_provider(|| ApiClient::browser(AuthSlot::new()));
    let ctx = use_context_provider(|| {
        SessionContext::new(client.clone(), storage::durable(), storage::tab_scoped())
    });

    // When the refresh interceptor gives up mid-request the session is dead:
    // force a full logout so the stored blob goes away and the route guards
    // bounce the user to the login page.
    let expired = use_signal(|| false);
    use_hook(|| {
        client.on_session_expired(move || {
            let mut expired = expired;
            expired.set(true);
        });
    });
    let expired_ctx = ctx.clone();
    use_effect(move || {
        let mut expired = expired;
        if expired() {
            expired.set(false);
            expired_ctx.handle_logout();
        }
    });

    // Eagerly refetch the profile for a stored session; a failure silently
    // leaves the session logged out.
    let adopt_ctx = ctx;
    use_effect(move || {
        let ctx = adopt_ctx.clone();
        if adopt_stored(&*ctx.durable, &*ctx.tab_scoped, ctx.client.auth()).is_none() {
            return;
        }
        let mut loading = ctx.loading;
        loading.set(true);
        spawn(async move {
            match ctx.client.get::<User>(routes::PROFILE).await {
                Ok(profile) => {
                    let mut user = ctx.user;
                    user.set(Some(profile));
                }
                Err(e) => {
                    tracing::debug!("stored session rejected: {e}");
                    ctx.handle_logout();
                }
            }
            let mut loading = ctx.loading;
            loading.set(false);
        });
    });
}

/// Get the session context - use in any component.
pub fn use_session() -> SessionContext {
    use_context::<SessionContext>()
}

/// Get the REST client - use in any component that fetches.
pub fn use_api() -> ApiClient {
    use_context::<ApiClient>()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use futures::executor::block_on;

    use super::super::api::test_support::{ok, ScriptedTransport};
    use super::super::storage::MemoryStore;
    use super::*;

    // Payload: {"sub":"amy@example.com","role":"CUSTOMER","exp":1893456000}
    fn jwt_with_payload(payload: &str) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let body = URL_SAFE_NO_PAD.encode(payload.as_bytes());
        format!("{header}.{body}.signature-not-checked")
    }

    #[test]
    fn decode_claims_reads_payload_without_verification() {
        let token =
            jwt_with_payload(r#"{"sub":"amy@example.com","role":"CUSTOMER","exp":1893456000}"#);
        let claims = decode_claims(&token).unwrap();
        assert_eq!(claims.sub.as_deref(), Some("amy@example.com"));
        assert_eq!(claims.role.as_deref(), Some("CUSTOMER"));
        assert_eq!(claims.exp, Some(1893456000));
    }

    #[test]
    fn decode_claims_rejects_garbage() {
        assert_eq!(decode_claims("not-a-jwt"), None);
        assert_eq!(decode_claims("a.%%%.c"), None);
    }

    #[test]
    fn age_counts_whole_years_only() {
        let birth = NaiveDate::from_ymd_opt(2008, 6, 15).unwrap();
        // Day before the 18th birthday.
        assert_eq!(
            age_on(birth, NaiveDate::from_ymd_opt(2026, 6, 14).unwrap()),
            17
        );
        // The birthday itself.
        assert_eq!(
            age_on(birth, NaiveDate::from_ymd_opt(2026, 6, 15).unwrap()),
            18
        );
        assert_eq!(
            age_on(birth, NaiveDate::from_ymd_opt(2027, 1, 1).unwrap()),
            18
        );
    }

    #[test]
    fn stored_session_blob_round_trips() {
        let blob = StoredSession {
            token: "tok".into(),
            email: Some("amy@example.com".into()),
            password: Some("hunter2".into()),
        };
        let raw = serde_json::to_string(&blob).unwrap();
        assert!(raw.contains("\"token\""));
        let back: StoredSession = serde_json::from_str(&raw).unwrap();
        assert_eq!(back, blob);

        // Token-only blob (e.g. remember unchecked on an older version).
        let partial: StoredSession = serde_json::from_str(r#"{"token":"t"}"#).unwrap();
        assert_eq!(partial.email, None);
    }

    #[test]
    fn stored_session_is_adopted_and_profile_fetch_authenticates() {
        let durable = MemoryStore::new();
        let tab_scoped = MemoryStore::new();
        let blob = StoredSession {
            token: "stored-token".into(),
            email: Some("amy@example.com".into()),
            password: Some("hunter2".into()),
        };
        durable.set(
            storage::SESSION_KEY,
            &serde_json::to_string(&blob).unwrap(),
        );

        let auth = AuthSlot::new();
        let adopted = adopt_stored(&durable, &tab_scoped, &auth);
        assert_eq!(adopted, Some(blob));
        assert_eq!(auth.token().as_deref(), Some("stored-token"));
        assert_eq!(
            auth.credentials(),
            Some(("amy@example.com".into(), "hunter2".into()))
        );

        // The eager profile fetch the provider kicks off after adoption
        // carries the adopted token and yields the signed-in user.
        let transport = ScriptedTransport::new(vec![ok(
            r#"{"id":1,"email":"amy@example.com","role":"CUSTOMER"}"#,
        )]);
        let client = ApiClient::new(transport.clone(), auth);
        let profile: User = block_on(client.get(routes::PROFILE)).unwrap();
        assert_eq!(profile.email, "amy@example.com");
        assert_eq!(profile.role, Role::Customer);
        assert_eq!(
            transport.requests()[0].bearer.as_deref(),
            Some("stored-token")
        );
    }

    #[test]
    fn tab_scoped_blob_is_adopted_when_durable_is_empty() {
        let durable = MemoryStore::new();
        let tab_scoped = MemoryStore::new();
        tab_scoped.set(storage::SESSION_KEY, r#"{"token":"tab-token"}"#);

        let auth = AuthSlot::new();
        let adopted = adopt_stored(&durable, &tab_scoped, &auth).unwrap();
        assert_eq!(adopted.token, "tab-token");
        assert_eq!(auth.token().as_deref(), Some("tab-token"));
        // No retained credentials, so a later expiry cannot silently re-login.
        assert_eq!(auth.credentials(), None);
    }

    #[test]
    fn empty_storage_adopts_nothing() {
        let auth = AuthSlot::new();
        let adopted = adopt_stored(&MemoryStore::new(), &MemoryStore::new(), &auth);
        assert_eq!(adopted, None);
        assert_eq!(auth.token(), None);
    }
}
