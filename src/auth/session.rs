//! Process-wide authentication state.
//!
//! [`SessionStore`] is the single owner of the bearer token and of the
//! durable slot it persists in; every other module only reads from it. It is
//! constructed once at app start, initialized before the router renders, and
//! handed to consumers through Leptos context. State changes propagate
//! through the inner signal, so gating and display layers that read
//! [`SessionStore::state`] inside a reactive closure re-run automatically.

use std::rc::Rc;

use leptos::prelude::*;

use super::claims::{self, DecodeError, TokenClaims};

/// Name of the durable slot holding the raw bearer token.
pub const TOKEN_STORAGE_KEY: &str = "authToken";

/// Durable storage port for the bearer token.
///
/// One named slot; presence or absence of the slot is itself part of the
/// route-gating contract.
pub trait TokenStorage {
    fn load(&self) -> Option<String>;
    fn store(&self, token: &str);
    fn clear(&self);
}

/// `localStorage`-backed implementation used in the browser.
pub struct BrowserTokenStorage;

impl BrowserTokenStorage {
    fn slot() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }
}

impl TokenStorage for BrowserTokenStorage {
    fn load(&self) -> Option<String> {
        Self::slot()?.get_item(TOKEN_STORAGE_KEY).ok()?
    }

    fn store(&self, token: &str) {
        match Self::slot() {
            Some(slot) => {
                if slot.set_item(TOKEN_STORAGE_KEY, token).is_err() {
                    log::error!("failed to persist auth token");
                }
            }
            None => log::error!("localStorage unavailable, auth token not persisted"),
        }
    }

    fn clear(&self) {
        if let Some(slot) = Self::slot() {
            let _ = slot.remove_item(TOKEN_STORAGE_KEY);
        }
    }
}

/// Identity fields decoded from the current token.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionUser {
    pub id: String,
    pub email: String,
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionState {
    pub is_authenticated: bool,
    pub token: Option<String>,
    pub user: Option<SessionUser>,
}

impl SessionState {
    fn authenticated(token: String, claims: &TokenClaims) -> Self {
        Self {
            is_authenticated: true,
            token: Some(token),
            user: Some(SessionUser {
                id: claims.sub.clone(),
                email: claims.email.clone(),
                display_name: claims.given_name.clone(),
            }),
        }
    }
}

#[derive(Clone, Copy)]
pub struct SessionStore {
    state: RwSignal<SessionState>,
    storage: StoredValue<Rc<dyn TokenStorage>, LocalStorage>,
}

impl SessionStore {
    pub fn new(storage: Rc<dyn TokenStorage>) -> Self {
        Self {
            state: RwSignal::new(SessionState::default()),
            storage: StoredValue::new_local(storage),
        }
    }

    /// Restore a persisted session, once, at startup.
    ///
    /// Must run before the router takes its first gating decision. An
    /// undecodable or expired persisted token clears the slot and leaves the
    /// state anonymous; neither case is surfaced to the user.
    pub fn initialize(&self) {
        let Some(token) = self.storage.with_value(|s| s.load()) else {
            return;
        };

        match claims::decode(&token) {
            Ok(claims) if !claims.is_expired(claims::now_epoch_secs()) => {
                log::info!("restored session for {}", claims.email);
                self.state.set(SessionState::authenticated(token, &claims));
            }
            Ok(_) => {
                log::warn!("persisted auth token expired, clearing");
                self.storage.with_value(|s| s.clear());
            }
            Err(err) => {
                log::error!("failed to decode persisted auth token: {err}");
                self.storage.with_value(|s| s.clear());
            }
        }
    }

    /// Accept a freshly issued token, persist it, and become authenticated.
    ///
    /// On a decode failure the slot is cleared, the state resets to
    /// anonymous, and the error goes back to the caller for user-visible
    /// feedback and navigation.
    pub fn login(&self, token: &str) -> Result<(), DecodeError> {
        match claims::decode(token) {
            Ok(claims) => {
                self.storage.with_value(|s| s.store(token));
                self.state
                    .set(SessionState::authenticated(token.to_string(), &claims));
                Ok(())
            }
            Err(err) => {
                self.storage.with_value(|s| s.clear());
                self.state.set(SessionState::default());
                Err(err)
            }
        }
    }

    /// Clear the durable slot and reset to anonymous. Idempotent.
    pub fn logout(&self) {
        self.storage.with_value(|s| s.clear());
        self.state.set(SessionState::default());
    }

    /// Reactive read of the current session state.
    pub fn state(&self) -> SessionState {
        self.state.get()
    }

    /// Token for an outbound request, valid as of this instant.
    ///
    /// Expiry is checked lazily here rather than by a background timer; an
    /// expired token reads as absent.
    pub fn bearer_token(&self) -> Option<String> {
        let token = self.state.with_untracked(|state| state.token.clone())?;
        let claims = claims::decode(&token).ok()?;
        (!claims.is_expired(claims::now_epoch_secs())).then_some(token)
    }

    /// Whether the durable slot currently holds a token (the route gate's
    /// second input).
    pub fn storage_has_token(&self) -> bool {
        self.storage.with_value(|s| s.load()).is_some()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine as _;

    use super::*;

    #[derive(Default)]
    struct MemoryTokenStorage {
        slot: RefCell<Option<String>>,
    }

    impl TokenStorage for MemoryTokenStorage {
        fn load(&self) -> Option<String> {
            self.slot.borrow().clone()
        }

        fn store(&self, token: &str) {
            *self.slot.borrow_mut() = Some(token.to_string());
        }

        fn clear(&self) {
            *self.slot.borrow_mut() = None;
        }
    }

    fn make_token(exp: u64) -> String {
        let payload = serde_json::json!({
            "sub": "user-42",
            "email": "grace@example.com",
            "given_name": "Grace",
            "exp": exp,
        });
        format!("h.{}.s", URL_SAFE_NO_PAD.encode(payload.to_string()))
    }

    fn future_exp() -> u64 {
        claims::now_epoch_secs() + 3_600
    }

    fn past_exp() -> u64 {
        claims::now_epoch_secs().saturating_sub(3_600)
    }

    fn make_store() -> (Rc<MemoryTokenStorage>, SessionStore) {
        let storage = Rc::new(MemoryTokenStorage::default());
        let store = SessionStore::new(storage.clone());
        (storage, store)
    }

    #[test]
    fn test_initialize_without_persisted_token_stays_anonymous() {
        let (_storage, store) = make_store();
        store.initialize();
        let state = store.state.get_untracked();
        assert!(!state.is_authenticated);
        assert!(state.token.is_none());
        assert!(state.user.is_none());
    }

    #[test]
    fn test_initialize_restores_valid_token() {
        let (storage, store) = make_store();
        let token = make_token(future_exp());
        storage.store(&token);

        store.initialize();

        let state = store.state.get_untracked();
        assert!(state.is_authenticated);
        assert_eq!(state.token.as_deref(), Some(token.as_str()));
        let user = state.user.unwrap();
        assert_eq!(user.id, "user-42");
        assert_eq!(user.email, "grace@example.com");
        assert_eq!(user.display_name, "Grace");
    }

    #[test]
    fn test_initialize_clears_expired_token() {
        let (storage, store) = make_store();
        storage.store(&make_token(past_exp()));

        store.initialize();

        assert!(!store.state.get_untracked().is_authenticated);
        assert!(storage.load().is_none());
    }

    #[test]
    fn test_initialize_clears_undecodable_token() {
        let (storage, store) = make_store();
        storage.store("garbage");

        store.initialize();

        assert!(!store.state.get_untracked().is_authenticated);
        assert!(storage.load().is_none());
    }

    #[test]
    fn test_login_persists_and_populates_identity() {
        let (storage, store) = make_store();
        let token = make_token(future_exp());

        store.login(&token).unwrap();

        assert_eq!(storage.load().as_deref(), Some(token.as_str()));
        let state = store.state.get_untracked();
        assert!(state.is_authenticated);
        assert_eq!(state.user.unwrap().display_name, "Grace");
    }

    #[test]
    fn test_login_failure_resets_to_anonymous() {
        let (storage, store) = make_store();
        store.login(&make_token(future_exp())).unwrap();

        let err = store.login("not.a-token").unwrap_err();
        assert_eq!(err, DecodeError::Malformed);
        assert!(storage.load().is_none());
        assert!(!store.state.get_untracked().is_authenticated);
    }

    #[test]
    fn test_logout_is_idempotent() {
        let (storage, store) = make_store();
        store.login(&make_token(future_exp())).unwrap();

        store.logout();
        let after_first = store.state.get_untracked();
        store.logout();
        let after_second = store.state.get_untracked();

        assert_eq!(after_first, after_second);
        assert!(!after_second.is_authenticated);
        assert!(storage.load().is_none());
    }

    #[test]
    fn test_bearer_token_hides_expired_token() {
        let (_storage, store) = make_store();
        // login does not check expiry; the read side must.
        store.login(&make_token(past_exp())).unwrap();
        assert_eq!(store.bearer_token(), None);
    }

    #[test]
    fn test_bearer_token_returns_valid_token() {
        let (_storage, store) = make_store();
        let token = make_token(future_exp());
        store.login(&token).unwrap();
        assert_eq!(store.bearer_token(), Some(token));
    }
}
