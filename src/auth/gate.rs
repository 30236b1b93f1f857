//! Navigation gating for routes that require a signed-in user.

use super::session::SessionState;

/// Anonymous landing surface; gate denials redirect here, silently.
pub const LANDING_PATH: &str = "/";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allow,
    Redirect(&'static str),
}

/// Decide whether a gated route may render.
///
/// Conservative rule: redirect only when neither the in-memory state nor the
/// durable slot shows a credential. A token still sitting in storage while
/// the in-memory state lags (e.g. mid-initialization) counts as signed in;
/// the token's validity is enforced where it is actually used.
pub fn can_enter(state: &SessionState, storage_has_token: bool) -> Access {
    if state.is_authenticated || storage_has_token {
        Access::Allow
    } else {
        Access::Redirect(LANDING_PATH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn authenticated_state() -> SessionState {
        SessionState {
            is_authenticated: true,
            token: Some("token".to_string()),
            user: None,
        }
    }

    #[test]
    fn test_allows_authenticated_state() {
        assert_eq!(can_enter(&authenticated_state(), true), Access::Allow);
        assert_eq!(can_enter(&authenticated_state(), false), Access::Allow);
    }

    #[test]
    fn test_allows_anonymous_state_with_stored_token() {
        assert_eq!(can_enter(&SessionState::default(), true), Access::Allow);
    }

    #[test]
    fn test_redirects_when_no_credential_anywhere() {
        assert_eq!(
            can_enter(&SessionState::default(), false),
            Access::Redirect(LANDING_PATH)
        );
    }
}
