/// Base URL of the prompt-analysis backend API.
///
/// Resolved at compile time:
/// - Development: `http://127.0.0.1:8000/api/v1` (default)
/// - Deployment: set `VOIDCODER_API_URL` in `.env` (see `build.rs`)
pub const API_BASE_URL: &str = match option_env!("VOIDCODER_API_URL") {
    Some(url) => url,
    None => "http://127.0.0.1:8000/api/v1",
};

/// Identity-provider entry point. The backend completes the OAuth exchange
/// and redirects back to `/auth/callback?token=...`.
pub fn google_login_url() -> String {
    format!("{API_BASE_URL}/auth/login/google")
}
