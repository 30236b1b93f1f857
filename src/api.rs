//! HTTP client for the prompt-analysis backend.
//!
//! The backend contract is fixed: multipart analyze endpoint, paged history
//! endpoint, bearer-token authorization, and FastAPI-style `detail` error
//! bodies. This module owns request construction and the classification of
//! failures into the [`ApiError`] taxonomy; it holds no state.

use gloo_net::http::{Request, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use web_sys::FormData;

use crate::config;
use crate::upload::SubmissionParts;

/// One generated prompt section. Order within a result is server-defined
/// and significant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedPrompt {
    pub prompt_type: String,
    pub prompt_text: String,
}

/// Response of the analyze endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AnalysisResult {
    pub session_name: Option<String>,
    pub image_filename: Option<String>,
    #[serde(default)]
    pub prompts: Vec<GeneratedPrompt>,
}

/// One past analysis session as returned by the history endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HistorySession {
    pub id: i64,
    pub session_name: Option<String>,
    pub image_filename: Option<String>,
    pub created_at: Option<String>,
    #[serde(default)]
    pub generated_prompts: Vec<GeneratedPrompt>,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// Non-2xx response; `detail` is the server's structured message when
    /// one parsed, otherwise the transport status text.
    #[error("{detail}")]
    Http { status: u16, detail: String },

    /// Transport failure before a response was obtained.
    #[error("Network error: {0}")]
    Network(String),

    /// A 2xx response whose body did not match the expected shape.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Submit a batch for analysis.
///
/// Builds one multipart request carrying, per image in insertion order, an
/// `image_files` blob and its aligned `image_titles` string, plus the
/// optional `session_name`. The bearer token is whatever the caller read
/// from the session at dispatch time; a login or logout afterwards does not
/// touch this request.
pub async fn analyze_image(
    token: Option<&str>,
    parts: &SubmissionParts<web_sys::File>,
) -> Result<AnalysisResult, ApiError> {
    let url = format!("{}/prompts/analyze-image", config::API_BASE_URL);
    let form = build_analyze_form(parts)?;

    let mut request = Request::post(&url);
    if let Some(token) = token {
        request = request.header("Authorization", &format!("Bearer {token}"));
    }

    let response = request
        .body(form)
        .map_err(|err| ApiError::Network(err.to_string()))?
        .send()
        .await
        .map_err(|err| ApiError::Network(err.to_string()))?;

    read_json(response).await
}

/// Fetch past analysis sessions, newest first.
///
/// A missing token is a local precondition the caller checks against the
/// session store; this function is only reached with one in hand.
pub async fn fetch_history(
    token: &str,
    skip: u32,
    limit: u32,
) -> Result<Vec<HistorySession>, ApiError> {
    let url = format!(
        "{}/prompts/history?skip={}&limit={}",
        config::API_BASE_URL,
        skip,
        limit
    );

    let response = Request::get(&url)
        .header("Authorization", &format!("Bearer {token}"))
        .send()
        .await
        .map_err(|err| ApiError::Network(err.to_string()))?;

    read_json(response).await
}

fn build_analyze_form(parts: &SubmissionParts<web_sys::File>) -> Result<FormData, ApiError> {
    let form = FormData::new().map_err(js_error)?;

    if let Some(session_name) = &parts.session_name {
        form.append_with_str("session_name", session_name)
            .map_err(js_error)?;
    }

    for (file, title) in &parts.images {
        form.append_with_blob_and_filename("image_files", file, &file.name())
            .map_err(js_error)?;
        form.append_with_str("image_titles", title).map_err(js_error)?;
    }

    Ok(form)
}

fn js_error(err: wasm_bindgen::JsValue) -> ApiError {
    ApiError::Network(format!("{err:?}"))
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    if !response.ok() {
        let status = response.status();
        let status_text = response.status_text();
        let body = response.text().await.unwrap_or_default();
        return Err(ApiError::Http {
            status,
            detail: parse_error_detail(&body, &status_text),
        });
    }

    response
        .json::<T>()
        .await
        .map_err(|err| ApiError::Parse(err.to_string()))
}

/// Render a non-2xx body into one human-readable line.
///
/// Understands the backend's `{"detail": ...}` shape: a plain string is used
/// verbatim; a list of field errors becomes `loc -> parts: msg` joined with
/// `"; "`. Anything else falls back to the transport status text.
fn parse_error_detail(body: &str, status_text: &str) -> String {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return status_text.to_string();
    };

    match value.get("detail") {
        Some(Value::String(detail)) => detail.clone(),
        Some(Value::Array(items)) if !items.is_empty() => items
            .iter()
            .map(format_field_error)
            .collect::<Vec<_>>()
            .join("; "),
        _ => status_text.to_string(),
    }
}

fn format_field_error(item: &Value) -> String {
    let msg = item
        .get("msg")
        .and_then(Value::as_str)
        .unwrap_or("invalid value");

    match item.get("loc").and_then(Value::as_array) {
        Some(loc) if !loc.is_empty() => {
            let path = loc.iter().map(loc_segment).collect::<Vec<_>>().join(" -> ");
            format!("{path}: {msg}")
        }
        _ => format!("Error: {msg}"),
    }
}

fn loc_segment(segment: &Value) -> String {
    match segment {
        Value::String(part) => part.clone(),
        other => other.to_string(),
    }
}
