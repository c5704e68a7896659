//! Auth token storage and one-shot login.
//!
//! The token is a 32-character string kept as a flat text file. Reading a
//! missing or malformed token fails before any network call is made.

use serde::Deserialize;
use std::path::Path;

use crate::config::ClientConfig;
use crate::error::{Error, Result, ResultExt};

/// Exact length of a valid token
pub const TOKEN_LEN: usize = 32;

const LOGIN_PATH: &str = "/api/tiny/login/email";

/// Read and validate the token at `path`.
pub fn read_token(path: &Path) -> Result<String> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        Error::auth(format!("cannot read {}: {e}", path.display()))
    })?;
    let token = raw.trim_end_matches(['\r', '\n']).to_string();
    validate(&token)?;
    Ok(token)
}

/// Validate and persist a token.
pub fn save_token(path: &Path, token: &str) -> Result<()> {
    validate(token)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).with_context("creating token directory")?;
    }
    std::fs::write(path, token).with_context(format!("writing {}", path.display()))?;
    tracing::info!("Saved auth token to {:?}", path);
    Ok(())
}

fn validate(token: &str) -> Result<()> {
    if token.chars().count() != TOKEN_LEN {
        return Err(Error::auth(format!(
            "expected {TOKEN_LEN} characters, got {}",
            token.chars().count()
        )));
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    result: Option<LoginResult>,
}

#[derive(Debug, Deserialize)]
struct LoginResult {
    token: Option<String>,
    profile: Option<LoginProfile>,
}

#[derive(Debug, Deserialize)]
struct LoginProfile {
    token: Option<String>,
}

/// Exchange email and password for a token.
pub async fn login(config: &ClientConfig, email: &str, password: &str) -> Result<String> {
    let url = format!("{}{}", config.base_url, LOGIN_PATH);
    let http_client = config.http_client()?;

    let response = http_client
        .post(&url)
        .query(&[("register", "true")])
        .form(&[("email", email), ("password", password)])
        .send()
        .await
        .map_err(|e| Error::auth(format!("login request failed: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(Error::auth(format!("login rejected: HTTP {status}")));
    }

    let body = response
        .json::<LoginResponse>()
        .await
        .map_err(|e| Error::auth(format!("unreadable login response: {e}")))?;

    extract_token(body)
}

/// `result.token`, falling back to `result.profile.token`.
fn extract_token(body: LoginResponse) -> Result<String> {
    let result = body.result.ok_or_else(|| Error::auth("login response has no result"))?;
    let token = result
        .token
        .filter(|t| !t.is_empty())
        .or_else(|| result.profile.and_then(|p| p.token))
        .ok_or_else(|| Error::auth("token not found in login response"))?;
    validate(&token)?;
    Ok(token)
}
