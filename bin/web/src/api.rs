//! Calls to the dashboard API.
//!
//! Client-side (csr): real HTTP calls via `gloo-net`. Elsewhere the calls
//! fail immediately since they are only meaningful in the browser.

#![allow(clippy::unused_async)]

/// Endpoint issuing bearer tokens for the OAuth2 password flow.
pub const TOKEN_ENDPOINT: &str = "/api/token";

/// Body returned by [`TOKEN_ENDPOINT`].
#[derive(Debug, Clone, serde::Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

/// Exchanges credentials for a bearer token via `POST /api/token`.
///
/// The request is a form with `username` and `password` fields, as the
/// OAuth2 password flow expects.
///
/// # Errors
///
/// Returns a user-facing message if the request fails or the credentials
/// are rejected.
pub async fn request_token(email: &str, password: &str) -> Result<String, String> {
    #[cfg(feature = "csr")]
    {
        let form = web_sys::UrlSearchParams::new()
            .map_err(|_| "could not build login form".to_owned())?;
        form.append("username", email);
        form.append("password", password);

        let resp = gloo_net::http::Request::post(TOKEN_ENDPOINT)
            .body(form)
            .map_err(|e| e.to_string())?
            .send()
            .await
            .map_err(|e| e.to_string())?;
        if resp.status() == 401 {
            return Err("Incorrect email or password.".to_owned());
        }
        if !resp.ok() {
            return Err(format!("login failed: {}", resp.status()));
        }
        let body: TokenResponse = resp.json().await.map_err(|e| e.to_string())?;
        if !body.token_type.eq_ignore_ascii_case("bearer") {
            tracing::warn!(token_type = %body.token_type, "Unexpected token type");
        }
        Ok(body.access_token)
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = (email, password);
        Err("not available outside the browser".to_owned())
    }
}
