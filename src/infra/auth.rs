use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;
use url::Url;

use crate::cache::TokenCache;
use crate::error::{AppError, AppResult};
use crate::services::CredentialProvider;

const REDIRECT_PORT: u16 = 5000;
const REDIRECT_PATH: &str = "/getToken";
const LOGIN_TIMEOUT: Duration = Duration::from_secs(300);

/// Interactive Azure AD authorization-code flow with a persisted token
/// cache. The redirect listener lives only for the duration of one login
/// and is torn down whether the flow succeeds, fails, or times out.
pub struct AzureAuthFlow {
    http: Client,
    tenant_id: Option<String>,
    client_id: Option<String>,
    scope: Option<String>,
    login: Mutex<()>,
}

impl AzureAuthFlow {
    pub fn new(tenant_id: Option<String>, client_id: Option<String>, scope: Option<String>) -> Self {
        Self {
            http: Client::new(),
            tenant_id,
            client_id,
            scope,
            login: Mutex::new(()),
        }
    }

    fn flow_details(&self) -> AppResult<(&str, &str, &str)> {
        let tenant_id = self.tenant_id.as_deref().ok_or_else(|| {
            AppError::Configuration("tenant ID not configured".to_string())
        })?;
        let client_id = self.client_id.as_deref().ok_or_else(|| {
            AppError::Configuration("client ID not configured".to_string())
        })?;
        let scope = self.scope.as_deref().ok_or_else(|| {
            AppError::Configuration("OAuth scope not configured".to_string())
        })?;
        Ok((tenant_id, client_id, scope))
    }

    fn redirect_uri() -> String {
        format!("http://localhost:{REDIRECT_PORT}{REDIRECT_PATH}")
    }

    fn authorize_url(tenant_id: &str, client_id: &str, scope: &str) -> AppResult<Url> {
        let mut url = Url::parse(&format!(
            "https://login.microsoftonline.com/{tenant_id}/oauth2/v2.0/authorize"
        ))
        .map_err(|err| AppError::Configuration(format!("invalid tenant ID: {err}")))?;
        url.query_pairs_mut()
            .append_pair("client_id", client_id)
            .append_pair("response_type", "code")
            .append_pair("redirect_uri", &Self::redirect_uri())
            .append_pair("response_mode", "query")
            .append_pair("scope", scope);
        Ok(url)
    }

    async fn interactive_login(&self) -> AppResult<TokenResponse> {
        let (tenant_id, client_id, scope) = self.flow_details()?;

        let listener = TcpListener::bind(("127.0.0.1", REDIRECT_PORT))
            .await
            .map_err(|err| {
                AppError::Authentication(format!(
                    "cannot listen on port {REDIRECT_PORT} for the login redirect: {err}"
                ))
            })?;

        let auth_url = Self::authorize_url(tenant_id, client_id, scope)?;
        eprintln!("Opening browser for Azure login...");
        if webbrowser::open(auth_url.as_str()).is_err() {
            eprintln!("Could not open a browser. Visit this URL to sign in:\n{auth_url}");
        }

        let code = tokio::time::timeout(LOGIN_TIMEOUT, Self::await_redirect(&listener))
            .await
            .map_err(|_| {
                AppError::Authentication("timed out waiting for the login redirect".to_string())
            })??;

        self.exchange_code(tenant_id, client_id, scope, &code).await
    }

    /// Serve exactly one redirect request and extract the authorization
    /// code from its query string.
    async fn await_redirect(listener: &TcpListener) -> AppResult<String> {
        let (mut stream, _) = listener.accept().await.map_err(|err| {
            AppError::Authentication(format!("failed to accept the login redirect: {err}"))
        })?;

        let mut buffer = vec![0u8; 4096];
        let read = stream.read(&mut buffer).await.map_err(|err| {
            AppError::Authentication(format!("failed to read the login redirect: {err}"))
        })?;
        let request = String::from_utf8_lossy(&buffer[..read]).into_owned();

        match parse_redirect_code(&request) {
            Some(code) => {
                respond(&mut stream, 200, "Authentication successful. You can close this window.")
                    .await;
                Ok(code)
            }
            None => {
                respond(&mut stream, 400, "Authentication failed.").await;
                Err(AppError::Authentication(
                    "login redirect carried no authorization code".to_string(),
                ))
            }
        }
    }

    async fn exchange_code(
        &self,
        tenant_id: &str,
        client_id: &str,
        scope: &str,
        code: &str,
    ) -> AppResult<TokenResponse> {
        let token_url =
            format!("https://login.microsoftonline.com/{tenant_id}/oauth2/v2.0/token");
        let params = [
            ("client_id", client_id),
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", &Self::redirect_uri()),
            ("scope", scope),
        ];

        let response = self
            .http
            .post(token_url)
            .form(&params)
            .send()
            .await
            .map_err(|err| {
                AppError::Authentication(format!("failed to call the token endpoint: {err}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unable to read response>".to_string());
            return Err(AppError::Authentication(format!(
                "token endpoint responded with {status}: {body}"
            )));
        }

        response.json::<TokenResponse>().await.map_err(|err| {
            AppError::Authentication(format!("failed to parse the token response: {err}"))
        })
    }
}

#[async_trait]
impl CredentialProvider for AzureAuthFlow {
    async fn bearer_token(&self) -> AppResult<String> {
        // One login at a time; concurrent callers reuse the cached result.
        let _guard = self.login.lock().await;

        let mut cache = TokenCache::load()?;
        if let Some(token) = cache.valid_token() {
            return Ok(token.access_token.clone());
        }

        let token = self.interactive_login().await?;
        cache.store(token.access_token.clone(), token.expires_in)?;
        Ok(token.access_token)
    }
}

fn parse_redirect_code(request: &str) -> Option<String> {
    let request_line = request.lines().next()?;
    let mut parts = request_line.split_whitespace();
    let method = parts.next()?;
    let target = parts.next()?;
    if method != "GET" {
        return None;
    }

    let url = Url::parse(&format!("http://localhost{target}")).ok()?;
    if url.path() != REDIRECT_PATH {
        return None;
    }
    url.query_pairs()
        .find(|(key, _)| key == "code")
        .map(|(_, value)| value.into_owned())
}

async fn respond(stream: &mut TcpStream, status: u16, body: &str) {
    let reason = if status == 200 { "OK" } else { "Bad Request" };
    let response = format!(
        "HTTP/1.1 {status} {reason}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    // The browser-facing reply is best effort; the flow outcome does not
    // depend on it.
    let _ = stream.write_all(response.as_bytes()).await;
    let _ = stream.shutdown().await;
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_the_code_from_a_redirect_request() {
        let request = "GET /getToken?code=abc123&state=x HTTP/1.1\r\nHost: localhost:5000\r\n\r\n";
        assert_eq!(parse_redirect_code(request).as_deref(), Some("abc123"));
    }

    #[test]
    fn rejects_redirects_without_a_code() {
        let request = "GET /getToken?error=access_denied HTTP/1.1\r\n\r\n";
        assert!(parse_redirect_code(request).is_none());
    }

    #[test]
    fn rejects_other_paths_and_methods() {
        assert!(parse_redirect_code("GET /favicon.ico HTTP/1.1\r\n\r\n").is_none());
        assert!(parse_redirect_code("POST /getToken?code=x HTTP/1.1\r\n\r\n").is_none());
    }

    #[test]
    fn authorize_url_carries_the_flow_parameters() {
        let url = AzureAuthFlow::authorize_url("tenant", "client", "api://app/.default").unwrap();
        assert!(url.as_str().starts_with("https://login.microsoftonline.com/tenant/oauth2/v2.0/authorize?"));
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert!(pairs.contains(&("client_id".to_string(), "client".to_string())));
        assert!(pairs.contains(&("response_type".to_string(), "code".to_string())));
        assert!(pairs.contains(&("redirect_uri".to_string(), AzureAuthFlow::redirect_uri())));
    }
}
