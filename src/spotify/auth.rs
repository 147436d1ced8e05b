use anyhow::{bail, Context, Result};
use reqwest::Url;
use std::collections::HashMap;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tracing::info;

#[derive(Debug, PartialEq)]
pub struct AuthResult {
    pub code: String,
    pub state: String,
}

/// `host:port` to listen on for the redirect, taken from the redirect URI.
pub fn callback_addr(redirect_uri: &str) -> Result<String> {
    let url = Url::parse(redirect_uri)
        .with_context(|| format!("Invalid SPOTIFY_REDIRECT_URI: {redirect_uri}"))?;
    let host = url.host_str().context("SPOTIFY_REDIRECT_URI has no host")?;
    let port = url
        .port_or_known_default()
        .context("SPOTIFY_REDIRECT_URI has no port")?;
    Ok(format!("{host}:{port}"))
}

/// Reads `code` and `state` from the request line of the redirect,
/// e.g. `GET /callback?code=...&state=... HTTP/1.1`.
pub fn parse_redirect(request: &str) -> Result<AuthResult> {
    let query = request
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|path| path.split('?').nth(1))
        .unwrap_or("");

    let params: HashMap<&str, String> = query
        .split('&')
        .filter_map(|kv| {
            let mut parts = kv.splitn(2, '=');
            let key = parts.next()?;
            let value = urlencoding::decode(parts.next()?).ok()?.into_owned();
            Some((key, value))
        })
        .collect();

    if let Some(error) = params.get("error") {
        bail!("Spotify denied authorization: {error}");
    }

    let code = params.get("code").context("No code in redirect")?.clone();
    let state = params.get("state").cloned().unwrap_or_default();

    Ok(AuthResult { code, state })
}

/// Accepts one connection on `addr` and reads the Spotify redirect from it.
pub async fn wait_for_auth_code(addr: &str) -> Result<AuthResult> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr} for OAuth redirect"))?;

    info!("Waiting for Spotify auth redirect on http://{addr} ...");

    let (mut stream, _) = listener.accept().await?;
    let mut buf = vec![0u8; 4096];
    let n = stream.read(&mut buf).await?;
    let request = String::from_utf8_lossy(&buf[..n]);

    let result = parse_redirect(&request);

    let body = match result {
        Ok(_) => "<h1>topvibes</h1><p>Authentication successful! You can close this tab.</p>",
        Err(_) => "<h1>topvibes</h1><p>Authentication failed. Check your terminal.</p>",
    };
    let response = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        body.len(),
        body
    );
    stream.write_all(response.as_bytes()).await?;
    stream.flush().await?;

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_callback_addr() {
        assert_eq!(
            callback_addr("http://127.0.0.1:8989/callback").unwrap(),
            "127.0.0.1:8989"
        );
        assert_eq!(callback_addr("http://localhost/cb").unwrap(), "localhost:80");
        assert!(callback_addr("not a uri").is_err());
    }

    #[test]
    fn test_parse_redirect() {
        let request = "GET /callback?code=AQB%2Fx&state=abc123 HTTP/1.1\r\nHost: 127.0.0.1\r\n\r\n";
        let result = parse_redirect(request).unwrap();
        assert_eq!(
            result,
            AuthResult {
                code: "AQB/x".to_string(),
                state: "abc123".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_redirect_denied() {
        let request = "GET /callback?error=access_denied&state=abc HTTP/1.1\r\n\r\n";
        let err = parse_redirect(request).unwrap_err();
        assert!(err.to_string().contains("access_denied"));
    }

    #[test]
    fn test_parse_redirect_without_code() {
        assert!(parse_redirect("GET /favicon.ico HTTP/1.1\r\n\r\n").is_err());
    }
}
