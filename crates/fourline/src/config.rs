//! Client configuration and endpoint selection.
//!
//! The server address comes from the environment, falling back to a
//! local development default. The scheme (`ws` or `wss`) follows the
//! address: an explicit `https://`/`wss://` prefix selects TLS, a bare
//! local host selects plain `ws`, and anything else is assumed to be a
//! deployed backend behind TLS. `FOURLINE_USE_WSS` overrides all of that.

use std::fmt;

use crate::FourlineError;

/// Env key for the backend `host[:port]` (optionally with a scheme).
pub const ENV_BACKEND_URL: &str = "FOURLINE_BACKEND_URL";
/// Env key forcing TLS on (`true`/`1`) or off (`false`/`0`).
pub const ENV_USE_WSS: &str = "FOURLINE_USE_WSS";
/// Env key for the WebSocket path.
pub const ENV_WS_PATH: &str = "FOURLINE_WS_PATH";
/// Env key for a default username.
pub const ENV_USERNAME: &str = "FOURLINE_USERNAME";

const DEFAULT_BACKEND: &str = "localhost:8080";
const DEFAULT_PATH: &str = "/ws";

// ---------------------------------------------------------------------------
// Endpoint
// ---------------------------------------------------------------------------

/// WebSocket scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Ws,
    Wss,
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ws => write!(f, "ws"),
            Self::Wss => write!(f, "wss"),
        }
    }
}

/// A resolved server address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub scheme: Scheme,
    /// `host[:port]`.
    pub authority: String,
    /// Always starts with `/`.
    pub path: String,
}

impl Endpoint {
    /// The full WebSocket URL.
    pub fn url(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}{}", self.scheme, self.authority, self.path)
    }
}

// ---------------------------------------------------------------------------
// ClientConfig
// ---------------------------------------------------------------------------

/// Settings for a client session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend address, `host[:port]`, no scheme.
    pub backend: String,
    /// Connect with `wss://` instead of `ws://`.
    pub use_wss: bool,
    /// WebSocket path on the backend.
    pub path: String,
    /// Username to join with when none is given explicitly.
    pub username: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BACKEND)
    }
}

impl ClientConfig {
    /// A config for `backend`, with the scheme inferred from it.
    ///
    /// `backend` may carry a scheme (`https://`, `wss://`, `http://`,
    /// `ws://`); it is stripped and used to pick TLS.
    pub fn new(backend: &str) -> Self {
        let (authority, explicit_tls) = split_scheme(backend);
        let authority = authority.trim_end_matches('/');
        let use_wss = explicit_tls.unwrap_or_else(|| !is_local(authority));
        Self {
            backend: authority.to_string(),
            use_wss,
            path: DEFAULT_PATH.to_string(),
            username: None,
        }
    }

    /// Forces TLS on or off.
    #[must_use]
    pub fn with_wss(mut self, use_wss: bool) -> Self {
        self.use_wss = use_wss;
        self
    }

    /// Sets the WebSocket path. A missing leading `/` is added.
    #[must_use]
    pub fn with_path(mut self, path: &str) -> Self {
        self.path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{path}")
        };
        self
    }

    /// Sets the default username.
    #[must_use]
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Loads the config from the process environment.
    pub fn from_env() -> Result<Self, FourlineError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads the config through `lookup`. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, FourlineError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let backend = get(ENV_BACKEND_URL);
        let mut config = Self::new(backend.as_deref().unwrap_or(DEFAULT_BACKEND));

        if let Some(raw) = get(ENV_USE_WSS) {
            config.use_wss = parse_bool(&raw).ok_or(FourlineError::InvalidConfig {
                key: ENV_USE_WSS,
                value: raw,
            })?;
        }
        if let Some(path) = get(ENV_WS_PATH) {
            config = config.with_path(path.trim());
        }
        if let Some(username) = get(ENV_USERNAME) {
            config.username = Some(username.trim().to_string());
        }

        tracing::debug!(
            backend = %config.backend, use_wss = config.use_wss, path = %config.path,
            "client config loaded"
        );
        Ok(config)
    }

    /// Resolves the endpoint to connect to.
    pub fn endpoint(&self) -> Endpoint {
        Endpoint {
            scheme: if self.use_wss { Scheme::Wss } else { Scheme::Ws },
            authority: self.backend.clone(),
            path: self.path.clone(),
        }
    }
}

/// Splits a leading scheme off `raw`, reporting whether it implies TLS.
fn split_scheme(raw: &str) -> (&str, Option<bool>) {
    let raw = raw.trim();
    for (prefix, tls) in [
        ("https://", true),
        ("wss://", true),
        ("http://", false),
        ("ws://", false),
    ] {
        if let Some(rest) = raw.strip_prefix(prefix) {
            return (rest, Some(tls));
        }
    }
    (raw, None)
}

/// Whether `authority` (`host[:port]`) names this machine.
fn is_local(authority: &str) -> bool {
    matches!(host_of(authority), "localhost" | "127.0.0.1" | "::1")
}

/// Strips the port from `host[:port]`. Bracketed IPv6 hosts
/// (`[::1]:8080`) come back without their brackets.
fn host_of(authority: &str) -> &str {
    if let Some(rest) = authority.strip_prefix('[') {
        return rest.split_once(']').map_or(rest, |(host, _)| host);
    }
    authority
        .split_once(':')
        .map_or(authority, |(host, _port)| host)
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
