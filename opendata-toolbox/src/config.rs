//! Endpoint and timeout configuration.
//!
//! Defaults match the public services; each value can be overridden through an
//! environment variable read once at startup.

use std::str::FromStr;
use std::time::Duration;

/// Base URL of the MaStR web JSON API.
pub const DEFAULT_MASTR_API_BASE: &str = "https://www.marktstammdatenregister.de/MaStR";
/// User agent sent with every MaStR request.
pub const DEFAULT_USER_AGENT: &str = "mastr-mcp/1.0";
/// Stratum-1 time server of the Physikalisch-Technische Bundesanstalt.
pub const DEFAULT_NTP_SERVER: &str = "ptbtime1.ptb.de";

const MASTR_TIMEOUT_SECS: u64 = 25;
const NTP_PORT: u16 = 123;
const NTP_TIMEOUT_SECS: u64 = 10;

/// Settings for the MaStR power-sum client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MastrConfig {
    /// API base, without trailing slash (`MASTR_API_BASE`).
    pub base_url: String,
    /// `User-Agent` header value.
    pub user_agent: String,
    /// Overall request deadline (`MASTR_TIMEOUT_SECS`).
    pub timeout: Duration,
}

impl Default for MastrConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_MASTR_API_BASE.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(MASTR_TIMEOUT_SECS),
        }
    }
}

impl MastrConfig {
    /// Build the configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let base_url = lookup("MASTR_API_BASE")
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.base_url);
        let timeout_secs = parse_or_default(&lookup, "MASTR_TIMEOUT_SECS", MASTR_TIMEOUT_SECS);

        Self {
            base_url,
            user_agent: defaults.user_agent,
            timeout: Duration::from_secs(timeout_secs),
        }
    }
}

/// Settings for the SNTP client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NtpConfig {
    /// Host name or IP address (`NTP_SERVER`).
    pub server: String,
    /// UDP port (`NTP_PORT`).
    pub port: u16,
    /// Deadline for resolve, send and receive together (`NTP_TIMEOUT_SECS`).
    pub timeout: Duration,
}

impl Default for NtpConfig {
    fn default() -> Self {
        Self {
            server: DEFAULT_NTP_SERVER.to_string(),
            port: NTP_PORT,
            timeout: Duration::from_secs(NTP_TIMEOUT_SECS),
        }
    }
}

impl NtpConfig {
    /// Build the configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let server = lookup("NTP_SERVER")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_NTP_SERVER.to_string());

        Self {
            server,
            port: parse_or_default(&lookup, "NTP_PORT", NTP_PORT),
            timeout: Duration::from_secs(parse_or_default(
                &lookup,
                "NTP_TIMEOUT_SECS",
                NTP_TIMEOUT_SECS,
            )),
        }
    }
}

/// Parse a numeric override, falling back to `default` when unset, invalid or zero.
fn parse_or_default<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr + PartialEq + Default + Copy,
{
    let Some(raw) = lookup(key) else {
        return default;
    };
    match raw.trim().parse::<T>() {
        Ok(value) if value != T::default() => value,
        _ => {
            log::warn!("Ignoring invalid {key}={raw:?}, using default");
            default
        }
    }
}
