//! Process configuration, assembled once at startup from environment
//! variables (mirroring the teacher's `CcswarmConfig` pattern of a plain
//! serde struct with constructor/validation methods, but sourced from the
//! environment instead of a project JSON file).

use crate::error::CoordError;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Transport {
    Stdio,
    StreamableHttp,
}

impl std::str::FromStr for Transport {
    type Err = CoordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stdio" => Ok(Transport::Stdio),
            "streamable-http" => Ok(Transport::StreamableHttp),
            other => Err(CoordError::Fatal(format!(
                "invalid TRANSPORT value '{other}', expected 'stdio' or 'streamable-http'"
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub supabase_url: Option<String>,
    pub supabase_service_key: Option<String>,
    pub port: u16,
    pub redis_url: Option<String>,
    pub openai_api_key: Option<String>,
    pub anthropic_api_key: Option<String>,
    pub transport: Transport,
    pub documents_base_path: String,
    pub auto_archive_interval_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            supabase_url: None,
            supabase_service_key: None,
            port: 8181,
            redis_url: None,
            openai_api_key: None,
            anthropic_api_key: None,
            transport: Transport::StreamableHttp,
            documents_base_path: "docs".to_string(),
            auto_archive_interval_secs: 3600,
        }
    }
}

impl Config {
    /// Build configuration from the process environment, matching the
    /// variable names the deployment recognizes.
    pub fn from_env() -> Result<Self, CoordError> {
        let mut cfg = Config::default();

        cfg.supabase_url = std::env::var("SUPABASE_URL").ok();
        cfg.supabase_service_key = std::env::var("SUPABASE_SERVICE_KEY").ok();
        cfg.redis_url = std::env::var("REDIS_URL").ok();
        cfg.openai_api_key = std::env::var("OPENAI_API_KEY").ok();
        cfg.anthropic_api_key = std::env::var("ANTHROPIC_API_KEY").ok();

        if let Ok(path) = std::env::var("DOCUMENTS_BASE_PATH") {
            cfg.documents_base_path = path;
        }

        if let Ok(port) = std::env::var("ARCHON_MCP_PORT").or_else(|_| std::env::var("PORT")) {
            cfg.port = port
                .parse()
                .map_err(|_| CoordError::Fatal(format!("invalid port '{port}'")))?;
        }

        if let Ok(transport) = std::env::var("TRANSPORT") {
            cfg.transport = transport.parse()?;
        }

        cfg.validate()?;
        Ok(cfg)
    }

    /// Checks invariants that must hold before the server binds. Anything
    /// caught here is a `Fatal` error - the process should not start.
    pub fn validate(&self) -> Result<(), CoordError> {
        if let (Some(url), Some(key)) = (&self.supabase_url, &self.supabase_service_key) {
            if looks_like_anon_key(key) {
                return Err(CoordError::Fatal(
                    "SUPABASE_SERVICE_KEY looks like an anon key (payload claims role=anon); \
                     the service role key is required"
                        .to_string(),
                ));
            }
            if !is_loopback_or_local(url) && !url.starts_with("https://") {
                return Err(CoordError::Fatal(format!(
                    "SUPABASE_URL '{url}' must use https:// for non-local hosts"
                )));
            }
        }
        Ok(())
    }
}

/// Decodes just enough of a JWT to see whether its payload claims
/// `"role":"anon"`, without verifying the signature - we only use this to
/// refuse an obviously wrong key, not to authenticate anything.
fn looks_like_anon_key(key: &str) -> bool {
    let Some(payload_b64) = key.split('.').nth(1) else {
        return false;
    };
    use base64_decode::decode_no_pad;
    match decode_no_pad(payload_b64) {
        Some(bytes) => String::from_utf8_lossy(&bytes).contains("\"role\":\"anon\""),
        None => false,
    }
}

fn is_loopback_or_local(url: &str) -> bool {
    let host = url
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .split(['/', ':'])
        .next()
        .unwrap_or("");
    if host == "localhost" {
        return true;
    }
    match host.parse::<IpAddr>() {
        Ok(IpAddr::V4(v4)) => v4.is_loopback() || v4.is_private(),
        Ok(IpAddr::V6(v6)) => v6.is_loopback(),
        Err(_) => false,
    }
}

/// Minimal unpadded-base64 decoder, just for reading a JWT payload segment;
/// avoids pulling in a whole base64 crate for one startup sanity check.
mod base64_decode {
    const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

    pub fn decode_no_pad(input: &str) -> Option<Vec<u8>> {
        let mut table = [255u8; 256];
        for (i, &c) in ALPHABET.iter().enumerate() {
            table[c as usize] = i as u8;
        }
        let mut out = Vec::with_capacity(input.len() * 3 / 4);
        let mut buf = 0u32;
        let mut bits = 0u32;
        for c in input.bytes() {
            let val = table[c as usize];
            if val == 255 {
                continue;
            }
            buf = (buf << 6) | val as u32;
            bits += 6;
            if bits >= 8 {
                bits -= 8;
                out.push((buf >> bits) as u8);
            }
        }
        Some(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_transport_is_streamable_http() {
        assert_eq!(Config::default().transport, Transport::StreamableHttp);
    }

    #[test]
    fn transport_parses_known_values() {
        assert_eq!("stdio".parse::<Transport>().unwrap(), Transport::Stdio);
        assert_eq!(
            "streamable-http".parse::<Transport>().unwrap(),
            Transport::StreamableHttp
        );
        assert!("carrier-pigeon".parse::<Transport>().is_err());
    }

    #[test]
    fn loopback_url_is_exempt_from_https_requirement() {
        assert!(is_loopback_or_local("http://localhost:54321"));
        assert!(is_loopback_or_local("http://127.0.0.1:54321"));
        assert!(!is_loopback_or_local("http://example.com"));
    }

    #[test]
    fn validate_rejects_anon_key() {
        // header.payload.signature, payload = {"role":"anon"} base64url, unpadded
        let payload = "eyJyb2xlIjoiYW5vbiJ9";
        let key = format!("eyJhbGciOiJIUzI1NiJ9.{payload}.sig");
        let cfg = Config {
            supabase_url: Some("https://project.supabase.co".to_string()),
            supabase_service_key: Some(key),
            ..Config::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_accepts_service_role_key_over_https() {
        let payload = "eyJyb2xlIjoic2VydmljZV9yb2xlIn0";
        let key = format!("eyJhbGciOiJIUzI1NiJ9.{payload}.sig");
        let cfg = Config {
            supabase_url: Some("https://project.supabase.co".to_string()),
            supabase_service_key: Some(key),
            ..Config::default()
        };
        assert!(cfg.validate().is_ok());
    }
}
