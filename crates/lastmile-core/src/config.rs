//! Connector configuration.
//!
//! The connector never reads ambient settings: hosts build a
//! [`GeoveloConfig`] explicitly, from the environment, or from a JSON list of
//! [`ProviderSettings`].
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `LASTMILE_GEOVELO_URL` | required | Provider base URL |
//! | `LASTMILE_GEOVELO_API_KEY` | empty | Value of the `Api-Key` header |
//! | `LASTMILE_GEOVELO_TIMEOUT_S` | `10` | Per-call timeout |
//! | `LASTMILE_GEOVELO_BREAKER_FAIL_MAX` | `4` | Failures before the breaker opens |
//! | `LASTMILE_GEOVELO_BREAKER_RESET_S` | `60` | Seconds before a trial call |

use std::fmt::{Debug, Formatter};
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;
use url::Url;

use crate::circuit_breaker::CircuitBreakerConfig;
use crate::{CoreError, ValidationError};

pub const DEFAULT_SYSTEM_ID: &str = "geovelo";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_FAIL_MAX: u32 = 4;
pub const DEFAULT_RESET_TIMEOUT_SECS: u64 = 60;

const ENV_URL: &str = "LASTMILE_GEOVELO_URL";
const ENV_API_KEY: &str = "LASTMILE_GEOVELO_API_KEY";
const ENV_TIMEOUT: &str = "LASTMILE_GEOVELO_TIMEOUT_S";
const ENV_FAIL_MAX: &str = "LASTMILE_GEOVELO_BREAKER_FAIL_MAX";
const ENV_RESET: &str = "LASTMILE_GEOVELO_BREAKER_RESET_S";

/// Settings owned by one Geovelo connector.
#[derive(Clone, PartialEq, Eq)]
pub struct GeoveloConfig {
    pub base_url: Url,
    pub api_key: String,
    pub timeout: Duration,
    pub circuit_breaker: CircuitBreakerConfig,
    /// Name used in logs and failure observations.
    pub system_id: String,
}

impl GeoveloConfig {
    pub fn new(base_url: &str, api_key: impl Into<String>) -> Result<Self, ValidationError> {
        Ok(Self {
            base_url: parse_service_url(base_url)?,
            api_key: api_key.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            circuit_breaker: CircuitBreakerConfig {
                fail_max: DEFAULT_FAIL_MAX,
                reset_timeout: Duration::from_secs(DEFAULT_RESET_TIMEOUT_SECS),
            },
            system_id: String::from(DEFAULT_SYSTEM_ID),
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_circuit_breaker(mut self, circuit_breaker: CircuitBreakerConfig) -> Self {
        self.circuit_breaker = circuit_breaker;
        self
    }

    pub fn with_system_id(mut self, system_id: impl Into<String>) -> Self {
        self.system_id = system_id.into();
        self
    }

    /// Reads the `LASTMILE_GEOVELO_*` variables.
    pub fn from_env() -> Result<Self, ValidationError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ValidationError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let url = lookup(ENV_URL).ok_or(ValidationError::MissingEnv { name: ENV_URL })?;
        let api_key = lookup(ENV_API_KEY).unwrap_or_default();
        let timeout = env_number(&lookup, ENV_TIMEOUT, DEFAULT_TIMEOUT_SECS)?;
        let fail_max = env_number(&lookup, ENV_FAIL_MAX, u64::from(DEFAULT_FAIL_MAX))?;
        let reset = env_number(&lookup, ENV_RESET, DEFAULT_RESET_TIMEOUT_SECS)?;

        Ok(Self::new(&url, api_key)?
            .with_timeout(Duration::from_secs(timeout))
            .with_circuit_breaker(CircuitBreakerConfig {
                fail_max: u32::try_from(fail_max).unwrap_or(u32::MAX),
                reset_timeout: Duration::from_secs(reset),
            }))
    }

    /// `POST` target shared by matrix and direct-path calls.
    pub fn routes_url(&self) -> String {
        format!(
            "{}/api/v2/routes_m2m",
            self.base_url.as_str().trim_end_matches('/')
        )
    }
}

impl Debug for GeoveloConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeoveloConfig")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .field("circuit_breaker", &self.circuit_breaker)
            .field("system_id", &self.system_id)
            .finish()
    }
}

fn parse_service_url(value: &str) -> Result<Url, ValidationError> {
    let invalid = || ValidationError::InvalidUrl {
        value: value.to_owned(),
    };
    let url = Url::parse(value.trim()).map_err(|_| invalid())?;
    if url.cannot_be_a_base() || url.host_str().is_none() {
        return Err(invalid());
    }
    Ok(url)
}

fn env_number<F>(lookup: &F, name: &'static str, default: u64) -> Result<u64, ValidationError>
where
    F: Fn(&'static str) -> Option<String>,
{
    let Some(raw) = lookup(name) else {
        return Ok(default);
    };
    match raw.trim().parse::<u64>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(ValidationError::InvalidEnvNumber { name, value: raw }),
    }
}

/// Kinds of street-network provider this crate can build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Geovelo,
}

impl ProviderKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Geovelo => "geovelo",
        }
    }
}

impl FromStr for ProviderKind {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "geovelo" => Ok(Self::Geovelo),
            other => Err(ValidationError::InvalidProviderKind {
                value: other.to_owned(),
            }),
        }
    }
}

fn default_timeout_s() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_fail_max() -> u32 {
    DEFAULT_FAIL_MAX
}

fn default_reset_timeout_s() -> u64 {
    DEFAULT_RESET_TIMEOUT_SECS
}

/// One entry of the provider list a host hands to the registry.
///
/// ```json
/// [{"name": "bike", "kind": "geovelo", "url": "https://geovelo.example", "api_key": "k"}]
/// ```
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderSettings {
    pub name: String,
    pub kind: String,
    pub url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_timeout_s")]
    pub timeout_s: u64,
    #[serde(default = "default_fail_max")]
    pub fail_max: u32,
    #[serde(default = "default_reset_timeout_s")]
    pub reset_timeout_s: u64,
    #[serde(default)]
    pub system_id: Option<String>,
}

impl ProviderSettings {
    pub fn provider_kind(&self) -> Result<ProviderKind, ValidationError> {
        self.kind.parse()
    }

    pub fn geovelo_config(&self) -> Result<GeoveloConfig, ValidationError> {
        if self.timeout_s == 0 {
            return Err(ValidationError::NonPositiveValue { field: "timeout_s" });
        }
        if self.fail_max == 0 {
            return Err(ValidationError::NonPositiveValue { field: "fail_max" });
        }

        let config = GeoveloConfig::new(&self.url, self.api_key.clone().unwrap_or_default())?
            .with_timeout(Duration::from_secs(self.timeout_s))
            .with_circuit_breaker(CircuitBreakerConfig {
                fail_max: self.fail_max,
                reset_timeout: Duration::from_secs(self.reset_timeout_s),
            });

        Ok(match &self.system_id {
            Some(system_id) => config.with_system_id(system_id.clone()),
            None => config,
        })
    }
}

impl Debug for ProviderSettings {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderSettings")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("url", &self.url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("timeout_s", &self.timeout_s)
            .field("fail_max", &self.fail_max)
            .field("reset_timeout_s", &self.reset_timeout_s)
            .field("system_id", &self.system_id)
            .finish()
    }
}

/// Parses a JSON array of [`ProviderSettings`].
pub fn parse_provider_settings(json: &str) -> Result<Vec<ProviderSettings>, CoreError> {
    Ok(serde_json::from_str(json)?)
}
