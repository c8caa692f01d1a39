//! Street-network providers registered by configured name.
//!
//! The planner resolves a provider once, at startup, from its configured
//! name and then talks to it only through [`StreetNetwork`].
//!
//! # Example
//!
//! ```rust,ignore
//! use lastmile_core::{parse_provider_settings, StreetNetworkRegistry};
//!
//! let settings = parse_provider_settings(
//!     r#"[{"name": "bike", "kind": "geovelo", "url": "https://geovelo.example", "api_key": "k"}]"#,
//! )?;
//! let registry = StreetNetworkRegistry::from_settings(&settings)?;
//! let bike = registry.require("bike")?;
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;

use crate::adapters::GeoveloConnector;
use crate::config::{ProviderKind, ProviderSettings};
use crate::http_client::{HttpClient, ReqwestHttpClient};
use crate::street_network::StreetNetwork;
use crate::ValidationError;

/// Name-indexed set of street-network providers.
#[derive(Default, Clone)]
pub struct StreetNetworkRegistry {
    providers: HashMap<String, Arc<dyn StreetNetwork>>,
}

impl StreetNetworkRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds every provider in `settings`, sharing one reqwest client.
    pub fn from_settings(settings: &[ProviderSettings]) -> Result<Self, ValidationError> {
        Self::from_settings_with_client(settings, Arc::new(ReqwestHttpClient::new()))
    }

    /// Same as [`from_settings`](Self::from_settings) over a caller-supplied transport.
    pub fn from_settings_with_client(
        settings: &[ProviderSettings],
        http_client: Arc<dyn HttpClient>,
    ) -> Result<Self, ValidationError> {
        let mut registry = Self::new();
        for entry in settings {
            let provider: Arc<dyn StreetNetwork> = match entry.provider_kind()? {
                ProviderKind::Geovelo => Arc::new(GeoveloConnector::with_http_client(
                    entry.geovelo_config()?,
                    Arc::clone(&http_client),
                )),
            };
            registry.register(entry.name.clone(), provider)?;
            info!(
                name = %entry.name,
                kind = %entry.kind,
                url = %entry.url,
                "registered street network provider"
            );
        }
        Ok(registry)
    }

    pub fn register(
        &mut self,
        name: impl Into<String>,
        provider: Arc<dyn StreetNetwork>,
    ) -> Result<(), ValidationError> {
        let name = name.into();
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyProviderName);
        }
        if self.providers.contains_key(name) {
            return Err(ValidationError::DuplicateProvider {
                name: name.to_owned(),
            });
        }
        self.providers.insert(name.to_owned(), provider);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn StreetNetwork>> {
        self.providers.get(name.trim()).cloned()
    }

    pub fn require(&self, name: &str) -> Result<Arc<dyn StreetNetwork>, ValidationError> {
        self.get(name).ok_or_else(|| ValidationError::UnknownProvider {
            name: name.to_owned(),
        })
    }

    /// Registered names in ascending order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.providers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_provider_settings;

    const SETTINGS: &str = r#"[
        {"name": "bike", "kind": "geovelo", "url": "https://geovelo.example.test", "api_key": "k"},
        {"name": "bike_backup", "kind": "geovelo", "url": "https://backup.example.test"}
    ]"#;

    #[test]
    fn builds_every_configured_provider() {
        let settings = parse_provider_settings(SETTINGS).expect("valid settings");
        let registry = StreetNetworkRegistry::from_settings(&settings).expect("valid registry");

        assert_eq!(registry.names(), vec!["bike", "bike_backup"]);
        assert!(registry.get("bike").is_some());
    }

    #[test]
    fn unknown_name_is_reported() {
        let registry = StreetNetworkRegistry::new();
        let err = registry.require("car").err().expect("must fail");
        assert_eq!(
            err,
            ValidationError::UnknownProvider {
                name: String::from("car")
            }
        );
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let settings = parse_provider_settings(
            r#"[
                {"name": "bike", "kind": "geovelo", "url": "https://a.example.test"},
                {"name": "bike", "kind": "geovelo", "url": "https://b.example.test"}
            ]"#,
        )
        .expect("valid settings");

        let err = StreetNetworkRegistry::from_settings(&settings)
            .err()
            .expect("must fail");
        assert!(matches!(err, ValidationError::DuplicateProvider { .. }));
    }

    #[test]
    fn unsupported_kind_is_rejected() {
        let settings = parse_provider_settings(
            r#"[{"name": "car", "kind": "valhalla", "url": "https://v.example.test"}]"#,
        )
        .expect("valid settings");

        let err = StreetNetworkRegistry::from_settings(&settings)
            .err()
            .expect("must fail");
        assert!(matches!(err, ValidationError::InvalidProviderKind { .. }));
    }
}
