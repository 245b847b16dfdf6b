//! Client for npm registry

use std::sync::Arc;

use reqwest::Client;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::http_client::create_shared_client;
use super::{PackageInfo, Registry};
use crate::config::NpmRegistryConfig;

/// Client for the npm registry
pub struct NpmRegistry {
    client: Arc<Client>,
    base_url: String,
    package_page_url: String,
}

impl NpmRegistry {
    /// Creates an NpmRegistry against the public registry using the provided
    /// shared HTTP client.
    pub fn with_client(client: Arc<Client>) -> Self {
        Self::with_client_and_config(client, &NpmRegistryConfig::default())
    }

    /// Creates an NpmRegistry with the registry and listing URLs from `config`.
    pub fn with_client_and_config(client: Arc<Client>, config: &NpmRegistryConfig) -> Self {
        Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            package_page_url: config.package_page_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn http_client(&self) -> Arc<Client> {
        Arc::clone(&self.client)
    }
}

impl Default for NpmRegistry {
    fn default() -> Self {
        Self::with_client(create_shared_client(None).expect("Failed to create HTTP client"))
    }
}

// API response structure. Every field tolerates being absent, empty or of
// the wrong type.
#[derive(Debug, Deserialize)]
struct PackageResponse {
    #[serde(default, deserialize_with = "lenient_string")]
    description: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    readme: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    homepage: Option<String>,
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) if !s.is_empty() => Some(s),
        _ => None,
    })
}

/// Handle scoped packages (@scope/name -> @scope%2fname)
fn encode_package_name(package_name: &str) -> String {
    if package_name.starts_with('@') {
        package_name.replace('/', "%2f")
    } else {
        package_name.to_string()
    }
}

impl Registry for NpmRegistry {
    async fn get_package_info(&self, package_name: &str) -> anyhow::Result<PackageInfo> {
        let url = format!("{}/{}", self.base_url, encode_package_name(package_name));
        tracing::debug!("Fetching {url}");

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            anyhow::bail!(
                "Failed to fetch package info for {}: {}",
                package_name,
                response.status()
            );
        }

        let body: Value = response.json().await?;
        if !body.is_object() {
            anyhow::bail!("Unexpected registry response for {package_name}: not an object");
        }
        let pkg: PackageResponse = serde_json::from_value(body)?;

        Ok(PackageInfo {
            description: pkg.description,
            readme: pkg.readme,
            homepage: pkg.homepage,
        })
    }

    fn package_url(&self, package_name: &str) -> String {
        format!("{}/{}", self.package_page_url, package_name)
    }
}
