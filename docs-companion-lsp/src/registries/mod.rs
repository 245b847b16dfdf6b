//! Registry clients for fetching package documentation

use serde::{Deserialize, Serialize};

use crate::docs::{DocKind, DocLink, DocResult};
use crate::utils::truncate_chars;

/// Attribution shown under registry-backed results
pub const NPM_SOURCE: &str = "npm registry";

/// Body used when the registry could not be reached or answered badly
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch documentation from npm.";

const NO_DESCRIPTION: &str = "No description available";
const NO_README: &str = "No README available";

/// Package metadata returned by a registry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageInfo {
    /// One-line package description
    pub description: Option<String>,
    /// Long-form README text
    pub readme: Option<String>,
    /// Homepage URL
    pub homepage: Option<String>,
}

/// Trait for registry clients
/// Note: async_fn_in_trait is allowed because this trait is internal and already bounds Send + Sync
#[allow(async_fn_in_trait)]
pub trait Registry: Send + Sync {
    /// Fetch metadata for a package in a single request
    async fn get_package_info(&self, package_name: &str) -> anyhow::Result<PackageInfo>;

    /// Human-facing listing page for a package
    fn package_url(&self, package_name: &str) -> String;
}

/// Fetch documentation for a declared dependency.
///
/// Never fails: transport errors, non-success statuses and malformed bodies
/// all produce an `npm-package` result with a fixed failure message and no
/// links.
pub async fn fetch_package_doc<R: Registry>(
    registry: &R,
    package_name: &str,
    version: &str,
    readme_max_chars: usize,
) -> DocResult {
    match registry.get_package_info(package_name).await {
        Ok(info) => package_doc(
            package_name,
            version,
            &info,
            registry.package_url(package_name),
            readme_max_chars,
        ),
        Err(e) => {
            tracing::warn!("Failed to fetch package info for {package_name}: {e}");
            fetch_failed_doc(package_name, version)
        }
    }
}

fn package_title(package_name: &str, version: &str) -> String {
    format!("{package_name} ({version})")
}

/// Build the result for successfully fetched metadata.
pub fn package_doc(
    package_name: &str,
    version: &str,
    info: &PackageInfo,
    listing_url: String,
    readme_max_chars: usize,
) -> DocResult {
    let description = non_empty(&info.description).unwrap_or(NO_DESCRIPTION);
    let readme = non_empty(&info.readme).unwrap_or(NO_README);
    let homepage = non_empty(&info.homepage)
        .map(str::to_string)
        .unwrap_or_else(|| listing_url.clone());

    DocResult {
        symbol: package_name.to_string(),
        kind: DocKind::NpmPackage,
        title: package_title(package_name, version),
        content: format!(
            "**Description:** {description}\n\n{}",
            truncate_chars(readme, readme_max_chars)
        ),
        source: Some(NPM_SOURCE.to_string()),
        links: Some(vec![
            DocLink::new("npm", listing_url),
            DocLink::new("Homepage", homepage),
        ]),
    }
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

/// Build the result used when the fetch failed.
pub fn fetch_failed_doc(package_name: &str, version: &str) -> DocResult {
    DocResult {
        symbol: package_name.to_string(),
        kind: DocKind::NpmPackage,
        title: package_title(package_name, version),
        content: FETCH_FAILED_MESSAGE.to_string(),
        source: Some(NPM_SOURCE.to_string()),
        links: None,
    }
}

pub mod http_client;
pub mod npm;
