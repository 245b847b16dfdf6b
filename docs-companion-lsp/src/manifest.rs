//! Project manifest (package.json) loading
//!
//! Only the `dependencies` and `devDependencies` sections matter here. Both
//! are merged into a single name to version-range map; when a package is
//! declared in both, the `devDependencies` range wins.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::de::Error as _;
use serde_json::{Map, Value};

/// Default manifest file name looked up at the workspace root
pub const DEFAULT_MANIFEST_FILE: &str = "package.json";

/// Errors raised while loading a manifest
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Declared dependencies of a project, immutable once loaded
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyManifest {
    dependencies: HashMap<String, String>,
}

impl DependencyManifest {
    /// Parse manifest content.
    ///
    /// The root must be an object. Sections that are not objects and entries
    /// whose value is not a string are ignored.
    pub fn parse(content: &str) -> Result<Self, serde_json::Error> {
        let Value::Object(package) = serde_json::from_str(content)? else {
            return Err(serde_json::Error::custom("manifest root is not an object"));
        };

        let mut dependencies = HashMap::new();
        for section in ["dependencies", "devDependencies"] {
            if let Some(Value::Object(entries)) = package.get(section) {
                merge_section(&mut dependencies, entries);
            }
        }

        Ok(Self { dependencies })
    }

    /// Read and parse the manifest at `path`.
    pub async fn load(path: &Path) -> Result<Self, ManifestError> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ManifestError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        Self::parse(&content).map_err(|source| ManifestError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load the manifest from a workspace root, or `None` when it is missing
    /// or invalid.
    pub async fn load_from_root(root: &Path, file_name: &str) -> Option<Self> {
        let path = root.join(file_name);
        match Self::load(&path).await {
            Ok(manifest) => {
                tracing::info!(
                    "Loaded {} declared dependencies from {}",
                    manifest.len(),
                    path.display()
                );
                Some(manifest)
            }
            Err(ManifestError::Io { source, .. })
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                tracing::debug!("No manifest at {}", path.display());
                None
            }
            Err(e) => {
                tracing::info!("Ignoring manifest: {e}");
                None
            }
        }
    }

    /// Declared version range for a package, by exact name
    pub fn version_of(&self, name: &str) -> Option<&str> {
        self.dependencies.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.dependencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dependencies.is_empty()
    }
}

impl FromIterator<(String, String)> for DependencyManifest {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            dependencies: iter.into_iter().collect(),
        }
    }
}

fn merge_section(target: &mut HashMap<String, String>, entries: &Map<String, Value>) {
    for (name, version) in entries {
        if let Some(version) = version.as_str() {
            target.insert(name.clone(), version.to_string());
        }
    }
}
