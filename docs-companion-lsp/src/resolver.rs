//! Symbol resolution: manifest first, then builtins, then unknown

use crate::builtins::builtin_doc;
use crate::config::DEFAULT_README_MAX_CHARS;
use crate::docs::DocResult;
use crate::imports::extract_imports;
use crate::manifest::DependencyManifest;
use crate::registries::npm::NpmRegistry;
use crate::registries::{Registry, fetch_package_doc};

/// Resolves symbols to documentation.
///
/// Holds the manifest loaded at startup (`None` when the project has none)
/// and the registry used for declared dependencies.
pub struct DocsResolver<R = NpmRegistry> {
    manifest: Option<DependencyManifest>,
    registry: R,
    readme_max_chars: usize,
}

impl<R: Registry> DocsResolver<R> {
    pub fn new(manifest: Option<DependencyManifest>, registry: R) -> Self {
        Self {
            manifest,
            registry,
            readme_max_chars: DEFAULT_README_MAX_CHARS,
        }
    }

    pub fn with_readme_max_chars(mut self, readme_max_chars: usize) -> Self {
        self.readme_max_chars = readme_max_chars;
        self
    }

    pub fn manifest(&self) -> Option<&DependencyManifest> {
        self.manifest.as_ref()
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// Resolve documentation for an exact symbol name.
    pub async fn resolve(&self, symbol: &str, language_id: &str) -> DocResult {
        if let Some(version) = self.manifest.as_ref().and_then(|m| m.version_of(symbol)) {
            tracing::debug!("{symbol} is a declared dependency ({version})");
            return fetch_package_doc(&self.registry, symbol, version, self.readme_max_chars)
                .await;
        }

        if let Some(doc) = builtin_doc(symbol, language_id) {
            tracing::debug!("{symbol} is a {language_id} builtin");
            return doc;
        }

        tracing::debug!("No documentation for {symbol}");
        DocResult::unknown(symbol)
    }

    /// Resolve documentation for the first package a source file imports.
    pub async fn resolve_contextual(&self, source: &str, language_id: &str) -> DocResult {
        match extract_imports(source).first() {
            Some(first) => self.resolve(first, language_id).await,
            None => DocResult::no_imports(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::docs::DocKind;
    use crate::registries::{FETCH_FAILED_MESSAGE, PackageInfo};

    #[derive(Default)]
    struct StubRegistry {
        info: Option<PackageInfo>,
        calls: AtomicUsize,
    }

    impl StubRegistry {
        fn returning(info: PackageInfo) -> Self {
            Self {
                info: Some(info),
                ..Default::default()
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl Registry for StubRegistry {
        async fn get_package_info(&self, package_name: &str) -> anyhow::Result<PackageInfo> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.info
                .clone()
                .ok_or_else(|| anyhow::anyhow!("registry unavailable for {package_name}"))
        }

        fn package_url(&self, package_name: &str) -> String {
            format!("https://www.npmjs.com/package/{package_name}")
        }
    }

    fn manifest(entries: &[(&str, &str)]) -> Option<DependencyManifest> {
        Some(
            entries
                .iter()
                .map(|(name, version)| (name.to_string(), version.to_string()))
                .collect(),
        )
    }

    fn sample_info() -> PackageInfo {
        PackageInfo {
            description: Some("d".to_string()),
            readme: Some("r".to_string()),
            homepage: Some("h".to_string()),
        }
    }

    #[tokio::test]
    async fn test_declared_dependency_fetches_registry() {
        let resolver = DocsResolver::new(
            manifest(&[("left-pad", "^1.0.0")]),
            StubRegistry::returning(sample_info()),
        );

        let doc = resolver.resolve("left-pad", "javascript").await;
        assert_eq!(doc.kind, DocKind::NpmPackage);
        assert_eq!(doc.title, "left-pad (^1.0.0)");
        assert!(doc.content.starts_with("**Description:** d"));
        let urls: Vec<&str> = doc.links().iter().map(|l| l.url.as_str()).collect();
        assert_eq!(urls, vec!["https://www.npmjs.com/package/left-pad", "h"]);
        assert_eq!(resolver.registry().calls(), 1);
    }

    #[tokio::test]
    async fn test_declared_dependency_fetch_failure() {
        let resolver =
            DocsResolver::new(manifest(&[("left-pad", "^1.0.0")]), StubRegistry::default());

        let doc = resolver.resolve("left-pad", "javascript").await;
        assert_eq!(doc.kind, DocKind::NpmPackage);
        assert_eq!(doc.title, "left-pad (^1.0.0)");
        assert_eq!(doc.content, FETCH_FAILED_MESSAGE);
        assert!(doc.links.is_none());
    }

    #[tokio::test]
    async fn test_manifest_beats_builtin() {
        let resolver = DocsResolver::new(
            manifest(&[("Promise", "^8.0.0")]),
            StubRegistry::returning(sample_info()),
        );

        let doc = resolver.resolve("Promise", "typescript").await;
        assert_eq!(doc.kind, DocKind::NpmPackage);
        assert_eq!(resolver.registry().calls(), 1);
    }

    #[tokio::test]
    async fn test_builtin_without_manifest() {
        let resolver = DocsResolver::new(None, StubRegistry::default());

        let doc = resolver.resolve("Promise", "typescript").await;
        assert_eq!(doc.kind, DocKind::Builtin);
        assert!(doc.links()[0].url.contains("Promise"));
        assert_eq!(resolver.registry().calls(), 0);
    }

    #[tokio::test]
    async fn test_unknown_symbol() {
        let resolver = DocsResolver::new(
            manifest(&[("left-pad", "^1.0.0")]),
            StubRegistry::default(),
        );

        for (symbol, language) in [("leftpad", "javascript"), ("Promise", "python")] {
            let doc = resolver.resolve(symbol, language).await;
            assert_eq!(doc.kind, DocKind::Unknown);
            assert!(doc.links.is_none());
            assert!(doc.source.is_none());
        }
        assert_eq!(resolver.registry().calls(), 0);
    }

    #[tokio::test]
    async fn test_contextual_without_imports() {
        let resolver = DocsResolver::new(None, StubRegistry::default());

        let doc = resolver
            .resolve_contextual("import a from './a';\nimport b from '../b';", "javascript")
            .await;
        assert_eq!(doc, DocResult::no_imports());
    }

    #[tokio::test]
    async fn test_contextual_uses_first_import_only() {
        let resolver = DocsResolver::new(
            manifest(&[("left-pad", "^1.0.0"), ("right-pad", "^2.0.0")]),
            StubRegistry::returning(sample_info()),
        );

        let source = "import r from 'right-pad';\nimport l from 'left-pad';\n";
        let doc = resolver.resolve_contextual(source, "typescript").await;
        assert_eq!(doc.title, "right-pad (^2.0.0)");
        assert_eq!(resolver.registry().calls(), 1);
    }

    #[tokio::test]
    async fn test_contextual_first_import_unresolved() {
        let resolver = DocsResolver::new(
            manifest(&[("left-pad", "^1.0.0")]),
            StubRegistry::returning(sample_info()),
        );

        let source = "import x from 'not-declared';\nimport l from 'left-pad';\n";
        let doc = resolver.resolve_contextual(source, "javascript").await;
        assert_eq!(doc.kind, DocKind::Unknown);
        assert_eq!(doc.symbol, "not-declared");
        assert_eq!(resolver.registry().calls(), 0);
    }

    #[tokio::test]
    async fn test_readme_budget_is_configurable() {
        let resolver = DocsResolver::new(
            manifest(&[("left-pad", "^1.0.0")]),
            StubRegistry::returning(PackageInfo {
                readme: Some("abcdef".to_string()),
                ..Default::default()
            }),
        )
        .with_readme_max_chars(3);

        let doc = resolver.resolve("left-pad", "javascript").await;
        assert!(doc.content.ends_with("\n\nabc..."));
    }
}
